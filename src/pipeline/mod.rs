//! Offline preparation jobs that turn source datasets into the files the map
//! loads. Every job aborts when a required source file is missing.

mod districts;
mod paths;
mod precincts;
mod sites;
mod upzone;
mod validate;

pub use districts::{DistrictsReport, district_fields, normalize_districts, run_districts};
pub use paths::{DEFAULT_DATA_DIR, DEFAULT_SOURCE_DIR, DataPaths, files};
pub use precincts::{PrecinctsReport, merge_precincts, precinct_fields, run_precincts};
pub use sites::{SitesReport, merge_sites, run_sites, site_fields, site_schema};
pub use upzone::{IDENTITY_PROPERTY, PRIORITY_PROPERTY, UpzoneReport, UpzoneStats, prepare_upzone, run_upzone};
pub use validate::{FileCheck, REQUIRED_PROPERTIES, ValidationReport, check_collection, validate_data_dir};
