//! Format-specific reading and writing.
//!
//! - `geojson` - feature collection files (shape-checked on read)
//! - `json` - plain JSON documents such as scenario summaries
//! - `csv` - delimited text tables, read as untyped text for explicit coercion

mod error;
pub(crate) mod csv;
pub(crate) mod geojson;
pub(crate) mod json;

pub use csv::TextTable;
pub use error::FormatError;
pub use geojson::{JsonStyle, parse_feature_collection, read_feature_collection, write_feature_collection};
