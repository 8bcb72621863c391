use std::path::{Path, PathBuf};

pub const DEFAULT_SOURCE_DIR: &str = "data/source";
pub const DEFAULT_DATA_DIR: &str = "public/data";

/// File names read and written by the jobs.
pub mod files {
    pub const MEASURE_O: &str = "measure_o_geodata_latlon.geojson";
    pub const MEASURE_P: &str = "measure_p_geodata_latlon.geojson";
    pub const PRECINCTS: &str = "precincts-voting.geojson";
    pub const SITES_CSV: &str = "opportunity-sites-data.csv";
    pub const SITES: &str = "opportunity-sites.geojson";
    pub const DISTRICTS: &str = "council-districts.geojson";
    pub const UPZONE_SOURCE: &str = "Chico_UpzoneScenario.geojson";
    pub const UPZONE: &str = "upzone-scenario.geojson";
    pub const UPZONE_SUMMARY: &str = "upzone-scenario-summary.json";
}

/// Where source datasets are read from and published files are written to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataPaths {
    pub source_dir: PathBuf,
    pub data_dir: PathBuf,
}

impl Default for DataPaths {
    fn default() -> Self { Self::new(DEFAULT_SOURCE_DIR, DEFAULT_DATA_DIR) }
}

impl DataPaths {
    pub fn new(source_dir: impl Into<PathBuf>, data_dir: impl Into<PathBuf>) -> Self {
        Self { source_dir: source_dir.into(), data_dir: data_dir.into() }
    }

    #[inline] pub fn source(&self, file: &str) -> PathBuf { self.source_dir.join(file) }

    #[inline] pub fn output(&self, file: &str) -> PathBuf { self.data_dir.join(file) }

    #[inline] pub fn data_dir(&self) -> &Path { &self.data_dir }
}
