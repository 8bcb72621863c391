pub mod prepare;
pub mod scenario;
pub mod validate;

use smartgrowth::jobs::{DEFAULT_DATA_DIR, DEFAULT_SOURCE_DIR, DataPaths};

use crate::cli::PathArgs;

pub(crate) fn data_paths(args: &PathArgs) -> DataPaths {
    DataPaths::new(
        args.source_dir.clone().unwrap_or(DEFAULT_SOURCE_DIR.into()),
        args.data_dir.clone().unwrap_or(DEFAULT_DATA_DIR.into()),
    )
}

pub(crate) fn kilobytes(bytes: u64) -> String {
    format!("{:.1} KB", bytes as f64 / 1024.0)
}
