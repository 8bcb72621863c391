use anyhow::{Result, bail};
use smartgrowth::jobs::validate_data_dir;

use crate::cli::{Cli, PathArgs};
use super::{data_paths, kilobytes};

pub fn run(_cli: &Cli, args: &PathArgs) -> Result<()> {
    let paths = data_paths(args);
    let report = validate_data_dir(paths.data_dir())?;

    if report.empty {
        println!("No GeoJSON files found in {}", paths.data_dir().display());
        return Ok(());
    }

    for (file, bytes) in &report.extra {
        println!("{file} ({}) - extra file", kilobytes(*bytes));
    }
    for check in &report.checks {
        let status = match (check.is_valid(), check.feature_count) {
            (true, Some(n)) => format!("valid ({n} features)"),
            _ => check.errors.join(", "),
        };
        println!("{}: {status}", check.file);
        for warning in &check.warnings {
            println!("  warning: {warning}");
        }
    }

    if report.has_errors() {
        bail!("Validation failed. Fix errors before building.");
    }
    println!("All data files validated successfully.");
    Ok(())
}
