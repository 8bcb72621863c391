use anyhow::Result;
use smartgrowth::jobs::{run_districts, run_precincts, run_sites, run_upzone};

use crate::cli::{Cli, PathArgs};
use super::{data_paths, kilobytes};

pub fn precincts(_cli: &Cli, args: &PathArgs) -> Result<()> {
    let report = run_precincts(&data_paths(args))?;
    println!("Created {} ({} features, {})", report.output.display(), report.features, kilobytes(report.bytes));
    println!("  Measure P matched: {}, zero-filled: {}", report.merge.matched, report.merge.unmatched.len());
    Ok(())
}

pub fn sites(_cli: &Cli, args: &PathArgs) -> Result<()> {
    let report = run_sites(&data_paths(args))?;
    println!("Updated {} ({})", report.output.display(), kilobytes(report.bytes));
    println!("  Table rows: {}, matched: {}, unmatched: {}", report.rows, report.merge.matched, report.merge.unmatched.len());
    for name in &report.merge.unmatched {
        println!("  No match for: {name}");
    }
    Ok(())
}

pub fn districts(_cli: &Cli, args: &PathArgs) -> Result<()> {
    let report = run_districts(&data_paths(args))?;
    println!("Updated {} ({})", report.output.display(), kilobytes(report.bytes));
    for (number, name, member) in &report.districts {
        println!("  {number}. {name} - {member}");
    }
    Ok(())
}

pub fn upzone(_cli: &Cli, args: &PathArgs) -> Result<()> {
    let report = run_upzone(&data_paths(args))?;
    let stats = report.stats;
    println!("Wrote {}", report.output.display());
    println!("Copied {}", report.summary.display());
    println!("  Total features: {}", stats.total);
    println!("  Eligible parcels: {}", stats.eligible);
    if let (Some(min), Some(max)) = (stats.min_priority, stats.max_priority) {
        println!("  Priority range: {min:.2} - {max:.2}");
    }
    println!("  Original size: {:.2} MB", report.source_bytes as f64 / 1e6);
    println!("  Output size: {:.2} MB", report.output_bytes as f64 / 1e6);
    println!("  Size reduction: {:.1}%", report.size_reduction());
    Ok(())
}

pub fn all(cli: &Cli, args: &PathArgs) -> Result<()> {
    precincts(cli, args)?;
    sites(cli, args)?;
    districts(cli, args)?;
    upzone(cli, args)?;
    super::validate::run(cli, args)
}
