use std::{fs, path::PathBuf};

use anyhow::{Context, Result};

use crate::{
    common::{ensure_dir_exists, file_size, require_file_exists},
    feature::FeatureCollection,
    io::{JsonStyle, read_feature_collection, write_feature_collection},
    layers::LayerId,
    scenario::{Priority, ScoringFields, Summary, score_features, sort_by_priority},
};
use super::{DataPaths, files};

pub const PRIORITY_PROPERTY: &str = "adoption_priority";
pub const IDENTITY_PROPERTY: &str = "APN";

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct UpzoneStats {
    pub total: usize,
    pub eligible: usize,
    pub min_priority: Option<f64>,
    pub max_priority: Option<f64>,
}

/// Score, round and sort an upzone parcel layer for publishing.
///
/// Every feature gains `adoption_priority` (null when ineligible), coordinates
/// are cut to six decimals, and the collection is ordered for prefix adoption.
pub fn prepare_upzone(mut collection: FeatureCollection) -> (FeatureCollection, UpzoneStats) {
    score_features(&mut collection, &ScoringFields::default(), PRIORITY_PROPERTY);

    let mut stats = UpzoneStats { total: collection.len(), ..Default::default() };
    for feature in collection.features.iter_mut() {
        if let Some(p) = Priority::from_value(feature.properties.get(PRIORITY_PROPERTY)).value() {
            stats.eligible += 1;
            stats.min_priority = Some(stats.min_priority.map_or(p, |m| m.min(p)));
            stats.max_priority = Some(stats.max_priority.map_or(p, |m| m.max(p)));
        }
        *feature = feature.rounded();
    }

    sort_by_priority(&mut collection, PRIORITY_PROPERTY, IDENTITY_PROPERTY);
    (collection, stats)
}

#[derive(Debug, Clone)]
pub struct UpzoneReport {
    pub output: PathBuf,
    pub summary: PathBuf,
    pub stats: UpzoneStats,
    pub source_bytes: u64,
    pub output_bytes: u64,
}

impl UpzoneReport {
    /// Percent by which the published file is smaller than the source.
    pub fn size_reduction(&self) -> f64 {
        if self.source_bytes == 0 {
            return 0.0;
        }
        (self.source_bytes as f64 - self.output_bytes as f64) / self.source_bytes as f64 * 100.0
    }
}

/// Publish the upzone parcel layer and copy its scenario summary.
pub fn run_upzone(paths: &DataPaths) -> Result<UpzoneReport> {
    let source = paths.source(files::UPZONE_SOURCE);
    let source_summary = paths.source(files::UPZONE_SUMMARY);
    require_file_exists(&source)?;
    require_file_exists(&source_summary)?;
    ensure_dir_exists(paths.data_dir())?;

    let collection = read_feature_collection(&source)?;
    tracing::info!(features = collection.len(), "scoring upzone parcels");
    let (prepared, stats) = prepare_upzone(collection);

    let output = paths.output(files::UPZONE);
    write_feature_collection(&prepared, &output, JsonStyle::Compact)?;

    let summary = paths.output(files::UPZONE_SUMMARY);
    fs::copy(&source_summary, &summary)
        .with_context(|| format!("[pipeline::upzone] Failed to copy summary to {}", summary.display()))?;
    if let Some(config) = LayerId::UpzoneScenario.scenario() {
        match Summary::read(&summary, &config.layout) {
            Ok(parsed) => {
                let present = parsed.breakpoints.iter().filter(|bp| bp.metrics.is_some()).count();
                tracing::info!(breakpoints = present, "summary copied");
            }
            Err(e) => tracing::warn!(error = %format!("{e:#}"), "copied summary does not match the upzone layout"),
        }
    }

    let report = UpzoneReport {
        output,
        summary,
        stats,
        source_bytes: file_size(&source)?,
        output_bytes: file_size(&paths.output(files::UPZONE))?,
    };
    tracing::info!(
        eligible = stats.eligible,
        total = stats.total,
        reduction_pct = report.size_reduction(),
        "wrote upzone layer"
    );
    Ok(report)
}
