use std::path::PathBuf;

use anyhow::Result;

use crate::{
    common::{file_size, require_file_exists},
    feature::{FeatureCollection, FieldValue},
    io::{JsonStyle, TextTable, csv::read_csv_text, read_feature_collection, write_feature_collection},
    join::{ColumnType, CsvSchema, Fallback, JoinIndex, JoinSpec, MergeReport, MissPolicy, OutputField, merge},
};
use super::{DataPaths, files};

/// Column types of the site attribute table.
pub fn site_schema() -> CsvSchema {
    CsvSchema::new()
        .column("site_id", ColumnType::Integer)
        .column("priority_score", ColumnType::Integer)
        .column("acres", ColumnType::Float)
        .column("dist_downtown_mi", ColumnType::Float)
        .column("potential_units", ColumnType::Float)
        .column("parks_5min", ColumnType::boolean("True"))
        .column("parks_10min", ColumnType::boolean("True"))
}

/// Output schema of the site layer. Sites without a table row keep what the
/// outline file knows and take fixed defaults for the rest.
pub fn site_fields() -> Vec<OutputField> {
    let unknown = || Fallback::Literal(FieldValue::text("Unknown"));
    vec![
        OutputField::secondary("site_id", "site_id").coerce(ColumnType::Integer)
            .or(Fallback::Primary { property: "Number_ID".into(), default: FieldValue::zero() }),
        OutputField::secondary("name", "name")
            .or(Fallback::Primary { property: "Name".into(), default: FieldValue::Null }),
        OutputField::secondary("type", "type")
            .or(Fallback::Primary { property: "Type".into(), default: FieldValue::text("Unknown") }),
        OutputField::secondary("acres", "acres").coerce(ColumnType::Float)
            .or(Fallback::Primary { property: "Acres".into(), default: FieldValue::zero() }),
        OutputField::secondary("dist_downtown_mi", "dist_downtown_mi").or(Fallback::Zero),
        OutputField::secondary("predominant_zone", "predominant_zone").or(unknown()),
        OutputField::secondary("parks_5min", "parks_5min").or(Fallback::Literal(false.into())),
        OutputField::secondary("parks_10min", "parks_10min").or(Fallback::Literal(false.into())),
        OutputField::secondary("infra_age", "infra_age").or(unknown()),
        OutputField::secondary("potential_units", "potential_units").or(Fallback::Zero),
        OutputField::secondary("priority_score", "priority_score").or(Fallback::Literal(50i64.into())),
    ]
}

/// Join site outlines (`Name`) with the attribute table (`name`).
pub fn merge_sites(outlines: &FeatureCollection, table: &TextTable) -> Result<(FeatureCollection, MergeReport)> {
    let index = JoinIndex::from_table(table, "name", &site_schema())?;
    let spec = JoinSpec { primary_key: "Name".into(), fields: site_fields(), policy: MissPolicy::Defaults };
    Ok(merge(outlines, &index, &spec))
}

#[derive(Debug, Clone)]
pub struct SitesReport {
    pub output: PathBuf,
    pub rows: usize,
    pub merge: MergeReport,
    pub bytes: u64,
}

/// Rewrite `opportunity-sites.geojson` in place with attributes from the CSV table.
pub fn run_sites(paths: &DataPaths) -> Result<SitesReport> {
    let csv_path = paths.source(files::SITES_CSV);
    let geo_path = paths.output(files::SITES);
    require_file_exists(&csv_path)?;
    require_file_exists(&geo_path)?;

    let table = read_csv_text(&csv_path)?;
    let outlines = read_feature_collection(&geo_path)?;
    tracing::info!(rows = table.len(), features = outlines.len(), "read site sources");

    let (merged, report) = merge_sites(&outlines, &table)?;

    write_feature_collection(&merged, &geo_path, JsonStyle::Pretty)?;
    let bytes = file_size(&geo_path)?;
    tracing::info!(path = %geo_path.display(), bytes, "updated sites");

    Ok(SitesReport { output: geo_path, rows: table.len(), merge: report, bytes })
}
