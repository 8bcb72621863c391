use std::{cmp::Ordering, path::PathBuf};

use anyhow::Result;

use crate::{
    common::{file_size, require_file_exists},
    feature::FeatureCollection,
    io::{JsonStyle, read_feature_collection, write_feature_collection},
    join::{ColumnType, OutputField, project},
};
use super::{DataPaths, files};

pub fn district_fields() -> Vec<OutputField> {
    vec![
        OutputField::primary("district_number", "DISTRICT").coerce(ColumnType::Integer),
        OutputField::primary("name", "NAME"),
        OutputField::primary("council_member", "COUNCILMEM"),
        OutputField::primary("term_dates", "TermDate"),
        OutputField::primary("email", "Email"),
    ]
}

/// Rename district properties and order districts by number. Districts
/// without a readable number go last.
pub fn normalize_districts(collection: &FeatureCollection) -> FeatureCollection {
    let mut out = project(collection, &district_fields());
    out.sort_by(|a, b| {
        by_number_nulls_last(a.properties.number("district_number"), b.properties.number("district_number"))
    });
    out
}

fn by_number_nulls_last(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[derive(Debug, Clone)]
pub struct DistrictsReport {
    pub output: PathBuf,
    /// `(number, name, council member)` in output order, as display strings.
    pub districts: Vec<(String, String, String)>,
    pub bytes: u64,
}

/// Normalize `council-districts.geojson` in place.
pub fn run_districts(paths: &DataPaths) -> Result<DistrictsReport> {
    let path = paths.output(files::DISTRICTS);
    require_file_exists(&path)?;

    let source = read_feature_collection(&path)?;
    tracing::info!(districts = source.len(), "read council districts");

    let normalized = normalize_districts(&source);
    write_feature_collection(&normalized, &path, JsonStyle::Pretty)?;
    let bytes = file_size(&path)?;

    let districts = normalized.iter()
        .map(|f| {
            let p = &f.properties;
            (p.display("district_number"), p.display("name"), p.display("council_member"))
        })
        .collect();

    Ok(DistrictsReport { output: path, districts, bytes })
}
