use std::{fs, path::Path};

use anyhow::{Context, Result};
use serde_json::Value;

use crate::common::file_size;

/// Published layer files and the properties their first feature must carry.
pub const REQUIRED_PROPERTIES: &[(&str, &[&str])] = &[
    ("precincts-voting.geojson", &["PRECINCT", "percent_yes_o", "percent_yes_p"]),
    ("council-districts.geojson", &["district_number"]),
    ("opportunity-sites.geojson", &["site_id", "name", "priority_score", "acres"]),
    ("parks.geojson", &["name"]),
];

/// Result of checking one published file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileCheck {
    pub file: String,
    pub exists: bool,
    pub feature_count: Option<usize>,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl FileCheck {
    #[inline] pub fn is_valid(&self) -> bool { self.exists && self.errors.is_empty() }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub checks: Vec<FileCheck>,
    /// GeoJSON files with no declared requirements, with their sizes in bytes.
    pub extra: Vec<(String, u64)>,
    /// Set when the directory has no GeoJSON files at all; nothing was checked.
    pub empty: bool,
}

impl ValidationReport {
    pub fn has_errors(&self) -> bool { self.checks.iter().any(|c| !c.is_valid()) }
}

/// Check the shape of one parsed file. Required properties are looked up on
/// the first feature only.
pub fn check_collection(file: &str, value: &Value, required: &[&str]) -> FileCheck {
    let mut check = FileCheck { file: file.to_string(), exists: true, ..Default::default() };

    match value.get("type").and_then(Value::as_str) {
        Some("FeatureCollection") => {}
        other => {
            check.errors.push(format!("Expected FeatureCollection, got {}", other.unwrap_or("undefined")));
            return check;
        }
    }
    let Some(features) = value.get("features").and_then(Value::as_array) else {
        check.errors.push("Missing features array".into());
        return check;
    };

    check.feature_count = Some(features.len());
    match features.first() {
        None => check.warnings.push("GeoJSON has no features".into()),
        Some(first) => {
            let props = first.get("properties").and_then(Value::as_object);
            for name in required {
                if !props.is_some_and(|p| p.contains_key(*name)) {
                    check.errors.push(format!("Missing required property: {name}"));
                }
            }
        }
    }
    check
}

fn check_file(dir: &Path, file: &str, required: &[&str]) -> FileCheck {
    let path = dir.join(file);
    if !path.is_file() {
        return FileCheck { file: file.to_string(), errors: vec!["File does not exist".into()], ..Default::default() };
    }
    let parsed = fs::read_to_string(&path)
        .map_err(anyhow::Error::from)
        .and_then(|text| Ok(serde_json::from_str::<Value>(&text)?));
    match parsed {
        Ok(value) => check_collection(file, &value, required),
        Err(e) => FileCheck {
            file: file.to_string(),
            exists: true,
            errors: vec![format!("Parse error: {e}")],
            ..Default::default()
        },
    }
}

/// Check every declared file in `dir` and list undeclared GeoJSON files.
///
/// Errors only when `dir` itself is missing or unreadable; per-file problems
/// are reported in the returned [`ValidationReport`].
pub fn validate_data_dir(dir: &Path) -> Result<ValidationReport> {
    if !dir.is_dir() {
        anyhow::bail!("[pipeline::validate] Data directory does not exist: {}", dir.display());
    }

    let mut present: Vec<String> = fs::read_dir(dir)
        .with_context(|| format!("[pipeline::validate] Failed to list {}", dir.display()))?
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| entry.file_name().into_string().ok())
        .filter(|name| name.ends_with(".geojson"))
        .collect();
    present.sort();

    if present.is_empty() {
        tracing::warn!(dir = %dir.display(), "no GeoJSON files to validate");
        return Ok(ValidationReport { empty: true, ..Default::default() });
    }

    let checks = REQUIRED_PROPERTIES.iter()
        .map(|(file, required)| check_file(dir, file, required))
        .collect::<Vec<_>>();
    for check in checks.iter().filter(|c| !c.is_valid()) {
        tracing::warn!(file = %check.file, errors = ?check.errors, "validation failed");
    }

    let mut extra = Vec::new();
    for name in present.into_iter().filter(|n| !REQUIRED_PROPERTIES.iter().any(|(f, _)| *f == n.as_str())) {
        let size = file_size(&dir.join(&name))?;
        extra.push((name, size));
    }

    Ok(ValidationReport { checks, extra, empty: false })
}
