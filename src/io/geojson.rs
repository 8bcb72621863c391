use std::{fs::File, io::{BufReader, BufWriter, Write}, path::Path};

use anyhow::{Context, Result};
use serde_json::Value;

use crate::feature::FeatureCollection;

/// Output layout of written JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonStyle {
    /// Single line, used for large layers shipped to the browser.
    Compact,
    /// Two-space indentation.
    #[default]
    Pretty,
}

/// Parse a FeatureCollection from JSON text.
pub fn parse_feature_collection(text: &str) -> Result<FeatureCollection> {
    let value: Value = serde_json::from_str(text)
        .context("[io::geojson] Failed to parse GeoJSON text")?;
    Ok(FeatureCollection::from_value(value)?)
}

/// Read a FeatureCollection from a file at `path`.
pub fn read_feature_collection(path: &Path) -> Result<FeatureCollection> {
    let file = File::open(path)
        .with_context(|| format!("[io::geojson] Failed to open GeoJSON file: {}", path.display()))?;
    let value: Value = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("[io::geojson] Failed to parse GeoJSON from {}", path.display()))?;
    FeatureCollection::from_value(value)
        .with_context(|| format!("[io::geojson] Unexpected shape in {}", path.display()))
}

/// Write a FeatureCollection to `path`, replacing any existing file.
pub fn write_feature_collection(collection: &FeatureCollection, path: &Path, style: JsonStyle) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("[io::geojson] Failed to create GeoJSON file: {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    match style {
        JsonStyle::Compact => serde_json::to_writer(&mut writer, collection),
        JsonStyle::Pretty => serde_json::to_writer_pretty(&mut writer, collection),
    }.with_context(|| format!("[io::geojson] Failed to write GeoJSON to {}", path.display()))?;
    writer.flush()?;
    Ok(())
}
