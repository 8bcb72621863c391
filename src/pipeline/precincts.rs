use std::path::PathBuf;

use anyhow::Result;

use crate::{
    common::{ensure_dir_exists, file_size, require_file_exists},
    feature::FeatureCollection,
    io::{JsonStyle, read_feature_collection, write_feature_collection},
    join::{JoinIndex, JoinSpec, MergeReport, MissPolicy, OutputField, merge},
};
use super::{DataPaths, files};

/// Output schema of the merged voting layer: Measure O fields from the
/// primary file, Measure P fields from the secondary.
pub fn precinct_fields() -> Vec<OutputField> {
    vec![
        OutputField::primary("PRECINCT", "PRECINCT"),
        OutputField::primary("COUNTY", "COUNTY"),
        OutputField::primary("registered_voters", "Registered_Voters"),
        OutputField::primary("percent_yes_o", "Percent_YES"),
        OutputField::primary("percent_no_o", "Percent_NO"),
        OutputField::primary("total_votes_o", "Total_Votes"),
        OutputField::primary("yes_total_o", "YES_Total"),
        OutputField::primary("no_total_o", "NO_Total"),
        OutputField::secondary("percent_yes_p", "Percent_YES"),
        OutputField::secondary("percent_no_p", "Percent_NO"),
        OutputField::secondary("total_votes_p", "Total_Votes"),
        OutputField::secondary("yes_total_p", "YES_Total"),
        OutputField::secondary("no_total_p", "NO_Total"),
    ]
}

/// Join Measure P results onto Measure O precincts by precinct code.
/// Precincts missing from Measure P get zeros.
pub fn merge_precincts(measure_o: &FeatureCollection, measure_p: &FeatureCollection) -> (FeatureCollection, MergeReport) {
    let index = JoinIndex::from_collection(measure_p, "PRECINCT");
    let spec = JoinSpec { primary_key: "PRECINCT".into(), fields: precinct_fields(), policy: MissPolicy::ZeroFill };
    merge(measure_o, &index, &spec)
}

#[derive(Debug, Clone)]
pub struct PrecinctsReport {
    pub output: PathBuf,
    pub features: usize,
    pub merge: MergeReport,
    pub bytes: u64,
}

/// Build `precincts-voting.geojson` from the two measure files.
pub fn run_precincts(paths: &DataPaths) -> Result<PrecinctsReport> {
    let o_path = paths.source(files::MEASURE_O);
    let p_path = paths.source(files::MEASURE_P);
    require_file_exists(&o_path)?;
    require_file_exists(&p_path)?;
    ensure_dir_exists(paths.data_dir())?;

    let measure_o = read_feature_collection(&o_path)?;
    let measure_p = read_feature_collection(&p_path)?;
    tracing::info!(measure_o = measure_o.len(), measure_p = measure_p.len(), "read voting layers");

    let (merged, report) = merge_precincts(&measure_o, &measure_p);

    let output = paths.output(files::PRECINCTS);
    write_feature_collection(&merged, &output, JsonStyle::Pretty)?;
    let bytes = file_size(&output)?;
    tracing::info!(path = %output.display(), features = merged.len(), bytes, "wrote precincts");

    Ok(PrecinctsReport { output, features: merged.len(), merge: report, bytes })
}
