#![doc = "Smart-growth map data: preparation pipeline and adoption-scenario engine"]
mod common;
mod feature;
mod geom;
mod io;
mod join;
mod layers;
mod pipeline;
mod scenario;
mod store;

#[doc(inline)]
pub use common::round_half_up;

#[doc(inline)]
pub use feature::{Feature, FeatureCollection, FieldValue, MISSING, Properties};

#[doc(inline)]
pub use geom::{COORD_PRECISION, Coords, Geometry, round_coordinates};

#[doc(inline)]
pub use io::{FormatError, JsonStyle, TextTable, parse_feature_collection, read_feature_collection, write_feature_collection};

#[doc(inline)]
pub use join::{ColumnType, CsvSchema, Fallback, FieldSource, JoinIndex, JoinSpec, MergeReport, MissPolicy, OutputField, merge, project};

#[doc(inline)]
pub use layers::{FeatureRule, LayerId, ScenarioConfig};

#[doc(inline)]
pub use scenario::{
    AdoptedSet, AdoptionOrder, Baseline, Bracket, Breakpoint, Metrics, Priority, ScenarioError, ScoringFields,
    SiteViability, Summary, SummaryLayout, SuitabilityScores, TIER_SPACING, adopted_parcels, adoption_priority,
    breakpoint_at_or_above, bracket, interpolate, scaled_units, score_features, sort_by_priority,
};

#[doc(inline)]
pub use store::{AppState, FetchCache, LayerData, LayerSlot, LayerView, LoadError, LoadState, RequestId};

/// Offline data preparation jobs.
pub mod jobs {
    pub use crate::pipeline::*;
}

/// Read a delimited-text file with every column kept as text.
pub fn read_csv_table(path: &std::path::Path) -> anyhow::Result<TextTable> {
    io::csv::read_csv_text(path)
}

/// Parse delimited text with every column kept as text.
pub fn parse_csv_table(text: &str) -> anyhow::Result<TextTable> {
    io::csv::read_csv_text_string(text)
}
