//! Adoption scenarios: priority ordering, precomputed breakpoint summaries,
//! interpolation between breakpoints, adopted-set selection and per-feature
//! slider values.

mod coloring;
mod error;
mod interpolate;
mod priority;
mod select;
mod summary;

pub use coloring::{SiteViability, adopted_parcels, breakpoint_at_or_above, scaled_units};
pub use error::ScenarioError;
pub use interpolate::{Bracket, bracket, interpolate};
pub use priority::{Priority, ScoringFields, SuitabilityScores, TIER_SPACING, adoption_priority, score_features, sort_by_priority};
pub use select::{AdoptedSet, AdoptionOrder};
pub use summary::{Baseline, Breakpoint, Metrics, Summary, SummaryLayout};
