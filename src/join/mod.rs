//! Merging keyed record sets into feature collections.
//!
//! A primary [`FeatureCollection`](crate::FeatureCollection) is joined against a
//! [`JoinIndex`] built from either a second collection or a delimited-text
//! table. The output schema is declared as a list of [`OutputField`]s, and a
//! [`MissPolicy`] decides what unmatched rows receive.

mod coerce;
mod index;
mod merge;

pub use coerce::{ColumnType, CsvSchema};
pub use index::JoinIndex;
pub use merge::{Fallback, FieldSource, JoinSpec, MergeReport, MissPolicy, OutputField, merge, project};
