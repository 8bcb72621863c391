use std::{collections::BTreeMap, path::Path};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{feature::MISSING, io::json};
use super::{ScenarioError, interpolate};

/// Aggregate numeric statistics of one scenario point.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Metrics(BTreeMap<String, f64>);

impl Metrics {
    pub fn new() -> Self { Self::default() }

    /// Numeric members of a JSON object; every other member is ignored.
    pub fn from_object(obj: &Map<String, Value>) -> Self {
        obj.iter()
            .filter_map(|(k, v)| v.as_f64().filter(|x| x.is_finite()).map(|x| (k.clone(), x)))
            .collect()
    }

    #[inline] pub fn get(&self, name: &str) -> Option<f64> { self.0.get(name).copied() }

    #[inline] pub fn insert(&mut self, name: impl Into<String>, value: f64) { self.0.insert(name.into(), value); }

    #[inline] pub fn len(&self) -> usize { self.0.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.0.is_empty() }

    pub fn keys(&self) -> impl Iterator<Item = &str> { self.0.keys().map(String::as_str) }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> { self.0.iter().map(|(k, v)| (k.as_str(), *v)) }

    /// Display string for `name`, or the "N/A" placeholder when absent.
    pub fn display(&self, name: &str) -> String {
        self.get(name).map_or_else(|| MISSING.to_string(), |x| x.to_string())
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for Metrics {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// Where the 0% ("current") metrics of a summary live.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Baseline {
    /// No baseline in the file; every metric is 0 at 0% adoption.
    #[default]
    Zero,
    /// An entry of the scenario mapping, e.g. `aggregate_totals.current`.
    Member(String),
    /// A top-level object of the summary.
    TopLevel(String),
}

/// How one layer's summary file is laid out. Declared per layer, never
/// inferred from the file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryLayout {
    /// Top-level member holding the breakpoint-keyed mapping.
    pub scenarios_key: String,
    pub baseline: Baseline,
    /// Ascending adoption percents with precomputed statistics.
    pub breakpoints: Vec<u32>,
    /// Metrics that are interpolated without rounding to an integer.
    pub continuous: Vec<String>,
}

impl SummaryLayout {
    pub fn new(scenarios_key: impl Into<String>, breakpoints: &[u32]) -> Self {
        Self {
            scenarios_key: scenarios_key.into(),
            baseline: Baseline::Zero,
            breakpoints: breakpoints.to_vec(),
            continuous: Vec::new(),
        }
    }

    pub fn with_baseline(mut self, baseline: Baseline) -> Self {
        self.baseline = baseline;
        self
    }

    pub fn with_continuous(mut self, names: &[&str]) -> Self {
        self.continuous = names.iter().map(|s| s.to_string()).collect();
        self
    }

    /// Breakpoints must be strictly ascending within 1..=100.
    pub fn validate(&self) -> Result<(), ScenarioError> {
        if let Some(&bad) = self.breakpoints.iter().find(|&&bp| bp == 0 || bp > 100) {
            return Err(ScenarioError::BreakpointOutOfRange(bad));
        }
        match self.breakpoints.windows(2).find(|w| w[0] >= w[1]) {
            Some(w) => Err(ScenarioError::UnorderedBreakpoints { previous: w[0], next: w[1] }),
            None => Ok(()),
        }
    }
}

/// Precomputed statistics at one adoption percent.
#[derive(Debug, Clone, PartialEq)]
pub struct Breakpoint {
    pub percent: u32,
    /// `None` when the summary file lacks this breakpoint.
    pub metrics: Option<Metrics>,
}

/// A layer's scenario summary: baseline, breakpoint statistics and any other
/// top-level metadata. Loaded once and never mutated.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Summary {
    pub baseline: Metrics,
    pub breakpoints: Vec<Breakpoint>,
    pub continuous: Vec<String>,
    pub extra: Map<String, Value>,
}

impl Summary {
    /// Build from a parsed summary object. Missing members default to empty.
    pub fn from_object(mut obj: Map<String, Value>, layout: &SummaryLayout) -> Result<Self, ScenarioError> {
        layout.validate()?;

        let scenarios = match obj.remove(&layout.scenarios_key) {
            Some(Value::Object(map)) => map,
            Some(_) | None => {
                if !layout.breakpoints.is_empty() {
                    tracing::warn!(key = %layout.scenarios_key, "summary has no scenario mapping");
                }
                Map::new()
            }
        };

        let baseline = match &layout.baseline {
            Baseline::Zero => Metrics::new(),
            Baseline::Member(key) => scenarios.get(key)
                .and_then(Value::as_object)
                .map(Metrics::from_object)
                .unwrap_or_default(),
            Baseline::TopLevel(key) => obj.remove(key)
                .as_ref()
                .and_then(Value::as_object)
                .map(Metrics::from_object)
                .unwrap_or_default(),
        };

        let breakpoints = layout.breakpoints.iter()
            .map(|&percent| {
                let metrics = scenarios.get(&percent.to_string())
                    .and_then(Value::as_object)
                    .map(Metrics::from_object);
                if metrics.is_none() {
                    tracing::warn!(percent, "summary is missing a declared breakpoint");
                }
                Breakpoint { percent, metrics }
            })
            .collect();

        Ok(Self { baseline, breakpoints, continuous: layout.continuous.clone(), extra: obj })
    }

    /// Read a summary file from `path`.
    pub fn read(path: &Path, layout: &SummaryLayout) -> Result<Self> {
        let obj = json::read_json_object(path)?;
        Self::from_object(obj, layout)
            .with_context(|| format!("[scenario::summary] Invalid layout for {}", path.display()))
    }

    /// Parse a summary from JSON text.
    pub fn parse(text: &str, layout: &SummaryLayout) -> Result<Self> {
        Ok(Self::from_object(json::parse_json_object(text)?, layout)?)
    }

    /// Statistics of the breakpoint at exactly `percent`.
    pub fn breakpoint(&self, percent: u32) -> Option<&Metrics> {
        self.breakpoints.iter().find(|bp| bp.percent == percent)?.metrics.as_ref()
    }

    /// Numeric members of the top-level `totals` object, if any.
    pub fn totals(&self) -> Metrics {
        self.extra.get("totals")
            .and_then(Value::as_object)
            .map(Metrics::from_object)
            .unwrap_or_default()
    }

    /// Projected metrics at `percent` adoption. See [`interpolate`].
    pub fn projected(&self, percent: f64) -> Result<Metrics, ScenarioError> {
        interpolate(&self.baseline, &self.breakpoints, &self.continuous, percent)
    }
}
