use std::cmp::Ordering;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::feature::{FeatureCollection, FieldValue, Properties};

/// Gap between consecutive tiers; larger than the widest possible sub-score
/// spread (0..=100) so tiers never interleave.
pub const TIER_SPACING: f64 = 1000.0;

/// Adoption order key of one record. Lower ranks are adopted sooner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Priority {
    Rank(f64),
    /// Never adopted; sorts after every rank and serializes as `null`.
    Ineligible,
}

impl Priority {
    #[inline] pub fn is_eligible(&self) -> bool { matches!(self, Priority::Rank(_)) }

    #[inline]
    pub fn value(&self) -> Option<f64> {
        match self {
            Priority::Rank(x) => Some(*x),
            Priority::Ineligible => None,
        }
    }

    /// Read a stored priority; anything but a finite number is ineligible.
    pub fn from_value(value: Option<&FieldValue>) -> Self {
        value.and_then(FieldValue::as_f64).map_or(Priority::Ineligible, Priority::Rank)
    }

    pub fn to_value(&self) -> FieldValue {
        self.value().map_or(FieldValue::Null, FieldValue::from_f64)
    }

    /// Total order: ranks ascending, then ineligible.
    pub fn total_cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Priority::Rank(a), Priority::Rank(b)) => a.total_cmp(b),
            (Priority::Rank(_), Priority::Ineligible) => Ordering::Less,
            (Priority::Ineligible, Priority::Rank(_)) => Ordering::Greater,
            (Priority::Ineligible, Priority::Ineligible) => Ordering::Equal,
        }
    }
}

impl Serialize for Priority {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Priority {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = FieldValue::deserialize(deserializer)?;
        Ok(Priority::from_value(Some(&value)))
    }
}

/// The four 0–100 suitability sub-scores that are averaged.
///
/// Zoning suitability is not part of the average.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SuitabilityScores {
    pub fiscal: f64,
    pub utilization: f64,
    pub infrastructure: f64,
    pub location: f64,
}

impl SuitabilityScores {
    pub fn average(&self) -> f64 {
        (self.fiscal + self.utilization + self.infrastructure + self.location) / 4.0
    }
}

/// `tier * 1000 - average(scores)` for eligible records, otherwise ineligible.
///
/// Tier bounds are not checked here; a zero or missing tier must already have
/// been mapped to `eligible = false`.
pub fn adoption_priority(eligible: bool, tier: u32, scores: &SuitabilityScores) -> Priority {
    if !eligible {
        return Priority::Ineligible;
    }
    Priority::Rank(tier as f64 * TIER_SPACING - scores.average())
}

/// Property names a layer uses for eligibility, tier and sub-scores.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoringFields {
    pub eligible: String,
    pub tier: String,
    pub fiscal: String,
    pub utilization: String,
    pub infrastructure: String,
    pub location: String,
}

impl Default for ScoringFields {
    fn default() -> Self {
        Self {
            eligible: "upzone_elig".into(),
            tier: "upzone_tier".into(),
            fiscal: "sc_fiscal".into(),
            utilization: "sc_util".into(),
            infrastructure: "sc_infra".into(),
            location: "sc_loc".into(),
        }
    }
}

impl ScoringFields {
    /// Score one property bag. Non-numeric sub-scores count as 0, and a tier
    /// that is not a positive integer makes the record ineligible.
    pub fn score(&self, props: &Properties) -> Priority {
        let tier = props.number(&self.tier)
            .filter(|t| *t >= 1.0 && t.fract() == 0.0 && *t <= u32::MAX as f64)
            .map(|t| t as u32);
        let eligible = props.flag(&self.eligible) && tier.is_some();

        let sub_score = |name: &str| match props.number(name) {
            Some(x) => x,
            None => {
                if eligible {
                    tracing::warn!(property = name, value = %props.display(name), "non-numeric sub-score counted as 0");
                }
                0.0
            }
        };
        let scores = SuitabilityScores {
            fiscal: sub_score(self.fiscal.as_str()),
            utilization: sub_score(self.utilization.as_str()),
            infrastructure: sub_score(self.infrastructure.as_str()),
            location: sub_score(self.location.as_str()),
        };

        adoption_priority(eligible, tier.unwrap_or(0), &scores)
    }
}

/// Score every feature and store the result under `output`.
pub fn score_features(collection: &mut FeatureCollection, fields: &ScoringFields, output: &str) {
    for feature in &mut collection.features {
        let priority = fields.score(&feature.properties);
        feature.properties.insert(output, priority.to_value());
    }
}

/// Stable ascending sort by the priority stored under `priority`; ties are
/// broken by the identity property `key` so the order never depends on input order.
pub fn sort_by_priority(collection: &mut FeatureCollection, priority: &str, key: &str) {
    collection.sort_by(|a, b| {
        Priority::from_value(a.properties.get(priority))
            .total_cmp(&Priority::from_value(b.properties.get(priority)))
            .then_with(|| a.properties.key(key).cmp(&b.properties.key(key)))
    });
}
