use ahash::AHashSet;

use crate::{common::round_half_up, feature::FeatureCollection};
use super::Priority;

/// Eligible records of a priority-sorted collection, in adoption order.
///
/// Built once per loaded layer; selecting an adopted set is then a prefix
/// of this list, so no sorting happens at interaction time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AdoptionOrder {
    keys: Vec<Option<String>>,
}

impl AdoptionOrder {
    /// Collect eligible features (finite priority under `priority`) in stored
    /// order, keyed by the identity property `key`.
    pub fn from_collection(collection: &FeatureCollection, key: &str, priority: &str) -> Self {
        let mut last = f64::NEG_INFINITY;
        let mut sorted = true;

        let keys = collection.iter()
            .filter_map(|feature| {
                let rank = Priority::from_value(feature.properties.get(priority)).value()?;
                sorted &= rank >= last;
                last = rank;
                Some(feature.properties.key(key))
            })
            .collect::<Vec<_>>();

        if !sorted {
            tracing::warn!(priority, "collection is not sorted by priority; adoption follows stored order");
        }
        let missing = keys.iter().filter(|k| k.is_none()).count();
        if missing > 0 {
            tracing::warn!(key, missing, "eligible features without an identity key");
        }

        Self { keys }
    }

    #[inline] pub fn eligible_count(&self) -> usize { self.keys.len() }

    /// `round(percent / 100 * eligible)`, clamped to the eligible count.
    pub fn target_count(&self, percent: f64) -> usize {
        if percent.is_nan() || percent <= 0.0 {
            return 0;
        }
        let target = round_half_up(percent.min(100.0) / 100.0 * self.keys.len() as f64);
        (target as usize).min(self.keys.len())
    }

    /// The first `target_count(percent)` eligible records.
    pub fn adopted(&self, percent: f64) -> AdoptedSet {
        let count = self.target_count(percent);
        let ordered: Vec<String> = self.keys[..count].iter().flatten().cloned().collect();
        let keys = ordered.iter().cloned().collect();
        AdoptedSet { keys, ordered, count }
    }
}

/// Identity keys of the features adopted at one query percent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdoptedSet {
    keys: AHashSet<String>,
    ordered: Vec<String>,
    count: usize,
}

impl AdoptedSet {
    #[inline] pub fn contains(&self, key: &str) -> bool { self.keys.contains(key) }

    /// Number of adopted records, including any without an identity key.
    #[inline] pub fn len(&self) -> usize { self.count }

    #[inline] pub fn is_empty(&self) -> bool { self.count == 0 }

    /// Keys in adoption order.
    pub fn iter(&self) -> impl Iterator<Item = &str> { self.ordered.iter().map(String::as_str) }

    pub fn is_subset(&self, other: &AdoptedSet) -> bool { self.keys.is_subset(&other.keys) }
}
