//! Per-feature values that follow an adoption slider.

use std::collections::BTreeMap;

use ahash::AHashMap;
use serde_json::Value;

use crate::common::round_half_up;
use super::{Metrics, Summary};

/// Slider percent clamped to `0..=100`; NaN counts as no adoption.
fn clamp_percent(percent: f64) -> f64 {
    if percent.is_nan() { 0.0 } else { percent.clamp(0.0, 100.0) }
}

/// `round(potential * percent / 100)`.
pub fn scaled_units(potential: f64, percent: f64) -> f64 {
    round_half_up(potential * clamp_percent(percent) / 100.0)
}

/// Parcels developed at `percent`: the summary's `buildable_parcels` total,
/// or else `underutilized_parcels`, scaled like [`scaled_units`]. 0 when
/// the totals carry neither.
pub fn adopted_parcels(totals: &Metrics, percent: f64) -> f64 {
    totals.get("buildable_parcels")
        .or_else(|| totals.get("underutilized_parcels"))
        .map_or(0.0, |parcels| scaled_units(parcels, percent))
}

/// First breakpoint at or above `percent`, else the last one.
pub fn breakpoint_at_or_above(breakpoints: &[u32], percent: f64) -> Option<u32> {
    breakpoints.iter()
        .copied()
        .find(|&bp| percent <= bp as f64)
        .or_else(|| breakpoints.last().copied())
}

/// Per-site viable business counts at each breakpoint, read from a summary's
/// `opportunity_sites` table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SiteViability {
    breakpoints: Vec<u32>,
    sites: AHashMap<String, BTreeMap<u32, f64>>,
}

impl SiteViability {
    pub fn from_summary(summary: &Summary) -> Self {
        let breakpoints: Vec<u32> = summary.breakpoints.iter().map(|bp| bp.percent).collect();
        let rows = summary.extra.get("opportunity_sites").and_then(Value::as_array);

        let sites = rows.into_iter()
            .flatten()
            .filter_map(|site| {
                let name = site.get("name")?.as_str()?;
                let scenarios = site.get("adoption_scenarios").and_then(Value::as_object);
                let counts = breakpoints.iter()
                    .filter_map(|&bp| {
                        let count = scenarios?.get(&bp.to_string())?.get("businesses_viable_count")?.as_f64()?;
                        Some((bp, count))
                    })
                    .collect();
                Some((name.to_string(), counts))
            })
            .collect::<AHashMap<_, _>>();

        if rows.is_none() {
            tracing::debug!("summary has no per-site table");
        }
        Self { breakpoints, sites }
    }

    #[inline] pub fn len(&self) -> usize { self.sites.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.sites.is_empty() }

    /// Viable businesses at `site` for `percent` adoption. Falls back to
    /// `current` at 0%, for unknown sites, and where the breakpoint has no
    /// count.
    pub fn viable_count(&self, site: &str, current: f64, percent: f64) -> f64 {
        if percent.is_nan() || percent <= 0.0 {
            return current;
        }
        let Some(counts) = self.sites.get(site) else { return current };
        breakpoint_at_or_above(&self.breakpoints, percent)
            .and_then(|bp| counts.get(&bp).copied())
            .unwrap_or(current)
    }
}
