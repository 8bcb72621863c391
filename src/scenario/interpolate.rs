use std::collections::BTreeSet;

use crate::common::round_half_up;
use super::{Breakpoint, Metrics, ScenarioError};

/// The pair of anchors a query percent falls between. `lower == 0` stands for
/// the baseline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bracket {
    pub lower: u32,
    pub upper: u32,
    pub t: f64,
}

/// Locate `percent` within ascending `breakpoints`.
///
/// Returns `None` when the query resolves to the baseline: non-positive or
/// NaN queries, and layers with no breakpoints. A query below the first
/// breakpoint is anchored on the baseline (0%); a query above the last is
/// clamped to it.
pub fn bracket(breakpoints: &[u32], percent: f64) -> Option<Bracket> {
    if percent.is_nan() || percent <= 0.0 {
        return None;
    }
    let last = *breakpoints.last()?;

    let (lower, upper) = match breakpoints.iter().position(|&bp| percent <= bp as f64) {
        Some(0) => (0, breakpoints[0]),
        Some(i) => (breakpoints[i - 1], breakpoints[i]),
        None => (last, last),
    };

    let t = if upper == lower { 1.0 } else { (percent - lower as f64) / (upper - lower) as f64 };
    Some(Bracket { lower, upper, t })
}

/// Projected metrics at `percent` adoption, linearly interpolated between
/// the two surrounding anchors.
///
/// Every metric named by either anchor is produced; a metric absent from an
/// anchor takes the baseline value there, else 0. Results are rounded to the
/// nearest integer unless the metric is listed in `continuous`. A query on a
/// breakpoint (or clamped to the last one) takes that breakpoint's values and
/// does not need the anchor below it. Pure: repeated calls agree.
pub fn interpolate(
    baseline: &Metrics,
    breakpoints: &[Breakpoint],
    continuous: &[String],
    percent: f64,
) -> Result<Metrics, ScenarioError> {
    let percents: Vec<u32> = breakpoints.iter().map(|bp| bp.percent).collect();
    let finish = |name: &str, value: f64| {
        if continuous.iter().any(|c| c == name) { value } else { round_half_up(value) }
    };

    let Some(Bracket { lower, upper, t }) = bracket(&percents, percent) else {
        return Ok(baseline_metrics(baseline, breakpoints).iter()
            .map(|(name, value)| (name, finish(name, value)))
            .collect());
    };

    let anchor = |at: u32| -> Result<&Metrics, ScenarioError> {
        if at == 0 {
            return Ok(baseline);
        }
        breakpoints.iter()
            .find(|bp| bp.percent == at)
            .and_then(|bp| bp.metrics.as_ref())
            .ok_or(ScenarioError::MissingBreakpoint(at))
    };

    let hi = anchor(upper)?;
    let lo = match anchor(lower) {
        Ok(lo) => Some(lo),
        Err(_) if t >= 1.0 => None,
        Err(e) => return Err(e),
    };

    let names: BTreeSet<&str> = lo.into_iter().flat_map(Metrics::keys).chain(hi.keys()).collect();
    let value_at = |m: &Metrics, name: &str| m.get(name).or_else(|| baseline.get(name)).unwrap_or(0.0);

    Ok(names.into_iter()
        .map(|name| {
            let b = value_at(hi, name);
            let value = match lo {
                Some(lo) if t < 1.0 => {
                    let a = value_at(lo, name);
                    a + t * (b - a)
                }
                _ => b,
            };
            (name, finish(name, value))
        })
        .collect())
}

/// Baseline values for every metric any breakpoint names; 0 where the
/// baseline is silent.
fn baseline_metrics(baseline: &Metrics, breakpoints: &[Breakpoint]) -> Metrics {
    let mut out = baseline.clone();
    for name in breakpoints.iter().filter_map(|bp| bp.metrics.as_ref()).flat_map(Metrics::keys) {
        if out.get(name).is_none() {
            out.insert(name, 0.0);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics(pairs: &[(&str, f64)]) -> Metrics {
        pairs.iter().map(|&(k, v)| (k, v)).collect()
    }

    fn upzone() -> Vec<Breakpoint> {
        [10, 25, 50, 75, 100].into_iter()
            .map(|p| Breakpoint {
                percent: p,
                metrics: Some(metrics(&[
                    ("new_units", p as f64 * 10.0),
                    ("parcels", p as f64 * 3.0),
                    ("tax_increase_annual", p as f64 * 1.25),
                ])),
            })
            .collect()
    }

    #[test]
    fn bracket_anchors() {
        let bps = [10, 25, 50, 75, 100];
        assert_eq!(bracket(&bps, 0.0), None);
        assert_eq!(bracket(&bps, -3.0), None);
        assert_eq!(bracket(&bps, f64::NAN), None);
        assert_eq!(bracket(&bps, 5.0), Some(Bracket { lower: 0, upper: 10, t: 0.5 }));
        assert_eq!(bracket(&bps, 10.0), Some(Bracket { lower: 0, upper: 10, t: 1.0 }));
        assert_eq!(bracket(&bps, 30.0), Some(Bracket { lower: 25, upper: 50, t: 0.2 }));
        assert_eq!(bracket(&bps, 140.0), Some(Bracket { lower: 100, upper: 100, t: 1.0 }));
        assert_eq!(bracket(&[], 50.0), None);
    }

    #[test]
    fn midpoint_from_baseline() {
        let bps = vec![Breakpoint { percent: 10, metrics: Some(metrics(&[("new_units", 100.0)])) }];
        let out = interpolate(&Metrics::new(), &bps, &[], 5.0).unwrap();
        assert_eq!(out.get("new_units"), Some(50.0));
    }

    #[test]
    fn exact_breakpoint_matches_record() {
        let bps = upzone();
        let out = interpolate(&Metrics::new(), &bps, &[], 25.0).unwrap();
        assert_eq!(out.get("new_units"), Some(250.0));
        assert_eq!(out.get("parcels"), Some(75.0));

        let bps = vec![Breakpoint { percent: 10, metrics: Some(metrics(&[("new_units", 407.5)])) }];
        let continuous = vec!["tax_increase_annual".to_string()];
        assert_eq!(interpolate(&Metrics::new(), &bps, &continuous, 10.0).unwrap().get("new_units"), Some(408.0));
        assert_eq!(interpolate(&Metrics::new(), &bps, &continuous, 100.0).unwrap().get("new_units"), Some(408.0));

        let continuous = vec!["new_units".to_string()];
        assert_eq!(interpolate(&Metrics::new(), &bps, &continuous, 10.0).unwrap().get("new_units"), Some(407.5));
    }

    #[test]
    fn breakpoint_fills_gaps_like_neighbours() {
        let baseline = metrics(&[("total_businesses_viable", 120.0)]);
        let bps = vec![
            Breakpoint { percent: 50, metrics: Some(metrics(&[("new_residents", 800.0), ("total_businesses_viable", 141.0)])) },
            Breakpoint { percent: 75, metrics: Some(metrics(&[("new_residents", 1200.0)])) },
            Breakpoint { percent: 100, metrics: Some(metrics(&[("new_residents", 1600.0), ("total_businesses_viable", 160.0)])) },
        ];
        let at = interpolate(&baseline, &bps, &[], 75.0).unwrap();
        assert_eq!(at.get("total_businesses_viable"), Some(120.0));
        assert_eq!(at.get("new_residents"), Some(1200.0));
        for near in [74.99, 75.01] {
            let out = interpolate(&baseline, &bps, &[], near).unwrap();
            assert_eq!(out.get("total_businesses_viable"), Some(120.0));
            assert_eq!(out.get("new_residents"), Some(1200.0));
        }
    }

    #[test]
    fn zero_returns_baseline() {
        let out = interpolate(&Metrics::new(), &upzone(), &[], 0.0).unwrap();
        assert_eq!(out.get("new_units"), Some(0.0));
        assert_eq!(out.get("parcels"), Some(0.0));
        assert_eq!(out.len(), 3);
    }

    #[test]
    fn rounds_unless_continuous() {
        let continuous = vec!["tax_increase_annual".to_string()];
        // 30% sits 20% of the way from 25 to 50
        let out = interpolate(&Metrics::new(), &upzone(), &continuous, 30.0).unwrap();
        assert_eq!(out.get("new_units"), Some(300.0));
        assert_eq!(out.get("parcels"), Some(90.0));
        assert!((out.get("tax_increase_annual").unwrap() - 37.5).abs() < 1e-9);

        let out = interpolate(&Metrics::new(), &upzone(), &[], 30.0).unwrap();
        assert_eq!(out.get("tax_increase_annual"), Some(38.0));
    }

    #[test]
    fn clamps_above_last() {
        let bps = upzone();
        let top = interpolate(&Metrics::new(), &bps, &[], 100.0).unwrap();
        assert_eq!(interpolate(&Metrics::new(), &bps, &[], 250.0).unwrap(), top);
    }

    #[test]
    fn continuous_across_breakpoints() {
        let bps = upzone();
        let at = interpolate(&Metrics::new(), &bps, &[], 50.0).unwrap().get("new_units").unwrap();
        let below = interpolate(&Metrics::new(), &bps, &[], 49.99).unwrap().get("new_units").unwrap();
        let above = interpolate(&Metrics::new(), &bps, &[], 50.01).unwrap().get("new_units").unwrap();
        assert!((at - below).abs() <= 1.0 && (above - at).abs() <= 1.0);
    }

    #[test]
    fn idempotent() {
        let bps = upzone();
        let a = interpolate(&Metrics::new(), &bps, &[], 62.5).unwrap();
        let b = interpolate(&Metrics::new(), &bps, &[], 62.5).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn missing_fields_use_baseline() {
        let baseline = metrics(&[("total_businesses_viable", 120.0)]);
        let bps = vec![
            Breakpoint { percent: 25, metrics: Some(metrics(&[("new_residents", 400.0)])) },
            Breakpoint { percent: 50, metrics: Some(metrics(&[("new_residents", 800.0), ("total_businesses_viable", 140.0)])) },
        ];
        let out = interpolate(&baseline, &bps, &[], 37.5).unwrap();
        assert_eq!(out.get("new_residents"), Some(600.0));
        assert_eq!(out.get("total_businesses_viable"), Some(130.0));
    }

    #[test]
    fn missing_breakpoint_is_local() {
        let mut bps = upzone();
        bps[2].metrics = None;
        assert_eq!(interpolate(&Metrics::new(), &bps, &[], 40.0), Err(ScenarioError::MissingBreakpoint(50)));
        assert_eq!(interpolate(&Metrics::new(), &bps, &[], 60.0), Err(ScenarioError::MissingBreakpoint(50)));
        assert!(interpolate(&Metrics::new(), &bps, &[], 20.0).is_ok());
        assert!(interpolate(&Metrics::new(), &bps, &[], 90.0).is_ok());
        assert!(interpolate(&Metrics::new(), &bps, &[], 75.0).is_ok());
    }
}
