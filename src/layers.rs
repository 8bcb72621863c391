//! Catalogue of the map's layers and the scenario configuration of those
//! with an adoption slider.

use std::{fmt, str::FromStr};

use anyhow::bail;

use crate::scenario::{Baseline, SummaryLayout};

pub const UPZONE_BREAKPOINTS: [u32; 5] = [10, 25, 50, 75, 100];
pub const VIABILITY_BREAKPOINTS: [u32; 4] = [25, 50, 75, 100];
pub const RETROFIT_BREAKPOINTS: [u32; 4] = [10, 25, 50, 100];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LayerId {
    PrecinctsMeasureO,
    PrecinctsMeasureP,
    OpportunitySites,
    CouncilDistricts,
    Parks,
    UpzoneScenario,
    CommercialViability,
    VacantInfill,
    CommercialRetrofit,
    ParkingRetrofit,
    UnderUtilization,
    FireRiskIndex,
}

impl LayerId {
    pub const ALL: [LayerId; 12] = [
        LayerId::PrecinctsMeasureO,
        LayerId::PrecinctsMeasureP,
        LayerId::OpportunitySites,
        LayerId::CouncilDistricts,
        LayerId::Parks,
        LayerId::UpzoneScenario,
        LayerId::CommercialViability,
        LayerId::VacantInfill,
        LayerId::CommercialRetrofit,
        LayerId::ParkingRetrofit,
        LayerId::UnderUtilization,
        LayerId::FireRiskIndex,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LayerId::PrecinctsMeasureO => "precincts-measure-o",
            LayerId::PrecinctsMeasureP => "precincts-measure-p",
            LayerId::OpportunitySites => "opportunity-sites",
            LayerId::CouncilDistricts => "council-districts",
            LayerId::Parks => "parks",
            LayerId::UpzoneScenario => "upzone-scenario",
            LayerId::CommercialViability => "commercial-viability",
            LayerId::VacantInfill => "vacant-infill",
            LayerId::CommercialRetrofit => "commercial-retrofit",
            LayerId::ParkingRetrofit => "parking-retrofit",
            LayerId::UnderUtilization => "under-utilization",
            LayerId::FireRiskIndex => "fire-risk-index",
        }
    }

    /// Feature file under the published data directory. Both precinct layers
    /// share one file.
    pub fn data_file(&self) -> String {
        match self {
            LayerId::PrecinctsMeasureO | LayerId::PrecinctsMeasureP => "precincts-voting.geojson".into(),
            other => format!("{}.geojson", other.as_str()),
        }
    }

    /// Summary statistics file, for layers that have one.
    pub fn summary_file(&self) -> Option<String> {
        match self {
            LayerId::UpzoneScenario
            | LayerId::CommercialViability
            | LayerId::VacantInfill
            | LayerId::CommercialRetrofit
            | LayerId::ParkingRetrofit
            | LayerId::UnderUtilization
            | LayerId::FireRiskIndex => Some(format!("{}-summary.json", self.as_str())),
            _ => None,
        }
    }

    #[inline] pub fn default_visible(&self) -> bool { *self == LayerId::PrecinctsMeasureO }

    /// Adoption-slider configuration, or `None` for static layers.
    pub fn scenario(&self) -> Option<ScenarioConfig> {
        let config = match self {
            LayerId::UpzoneScenario => ScenarioConfig {
                identity: Some("APN"),
                priority: Some("adoption_priority"),
                default_adoption: 25.0,
                layout: SummaryLayout::new("adoption_scenarios", &UPZONE_BREAKPOINTS)
                    .with_continuous(&["tax_increase_annual", "avg_sg_change", "acres"]),
            },
            LayerId::CommercialViability => ScenarioConfig {
                identity: Some("site_name"),
                priority: None,
                default_adoption: 100.0,
                layout: SummaryLayout::new("aggregate_totals", &VIABILITY_BREAKPOINTS)
                    .with_baseline(Baseline::Member("current".into())),
            },
            LayerId::VacantInfill | LayerId::CommercialRetrofit => ScenarioConfig {
                identity: None,
                priority: None,
                default_adoption: 100.0,
                layout: SummaryLayout::new("adoption_scenarios", &RETROFIT_BREAKPOINTS),
            },
            _ => return None,
        };
        Some(config)
    }

    /// Layout used to read the layer's summary file. Layers without a slider
    /// keep the whole file as metadata.
    pub fn summary_layout(&self) -> Option<SummaryLayout> {
        self.summary_file()?;
        Some(match self.scenario() {
            Some(config) => config.layout,
            None => SummaryLayout::new("adoption_scenarios", &[]),
        })
    }

    /// How each feature's choropleth value follows the layer's slider.
    pub fn feature_rule(&self) -> Option<FeatureRule> {
        match self {
            LayerId::VacantInfill | LayerId::CommercialRetrofit | LayerId::ParkingRetrofit => {
                Some(FeatureRule::ScaledUnits { potential: "pot_units" })
            }
            LayerId::CommercialViability => {
                Some(FeatureRule::SiteViability { site: "site_name", current: "cur_biz_cnt" })
            }
            _ => None,
        }
    }
}

impl fmt::Display for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LayerId {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match LayerId::ALL.iter().find(|id| id.as_str() == s) {
            Some(id) => Ok(*id),
            None => bail!("[layers] Unknown layer id: {s}"),
        }
    }
}

/// How a scenario layer's slider maps onto its data.
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioConfig {
    /// Identity property of the layer's features.
    pub identity: Option<&'static str>,
    /// Property holding the adoption priority, for layers with per-feature adoption.
    pub priority: Option<&'static str>,
    pub default_adoption: f64,
    pub layout: SummaryLayout,
}

/// Per-feature value the map colors by, as a function of adoption.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeatureRule {
    /// Potential units scaled by the adoption percent. Layers without a
    /// slider show the full potential.
    ScaledUnits { potential: &'static str },
    /// Viable business count of the site at the nearest breakpoint at or
    /// above the slider, from the summary's per-site table.
    SiteViability { site: &'static str, current: &'static str },
}
