use smartgrowth_core::{
    AdoptionOrder, FeatureRule, LayerId, SiteViability, Summary, adopted_parcels, parse_feature_collection,
    scaled_units,
};
use wasm_bindgen::{JsValue, prelude::wasm_bindgen};

use crate::common::*;

/// One scenario layer's loaded data, queried directly with a slider value.
#[wasm_bindgen]
pub struct WasmScenarioLayer {
    id: LayerId,
    summary: Summary,
    order: Option<AdoptionOrder>,
    sites: Option<SiteViability>,
}

#[wasm_bindgen]
impl WasmScenarioLayer {
    /// Build from a layer id, its summary JSON text and, for layers with
    /// per-feature adoption, its GeoJSON text.
    #[wasm_bindgen(constructor)]
    pub fn new(layer: &str, summary: &str, geojson: Option<String>) -> Result<WasmScenarioLayer, JsValue> {
        let id = parse_layer(layer).map_err(js_err)?;
        let config = id.scenario()
            .ok_or_else(|| js_err(format!("Layer {id} has no adoption scenario")))?;
        let summary = Summary::parse(summary, &config.layout).map_err(js_err)?;

        let order = match (geojson, config.identity, config.priority) {
            (Some(text), Some(key), Some(priority)) => {
                let features = parse_feature_collection(&text).map_err(js_err)?;
                Some(AdoptionOrder::from_collection(&features, key, priority))
            }
            _ => None,
        };
        let sites = match id.feature_rule() {
            Some(FeatureRule::SiteViability { .. }) => Some(SiteViability::from_summary(&summary)),
            _ => None,
        };
        Ok(WasmScenarioLayer { id, summary, order, sites })
    }

    pub fn layer(&self) -> String { self.id.to_string() }

    /// Interpolated metrics object at `percent`, or `null` when a needed
    /// breakpoint is missing.
    pub fn projected_impact(&self, percent: f64) -> Result<JsValue, JsValue> {
        to_js_or_null(self.summary.projected(percent).ok())
    }

    /// Identity keys of the features adopted at `percent`.
    pub fn adopted_keys(&self, percent: f64) -> js_sys::Array {
        match &self.order {
            Some(order) => string_array(order.adopted(percent).iter()),
            None => js_sys::Array::new(),
        }
    }

    /// Viable businesses at `site` for `percent`, or `current` when the
    /// layer has no per-site table or the site is unknown.
    pub fn viable_count(&self, site: &str, current: f64, percent: f64) -> f64 {
        self.sites.as_ref().map_or(current, |sites| sites.viable_count(site, current, percent))
    }

    /// A feature's potential units scaled to `percent`.
    pub fn feature_units(&self, potential: f64, percent: f64) -> f64 {
        scaled_units(potential, percent)
    }

    pub fn adopted_parcels(&self, percent: f64) -> f64 {
        adopted_parcels(&self.summary.totals(), percent)
    }

    pub fn eligible_count(&self) -> usize {
        self.order.as_ref().map_or(0, AdoptionOrder::eligible_count)
    }
}
