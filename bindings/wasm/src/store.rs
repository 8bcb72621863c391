use smartgrowth_core::{AppState, LoadError, RequestId};
use wasm_bindgen::{JsValue, prelude::wasm_bindgen};

use crate::common::*;

/// Application state for the browser. The page performs the fetches; every
/// response is handed back with the request id it was issued, and responses
/// to superseded requests are ignored.
#[wasm_bindgen]
pub struct WasmStore {
    inner: AppState,
}

fn request_id(request: f64) -> RequestId {
    RequestId::from(request as u64)
}

#[wasm_bindgen]
impl WasmStore {
    /// `base_url` prefixes every data file name, defaulting to "/data/".
    #[wasm_bindgen(constructor)]
    pub fn new(base_url: Option<String>) -> WasmStore {
        let inner = base_url.map_or_else(AppState::default, AppState::new);
        WasmStore { inner }
    }

    pub fn data_url(&self, layer: &str) -> Result<String, JsValue> {
        Ok(self.inner.data_url(parse_layer(layer).map_err(js_err)?))
    }

    pub fn summary_url(&self, layer: &str) -> Result<Option<String>, JsValue> {
        Ok(self.inner.summary_url(parse_layer(layer).map_err(js_err)?))
    }

    pub fn visible_layers(&self) -> Result<JsValue, JsValue> {
        let ids: Vec<String> = self.inner.visible_layers().map(|id| id.to_string()).collect();
        to_js(&ids)
    }

    pub fn toggle(&mut self, layer: &str) -> Result<bool, JsValue> {
        Ok(self.inner.toggle(parse_layer(layer).map_err(js_err)?))
    }

    pub fn show_only(&mut self, layer: &str) -> Result<(), JsValue> {
        self.inner.show_only(parse_layer(layer).map_err(js_err)?);
        Ok(())
    }

    pub fn reset(&mut self) { self.inner.reset() }

    pub fn opacity(&self, layer: &str) -> Result<f64, JsValue> {
        Ok(self.inner.opacity(parse_layer(layer).map_err(js_err)?))
    }

    pub fn set_opacity(&mut self, layer: &str, opacity: f64) -> Result<(), JsValue> {
        self.inner.set_opacity(parse_layer(layer).map_err(js_err)?, opacity);
        Ok(())
    }

    pub fn adoption(&self, layer: &str) -> Result<Option<f64>, JsValue> {
        Ok(self.inner.adoption(parse_layer(layer).map_err(js_err)?))
    }

    /// Move a slider; returns the clamped value, or `undefined` for layers
    /// without a scenario.
    pub fn set_adoption(&mut self, layer: &str, percent: f64) -> Result<Option<f64>, JsValue> {
        Ok(self.inner.set_adoption(parse_layer(layer).map_err(js_err)?, percent))
    }

    /// Request id to fetch `data_url(layer)` under, or `undefined` if the
    /// file is cached and the layer is already ready.
    pub fn begin_features(&mut self, layer: &str) -> Result<Option<f64>, JsValue> {
        let id = parse_layer(layer).map_err(js_err)?;
        Ok(self.inner.begin_features(id).map(|r| r.get() as f64))
    }

    pub fn finish_features(&mut self, layer: &str, request: f64, text: &str) -> Result<bool, JsValue> {
        let id = parse_layer(layer).map_err(js_err)?;
        Ok(self.inner.finish_features_text(id, request_id(request), text))
    }

    pub fn begin_summary(&mut self, layer: &str) -> Result<Option<f64>, JsValue> {
        let id = parse_layer(layer).map_err(js_err)?;
        Ok(self.inner.begin_summary(id).map(|r| r.get() as f64))
    }

    pub fn finish_summary(&mut self, layer: &str, request: f64, text: &str) -> Result<bool, JsValue> {
        let id = parse_layer(layer).map_err(js_err)?;
        Ok(self.inner.finish_summary_text(id, request_id(request), text))
    }

    /// Record a failed fetch. The layer stays empty until loaded again.
    pub fn fail_load(&mut self, layer: &str, request: f64, message: &str) -> Result<bool, JsValue> {
        let id = parse_layer(layer).map_err(js_err)?;
        Ok(self.inner.fail_load(id, request_id(request), LoadError::Fetch(message.to_string())))
    }

    /// Error message of the layer's data or summary load, if either failed.
    pub fn load_error(&self, layer: &str) -> Result<Option<String>, JsValue> {
        let view = self.inner.layer(parse_layer(layer).map_err(js_err)?);
        Ok(view.data.error().or(view.summary.error()).map(|e| e.to_string()))
    }

    /// Metrics object at the layer's slider position, or `null`.
    pub fn projected_impact(&self, layer: &str) -> Result<JsValue, JsValue> {
        to_js_or_null(self.inner.projected_impact(parse_layer(layer).map_err(js_err)?))
    }

    /// Choropleth value per feature at the layer's slider position (`null`
    /// entries for features without one), or `null` for the whole layer.
    pub fn feature_values(&self, layer: &str) -> Result<JsValue, JsValue> {
        to_js_or_null(self.inner.feature_values(parse_layer(layer).map_err(js_err)?))
    }

    pub fn adopted_parcels(&self, layer: &str) -> Result<Option<f64>, JsValue> {
        Ok(self.inner.adopted_parcels(parse_layer(layer).map_err(js_err)?))
    }

    /// Numeric `totals` of the layer's loaded summary, or `null`.
    pub fn summary_totals(&self, layer: &str) -> Result<JsValue, JsValue> {
        let summary = self.inner.summary(parse_layer(layer).map_err(js_err)?);
        to_js_or_null(summary.map(|s| s.totals()))
    }

    /// Adopted identity keys at the layer's slider position, or `null`.
    pub fn adopted_keys(&self, layer: &str) -> Result<JsValue, JsValue> {
        let adopted = self.inner.adopted(parse_layer(layer).map_err(js_err)?);
        Ok(adopted.map_or(JsValue::NULL, |set| string_array(set.iter()).into()))
    }
}
