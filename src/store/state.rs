use std::{collections::BTreeMap, sync::Arc};

use crate::{
    feature::FeatureCollection,
    io::parse_feature_collection,
    layers::{FeatureRule, LayerId},
    scenario::{AdoptedSet, AdoptionOrder, Metrics, SiteViability, Summary, adopted_parcels, scaled_units},
};
use super::{FetchCache, LayerSlot, LoadError, RequestId};

/// A layer's loaded features plus, for priority-ordered layers, the adoption
/// order derived from them at load time.
#[derive(Debug, Clone)]
pub struct LayerData {
    pub features: Arc<FeatureCollection>,
    pub order: Option<AdoptionOrder>,
}

impl LayerData {
    fn new(id: LayerId, features: Arc<FeatureCollection>) -> Self {
        let order = id.scenario()
            .and_then(|config| Some((config.identity?, config.priority?)))
            .map(|(key, priority)| AdoptionOrder::from_collection(&features, key, priority));
        Self { features, order }
    }
}

/// Display settings and load status of one layer.
#[derive(Debug, Clone)]
pub struct LayerView {
    pub visible: bool,
    pub opacity: f64,
    /// Slider position, for layers with a scenario.
    pub adoption: Option<f64>,
    pub data: LayerSlot<LayerData>,
    pub summary: LayerSlot<Summary>,
}

impl LayerView {
    fn new(id: LayerId) -> Self {
        Self {
            visible: id.default_visible(),
            opacity: 1.0,
            adoption: id.scenario().map(|config| config.default_adoption),
            data: LayerSlot::new(),
            summary: LayerSlot::new(),
        }
    }
}

/// Whole-application state, passed explicitly to whatever needs it.
///
/// Interpolation and selection stay pure: [`projected_impact`](AppState::projected_impact)
/// and [`adopted`](AppState::adopted) read the slider and loaded data here and
/// hand them to the scenario functions as arguments.
#[derive(Debug, Clone)]
pub struct AppState {
    base_url: String,
    layers: BTreeMap<LayerId, LayerView>,
    features: FetchCache<FeatureCollection>,
    summaries: FetchCache<Summary>,
    requests: u64,
}

impl Default for AppState {
    fn default() -> Self { Self::new("/data/") }
}

impl AppState {
    /// Fresh state; resource URLs are `base_url` followed by the file name.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            layers: LayerId::ALL.iter().map(|&id| (id, LayerView::new(id))).collect(),
            features: FetchCache::new(),
            summaries: FetchCache::new(),
            requests: 0,
        }
    }

    /// Request ids are unique across every slot, so a response can only ever
    /// match the slot that issued it.
    fn next_request(&mut self) -> RequestId {
        self.requests += 1;
        RequestId::from(self.requests)
    }

    fn view(&self, id: LayerId) -> &LayerView {
        &self.layers[&id]
    }

    fn view_mut(&mut self, id: LayerId) -> &mut LayerView {
        self.layers.entry(id).or_insert_with(|| LayerView::new(id))
    }

    pub fn layer(&self, id: LayerId) -> &LayerView { self.view(id) }

    pub fn data_url(&self, id: LayerId) -> String { format!("{}{}", self.base_url, id.data_file()) }

    pub fn summary_url(&self, id: LayerId) -> Option<String> {
        id.summary_file().map(|file| format!("{}{file}", self.base_url))
    }

    #[inline] pub fn is_visible(&self, id: LayerId) -> bool { self.view(id).visible }

    pub fn visible_layers(&self) -> impl Iterator<Item = LayerId> + '_ {
        self.layers.iter().filter(|(_, view)| view.visible).map(|(id, _)| *id)
    }

    pub fn toggle(&mut self, id: LayerId) -> bool {
        let view = self.view_mut(id);
        view.visible = !view.visible;
        view.visible
    }

    pub fn show_only(&mut self, id: LayerId) {
        for (other, view) in &mut self.layers {
            view.visible = *other == id;
        }
    }

    #[inline] pub fn opacity(&self, id: LayerId) -> f64 { self.view(id).opacity }

    /// Set opacity, clamped to `0..=1`. NaN is ignored.
    pub fn set_opacity(&mut self, id: LayerId, opacity: f64) {
        if !opacity.is_nan() {
            self.view_mut(id).opacity = opacity.clamp(0.0, 1.0);
        }
    }

    /// Restore default visibility and full opacity. Sliders and loaded data are kept.
    pub fn reset(&mut self) {
        for (id, view) in &mut self.layers {
            view.visible = id.default_visible();
            view.opacity = 1.0;
        }
    }

    #[inline] pub fn adoption(&self, id: LayerId) -> Option<f64> { self.view(id).adoption }

    /// Move a scenario slider, clamped to `0..=100`. Returns the applied value,
    /// or `None` for layers without a scenario or a NaN input.
    pub fn set_adoption(&mut self, id: LayerId, percent: f64) -> Option<f64> {
        if percent.is_nan() {
            return None;
        }
        let slot = self.view_mut(id).adoption.as_mut()?;
        *slot = percent.clamp(0.0, 100.0);
        Some(*slot)
    }

    /// Start loading a layer's features. Returns `None` when the file is
    /// already cached and the layer is ready.
    pub fn begin_features(&mut self, id: LayerId) -> Option<RequestId> {
        if let Some(cached) = self.features.get(&self.data_url(id)) {
            let data = LayerData::new(id, cached);
            self.view_mut(id).data.set_ready(Arc::new(data));
            return None;
        }
        let request = self.next_request();
        self.view_mut(id).data.begin_with(request);
        Some(request)
    }

    /// Apply a finished feature request. Stale requests are ignored.
    pub fn finish_features(&mut self, id: LayerId, request: RequestId, result: Result<FeatureCollection, LoadError>) -> bool {
        if !self.view(id).data.is_current(request) {
            tracing::debug!(layer = %id, "ignoring superseded feature response");
            return false;
        }
        match result {
            Ok(collection) => {
                tracing::debug!(layer = %id, features = collection.len(), "features loaded");
                let url = self.data_url(id);
                let shared = self.features.insert(url, collection);
                let data = LayerData::new(id, shared);
                self.view_mut(id).data.complete(request, Arc::new(data))
            }
            Err(error) => self.view_mut(id).data.fail(request, error),
        }
    }

    /// Parse GeoJSON text for a finished feature request.
    pub fn finish_features_text(&mut self, id: LayerId, request: RequestId, text: &str) -> bool {
        let result = parse_feature_collection(text).map_err(LoadError::from);
        self.finish_features(id, request, result)
    }

    /// Start loading a layer's summary. Returns `None` when the layer has no
    /// summary or it is already cached.
    pub fn begin_summary(&mut self, id: LayerId) -> Option<RequestId> {
        let url = self.summary_url(id)?;
        if let Some(cached) = self.summaries.get(&url) {
            self.view_mut(id).summary.set_ready(cached);
            return None;
        }
        let request = self.next_request();
        self.view_mut(id).summary.begin_with(request);
        Some(request)
    }

    pub fn finish_summary(&mut self, id: LayerId, request: RequestId, result: Result<Summary, LoadError>) -> bool {
        if !self.view(id).summary.is_current(request) {
            tracing::debug!(layer = %id, "ignoring superseded summary response");
            return false;
        }
        let Some(url) = self.summary_url(id) else { return false };
        match result {
            Ok(summary) => {
                let shared = self.summaries.insert(url, summary);
                self.view_mut(id).summary.complete(request, shared)
            }
            Err(error) => self.view_mut(id).summary.fail(request, error),
        }
    }

    /// Parse summary JSON for a finished request using the layer's declared layout.
    pub fn finish_summary_text(&mut self, id: LayerId, request: RequestId, text: &str) -> bool {
        let result = match id.summary_layout() {
            Some(layout) => Summary::parse(text, &layout).map_err(LoadError::from),
            None => Err(LoadError::Format(format!("{id} has no summary file"))),
        };
        self.finish_summary(id, request, result)
    }

    pub fn fail_load(&mut self, id: LayerId, request: RequestId, error: LoadError) -> bool {
        let view = self.view_mut(id);
        if view.data.is_current(request) {
            view.data.fail(request, error)
        } else if view.summary.is_current(request) {
            view.summary.fail(request, error)
        } else {
            false
        }
    }

    /// Interpolated statistics at the layer's current slider position.
    ///
    /// `None` when the layer has no scenario, its summary is not loaded, or a
    /// breakpoint it needs is missing; callers show "N/A".
    pub fn projected_impact(&self, id: LayerId) -> Option<Metrics> {
        let view = self.view(id);
        let summary = view.summary.get()?;
        match summary.projected(view.adoption?) {
            Ok(metrics) => Some(metrics),
            Err(e) => {
                tracing::debug!(layer = %id, error = %e, "no projection");
                None
            }
        }
    }

    /// The layer's loaded summary.
    pub fn summary(&self, id: LayerId) -> Option<&Arc<Summary>> {
        self.view(id).summary.get()
    }

    /// Choropleth value of every feature, in feature order, at the layer's
    /// slider position. `None` for layers whose coloring ignores the slider
    /// or whose features are not loaded; a feature lacking the source
    /// property gets `None`.
    pub fn feature_values(&self, id: LayerId) -> Option<Vec<Option<f64>>> {
        let view = self.view(id);
        let features = &view.data.get()?.features;
        let percent = view.adoption.unwrap_or(100.0);

        let values = match id.feature_rule()? {
            FeatureRule::ScaledUnits { potential } => features.iter()
                .map(|f| f.properties.number(potential).map(|units| scaled_units(units, percent)))
                .collect(),
            FeatureRule::SiteViability { site, current } => {
                let sites = view.summary.get()
                    .map(|summary| SiteViability::from_summary(summary))
                    .unwrap_or_default();
                features.iter()
                    .map(|f| {
                        let props = &f.properties;
                        let current = props.number(current)?;
                        Some(match props.text(site) {
                            Some(name) => sites.viable_count(name, current, percent),
                            None => current,
                        })
                    })
                    .collect()
            }
        };
        Some(values)
    }

    /// Parcels developed at the layer's slider position, from the summary's
    /// totals. `None` for layers without a slider or an unloaded summary.
    pub fn adopted_parcels(&self, id: LayerId) -> Option<f64> {
        let view = self.view(id);
        let percent = view.adoption?;
        Some(adopted_parcels(&view.summary.get()?.totals(), percent))
    }

    /// Features adopted at the layer's current slider position, or `None`
    /// when the layer has no per-feature adoption or its data is unavailable.
    pub fn adopted(&self, id: LayerId) -> Option<AdoptedSet> {
        let view = self.view(id);
        let order = view.data.get()?.order.as_ref()?;
        Some(order.adopted(view.adoption?))
    }
}
