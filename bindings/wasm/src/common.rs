use std::fmt::Display;

use anyhow::Result;
use js_sys::{Array, JsString};
use serde::Serialize;
use serde_wasm_bindgen::Serializer;
use smartgrowth_core::LayerId;
use wasm_bindgen::JsValue;

/// Error message with its full context chain.
pub(crate) fn js_err(e: impl Display) -> JsValue {
    JsValue::from_str(&format!("{e:#}"))
}

pub(crate) fn parse_layer(layer: &str) -> Result<LayerId> {
    layer.parse()
}

/// Serialize as plain JS objects and arrays (never `Map`).
pub(crate) fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsValue> {
    value.serialize(&Serializer::json_compatible()).map_err(JsValue::from)
}

/// `value` as a JS value, or `null` when absent.
pub(crate) fn to_js_or_null<T: Serialize>(value: Option<T>) -> Result<JsValue, JsValue> {
    value.map_or(Ok(JsValue::NULL), |v| to_js(&v))
}

/// Array of JS strings.
pub(crate) fn string_array<'a>(items: impl IntoIterator<Item = &'a str>) -> Array {
    items.into_iter().map(JsString::from).collect()
}
