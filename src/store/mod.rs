//! Runtime application state: per-layer display settings, adoption sliders
//! and the load status of each layer's data.

mod cache;
mod error;
mod slot;
mod state;

pub use cache::FetchCache;
pub use error::LoadError;
pub use slot::{LayerSlot, LoadState, RequestId};
pub use state::{AppState, LayerData, LayerView};
