use std::sync::Arc;

use super::LoadError;

/// Identity of one load request within a slot. Later requests compare greater.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestId(u64);

impl RequestId {
    #[inline] pub fn get(&self) -> u64 { self.0 }
}

impl From<u64> for RequestId {
    fn from(id: u64) -> Self { RequestId(id) }
}

#[derive(Debug, Clone, Default)]
pub enum LoadState<T> {
    #[default]
    Idle,
    Loading { request: RequestId },
    Ready(Arc<T>),
    Failed(LoadError),
}

/// Load status of one resource, guarded by request identity.
///
/// Each [`begin`](LayerSlot::begin) supersedes every earlier request; a
/// response is applied only if it belongs to the request still in flight,
/// so a late answer to an abandoned request can never overwrite newer data.
#[derive(Debug, Clone)]
pub struct LayerSlot<T> {
    state: LoadState<T>,
    issued: u64,
}

impl<T> Default for LayerSlot<T> {
    fn default() -> Self { Self { state: LoadState::Idle, issued: 0 } }
}

impl<T> LayerSlot<T> {
    pub fn new() -> Self { Self::default() }

    #[inline] pub fn state(&self) -> &LoadState<T> { &self.state }

    /// Start a new request, cancelling any in flight.
    pub fn begin(&mut self) -> RequestId {
        self.issued += 1;
        let request = RequestId(self.issued);
        self.state = LoadState::Loading { request };
        request
    }

    /// Start a request whose id was issued elsewhere, e.g. by a counter shared
    /// between several slots.
    pub fn begin_with(&mut self, request: RequestId) {
        self.issued = self.issued.max(request.0);
        self.state = LoadState::Loading { request };
    }

    #[inline]
    pub fn is_current(&self, request: RequestId) -> bool {
        matches!(self.state, LoadState::Loading { request: current } if current == request)
    }

    /// Apply the outcome of `request`. Returns `false`, leaving the slot
    /// untouched, when the request has been superseded.
    pub fn finish(&mut self, request: RequestId, result: Result<T, LoadError>) -> bool {
        match result {
            Ok(value) => self.complete(request, Arc::new(value)),
            Err(error) => self.fail(request, error),
        }
    }

    /// Like [`finish`](LayerSlot::finish) with an already shared value.
    pub fn complete(&mut self, request: RequestId, value: Arc<T>) -> bool {
        if !self.is_current(request) {
            tracing::debug!(request = request.get(), "dropping stale response");
            return false;
        }
        self.state = LoadState::Ready(value);
        true
    }

    pub fn fail(&mut self, request: RequestId, error: LoadError) -> bool {
        if !self.is_current(request) {
            tracing::debug!(request = request.get(), "dropping stale failure");
            return false;
        }
        tracing::warn!(%error, "layer data failed to load");
        self.state = LoadState::Failed(error);
        true
    }

    /// Fill from an already loaded value, cancelling any request in flight.
    pub fn set_ready(&mut self, value: Arc<T>) {
        self.issued += 1;
        self.state = LoadState::Ready(value);
    }

    pub fn get(&self) -> Option<&Arc<T>> {
        match &self.state {
            LoadState::Ready(value) => Some(value),
            _ => None,
        }
    }

    #[inline] pub fn is_loading(&self) -> bool { matches!(self.state, LoadState::Loading { .. }) }

    pub fn error(&self) -> Option<&LoadError> {
        match &self.state {
            LoadState::Failed(error) => Some(error),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stale_response_is_dropped() {
        let mut slot = LayerSlot::new();
        let first = slot.begin();
        let second = slot.begin();
        assert!(second > first);

        assert!(slot.finish(second, Ok("fresh")));
        assert!(!slot.finish(first, Ok("stale")));
        assert_eq!(**slot.get().unwrap(), "fresh");
    }

    #[test]
    fn stale_failure_is_dropped() {
        let mut slot: LayerSlot<u32> = LayerSlot::new();
        let first = slot.begin();
        let second = slot.begin();
        assert!(!slot.fail(first, LoadError::Fetch("aborted".into())));
        assert!(slot.is_loading());
        assert!(slot.fail(second, LoadError::Fetch("404".into())));
        assert!(slot.get().is_none());
        assert_eq!(slot.error(), Some(&LoadError::Fetch("404".into())));
    }

    #[test]
    fn finished_request_cannot_apply_twice() {
        let mut slot = LayerSlot::new();
        let request = slot.begin();
        assert!(slot.finish(request, Ok(1)));
        assert!(!slot.finish(request, Ok(2)));
        assert_eq!(**slot.get().unwrap(), 1);
    }

    #[test]
    fn cached_value_supersedes_request() {
        let mut slot = LayerSlot::new();
        let request = slot.begin();
        slot.set_ready(Arc::new(7));
        assert!(!slot.finish(request, Ok(8)));
        assert_eq!(**slot.get().unwrap(), 7);
        assert!(slot.begin() > request);
    }

    #[test]
    fn external_ids_keep_own_counter_ahead() {
        let mut slot: LayerSlot<u32> = LayerSlot::new();
        slot.begin_with(RequestId::from(9));
        assert!(slot.is_current(RequestId::from(9)));
        assert_eq!(slot.begin().get(), 10);
    }
}
