use std::sync::Arc;

use ahash::AHashMap;

/// Session cache of loaded resources keyed by URL. Entries are immutable once
/// inserted and live for the whole session.
#[derive(Debug, Clone)]
pub struct FetchCache<T> {
    entries: AHashMap<String, Arc<T>>,
}

impl<T> Default for FetchCache<T> {
    fn default() -> Self { Self { entries: AHashMap::new() } }
}

impl<T> FetchCache<T> {
    pub fn new() -> Self { Self::default() }

    #[inline] pub fn len(&self) -> usize { self.entries.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.entries.is_empty() }

    pub fn get(&self, url: &str) -> Option<Arc<T>> { self.entries.get(url).cloned() }

    /// Cache `value` under `url`, returning the shared handle. A URL that is
    /// already cached keeps its first value.
    pub fn insert(&mut self, url: impl Into<String>, value: T) -> Arc<T> {
        self.entries.entry(url.into()).or_insert_with(|| Arc::new(value)).clone()
    }

    pub fn clear(&mut self) { self.entries.clear() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_value_wins() {
        let mut cache = FetchCache::new();
        let a = cache.insert("/data/parks.geojson", 1);
        let b = cache.insert("/data/parks.geojson", 2);
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(*cache.get("/data/parks.geojson").unwrap(), 1);
        assert_eq!(cache.len(), 1);
        assert!(cache.get("/data/other.geojson").is_none());
    }
}
