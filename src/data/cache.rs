//! Resolved funnel data, keyed by data source id and format.
//!
//! Entries are never evicted: the number of data sets is bounded by the deck.
//! Concurrent misses for one key are not deduplicated; the last write wins.

use crate::types::{FunnelData, SourceFormat};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// Cache key: a data set is identified by its id and its file format.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub data_source_id: String,
    pub format: SourceFormat,
}

impl CacheKey {
    pub fn new(data_source_id: impl Into<String>, format: SourceFormat) -> Self {
        Self {
            data_source_id: data_source_id.into(),
            format,
        }
    }
}

#[derive(Default)]
pub struct DataCache {
    entries: RwLock<HashMap<CacheKey, Arc<FunnelData>>>,
}

impl DataCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &CacheKey) -> Option<Arc<FunnelData>> {
        self.entries.read().get(key).cloned()
    }

    pub fn insert(&self, key: CacheKey, data: FunnelData) -> Arc<FunnelData> {
        let data = Arc::new(data);
        self.entries.write().insert(key, Arc::clone(&data));
        data
    }

    pub fn contains(&self, key: &CacheKey) -> bool {
        self.entries.read().contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}
