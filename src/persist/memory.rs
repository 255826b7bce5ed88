//! Process-local cache store. Used when no `DATABASE_URL` is configured and by tests.

use ahash::AHashMap;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;

use crate::persist::{CacheKey, CacheRecord, CacheResult, MarketCacheStore};

#[derive(Default)]
pub struct InMemoryMarketCache {
    records: RwLock<AHashMap<CacheKey, CacheRecord>>,
}

impl InMemoryMarketCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }

    pub fn get(&self, key: &CacheKey) -> Option<CacheRecord> {
        self.records.read().get(key).cloned()
    }
}

#[async_trait::async_trait]
impl MarketCacheStore for InMemoryMarketCache {
    async fn find_fresh(&self, key: &CacheKey, now: DateTime<Utc>) -> CacheResult<Option<CacheRecord>> {
        Ok(self.records.read().get(key).filter(|r| r.is_fresh(now)).cloned())
    }

    async fn find_latest(&self, key: &CacheKey) -> CacheResult<Option<CacheRecord>> {
        // One record per key, so "latest" is just the record
        Ok(self.records.read().get(key).cloned())
    }

    async fn upsert(&self, record: &CacheRecord) -> CacheResult<()> {
        self.records.write().insert(record.key.clone(), record.clone());
        Ok(())
    }
}
