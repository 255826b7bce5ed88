pub mod types;
pub use types::*;
pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Keyed store of previously fetched market statistics.
///
/// Implementations own conflict resolution: `upsert` must leave exactly one record
/// per key, and concurrent upserts for the same key must not fail.
#[async_trait]
pub trait MarketCacheStore: Send + Sync {
    /// Most recent record for `key` whose `expires_at` is after `now`.
    async fn find_fresh(&self, key: &CacheKey, now: DateTime<Utc>) -> CacheResult<Option<CacheRecord>>;

    /// Most recent record for `key` by `fetched_at`, expired or not.
    async fn find_latest(&self, key: &CacheKey) -> CacheResult<Option<CacheRecord>>;

    async fn upsert(&self, record: &CacheRecord) -> CacheResult<()>;
}
