use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::market_data::types::MarketData;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type CacheResult<T> = Result<T, CacheError>;

/// Composite identity of a cache row. At most one record exists per key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub location_key: String, // ZIP
    pub property_type: String,
    pub data_type: String,
}

impl CacheKey {
    pub fn new(location_key: &str, property_type: &str, data_type: &str) -> Self {
        Self {
            location_key: location_key.to_string(),
            property_type: property_type.to_string(),
            data_type: data_type.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CacheRecord {
    pub key: CacheKey,
    pub raw_data: serde_json::Value,
    pub parsed_data: MarketData,
    pub fetched_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl CacheRecord {
    pub fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        self.expires_at > now
    }
}
