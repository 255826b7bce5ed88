// Shared trait + payload for market-statistics providers

use thiserror::Error;

use redfin_types::RawMarketStats;

/// What a provider hands back: the untouched body (stored as the cache's raw
/// payload) plus the typed view the transform reads.
#[derive(Debug, Clone)]
pub struct ProviderPayload {
    pub raw: serde_json::Value,
    pub stats: RawMarketStats,
}

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Provider returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to decode provider payload: {0}")]
    Decode(String),

    #[error("No market data available for ZIP {0}")]
    NoData(String),
}

#[async_trait::async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Short label stamped into `MarketData::data_source`.
    fn name(&self) -> &str;

    async fn fetch(&self, zip: &str, property_type: &str) -> Result<ProviderPayload, ProviderError>;
}

pub mod redfin;
pub mod redfin_types;
