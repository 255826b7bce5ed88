// Redfin-style market statistics adapter (REST, one GET per lookup)

use std::time::Duration;

use super::redfin_types::StatsEnvelope;
use super::{MarketDataProvider, ProviderError, ProviderPayload};

pub const DEFAULT_BASE_URL: &str = "https://api.redfin-data.example.com/v1/market";

pub struct RedfinProvider {
    pub base_url: String, // e.g. "https://api.../v1/market"; we append "/zip/{zip}"
    api_key: Option<String>,
    client: reqwest::Client,
}

impl RedfinProvider {
    pub fn new(base_url: &str, api_key: Option<String>, timeout: Duration) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("zipmarket-rs/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            client,
        })
    }

    fn zip_url(&self, zip: &str) -> String {
        format!("{}/zip/{}", self.base_url, zip)
    }
}

#[async_trait::async_trait]
impl MarketDataProvider for RedfinProvider {
    fn name(&self) -> &str {
        "Redfin"
    }

    async fn fetch(&self, zip: &str, property_type: &str) -> Result<ProviderPayload, ProviderError> {
        let mut req = self
            .client
            .get(self.zip_url(zip))
            .query(&[("property_type", property_type)]);
        if let Some(key) = &self.api_key {
            req = req.bearer_auth(key);
        }

        tracing::debug!(zip, property_type, "requesting market stats");
        let res = req.send().await.map_err(|e| ProviderError::Network(e.to_string()))?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            return Err(ProviderError::Status { status: status.as_u16(), body });
        }

        let raw: serde_json::Value = res
            .json()
            .await
            .map_err(|e| ProviderError::Decode(e.to_string()))?;

        let stats = serde_json::from_value::<StatsEnvelope>(raw.clone())
            .map_err(|e| ProviderError::Decode(e.to_string()))?
            .into_stats();

        if stats.is_empty() {
            return Err(ProviderError::NoData(zip.to_string()));
        }

        Ok(ProviderPayload { raw, stats })
    }
}
