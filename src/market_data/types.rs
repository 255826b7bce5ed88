use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const DEFAULT_PROPERTY_TYPE: &str = "Single Family Home";

/// Every lookup the service performs is a sale-market lookup.
pub const SALE_DATA_TYPE: &str = "sale";

/// Canonical market statistics for one ZIP / property type, as returned to clients
/// and stored in the cache's `parsed_data` column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketData {
    pub location: String,
    pub median_price: f64,
    /// Year-over-year change, in percent.
    pub price_change: f64,
    pub days_on_market: f64,
    pub inventory: f64,
    /// 0..=100
    pub demand_score: u8,
    pub recommendations: Vec<String>,
    pub key_insights: Vec<String>,
    pub competitive_factors: Vec<String>,
    pub data_freshness: DateTime<Utc>,
    pub data_source: String,
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_fallback: bool,
}

fn is_false(b: &bool) -> bool {
    !*b
}

// One market-analysis lookup after the location has been resolved to a ZIP
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarketRequest {
    pub location: String,
    pub zip: String,
    pub property_type: String,
    pub force_refresh: bool,
}

impl MarketRequest {
    pub fn new(location: &str, zip: &str, property_type: &str, force_refresh: bool) -> Self {
        Self {
            location: location.to_string(),
            zip: zip.to_string(),
            property_type: property_type.to_string(),
            force_refresh,
        }
    }
}
