// Source: provider `GET /zip/{zip}` body. Every field is optional upstream; we
// accept both snake_case and the camelCase spelling some exports use.
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, Default, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct RawMarketStats {
    #[serde(alias = "medianSalePrice")]
    pub median_sale_price: Option<f64>,
    /// Year-over-year percent change of the median sale price, e.g. 4.2 for +4.2%
    #[serde(alias = "medianSalePriceYoy")]
    pub median_sale_price_yoy: Option<f64>,
    #[serde(alias = "medianDom")]
    pub median_dom: Option<f64>,
    pub inventory: Option<f64>,
    #[serde(alias = "monthsOfSupply")]
    pub months_of_supply: Option<f64>,
    #[serde(alias = "homesSold")]
    pub homes_sold: Option<f64>,
    /// Average sale-to-list ratio, 1.0 == sold at list
    #[serde(alias = "avgSaleToList")]
    pub avg_sale_to_list: Option<f64>,
    /// Share of homes sold above list, 0.0..=1.0
    #[serde(alias = "soldAboveList")]
    pub sold_above_list: Option<f64>,
    #[serde(alias = "periodEnd")]
    pub period_end: Option<DateTime<Utc>>,
}

// Some deployments wrap the stats in {"data": {...}}
#[derive(Debug, serde::Deserialize)]
#[serde(untagged)]
pub enum StatsEnvelope {
    Wrapped { data: RawMarketStats },
    Bare(RawMarketStats),
}

impl StatsEnvelope {
    pub fn into_stats(self) -> RawMarketStats {
        match self {
            StatsEnvelope::Wrapped { data } => data,
            StatsEnvelope::Bare(stats) => stats,
        }
    }
}

impl RawMarketStats {
    /// A payload without a median price carries nothing worth caching.
    pub fn is_empty(&self) -> bool {
        self.median_sale_price.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_snake_case_payload() {
        let json = serde_json::json!({
            "median_sale_price": 510000.0,
            "median_sale_price_yoy": -1.5,
            "median_dom": 42,
            "inventory": 210,
            "months_of_supply": 3.1
        });
        let stats = serde_json::from_value::<StatsEnvelope>(json).unwrap().into_stats();
        assert_eq!(stats.median_sale_price, Some(510000.0));
        assert_eq!(stats.median_dom, Some(42.0));
        assert_eq!(stats.homes_sold, None);
    }

    #[test]
    fn test_parses_wrapped_camel_case_payload() {
        let json = serde_json::json!({
            "data": { "medianSalePrice": 300000, "monthsOfSupply": 1.2 }
        });
        let stats = serde_json::from_value::<StatsEnvelope>(json).unwrap().into_stats();
        assert_eq!(stats.median_sale_price, Some(300000.0));
        assert_eq!(stats.months_of_supply, Some(1.2));
    }

    #[test]
    fn test_empty_payload() {
        let stats = serde_json::from_value::<StatsEnvelope>(serde_json::json!({}))
            .unwrap()
            .into_stats();
        assert!(stats.is_empty());
    }
}
