//! Pure mapping from a provider payload into canonical `MarketData`.
//!
//! This file MUST NOT do I/O. The demand score and the narrative lists are
//! derived from the same four metrics with fixed thresholds.

use chrono::Utc;
use serde::Deserialize;

use crate::market_data::adapters::redfin_types::RawMarketStats;
use crate::market_data::types::MarketData;

/// Relative weight of each sub-score in the demand score. Sums to 1.0 by default;
/// the final score is clamped regardless.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct DemandWeights {
    pub dom: f64,
    pub inventory: f64,
    pub price: f64,
    pub supply: f64,
}

impl Default for DemandWeights {
    fn default() -> Self {
        Self { dom: 0.30, inventory: 0.20, price: 0.30, supply: 0.20 }
    }
}

// Neutral stand-ins for metrics the provider left out
const DEFAULT_DOM: f64 = 30.0;
const DEFAULT_INVENTORY: f64 = 250.0;
const DEFAULT_PRICE_CHANGE: f64 = 0.0;
const DEFAULT_MONTHS_SUPPLY: f64 = 3.0;

fn clamp_score(x: f64) -> f64 {
    if x.is_nan() {
        return 0.0;
    }
    x.clamp(0.0, 100.0)
}

fn finite_or(v: Option<f64>, default: f64) -> f64 {
    match v {
        Some(x) if x.is_finite() => x,
        _ => default,
    }
}

/// Composite 0..=100 competitiveness score.
///
/// Faster sales, thinner inventory, rising prices and low months-of-supply all push
/// the score up. Each sub-score is clamped to [0, 100] before weighting.
pub fn demand_score(
    days_on_market: f64,
    inventory: f64,
    price_change: f64,
    months_of_supply: f64,
    weights: &DemandWeights,
) -> u8 {
    let dom = if days_on_market.is_finite() { days_on_market } else { DEFAULT_DOM };
    let inv = if inventory.is_finite() { inventory } else { DEFAULT_INVENTORY };
    let chg = if price_change.is_finite() { price_change } else { DEFAULT_PRICE_CHANGE };
    let mos = if months_of_supply.is_finite() { months_of_supply } else { DEFAULT_MONTHS_SUPPLY };

    let dom_score = clamp_score(100.0 * (90.0 - dom) / 90.0);
    let inventory_score = clamp_score(100.0 - inv / 5.0);
    let price_score = clamp_score(50.0 + 5.0 * chg);
    let supply_score = clamp_score(100.0 * (6.0 - mos) / 6.0);

    let weighted = weights.dom * dom_score
        + weights.inventory * inventory_score
        + weights.price * price_score
        + weights.supply * supply_score;

    clamp_score(weighted.round()) as u8
}

/// Map provider stats into `MarketData` for `location` / `property_type`.
pub fn transform(
    raw: &RawMarketStats,
    location: &str,
    property_type: &str,
    data_source: &str,
    weights: &DemandWeights,
) -> MarketData {
    let median_price = finite_or(raw.median_sale_price, 0.0);
    let price_change = round1(finite_or(raw.median_sale_price_yoy, DEFAULT_PRICE_CHANGE));
    let days_on_market = finite_or(raw.median_dom, DEFAULT_DOM);
    let inventory = finite_or(raw.inventory, DEFAULT_INVENTORY);
    let months_of_supply = finite_or(raw.months_of_supply, DEFAULT_MONTHS_SUPPLY);

    let score = demand_score(days_on_market, inventory, price_change, months_of_supply, weights);

    MarketData {
        location: location.to_string(),
        median_price,
        price_change,
        days_on_market,
        inventory,
        demand_score: score,
        recommendations: recommendations(days_on_market, price_change, months_of_supply, property_type),
        key_insights: key_insights(raw, median_price, price_change, days_on_market, months_of_supply),
        competitive_factors: competitive_factors(score, inventory, raw),
        data_freshness: raw.period_end.unwrap_or_else(Utc::now),
        data_source: data_source.to_string(),
        is_fallback: false,
    }
}

fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

fn recommendations(dom: f64, price_change: f64, months_of_supply: f64, property_type: &str) -> Vec<String> {
    let mut out = Vec::new();

    if dom < 21.0 {
        out.push("Price at or slightly above recent comparables; homes are going under contract within three weeks".to_string());
        out.push("Prepare sellers for multiple offers and set a clear offer deadline".to_string());
    } else if dom > 60.0 {
        out.push("Price competitively from day one; extended days on market invite low offers".to_string());
        out.push("Budget for staging and professional photography to stand out".to_string());
    } else {
        out.push("Price in line with recent comparables and review feedback after the first two weeks".to_string());
    }

    if price_change < 0.0 {
        out.push("Set seller expectations early: prices are softening year over year".to_string());
    } else if price_change > 5.0 {
        out.push("Highlight recent appreciation in listing copy to anchor buyer expectations".to_string());
    }

    if months_of_supply < 3.0 {
        out.push(format!("Low supply favors sellers; emphasize {} features that are scarce locally", property_type.to_lowercase()));
    } else if months_of_supply > 6.0 {
        out.push("Buyers have choices; consider offering closing-cost credits".to_string());
    }

    out
}

fn key_insights(
    raw: &RawMarketStats,
    median_price: f64,
    price_change: f64,
    dom: f64,
    months_of_supply: f64,
) -> Vec<String> {
    let direction = if price_change >= 0.0 { "up" } else { "down" };
    let mut out = vec![
        format!("Median sale price is ${:.0}, {} {:.1}% year over year", median_price, direction, price_change.abs()),
        format!("Homes sell in a median of {:.0} days", dom),
        format!("{:.1} months of supply", months_of_supply),
    ];

    if let Some(sold) = raw.homes_sold.filter(|v| v.is_finite()) {
        out.push(format!("{:.0} homes sold in the latest period", sold));
    }
    if let Some(ratio) = raw.avg_sale_to_list.filter(|v| v.is_finite()) {
        out.push(format!("Average sale-to-list ratio is {:.1}%", ratio * 100.0));
    }

    out
}

fn competitive_factors(score: u8, inventory: f64, raw: &RawMarketStats) -> Vec<String> {
    let mut out = Vec::new();

    out.push(match score {
        70..=100 => "Highly competitive seller's market".to_string(),
        45..=69 => "Balanced market with steady buyer demand".to_string(),
        _ => "Buyer's market with negotiating leverage on the buy side".to_string(),
    });

    if inventory < 100.0 {
        out.push("Limited active listings".to_string());
    } else if inventory > 400.0 {
        out.push("Ample active listings".to_string());
    }

    if let Some(share) = raw.sold_above_list.filter(|v| v.is_finite()) {
        out.push(format!("{:.0}% of homes sold above list price", share * 100.0));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn stats() -> RawMarketStats {
        RawMarketStats {
            median_sale_price: Some(550_000.0),
            median_sale_price_yoy: Some(4.26),
            median_dom: Some(18.0),
            inventory: Some(80.0),
            months_of_supply: Some(1.5),
            homes_sold: Some(44.0),
            avg_sale_to_list: Some(1.012),
            sold_above_list: Some(0.38),
            period_end: None,
        }
    }

    #[test]
    fn test_weights_default() {
        let w = DemandWeights::default();
        assert!((w.dom + w.inventory + w.price + w.supply - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_demand_score_hot_market() {
        // dom 0 -> 100, inv 0 -> 100, +10% -> 100, 0 months -> 100
        assert_eq!(demand_score(0.0, 0.0, 10.0, 0.0, &DemandWeights::default()), 100);
    }

    #[test]
    fn test_demand_score_cold_market() {
        assert_eq!(demand_score(120.0, 900.0, -15.0, 9.0, &DemandWeights::default()), 0);
    }

    #[test]
    fn test_demand_score_weighted_mix() {
        // dom 45 -> 50, inv 250 -> 50, 0% -> 50, 3 months -> 50
        assert_eq!(demand_score(45.0, 250.0, 0.0, 3.0, &DemandWeights::default()), 50);
        // dom 0 -> 100 only: 0.3*100 + 0.2*0 + 0.3*0 + 0.2*0
        assert_eq!(demand_score(0.0, 1000.0, -20.0, 12.0, &DemandWeights::default()), 30);
    }

    #[test]
    fn test_demand_score_honors_custom_weights() {
        let only_price = DemandWeights { dom: 0.0, inventory: 0.0, price: 1.0, supply: 0.0 };
        assert_eq!(demand_score(0.0, 0.0, 2.0, 0.0, &only_price), 60);
    }

    #[test]
    fn test_demand_score_non_finite_inputs() {
        let s = demand_score(f64::NAN, f64::INFINITY, f64::NEG_INFINITY, f64::NAN, &DemandWeights::default());
        assert!(s <= 100);
    }

    #[test]
    fn test_transform_maps_fields() {
        let data = transform(&stats(), "Austin TX 78701", "Single Family Home", "Redfin", &DemandWeights::default());
        assert_eq!(data.location, "Austin TX 78701");
        assert_eq!(data.median_price, 550_000.0);
        assert_eq!(data.price_change, 4.3);
        assert_eq!(data.days_on_market, 18.0);
        assert_eq!(data.inventory, 80.0);
        assert_eq!(data.data_source, "Redfin");
        assert!(!data.is_fallback);
        assert!(data.demand_score >= 70);
        assert_eq!(data.competitive_factors[0], "Highly competitive seller's market");
        assert!(data.key_insights.iter().any(|s| s.contains("44 homes sold")));
        assert!(data.recommendations.iter().any(|s| s.contains("multiple offers")));
    }

    #[test]
    fn test_transform_fills_missing_metrics() {
        let raw = RawMarketStats { median_sale_price: Some(200_000.0), ..Default::default() };
        let data = transform(&raw, "x 10001", "Condo", "Redfin", &DemandWeights::default());
        assert_eq!(data.days_on_market, DEFAULT_DOM);
        assert_eq!(data.inventory, DEFAULT_INVENTORY);
        assert_eq!(data.price_change, 0.0);
        assert_eq!(data.key_insights.len(), 3);
    }

    proptest! {
        #[test]
        fn prop_demand_score_in_range(
            dom in -1e6f64..1e6,
            inv in -1e6f64..1e6,
            chg in -1e3f64..1e3,
            mos in -1e3f64..1e3,
        ) {
            let s = demand_score(dom, inv, chg, mos, &DemandWeights::default());
            prop_assert!(s <= 100);
        }

        #[test]
        fn prop_demand_score_in_range_for_any_weights(
            dom in any::<f64>(),
            inv in any::<f64>(),
            w in proptest::array::uniform4(-10.0f64..10.0),
        ) {
            let weights = DemandWeights { dom: w[0], inventory: w[1], price: w[2], supply: w[3] };
            let s = demand_score(dom, inv, 1.0, 2.0, &weights);
            prop_assert!(s <= 100);
        }
    }
}
