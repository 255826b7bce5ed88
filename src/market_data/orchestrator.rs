//! Read-through cache with graceful degradation.
//!
//! Every request ends in exactly one `MarketOutcome`:
//! fresh cache hit -> live fetch -> expired cache -> synthetic data.
//! Provider failures never escape this module; they pick the next rung down.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::{info, warn};

use crate::market_data::adapters::MarketDataProvider;
use crate::market_data::fallback;
use crate::market_data::transform::{transform, DemandWeights};
use crate::market_data::types::{MarketData, MarketRequest, SALE_DATA_TYPE};
use crate::persist::{CacheKey, CacheRecord, MarketCacheStore};

pub const DEFAULT_CACHE_DURATION_DAYS: i64 = 14;

#[derive(Debug, Clone, PartialEq)]
pub enum MarketOutcome {
    FreshHit { data: MarketData, fetched_at: DateTime<Utc> },
    LiveSuccess { data: MarketData, fetched_at: DateTime<Utc> },
    StaleFallback { data: MarketData, fetched_at: DateTime<Utc>, warning: String },
    SyntheticFallback { data: MarketData, error: String },
}

impl MarketOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            MarketOutcome::FreshHit { .. } => "fresh_hit",
            MarketOutcome::LiveSuccess { .. } => "live_success",
            MarketOutcome::StaleFallback { .. } => "stale_fallback",
            MarketOutcome::SyntheticFallback { .. } => "synthetic_fallback",
        }
    }

    pub fn data(&self) -> &MarketData {
        match self {
            MarketOutcome::FreshHit { data, .. }
            | MarketOutcome::LiveSuccess { data, .. }
            | MarketOutcome::StaleFallback { data, .. }
            | MarketOutcome::SyntheticFallback { data, .. } => data,
        }
    }
}

#[derive(Clone)]
pub struct MarketAnalysisService {
    store: Arc<dyn MarketCacheStore>,
    provider: Arc<dyn MarketDataProvider>,
    cache_duration: Duration,
    weights: DemandWeights,
}

impl MarketAnalysisService {
    pub fn new(
        store: Arc<dyn MarketCacheStore>,
        provider: Arc<dyn MarketDataProvider>,
        cache_duration: Duration,
        weights: DemandWeights,
    ) -> Self {
        Self { store, provider, cache_duration, weights }
    }

    pub async fn analyze(&self, req: &MarketRequest) -> MarketOutcome {
        let outcome = self.run_ladder(req).await;
        metrics::counter!("market_analysis_outcomes_total", "outcome" => outcome.label()).increment(1);
        info!(zip = %req.zip, property_type = %req.property_type, outcome = outcome.label(), "market analysis served");
        outcome
    }

    async fn run_ladder(&self, req: &MarketRequest) -> MarketOutcome {
        let key = CacheKey::new(&req.zip, &req.property_type, SALE_DATA_TYPE);
        let now = Utc::now();

        // 1) fresh cache
        if !req.force_refresh {
            if let Some(hit) = self.fresh_record(&key, now).await {
                return MarketOutcome::FreshHit { data: hit.parsed_data, fetched_at: hit.fetched_at };
            }
        }

        // 2) live fetch
        let err = match self.provider.fetch(&req.zip, &req.property_type).await {
            Ok(payload) => {
                let data = transform(&payload.stats, &req.location, &req.property_type, self.provider.name(), &self.weights);
                match now.checked_add_signed(self.cache_duration) {
                    Some(expires_at) => {
                        let record = CacheRecord {
                            key,
                            raw_data: payload.raw,
                            parsed_data: data.clone(),
                            fetched_at: now,
                            expires_at,
                        };
                        if let Err(e) = self.store.upsert(&record).await {
                            warn!(zip = %req.zip, error = %e, "failed to write market cache; serving live data anyway");
                        }
                    }
                    None => warn!(zip = %req.zip, "cache duration overflows expiry timestamp; not caching"),
                }
                return MarketOutcome::LiveSuccess { data, fetched_at: now };
            }
            Err(e) => {
                warn!(zip = %req.zip, error = %e, "market data provider failed; falling back");
                e
            }
        };

        // 3) expired cache
        match self.store.find_latest(&key).await {
            Ok(Some(stale)) => {
                return MarketOutcome::StaleFallback {
                    data: stale.parsed_data,
                    fetched_at: stale.fetched_at,
                    warning: format!(
                        "Using cached data from {} because live market data is unavailable",
                        stale.fetched_at.to_rfc3339()
                    ),
                };
            }
            Ok(None) => {}
            Err(e) => warn!(zip = %req.zip, error = %e, "failed to read expired market cache"),
        }

        // 4) synthetic
        MarketOutcome::SyntheticFallback {
            data: fallback::synthesize(&req.location, &req.property_type),
            error: err.to_string(),
        }
    }

    async fn fresh_record(&self, key: &CacheKey, now: DateTime<Utc>) -> Option<CacheRecord> {
        match self.store.find_fresh(key, now).await {
            Ok(found) => found,
            Err(e) => {
                warn!(zip = %key.location_key, error = %e, "failed to read market cache; treating as miss");
                None
            }
        }
    }
}
