//! `GET /api/market-analysis`
//!
//! Resolves the location to a ZIP, runs the cache/fallback ladder and renders the
//! outcome. Only bad input (400) and unparseable requests (500) are errors here;
//! provider trouble is absorbed by the ladder and still answers 200.

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::Json;
use serde_json::{json, Value};

use crate::api::{ApiError, AppState};
use crate::market_data::normaliser::extract_zip;
use crate::market_data::orchestrator::MarketOutcome;
use crate::market_data::types::{MarketRequest, DEFAULT_PROPERTY_TYPE};

#[derive(Debug, Default, PartialEq)]
pub struct MarketAnalysisQuery {
    pub location: Option<String>,
    pub property_type: Option<String>,
    /// Only the literal "true" forces a refresh.
    pub force_refresh: Option<String>,
}

impl MarketAnalysisQuery {
    /// First value wins when a parameter repeats; unknown parameters are ignored.
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut query = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "location" => &mut query.location,
                "propertyType" => &mut query.property_type,
                "forceRefresh" => &mut query.force_refresh,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value);
            }
        }
        query
    }
}

pub async fn get_market_analysis(
    State(state): State<AppState>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Result<Json<Value>, ApiError> {
    let Query(pairs) = query.map_err(|e| ApiError::Internal(e.body_text()))?;
    let query = MarketAnalysisQuery::from_pairs(pairs);

    let location = query
        .location
        .as_deref()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .ok_or(ApiError::MissingLocation)?;

    let zip = extract_zip(location).ok_or(ApiError::NoZipCode)?;

    let property_type = query
        .property_type
        .as_deref()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .unwrap_or(DEFAULT_PROPERTY_TYPE);
    let force_refresh = query.force_refresh.as_deref() == Some("true");

    let req = MarketRequest::new(location, &zip, property_type, force_refresh);
    let outcome = state.service.analyze(&req).await;

    Ok(Json(outcome_body(outcome)))
}

pub fn outcome_body(outcome: MarketOutcome) -> Value {
    match outcome {
        MarketOutcome::FreshHit { data, fetched_at } => json!({
            "success": true,
            "data": data,
            "cached": true,
            "fetchedAt": fetched_at,
        }),
        MarketOutcome::LiveSuccess { data, fetched_at } => json!({
            "success": true,
            "data": data,
            "cached": false,
            "fetchedAt": fetched_at,
        }),
        MarketOutcome::StaleFallback { data, warning, .. } => json!({
            "success": true,
            "data": data,
            "cached": true,
            "expired": true,
            "warning": warning,
        }),
        MarketOutcome::SyntheticFallback { data, error } => json!({
            "success": true,
            "data": data,
            "cached": false,
            "fallback": true,
            "error": error,
        }),
    }
}
