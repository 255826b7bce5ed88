//! HTTP surface

pub mod health;
pub mod market_analysis;

use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;
use thiserror::Error;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::market_data::orchestrator::MarketAnalysisService;

/// Shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<MarketAnalysisService>,
}

impl AppState {
    pub fn new(service: MarketAnalysisService) -> Self {
        Self { service: Arc::new(service) }
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("location query parameter is required")]
    MissingLocation,

    #[error("no ZIP code found in location")]
    NoZipCode,

    #[error("{0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            ApiError::MissingLocation => (
                StatusCode::BAD_REQUEST,
                json!({
                    "error": "Location is required",
                    "message": "Provide a location that includes a 5-digit ZIP code, e.g. 'Austin TX 78701'",
                }),
            ),
            ApiError::NoZipCode => (
                StatusCode::BAD_REQUEST,
                json!({
                    "error": "Invalid location",
                    "message": "Please include a 5-digit ZIP code in the location, e.g. 'Austin TX 78701'",
                }),
            ),
            ApiError::Internal(msg) => {
                tracing::error!(error = %msg, "market analysis request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({
                        "error": "Failed to fetch market analysis",
                        "message": msg,
                    }),
                )
            }
        };
        (status, Json(body)).into_response()
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/market-analysis", get(market_analysis::get_market_analysis))
        .route("/health", get(health::health))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
