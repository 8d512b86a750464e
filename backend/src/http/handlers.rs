//! HTTP handlers for the REST API.
//!
//! Each handler corresponds to an API endpoint and delegates to the query
//! service. Path segments are handed to the service verbatim.

use axum::{
    extract::{Path, State},
    response::Html,
    Json,
};

use super::dto::{
    DatedValue, HealthResponse, StationId, TemperatureSummary, AVAILABLE_ROUTES,
};
use super::error::AppError;
use super::state::AppState;
use crate::db::services as db_services;

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

// =============================================================================
// Discovery
// =============================================================================

/// GET /
///
/// List the available routes.
pub async fn landing() -> Html<String> {
    let mut body = String::from("Available Routes:<br/>");
    body.push_str(&AVAILABLE_ROUTES.join("<br/>"));
    Html(body)
}

/// GET /health
///
/// Health check endpoint to verify the service is running and the store is reachable.
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    let db_status = match db_services::health_check(state.repository.as_ref()).await {
        Ok(true) => "connected".to_string(),
        Ok(false) => "disconnected".to_string(),
        Err(e) => format!("error: {}", e),
    };

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: "v1.0".to_string(),
        database: db_status,
    }))
}

/// Fallback for unmatched paths.
pub async fn not_found(uri: axum::http::Uri) -> AppError {
    AppError::NotFound(format!("No route for {}", uri.path()))
}

// =============================================================================
// Listings
// =============================================================================

/// GET /api/v1.0/precipitation
pub async fn precipitation(State(state): State<AppState>) -> HandlerResult<Vec<DatedValue>> {
    let listing = db_services::precipitation_listing(state.repository.as_ref()).await?;
    Ok(Json(listing))
}

/// GET /api/v1.0/stations
pub async fn stations(State(state): State<AppState>) -> HandlerResult<Vec<StationId>> {
    let stations = db_services::station_listing(state.repository.as_ref()).await?;
    Ok(Json(stations))
}

/// GET /api/v1.0/tobs
///
/// Temperature observations for the trailing year of data.
pub async fn tobs(State(state): State<AppState>) -> HandlerResult<Vec<DatedValue>> {
    let observations =
        db_services::recent_temperature_observations(state.repository.as_ref()).await?;
    Ok(Json(observations))
}

// =============================================================================
// Aggregates
// =============================================================================

/// GET /api/v1.0/{start}
///
/// One-element array holding the summary for `date >= start`.
pub async fn temperature_from(
    State(state): State<AppState>,
    Path(start): Path<String>,
) -> HandlerResult<Vec<TemperatureSummary>> {
    let summary = db_services::temperature_summary_from(state.repository.as_ref(), &start).await?;
    Ok(Json(vec![summary]))
}

/// GET /api/v1.0/{start}/{end}
///
/// One-element array holding the summary for `start <= date <= end`.
pub async fn temperature_range(
    State(state): State<AppState>,
    Path((start, end)): Path<(String, String)>,
) -> HandlerResult<Vec<TemperatureSummary>> {
    let summary =
        db_services::temperature_summary_range(state.repository.as_ref(), &start, &end).await?;
    Ok(Json(vec![summary]))
}
