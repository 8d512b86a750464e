//! Router configuration for the HTTP API.
//!
//! This module sets up all routes, middleware (CORS, compression, request ids,
//! tracing), and creates the axum router ready for serving.

use axum::{extract::Request, http::Method, routing::get, Router};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use super::dto::API_PREFIX;
use super::handlers;
use super::state::AppState;

/// Create the main application router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    // Read-only API: any origin may GET
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET])
        .allow_headers(Any);

    // Static segments win over `{start}` in the matcher
    let api_v1 = Router::new()
        .route("/precipitation", get(handlers::precipitation))
        .route("/stations", get(handlers::stations))
        .route("/tobs", get(handlers::tobs))
        .route("/{start}", get(handlers::temperature_from))
        .route("/{start}/{end}", get(handlers::temperature_range));

    let trace = TraceLayer::new_for_http().make_span_with(|request: &Request| {
        let request_id = request
            .headers()
            .get("x-request-id")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("-");
        tracing::info_span!(
            "request",
            method = %request.method(),
            uri = %request.uri(),
            request_id = %request_id,
        )
    });

    Router::new()
        .route("/", get(handlers::landing))
        .route("/health", get(handlers::health_check))
        .nest(API_PREFIX, api_v1)
        .fallback(handlers::not_found)
        .layer(CompressionLayer::new())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(trace)
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(cors)
        .with_state(state)
}
