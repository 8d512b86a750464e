//! Data Transfer Objects for the HTTP API.
//!
//! Query results are serialized straight from the [`crate::api`] types; only
//! the operational responses are defined here.

use serde::{Deserialize, Serialize};

pub use crate::api::{DatedValue, StationId, TemperatureSummary};

/// API version prefix shared by every data route.
pub const API_PREFIX: &str = "/api/v1.0";

/// Routes listed by the landing page, in display order.
pub const AVAILABLE_ROUTES: &[&str] = &[
    "/api/v1.0/precipitation",
    "/api/v1.0/stations",
    "/api/v1.0/tobs",
    "/api/v1.0/<start>",
    "/api/v1.0/<start>/<end>",
];

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// API version
    pub version: String,
    /// Store connection status
    pub database: String,
}
