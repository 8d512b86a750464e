//! Climate query service.
//!
//! Repository-agnostic operations that turn date-range and aggregate requests
//! into response payloads. These functions own the behavior that must be the
//! same regardless of the storage backend: station deduplication, the
//! trailing-year cutoff and the shape of aggregate records.
//!
//! # Usage
//!
//! ```no_run
//! use climate_api::db::{services, repositories::LocalRepository};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let repo = LocalRepository::new();
//!
//!     let stations = services::station_listing(&repo).await?;
//!     println!("Found {} stations", stations.len());
//!
//!     Ok(())
//! }
//! ```

use chrono::{Duration, NaiveDate};
use log::{debug, info};
use std::collections::HashSet;

use super::repository::{ErrorContext, MeasurementRepository, RepositoryError, RepositoryResult};
use crate::api::{DatedValue, StationId, TemperatureSummary};

/// Format of every date stored in and returned by the service.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Length of the trailing window used by [`recent_temperature_observations`].
pub const TRAILING_WINDOW_DAYS: i64 = 365;

/// Errors raised by the query service.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// The store failed (unreachable, bad query, corrupt data).
    #[error(transparent)]
    Store(#[from] RepositoryError),

    /// The operation needs at least one row and the store has none.
    #[error("Measurement store is empty: {operation} needs at least one row")]
    EmptyStore { operation: &'static str },
}

pub type ServiceResult<T> = Result<T, ServiceError>;

// ==================== Health & Connection ====================

/// Check if the store is reachable.
pub async fn health_check<R>(repo: &R) -> RepositoryResult<bool>
where
    R: MeasurementRepository + ?Sized,
{
    repo.health_check().await
}

// ==================== Listings ====================

/// Every measurement as `{date: precipitation}`, ascending by date.
///
/// One entry per row: dates reported by several stations appear several
/// times. An empty store yields an empty list.
pub async fn precipitation_listing<R>(repo: &R) -> RepositoryResult<Vec<DatedValue>>
where
    R: MeasurementRepository + ?Sized,
{
    let rows = repo.all_measurements().await?;
    debug!("precipitation_listing: {} rows", rows.len());
    Ok(rows.into_iter().map(DatedValue::from).collect())
}

/// Distinct station codes in first-seen order.
///
/// Duplicates are removed here even when the store returns repeated rows.
pub async fn station_listing<R>(repo: &R) -> RepositoryResult<Vec<StationId>>
where
    R: MeasurementRepository + ?Sized,
{
    let codes = repo.all_stations().await?;
    let mut seen = HashSet::with_capacity(codes.len());
    let stations: Vec<StationId> = codes
        .into_iter()
        .filter(|code| seen.insert(code.clone()))
        .map(StationId::from)
        .collect();
    debug!("station_listing: {} distinct stations", stations.len());
    Ok(stations)
}

// ==================== Trailing Year ====================

/// The date exactly [`TRAILING_WINDOW_DAYS`] days before `latest`.
///
/// # Errors
/// A `ValidationError` when `latest` is not a `YYYY-MM-DD` date.
pub fn cutoff_date(latest: &str) -> RepositoryResult<String> {
    let context = || ErrorContext::new("cutoff_date").with_entity("measurement");

    let latest_date = NaiveDate::parse_from_str(latest, DATE_FORMAT).map_err(|e| {
        RepositoryError::validation(format!("Malformed date '{}' in store: {}", latest, e))
            .with_context(context())
    })?;

    latest_date
        .checked_sub_signed(Duration::days(TRAILING_WINDOW_DAYS))
        .map(|d| d.format(DATE_FORMAT).to_string())
        .ok_or_else(|| {
            RepositoryError::validation(format!("Date '{}' has no cutoff within range", latest))
                .with_context(context())
        })
}

/// Temperature observations for the year ending at the store's latest date.
///
/// # Errors
/// - `ServiceError::EmptyStore` when there is no latest date
/// - `ServiceError::Store` for store failures or a malformed latest date
pub async fn recent_temperature_observations<R>(repo: &R) -> ServiceResult<Vec<DatedValue>>
where
    R: MeasurementRepository + ?Sized,
{
    let latest = repo
        .latest_date()
        .await?
        .ok_or(ServiceError::EmptyStore {
            operation: "recent_temperature_observations",
        })?;
    let cutoff = cutoff_date(&latest)?;
    info!("Trailing year window: {} .. {}", cutoff, latest);

    let rows = repo.measurements_since(&cutoff).await?;
    Ok(rows.into_iter().map(DatedValue::from).collect())
}

// ==================== Aggregates ====================

/// Min/max/avg temperature over `date >= start`.
///
/// `start` is used verbatim as a lexicographic bound; it is not validated.
/// No matching rows yields a summary whose statistics are all `None`.
pub async fn temperature_summary_from<R>(
    repo: &R,
    start: &str,
) -> RepositoryResult<TemperatureSummary>
where
    R: MeasurementRepository + ?Sized,
{
    let stats = repo.aggregate_from(start).await?;
    Ok(TemperatureSummary::from_start(start, stats))
}

/// Min/max/avg temperature over `start <= date <= end`.
///
/// Bounds are used verbatim. An inverted window (`end < start`) is not an
/// error; it simply matches nothing.
pub async fn temperature_summary_range<R>(
    repo: &R,
    start: &str,
    end: &str,
) -> RepositoryResult<TemperatureSummary>
where
    R: MeasurementRepository + ?Sized,
{
    let stats = repo.aggregate_range(start, end).await?;
    Ok(TemperatureSummary::for_range(start, end, stats))
}
