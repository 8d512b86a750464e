//! Read-only measurement store trait.
//!
//! This trait is the capability set the query service consumes. Each method
//! is one round trip: implementations acquire a session before the query and
//! release it on every exit path.

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::models::TemperatureStats;

/// A `(date, value)` pair as read from the store.
pub type DatedReading = (String, Option<f64>);

/// Repository trait for the measurement table.
///
/// Dates are compared as strings. Zero-padded `YYYY-MM-DD` values order
/// correctly under lexicographic comparison, and bounds supplied by callers
/// are never validated: any string is a usable bound.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to work with async Rust.
#[async_trait]
pub trait MeasurementRepository: Send + Sync {
    /// Check if the store is reachable.
    ///
    /// # Returns
    /// - `Ok(true)` if a session could be opened and a trivial query ran
    /// - `Err(RepositoryError)` if the check itself failed
    async fn health_check(&self) -> RepositoryResult<bool>;

    /// All `(date, precipitation)` pairs ordered ascending by date.
    ///
    /// Rows sharing a date keep their store order; nothing is deduplicated.
    async fn all_measurements(&self) -> RepositoryResult<Vec<DatedReading>>;

    /// The `station` column of every row, in row order.
    ///
    /// May contain duplicates; callers that need a distinct set dedupe.
    async fn all_stations(&self) -> RepositoryResult<Vec<String>>;

    /// The maximum date in the store, or `None` when the store is empty.
    async fn latest_date(&self) -> RepositoryResult<Option<String>>;

    /// All `(date, temperature_observation)` pairs with `date >= since`,
    /// ordered ascending by date.
    async fn measurements_since(&self, since: &str) -> RepositoryResult<Vec<DatedReading>>;

    /// Temperature statistics over rows with `date >= start`.
    ///
    /// Rows without an observation are ignored.
    async fn aggregate_from(&self, start: &str) -> RepositoryResult<TemperatureStats>;

    /// Temperature statistics over rows with `start <= date <= end`.
    ///
    /// When `end < start` the window is empty and every statistic is `None`.
    async fn aggregate_range(&self, start: &str, end: &str) -> RepositoryResult<TemperatureStats>;
}
