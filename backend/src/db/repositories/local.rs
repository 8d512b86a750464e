//! In-memory local repository implementation.
//!
//! This module provides a local implementation of [`MeasurementRepository`]
//! suitable for unit testing and local development. Rows live in a `Vec`
//! behind a reader/writer lock, giving fast, deterministic and isolated
//! execution.
//!
//! Sessions are modelled explicitly: every query opens a [`LocalSession`]
//! guard that is counted until dropped, so tests can assert that no code path
//! leaves a session open.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use crate::db::repository::{
    DatedReading, ErrorContext, MeasurementRepository, RepositoryError, RepositoryResult,
};
use crate::models::{Measurement, TemperatureStats};

/// In-memory local repository.
///
/// # Example
/// ```
/// use climate_api::db::repositories::LocalRepository;
/// use climate_api::models::Measurement;
///
/// let repo = LocalRepository::with_measurements(vec![
///     Measurement::new("USC00519397", "2010-01-01", Some(0.08), Some(65.0)),
/// ]);
/// assert_eq!(repo.len(), 1);
/// ```
#[derive(Clone, Default)]
pub struct LocalRepository {
    inner: Arc<LocalData>,
}

struct LocalData {
    measurements: RwLock<Vec<Measurement>>,
    // Connection health
    is_healthy: AtomicBool,
    fail_queries: AtomicBool,
    active_sessions: AtomicUsize,
}

impl Default for LocalData {
    fn default() -> Self {
        Self {
            measurements: RwLock::new(Vec::new()),
            is_healthy: AtomicBool::new(true),
            fail_queries: AtomicBool::new(false),
            active_sessions: AtomicUsize::new(0),
        }
    }
}

/// An open session against the local store; released on drop.
struct LocalSession<'a> {
    data: &'a LocalData,
}

impl Drop for LocalSession<'_> {
    fn drop(&mut self) {
        self.data.active_sessions.fetch_sub(1, Ordering::SeqCst);
    }
}

impl LocalRepository {
    /// Create a new empty local repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a repository pre-populated with `measurements`, in the given order.
    pub fn with_measurements(measurements: impl IntoIterator<Item = Measurement>) -> Self {
        let repo = Self::new();
        repo.inner.measurements.write().extend(measurements);
        repo
    }

    /// Append a row. Used to set up fixtures; the query service never writes.
    pub fn insert(&self, measurement: Measurement) {
        self.inner.measurements.write().push(measurement);
    }

    /// Clear all data from the repository.
    pub fn clear(&self) {
        self.inner.measurements.write().clear();
    }

    /// Number of stored rows.
    pub fn len(&self) -> usize {
        self.inner.measurements.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Set the health status for testing connection failures.
    ///
    /// An unhealthy repository refuses to open sessions.
    pub fn set_healthy(&self, healthy: bool) {
        self.inner.is_healthy.store(healthy, Ordering::SeqCst);
    }

    /// Make every query fail after its session has been opened.
    pub fn set_fail_queries(&self, fail: bool) {
        self.inner.fail_queries.store(fail, Ordering::SeqCst);
    }

    /// Number of sessions currently held open.
    pub fn active_sessions(&self) -> usize {
        self.inner.active_sessions.load(Ordering::SeqCst)
    }

    fn open_session(&self, operation: &str) -> RepositoryResult<LocalSession<'_>> {
        if !self.inner.is_healthy.load(Ordering::SeqCst) {
            return Err(RepositoryError::connection("Local repository is unavailable")
                .with_context(ErrorContext::new(operation).with_entity("measurement")));
        }
        self.inner.active_sessions.fetch_add(1, Ordering::SeqCst);
        Ok(LocalSession { data: &self.inner })
    }

    /// Run `f` over the stored rows inside a session.
    fn with_session<T, F>(&self, operation: &str, f: F) -> RepositoryResult<T>
    where
        F: FnOnce(&[Measurement]) -> T,
    {
        let _session = self.open_session(operation)?;
        if self.inner.fail_queries.load(Ordering::SeqCst) {
            return Err(RepositoryError::query("Simulated query failure")
                .with_context(ErrorContext::new(operation).with_entity("measurement")));
        }
        let rows = self.inner.measurements.read();
        Ok(f(&rows))
    }
}

/// Rows ordered ascending by date; equal dates keep insertion order.
fn by_date(rows: &[Measurement]) -> Vec<&Measurement> {
    let mut sorted: Vec<&Measurement> = rows.iter().collect();
    sorted.sort_by(|a, b| a.date.cmp(&b.date));
    sorted
}

fn stats_where<P>(rows: &[Measurement], in_window: P) -> TemperatureStats
where
    P: Fn(&str) -> bool,
{
    TemperatureStats::from_observations(
        rows.iter()
            .filter(|m| in_window(&m.date))
            .filter_map(|m| m.temperature_observation),
    )
}

#[async_trait]
impl MeasurementRepository for LocalRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        self.with_session("health_check", |_| true)
    }

    async fn all_measurements(&self) -> RepositoryResult<Vec<DatedReading>> {
        self.with_session("all_measurements", |rows| {
            by_date(rows)
                .into_iter()
                .map(|m| (m.date.clone(), m.precipitation))
                .collect()
        })
    }

    async fn all_stations(&self) -> RepositoryResult<Vec<String>> {
        self.with_session("all_stations", |rows| {
            rows.iter().map(|m| m.station.clone()).collect()
        })
    }

    async fn latest_date(&self) -> RepositoryResult<Option<String>> {
        self.with_session("latest_date", |rows| {
            rows.iter().map(|m| m.date.as_str()).max().map(str::to_string)
        })
    }

    async fn measurements_since(&self, since: &str) -> RepositoryResult<Vec<DatedReading>> {
        self.with_session("measurements_since", |rows| {
            by_date(rows)
                .into_iter()
                .filter(|m| m.date.as_str() >= since)
                .map(|m| (m.date.clone(), m.temperature_observation))
                .collect()
        })
    }

    async fn aggregate_from(&self, start: &str) -> RepositoryResult<TemperatureStats> {
        self.with_session("aggregate_from", |rows| {
            stats_where(rows, |date| date >= start)
        })
    }

    async fn aggregate_range(&self, start: &str, end: &str) -> RepositoryResult<TemperatureStats> {
        self.with_session("aggregate_range", |rows| {
            stats_where(rows, |date| date >= start && date <= end)
        })
    }
}
