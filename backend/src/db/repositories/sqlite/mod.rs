//! SQLite repository implementation using Diesel.
//!
//! Reads the `measurement` table of an externally populated SQLite database
//! (the Hawaii climate dataset by default). The table is bound statically in
//! [`schema`]; nothing is discovered at runtime.
//!
//! ## Sessions
//!
//! Every repository call checks a connection out of an r2d2 pool inside
//! `spawn_blocking`. The pooled connection is returned to the pool when it is
//! dropped at the end of the call, on success and on error alike. Calls are
//! attempted once; there is no retry policy.
//!
//! ## Configuration
//!
//! Environment variables:
//! - `DATABASE_URL` or `CLIMATE_DATABASE_URL`: database path (default: `Resources/hawaii.sqlite`)
//! - `SQLITE_POOL_MAX`: Maximum pool size (default: 4)
//! - `SQLITE_CONN_TIMEOUT_SEC`: Connection timeout in seconds (default: 30)

use async_trait::async_trait;
use diesel::dsl::{avg, max, min};
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sql_query;
use diesel::sqlite::SqliteConnection;
use log::debug;
use std::path::Path;
use std::time::Duration;
use tokio::task;

use crate::db::repository::{
    DatedReading, ErrorContext, MeasurementRepository, RepositoryError, RepositoryResult,
};
use crate::models::TemperatureStats;

mod schema;

use schema::measurement;

type SqlitePool = Pool<ConnectionManager<SqliteConnection>>;

pub const DEFAULT_DATABASE_URL: &str = "Resources/hawaii.sqlite";

/// Configuration for connecting to the SQLite measurement store.
#[derive(Debug, Clone)]
pub struct SqliteConfig {
    /// Database path or `file:` URI
    pub database_url: String,
    /// Maximum number of connections in the pool
    pub max_pool_size: u32,
    /// Connection timeout in seconds
    pub connection_timeout_sec: u64,
}

impl Default for SqliteConfig {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            max_pool_size: 4,
            connection_timeout_sec: 30,
        }
    }
}

impl SqliteConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    /// - `DATABASE_URL` or `CLIMATE_DATABASE_URL`: database path or `file:` URI
    ///   (default: `Resources/hawaii.sqlite`)
    /// - `SQLITE_POOL_MAX`: Maximum pool size (default: 4)
    /// - `SQLITE_CONN_TIMEOUT_SEC`: Connection timeout in seconds (default: 30)
    pub fn from_env() -> Result<Self, String> {
        let defaults = Self::default();

        let database_url = std::env::var("DATABASE_URL")
            .or_else(|_| std::env::var("CLIMATE_DATABASE_URL"))
            .unwrap_or(defaults.database_url);

        let max_pool_size = std::env::var("SQLITE_POOL_MAX")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(defaults.max_pool_size);
        if max_pool_size == 0 {
            return Err("SQLITE_POOL_MAX must be at least 1".to_string());
        }

        let connection_timeout_sec = std::env::var("SQLITE_CONN_TIMEOUT_SEC")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(defaults.connection_timeout_sec);

        Ok(Self {
            database_url,
            max_pool_size,
            connection_timeout_sec,
        })
    }

    /// Create a new configuration with a database URL.
    pub fn with_url(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            ..Default::default()
        }
    }

    /// Filesystem path of the database, when the URL names one.
    ///
    /// Handles plain paths and `file:` URIs (`file:data.db`, `file:/abs.db`,
    /// `file:///abs.db`, `file://localhost/abs.db`, query string ignored).
    /// In-memory databases have no path. Percent-escapes are not decoded.
    fn file_path(&self) -> Option<&str> {
        let url = self.database_url.as_str();
        if url.is_empty() || url == ":memory:" {
            return None;
        }
        let Some(uri) = url.strip_prefix("file:") else {
            return Some(url);
        };

        let (path, query) = uri.split_once('?').unwrap_or((uri, ""));
        if path.is_empty() || path == ":memory:" || query.split('&').any(|p| p == "mode=memory") {
            return None;
        }
        match path.strip_prefix("//") {
            Some(rest) => Some(rest.strip_prefix("localhost").unwrap_or(rest)),
            None => Some(path),
        }
    }
}

/// Pool health statistics.
#[derive(Debug, Clone, Default)]
pub struct PoolStats {
    /// Number of connections currently checked out
    pub connections_in_use: u32,
    /// Number of idle connections
    pub idle_connections: u32,
    /// Total number of connections in the pool
    pub total_connections: u32,
    /// Maximum pool size
    pub max_size: u32,
}

/// Diesel-backed, read-only repository over the SQLite `measurement` table.
#[derive(Clone, Debug)]
pub struct SqliteRepository {
    pool: SqlitePool,
    config: SqliteConfig,
}

impl SqliteRepository {
    /// Open a connection pool against an existing database.
    ///
    /// # Returns
    /// * `Ok(SqliteRepository)` on success
    /// * `Err(RepositoryError)` if the file is missing or the pool cannot be built
    pub fn new(config: SqliteConfig) -> RepositoryResult<Self> {
        // The store is never created here; a missing file is a setup error
        if let Some(path) = config.file_path() {
            if !Path::new(path).is_file() {
                return Err(RepositoryError::configuration(format!(
                    "Database file not found: {}",
                    path
                ))
                .with_context(ErrorContext::new("create_pool").with_entity("measurement")));
            }
        }

        let manager = ConnectionManager::<SqliteConnection>::new(&config.database_url);

        let pool = Pool::builder()
            .max_size(config.max_pool_size)
            .connection_timeout(Duration::from_secs(config.connection_timeout_sec))
            .test_on_check_out(true)
            .build(manager)
            .map_err(|e| {
                RepositoryError::connection(e.to_string()).with_context(
                    ErrorContext::new("create_pool")
                        .with_details(format!("max_size={}", config.max_pool_size)),
                )
            })?;

        debug!(
            "Opened SQLite pool for {} (max_size={})",
            config.database_url, config.max_pool_size
        );

        Ok(Self { pool, config })
    }

    /// Run `f` against a pooled connection on the blocking thread pool.
    async fn with_conn<T, F>(&self, operation: &'static str, f: F) -> RepositoryResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut SqliteConnection) -> QueryResult<T> + Send + 'static,
    {
        let pool = self.pool.clone();

        task::spawn_blocking(move || {
            let mut conn = pool
                .get()
                .map_err(|e| RepositoryError::from(e).with_operation(operation))?;
            f(&mut conn).map_err(|e| RepositoryError::from(e).with_operation(operation))
        })
        .await
        .map_err(|e| {
            RepositoryError::internal(format!("Task join error: {}", e))
                .with_context(ErrorContext::new("spawn_blocking"))
        })?
    }

    /// Get pool health statistics.
    pub fn get_pool_stats(&self) -> PoolStats {
        let state = self.pool.state();
        PoolStats {
            connections_in_use: state.connections - state.idle_connections,
            idle_connections: state.idle_connections,
            total_connections: state.connections,
            max_size: self.config.max_pool_size,
        }
    }

    pub fn config(&self) -> &SqliteConfig {
        &self.config
    }
}

fn aggregate_row((min, max, avg): (Option<f64>, Option<f64>, Option<f64>)) -> TemperatureStats {
    TemperatureStats { min, max, avg }
}

#[async_trait]
impl MeasurementRepository for SqliteRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        self.with_conn("health_check", |conn| {
            sql_query("SELECT 1").execute(conn).map(|_| true)
        })
        .await
    }

    async fn all_measurements(&self) -> RepositoryResult<Vec<DatedReading>> {
        self.with_conn("all_measurements", |conn| {
            measurement::table
                .filter(measurement::date.is_not_null())
                .select((measurement::date.assume_not_null(), measurement::prcp))
                .order((measurement::date.asc(), measurement::id.asc()))
                .load::<(String, Option<f64>)>(conn)
        })
        .await
    }

    async fn all_stations(&self) -> RepositoryResult<Vec<String>> {
        self.with_conn("all_stations", |conn| {
            measurement::table
                .filter(measurement::station.is_not_null())
                .select(measurement::station.assume_not_null())
                .order(measurement::id.asc())
                .load::<String>(conn)
        })
        .await
    }

    async fn latest_date(&self) -> RepositoryResult<Option<String>> {
        self.with_conn("latest_date", |conn| {
            measurement::table
                .select(max(measurement::date))
                .get_result::<Option<String>>(conn)
        })
        .await
    }

    async fn measurements_since(&self, since: &str) -> RepositoryResult<Vec<DatedReading>> {
        let since = since.to_string();
        self.with_conn("measurements_since", move |conn| {
            measurement::table
                .filter(measurement::date.ge(since))
                .select((measurement::date.assume_not_null(), measurement::tobs))
                .order((measurement::date.asc(), measurement::id.asc()))
                .load::<(String, Option<f64>)>(conn)
        })
        .await
    }

    async fn aggregate_from(&self, start: &str) -> RepositoryResult<TemperatureStats> {
        let start = start.to_string();
        self.with_conn("aggregate_from", move |conn| {
            measurement::table
                .filter(measurement::date.ge(start))
                .select((
                    min(measurement::tobs),
                    max(measurement::tobs),
                    avg(measurement::tobs),
                ))
                .get_result::<(Option<f64>, Option<f64>, Option<f64>)>(conn)
                .map(aggregate_row)
        })
        .await
    }

    async fn aggregate_range(&self, start: &str, end: &str) -> RepositoryResult<TemperatureStats> {
        let start = start.to_string();
        let end = end.to_string();
        self.with_conn("aggregate_range", move |conn| {
            measurement::table
                .filter(measurement::date.ge(start))
                .filter(measurement::date.le(end))
                .select((
                    min(measurement::tobs),
                    max(measurement::tobs),
                    avg(measurement::tobs),
                ))
                .get_result::<(Option<f64>, Option<f64>, Option<f64>)>(conn)
                .map(aggregate_row)
        })
        .await
    }
}
