//! Database module for the measurement store.
//!
//! This module provides abstractions for reading climate measurements via the
//! Repository pattern, allowing storage backends to be swapped easily.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  Application Layer (REST API)                           │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Service Layer (services.rs) - Query Logic              │
//! │  - Station deduplication                                │
//! │  - Trailing-year cutoff                                 │
//! │  - Aggregate records                                    │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Repository Trait (repository/) - Abstract Interface    │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//!     ┌───────────────┴────────────────┐
//!     │                                │
//! ┌───▼──────────────┐     ┌───────────▼─────────────┐
//! │ SQLite (Diesel)  │     │ Local Repository        │
//! │ r2d2 pool        │     │ (in-memory)             │
//! └──────────────────┘     └─────────────────────────┘
//! ```
//!
//! # Recommended Usage
//!
//! ```ignore
//! use climate_api::db::{services, RepositoryFactory};
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let repo = RepositoryFactory::from_env().await?;
//!     let stations = services::station_listing(repo.as_ref()).await?;
//!     Ok(())
//! }
//! ```

#[cfg(not(any(feature = "sqlite-repo", feature = "local-repo")))]
compile_error!("Enable at least one repository backend feature.");

pub mod factory;
pub mod repo_config;
pub mod repositories;
pub mod repository;
pub mod services;


// ==================== Service Layer ====================

pub use services::{
    cutoff_date, health_check, precipitation_listing, recent_temperature_observations,
    station_listing, temperature_summary_from, temperature_summary_range, ServiceError,
    ServiceResult,
};

// ==================== Repository Pattern Exports ====================

pub use repo_config::RepositoryConfig;

pub use factory::{RepositoryFactory, RepositoryType};
pub use repositories::LocalRepository;
#[cfg(feature = "sqlite-repo")]
pub use repositories::{PoolStats, SqliteConfig, SqliteRepository};
pub use repository::{
    DatedReading, ErrorContext, MeasurementRepository, RepositoryError, RepositoryResult,
};
