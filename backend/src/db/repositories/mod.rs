//! Repository implementations module.
//!
//! This module contains the implementations of [`MeasurementRepository`]:
//! - `sqlite`: SQLite implementation with Diesel and an r2d2 pool
//! - `local`: In-memory implementation for unit testing and local development
//!
//! [`MeasurementRepository`]: crate::db::repository::MeasurementRepository
pub mod local;
#[cfg(feature = "sqlite-repo")]
pub mod sqlite;

pub use local::LocalRepository;
#[cfg(feature = "sqlite-repo")]
pub use sqlite::{PoolStats, SqliteConfig, SqliteRepository};
