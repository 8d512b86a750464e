//! Repository trait definitions for the measurement store.
//!
//! - [`error`]: Error types for repository operations
//! - [`measurement`]: The read-only capability set over measurement rows

pub mod error;
pub mod measurement;

pub use error::{ErrorContext, RepositoryError, RepositoryResult};
pub use measurement::{DatedReading, MeasurementRepository};
