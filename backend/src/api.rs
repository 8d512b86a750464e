//! Public API surface for the climate backend.
//!
//! This file consolidates the DTO types produced by the query service and
//! serialized by the HTTP layer.

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use crate::models::TemperatureStats;

/// Station identifier (the `station` code carried by measurement rows).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StationId(pub String);

impl StationId {
    pub fn new(value: impl Into<String>) -> Self {
        StationId(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for StationId {
    fn from(value: String) -> Self {
        StationId(value)
    }
}

/// A reading keyed by its date.
///
/// Serializes as the single-entry object `{"<date>": value}`; an absent
/// reading serializes as `null`.
#[derive(Debug, Clone, PartialEq)]
pub struct DatedValue {
    pub date: String,
    pub value: Option<f64>,
}

impl DatedValue {
    pub fn new(date: impl Into<String>, value: Option<f64>) -> Self {
        Self {
            date: date.into(),
            value,
        }
    }
}

impl From<(String, Option<f64>)> for DatedValue {
    fn from((date, value): (String, Option<f64>)) -> Self {
        Self { date, value }
    }
}

impl Serialize for DatedValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(&self.date, &self.value)?;
        map.end()
    }
}

/// Aggregate record: min, max and mean temperature over a date window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemperatureSummary {
    /// Lower bound exactly as supplied by the caller
    pub start_date: String,
    /// Upper bound, present only for range queries
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    pub temp_min: Option<f64>,
    pub temp_max: Option<f64>,
    pub temp_avg: Option<f64>,
}

impl TemperatureSummary {
    /// Summary for an open-ended window starting at `start`.
    pub fn from_start(start: impl Into<String>, stats: TemperatureStats) -> Self {
        Self {
            start_date: start.into(),
            end_date: None,
            temp_min: stats.min,
            temp_max: stats.max,
            temp_avg: stats.avg,
        }
    }

    /// Summary for the closed window `[start, end]`.
    pub fn for_range(
        start: impl Into<String>,
        end: impl Into<String>,
        stats: TemperatureStats,
    ) -> Self {
        Self {
            end_date: Some(end.into()),
            ..Self::from_start(start, stats)
        }
    }

    pub fn stats(&self) -> TemperatureStats {
        TemperatureStats {
            min: self.temp_min,
            max: self.temp_max,
            avg: self.temp_avg,
        }
    }
}

#[cfg(test)]
#[path = "api_tests.rs"]
mod api_tests;
