//! Measurement rows and the temperature statistics computed over them.

use serde::{Deserialize, Serialize};

/// One station observation for one calendar day.
///
/// Optional values are `None` when the station did not measure them; an
/// unmeasured value is never represented as zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    /// Station code as recorded on the row
    pub station: String,
    /// Calendar date encoded as zero-padded `YYYY-MM-DD`
    pub date: String,
    /// Precipitation, absent when unmeasured
    pub precipitation: Option<f64>,
    /// Temperature observation in degrees, absent when unmeasured
    pub temperature_observation: Option<f64>,
}

impl Measurement {
    pub fn new(
        station: impl Into<String>,
        date: impl Into<String>,
        precipitation: Option<f64>,
        temperature_observation: Option<f64>,
    ) -> Self {
        Self {
            station: station.into(),
            date: date.into(),
            precipitation,
            temperature_observation,
        }
    }
}

/// Minimum, maximum and arithmetic mean of temperature observations.
///
/// Mirrors SQL aggregate semantics: over an empty set every field is `None`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TemperatureStats {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub avg: Option<f64>,
}

impl TemperatureStats {
    /// Statistics over no observations at all.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Fold a sequence of observations into min/max/avg in a single pass.
    pub fn from_observations<I>(observations: I) -> Self
    where
        I: IntoIterator<Item = f64>,
    {
        let mut count = 0usize;
        let mut sum = 0.0;
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;

        for value in observations {
            count += 1;
            sum += value;
            min = min.min(value);
            max = max.max(value);
        }

        if count == 0 {
            return Self::empty();
        }

        Self {
            min: Some(min),
            max: Some(max),
            avg: Some(sum / count as f64),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.min.is_none() && self.max.is_none() && self.avg.is_none()
    }
}
