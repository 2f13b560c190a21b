use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::HarnessError;

/// Unit used when recording or displaying per-iteration times.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TimeUnit {
    #[serde(rename = "ns")]
    #[default]
    Nanosecond,
    #[serde(rename = "us")]
    Microsecond,
    #[serde(rename = "ms")]
    Millisecond,
    #[serde(rename = "s")]
    Second,
}

impl TimeUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeUnit::Nanosecond => "ns",
            TimeUnit::Microsecond => "us",
            TimeUnit::Millisecond => "ms",
            TimeUnit::Second => "s",
        }
    }

    fn nanos_per_unit(&self) -> f64 {
        match self {
            TimeUnit::Nanosecond => 1.0,
            TimeUnit::Microsecond => 1_000.0,
            TimeUnit::Millisecond => 1_000_000.0,
            TimeUnit::Second => 1_000_000_000.0,
        }
    }

    /// Expresses `duration` as a (fractional) count of this unit.
    pub fn from_duration(&self, duration: Duration) -> f64 {
        duration.as_nanos() as f64 / self.nanos_per_unit()
    }

    /// Converts a count of this unit back into a `Duration`.
    ///
    /// Negative and non-finite values become zero.
    pub fn to_duration(&self, value: f64) -> Duration {
        let nanos = value * self.nanos_per_unit();
        if !nanos.is_finite() || nanos <= 0.0 {
            return Duration::ZERO;
        }
        Duration::from_nanos(nanos.round() as u64)
    }

    /// Re-expresses `value`, given in this unit, in `target`.
    pub fn convert(&self, value: f64, target: TimeUnit) -> f64 {
        value * self.nanos_per_unit() / target.nanos_per_unit()
    }
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for TimeUnit {
    type Err = HarnessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ns" => Ok(TimeUnit::Nanosecond),
            "us" => Ok(TimeUnit::Microsecond),
            "ms" => Ok(TimeUnit::Millisecond),
            "s" => Ok(TimeUnit::Second),
            other => Err(HarnessError::UnknownTimeUnit(other.to_string())),
        }
    }
}
