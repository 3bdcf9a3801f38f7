//! Telemetry value carried through sequences.

use std::time::SystemTime;

/// One reading of a sensor.
#[derive(Clone, Debug, PartialEq)]
pub struct SensorSample {
  category: String,
  value: f64,
  timestamp: SystemTime,
}

impl SensorSample {
  /// A reading taken now.
  pub fn new(category: impl Into<String>, value: f64) -> Self {
    Self::at(category, value, SystemTime::now())
  }

  pub fn at(
    category: impl Into<String>,
    value: f64,
    timestamp: SystemTime,
  ) -> Self {
    SensorSample { category: category.into(), value, timestamp }
  }

  #[inline]
  pub fn category(&self) -> &str { &self.category }

  #[inline]
  pub fn value(&self) -> f64 { self.value }

  #[inline]
  pub fn timestamp(&self) -> SystemTime { self.timestamp }

  /// Returns a copy of this reading with `value` replaced.
  pub fn with_value(&self, value: f64) -> Self {
    SensorSample { value, ..self.clone() }
  }
}
