//! Analysis step run by the analyzer for every broadcast anomaly

use std::fmt;

use crate::Reading;
use crate::monitors::anomaly::{POLLUTION_LIMIT, TEMPERATURE_LIMIT};

/// Pluggable analysis of a single anomalous reading
pub trait AnomalyAnalysis: Send {
    fn analyze(&mut self, reading: &Reading) -> Finding;
}

/// Result of analyzing one anomaly
#[derive(Debug, Clone, PartialEq)]
pub struct Finding {
    pub sequence: i64,

    /// Amount by which pollution exceeds its limit (0 if within)
    pub pollution_excess: f64,

    /// Amount by which temperature exceeds its limit (0 if within)
    pub temperature_excess: f64,

    /// Number of anomalies analyzed so far, including this one
    pub seen: u64,
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "seq={} pollution +{:.2} temperature +{:.2} (anomaly #{})",
            self.sequence, self.pollution_excess, self.temperature_excess, self.seen
        )
    }
}

/// Measures how far a reading is past the classification limits
#[derive(Debug, Clone, Default)]
pub struct ThresholdAnalysis {
    seen: u64,
}

impl ThresholdAnalysis {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AnomalyAnalysis for ThresholdAnalysis {
    fn analyze(&mut self, reading: &Reading) -> Finding {
        self.seen += 1;

        Finding {
            sequence: reading.sequence,
            pollution_excess: (reading.pollution - POLLUTION_LIMIT).max(0.0),
            temperature_excess: (reading.temperature - TEMPERATURE_LIMIT).max(0.0),
            seen: self.seen,
        }
    }
}
