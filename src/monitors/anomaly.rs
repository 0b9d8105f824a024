use crate::Reading;

/// Pollution strictly above this value is anomalous
pub const POLLUTION_LIMIT: f64 = 50.0;

/// Temperature strictly above this value is anomalous
pub const TEMPERATURE_LIMIT: f64 = 35.0;

/// Outcome of classifying a single reading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Normal,
    Anomaly,
}

impl Classification {
    /// A reading is anomalous iff pollution > 50.0 or temperature > 35.0
    ///
    /// Both limits are exclusive.
    pub fn evaluate(reading: &Reading) -> Classification {
        if reading.pollution > POLLUTION_LIMIT || reading.temperature > TEMPERATURE_LIMIT {
            return Classification::Anomaly;
        }

        Classification::Normal
    }

    pub fn is_anomaly(&self) -> bool {
        *self == Classification::Anomaly
    }
}
