//! Reading sources for the generator
//!
//! The generator only decides *when* and with which sequence/timestamp a reading is
//! produced; the values come from a [`ReadingSource`].

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::Reading;
use crate::util::round2;

/// Pollution value used to synthesize an anomaly
pub const FORCED_POLLUTION: f64 = 80.0;

pub trait ReadingSource: Send {
    /// Produce the reading for `sequence`, stamped with `timestamp`
    fn next_reading(&mut self, sequence: i64, timestamp: i64) -> Reading;
}

/// Uniformly distributed readings with occasional forced anomalies
///
/// - temperature in [10, 30]
/// - salinity in [30, 37]
/// - pollution in [0, 25], replaced by 80 with `anomaly_probability`
///
/// Values are rounded to two decimals.
#[derive(Debug, Clone)]
pub struct RandomReadings {
    rng: StdRng,
    anomaly_probability: f64,
}

impl RandomReadings {
    /// `seed` makes the sequence of readings reproducible
    pub fn new(anomaly_probability: f64, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        // NaN would panic in `random_bool`
        let anomaly_probability = if anomaly_probability.is_finite() {
            anomaly_probability.clamp(0.0, 1.0)
        } else {
            0.0
        };

        Self {
            rng,
            anomaly_probability,
        }
    }
}

impl ReadingSource for RandomReadings {
    fn next_reading(&mut self, sequence: i64, timestamp: i64) -> Reading {
        let temperature = round2(10.0 + self.rng.random::<f64>() * 20.0);
        let salinity = round2(30.0 + self.rng.random::<f64>() * 7.0);
        let mut pollution = round2(self.rng.random::<f64>() * 25.0);

        if self.rng.random_bool(self.anomaly_probability) {
            pollution = FORCED_POLLUTION;
        }

        Reading {
            sequence,
            timestamp,
            temperature,
            salinity,
            pollution,
        }
    }
}
