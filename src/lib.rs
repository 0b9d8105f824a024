pub mod actors;
pub mod analysis;
pub mod clock;
pub mod config;
pub mod error;
pub mod monitors;
pub mod pipeline;
pub mod storage;
pub mod util;

/// A single sensor sample as produced by the generator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reading {
    /// Ascending per generator, starting at 0
    pub sequence: i64,

    /// Seconds since epoch, assigned at generation time
    pub timestamp: i64,

    /// Advisory range [10, 30]
    pub temperature: f64,

    /// Advisory range [30, 37]
    pub salinity: f64,

    /// Advisory range [0, 25], forced to 80 for synthetic anomalies
    pub pollution: f64,
}

impl Reading {
    pub fn new(
        sequence: i64,
        timestamp: i64,
        temperature: f64,
        salinity: f64,
        pollution: f64,
    ) -> Self {
        Self {
            sequence,
            timestamp,
            temperature,
            salinity,
            pollution,
        }
    }
}
