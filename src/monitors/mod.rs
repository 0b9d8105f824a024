pub mod anomaly;
pub mod readings;
