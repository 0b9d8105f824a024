const PIPELINE_MESSAGES: &str = "PIPELINE_MESSAGES";

pub fn get_messages() -> Option<usize> {
    let messages_from_env = std::env::var(PIPELINE_MESSAGES);
    messages_from_env.ok()?.parse().ok()
}

const PIPELINE_INTERVAL_MS: &str = "PIPELINE_INTERVAL_MS";

pub fn get_interval_ms() -> Option<u64> {
    let interval_from_env = std::env::var(PIPELINE_INTERVAL_MS);
    interval_from_env.ok()?.parse().ok()
}

const PIPELINE_ANOMALY_PROBABILITY: &str = "PIPELINE_ANOMALY_PROBABILITY";

pub fn get_anomaly_probability() -> Option<f64> {
    let probability_from_env = std::env::var(PIPELINE_ANOMALY_PROBABILITY);
    probability_from_env.ok()?.parse().ok()
}

/// Round to two decimals, the precision of generated readings
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
