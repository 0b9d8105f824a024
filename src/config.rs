use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::util::{get_anomaly_probability, get_interval_ms, get_messages};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub pipeline: PipelineConfig,

    #[serde(default)]
    pub storage: StorageConfig,
}

/// Run parameters of the generator and the links
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Number of readings to generate before shutdown
    #[serde(default = "default_messages")]
    pub messages: usize,

    /// Delay between two emissions in milliseconds
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,

    /// Probability of forcing a reading's pollution to the anomaly value
    #[serde(default = "default_anomaly_probability")]
    pub anomaly_probability: f64,

    /// Seed for reproducible readings (random when absent)
    pub seed: Option<u64>,

    /// Buffer size of every link
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            messages: default_messages(),
            interval_ms: default_interval_ms(),
            anomaly_probability: default_anomaly_probability(),
            seed: None,
            channel_capacity: default_channel_capacity(),
        }
    }
}

/// Where the durable records are written
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory for the per-role logs
    #[serde(default = "default_log_dir")]
    pub log_dir: PathBuf,

    /// Archive record of normal readings
    #[serde(default = "default_archive_file")]
    pub archive_file: PathBuf,

    /// Whether the generator keeps an emission log
    #[serde(default = "default_emission_log")]
    pub emission_log: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            log_dir: default_log_dir(),
            archive_file: default_archive_file(),
            emission_log: default_emission_log(),
        }
    }
}

fn default_messages() -> usize {
    20
}

fn default_interval_ms() -> u64 {
    2000
}

fn default_anomaly_probability() -> f64 {
    0.10
}

fn default_channel_capacity() -> usize {
    32
}

fn default_log_dir() -> PathBuf {
    PathBuf::from("logs")
}

fn default_archive_file() -> PathBuf {
    PathBuf::from("archive_storage.txt")
}

fn default_emission_log() -> bool {
    true
}

impl Config {
    /// Load configuration from file, or use defaults if no file is given
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => read_config_file(path),
            None => Ok(Self::default()),
        }
    }

    /// Override run parameters from the environment
    ///
    /// Unset or unparsable variables leave the current value untouched.
    pub fn apply_env(&mut self) {
        if let Some(messages) = get_messages() {
            self.pipeline.messages = messages;
        }
        if let Some(interval_ms) = get_interval_ms() {
            self.pipeline.interval_ms = interval_ms;
        }
        if let Some(probability) = get_anomaly_probability() {
            self.pipeline.anomaly_probability = probability;
        }
    }

    pub fn validate(&self) -> Result<()> {
        let probability = self.pipeline.anomaly_probability;
        if !(0.0..=1.0).contains(&probability) {
            bail!("anomaly probability must be within [0, 1], got {probability}");
        }
        if self.pipeline.channel_capacity == 0 {
            bail!("channel capacity must be greater than 0");
        }
        Ok(())
    }
}

/// Read a config file, TOML for `.toml` files and JSON otherwise
pub fn read_config_file(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = match path.extension().and_then(|ext| ext.to_str()) {
        Some("toml") => toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?,
        _ => serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?,
    };

    trace!("loaded config: {config:?}");
    Ok(config)
}
