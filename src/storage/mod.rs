//! Durable record sinks
//!
//! This module provides a trait-based abstraction for the append-only records
//! kept by the persisting roles.
//!
//! ## Design
//!
//! - **Trait-based**: `RecordSink` is injected into each role at construction
//! - **Async**: appends are awaited inside the role loop
//! - **Single writer**: every record belongs to exactly one role
//!
//! ## Backends
//!
//! - **File**: append-mode file, flushed and synced on every line
//! - **Memory**: vector of lines, for tests and dry runs
//! - **Unavailable**: placeholder for a record that failed to open, rejects every line
//!
//! ## Record layout
//!
//! File-backed runs place one file per record under the configured log directory
//! (see [`RecordLayout`]).

pub mod backend;
pub mod error;
pub mod file;
pub mod memory;
pub mod unavailable;

use std::path::PathBuf;
use std::sync::Arc;

use tracing::error;

pub use backend::{RecordSink, SharedSink};
pub use error::{StorageError, StorageResult};
pub use file::FileSink;
pub use memory::MemorySink;
pub use unavailable::UnavailableSink;

use crate::config::StorageConfig;

/// Every sink a run needs, one per owning role
///
/// `None` disables an optional log.
#[derive(Clone)]
pub struct PipelineSinks {
    /// Generator emission log
    pub generator: Option<SharedSink>,

    /// Router classification log (`ANOMALY` / `NORMAL` lines)
    pub router: Option<SharedSink>,

    /// AlertSink durable alert record
    pub alerts: SharedSink,

    /// ArchiveSink durable archive record
    pub archive: SharedSink,

    /// ArchiveSink event log
    pub archive_log: Option<SharedSink>,

    /// Analyzer result log (`ANALYZED` lines)
    pub analysis: Option<SharedSink>,
}

impl PipelineSinks {
    /// Open file-backed sinks according to `config`
    ///
    /// A record that cannot be opened is logged and replaced by an
    /// [`UnavailableSink`], so its role still runs and counts every lost line.
    pub async fn open(config: &StorageConfig) -> Self {
        let layout = RecordLayout::from_config(config);

        let generator = if config.emission_log {
            Some(open_shared(layout.generator).await)
        } else {
            None
        };

        Self {
            generator,
            router: Some(open_shared(layout.router).await),
            alerts: open_shared(layout.alerts).await,
            archive: open_shared(layout.archive).await,
            archive_log: Some(open_shared(layout.archive_log).await),
            analysis: Some(open_shared(layout.analysis).await),
        }
    }
}

async fn open_shared(path: PathBuf) -> SharedSink {
    match FileSink::open(&path).await {
        Ok(sink) => Arc::new(sink),
        Err(e) => {
            error!("{e}; lines for this record will be dropped");
            Arc::new(UnavailableSink::new(path.display().to_string(), e.to_string()))
        }
    }
}

/// File locations of every record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordLayout {
    pub generator: PathBuf,
    pub router: PathBuf,
    pub alerts: PathBuf,
    pub archive: PathBuf,
    pub archive_log: PathBuf,
    pub analysis: PathBuf,
}

impl RecordLayout {
    pub fn from_config(config: &StorageConfig) -> Self {
        let dir = &config.log_dir;
        Self {
            generator: dir.join("generator.log"),
            router: dir.join("router.log"),
            alerts: dir.join("alerts.log"),
            archive: config.archive_file.clone(),
            archive_log: dir.join("archive.log"),
            analysis: dir.join("analysis.log"),
        }
    }
}
