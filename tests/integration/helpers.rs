//! Helper functions for integration tests

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use sensor_pipeline::{
    Reading,
    clock::ManualClock,
    config::PipelineConfig,
    monitors::readings::ReadingSource,
    pipeline::Pipeline,
    storage::{MemorySink, PipelineSinks, RecordSink, StorageError, StorageResult},
};

/// Normal readings except for the listed sequences, which carry pollution 80
pub struct ScriptedReadings {
    anomalies: HashSet<i64>,
}

impl ScriptedReadings {
    pub fn with_anomalies(anomalies: &[i64]) -> Self {
        Self {
            anomalies: anomalies.iter().copied().collect(),
        }
    }
}

impl ReadingSource for ScriptedReadings {
    fn next_reading(&mut self, sequence: i64, timestamp: i64) -> Reading {
        let pollution = if self.anomalies.contains(&sequence) {
            80.0
        } else {
            10.0
        };
        Reading::new(sequence, timestamp, 20.0, 33.0, pollution)
    }
}

/// Sink that rejects every append
pub struct BrokenSink;

#[async_trait]
impl RecordSink for BrokenSink {
    async fn append(&self, _line: &str) -> StorageResult<()> {
        Err(StorageError::Unavailable("broken sink".to_string()))
    }

    fn describe(&self) -> String {
        "broken".to_string()
    }
}

/// One in-memory sink per record
#[derive(Clone)]
pub struct MemoryRecords {
    pub generator: MemorySink,
    pub router: MemorySink,
    pub alerts: MemorySink,
    pub archive: MemorySink,
    pub archive_log: MemorySink,
    pub analysis: MemorySink,
}

impl MemoryRecords {
    pub fn new() -> Self {
        Self {
            generator: MemorySink::new("generator"),
            router: MemorySink::new("router"),
            alerts: MemorySink::new("alerts"),
            archive: MemorySink::new("archive"),
            archive_log: MemorySink::new("archive-log"),
            analysis: MemorySink::new("analysis"),
        }
    }

    pub fn sinks(&self) -> PipelineSinks {
        PipelineSinks {
            generator: Some(Arc::new(self.generator.clone())),
            router: Some(Arc::new(self.router.clone())),
            alerts: Arc::new(self.alerts.clone()),
            archive: Arc::new(self.archive.clone()),
            archive_log: Some(Arc::new(self.archive_log.clone())),
            analysis: Some(Arc::new(self.analysis.clone())),
        }
    }
}

pub fn test_config(messages: usize) -> PipelineConfig {
    PipelineConfig {
        messages,
        interval_ms: 1,
        channel_capacity: 4,
        ..Default::default()
    }
}

/// Pipeline over scripted readings and a virtual clock
pub fn scripted_pipeline(messages: usize, anomalies: &[i64], sinks: PipelineSinks) -> Pipeline {
    Pipeline::new(&test_config(messages), sinks)
        .with_source(ScriptedReadings::with_anomalies(anomalies))
        .with_clock(ManualClock::new(1_700_000_000, 2))
}

/// Sequence numbers of record lines in order
pub fn sequences(lines: &[String]) -> Vec<i64> {
    lines
        .iter()
        .filter_map(|line| {
            let rest = &line[line.find("seq=")? + 4..];
            rest[..rest.find(',')?].parse().ok()
        })
        .collect()
}
