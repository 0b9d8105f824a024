//! Pipeline supervisor
//!
//! Wires the fixed topology, spawns one task per role and collects their reports.
//!
//! ```text
//! Generator ─readings─► Router ─to-alert──► AlertSink ─alert-broadcast─► Analyzer
//!                              └─to-archive─► ArchiveSink
//! ```

use std::time::Duration;

use futures::future::join_all;
use tracing::{debug, error, info, instrument};

use crate::actors::RoleHandle;
use crate::actors::alert::AlertActor;
use crate::actors::analyzer::AnalyzerActor;
use crate::actors::archive::ArchiveActor;
use crate::actors::channel::{Broadcast, link};
use crate::actors::generator::GeneratorActor;
use crate::actors::messages::{Role, RoleReport, RoleState, Topic};
use crate::actors::router::RouterActor;
use crate::analysis::{AnomalyAnalysis, ThresholdAnalysis};
use crate::clock::{Clock, IntervalClock};
use crate::config::PipelineConfig;
use crate::error::{PipelineError, PipelineResult};
use crate::monitors::readings::{RandomReadings, ReadingSource};
use crate::storage::PipelineSinks;

/// Abort unless every role can take part in the run
pub fn ensure_roles(available: usize) -> PipelineResult<()> {
    if available < Role::COUNT {
        return Err(PipelineError::InsufficientRoles {
            available,
            required: Role::COUNT,
        });
    }
    Ok(())
}

/// A configured but not yet started pipeline
pub struct Pipeline {
    messages: usize,
    channel_capacity: usize,
    source: Box<dyn ReadingSource>,
    clock: Box<dyn Clock>,
    analysis: Box<dyn AnomalyAnalysis>,
    sinks: PipelineSinks,
}

impl Pipeline {
    /// Pipeline with random readings, wall-clock pacing and threshold analysis
    pub fn new(config: &PipelineConfig, sinks: PipelineSinks) -> Self {
        Self {
            messages: config.messages,
            channel_capacity: config.channel_capacity.max(1),
            source: Box::new(RandomReadings::new(
                config.anomaly_probability,
                config.seed,
            )),
            clock: Box::new(IntervalClock::new(Duration::from_millis(
                config.interval_ms,
            ))),
            analysis: Box::new(ThresholdAnalysis::new()),
            sinks,
        }
    }

    pub fn with_source(mut self, source: impl ReadingSource + 'static) -> Self {
        self.source = Box::new(source);
        self
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn with_analysis(mut self, analysis: impl AnomalyAnalysis + 'static) -> Self {
        self.analysis = Box::new(analysis);
        self
    }

    /// Wire every link and spawn the five roles
    ///
    /// Downstream roles are spawned first so every receiver exists before the
    /// generator starts sending.
    pub fn spawn(self) -> RunningPipeline {
        let capacity = self.channel_capacity;

        let (readings_tx, readings_rx) = link(Topic::Readings, capacity);
        let (alert_tx, alert_rx) = link(Topic::ToAlert, capacity);
        let (archive_tx, archive_rx) = link(Topic::ToArchive, capacity);

        let mut broadcast = Broadcast::new(capacity);
        let analyzer_rx = broadcast.subscribe();

        let analyzer =
            AnalyzerActor::new(analyzer_rx, self.analysis, self.sinks.analysis).spawn();
        let archive =
            ArchiveActor::new(archive_rx, self.sinks.archive, self.sinks.archive_log).spawn();
        let alert = AlertActor::new(alert_rx, broadcast, self.sinks.alerts).spawn();
        let router = RouterActor::new(readings_rx, alert_tx, archive_tx, self.sinks.router).spawn();
        let generator = GeneratorActor::new(
            self.messages,
            self.source,
            self.clock,
            readings_tx,
            self.sinks.generator,
        )
        .spawn();

        debug!("spawned {} roles", Role::COUNT);

        RunningPipeline {
            handles: vec![generator, router, alert, archive, analyzer],
        }
    }

    /// Spawn the pipeline and wait until every role has stopped
    pub async fn run(self) -> PipelineResult<PipelineReport> {
        self.spawn().join().await
    }
}

/// Handles of a started pipeline, in spawn order of the topology
pub struct RunningPipeline {
    handles: Vec<RoleHandle>,
}

impl RunningPipeline {
    /// Current state of every role
    pub fn states(&self) -> Vec<(Role, RoleState)> {
        self.handles
            .iter()
            .map(|handle| (handle.role(), handle.state()))
            .collect()
    }

    /// Wait for every role
    ///
    /// All roles are awaited even if one fails; every error is logged and the
    /// first one is returned.
    #[instrument(skip(self))]
    pub async fn join(self) -> PipelineResult<PipelineReport> {
        let results = join_all(self.handles.into_iter().map(RoleHandle::join)).await;

        let mut reports = Vec::with_capacity(results.len());
        let mut first_error = None;

        for result in results {
            match result {
                Ok(report) => reports.push(report),
                Err(e) => {
                    error!("{e}");
                    first_error.get_or_insert(e);
                }
            }
        }

        if let Some(e) = first_error {
            return Err(e);
        }

        info!("all {} roles stopped", reports.len());
        Ok(PipelineReport { reports })
    }
}

/// Reports of every role after a clean run
#[derive(Debug, Clone)]
pub struct PipelineReport {
    reports: Vec<RoleReport>,
}

impl PipelineReport {
    pub fn role(&self, role: Role) -> Option<&RoleReport> {
        self.reports.iter().find(|report| report.role == role)
    }

    pub fn reports(&self) -> &[RoleReport] {
        &self.reports
    }

    pub fn all_stopped(&self) -> bool {
        self.reports.len() == Role::COUNT
            && self
                .reports
                .iter()
                .all(|report| report.state == RoleState::Stopped)
    }
}
