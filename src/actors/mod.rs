//! Role actors of the sensor pipeline
//!
//! Each role runs as an independent tokio task and only holds the channel endpoints
//! of its declared peers.
//!
//! ## Topology
//!
//! ```text
//!   GeneratorActor
//!        │ readings
//!        ▼
//!   RouterActor ──────── to-archive ───────► ArchiveActor
//!        │ to-alert
//!        ▼
//!   AlertActor
//!        │ alert-broadcast
//!        ▼
//!   AnalyzerActor (+ any other subscriber)
//! ```
//!
//! ## Shutdown
//!
//! The generator emits exactly one `Message::Shutdown`. The router copies it to both
//! sinks, the alert sink re-broadcasts it, and every role stops after seeing it once:
//!
//! ```text
//! Running ──(shutdown)──► Terminating ──(forwarded where required)──► Stopped
//! ```
//!
//! A transport failure ends the role in `Failed` and is returned to the supervisor.
//! Persistence failures are logged and counted but never stop a role.

pub mod alert;
pub mod analyzer;
pub mod archive;
pub mod channel;
pub mod generator;
pub mod messages;
pub mod router;

use std::future::Future;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error};

use crate::error::{PipelineError, TransportError};
use crate::storage::RecordSink;

use messages::{Role, RoleReport, RoleState};

/// Publishes the lifecycle state of one role
#[derive(Debug)]
pub struct RoleStatus {
    role: Role,
    tx: watch::Sender<RoleState>,
}

impl RoleStatus {
    pub fn new(role: Role) -> Self {
        let (tx, _rx) = watch::channel(RoleState::Running);
        Self { role, tx }
    }

    pub fn subscribe(&self) -> watch::Receiver<RoleState> {
        self.tx.subscribe()
    }

    pub fn set(&self, state: RoleState) {
        let previous = self.tx.send_replace(state);
        debug!("{}: {previous:?} → {state:?}", self.role);
    }
}

/// Handle to a spawned role
pub struct RoleHandle {
    role: Role,
    state: watch::Receiver<RoleState>,
    task: JoinHandle<Result<RoleReport, TransportError>>,
}

impl RoleHandle {
    pub fn spawn<F>(role: Role, state: watch::Receiver<RoleState>, run: F) -> Self
    where
        F: Future<Output = Result<RoleReport, TransportError>> + Send + 'static,
    {
        Self {
            role,
            state,
            task: tokio::spawn(run),
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    /// Current lifecycle state
    pub fn state(&self) -> RoleState {
        *self.state.borrow()
    }

    /// Wait until the role reached `Stopped` or `Failed`
    pub async fn finished(&mut self) -> RoleState {
        match self.state.wait_for(RoleState::is_final).await {
            Ok(state) => *state,
            // the task is gone without publishing a final state
            Err(_) => RoleState::Failed,
        }
    }

    /// Wait for the role's task and collect its report
    pub async fn join(self) -> Result<RoleReport, PipelineError> {
        let role = self.role;
        match self.task.await {
            Ok(Ok(report)) => Ok(report),
            Ok(Err(source)) => Err(PipelineError::Transport { role, source }),
            Err(source) => Err(PipelineError::Aborted { role, source }),
        }
    }
}

/// Turn the outcome of a role loop into its final state and report
fn conclude(
    status: &RoleStatus,
    mut report: RoleReport,
    outcome: Result<(), TransportError>,
) -> Result<RoleReport, TransportError> {
    match outcome {
        Ok(()) => {
            status.set(RoleState::Stopped);
            report.state = RoleState::Stopped;
            Ok(report)
        }
        Err(e) => {
            error!("{} stopped on transport failure: {e}", report.role);
            status.set(RoleState::Failed);
            Err(e)
        }
    }
}

/// Append to the role's primary record, counting the outcome
async fn persist(sink: &dyn RecordSink, line: &str, report: &mut RoleReport) {
    match sink.append(line).await {
        Ok(()) => report.persisted += 1,
        Err(e) => {
            error!("failed to persist to {}: {e}", sink.describe());
            report.persist_failures += 1;
        }
    }
}

/// Append to an auxiliary log, only failures are counted
async fn log_line(sink: Option<&dyn RecordSink>, line: &str, report: &mut RoleReport) {
    let Some(sink) = sink else {
        return;
    };

    if let Err(e) = sink.append(line).await {
        error!("failed to write log {}: {e}", sink.describe());
        report.persist_failures += 1;
    }
}
