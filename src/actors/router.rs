//! RouterActor - Classifies readings and routes them to one of the sinks
//!
//! ```text
//! readings ──► classify ──┬─ Anomaly  ──► to-alert    (log "ANOMALY ...")
//!                         ├─ Normal   ──► to-archive  (log "NORMAL ...")
//!                         └─ Shutdown ──► to-alert + to-archive, stop
//! ```

use tracing::{info, instrument, trace};

use crate::error::TransportError;
use crate::monitors::anomaly::Classification;
use crate::storage::SharedSink;

use super::channel::{Inbox, Outbox};
use super::messages::{LineTag, Message, Role, RoleReport, RoleState};
use super::{RoleHandle, RoleStatus, conclude, persist};

pub struct RouterActor {
    /// `readings` link from the generator
    readings: Inbox,

    /// `to-alert` link to the alert sink
    to_alert: Outbox,

    /// `to-archive` link to the archive sink
    to_archive: Outbox,

    /// Optional classification log
    log: Option<SharedSink>,

    status: RoleStatus,
}

impl RouterActor {
    pub fn new(
        readings: Inbox,
        to_alert: Outbox,
        to_archive: Outbox,
        log: Option<SharedSink>,
    ) -> Self {
        Self {
            readings,
            to_alert,
            to_archive,
            log,
            status: RoleStatus::new(Role::Router),
        }
    }

    pub fn spawn(self) -> RoleHandle {
        let state = self.status.subscribe();
        RoleHandle::spawn(Role::Router, state, self.run())
    }

    /// Run until the shutdown message has been relayed to both sinks
    #[instrument(skip(self), fields(role = %Role::Router))]
    pub async fn run(mut self) -> Result<RoleReport, TransportError> {
        let mut report = RoleReport::new(Role::Router);
        let outcome = self.route(&mut report).await;
        conclude(&self.status, report, outcome)
    }

    async fn route(&mut self, report: &mut RoleReport) -> Result<(), TransportError> {
        loop {
            let message = self.readings.recv().await?;

            let reading = match message {
                Message::Shutdown { .. } => {
                    report.shutdowns += 1;
                    self.status.set(RoleState::Terminating);

                    self.to_alert.send(message).await?;
                    self.to_archive.send(message).await?;

                    info!("shutdown received; forwarded to both sinks");
                    return Ok(());
                }
                Message::Data(reading) => reading,
            };

            report.received += 1;

            let tag = match Classification::evaluate(&reading) {
                Classification::Anomaly => {
                    self.to_alert.send(message).await?;
                    report.anomalies += 1;
                    info!(sequence = reading.sequence, "anomaly -> {}", Role::AlertSink);
                    LineTag::Anomaly
                }
                Classification::Normal => {
                    self.to_archive.send(message).await?;
                    report.normals += 1;
                    info!(sequence = reading.sequence, "normal -> {}", Role::ArchiveSink);
                    LineTag::Normal
                }
            };
            report.forwarded += 1;

            if let Some(log) = &self.log {
                persist(log.as_ref(), &message.tagged(tag), report).await;
            }

            trace!("routed seq={} as {tag}", reading.sequence);
        }
    }
}
