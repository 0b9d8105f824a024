//! ArchiveActor - Durably records normal readings
//!
//! Every normal reading is appended to the archive record (flushed before the next
//! receive) and to the optional archive event log. The shutdown is not forwarded:
//! the router already notified both sinks directly.

use tracing::{info, instrument, warn};

use crate::error::TransportError;
use crate::monitors::anomaly::Classification;
use crate::storage::SharedSink;

use super::channel::Inbox;
use super::messages::{Message, Role, RoleReport, RoleState};
use super::{RoleHandle, RoleStatus, conclude, log_line, persist};

pub struct ArchiveActor {
    /// `to-archive` link from the router
    inbox: Inbox,

    /// Durable archive record
    record: SharedSink,

    /// Optional event log
    log: Option<SharedSink>,

    status: RoleStatus,
}

impl ArchiveActor {
    pub fn new(inbox: Inbox, record: SharedSink, log: Option<SharedSink>) -> Self {
        Self {
            inbox,
            record,
            log,
            status: RoleStatus::new(Role::ArchiveSink),
        }
    }

    pub fn spawn(self) -> RoleHandle {
        let state = self.status.subscribe();
        RoleHandle::spawn(Role::ArchiveSink, state, self.run())
    }

    #[instrument(skip(self), fields(role = %Role::ArchiveSink, record = %self.record.describe()))]
    pub async fn run(mut self) -> Result<RoleReport, TransportError> {
        let mut report = RoleReport::new(Role::ArchiveSink);
        let outcome = self.store(&mut report).await;
        conclude(&self.status, report, outcome)
    }

    async fn store(&mut self, report: &mut RoleReport) -> Result<(), TransportError> {
        loop {
            let message = self.inbox.recv().await?;

            let Message::Data(reading) = message else {
                report.shutdowns += 1;
                self.status.set(RoleState::Terminating);
                info!("shutdown received");
                return Ok(());
            };

            report.received += 1;

            // the router only sends normal readings here
            if Classification::evaluate(&reading).is_anomaly() {
                warn!(
                    sequence = reading.sequence,
                    "refusing to archive anomalous reading"
                );
                report.anomalies += 1;
                continue;
            }
            report.normals += 1;

            let line = message.to_string();
            persist(self.record.as_ref(), &line, report).await;
            log_line(self.log.as_deref(), &line, report).await;

            info!(sequence = reading.sequence, "stored normal reading");
        }
    }
}
