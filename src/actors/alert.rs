//! AlertActor - Persists anomalies and re-broadcasts every message
//!
//! The broadcast does double duty: a `Data` broadcast announces a new anomaly, the
//! `Shutdown` broadcast is the last hop of the shutdown sequence.
//!
//! ## Ordering
//!
//! ```text
//! to-alert ──► Data ──► append to alert record ──► broadcast
//!          └─► Shutdown ─────────────────────────► broadcast, stop
//! ```
//!
//! The append completes before the broadcast starts, so a subscriber never sees an
//! anomaly whose record is not durable yet.

use tracing::{info, instrument, trace};

use crate::error::TransportError;
use crate::storage::SharedSink;

use super::channel::{Broadcast, Inbox};
use super::messages::{Message, Role, RoleReport, RoleState};
use super::{RoleHandle, RoleStatus, conclude, persist};

pub struct AlertActor {
    /// `to-alert` link from the router
    inbox: Inbox,

    /// `alert-broadcast` fan-out
    broadcast: Broadcast,

    /// Durable alert record
    record: SharedSink,

    status: RoleStatus,
}

impl AlertActor {
    /// `broadcast` must already carry every subscriber
    pub fn new(inbox: Inbox, broadcast: Broadcast, record: SharedSink) -> Self {
        Self {
            inbox,
            broadcast,
            record,
            status: RoleStatus::new(Role::AlertSink),
        }
    }

    pub fn spawn(self) -> RoleHandle {
        let state = self.status.subscribe();
        RoleHandle::spawn(Role::AlertSink, state, self.run())
    }

    #[instrument(skip(self), fields(role = %Role::AlertSink, subscribers = self.broadcast.subscriber_count()))]
    pub async fn run(mut self) -> Result<RoleReport, TransportError> {
        let mut report = RoleReport::new(Role::AlertSink);
        let outcome = self.relay(&mut report).await;
        conclude(&self.status, report, outcome)
    }

    async fn relay(&mut self, report: &mut RoleReport) -> Result<(), TransportError> {
        loop {
            let message = self.inbox.recv().await?;

            match message {
                Message::Shutdown { .. } => {
                    report.shutdowns += 1;
                    self.status.set(RoleState::Terminating);

                    let reached = self.broadcast.send(message).await?;
                    info!("shutdown; broadcast to {reached} subscribers");
                    return Ok(());
                }
                Message::Data(reading) => {
                    report.received += 1;
                    report.anomalies += 1;

                    persist(self.record.as_ref(), &message.to_string(), report).await;
                    info!(sequence = reading.sequence, "stored anomaly -> broadcast");

                    let reached = self.broadcast.send(message).await?;
                    report.forwarded += 1;
                    trace!("anomaly seq={} reached {reached} subscribers", reading.sequence);
                }
            }
        }
    }
}
