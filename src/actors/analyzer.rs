//! AnalyzerActor - Analyzes anomalies announced on the alert broadcast

use tracing::{info, instrument};

use crate::analysis::AnomalyAnalysis;
use crate::error::TransportError;
use crate::storage::SharedSink;

use super::channel::Inbox;
use super::messages::{LineTag, Message, Role, RoleReport, RoleState};
use super::{RoleHandle, RoleStatus, conclude, persist};

pub struct AnalyzerActor {
    /// Subscription to `alert-broadcast`
    broadcast: Inbox,

    analysis: Box<dyn AnomalyAnalysis>,

    /// Optional result log (`ANALYZED` lines)
    log: Option<SharedSink>,

    status: RoleStatus,
}

impl AnalyzerActor {
    pub fn new(
        broadcast: Inbox,
        analysis: Box<dyn AnomalyAnalysis>,
        log: Option<SharedSink>,
    ) -> Self {
        Self {
            broadcast,
            analysis,
            log,
            status: RoleStatus::new(Role::Analyzer),
        }
    }

    pub fn spawn(self) -> RoleHandle {
        let state = self.status.subscribe();
        RoleHandle::spawn(Role::Analyzer, state, self.run())
    }

    #[instrument(skip(self), fields(role = %Role::Analyzer))]
    pub async fn run(mut self) -> Result<RoleReport, TransportError> {
        let mut report = RoleReport::new(Role::Analyzer);
        let outcome = self.analyze(&mut report).await;
        conclude(&self.status, report, outcome)
    }

    async fn analyze(&mut self, report: &mut RoleReport) -> Result<(), TransportError> {
        loop {
            let message = self.broadcast.recv().await?;

            let Message::Data(reading) = message else {
                report.shutdowns += 1;
                self.status.set(RoleState::Terminating);
                info!("shutdown received");
                return Ok(());
            };

            report.received += 1;
            report.anomalies += 1;

            let finding = self.analysis.analyze(&reading);
            info!(
                sequence = reading.sequence,
                pollution = reading.pollution,
                "analyzing anomaly: {finding}"
            );

            if let Some(log) = &self.log {
                persist(log.as_ref(), &message.tagged(LineTag::Analyzed), report).await;
            }
        }
    }
}
