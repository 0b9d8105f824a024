//! GeneratorActor - Emits readings and the single shutdown message
//!
//! ## Message Flow
//!
//! ```text
//! Clock tick → ReadingSource → Message::Data ──readings──► Router
//!     (× N)                                   └──► emission log
//! then: Message::Shutdown ──readings──► Router
//! ```

use tracing::{info, instrument};

use crate::clock::Clock;
use crate::error::TransportError;
use crate::monitors::readings::ReadingSource;
use crate::storage::SharedSink;

use super::channel::Outbox;
use super::messages::{Message, Role, RoleReport, RoleState};
use super::{RoleHandle, RoleStatus, conclude, persist};

pub struct GeneratorActor {
    /// Number of readings to emit before shutdown
    count: usize,

    /// Value generator
    source: Box<dyn ReadingSource>,

    /// Emission pacing and timestamps
    clock: Box<dyn Clock>,

    /// `readings` link to the router
    readings: Outbox,

    /// Optional emission log
    log: Option<SharedSink>,

    status: RoleStatus,
}

impl GeneratorActor {
    pub fn new(
        count: usize,
        source: Box<dyn ReadingSource>,
        clock: Box<dyn Clock>,
        readings: Outbox,
        log: Option<SharedSink>,
    ) -> Self {
        Self {
            count,
            source,
            clock,
            readings,
            log,
            status: RoleStatus::new(Role::Generator),
        }
    }

    pub fn spawn(self) -> RoleHandle {
        let state = self.status.subscribe();
        RoleHandle::spawn(Role::Generator, state, self.run())
    }

    /// Run the generator to completion
    ///
    /// Send failures end the run immediately, the shutdown is then never sent.
    #[instrument(skip(self), fields(role = %Role::Generator, count = self.count))]
    pub async fn run(mut self) -> Result<RoleReport, TransportError> {
        let mut report = RoleReport::new(Role::Generator);
        let outcome = self.emit(&mut report).await;
        conclude(&self.status, report, outcome)
    }

    async fn emit(&mut self, report: &mut RoleReport) -> Result<(), TransportError> {
        for sequence in 0..self.count as i64 {
            self.clock.tick().await;

            let timestamp = self.clock.now();
            let reading = self.source.next_reading(sequence, timestamp);
            let message = Message::Data(reading);

            self.readings.send(message).await?;
            report.forwarded += 1;

            info!(sequence, pollution = reading.pollution, "sent reading");

            if let Some(log) = &self.log {
                persist(log.as_ref(), &message.to_string(), report).await;
            }
        }

        self.status.set(RoleState::Terminating);
        let timestamp = self.clock.now();
        self.readings.send(Message::shutdown(timestamp)).await?;
        report.shutdowns += 1;

        info!("sent shutdown");
        Ok(())
    }
}
