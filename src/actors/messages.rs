//! Message types for role communication
//!
//! This module defines the schema shared by every role.
//!
//! ## Design Principles
//!
//! 1. **Tagged messages**: `Message::Data` vs `Message::Shutdown`, the numeric shutdown flag
//!    only exists in the fixed-width wire record
//! 2. **By value**: messages are `Copy`, each hop works on its own copy
//! 3. **Closed topology**: roles and topics are enumerations, not ranks or strings

use std::fmt;

use crate::Reading;
use crate::error::CodecError;

/// Sequence carried by the shutdown sentinel on the wire
pub const SHUTDOWN_SEQUENCE: i64 = -1;

/// Number of numeric fields in a wire record
pub const RECORD_LEN: usize = 6;

/// `[sequence, timestamp, temperature, salinity, pollution, shutdownFlag]`
pub type WireRecord = [f64; RECORD_LEN];

/// The fixed set of roles taking part in a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Generator,
    Router,
    AlertSink,
    ArchiveSink,
    Analyzer,
}

impl Role {
    /// Every role, in spawn order
    pub const ALL: [Role; 5] = [
        Role::Generator,
        Role::Router,
        Role::AlertSink,
        Role::ArchiveSink,
        Role::Analyzer,
    ];

    /// Minimum number of participants for a run
    pub const COUNT: usize = Self::ALL.len();

    pub fn name(&self) -> &'static str {
        match self {
            Role::Generator => "generator",
            Role::Router => "router",
            Role::AlertSink => "alert-sink",
            Role::ArchiveSink => "archive-sink",
            Role::Analyzer => "analyzer",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Logical channel tags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topic {
    /// Generator → Router
    Readings,

    /// Router → AlertSink
    ToAlert,

    /// Router → ArchiveSink
    ToArchive,

    /// AlertSink → every subscriber
    AlertBroadcast,
}

impl Topic {
    pub fn name(&self) -> &'static str {
        match self {
            Topic::Readings => "readings",
            Topic::ToAlert => "to-alert",
            Topic::ToArchive => "to-archive",
            Topic::AlertBroadcast => "alert-broadcast",
        }
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The only message type flowing through the pipeline
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Message {
    /// A real sensor reading
    Data(Reading),

    /// Terminates every role it reaches
    Shutdown {
        /// When the generator issued the shutdown
        timestamp: i64,
    },
}

impl Message {
    pub fn shutdown(timestamp: i64) -> Self {
        Message::Shutdown { timestamp }
    }

    pub fn is_shutdown(&self) -> bool {
        matches!(self, Message::Shutdown { .. })
    }

    pub fn sequence(&self) -> i64 {
        match self {
            Message::Data(reading) => reading.sequence,
            Message::Shutdown { .. } => SHUTDOWN_SEQUENCE,
        }
    }

    /// Encode into the fixed-width wire record
    pub fn encode(&self) -> WireRecord {
        match self {
            Message::Data(r) => [
                r.sequence as f64,
                r.timestamp as f64,
                r.temperature,
                r.salinity,
                r.pollution,
                0.0,
            ],
            Message::Shutdown { timestamp } => [
                SHUTDOWN_SEQUENCE as f64,
                *timestamp as f64,
                0.0,
                0.0,
                0.0,
                1.0,
            ],
        }
    }

    /// Decode a wire record
    ///
    /// For shutdown records only the timestamp is meaningful, the other fields are ignored.
    pub fn decode(record: &WireRecord) -> Result<Self, CodecError> {
        let [sequence, timestamp, temperature, salinity, pollution, flag] = *record;

        let timestamp = integral("timestamp", timestamp)?;

        if flag == 1.0 {
            return Ok(Message::Shutdown { timestamp });
        }
        if flag != 0.0 {
            return Err(CodecError::InvalidFlag(flag));
        }

        let sequence = integral("sequence", sequence)?;
        if sequence < 0 {
            return Err(CodecError::NegativeSequence(sequence));
        }

        Ok(Message::Data(Reading {
            sequence,
            timestamp,
            temperature,
            salinity,
            pollution,
        }))
    }

    /// Render the record line, prefixed with a classification tag
    pub fn tagged(&self, tag: LineTag) -> String {
        format!("{tag} {self}")
    }
}

fn integral(field: &'static str, value: f64) -> Result<i64, CodecError> {
    if !value.is_finite() || value.fract() != 0.0 {
        return Err(CodecError::NonIntegral { field, value });
    }
    Ok(value as i64)
}

/// `seq=<int>, ts=<int>, temp=<float>, sal=<float>, pol=<float>, shutdown=<0|1>`
impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [sequence, timestamp, temperature, salinity, pollution, flag] = self.encode();
        write!(
            f,
            "seq={}, ts={}, temp={temperature:?}, sal={salinity:?}, pol={pollution:?}, shutdown={}",
            sequence as i64, timestamp as i64, flag as u8
        )
    }
}

/// Prefix of a persisted line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineTag {
    Anomaly,
    Normal,
    Analyzed,
}

impl fmt::Display for LineTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LineTag::Anomaly => "ANOMALY",
            LineTag::Normal => "NORMAL",
            LineTag::Analyzed => "ANALYZED",
        })
    }
}

/// Lifecycle of a role
///
/// ```text
/// Running ──(shutdown received)──► Terminating ──► Stopped
///    └──────(transport error)────────────────────► Failed
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleState {
    Running,
    Terminating,
    Stopped,
    Failed,
}

impl RoleState {
    pub fn is_final(&self) -> bool {
        matches!(self, RoleState::Stopped | RoleState::Failed)
    }
}

/// What a role did during its run, returned when its loop ends
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleReport {
    pub role: Role,

    /// Final state, `Stopped` on a clean shutdown
    pub state: RoleState,

    /// Data messages taken from upstream
    pub received: u64,

    /// Data messages sent downstream (broadcasts count once)
    pub forwarded: u64,

    /// Lines appended to a durable record
    pub persisted: u64,

    /// Appends that failed and were skipped
    pub persist_failures: u64,

    /// Data messages handled as anomalies
    pub anomalies: u64,

    /// Data messages handled as normal readings
    pub normals: u64,

    /// Shutdown messages observed (1 after a clean run)
    pub shutdowns: u64,
}

impl RoleReport {
    pub fn new(role: Role) -> Self {
        Self {
            role,
            state: RoleState::Running,
            received: 0,
            forwarded: 0,
            persisted: 0,
            persist_failures: 0,
            anomalies: 0,
            normals: 0,
            shutdowns: 0,
        }
    }
}
