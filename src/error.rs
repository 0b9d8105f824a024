//! Error types shared by the roles and the pipeline supervisor

use thiserror::Error;
use tokio::task::JoinError;

use crate::actors::messages::{Role, Topic};

/// Failure of a point-to-point link or of the alert broadcast.
///
/// Always fatal for the role that observes it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The receiving side of the link is gone
    #[error("peer on `{topic}` is gone, message could not be delivered")]
    Disconnected { topic: Topic },

    /// Every sender of the link is gone before a shutdown arrived
    #[error("upstream of `{topic}` closed before shutdown")]
    Closed { topic: Topic },
}

/// Malformed fixed-width wire record.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CodecError {
    #[error("shutdown flag must be 0.0 or 1.0, got {0}")]
    InvalidFlag(f64),

    #[error("field `{field}` must be integral, got {value}")]
    NonIntegral { field: &'static str, value: f64 },

    #[error("data record carries negative sequence {0}")]
    NegativeSequence(i64),
}

/// Errors surfaced to whoever runs the pipeline.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("run with at least {required} roles, only {available} available")]
    InsufficientRoles { available: usize, required: usize },

    #[error("{role} failed: {source}")]
    Transport {
        role: Role,
        #[source]
        source: TransportError,
    },

    #[error("{role} task aborted: {source}")]
    Aborted {
        role: Role,
        #[source]
        source: JoinError,
    },
}

pub type PipelineResult<T> = Result<T, PipelineError>;
