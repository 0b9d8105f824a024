//! Record sink trait definition
//!
//! Every persisting role receives its sink at construction time instead of
//! reaching for the file system itself.

use std::sync::Arc;

use async_trait::async_trait;

use super::error::StorageResult;

/// Shared handle to a sink
///
/// Each sink is owned by exactly one role during a run; the `Arc` only exists so
/// tests can keep a second handle for inspection.
pub type SharedSink = Arc<dyn RecordSink>;

/// Append-only, line-oriented durable record
///
/// ## Durability
///
/// `append` must not return before the line is handed to the operating system.
/// A role treats a returned `Ok` as "durable" and may notify other roles right after.
///
/// ## Error Handling
///
/// Failures are reported to the calling role, which logs and counts them but keeps
/// running. Implementations must not retry on their own.
#[async_trait]
pub trait RecordSink: Send + Sync {
    /// Append a single line (without trailing newline)
    async fn append(&self, line: &str) -> StorageResult<()>;

    /// Human readable description for logs (e.g. a file path)
    fn describe(&self) -> String;
}
