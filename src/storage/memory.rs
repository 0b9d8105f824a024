//! In-memory record sink (no persistence)
//!
//! Keeps every appended line in a vector. It's useful for:
//! - Testing roles without touching the file system
//! - Inspecting exactly what a role persisted, in order
//!
//! Clones share the same underlying lines.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::trace;

use super::backend::RecordSink;
use super::error::StorageResult;

#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    name: String,
    lines: Arc<Mutex<Vec<String>>>,
}

impl MemorySink {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            lines: Arc::default(),
        }
    }

    /// Snapshot of every line appended so far
    pub async fn lines(&self) -> Vec<String> {
        self.lines.lock().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.lines.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.lines.lock().await.is_empty()
    }
}

#[async_trait]
impl RecordSink for MemorySink {
    async fn append(&self, line: &str) -> StorageResult<()> {
        trace!("in-memory sink {}: append", self.name);
        self.lines.lock().await.push(line.to_string());
        Ok(())
    }

    fn describe(&self) -> String {
        format!("memory:{}", self.name)
    }
}
