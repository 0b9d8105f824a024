//! Sink standing in for a record that could not be opened
//!
//! Every append fails with the reason the record was lost, so the owning role
//! keeps running and counts each line it could not persist.

use async_trait::async_trait;

use super::backend::RecordSink;
use super::error::{StorageError, StorageResult};

#[derive(Debug, Clone)]
pub struct UnavailableSink {
    name: String,
    reason: String,
}

impl UnavailableSink {
    pub fn new(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl RecordSink for UnavailableSink {
    async fn append(&self, _line: &str) -> StorageResult<()> {
        Err(StorageError::Unavailable(self.reason.clone()))
    }

    fn describe(&self) -> String {
        format!("unavailable:{}", self.name)
    }
}
