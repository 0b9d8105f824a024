//! File-backed record sink
//!
//! Lines are appended to a file opened in append mode. Every append is flushed and
//! synced before it returns, so no buffered line is lost when the process stops.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::{debug, trace};

use super::backend::RecordSink;
use super::error::{StorageError, StorageResult};

pub struct FileSink {
    path: PathBuf,
    file: Mutex<File>,
}

impl FileSink {
    /// Open (or create) `path` for appending, creating parent directories on demand
    pub async fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| StorageError::OpenFailed {
                    path: path.clone(),
                    source,
                })?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await
            .map_err(|source| StorageError::OpenFailed {
                path: path.clone(),
                source,
            })?;

        debug!("opened record {}", path.display());

        Ok(Self {
            path,
            file: Mutex::new(file),
        })
    }
}

#[async_trait]
impl RecordSink for FileSink {
    async fn append(&self, line: &str) -> StorageResult<()> {
        let mut file = self.file.lock().await;

        file.write_all(format!("{line}\n").as_bytes()).await?;
        file.flush().await?;
        file.sync_data().await?;

        trace!("appended to {}", self.path.display());
        Ok(())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
