//! Execution record sinks

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::debug;

use crate::error::{GenerationError, GenerationResult};
use crate::traits::TelemetrySink;
use crate::types::ExecutionRecord;

/// Appends records as JSON lines to `<dir>/<task>_records.jsonl`
pub struct FileTelemetrySink {
    dir: PathBuf,
    write_lock: Mutex<()>,
}

impl FileTelemetrySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path_for(&self, task: &str) -> PathBuf {
        self.dir.join(format!("{task}_records.jsonl"))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

fn io_error(action: &str, path: &Path, e: std::io::Error) -> GenerationError {
    GenerationError::Unclassified {
        message: format!("failed to {action} {}: {e}", path.display()),
    }
}

#[async_trait]
impl TelemetrySink for FileTelemetrySink {
    async fn record(&self, record: ExecutionRecord) -> GenerationResult<()> {
        let mut line = serde_json::to_string(&record).map_err(|e| GenerationError::Unclassified {
            message: format!("failed to serialize execution record: {e}"),
        })?;
        line.push('\n');

        let path = self.path_for(&record.task);
        let _guard = self.write_lock.lock().await;

        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| io_error("create", &self.dir, e))?;

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await
            .map_err(|e| io_error("open", &path, e))?;
        file.write_all(line.as_bytes())
            .await
            .map_err(|e| io_error("append to", &path, e))?;
        file.flush().await.map_err(|e| io_error("flush", &path, e))?;

        debug!(path = %path.display(), provider = %record.provider, "Execution record written");
        Ok(())
    }
}
