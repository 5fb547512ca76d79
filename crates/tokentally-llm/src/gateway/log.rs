//! Request log sink
//!
//! Appends one pretty-printed `[messages, choices]` record per completed
//! request to a timestamped file. The file is opened on first use and kept
//! for the lifetime of the sink.

use crate::error::{Error, Result};
use chrono::Local;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tokio::fs::{self, File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::info;

/// Marker written twice before every record
pub const RECORD_MARKER: &str = "==============\n";

struct OpenLog {
    path: PathBuf,
    file: File,
}

/// Append-only request/response log
pub struct RequestLog {
    dir: PathBuf,
    open: Mutex<Option<OpenLog>>,
}

impl std::fmt::Debug for RequestLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestLog").field("dir", &self.dir).finish()
    }
}

impl RequestLog {
    /// Log into `dir`; nothing is created until the first record
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            open: Mutex::new(None),
        }
    }

    /// Path of the log file, once it has been created
    pub async fn path(&self) -> Option<PathBuf> {
        self.open.lock().await.as_ref().map(|log| log.path.clone())
    }

    /// Append one record
    ///
    /// # Errors
    /// Returns `Error::LogWrite` if serialization, file creation or the write fails
    pub async fn record<M, C>(&self, messages: &M, choices: &C) -> Result<()>
    where
        M: Serialize + ?Sized,
        C: Serialize + ?Sized,
    {
        let entry = serde_json::to_string_pretty(&(messages, choices))
            .map_err(|e| Error::LogWrite(format!("serialize log entry: {e}")))?;

        let mut record = String::with_capacity(entry.len() + 2 * RECORD_MARKER.len() + 1);
        record.push_str(RECORD_MARKER);
        record.push_str(RECORD_MARKER);
        record.push_str(&entry);
        record.push('\n');

        let mut guard = self.open.lock().await;
        if guard.is_none() {
            *guard = Some(Self::open_file(&self.dir).await?);
        }
        let log = guard
            .as_mut()
            .ok_or_else(|| Error::LogWrite("log file unavailable".to_string()))?;

        log.file
            .write_all(record.as_bytes())
            .await
            .map_err(|e| Error::LogWrite(format!("{}: {e}", log.path.display())))?;
        log.file
            .flush()
            .await
            .map_err(|e| Error::LogWrite(format!("{}: {e}", log.path.display())))
    }

    async fn open_file(dir: &Path) -> Result<OpenLog> {
        fs::create_dir_all(dir)
            .await
            .map_err(|e| Error::LogWrite(format!("{}: {e}", dir.display())))?;

        let name = format!("ai-log-{}.log", Local::now().format("%Y%m%d-%H%M%S"));
        let path = dir.join(name);
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await
            .map_err(|e| Error::LogWrite(format!("{}: {e}", path.display())))?;

        info!(path = %path.display(), "Request log opened");
        Ok(OpenLog { path, file })
    }
}
