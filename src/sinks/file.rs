use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Utc;
use tokio::io::AsyncWriteExt;

use crate::dispatch::Sink;
use crate::error::SinkError;
use crate::format::log_line;
use crate::system::snapshot::Snapshot;

pub const DEFAULT_LOG_FILE: &str = "log.txt";

/// Appends one line per snapshot to a text file. Never truncates.
pub struct FileLogSink {
    path: PathBuf,
}

impl FileLogSink {
    /// A blank path falls back to [`DEFAULT_LOG_FILE`].
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let path = if path.as_os_str().is_empty() || path.to_string_lossy().trim().is_empty() {
            PathBuf::from(DEFAULT_LOG_FILE)
        } else {
            path.to_path_buf()
        };
        FileLogSink { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> SinkError {
        SinkError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

#[async_trait]
impl Sink for FileLogSink {
    fn name(&self) -> &str {
        "file"
    }

    async fn handle(&self, snapshot: &Snapshot) -> Result<(), SinkError> {
        let mut line = log_line(Utc::now(), snapshot);
        line.push('\n');

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| self.io_error(e))?;
        }

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(|e| self.io_error(e))?;
        file.write_all(line.as_bytes())
            .await
            .map_err(|e| self.io_error(e))?;
        file.flush().await.map_err(|e| self.io_error(e))
    }
}
