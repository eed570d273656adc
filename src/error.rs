use std::path::PathBuf;

/// Failure reading one dimension (CPU, memory or disk) from a platform backend.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("{source_name} unavailable: {reason}")]
    Unavailable {
        source_name: &'static str,
        reason: String,
    },

    #[error("{source_name} malformed: {reason}")]
    Malformed {
        source_name: &'static str,
        reason: String,
    },
}

impl BackendError {
    pub fn unavailable(source_name: &'static str, reason: impl Into<String>) -> Self {
        Self::Unavailable {
            source_name,
            reason: reason.into(),
        }
    }

    pub fn malformed(source_name: &'static str, reason: impl Into<String>) -> Self {
        Self::Malformed {
            source_name,
            reason: reason.into(),
        }
    }

    pub fn from_io(source_name: &'static str, err: &std::io::Error) -> Self {
        Self::unavailable(source_name, err.to_string())
    }
}

/// Failure delivering one snapshot to one sink.
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("endpoint responded with status {0}")]
    Status(u16),

    #[error("delivery timed out after {0:?}")]
    TimedOut(std::time::Duration),

    #[error("sink panicked while handling the snapshot")]
    Panicked,
}

/// Errors that abort the process before the tick loop starts.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("cannot read settings file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse settings file {path}: {reason}")]
    Parse { path: PathBuf, reason: String },

    #[error("invalid setting `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}
