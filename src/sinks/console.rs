use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::dispatch::Sink;
use crate::error::SinkError;
use crate::format::summary_line;
use crate::system::snapshot::Snapshot;

type SharedWriter = Arc<Mutex<Box<dyn Write + Send>>>;

/// Prints the one-line summary to stdout.
///
/// The write runs on the blocking pool: a reader that stops draining the pipe
/// stalls only this sink, and the dispatcher's timeout still fires.
pub struct ConsoleSink {
    out: SharedWriter,
}

impl Default for ConsoleSink {
    fn default() -> Self {
        Self::new()
    }
}

impl ConsoleSink {
    pub fn new() -> Self {
        Self::with_writer(io::stdout())
    }

    pub fn with_writer(writer: impl Write + Send + 'static) -> Self {
        ConsoleSink {
            out: Arc::new(Mutex::new(Box::new(writer))),
        }
    }
}

fn stdout_error(source: io::Error) -> SinkError {
    SinkError::Io {
        path: PathBuf::from("<stdout>"),
        source,
    }
}

#[async_trait]
impl Sink for ConsoleSink {
    fn name(&self) -> &str {
        "console"
    }

    async fn handle(&self, snapshot: &Snapshot) -> Result<(), SinkError> {
        let line = summary_line(snapshot);
        let out = Arc::clone(&self.out);
        let written = tokio::task::spawn_blocking(move || -> io::Result<()> {
            let mut out = out
                .lock()
                .map_err(|_| io::Error::other("console writer poisoned"))?;
            writeln!(out, "{line}")?;
            out.flush()
        })
        .await;

        match written {
            Ok(result) => result.map_err(stdout_error),
            Err(join) if join.is_panic() => Err(SinkError::Panicked),
            Err(join) => Err(stdout_error(io::Error::other(join))),
        }
    }
}
