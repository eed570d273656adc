use std::sync::Arc;

use crate::config::Config;
use crate::dispatch::Sink;
use crate::error::StartupError;

pub mod console;
pub mod file;
pub mod http;

pub use console::ConsoleSink;
pub use file::FileLogSink;
pub use http::HttpSink;

/// Build the sinks the settings ask for, in delivery order: console, file,
/// then HTTP when an endpoint is configured.
pub fn from_config(config: &Config) -> Result<Vec<Arc<dyn Sink>>, StartupError> {
    let mut sinks: Vec<Arc<dyn Sink>> = Vec::new();

    if config.engine.console {
        sinks.push(Arc::new(ConsoleSink::new()));
    }

    sinks.push(Arc::new(FileLogSink::new(config.log_file_path())));

    match HttpSink::from_endpoint(config.api_endpoint().unwrap_or_default())? {
        Some(sink) => {
            tracing::info!(endpoint = %sink.endpoint(), "remote endpoint sink enabled");
            sinks.push(Arc::new(sink));
        }
        None => tracing::info!("api endpoint not configured; remote sink disabled"),
    }

    Ok(sinks)
}
