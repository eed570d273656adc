use color_eyre::eyre::{Result, eyre};
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "HOSTWATCH_LOG";

/// Install the global subscriber. Logs go to stderr so stdout stays free for
/// the console summary. `HOSTWATCH_LOG` wins over `RUST_LOG`; default `info`.
pub fn init_tracing(json: bool, verbose: bool) -> Result<()> {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    let result = if json {
        builder.json().with_ansi(false).try_init()
    } else {
        builder.try_init()
    };

    result.map_err(|e| eyre!("failed to set tracing subscriber: {e}"))
}
