use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use color_eyre::Result;
use hostwatch::config::{self, Config, load_config, load_config_from_path};
use hostwatch::dispatch::Dispatcher;
use hostwatch::logging::init_tracing;
use hostwatch::monitor::Monitor;
use hostwatch::report::{Reporter, TracingReporter};
use hostwatch::scheduler::Scheduler;
use hostwatch::sinks;
use hostwatch::system::sampler::Sampler;
use tokio_util::sync::CancellationToken;

#[derive(Parser)]
#[command(
    name = "hostwatch",
    about = "Sample CPU, memory and disk usage and forward it to log and HTTP sinks"
)]
struct Cli {
    /// Path to config file (TOML, or JSON with a `.json` extension)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seconds between ticks
    #[arg(long)]
    interval: Option<u64>,

    /// Endpoint receiving a JSON POST per tick; empty disables it
    #[arg(long)]
    api_endpoint: Option<String>,

    /// File that receives one line per tick
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Do not print the per-tick summary to stdout
    #[arg(long, default_value_t = false)]
    quiet: bool,

    /// Take a single sample, deliver it and exit
    #[arg(long, default_value_t = false)]
    once: bool,

    /// Emit diagnostics as JSON lines on stderr
    #[arg(long, default_value_t = false)]
    log_json: bool,

    /// Enable debug diagnostics
    #[arg(short, long, default_value_t = false)]
    verbose: bool,
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    init_tracing(cli.log_json, cli.verbose)?;

    let config = load_config_for_cli(&cli)?;
    config.validate()?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let grace = config.shutdown_grace();
    let result = runtime.block_on(run(config, cli.once));
    // A console write stuck on a full pipe must not hold the process open.
    runtime.shutdown_timeout(grace);
    result
}

async fn run(config: Config, once: bool) -> Result<()> {
    let reporter: Arc<dyn Reporter> = Arc::new(TracingReporter);
    let dispatcher =
        Dispatcher::new(config.sink_timeout(), reporter.clone()).with_sinks(sinks::from_config(&config)?);
    let sampler = Sampler::new(reporter);
    let mut monitor = Monitor::new(sampler, dispatcher);

    let mut scheduler =
        Scheduler::new(config.interval()).with_shutdown_grace(config.shutdown_grace());
    if once {
        scheduler = scheduler.with_max_ticks(1);
    }

    let cancel = CancellationToken::new();
    spawn_signal_listener(cancel.clone());

    println!("Starting system monitor...");
    monitor.run(&scheduler, &cancel).await;
    Ok(())
}

fn load_config_for_cli(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => load_config_from_path(path)?,
        None => load_config()?,
    };

    if let Some(interval) = cli.interval {
        config.monitoring.interval_seconds = interval;
    }
    if let Some(ref endpoint) = cli.api_endpoint {
        config.monitoring.api_endpoint = endpoint.clone();
    }
    if let Some(ref path) = cli.log_file {
        config.monitoring.log_file_path = path.to_string_lossy().into_owned();
    }
    if cli.quiet {
        config.engine.console = false;
    }

    tracing::debug!(path = ?config::config_path(), ?config, "settings loaded");
    Ok(config)
}

fn spawn_signal_listener(cancel: CancellationToken) {
    tokio::spawn(async move {
        if let Err(e) = shutdown_signal().await {
            tracing::warn!(error = %e, "cannot listen for shutdown signals");
            return;
        }
        tracing::info!("shutdown signal received");
        cancel.cancel();
    });
}

#[cfg(unix)]
async fn shutdown_signal() -> std::io::Result<()> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut terminate = signal(SignalKind::terminate())?;
    tokio::select! {
        result = tokio::signal::ctrl_c() => result,
        _ = terminate.recv() => Ok(()),
    }
}

#[cfg(not(unix))]
async fn shutdown_signal() -> std::io::Result<()> {
    tokio::signal::ctrl_c().await
}
