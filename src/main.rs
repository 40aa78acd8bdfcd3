use std::path::PathBuf;

use clap::Parser;
use vigil_core::ports::Notifier;
use vigil_core::{Collaborators, Config, Pipeline, TrackingMode};
use vigil_io::{FsRecordStore, FsStore, HttpFetcher, LogNotifier, WebhookNotifier};

#[derive(Parser)]
#[command(name = "vigil", about = "vigil — threat feed diffing and early warning")]
struct Cli {
    /// TOML config file layered over the built-in defaults.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Override the configured data directory.
    #[arg(long)]
    data_dir: Option<PathBuf>,
    /// Override the configured tracking mode
    /// (full-reconciliation | new-only).
    #[arg(long)]
    mode: Option<TrackingMode>,
    /// Fetch, diff, and parse, but skip persistence and notifications.
    #[arg(long)]
    dry_run: bool,
    /// Default the log filter to debug instead of info.
    #[arg(long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env("RUST_LOG").unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new(if cli.debug { "debug" } else { "info" })
            }),
        )
        .init();

    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(data_dir) = cli.data_dir {
        config.run.data_dir = data_dir;
    }
    if let Some(mode) = cli.mode {
        config.run.tracking_mode = mode;
    }

    let store = FsStore::new(&config.run.data_dir);
    let notifier: Box<dyn Notifier> = match &config.run.webhook_url {
        Some(url) => Box::new(WebhookNotifier::new(url)?),
        None => Box::new(LogNotifier),
    };
    let ports = Collaborators {
        fetcher: Box::new(HttpFetcher::new()?),
        snapshots: Box::new(store.clone()),
        states: Box::new(store),
        records: Box::new(FsRecordStore::new(config.run.data_dir.join("records"))),
        notifier,
    };

    let mut pipeline = Pipeline::new(&config.run, config.feeds.clone(), ports);
    if cli.dry_run {
        pipeline = pipeline.dry_run();
    }

    pipeline.run().await?;
    Ok(())
}
