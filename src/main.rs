use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use rangewatch::{build_monitor, read_samples, replay, Overrides, Settings};
use rangewatch_sdk::{ChannelPublisher, PublishedMessage};
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "rangewatch")]
#[command(about = "Replay readings through a bounded-value monitor with hysteresis")]
struct Args {
    /// File with one reading per line ('#' comments, '-' or empty for missing)
    #[arg(short, long)]
    samples: PathBuf,

    /// Settings file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Monitor name, also used in the publish route
    #[arg(short, long)]
    name: Option<String>,

    /// Lower bound of the valid range
    #[arg(long, allow_negative_numbers = true)]
    min: Option<f64>,

    /// Upper bound of the valid range
    #[arg(long, allow_negative_numbers = true)]
    max: Option<f64>,

    /// Deadband before an out-of-range status clears
    #[arg(long)]
    hysteresis: Option<f64>,

    /// Mark transitions as not worth a user notification
    #[arg(long)]
    no_notify: bool,

    /// Storage namespace (requires --state-dir)
    #[arg(long, requires = "state_dir")]
    namespace: Option<String>,

    /// Directory for persisted monitor state
    #[arg(long)]
    state_dir: Option<PathBuf>,

    /// Restore stored state before replaying
    #[arg(long)]
    restore: bool,

    /// Print the final snapshot after the summary
    #[arg(long)]
    snapshot: bool,

    /// Log as JSON
    #[arg(long)]
    log_json: bool,
}

impl Args {
    fn overrides(&self) -> Overrides {
        Overrides {
            name: self.name.clone(),
            min: self.min,
            max: self.max,
            hysteresis: self.hysteresis,
            notify: self.no_notify.then_some(false),
            namespace: self.namespace.clone(),
            state_dir: self
                .state_dir
                .as_ref()
                .map(|dir| dir.to_string_lossy().into_owned()),
            restore: self.restore.then_some(true),
        }
    }
}

/// One publication, as printed on stdout.
#[derive(Serialize)]
struct PublicationLine<'a> {
    route: &'a str,
    forced: bool,
    payload: serde_json::Value,
}

impl<'a> PublicationLine<'a> {
    fn from_message(msg: &'a PublishedMessage) -> Result<Self> {
        Ok(Self {
            route: &msg.route,
            forced: msg.forced,
            payload: serde_json::from_str(&msg.payload).context("Publication is not JSON")?,
        })
    }
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into());
    let registry = tracing_subscriber::registry().with(filter);
    // logs go to stderr so stdout stays machine-readable
    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.log_json);

    let settings = Settings::load(args.config.as_deref(), &args.overrides())?;
    let samples = read_samples(&args.samples)?;

    // at most one publication per sample, so the channel never fills
    let (publisher, mut rx) = ChannelPublisher::channel(samples.len().max(1));
    let printer = tokio::spawn(async move {
        let mut printed = 0usize;
        while let Some(msg) = rx.recv().await {
            println!("{}", serde_json::to_string(&PublicationLine::from_message(&msg)?)?);
            printed += 1;
        }
        Ok::<_, anyhow::Error>(printed)
    });

    let mut monitor = build_monitor(&settings, publisher)?;
    let summary = replay(&mut monitor, &samples);
    let snapshot = monitor.snapshot_json()?;
    drop(monitor);

    let published = printer.await.context("Printer task failed")??;
    tracing::debug!(published, "All publications printed");

    println!("{}", serde_json::to_string(&summary)?);
    if args.snapshot {
        println!("{snapshot}");
    }
    Ok(())
}
