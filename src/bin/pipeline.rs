use std::path::PathBuf;

use clap::Parser;
use dotenv::dotenv;
use sensor_pipeline::{
    config::Config,
    pipeline::{Pipeline, ensure_roles},
    storage::PipelineSinks,
};
use tracing::{info, level_filters::LevelFilter, trace};
use tracing_subscriber::{filter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Clone, Parser)]
struct Args {
    /// Config file (TOML or JSON)
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Number of participants available for the run
    #[arg(long, default_value_t = 5)]
    roles: usize,

    /// Number of readings to generate
    #[arg(long)]
    messages: Option<usize>,

    /// Delay between readings in milliseconds
    #[arg(long)]
    interval_ms: Option<u64>,

    /// Probability of a forced pollution anomaly
    #[arg(long)]
    anomaly_probability: Option<f64>,

    /// Seed for reproducible readings
    #[arg(long)]
    seed: Option<u64>,

    /// Trace level logging
    #[arg(short, long)]
    verbose: bool,
}

fn init(verbose: bool) {
    let level = if verbose {
        LevelFilter::TRACE
    } else {
        LevelFilter::INFO
    };
    let filter = filter::Targets::new()
        .with_targets(vec![("sensor_pipeline", level), ("pipeline", level)]);
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .compact()
                .with_ansi(false),
        )
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    let args = Args::parse();
    init(args.verbose);
    trace!("started with args: {args:?}");

    ensure_roles(args.roles)?;

    let config = load_config(&args)?;
    trace!("effective config: {config:?}");

    let sinks = PipelineSinks::open(&config.storage).await;

    let report = Pipeline::new(&config.pipeline, sinks).run().await?;

    for role in report.reports() {
        info!(
            received = role.received,
            forwarded = role.forwarded,
            persisted = role.persisted,
            persist_failures = role.persist_failures,
            "{} {:?}",
            role.role,
            role.state
        );
    }

    Ok(())
}

fn load_config(args: &Args) -> anyhow::Result<Config> {
    let mut config = Config::load(args.file.as_deref())?;
    config.apply_env();

    if let Some(messages) = args.messages {
        config.pipeline.messages = messages;
    }
    if let Some(interval_ms) = args.interval_ms {
        config.pipeline.interval_ms = interval_ms;
    }
    if let Some(probability) = args.anomaly_probability {
        config.pipeline.anomaly_probability = probability;
    }
    if args.seed.is_some() {
        config.pipeline.seed = args.seed;
    }

    config.validate()?;
    Ok(config)
}
