use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use silo_core::{
    AuthMode, Credential, EventLog, EventSink, RandomIds, Silo, SiloConfig, TracingSink,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "silo", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Fill a silo with the given items, then drain it
    Run {
        /// TOML config file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Capacity override (defaults to the config, then to the item count)
        #[arg(long)]
        capacity: Option<usize>,

        /// Run without requiring the admin capability
        #[arg(long)]
        unrestricted: bool,

        /// Drain this many items per batch instead of all at once
        #[arg(long)]
        batch: Option<usize>,

        /// Print the recorded events as JSON when done
        #[arg(long)]
        events: bool,

        /// Items to add, in order
        items: Vec<String>,
    },
    /// Load, validate and print a config file
    CheckConfig {
        path: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Run {
            config,
            capacity,
            unrestricted,
            batch,
            events,
            items,
        } => {
            let mut silo_config = match &config {
                Some(path) => check_config(path)?,
                None => SiloConfig::new(items.len()),
            };
            if let Some(capacity) = capacity {
                silo_config.capacity = capacity;
            }
            if unrestricted {
                silo_config.auth = AuthMode::Unrestricted;
            }
            silo_config
                .validate()
                .context("invalid settings after command line overrides")?;

            let report = run(&silo_config, items, batch, events)?;
            for rejected in &report.rejected {
                println!("rejected {}", rejected);
            }
            for removed in &report.batches {
                println!("{}", removed.join(" "));
            }
            if let Some(json) = &report.events {
                println!("{}", json);
            }
            Ok(())
        }
        Commands::CheckConfig { path } => {
            let config = check_config(&path)?;
            println!("capacity:      {}", config.capacity);
            println!("auth:          {:?}", config.auth);
            println!("zero_capacity: {:?}", config.zero_capacity);
            println!("ok");
            Ok(())
        }
    }
}

/// What a `run` did, in the order it happened.
#[derive(Debug, Default)]
struct RunReport {
    /// Items the silo refused, with the reason.
    rejected: Vec<String>,
    /// Items handed back out, one entry per drain batch.
    batches: Vec<Vec<String>>,
    /// Recorded events as JSON, when requested.
    events: Option<String>,
}

/// Load and validate a config file.
fn check_config(path: &Path) -> Result<SiloConfig> {
    SiloConfig::load(path).with_context(|| format!("failed to load config {}", path.display()))
}

fn run(
    config: &SiloConfig,
    items: Vec<String>,
    batch: Option<usize>,
    events: bool,
) -> Result<RunReport> {
    let log = EventLog::new();
    let sink: Arc<dyn EventSink> = if events {
        Arc::new(log.clone())
    } else {
        Arc::new(TracingSink)
    };

    let (mut silo, cap) = Silo::<String>::create_with(config, &mut RandomIds, sink);
    info!(silo_id = %silo.id(), capacity = silo.capacity(), "created silo");

    let credential = match config.auth {
        AuthMode::Required => Credential::from(&cap),
        AuthMode::Unrestricted => Credential::none(),
    };

    let mut report = RunReport::default();
    for item in items {
        if let Err(rejected) = silo.add_item(credential, item) {
            warn!(error = %rejected.error, "item not added");
            report
                .rejected
                .push(format!("{}: {}", rejected.value, rejected.error));
        }
    }

    if !silo.is_ready() {
        bail!(
            "silo {} is still filling ({} of {} items)",
            silo.id(),
            silo.size(),
            silo.capacity()
        );
    }

    let batch = batch.unwrap_or(silo.size()).max(1);
    while !silo.is_empty() {
        report.batches.push(silo.remove_items(credential, batch)?);
    }

    silo.destroy(credential)?;
    cap.destroy();

    if events {
        report.events = Some(log.to_json()?);
    }
    Ok(report)
}
