//! OptionBot CLI — run the decision pipeline over a tick stream, inspect configuration.
//!
//! Commands:
//! - `run` — replay NDJSON ticks (file or stdin) through the pipeline, print intents
//! - `config` — print the default configuration as TOML
//! - `validate` — load a config file, validate it, print its fingerprint
//!
//! Intents and the session summary go to stdout as JSON lines; logs go to stderr.

mod feed;
mod strike;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use tracing::{info, warn};

use optionbot_core::{BotConfig, DecisionPipeline};

use crate::feed::spawn_feed;
use crate::strike::AtmStrikeSelector;

/// Ticks the feed thread may read ahead of the pipeline.
const TICK_QUEUE_DEPTH: usize = 1_024;

#[derive(Parser)]
#[command(
    name = "optionbot",
    about = "OptionBot CLI: index option entry/exit decisions from a tick stream"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Feed NDJSON ticks through the decision pipeline.
    Run {
        /// Path to a TOML config file. Defaults apply when omitted.
        #[arg(long)]
        config: Option<PathBuf>,

        /// NDJSON tick file. Reads stdin when omitted.
        #[arg(long)]
        ticks: Option<PathBuf>,

        /// Strikes out of the money for the selected contract (0 = ATM).
        #[arg(long, default_value_t = 0)]
        otm_steps: u32,
    },
    /// Print the default configuration as TOML.
    Config,
    /// Load and validate a config file.
    Validate {
        /// Path to a TOML config file.
        #[arg(long)]
        config: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    match cli.command {
        Commands::Run {
            config,
            ticks,
            otm_steps,
        } => run_pipeline(config.as_deref(), ticks.as_deref(), otm_steps),
        Commands::Config => {
            print!("{}", BotConfig::default().to_toml_string()?);
            Ok(())
        }
        Commands::Validate { config } => {
            let config = load_config(Some(&config))?;
            println!("ok {}", config.fingerprint());
            Ok(())
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<BotConfig> {
    match path {
        Some(path) => {
            BotConfig::from_file(path).with_context(|| format!("loading config from {}", path.display()))
        }
        None => Ok(BotConfig::default()),
    }
}

fn open_ticks(path: Option<&Path>) -> Result<BufReader<Box<dyn Read + Send>>> {
    let source: Box<dyn Read + Send> = match path {
        Some(path) => Box::new(File::open(path).with_context(|| format!("opening ticks {}", path.display()))?),
        None => Box::new(io::stdin()),
    };
    Ok(BufReader::new(source))
}

fn run_pipeline(config_path: Option<&Path>, ticks_path: Option<&Path>, otm_steps: u32) -> Result<()> {
    let config = load_config(config_path)?;
    info!(
        symbol = %config.symbol,
        timeframe_minutes = config.timeframe_minutes,
        mode = ?config.rules.mode,
        fingerprint = %config.fingerprint(),
        "starting session"
    );
    if !config.paper_trade {
        warn!("paper_trade is off: intents are printed, order routing is up to the consumer");
    }

    let selector = AtmStrikeSelector::new(config.symbol.clone(), config.strike_step, otm_steps);
    let mut pipeline = DecisionPipeline::new(config, Box::new(selector))?;

    let (tx, rx) = mpsc::sync_channel(TICK_QUEUE_DEPTH);
    let feed = spawn_feed(open_ticks(ticks_path)?, tx).context("spawning tick feed")?;

    for raw in rx {
        for intent in pipeline.on_raw_tick(raw) {
            println!("{}", serde_json::to_string(&intent)?);
        }
    }

    let report = feed
        .join()
        .map_err(|_| anyhow::anyhow!("tick feed thread panicked"))?;
    let summary = pipeline.ledger().summary();
    let stats = pipeline.stats();
    info!(
        realized_pnl = summary.realized_pnl,
        trades = summary.trades,
        ticks = stats.ticks_processed,
        rejected = stats.ticks_rejected + report.unparsable,
        "session finished"
    );
    println!(
        "{}",
        serde_json::json!({
            "kind": "summary",
            "session": summary,
            "stats": stats,
            "lines_read": report.lines,
            "lines_unparsable": report.unparsable,
        })
    );
    Ok(())
}
