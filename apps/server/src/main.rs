//! Triangular Arbitrage Bot
//!
//! Watches the target/buy, target/sell and buy/sell books on KuCoin and
//! submits the three legs whenever the cycle clears fees.

mod config;
mod runner;
mod trade_log;

use clap::Parser;
use config::{LoopSettings, DEFAULT_COIN_DELAY_MS, DEFAULT_PASS_DELAY_MS};
use runner::ArbitrageLoop;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{error, info, warn, Level};
use tracing_subscriber::FmtSubscriber;
use trade_log::FileTradeLog;

use triangular_core::{CoreError, RunConfiguration};
use triangular_executor::{EnvCredentialProvider, ExecutorError, KucoinOrderClient};
use triangular_feeds::{FeedError, KucoinRestFetcher, DEFAULT_HOST};

/// Triangular Arbitrage Bot CLI
#[derive(Parser, Debug)]
#[command(name = "triangular-bot")]
#[command(about = "Triangular arbitrage bot for KuCoin", long_about = None)]
struct Args {
    /// Run configuration file path
    #[arg(short, long, default_value = "config.json")]
    config: PathBuf,

    /// Per-coin precision file path
    #[arg(short, long, default_value = "precision.json")]
    precision: PathBuf,

    /// Print the default configuration and exit
    #[arg(long, default_value_t = false)]
    example: bool,

    /// Trade log file path
    #[arg(long, default_value = "trades.log")]
    log_file: PathBuf,

    /// Log level: trace, debug, info, warn, error
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Exchange REST host
    #[arg(long, default_value = DEFAULT_HOST)]
    host: String,

    /// Delay between coins in milliseconds
    #[arg(long, default_value_t = DEFAULT_COIN_DELAY_MS)]
    coin_delay_ms: u64,

    /// Delay after a full pass in milliseconds
    #[arg(long, default_value_t = DEFAULT_PASS_DELAY_MS)]
    pass_delay_ms: u64,

    /// Evaluate cycles without submitting orders
    #[arg(long, default_value_t = false)]
    dry_run: bool,
}

#[derive(Debug, Error)]
enum StartupError {
    #[error(transparent)]
    Config(#[from] CoreError),

    #[error(transparent)]
    Feed(#[from] FeedError),

    #[error(transparent)]
    Executor(#[from] ExecutorError),

    #[error("Failed to render configuration: {0}")]
    Json(#[from] serde_json::Error),
}

fn init_logging(level: &str) {
    let level = match level {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");
}

fn build_loop(args: &Args) -> Result<ArbitrageLoop, StartupError> {
    let run_config = config::load_run_configuration(&args.config)?;
    let precision = config::load_precision_table(&args.precision)?;

    info!(
        "  Targets: {}",
        run_config
            .target_pair
            .iter()
            .map(|t| format!("{} x{}", t.coin, t.amount))
            .collect::<Vec<_>>()
            .join(", ")
    );
    info!("  Buy/Sell: {} / {}", run_config.buy_coin, run_config.sell_coin);
    info!("  Fee: {}%", run_config.fee);
    info!("  Strategy: {:?}", run_config.strategy);

    let fetcher = Arc::new(KucoinRestFetcher::new(&args.host)?);
    let credentials = Arc::new(EnvCredentialProvider::default());
    let executor = Arc::new(KucoinOrderClient::new(&args.host, credentials)?);
    let trade_log = Arc::new(FileTradeLog::new(&args.log_file));

    let settings = LoopSettings {
        coin_delay: Duration::from_millis(args.coin_delay_ms),
        pass_delay: Duration::from_millis(args.pass_delay_ms),
        dry_run: args.dry_run,
    };

    Ok(ArbitrageLoop::new(
        run_config, precision, fetcher, executor, trade_log, settings,
    )?)
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let args = Args::parse();

    init_logging(&args.log_level);

    if args.example {
        match serde_json::to_string_pretty(&RunConfiguration::default()) {
            Ok(json) => println!("{}", json),
            Err(e) => error!("{}", StartupError::from(e)),
        }
        return;
    }

    info!("🚀 Triangular Arbitrage Bot starting...");
    info!("  Host: {}", args.host);
    info!("  Config: {}", args.config.display());
    info!("  Trade Log: {}", args.log_file.display());
    info!("  Dry Run: {}", args.dry_run);

    if args.dry_run {
        warn!("Dry run enabled: orders will not be submitted");
    }

    let arbitrage = match build_loop(&args) {
        Ok(arbitrage) => arbitrage,
        Err(e) => {
            error!("Failed to start: {}", e);
            std::process::exit(1);
        }
    };

    arbitrage.run().await;
}
