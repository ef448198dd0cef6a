//! The arbitrage loop.
//!
//! Rotates through the configured target coins forever. Each step runs one
//! cycle (fetch the three books, evaluate, submit if profitable, log) and
//! returns the delay before the next step. A failed cycle is logged and the
//! rotation moves on.

use crate::config::LoopSettings;
use crate::trade_log::{TradeLog, TradeRecord};
use rust_decimal::Decimal;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, error, info};
use triangular_core::{CoreResult, PrecisionTable, RunConfiguration, TargetEntry, TrianglePairs};
use triangular_engine::{ArbitrageCalculator, EngineError, FeeRate, TriangleBooks, TriangleRules};
use triangular_executor::{LimitOrder, OrderExecutor};
use triangular_feeds::{FeedError, MarketDataFetcher};

/// Errors that abort a single cycle.
#[derive(Debug, Error)]
pub enum CycleError {
    #[error("Market data: {0}")]
    Feed(#[from] FeedError),

    #[error("Evaluation: {0}")]
    Engine(#[from] EngineError),
}

/// How a cycle ended when it did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// Verdict was negative; nothing submitted.
    Skipped { change: Decimal },
    /// Verdict was positive but submission is disabled.
    DryRun { change: Decimal },
    /// Orders were submitted.
    Executed {
        change: Decimal,
        legs_succeeded: usize,
    },
}

/// Counters kept across the whole run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleStats {
    pub run: u64,
    pub failed: u64,
    pub executed: u64,
}

pub struct ArbitrageLoop {
    config: RunConfiguration,
    precision: PrecisionTable,
    calculator: ArbitrageCalculator,
    fetcher: Arc<dyn MarketDataFetcher>,
    executor: Arc<dyn OrderExecutor>,
    trade_log: Arc<dyn TradeLog>,
    settings: LoopSettings,
    index: usize,
    cumulative_change: Decimal,
    stats: CycleStats,
}

impl ArbitrageLoop {
    pub fn new(
        config: RunConfiguration,
        precision: PrecisionTable,
        fetcher: Arc<dyn MarketDataFetcher>,
        executor: Arc<dyn OrderExecutor>,
        trade_log: Arc<dyn TradeLog>,
        settings: LoopSettings,
    ) -> CoreResult<Self> {
        config.validate()?;
        let calculator = ArbitrageCalculator::new(FeeRate::from_percent(config.fee), config.strategy);
        Ok(Self {
            config,
            precision,
            calculator,
            fetcher,
            executor,
            trade_log,
            settings,
            index: 0,
            cumulative_change: Decimal::ZERO,
            stats: CycleStats::default(),
        })
    }

    /// Index of the coin the next step will process.
    #[cfg(test)]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Sum of the change of every submitted cycle, in percent.
    pub fn cumulative_change(&self) -> Decimal {
        self.cumulative_change
    }

    pub fn stats(&self) -> CycleStats {
        self.stats
    }

    /// Run forever.
    pub async fn run(mut self) {
        info!(
            "Starting arbitrage loop over {} coins ({} / {})",
            self.config.target_pair.len(),
            self.config.buy_coin,
            self.config.sell_coin
        );
        loop {
            let delay = self.step().await;
            tokio::time::sleep(delay).await;
        }
    }

    /// Process the current coin and advance the rotation.
    ///
    /// Returns how long to wait before the next step.
    pub async fn step(&mut self) -> Duration {
        let entry = self.config.target_pair[self.index].clone();
        info!("Execute pair: Coin {} - Amount {}", entry.coin, entry.amount);

        let started = Instant::now();
        self.stats.run += 1;
        match self.run_cycle(&entry).await {
            Ok(outcome) => {
                if matches!(outcome, CycleOutcome::Executed { .. }) {
                    self.stats.executed += 1;
                }
                debug!("Cycle for {} finished: {:?}", entry.coin, outcome);
            }
            Err(e) => {
                self.stats.failed += 1;
                error!("Cycle for {} failed: {}", entry.coin, e);
            }
        }
        info!("Estimate: {}ms", started.elapsed().as_millis());

        self.advance()
    }

    fn advance(&mut self) -> Duration {
        self.index += 1;
        if self.index < self.config.target_pair.len() {
            return self.settings.coin_delay;
        }
        self.index = 0;
        let stats = self.stats();
        info!(
            "--- Pass complete: {} cycles, {} failed, {} executed, ZChange {}% ---",
            stats.run,
            stats.failed,
            stats.executed,
            self.cumulative_change()
        );
        self.settings.pass_delay
    }

    /// One fetch, evaluate and maybe-execute cycle for `entry`.
    pub async fn run_cycle(&mut self, entry: &TargetEntry) -> Result<CycleOutcome, CycleError> {
        let pairs = TrianglePairs::derive(&entry.coin, &self.config.buy_coin, &self.config.sell_coin);

        let (z, y, l) = tokio::try_join!(
            self.fetcher.fetch_top(&pairs.z),
            self.fetcher.fetch_top(&pairs.y),
            self.fetcher.fetch_top(&pairs.l),
        )?;

        let rules = TriangleRules::resolve(&self.precision, &entry.coin, &self.config.buy_coin);
        let evaluation =
            self.calculator
                .evaluate(&pairs, &TriangleBooks { z, y, l }, &rules, entry.amount)?;
        let change = evaluation.change;

        info!(
            coin = %entry.coin,
            profitable = evaluation.profitable,
            amounts_valid = evaluation.amounts_valid,
            "Change: {}% (left {} / right {})",
            change,
            evaluation.left,
            evaluation.right
        );

        if !evaluation.profitable {
            return Ok(CycleOutcome::Skipped { change });
        }

        let [z_order, y_order, l_order] = evaluation.cycle.legs().map(LimitOrder::from);

        if self.settings.dry_run {
            info!(
                "Dry run, not submitting: {} | {} | {}",
                z_order, y_order, l_order
            );
            return Ok(CycleOutcome::DryRun { change });
        }

        // Legs are independent: a failed leg does not cancel the others.
        let (z_outcome, y_outcome, l_outcome) = tokio::join!(
            self.executor.submit_limit_order(&z_order),
            self.executor.submit_limit_order(&y_order),
            self.executor.submit_limit_order(&l_order),
        );

        self.cumulative_change += change;

        let legs = vec![
            (z_order, z_outcome),
            (y_order, y_outcome),
            (l_order, l_outcome),
        ];
        let legs_succeeded = legs.iter().filter(|(_, outcome)| outcome.is_success()).count();

        let record = TradeRecord::new(
            entry.coin.as_str(),
            change,
            self.cumulative_change,
            legs,
        );
        if let Err(e) = self.trade_log.append(&record) {
            error!("Failed to append trade log: {}", e);
        }
        info!(
            "<{}> Change: {}% - ZChange: {}% ({}/3 legs acknowledged)",
            entry.coin, change, self.cumulative_change, legs_succeeded
        );

        Ok(CycleOutcome::Executed {
            change,
            legs_succeeded,
        })
    }
}
