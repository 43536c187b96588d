//! Run orchestration: config in, simulated run plus report out.

use crate::report::{EquityReport, SummaryStats};
use anyhow::{bail, Context, Result};
use barloop_core::data::HistoricBars;
use barloop_core::engine::{Backtest, RunCounters};
use barloop_core::execution::{CommissionModel, SimulatedExecutionHandler};
use barloop_core::portfolio::Portfolio;
use barloop_core::strategy::{BuyAndHold, MovingAverageCross, Strategy};
use std::path::PathBuf;
use std::time::Duration;

/// Return observations per year for daily bars.
pub const DAILY_PERIODS: f64 = 252.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyKind {
    BuyAndHold,
    MaCross { short: usize, long: usize },
}

#[derive(Debug, Clone)]
pub struct RunConfig {
    pub data_dir: PathBuf,
    pub symbols: Vec<String>,
    pub initial_capital: f64,
    pub strategy: StrategyKind,
    pub commission: CommissionModel,
    /// Sleep between bars; zero runs flat out.
    pub heartbeat: Duration,
    /// Return observations per year, for annualized statistics.
    pub periods: f64,
}

/// Everything a caller needs after a finished run.
#[derive(Debug, Clone)]
pub struct BacktestRun {
    pub report: EquityReport,
    pub summary: SummaryStats,
    pub counters: RunCounters,
    pub final_total: f64,
}

/// Load CSV data per the config and drive a full backtest.
pub fn run_backtest(config: &RunConfig) -> Result<BacktestRun> {
    if config.symbols.is_empty() {
        bail!("at least one symbol is required");
    }
    if let StrategyKind::MaCross { short, long } = config.strategy {
        if short >= long {
            bail!("short window {short} must be below long window {long}");
        }
    }

    let data = HistoricBars::from_csv_dir(&config.data_dir, &config.symbols)
        .with_context(|| format!("loading bars from {}", config.data_dir.display()))?;
    log::info!(
        "loaded {} bars for {} symbols from {}",
        data.len(),
        config.symbols.len(),
        config.data_dir.display()
    );
    run_with_data(config, data)
}

/// Drive a backtest over already-materialized data. Used by `run_backtest`
/// and directly by tests that build synthetic handlers.
pub fn run_with_data(config: &RunConfig, data: HistoricBars) -> Result<BacktestRun> {
    let start_date = data
        .first_date()
        .context("no bars available for any symbol")?;
    let portfolio = Portfolio::new(config.symbols.clone(), start_date, config.initial_capital);

    match config.strategy {
        StrategyKind::BuyAndHold => {
            drive(config, data, BuyAndHold::new(&config.symbols), portfolio)
        }
        StrategyKind::MaCross { short, long } => drive(
            config,
            data,
            MovingAverageCross::with_windows(&config.symbols, short, long),
            portfolio,
        ),
    }
}

fn drive<S: Strategy>(
    config: &RunConfig,
    data: HistoricBars,
    strategy: S,
    portfolio: Portfolio,
) -> Result<BacktestRun> {
    let backtest = Backtest::new(
        data,
        strategy,
        portfolio,
        SimulatedExecutionHandler::new(config.commission),
    )
    .with_heartbeat(config.heartbeat);

    let (portfolio, counters) = backtest.run().context("backtest aborted")?;

    let report = EquityReport::from_holdings(&portfolio.all_holdings);
    let summary = report.summary(config.periods);
    let final_total = portfolio
        .all_holdings
        .last()
        .map(|h| h.total)
        .unwrap_or(config.initial_capital);

    Ok(BacktestRun {
        report,
        summary,
        counters,
        final_total,
    })
}
