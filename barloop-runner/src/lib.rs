//! Backtest orchestration and performance reporting.
//!
//! Sits on top of the core engine: loads data, picks a strategy, drives the
//! run, and turns the portfolio's holdings history into an equity report
//! with annualized statistics.

pub mod metrics;
pub mod report;
pub mod runner;

pub use report::{EquityReport, EquityRow, SummaryStats};
pub use runner::{run_backtest, run_with_data, BacktestRun, RunConfig, StrategyKind};
