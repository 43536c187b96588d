//! The event loop: queue plus the two-phase driver.

mod backtest;
pub mod queue;

pub use backtest::{Backtest, BacktestError, RunCounters};
pub use queue::EventQueue;
