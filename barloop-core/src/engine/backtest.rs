//! Two-phase simulation driver.
//!
//! Outer phase: ask the data handler to advance one bar (or learn that data
//! is exhausted). Inner phase: drain the queue to empty, re-checking after
//! every dispatch so a Market → Signal → Order → Fill cascade resolves fully
//! within the bar that produced it. Exhaustion ends the run normally; only
//! component errors abort it.

use crate::data::{DataError, DataHandler};
use crate::domain::Event;
use crate::engine::EventQueue;
use crate::execution::{ExecutionError, ExecutionHandler};
use crate::portfolio::Portfolio;
use crate::strategy::Strategy;
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;

/// Fatal simulation failure, tagged with the bar index it occurred on.
#[derive(Debug, Error)]
pub enum BacktestError {
    #[error("data error at bar {bar}: {source}")]
    Data {
        bar: u64,
        #[source]
        source: DataError,
    },
    #[error("execution error at bar {bar}: {source}")]
    Execution {
        bar: u64,
        #[source]
        source: ExecutionError,
    },
}

/// Diagnostic totals accumulated over a run.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct RunCounters {
    pub bars: u64,
    pub signals: u64,
    pub orders: u64,
    pub fills: u64,
}

/// Wires a data handler, strategy, portfolio, and execution handler to one
/// event queue and drives them to data exhaustion.
pub struct Backtest<D, S, E> {
    data: D,
    strategy: S,
    portfolio: Portfolio,
    execution: E,
    events: EventQueue,
    heartbeat: Duration,
    counters: RunCounters,
}

impl<D, S, E> Backtest<D, S, E>
where
    D: DataHandler,
    S: Strategy,
    E: ExecutionHandler,
{
    pub fn new(data: D, strategy: S, portfolio: Portfolio, execution: E) -> Self {
        Self {
            data,
            strategy,
            portfolio,
            execution,
            events: EventQueue::new(),
            heartbeat: Duration::ZERO,
            counters: RunCounters::default(),
        }
    }

    /// Sleep this long after each drained bar. Zero (the default) runs flat
    /// out; a live feed would use the heartbeat to pace polling.
    pub fn with_heartbeat(mut self, heartbeat: Duration) -> Self {
        self.heartbeat = heartbeat;
        self
    }

    pub fn portfolio(&self) -> &Portfolio {
        &self.portfolio
    }

    pub fn counters(&self) -> RunCounters {
        self.counters
    }

    /// Run to data exhaustion, then hand back the final portfolio and
    /// counters.
    pub fn run(mut self) -> Result<(Portfolio, RunCounters), BacktestError> {
        log::info!(
            "starting backtest over {} symbols",
            self.portfolio.symbols().len()
        );

        while self.data.continue_backtest() {
            self.counters.bars += 1;
            self.data.update_bars(&mut self.events);
            self.drain_bar()?;
            if !self.heartbeat.is_zero() {
                std::thread::sleep(self.heartbeat);
            }
        }

        log::info!(
            "backtest finished: {} bars, {} signals, {} orders, {} fills",
            self.counters.bars,
            self.counters.signals,
            self.counters.orders,
            self.counters.fills
        );
        Ok((self.portfolio, self.counters))
    }

    /// Dispatch until the queue is empty. Emptiness is re-checked after every
    /// event, so anything a handler pushes is consumed within the same bar.
    fn drain_bar(&mut self) -> Result<(), BacktestError> {
        let bar = self.counters.bars;
        while let Some(event) = self.events.pop() {
            match event {
                Event::Market => {
                    self.strategy
                        .calculate_signals(&self.data, &mut self.events)
                        .map_err(|source| BacktestError::Data { bar, source })?;
                    self.portfolio
                        .update_timeindex(&self.data)
                        .map_err(|source| BacktestError::Data { bar, source })?;
                }
                Event::Signal(signal) => {
                    self.counters.signals += 1;
                    self.portfolio.update_signal(&signal, &mut self.events);
                }
                Event::Order(order) => {
                    self.counters.orders += 1;
                    self.execution
                        .execute_order(&order, &self.data, &mut self.events)
                        .map_err(|source| BacktestError::Execution { bar, source })?;
                }
                Event::Fill(fill) => {
                    self.counters.fills += 1;
                    self.portfolio
                        .update_fill(&fill, &self.data)
                        .map_err(|source| BacktestError::Data { bar, source })?;
                }
            }
        }
        Ok(())
    }
}
