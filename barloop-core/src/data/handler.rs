//! The bar data handler trait and its historical-replay implementation.

use crate::data::{align_and_fill, load_csv_dir, AlignedBars, DataError};
use crate::domain::{Bar, BarField, Event};
use crate::engine::EventQueue;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::path::Path;

/// Uniform bar feed consumed by the engine, portfolio, and strategies.
///
/// A historical and a live implementation are treated identically by the rest
/// of the system: `update_bars` advances exactly one time step and pushes one
/// `Event::Market`, or flips the continuation flag once no further data exists
/// for any symbol. Exhaustion is the loop's normal termination signal, not an
/// error.
///
/// Accessors only see bars that have already been advanced. Asking for more
/// history than exists returns a shorter slice — strategies with a warm-up
/// period must self-check length. Asking about an untracked symbol is fatal.
pub trait DataHandler {
    /// Symbols tracked by this handler.
    fn symbols(&self) -> &[String];

    /// False once no further data exists for any symbol.
    fn continue_backtest(&self) -> bool;

    /// Advance one time step for all tracked symbols, pushing one
    /// `Event::Market`, or signal exhaustion via the continuation flag.
    fn update_bars(&mut self, events: &mut EventQueue);

    /// The last `n` advanced bars for `symbol`, oldest first. Returns fewer
    /// than `n` when insufficient history has been advanced.
    fn latest_bars(&self, symbol: &str, n: usize) -> Result<&[Bar], DataError>;

    /// The most recently advanced bar for `symbol`.
    fn latest_bar(&self, symbol: &str) -> Result<&Bar, DataError> {
        self.latest_bars(symbol, 1)?
            .last()
            .ok_or_else(|| DataError::NoHistory {
                symbol: symbol.to_string(),
            })
    }

    /// Timestamp of the most recently advanced bar for `symbol`.
    fn latest_datetime(&self, symbol: &str) -> Result<NaiveDate, DataError> {
        Ok(self.latest_bar(symbol)?.datetime)
    }

    /// One field of the most recently advanced bar.
    fn latest_bar_value(&self, symbol: &str, field: BarField) -> Result<f64, DataError> {
        Ok(self.latest_bar(symbol)?.field(field))
    }

    /// One field of the last `n` advanced bars, oldest first; shorter than
    /// `n` when insufficient history exists.
    fn latest_bars_values(
        &self,
        symbol: &str,
        field: BarField,
        n: usize,
    ) -> Result<Vec<f64>, DataError> {
        Ok(self
            .latest_bars(symbol, n)?
            .iter()
            .map(|bar| bar.field(field))
            .collect())
    }
}

/// Historical replay over pre-materialized, aligned, forward-filled series.
///
/// A single cursor indexes the unified timeline; accessors slice each
/// symbol's series up to the cursor, so lookahead is impossible by
/// construction.
#[derive(Debug, Clone)]
pub struct HistoricBars {
    aligned: AlignedBars,
    cursor: usize,
    continue_backtest: bool,
}

impl HistoricBars {
    pub fn new(aligned: AlignedBars) -> Self {
        let continue_backtest = !aligned.dates.is_empty();
        Self {
            aligned,
            cursor: 0,
            continue_backtest,
        }
    }

    /// Align an in-memory symbol → bars map and replay it.
    pub fn from_symbol_bars(symbol_bars: HashMap<String, Vec<Bar>>) -> Self {
        Self::new(align_and_fill(symbol_bars))
    }

    /// Load `{dir}/{symbol}.csv` for every symbol, align, and replay.
    pub fn from_csv_dir(dir: &Path, symbols: &[String]) -> Result<Self, DataError> {
        Ok(Self::from_symbol_bars(load_csv_dir(dir, symbols)?))
    }

    /// Number of bars on the unified timeline.
    pub fn len(&self) -> usize {
        self.aligned.dates.len()
    }

    /// First date on the unified timeline, if any data exists.
    pub fn first_date(&self) -> Option<NaiveDate> {
        self.aligned.dates.first().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.aligned.dates.is_empty()
    }

    fn series(&self, symbol: &str) -> Result<&[Bar], DataError> {
        self.aligned
            .bars
            .get(symbol)
            .map(Vec::as_slice)
            .ok_or_else(|| DataError::UnknownSymbol {
                symbol: symbol.to_string(),
            })
    }
}

impl DataHandler for HistoricBars {
    fn symbols(&self) -> &[String] {
        &self.aligned.symbols
    }

    fn continue_backtest(&self) -> bool {
        self.continue_backtest
    }

    fn update_bars(&mut self, events: &mut EventQueue) {
        if self.cursor < self.aligned.dates.len() {
            self.cursor += 1;
            events.push(Event::Market);
        }
        if self.cursor >= self.aligned.dates.len() {
            self.continue_backtest = false;
        }
    }

    fn latest_bars(&self, symbol: &str, n: usize) -> Result<&[Bar], DataError> {
        let series = self.series(symbol)?;
        let advanced = &series[..self.cursor];
        let start = advanced.len().saturating_sub(n);
        Ok(&advanced[start..])
    }
}
