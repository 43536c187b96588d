//! Bar — the fundamental market data unit.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// OHLCV bar for a single symbol at a single timestamp.
///
/// `adj_close` is the dividend/split adjusted close; all portfolio valuation
/// uses it. `returns` is the period-over-period percent change of `adj_close`,
/// filled in during alignment (0.0 on a series' first bar).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bar {
    pub symbol: String,
    pub datetime: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub adj_close: f64,
    pub volume: u64,
    pub returns: f64,
}

impl Bar {
    /// Returns true if any price field is NaN. Alignment emits void bars for
    /// dates before a symbol's first real observation.
    pub fn is_void(&self) -> bool {
        self.open.is_nan()
            || self.high.is_nan()
            || self.low.is_nan()
            || self.close.is_nan()
            || self.adj_close.is_nan()
    }

    /// Read a field through the closed enumeration.
    pub fn field(&self, field: BarField) -> f64 {
        match field {
            BarField::Open => self.open,
            BarField::High => self.high,
            BarField::Low => self.low,
            BarField::Close => self.close,
            BarField::AdjClose => self.adj_close,
            BarField::Volume => self.volume as f64,
            BarField::Returns => self.returns,
        }
    }
}

/// Closed enumeration of bar fields.
///
/// Replaces stringly-typed field lookup: a field that does not exist cannot
/// be asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BarField {
    Open,
    High,
    Low,
    Close,
    AdjClose,
    Volume,
    Returns,
}
