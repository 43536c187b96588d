//! Multi-symbol time alignment with forward-fill.
//!
//! Given bars for multiple symbols, align them to the union of all symbols'
//! dates. A missing date is padded with the symbol's previous bar (carried
//! forward under the new date); dates before a symbol's first observation
//! become void (NaN) bars. Period returns are derived after padding.

use crate::domain::Bar;
use chrono::NaiveDate;
use std::collections::{BTreeSet, HashMap};

/// Bars for multiple symbols on a common, gap-free timeline.
#[derive(Debug, Clone)]
pub struct AlignedBars {
    /// The common date axis, sorted ascending.
    pub dates: Vec<NaiveDate>,
    /// Bars per symbol; each inner Vec has the same length as `dates`.
    pub bars: HashMap<String, Vec<Bar>>,
    /// Symbols included, in registration order.
    pub symbols: Vec<String>,
}

/// Align multiple symbols to a unified timestamp index, forward-filling gaps.
///
/// Input series are sorted by date before alignment; duplicate dates keep the
/// last occurrence.
pub fn align_and_fill(symbol_bars: HashMap<String, Vec<Bar>>) -> AlignedBars {
    let mut all_dates = BTreeSet::new();
    for bars in symbol_bars.values() {
        for bar in bars {
            all_dates.insert(bar.datetime);
        }
    }
    let dates: Vec<NaiveDate> = all_dates.into_iter().collect();

    let mut symbols: Vec<String> = symbol_bars.keys().cloned().collect();
    symbols.sort();

    let mut aligned: HashMap<String, Vec<Bar>> = HashMap::new();
    for (symbol, mut bars) in symbol_bars {
        bars.sort_by_key(|b| b.datetime);
        let mut date_map: HashMap<NaiveDate, Bar> = HashMap::new();
        for bar in bars {
            date_map.insert(bar.datetime, bar);
        }

        let mut series: Vec<Bar> = Vec::with_capacity(dates.len());
        let mut last_seen: Option<Bar> = None;
        for &date in &dates {
            let bar = match date_map.remove(&date) {
                Some(bar) => bar,
                None => match &last_seen {
                    // Gap: carry the previous bar forward under the new date.
                    Some(prev) => {
                        let mut padded = prev.clone();
                        padded.datetime = date;
                        padded
                    }
                    // Leading gap: the symbol has not started trading yet.
                    None => void_bar(&symbol, date),
                },
            };
            last_seen = Some(bar.clone());
            series.push(bar);
        }

        derive_returns(&mut series);
        aligned.insert(symbol, series);
    }

    AlignedBars {
        dates,
        bars: aligned,
        symbols,
    }
}

/// Fill in `returns` as the pct change of `adj_close` between consecutive
/// non-void bars. The first real bar of a series gets 0.0.
fn derive_returns(series: &mut [Bar]) {
    let mut prev_adj: Option<f64> = None;
    for bar in series.iter_mut() {
        if bar.is_void() {
            continue;
        }
        bar.returns = match prev_adj {
            Some(prev) if prev != 0.0 => bar.adj_close / prev - 1.0,
            _ => 0.0,
        };
        prev_adj = Some(bar.adj_close);
    }
}

fn void_bar(symbol: &str, date: NaiveDate) -> Bar {
    Bar {
        symbol: symbol.to_string(),
        datetime: date,
        open: f64::NAN,
        high: f64::NAN,
        low: f64::NAN,
        close: f64::NAN,
        adj_close: f64::NAN,
        volume: 0,
        returns: 0.0,
    }
}
