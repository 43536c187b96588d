//! Classic moving-average crossover.
//!
//! Goes long when the short simple moving average crosses above the long one
//! and exits when it crosses back below. Short-side entries are out of scope
//! for this strategy.

use crate::data::{DataError, DataHandler};
use crate::domain::{BarField, Event, SignalDirection, SignalEvent};
use crate::engine::EventQueue;
use crate::strategy::Strategy;
use std::collections::HashMap;

#[derive(Debug, Clone)]
pub struct MovingAverageCross {
    short_window: usize,
    long_window: usize,
    in_market: HashMap<String, bool>,
}

impl MovingAverageCross {
    /// Default windows match the common 100/400-day daily-bar setup.
    pub fn new(symbols: &[String]) -> Self {
        Self::with_windows(symbols, 100, 400)
    }

    pub fn with_windows(symbols: &[String], short_window: usize, long_window: usize) -> Self {
        debug_assert!(short_window < long_window);
        Self {
            short_window,
            long_window,
            in_market: symbols.iter().map(|s| (s.clone(), false)).collect(),
        }
    }

    fn mean(values: &[f64]) -> f64 {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

impl Strategy for MovingAverageCross {
    fn calculate_signals(
        &mut self,
        data: &dyn DataHandler,
        events: &mut EventQueue,
    ) -> Result<(), DataError> {
        for symbol in data.symbols() {
            let closes = data.latest_bars_values(symbol, BarField::AdjClose, self.long_window)?;
            // Warm-up: not enough advanced history for the long average yet.
            if closes.len() < self.long_window {
                continue;
            }

            let short_ma = Self::mean(&closes[closes.len() - self.short_window..]);
            let long_ma = Self::mean(&closes);
            let held = self.in_market.get(symbol).copied().unwrap_or(false);

            let direction = if short_ma > long_ma && !held {
                self.in_market.insert(symbol.clone(), true);
                SignalDirection::Long
            } else if short_ma < long_ma && held {
                self.in_market.insert(symbol.clone(), false);
                SignalDirection::Exit
            } else {
                continue;
            };

            events.push(Event::Signal(SignalEvent {
                symbol: symbol.clone(),
                datetime: data.latest_datetime(symbol)?,
                direction,
                strength: 1.0,
            }));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::synthetic::constant_bars;
    use crate::data::HistoricBars;
    use crate::domain::Bar;

    fn handler_from_prices(prices: &[f64]) -> HistoricBars {
        let mut bars = constant_bars("AAPL", prices.len(), 0.0);
        for (bar, &px) in bars.iter_mut().zip(prices) {
            bar.open = px;
            bar.high = px;
            bar.low = px;
            bar.close = px;
            bar.adj_close = px;
        }
        let mut map: HashMap<String, Vec<Bar>> = HashMap::new();
        map.insert("AAPL".to_string(), bars);
        HistoricBars::from_symbol_bars(map)
    }

    fn drain_signals(events: &mut EventQueue) -> Vec<SignalEvent> {
        let mut signals = Vec::new();
        while let Some(event) = events.pop() {
            if let Event::Signal(signal) = event {
                signals.push(signal);
            }
        }
        signals
    }

    fn run(prices: &[f64], short: usize, long: usize) -> Vec<SignalEvent> {
        let mut data = handler_from_prices(prices);
        let mut events = EventQueue::new();
        let mut strategy = MovingAverageCross::with_windows(&["AAPL".to_string()], short, long);
        let mut signals = Vec::new();

        while data.continue_backtest() {
            data.update_bars(&mut events);
            events.pop(); // market event
            strategy.calculate_signals(&data, &mut events).unwrap();
            signals.extend(drain_signals(&mut events));
        }
        signals
    }

    #[test]
    fn silent_during_warmup() {
        let signals = run(&[100.0, 101.0, 102.0], 2, 5);
        assert!(signals.is_empty());
    }

    #[test]
    fn golden_cross_goes_long_once() {
        // Flat then rising: short MA overtakes long MA and stays above.
        let mut prices = vec![100.0; 6];
        prices.extend([101.0, 103.0, 106.0, 110.0]);
        let signals = run(&prices, 2, 5);

        assert_eq!(signals.len(), 1);
        assert_eq!(signals[0].direction, SignalDirection::Long);
    }

    #[test]
    fn death_cross_exits_after_entry() {
        // Rising then falling: enter long, then exit when the trend flips.
        let mut prices = vec![100.0; 6];
        prices.extend([102.0, 104.0, 106.0, 108.0]);
        prices.extend([100.0, 92.0, 84.0, 76.0]);
        let signals = run(&prices, 2, 5);

        assert_eq!(signals.len(), 2);
        assert_eq!(signals[0].direction, SignalDirection::Long);
        assert_eq!(signals[1].direction, SignalDirection::Exit);
    }

    #[test]
    fn no_exit_while_flat() {
        // Falling from the start: short MA below long MA, but never entered.
        let mut prices = vec![100.0; 6];
        prices.extend([95.0, 90.0, 85.0, 80.0]);
        let signals = run(&prices, 2, 5);
        assert!(signals.is_empty());
    }
}
