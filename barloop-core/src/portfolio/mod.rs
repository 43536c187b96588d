//! Portfolio — positions, holdings, and the signal→order sizing rule.
//!
//! The portfolio is the only component that mutates ledger state. It consumes
//! Market events (one mark-to-market snapshot per bar), Signal events (turned
//! into at most one order via a fixed-quantity rule), and Fill events (cash,
//! commission, and position updates). History sequences are append-only: each
//! entry is a frozen copy at that time index.

use crate::data::{DataError, DataHandler};
use crate::domain::{
    BarField, FillEvent, OrderEvent, OrderKind, OrderSide, SignalDirection, SignalEvent,
};
use crate::engine::EventQueue;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Quantity per unit of signal strength for the fixed-quantity sizing rule.
const BASE_ORDER_QUANTITY: f64 = 100.0;

/// Instantaneous mark-to-market state across all symbols.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Holdings {
    /// Dollar value per symbol, marked at the latest adjusted close.
    pub market_values: HashMap<String, f64>,
    pub cash: f64,
    /// Cumulative commission paid since the start of the run.
    pub commission: f64,
    /// Invariant: `total == cash + Σ market_values` after every update.
    pub total: f64,
}

/// Frozen copy of position quantities at one time index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PositionsSnapshot {
    pub datetime: NaiveDate,
    pub positions: HashMap<String, i64>,
}

/// Frozen copy of holdings at one time index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HoldingsSnapshot {
    pub datetime: NaiveDate,
    pub market_values: HashMap<String, f64>,
    pub cash: f64,
    pub commission: f64,
    pub total: f64,
}

/// Ledger owner: current positions/holdings plus their append-only histories.
#[derive(Debug, Clone)]
pub struct Portfolio {
    symbols: Vec<String>,
    initial_capital: f64,
    /// Signed quantity held per symbol; mutated only by fills.
    pub current_positions: HashMap<String, i64>,
    pub current_holdings: Holdings,
    pub all_positions: Vec<PositionsSnapshot>,
    pub all_holdings: Vec<HoldingsSnapshot>,
}

impl Portfolio {
    /// Construct with zero positions and an initial snapshot at `start_date`
    /// carrying `total == initial_capital`.
    pub fn new(symbols: Vec<String>, start_date: NaiveDate, initial_capital: f64) -> Self {
        let zero_positions: HashMap<String, i64> =
            symbols.iter().map(|s| (s.clone(), 0)).collect();
        let zero_values: HashMap<String, f64> =
            symbols.iter().map(|s| (s.clone(), 0.0)).collect();

        let current_holdings = Holdings {
            market_values: zero_values.clone(),
            cash: initial_capital,
            commission: 0.0,
            total: initial_capital,
        };

        Self {
            symbols,
            initial_capital,
            current_positions: zero_positions.clone(),
            all_positions: vec![PositionsSnapshot {
                datetime: start_date,
                positions: zero_positions,
            }],
            all_holdings: vec![HoldingsSnapshot {
                datetime: start_date,
                market_values: zero_values,
                cash: initial_capital,
                commission: 0.0,
                total: initial_capital,
            }],
            current_holdings,
        }
    }

    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    pub fn initial_capital(&self) -> f64 {
        self.initial_capital
    }

    /// Snapshot positions and holdings under the just-advanced bar's
    /// timestamp, marking every symbol at its latest adjusted close.
    ///
    /// Reads only already-advanced data: the handler cannot hand out a bar
    /// the cursor has not reached.
    pub fn update_timeindex(&mut self, data: &impl DataHandler) -> Result<(), DataError> {
        // No tracked symbols means nothing to mark or snapshot.
        let Some(first_symbol) = self.symbols.first() else {
            return Ok(());
        };
        let datetime = data.latest_datetime(first_symbol)?;

        self.all_positions.push(PositionsSnapshot {
            datetime,
            positions: self.current_positions.clone(),
        });

        let mut total = self.current_holdings.cash;
        for symbol in &self.symbols {
            let quantity = self.current_positions[symbol];
            let market_value = if quantity == 0 {
                // A symbol that has never traded may still be in its void
                // leading-gap period; don't let NaN prices poison the total.
                0.0
            } else {
                quantity as f64 * data.latest_bar_value(symbol, BarField::AdjClose)?
            };
            self.current_holdings
                .market_values
                .insert(symbol.clone(), market_value);
            total += market_value;
        }
        self.current_holdings.total = total;

        self.all_holdings.push(HoldingsSnapshot {
            datetime,
            market_values: self.current_holdings.market_values.clone(),
            cash: self.current_holdings.cash,
            commission: self.current_holdings.commission,
            total,
        });
        Ok(())
    }

    /// Turn a signal into at most one market order and enqueue it.
    pub fn update_signal(&mut self, signal: &SignalEvent, events: &mut EventQueue) {
        if let Some(order) = self.generate_order(signal) {
            events.push(crate::domain::Event::Order(order));
        }
    }

    /// Fixed-quantity sizing rule: quantity = floor(100 × strength).
    ///
    /// LONG and SHORT only act from flat; EXIT closes whichever side is held.
    /// Every other combination is silently a no-op. Risk-based sizing is an
    /// extension point that would consume the same SignalEvent.
    pub fn generate_order(&self, signal: &SignalEvent) -> Option<OrderEvent> {
        let quantity = (BASE_ORDER_QUANTITY * signal.strength).floor();
        if !quantity.is_finite() || quantity < 0.0 {
            return None;
        }
        let quantity = quantity as u64;
        let held = self.current_positions.get(&signal.symbol).copied()?;

        let (side, quantity) = match (signal.direction, held) {
            (SignalDirection::Long, 0) => (OrderSide::Buy, quantity),
            (SignalDirection::Short, 0) => (OrderSide::Sell, quantity),
            (SignalDirection::Exit, q) if q > 0 => (OrderSide::Sell, q.unsigned_abs()),
            (SignalDirection::Exit, q) if q < 0 => (OrderSide::Buy, q.unsigned_abs()),
            _ => return None,
        };
        if quantity == 0 {
            return None;
        }

        Some(OrderEvent {
            symbol: signal.symbol.clone(),
            kind: OrderKind::Market,
            quantity,
            side,
        })
    }

    /// Apply a confirmed fill to positions, cash, and commission.
    ///
    /// The fill is valued at the current bar's adjusted close rather than the
    /// venue's reported `fill_cost`: at accounting time the true fill price
    /// is not yet knowable, so the mark uses the same price every other
    /// ledger entry is marked at. `total` is recomputed from cash plus
    /// market values so the conservation invariant holds between bars too.
    pub fn update_fill(
        &mut self,
        fill: &FillEvent,
        data: &impl DataHandler,
    ) -> Result<(), DataError> {
        let direction = fill.side.multiplier();
        let price = data.latest_bar_value(&fill.symbol, BarField::AdjClose)?;
        let cost = direction as f64 * price * fill.quantity as f64;

        *self
            .current_positions
            .entry(fill.symbol.clone())
            .or_insert(0) += direction * fill.quantity as i64;

        *self
            .current_holdings
            .market_values
            .entry(fill.symbol.clone())
            .or_insert(0.0) += cost;
        self.current_holdings.commission += fill.commission;
        self.current_holdings.cash -= cost + fill.commission;
        self.current_holdings.total = self.current_holdings.cash
            + self
                .current_holdings
                .market_values
                .values()
                .sum::<f64>();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::synthetic::constant_bars;
    use crate::data::HistoricBars;
    use crate::domain::Event;

    fn start_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    fn advanced_handler(price: f64, bars: usize) -> HistoricBars {
        let mut map = HashMap::new();
        map.insert("AAPL".to_string(), constant_bars("AAPL", bars, price));
        let mut handler = HistoricBars::from_symbol_bars(map);
        let mut events = EventQueue::new();
        handler.update_bars(&mut events);
        handler
    }

    fn portfolio() -> Portfolio {
        Portfolio::new(vec!["AAPL".to_string()], start_date(), 100_000.0)
    }

    fn signal(direction: SignalDirection, strength: f64) -> SignalEvent {
        SignalEvent {
            symbol: "AAPL".into(),
            datetime: start_date(),
            direction,
            strength,
        }
    }

    fn fill(side: OrderSide, quantity: u64, commission: f64) -> FillEvent {
        FillEvent {
            datetime: start_date(),
            symbol: "AAPL".into(),
            venue: "SIMULATED".into(),
            quantity,
            side,
            fill_cost: 0.0,
            commission,
        }
    }

    #[test]
    fn initial_snapshot_carries_initial_capital() {
        let port = portfolio();
        assert_eq!(port.all_holdings.len(), 1);
        assert_eq!(port.all_holdings[0].total, 100_000.0);
        assert_eq!(port.all_positions[0].positions["AAPL"], 0);
    }

    #[test]
    fn long_signal_from_flat_buys_scaled_quantity() {
        let port = portfolio();
        let order = port.generate_order(&signal(SignalDirection::Long, 0.5)).unwrap();
        assert_eq!(order.side, OrderSide::Buy);
        assert_eq!(order.quantity, 50);
        assert_eq!(order.kind, OrderKind::Market);
    }

    #[test]
    fn short_signal_from_flat_sells_scaled_quantity() {
        let port = portfolio();
        let order = port.generate_order(&signal(SignalDirection::Short, 1.0)).unwrap();
        assert_eq!(order.side, OrderSide::Sell);
        assert_eq!(order.quantity, 100);
    }

    #[test]
    fn long_signal_while_holding_is_noop() {
        let mut port = portfolio();
        port.current_positions.insert("AAPL".into(), 50);
        assert!(port.generate_order(&signal(SignalDirection::Long, 1.0)).is_none());
        assert!(port.generate_order(&signal(SignalDirection::Short, 1.0)).is_none());
    }

    #[test]
    fn exit_closes_long_with_full_quantity() {
        let mut port = portfolio();
        port.current_positions.insert("AAPL".into(), 50);
        let order = port.generate_order(&signal(SignalDirection::Exit, 1.0)).unwrap();
        assert_eq!(order.side, OrderSide::Sell);
        assert_eq!(order.quantity, 50);
    }

    #[test]
    fn exit_closes_short_with_buy() {
        let mut port = portfolio();
        port.current_positions.insert("AAPL".into(), -70);
        let order = port.generate_order(&signal(SignalDirection::Exit, 1.0)).unwrap();
        assert_eq!(order.side, OrderSide::Buy);
        assert_eq!(order.quantity, 70);
    }

    #[test]
    fn exit_while_flat_is_noop() {
        let port = portfolio();
        assert!(port.generate_order(&signal(SignalDirection::Exit, 1.0)).is_none());
    }

    #[test]
    fn zero_strength_yields_no_order() {
        let port = portfolio();
        assert!(port.generate_order(&signal(SignalDirection::Long, 0.0)).is_none());
    }

    #[test]
    fn update_signal_enqueues_order() {
        let mut port = portfolio();
        let mut events = EventQueue::new();
        port.update_signal(&signal(SignalDirection::Long, 1.0), &mut events);
        assert!(matches!(events.pop(), Some(Event::Order(_))));
    }

    #[test]
    fn buy_fill_moves_cash_into_market_value() {
        let handler = advanced_handler(100.0, 3);
        let mut port = portfolio();

        port.update_fill(&fill(OrderSide::Buy, 100, 1.0), &handler).unwrap();

        assert_eq!(port.current_positions["AAPL"], 100);
        assert_eq!(port.current_holdings.market_values["AAPL"], 10_000.0);
        assert_eq!(port.current_holdings.cash, 100_000.0 - 10_001.0);
        assert_eq!(port.current_holdings.commission, 1.0);
    }

    #[test]
    fn fill_valuation_ignores_reported_fill_cost() {
        // The venue's fill_cost is deliberately bogus; the mark must come
        // from the current bar's adjusted close.
        let handler = advanced_handler(100.0, 3);
        let mut port = portfolio();

        let mut bogus = fill(OrderSide::Buy, 10, 0.0);
        bogus.fill_cost = 123_456.0;
        port.update_fill(&bogus, &handler).unwrap();

        assert_eq!(port.current_holdings.market_values["AAPL"], 1_000.0);
        assert_eq!(port.current_holdings.cash, 99_000.0);
    }

    #[test]
    fn conservation_holds_after_fills_and_timeindex() {
        let handler = advanced_handler(50.0, 3);
        let mut port = portfolio();

        for (side, qty) in [
            (OrderSide::Buy, 100),
            (OrderSide::Sell, 30),
            (OrderSide::Sell, 70),
            (OrderSide::Sell, 40),
        ] {
            port.update_fill(&fill(side, qty, 2.0), &handler).unwrap();
            let sum: f64 = port.current_holdings.market_values.values().sum();
            assert!((port.current_holdings.total - (port.current_holdings.cash + sum)).abs() < 1e-9);
        }

        port.update_timeindex(&handler).unwrap();
        let snap = port.all_holdings.last().unwrap();
        let sum: f64 = snap.market_values.values().sum();
        assert!((snap.total - (snap.cash + sum)).abs() < 1e-9);
    }

    #[test]
    fn timeindex_marks_positions_at_latest_close() {
        let handler = advanced_handler(100.0, 3);
        let mut port = portfolio();
        port.update_fill(&fill(OrderSide::Buy, 100, 0.0), &handler).unwrap();

        port.update_timeindex(&handler).unwrap();
        let snap = port.all_holdings.last().unwrap();
        assert_eq!(snap.market_values["AAPL"], 10_000.0);
        assert_eq!(snap.total, 100_000.0);
        assert_eq!(port.all_positions.last().unwrap().positions["AAPL"], 100);
    }

    #[test]
    fn empty_symbol_list_snapshots_nothing() {
        let handler = advanced_handler(100.0, 3);
        let mut port = Portfolio::new(Vec::new(), start_date(), 100_000.0);

        port.update_timeindex(&handler).unwrap();
        assert_eq!(port.all_holdings.len(), 1);
        assert_eq!(port.all_positions.len(), 1);
    }

    #[test]
    fn histories_are_append_only() {
        let handler = advanced_handler(100.0, 3);
        let mut port = portfolio();
        port.update_timeindex(&handler).unwrap();
        port.update_timeindex(&handler).unwrap();
        assert_eq!(port.all_holdings.len(), 3); // initial + two snapshots
        assert_eq!(port.all_positions.len(), 3);
        assert_eq!(port.all_holdings[0].total, 100_000.0);
    }
}
