//! Order execution: the handler trait, a simulated venue, and commission
//! models.
//!
//! The simulated venue fills every well-formed order immediately at the
//! current bar's adjusted close, with no latency, slippage, or partial fills.
//! A live venue would implement the same trait against a broker API.

use crate::data::{DataError, DataHandler};
use crate::domain::{BarField, Event, FillEvent, OrderEvent};
use crate::engine::EventQueue;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExecutionError {
    #[error(transparent)]
    Data(#[from] DataError),
    #[error("order rejected: {0}")]
    Rejected(String),
}

/// Commission charged per fill.
///
/// `InteractiveBrokers` reproduces the North-America fixed-rate equity
/// schedule: 0.013/share up to 500 shares, 0.008/share beyond, with a 1.30
/// minimum per order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CommissionModel {
    None,
    /// Fixed fee per order.
    Flat(f64),
    PerShare { rate: f64, minimum: f64 },
    /// Fraction of the order's notional value.
    PctOfValue(f64),
    InteractiveBrokers,
}

impl CommissionModel {
    pub fn calculate(&self, quantity: u64, fill_cost: f64) -> f64 {
        let quantity = quantity as f64;
        match *self {
            CommissionModel::None => 0.0,
            CommissionModel::Flat(fee) => fee,
            CommissionModel::PerShare { rate, minimum } => (rate * quantity).max(minimum),
            CommissionModel::PctOfValue(pct) => pct * fill_cost.abs(),
            CommissionModel::InteractiveBrokers => {
                let rate = if quantity <= 500.0 { 0.013 } else { 0.008 };
                (rate * quantity).max(1.3)
            }
        }
    }
}

impl Default for CommissionModel {
    fn default() -> Self {
        CommissionModel::InteractiveBrokers
    }
}

/// Turns orders into fills against some venue.
pub trait ExecutionHandler {
    fn execute_order(
        &mut self,
        order: &OrderEvent,
        data: &dyn DataHandler,
        events: &mut EventQueue,
    ) -> Result<(), ExecutionError>;
}

/// Zero-latency venue that fills at the current bar's adjusted close.
///
/// Limit orders are filled as if marketable; modelling resting orders is a
/// venue concern this simulation does not carry.
#[derive(Debug, Clone)]
pub struct SimulatedExecutionHandler {
    commission: CommissionModel,
}

impl SimulatedExecutionHandler {
    pub const VENUE: &'static str = "SIMULATED";

    pub fn new(commission: CommissionModel) -> Self {
        Self { commission }
    }
}

impl Default for SimulatedExecutionHandler {
    fn default() -> Self {
        Self::new(CommissionModel::default())
    }
}

impl ExecutionHandler for SimulatedExecutionHandler {
    fn execute_order(
        &mut self,
        order: &OrderEvent,
        data: &dyn DataHandler,
        events: &mut EventQueue,
    ) -> Result<(), ExecutionError> {
        if order.quantity == 0 {
            // Malformed order: reject and keep the simulation running.
            log::warn!("rejecting zero-quantity order for {}", order.symbol);
            return Ok(());
        }

        let datetime = data.latest_datetime(&order.symbol)?;
        let price = data.latest_bar_value(&order.symbol, BarField::AdjClose)?;
        let fill_cost = order.side.multiplier() as f64 * price * order.quantity as f64;
        let commission = self.commission.calculate(order.quantity, fill_cost);

        events.push(Event::Fill(FillEvent {
            datetime,
            symbol: order.symbol.clone(),
            venue: Self::VENUE.to_string(),
            quantity: order.quantity,
            side: order.side,
            fill_cost,
            commission,
        }));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::synthetic::constant_bars;
    use crate::data::HistoricBars;
    use crate::domain::{OrderKind, OrderSide};
    use std::collections::HashMap;

    fn advanced_handler(price: f64) -> HistoricBars {
        let mut map = HashMap::new();
        map.insert("AAPL".to_string(), constant_bars("AAPL", 3, price));
        let mut handler = HistoricBars::from_symbol_bars(map);
        let mut events = EventQueue::new();
        handler.update_bars(&mut events);
        handler
    }

    fn order(side: OrderSide, quantity: u64) -> OrderEvent {
        OrderEvent {
            symbol: "AAPL".into(),
            kind: OrderKind::Market,
            quantity,
            side,
        }
    }

    #[test]
    fn ib_commission_schedule() {
        let model = CommissionModel::InteractiveBrokers;
        assert_eq!(model.calculate(10, 0.0), 1.3); // minimum applies
        assert_eq!(model.calculate(200, 0.0), 2.6);
        assert_eq!(model.calculate(500, 0.0), 6.5);
        assert_eq!(model.calculate(1000, 0.0), 8.0); // reduced rate > 500
    }

    #[test]
    fn flat_and_pct_models() {
        assert_eq!(CommissionModel::Flat(5.0).calculate(1000, 0.0), 5.0);
        assert_eq!(CommissionModel::None.calculate(1000, 1.0e6), 0.0);
        let pct = CommissionModel::PctOfValue(0.001);
        assert!((pct.calculate(10, -2000.0) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn per_share_respects_minimum() {
        let model = CommissionModel::PerShare {
            rate: 0.01,
            minimum: 1.0,
        };
        assert_eq!(model.calculate(10, 0.0), 1.0);
        assert_eq!(model.calculate(1000, 0.0), 10.0);
    }

    #[test]
    fn order_fills_at_current_close() {
        let handler = advanced_handler(100.0);
        let mut exec = SimulatedExecutionHandler::new(CommissionModel::Flat(1.0));
        let mut events = EventQueue::new();

        exec.execute_order(&order(OrderSide::Buy, 50), &handler, &mut events)
            .unwrap();

        match events.pop() {
            Some(Event::Fill(fill)) => {
                assert_eq!(fill.symbol, "AAPL");
                assert_eq!(fill.quantity, 50);
                assert_eq!(fill.fill_cost, 5000.0);
                assert_eq!(fill.commission, 1.0);
                assert_eq!(fill.venue, SimulatedExecutionHandler::VENUE);
            }
            other => panic!("expected fill, got {other:?}"),
        }
    }

    #[test]
    fn sell_fill_cost_is_negative() {
        let handler = advanced_handler(100.0);
        let mut exec = SimulatedExecutionHandler::new(CommissionModel::None);
        let mut events = EventQueue::new();

        exec.execute_order(&order(OrderSide::Sell, 30), &handler, &mut events)
            .unwrap();

        match events.pop() {
            Some(Event::Fill(fill)) => assert_eq!(fill.fill_cost, -3000.0),
            other => panic!("expected fill, got {other:?}"),
        }
    }

    #[test]
    fn zero_quantity_order_is_dropped_not_fatal() {
        let handler = advanced_handler(100.0);
        let mut exec = SimulatedExecutionHandler::default();
        let mut events = EventQueue::new();

        exec.execute_order(&order(OrderSide::Buy, 0), &handler, &mut events)
            .unwrap();
        assert!(events.is_empty());
    }

    #[test]
    fn unknown_symbol_propagates() {
        let handler = advanced_handler(100.0);
        let mut exec = SimulatedExecutionHandler::default();
        let mut events = EventQueue::new();
        let mut bad = order(OrderSide::Buy, 10);
        bad.symbol = "GOOG".into();

        let err = exec.execute_order(&bad, &handler, &mut events).unwrap_err();
        assert!(matches!(err, ExecutionError::Data(DataError::UnknownSymbol { .. })));
    }
}
