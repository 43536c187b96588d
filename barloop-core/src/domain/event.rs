//! Event model — the four event kinds flowing through the simulation queue.
//!
//! Events are immutable once constructed. One market update cascades through
//! the queue as Market → Signal → Order → Fill, and the whole chain resolves
//! before the next bar is requested.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Trade intent emitted by a strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SignalDirection {
    Long,
    Short,
    Exit,
}

/// Side of an order or fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderSide {
    Buy,
    Sell,
}

impl OrderSide {
    /// Signed direction multiplier: buys add to a position, sells subtract.
    pub fn multiplier(self) -> i64 {
        match self {
            OrderSide::Buy => 1,
            OrderSide::Sell => -1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderKind {
    Market,
    Limit,
}

/// A strategy's trade intent for one symbol.
///
/// `strength` is a non-negative scaling suggestion; the portfolio's sizing
/// rule turns it into a quantity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignalEvent {
    pub symbol: String,
    pub datetime: NaiveDate,
    pub direction: SignalDirection,
    pub strength: f64,
}

/// The portfolio's decision to trade, handed to an execution handler.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderEvent {
    pub symbol: String,
    pub kind: OrderKind,
    pub quantity: u64,
    pub side: OrderSide,
}

/// A confirmed execution, as reported by the (simulated) venue.
///
/// `fill_cost` is the venue's reported dollar value of the fill. Portfolio
/// accounting marks positions at the current bar's adjusted close instead;
/// see `Portfolio::update_fill`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FillEvent {
    pub datetime: NaiveDate,
    pub symbol: String,
    pub venue: String,
    pub quantity: u64,
    pub side: OrderSide,
    pub fill_cost: f64,
    pub commission: f64,
}

/// One step of the simulation, dispatched by the event loop.
///
/// `Market` carries no payload: it means "a new bar is available for all
/// symbols", and consumers read the bar through their data handler.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    Market,
    Signal(SignalEvent),
    Order(OrderEvent),
    Fill(FillEvent),
}
