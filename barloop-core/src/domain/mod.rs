//! Domain types: bars and the event hierarchy.

pub mod bar;
pub mod event;

pub use bar::{Bar, BarField};
pub use event::{
    Event, FillEvent, OrderEvent, OrderKind, OrderSide, SignalDirection, SignalEvent,
};
