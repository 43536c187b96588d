//! Event-driven backtesting engine.
//!
//! A backtest wires four components to one FIFO event queue: a data handler
//! replays bars, a strategy turns bars into signals, a portfolio turns
//! signals into orders and keeps the ledger, and an execution handler turns
//! orders into fills. The driver alternates between advancing one bar and
//! draining the queue until the cascade from that bar resolves.
//!
//! Swapping the historical data handler or simulated execution handler for
//! live implementations changes nothing else in the system.

pub mod data;
pub mod domain;
pub mod engine;
pub mod execution;
pub mod portfolio;
pub mod strategy;
