//! Bar data: alignment, CSV ingest, handlers, and synthetic generation.
//!
//! The `DataHandler` trait abstracts over bar sources so the rest of the
//! engine is agnostic to whether data is historical or live. The concrete
//! `HistoricBars` handler replays pre-materialized, timestamp-aligned series.

pub mod align;
pub mod handler;
pub mod loader;
pub mod synthetic;

pub use align::{align_and_fill, AlignedBars};
pub use handler::{DataHandler, HistoricBars};
pub use loader::load_csv_dir;

use thiserror::Error;

/// Structured error types for data access.
///
/// Insufficient history is deliberately NOT represented here: accessors
/// return fewer bars than requested and strategies self-check warm-up length.
#[derive(Debug, Error)]
pub enum DataError {
    /// A symbol that was never registered with the handler. Always fatal:
    /// this is a programming or configuration error, never defaulted.
    #[error("unknown symbol: {symbol}")]
    UnknownSymbol { symbol: String },

    /// A latest-bar lookup before any bar has been advanced.
    #[error("no bars advanced yet for {symbol}")]
    NoHistory { symbol: String },

    /// A symbol's series contained no rows at all.
    #[error("empty series for {symbol}")]
    EmptySeries { symbol: String },

    /// A symbol file that could not be opened or parsed. The csv error wraps
    /// io failures too.
    #[error("failed to read {path}: {source}")]
    Csv {
        path: String,
        #[source]
        source: csv::Error,
    },
}
