//! Signal-generating strategies.
//!
//! A strategy reads already-advanced bars through the data handler and emits
//! `Event::Signal`s. It never sizes or places orders; that is the portfolio's
//! job.

mod buy_and_hold;
mod ma_cross;

pub use buy_and_hold::BuyAndHold;
pub use ma_cross::MovingAverageCross;

use crate::data::{DataError, DataHandler};
use crate::engine::EventQueue;

pub trait Strategy {
    /// React to the newest bar, pushing zero or more signals.
    ///
    /// Called once per Market event. Implementations with a warm-up period
    /// must check how much history the handler actually returned.
    fn calculate_signals(
        &mut self,
        data: &dyn DataHandler,
        events: &mut EventQueue,
    ) -> Result<(), DataError>;
}
