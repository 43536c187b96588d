//! Go long each symbol on its first bar and never trade again. Useful as a
//! benchmark and as the simplest possible exercise of the full event chain.

use crate::data::{DataError, DataHandler};
use crate::domain::{Event, SignalDirection, SignalEvent};
use crate::engine::EventQueue;
use crate::strategy::Strategy;
use std::collections::HashMap;

#[derive(Debug, Clone)]
pub struct BuyAndHold {
    bought: HashMap<String, bool>,
}

impl BuyAndHold {
    pub fn new(symbols: &[String]) -> Self {
        Self {
            bought: symbols.iter().map(|s| (s.clone(), false)).collect(),
        }
    }
}

impl Strategy for BuyAndHold {
    fn calculate_signals(
        &mut self,
        data: &dyn DataHandler,
        events: &mut EventQueue,
    ) -> Result<(), DataError> {
        for symbol in data.symbols() {
            if self.bought.get(symbol).copied().unwrap_or(true) {
                continue;
            }
            let bar = data.latest_bar(symbol)?;
            if bar.is_void() {
                // Symbol not trading yet; wait for its first real bar.
                continue;
            }
            events.push(Event::Signal(SignalEvent {
                symbol: symbol.clone(),
                datetime: bar.datetime,
                direction: SignalDirection::Long,
                strength: 1.0,
            }));
            self.bought.insert(symbol.clone(), true);
        }
        Ok(())
    }
}
