//! Unbounded FIFO event queue.

use crate::domain::Event;
use std::collections::VecDeque;

/// FIFO queue holding all pending events for the current bar.
///
/// `pop` is non-blocking: an empty queue yields `None`, which the drain loop
/// treats as "this bar's cascade has fully resolved", not as an error.
#[derive(Debug, Default)]
pub struct EventQueue {
    inner: VecDeque<Event>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: Event) {
        self.inner.push_back(event);
    }

    pub fn pop(&mut self) -> Option<Event> {
        self.inner.pop_front()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fifo_order_preserved() {
        let mut queue = EventQueue::new();
        queue.push(Event::Market);
        queue.push(Event::Signal(crate::domain::SignalEvent {
            symbol: "AAPL".into(),
            datetime: chrono::NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            direction: crate::domain::SignalDirection::Long,
            strength: 1.0,
        }));

        assert_eq!(queue.len(), 2);
        assert!(matches!(queue.pop(), Some(Event::Market)));
        assert!(matches!(queue.pop(), Some(Event::Signal(_))));
        assert!(queue.pop().is_none());
        assert!(queue.is_empty());
    }
}
