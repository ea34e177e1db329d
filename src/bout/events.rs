//! Bout events and subscriptions
//!
//! The simulation never calls into HUD, sound or career code. It records
//! what happened in a per-tick `BoutEventLog`; the bout then publishes each
//! event to the subscribers registered on its `EventBus`.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::bout::ai::RuleKind;
use crate::core::types::{Corner, Level, ResourceKind, Second};

/// How a bout was decided
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WinMethod {
    Ko,
    Decision,
    Draw,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BoutEvent {
    RoundStarted {
        round: u32,
    },
    RoundEnded {
        round: u32,
    },
    TimerTick {
        seconds_remaining: u32,
    },
    BoxerKo {
        corner: Corner,
    },
    MatchWinner {
        winner: Option<Corner>,
        /// None for a draw
        winner_name: Option<String>,
        method: WinMethod,
        round: u32,
        /// Seconds into the deciding round
        elapsed_seconds: u32,
    },
    HitUpdate {
        red_hits: u32,
        blue_hits: u32,
    },
    ResourceChanged {
        corner: Corner,
        kind: ResourceKind,
        fraction: f64,
    },
    BreakStarted,
    BreakEnded,
    RuleActivated {
        rule: RuleKind,
        until: Second,
    },
    LevelShifted {
        corner: Corner,
        level: Level,
    },
}

/// Events from a single tick, in the order they happened
#[derive(Debug, Clone, Default)]
pub struct BoutEventLog {
    pub events: Vec<BoutEvent>,
}

impl BoutEventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: BoutEvent) {
        self.events.push(event);
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &BoutEvent> {
        self.events.iter()
    }

    /// Number of events matching a predicate
    pub fn count(&self, predicate: impl Fn(&BoutEvent) -> bool) -> usize {
        self.events.iter().filter(|e| predicate(*e)).count()
    }
}

/// Handle returned by `EventBus::subscribe`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Handler = Box<dyn FnMut(&BoutEvent)>;

/// Subscriber registry owned by one bout
///
/// Closing the bus drops every handler; a closed bus delivers nothing and
/// refuses new subscriptions.
#[derive(Default)]
pub struct EventBus {
    next_id: u64,
    subscribers: Vec<(SubscriptionId, Handler)>,
    closed: bool,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler; returns None once the bus is closed
    pub fn subscribe(&mut self, handler: impl FnMut(&BoutEvent) + 'static) -> Option<SubscriptionId> {
        if self.closed {
            return None;
        }
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscribers.push((id, Box::new(handler)));
        Some(id)
    }

    /// Remove a handler; false if it was not registered
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sid, _)| *sid != id);
        self.subscribers.len() != before
    }

    pub fn publish(&mut self, event: &BoutEvent) {
        if self.closed {
            return;
        }
        for (_, handler) in self.subscribers.iter_mut() {
            handler(event);
        }
    }

    pub fn publish_all(&mut self, log: &BoutEventLog) {
        for event in log.iter() {
            self.publish(event);
        }
    }

    pub fn close(&mut self) {
        self.closed = true;
        self.subscribers.clear();
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.subscribers.len())
            .field("closed", &self.closed)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn recorder() -> (Rc<RefCell<Vec<BoutEvent>>>, impl FnMut(&BoutEvent) + 'static) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        (seen, move |event: &BoutEvent| sink.borrow_mut().push(event.clone()))
    }

    #[test]
    fn test_publish_reaches_all_subscribers() {
        let mut bus = EventBus::new();
        let (first, handler_a) = recorder();
        let (second, handler_b) = recorder();
        bus.subscribe(handler_a);
        bus.subscribe(handler_b);

        bus.publish(&BoutEvent::RoundStarted { round: 1 });

        assert_eq!(first.borrow().len(), 1);
        assert_eq!(second.borrow()[0], BoutEvent::RoundStarted { round: 1 });
    }

    #[test]
    fn test_unsubscribe_stops_delivery() {
        let mut bus = EventBus::new();
        let (seen, handler) = recorder();
        let id = bus.subscribe(handler).unwrap();

        assert!(bus.unsubscribe(id));
        assert!(!bus.unsubscribe(id));
        bus.publish(&BoutEvent::BreakStarted);

        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn test_closed_bus_is_silent() {
        let mut bus = EventBus::new();
        let (seen, handler) = recorder();
        bus.subscribe(handler);
        bus.close();

        bus.publish(&BoutEvent::BreakEnded);
        let (_, late) = recorder();

        assert!(bus.subscribe(late).is_none());
        assert!(seen.borrow().is_empty());
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[test]
    fn test_log_count() {
        let mut log = BoutEventLog::new();
        log.push(BoutEvent::TimerTick { seconds_remaining: 2 });
        log.push(BoutEvent::TimerTick { seconds_remaining: 1 });
        log.push(BoutEvent::RoundEnded { round: 1 });
        assert_eq!(log.count(|e| matches!(e, BoutEvent::TimerTick { .. })), 2);
    }
}
