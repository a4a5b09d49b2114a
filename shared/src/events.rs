//! Typed domain events and the observer bus that carries them
//!
//! Producers and consumers agree on payloads through the enums below
//! instead of string-named notifications.

use chrono::NaiveDate;

use crate::schedule::{ListType, Schedule};
use crate::settings::ChartSettings;

/// Handle returned by [`EventBus::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener<E> = Box<dyn FnMut(&E)>;

/// Single-threaded observer list for one event type
pub struct EventBus<E> {
    listeners: Vec<(ListenerId, Listener<E>)>,
    next_id: u64,
}

impl<E> Default for EventBus<E> {
    fn default() -> Self {
        Self {
            listeners: Vec::new(),
            next_id: 0,
        }
    }
}

impl<E> std::fmt::Debug for EventBus<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl<E> EventBus<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener; it is called for every later `emit`
    pub fn subscribe(&mut self, listener: impl FnMut(&E) + 'static) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener. Returns false if it was not registered.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }

    /// Deliver `event` to every listener in subscription order
    pub fn emit(&mut self, event: &E) {
        for (_, listener) in self.listeners.iter_mut() {
            listener(event);
        }
    }

    /// Drop all listeners
    pub fn clear(&mut self) {
        self.listeners.clear();
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

/// Events a chart emits to its host
#[derive(Debug, Clone, PartialEq)]
pub enum ChartEvent {
    /// The user asked for a new schedule over an interval
    CreateScheduleRequested {
        start_time: u32,
        end_time: u32,
        date: NaiveDate,
    },
    /// The user asked to edit an existing schedule
    EditScheduleRequested { schedule: Schedule, date: NaiveDate },
}

/// Change notifications published by a schedule store
#[derive(Debug, Clone, PartialEq)]
pub enum StoreEvent {
    /// The full list for `(date, list)` after a mutation
    SchedulesChanged {
        date: NaiveDate,
        list: ListType,
        schedules: Vec<Schedule>,
    },
}

/// Change notifications published by a settings provider
#[derive(Debug, Clone, PartialEq)]
pub enum SettingsEvent {
    Changed { settings: ChartSettings },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_emit_reaches_subscribers_in_order() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut bus: EventBus<u32> = EventBus::new();

        let first = Rc::clone(&seen);
        bus.subscribe(move |v| first.borrow_mut().push(("a", *v)));
        let second = Rc::clone(&seen);
        bus.subscribe(move |v| second.borrow_mut().push(("b", *v)));

        bus.emit(&7);
        assert_eq!(*seen.borrow(), vec![("a", 7), ("b", 7)]);
    }

    #[test]
    fn test_unsubscribe_stops_delivery() {
        let count = Rc::new(RefCell::new(0));
        let mut bus: EventBus<()> = EventBus::new();

        let counter = Rc::clone(&count);
        let id = bus.subscribe(move |_| *counter.borrow_mut() += 1);
        bus.emit(&());
        assert!(bus.unsubscribe(id));
        assert!(!bus.unsubscribe(id));
        bus.emit(&());

        assert_eq!(*count.borrow(), 1);
        assert_eq!(bus.listener_count(), 0);
    }
}
