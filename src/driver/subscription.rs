//! Observer list used by every device object to announce state changes.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Identifies which part of a device's state changed.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum StateField {
    Power,
    Mode,
    FanSpeed,
    Temperature,
    Damper,
    Spill,
    Timer,
    Console,
}

pub type Listener = Rc<dyn Fn(StateField)>;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

#[derive(Default)]
pub struct Subscribers {
    next_id: Cell<u64>,
    listeners: RefCell<Vec<(SubscriptionId, Listener)>>,
}

impl Subscribers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, listener: Listener) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.listeners.borrow_mut().push((id, listener));
        id
    }

    /// Returns `false` if the id was not (or no longer) subscribed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut listeners = self.listeners.borrow_mut();
        let before = listeners.len();
        listeners.retain(|(sid, _)| *sid != id);
        listeners.len() != before
    }

    pub fn notify(&self, field: StateField) {
        // Listeners may (un)subscribe while being called, so iterate over a copy.
        let listeners: Vec<Listener> = self.listeners.borrow().iter().map(|(_, l)| Rc::clone(l)).collect();
        for listener in listeners {
            listener(field);
        }
    }

    pub fn len(&self) -> usize {
        self.listeners.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
