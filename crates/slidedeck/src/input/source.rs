use std::cell::RefCell;
use std::rc::{Rc, Weak};

use super::KeyDown;

type Listener = Box<dyn FnMut(&mut KeyDown)>;

#[derive(Default)]
struct Listeners {
    next_id: u64,
    entries: Vec<(u64, Listener)>,
}

/// The global key-down event source of a window.
///
/// Listeners are called in subscription order. A listener must not
/// subscribe or unsubscribe from inside its own callback.
#[derive(Clone, Default)]
pub struct KeyboardSource {
    listeners: Rc<RefCell<Listeners>>,
}

impl KeyboardSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `listener` until the returned guard is dropped or disposed.
    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn subscribe(&self, listener: impl FnMut(&mut KeyDown) + 'static) -> Subscription {
        let mut listeners = self.listeners.borrow_mut();
        let id = listeners.next_id;
        listeners.next_id += 1;
        listeners.entries.push((id, Box::new(listener)));
        tracing::debug!(id, "keyboard listener subscribed");
        Subscription {
            listeners: Rc::downgrade(&self.listeners),
            id: Some(id),
        }
    }

    /// Deliver one key-down event to every listener.
    pub fn emit(&self, event: &mut KeyDown) {
        let mut listeners = self.listeners.borrow_mut();
        for (_, listener) in listeners.entries.iter_mut() {
            listener(event);
        }
    }

    #[cfg_attr(not(test), allow(dead_code))]
    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().entries.len()
    }
}

/// Keeps a listener registered on a [`KeyboardSource`].
pub struct Subscription {
    listeners: Weak<RefCell<Listeners>>,
    id: Option<u64>,
}

impl Subscription {
    /// Unsubscribe now.
    pub fn dispose(mut self) {
        self.release();
    }

    pub fn is_active(&self) -> bool {
        self.id.is_some() && self.listeners.strong_count() > 0
    }

    fn release(&mut self) {
        let Some(id) = self.id.take() else {
            return;
        };
        if let Some(listeners) = self.listeners.upgrade() {
            listeners.borrow_mut().entries.retain(|(i, _)| *i != id);
            tracing::debug!(id, "keyboard listener unsubscribed");
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}
