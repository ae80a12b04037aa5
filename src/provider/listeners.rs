//! Filter-change subscriptions.
//!
//! Listeners are plain `FnMut()` callbacks; the only message is "the visible
//! set may have changed". Everything runs on the caller's thread.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

type Listener = Rc<ListenerSlot>;

struct ListenerSlot {
    callback: RefCell<Box<dyn FnMut()>>,
    // Notifications not yet delivered to this listener
    pending: Cell<usize>,
}

#[derive(Default)]
struct Registry {
    next_id: u64,
    listeners: Vec<(u64, Listener)>,
}

impl Registry {
    fn contains(&self, id: u64) -> bool {
        self.listeners.iter().any(|(existing, _)| *existing == id)
    }
}

/// Set of registered listeners, owned by the provider
#[derive(Default)]
pub struct ListenerRegistry {
    inner: Rc<RefCell<Registry>>,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, listener: impl FnMut() + 'static) -> Subscription {
        let listener: Listener =
            Rc::new(ListenerSlot { callback: RefCell::new(Box::new(listener)), pending: Cell::new(0) });
        let mut registry = self.inner.borrow_mut();
        let id = registry.next_id;
        registry.next_id += 1;
        registry.listeners.push((id, listener));

        Subscription { handles: vec![(Rc::downgrade(&self.inner), id)] }
    }

    /// Call every listener once, in registration order.
    ///
    /// The listener list is snapshotted first, so callbacks may subscribe or
    /// remove subscriptions. Listeners added during this call are not invoked
    /// and listeners removed during this call are skipped. A listener that
    /// triggers `notify` from inside its own callback is not re-entered: the
    /// nested notification is queued and delivered once the running call
    /// returns.
    pub fn notify(&self) {
        let snapshot: Vec<(u64, Listener)> = self.inner.borrow().listeners.clone();

        for (id, listener) in snapshot {
            if !self.inner.borrow().contains(id) {
                continue;
            }
            listener.pending.set(listener.pending.get() + 1);

            // Already running further up the stack; that frame drains the queue
            let Ok(mut callback) = listener.callback.try_borrow_mut() else {
                continue;
            };
            while listener.pending.get() > 0 {
                listener.pending.set(listener.pending.get() - 1);
                (&mut **callback)();
                if !self.inner.borrow().contains(id) {
                    listener.pending.set(0);
                }
            }
        }
    }

    pub fn len(&self) -> usize {
        self.inner.borrow().listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// De-registration handle returned by `on_filter_changed`.
///
/// Dropping the handle leaves the listener registered; call
/// [`Subscription::remove`] to stop notifications.
pub struct Subscription {
    handles: Vec<(Weak<RefCell<Registry>>, u64)>,
}

impl Subscription {
    /// Unregister every listener this handle covers.
    ///
    /// Does nothing for listeners whose provider is already gone.
    pub fn remove(self) {
        for (registry, id) in self.handles {
            if let Some(registry) = registry.upgrade() {
                registry.borrow_mut().listeners.retain(|(existing, _)| *existing != id);
            }
        }
    }

    /// Merge two handles so that one `remove` unregisters both
    pub fn combine(mut self, other: Subscription) -> Subscription {
        self.handles.extend(other.handles);
        self
    }

    /// True while at least one covered listener is still registered
    pub fn is_active(&self) -> bool {
        self.handles.iter().any(|(registry, id)| {
            registry.upgrade().is_some_and(|registry| registry.borrow().contains(*id))
        })
    }
}
