//! Change notification: events, listeners and the per-box listener registry.

use std::fmt;
use std::rc::Rc;

use crate::value::BoxId;

/// A single committed mutation of a value box.
///
/// Built fresh for every write and handed to each listener by value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ValueChangeEvent {
    source: BoxId,
    old_value: i32,
    new_value: i32,
}

impl ValueChangeEvent {
    pub const fn new(source: BoxId, old_value: i32, new_value: i32) -> Self {
        Self {
            source,
            old_value,
            new_value,
        }
    }

    /// Identity of the box that emitted this event.
    pub const fn source(&self) -> BoxId {
        self.source
    }

    /// Value immediately before the mutation.
    pub const fn old_value(&self) -> i32 {
        self.old_value
    }

    /// Value immediately after the mutation.
    pub const fn new_value(&self) -> i32 {
        self.new_value
    }
}

/// Callback invoked synchronously after a value box commits a write.
///
/// Identity is the allocation: clones of a listener are the same listener, two
/// listeners built from identical closures are not.
#[derive(Clone)]
pub struct ValueChangeListener {
    callback: Rc<dyn Fn(ValueChangeEvent)>,
}

impl ValueChangeListener {
    pub fn new(callback: impl Fn(ValueChangeEvent) + 'static) -> Self {
        Self {
            callback: Rc::new(callback),
        }
    }

    /// Invokes the callback with `event`.
    pub fn notify(&self, event: ValueChangeEvent) {
        (self.callback)(event)
    }
}

impl PartialEq for ValueChangeListener {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.callback, &other.callback)
    }
}

impl Eq for ValueChangeListener {}

impl fmt::Debug for ValueChangeListener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ValueChangeListener")
            .field(&Rc::as_ptr(&self.callback).cast::<()>())
            .finish()
    }
}

/// Ordered, duplicate-free set of listeners.
///
/// Insertion order is notification order.
#[derive(Clone, Debug, Default)]
pub struct ListenerRegistry {
    listeners: Vec<ValueChangeListener>,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `listener`. Returns `false` if it was already present.
    pub fn insert(&mut self, listener: ValueChangeListener) -> bool {
        if self.contains(&listener) {
            return false;
        }
        self.listeners.push(listener);
        true
    }

    /// Unregisters `listener`. Returns `false` if it was not present.
    pub fn remove(&mut self, listener: &ValueChangeListener) -> bool {
        match self.listeners.iter().position(|l| l == listener) {
            Some(index) => {
                self.listeners.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, listener: &ValueChangeListener) -> bool {
        self.listeners.iter().any(|l| l == listener)
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Copies the current listeners in notification order.
    ///
    /// Dispatch runs over a snapshot so callbacks may register or unregister
    /// listeners on the same box without invalidating the iteration.
    pub fn snapshot(&self) -> Vec<ValueChangeListener> {
        self.listeners.clone()
    }
}
