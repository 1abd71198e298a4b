//! Value boxes: reactive `i32` containers with synchronous change notification.
//!
//! A [`ValueBox`] is a cheap, cloneable handle. Clones refer to the same box,
//! so a box can be shared between a character sheet, any number of
//! aggregates and UI controllers at once. Use [`ValueBox::detached_copy`] for
//! an independent box.
//!
//! Every box has one of two sources:
//!
//! - **Editable**: stores its own value; [`ValueBox::set_value`] replaces it.
//! - **Derived**: the running total of an [`AggregatedValue`]; writes are
//!   rejected with [`StatError::DerivedValue`].

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::aggregate::{AggregatedValue, Aggregation};
use crate::error::{StatError, StatResult};
use crate::event::{ListenerRegistry, ValueChangeEvent, ValueChangeListener};
use crate::snapshot::ValueSnapshot;

static NEXT_BOX_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a value box.
///
/// Carried by every [`ValueChangeEvent`] as its source.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BoxId(u64);

impl BoxId {
    pub(crate) fn next() -> Self {
        Self(NEXT_BOX_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for BoxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Where a box gets its value from.
pub(crate) enum ValueSource {
    Editable(Cell<i32>),
    Derived(RefCell<Aggregation>),
}

/// Shared interior of a [`ValueBox`].
pub(crate) struct BoxCell {
    pub(crate) id: BoxId,
    pub(crate) source: ValueSource,
    listeners: RefCell<ListenerRegistry>,
}

impl BoxCell {
    pub(crate) fn new(source: ValueSource) -> Self {
        Self {
            id: BoxId::next(),
            source,
            listeners: RefCell::new(ListenerRegistry::new()),
        }
    }

    pub(crate) fn value(&self) -> i32 {
        match &self.source {
            ValueSource::Editable(stored) => stored.get(),
            ValueSource::Derived(aggregation) => aggregation.borrow().total(),
        }
    }

    pub(crate) fn subscribe(&self, listener: ValueChangeListener) {
        self.listeners.borrow_mut().insert(listener);
    }

    pub(crate) fn unsubscribe(&self, listener: &ValueChangeListener) {
        self.listeners.borrow_mut().remove(listener);
    }

    /// Unsubscribes unless the registry is mid-mutation.
    ///
    /// Used from `Drop`, where the registry may already be borrowed further up
    /// the stack. A listener left behind this way only holds a dead weak
    /// reference and ignores every event.
    pub(crate) fn try_unsubscribe(&self, listener: &ValueChangeListener) {
        if let Ok(mut listeners) = self.listeners.try_borrow_mut() {
            listeners.remove(listener);
        }
    }

    /// Notifies every listener, in registration order, of a committed change.
    ///
    /// No borrow is held while callbacks run, so listeners may read this box
    /// or edit its listener set.
    pub(crate) fn fire(&self, old_value: i32, new_value: i32) {
        let event = ValueChangeEvent::new(self.id, old_value, new_value);
        let listeners = self.listeners.borrow().snapshot();
        for listener in listeners {
            listener.notify(event);
        }
    }
}

/// Shared handle to a reactive `i32` value.
#[derive(Clone)]
pub struct ValueBox {
    cell: Rc<BoxCell>,
}

impl ValueBox {
    /// Creates an editable box holding `value`.
    pub fn new(value: i32) -> Self {
        Self::from_cell(Rc::new(BoxCell::new(ValueSource::Editable(Cell::new(
            value,
        )))))
    }

    /// Restores an editable box from a snapshot. The listener set starts empty.
    pub fn from_snapshot(snapshot: &ValueSnapshot) -> Self {
        Self::new(snapshot.value)
    }

    pub(crate) fn from_cell(cell: Rc<BoxCell>) -> Self {
        Self { cell }
    }

    pub(crate) fn cell(&self) -> &Rc<BoxCell> {
        &self.cell
    }

    pub fn id(&self) -> BoxId {
        self.cell.id
    }

    /// Current value. Never has side effects.
    pub fn value(&self) -> i32 {
        self.cell.value()
    }

    /// Replaces the stored value and notifies every listener.
    ///
    /// Listeners fire on every call, including writes of the current value,
    /// and observe the new value as already committed. No bounds are applied
    /// here; see [`crate::ValueController`] for bounded editing.
    ///
    /// # Errors
    ///
    /// [`StatError::DerivedValue`] if this box is the total of an aggregate.
    pub fn set_value(&self, value: i32) -> StatResult<()> {
        match &self.cell.source {
            ValueSource::Editable(stored) => {
                let old = stored.replace(value);
                self.cell.fire(old, value);
                Ok(())
            }
            ValueSource::Derived(_) => {
                tracing::debug!(id = %self.id(), value, "rejected write to derived value");
                Err(StatError::DerivedValue { id: self.id() })
            }
        }
    }

    /// Registers `listener`. Registering the same listener twice is a no-op.
    pub fn add_change_listener(&self, listener: ValueChangeListener) {
        self.cell.subscribe(listener);
    }

    /// Unregisters `listener`. Unknown listeners are ignored.
    pub fn remove_change_listener(&self, listener: &ValueChangeListener) {
        self.cell.unsubscribe(listener);
    }

    pub fn listener_count(&self) -> usize {
        self.cell.listeners.borrow().len()
    }

    pub fn is_derived(&self) -> bool {
        matches!(self.cell.source, ValueSource::Derived(_))
    }

    /// Returns true if both handles refer to the same box.
    pub fn ptr_eq(&self, other: &ValueBox) -> bool {
        Rc::ptr_eq(&self.cell, &other.cell)
    }

    /// Creates an independent box with the same current value and no listeners.
    ///
    /// Copying a derived box yields a new aggregate over the same members.
    pub fn detached_copy(&self) -> ValueBox {
        match AggregatedValue::from_value_box(self) {
            Some(aggregate) => aggregate.detached_copy().into_value_box(),
            None => ValueBox::new(self.value()),
        }
    }

    pub fn snapshot(&self) -> ValueSnapshot {
        ValueSnapshot::new(self.value())
    }
}

impl Default for ValueBox {
    fn default() -> Self {
        Self::new(0)
    }
}

impl From<i32> for ValueBox {
    fn from(value: i32) -> Self {
        Self::new(value)
    }
}

impl fmt::Debug for ValueBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValueBox")
            .field("id", &self.id())
            .field("value", &self.value())
            .field("derived", &self.is_derived())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recording(target: &ValueBox) -> Rc<RefCell<Vec<ValueChangeEvent>>> {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        target.add_change_listener(ValueChangeListener::new(move |event| {
            sink.borrow_mut().push(event)
        }));
        seen
    }

    #[test]
    fn default_is_zero() {
        assert_eq!(ValueBox::default().value(), 0);
    }

    #[test]
    fn set_value_reports_old_and_new() {
        let hp = ValueBox::new(7);
        let seen = recording(&hp);

        hp.set_value(12).unwrap();

        assert_eq!(hp.value(), 12);
        assert_eq!(
            seen.borrow().as_slice(),
            &[ValueChangeEvent::new(hp.id(), 7, 12)]
        );
    }

    #[test]
    fn same_value_write_still_fires() {
        let hp = ValueBox::new(3);
        let seen = recording(&hp);

        hp.set_value(3).unwrap();
        hp.set_value(3).unwrap();

        assert_eq!(seen.borrow().len(), 2);
        assert!(seen.borrow().iter().all(|e| e.old_value() == e.new_value()));
    }

    #[test]
    fn duplicate_listener_notified_once() {
        let hp = ValueBox::new(0);
        let count = Rc::new(Cell::new(0));
        let counter = Rc::clone(&count);
        let listener = ValueChangeListener::new(move |_| counter.set(counter.get() + 1));

        hp.add_change_listener(listener.clone());
        hp.add_change_listener(listener);
        hp.set_value(1).unwrap();

        assert_eq!(count.get(), 1);
        assert_eq!(hp.listener_count(), 1);
    }

    #[test]
    fn removed_listener_is_silent() {
        let hp = ValueBox::new(0);
        let count = Rc::new(Cell::new(0));
        let counter = Rc::clone(&count);
        let listener = ValueChangeListener::new(move |_| counter.set(counter.get() + 1));

        hp.add_change_listener(listener.clone());
        hp.set_value(1).unwrap();
        hp.remove_change_listener(&listener);
        hp.set_value(2).unwrap();
        // never registered here
        hp.remove_change_listener(&ValueChangeListener::new(|_| {}));

        assert_eq!(count.get(), 1);
    }

    #[test]
    fn listener_reads_committed_value() {
        let hp = ValueBox::new(1);
        let observed = Rc::new(Cell::new(0));
        let reader = hp.clone();
        let slot = Rc::clone(&observed);
        hp.add_change_listener(ValueChangeListener::new(move |_| slot.set(reader.value())));

        hp.set_value(9).unwrap();

        assert_eq!(observed.get(), 9);
    }

    #[test]
    fn listeners_fire_in_registration_order() {
        let hp = ValueBox::new(0);
        let order = Rc::new(RefCell::new(Vec::new()));
        for tag in ["first", "second", "third"] {
            let order = Rc::clone(&order);
            hp.add_change_listener(ValueChangeListener::new(move |_| {
                order.borrow_mut().push(tag)
            }));
        }

        hp.set_value(5).unwrap();

        assert_eq!(*order.borrow(), vec!["first", "second", "third"]);
    }

    #[test]
    fn listener_may_unsubscribe_itself() {
        let hp = ValueBox::new(0);
        let count = Rc::new(Cell::new(0));
        let slot: Rc<RefCell<Option<ValueChangeListener>>> = Rc::new(RefCell::new(None));

        let target = hp.clone();
        let me = Rc::clone(&slot);
        let counter = Rc::clone(&count);
        let listener = ValueChangeListener::new(move |_| {
            counter.set(counter.get() + 1);
            if let Some(listener) = me.borrow().as_ref() {
                target.remove_change_listener(listener);
            }
        });
        *slot.borrow_mut() = Some(listener.clone());
        hp.add_change_listener(listener);

        hp.set_value(1).unwrap();
        hp.set_value(2).unwrap();

        assert_eq!(count.get(), 1);
        assert_eq!(hp.listener_count(), 0);
    }

    #[test]
    fn detached_copy_is_independent() {
        let original = ValueBox::new(4);
        let seen = recording(&original);
        let copy = original.detached_copy();

        assert_eq!(copy.value(), 4);
        assert_eq!(copy.listener_count(), 0);
        assert!(!copy.ptr_eq(&original));

        copy.set_value(10).unwrap();
        assert_eq!(original.value(), 4);
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn clones_share_the_box() {
        let original = ValueBox::new(1);
        let shared = original.clone();

        shared.set_value(8).unwrap();

        assert!(shared.ptr_eq(&original));
        assert_eq!(original.value(), 8);
    }

    #[test]
    fn ids_are_unique() {
        let a = ValueBox::new(0);
        let b = ValueBox::new(0);
        assert_ne!(a.id(), b.id());
        assert_eq!(a.clone().id(), a.id());
    }
}
