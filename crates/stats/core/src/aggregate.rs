//! Aggregated values: derived boxes holding the saturating sum of their members.
//!
//! # Design
//!
//! An aggregate owns one [`ValueChangeListener`] for its whole lifetime and
//! attaches that same listener to every member. When a member changes, the
//! listener applies `new - old` to the running total in O(1) and the aggregate
//! then notifies its own listeners, so aggregates can be chained.
//!
//! The listener reaches the aggregate through a weak reference, so members
//! never keep an aggregate alive. Dropping the last handle to an aggregate
//! detaches its listener from every member.
//!
//! # Invariants
//!
//! 1. Between calls, `value() == saturation::sum(member values)` as long as no
//!    intermediate result was clamped. After a clamp, later updates continue
//!    from the clamped total.
//! 2. Members are unique by identity; an aggregate never contains itself.
//! 3. A member is subscribed exactly while it is in the member list.
//!
//! Cycles through intermediate aggregates (A contains B, B contains A) are not
//! detected. A change inside such a cycle recurses until the stack overflows.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use crate::error::{StatError, StatResult};
use crate::event::{ValueChangeEvent, ValueChangeListener};
use crate::saturation;
use crate::value::{BoxCell, BoxId, ValueBox, ValueSource};

/// Mutable state behind a derived box.
pub(crate) struct Aggregation {
    total: i32,
    members: Vec<ValueBox>,
    listener: ValueChangeListener,
}

impl Aggregation {
    fn new(listener: ValueChangeListener) -> Self {
        Self {
            total: 0,
            members: Vec::new(),
            listener,
        }
    }

    pub(crate) fn total(&self) -> i32 {
        self.total
    }

    fn position(&self, holder: &ValueBox) -> Option<usize> {
        self.members.iter().position(|m| m.ptr_eq(holder))
    }

    /// Applies `delta` to the total, returning `(old, new)`.
    fn shift(&mut self, delta: i32) -> (i32, i32) {
        let old = self.total;
        self.total = saturation::add(old, delta);
        (old, self.total)
    }

    /// Removes `amount` from the total, returning `(old, new)`.
    fn unshift(&mut self, amount: i32) -> (i32, i32) {
        let old = self.total;
        self.total = saturation::sub(old, amount);
        (old, self.total)
    }
}

impl Drop for Aggregation {
    fn drop(&mut self) {
        for member in &self.members {
            member.cell().try_unsubscribe(&self.listener);
        }
    }
}

/// Reacts to a member's change notification.
fn member_changed(cell: &BoxCell, event: ValueChangeEvent) {
    let ValueSource::Derived(aggregation) = &cell.source else {
        return;
    };
    let delta = saturation::delta(event.old_value(), event.new_value());
    let (old, new) = aggregation.borrow_mut().shift(delta);
    cell.fire(old, new);
}

/// A read-only value box whose value is the sum of other boxes.
///
/// Cloning shares the aggregate. Members are held by shared handle and are
/// never owned exclusively: a box may belong to several aggregates and to
/// the caller at the same time.
#[derive(Clone)]
pub struct AggregatedValue {
    handle: ValueBox,
}

impl AggregatedValue {
    /// Creates an aggregate with no members and a value of zero.
    pub fn new() -> Self {
        let cell = Rc::new_cyclic(|weak: &Weak<BoxCell>| {
            let weak = weak.clone();
            let listener = ValueChangeListener::new(move |event| {
                if let Some(cell) = weak.upgrade() {
                    member_changed(&cell, event);
                }
            });
            BoxCell::new(ValueSource::Derived(RefCell::new(Aggregation::new(
                listener,
            ))))
        });

        Self::from_handle(ValueBox::from_cell(cell))
    }

    /// Wraps a derived box. Every constructor goes through here.
    fn from_handle(handle: ValueBox) -> Self {
        debug_assert!(handle.is_derived(), "aggregate handle over an editable box");
        Self { handle }
    }

    /// Creates an aggregate over `members`.
    ///
    /// Duplicate handles are collapsed and the total is computed from scratch.
    pub fn with_members(members: &[ValueBox]) -> Self {
        let aggregate = Self::new();
        aggregate.replace_members(members);
        aggregate
    }

    /// Views a box as an aggregate, if it is derived.
    pub fn from_value_box(handle: &ValueBox) -> Option<Self> {
        handle
            .is_derived()
            .then(|| Self::from_handle(handle.clone()))
    }

    fn aggregation(&self) -> &RefCell<Aggregation> {
        match &self.handle.cell().source {
            ValueSource::Derived(aggregation) => aggregation,
            ValueSource::Editable(_) => unreachable!("aggregate handle over an editable box"),
        }
    }

    pub fn id(&self) -> BoxId {
        self.handle.id()
    }

    /// Current running total.
    pub fn value(&self) -> i32 {
        self.handle.value()
    }

    /// Always fails: an aggregate is derived from its members.
    ///
    /// # Errors
    ///
    /// [`StatError::DerivedValue`] on every call.
    pub fn set_value(&self, value: i32) -> StatResult<()> {
        self.handle.set_value(value)
    }

    pub fn add_change_listener(&self, listener: ValueChangeListener) {
        self.handle.add_change_listener(listener);
    }

    pub fn remove_change_listener(&self, listener: &ValueChangeListener) {
        self.handle.remove_change_listener(listener);
    }

    /// The aggregate as a plain box, e.g. to make it a member of another aggregate.
    pub fn as_value_box(&self) -> &ValueBox {
        &self.handle
    }

    pub fn into_value_box(self) -> ValueBox {
        self.handle
    }

    /// Adds `holder` and folds its current value into the total.
    ///
    /// Adding a box that is already a member changes nothing and fires no
    /// event.
    ///
    /// # Errors
    ///
    /// [`StatError::SelfAggregation`] if `holder` is this aggregate. Nothing is
    /// modified in that case.
    pub fn add_member(&self, holder: &ValueBox) -> StatResult<()> {
        self.ensure_not_self(holder)?;

        let listener = {
            let aggregation = self.aggregation().borrow();
            if aggregation.position(holder).is_some() {
                tracing::trace!(aggregate = %self.id(), member = %holder.id(), "already a member");
                return Ok(());
            }
            aggregation.listener.clone()
        };

        holder.add_change_listener(listener);
        let contribution = holder.value();
        let (old, new) = {
            let mut aggregation = self.aggregation().borrow_mut();
            aggregation.members.push(holder.clone());
            aggregation.shift(contribution)
        };

        tracing::trace!(aggregate = %self.id(), member = %holder.id(), old, new, "member added");
        self.handle.cell().fire(old, new);
        Ok(())
    }

    /// Removes `holder` and subtracts its current value from the total.
    ///
    /// The aggregate's listener is detached from `holder` either way. Returns
    /// whether `holder` was a member.
    pub fn remove_member(&self, holder: &ValueBox) -> bool {
        let (listener, removed) = {
            let mut aggregation = self.aggregation().borrow_mut();
            let removed = aggregation
                .position(holder)
                .map(|index| aggregation.members.remove(index));
            (aggregation.listener.clone(), removed)
        };

        holder.remove_change_listener(&listener);

        let Some(member) = removed else {
            return false;
        };
        let contribution = member.value();
        let (old, new) = self
            .aggregation()
            .borrow_mut()
            .unshift(contribution);

        tracing::trace!(aggregate = %self.id(), member = %holder.id(), old, new, "member removed");
        self.handle.cell().fire(old, new);
        true
    }

    /// Snapshot of the current members in insertion order.
    ///
    /// The returned vector is a copy; editing it does not affect the aggregate.
    pub fn members(&self) -> Vec<ValueBox> {
        self.aggregation().borrow().members.clone()
    }

    /// Replaces the whole member list and recomputes the total from scratch.
    ///
    /// Every current member is unsubscribed first; duplicates in `members` are
    /// collapsed. A single change event covers the whole replacement.
    ///
    /// # Errors
    ///
    /// [`StatError::SelfAggregation`] if `members` contains this aggregate. The
    /// check runs before anything is modified.
    pub fn set_members(&self, members: &[ValueBox]) -> StatResult<()> {
        for member in members {
            self.ensure_not_self(member)?;
        }
        self.replace_members(members);
        Ok(())
    }

    fn replace_members(&self, members: &[ValueBox]) {
        let (previous, listener) = {
            let mut aggregation = self.aggregation().borrow_mut();
            (
                std::mem::take(&mut aggregation.members),
                aggregation.listener.clone(),
            )
        };
        for member in &previous {
            member.remove_change_listener(&listener);
        }

        let mut next: Vec<ValueBox> = Vec::with_capacity(members.len());
        for member in members {
            if next.iter().any(|m| m.ptr_eq(member)) {
                continue;
            }
            member.add_change_listener(listener.clone());
            next.push(member.clone());
        }

        let total = saturation::sum(next.iter().map(ValueBox::value));
        let old = {
            let mut aggregation = self.aggregation().borrow_mut();
            aggregation.members = next;
            std::mem::replace(&mut aggregation.total, total)
        };

        tracing::trace!(aggregate = %self.id(), old, new = total, "members replaced");
        drop(previous);
        self.handle.cell().fire(old, total);
    }

    /// Returns true if `holder` is currently a member.
    pub fn contains(&self, holder: &ValueBox) -> bool {
        self.aggregation().borrow().position(holder).is_some()
    }

    pub fn len(&self) -> usize {
        self.aggregation().borrow().members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Creates a new aggregate over the same members with its own listeners.
    pub fn detached_copy(&self) -> Self {
        Self::with_members(&self.members())
    }

    fn ensure_not_self(&self, holder: &ValueBox) -> StatResult<()> {
        if holder.ptr_eq(&self.handle) {
            tracing::debug!(aggregate = %self.id(), "rejected self-aggregation");
            return Err(StatError::SelfAggregation { id: self.id() });
        }
        Ok(())
    }
}

impl Default for AggregatedValue {
    fn default() -> Self {
        Self::new()
    }
}

impl From<AggregatedValue> for ValueBox {
    fn from(aggregate: AggregatedValue) -> Self {
        aggregate.into_value_box()
    }
}

impl AsRef<ValueBox> for AggregatedValue {
    fn as_ref(&self) -> &ValueBox {
        &self.handle
    }
}

impl fmt::Debug for AggregatedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let aggregation = self.aggregation().borrow();
        f.debug_struct("AggregatedValue")
            .field("id", &self.id())
            .field("total", &aggregation.total)
            .field(
                "members",
                &aggregation.members.iter().map(ValueBox::id).collect::<Vec<_>>(),
            )
            .finish()
    }
}
