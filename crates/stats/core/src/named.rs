//! Named values: value boxes with stat identity (name + descriptor).
//!
//! The name is a token meant for localisation ("craft", "lore"); the
//! descriptor tells variants of the same stat apart ("craft" / "smithing").
//! Identity is the pair alone: two named values with the same key compare
//! equal whatever they currently hold.

use std::fmt;
use std::hash::{Hash, Hasher};

use crate::error::StatResult;
use crate::event::ValueChangeListener;
use crate::snapshot::NamedSnapshot;
use crate::value::{BoxId, ValueBox};

/// Identity of a named stat.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SkillKey {
    name: String,
    descriptor: String,
}

impl SkillKey {
    pub fn new(name: impl Into<String>, descriptor: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            descriptor: descriptor.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Empty when the stat has no variants.
    pub fn descriptor(&self) -> &str {
        &self.descriptor
    }
}

impl fmt::Display for SkillKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.descriptor.is_empty() {
            f.write_str(&self.name)
        } else {
            write!(f, "{} ({})", self.name, self.descriptor)
        }
    }
}

/// A value box tagged with a [`SkillKey`].
///
/// All value operations go straight to the wrapped box. Cloning shares the
/// box, like cloning a [`ValueBox`].
#[derive(Clone)]
pub struct NamedValue {
    key: SkillKey,
    value: ValueBox,
}

impl NamedValue {
    /// Creates an editable named value.
    pub fn new(name: impl Into<String>, descriptor: impl Into<String>, value: i32) -> Self {
        Self::wrap(SkillKey::new(name, descriptor), ValueBox::new(value))
    }

    /// Creates a named value with no descriptor, starting at zero.
    pub fn named(name: impl Into<String>) -> Self {
        Self::new(name, "", 0)
    }

    /// Tags an existing box, which may be derived.
    pub fn wrap(key: SkillKey, value: ValueBox) -> Self {
        Self { key, value }
    }

    pub fn from_snapshot(snapshot: &NamedSnapshot) -> Self {
        Self::new(
            snapshot.name.clone(),
            snapshot.descriptor.clone(),
            snapshot.value,
        )
    }

    pub fn key(&self) -> &SkillKey {
        &self.key
    }

    pub fn name(&self) -> &str {
        self.key.name()
    }

    pub fn descriptor(&self) -> &str {
        self.key.descriptor()
    }

    pub fn id(&self) -> BoxId {
        self.value.id()
    }

    pub fn value(&self) -> i32 {
        self.value.value()
    }

    /// See [`ValueBox::set_value`].
    pub fn set_value(&self, value: i32) -> StatResult<()> {
        self.value.set_value(value)
    }

    pub fn add_change_listener(&self, listener: ValueChangeListener) {
        self.value.add_change_listener(listener);
    }

    pub fn remove_change_listener(&self, listener: &ValueChangeListener) {
        self.value.remove_change_listener(listener);
    }

    /// The wrapped box, e.g. to aggregate it.
    pub fn value_box(&self) -> &ValueBox {
        &self.value
    }

    /// Same key, independent box with the same current value.
    pub fn detached_copy(&self) -> Self {
        Self::wrap(self.key.clone(), self.value.detached_copy())
    }

    pub fn snapshot(&self) -> NamedSnapshot {
        NamedSnapshot::new(self.name(), self.descriptor(), self.value())
    }
}

impl PartialEq for NamedValue {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for NamedValue {}

impl Hash for NamedValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl AsRef<ValueBox> for NamedValue {
    fn as_ref(&self) -> &ValueBox {
        &self.value
    }
}

impl fmt::Display for NamedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.key, self.value())
    }
}

impl fmt::Debug for NamedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NamedValue")
            .field("name", &self.name())
            .field("descriptor", &self.descriptor())
            .field("value", &self.value())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::AggregatedValue;
    use crate::event::ValueChangeEvent;
    use std::cell::RefCell;
    use std::collections::HashSet;
    use std::rc::Rc;

    #[test]
    fn equality_ignores_value() {
        let a = NamedValue::new("craft", "smithing", 3);
        let b = NamedValue::new("craft", "smithing", 9);
        let c = NamedValue::new("craft", "tailoring", 3);

        assert_eq!(a, b);
        assert_ne!(a, c);

        let set: HashSet<_> = [a, b, c].into_iter().collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn named_defaults() {
        let stealth = NamedValue::named("stealth");

        assert_eq!(stealth.name(), "stealth");
        assert_eq!(stealth.descriptor(), "");
        assert_eq!(stealth.value(), 0);
    }

    #[test]
    fn delegates_events_to_box() {
        let lore = NamedValue::new("lore", "", 1);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        lore.add_change_listener(ValueChangeListener::new(move |e| sink.borrow_mut().push(e)));

        lore.set_value(4).unwrap();

        assert_eq!(
            seen.borrow().as_slice(),
            &[ValueChangeEvent::new(lore.id(), 1, 4)]
        );
    }

    #[test]
    fn wrapped_aggregate_rejects_writes() {
        let total = AggregatedValue::with_members(&[ValueBox::new(2)]);
        let named = NamedValue::wrap(SkillKey::new("defense", ""), total.into_value_box());

        assert!(named.set_value(1).is_err());
        assert_eq!(named.value(), 2);
    }

    #[test]
    fn usable_as_aggregate_member() {
        let athletics = NamedValue::new("athletics", "", 2);
        let total = AggregatedValue::with_members(&[athletics.value_box().clone()]);

        athletics.set_value(6).unwrap();

        assert_eq!(total.value(), 6);
    }

    #[test]
    fn display_includes_descriptor() {
        assert_eq!(NamedValue::new("craft", "smithing", 3).to_string(), "craft (smithing): 3");
        assert_eq!(NamedValue::new("stealth", "", 1).to_string(), "stealth: 1");
    }

    #[test]
    fn snapshot_round_trip_keeps_identity() {
        let original = NamedValue::new("craft", "smithing", 5);

        let restored = NamedValue::from_snapshot(&original.snapshot());

        assert_eq!(restored, original);
        assert_eq!(restored.value(), 5);
        assert_ne!(restored.id(), original.id());
    }
}
