#![cfg(feature = "serde")]

use stat_core::{NamedSnapshot, NamedValue, ValueBox, ValueSnapshot};

#[test]
fn value_box_round_trips_through_json() {
    let original = ValueBox::new(-17);

    let json = serde_json::to_string(&original.snapshot()).unwrap();
    let restored = ValueBox::from_snapshot(&serde_json::from_str::<ValueSnapshot>(&json).unwrap());

    assert_eq!(restored.value(), -17);
    assert_eq!(restored.listener_count(), 0);
    assert!(!restored.ptr_eq(&original));
}

#[test]
fn named_value_round_trips_through_json() {
    let original = NamedValue::new("craft", "smithing", 6);

    let json = serde_json::to_string(&original.snapshot()).unwrap();
    let snapshot: NamedSnapshot = serde_json::from_str(&json).unwrap();
    let restored = NamedValue::from_snapshot(&snapshot);

    assert_eq!(restored, original);
    assert_eq!(restored.descriptor(), "smithing");
    assert_eq!(restored.value(), 6);
}
