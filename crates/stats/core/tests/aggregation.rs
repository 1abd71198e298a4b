use std::cell::RefCell;
use std::rc::Rc;

use stat_core::saturation;
use stat_core::{AggregatedValue, ErrorKind, ValueBox, ValueChangeEvent, ValueChangeListener};

fn record(target: &ValueBox) -> Rc<RefCell<Vec<ValueChangeEvent>>> {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    target.add_change_listener(ValueChangeListener::new(move |event| {
        sink.borrow_mut().push(event)
    }));
    seen
}

fn member_sum(total: &AggregatedValue) -> i32 {
    saturation::sum(total.members().iter().map(ValueBox::value))
}

#[test]
fn add_then_update_member() {
    let v1 = ValueBox::new(1);
    let v2 = ValueBox::new(1);
    let agg = AggregatedValue::with_members(&[v1]);
    agg.add_member(&v2).unwrap();

    v2.set_value(5).unwrap();

    assert_eq!(agg.value(), 6);
}

#[test]
fn removed_member_no_longer_propagates() {
    let v1 = ValueBox::new(1);
    let v2 = ValueBox::new(1);
    let agg = AggregatedValue::with_members(&[v1]);
    agg.add_member(&v2).unwrap();
    agg.remove_member(&v2);

    v2.set_value(5).unwrap();

    assert_eq!(agg.value(), 1);
}

#[test]
fn construction_saturates_at_max() {
    let v1 = ValueBox::new(1);
    let v2 = ValueBox::new(i32::MAX);

    let agg = AggregatedValue::with_members(&[v1, v2]);

    assert_eq!(agg.value(), i32::MAX);
}

#[test]
fn empty_aggregate_rejects_writes() {
    let agg = AggregatedValue::new();

    assert_eq!(agg.value(), 0);
    let err = agg.set_value(5).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnsupportedOperation);
}

#[test]
fn sum_stays_consistent_through_edits() {
    let strength = ValueBox::new(3);
    let training = ValueBox::new(2);
    let gear = ValueBox::new(-1);
    let agg = AggregatedValue::with_members(&[strength.clone(), training.clone()]);

    agg.add_member(&gear).unwrap();
    assert_eq!(agg.value(), member_sum(&agg));

    strength.set_value(7).unwrap();
    gear.set_value(4).unwrap();
    assert_eq!(agg.value(), member_sum(&agg));

    agg.remove_member(&training);
    assert_eq!(agg.value(), member_sum(&agg));
    assert_eq!(agg.value(), 11);

    agg.set_members(&[training.clone(), gear.clone()]).unwrap();
    training.set_value(-20).unwrap();
    assert_eq!(agg.value(), member_sum(&agg));
    assert_eq!(agg.value(), -16);
}

#[test]
fn self_aggregation_leaves_members_unchanged() {
    let a = ValueBox::new(2);
    let agg = AggregatedValue::with_members(&[a.clone()]);

    let err = agg.add_member(agg.as_value_box()).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    let members = agg.members();
    assert_eq!(members.len(), 1);
    assert!(members[0].ptr_eq(&a));
}

#[test]
fn event_content_matches_write() {
    let h = ValueBox::new(12);
    let seen = record(&h);

    h.set_value(-4).unwrap();

    let events = seen.borrow();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].source(), h.id());
    assert_eq!(events[0].old_value(), 12);
    assert_eq!(events[0].new_value(), -4);
}

#[test]
fn saturation_boundaries() {
    let top = ValueBox::new(i32::MAX);
    let one = ValueBox::new(1);
    let high = AggregatedValue::with_members(&[top, one.clone()]);
    assert_eq!(high.value(), i32::MAX);

    // continues from the clamp, not from the true sum
    one.set_value(-9).unwrap();
    assert_eq!(high.value(), i32::MAX - 10);

    let bottom = ValueBox::new(i32::MIN);
    let minus_one = ValueBox::new(-1);
    let low = AggregatedValue::with_members(&[bottom, minus_one]);
    assert_eq!(low.value(), i32::MIN);
}

#[test]
fn nested_chain_notifies_depth_first() {
    let order = Rc::new(RefCell::new(Vec::new()));

    let base = ValueBox::new(1);
    let inner = AggregatedValue::with_members(&[base.clone()]);
    let outer = AggregatedValue::with_members(&[inner.as_value_box().clone()]);

    for (tag, target) in [("inner", inner.as_value_box()), ("outer", outer.as_value_box())] {
        let order = Rc::clone(&order);
        target.add_change_listener(ValueChangeListener::new(move |event| {
            order.borrow_mut().push((tag, event.new_value()))
        }));
    }
    let log = Rc::clone(&order);
    base.add_change_listener(ValueChangeListener::new(move |event| {
        log.borrow_mut().push(("base", event.new_value()))
    }));

    base.set_value(4).unwrap();

    // outer subscribed to inner before the tagged listener did, and the whole
    // chain finishes before base's later listener runs
    assert_eq!(
        *order.borrow(),
        vec![("outer", 4), ("inner", 4), ("base", 4)]
    );
}

#[test]
fn listener_on_aggregate_sees_committed_total() {
    let a = ValueBox::new(1);
    let agg = AggregatedValue::with_members(&[a.clone()]);
    let observed = Rc::new(RefCell::new(Vec::new()));
    let reader = agg.clone();
    let sink = Rc::clone(&observed);
    agg.add_change_listener(ValueChangeListener::new(move |event| {
        sink.borrow_mut().push((event.new_value(), reader.value()))
    }));

    a.set_value(10).unwrap();

    assert_eq!(*observed.borrow(), vec![(10, 10)]);
}

#[test]
fn member_outlives_aggregate() {
    let a = ValueBox::new(5);
    let agg = AggregatedValue::with_members(&[a.clone()]);
    drop(agg);

    a.set_value(6).unwrap();

    assert_eq!(a.value(), 6);
    assert_eq!(a.listener_count(), 0);
}
