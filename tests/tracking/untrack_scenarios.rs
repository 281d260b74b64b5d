//! Untracker: inverse of wrap.

use super::test_utils::{dog, new_b, reference_config};
use trackle::graph::{untrack, wrap, TrackedValue};
use trackle::value::{PlainObject, Value};

#[test]
fn test_untrack_returns_plain_values_and_retires_wrappers() {
    let b = wrap(&new_b(), &reference_config());
    let first = b
        .sequence("Dogs")
        .unwrap()
        .get(0)
        .and_then(|element| element.as_object().cloned())
        .unwrap();
    first.set("Name", Value::text("Rex"));
    b.sequence_mut("Dogs")
        .unwrap()
        .push(TrackedValue::Plain(dog("Rex")));

    let plain = untrack(&b);

    assert!(!b.is_tracked());
    assert!(!first.is_tracked());
    match plain.property("Dogs") {
        Some(Value::Sequence(items)) => {
            assert_eq!(items.len(), 3);
            // Current state survives, tracking state does not.
            assert_eq!(items[0], dog("Rex"));
        }
        other => panic!("expected plain sequence, got {:?}", other),
    }
}

#[test]
fn test_untrack_materializes_directly_nested_object() {
    use trackle::config::TrackingConfig;
    use trackle::schema::Schema;

    let schema = Schema::new()
        .with_type("Owner", ["Pet"])
        .with_type("Dog", ["Name"]);
    let mut builder = TrackingConfig::builder();
    builder.track_type("Owner").include("Pet");
    builder.track_type("Dog").include("Name");
    let config = builder.build(&schema).unwrap();

    let owner = PlainObject::new("Owner")
        .with("Pet", dog("Doggy"))
        .into_ref();
    let view = wrap(&owner, &config);
    let pet = view.get("Pet").unwrap().as_object().cloned().unwrap();
    pet.set("Name", Value::text("Rex"));

    let plain = untrack(&view);
    assert!(!view.is_tracked());
    assert!(!pet.is_tracked());
    match plain.property("Pet") {
        Some(Value::Object(materialized)) => {
            assert_eq!(materialized.property("Name"), Some(Value::text("Rex")));
        }
        other => panic!("expected plain object, got {:?}", other),
    }
}

#[test]
fn test_untrack_terminates_on_cyclic_graphs() {
    let f = PlainObject::new("F")
        .with("ListOfF", Value::sequence(vec![]))
        .into_ref();
    f.set_property("ListOfF", Value::Sequence(vec![Value::Object(f.clone())]));

    let view = wrap(&f, &reference_config());
    let plain = untrack(&view);
    assert!(!view.is_tracked());

    // The materialized cycle points back at the materialized root.
    match plain.property("ListOfF") {
        Some(Value::Sequence(items)) => match &items[0] {
            Value::Object(element) => assert!(element.ptr_eq(&plain)),
            other => panic!("expected object element, got {:?}", other),
        },
        other => panic!("expected sequence, got {:?}", other),
    }
}

#[test]
fn test_rewrapping_after_untrack_starts_a_fresh_baseline() {
    let b = wrap(&new_b(), &reference_config());
    b.sequence_mut("Dogs")
        .unwrap()
        .push(TrackedValue::Plain(dog("Rex")));
    assert_eq!(b.delta("Dogs").unwrap().added.len(), 1);

    let plain = untrack(&b);
    let rewrapped = wrap(&plain, &reference_config());

    assert!(rewrapped.is_tracked());
    assert!(rewrapped.change_tracker().changed_properties().is_empty());
    let delta = rewrapped.delta("Dogs").unwrap();
    assert_eq!(delta.count, 3);
    assert!(delta.added.is_empty());
    assert!(delta.removed.is_empty());
}

#[test]
fn test_untrack_preserves_scalar_and_map_state() {
    use std::collections::BTreeMap;

    let mut dictionary = BTreeMap::new();
    dictionary.insert("hello".to_string(), Value::text("world"));
    let e = PlainObject::new("E")
        .with("Dictionary", Value::Map(dictionary))
        .into_ref();
    let view = wrap(&e, &reference_config());
    view.map_mut("Dictionary")
        .unwrap()
        .insert("bye".to_string(), TrackedValue::Plain(Value::text("bye")));

    let plain = untrack(&view);
    match plain.property("Dictionary") {
        Some(Value::Map(entries)) => {
            assert_eq!(entries.len(), 2);
            assert_eq!(entries.get("bye"), Some(&Value::text("bye")));
        }
        other => panic!("expected map, got {:?}", other),
    }
}
