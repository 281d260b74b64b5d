//! Container tracking scenarios through the public graph surface.

use super::test_utils::{dog, new_a, new_b, new_c, reference_config};
use trackle::graph::{wrap, TrackedValue};
use trackle::value::{PlainObject, Value};
use std::collections::BTreeMap;

#[test]
fn test_sequence_append_registers_addition_and_marks_property() {
    let a = wrap(&new_a(), &reference_config());
    a.sequence_mut("Items")
        .unwrap()
        .push(TrackedValue::Plain(Value::text("hola")));

    let delta = a.delta("Items").unwrap();
    assert_eq!(delta.count, 4);
    assert_eq!(delta.added, vec![Value::text("hola")]);
    assert!(delta.removed.is_empty());
    assert!(a.has_changed("Items"));
    assert_eq!(a.change_tracker().changed_count(), 1);
}

#[test]
fn test_wrap_preserves_existing_container_contents() {
    let a = wrap(&new_a(), &reference_config());
    let items = a.sequence("Items").unwrap();
    assert_eq!(items.len(), 3);
    assert_eq!(items.get(0).unwrap().to_plain(), Value::text("item1"));
    assert!(a.change_tracker().changed_properties().is_empty());
}

#[test]
fn test_set_add_intersect_except_sequence() {
    let c = wrap(&new_c(), &reference_config());

    c.unique_set_mut("Dogs")
        .unwrap()
        .add(TrackedValue::Plain(dog("Rex")));
    let delta = c.delta("Dogs").unwrap();
    assert_eq!(delta.count, 3);
    assert_eq!(delta.added, vec![dog("Rex")]);
    assert!(delta.removed.is_empty());

    // Intersect with a value-equal copy of the new element: the baseline
    // dogs are removed, the addition survives.
    c.unique_set_mut("Dogs")
        .unwrap()
        .intersect_with(&[TrackedValue::Plain(dog("Rex"))]);
    let delta = c.delta("Dogs").unwrap();
    assert_eq!(delta.count, 1);
    assert_eq!(delta.added, vec![dog("Rex")]);
    assert_eq!(delta.removed, vec![dog("Doggy"), dog("Bobby")]);

    // Excepting the new element cancels its addition without recording a
    // removal: it was never part of the baseline.
    c.unique_set_mut("Dogs")
        .unwrap()
        .except_with(&[TrackedValue::Plain(dog("Rex"))]);
    let delta = c.delta("Dogs").unwrap();
    assert_eq!(delta.count, 0);
    assert!(delta.added.is_empty());
    assert_eq!(delta.removed, vec![dog("Doggy"), dog("Bobby")]);

    assert!(c.has_changed("Dogs"));
    assert_eq!(c.change_tracker().changed_count(), 1);
}

#[test]
fn test_set_add_marks_exactly_one_property() {
    let c = wrap(&new_c(), &reference_config());
    c.unique_set_mut("Dogs")
        .unwrap()
        .add(TrackedValue::Plain(dog("Rex")));
    assert_eq!(c.change_tracker().changed_count(), 1);
}

#[test]
fn test_map_prepopulated_before_wrap_tracks_additions() {
    let mut dictionary = BTreeMap::new();
    dictionary.insert("hello".to_string(), Value::text("world"));
    let e = PlainObject::new("E")
        .with("Dictionary", Value::Map(dictionary))
        .into_ref();

    let view = wrap(&e, &reference_config());
    assert_eq!(view.map("Dictionary").unwrap().len(), 1);
    assert!(!view.has_changed("Dictionary"));

    view.map_mut("Dictionary")
        .unwrap()
        .insert("bye".to_string(), TrackedValue::Plain(Value::text("bye")));

    assert!(view.has_changed("Dictionary"));
    let delta = view.delta("Dictionary").unwrap();
    assert_eq!(delta.count, 2);
    assert_eq!(delta.added, vec![Value::text("bye")]);
}

#[test]
fn test_sequence_mutation_with_no_net_delta_still_marks() {
    let a = wrap(&new_a(), &reference_config());
    {
        let mut items = a.sequence_mut("Items").unwrap();
        items.push(TrackedValue::Plain(Value::text("hola")));
        items.remove_item(&TrackedValue::Plain(Value::text("hola")));
    }
    let delta = a.delta("Items").unwrap();
    assert!(delta.added.is_empty());
    assert!(delta.removed.is_empty());
    assert!(a.has_changed("Items"));
}

#[test]
fn test_collection_properties_of_untracked_element_types_track_membership() {
    let parent = PlainObject::new("WhateverParent")
        .with("List", Value::sequence(vec![]))
        .with("List2", Value::sequence(vec![]))
        .into_ref();
    let view = wrap(&parent, &reference_config());

    view.sequence_mut("List")
        .unwrap()
        .push(TrackedValue::Plain(Value::Object(
            PlainObject::new("Whatever").into_ref(),
        )));
    view.sequence_mut("List2")
        .unwrap()
        .push(TrackedValue::Plain(Value::text("hey")));

    assert_eq!(view.change_tracker().changed_count(), 2);
    assert_eq!(
        view.change_tracker().changed_properties(),
        vec!["List".to_string(), "List2".to_string()]
    );
}

#[test]
fn test_content_preserved_for_prepopulated_untracked_element_types() {
    let parent = PlainObject::new("WhateverParent")
        .with(
            "List",
            Value::sequence(vec![Value::Object(PlainObject::new("Whatever").into_ref())]),
        )
        .with("List2", Value::sequence(vec![Value::text("hey")]))
        .into_ref();
    let view = wrap(&parent, &reference_config());
    assert_eq!(view.sequence("List").unwrap().len(), 1);
    assert_eq!(view.sequence("List2").unwrap().len(), 1);
}

#[test]
fn test_sequence_of_tracked_dogs_wraps_elements() {
    let b = wrap(&new_b(), &reference_config());
    let dogs = b.sequence("Dogs").unwrap();
    assert_eq!(dogs.len(), 2);
    assert!(dogs.iter().all(TrackedValue::is_tracked));
}
