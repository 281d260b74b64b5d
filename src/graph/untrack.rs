//! Untracker: dismantles a tracked view back into plain values.

use crate::graph::{PropertySlot, TrackedObjectRef, TrackedValue};
use crate::value::{ObjectRef, PlainObject, Value};
use std::collections::HashMap;
use tracing::instrument;

/// Materializes the current state of `view` as a plain object graph and
/// retires every wrapper visited: afterwards `is_tracked()` reports false
/// on the view and on every nested wrapper reachable from it, and nothing
/// reachable from the result is a wrapper. Baselines and delta state are
/// discarded. Re-wrapping the result produces a fresh baseline.
#[instrument(skip(view), fields(type_name = %view.type_name()))]
pub fn untrack(view: &TrackedObjectRef) -> ObjectRef {
    let mut registry = HashMap::new();
    materialize_object(view, &mut registry, true)
}

/// Plain projection of the current state without retiring any wrapper.
/// Used for value-equality comparisons between tracked elements.
pub(crate) fn snapshot(view: &TrackedObjectRef) -> ObjectRef {
    let mut registry = HashMap::new();
    materialize_object(view, &mut registry, false)
}

fn materialize_object(
    view: &TrackedObjectRef,
    registry: &mut HashMap<usize, ObjectRef>,
    retire: bool,
) -> ObjectRef {
    if let Some(existing) = registry.get(&view.id()) {
        return existing.clone();
    }

    let plain = PlainObject::new(view.type_name()).into_ref();
    // Registered before recursing so cyclic tracked graphs terminate and
    // shared wrappers map to a single plain instance.
    registry.insert(view.id(), plain.clone());

    let properties: Vec<String> = view.with_slots(|slots| slots.keys().cloned().collect());
    for name in properties {
        let value = materialize_property(view, &name, registry, retire);
        plain.set_property(name, value);
    }

    if retire {
        view.retire();
    }
    plain
}

fn materialize_property(
    view: &TrackedObjectRef,
    property: &str,
    registry: &mut HashMap<usize, ObjectRef>,
    retire: bool,
) -> Value {
    enum Shape {
        Direct(Value),
        Sequence(Vec<TrackedValue>),
        Set(Vec<TrackedValue>),
        Map(Vec<(String, TrackedValue)>),
        Nested(TrackedObjectRef),
    }

    // Cloned out of the slot map so recursion below never overlaps the
    // object borrow.
    let shape = view.with_slots(|slots| match slots.get(property) {
        Some(PropertySlot::Untracked(value)) | Some(PropertySlot::Scalar { value, .. }) => {
            Shape::Direct(value.clone())
        }
        Some(PropertySlot::Sequence(sequence)) => Shape::Sequence(sequence.items().to_vec()),
        Some(PropertySlot::Set(set)) => Shape::Set(set.items().to_vec()),
        Some(PropertySlot::Map(map)) => Shape::Map(
            map.iter()
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect(),
        ),
        Some(PropertySlot::Nested(nested)) => Shape::Nested(nested.clone()),
        None => Shape::Direct(Value::unit()),
    });

    match shape {
        Shape::Direct(value) => value,
        Shape::Sequence(items) => Value::Sequence(
            items
                .into_iter()
                .map(|item| materialize_element(item, registry, retire))
                .collect(),
        ),
        Shape::Set(items) => Value::Set(
            items
                .into_iter()
                .map(|item| materialize_element(item, registry, retire))
                .collect(),
        ),
        Shape::Map(entries) => Value::Map(
            entries
                .into_iter()
                .map(|(key, item)| (key, materialize_element(item, registry, retire)))
                .collect(),
        ),
        Shape::Nested(nested) => Value::Object(materialize_object(&nested, registry, retire)),
    }
}

fn materialize_element(
    element: TrackedValue,
    registry: &mut HashMap<usize, ObjectRef>,
    retire: bool,
) -> Value {
    match element {
        TrackedValue::Plain(value) => value,
        TrackedValue::Object(nested) => {
            Value::Object(materialize_object(&nested, registry, retire))
        }
    }
}
