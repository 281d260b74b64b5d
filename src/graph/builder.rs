//! Graph builder: wraps a plain object graph into a tracked view.

use crate::collections::{TrackedMap, TrackedSequence, TrackedSet};
use crate::config::TrackingConfig;
use crate::graph::registry::WrapRegistry;
use crate::graph::{PropertySink, PropertySlot, TrackedObjectRef, TrackedValue};
use crate::tracker::TrackerRef;
use crate::value::{ObjectRef, Value};
use std::rc::Rc;
use tracing::{debug, instrument};

/// Builds a tracked view over `root`.
///
/// Existing contents become the baseline of every wrapped container;
/// wrapping alters neither element count nor content. Properties the
/// configuration does not track pass through untouched. Wrapping is
/// infallible: shapes with no container adapter degrade to whole-value
/// scalar tracking.
#[instrument(skip(root, config), fields(type_name = %root.type_name()))]
pub fn wrap(root: &ObjectRef, config: &TrackingConfig) -> TrackedObjectRef {
    let mut registry = WrapRegistry::new();
    let view = wrap_object(root, &Rc::new(config.clone()), &mut registry);
    debug!(properties = view.property_names().len(), "wrapped object graph");
    view
}

pub(crate) fn wrap_object(
    object: &ObjectRef,
    config: &Rc<TrackingConfig>,
    registry: &mut WrapRegistry,
) -> TrackedObjectRef {
    if let Some(existing) = registry.get(object.id()) {
        return existing;
    }

    let type_name = object.type_name();
    let view = TrackedObjectRef::new_empty(type_name.clone(), Rc::clone(config));
    // Registered before recursing so self-referential graphs resolve to
    // this wrapper instead of recursing forever.
    registry.insert(object.id(), view.clone());

    for (name, value) in object.properties() {
        let slot = build_slot(&type_name, &name, value, config, &view.change_tracker(), registry);
        view.install_slot(name, slot);
    }
    view
}

/// Dispatches one property value to its slot kind: tracked container,
/// nested tracked object, scalar fallback, or pass-through.
pub(crate) fn build_slot(
    type_name: &str,
    property: &str,
    value: Value,
    config: &Rc<TrackingConfig>,
    owner_tracker: &TrackerRef,
    registry: &mut WrapRegistry,
) -> PropertySlot {
    if !config.is_tracked_property(type_name, property) {
        return PropertySlot::Untracked(value);
    }

    let property_config = config.property_config(type_name, property);
    let sink = Rc::new(PropertySink::new(owner_tracker.downgrade(), property));

    match value {
        Value::Sequence(items) => {
            let elements = items
                .into_iter()
                .map(|item| {
                    wrap_element(
                        item,
                        property_config.track_items,
                        config,
                        owner_tracker,
                        property,
                        registry,
                    )
                })
                .collect();
            let mut sequence = TrackedSequence::wrap(elements);
            sequence.set_sink(sink);
            PropertySlot::Sequence(sequence)
        }
        Value::Set(items) => {
            let elements = items
                .into_iter()
                .map(|item| {
                    wrap_element(
                        item,
                        property_config.track_items,
                        config,
                        owner_tracker,
                        property,
                        registry,
                    )
                })
                .collect();
            let mut set = TrackedSet::wrap(elements);
            set.set_sink(sink);
            PropertySlot::Set(set)
        }
        Value::Map(entries) => {
            let elements = entries
                .into_iter()
                .map(|(key, item)| {
                    let element = wrap_element(
                        item,
                        property_config.track_items,
                        config,
                        owner_tracker,
                        property,
                        registry,
                    );
                    (key, element)
                })
                .collect();
            let mut map = TrackedMap::wrap(elements);
            map.set_sink(sink);
            PropertySlot::Map(map)
        }
        Value::Object(object) if config.is_tracked_type(&object.type_name()) => {
            let nested = wrap_object(&object, config, registry);
            nested.change_tracker().set_parent(owner_tracker, property);
            PropertySlot::Nested(nested)
        }
        // Scalars, and object values of untracked types, fall back to
        // whole-value replacement tracking.
        other => PropertySlot::Scalar {
            value: other,
            equality: property_config.scalar_equality,
        },
    }
}

fn wrap_element(
    value: Value,
    track_items: bool,
    config: &Rc<TrackingConfig>,
    owner_tracker: &TrackerRef,
    property: &str,
    registry: &mut WrapRegistry,
) -> TrackedValue {
    match value {
        Value::Object(object) if track_items && config.is_tracked_type(&object.type_name()) => {
            let nested = wrap_object(&object, config, registry);
            // A nested element's own changes bubble to the property on the
            // enclosing object that holds the container.
            nested.change_tracker().set_parent(owner_tracker, property);
            TrackedValue::Object(nested)
        }
        other => TrackedValue::Plain(other),
    }
}

/// Rebuilds a property slot for a whole-value replacement through the
/// tracked setter, using a registry scoped to this single installation.
pub(crate) fn rebuild_slot(
    view: &TrackedObjectRef,
    property: &str,
    value: Value,
) -> PropertySlot {
    let mut registry = WrapRegistry::new();
    build_slot(
        &view.type_name(),
        property,
        value,
        &view.config(),
        &view.change_tracker(),
        &mut registry,
    )
}
