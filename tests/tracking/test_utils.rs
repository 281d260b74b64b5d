//! Shared fixtures: the reference type universe and its tracking
//! configuration.

use trackle::config::TrackingConfig;
use trackle::schema::Schema;
use trackle::value::{ObjectRef, PlainObject, Value};

/// Schema for the reference object universe used across the scenarios.
pub fn reference_schema() -> Schema {
    Schema::new()
        .with_type("A", ["Items"])
        .with_type("B", ["Dogs"])
        .with_type("C", ["Dogs"])
        .with_type("Dog", ["Name"])
        .with_type("D", ["Mask"])
        .with_type("E", ["Dictionary"])
        .with_type("F", ["ListOfF"])
        .with_type("G", ["Buffer"])
        .with_type("WhateverParent", ["List", "List2"])
}

pub fn reference_config() -> TrackingConfig {
    let mut builder = TrackingConfig::builder();
    builder.track_type("A").include("Items");
    builder.track_type("B").include("Dogs");
    builder.track_type("C").include("Dogs");
    builder.track_type("Dog").include("Name");
    // No includes: every declared property of D is tracked.
    builder.track_type("D");
    builder.track_type("E").include("Dictionary");
    builder.track_type("F").include("ListOfF");
    builder.track_type("G").include("Buffer");
    builder
        .track_type("WhateverParent")
        .include("List")
        .include("List2");
    builder.build(&reference_schema()).unwrap()
}

pub fn dog(name: &str) -> Value {
    Value::Object(
        PlainObject::new("Dog")
            .with("Name", Value::text(name))
            .into_ref(),
    )
}

/// `A` holds a string sequence pre-populated with three items.
pub fn new_a() -> ObjectRef {
    PlainObject::new("A")
        .with(
            "Items",
            Value::sequence(vec![
                Value::text("item1"),
                Value::text("item2"),
                Value::text("item3"),
            ]),
        )
        .into_ref()
}

/// `B` holds a dog sequence; `C` holds a dog set. Both start with Doggy and
/// Bobby.
pub fn new_b() -> ObjectRef {
    PlainObject::new("B")
        .with("Dogs", Value::sequence(vec![dog("Doggy"), dog("Bobby")]))
        .into_ref()
}

pub fn new_c() -> ObjectRef {
    PlainObject::new("C")
        .with("Dogs", Value::set(vec![dog("Doggy"), dog("Bobby")]))
        .into_ref()
}
