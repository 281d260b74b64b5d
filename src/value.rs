//! Dynamic value model for tracked object graphs.
//!
//! Values are dispatched over a closed set of shapes: the three supported
//! container shapes (sequence, unique-set, map), object references, and a
//! scalar leaf for everything else. Byte buffers and bit vectors are
//! deliberately scalar: they are container-shaped but have no container
//! adapter, so they are tracked by whole-value replacement only.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

/// Leaf value with no container adapter.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Unit,
    Bool(bool),
    Int(i64),
    Text(String),
    /// Raw byte buffer. Container-shaped, tracked as an opaque scalar.
    Bytes(Vec<u8>),
    /// Bit vector. Container-shaped, tracked as an opaque scalar.
    Bits(Vec<bool>),
}

/// A value in an object graph.
#[derive(Debug, Clone)]
pub enum Value {
    Scalar(Scalar),
    /// Ordered, duplicates allowed.
    Sequence(Vec<Value>),
    /// Unique elements by value equality, insertion order preserved.
    Set(Vec<Value>),
    /// Unique string keys.
    Map(BTreeMap<String, Value>),
    Object(ObjectRef),
}

impl Value {
    pub fn unit() -> Self {
        Value::Scalar(Scalar::Unit)
    }

    pub fn boolean(value: bool) -> Self {
        Value::Scalar(Scalar::Bool(value))
    }

    pub fn int(value: i64) -> Self {
        Value::Scalar(Scalar::Int(value))
    }

    pub fn text(value: impl Into<String>) -> Self {
        Value::Scalar(Scalar::Text(value.into()))
    }

    pub fn bytes(value: impl Into<Vec<u8>>) -> Self {
        Value::Scalar(Scalar::Bytes(value.into()))
    }

    pub fn bits(value: impl Into<Vec<bool>>) -> Self {
        Value::Scalar(Scalar::Bits(value.into()))
    }

    pub fn sequence(items: impl Into<Vec<Value>>) -> Self {
        Value::Sequence(items.into())
    }

    /// Builds a set value, dropping duplicates by value equality while
    /// preserving first-occurrence order.
    pub fn set(items: impl Into<Vec<Value>>) -> Self {
        let mut unique: Vec<Value> = Vec::new();
        for item in items.into() {
            if !unique.contains(&item) {
                unique.push(item);
            }
        }
        Value::Set(unique)
    }

    pub fn map(entries: impl IntoIterator<Item = (String, Value)>) -> Self {
        Value::Map(entries.into_iter().collect())
    }

    pub fn object(object: ObjectRef) -> Self {
        Value::Object(object)
    }

    /// Shape name for logging.
    pub fn shape(&self) -> &'static str {
        match self {
            Value::Scalar(_) => "scalar",
            Value::Sequence(_) => "sequence",
            Value::Set(_) => "set",
            Value::Map(_) => "map",
            Value::Object(_) => "object",
        }
    }

    pub fn as_object(&self) -> Option<&ObjectRef> {
        match self {
            Value::Object(object) => Some(object),
            _ => None,
        }
    }
}

/// An object: a type name plus named properties.
#[derive(Debug, Clone, PartialEq)]
pub struct PlainObject {
    type_name: String,
    properties: BTreeMap<String, Value>,
}

impl PlainObject {
    pub fn new(type_name: impl Into<String>) -> Self {
        PlainObject {
            type_name: type_name.into(),
            properties: BTreeMap::new(),
        }
    }

    /// Builder-style property assignment.
    pub fn with(mut self, name: impl Into<String>, value: Value) -> Self {
        self.properties.insert(name.into(), value);
        self
    }

    pub fn into_ref(self) -> ObjectRef {
        ObjectRef::new(self)
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn property(&self, name: &str) -> Option<&Value> {
        self.properties.get(name)
    }

    pub fn set_property(&mut self, name: impl Into<String>, value: Value) {
        self.properties.insert(name.into(), value);
    }

    pub fn properties(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.properties.iter()
    }
}

/// Shared, mutable handle to an object. Identity is `Rc` pointer identity;
/// equality is structural (type name plus properties).
///
/// Structural equality recurses through nested objects with a visited set
/// of in-progress instance pairs, so comparing cyclic graphs terminates: a
/// pair reached again while still being compared is provisionally equal.
#[derive(Clone)]
pub struct ObjectRef(Rc<RefCell<PlainObject>>);

impl ObjectRef {
    pub fn new(object: PlainObject) -> Self {
        ObjectRef(Rc::new(RefCell::new(object)))
    }

    /// Stable identity key for registry lookups.
    pub fn id(&self) -> usize {
        Rc::as_ptr(&self.0) as *const () as usize
    }

    pub fn ptr_eq(&self, other: &ObjectRef) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub fn type_name(&self) -> String {
        self.0.borrow().type_name.clone()
    }

    pub fn property(&self, name: &str) -> Option<Value> {
        self.0.borrow().properties.get(name).cloned()
    }

    pub fn set_property(&self, name: impl Into<String>, value: Value) {
        self.0.borrow_mut().properties.insert(name.into(), value);
    }

    pub fn property_names(&self) -> Vec<String> {
        self.0.borrow().properties.keys().cloned().collect()
    }

    /// Snapshot of the property map, cloned out so callers can iterate
    /// without holding the interior borrow.
    pub fn properties(&self) -> Vec<(String, Value)> {
        self.0
            .borrow()
            .properties
            .iter()
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect()
    }
}

impl PartialEq for ObjectRef {
    fn eq(&self, other: &Self) -> bool {
        object_eq(self, other, &mut Vec::new())
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        value_eq(self, other, &mut Vec::new())
    }
}

fn object_eq(a: &ObjectRef, b: &ObjectRef, visited: &mut Vec<(usize, usize)>) -> bool {
    if Rc::ptr_eq(&a.0, &b.0) {
        return true;
    }
    let pair = (a.id(), b.id());
    if visited.contains(&pair) {
        // This pair is already being compared further up the recursion;
        // treating it as equal here closes the cycle.
        return true;
    }
    visited.push(pair);
    let a = a.0.borrow();
    let b = b.0.borrow();
    a.type_name == b.type_name
        && a.properties.len() == b.properties.len()
        && a.properties
            .iter()
            .zip(b.properties.iter())
            .all(|((name_a, value_a), (name_b, value_b))| {
                name_a == name_b && value_eq(value_a, value_b, visited)
            })
}

fn value_eq(a: &Value, b: &Value, visited: &mut Vec<(usize, usize)>) -> bool {
    match (a, b) {
        (Value::Scalar(a), Value::Scalar(b)) => a == b,
        (Value::Sequence(a), Value::Sequence(b)) | (Value::Set(a), Value::Set(b)) => {
            a.len() == b.len()
                && a.iter().zip(b).all(|(item_a, item_b)| value_eq(item_a, item_b, visited))
        }
        (Value::Map(a), Value::Map(b)) => {
            a.len() == b.len()
                && a.iter()
                    .zip(b.iter())
                    .all(|((key_a, value_a), (key_b, value_b))| {
                        key_a == key_b && value_eq(value_a, value_b, visited)
                    })
        }
        (Value::Object(a), Value::Object(b)) => object_eq(a, b, visited),
        _ => false,
    }
}

// Debug goes through the borrow so it shows the object, not the RefCell.
// Not safe to call while a mutable borrow is outstanding.
impl fmt::Debug for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let object = self.0.borrow();
        f.debug_struct("ObjectRef")
            .field("type_name", &object.type_name)
            .field("properties", &object.properties)
            .finish()
    }
}
