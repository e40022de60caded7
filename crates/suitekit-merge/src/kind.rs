//! Value classification
//!
//! Every merge decision is taken on a classified value. Objects tagged with
//! [`OPAQUE_TAG`] are framework-internal and must never be merged into, so
//! they are split out from plain mappings here rather than checked ad hoc.

use serde_json::{Map, Value};

/// Reserved key marking an object as opaque (never merged into)
pub const OPAQUE_TAG: &str = "$$typeof";

/// Kind of a structured value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// Plain key/value object
    Mapping,
    /// Ordered array
    Sequence,
    /// String, number, bool or null
    Primitive,
    /// Object carrying [`OPAQUE_TAG`]
    Opaque,
}

impl ValueKind {
    /// Classify a borrowed value
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Object(map) if is_opaque(map) => ValueKind::Opaque,
            Value::Object(_) => ValueKind::Mapping,
            Value::Array(_) => ValueKind::Sequence,
            _ => ValueKind::Primitive,
        }
    }
}

impl std::fmt::Display for ValueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValueKind::Mapping => write!(f, "mapping"),
            ValueKind::Sequence => write!(f, "sequence"),
            ValueKind::Primitive => write!(f, "primitive"),
            ValueKind::Opaque => write!(f, "opaque"),
        }
    }
}

/// An owned value split by kind.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Mapping(Map<String, Value>),
    Sequence(Vec<Value>),
    Primitive(Value),
    Opaque(Map<String, Value>),
}

impl Node {
    pub fn kind(&self) -> ValueKind {
        match self {
            Node::Mapping(_) => ValueKind::Mapping,
            Node::Sequence(_) => ValueKind::Sequence,
            Node::Primitive(_) => ValueKind::Primitive,
            Node::Opaque(_) => ValueKind::Opaque,
        }
    }

    pub fn into_value(self) -> Value {
        match self {
            Node::Mapping(map) | Node::Opaque(map) => Value::Object(map),
            Node::Sequence(items) => Value::Array(items),
            Node::Primitive(value) => value,
        }
    }
}

impl From<Value> for Node {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(map) if is_opaque(&map) => Node::Opaque(map),
            Value::Object(map) => Node::Mapping(map),
            Value::Array(items) => Node::Sequence(items),
            other => Node::Primitive(other),
        }
    }
}

impl From<Node> for Value {
    fn from(node: Node) -> Self {
        node.into_value()
    }
}

/// True for any non-null, non-array object, opaque or not.
pub fn is_object(value: &Value) -> bool {
    value.is_object()
}

fn is_opaque(map: &Map<String, Value>) -> bool {
    map.get(OPAQUE_TAG).is_some_and(truthy)
}

// A tag set to a falsy value does not mark the object.
fn truthy(tag: &Value) -> bool {
    match tag {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
