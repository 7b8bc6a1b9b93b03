//! Attribute values produced by the tree parser.

use std::collections::BTreeMap;

use serde::Serialize;

/// Attribute name to value mapping for one object or one nested element.
pub type Attributes = BTreeMap<String, AttributeValue>;

/// Relation name to target URL.
pub type Links = BTreeMap<String, String>;

/// The value of one parsed XML subtree.
///
/// A leaf element becomes a [`AttributeValue::Scalar`] holding its trimmed
/// text, or `None` when that text is empty. An element with children becomes a
/// [`AttributeValue::Mapping`]. Repeated sibling tags accumulate into a
/// [`AttributeValue::List`] under their shared name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum AttributeValue {
    /// Text content of a leaf element.
    Scalar(Option<String>),
    /// Values of repeated sibling elements, in document order.
    List(Vec<AttributeValue>),
    /// Child elements keyed by bare tag name.
    Mapping(Attributes),
}

impl AttributeValue {
    /// Builds a scalar from raw element text, trimming it and mapping empty
    /// text to `None`.
    pub fn from_text(text: &str) -> Self {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            AttributeValue::Scalar(None)
        } else {
            AttributeValue::Scalar(Some(trimmed.to_string()))
        }
    }

    /// Returns the scalar string, if this is a non-null scalar.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttributeValue::Scalar(Some(s)) => Some(s),
            _ => None,
        }
    }

    /// Returns the list items, if this is a list.
    pub fn as_list(&self) -> Option<&[AttributeValue]> {
        match self {
            AttributeValue::List(items) => Some(items),
            _ => None,
        }
    }

    /// Returns the nested mapping, if this is a mapping.
    pub fn as_mapping(&self) -> Option<&Attributes> {
        match self {
            AttributeValue::Mapping(map) => Some(map),
            _ => None,
        }
    }

    /// Returns true for a scalar without text.
    pub fn is_null(&self) -> bool {
        matches!(self, AttributeValue::Scalar(None))
    }

    /// Looks up a key when this value is a mapping.
    pub fn get(&self, key: &str) -> Option<&AttributeValue> {
        self.as_mapping().and_then(|map| map.get(key))
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        AttributeValue::Scalar(Some(value.to_string()))
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        AttributeValue::Scalar(Some(value))
    }
}

impl From<Option<String>> for AttributeValue {
    fn from(value: Option<String>) -> Self {
        AttributeValue::Scalar(value)
    }
}

impl From<Attributes> for AttributeValue {
    fn from(value: Attributes) -> Self {
        AttributeValue::Mapping(value)
    }
}

impl From<Vec<AttributeValue>> for AttributeValue {
    fn from(value: Vec<AttributeValue>) -> Self {
        AttributeValue::List(value)
    }
}

/// Inserts a value, promoting the key to a list when it is already present.
pub fn insert_accumulating(map: &mut Attributes, key: &str, value: AttributeValue) {
    match map.get_mut(key) {
        None => {
            map.insert(key.to_string(), value);
        }
        Some(AttributeValue::List(items)) => items.push(value),
        Some(existing) => {
            let first = std::mem::replace(existing, AttributeValue::List(Vec::new()));
            *existing = AttributeValue::List(vec![first, value]);
        }
    }
}
