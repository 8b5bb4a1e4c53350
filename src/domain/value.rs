//! Loaded units and the values stored in folder nodes.

use std::collections::BTreeMap;
use std::fmt;

use generational_arena::Index;

/// Handle of a folder node inside a [`FolderTree`](crate::domain::FolderTree).
pub type NodeId = Index;

/// One mapping level of the tree.
pub type Mapping = BTreeMap<String, Value>;

/// A loaded unit, or a link to another folder node.
///
/// `Folder` owns its target (the node is part of the containing tree),
/// `Parent` is a plain back-reference and is never traversed when rendering.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Number(serde_json::Number),
    String(String),
    List(Vec<Value>),
    Map(Mapping),
    Folder(NodeId),
    Parent(NodeId),
}

impl Value {
    pub fn as_map(&self) -> Option<&Mapping> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Lookup by key on a mapping value.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_map().and_then(|map| map.get(key))
    }

    /// Set `key` on a mapping value.
    ///
    /// Scalars and lists cannot carry attributes: the call leaves them
    /// untouched and returns `false`.
    pub fn set_attribute(&mut self, key: &str, value: Value) -> bool {
        match self {
            Value::Map(map) => {
                map.insert(key.to_string(), value);
                true
            }
            _ => false,
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => Value::Number(n),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::List(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => {
                Value::Map(map.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Number(value.into())
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<Mapping> for Value {
    fn from(value: Mapping) -> Self {
        Value::Map(value)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Number(n) => write!(f, "{n}"),
            Value::String(s) => write!(f, "{s:?}"),
            Value::List(items) => write!(f, "[{} items]", items.len()),
            Value::Map(map) => write!(f, "{{{} keys}}", map.len()),
            Value::Folder(_) => write!(f, "<folder>"),
            Value::Parent(_) => write!(f, "<parent>"),
        }
    }
}
