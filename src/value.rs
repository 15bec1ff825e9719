//! The intermediate document tree built by extraction rules.
//!
//! Rules assemble [`Value`]s whose list members may still be unevaluated
//! query results ([`Value::Lazy`]). [`prune`] walks the tree once, forcing
//! those sequences and dropping every empty member on the way back up.

use serde::ser::{Error as _, SerializeMap};
use serde::{Serialize, Serializer};
use std::fmt;

pub use indexmap::IndexMap;

/// Builds a [`Value::Map`], converting each value with `Value::from`.
/// Keys keep their written order.
#[macro_export]
macro_rules! value_map {
    ($($key:expr => $value:expr),* $(,)?) => {
        $crate::value::Value::Map($crate::value::IndexMap::from([
            $(($key.to_string(), $crate::value::Value::from($value))),*
        ]))
    };
}

/// A one-shot sequence that is produced when the tree is pruned.
pub struct Lazy<'a> {
    source: Option<Box<dyn Iterator<Item = Value<'a>> + 'a>>,
}

impl<'a> Lazy<'a> {
    /// Drains the sequence. Later calls return nothing.
    pub fn force(&mut self) -> Vec<Value<'a>> {
        match self.source.take() {
            Some(items) => items.collect(),
            None => Vec::new(),
        }
    }

    pub fn is_exhausted(&self) -> bool {
        self.source.is_none()
    }
}

impl fmt::Debug for Lazy<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.source {
            Some(_) => f.write_str("Lazy(<pending>)"),
            None => f.write_str("Lazy(<exhausted>)"),
        }
    }
}

#[derive(Debug)]
pub enum Value<'a> {
    Null,
    Bool(bool),
    Number(serde_json::Number),
    String(String),
    Seq(Vec<Value<'a>>),
    Map(IndexMap<String, Value<'a>>),
    Lazy(Lazy<'a>),
}

impl<'a> Value<'a> {
    /// A mapping with the given entries in order.
    pub fn map<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value<'a>)>,
    {
        Value::Map(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// A sequence that is only produced when the tree is pruned or
    /// materialised.
    pub fn lazy<I>(items: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Value<'a>> + 'a,
        I::IntoIter: 'a,
    {
        Value::Lazy(Lazy {
            source: Some(Box::new(items.into_iter().map(Into::into))),
        })
    }

    /// Null, an empty string, and an empty sequence or mapping. `false`, `0`
    /// and `"0"` are values. A pending lazy sequence is not known to be empty.
    pub fn is_empty(&self) -> bool {
        match self {
            Value::Null => true,
            Value::String(s) => s.is_empty(),
            Value::Seq(items) => items.is_empty(),
            Value::Map(entries) => entries.is_empty(),
            Value::Bool(_) | Value::Number(_) | Value::Lazy(_) => false,
        }
    }

    /// Forces every lazy sequence without removing anything.
    pub fn materialize(self) -> Self {
        match self {
            Value::Lazy(mut lazy) => {
                Value::Seq(lazy.force().into_iter().map(Value::materialize).collect())
            }
            Value::Seq(items) => Value::Seq(items.into_iter().map(Value::materialize).collect()),
            Value::Map(entries) => {
                Value::Map(entries.into_iter().map(|(k, v)| (k, v.materialize())).collect())
            }
            scalar => scalar,
        }
    }

    /// Converts to JSON, forcing lazy sequences. Nothing is pruned.
    pub fn into_json(self) -> serde_json::Value {
        match self {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(b),
            Value::Number(n) => serde_json::Value::Number(n),
            Value::String(s) => serde_json::Value::String(s),
            Value::Seq(items) => items.into_iter().map(Value::into_json).collect(),
            Value::Lazy(mut lazy) => lazy.force().into_iter().map(Value::into_json).collect(),
            Value::Map(entries) => serde_json::Value::Object(
                entries.into_iter().map(|(k, v)| (k, v.into_json())).collect(),
            ),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value<'a>> {
        match self {
            Value::Map(entries) => entries.get(key),
            _ => None,
        }
    }
}

/// Removes empty members bottom-up, so a container left empty by its own
/// pruning is removed from its parent too. Lazy sequences are forced here,
/// exactly once. Keys and items keep their order.
pub fn prune(value: Value<'_>) -> Value<'_> {
    match value {
        Value::Lazy(mut lazy) => prune_items(lazy.force()),
        Value::Seq(items) => prune_items(items),
        Value::Map(entries) => Value::Map(
            entries
                .into_iter()
                .map(|(k, v)| (k, prune(v)))
                .filter(|(_, v)| !v.is_empty())
                .collect(),
        ),
        scalar => scalar,
    }
}

fn prune_items(items: Vec<Value<'_>>) -> Value<'_> {
    Value::Seq(items.into_iter().map(prune).filter(|v| !v.is_empty()).collect())
}

/// [`prune`] for an already materialised JSON tree.
pub fn prune_json(value: serde_json::Value) -> serde_json::Value {
    use serde_json::Value as Json;

    fn is_empty(value: &Json) -> bool {
        match value {
            Json::Null => true,
            Json::String(s) => s.is_empty(),
            Json::Array(items) => items.is_empty(),
            Json::Object(entries) => entries.is_empty(),
            Json::Bool(_) | Json::Number(_) => false,
        }
    }

    match value {
        Json::Array(items) => items.into_iter().map(prune_json).filter(|v| !is_empty(v)).collect(),
        Json::Object(entries) => Json::Object(
            entries
                .into_iter()
                .map(|(k, v)| (k, prune_json(v)))
                .filter(|(_, v)| !is_empty(v))
                .collect(),
        ),
        scalar => scalar,
    }
}

impl Serialize for Value<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Number(n) => n.serialize(serializer),
            Value::String(s) => serializer.serialize_str(s),
            Value::Seq(items) => serializer.collect_seq(items),
            Value::Map(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (k, v) in entries {
                    map.serialize_entry(k, v)?;
                }
                map.end()
            }
            Value::Lazy(_) => Err(S::Error::custom(
                "lazy sequence must be materialised before serialization",
            )),
        }
    }
}

impl From<&str> for Value<'_> {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value<'_> {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<bool> for Value<'_> {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<usize> for Value<'_> {
    fn from(n: usize) -> Self {
        Value::Number(n.into())
    }
}

impl From<i64> for Value<'_> {
    fn from(n: i64) -> Self {
        Value::Number(n.into())
    }
}

impl From<f64> for Value<'_> {
    /// Non-finite numbers have no JSON form and become null.
    fn from(n: f64) -> Self {
        serde_json::Number::from_f64(n).map_or(Value::Null, Value::Number)
    }
}

impl<'a, T: Into<Value<'a>>> From<Option<T>> for Value<'a> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

impl<'a, T: Into<Value<'a>>> From<Vec<T>> for Value<'a> {
    fn from(items: Vec<T>) -> Self {
        Value::Seq(items.into_iter().map(Into::into).collect())
    }
}
