use indexmap::IndexMap;
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use time::Date;

use crate::primitives::fmt_date;

/// Ordered string-keyed map of values. Key order is preserved because field
/// order is significant for reporting and for `distinct` first-match removal.
pub type Map = IndexMap<String, Value>;

// ─── Value ──────────────────────────────────────────────────────────────────

/// A dynamically typed input value.
///
/// Mirrors the JSON data model plus a calendar-date variant. Equality is
/// strict and type-discriminating: `Number(1.0) != String("1")`, and object
/// comparison ignores key order.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Date(Date),
    Array(Vec<Value>),
    Object(Map),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Borrows the string if this is a [`Value::String`].
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Borrows the elements if this is a [`Value::Array`].
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Borrows the entries if this is a [`Value::Object`].
    pub fn as_object(&self) -> Option<&Map> {
        match self {
            Value::Object(map) => Some(map),
            _ => None,
        }
    }

    /// Shared `Null` for representing absent fields without allocation.
    pub(crate) fn null_ref() -> &'static Value {
        static NULL: Value = Value::Null;
        &NULL
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Date> for Value {
    fn from(d: Date) -> Self {
        Value::Date(d)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(items)
    }
}

impl From<Map> for Value {
    fn from(map: Map) -> Self {
        Value::Object(map)
    }
}

impl From<&serde_json::Value> for Value {
    fn from(json: &serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(*b),
            serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => Value::String(s.clone()),
            serde_json::Value::Array(items) => {
                Value::Array(items.iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => Value::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), Value::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        Value::from(&json)
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Number(n) => {
                // Integral numbers serialize without a fractional part.
                if n.fract() == 0.0 && n.is_finite() && *n >= i64::MIN as f64 && *n <= i64::MAX as f64
                {
                    serializer.serialize_i64(*n as i64)
                } else {
                    serializer.serialize_f64(*n)
                }
            }
            Value::String(s) => serializer.serialize_str(s),
            Value::Date(d) => serializer.serialize_str(&fmt_date(*d)),
            Value::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Object(map) => {
                let mut out = serializer.serialize_map(Some(map.len()))?;
                for (k, v) in map {
                    out.serialize_entry(k, v)?;
                }
                out.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let json = serde_json::Value::deserialize(deserializer)?;
        Ok(Value::from(&json))
    }
}

/// Converts a JSON value into an input [`Map`]. Returns `None` for non-objects.
pub fn map_from_json(json: &serde_json::Value) -> Option<Map> {
    match Value::from(json) {
        Value::Object(map) => Some(map),
        _ => None,
    }
}

// ─── Rule specifications ────────────────────────────────────────────────────

/// The rules attached to one field: a single token, a token list, or a nested
/// rule tree for object-shaped values.
///
/// Tokens are raw strings (`"length:3"`, `"in:a,b,c"`); they are parsed fresh
/// by the engine on every evaluation, so rule specs are never shared mutable
/// state between fields.
#[derive(Clone, Debug, PartialEq)]
pub enum RuleSpec {
    Single(String),
    List(Vec<String>),
    Nested(IndexMap<String, RuleSpec>),
}

/// The top-level rule tree: one [`RuleSpec`] per field, in evaluation order.
pub type RuleTree = IndexMap<String, RuleSpec>;

impl From<&str> for RuleSpec {
    fn from(token: &str) -> Self {
        RuleSpec::Single(token.to_string())
    }
}

impl From<String> for RuleSpec {
    fn from(token: String) -> Self {
        RuleSpec::Single(token)
    }
}

impl From<Vec<&str>> for RuleSpec {
    fn from(tokens: Vec<&str>) -> Self {
        RuleSpec::List(tokens.into_iter().map(str::to_string).collect())
    }
}

impl From<Vec<String>> for RuleSpec {
    fn from(tokens: Vec<String>) -> Self {
        RuleSpec::List(tokens)
    }
}

impl From<&serde_json::Value> for RuleSpec {
    /// JSON strings become single tokens, arrays become token lists
    /// (non-string entries are ignored), and objects become nested trees.
    /// Any other shape is an empty, always-passing list.
    fn from(json: &serde_json::Value) -> Self {
        match json {
            serde_json::Value::String(s) => RuleSpec::Single(s.clone()),
            serde_json::Value::Array(items) => RuleSpec::List(
                items
                    .iter()
                    .filter_map(|v| v.as_str().map(str::to_string))
                    .collect(),
            ),
            serde_json::Value::Object(map) => RuleSpec::Nested(
                map.iter()
                    .map(|(k, v)| (k.clone(), RuleSpec::from(v)))
                    .collect(),
            ),
            _ => RuleSpec::List(Vec::new()),
        }
    }
}

/// Converts a JSON object into a [`RuleTree`]. Returns `None` for non-objects.
pub fn rule_tree_from_json(json: &serde_json::Value) -> Option<RuleTree> {
    match json {
        serde_json::Value::Object(map) => Some(
            map.iter()
                .map(|(k, v)| (k.clone(), RuleSpec::from(v)))
                .collect(),
        ),
        _ => None,
    }
}
