//! Runtime values
//!
//! Scalars plus the three graph-backed containers. Containers own their
//! graph; putting a container into another container moves it there.

use crate::collections::{HashValue, ListValue, TreeValue};
use crate::graph::GraphRef;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Runtime type tag, as named in element-type constraints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeTag {
    None,
    Bool,
    Num,
    String,
    List,
    Hash,
    Tree,
}

impl TypeTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            TypeTag::None => "none",
            TypeTag::Bool => "bool",
            TypeTag::Num => "num",
            TypeTag::String => "string",
            TypeTag::List => "list",
            TypeTag::Hash => "hash",
            TypeTag::Tree => "tree",
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TypeTag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(TypeTag::None),
            "bool" => Ok(TypeTag::Bool),
            "num" => Ok(TypeTag::Num),
            "string" => Ok(TypeTag::String),
            "list" => Ok(TypeTag::List),
            "hash" => Ok(TypeTag::Hash),
            "tree" => Ok(TypeTag::Tree),
            other => Err(format!("unknown type: {}", other)),
        }
    }
}

/// A runtime value
#[derive(Debug, Clone, Default)]
pub enum Value {
    #[default]
    None,
    Boolean(bool),
    Number(f64),
    String(String),
    List(ListValue),
    Hash(HashValue),
    Tree(TreeValue),
}

impl Value {
    pub fn type_tag(&self) -> TypeTag {
        match self {
            Value::None => TypeTag::None,
            Value::Boolean(_) => TypeTag::Bool,
            Value::Number(_) => TypeTag::Num,
            Value::String(_) => TypeTag::String,
            Value::List(_) => TypeTag::List,
            Value::Hash(_) => TypeTag::Hash,
            Value::Tree(_) => TypeTag::Tree,
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Value::None)
    }

    pub fn is_container(&self) -> bool {
        matches!(self, Value::List(_) | Value::Hash(_) | Value::Tree(_))
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&ListValue> {
        match self {
            Value::List(list) => Some(list),
            _ => None,
        }
    }

    pub fn as_hash(&self) -> Option<&HashValue> {
        match self {
            Value::Hash(hash) => Some(hash),
            _ => None,
        }
    }

    pub fn as_tree(&self) -> Option<&TreeValue> {
        match self {
            Value::Tree(tree) => Some(tree),
            _ => None,
        }
    }

    /// Backing graph of a container value
    pub fn graph(&self) -> Option<GraphRef<'_>> {
        match self {
            Value::List(list) => Some(GraphRef::Sequential(list.graph())),
            Value::Hash(hash) => Some(GraphRef::Keyed(hash.graph())),
            Value::Tree(tree) => Some(GraphRef::Tree(tree.graph())),
            _ => None,
        }
    }

    /// Scalars are immutable and always report frozen
    pub fn is_frozen(&self) -> bool {
        match self {
            Value::List(list) => list.is_frozen(),
            Value::Hash(hash) => hash.is_frozen(),
            Value::Tree(tree) => tree.is_frozen(),
            _ => true,
        }
    }

    /// Deep freeze; a no-op for scalars
    pub fn freeze(&mut self) {
        match self {
            Value::List(list) => list.freeze(),
            Value::Hash(hash) => hash.freeze(),
            Value::Tree(tree) => tree.freeze(),
            _ => {}
        }
    }

    /// Ordering used by search trees.
    ///
    /// Numbers compare numerically, strings and booleans in their natural
    /// order; anything else falls back to comparing display strings.
    pub fn compare(&self, other: &Value) -> Ordering {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => a
                .partial_cmp(b)
                .unwrap_or_else(|| self.to_string().cmp(&other.to_string())),
            (Value::String(a), Value::String(b)) => a.cmp(b),
            (Value::Boolean(a), Value::Boolean(b)) => a.cmp(b),
            _ => self.to_string().cmp(&other.to_string()),
        }
    }

    /// Deep conversion to a plain nested value
    pub fn to_plain(&self) -> JsonValue {
        match self {
            Value::None => JsonValue::Null,
            Value::Boolean(b) => JsonValue::Bool(*b),
            Value::Number(n) => number_to_json(*n),
            Value::String(s) => JsonValue::String(s.clone()),
            Value::List(list) => list.to_plain(),
            Value::Hash(hash) => hash.to_plain(),
            Value::Tree(tree) => tree.to_plain(),
        }
    }

    /// Rendering used when the value is nested in a container: strings are
    /// quoted
    pub fn repr(&self) -> String {
        match self {
            Value::String(s) => format!("{:?}", s),
            other => other.to_string(),
        }
    }
}

fn number_to_json(n: f64) -> JsonValue {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        JsonValue::from(n as i64)
    } else {
        serde_json::Number::from_f64(n).map_or(JsonValue::Null, JsonValue::Number)
    }
}

pub(crate) fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::None => f.write_str("none"),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Number(n) => f.write_str(&format_number(*n)),
            Value::String(s) => f.write_str(s),
            Value::List(list) => f.write_str(&list.to_display_string()),
            Value::Hash(hash) => f.write_str(&hash.to_display_string()),
            Value::Tree(tree) => f.write_str(&tree.to_display_string()),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::None, Value::None) => true,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::List(a), Value::List(b)) => a.iter().eq(b.iter()),
            (Value::Hash(a), Value::Hash(b)) => a.items() == b.items(),
            (Value::Tree(a), Value::Tree(b)) => a.in_order() == b.in_order(),
            _ => false,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(n as f64)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
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

impl From<ListValue> for Value {
    fn from(list: ListValue) -> Self {
        Value::List(list)
    }
}

impl From<HashValue> for Value {
    fn from(hash: HashValue) -> Self {
        Value::Hash(hash)
    }
}

impl From<TreeValue> for Value {
    fn from(tree: TreeValue) -> Self {
        Value::Tree(tree)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_type_tags() {
        assert_eq!(Value::from(1).type_tag(), TypeTag::Num);
        assert_eq!(Value::from("a").type_tag(), TypeTag::String);
        assert_eq!(Value::None.type_tag(), TypeTag::None);
        assert_eq!("tree".parse::<TypeTag>(), Ok(TypeTag::Tree));
        assert!("float".parse::<TypeTag>().is_err());
    }

    #[test]
    fn test_compare() {
        assert_eq!(Value::from(2).compare(&Value::from(10)), Ordering::Less);
        assert_eq!(Value::from("b").compare(&Value::from("a")), Ordering::Greater);
        // mixed types fall back to display strings: "10" < "a"
        assert_eq!(Value::from(10).compare(&Value::from("a")), Ordering::Less);
        assert_eq!(Value::from(true).compare(&Value::from(true)), Ordering::Equal);
    }

    #[test]
    fn test_display_and_repr() {
        assert_eq!(Value::from(3).to_string(), "3");
        assert_eq!(Value::from(2.5).to_string(), "2.5");
        assert_eq!(Value::from("hi").to_string(), "hi");
        assert_eq!(Value::from("hi").repr(), "\"hi\"");
        assert_eq!(Value::None.to_string(), "none");
    }

    #[test]
    fn test_to_plain() {
        assert_eq!(Value::from(3).to_plain(), json!(3));
        assert_eq!(Value::from(0.5).to_plain(), json!(0.5));
        assert_eq!(Value::from(f64::NAN).to_plain(), JsonValue::Null);
        assert_eq!(Value::from(false).to_plain(), json!(false));
    }

    #[test]
    fn test_scalars_report_frozen() {
        let mut value = Value::from(1);
        value.freeze();
        assert!(value.is_frozen());
        assert!(!value.is_container());
    }
}
