//! Metadata layer
//!
//! A string-keyed property bag attached to every structure, used for
//! annotations (such as element names) that stay out of the node/edge model.

use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value as JsonValue;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetadataLayer {
    properties: IndexMap<String, JsonValue>,
}

impl MetadataLayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a property value, returning the previous one
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<JsonValue>) -> Option<JsonValue> {
        self.properties.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&JsonValue> {
        self.properties.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut JsonValue> {
        self.properties.get_mut(key)
    }

    /// Store any serializable value
    pub fn set_typed<T: Serialize>(&mut self, key: impl Into<String>, value: &T) -> serde_json::Result<()> {
        let json = serde_json::to_value(value)?;
        self.properties.insert(key.into(), json);
        Ok(())
    }

    /// Read a property back into a concrete type.
    ///
    /// Returns `None` when the key is absent or has a different shape.
    pub fn get_typed<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.properties
            .get(key)
            .and_then(|value| serde_json::from_value(value.clone()).ok())
    }

    pub fn remove(&mut self, key: &str) -> Option<JsonValue> {
        self.properties.shift_remove(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.properties.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.properties.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_set_get_remove() {
        let mut meta = MetadataLayer::new();
        assert!(meta.set("owner", "parser").is_none());
        assert_eq!(meta.get("owner"), Some(&json!("parser")));

        let old = meta.set("owner", 7);
        assert_eq!(old, Some(json!("parser")));

        assert_eq!(meta.remove("owner"), Some(json!(7)));
        assert!(meta.is_empty());
    }

    #[test]
    fn test_typed_round_trip() {
        let mut meta = MetadataLayer::new();
        let names = vec![Some("x".to_string()), None];
        meta.set_typed("names", &names).unwrap();

        let back: Vec<Option<String>> = meta.get_typed("names").unwrap();
        assert_eq!(back, names);
        assert!(meta.get_typed::<u32>("names").is_none());
    }

    #[test]
    fn test_keys_keep_insertion_order() {
        let mut meta = MetadataLayer::new();
        meta.set("b", 1);
        meta.set("a", 2);
        assert_eq!(meta.keys().collect::<Vec<_>>(), vec!["b", "a"]);
    }
}
