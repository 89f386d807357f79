use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Represents the data carried by a fragment through the processing graph
///
/// This is a wrapper around a JSON object with some helper methods for
/// appending and merging entries during processing.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct Payload {
    /// The inner JSON object
    entries: Map<String, Value>,
}

impl Payload {
    /// Create an empty payload
    #[inline]
    pub fn new() -> Self {
        Self {
            entries: Map::new(),
        }
    }

    /// Create a payload from a JSON object
    #[inline]
    pub fn from_map(entries: Map<String, Value>) -> Self {
        Self { entries }
    }

    /// Append an entry, overwriting any existing value under the same key
    pub fn append(&mut self, key: &str, value: Value) -> &mut Self {
        self.entries.insert(key.to_string(), value);
        self
    }

    /// Merge all entries of another payload into this one
    ///
    /// Identical keys are overwritten by the merged-in payload.
    pub fn merge_in(&mut self, other: &Payload) -> &mut Self {
        for (key, value) in &other.entries {
            self.entries.insert(key.clone(), value.clone());
        }
        self
    }

    /// Get an entry by key
    #[inline]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Check whether an entry exists under the given key
    #[inline]
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Check if the payload has no entries
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of entries in the payload
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Get the inner JSON object
    #[inline]
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.entries
    }

    /// Take ownership of the payload as a JSON value
    #[inline]
    pub fn into_value(self) -> Value {
        Value::Object(self.entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_payload_append_and_get() {
        let mut payload = Payload::new();
        payload.append("product", json!({"id": 42}));

        assert!(payload.contains_key("product"));
        assert_eq!(payload.get("product").unwrap()["id"], 42);
        assert_eq!(payload.len(), 1);
    }

    #[test]
    fn test_payload_append_overwrites() {
        let mut payload = Payload::new();
        payload.append("key", json!("first"));
        payload.append("key", json!("second"));

        assert_eq!(payload.get("key"), Some(&json!("second")));
        assert_eq!(payload.len(), 1);
    }

    #[test]
    fn test_payload_merge_in() {
        let mut first = Payload::new();
        first.append("a", json!(1));

        let mut second = Payload::new();
        second.append("b", json!(2));
        second.append("a", json!(3));

        first.merge_in(&second);

        assert_eq!(first.get("a"), Some(&json!(3)));
        assert_eq!(first.get("b"), Some(&json!(2)));
    }

    #[test]
    fn test_payload_serialization() {
        let mut payload = Payload::new();
        payload.append("nested", json!({"values": [1, 2, 3]}));

        let serialized = serde_json::to_string(&payload).unwrap();
        let deserialized: Payload = serde_json::from_str(&serialized).unwrap();
        assert_eq!(payload, deserialized);
    }

    #[test]
    fn test_payload_into_value() {
        let mut payload = Payload::new();
        payload.append("key", json!("value"));

        assert_eq!(payload.into_value(), json!({"key": "value"}));
    }
}
