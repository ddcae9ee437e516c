use serde_json::Value;
use std::collections::HashMap;

/// Mutable, request-scoped key-value bag, visible only to the current
/// exchange. Captures write into it by default; it is merged into named
/// stores only when a capture explicitly targets one.
#[derive(Debug, Clone, Default)]
pub struct RequestStore {
    values: HashMap<String, Value>,
}

impl RequestStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn set(&mut self, key: impl Into<String>, value: Value) {
        self.values.insert(key.into(), value);
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.values.remove(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.values.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_a_value() {
        let mut store = RequestStore::new();
        store.set("id", Value::String("42".into()));
        assert_eq!(store.get("id"), Some(&Value::String("42".into())));
        store.remove("id");
        assert_eq!(store.get("id"), None);
    }
}
