use parking_lot::RwLock;
use serde_json::Value;
use std::collections::HashMap;

/// A single named store: a concurrent mapping (string -> JSON value) guarded
/// by one reader/writer lock, per spec.md §4.4 "a single reader/writer lock
/// per store is sufficient. Atomicity is per operation".
#[derive(Debug, Default)]
pub struct Store {
    values: RwLock<HashMap<String, Value>>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        self.values.read().get(key).cloned()
    }

    pub fn put(&self, key: impl Into<String>, value: Value) {
        self.values.write().insert(key.into(), value);
    }

    pub fn delete(&self, key: &str) -> Option<Value> {
        self.values.write().remove(key)
    }

    /// Returns every key/value pair whose key starts with `prefix`, with the
    /// prefix stripped from the returned keys.
    pub fn all_with_prefix(&self, prefix: &str) -> HashMap<String, Value> {
        self.values
            .read()
            .iter()
            .filter_map(|(k, v)| {
                k.strip_prefix(prefix)
                    .map(|stripped| (stripped.to_string(), v.clone()))
            })
            .collect()
    }

    /// Overwrites every key present in `data`; used at preload and by bulk
    /// upsert (`POST /system/store/<name>`).
    pub fn put_all(&self, data: impl IntoIterator<Item = (String, Value)>) {
        let mut guard = self.values.write();
        for (k, v) in data {
            guard.insert(k, v);
        }
    }

    pub fn clear(&self) {
        self.values.write().clear();
    }

    pub fn len(&self) -> usize {
        self.values.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
