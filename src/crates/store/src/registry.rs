use crate::store::Store;
use imposter_base::model::{PluginConfig, StorePreload};
use imposter_errors::store::StoreError;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

/// Process-wide registry of named stores, per spec.md §4.4. Lazily creates a
/// store on first write; reads against an unopened store see an empty map.
#[derive(Debug, Default)]
pub struct StoreRegistry {
    stores: RwLock<HashMap<String, Arc<Store>>>,
}

impl StoreRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a handle to `name`, creating it if absent.
    pub fn open(&self, name: &str) -> Arc<Store> {
        if let Some(existing) = self.stores.read().get(name).cloned() {
            return existing;
        }
        let mut guard = self.stores.write();
        guard
            .entry(name.to_string())
            .or_insert_with(|| Arc::new(Store::new()))
            .clone()
    }

    /// Returns a handle only if the store has already been opened, without
    /// creating it — used by read-only system endpoints.
    pub fn get(&self, name: &str) -> Option<Arc<Store>> {
        self.stores.read().get(name).cloned()
    }

    pub fn delete_store(&self, name: &str) -> bool {
        self.stores.write().remove(name).is_some()
    }

    /// Preloads every `system.stores` entry declared across loaded plugins.
    /// Preload is an overwrite, applied once at startup.
    pub fn preload_from_plugins(&self, plugins: &[PluginConfig]) -> Result<(), StoreError> {
        for plugin in plugins {
            for (name, preload) in &plugin.system.stores {
                self.preload_one(name, preload, &plugin.config_dir)?;
                tracing::debug!(store = name.as_str(), "preloaded store");
            }
        }
        Ok(())
    }

    fn preload_one(
        &self,
        name: &str,
        preload: &StorePreload,
        config_dir: &Path,
    ) -> Result<(), StoreError> {
        let store = self.open(name);

        if let Some(data) = &preload.preload_data {
            let map = json_object_to_map(data)
                .ok_or_else(|| StoreError::PreloadFailed(name.to_string(), "literal".into()))?;
            store.put_all(map);
        }

        if let Some(file) = &preload.preload_file {
            let path = config_dir.join(file);
            let raw = std::fs::read_to_string(&path)
                .map_err(|_| StoreError::PreloadFailed(name.to_string(), file.clone()))?;
            let value: serde_json::Value = if file.ends_with(".yaml") || file.ends_with(".yml") {
                serde_yaml::from_str(&raw)
                    .map_err(|_| StoreError::PreloadFailed(name.to_string(), file.clone()))?
            } else {
                serde_json::from_str(&raw)
                    .map_err(|_| StoreError::PreloadFailed(name.to_string(), file.clone()))?
            };
            let map = json_object_to_map(&value)
                .ok_or_else(|| StoreError::PreloadFailed(name.to_string(), file.clone()))?;
            store.put_all(map);
        }

        Ok(())
    }
}

fn json_object_to_map(value: &serde_json::Value) -> Option<HashMap<String, serde_json::Value>> {
    value
        .as_object()
        .map(|obj| obj.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
}
