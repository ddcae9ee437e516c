use crate::discovery::discover_plugins;
use crate::process::{apply_handler_response, ExternalPlugin};
use crate::wire::{ExternalConfig, ExternalPluginConfig};
use imposter_base::{Request, ResponseState};
use imposter_errors::ImposterError;
use std::path::Path;
use tokio::sync::Mutex;
use tracing::{info, warn};

/// Every launched external plugin, kept in declaration (discovery) order so
/// the dispatch policy in spec.md §4.7 can try them in a deterministic
/// sequence. Each plugin has its own connection and is guarded by its own
/// mutex, so `dispatch` only serializes RPCs *within* one plugin (spec.md
/// §5 "each plugin has one connection; RPCs are serialized within one
/// plugin") rather than across the whole host.
pub struct ExternalPluginHost {
    plugins: Vec<Mutex<ExternalPlugin>>,
}

impl ExternalPluginHost {
    pub fn empty() -> Self {
        Self { plugins: Vec::new() }
    }

    /// Discovers and launches every `plugin-<name>` executable in
    /// `plugin_dir`, handshaking each. A plugin that fails to launch or
    /// handshake is logged and skipped rather than aborting startup.
    pub async fn launch(plugin_dir: &Path) -> Self {
        let mut plugins = Vec::new();
        for (name, path) in discover_plugins(plugin_dir) {
            match ExternalPlugin::launch(&name, &path).await {
                Ok(plugin) => {
                    info!(plugin = %name, "external plugin launched");
                    plugins.push(Mutex::new(plugin));
                }
                Err(err) => warn!(plugin = %name, error = %err, "external plugin failed to launch"),
            }
        }
        Self { plugins }
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }

    /// Sends `Configure` to every launched plugin exactly once, before any
    /// request is served.
    pub async fn configure_all(
        &self,
        server_url: &str,
        configs: &[ExternalPluginConfig],
    ) -> Result<(), ImposterError> {
        let config = ExternalConfig {
            server_url: server_url.to_string(),
            plugins: configs.to_vec(),
        };
        for plugin in &self.plugins {
            plugin.lock().await.configure(config.clone()).await?;
        }
        Ok(())
    }

    /// Tries each plugin in declaration order per the dispatch policy:
    /// status `0`/`404` is a non-claim (try the next plugin), `1xx-2xx`
    /// adopts the response and stops, anything else is treated as final.
    /// RPC errors degrade to "did not handle" (spec.md §5) and are logged.
    pub async fn dispatch(&self, request: &Request, response: &mut ResponseState) -> bool {
        for plugin in &self.plugins {
            let mut guard = plugin.lock().await;
            match guard.handle(request).await {
                Ok(Some(handled)) => {
                    apply_handler_response(handled, response);
                    return true;
                }
                Ok(None) => continue,
                Err(err) => {
                    warn!(plugin = %guard.name, error = %err, "external plugin RPC failed, treating as non-claim");
                    continue;
                }
            }
        }
        false
    }

    pub async fn shutdown(self) {
        for plugin in self.plugins {
            plugin.into_inner().shutdown().await;
        }
    }
}
