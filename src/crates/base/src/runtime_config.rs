use crate::model::PluginConfig;

/// Server-level settings, resolved from CLI flags and the `IMPOSTER_*`
/// environment variables (spec.md §6).
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub server_url: Option<String>,
    pub config_dirs: Vec<String>,
    pub scan_recursive: bool,
    pub external_plugins: bool,
    pub plugin_dir: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            server_url: None,
            config_dirs: Vec::new(),
            scan_recursive: false,
            external_plugins: false,
            plugin_dir: None,
        }
    }
}

/// The fully assembled, load-time-validated runtime configuration: server
/// settings plus every plugin discovered across the config directories.
#[derive(Debug, Clone, Default)]
pub struct ImposterConfig {
    pub server: ServerConfig,
    pub plugins: Vec<PluginConfig>,
}

impl ImposterConfig {
    pub fn version() -> &'static str {
        env!("CARGO_PKG_VERSION")
    }
}
