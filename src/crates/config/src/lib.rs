pub mod config;

use crate::config::{get_config_files, ENV_VAR_PREFIX};
use ::config::{Config, ConfigError, Environment};
use imposter_base::model::PluginConfig;
use imposter_base::runtime_config::{ImposterConfig, ServerConfig};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Default, Deserialize)]
struct EnvOverlay {
    port: Option<u16>,
    server_url: Option<String>,
    config_dir: Option<String>,
    config_scan_recursive: Option<bool>,
    external_plugins: Option<bool>,
    plugin_dir: Option<String>,
}

fn read_env_overlay() -> Result<EnvOverlay, ConfigError> {
    // A separator that never occurs in practice keeps every `IMPOSTER_*`
    // variable a single flat key instead of config-rs's usual nested-path
    // splitting, matching spec.md §6's single-underscore variable names.
    let source = Environment::with_prefix(ENV_VAR_PREFIX)
        .separator("\u{0}")
        .try_parsing(true);
    Config::builder()
        .add_source(source)
        .build()?
        .try_deserialize()
}

/// Loads every YAML plugin file under `cli_dirs` (or, if empty,
/// `IMPOSTER_CONFIG_DIR`) into one [`ImposterConfig`], applying the
/// `IMPOSTER_*` environment overlay to server settings.
pub fn load_config(cli_dirs: &[String]) -> Result<ImposterConfig, ImposterConfigError> {
    let overlay = read_env_overlay()?;

    let dirs: Vec<String> = if !cli_dirs.is_empty() {
        cli_dirs.to_vec()
    } else {
        overlay
            .config_dir
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect()
    };

    if dirs.is_empty() {
        return Err(ImposterConfigError::NoConfigDir);
    }

    let recursive = overlay.config_scan_recursive.unwrap_or(false);

    let mut plugins = Vec::new();
    for dir in &dirs {
        if !Path::new(dir).is_dir() {
            return Err(ImposterConfigError::MissingDir(dir.clone()));
        }
        for file in get_config_files(dir, recursive) {
            plugins.push(load_plugin_file(&file)?);
        }
    }

    let server = ServerConfig {
        port: overlay.port.unwrap_or(8080),
        server_url: overlay.server_url,
        config_dirs: dirs,
        scan_recursive: recursive,
        external_plugins: overlay.external_plugins.unwrap_or(false),
        plugin_dir: overlay.plugin_dir,
    };

    let config = ImposterConfig { server, plugins };
    validate_config(&config)?;
    Ok(config)
}

fn load_plugin_file(path: &Path) -> Result<PluginConfig, ImposterConfigError> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| ImposterConfigError::Parse(path.display().to_string(), e.to_string()))?;
    let mut plugin: PluginConfig = serde_yaml::from_str(&raw)
        .map_err(|e| ImposterConfigError::Parse(path.display().to_string(), e.to_string()))?;
    plugin.source_path = path.to_path_buf();
    plugin.config_dir = path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| Path::new(".").to_path_buf());
    Ok(plugin)
}

pub fn validate_config(config: &ImposterConfig) -> Result<(), ImposterConfigError> {
    for plugin in &config.plugins {
        if !plugin.base_path.is_empty() && !plugin.base_path.starts_with('/') {
            return Err(ImposterConfigError::Invalid(format!(
                "basePath {} must start with a '/'",
                plugin.base_path
            )));
        }
        for resource in &plugin.resources {
            if !resource.matcher.path.starts_with('/') {
                return Err(ImposterConfigError::Invalid(format!(
                    "resource path {} must start with a '/'",
                    resource.matcher.path
                )));
            }
        }
    }
    Ok(())
}

#[derive(Debug, thiserror::Error)]
pub enum ImposterConfigError {
    #[error("no config directory supplied (positional argument or IMPOSTER_CONFIG_DIR)")]
    NoConfigDir,
    #[error("config directory {0} does not exist")]
    MissingDir(String),
    #[error("failed to parse {0}: {1}")]
    Parse(String, String),
    #[error("invalid configuration: {0}")]
    Invalid(String),
    #[error("environment error: {0}")]
    Env(#[from] ConfigError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn loads_a_single_plugin_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("items.yaml"),
            "plugin: rest\nbasePath: /api\nresources:\n  - method: GET\n    path: /items\n    response:\n      status: 200\n      content: ok\n",
        )
        .unwrap();

        let dirs = vec![dir.path().to_str().unwrap().to_string()];
        let config = load_config(&dirs).unwrap();
        assert_eq!(config.plugins.len(), 1);
        assert_eq!(config.plugins[0].base_path, "/api");
        assert_eq!(config.plugins[0].resources.len(), 1);
    }

    #[test]
    fn missing_dir_is_an_error() {
        let dirs = vec!["/no/such/dir/imposter-go-rs-test".to_string()];
        let err = load_config(&dirs).unwrap_err();
        assert!(matches!(err, ImposterConfigError::MissingDir(_)));
    }

    #[test]
    fn rejects_base_path_without_leading_slash() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("bad.yaml"), "plugin: rest\nbasePath: api\n").unwrap();
        let dirs = vec![dir.path().to_str().unwrap().to_string()];
        let err = load_config(&dirs).unwrap_err();
        assert!(matches!(err, ImposterConfigError::Invalid(_)));
    }
}
