use crate::entry::{InterceptorEntry, ResourceEntry};
use imposter_base::model::{CorsConfig, PluginConfig};
use imposter_base::{ImposterContext, Provider};
use imposter_errors::ImposterError;
use std::path::PathBuf;

/// One loaded configuration file, its resources/interceptors pre-compiled.
pub struct PluginHandle {
    pub base_path: String,
    pub config_dir: PathBuf,
    pub resources: Vec<ResourceEntry>,
    pub interceptors: Vec<InterceptorEntry>,
    pub cors: Option<CorsConfig>,
}

impl PluginHandle {
    pub fn compile(config: &PluginConfig, declaration_offset: u64) -> Result<Self, ImposterError> {
        let resources = config
            .resources
            .iter()
            .enumerate()
            .map(|(i, r)| {
                let effective_path = config.effective_path(&r.matcher.path);
                ResourceEntry::compile(r, &effective_path, declaration_offset + i as u64)
            })
            .collect::<Result<Vec<_>, _>>()?;
        let interceptors = config
            .interceptors
            .iter()
            .map(|ic| {
                let effective_path = config.effective_path(&ic.matcher.path);
                InterceptorEntry::compile(ic, &effective_path)
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            base_path: config.base_path.clone(),
            config_dir: config.config_dir.clone(),
            resources,
            interceptors,
            cors: config.cors.clone(),
        })
    }
}

/// Every loaded plugin, kept in declaration order so the dispatcher can try
/// `basePath` prefixes in the order they were configured (spec.md §4.6).
pub struct PluginContainer {
    pub plugins: Vec<PluginHandle>,
}

#[async_trait::async_trait]
impl Provider for PluginContainer {
    async fn provide(ctx: &ImposterContext) -> Result<Self, ImposterError> {
        let mut plugins = Vec::new();
        let mut order = 0u64;
        for plugin_config in &ctx.config.plugins {
            let handle = PluginHandle::compile(plugin_config, order)?;
            order += handle.resources.len() as u64;
            plugins.push(handle);
        }
        Ok(Self { plugins })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use imposter_base::model::{
        PluginKind, RequestMatcher, Resource, ResponseSpec, SystemConfig,
    };
    use std::collections::HashMap;

    #[test]
    fn compile_assigns_increasing_declaration_order_across_plugins() {
        let config = PluginConfig {
            plugin: PluginKind::Rest,
            base_path: "/api".into(),
            resources: vec![],
            interceptors: vec![],
            cors: None,
            system: SystemConfig::default(),
            extra: serde_json::Value::Null,
            source_path: PathBuf::new(),
            config_dir: PathBuf::new(),
        };
        let handle = PluginHandle::compile(&config, 5).unwrap();
        assert_eq!(handle.base_path, "/api");
        assert!(handle.resources.is_empty());
    }

    #[test]
    fn compile_prepends_base_path_onto_resource_matchers() {
        let config = PluginConfig {
            plugin: PluginKind::Rest,
            base_path: "/api".into(),
            resources: vec![Resource {
                matcher: RequestMatcher {
                    method: "GET".into(),
                    path: "/items/{id}".into(),
                    ..Default::default()
                },
                response: ResponseSpec::default(),
                capture: HashMap::new(),
            }],
            interceptors: vec![],
            cors: None,
            system: SystemConfig::default(),
            extra: serde_json::Value::Null,
            source_path: PathBuf::new(),
            config_dir: PathBuf::new(),
        };
        let handle = PluginHandle::compile(&config, 0).unwrap();
        assert_eq!(handle.resources[0].effective_path(), "/api/items/{id}");
    }
}
