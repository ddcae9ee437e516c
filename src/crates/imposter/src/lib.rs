#[cfg(test)]
mod tests;

use imposter_base::model::PluginConfig;
use imposter_base::runtime_config::ImposterConfig;
use imposter_base::{ImposterContext, ProviderScope};
use imposter_config::{load_config, ImposterConfigError};
use imposter_errors::internal::ImposterInternalError;
use imposter_errors::ImposterError;
use imposter_extplugin::{ExternalPluginConfig, ExternalPluginHost};
use imposter_http::ImposterProxy;
use imposter_plugins::PluginContainer;
use imposter_store::StoreRegistry;
use imposter_template::{SystemClock, SystemInfo, SystemRng};
use pingora::prelude::Server;
use pingora::proxy::http_proxy_service;
use std::path::Path;
use std::sync::Arc;

/// Wires the DI context, stores and external plugin host together and owns
/// the pingora server. `run` never returns on success — it blocks for the
/// lifetime of the process (spec.md §6).
pub struct Imposter {
    context: Arc<ImposterContext>,
}

impl Imposter {
    pub fn from_paths(config_paths: &[String]) -> Result<Self, ImposterConfigError> {
        let config = load_config(config_paths)?;
        Ok(Self::new(config))
    }

    pub fn new(config: ImposterConfig) -> Self {
        let context = Arc::new(ImposterContext::new(config));
        context.register::<PluginContainer>(ProviderScope::Singleton);
        Self { context }
    }

    pub fn context(&self) -> Arc<ImposterContext> {
        self.context.clone()
    }

    pub fn run(&self) -> Result<(), ImposterError> {
        let runtime = tokio::runtime::Runtime::new().map_err(ImposterError::IoError)?;
        let (plugins, external, stores, system) = runtime.block_on(self.assemble())?;

        let mut server = Server::new(None).map_err(|e| {
            ImposterError::InternalError(ImposterInternalError::FailedToInitiateServer(
                e.to_string(),
            ))
        })?;
        server.bootstrap();

        let proxy = ImposterProxy::new(
            plugins,
            external,
            stores,
            system,
            Arc::new(SystemClock),
            Arc::new(SystemRng),
            ImposterConfig::version(),
        );
        let mut proxy_service = http_proxy_service(&server.configuration, proxy);

        let server_addr = format!("0.0.0.0:{}", self.context.config.server.port);
        proxy_service.add_tcp(&server_addr);
        tracing::info!(addr = %server_addr, "Listening on address");

        server.add_service(proxy_service);
        server.run_forever();
    }

    /// Async startup work that has to finish before the (synchronous)
    /// pingora server takes over the thread: compiling plugins, preloading
    /// stores and handshaking external plugin processes.
    async fn assemble(
        &self,
    ) -> Result<
        (
            Arc<PluginContainer>,
            Arc<ExternalPluginHost>,
            Arc<StoreRegistry>,
            Arc<SystemInfo>,
        ),
        ImposterError,
    > {
        let plugins = self.context.get::<PluginContainer>().await?;

        let stores = Arc::new(StoreRegistry::new());
        stores.preload_from_plugins(&self.context.config.plugins)?;

        let external = if self.context.config.server.external_plugins {
            let dir = self
                .context
                .config
                .server
                .plugin_dir
                .as_deref()
                .unwrap_or(".");
            let host = ExternalPluginHost::launch(Path::new(dir)).await;
            if !host.is_empty() {
                let configs = external_plugin_configs(&self.context.config.plugins);
                host.configure_all(&self.server_url(), &configs).await?;
            }
            Arc::new(host)
        } else {
            Arc::new(ExternalPluginHost::empty())
        };

        let system = Arc::new(SystemInfo::new(
            self.context.config.server.port,
            self.context.config.server.server_url.clone(),
            ImposterConfig::version(),
        ));

        Ok((plugins, external, stores, system))
    }

    fn server_url(&self) -> String {
        self.context
            .config
            .server
            .server_url
            .clone()
            .unwrap_or_else(|| format!("http://localhost:{}", self.context.config.server.port))
    }
}

fn external_plugin_configs(plugins: &[PluginConfig]) -> Vec<ExternalPluginConfig> {
    plugins
        .iter()
        .map(|plugin| ExternalPluginConfig {
            plugin: format!("{:?}", plugin.plugin).to_lowercase(),
            spec_file: plugin.source_path.display().to_string(),
            config_dir: plugin.config_dir.display().to_string(),
            raw_config: serde_json::to_vec(&plugin.extra).unwrap_or_default(),
        })
        .collect()
}
