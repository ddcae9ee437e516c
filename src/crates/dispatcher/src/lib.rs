use imposter_base::Exchange;
use imposter_errors::ImposterError;
use imposter_extplugin::ExternalPluginHost;
use imposter_plugins::{handle_request, HandleOutcome, PluginContainer};
use imposter_store::StoreRegistry;
use imposter_system::{catalogue, cors, handle_system_request};
use imposter_template::{Clock, Rng, SystemInfo};

/// Per-request routing across `/system/*`, loaded in-process plugins, then
/// external plugins, then the 404 catalogue (spec.md §4.6).
#[allow(clippy::too_many_arguments)]
pub async fn dispatch(
    plugins: &PluginContainer,
    external: &ExternalPluginHost,
    exchange: &mut Exchange,
    stores: &StoreRegistry,
    system: &SystemInfo,
    clock: &dyn Clock,
    rng: &dyn Rng,
    version: &str,
) -> Result<(), ImposterError> {
    if let Some(response) = handle_system_request(&exchange.request, stores, version) {
        exchange.response = response;
        return Ok(());
    }

    for plugin in &plugins.plugins {
        if !base_path_matches(&exchange.request.path, &plugin.base_path) {
            continue;
        }

        if let Some(cors_config) = &plugin.cors {
            if let Some(preflight) = cors::preflight(&exchange.request, cors_config) {
                exchange.response = preflight;
                return Ok(());
            }
        }

        match handle_request(plugin, exchange, stores, system, clock, rng).await? {
            HandleOutcome::Handled => {
                if let Some(cors_config) = &plugin.cors {
                    cors::apply_actual(&mut exchange.response, &exchange.request, cors_config);
                }
                return Ok(());
            }
            HandleOutcome::NoMatch => continue,
        }
    }

    if !external.is_empty() && external.dispatch(&exchange.request, &mut exchange.response).await {
        resolve_deferred_file(&mut exchange.response);
        return Ok(());
    }

    exchange.response = catalogue::not_found(&known_routes(plugins));
    Ok(())
}

/// An external plugin's `HandlerResponse` may defer body delivery to a
/// `file`/`fileBaseDir`/`fileName` triple (spec.md §4.7) instead of
/// returning bytes inline. Both HTTP adapters (`imposter-http`,
/// `imposter-lambda`) need the body resolved before serialization, so it's
/// done once here rather than duplicated in each adapter.
fn resolve_deferred_file(response: &mut imposter_base::ResponseState) {
    let Some(file_ref) = response.file.take() else {
        return;
    };
    match std::fs::read(file_ref.full_path()) {
        Ok(bytes) => {
            if !response.headers.contains("content-type") {
                response
                    .headers
                    .set("content-type", mime_guess::from_path(&file_ref.file_name).first_or_octet_stream().to_string());
            }
            response.body = bytes;
        }
        Err(err) => {
            tracing::warn!(path = %file_ref.full_path().display(), error = %err, "failed to read external plugin response file");
        }
    }
}

fn base_path_matches(path: &str, base_path: &str) -> bool {
    if base_path.is_empty() {
        return true;
    }
    path == base_path || path.starts_with(&format!("{base_path}/"))
}

/// Every declared route across every loaded plugin, as `"METHOD full-path"`
/// strings, for the 404 catalogue.
fn known_routes(plugins: &PluginContainer) -> Vec<String> {
    plugins
        .plugins
        .iter()
        .flat_map(|plugin| {
            plugin
                .resources
                .iter()
                .map(move |resource| format!("{} {}", resource.method(), resource.effective_path()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use imposter_base::model::{PluginConfig, PluginKind, RequestMatcher, Resource, ResponseSpec, SystemConfig};
    use imposter_base::Request;
    use imposter_template::{FixedClock, FixedRng};
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn plugin_config_with_item_resource() -> PluginConfig {
        PluginConfig {
            plugin: PluginKind::Rest,
            base_path: String::new(),
            resources: vec![Resource {
                matcher: RequestMatcher {
                    method: "GET".into(),
                    path: "/items/{id}".into(),
                    ..Default::default()
                },
                response: ResponseSpec {
                    status: 200,
                    content: Some("item-${context.request.pathParams.id}".into()),
                    template: true,
                    ..Default::default()
                },
                capture: HashMap::new(),
            }],
            interceptors: vec![],
            cors: None,
            system: SystemConfig::default(),
            extra: serde_json::Value::Null,
            source_path: PathBuf::new(),
            config_dir: PathBuf::new(),
        }
    }

    async fn context(config: PluginConfig) -> (PluginContainer, ExternalPluginHost) {
        let plugins = PluginContainer {
            plugins: vec![imposter_plugins::PluginHandle::compile(&config, 0).unwrap()],
        };
        (plugins, ExternalPluginHost::empty())
    }

    #[tokio::test]
    async fn system_status_is_routed_before_plugins() {
        let (plugins, external) = context(plugin_config_with_item_resource()).await;
        let stores = StoreRegistry::new();
        let system = SystemInfo::new(8080, None, "0.1.0");
        let clock = FixedClock(chrono::Utc::now());
        let rng = FixedRng::default();

        let mut exchange = Exchange::new(Request::new("GET", "/system/status"));
        dispatch(&plugins, &external, &mut exchange, &stores, &system, &clock, &rng, "0.1.0")
            .await
            .unwrap();

        assert_eq!(exchange.response.status, 200);
    }

    #[tokio::test]
    async fn matching_resource_wins_over_404() {
        let (plugins, external) = context(plugin_config_with_item_resource()).await;
        let stores = StoreRegistry::new();
        let system = SystemInfo::new(8080, None, "0.1.0");
        let clock = FixedClock(chrono::Utc::now());
        let rng = FixedRng::default();

        let mut exchange = Exchange::new(Request::new("GET", "/items/42"));
        dispatch(&plugins, &external, &mut exchange, &stores, &system, &clock, &rng, "0.1.0")
            .await
            .unwrap();

        assert_eq!(exchange.response.body, b"item-42");
    }

    #[tokio::test]
    async fn base_path_is_prepended_onto_resource_matchers() {
        let mut config = plugin_config_with_item_resource();
        config.base_path = "/api".into();
        let (plugins, external) = context(config).await;
        let stores = StoreRegistry::new();
        let system = SystemInfo::new(8080, None, "0.1.0");
        let clock = FixedClock(chrono::Utc::now());
        let rng = FixedRng::default();

        let mut exchange = Exchange::new(Request::new("GET", "/api/items/42"));
        dispatch(&plugins, &external, &mut exchange, &stores, &system, &clock, &rng, "0.1.0")
            .await
            .unwrap();

        assert_eq!(exchange.response.body, b"item-42");
    }

    #[tokio::test]
    async fn unmatched_request_falls_through_to_catalogue() {
        let (plugins, external) = context(plugin_config_with_item_resource()).await;
        let stores = StoreRegistry::new();
        let system = SystemInfo::new(8080, None, "0.1.0");
        let clock = FixedClock(chrono::Utc::now());
        let rng = FixedRng::default();

        let mut exchange = Exchange::new(Request::new("GET", "/nowhere"));
        dispatch(&plugins, &external, &mut exchange, &stores, &system, &clock, &rng, "0.1.0")
            .await
            .unwrap();

        assert_eq!(exchange.response.status, 404);
        let body = String::from_utf8(exchange.response.body.clone()).unwrap();
        assert!(body.contains("GET /items/{id}"));
    }

    #[test]
    fn resolve_deferred_file_reads_bytes_and_infers_content_type() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("body.json"), b"{\"ok\":true}").unwrap();

        let mut response = imposter_base::ResponseState::new();
        response.file = Some(imposter_base::FileRef {
            base_dir: dir.path().to_string_lossy().to_string(),
            file_name: "body.json".to_string(),
        });

        resolve_deferred_file(&mut response);

        assert!(response.file.is_none());
        assert_eq!(response.body, b"{\"ok\":true}");
        assert_eq!(response.headers.first("content-type"), Some("application/json"));
    }
}
