mod translate;

use async_trait::async_trait;
use imposter_base::{Exchange, Request, ResponseState};
use imposter_extplugin::ExternalPluginHost;
use imposter_plugins::PluginContainer;
use imposter_store::StoreRegistry;
use imposter_template::{Clock, Rng, SystemInfo};
use pingora::proxy::{ProxyHttp, Session};
use pingora::upstreams::peer::HttpPeer;
use pingora::{Error, ErrorType, Result as PResult};
use std::sync::Arc;
use std::time::Instant;
use translate::{close_connection_error, read_request, write_response, write_status};

/// The only pingora-aware code in imposter-go-rs (spec.md §4.8): translates
/// a `Session` into an `Exchange`, runs the substrate-independent
/// dispatcher, and writes the resulting `ResponseState` back.
///
/// `request_filter` always serves the response directly and returns
/// `Ok(true)` — pingora's documented pattern for a handler that never
/// proxies to an upstream.
pub struct ImposterProxy {
    plugins: Arc<PluginContainer>,
    external: Arc<ExternalPluginHost>,
    stores: Arc<StoreRegistry>,
    system: Arc<SystemInfo>,
    clock: Arc<dyn Clock>,
    rng: Arc<dyn Rng>,
    version: String,
}

impl ImposterProxy {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        plugins: Arc<PluginContainer>,
        external: Arc<ExternalPluginHost>,
        stores: Arc<StoreRegistry>,
        system: Arc<SystemInfo>,
        clock: Arc<dyn Clock>,
        rng: Arc<dyn Rng>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            plugins,
            external,
            stores,
            system,
            clock,
            rng,
            version: version.into(),
        }
    }

    /// Runs the dispatcher on its own scheduling unit so a panic inside a
    /// single handler can't take down the listener (spec.md §5 "Failure
    /// isolation").
    async fn handle(&self, exchange: Exchange) -> Exchange {
        let plugins = self.plugins.clone();
        let external = self.external.clone();
        let stores = self.stores.clone();
        let system = self.system.clone();
        let clock = self.clock.clone();
        let rng = self.rng.clone();
        let version = self.version.clone();

        let joined = tokio::spawn(async move {
            let mut exchange = exchange;
            let result = imposter_dispatcher::dispatch(
                &plugins,
                &external,
                &mut exchange,
                &stores,
                &system,
                clock.as_ref(),
                rng.as_ref(),
                &version,
            )
            .await;
            (exchange, result)
        })
        .await;

        match joined {
            Ok((mut exchange, Ok(()))) => exchange,
            Ok((mut exchange, Err(err))) => {
                tracing::error!(error = %err, "dispatcher returned an error");
                exchange.response = ResponseState::new();
                exchange.response.set_status(500);
                exchange
            }
            Err(join_err) => {
                tracing::error!(panic = join_err.is_panic(), "request handler panicked");
                let mut exchange = Exchange::new(Request::new("GET", "/"));
                exchange.response.set_status(500);
                exchange
            }
        }
    }
}

#[async_trait]
impl ProxyHttp for ImposterProxy {
    type CTX = ();

    fn new_ctx(&self) -> Self::CTX {}

    async fn request_filter(&self, session: &mut Session, _ctx: &mut Self::CTX) -> PResult<bool> {
        let started = Instant::now();

        let Some(request) = read_request(session).await? else {
            write_status(session, 413).await?;
            tracing::warn!(status = 413, "request body exceeded the size bound");
            return Ok(true);
        };

        let method = request.method.clone();
        let path = request.path.clone();
        let exchange = self.handle(Exchange::new(request)).await;
        let elapsed_ms = started.elapsed().as_millis();

        if exchange.response.stopped {
            tracing::info!(%method, %path, elapsed_ms, "closed connection (fail=CloseConnection)");
            return Err(close_connection_error());
        }

        write_response(session, &exchange.response).await?;
        tracing::info!(
            %method,
            %path,
            status = exchange.response.effective_status(),
            elapsed_ms,
            "request handled"
        );
        Ok(true)
    }

    async fn upstream_peer(
        &self,
        _session: &mut Session,
        _ctx: &mut Self::CTX,
    ) -> PResult<Box<HttpPeer>> {
        Err(Error::explain(
            ErrorType::HTTPStatus(500),
            "imposter-go never proxies to an upstream",
        ))
    }
}
