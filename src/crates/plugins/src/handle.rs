use crate::container::PluginHandle;
use crate::interceptors::{run_interceptors, InterceptorOutcome};
use imposter_base::Exchange;
use imposter_errors::ImposterError;
use imposter_matcher::{execute_captures, select_best};
use imposter_response::apply_response;
use imposter_store::StoreRegistry;
use imposter_template::{Clock, Rng, SystemInfo};

/// Whether this plugin claimed the request. `NoMatch` lets the dispatcher
/// fall through to the next `basePath`-matching plugin, then external
/// plugins, then the 404 catalogue (spec.md §4.6).
pub enum HandleOutcome {
    Handled,
    NoMatch,
}

/// Runs one plugin's interceptor chain, then (if not short-circuited)
/// selects and applies the best-matching resource.
#[allow(clippy::too_many_arguments)]
pub async fn handle_request(
    plugin: &PluginHandle,
    exchange: &mut Exchange,
    stores: &StoreRegistry,
    system: &SystemInfo,
    clock: &dyn Clock,
    rng: &dyn Rng,
) -> Result<HandleOutcome, ImposterError> {
    let outcome = run_interceptors(
        &plugin.interceptors,
        exchange,
        &plugin.config_dir,
        stores,
        system,
        clock,
        rng,
    )
    .await?;

    if let InterceptorOutcome::ShortCircuited = outcome {
        return Ok(HandleOutcome::Handled);
    }

    let Some((winner, match_outcome)) = select_best(&plugin.resources, exchange, &exchange.store)
    else {
        return Ok(HandleOutcome::NoMatch);
    };

    exchange
        .request
        .path_params
        .extend(match_outcome.path_param_values);

    execute_captures(&winner.capture, exchange, stores);
    apply_response(
        &winner.response,
        exchange,
        &plugin.config_dir,
        stores,
        system,
        clock,
        rng,
    )
    .await?;

    Ok(HandleOutcome::Handled)
}
