use crate::entry::InterceptorEntry;
use imposter_base::Exchange;
use imposter_errors::ImposterError;
use imposter_matcher::{evaluate, execute_captures};
use imposter_response::apply_response;
use imposter_store::StoreRegistry;
use imposter_template::{Clock, Rng, SystemInfo};
use std::path::Path;

/// Outcome of running a plugin's interceptor chain (spec.md §4.2).
pub enum InterceptorOutcome {
    /// No interceptor set `continue=false`: resource matching proceeds.
    Continue,
    /// An interceptor short-circuited the request; resource matching is skipped.
    ShortCircuited,
}

/// Walks `interceptors` in declaration order, applying captures and merged
/// responses as each one matches, per spec.md §4.2.
#[allow(clippy::too_many_arguments)]
pub async fn run_interceptors(
    interceptors: &[InterceptorEntry],
    exchange: &mut Exchange,
    config_dir: &Path,
    stores: &StoreRegistry,
    system: &SystemInfo,
    clock: &dyn Clock,
    rng: &dyn Rng,
) -> Result<InterceptorOutcome, ImposterError> {
    for interceptor in interceptors {
        let Some(outcome) = evaluate(&interceptor.compiled, exchange) else {
            continue;
        };
        exchange.request.path_params.extend(outcome.path_param_values);

        execute_captures(&interceptor.capture, exchange, stores);

        if let Some(response) = &interceptor.response {
            apply_response(response, exchange, config_dir, stores, system, clock, rng).await?;
        }

        if !interceptor.continue_on_match {
            return Ok(InterceptorOutcome::ShortCircuited);
        }
    }

    Ok(InterceptorOutcome::Continue)
}
