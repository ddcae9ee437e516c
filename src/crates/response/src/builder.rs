use crate::delay;
use crate::file::{infer_content_type, read_response_file};
use imposter_base::model::{FailureMode, ResponseSpec};
use imposter_base::{Exchange, HeaderMultiMap};
use imposter_errors::ImposterError;
use imposter_store::StoreRegistry;
use imposter_template::{render, Clock, Rng, SystemInfo, TemplateContext};
use std::path::Path;

/// Applies one resolved [`ResponseSpec`] to `exchange.response`, per spec.md
/// §4.3's six steps: status, headers, body, delay, failure injection,
/// `Handled`. Interceptors and the final resource response both go through
/// this, each later call overwriting status/headers/body field-wise over the
/// previous one (spec.md §4.2 "merge by ... later interceptor response
/// fields overwrite earlier ones field-by-field").
#[allow(clippy::too_many_arguments)]
pub async fn apply_response(
    spec: &ResponseSpec,
    exchange: &mut Exchange,
    config_dir: &Path,
    stores: &StoreRegistry,
    system: &SystemInfo,
    clock: &dyn Clock,
    rng: &dyn Rng,
) -> Result<(), ImposterError> {
    if spec.status != 0 {
        exchange.response.set_status(spec.status);
    }

    for (name, value) in &spec.headers {
        exchange.response.headers.set(name.clone(), value.clone());
    }

    if let Some(file_name) = &spec.file {
        let bytes = read_response_file(config_dir, file_name)?;
        if !exchange.response.headers.contains("content-type") {
            exchange
                .response
                .headers
                .set("Content-Type", infer_content_type(file_name));
        }
        exchange.response.body = render_if_requested(bytes, spec.template, exchange, stores, system, clock, rng);
    } else if let Some(content) = &spec.content {
        let bytes = content.clone().into_bytes();
        exchange.response.body = render_if_requested(bytes, spec.template, exchange, stores, system, clock, rng);
    }

    if let Some(delay_spec) = &spec.delay {
        delay::apply_delay(delay_spec).await;
    }

    match spec.fail {
        FailureMode::None => {}
        FailureMode::EmptyResponse => {
            exchange.response.body.clear();
        }
        FailureMode::CloseConnection => {
            exchange.response.body.clear();
            exchange.response.headers = HeaderMultiMap::new();
            exchange.response.stopped = true;
        }
    }

    exchange.response.mark_handled();
    Ok(())
}

/// Renders `bytes` as a template string when requested. A body that isn't
/// valid UTF-8 (e.g. a binary `file` response) is left untouched even when
/// `template=true`, since there is no string to expand.
#[allow(clippy::too_many_arguments)]
fn render_if_requested(
    bytes: Vec<u8>,
    template: bool,
    exchange: &Exchange,
    stores: &StoreRegistry,
    system: &SystemInfo,
    clock: &dyn Clock,
    rng: &dyn Rng,
) -> Vec<u8> {
    if !template {
        return bytes;
    }
    let Ok(text) = String::from_utf8(bytes.clone()) else {
        return bytes;
    };

    // The template context needs a read-only view of the request/store
    // while `exchange.response` is being built up concurrently in the
    // caller; cloning the request/store half avoids aliasing the same
    // struct mutably and immutably at once.
    let snapshot = Exchange {
        request: exchange.request.clone(),
        response: imposter_base::ResponseState::new(),
        store: exchange.store.clone(),
    };
    let ctx = TemplateContext {
        exchange: &snapshot,
        stores,
        system,
        clock,
        rng,
    };
    render(&text, &ctx).into_bytes()
}
