use imposter_base::model::{AllowOrigins, CorsConfig};
use imposter_base::{Request, ResponseState};

/// Resolves the `Access-Control-Allow-Origin` value for a given request
/// `Origin`, per spec.md §6: `"all"` echoes the request origin, `"*"` is
/// the literal wildcard, anything else is matched as an exact origin list
/// (a bare string is treated as a one-element list).
fn resolve_allow_origin(origin: &str, allow_origins: &AllowOrigins) -> Option<String> {
    match allow_origins {
        AllowOrigins::Keyword(k) if k == "all" => Some(origin.to_string()),
        AllowOrigins::Keyword(k) if k == "*" => Some("*".to_string()),
        AllowOrigins::Keyword(exact) => (exact == origin).then(|| origin.to_string()),
        AllowOrigins::List(list) => list.iter().any(|o| o == origin).then(|| origin.to_string()),
    }
}

/// Handles an `OPTIONS` preflight request. Returns `None` if the request
/// isn't a CORS preflight (wrong method) so callers fall through.
pub fn preflight(request: &Request, cors: &CorsConfig) -> Option<ResponseState> {
    if request.method != "OPTIONS" {
        return None;
    }
    let Some(origin) = request.headers.first("origin") else {
        let mut state = ResponseState::new();
        state.status = 400;
        return Some(state);
    };

    let mut state = ResponseState::new();
    state.status = 204;
    if let Some(allowed) = resolve_allow_origin(origin, &cors.allow_origins) {
        state.headers.set("access-control-allow-origin", allowed);
    }
    state.headers.set("vary", "Origin");
    if !cors.allow_methods.is_empty() {
        state.headers.set("access-control-allow-methods", cors.allow_methods.join(", "));
    }
    if !cors.allow_headers.is_empty() {
        state.headers.set("access-control-allow-headers", cors.allow_headers.join(", "));
    }
    if cors.allow_credentials {
        state.headers.set("access-control-allow-credentials", "true");
    }
    if let Some(max_age) = cors.max_age {
        state.headers.set("access-control-max-age", max_age.to_string());
    }
    Some(state)
}

/// Adds CORS response headers to an already-built response for a regular
/// (non-preflight) cross-origin request.
pub fn apply_actual(response: &mut ResponseState, request: &Request, cors: &CorsConfig) {
    let Some(origin) = request.headers.first("origin") else {
        return;
    };
    if let Some(allowed) = resolve_allow_origin(origin, &cors.allow_origins) {
        response.headers.set("access-control-allow-origin", allowed);
        response.headers.set("vary", "Origin");
        if cors.allow_credentials {
            response.headers.set("access-control-allow-credentials", "true");
        }
    }
}
