use imposter_base::ResponseState;

/// Builds the 404 catalogue page listing every declared route across every
/// loaded plugin, per spec.md §4.6 step 4. Takes already-resolved
/// `"METHOD full-path"` strings rather than the plugin model directly, so
/// this crate doesn't need to know how a plugin joins `basePath` with a
/// resource's declared path.
pub fn not_found(routes: &[String]) -> ResponseState {
    let mut routes = routes.to_vec();
    routes.sort();

    let mut body = String::from("<html><body><h1>404 Not Found</h1><h2>Known routes</h2><ul>");
    for route in &routes {
        body.push_str(&format!("<li>{route}</li>"));
    }
    body.push_str("</ul></body></html>");

    let mut state = ResponseState::new();
    state.status = 404;
    state.headers.set("content-type", "text/html");
    state.body = body.into_bytes();
    state
}
