use crate::clock::Clock;
use crate::rng::Rng;
use crate::system_info::SystemInfo;
use imposter_base::Exchange;
use imposter_store::StoreRegistry;

/// Everything the evaluator needs to resolve a dotted expression, per Design
/// Note "replace reflection-driven template namespaces with an explicit
/// resolver table mapping dotted paths to typed accessor closures".
pub struct TemplateContext<'a> {
    pub exchange: &'a Exchange,
    pub stores: &'a StoreRegistry,
    pub system: &'a SystemInfo,
    pub clock: &'a dyn Clock,
    pub rng: &'a dyn Rng,
}

/// Resolves one dotted path (without the `${`/`}` delimiters or the
/// `:-default` suffix, already split off by the caller). Returns `None` for
/// any path not covered by a known namespace.
pub fn resolve(path: &str, ctx: &TemplateContext<'_>) -> Option<String> {
    if let Some(rest) = path.strip_prefix("context.request.") {
        return resolve_request(rest, ctx);
    }
    if let Some(rest) = path.strip_prefix("stores.") {
        return resolve_store(rest, ctx);
    }
    if let Some(rest) = path.strip_prefix("system.") {
        return resolve_system(rest, ctx);
    }
    if let Some(rest) = path.strip_prefix("datetime.now.") {
        return resolve_datetime(rest, ctx);
    }
    if let Some(rest) = path.strip_prefix("random.") {
        return resolve_random(rest, ctx);
    }
    None
}

fn resolve_request(rest: &str, ctx: &TemplateContext<'_>) -> Option<String> {
    let req = &ctx.exchange.request;
    match rest {
        "method" => Some(req.method.clone()),
        "path" => Some(req.path.clone()),
        "uri" => {
            let qs: Vec<String> = req
                .query
                .iter()
                .map(|(k, v)| format!("{k}={v}"))
                .collect();
            if qs.is_empty() {
                Some(req.path.clone())
            } else {
                Some(format!("{}?{}", req.path, qs.join("&")))
            }
        }
        "body" => Some(req.body_str().unwrap_or_default().to_string()),
        _ => {
            if let Some(header) = rest.strip_prefix("headers.") {
                req.headers.first(header).map(str::to_string)
            } else if let Some(query) = rest.strip_prefix("queryParams.") {
                req.query.first(query).map(str::to_string)
            } else if let Some(param) = rest.strip_prefix("pathParams.") {
                req.path_params.get(param).cloned()
            } else if let Some(form) = rest.strip_prefix("formParams.") {
                req.form_params().get(form).cloned()
            } else {
                None
            }
        }
    }
}

fn resolve_store(rest: &str, ctx: &TemplateContext<'_>) -> Option<String> {
    let (store_name, key) = rest.split_once('.')?;
    let store = ctx.stores.get(store_name)?;
    let value = store.get(key)?;
    Some(json_to_template_string(&value))
}

fn resolve_system(rest: &str, ctx: &TemplateContext<'_>) -> Option<String> {
    match rest {
        "server.port" => Some(ctx.system.port.to_string()),
        "server.url" => Some(ctx.system.server_url.clone()),
        "version" => Some(ctx.system.version.clone()),
        _ => None,
    }
}

fn resolve_datetime(rest: &str, ctx: &TemplateContext<'_>) -> Option<String> {
    let now = ctx.clock.now();
    match rest {
        "iso8601_date" => Some(now.format("%Y-%m-%d").to_string()),
        "iso8601_datetime" => Some(now.to_rfc3339()),
        "millis" => Some(now.timestamp_millis().to_string()),
        "nanos" => Some(now.timestamp_nanos_opt().unwrap_or_default().to_string()),
        _ => None,
    }
}

fn resolve_random(rest: &str, ctx: &TemplateContext<'_>) -> Option<String> {
    if rest == "uuid()" {
        return Some(ctx.rng.uuid().to_string());
    }
    let (name, arg) = parse_call(rest)?;
    match name {
        "alphabetic" => Some(ctx.rng.alphabetic(arg)),
        "numeric" => Some(ctx.rng.numeric(arg)),
        "alphanumeric" => Some(ctx.rng.alphanumeric(arg)),
        "any" => Some(ctx.rng.any(arg)),
        _ => None,
    }
}

fn parse_call(expr: &str) -> Option<(&str, usize)> {
    let open = expr.find('(')?;
    let close = expr.rfind(')')?;
    if close < open {
        return None;
    }
    let name = &expr[..open];
    let arg: usize = expr[open + 1..close].trim().parse().ok()?;
    Some((name, arg))
}

fn json_to_template_string(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::rng::FixedRng;
    use chrono::TimeZone;
    use imposter_base::Request;

    fn ctx<'a>(
        exchange: &'a Exchange,
        stores: &'a StoreRegistry,
        system: &'a SystemInfo,
        clock: &'a FixedClock,
        rng: &'a FixedRng,
    ) -> TemplateContext<'a> {
        TemplateContext {
            exchange,
            stores,
            system,
            clock,
            rng,
        }
    }

    #[test]
    fn resolves_request_path_param() {
        let mut exchange = Exchange::new(Request::new("GET", "/items/42"));
        exchange
            .request
            .path_params
            .insert("id".to_string(), "42".to_string());
        let stores = StoreRegistry::new();
        let system = SystemInfo::new(8080, None, "0.1.0");
        let clock = FixedClock(chrono::Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
        let rng = FixedRng::default();
        let tctx = ctx(&exchange, &stores, &system, &clock, &rng);

        assert_eq!(
            resolve("context.request.pathParams.id", &tctx),
            Some("42".to_string())
        );
    }

    #[test]
    fn resolves_store_value() {
        let exchange = Exchange::new(Request::new("GET", "/"));
        let stores = StoreRegistry::new();
        stores.open("s").put("k", serde_json::json!("v"));
        let system = SystemInfo::new(8080, None, "0.1.0");
        let clock = FixedClock(chrono::Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
        let rng = FixedRng::default();
        let tctx = ctx(&exchange, &stores, &system, &clock, &rng);

        assert_eq!(resolve("stores.s.k", &tctx), Some("v".to_string()));
    }

    #[test]
    fn resolves_random_with_fixed_rng() {
        let exchange = Exchange::new(Request::new("GET", "/"));
        let stores = StoreRegistry::new();
        let system = SystemInfo::new(8080, None, "0.1.0");
        let clock = FixedClock(chrono::Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
        let rng = FixedRng::default();
        let tctx = ctx(&exchange, &stores, &system, &clock, &rng);

        assert_eq!(
            resolve("random.numeric(4)", &tctx),
            Some("0000".to_string())
        );
    }

    #[test]
    fn unknown_namespace_resolves_to_none() {
        let exchange = Exchange::new(Request::new("GET", "/"));
        let stores = StoreRegistry::new();
        let system = SystemInfo::new(8080, None, "0.1.0");
        let clock = FixedClock(chrono::Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
        let rng = FixedRng::default();
        let tctx = ctx(&exchange, &stores, &system, &clock, &rng);

        assert_eq!(resolve("nonsense.path", &tctx), None);
    }
}
