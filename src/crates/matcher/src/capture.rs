use crate::body;
use imposter_base::model::CaptureSpec;
use imposter_base::Exchange;
use imposter_store::StoreRegistry;
use serde_json::Value;
use std::collections::HashMap;

/// Executes every capture rule in `captures` against `exchange`, writing
/// extracted values into the request store or a named store (spec.md §4.5).
/// Runs once per matching interceptor/resource, before response construction.
pub fn execute_captures(
    captures: &HashMap<String, CaptureSpec>,
    exchange: &mut Exchange,
    stores: &StoreRegistry,
) {
    for (name, spec) in captures {
        let Some(value) = extract(spec, exchange) else {
            continue;
        };
        if value.is_empty() && !spec.save_empty {
            continue;
        }
        match &spec.store {
            Some(store_name) => {
                stores
                    .open(store_name)
                    .put(name.clone(), Value::String(value));
            }
            None => {
                exchange.store.set(name.clone(), Value::String(value));
            }
        }
    }
}

fn extract(spec: &CaptureSpec, exchange: &Exchange) -> Option<String> {
    if let Some(h) = &spec.header {
        return exchange.request.headers.first(h).map(str::to_string);
    }
    if let Some(q) = &spec.query_param {
        return exchange.request.query.first(q).map(str::to_string);
    }
    if let Some(p) = &spec.path_param {
        return exchange.request.path_params.get(p).cloned();
    }
    if let Some(f) = &spec.form_param {
        return exchange.request.form_params().get(f).cloned();
    }
    if let Some(jp) = &spec.json_path {
        return body::extract_jsonpath(&exchange.request.body, jp);
    }
    if let Some(xp) = &spec.xpath {
        return body::extract_xpath(&exchange.request.body, xp);
    }
    if let Some(c) = &spec.constant {
        return Some(c.clone());
    }
    None
}
