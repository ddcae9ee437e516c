use imposter_base::{Request, ResponseState};
use imposter_store::StoreRegistry;
use serde_json::Value;

/// `/system/store/<name>[/<key>]`, per spec.md §6's store API table. Returns
/// `None` if `path` doesn't fall under the store API at all, so the caller
/// can fall through to other system routes.
pub fn handle(request: &Request, stores: &StoreRegistry) -> Option<ResponseState> {
    let rest = request.path.strip_prefix("/system/store/")?;
    let mut segments = rest.splitn(2, '/');
    let store_name = segments.next().filter(|s| !s.is_empty())?;
    let key = segments.next().filter(|s| !s.is_empty());

    Some(match (request.method.as_str(), key) {
        ("GET", None) => get_store(request, stores, store_name),
        ("GET", Some(key)) => get_key(stores, store_name, key),
        ("PUT", None) => bad_request("missing store key"),
        ("PUT", Some(key)) => put_key(request, stores, store_name, key),
        ("POST", None) => post_bulk(request, stores, store_name),
        ("DELETE", None) => {
            stores.delete_store(store_name);
            no_content()
        }
        ("DELETE", Some(key)) => {
            if let Some(store) = stores.get(store_name) {
                store.delete(key);
            }
            no_content()
        }
        _ => method_not_allowed(),
    })
}

fn get_store(request: &Request, stores: &StoreRegistry, name: &str) -> ResponseState {
    if let Some(accept) = request.headers.first("accept") {
        if !accept.contains("application/json") && !accept.contains("*/*") {
            return not_acceptable();
        }
    }
    let prefix = request.query.first("keyPrefix").unwrap_or("");
    let map = stores
        .get(name)
        .map(|s| s.all_with_prefix(prefix))
        .unwrap_or_default();
    json_response(200, &Value::Object(map.into_iter().collect()))
}

fn get_key(stores: &StoreRegistry, name: &str, key: &str) -> ResponseState {
    let Some(value) = stores.get(name).and_then(|s| s.get(key)) else {
        return not_found();
    };
    match value {
        Value::String(s) => text_response(200, &s),
        other => json_response(200, &other),
    }
}

fn put_key(request: &Request, stores: &StoreRegistry, name: &str, key: &str) -> ResponseState {
    let store = stores.open(name);
    let existed = store.get(key).is_some();
    let value = parse_body_value(&request.body);
    store.put(key.to_string(), value);
    if existed {
        no_content()
    } else {
        ResponseState {
            status: 201,
            ..ResponseState::new()
        }
    }
}

fn post_bulk(request: &Request, stores: &StoreRegistry, name: &str) -> ResponseState {
    let Ok(Value::Object(map)) = serde_json::from_slice::<Value>(&request.body) else {
        return bad_request("body must be a JSON object");
    };
    let store = stores.open(name);
    store.put_all(map);
    ResponseState {
        status: 200,
        ..ResponseState::new()
    }
}

fn parse_body_value(body: &[u8]) -> Value {
    serde_json::from_slice(body).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(body).into_owned()))
}

fn no_content() -> ResponseState {
    ResponseState {
        status: 204,
        ..ResponseState::new()
    }
}

fn not_found() -> ResponseState {
    ResponseState {
        status: 404,
        ..ResponseState::new()
    }
}

fn not_acceptable() -> ResponseState {
    ResponseState {
        status: 406,
        ..ResponseState::new()
    }
}

fn method_not_allowed() -> ResponseState {
    ResponseState {
        status: 405,
        ..ResponseState::new()
    }
}

fn bad_request(message: &str) -> ResponseState {
    let mut state = json_response(400, &Value::String(message.to_string()));
    state.status = 400;
    state
}

fn json_response(status: u16, value: &Value) -> ResponseState {
    let mut state = ResponseState::new();
    state.status = status;
    state.headers.set("content-type", "application/json");
    state.body = serde_json::to_vec(value).unwrap_or_default();
    state
}

fn text_response(status: u16, value: &str) -> ResponseState {
    let mut state = ResponseState::new();
    state.status = status;
    state.headers.set("content-type", "text/plain");
    state.body = value.as_bytes().to_vec();
    state
}
