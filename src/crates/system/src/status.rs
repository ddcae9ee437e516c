use imposter_base::{Request, ResponseState};
use serde_json::json;

/// `GET /system/status` per spec.md §6.
pub fn handle(request: &Request, version: &str) -> Option<ResponseState> {
    if request.path != "/system/status" || request.method != "GET" {
        return None;
    }
    let mut state = ResponseState::new();
    state.status = 200;
    state.headers.set("content-type", "application/json");
    state.body = serde_json::to_vec(&json!({"status": "ok", "version": version})).unwrap_or_default();
    Some(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_reports_ok_and_version() {
        let request = Request::new("GET", "/system/status");
        let response = handle(&request, "0.1.0").unwrap();
        assert_eq!(response.status, 200);
        let body: serde_json::Value = serde_json::from_slice(&response.body).unwrap();
        assert_eq!(body["status"], "ok");
        assert_eq!(body["version"], "0.1.0");
    }

    #[test]
    fn other_paths_are_not_handled() {
        let request = Request::new("GET", "/system/store/s");
        assert!(handle(&request, "0.1.0").is_none());
    }
}
