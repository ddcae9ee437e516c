use crate::event::{ApiGatewayProxyResponse, ApiGatewayV1Request, ApiGatewayV2Request};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use imposter_base::{HeaderMultiMap, QueryMultiMap, Request, ResponseState};
use imposter_errors::ImposterError;
use serde_json::Value;

/// Translates an API Gateway Proxy (v1 or v2) or Function URL event into an
/// [`Request`], per spec.md §4.8. The three shapes are distinguished by
/// their JSON fields rather than an explicit version tag that all three
/// carry consistently.
pub fn event_to_request(raw: &Value) -> Result<Request, ImposterError> {
    if raw.get("httpMethod").is_some() {
        let event: ApiGatewayV1Request = serde_json::from_value(raw.clone())
            .map_err(|e| ImposterError::Other(format!("invalid API Gateway v1 event: {e}")))?;
        return Ok(from_v1(event));
    }
    if raw.get("requestContext").and_then(|c| c.get("http")).is_some() {
        let event: ApiGatewayV2Request = serde_json::from_value(raw.clone())
            .map_err(|e| ImposterError::Other(format!("invalid API Gateway v2/Function URL event: {e}")))?;
        return Ok(from_v2(event));
    }
    Err(ImposterError::Other("unrecognized lambda event shape".to_string()))
}

fn from_v1(event: ApiGatewayV1Request) -> Request {
    let mut request = Request::new(event.http_method, event.path);
    request.headers = event
        .multi_value_headers
        .into_iter()
        .flat_map(|(name, values)| values.into_iter().map(move |v| (name.clone(), v)))
        .collect::<HeaderMultiMap>();
    request.query = event
        .multi_value_query_string_parameters
        .into_iter()
        .flat_map(|(name, values)| values.into_iter().map(move |v| (name.clone(), v)))
        .collect::<QueryMultiMap>();
    request.body = decode_body(event.body, event.is_base64_encoded);
    request
}

fn from_v2(event: ApiGatewayV2Request) -> Request {
    let mut request = Request::new(event.request_context.http.method, event.raw_path);
    request.headers = event.headers.into_iter().collect::<HeaderMultiMap>();
    request.query = QueryMultiMap::parse(&event.raw_query_string);
    request.body = decode_body(event.body, event.is_base64_encoded);
    request
}

fn decode_body(body: Option<String>, is_base64: bool) -> Vec<u8> {
    let Some(body) = body else { return Vec::new() };
    if is_base64 {
        STANDARD.decode(body).unwrap_or_default()
    } else {
        body.into_bytes()
    }
}

/// Translates a [`ResponseState`] into an API-Gateway-Proxy-shaped response
/// body. Both API Gateway Proxy formats and Function URLs accept this same
/// `statusCode`/`headers`/`body`/`isBase64Encoded` envelope.
pub fn response_to_event(response: &ResponseState) -> ApiGatewayProxyResponse {
    let headers = response
        .headers
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

    let (body, is_base64_encoded) = match std::str::from_utf8(&response.body) {
        Ok(text) => (text.to_string(), false),
        Err(_) => (STANDARD.encode(&response.body), true),
    };

    ApiGatewayProxyResponse {
        status_code: response.effective_status(),
        headers,
        body,
        is_base64_encoded,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn v1_event_translates_method_path_query_and_body() {
        let event = json!({
            "httpMethod": "GET",
            "path": "/items",
            "multiValueQueryStringParameters": {"id": ["42"]},
            "multiValueHeaders": {"Accept": ["application/json"]},
            "body": null,
            "isBase64Encoded": false,
        });
        let request = event_to_request(&event).unwrap();
        assert_eq!(request.method, "GET");
        assert_eq!(request.path, "/items");
        assert_eq!(request.query.first("id"), Some("42"));
        assert_eq!(request.headers.first("accept"), Some("application/json"));
    }

    #[test]
    fn v2_event_decodes_base64_body() {
        let event = json!({
            "rawPath": "/items",
            "rawQueryString": "id=42",
            "headers": {"content-type": "application/json"},
            "requestContext": {"http": {"method": "POST"}},
            "body": STANDARD.encode("hello"),
            "isBase64Encoded": true,
        });
        let request = event_to_request(&event).unwrap();
        assert_eq!(request.method, "POST");
        assert_eq!(request.body, b"hello");
        assert_eq!(request.query.first("id"), Some("42"));
    }

    #[test]
    fn unrecognized_shape_is_an_error() {
        let event = json!({"foo": "bar"});
        assert!(event_to_request(&event).is_err());
    }

    #[test]
    fn response_with_text_body_is_not_base64_encoded() {
        let mut response = ResponseState::new();
        response.status = 200;
        response.headers.set("content-type", "text/plain");
        response.body = b"hello".to_vec();

        let event = response_to_event(&response);
        assert_eq!(event.status_code, 200);
        assert_eq!(event.body, "hello");
        assert!(!event.is_base64_encoded);
    }

    #[test]
    fn response_with_binary_body_is_base64_encoded() {
        let mut response = ResponseState::new();
        response.body = vec![0xff, 0xfe, 0x00, 0x01];

        let event = response_to_event(&response);
        assert!(event.is_base64_encoded);
        assert_eq!(STANDARD.decode(event.body).unwrap(), vec![0xff, 0xfe, 0x00, 0x01]);
    }
}
