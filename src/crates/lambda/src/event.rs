use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// API Gateway Proxy payload format 1.0 (REST APIs).
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiGatewayV1Request {
    #[serde(rename = "httpMethod")]
    pub http_method: String,
    pub path: String,
    #[serde(default, rename = "multiValueHeaders")]
    pub multi_value_headers: HashMap<String, Vec<String>>,
    #[serde(default, rename = "multiValueQueryStringParameters")]
    pub multi_value_query_string_parameters: HashMap<String, Vec<String>>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default, rename = "isBase64Encoded")]
    pub is_base64_encoded: bool,
}

/// API Gateway Proxy payload format 2.0 (HTTP APIs) and Lambda Function URLs
/// share this shape.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiGatewayV2Request {
    #[serde(rename = "rawPath")]
    pub raw_path: String,
    #[serde(default, rename = "rawQueryString")]
    pub raw_query_string: String,
    #[serde(default)]
    pub headers: HashMap<String, String>,
    #[serde(rename = "requestContext")]
    pub request_context: RequestContextV2,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default, rename = "isBase64Encoded")]
    pub is_base64_encoded: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RequestContextV2 {
    pub http: HttpContextV2,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HttpContextV2 {
    pub method: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ApiGatewayProxyResponse {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub headers: HashMap<String, String>,
    pub body: String,
    #[serde(rename = "isBase64Encoded")]
    pub is_base64_encoded: bool,
}
