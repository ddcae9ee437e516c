use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// `spec.md §3 MatchCondition`: either a literal comparison or, for body
/// matchers, a JSONPath/XPath expression evaluated against the parsed body.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub enum MatchOperator {
    EqualTo,
    NotEqualTo,
    Contains,
    NotContains,
    Matches,
    NotMatches,
    Exists,
    NotExists,
}

impl Default for MatchOperator {
    fn default() -> Self {
        MatchOperator::EqualTo
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct MatchCondition {
    pub value: Option<String>,
    #[serde(default)]
    pub operator: MatchOperator,
}

/// A single leaf of a `requestBody` matcher: either a literal/regex
/// condition against the raw body, or a JSONPath/XPath selector whose
/// extracted value is compared with `condition`.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct BodyMatchCondition {
    #[serde(default, rename = "jsonPath")]
    pub json_path: Option<String>,
    #[serde(default, rename = "xPath")]
    pub xpath: Option<String>,
    #[serde(flatten)]
    pub condition: MatchCondition,
}

/// `requestBody`: a single condition, or `allOf`/`anyOf` composition.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum BodyMatcher {
    AllOf {
        #[serde(rename = "allOf")]
        all_of: Vec<BodyMatchCondition>,
    },
    AnyOf {
        #[serde(rename = "anyOf")]
        any_of: Vec<BodyMatchCondition>,
    },
    Single(BodyMatchCondition),
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct RequestMatcher {
    pub method: String,
    pub path: String,
    #[serde(default, rename = "pathParams")]
    pub path_params: HashMap<String, MatchCondition>,
    #[serde(default, rename = "queryParams")]
    pub query_params: HashMap<String, MatchCondition>,
    #[serde(default, rename = "requestHeaders")]
    pub request_headers: HashMap<String, MatchCondition>,
    #[serde(default, rename = "formParams")]
    pub form_params: HashMap<String, MatchCondition>,
    #[serde(default, rename = "requestBody")]
    pub request_body: Option<BodyMatcher>,
    #[serde(default, rename = "logTemplate")]
    pub log_template: Option<String>,
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, Default)]
pub struct DelaySpec {
    #[serde(default)]
    pub exact: u64,
    #[serde(default)]
    pub min: u64,
    #[serde(default)]
    pub max: u64,
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum FailureMode {
    #[default]
    None,
    EmptyResponse,
    CloseConnection,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct ResponseSpec {
    #[serde(default)]
    pub status: u16,
    #[serde(default)]
    pub headers: HashMap<String, String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default)]
    pub template: bool,
    #[serde(default)]
    pub delay: Option<DelaySpec>,
    #[serde(default)]
    pub fail: FailureMode,
    #[serde(default, rename = "scopeKey")]
    pub scope_key: Option<String>,
}

/// A capture rule: one named source, one destination.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct CaptureSpec {
    #[serde(default)]
    pub header: Option<String>,
    #[serde(default, rename = "queryParam")]
    pub query_param: Option<String>,
    #[serde(default, rename = "pathParam")]
    pub path_param: Option<String>,
    #[serde(default, rename = "formParam")]
    pub form_param: Option<String>,
    #[serde(default, rename = "jsonPath")]
    pub json_path: Option<String>,
    #[serde(default, rename = "xPath")]
    pub xpath: Option<String>,
    #[serde(default)]
    pub constant: Option<String>,
    /// Destination store name; `None` means the per-exchange request store.
    #[serde(default)]
    pub store: Option<String>,
    #[serde(default, rename = "saveEmpty")]
    pub save_empty: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Resource {
    #[serde(flatten)]
    pub matcher: RequestMatcher,
    pub response: ResponseSpec,
    #[serde(default)]
    pub capture: HashMap<String, CaptureSpec>,
}

fn default_continue() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Interceptor {
    #[serde(flatten)]
    pub matcher: RequestMatcher,
    #[serde(default)]
    pub response: Option<ResponseSpec>,
    #[serde(default)]
    pub capture: HashMap<String, CaptureSpec>,
    #[serde(default = "default_continue", rename = "continue")]
    pub continue_: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum AllowOrigins {
    Keyword(String),
    List(Vec<String>),
}

impl Default for AllowOrigins {
    fn default() -> Self {
        AllowOrigins::List(Vec::new())
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct CorsConfig {
    #[serde(default, rename = "allowOrigins")]
    pub allow_origins: AllowOrigins,
    #[serde(default, rename = "allowMethods")]
    pub allow_methods: Vec<String>,
    #[serde(default, rename = "allowHeaders")]
    pub allow_headers: Vec<String>,
    #[serde(default, rename = "allowCredentials")]
    pub allow_credentials: bool,
    #[serde(default, rename = "maxAge")]
    pub max_age: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct StorePreload {
    #[serde(default, rename = "preloadData")]
    pub preload_data: Option<serde_json::Value>,
    #[serde(default, rename = "preloadFile")]
    pub preload_file: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct SystemConfig {
    #[serde(default)]
    pub stores: HashMap<String, StorePreload>,
}

/// The REST/SOAP/OpenAPI tagged variant from Design Note "Plugin
/// polymorphism across REST/SOAP/OpenAPI". SOAP and OpenAPI currently load
/// their declared `resources`/`interceptors` exactly like REST; WSDL/OpenAPI
/// document parsing is out of scope (spec.md §1).
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PluginKind {
    Rest,
    Soap,
    OpenApi,
}

/// One loaded configuration file: a plugin-type tag plus its declared
/// resources, interceptors, CORS policy and store preloads.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PluginConfig {
    pub plugin: PluginKind,
    #[serde(default, rename = "basePath")]
    pub base_path: String,
    #[serde(default)]
    pub resources: Vec<Resource>,
    #[serde(default)]
    pub interceptors: Vec<Interceptor>,
    #[serde(default)]
    pub cors: Option<CorsConfig>,
    #[serde(default)]
    pub system: SystemConfig,
    /// Raw plugin-specific fields, passed through untouched to external
    /// plugins as part of `ExternalConfig`.
    #[serde(flatten)]
    pub extra: serde_json::Value,
    /// Populated by the loader; not part of the YAML document.
    #[serde(skip)]
    pub source_path: PathBuf,
    #[serde(skip)]
    pub config_dir: PathBuf,
}

impl PluginConfig {
    pub fn effective_path(&self, declared: &str) -> String {
        format!(
            "{}{}",
            self.base_path.trim_end_matches('/'),
            if declared.starts_with('/') {
                declared.to_string()
            } else {
                format!("/{declared}")
            }
        )
    }
}
