use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Fixed cookie the parent writes as the first handshake frame; the child
/// must echo it back together with a version it supports.
pub const HANDSHAKE_COOKIE: &str = "IMPOSTER_PLUGIN_HANDSHAKE";
pub const PLUGIN_PROTOCOL_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Handshake {
    pub cookie: String,
    pub version: u32,
}

impl Handshake {
    pub fn ours() -> Self {
        Self {
            cookie: HANDSHAKE_COOKIE.to_string(),
            version: PLUGIN_PROTOCOL_VERSION,
        }
    }
}

/// One plugin's lightweight config, as handed to the child during `Configure`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExternalPluginConfig {
    pub plugin: String,
    pub spec_file: String,
    pub config_dir: String,
    pub raw_config: Vec<u8>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExternalConfig {
    pub server_url: String,
    pub plugins: Vec<ExternalPluginConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HandlerRequest {
    pub method: String,
    pub path: String,
    pub headers: HashMap<String, String>,
    pub query: Vec<(String, String)>,
    pub body: Vec<u8>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HandlerResponse {
    pub status: u16,
    #[serde(default)]
    pub headers: HashMap<String, String>,
    #[serde(default)]
    pub body: Vec<u8>,
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default)]
    pub file_base_dir: Option<String>,
    #[serde(default)]
    pub file_name: Option<String>,
}

/// RPC envelope written to the child's stdin.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum Rpc {
    Configure(ExternalConfig),
    Handle(HandlerRequest),
    Shutdown,
}

/// RPC envelope read back from the child's stdout.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum RpcReply {
    Configured,
    Handled(HandlerResponse),
    Error(String),
}
