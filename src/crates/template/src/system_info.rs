/// Backs the `system.*` template namespace.
#[derive(Debug, Clone)]
pub struct SystemInfo {
    pub port: u16,
    pub server_url: String,
    pub version: String,
}

impl SystemInfo {
    pub fn new(port: u16, server_url: Option<String>, version: impl Into<String>) -> Self {
        Self {
            port,
            server_url: server_url.unwrap_or_else(|| format!("http://localhost:{port}")),
            version: version.into(),
        }
    }
}
