use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Serialize, Deserialize, Error, Debug)]
pub enum PluginError {
    #[error("External plugin executable not found for {0}")]
    ExecutableNotFound(String),
    #[error("External plugin {0} failed the handshake")]
    HandshakeFailed(String),
    #[error("External plugin {0} speaks unsupported protocol version {1}")]
    UnsupportedProtocolVersion(String, u32),
    #[error("External plugin {0} exited before responding")]
    PluginExited(String),
    #[error("External plugin {0} wire error: {1}")]
    WireError(String, String),
}
