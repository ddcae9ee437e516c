pub mod discovery;
pub mod host;
pub mod process;
pub mod wire;

pub use discovery::discover_plugins;
pub use host::ExternalPluginHost;
pub use process::{apply_handler_response, ExternalPlugin};
pub use wire::{
    ExternalConfig, ExternalPluginConfig, HandlerRequest, HandlerResponse, Handshake, Rpc, RpcReply,
    HANDSHAKE_COOKIE, PLUGIN_PROTOCOL_VERSION,
};
