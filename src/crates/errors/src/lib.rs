pub mod internal;
pub mod matcher;
pub mod plugin;
pub mod store;

use crate::internal::ImposterInternalError;
use crate::matcher::MatchError;
use crate::plugin::PluginError;
use crate::store::StoreError;
use config::ConfigError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImposterError {
    #[error("Internal Error {0}")]
    InternalError(#[from] ImposterInternalError),
    #[error("Match Error {0}")]
    MatchError(#[from] MatchError),
    #[error("Plugin Error {0}")]
    PluginError(#[from] PluginError),
    #[error("Store Error {0}")]
    StoreError(#[from] StoreError),
    #[error("Config Error {0}")]
    InvalidConfig(#[from] ConfigError),
    #[error("IO Error")]
    IoError(#[from] std::io::Error),
    #[error("Other Error {0}")]
    Other(String),
}
