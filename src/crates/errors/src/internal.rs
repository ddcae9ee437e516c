use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Serialize, Deserialize, Error, Debug)]
pub enum ImposterInternalError {
    #[error("A dependency was found but did not match T")]
    DependencyTypeMismatch,
    #[error("Provider was called but could not be built")]
    ProviderNotBuilt,
    #[error("Provider is dependent on itself while being constructed")]
    DependencyCycleDetected,
    #[error("No provider registered for requested type")]
    ProviderNotRegistered,
    #[error("Unknown error {0}")]
    FailedToInitiateServer(String),
    #[error("Invalid plugin configuration {0}")]
    InvalidPluginConfiguration(String),
}
