use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Serialize, Deserialize, Error, Debug)]
pub enum StoreError {
    #[error("Store {0} does not exist")]
    NotFound(String),
    #[error("Key {0} does not exist in store {1}")]
    KeyNotFound(String, String),
    #[error("Failed to preload store {0} from {1}")]
    PreloadFailed(String, String),
}
