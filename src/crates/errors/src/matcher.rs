use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Serialize, Deserialize, Error, Debug)]
pub enum MatchError {
    #[error("Invalid regex pattern {0}")]
    BadRegex(String),
    #[error("Invalid JSONPath expression {0}")]
    BadJsonPath(String),
    #[error("Invalid XPath expression {0}")]
    BadXPath(String),
    #[error("Request body could not be parsed as {0}")]
    UnparsableBody(String),
}
