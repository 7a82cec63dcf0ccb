use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    InvalidPage,
    FetchFailed,
    Busy,
    PersistenceWriteFailed,
    PersistenceReadFailed,
    PersistenceReadCorrupt,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientError {
    pub code: ErrorCode,
    pub message: String,
}

impl ClientError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

#[derive(Debug, Error)]
#[error("{code:?}: {message}")]
pub struct ClientException {
    pub code: ErrorCode,
    pub message: String,
}

impl ClientException {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl From<ClientException> for ClientError {
    fn from(value: ClientException) -> Self {
        Self {
            code: value.code,
            message: value.message,
        }
    }
}
