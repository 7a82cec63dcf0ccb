use shared::error::{ClientError, ErrorCode};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PageError {
    #[error("invalid page '{requested}': {reason}")]
    InvalidPage { requested: String, reason: String },
    #[error("failed to fetch page {page}: {source:#}")]
    FetchFailed { page: u32, source: anyhow::Error },
    #[error("a fetch is already in flight; page {page} was not requested")]
    Busy { page: u32 },
}

impl PageError {
    pub(crate) fn invalid(requested: impl ToString, reason: impl Into<String>) -> Self {
        Self::InvalidPage {
            requested: requested.to_string(),
            reason: reason.into(),
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            PageError::InvalidPage { .. } => ErrorCode::InvalidPage,
            PageError::FetchFailed { .. } => ErrorCode::FetchFailed,
            PageError::Busy { .. } => ErrorCode::Busy,
        }
    }

    pub fn to_client_error(&self) -> ClientError {
        ClientError::new(self.code(), self.to_string())
    }
}

#[derive(Debug, Error)]
pub enum FavoritesError {
    #[error("failed to persist favorites under '{key}': {source:#}")]
    PersistenceWriteFailed { key: String, source: anyhow::Error },
    #[error("failed to read favorites under '{key}': {source:#}")]
    PersistenceReadFailed { key: String, source: anyhow::Error },
}

impl FavoritesError {
    pub fn code(&self) -> ErrorCode {
        match self {
            FavoritesError::PersistenceWriteFailed { .. } => ErrorCode::PersistenceWriteFailed,
            FavoritesError::PersistenceReadFailed { .. } => ErrorCode::PersistenceReadFailed,
        }
    }

    pub fn to_client_error(&self) -> ClientError {
        ClientError::new(self.code(), self.to_string())
    }
}
