//! Client error types

use shared::error::{AppError, ErrorCode};
use thiserror::Error;

/// Client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed before a response arrived
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body did not have the expected shape
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// 401 from the backend; stored credentials have been cleared
    #[error("Authentication required: {0}")]
    Unauthorized(String),

    /// 403 from the backend
    #[error("Permission denied: {0}")]
    Forbidden(String),

    /// 404 from the backend
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rejected input, either by the backend (400/422) or before any request was sent
    #[error("{0}")]
    Validation(AppError),

    /// Any other non-success status
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The call needs a logged-in user
    #[error("Not logged in")]
    NotLoggedIn,

    /// The call needs a tenant and none is stored
    #[error("No tenant associated with the current user")]
    NoTenant,

    /// Local store could not be read or written
    #[error("Storage error: {0}")]
    Storage(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ClientError {
    /// Client-side rejection with a specific code and the code's default message
    pub fn rejected(code: ErrorCode) -> Self {
        Self::Validation(AppError::new(code))
    }

    /// Client-side rejection with a custom message
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Validation(AppError::validation(message))
    }

    /// Map to the shared error code
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Http(e) if e.is_timeout() => ErrorCode::TimeoutError,
            Self::Http(_) => ErrorCode::NetworkError,
            Self::InvalidResponse(_) | Self::Serialization(_) => ErrorCode::InvalidFormat,
            Self::Unauthorized(_) | Self::NotLoggedIn => ErrorCode::NotAuthenticated,
            Self::Forbidden(_) => ErrorCode::PermissionDenied,
            Self::NotFound(_) => ErrorCode::NotFound,
            Self::Validation(e) => e.code,
            Self::Api { status, .. } => http::StatusCode::from_u16(*status)
                .map(ErrorCode::from_http_status)
                .unwrap_or(ErrorCode::Unknown),
            Self::NoTenant => ErrorCode::TenantNotSelected,
            Self::Storage(_) => ErrorCode::StorageError,
            Self::Internal(_) => ErrorCode::InternalError,
        }
    }

    /// Transient failures worth retrying for idempotent reads
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Http(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            Self::Api { status, .. } => *status >= 500,
            _ => false,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized(_))
    }
}

impl From<AppError> for ClientError {
    fn from(err: AppError) -> Self {
        Self::Validation(err)
    }
}

impl From<std::io::Error> for ClientError {
    fn from(err: std::io::Error) -> Self {
        Self::Storage(err.to_string())
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;
