//! HTTP status code mapping for error codes

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Get the HTTP status code this error corresponds to
    pub fn http_status(&self) -> StatusCode {
        match self {
            Self::Success => StatusCode::OK,

            // 404 Not Found
            Self::NotFound
            | Self::TenantNotFound
            | Self::BranchNotFound
            | Self::OrderNotFound
            | Self::SessionNotFound
            | Self::BillNotFound
            | Self::MenuItemNotFound
            | Self::CategoryNotFound
            | Self::TableNotFound
            | Self::UserNotFound => StatusCode::NOT_FOUND,

            // 409 Conflict
            Self::AlreadyExists
            | Self::TableOccupied
            | Self::UserEmailExists
            | Self::PaymentInProgress => StatusCode::CONFLICT,

            // 401 Unauthorized
            Self::NotAuthenticated
            | Self::InvalidCredentials
            | Self::TokenExpired
            | Self::TokenInvalid
            | Self::AccountLocked => StatusCode::UNAUTHORIZED,

            // 403 Forbidden
            Self::PermissionDenied | Self::AdminRequired | Self::TenantNotSelected => {
                StatusCode::FORBIDDEN
            }

            // 503 Service Unavailable (transient, caller may retry)
            Self::NetworkError | Self::TimeoutError => StatusCode::SERVICE_UNAVAILABLE,

            // 500 Internal Server Error
            Self::InternalError | Self::ConfigError | Self::StorageError | Self::Unknown => {
                StatusCode::INTERNAL_SERVER_ERROR
            }

            // 400 Bad Request (validation / business rules)
            _ => StatusCode::BAD_REQUEST,
        }
    }

    /// Best-effort reverse mapping used when the backend only gives a status
    pub fn from_http_status(status: StatusCode) -> Self {
        match status.as_u16() {
            200..300 => Self::Success,
            400 | 422 => Self::ValidationFailed,
            401 => Self::NotAuthenticated,
            403 => Self::PermissionDenied,
            404 => Self::NotFound,
            409 => Self::AlreadyExists,
            408 | 504 => Self::TimeoutError,
            502 | 503 => Self::NetworkError,
            _ => Self::InternalError,
        }
    }
}
