// shared/src/error/types.rs
// AppError 与后端错误体 {"detail": ...}

use super::codes::ErrorCode;
use http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;

pub type AppResult<T> = Result<T, AppError>;

/// A coded error with a display message and optional structured context.
///
/// Form checks in the client produce these before any request is sent, and
/// backend rejections are folded into one when the body carries a `detail`.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct AppError {
    pub code: ErrorCode,
    pub message: String,
    /// Extra context such as the offending field
    pub details: Option<HashMap<String, Value>>,
}

impl AppError {
    /// Uses the code's default text.
    pub fn new(code: ErrorCode) -> Self {
        Self::with_message(code, code.message())
    }

    pub fn with_message(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.details
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }

    pub fn detail(&self, key: &str) -> Option<&Value> {
        self.details.as_ref()?.get(key)
    }

    pub fn http_status(&self) -> StatusCode {
        self.code.http_status()
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::ValidationFailed, message)
    }

    /// `"<field> is required"`, with the field name kept under `field`.
    pub fn required(field: impl Into<String>) -> Self {
        let field = field.into();
        Self::with_message(ErrorCode::RequiredField, format!("{field} is required"))
            .with_detail("field", field)
    }

    pub fn not_found(what: impl Into<String>) -> Self {
        let what = what.into();
        Self::with_message(ErrorCode::NotFound, format!("{what} not found"))
            .with_detail("resource", what)
    }

    pub fn not_authenticated() -> Self {
        Self::new(ErrorCode::NotAuthenticated)
    }

    pub fn permission_denied() -> Self {
        Self::new(ErrorCode::PermissionDenied)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::InternalError, message)
    }
}

impl From<ErrorCode> for AppError {
    fn from(code: ErrorCode) -> Self {
        Self::new(code)
    }
}

/// Failure body of the REST backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub detail: ErrorDetail,
}

/// `detail` is a plain sentence for business errors and a list of issues when
/// request validation rejected the payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum ErrorDetail {
    Message(String),
    Issues(Vec<ValidationIssue>),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ValidationIssue {
    /// Path to the field, e.g. `["body", "email"]`
    #[serde(default)]
    pub loc: Vec<Value>,
    pub msg: String,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
}

impl ValidationIssue {
    /// Dotted field path without the `body` / `query` prefix.
    fn field(&self) -> String {
        let parts: Vec<&str> = self
            .loc
            .iter()
            .filter_map(Value::as_str)
            .filter(|part| !matches!(*part, "body" | "query"))
            .collect();
        parts.join(".")
    }
}

impl ErrorDetail {
    /// One line suitable for a toast or a terminal.
    pub fn to_message(&self) -> String {
        let issues = match self {
            Self::Message(msg) => return msg.clone(),
            Self::Issues(issues) => issues,
        };
        let lines: Vec<String> = issues
            .iter()
            .map(|issue| match issue.field() {
                field if field.is_empty() => issue.msg.clone(),
                field => format!("{field}: {}", issue.msg),
            })
            .collect();
        lines.join("; ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_message_comes_from_code() {
        let err = AppError::new(ErrorCode::OrderEmpty);
        assert_eq!(err.code, ErrorCode::OrderEmpty);
        assert_eq!(err.to_string(), "Cart is empty");
        assert!(err.details.is_none());
    }

    #[test]
    fn test_required_names_the_field() {
        let err = AppError::required("branch_name");
        assert_eq!(err.code, ErrorCode::RequiredField);
        assert_eq!(err.message, "branch_name is required");
        assert_eq!(err.detail("field").unwrap(), "branch_name");
        assert!(err.detail("resource").is_none());
    }

    #[test]
    fn test_status_of_auth_errors() {
        assert_eq!(
            AppError::not_authenticated().http_status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::permission_denied().http_status(),
            StatusCode::FORBIDDEN
        );
    }

    #[test]
    fn test_plain_detail() {
        let body: ErrorBody =
            serde_json::from_str(r#"{"detail": "Email already registered"}"#).unwrap();
        assert_eq!(body.detail.to_message(), "Email already registered");
    }

    #[test]
    fn test_issue_list_flattened() {
        let body: ErrorBody = serde_json::from_str(
            r#"{"detail": [
                {"loc": ["body", "email"], "msg": "field required", "type": "value_error.missing"},
                {"loc": ["query", "page"], "msg": "ensure this value is greater than 0"},
                {"loc": [], "msg": "bad payload"}
            ]}"#,
        )
        .unwrap();
        assert_eq!(
            body.detail.to_message(),
            "email: field required; page: ensure this value is greater than 0; bad payload"
        );
    }
}
