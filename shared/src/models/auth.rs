//! Authentication payloads

use serde::{Deserialize, Serialize};
use std::fmt;

/// Account role as the backend reports it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Owner,
    Staff,
    Chef,
    Customer,
    Admin,
    #[serde(other)]
    Unknown,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Owner => "owner",
            Self::Staff => "staff",
            Self::Chef => "chef",
            Self::Customer => "customer",
            Self::Admin => "admin",
            Self::Unknown => "unknown",
        }
    }

    /// Parse a stored role string; unrecognised values fall back to the default role
    pub fn parse(raw: &str) -> Self {
        match raw {
            "owner" => Self::Owner,
            "staff" => Self::Staff,
            "chef" => Self::Chef,
            "customer" => Self::Customer,
            "admin" => Self::Admin,
            _ => Self::default(),
        }
    }

    /// Roles that may operate the kitchen and staff boards
    pub fn can_operate_boards(&self) -> bool {
        matches!(self, Self::Owner | Self::Staff | Self::Chef)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Login request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Owner self-registration request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub full_name: String,
    pub email: String,
    pub password: String,
}

/// User summary embedded in the token response
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuthUser {
    pub user_id: String,
    pub email: String,
    pub full_name: String,
    #[serde(default)]
    pub tenant_id: Option<String>,
    #[serde(default)]
    pub role: Role,
}

/// Login / register response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    /// Token lifetime in seconds
    pub expires_in: i64,
    pub user: AuthUser,
}

fn default_token_type() -> String {
    "bearer".to_string()
}

/// Current user profile (`GET /api/auth/me`)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserProfile {
    pub user_id: String,
    pub email: String,
    pub full_name: String,
    #[serde(default)]
    pub tenant_id: Option<String>,
    #[serde(default)]
    pub tenant_name: Option<String>,
    #[serde(default)]
    pub role: Role,
}
