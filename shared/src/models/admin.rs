//! Platform administration models
//!
//! List rows accept both spellings the backend has used for display names
//! (`name` / `tenant_name` / `full_name`).

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::auth::Role;

/// Platform-wide counters (`GET /api/admin/dashboard`)
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AdminDashboard {
    #[serde(default)]
    pub total_restaurants: u64,
    #[serde(default)]
    pub total_users: u64,
    #[serde(default)]
    pub active_restaurants: u64,
    #[serde(default)]
    pub active_users: u64,
}

/// Account status toggled by admins
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AccountStatus {
    #[default]
    Active,
    #[serde(alias = "inactive", alias = "suspended")]
    Locked,
}

impl AccountStatus {
    pub fn toggled(&self) -> Self {
        match self {
            Self::Active => Self::Locked,
            Self::Locked => Self::Active,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Locked => "locked",
        }
    }
}

/// Restaurant (tenant) row
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AdminRestaurant {
    pub tenant_id: String,
    #[serde(alias = "tenant_name")]
    pub name: String,
    #[serde(default)]
    pub owner_name: Option<String>,
    #[serde(default)]
    pub owner_email: Option<String>,
    #[serde(default)]
    pub branch_count: u32,
    #[serde(default)]
    pub revenue: Decimal,
    #[serde(default)]
    pub status: AccountStatus,
    #[serde(default, with = "crate::util::timestamp_opt")]
    pub created_at: Option<DateTime<Utc>>,
}

/// User row
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AdminUser {
    pub user_id: String,
    #[serde(alias = "full_name")]
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub tenant_name: Option<String>,
    #[serde(default)]
    pub status: AccountStatus,
    #[serde(default, with = "crate::util::timestamp_opt")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Revenue row
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AdminRevenueRow {
    pub tenant_id: String,
    #[serde(alias = "tenant_name")]
    pub name: String,
    #[serde(default)]
    pub orders: u64,
    #[serde(default)]
    pub revenue: Decimal,
    #[serde(default)]
    pub status: AccountStatus,
}

/// Revenue window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RevenuePeriod {
    #[default]
    Today,
    Month,
    All,
}

impl RevenuePeriod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Today => "today",
            Self::Month => "month",
            Self::All => "all",
        }
    }
}

/// Status toggle body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusChange {
    pub status: AccountStatus,
}

/// Restaurant edit body
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RestaurantUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tenant_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_email: Option<String>,
}

/// User edit body
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}
