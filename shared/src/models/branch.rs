//! Branch, cashback and owner statistics models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Branch entity (a physical restaurant location under a tenant)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Branch {
    pub branch_id: String,
    pub branch_name: String,
    pub address: String,
    pub province: Option<String>,
    pub phone: Option<String>,
    pub manager_name: Option<String>,
    pub cashback_percent: Option<Decimal>,
    pub image: Option<String>,
    #[serde(default = "default_active")]
    pub status: String,
    #[serde(default, with = "crate::util::timestamp_opt")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, with = "crate::util::timestamp_opt")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub menu_item_count: u32,
    pub bank_code: Option<String>,
    pub bank_account_number: Option<String>,
    pub bank_account_name: Option<String>,
    pub opening_hours: Option<String>,
    pub closing_hours: Option<String>,
    pub google_maps_link: Option<String>,
}

fn default_active() -> String {
    "active".to_string()
}

/// Create branch payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BranchCreate {
    pub branch_name: String,
    pub address: String,
    pub province: String,
    pub phone: String,
    pub manager_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cashback_percent: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bank_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bank_account_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bank_account_name: Option<String>,
    /// `HH:MM`
    pub opening_hours: String,
    /// `HH:MM`
    pub closing_hours: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub google_maps_link: Option<String>,
}

/// Update branch payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BranchUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub province: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manager_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cashback_percent: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bank_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bank_account_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bank_account_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opening_hours: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub closing_hours: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub google_maps_link: Option<String>,
}

/// Tenant-wide cashback percentage
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CashbackSettings {
    pub tenant_id: String,
    pub cashback_percent: Decimal,
}

/// Cashback update payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CashbackUpdate {
    pub cashback_percent: Decimal,
}

/// Owner dashboard figures (`GET /api/stats/:tenant_id`)
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct OwnerStats {
    #[serde(default)]
    pub total_branches: u64,
    #[serde(default)]
    pub total_tables: u64,
    #[serde(default)]
    pub active_branches: u64,
    #[serde(default)]
    pub today_revenue: Decimal,
    #[serde(default)]
    pub today_orders: u64,
    #[serde(default)]
    pub monthly_revenue: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_branch_minimal_decode() {
        let json = r#"{
            "branch_id": "b1",
            "branch_name": "Quận 1",
            "address": "12 Lê Lợi",
            "created_at": "2025-01-02T08:00:00"
        }"#;
        let branch: Branch = serde_json::from_str(json).unwrap();
        assert_eq!(branch.status, "active");
        assert_eq!(branch.menu_item_count, 0);
        assert!(branch.created_at.is_some());
        assert!(branch.bank_code.is_none());
    }

    #[test]
    fn test_branch_update_skips_unset() {
        let update = BranchUpdate {
            phone: Some("0909".into()),
            ..Default::default()
        };
        let json = serde_json::to_value(&update).unwrap();
        assert_eq!(json, serde_json::json!({"phone": "0909"}));
    }
}
