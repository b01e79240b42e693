//! Bill and payment models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::order::OrderItem;

/// Bill status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BillStatus {
    #[default]
    Pending,
    /// Guest chose cash; waiting for staff to collect
    CashPending,
    /// Guest reported a bank transfer or staff confirmed cash
    Paid,
    /// Staff checked the transfer against the bank statement
    Verified,
    Completed,
}

impl BillStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::CashPending => "cash_pending",
            Self::Paid => "paid",
            Self::Verified => "verified",
            Self::Completed => "completed",
        }
    }

    /// Whether the guest no longer owes anything
    pub fn is_settled(&self) -> bool {
        matches!(self, Self::Paid | Self::Verified | Self::Completed)
    }
}

impl fmt::Display for BillStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payment method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Cash,
    BankTransfer,
    Momo,
    Card,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cash => "cash",
            Self::BankTransfer => "bank_transfer",
            Self::Momo => "momo",
            Self::Card => "card",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Bill status change (`PUT /api/guest/sessions/:id/bill/status`)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BillStatusUpdate {
    pub status: BillStatus,
    pub payment_method: PaymentMethod,
}

impl BillStatusUpdate {
    /// Guest reports a completed bank transfer
    pub fn bank_transfer_paid() -> Self {
        Self {
            status: BillStatus::Paid,
            payment_method: PaymentMethod::BankTransfer,
        }
    }

    /// Guest asks to pay cash at the counter
    pub fn cash_requested() -> Self {
        Self {
            status: BillStatus::CashPending,
            payment_method: PaymentMethod::Cash,
        }
    }
}

/// Bill awaiting staff action (cash-pending or qr-paid listings)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StaffBill {
    pub bill_id: String,
    pub session_id: String,
    pub order_id: String,
    pub table_number: String,
    pub branch_name: String,
    #[serde(with = "crate::util::timestamp")]
    pub order_time: DateTime<Utc>,
    #[serde(default)]
    pub items: Vec<OrderItem>,
    pub subtotal: Decimal,
    pub vat: Decimal,
    pub total_amount: Decimal,
    pub payment_method: Option<PaymentMethod>,
    pub status: BillStatus,
    #[serde(default)]
    pub bank_code: Option<String>,
    #[serde(default)]
    pub bank_account_number: Option<String>,
    #[serde(default)]
    pub bank_account_name: Option<String>,
}

impl StaffBill {
    /// First eight characters of the order id, upper-cased, as printed on receipts
    pub fn short_order_id(&self) -> String {
        short_id(&self.order_id)
    }
}

/// Receipt-style short id: first eight characters, upper-cased
pub fn short_id(id: &str) -> String {
    id.chars().take(8).collect::<String>().to_uppercase()
}

/// Staff confirmation / verification response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BillActionResult {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    pub bill_id: String,
    pub bill_status: BillStatus,
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub table_number: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bill_status_serde() {
        let json = serde_json::to_string(&BillStatusUpdate::cash_requested()).unwrap();
        assert_eq!(json, r#"{"status":"cash_pending","payment_method":"cash"}"#);
        let json = serde_json::to_string(&BillStatusUpdate::bank_transfer_paid()).unwrap();
        assert_eq!(json, r#"{"status":"paid","payment_method":"bank_transfer"}"#);
    }

    #[test]
    fn test_settled() {
        assert!(!BillStatus::Pending.is_settled());
        assert!(!BillStatus::CashPending.is_settled());
        assert!(BillStatus::Paid.is_settled());
        assert!(BillStatus::Verified.is_settled());
    }

    #[test]
    fn test_short_id() {
        assert_eq!(short_id("a1b2c3d4-e5f6"), "A1B2C3D4");
        assert_eq!(short_id("abc"), "ABC");
    }
}
