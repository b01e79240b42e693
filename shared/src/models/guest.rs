//! Guest-facing payloads: branch picker, sessions, orders and the bill view

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::bill::{BillStatus, PaymentMethod};
use super::order::OrderStatus;

/// Public branch card shown to guests
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuestBranch {
    pub branch_id: String,
    pub branch_name: String,
    pub address: String,
    pub province: Option<String>,
    pub phone: Option<String>,
    pub image: Option<String>,
    #[serde(default)]
    pub cashback_percent: Decimal,
    #[serde(default)]
    pub menu_item_count: u32,
    #[serde(default)]
    pub tenant_name: Option<String>,
    pub opening_hours: Option<String>,
    pub closing_hours: Option<String>,
    pub google_maps_link: Option<String>,
}

/// Dining session creation; no `customer_id` means an anonymous guest
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GuestSessionCreate {
    pub table_id: String,
    pub customer_id: Option<String>,
}

/// Dining session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuestSession {
    pub session_id: String,
    pub table_id: String,
    #[serde(default)]
    pub customer_id: Option<String>,
    #[serde(default, with = "crate::util::timestamp_opt")]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub status: String,
}

/// Line of a guest order
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GuestOrderLine {
    pub menu_item_id: String,
    pub quantity: u32,
    pub price: Decimal,
    pub note: Option<String>,
}

/// Guest order creation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GuestOrderCreate {
    pub session_id: String,
    pub items: Vec<GuestOrderLine>,
    pub status: OrderStatus,
}

/// Guest order receipt
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuestOrder {
    pub order_id: String,
    pub session_id: String,
    #[serde(default, with = "crate::util::timestamp_opt")]
    pub order_time: Option<DateTime<Utc>>,
    pub status: OrderStatus,
    #[serde(default)]
    pub total_items: u32,
    #[serde(default)]
    pub total_amount: Decimal,
}

/// Guest order status (`GET /api/guest/orders/:id/status`)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GuestOrderStatus {
    pub order_id: String,
    pub status: OrderStatus,
    #[serde(default, with = "crate::util::timestamp_opt")]
    pub order_time: Option<DateTime<Utc>>,
}

/// Table info as guests see it
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GuestTable {
    pub table_id: String,
    pub table_number: String,
    pub capacity: Option<u32>,
    #[serde(default)]
    pub status: String,
    pub branch_id: String,
}

/// Item line in the bill view; items of every unpaid order at the table
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionItem {
    #[serde(default)]
    pub order_item_id: Option<String>,
    pub menu_item_id: String,
    pub menu_item_name: String,
    pub quantity: u32,
    pub price: Decimal,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub subtotal: Option<Decimal>,
    #[serde(default)]
    pub from_order_id: Option<String>,
}

/// Order contributing to the bill
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionOrderRef {
    pub order_id: String,
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default, with = "crate::util::timestamp_opt")]
    pub order_time: Option<DateTime<Utc>>,
    pub status: OrderStatus,
}

/// Cumulative order block of the bill view
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionOrderSummary {
    pub order_id: Option<String>,
    pub session_id: String,
    #[serde(default, with = "crate::util::timestamp_opt")]
    pub order_time: Option<DateTime<Utc>>,
    pub status: Option<OrderStatus>,
    #[serde(default)]
    pub items: Vec<SessionItem>,
    #[serde(default)]
    pub subtotal: Decimal,
    #[serde(default)]
    pub vat: Decimal,
    #[serde(default)]
    pub total: Decimal,
    #[serde(default)]
    pub all_orders: Vec<SessionOrderRef>,
}

/// Bill block of the bill view, carrying the branch's bank account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionBill {
    pub bill_id: Option<String>,
    pub session_id: String,
    #[serde(default)]
    pub total_amount: Decimal,
    pub payment_method: Option<PaymentMethod>,
    #[serde(default)]
    pub status: BillStatus,
    pub bank_code: Option<String>,
    pub bank_account_number: Option<String>,
    pub bank_account_name: Option<String>,
}

/// Session details (`GET /api/guest/sessions/:id/details`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionDetails {
    pub session_id: String,
    pub table_id: String,
    #[serde(default)]
    pub table_number: Option<String>,
    pub order: SessionOrderSummary,
    pub bill: SessionBill,
}

/// Branch bank account used for transfer payments
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct BankInfo {
    #[serde(default)]
    pub bank_code: Option<String>,
    #[serde(default)]
    pub bank_account_number: Option<String>,
    #[serde(default)]
    pub bank_account_name: Option<String>,
}

/// `GET /api/guest/orders/{id}/details`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuestOrderDetails {
    pub order_id: String,
    pub session_id: String,
    #[serde(default)]
    pub table_number: Option<String>,
    #[serde(default, with = "crate::util::timestamp_opt")]
    pub order_time: Option<DateTime<Utc>>,
    pub status: OrderStatus,
    #[serde(default)]
    pub items: Vec<SessionItem>,
    #[serde(default)]
    pub subtotal: Decimal,
    #[serde(default)]
    pub vat: Decimal,
    #[serde(default)]
    pub total: Decimal,
    #[serde(default)]
    pub bank_info: BankInfo,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_details_without_bill() {
        let json = r#"{
            "session_id": "s1",
            "table_id": "t1",
            "table_number": "7",
            "order": {
                "order_id": "o2",
                "session_id": "s1",
                "order_time": "2025-03-01T12:10:00",
                "status": "cooking",
                "items": [
                    {"order_item_id": "i1", "menu_item_id": "m1", "menu_item_name": "Phở",
                     "quantity": 2, "price": 50000.0, "note": null, "subtotal": 100000.0,
                     "from_order_id": "o1", "from_session_id": "s0"}
                ],
                "subtotal": 100000.0,
                "vat": 10000.0,
                "total": 110000.0,
                "all_orders": [
                    {"order_id": "o1", "session_id": "s0", "order_time": "2025-03-01T12:00:00", "status": "done"},
                    {"order_id": "o2", "session_id": "s1", "order_time": "2025-03-01T12:10:00", "status": "cooking"}
                ],
                "unpaid_sessions_count": 2
            },
            "bill": {
                "bill_id": null, "session_id": "s1", "total_amount": 110000.0,
                "payment_method": null, "status": "pending",
                "bank_code": null, "bank_account_number": null, "bank_account_name": null
            }
        }"#;
        let details: SessionDetails = serde_json::from_str(json).unwrap();
        assert_eq!(details.order.all_orders.len(), 2);
        assert_eq!(details.order.total, Decimal::from(110_000));
        assert_eq!(details.bill.status, BillStatus::Pending);
        assert!(details.bill.bill_id.is_none());
    }

    #[test]
    fn test_guest_order_create_encode() {
        let create = GuestOrderCreate {
            session_id: "s1".into(),
            items: vec![GuestOrderLine {
                menu_item_id: "m1".into(),
                quantity: 2,
                price: Decimal::from(50_000),
                note: None,
            }],
            status: OrderStatus::Ordered,
        };
        let json = serde_json::to_value(&create).unwrap();
        assert_eq!(json["status"], "ordered");
        assert_eq!(json["items"][0]["quantity"], 2);
        assert!(json["items"][0]["note"].is_null());
    }
}
