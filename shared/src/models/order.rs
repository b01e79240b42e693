//! Order model and the linear order status flow
//!
//! ```text
//! pending/ordered -> cooking -> ready -> serving -> done
//!      kitchen board ^^^^^^^^^^^^^^^^
//!                          staff board ^^^^^^^^^^^^^^^^^
//! ```

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Order status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    #[default]
    Ordered,
    Cooking,
    Ready,
    Serving,
    Done,
}

impl OrderStatus {
    /// Statuses accepted by `PUT /api/orders/:id/status`
    pub const ASSIGNABLE: [OrderStatus; 5] = [
        Self::Ordered,
        Self::Cooking,
        Self::Ready,
        Self::Serving,
        Self::Done,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Ordered => "ordered",
            Self::Cooking => "cooking",
            Self::Ready => "ready",
            Self::Serving => "serving",
            Self::Done => "done",
        }
    }

    /// Position in the flow; `pending` and `ordered` share the first slot
    pub fn rank(&self) -> u8 {
        match self {
            Self::Pending | Self::Ordered => 0,
            Self::Cooking => 1,
            Self::Ready => 2,
            Self::Serving => 3,
            Self::Done => 4,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done)
    }

    /// Next status a kitchen action moves the order to
    pub fn kitchen_next(&self) -> Option<Self> {
        match self {
            Self::Pending | Self::Ordered => Some(Self::Cooking),
            Self::Cooking => Some(Self::Ready),
            _ => None,
        }
    }

    /// Next status a staff action moves the order to
    pub fn staff_next(&self) -> Option<Self> {
        match self {
            Self::Ready => Some(Self::Serving),
            Self::Serving => Some(Self::Done),
            _ => None,
        }
    }

    /// Whether the status is shown on the kitchen board
    pub fn on_kitchen_board(&self) -> bool {
        matches!(
            self,
            Self::Pending | Self::Ordered | Self::Cooking | Self::Ready
        )
    }

    /// Whether the status is shown on the staff board
    pub fn on_staff_board(&self) -> bool {
        matches!(self, Self::Ready | Self::Serving | Self::Done)
    }

    /// The one further back in the flow; ties keep `self`
    pub fn least_advanced(self, other: Self) -> Self {
        if other.rank() < self.rank() { other } else { self }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for an unrecognised status string
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown order status: {0}")]
pub struct UnknownStatus(pub String);

impl FromStr for OrderStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "ordered" => Ok(Self::Ordered),
            "cooking" => Ok(Self::Cooking),
            "ready" => Ok(Self::Ready),
            "serving" => Ok(Self::Serving),
            "done" => Ok(Self::Done),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

/// Order line as the backend returns it
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderItem {
    pub order_item_id: String,
    pub menu_item_id: String,
    pub menu_item_name: String,
    #[serde(default)]
    pub menu_item_image: Option<String>,
    pub quantity: u32,
    pub price: Decimal,
    #[serde(default)]
    pub note: Option<String>,
}

impl OrderItem {
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

/// Order entity (`GET /api/orders`)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Order {
    pub order_id: String,
    pub session_id: String,
    pub table_id: String,
    pub table_number: String,
    pub branch_id: String,
    pub branch_name: String,
    pub status: OrderStatus,
    #[serde(with = "crate::util::timestamp")]
    pub order_time: DateTime<Utc>,
    #[serde(default)]
    pub items: Vec<OrderItem>,
    #[serde(default)]
    pub wait_minutes: i64,
}

/// Staff-side order creation (`POST /api/orders`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderCreate {
    pub table_id: String,
    pub items: Vec<OrderLineCreate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<String>,
}

/// Line of a staff-side order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderLineCreate {
    pub menu_item_id: String,
    pub quantity: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_rank_order() {
        assert_eq!(OrderStatus::Pending.rank(), OrderStatus::Ordered.rank());
        assert!(OrderStatus::Ordered.rank() < OrderStatus::Cooking.rank());
        assert!(OrderStatus::Ready.rank() < OrderStatus::Serving.rank());
        assert!(OrderStatus::Serving.rank() < OrderStatus::Done.rank());
        assert!(OrderStatus::Done.is_terminal());
        assert!(!OrderStatus::Serving.is_terminal());
    }

    #[test]
    fn test_transitions() {
        assert_eq!(OrderStatus::Pending.kitchen_next(), Some(OrderStatus::Cooking));
        assert_eq!(OrderStatus::Cooking.kitchen_next(), Some(OrderStatus::Ready));
        assert_eq!(OrderStatus::Ready.kitchen_next(), None);
        assert_eq!(OrderStatus::Ready.staff_next(), Some(OrderStatus::Serving));
        assert_eq!(OrderStatus::Serving.staff_next(), Some(OrderStatus::Done));
        assert_eq!(OrderStatus::Done.staff_next(), None);
    }

    #[test]
    fn test_least_advanced() {
        let merged = [OrderStatus::Ready, OrderStatus::Serving]
            .into_iter()
            .fold(OrderStatus::Done, OrderStatus::least_advanced);
        assert_eq!(merged, OrderStatus::Ready);
        assert_eq!(
            OrderStatus::Cooking.least_advanced(OrderStatus::Cooking),
            OrderStatus::Cooking
        );
    }

    #[test]
    fn test_from_str() {
        assert_eq!("Cooking".parse::<OrderStatus>(), Ok(OrderStatus::Cooking));
        assert_eq!(
            "eaten".parse::<OrderStatus>(),
            Err(UnknownStatus("eaten".into()))
        );
    }

    #[test]
    fn test_order_decode() {
        let json = r#"{
            "order_id": "o1", "session_id": "s1", "table_id": "t1", "table_number": "5",
            "branch_id": "b1", "branch_name": "Quận 1", "status": "ready",
            "order_time": "2025-03-01T12:00:00",
            "items": [{"order_item_id": "i1", "menu_item_id": "m1", "menu_item_name": "Phở",
                       "menu_item_image": null, "quantity": 2, "price": 50000.0, "note": "ít hành"}],
            "wait_minutes": 12
        }"#;
        let order: Order = serde_json::from_str(json).unwrap();
        assert_eq!(order.status, OrderStatus::Ready);
        assert_eq!(order.items[0].line_total(), Decimal::from(100_000));
        assert_eq!(order.wait_minutes, 12);
    }
}
