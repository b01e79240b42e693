//! Guest checkout: table context, order submission and status tracking

use crate::cart::CartStore;
use crate::client::GourmetClient;
use crate::http::HttpClient;
use crate::poller::{PollHandle, Poller};
use crate::storage::{KeyValueStore, keys};
use crate::{ClientError, ClientResult};
use rust_decimal::Decimal;
use shared::ErrorCode;
use shared::models::{
    GuestOrderCreate, GuestOrderLine, GuestOrderStatus, GuestSessionCreate, OrderStatus, QrCode,
};
use std::sync::Arc;

/// Shown when the table number is not known yet
pub const UNKNOWN_TABLE: &str = "N/A";

/// Table identifiers carried by a QR scan or a deep link
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableParams {
    pub branch_id: Option<String>,
    pub table_id: Option<String>,
    pub table_number: Option<String>,
}

impl TableParams {
    /// Read `branch|table` QR content
    pub fn from_qr(qr: &QrCode) -> Option<Self> {
        let (branch_id, table_id) = qr.targets()?;
        Some(Self {
            branch_id: Some(branch_id.to_string()),
            table_id: Some(table_id.to_string()),
            table_number: None,
        })
    }
}

/// Where the guest is sitting
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableContext {
    pub table_id: Option<String>,
    pub branch_id: Option<String>,
    pub table_number: String,
}

fn non_empty(value: Option<&String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty()).cloned()
}

impl TableContext {
    /// Explicit parameters win and are persisted; gaps are filled from the store
    pub fn resolve(store: &dyn KeyValueStore, params: &TableParams) -> ClientResult<Self> {
        let pairs = [
            (keys::CURRENT_TABLE_ID, params.table_id.as_ref()),
            (keys::CURRENT_BRANCH_ID, params.branch_id.as_ref()),
            (keys::CURRENT_TABLE_NUMBER, params.table_number.as_ref()),
        ];
        for (key, value) in pairs {
            if let Some(value) = non_empty(value) {
                store.set(key, value)?;
            }
        }
        Ok(Self::stored(store))
    }

    /// Context from the store alone
    pub fn stored(store: &dyn KeyValueStore) -> Self {
        let read = |key: &str| store.get(key).filter(|v| !v.trim().is_empty());
        Self {
            table_id: read(keys::CURRENT_TABLE_ID),
            branch_id: read(keys::CURRENT_BRANCH_ID),
            table_number: read(keys::CURRENT_TABLE_NUMBER).unwrap_or_else(|| UNKNOWN_TABLE.to_string()),
        }
    }
}

/// Outcome of a successful checkout
#[derive(Debug, Clone, PartialEq)]
pub struct OrderReceipt {
    pub session_id: String,
    pub order_id: String,
    pub table_number: String,
    pub status: OrderStatus,
    pub total_items: u32,
    pub total_amount: Decimal,
}

impl<H: HttpClient> GourmetClient<H> {
    /// Send the cart to the kitchen.
    ///
    /// Creates a guest session for the stored table, then an order with the
    /// cart's unit prices and notes. The cart is cleared only after both calls
    /// succeed. A failed order call leaves the new session in place.
    pub async fn submit_order(&self, cart: &mut CartStore) -> ClientResult<OrderReceipt> {
        if cart.is_empty() {
            return Err(ClientError::rejected(ErrorCode::OrderEmpty));
        }
        let store = self.store().as_ref();
        let table = TableContext::stored(store);
        let Some(table_id) = table.table_id.clone() else {
            return Err(ClientError::rejected(ErrorCode::TableNotSelected));
        };

        let session = self
            .create_guest_session(&GuestSessionCreate {
                table_id,
                customer_id: self.session().customer_id(),
            })
            .await?;
        tracing::info!(session_id = %session.session_id, table = %table.table_number, "Guest session opened");

        let request = GuestOrderCreate {
            session_id: session.session_id.clone(),
            items: cart
                .items()
                .iter()
                .map(|item| GuestOrderLine {
                    menu_item_id: item.id.clone(),
                    quantity: item.quantity,
                    price: item.price,
                    note: Some(item.note.clone()),
                })
                .collect(),
            status: OrderStatus::Ordered,
        };
        let order = self.create_guest_order(&request).await?;
        tracing::info!(order_id = %order.order_id, items = order.total_items, "Order placed");

        store.set(keys::CURRENT_SESSION_ID, session.session_id.clone())?;
        store.set(keys::LAST_ORDER_ID, order.order_id.clone())?;
        store.set(keys::ORDER_STATUS, OrderStatus::Ordered.as_str().to_string())?;

        let mut table_number = table.table_number;
        match self.session_details(&session.session_id).await {
            Ok(details) => {
                if let Some(number) = details.table_number.filter(|n| !n.is_empty()) {
                    store.set(keys::CURRENT_TABLE_NUMBER, number.clone())?;
                    table_number = number;
                }
            }
            Err(e) => {
                tracing::warn!(session_id = %session.session_id, error = %e, "Could not fetch table number after ordering");
            }
        }

        cart.clear()?;

        Ok(OrderReceipt {
            session_id: session.session_id,
            order_id: order.order_id,
            table_number,
            status: order.status,
            total_items: order.total_items,
            total_amount: order.total_amount,
        })
    }

    /// One-shot status check; the stored `order_status` follows the answer
    pub async fn order_status(&self, order_id: &str) -> ClientResult<GuestOrderStatus> {
        let status = self.guest_order_status(order_id).await?;
        self.store()
            .set(keys::ORDER_STATUS, status.status.as_str().to_string())?;
        Ok(status)
    }
}

impl<H: HttpClient + 'static> GourmetClient<H> {
    /// Poll an order's status until it is done.
    ///
    /// The stored `order_status` is written only for answers the poller
    /// publishes, so a slow reply to an older poll cannot roll it back.
    pub fn track_order(self: &Arc<Self>, order_id: &str) -> PollHandle<GuestOrderStatus> {
        let client = Arc::clone(self);
        let store = self.store().clone();
        let order_id = order_id.to_string();
        Poller::spawn_until(
            "order-status",
            self.config().order_poll_interval,
            move || {
                let client = Arc::clone(&client);
                let order_id = order_id.clone();
                async move { client.guest_order_status(&order_id).await }
            },
            move |status| {
                if let Err(e) = store.set(keys::ORDER_STATUS, status.status.as_str().to_string()) {
                    tracing::warn!(order_id = %status.order_id, error = %e, "Failed to persist order status");
                }
                status.status.is_terminal()
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn test_explicit_params_win_and_persist() {
        let store = MemoryStore::new();
        store.set(keys::CURRENT_TABLE_ID, "old-table".into()).unwrap();
        store.set(keys::CURRENT_BRANCH_ID, "b1".into()).unwrap();

        let params = TableParams {
            table_id: Some("t7".into()),
            ..Default::default()
        };
        let ctx = TableContext::resolve(&store, &params).unwrap();
        assert_eq!(ctx.table_id.as_deref(), Some("t7"));
        assert_eq!(ctx.branch_id.as_deref(), Some("b1"));
        assert_eq!(ctx.table_number, UNKNOWN_TABLE);
        assert_eq!(store.get(keys::CURRENT_TABLE_ID).as_deref(), Some("t7"));
    }

    #[test]
    fn test_blank_params_ignored() {
        let store = MemoryStore::new();
        store.set(keys::CURRENT_TABLE_NUMBER, "12".into()).unwrap();
        let params = TableParams {
            table_number: Some("  ".into()),
            ..Default::default()
        };
        let ctx = TableContext::resolve(&store, &params).unwrap();
        assert_eq!(ctx.table_number, "12");
        assert!(ctx.table_id.is_none());
    }

    #[test]
    fn test_params_from_qr() {
        let qr = QrCode {
            qr_id: "q1".into(),
            qr_content: "b9|t3".into(),
            is_active: true,
        };
        let params = TableParams::from_qr(&qr).unwrap();
        assert_eq!(params.branch_id.as_deref(), Some("b9"));
        assert_eq!(params.table_id.as_deref(), Some("t3"));
    }
}
