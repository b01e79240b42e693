use crate::client::GourmetClient;
use crate::http::HttpClient;
use crate::poller::{PollHandle, Poller};
use crate::{ClientError, ClientResult};
use shared::ErrorCode;
use shared::models::{Order, OrderStatus};
use std::sync::Arc;

/// Kitchen orders split into the three columns
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KitchenColumns {
    /// `pending` and `ordered`
    pub waiting: Vec<Order>,
    pub cooking: Vec<Order>,
    pub ready: Vec<Order>,
}

impl KitchenColumns {
    /// Sort orders into columns; statuses the kitchen does not handle are dropped
    pub fn from_orders<'a>(orders: impl IntoIterator<Item = &'a Order>) -> Self {
        let mut columns = Self::default();
        for order in orders {
            match order.status {
                OrderStatus::Pending | OrderStatus::Ordered => columns.waiting.push(order.clone()),
                OrderStatus::Cooking => columns.cooking.push(order.clone()),
                OrderStatus::Ready => columns.ready.push(order.clone()),
                OrderStatus::Serving | OrderStatus::Done => {}
            }
        }
        columns
    }

    /// `(waiting, cooking, ready)`
    pub fn counts(&self) -> (usize, usize, usize) {
        (self.waiting.len(), self.cooking.len(), self.ready.len())
    }
}

/// Kitchen view of one branch
pub struct KitchenBoard<H: HttpClient> {
    client: Arc<GourmetClient<H>>,
    branch_id: String,
    orders: Vec<Order>,
}

impl<H: HttpClient + 'static> KitchenBoard<H> {
    pub fn new(client: Arc<GourmetClient<H>>, branch_id: impl Into<String>) -> Self {
        Self {
            client,
            branch_id: branch_id.into(),
            orders: Vec::new(),
        }
    }

    pub fn branch_id(&self) -> &str {
        &self.branch_id
    }

    /// Keep only what the kitchen works on
    pub fn apply(&mut self, orders: Vec<Order>) {
        self.orders = orders
            .into_iter()
            .filter(|o| o.status.on_kitchen_board())
            .collect();
    }

    pub async fn refresh(&mut self) -> ClientResult<()> {
        let orders = self
            .client
            .list_orders(Some(&self.branch_id), None)
            .await?;
        self.apply(orders);
        let (waiting, cooking, ready) = self.columns().counts();
        tracing::debug!(branch_id = %self.branch_id, waiting, cooking, ready, "Kitchen board refreshed");
        Ok(())
    }

    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    pub fn columns(&self) -> KitchenColumns {
        KitchenColumns::from_orders(&self.orders)
    }

    /// `ordered -> cooking`
    pub async fn start_cooking(&mut self, order_id: &str) -> ClientResult<()> {
        self.transition(order_id, OrderStatus::Cooking).await
    }

    /// `cooking -> ready`
    pub async fn finish_cooking(&mut self, order_id: &str) -> ClientResult<()> {
        self.transition(order_id, OrderStatus::Ready).await
    }

    async fn transition(&mut self, order_id: &str, target: OrderStatus) -> ClientResult<()> {
        let current = self
            .orders
            .iter()
            .find(|o| o.order_id == order_id)
            .map(|o| o.status)
            .ok_or_else(|| ClientError::rejected(ErrorCode::OrderNotFound))?;
        if current.kitchen_next() != Some(target) {
            return Err(ClientError::Validation(shared::AppError::with_message(
                ErrorCode::InvalidStatusTransition,
                format!("Cannot move order from {current} to {target}"),
            )));
        }
        self.client.update_order_status(order_id, target).await?;
        self.refresh().await
    }

    /// Background refresh of the raw order list at the board interval
    pub fn spawn_refresh(&self) -> PollHandle<Vec<Order>> {
        let client = Arc::clone(&self.client);
        let branch_id = self.branch_id.clone();
        Poller::spawn(
            "kitchen-board",
            client.config().board_refresh_interval,
            move || {
                let client = Arc::clone(&client);
                let branch_id = branch_id.clone();
                async move { client.list_orders(Some(&branch_id), None).await }
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn order(id: &str, status: OrderStatus) -> Order {
        Order {
            order_id: id.into(),
            session_id: format!("s-{id}"),
            table_id: "t1".into(),
            table_number: "1".into(),
            branch_id: "b1".into(),
            branch_name: "Quận 1".into(),
            status,
            order_time: Utc::now(),
            items: Vec::new(),
            wait_minutes: 0,
        }
    }

    #[test]
    fn test_columns() {
        let orders = vec![
            order("1", OrderStatus::Pending),
            order("2", OrderStatus::Ordered),
            order("3", OrderStatus::Cooking),
            order("4", OrderStatus::Ready),
            order("5", OrderStatus::Serving),
            order("6", OrderStatus::Done),
        ];
        let columns = KitchenColumns::from_orders(&orders);
        assert_eq!(columns.counts(), (2, 1, 1));
        assert_eq!(columns.ready[0].order_id, "4");
    }
}
