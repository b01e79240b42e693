// gourmet-client/src/client/orders.rs
// 订单 API - 厨房 / 服务员看板

use super::GourmetClient;
use crate::http::{ApiRequest, HttpClient};
use crate::{ClientError, ClientResult};
use shared::Ack;
use shared::models::{Order, OrderCreate, OrderStatus};

impl<H: HttpClient> GourmetClient<H> {
    /// Orders, optionally narrowed to a branch and a status
    pub async fn list_orders(
        &self,
        branch_id: Option<&str>,
        status: Option<OrderStatus>,
    ) -> ClientResult<Vec<Order>> {
        let request = ApiRequest::get("api/orders")
            .query_opt("branch_id", branch_id)
            .query_opt("status_filter", status.map(|s| s.as_str()));
        self.call(request).await
    }

    pub async fn get_order(&self, order_id: &str) -> ClientResult<Order> {
        self.call(ApiRequest::get(format!("api/orders/{order_id}")))
            .await
    }

    /// Place an order directly against a table (no guest session)
    pub async fn create_order(&self, order: &OrderCreate) -> ClientResult<Order> {
        if order.items.is_empty() {
            return Err(ClientError::rejected(shared::ErrorCode::OrderEmpty));
        }
        self.call(ApiRequest::post("api/orders").json(order)?).await
    }

    /// Move an order to `status`
    pub async fn update_order_status(&self, order_id: &str, status: OrderStatus) -> ClientResult<Ack> {
        let ack: Ack = self
            .call(
                ApiRequest::put(format!("api/orders/{order_id}/status"))
                    .query("new_status", status.as_str()),
            )
            .await?;
        tracing::info!(order_id, status = %status, "Order status updated");
        Ok(ack)
    }

    /// Demo helper: the backend invents an order for a random table
    pub async fn generate_random_order(&self, branch_id: &str) -> ClientResult<Order> {
        self.call(ApiRequest::post("api/orders/generate-random").query("branch_id", branch_id))
            .await
    }
}
