// gourmet-client/src/client/guest.rs
// 顾客端 API - 无需登录

use super::GourmetClient;
use crate::ClientResult;
use crate::http::{ApiRequest, HttpClient};
use shared::Ack;
use shared::models::{
    BillStatusUpdate, GuestBranch, GuestOrder, GuestOrderCreate, GuestOrderDetails,
    GuestOrderStatus, GuestSession, GuestSessionCreate, GuestTable, MenuItem, SessionDetails,
};

impl<H: HttpClient> GourmetClient<H> {
    /// Active branches a guest can pick from
    pub async fn guest_branches(&self) -> ClientResult<Vec<GuestBranch>> {
        self.read(ApiRequest::get("api/guest/branches")).await
    }

    pub async fn guest_menu_items(&self, branch_id: &str) -> ClientResult<Vec<MenuItem>> {
        self.read(ApiRequest::get("api/guest/menu-items").query("branch_id", branch_id))
            .await
    }

    pub async fn guest_table(&self, table_id: &str) -> ClientResult<GuestTable> {
        self.call(ApiRequest::get(format!("api/guest/tables/{table_id}")))
            .await
    }

    pub async fn create_guest_session(
        &self,
        request: &GuestSessionCreate,
    ) -> ClientResult<GuestSession> {
        self.call(ApiRequest::post("api/guest/sessions").json(request)?)
            .await
    }

    pub async fn create_guest_order(&self, request: &GuestOrderCreate) -> ClientResult<GuestOrder> {
        self.call(ApiRequest::post("api/guest/orders").json(request)?)
            .await
    }

    pub async fn guest_order_status(&self, order_id: &str) -> ClientResult<GuestOrderStatus> {
        self.call(ApiRequest::get(format!("api/guest/orders/{order_id}/status")))
            .await
    }

    /// Everything ordered at the table in this visit plus the bill, retried on
    /// transient failures
    pub async fn session_details(&self, session_id: &str) -> ClientResult<SessionDetails> {
        self.read(ApiRequest::get(format!("api/guest/sessions/{session_id}/details")))
            .await
    }

    pub async fn guest_order_details(&self, order_id: &str) -> ClientResult<GuestOrderDetails> {
        self.read(ApiRequest::get(format!("api/guest/orders/{order_id}/details")))
            .await
    }

    /// Mark the table's open bills with a payment status
    pub async fn update_bill_status(
        &self,
        session_id: &str,
        update: &BillStatusUpdate,
    ) -> ClientResult<Ack> {
        let ack: Ack = self
            .call(ApiRequest::put(format!("api/guest/sessions/{session_id}/bill/status")).json(update)?)
            .await?;
        tracing::info!(session_id, status = %update.status, method = %update.payment_method, "Bill status updated");
        Ok(ack)
    }
}
