// gourmet-client/src/client/staff.rs
// 收银确认 API

use super::GourmetClient;
use crate::ClientResult;
use crate::http::{ApiRequest, HttpClient};
use shared::models::{BillActionResult, StaffBill};

impl<H: HttpClient> GourmetClient<H> {
    /// Bills waiting for staff to collect cash
    pub async fn cash_pending_bills(&self, branch_id: &str) -> ClientResult<Vec<StaffBill>> {
        self.call(ApiRequest::get("api/staff/cash-pending").query("branch_id", branch_id))
            .await
    }

    /// Cash collected: `cash_pending -> paid`
    pub async fn confirm_cash(&self, bill_id: &str) -> ClientResult<BillActionResult> {
        let result: BillActionResult = self
            .call(ApiRequest::put(format!("api/staff/cash-pending/{bill_id}/confirm")))
            .await?;
        tracing::info!(bill_id, status = %result.bill_status, "Cash payment confirmed");
        Ok(result)
    }

    /// Transfers guests reported as paid, waiting for staff to check the bank
    pub async fn qr_paid_bills(&self, branch_id: &str) -> ClientResult<Vec<StaffBill>> {
        self.call(ApiRequest::get("api/staff/qr-paid").query("branch_id", branch_id))
            .await
    }

    /// Transfer seen on the account: `paid -> verified`
    pub async fn verify_qr(&self, bill_id: &str) -> ClientResult<BillActionResult> {
        let result: BillActionResult = self
            .call(ApiRequest::put(format!("api/staff/qr-paid/{bill_id}/verify")))
            .await?;
        tracing::info!(bill_id, status = %result.bill_status, "QR payment verified");
        Ok(result)
    }
}
