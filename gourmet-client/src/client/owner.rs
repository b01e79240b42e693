// gourmet-client/src/client/owner.rs
// 分店 / 桌台 / 统计 API

use super::GourmetClient;
use crate::ClientResult;
use crate::http::{ApiRequest, HttpClient};
use serde_json::Value;
use shared::models::{
    Branch, BranchCreate, BranchUpdate, CashbackSettings, CashbackUpdate, DiningTable, OwnerStats,
    QrCode, TableCreate, TableUpdate,
};

impl<H: HttpClient> GourmetClient<H> {
    // ========== Branches ==========

    /// Branches of the logged-in owner's tenant
    pub async fn list_branches(&self) -> ClientResult<Vec<Branch>> {
        let tenant_id = self.require_tenant()?;
        self.call(ApiRequest::get("api/branches").query("tenant_id", tenant_id))
            .await
    }

    pub async fn get_branch(&self, branch_id: &str) -> ClientResult<Branch> {
        self.call(ApiRequest::get(format!("api/branches/{branch_id}")))
            .await
    }

    pub async fn create_branch(&self, branch: &BranchCreate) -> ClientResult<Branch> {
        self.require_tenant()?;
        let created: Branch = self
            .call(ApiRequest::post("api/branches").json(branch)?)
            .await?;
        tracing::info!(branch_id = %created.branch_id, "Branch created");
        Ok(created)
    }

    pub async fn update_branch(&self, branch_id: &str, update: &BranchUpdate) -> ClientResult<Branch> {
        self.call(ApiRequest::put(format!("api/branches/{branch_id}")).json(update)?)
            .await
    }

    pub async fn delete_branch(&self, branch_id: &str) -> ClientResult<()> {
        self.call::<Value>(ApiRequest::delete(format!("api/branches/{branch_id}")))
            .await?;
        tracing::info!(branch_id, "Branch deleted");
        Ok(())
    }

    // ========== Tables ==========

    pub async fn list_tables(&self, branch_id: &str) -> ClientResult<Vec<DiningTable>> {
        self.call(ApiRequest::get(format!("api/branches/{branch_id}/tables")))
            .await
    }

    pub async fn get_table(&self, table_id: &str) -> ClientResult<DiningTable> {
        self.call(ApiRequest::get(format!("api/tables/{table_id}")))
            .await
    }

    pub async fn create_table(
        &self,
        branch_id: &str,
        table: &TableCreate,
    ) -> ClientResult<DiningTable> {
        self.call(ApiRequest::post(format!("api/branches/{branch_id}/tables")).json(table)?)
            .await
    }

    pub async fn update_table(
        &self,
        table_id: &str,
        update: &TableUpdate,
    ) -> ClientResult<DiningTable> {
        self.call(ApiRequest::put(format!("api/tables/{table_id}")).json(update)?)
            .await
    }

    pub async fn delete_table(&self, table_id: &str) -> ClientResult<()> {
        self.call::<Value>(ApiRequest::delete(format!("api/tables/{table_id}")))
            .await?;
        Ok(())
    }

    /// QR code a guest scans to reach the table (`branch|table` content)
    pub async fn table_qr_code(&self, table_id: &str) -> ClientResult<QrCode> {
        self.call(ApiRequest::get(format!("api/tables/{table_id}/qr-code")))
            .await
    }

    // ========== Stats & cashback ==========

    /// Owner dashboard figures for the current tenant
    pub async fn owner_stats(&self) -> ClientResult<OwnerStats> {
        let tenant_id = self.require_tenant()?;
        self.call(ApiRequest::get(format!("api/stats/{tenant_id}")))
            .await
    }

    pub async fn cashback_settings(&self) -> ClientResult<CashbackSettings> {
        let tenant_id = self.require_tenant()?;
        self.call(ApiRequest::get(format!(
            "api/tenants/{tenant_id}/cashback-settings"
        )))
        .await
    }

    pub async fn update_cashback(&self, update: &CashbackUpdate) -> ClientResult<CashbackSettings> {
        let tenant_id = self.require_tenant()?;
        self.call(
            ApiRequest::put(format!("api/tenants/{tenant_id}/cashback-settings")).json(update)?,
        )
        .await
    }
}
