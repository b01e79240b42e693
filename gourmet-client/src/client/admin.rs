// gourmet-client/src/client/admin.rs
// 平台管理 API

use super::GourmetClient;
use crate::ClientResult;
use crate::http::{ApiRequest, HttpClient};
use serde_json::Value;
use shared::models::{
    AccountStatus, AdminDashboard, AdminRestaurant, AdminRevenueRow, AdminUser, RestaurantUpdate,
    RevenuePeriod, Role, StatusChange, UserUpdate,
};
use shared::{Ack, PaginatedResponse};

/// Page request for admin listings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageQuery {
    pub page: u32,
    pub limit: u32,
    pub search: Option<String>,
}

impl PageQuery {
    pub fn new(page: u32, limit: u32) -> Self {
        Self {
            page: page.max(1),
            limit: limit.max(1),
            search: None,
        }
    }

    /// Blank searches are dropped
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        let search = search.into();
        let trimmed = search.trim();
        self.search = (!trimmed.is_empty()).then(|| trimmed.to_string());
        self
    }

    fn apply(&self, request: ApiRequest) -> ApiRequest {
        request
            .query("page", self.page)
            .query("limit", self.limit)
            .query_opt("search", self.search.as_deref())
    }
}

impl<H: HttpClient> GourmetClient<H> {
    pub async fn admin_dashboard(&self) -> ClientResult<AdminDashboard> {
        self.call(ApiRequest::get("api/admin/dashboard")).await
    }

    pub async fn admin_restaurants(
        &self,
        query: &PageQuery,
    ) -> ClientResult<PaginatedResponse<AdminRestaurant>> {
        self.call(query.apply(ApiRequest::get("api/admin/restaurants")))
            .await
    }

    pub async fn admin_users(
        &self,
        query: &PageQuery,
        role: Option<Role>,
    ) -> ClientResult<PaginatedResponse<AdminUser>> {
        let request = query
            .apply(ApiRequest::get("api/admin/users"))
            .query_opt("role", role.map(|r| r.as_str()));
        self.call(request).await
    }

    pub async fn admin_revenue(
        &self,
        query: &PageQuery,
        period: RevenuePeriod,
    ) -> ClientResult<PaginatedResponse<AdminRevenueRow>> {
        let request = query
            .apply(ApiRequest::get("api/admin/revenue"))
            .query("period", period.as_str());
        self.call(request).await
    }

    pub async fn set_restaurant_status(
        &self,
        tenant_id: &str,
        status: AccountStatus,
    ) -> ClientResult<Ack> {
        let body = StatusChange { status };
        let ack = self
            .call(ApiRequest::patch(format!("api/admin/restaurants/{tenant_id}/status")).json(&body)?)
            .await?;
        tracing::info!(tenant_id, status = status.as_str(), "Restaurant status changed");
        Ok(ack)
    }

    pub async fn update_restaurant(
        &self,
        tenant_id: &str,
        update: &RestaurantUpdate,
    ) -> ClientResult<Ack> {
        self.call(ApiRequest::patch(format!("api/admin/restaurants/{tenant_id}")).json(update)?)
            .await
    }

    pub async fn delete_restaurant(&self, tenant_id: &str) -> ClientResult<()> {
        self.call::<Value>(ApiRequest::delete(format!("api/admin/restaurants/{tenant_id}")))
            .await?;
        tracing::info!(tenant_id, "Restaurant deleted");
        Ok(())
    }

    pub async fn set_user_status(&self, user_id: &str, status: AccountStatus) -> ClientResult<Ack> {
        let body = StatusChange { status };
        let ack = self
            .call(ApiRequest::patch(format!("api/admin/users/{user_id}/status")).json(&body)?)
            .await?;
        tracing::info!(user_id, status = status.as_str(), "User status changed");
        Ok(ack)
    }

    pub async fn update_user(&self, user_id: &str, update: &UserUpdate) -> ClientResult<Ack> {
        self.call(ApiRequest::patch(format!("api/admin/users/{user_id}")).json(update)?)
            .await
    }

    pub async fn delete_user(&self, user_id: &str) -> ClientResult<()> {
        self.call::<Value>(ApiRequest::delete(format!("api/admin/users/{user_id}")))
            .await?;
        tracing::info!(user_id, "User deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_query_params() {
        let query = PageQuery::new(0, 10).with_search("  phở ");
        let request = query.apply(ApiRequest::get("api/admin/users"));
        assert_eq!(
            request.query,
            vec![
                ("page".to_string(), "1".to_string()),
                ("limit".to_string(), "10".to_string()),
                ("search".to_string(), "phở".to_string()),
            ]
        );

        let blank = PageQuery::new(2, 5).with_search("   ");
        assert!(blank.search.is_none());
    }
}
