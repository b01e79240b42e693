// gourmet-client/src/admin.rs
// 平台管理后台: 用户 / 餐厅 / 营收

//! Admin back-office controllers
//!
//! Listings are paged on the server. A controller remembers its page, search
//! and filters, and every write issues exactly one call followed by a
//! re-fetch of the current page.

use crate::client::{GourmetClient, PageQuery};
use crate::http::HttpClient;
use crate::listing::Paginator;
use crate::poller::{PollHandle, Poller};
use crate::validation::Validate;
use crate::{ClientError, ClientResult};
use shared::ErrorCode;
use shared::PaginatedResponse;
use shared::models::{
    AccountStatus, AdminDashboard, AdminRestaurant, AdminRevenueRow, AdminUser, RestaurantUpdate,
    RevenuePeriod, Role, UserUpdate,
};
use std::sync::Arc;

pub const USERS_PAGE_SIZE: u32 = 10;
pub const RESTAURANTS_PAGE_SIZE: u32 = 5;
pub const REVENUE_PAGE_SIZE: u32 = 10;

/// One server-paged listing: the rows of the current page plus its cursor
#[derive(Debug, Clone)]
pub struct ServerPage<T> {
    rows: Vec<T>,
    paginator: Paginator,
    search: Option<String>,
}

impl<T> ServerPage<T> {
    fn new(page_size: u32) -> Self {
        Self {
            rows: Vec::new(),
            paginator: Paginator::new(page_size),
            search: None,
        }
    }

    fn query(&self) -> PageQuery {
        let query = PageQuery::new(self.paginator.page(), self.paginator.page_size());
        match &self.search {
            Some(search) => query.with_search(search.as_str()),
            None => query,
        }
    }

    fn apply(&mut self, response: PaginatedResponse<T>) {
        let page_size = self.paginator.page_size();
        self.paginator = Paginator::from_response(&response);
        if response.limit == 0 {
            self.paginator = Paginator::new(page_size);
        }
        self.rows = response.data;
    }

    fn set_search(&mut self, search: &str) {
        let trimmed = search.trim();
        self.search = (!trimmed.is_empty()).then(|| trimmed.to_string());
        self.paginator.reset();
    }

    pub fn rows(&self) -> &[T] {
        &self.rows
    }

    pub fn paginator(&self) -> &Paginator {
        &self.paginator
    }

    pub fn search(&self) -> Option<&str> {
        self.search.as_deref()
    }
}

/// Page moves shared by every admin listing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageMove {
    Next,
    Prev,
    To(u32),
}

impl PageMove {
    /// Apply to the cursor; `false` when nothing changed
    fn apply(self, paginator: &mut Paginator) -> bool {
        match self {
            Self::Next => paginator.next(),
            Self::Prev => paginator.prev(),
            Self::To(page) => paginator.go_to(page),
        }
    }
}

// ========== Users ==========

pub struct UserAdmin<H: HttpClient> {
    client: Arc<GourmetClient<H>>,
    page: ServerPage<AdminUser>,
    role: Option<Role>,
    active_users: Option<u64>,
}

impl<H: HttpClient> UserAdmin<H> {
    pub fn new(client: Arc<GourmetClient<H>>) -> Self {
        Self {
            client,
            page: ServerPage::new(USERS_PAGE_SIZE),
            role: None,
            active_users: None,
        }
    }

    pub fn page(&self) -> &ServerPage<AdminUser> {
        &self.page
    }

    pub fn role_filter(&self) -> Option<Role> {
        self.role
    }

    /// Active-user count from the last fetch
    pub fn active_users(&self) -> Option<u64> {
        self.active_users
    }

    pub async fn refresh(&mut self) -> ClientResult<()> {
        let response = self
            .client
            .admin_users(&self.page.query(), self.role)
            .await?;
        self.active_users = response.active_users;
        self.page.apply(response);
        Ok(())
    }

    pub async fn search(&mut self, search: &str) -> ClientResult<()> {
        self.page.set_search(search);
        self.refresh().await
    }

    pub async fn filter_role(&mut self, role: Option<Role>) -> ClientResult<()> {
        self.role = role;
        self.page.paginator.reset();
        self.refresh().await
    }

    /// Out-of-range moves are ignored without a fetch
    pub async fn go(&mut self, to: PageMove) -> ClientResult<bool> {
        if !to.apply(&mut self.page.paginator) {
            return Ok(false);
        }
        self.refresh().await?;
        Ok(true)
    }

    fn find(&self, user_id: &str) -> ClientResult<&AdminUser> {
        self.page
            .rows
            .iter()
            .find(|u| u.user_id == user_id)
            .ok_or_else(|| ClientError::rejected(ErrorCode::UserNotFound))
    }

    /// Flip `active` <-> `locked`; returns the new status
    pub async fn toggle_status(&mut self, user_id: &str) -> ClientResult<AccountStatus> {
        let next = self.find(user_id)?.status.toggled();
        self.client.set_user_status(user_id, next).await?;
        self.refresh().await?;
        Ok(next)
    }

    pub async fn edit(&mut self, user_id: &str, update: &UserUpdate) -> ClientResult<()> {
        update.validate()?;
        self.client.update_user(user_id, update).await?;
        tracing::info!(user_id, "User updated");
        self.refresh().await
    }

    pub async fn delete(&mut self, user_id: &str) -> ClientResult<()> {
        self.client.delete_user(user_id).await?;
        self.refresh().await
    }
}

// ========== Restaurants ==========

pub struct RestaurantAdmin<H: HttpClient> {
    client: Arc<GourmetClient<H>>,
    page: ServerPage<AdminRestaurant>,
}

impl<H: HttpClient> RestaurantAdmin<H> {
    pub fn new(client: Arc<GourmetClient<H>>) -> Self {
        Self {
            client,
            page: ServerPage::new(RESTAURANTS_PAGE_SIZE),
        }
    }

    pub fn page(&self) -> &ServerPage<AdminRestaurant> {
        &self.page
    }

    pub async fn refresh(&mut self) -> ClientResult<()> {
        let response = self.client.admin_restaurants(&self.page.query()).await?;
        self.page.apply(response);
        Ok(())
    }

    pub async fn search(&mut self, search: &str) -> ClientResult<()> {
        self.page.set_search(search);
        self.refresh().await
    }

    pub async fn go(&mut self, to: PageMove) -> ClientResult<bool> {
        if !to.apply(&mut self.page.paginator) {
            return Ok(false);
        }
        self.refresh().await?;
        Ok(true)
    }

    fn find(&self, tenant_id: &str) -> ClientResult<&AdminRestaurant> {
        self.page
            .rows
            .iter()
            .find(|r| r.tenant_id == tenant_id)
            .ok_or_else(|| ClientError::rejected(ErrorCode::TenantNotFound))
    }

    pub async fn toggle_status(&mut self, tenant_id: &str) -> ClientResult<AccountStatus> {
        let next = self.find(tenant_id)?.status.toggled();
        self.client.set_restaurant_status(tenant_id, next).await?;
        self.refresh().await?;
        Ok(next)
    }

    pub async fn edit(&mut self, tenant_id: &str, update: &RestaurantUpdate) -> ClientResult<()> {
        update.validate()?;
        self.client.update_restaurant(tenant_id, update).await?;
        tracing::info!(tenant_id, "Restaurant updated");
        self.refresh().await
    }

    pub async fn delete(&mut self, tenant_id: &str) -> ClientResult<()> {
        self.client.delete_restaurant(tenant_id).await?;
        self.refresh().await
    }
}

// ========== Revenue ==========

pub struct RevenueAdmin<H: HttpClient> {
    client: Arc<GourmetClient<H>>,
    page: ServerPage<AdminRevenueRow>,
    period: RevenuePeriod,
    total_orders: Option<u64>,
}

impl<H: HttpClient> RevenueAdmin<H> {
    pub fn new(client: Arc<GourmetClient<H>>) -> Self {
        Self {
            client,
            page: ServerPage::new(REVENUE_PAGE_SIZE),
            period: RevenuePeriod::default(),
            total_orders: None,
        }
    }

    pub fn page(&self) -> &ServerPage<AdminRevenueRow> {
        &self.page
    }

    pub fn period(&self) -> RevenuePeriod {
        self.period
    }

    pub fn total_orders(&self) -> Option<u64> {
        self.total_orders
    }

    pub async fn refresh(&mut self) -> ClientResult<()> {
        let response = self
            .client
            .admin_revenue(&self.page.query(), self.period)
            .await?;
        self.total_orders = response.total_orders;
        self.page.apply(response);
        Ok(())
    }

    pub async fn set_period(&mut self, period: RevenuePeriod) -> ClientResult<()> {
        self.period = period;
        self.page.paginator.reset();
        self.refresh().await
    }

    pub async fn search(&mut self, search: &str) -> ClientResult<()> {
        self.page.set_search(search);
        self.refresh().await
    }

    pub async fn go(&mut self, to: PageMove) -> ClientResult<bool> {
        if !to.apply(&mut self.page.paginator) {
            return Ok(false);
        }
        self.refresh().await?;
        Ok(true)
    }
}

// ========== Dashboard ==========

/// Platform counters with zeros in place of a failed fetch
pub async fn dashboard_or_default<H: HttpClient>(client: &GourmetClient<H>) -> AdminDashboard {
    match client.admin_dashboard().await {
        Ok(stats) => stats,
        Err(e) => {
            tracing::warn!(error = %e, "Admin dashboard unavailable, showing zeros");
            AdminDashboard::default()
        }
    }
}

/// Dashboard counters refreshed at the admin interval
pub fn spawn_dashboard_refresh<H: HttpClient + 'static>(
    client: &Arc<GourmetClient<H>>,
) -> PollHandle<AdminDashboard> {
    let client = Arc::clone(client);
    Poller::spawn(
        "admin-dashboard",
        client.config().admin_refresh_interval,
        move || {
            let client = Arc::clone(&client);
            async move { client.admin_dashboard().await }
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(total: u64, page: u32, limit: u32) -> PaginatedResponse<u32> {
        PaginatedResponse {
            data: (0..limit.min(total as u32)).collect(),
            total,
            page,
            limit,
            total_pages: total.div_ceil(u64::from(limit.max(1))) as u32,
            active_users: None,
            total_orders: None,
            period: None,
        }
    }

    #[test]
    fn test_server_page_tracks_cursor() {
        let mut page = ServerPage::new(RESTAURANTS_PAGE_SIZE);
        page.apply(response(12, 2, 5));
        assert_eq!(page.paginator().page(), 2);
        assert_eq!(page.paginator().total_pages(), 3);
        assert_eq!(page.rows().len(), 5);

        let mut cursor = *page.paginator();
        assert!(!PageMove::To(4).apply(&mut cursor));
        assert!(PageMove::Next.apply(&mut cursor));
        assert!(!PageMove::Next.apply(&mut cursor));
    }

    #[test]
    fn test_search_resets_to_first_page() {
        let mut page: ServerPage<u32> = ServerPage::new(USERS_PAGE_SIZE);
        page.apply(response(40, 3, 10));
        page.set_search("  an ");
        let query = page.query();
        assert_eq!(query.page, 1);
        assert_eq!(query.search.as_deref(), Some("an"));

        page.set_search("   ");
        assert_eq!(page.search(), None);
    }

    #[test]
    fn test_zero_limit_keeps_page_size() {
        let mut page: ServerPage<u32> = ServerPage::new(USERS_PAGE_SIZE);
        page.apply(response(0, 1, 0));
        assert_eq!(page.paginator().page_size(), USERS_PAGE_SIZE);
    }
}
