// gourmet-client/src/owner.rs
// 店主后台: 分店 / 桌台 / 菜单 / 统计

//! Owner back-office controllers
//!
//! Each controller keeps the rows it last fetched in a [`ListView`]. Forms are
//! validated before submission; every successful write is followed by a
//! re-fetch so the view always reflects the backend.

use crate::client::GourmetClient;
use crate::http::HttpClient;
use crate::listing::ListView;
use crate::poller::{PollHandle, Poller};
use crate::validation::Validate;
use crate::{ClientError, ClientResult};
use shared::ErrorCode;
use shared::models::{
    Branch, BranchCreate, BranchUpdate, CashbackSettings, CashbackUpdate, Category,
    CategoryCreate, DiningTable, MenuItem, MenuItemCreate, MenuItemUpdate, OwnerStats, QrCode,
    TableCreate, TableUpdate,
};
use std::collections::HashMap;
use std::sync::Arc;

pub const OWNER_PAGE_SIZE: u32 = 10;

// ========== Branches ==========

pub struct BranchManager<H: HttpClient> {
    client: Arc<GourmetClient<H>>,
    view: ListView<Branch>,
}

impl<H: HttpClient> BranchManager<H> {
    pub fn new(client: Arc<GourmetClient<H>>) -> Self {
        Self {
            client,
            view: ListView::new(OWNER_PAGE_SIZE),
        }
    }

    pub fn view(&self) -> &ListView<Branch> {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut ListView<Branch> {
        &mut self.view
    }

    pub async fn refresh(&mut self) -> ClientResult<()> {
        let branches = self.client.list_branches().await?;
        tracing::debug!(count = branches.len(), "Branches loaded");
        self.view.set_rows(branches);
        Ok(())
    }

    pub async fn create(&mut self, branch: &BranchCreate) -> ClientResult<Branch> {
        branch.validate()?;
        let created = self.client.create_branch(branch).await?;
        tracing::info!(branch_id = %created.branch_id, "Branch created");
        self.refresh().await?;
        Ok(created)
    }

    pub async fn update(&mut self, branch_id: &str, update: &BranchUpdate) -> ClientResult<Branch> {
        update.validate()?;
        let updated = self.client.update_branch(branch_id, update).await?;
        tracing::info!(branch_id, "Branch updated");
        self.refresh().await?;
        Ok(updated)
    }

    pub async fn delete(&mut self, branch_id: &str) -> ClientResult<()> {
        self.client.delete_branch(branch_id).await?;
        tracing::info!(branch_id, "Branch deleted");
        self.refresh().await
    }
}

// ========== Tables ==========

pub struct TableManager<H: HttpClient> {
    client: Arc<GourmetClient<H>>,
    branch_id: String,
    view: ListView<DiningTable>,
    qr_codes: HashMap<String, QrCode>,
}

impl<H: HttpClient> TableManager<H> {
    pub fn new(client: Arc<GourmetClient<H>>, branch_id: impl Into<String>) -> Self {
        Self {
            client,
            branch_id: branch_id.into(),
            view: ListView::new(OWNER_PAGE_SIZE),
            qr_codes: HashMap::new(),
        }
    }

    pub fn branch_id(&self) -> &str {
        &self.branch_id
    }

    pub fn view(&self) -> &ListView<DiningTable> {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut ListView<DiningTable> {
        &mut self.view
    }

    pub async fn refresh(&mut self) -> ClientResult<()> {
        let tables = self.client.list_tables(&self.branch_id).await?;
        self.qr_codes
            .retain(|table_id, _| tables.iter().any(|t| &t.table_id == table_id));
        self.view.set_rows(tables);
        Ok(())
    }

    pub async fn create(&mut self, table: &TableCreate) -> ClientResult<DiningTable> {
        table.validate()?;
        let created = self.client.create_table(&self.branch_id, table).await?;
        tracing::info!(table_id = %created.table_id, branch_id = %self.branch_id, "Table created");
        self.refresh().await?;
        Ok(created)
    }

    pub async fn update(&mut self, table_id: &str, update: &TableUpdate) -> ClientResult<DiningTable> {
        update.validate()?;
        let updated = self.client.update_table(table_id, update).await?;
        tracing::info!(table_id, "Table updated");
        self.refresh().await?;
        Ok(updated)
    }

    pub async fn delete(&mut self, table_id: &str) -> ClientResult<()> {
        self.client.delete_table(table_id).await?;
        self.qr_codes.remove(table_id);
        tracing::info!(table_id, "Table deleted");
        self.refresh().await
    }

    /// QR code of a table, fetched once and cached
    pub async fn qr_code(&mut self, table_id: &str) -> ClientResult<&QrCode> {
        if !self.qr_codes.contains_key(table_id) {
            let qr = self.client.table_qr_code(table_id).await?;
            self.qr_codes.insert(table_id.to_string(), qr);
        }
        self.qr_codes
            .get(table_id)
            .ok_or_else(|| ClientError::rejected(ErrorCode::TableNotFound))
    }
}

// ========== Menu ==========

pub struct MenuManager<H: HttpClient> {
    client: Arc<GourmetClient<H>>,
    branch_id: String,
    category_id: Option<String>,
    categories: Vec<Category>,
    view: ListView<MenuItem>,
}

impl<H: HttpClient> MenuManager<H> {
    pub fn new(client: Arc<GourmetClient<H>>, branch_id: impl Into<String>) -> Self {
        Self {
            client,
            branch_id: branch_id.into(),
            category_id: None,
            categories: Vec::new(),
            view: ListView::new(OWNER_PAGE_SIZE),
        }
    }

    pub fn view(&self) -> &ListView<MenuItem> {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut ListView<MenuItem> {
        &mut self.view
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn category_id(&self) -> Option<&str> {
        self.category_id.as_deref()
    }

    pub async fn load_categories(&mut self) -> ClientResult<()> {
        self.categories = self.client.list_categories().await?;
        Ok(())
    }

    /// Narrow the list to one category, or show the whole branch with `None`
    pub async fn select_category(&mut self, category_id: Option<&str>) -> ClientResult<()> {
        self.category_id = category_id
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_string);
        self.refresh().await
    }

    pub async fn refresh(&mut self) -> ClientResult<()> {
        let items = match &self.category_id {
            Some(category_id) => {
                self.client
                    .category_menu_items(category_id, &self.branch_id)
                    .await?
            }
            None => self.client.branch_menu_items(&self.branch_id).await?,
        };
        tracing::debug!(
            branch_id = %self.branch_id,
            category_id = ?self.category_id,
            count = items.len(),
            "Menu items loaded"
        );
        self.view.set_rows(items);
        Ok(())
    }

    pub async fn create_category(&mut self, category: &CategoryCreate) -> ClientResult<Category> {
        category.validate()?;
        let created = self.client.create_category(category).await?;
        tracing::info!(category_id = %created.category_id, "Category created");
        self.load_categories().await?;
        Ok(created)
    }

    pub async fn create(&mut self, item: &MenuItemCreate) -> ClientResult<MenuItem> {
        item.validate()?;
        let created = self.client.create_menu_item(item).await?;
        tracing::info!(menu_item_id = %created.menu_item_id, "Menu item created");
        self.refresh().await?;
        Ok(created)
    }

    pub async fn update(&mut self, menu_item_id: &str, update: &MenuItemUpdate) -> ClientResult<MenuItem> {
        update.validate()?;
        let updated = self.client.update_menu_item(menu_item_id, update).await?;
        tracing::info!(menu_item_id, "Menu item updated");
        self.refresh().await?;
        Ok(updated)
    }

    pub async fn delete(&mut self, menu_item_id: &str) -> ClientResult<()> {
        self.client.delete_menu_item(menu_item_id).await?;
        tracing::info!(menu_item_id, "Menu item deleted");
        self.refresh().await
    }
}

// ========== Dashboard ==========

pub struct OwnerDashboard<H: HttpClient> {
    client: Arc<GourmetClient<H>>,
}

impl<H: HttpClient + 'static> OwnerDashboard<H> {
    pub fn new(client: Arc<GourmetClient<H>>) -> Self {
        Self { client }
    }

    pub async fn stats(&self) -> ClientResult<OwnerStats> {
        self.client.owner_stats().await
    }

    /// Stats with zeros in place of a failed fetch
    pub async fn stats_or_default(&self) -> OwnerStats {
        match self.client.owner_stats().await {
            Ok(stats) => stats,
            Err(e) => {
                tracing::warn!(error = %e, "Owner stats unavailable, showing zeros");
                OwnerStats::default()
            }
        }
    }

    pub async fn cashback(&self) -> ClientResult<CashbackSettings> {
        self.client.cashback_settings().await
    }

    pub async fn update_cashback(&self, update: &CashbackUpdate) -> ClientResult<CashbackSettings> {
        update.validate()?;
        let settings = self.client.update_cashback(update).await?;
        tracing::info!(percent = %settings.cashback_percent, "Cashback updated");
        Ok(settings)
    }

    /// Stats refreshed at the owner interval
    pub fn spawn_refresh(&self) -> PollHandle<OwnerStats> {
        let client = Arc::clone(&self.client);
        Poller::spawn(
            "owner-dashboard",
            client.config().owner_refresh_interval,
            move || {
                let client = Arc::clone(&client);
                async move { client.owner_stats().await }
            },
        )
    }
}
