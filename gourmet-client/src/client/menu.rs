// gourmet-client/src/client/menu.rs
// 分类与菜品 API

use super::GourmetClient;
use crate::ClientResult;
use crate::http::{ApiRequest, HttpClient};
use serde_json::Value;
use shared::models::{Category, CategoryCreate, MenuItem, MenuItemCreate, MenuItemUpdate};

impl<H: HttpClient> GourmetClient<H> {
    pub async fn list_categories(&self) -> ClientResult<Vec<Category>> {
        let tenant_id = self.require_tenant()?;
        self.call(ApiRequest::get("api/categories").query("tenant_id", tenant_id))
            .await
    }

    pub async fn create_category(&self, category: &CategoryCreate) -> ClientResult<Category> {
        self.call(ApiRequest::post("api/categories").json(category)?)
            .await
    }

    /// Menu of one branch
    pub async fn branch_menu_items(&self, branch_id: &str) -> ClientResult<Vec<MenuItem>> {
        self.call(ApiRequest::get(format!("api/branches/{branch_id}/menu-items")))
            .await
    }

    /// Items of one category served at a branch
    pub async fn category_menu_items(
        &self,
        category_id: &str,
        branch_id: &str,
    ) -> ClientResult<Vec<MenuItem>> {
        self.call(
            ApiRequest::get(format!("api/categories/{category_id}/menu-items"))
                .query("branch_id", branch_id),
        )
        .await
    }

    pub async fn get_menu_item(&self, menu_item_id: &str) -> ClientResult<MenuItem> {
        self.call(ApiRequest::get(format!("api/menu-items/{menu_item_id}")))
            .await
    }

    pub async fn create_menu_item(&self, item: &MenuItemCreate) -> ClientResult<MenuItem> {
        let created: MenuItem = self
            .call(ApiRequest::post("api/menu-items").json(item)?)
            .await?;
        tracing::info!(menu_item_id = %created.menu_item_id, "Menu item created");
        Ok(created)
    }

    pub async fn update_menu_item(
        &self,
        menu_item_id: &str,
        update: &MenuItemUpdate,
    ) -> ClientResult<MenuItem> {
        self.call(ApiRequest::put(format!("api/menu-items/{menu_item_id}")).json(update)?)
            .await
    }

    pub async fn delete_menu_item(&self, menu_item_id: &str) -> ClientResult<()> {
        self.call::<Value>(ApiRequest::delete(format!("api/menu-items/{menu_item_id}")))
            .await?;
        Ok(())
    }
}
