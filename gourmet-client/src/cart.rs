//! Guest cart
//!
//! Rows live in memory and are written back to the store after every
//! mutation, so a reloaded front end picks up the same cart.

use crate::storage::{KeyValueStoreExt, SharedStore, keys};
use crate::{ClientError, ClientResult};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::models::MenuItem;
use std::collections::BTreeMap;

pub const DEFAULT_CATEGORY: &str = "main";

/// What the menu hands to "add to cart"
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dish {
    pub id: Option<String>,
    pub name: String,
    pub price: Decimal,
    pub image: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
}

impl Dish {
    pub fn new(id: impl Into<String>, name: impl Into<String>, price: Decimal) -> Self {
        Self {
            id: Some(id.into()),
            name: name.into(),
            price,
            ..Default::default()
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }
}

impl From<&MenuItem> for Dish {
    fn from(item: &MenuItem) -> Self {
        Self {
            id: Some(item.menu_item_id.clone()),
            name: item.item_name.clone(),
            price: item.effective_price(),
            image: item.image.clone(),
            category: item.category_name.clone(),
            description: item.description.clone(),
        }
    }
}

/// One cart row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: Decimal,
    #[serde(default)]
    pub image: String,
    pub category: String,
    pub quantity: u32,
    #[serde(default)]
    pub note: String,
    pub added_at: DateTime<Utc>,
}

impl CartItem {
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

/// Cart bound to a store
pub struct CartStore {
    store: SharedStore,
    items: Vec<CartItem>,
}

impl CartStore {
    /// Restore the cart saved in `store`; an unreadable cart starts empty
    pub fn load(store: SharedStore) -> Self {
        let items: Vec<CartItem> = store.get_json(keys::CART_ITEMS).unwrap_or_default();
        tracing::debug!(rows = items.len(), "Cart loaded");
        Self { store, items }
    }

    fn save(&self) -> ClientResult<()> {
        self.store.set_json(keys::CART_ITEMS, &self.items)?;
        tracing::debug!(rows = self.items.len(), quantity = self.total_quantity(), "Cart saved");
        Ok(())
    }

    fn checked(&self, index: usize) -> bool {
        if index < self.items.len() {
            true
        } else {
            tracing::warn!(index, rows = self.items.len(), "Cart index out of range");
            false
        }
    }

    /// Add one unit of `dish`.
    ///
    /// A row with the same id, or the same name in the same category, gets
    /// its quantity bumped instead of a second row being created.
    pub fn add(&mut self, dish: &Dish) -> ClientResult<()> {
        if dish.name.trim().is_empty() {
            return Err(ClientError::invalid("Dish name is required"));
        }
        if dish.price <= Decimal::ZERO {
            return Err(ClientError::invalid("Dish price must be positive"));
        }

        let category = dish.category.as_deref().unwrap_or(DEFAULT_CATEGORY);
        let existing = self.items.iter_mut().find(|item| {
            dish.id.as_deref() == Some(item.id.as_str())
                || (item.name == dish.name && item.category == category)
        });

        match existing {
            Some(item) => {
                item.quantity += 1;
                tracing::debug!(name = %item.name, quantity = item.quantity, "Cart quantity increased");
            }
            None => {
                let id = dish
                    .id
                    .clone()
                    .unwrap_or_else(|| format!("item-{}", uuid::Uuid::new_v4()));
                self.items.push(CartItem {
                    id,
                    name: dish.name.clone(),
                    description: dish.description.clone().unwrap_or_default(),
                    price: dish.price,
                    image: dish.image.clone().unwrap_or_default(),
                    category: category.to_string(),
                    quantity: 1,
                    note: String::new(),
                    added_at: Utc::now(),
                });
                tracing::debug!(name = %dish.name, "Cart row added");
            }
        }
        self.save()
    }

    /// Remove a row; `false` when the index is out of range
    pub fn remove(&mut self, index: usize) -> ClientResult<bool> {
        if !self.checked(index) {
            return Ok(false);
        }
        let removed = self.items.remove(index);
        tracing::debug!(name = %removed.name, "Cart row removed");
        self.save()?;
        Ok(true)
    }

    /// Set a row's quantity; zero or less removes the row
    pub fn update_quantity(&mut self, index: usize, quantity: i64) -> ClientResult<bool> {
        if !self.checked(index) {
            return Ok(false);
        }
        if quantity <= 0 {
            return self.remove(index);
        }
        self.items[index].quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        self.save()?;
        Ok(true)
    }

    pub fn update_note(&mut self, index: usize, note: &str) -> ClientResult<bool> {
        if !self.checked(index) {
            return Ok(false);
        }
        self.items[index].note = note.to_string();
        self.save()?;
        Ok(true)
    }

    pub fn increase(&mut self, index: usize) -> ClientResult<bool> {
        if !self.checked(index) {
            return Ok(false);
        }
        self.items[index].quantity += 1;
        self.save()?;
        Ok(true)
    }

    /// Take one unit off; the last unit removes the row
    pub fn decrease(&mut self, index: usize) -> ClientResult<bool> {
        if !self.checked(index) {
            return Ok(false);
        }
        if self.items[index].quantity > 1 {
            self.items[index].quantity -= 1;
            self.save()?;
            Ok(true)
        } else {
            self.remove(index)
        }
    }

    pub fn clear(&mut self) -> ClientResult<()> {
        self.items.clear();
        self.save()
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Units across all rows
    pub fn total_quantity(&self) -> u32 {
        self.items.iter().map(|item| item.quantity).sum()
    }

    pub fn total_price(&self) -> Decimal {
        self.items.iter().map(CartItem::line_total).sum()
    }

    /// Distinct rows
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    pub fn items_in_category(&self, category: &str) -> Vec<&CartItem> {
        self.items
            .iter()
            .filter(|item| item.category == category)
            .collect()
    }

    /// Rows grouped by category, categories in name order
    pub fn items_by_category(&self) -> BTreeMap<&str, Vec<&CartItem>> {
        let mut groups: BTreeMap<&str, Vec<&CartItem>> = BTreeMap::new();
        for item in &self.items {
            groups.entry(item.category.as_str()).or_default().push(item);
        }
        groups
    }

    pub fn find_by_id(&self, id: &str) -> Option<&CartItem> {
        self.items.iter().find(|item| item.id == id)
    }
}

impl std::fmt::Debug for CartStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartStore")
            .field("items", &self.items)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn dish(id: &str, name: &str, price: i64) -> Dish {
        Dish::new(id, name, Decimal::from(price))
    }

    #[test]
    fn test_totals_example() {
        let mut cart = CartStore::load(MemoryStore::shared());
        cart.add(&dish("1", "Phở bò", 50_000)).unwrap();
        cart.add(&dish("1", "Phở bò", 50_000)).unwrap();
        cart.add(&dish("2", "Trà đá", 30_000)).unwrap();

        assert_eq!(cart.item_count(), 2);
        assert_eq!(cart.total_quantity(), 3);
        assert_eq!(cart.total_price(), Decimal::from(130_000));
    }

    #[test]
    fn test_same_name_and_category_merges() {
        let mut cart = CartStore::load(MemoryStore::shared());
        let mut a = dish("a", "Gỏi cuốn", 40_000).with_category("starter");
        cart.add(&a).unwrap();
        a.id = None;
        cart.add(&a).unwrap();
        assert_eq!(cart.item_count(), 1);
        assert_eq!(cart.items()[0].quantity, 2);

        // same name, other category is a different row
        cart.add(&dish("b", "Gỏi cuốn", 40_000).with_category("main")).unwrap();
        assert_eq!(cart.item_count(), 2);
    }

    #[test]
    fn test_rejects_invalid_dish() {
        let mut cart = CartStore::load(MemoryStore::shared());
        assert!(cart.add(&dish("1", "  ", 10_000)).is_err());
        assert!(cart.add(&dish("1", "Cơm", 0)).is_err());
        assert!(cart.is_empty());
    }

    #[test]
    fn test_generated_id_and_default_category() {
        let mut cart = CartStore::load(MemoryStore::shared());
        cart.add(&Dish {
            name: "Bánh mì".into(),
            price: Decimal::from(25_000),
            ..Default::default()
        })
        .unwrap();
        let row = &cart.items()[0];
        assert!(row.id.starts_with("item-"));
        assert_eq!(row.category, DEFAULT_CATEGORY);
        assert!(cart.find_by_id(&row.id.clone()).is_some());
    }

    #[test]
    fn test_quantity_edits() {
        let mut cart = CartStore::load(MemoryStore::shared());
        cart.add(&dish("1", "Phở", 50_000)).unwrap();
        cart.add(&dish("2", "Bún chả", 45_000)).unwrap();

        assert!(cart.increase(0).unwrap());
        assert_eq!(cart.items()[0].quantity, 2);
        assert!(cart.decrease(0).unwrap());
        assert!(cart.decrease(0).unwrap());
        assert_eq!(cart.item_count(), 1);
        assert_eq!(cart.items()[0].id, "2");

        assert!(cart.update_quantity(0, 4).unwrap());
        assert_eq!(cart.total_price(), Decimal::from(180_000));
        assert!(cart.update_quantity(0, 0).unwrap());
        assert!(cart.is_empty());

        assert!(!cart.remove(3).unwrap());
        assert!(!cart.increase(0).unwrap());
    }

    #[test]
    fn test_persisted_after_each_mutation() {
        let store = MemoryStore::shared();
        let mut cart = CartStore::load(store.clone());
        cart.add(&dish("1", "Phở", 50_000)).unwrap();
        cart.update_note(0, "không hành").unwrap();

        let reloaded = CartStore::load(store.clone());
        assert_eq!(reloaded.items(), cart.items());
        assert_eq!(reloaded.items()[0].note, "không hành");

        cart.clear().unwrap();
        assert!(CartStore::load(store).is_empty());
    }

    #[test]
    fn test_grouping() {
        let mut cart = CartStore::load(MemoryStore::shared());
        cart.add(&dish("1", "Chè", 20_000).with_category("dessert")).unwrap();
        cart.add(&dish("2", "Phở", 50_000)).unwrap();
        cart.add(&dish("3", "Cơm tấm", 45_000)).unwrap();

        let groups = cart.items_by_category();
        assert_eq!(groups.keys().copied().collect::<Vec<_>>(), vec!["dessert", "main"]);
        assert_eq!(groups["main"].len(), 2);
        assert_eq!(cart.items_in_category("dessert").len(), 1);
    }
}
