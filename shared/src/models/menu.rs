//! Category and menu item models

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Menu category
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Category {
    pub category_id: String,
    pub category_name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub status: String,
}

/// Create category payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryCreate {
    pub category_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub status: String,
}

/// Menu item as owners manage it
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MenuItem {
    pub menu_item_id: String,
    pub item_name: String,
    pub description: Option<String>,
    pub price: Decimal,
    #[serde(default)]
    pub discount_percent: Option<Decimal>,
    pub status: String,
    pub category_id: String,
    #[serde(default)]
    pub branch_id: Option<String>,
    pub image: Option<String>,
    /// Only present on the guest listing
    #[serde(default)]
    pub category_name: Option<String>,
}

impl MenuItem {
    /// Price after the item's discount
    pub fn effective_price(&self) -> Decimal {
        match self.discount_percent {
            Some(pct) if pct > Decimal::ZERO => {
                self.price - self.price * pct / Decimal::ONE_HUNDRED
            }
            _ => self.price,
        }
    }

    pub fn is_available(&self) -> bool {
        self.status == "available"
    }
}

/// Create menu item payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuItemCreate {
    pub category_id: String,
    pub branch_id: String,
    pub item_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub price: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount_percent: Option<Decimal>,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// Update menu item payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MenuItemUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount_percent: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,
}
