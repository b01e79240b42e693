//! Guest-facing order progress
//!
//! Guests see three stages instead of the kitchen's six statuses.

use crate::storage::{KeyValueStore, keys};
use shared::models::OrderStatus;
use std::fmt;

/// Display language for stage labels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Lang {
    #[default]
    Vi,
    En,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GuestStage {
    #[default]
    Preparing,
    Serving,
    Completed,
}

impl GuestStage {
    pub fn from_status(status: OrderStatus) -> Self {
        match status {
            OrderStatus::Pending
            | OrderStatus::Ordered
            | OrderStatus::Cooking
            | OrderStatus::Ready => Self::Preparing,
            OrderStatus::Serving => Self::Serving,
            OrderStatus::Done => Self::Completed,
        }
    }

    /// 1-based step on the progress bar
    pub fn step(&self) -> u8 {
        match self {
            Self::Preparing => 1,
            Self::Serving => 2,
            Self::Completed => 3,
        }
    }

    pub fn percent(&self) -> u8 {
        match self {
            Self::Preparing => 0,
            Self::Serving => 50,
            Self::Completed => 100,
        }
    }

    pub fn label(&self, lang: Lang) -> &'static str {
        match (self, lang) {
            (Self::Preparing, Lang::Vi) => "Đang chuẩn bị",
            (Self::Serving, Lang::Vi) => "Đang phục vụ",
            (Self::Completed, Lang::Vi) => "Hoàn thành",
            (Self::Preparing, Lang::En) => "Preparing",
            (Self::Serving, Lang::En) => "Serving",
            (Self::Completed, Lang::En) => "Completed",
        }
    }

    pub fn is_final(&self) -> bool {
        matches!(self, Self::Completed)
    }

    /// Stage from the stored `order_status`; missing or unknown reads as preparing
    pub fn load(store: &dyn KeyValueStore) -> Self {
        store
            .get(keys::ORDER_STATUS)
            .and_then(|raw| raw.parse::<OrderStatus>().ok())
            .map(Self::from_status)
            .unwrap_or_default()
    }
}

impl From<OrderStatus> for GuestStage {
    fn from(status: OrderStatus) -> Self {
        Self::from_status(status)
    }
}

impl fmt::Display for GuestStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label(Lang::En))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn test_stage_mapping() {
        assert_eq!(GuestStage::from(OrderStatus::Ordered), GuestStage::Preparing);
        assert_eq!(GuestStage::from(OrderStatus::Ready), GuestStage::Preparing);
        assert_eq!(GuestStage::from(OrderStatus::Serving), GuestStage::Serving);
        assert_eq!(GuestStage::from(OrderStatus::Done).percent(), 100);
        assert_eq!(GuestStage::Serving.step(), 2);
        assert_eq!(GuestStage::Serving.label(Lang::Vi), "Đang phục vụ");
    }

    #[test]
    fn test_load_from_store() {
        let store = MemoryStore::new();
        assert_eq!(GuestStage::load(&store), GuestStage::Preparing);

        store.set(keys::ORDER_STATUS, "serving".into()).unwrap();
        assert_eq!(GuestStage::load(&store), GuestStage::Serving);

        store.set(keys::ORDER_STATUS, "teleported".into()).unwrap();
        assert_eq!(GuestStage::load(&store), GuestStage::Preparing);
    }
}
