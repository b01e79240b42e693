//! Dining table and QR code models

use serde::{Deserialize, Serialize};

/// Dining table entity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DiningTable {
    pub table_id: String,
    pub table_number: String,
    pub capacity: Option<u32>,
    #[serde(default = "default_available")]
    pub status: String,
    pub branch_id: String,
}

fn default_available() -> String {
    "available".to_string()
}

/// Create dining table payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableCreate {
    pub table_number: String,
    pub capacity: u32,
    #[serde(default = "default_available")]
    pub status: String,
}

impl TableCreate {
    pub fn new(table_number: impl Into<String>, capacity: u32) -> Self {
        Self {
            table_number: table_number.into(),
            capacity,
            status: default_available(),
        }
    }
}

/// Update dining table payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TableUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capacity: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// QR code bound to a table; `qr_content` is `branch_id|table_id`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QrCode {
    pub qr_id: String,
    pub qr_content: String,
    pub is_active: bool,
}

impl QrCode {
    /// Split `qr_content` into `(branch_id, table_id)`
    pub fn targets(&self) -> Option<(&str, &str)> {
        let (branch, table) = self.qr_content.split_once('|')?;
        if branch.is_empty() || table.is_empty() {
            return None;
        }
        Some((branch, table))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qr_targets() {
        let qr = QrCode {
            qr_id: "q1".into(),
            qr_content: "b-7|t-3".into(),
            is_active: true,
        };
        assert_eq!(qr.targets(), Some(("b-7", "t-3")));

        let broken = QrCode {
            qr_content: "b-7".into(),
            ..qr
        };
        assert_eq!(broken.targets(), None);
    }
}
