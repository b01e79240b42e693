//! Response envelopes used by the REST backend

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// 分页响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    /// 数据列表
    pub data: Vec<T>,
    /// 总记录数
    pub total: u64,
    /// 当前页码
    pub page: u32,
    /// 每页数量
    pub limit: u32,
    /// 总页数
    pub total_pages: u32,
    /// Active-user count (user listing only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_users: Option<u64>,
    /// Order count over the period (revenue listing only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_orders: Option<u64>,
    /// Period the figures cover (revenue listing only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub period: Option<String>,
}

impl<T> PaginatedResponse<T> {
    /// Build a page, computing `total_pages` as `ceil(total / limit)`
    pub fn new(data: Vec<T>, total: u64, page: u32, limit: u32) -> Self {
        Self {
            data,
            total,
            page,
            limit,
            total_pages: total_pages(total, limit),
            active_users: None,
            total_orders: None,
            period: None,
        }
    }
}

/// `ceil(total / limit)`, zero when `limit` is zero
pub fn total_pages(total: u64, limit: u32) -> u32 {
    if limit == 0 {
        return 0;
    }
    total.div_ceil(limit as u64) as u32
}

/// Acknowledgement returned by mutation endpoints: `{"message": ..., ...}`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Ack {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub message: Option<String>,
    /// Endpoint-specific echo fields (`order_id`, `new_status`, `bill_status`, ...)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Ack {
    /// Read an echoed string field
    pub fn field(&self, key: &str) -> Option<&str> {
        self.extra.get(key).and_then(Value::as_str)
    }
}
