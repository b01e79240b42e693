//! Shared types for the Gourmet ordering client
//!
//! Wire models, the order/bill status flow, the pagination envelope and the
//! error code system. No I/O lives here.

pub mod error;
pub mod models;
pub mod response;
pub mod util;

// Re-exports
pub use http;
pub use serde::{Deserialize, Serialize};

pub use error::{AppError, AppResult, ErrorCode};
pub use response::{Ack, PaginatedResponse};
