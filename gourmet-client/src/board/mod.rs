//! Kitchen and staff order boards
//!
//! Both boards poll `GET /api/orders` for one branch and keep only the
//! statuses their side works on. The kitchen sees every order separately;
//! staff see one card per guest session.

mod kitchen;
mod staff;

pub use kitchen::{KitchenBoard, KitchenColumns};
pub use staff::{ServeCounts, SessionCard, StaffBoard, WaitSort, merge_by_session};
