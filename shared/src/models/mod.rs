//! Wire models exchanged with the REST backend and the AI service

pub mod admin;
pub mod ai;
pub mod auth;
pub mod bill;
pub mod branch;
pub mod guest;
pub mod menu;
pub mod order;
pub mod table;

pub use admin::{
    AccountStatus, AdminDashboard, AdminRestaurant, AdminRevenueRow, AdminUser, RestaurantUpdate,
    RevenuePeriod, StatusChange, UserUpdate,
};
pub use ai::{
    AiConfig, AiConfigUpdate, BranchInfo, ChatReply, ChatRequest, ChatRole, ClearHistoryReply,
};
pub use auth::{AuthUser, LoginRequest, RegisterRequest, Role, TokenResponse, UserProfile};
pub use bill::{
    BillActionResult, BillStatus, BillStatusUpdate, PaymentMethod, StaffBill, short_id,
};
pub use branch::{Branch, BranchCreate, BranchUpdate, CashbackSettings, CashbackUpdate, OwnerStats};
pub use guest::{
    BankInfo, GuestBranch, GuestOrder, GuestOrderCreate, GuestOrderDetails, GuestOrderLine,
    GuestOrderStatus, GuestSession, GuestSessionCreate, GuestTable, SessionBill, SessionDetails,
    SessionItem, SessionOrderRef, SessionOrderSummary,
};
pub use menu::{Category, CategoryCreate, MenuItem, MenuItemCreate, MenuItemUpdate};
pub use order::{Order, OrderCreate, OrderItem, OrderLineCreate, OrderStatus, UnknownStatus};
pub use table::{DiningTable, QrCode, TableCreate, TableUpdate};
