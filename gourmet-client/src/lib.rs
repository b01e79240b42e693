//! Gourmet Client - async client for the Gourmet restaurant ordering platform
//!
//! Wraps the REST backend and the AI assistant service, and carries the
//! client-side state a front end needs between requests: the auth session,
//! the cart, the guest's table/session ids and the polling loops that keep
//! boards and order progress fresh.

pub mod admin;
pub mod board;
pub mod cart;
pub mod chat;
pub mod checkout;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod listing;
pub mod owner;
pub mod payment;
pub mod poller;
pub mod progress;
pub mod retry;
pub mod session;
pub mod storage;
pub mod validation;

pub use client::GourmetClient;
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use http::{ApiRequest, HttpClient, NetworkHttpClient};
pub use poller::{PollHandle, Poller};
pub use session::{AuthEvent, AuthSession, LogoutReason};
pub use storage::{FileStore, KeyValueStore, KeyValueStoreExt, MemoryStore, SharedStore};

// Re-export shared types for convenience
pub use shared::models;
