//! Client-side key-value store
//!
//! Everything the client remembers between runs (token, cart, table and
//! session ids) goes through [`KeyValueStore`]. Values are plain strings;
//! structured values are stored as JSON via [`KeyValueStoreExt`].

use crate::{ClientError, ClientResult};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Well-known store keys
pub mod keys {
    pub const ACCESS_TOKEN: &str = "access_token";
    /// Expiry as epoch milliseconds
    pub const TOKEN_EXPIRATION: &str = "token_expiration";
    pub const USER_ID: &str = "user_id";
    pub const TENANT_ID: &str = "tenant_id";
    pub const FULL_NAME: &str = "full_name";
    pub const EMAIL: &str = "email";
    pub const ROLE: &str = "role";
    /// Present only for logged-in customers; guests have none
    pub const CUSTOMER_ID: &str = "customer_id";

    pub const CART_ITEMS: &str = "gourmet_cart_items";

    pub const CURRENT_TABLE_ID: &str = "current_table_id";
    pub const CURRENT_BRANCH_ID: &str = "current_branch_id";
    pub const CURRENT_TABLE_NUMBER: &str = "current_table_number";
    pub const CURRENT_SESSION_ID: &str = "current_session_id";
    pub const LAST_ORDER_ID: &str = "last_order_id";
    pub const ORDER_STATUS: &str = "order_status";
    pub const PAYMENT_CONFIRMATION: &str = "payment_confirmation_data";

    pub const AI_CHAT_MESSAGES: &str = "ai_chat_messages";

    /// Keys wiped on logout
    pub const AUTH_KEYS: [&str; 7] = [
        ACCESS_TOKEN,
        TOKEN_EXPIRATION,
        USER_ID,
        TENANT_ID,
        FULL_NAME,
        EMAIL,
        ROLE,
    ];
}

/// String key-value store
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: String) -> ClientResult<()>;
    fn remove(&self, key: &str) -> ClientResult<()>;

    /// Remove several keys at once
    fn remove_all(&self, keys: &[&str]) -> ClientResult<()> {
        for key in keys {
            self.remove(key)?;
        }
        Ok(())
    }
}

/// Shared handle to a store
pub type SharedStore = Arc<dyn KeyValueStore>;

/// JSON helpers over any [`KeyValueStore`]
pub trait KeyValueStoreExt {
    /// Read a JSON value; missing or unparsable values read as `None`
    fn get_json<T: DeserializeOwned>(&self, key: &str) -> Option<T>;
    fn set_json<T: Serialize>(&self, key: &str, value: &T) -> ClientResult<()>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStoreExt for S {
    fn get_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.get(key)?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(key, error = %e, "Discarding unreadable stored value");
                None
            }
        }
    }

    fn set_json<T: Serialize>(&self, key: &str, value: &T) -> ClientResult<()> {
        self.set(key, serde_json::to_string(value)?)
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// In-memory store; contents vanish with the process
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> SharedStore {
        Arc::new(Self::new())
    }

    pub fn len(&self) -> usize {
        lock(&self.entries).len()
    }

    pub fn is_empty(&self) -> bool {
        lock(&self.entries).is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        lock(&self.entries).get(key).cloned()
    }

    fn set(&self, key: &str, value: String) -> ClientResult<()> {
        lock(&self.entries).insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&self, key: &str) -> ClientResult<()> {
        lock(&self.entries).remove(key);
        Ok(())
    }
}

/// JSON-file store
///
/// The whole map is rewritten after every mutation (write to a sibling temp
/// file, then rename), so the file on disk always holds a complete snapshot.
#[derive(Debug)]
pub struct FileStore {
    file_path: PathBuf,
    entries: Mutex<HashMap<String, String>>,
}

impl FileStore {
    /// Open a store file, creating parent directories as needed.
    ///
    /// A missing file starts empty; a corrupt file is logged and replaced on
    /// the next write.
    pub fn open(path: impl AsRef<Path>) -> ClientResult<Self> {
        let file_path = path.as_ref().to_path_buf();
        if let Some(parent) = file_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let entries = if file_path.exists() {
            let content = std::fs::read_to_string(&file_path)?;
            match serde_json::from_str::<HashMap<String, String>>(&content) {
                Ok(map) => map,
                Err(e) => {
                    tracing::warn!(path = %file_path.display(), error = %e, "Store file unreadable, starting empty");
                    HashMap::new()
                }
            }
        } else {
            HashMap::new()
        };
        tracing::debug!(path = %file_path.display(), entries = entries.len(), "Opened file store");

        Ok(Self {
            file_path,
            entries: Mutex::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }

    fn persist(&self, entries: &HashMap<String, String>) -> ClientResult<()> {
        let content = serde_json::to_string_pretty(entries)?;
        let tmp = self.file_path.with_extension("json.tmp");
        std::fs::write(&tmp, content)?;
        std::fs::rename(&tmp, &self.file_path)
            .map_err(|e| ClientError::Storage(format!("{}: {}", self.file_path.display(), e)))?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        lock(&self.entries).get(key).cloned()
    }

    fn set(&self, key: &str, value: String) -> ClientResult<()> {
        let mut entries = lock(&self.entries);
        entries.insert(key.to_string(), value);
        self.persist(&entries)
    }

    fn remove(&self, key: &str) -> ClientResult<()> {
        let mut entries = lock(&self.entries);
        if entries.remove(key).is_some() {
            self.persist(&entries)?;
        }
        Ok(())
    }

    fn remove_all(&self, keys: &[&str]) -> ClientResult<()> {
        let mut entries = lock(&self.entries);
        let before = entries.len();
        for key in keys {
            entries.remove(*key);
        }
        if entries.len() != before {
            self.persist(&entries)?;
        }
        Ok(())
    }
}
