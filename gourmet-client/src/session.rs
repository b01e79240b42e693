//! Auth state mirrored in the key-value store
//!
//! The access token and the user's identity live in the store so a restarted
//! front end stays logged in. A 401 anywhere clears them through
//! [`AuthSession::force_logout`], which fires at most once until the next
//! successful login no matter how many requests fail together.

use crate::ClientResult;
use crate::storage::{SharedStore, keys};
use chrono::{DateTime, TimeZone, Utc};
use shared::models::{Role, TokenResponse, UserProfile};
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::broadcast;

/// Why the session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogoutReason {
    /// Backend answered 401
    Unauthorized,
    /// Stored token passed its expiry
    Expired,
    /// User asked to log out
    UserRequested,
}

/// Session lifecycle notifications; a `LoggedOut` means "go to the login screen"
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthEvent {
    LoggedIn { user_id: String },
    LoggedOut { reason: LogoutReason },
}

/// Identity of the logged-in user as stored
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredUser {
    pub user_id: String,
    pub tenant_id: Option<String>,
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub role: Role,
}

pub struct AuthSession {
    store: SharedStore,
    /// Set while a forced logout may still fire
    armed: AtomicBool,
    events: broadcast::Sender<AuthEvent>,
}

impl AuthSession {
    pub fn new(store: SharedStore) -> Self {
        let (events, _) = broadcast::channel(16);
        Self {
            store,
            armed: AtomicBool::new(true),
            events,
        }
    }

    pub fn store(&self) -> &SharedStore {
        &self.store
    }

    /// Subscribe to login / logout notifications
    pub fn subscribe(&self) -> broadcast::Receiver<AuthEvent> {
        self.events.subscribe()
    }

    pub fn token(&self) -> Option<String> {
        self.store.get(keys::ACCESS_TOKEN).filter(|t| !t.is_empty())
    }

    /// Stored expiry instant
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        let millis: i64 = self.store.get(keys::TOKEN_EXPIRATION)?.parse().ok()?;
        Utc.timestamp_millis_opt(millis).single()
    }

    /// A token without a stored expiry never expires client-side
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at().is_some_and(|exp| now >= exp)
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some() && !self.is_expired_at(Utc::now())
    }

    /// Persist a login / register response and re-arm the forced logout
    pub fn save_login(&self, resp: &TokenResponse) -> ClientResult<()> {
        let expires_at = Utc::now().timestamp_millis() + resp.expires_in.saturating_mul(1000);
        let store = &self.store;
        store.set(keys::ACCESS_TOKEN, resp.access_token.clone())?;
        store.set(keys::TOKEN_EXPIRATION, expires_at.to_string())?;
        store.set(keys::USER_ID, resp.user.user_id.clone())?;
        store.set(keys::FULL_NAME, resp.user.full_name.clone())?;
        store.set(keys::EMAIL, resp.user.email.clone())?;
        store.set(keys::ROLE, resp.user.role.as_str().to_string())?;
        match &resp.user.tenant_id {
            Some(tenant) => store.set(keys::TENANT_ID, tenant.clone())?,
            None => store.remove(keys::TENANT_ID)?,
        }

        self.armed.store(true, Ordering::SeqCst);
        tracing::info!(user_id = %resp.user.user_id, role = %resp.user.role, "Logged in");
        let _ = self.events.send(AuthEvent::LoggedIn {
            user_id: resp.user.user_id.clone(),
        });
        Ok(())
    }

    /// Refresh stored identity from `/api/auth/me`
    pub fn save_profile(&self, profile: &UserProfile) -> ClientResult<()> {
        let store = &self.store;
        store.set(keys::USER_ID, profile.user_id.clone())?;
        store.set(keys::FULL_NAME, profile.full_name.clone())?;
        store.set(keys::EMAIL, profile.email.clone())?;
        store.set(keys::ROLE, profile.role.as_str().to_string())?;
        if let Some(tenant) = &profile.tenant_id {
            store.set(keys::TENANT_ID, tenant.clone())?;
        }
        Ok(())
    }

    pub fn current_user(&self) -> Option<StoredUser> {
        let store = &self.store;
        Some(StoredUser {
            user_id: store.get(keys::USER_ID)?,
            tenant_id: store.get(keys::TENANT_ID),
            full_name: store.get(keys::FULL_NAME),
            email: store.get(keys::EMAIL),
            role: store
                .get(keys::ROLE)
                .map(|r| Role::parse(&r))
                .unwrap_or_default(),
        })
    }

    pub fn tenant_id(&self) -> Option<String> {
        self.store.get(keys::TENANT_ID).filter(|t| !t.is_empty())
    }

    /// Customer account id; absent for anonymous guests
    pub fn customer_id(&self) -> Option<String> {
        self.store.get(keys::CUSTOMER_ID).filter(|c| !c.is_empty())
    }

    /// Wipe stored credentials without notifying anyone
    pub fn clear(&self) -> ClientResult<()> {
        self.store.remove_all(&keys::AUTH_KEYS)
    }

    /// Clear credentials and announce the logout, once.
    ///
    /// Returns `true` for the call that actually logged out; concurrent or
    /// later callers get `false` until [`AuthSession::save_login`] re-arms.
    pub fn force_logout(&self, reason: LogoutReason) -> bool {
        if !self.armed.swap(false, Ordering::SeqCst) {
            return false;
        }
        if let Err(e) = self.clear() {
            tracing::error!(error = %e, "Failed to clear stored credentials");
        }
        tracing::warn!(?reason, "Session ended, login required");
        let _ = self.events.send(AuthEvent::LoggedOut { reason });
        true
    }
}

impl std::fmt::Debug for AuthSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthSession")
            .field("authenticated", &self.is_authenticated())
            .field("armed", &self.armed.load(Ordering::SeqCst))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use chrono::Duration;
    use shared::models::AuthUser;
    use std::sync::Arc;

    fn token_response(expires_in: i64) -> TokenResponse {
        TokenResponse {
            access_token: "tok-1".into(),
            token_type: "bearer".into(),
            expires_in,
            user: AuthUser {
                user_id: "u1".into(),
                email: "owner@pho.vn".into(),
                full_name: "Lan".into(),
                tenant_id: Some("t1".into()),
                role: Role::Owner,
            },
        }
    }

    #[test]
    fn test_save_login_and_read_back() {
        let session = AuthSession::new(MemoryStore::shared());
        session.save_login(&token_response(3600)).unwrap();

        assert!(session.is_authenticated());
        assert_eq!(session.tenant_id().as_deref(), Some("t1"));
        let user = session.current_user().unwrap();
        assert_eq!(user.role, Role::Owner);
        assert_eq!(user.full_name.as_deref(), Some("Lan"));

        let exp = session.expires_at().unwrap();
        assert!(session.is_expired_at(exp + Duration::seconds(1)));
        assert!(!session.is_expired_at(exp - Duration::seconds(1)));
    }

    #[test]
    fn test_force_logout_fires_once_until_login() {
        let session = AuthSession::new(MemoryStore::shared());
        let mut events = session.subscribe();
        session.save_login(&token_response(3600)).unwrap();

        assert!(session.force_logout(LogoutReason::Unauthorized));
        assert!(!session.force_logout(LogoutReason::Unauthorized));
        assert!(session.token().is_none());
        assert!(session.current_user().is_none());

        assert!(matches!(events.try_recv(), Ok(AuthEvent::LoggedIn { .. })));
        assert_eq!(
            events.try_recv().unwrap(),
            AuthEvent::LoggedOut {
                reason: LogoutReason::Unauthorized
            }
        );
        assert!(events.try_recv().is_err());

        session.save_login(&token_response(3600)).unwrap();
        assert!(session.force_logout(LogoutReason::Expired));
    }

    #[test]
    fn test_concurrent_force_logout() {
        let session = Arc::new(AuthSession::new(MemoryStore::shared()));
        session.save_login(&token_response(3600)).unwrap();

        let fired: usize = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| {
                    let s = session.clone();
                    scope.spawn(move || s.force_logout(LogoutReason::Unauthorized))
                })
                .collect();
            handles
                .into_iter()
                .map(|h| h.join().unwrap() as usize)
                .sum()
        });
        assert_eq!(fired, 1);
    }

    #[test]
    fn test_customer_id_marks_customer() {
        let store = MemoryStore::shared();
        let session = AuthSession::new(store.clone());
        assert!(session.customer_id().is_none());
        store.set(keys::CUSTOMER_ID, "c-1".into()).unwrap();
        assert_eq!(session.customer_id().as_deref(), Some("c-1"));
    }
}
