// gourmet-client/src/client/mod.rs
// 统一的 GourmetClient - 核心 API 与 AI 服务

//! Typed endpoint surface
//!
//! [`GourmetClient`] owns one transport for the core REST API and one for the
//! AI assistant service. Every call goes through [`GourmetClient::call`], which
//! turns a 401 into a single forced logout.

mod admin;
mod ai;
mod auth;
mod guest;
mod menu;
mod orders;
mod owner;
mod staff;

pub use admin::PageQuery;

use crate::config::ClientConfig;
use crate::http::{ApiRequest, HttpClient, NetworkHttpClient};
use crate::retry::{RetryPolicy, retry_with_backoff};
use crate::session::{AuthEvent, AuthSession, LogoutReason};
use crate::storage::SharedStore;
use crate::{ClientError, ClientResult};
use serde::de::DeserializeOwned;
use tokio::sync::broadcast;

/// Client for the core API and the AI service
pub struct GourmetClient<H: HttpClient = NetworkHttpClient> {
    api: H,
    ai: H,
    session: AuthSession,
    config: ClientConfig,
}

impl GourmetClient<NetworkHttpClient> {
    /// Build network transports from the config
    pub fn new(config: ClientConfig, store: SharedStore) -> ClientResult<Self> {
        let timeout = config.timeout_duration();
        let api = NetworkHttpClient::new(&config.base_url, timeout)?;
        let ai = NetworkHttpClient::new(&config.ai_base_url, timeout)?;
        Ok(Self::with_transports(api, ai, config, store))
    }
}

impl<H: HttpClient> GourmetClient<H> {
    /// Assemble a client from explicit transports; a stored token is picked up
    pub fn with_transports(api: H, ai: H, config: ClientConfig, store: SharedStore) -> Self {
        let session = AuthSession::new(store);
        if let Some(token) = session.token() {
            api.set_token(Some(token.clone()));
            ai.set_token(Some(token));
        }
        Self {
            api,
            ai,
            session,
            config,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn session(&self) -> &AuthSession {
        &self.session
    }

    pub fn store(&self) -> &SharedStore {
        self.session.store()
    }

    /// Login / logout notifications
    pub fn subscribe(&self) -> broadcast::Receiver<AuthEvent> {
        self.session.subscribe()
    }

    pub fn api_transport(&self) -> &H {
        &self.api
    }

    /// Send to the core API; a 401 forces a logout
    pub async fn call<T: DeserializeOwned>(&self, request: ApiRequest) -> ClientResult<T> {
        let result = self.api.send(request).await;
        self.check_auth(result)
    }

    /// Send to the AI service
    pub async fn call_ai<T: DeserializeOwned>(&self, request: ApiRequest) -> ClientResult<T> {
        let result = self.ai.send(request).await;
        self.check_auth(result)
    }

    /// GET with exponential backoff on transient failures
    pub async fn read<T: DeserializeOwned>(&self, request: ApiRequest) -> ClientResult<T> {
        retry_with_backoff(self.retry_policy(), || self.call(request.clone())).await
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::exponential(self.config.retry_attempts, self.config.retry_base_delay)
    }

    fn check_auth<T>(&self, result: ClientResult<T>) -> ClientResult<T> {
        if let Err(err) = &result
            && err.is_unauthorized()
        {
            self.end_session(LogoutReason::Unauthorized);
        }
        result
    }

    /// Drop the token from both transports and fire the logout latch
    pub(crate) fn end_session(&self, reason: LogoutReason) -> bool {
        self.api.set_token(None);
        self.ai.set_token(None);
        self.session.force_logout(reason)
    }

    fn apply_token(&self, token: &str) {
        self.api.set_token(Some(token.to_string()));
        self.ai.set_token(Some(token.to_string()));
    }

    /// Tenant of the logged-in owner
    pub fn require_tenant(&self) -> ClientResult<String> {
        if self.session.token().is_none() {
            return Err(ClientError::NotLoggedIn);
        }
        self.session.tenant_id().ok_or(ClientError::NoTenant)
    }
}

impl<H: HttpClient> std::fmt::Debug for GourmetClient<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GourmetClient")
            .field("base_url", &self.config.base_url)
            .field("ai_base_url", &self.config.ai_base_url)
            .field("session", &self.session)
            .finish()
    }
}
