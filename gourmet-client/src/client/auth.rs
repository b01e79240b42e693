// gourmet-client/src/client/auth.rs
// 认证 API

use super::GourmetClient;
use crate::ClientResult;
use crate::http::{ApiRequest, HttpClient};
use crate::poller::{PollHandle, Poller};
use crate::session::LogoutReason;
use chrono::Utc;
use serde_json::Value;
use shared::models::{LoginRequest, RegisterRequest, TokenResponse, UserProfile};
use std::sync::Arc;

impl<H: HttpClient> GourmetClient<H> {
    /// Log in and persist the token and user
    pub async fn login(&self, email: &str, password: &str) -> ClientResult<TokenResponse> {
        let body = LoginRequest {
            email: email.trim().to_string(),
            password: password.to_string(),
        };
        let resp: TokenResponse = self
            .call(ApiRequest::post("api/auth/login").json(&body)?)
            .await?;
        self.session.save_login(&resp)?;
        self.apply_token(&resp.access_token);
        Ok(resp)
    }

    /// Create an owner account; the backend logs the new user in
    pub async fn register(&self, request: &RegisterRequest) -> ClientResult<TokenResponse> {
        let resp: TokenResponse = self
            .call(ApiRequest::post("api/auth/register").json(request)?)
            .await?;
        self.session.save_login(&resp)?;
        self.apply_token(&resp.access_token);
        Ok(resp)
    }

    /// Fetch the current profile and refresh the stored identity
    pub async fn me(&self) -> ClientResult<UserProfile> {
        let profile: UserProfile = self.call(ApiRequest::get("api/auth/me")).await?;
        self.session.save_profile(&profile)?;
        Ok(profile)
    }

    /// Tell the backend, then always clear local state
    pub async fn logout(&self) -> ClientResult<()> {
        if self.session.token().is_some()
            && let Err(e) = self
                .call::<Value>(ApiRequest::post("api/auth/logout"))
                .await
        {
            tracing::debug!(error = %e, "Logout endpoint failed, clearing local session anyway");
        }
        self.end_session(LogoutReason::UserRequested);
        self.session.clear()
    }
}

impl<H: HttpClient + 'static> GourmetClient<H> {
    /// Periodically check the stored token and force a logout once it expires.
    ///
    /// The watchdog stops itself after logging out.
    pub fn spawn_token_watchdog(self: &Arc<Self>) -> PollHandle<bool> {
        let client = Arc::clone(self);
        Poller::spawn_until(
            "token-watchdog",
            self.config.token_check_interval,
            move || {
                let client = Arc::clone(&client);
                async move {
                    let session = client.session();
                    let expired = session.token().is_some() && session.is_expired_at(Utc::now());
                    if expired {
                        client.end_session(LogoutReason::Expired);
                    }
                    Ok(expired)
                }
            },
            |expired| *expired,
        )
    }
}
