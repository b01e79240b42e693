//! Client configuration

use crate::poller::MIN_POLL_INTERVAL;
use std::time::Duration;

/// Client configuration for the REST backend and the AI service
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Core API base URL (e.g., "http://localhost:8000")
    pub base_url: String,

    /// AI assistant base URL (e.g., "http://localhost:8001")
    pub ai_base_url: String,

    /// Request timeout in seconds
    pub timeout: u64,

    /// Attempts for retried GETs (first try included)
    pub retry_attempts: u32,

    /// Delay before the first retry; doubles for each further attempt
    pub retry_base_delay: Duration,

    /// Guest order status refresh
    pub order_poll_interval: Duration,

    /// Kitchen / staff board refresh
    pub board_refresh_interval: Duration,

    /// Admin dashboard refresh
    pub admin_refresh_interval: Duration,

    /// Owner dashboard refresh
    pub owner_refresh_interval: Duration,

    /// Stored-token expiry check
    pub token_check_interval: Duration,

    /// Lifetime of a payment QR code
    pub qr_expiry: Duration,

    /// Longest a guest waits on the QR screen before it gives up
    pub payment_wait_limit: Duration,
}

impl ClientConfig {
    /// Create a configuration with default timings
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ai_base_url: "http://localhost:8001".into(),
            timeout: 30,
            retry_attempts: 3,
            retry_base_delay: Duration::from_secs(1),
            order_poll_interval: Duration::from_secs(5),
            board_refresh_interval: Duration::from_secs(5),
            admin_refresh_interval: Duration::from_secs(30),
            owner_refresh_interval: Duration::from_secs(300),
            token_check_interval: Duration::from_secs(60),
            qr_expiry: Duration::from_secs(300),
            payment_wait_limit: Duration::from_secs(300),
        }
    }

    /// Load from environment variables, falling back to defaults
    ///
    /// - `GOURMET_API_URL`
    /// - `GOURMET_AI_URL`
    /// - `GOURMET_TIMEOUT_SECS`
    /// - `GOURMET_RETRY_ATTEMPTS`
    /// - `GOURMET_POLL_INTERVAL_SECS` (order status and boards)
    pub fn from_env() -> Self {
        let mut config = Self::new(
            std::env::var("GOURMET_API_URL").unwrap_or_else(|_| "http://localhost:8000".into()),
        );
        if let Ok(url) = std::env::var("GOURMET_AI_URL") {
            config.ai_base_url = url;
        }
        config.timeout = std::env::var("GOURMET_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(config.timeout);
        config.retry_attempts = std::env::var("GOURMET_RETRY_ATTEMPTS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(config.retry_attempts);
        if let Some(secs) = std::env::var("GOURMET_POLL_INTERVAL_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .filter(|s| *s > 0)
        {
            config.order_poll_interval = Duration::from_secs(secs);
            config.board_refresh_interval = Duration::from_secs(secs);
        }
        config
    }

    /// Set the AI service base URL
    pub fn with_ai_base_url(mut self, url: impl Into<String>) -> Self {
        self.ai_base_url = url.into();
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = seconds;
        self
    }

    /// Set retry policy for idempotent reads
    pub fn with_retry(mut self, attempts: u32, base_delay: Duration) -> Self {
        self.retry_attempts = attempts.max(1);
        self.retry_base_delay = base_delay;
        self
    }

    /// Set the order-status and board refresh interval
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        let interval = interval.max(MIN_POLL_INTERVAL);
        self.order_poll_interval = interval;
        self.board_refresh_interval = interval;
        self
    }

    /// Set the QR lifetime
    pub fn with_qr_expiry(mut self, expiry: Duration) -> Self {
        self.qr_expiry = expiry;
        self
    }

    pub fn timeout_duration(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new("http://localhost:8000")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, "http://localhost:8000");
        assert_eq!(config.ai_base_url, "http://localhost:8001");
        assert_eq!(config.timeout, 30);
        assert_eq!(config.retry_attempts, 3);
        assert_eq!(config.order_poll_interval, Duration::from_secs(5));
        assert_eq!(config.admin_refresh_interval, Duration::from_secs(30));
        assert_eq!(config.owner_refresh_interval, Duration::from_secs(300));
        assert_eq!(config.qr_expiry, Duration::from_secs(300));
    }

    #[test]
    fn test_builder() {
        let config = ClientConfig::new("http://api.local")
            .with_ai_base_url("http://ai.local")
            .with_timeout(5)
            .with_retry(0, Duration::from_millis(10))
            .with_poll_interval(Duration::from_secs(2));
        assert_eq!(config.timeout_duration(), Duration::from_secs(5));
        assert_eq!(config.retry_attempts, 1);
        assert_eq!(config.board_refresh_interval, Duration::from_secs(2));
    }

    #[test]
    fn test_zero_poll_interval_clamped() {
        let config = ClientConfig::default().with_poll_interval(Duration::ZERO);
        assert_eq!(config.order_poll_interval, MIN_POLL_INTERVAL);
        assert_eq!(config.board_refresh_interval, MIN_POLL_INTERVAL);
    }
}
