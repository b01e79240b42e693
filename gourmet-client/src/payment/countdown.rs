//! QR expiry countdown

use std::time::Duration;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

/// Remaining-time threshold for the urgent styling
pub const URGENT_SECS: u64 = 30;

/// State after one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountdownTick {
    pub remaining_secs: u64,
}

impl CountdownTick {
    pub fn is_urgent(&self) -> bool {
        self.remaining_secs <= URGENT_SECS
    }

    pub fn is_expired(&self) -> bool {
        self.remaining_secs == 0
    }

    /// `m:ss`
    pub fn display(&self) -> String {
        format_mmss(self.remaining_secs)
    }
}

pub fn format_mmss(secs: u64) -> String {
    format!("{}:{:02}", secs / 60, secs % 60)
}

/// One-second countdown from the QR lifetime down to zero
#[derive(Debug)]
pub struct QrCountdown {
    cancel: CancellationToken,
    rx: watch::Receiver<CountdownTick>,
}

impl QrCountdown {
    pub fn start(window: Duration) -> Self {
        let total = window.as_secs();
        let (tx, rx) = watch::channel(CountdownTick {
            remaining_secs: total,
        });
        let cancel = CancellationToken::new();
        let token = cancel.clone();

        tokio::spawn(async move {
            let start = tokio::time::Instant::now();
            let mut ticker = tokio::time::interval_at(start + Duration::from_secs(1), Duration::from_secs(1));
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = ticker.tick() => {
                        let elapsed = start.elapsed().as_secs();
                        let remaining = total.saturating_sub(elapsed);
                        let _ = tx.send(CountdownTick { remaining_secs: remaining });
                        if remaining == 0 {
                            tracing::info!("Payment QR expired");
                            break;
                        }
                    }
                }
            }
        });

        Self { cancel, rx }
    }

    pub fn current(&self) -> CountdownTick {
        *self.rx.borrow()
    }

    /// Next tick; `None` after the countdown ended or was stopped
    pub async fn tick(&mut self) -> Option<CountdownTick> {
        self.rx.changed().await.ok()?;
        Some(*self.rx.borrow_and_update())
    }

    /// Resolves when the QR runs out
    pub async fn expired(&mut self) {
        loop {
            if self.current().is_expired() {
                return;
            }
            if self.rx.changed().await.is_err() {
                return;
            }
        }
    }

    pub fn stop(&self) {
        self.cancel.cancel();
    }
}

impl Drop for QrCountdown {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
