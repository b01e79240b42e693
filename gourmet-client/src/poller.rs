//! Cancellable polling
//!
//! A [`Poller`] re-fetches a value on a fixed interval from a tokio task.
//! Fetches run concurrently with the ticker, so a slow response can land after
//! a newer one; every fetch carries a sequence number and a result is only
//! published when nothing newer has been applied yet.

use crate::ClientResult;
use chrono::{DateTime, Utc};
use std::future::Future;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::{JoinHandle, JoinSet};
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

/// Shortest period a poller runs at; a zero interval is raised to this
pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(1);

/// A published poll result
#[derive(Debug, Clone)]
pub struct Polled<T> {
    /// Sequence number of the fetch that produced the value
    pub seq: u64,
    pub value: T,
    pub fetched_at: DateTime<Utc>,
}

/// Handle to a running poller; dropping it stops the task
#[derive(Debug)]
pub struct PollHandle<T> {
    name: &'static str,
    cancel: CancellationToken,
    rx: watch::Receiver<Option<Polled<T>>>,
    task: Option<JoinHandle<()>>,
}

impl<T: Clone> PollHandle<T> {
    /// Latest applied value
    pub fn latest(&self) -> Option<T> {
        self.rx.borrow().as_ref().map(|p| p.value.clone())
    }

    /// Latest applied value with its sequence number
    pub fn latest_polled(&self) -> Option<Polled<T>> {
        self.rx.borrow().clone()
    }

    /// Wait for the next applied value; `None` once the poller has stopped
    pub async fn changed(&mut self) -> Option<T> {
        self.rx.changed().await.ok()?;
        self.rx.borrow_and_update().as_ref().map(|p| p.value.clone())
    }
}

impl<T> PollHandle<T> {
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Extra observer of the published values
    pub fn subscribe(&self) -> watch::Receiver<Option<Polled<T>>> {
        self.rx.clone()
    }

    pub fn stop(&self) {
        if !self.cancel.is_cancelled() {
            tracing::debug!(poller = self.name, "Stopping poller");
            self.cancel.cancel();
        }
    }

    pub fn is_stopped(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Stop and wait for the task to exit
    pub async fn shutdown(mut self) {
        self.stop();
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }

    /// Wait until the poller stops on its own (stop condition or external stop)
    pub async fn finished(&mut self) {
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

impl<T> Drop for PollHandle<T> {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// Spawns polling tasks
pub struct Poller;

impl Poller {
    /// Poll `fetch` every `interval`, starting immediately.
    ///
    /// Fetch errors are logged and the loop keeps going.
    pub fn spawn<T, F, Fut>(name: &'static str, interval: Duration, fetch: F) -> PollHandle<T>
    where
        T: Send + Sync + 'static,
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ClientResult<T>> + Send + 'static,
    {
        Self::spawn_until(name, interval, fetch, |_| false)
    }

    /// Like [`Poller::spawn`], but runs `on_applied` for every value that is
    /// actually published and stops once it returns `true`.
    ///
    /// Stale results never reach `on_applied`, so side effects done there
    /// always follow the newest answer.
    pub fn spawn_until<T, F, Fut, D>(
        name: &'static str,
        interval: Duration,
        fetch: F,
        on_applied: D,
    ) -> PollHandle<T>
    where
        T: Send + Sync + 'static,
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ClientResult<T>> + Send + 'static,
        D: Fn(&T) -> bool + Send + Sync + 'static,
    {
        let interval = interval.max(MIN_POLL_INTERVAL);
        let cancel = CancellationToken::new();
        let (tx, rx) = watch::channel::<Option<Polled<T>>>(None);
        let token = cancel.clone();

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            let mut in_flight: JoinSet<(u64, ClientResult<T>)> = JoinSet::new();
            let mut next_seq: u64 = 0;

            tracing::debug!(poller = name, interval_ms = interval.as_millis() as u64, "Poller started");
            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = ticker.tick() => {
                        next_seq += 1;
                        let seq = next_seq;
                        let fut = fetch();
                        in_flight.spawn(async move { (seq, fut.await) });
                    }
                    Some(joined) = in_flight.join_next(), if !in_flight.is_empty() => {
                        match joined {
                            Ok((seq, Ok(value))) => {
                                // this task is the only sender
                                let stale = tx
                                    .borrow()
                                    .as_ref()
                                    .is_some_and(|p: &Polled<T>| p.seq >= seq);
                                if stale {
                                    tracing::debug!(poller = name, seq, "Dropping stale poll result");
                                } else {
                                    let finished = on_applied(&value);
                                    tx.send_replace(Some(Polled { seq, value, fetched_at: Utc::now() }));
                                    if finished {
                                        tracing::debug!(poller = name, seq, "Poll target reached final state");
                                        token.cancel();
                                    }
                                }
                            }
                            Ok((seq, Err(e))) => {
                                tracing::warn!(poller = name, seq, error = %e, "Poll fetch failed");
                            }
                            Err(e) => {
                                tracing::error!(poller = name, error = %e, "Poll fetch task panicked");
                            }
                        }
                    }
                }
            }
            in_flight.abort_all();
            tracing::debug!(poller = name, "Poller stopped");
        });

        PollHandle {
            name,
            cancel,
            rx,
            task: Some(task),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ClientError;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU64, Ordering};

    #[tokio::test(start_paused = true)]
    async fn test_stale_result_dropped() {
        let calls = Arc::new(AtomicU64::new(0));
        let c = calls.clone();
        // first fetch is slow and resolves after the second
        let handle = Poller::spawn("stale", Duration::from_secs(5), move || {
            let n = c.fetch_add(1, Ordering::SeqCst) + 1;
            async move {
                let delay = if n == 1 { 8 } else { 1 };
                tokio::time::sleep(Duration::from_secs(delay)).await;
                Ok(n)
            }
        });

        tokio::time::sleep(Duration::from_millis(9_500)).await;
        let polled = handle.latest_polled().unwrap();
        assert_eq!(polled.value, 2);
        assert_eq!(polled.seq, 2);
        handle.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_errors_do_not_stop_loop() {
        let calls = Arc::new(AtomicU64::new(0));
        let c = calls.clone();
        let mut handle = Poller::spawn("flaky", Duration::from_secs(1), move || {
            let n = c.fetch_add(1, Ordering::SeqCst) + 1;
            async move {
                if n < 3 {
                    Err(ClientError::Api {
                        status: 503,
                        message: "busy".into(),
                    })
                } else {
                    Ok(n)
                }
            }
        });

        assert_eq!(handle.changed().await, Some(3));
        handle.stop();
        assert!(handle.is_stopped());
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_halts_fetches() {
        let calls = Arc::new(AtomicU64::new(0));
        let c = calls.clone();
        let handle = Poller::spawn("stopped", Duration::from_secs(1), move || {
            c.fetch_add(1, Ordering::SeqCst);
            async { Ok(()) }
        });

        tokio::time::sleep(Duration::from_millis(2_500)).await;
        handle.shutdown().await;
        let seen = calls.load(Ordering::SeqCst);
        assert_eq!(seen, 3);

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(calls.load(Ordering::SeqCst), seen);
    }

    #[tokio::test(start_paused = true)]
    async fn test_spawn_until_stops_on_final_value() {
        let calls = Arc::new(AtomicU64::new(0));
        let c = calls.clone();
        let mut handle = Poller::spawn_until(
            "until",
            Duration::from_secs(1),
            move || {
                let n = c.fetch_add(1, Ordering::SeqCst) + 1;
                async move { Ok(n) }
            },
            |n| *n >= 2,
        );

        handle.finished().await;
        assert!(handle.is_stopped());
        assert_eq!(handle.latest(), Some(2));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_on_applied_skips_stale_results() {
        let calls = Arc::new(AtomicU64::new(0));
        let seen = Arc::new(std::sync::Mutex::new(Vec::new()));
        let c = calls.clone();
        let s = seen.clone();
        let handle = Poller::spawn_until(
            "hooked",
            Duration::from_secs(5),
            move || {
                let n = c.fetch_add(1, Ordering::SeqCst) + 1;
                async move {
                    let delay = if n == 1 { 8 } else { 1 };
                    tokio::time::sleep(Duration::from_secs(delay)).await;
                    Ok(n)
                }
            },
            move |n| {
                s.lock().unwrap().push(*n);
                false
            },
        );

        tokio::time::sleep(Duration::from_millis(9_500)).await;
        assert_eq!(*seen.lock().unwrap(), vec![2]);
        assert_eq!(handle.latest(), Some(2));
        handle.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_interval_does_not_panic() {
        let mut handle = Poller::spawn("zero", Duration::ZERO, || async { Ok(1u8) });
        assert_eq!(handle.changed().await, Some(1));
        handle.shutdown().await;
    }
}
