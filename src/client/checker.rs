//! Update checking and subscriptions

use super::error::{ClientError, ClientResult};
use super::fetch::Fetcher;
use futures::stream::{self, Stream};
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Outcome of one check. `latest` is `None` when the check failed.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateResult {
    pub updated: bool,
    pub latest: Option<Value>,
}

impl UpdateResult {
    pub fn unavailable() -> Self {
        Self {
            updated: false,
            latest: None,
        }
    }
}

type Listener = Arc<dyn Fn(&UpdateResult) + Send + Sync>;

/// Handle returned by [`UpdateChecker::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Subscription(u64);

/// Compares the endpoint's current content with the value captured at load
pub struct UpdateChecker {
    baseline: Value,
    url: String,
    fetcher: Arc<dyn Fetcher>,
    listeners: Mutex<Vec<(Subscription, Listener)>>,
    next_id: AtomicU64,
}

impl UpdateChecker {
    pub fn new(baseline: Value, url: impl Into<String>, fetcher: Arc<dyn Fetcher>) -> Self {
        Self {
            baseline,
            url: url.into(),
            fetcher,
            listeners: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(1),
        }
    }

    pub fn baseline(&self) -> &Value {
        &self.baseline
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Check the configured URL. Never fails.
    pub async fn check(&self) -> UpdateResult {
        self.check_url(&self.url).await
    }

    /// Check another URL. Network or parse failures resolve to
    /// `{updated: false, latest: None}`; every subscriber is notified.
    pub async fn check_url(&self, url: &str) -> UpdateResult {
        let result = match self.fetch_latest(url).await {
            Ok(latest) => UpdateResult {
                updated: latest != self.baseline,
                latest: Some(latest),
            },
            Err(e) => {
                log::debug!("update check failed: {}", e);
                UpdateResult::unavailable()
            }
        };

        self.notify(&result);
        result
    }

    async fn fetch_latest(&self, url: &str) -> ClientResult<Value> {
        let body = self.fetcher.fetch(url).await?;
        serde_json::from_str(&body).map_err(|e| ClientError::Parse {
            message: e.to_string(),
        })
    }

    /// Register a callback invoked with the result of every check
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&UpdateResult) + Send + Sync + 'static,
    {
        let subscription = Subscription(self.next_id.fetch_add(1, Ordering::Relaxed));
        if let Ok(mut listeners) = self.listeners.lock() {
            listeners.push((subscription, Arc::new(listener)));
        }
        subscription
    }

    /// Remove a callback. Unknown handles are ignored; returns whether one
    /// was removed.
    pub fn unsubscribe(&self, subscription: Subscription) -> bool {
        match self.listeners.lock() {
            Ok(mut listeners) => {
                let before = listeners.len();
                listeners.retain(|(id, _)| *id != subscription);
                listeners.len() != before
            }
            Err(_) => false,
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.listeners.lock().map(|l| l.len()).unwrap_or(0)
    }

    fn notify(&self, result: &UpdateResult) {
        // Call outside the lock so listeners may (un)subscribe
        let listeners: Vec<Listener> = match self.listeners.lock() {
            Ok(listeners) => listeners.iter().map(|(_, l)| l.clone()).collect(),
            Err(_) => return,
        };
        // a failing listener must not stop the others or the check
        for listener in listeners {
            let call = std::panic::AssertUnwindSafe(|| listener(result));
            if std::panic::catch_unwind(call).is_err() {
                log::warn!("update listener panicked; continuing with the rest");
            }
        }
    }

    /// Check every `interval`, yielding each result
    pub fn watch(self: Arc<Self>, interval: Duration) -> impl Stream<Item = UpdateResult> {
        stream::unfold((self, true), move |(checker, first)| async move {
            if !first {
                tokio::time::sleep(interval).await;
            }
            let result = checker.check().await;
            Some((result, (checker, false)))
        })
    }
}

impl std::fmt::Debug for UpdateChecker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpdateChecker")
            .field("url", &self.url)
            .field("baseline", &self.baseline)
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}
