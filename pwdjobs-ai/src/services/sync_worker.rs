//! Workspace sync worker
//!
//! Results are pushed to the employer workspace out of band. Request handlers
//! call [`SyncQueue::enqueue`], which never waits and never fails; a detached
//! task drains the queue into a [`SyncSink`]. Delivery failures are kept in a
//! small ring so `/health` can report them.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use pwdjobs_common::config::SyncConfig;

/// Failures kept for diagnostics
pub const FAILURE_LOG_CAPACITY: usize = 100;

/// One record pushed to the workspace
#[derive(Debug, Clone, Serialize)]
pub struct SyncRecord {
    /// `quiz_result`, `challenge_result`, `skill_assessment`, `verification`
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    pub reference_id: String,
    pub payload: Value,
    pub occurred_at: DateTime<Utc>,
}

impl SyncRecord {
    pub fn new(kind: &str, user_id: Option<String>, reference_id: impl ToString, payload: Value) -> Self {
        Self {
            kind: kind.to_string(),
            user_id,
            reference_id: reference_id.to_string(),
            payload,
            occurred_at: Utc::now(),
        }
    }
}

/// A delivery that did not make it
#[derive(Debug, Clone, Serialize)]
pub struct SyncFailure {
    pub kind: String,
    pub reference_id: String,
    pub error: String,
    pub failed_at: DateTime<Utc>,
}

/// Destination for sync records
#[async_trait]
pub trait SyncSink: Send + Sync {
    fn name(&self) -> &str;
    async fn deliver(&self, record: &SyncRecord) -> Result<(), String>;
}

/// POSTs each record as JSON to a webhook
pub struct WebhookSink {
    http_client: Client,
    url: String,
}

impl WebhookSink {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let http_client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http_client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl SyncSink for WebhookSink {
    fn name(&self) -> &str {
        "webhook"
    }

    async fn deliver(&self, record: &SyncRecord) -> Result<(), String> {
        let response = self
            .http_client
            .post(&self.url)
            .json(record)
            .send()
            .await
            .map_err(|e| e.to_string())?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(format!("webhook returned HTTP {}", status.as_u16()))
        }
    }
}

/// Used when no webhook is configured
pub struct LogSink;

#[async_trait]
impl SyncSink for LogSink {
    fn name(&self) -> &str {
        "log"
    }

    async fn deliver(&self, record: &SyncRecord) -> Result<(), String> {
        info!(
            kind = %record.kind,
            reference_id = %record.reference_id,
            "Workspace sync record (no webhook configured)"
        );
        Ok(())
    }
}

#[derive(Default)]
struct FailureLog {
    recent: Mutex<VecDeque<SyncFailure>>,
    total: AtomicU64,
}

impl FailureLog {
    fn record(&self, failure: SyncFailure) {
        self.total.fetch_add(1, Ordering::Relaxed);
        // A panic while holding the lock leaves the ring usable
        let mut recent = self.recent.lock().unwrap_or_else(|e| e.into_inner());
        if recent.len() >= FAILURE_LOG_CAPACITY {
            recent.pop_front();
        }
        recent.push_back(failure);
    }
}

/// Handle to the sync worker; cheap to clone
#[derive(Clone)]
pub struct SyncQueue {
    tx: mpsc::Sender<SyncRecord>,
    failures: Arc<FailureLog>,
}

impl SyncQueue {
    /// Spawn the worker task and return its queue handle
    ///
    /// Must be called inside a tokio runtime.
    pub fn spawn(sink: Arc<dyn SyncSink>, capacity: usize) -> Self {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        let failures = Arc::new(FailureLog::default());
        tokio::spawn(run_worker(rx, sink, Arc::clone(&failures)));
        Self { tx, failures }
    }

    /// Webhook sink when a URL is configured, log sink otherwise
    pub fn from_config(config: &SyncConfig) -> Self {
        let sink: Arc<dyn SyncSink> = match config.webhook_url.as_deref().map(str::trim) {
            Some(url) if !url.is_empty() => {
                match WebhookSink::new(url, Duration::from_secs(config.timeout_secs)) {
                    Ok(sink) => Arc::new(sink),
                    Err(e) => {
                        warn!(error = %e, "Failed to build sync webhook client; falling back to log sink");
                        Arc::new(LogSink)
                    }
                }
            }
            _ => Arc::new(LogSink),
        };
        info!(sink = sink.name(), "Workspace sync worker started");
        Self::spawn(sink, config.queue_capacity)
    }

    /// Queue a record without waiting
    ///
    /// A full or closed queue drops the record and counts it as a failure.
    pub fn enqueue(&self, record: SyncRecord) {
        if let Err(e) = self.tx.try_send(record) {
            let (reason, record) = match e {
                mpsc::error::TrySendError::Full(r) => ("sync queue full", r),
                mpsc::error::TrySendError::Closed(r) => ("sync worker stopped", r),
            };
            warn!(kind = %record.kind, reference_id = %record.reference_id, "{}; record dropped", reason);
            self.failures.record(SyncFailure {
                kind: record.kind,
                reference_id: record.reference_id,
                error: reason.to_string(),
                failed_at: Utc::now(),
            });
        }
    }

    /// Total failed or dropped deliveries since startup
    pub fn failure_count(&self) -> u64 {
        self.failures.total.load(Ordering::Relaxed)
    }

    /// Most recent failures, oldest first
    pub fn recent_failures(&self) -> Vec<SyncFailure> {
        let recent = self.failures.recent.lock().unwrap_or_else(|e| e.into_inner());
        recent.iter().cloned().collect()
    }
}

async fn run_worker(mut rx: mpsc::Receiver<SyncRecord>, sink: Arc<dyn SyncSink>, failures: Arc<FailureLog>) {
    debug!(sink = sink.name(), "Sync worker loop started");

    while let Some(record) = rx.recv().await {
        match sink.deliver(&record).await {
            Ok(()) => debug!(kind = %record.kind, reference_id = %record.reference_id, "Synced"),
            Err(error) => {
                warn!(
                    kind = %record.kind,
                    reference_id = %record.reference_id,
                    error = %error,
                    "Workspace sync failed"
                );
                failures.record(SyncFailure {
                    kind: record.kind,
                    reference_id: record.reference_id,
                    error,
                    failed_at: Utc::now(),
                });
            }
        }
    }

    debug!("Sync queue closed, worker stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::AtomicUsize;

    struct CountingSink {
        delivered: AtomicUsize,
        fail: bool,
    }

    #[async_trait]
    impl SyncSink for CountingSink {
        fn name(&self) -> &str {
            "counting"
        }

        async fn deliver(&self, _record: &SyncRecord) -> Result<(), String> {
            self.delivered.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err("boom".to_string())
            } else {
                Ok(())
            }
        }
    }

    /// Poll until `cond` holds or a second passes
    async fn wait_for(cond: impl Fn() -> bool) {
        for _ in 0..100 {
            if cond() {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    }

    fn record(n: u32) -> SyncRecord {
        SyncRecord::new("quiz_result", Some("u1".into()), n, json!({ "score": n }))
    }

    #[tokio::test]
    async fn test_records_delivered() {
        let sink = Arc::new(CountingSink {
            delivered: AtomicUsize::new(0),
            fail: false,
        });
        let queue = SyncQueue::spawn(sink.clone(), 8);
        queue.enqueue(record(1));
        queue.enqueue(record(2));

        wait_for(|| sink.delivered.load(Ordering::SeqCst) == 2).await;
        assert_eq!(sink.delivered.load(Ordering::SeqCst), 2);
        assert_eq!(queue.failure_count(), 0);
    }

    #[tokio::test]
    async fn test_failures_logged() {
        let sink = Arc::new(CountingSink {
            delivered: AtomicUsize::new(0),
            fail: true,
        });
        let queue = SyncQueue::spawn(sink, 8);
        queue.enqueue(record(7));

        wait_for(|| queue.failure_count() == 1).await;
        let failures = queue.recent_failures();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].reference_id, "7");
        assert_eq!(failures[0].error, "boom");
    }

    #[test]
    fn test_failure_log_bounded() {
        let log = FailureLog::default();
        for n in 0..(FAILURE_LOG_CAPACITY + 5) {
            log.record(SyncFailure {
                kind: "k".into(),
                reference_id: n.to_string(),
                error: "e".into(),
                failed_at: Utc::now(),
            });
        }
        let recent = log.recent.lock().unwrap();
        assert_eq!(recent.len(), FAILURE_LOG_CAPACITY);
        assert_eq!(recent.front().unwrap().reference_id, "5");
        assert_eq!(log.total.load(Ordering::Relaxed), (FAILURE_LOG_CAPACITY + 5) as u64);
    }
}
