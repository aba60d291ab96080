//! Offline submission queue.
//!
//! A durable FIFO of asset records awaiting delivery to the registry
//! service. Submissions enter when a record is registered without
//! connectivity and leave only after the service confirms receipt; a
//! partial drain never reorders or drops what remains.

mod store;

pub use store::QueueStore;

use crate::models::AssetRecord;
use crate::registry::RecordSink;
use crate::Result;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex as StdMutex;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// An asset record plus its queueing metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueuedSubmission {
    /// Locally-unique identifier.
    pub id: String,
    /// Enqueue time, RFC 3339 UTC.
    pub queued_at: String,
    pub record: AssetRecord,
}

impl QueuedSubmission {
    pub fn new(record: AssetRecord) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            queued_at: Utc::now().to_rfc3339(),
            record,
        }
    }
}

/// Outcome of one drain pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DrainReport {
    /// Items the service confirmed and that were removed from the queue.
    pub synced: usize,
    /// Items that failed delivery and remain queued.
    pub failed: usize,
}

type QueueListener = Box<dyn Fn(usize) + Send + Sync>;

/// Durable FIFO queue of pending submissions.
///
/// All mutating operations serialize on an internal async mutex; the
/// pending count is cached in an atomic so badge consumers can read it
/// without locking.
pub struct OfflineQueue {
    store: QueueStore,
    items: Mutex<Vec<QueuedSubmission>>,
    len: AtomicUsize,
    listeners: StdMutex<Vec<QueueListener>>,
}

impl OfflineQueue {
    /// Open the queue backed by `{data_dir}/queue.json`, restoring any
    /// submissions persisted by a previous run.
    pub fn open(data_dir: &Path) -> Self {
        let store = QueueStore::new(data_dir);
        let items = store.load_all();
        if !items.is_empty() {
            info!("Restored {} pending submissions from disk", items.len());
        }
        let len = AtomicUsize::new(items.len());
        Self {
            store,
            items: Mutex::new(items),
            len,
            listeners: StdMutex::new(Vec::new()),
        }
    }

    /// Current pending count.
    pub fn len(&self) -> usize {
        self.len.load(Ordering::SeqCst)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Register an observer invoked with the current count on every queue
    /// mutation. The callback fires on the mutating task; keep it cheap.
    pub fn subscribe(&self, listener: impl Fn(usize) + Send + Sync + 'static) {
        self.listeners
            .lock()
            .expect("queue listener lock poisoned")
            .push(Box::new(listener));
    }

    fn notify(&self, count: usize) {
        let listeners = self
            .listeners
            .lock()
            .expect("queue listener lock poisoned");
        for listener in listeners.iter() {
            listener(count);
        }
    }

    /// Append a record with a fresh id and timestamp, persist it, and
    /// notify subscribers with the new count.
    ///
    /// A persistence failure is surfaced as `Storage` and the in-memory
    /// queue is left unchanged: a submission the caller believes queued is
    /// never silently volatile.
    pub async fn enqueue(&self, record: AssetRecord) -> Result<()> {
        let mut items = self.items.lock().await;
        let submission = QueuedSubmission::new(record);
        debug!("Enqueueing submission {}", submission.id);

        items.push(submission);
        if let Err(e) = self.store.write_all(&items) {
            items.pop();
            return Err(e);
        }

        let count = items.len();
        self.len.store(count, Ordering::SeqCst);
        drop(items);
        self.notify(count);
        Ok(())
    }

    /// Attempt delivery for every queued item once, in FIFO order.
    ///
    /// Each item is awaited before the next is attempted. Confirmed items
    /// are removed, and the removal is persisted only after the
    /// confirmation, so a crash in between re-delivers rather than
    /// loses. Failed items stay queued in their original
    /// relative order for the next drain. An empty queue returns
    /// `{synced: 0, failed: 0}` without touching the sink.
    pub async fn drain(&self, sink: &dyn RecordSink) -> Result<DrainReport> {
        let mut items = self.items.lock().await;
        if items.is_empty() {
            return Ok(DrainReport::default());
        }

        let pending = std::mem::take(&mut *items);
        let total = pending.len();
        let mut kept: Vec<QueuedSubmission> = Vec::new();
        let mut synced = 0usize;
        let mut remaining = pending.into_iter();

        while let Some(submission) = remaining.next() {
            match sink.deliver(&submission.record).await {
                Ok(_) => {
                    synced += 1;
                    // Commit the removal now that receipt is confirmed.
                    let snapshot: Vec<QueuedSubmission> =
                        kept.iter().cloned().chain(remaining.clone()).collect();
                    if let Err(e) = self.store.write_all(&snapshot) {
                        warn!("Failed to persist queue removal: {}", e);
                        *items = snapshot;
                        self.len.store(items.len(), Ordering::SeqCst);
                        let count = items.len();
                        drop(items);
                        self.notify(count);
                        return Err(e);
                    }
                }
                Err(e) => {
                    debug!("Submission {} failed delivery: {}", submission.id, e);
                    kept.push(submission);
                }
            }
        }

        let failed = kept.len();
        *items = kept;
        self.len.store(failed, Ordering::SeqCst);
        drop(items);

        info!("Drain complete: {} synced, {} failed", synced, failed);
        if synced > 0 {
            self.notify(failed);
        }
        debug_assert_eq!(synced + failed, total);
        Ok(DrainReport { synced, failed })
    }

    /// Snapshot of the pending submissions, oldest first.
    pub async fn pending(&self) -> Vec<QueuedSubmission> {
        self.items.lock().await.clone()
    }
}
