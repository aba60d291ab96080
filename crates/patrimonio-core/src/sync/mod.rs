//! Submission dispatch and queue synchronization.
//!
//! The dispatch policy per submission: check the connectivity signal
//! first. Offline routes straight to the durable queue and never touches
//! the network; online delivers live and surfaces any failure to the
//! caller. A live attempt that errors is NOT requeued automatically:
//! routing is decided only by the precheck, never by inspecting the error
//! afterwards, so a server-side rejection is never misfiled as an offline
//! case.

use crate::models::AssetRecord;
use crate::network::ConnectivitySignal;
use crate::queue::{DrainReport, OfflineQueue};
use crate::registry::{Ack, RecordSink};
use crate::Result;
use std::sync::Arc;
use tracing::{debug, info};

/// Outcome of a single submission.
#[derive(Debug, Clone)]
pub enum SubmitOutcome {
    /// The registry service confirmed receipt.
    Delivered(Ack),
    /// No connectivity; the record is durably queued for a later sync.
    Queued,
}

impl SubmitOutcome {
    pub fn is_queued(&self) -> bool {
        matches!(self, SubmitOutcome::Queued)
    }
}

impl std::fmt::Display for SubmitOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubmitOutcome::Delivered(_) => write!(f, "Registro salvo com sucesso!"),
            SubmitOutcome::Queued => write!(f, "Salvo na fila! Será enviado ao reconectar."),
        }
    }
}

/// Per-item fields of a batch registration. Everything else is shared
/// from the base record.
#[derive(Debug, Clone, Default)]
pub struct BatchItem {
    pub asset_tag: String,
    pub serial_number: String,
}

/// Outcome counts of a batch registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BatchReport {
    pub delivered: usize,
    pub queued: usize,
}

/// Dispatches submissions between live delivery and the offline queue,
/// and drains the queue on demand.
pub struct SyncManager {
    queue: Arc<OfflineQueue>,
    sink: Arc<dyn RecordSink>,
    connectivity: Arc<dyn ConnectivitySignal>,
}

impl SyncManager {
    pub fn new(
        queue: Arc<OfflineQueue>,
        sink: Arc<dyn RecordSink>,
        connectivity: Arc<dyn ConnectivitySignal>,
    ) -> Self {
        Self {
            queue,
            sink,
            connectivity,
        }
    }

    /// Submit one record.
    ///
    /// Validates, then routes by the connectivity precheck: offline
    /// enqueues (infallible barring storage exhaustion, which surfaces as
    /// `Storage`); online delivers live, surfacing any error (including
    /// transport errors) to the caller, who decides whether to retry or
    /// queue.
    pub async fn submit(&self, record: AssetRecord) -> Result<SubmitOutcome> {
        record.validate()?;

        if !self.connectivity.is_online() {
            debug!("Offline: queueing submission for unit '{}'", record.unit);
            self.queue.enqueue(record).await?;
            return Ok(SubmitOutcome::Queued);
        }

        let ack = self.sink.deliver(&record).await?;
        Ok(SubmitOutcome::Delivered(ack))
    }

    /// Register a batch of items sharing the base record's fields, each
    /// with its own tag and serial number, submitted one at a time in
    /// order. The first hard error aborts the batch and surfaces.
    pub async fn submit_batch(
        &self,
        base: &AssetRecord,
        items: &[BatchItem],
    ) -> Result<BatchReport> {
        let mut report = BatchReport::default();
        for item in items {
            let mut record = base.clone();
            record.asset_tag = item.asset_tag.clone();
            record.serial_number = item.serial_number.clone();

            match self.submit(record).await? {
                SubmitOutcome::Delivered(_) => report.delivered += 1,
                SubmitOutcome::Queued => report.queued += 1,
            }
        }
        info!(
            "Batch complete: {} delivered, {} queued",
            report.delivered, report.queued
        );
        Ok(report)
    }

    /// Attempt delivery for everything pending.
    ///
    /// A no-op without connectivity or with an empty queue. Failed items
    /// remain queued for the next call; there is no automatic backoff or
    /// scheduling, sync stays caller-initiated (an explicit user action or
    /// a reconnect event).
    pub async fn sync_pending(&self) -> Result<DrainReport> {
        if !self.connectivity.is_online() {
            debug!("Offline: skipping sync of {} pending submissions", self.queue.len());
            return Ok(DrainReport::default());
        }
        self.queue.drain(self.sink.as_ref()).await
    }

    /// Current pending count.
    pub fn pending_count(&self) -> usize {
        self.queue.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AssetCondition, Coordinator};
    use crate::network::SharedConnectivity;
    use crate::PatrimonioError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use tempfile::TempDir;

    fn record(tag: &str) -> AssetRecord {
        let mut record = AssetRecord::new(
            "Unidade Centro",
            tag,
            "Projetor Multimídia",
            AssetCondition::New,
        );
        record.coordinators.push(Coordinator::new("123456", "Maria Souza"));
        record
    }

    /// Sink that counts calls and answers from a script.
    struct ScriptedSink {
        calls: AtomicUsize,
        responses: Mutex<Vec<Result<Ack>>>,
    }

    impl ScriptedSink {
        fn always_ok() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                responses: Mutex::new(Vec::new()),
            }
        }

        fn scripted(responses: Vec<Result<Ack>>) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                responses: Mutex::new(responses),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl RecordSink for ScriptedSink {
        async fn deliver(&self, _record: &AssetRecord) -> Result<Ack> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let mut responses = self.responses.lock().unwrap();
            if responses.is_empty() {
                Ok(Ack::default())
            } else {
                responses.remove(0)
            }
        }
    }

    fn manager(
        tmp: &TempDir,
        sink: Arc<ScriptedSink>,
        online: bool,
    ) -> (SyncManager, Arc<OfflineQueue>, Arc<SharedConnectivity>) {
        let queue = Arc::new(OfflineQueue::open(tmp.path()));
        let connectivity = SharedConnectivity::new(online);
        let manager = SyncManager::new(queue.clone(), sink, connectivity.clone());
        (manager, queue, connectivity)
    }

    #[tokio::test]
    async fn test_offline_submit_never_touches_network() {
        let tmp = TempDir::new().unwrap();
        let sink = Arc::new(ScriptedSink::always_ok());
        let (manager, queue, _) = manager(&tmp, sink.clone(), false);

        let outcome = manager.submit(record("001")).await.unwrap();
        assert!(outcome.is_queued());
        assert_eq!(sink.calls(), 0);
        assert_eq!(queue.len(), 1);
    }

    #[tokio::test]
    async fn test_online_submit_delivers() {
        let tmp = TempDir::new().unwrap();
        let sink = Arc::new(ScriptedSink::always_ok());
        let (manager, queue, _) = manager(&tmp, sink.clone(), true);

        let outcome = manager.submit(record("001")).await.unwrap();
        assert!(matches!(outcome, SubmitOutcome::Delivered(_)));
        assert_eq!(sink.calls(), 1);
        assert_eq!(queue.len(), 0);
    }

    #[tokio::test]
    async fn test_service_error_surfaces_without_requeue() {
        let tmp = TempDir::new().unwrap();
        let sink = Arc::new(ScriptedSink::scripted(vec![Err(PatrimonioError::Service {
            message: "Erro desconhecido".into(),
        })]));
        let (manager, queue, _) = manager(&tmp, sink, true);

        let err = manager.submit(record("001")).await.unwrap_err();
        assert!(matches!(
            err,
            PatrimonioError::Service { message } if message == "Erro desconhecido"
        ));
        // The queue is untouched: a live failure is never misfiled as
        // an offline case.
        assert_eq!(queue.len(), 0);
    }

    #[tokio::test]
    async fn test_network_error_during_live_attempt_also_surfaces() {
        let tmp = TempDir::new().unwrap();
        let sink = Arc::new(ScriptedSink::scripted(vec![Err(PatrimonioError::Network {
            message: "connection reset".into(),
            source: None,
        })]));
        let (manager, queue, _) = manager(&tmp, sink, true);

        let err = manager.submit(record("001")).await.unwrap_err();
        assert!(err.is_retryable());
        assert_eq!(queue.len(), 0);
    }

    #[tokio::test]
    async fn test_invalid_record_fails_before_routing() {
        let tmp = TempDir::new().unwrap();
        let sink = Arc::new(ScriptedSink::always_ok());
        let (manager, queue, _) = manager(&tmp, sink.clone(), false);

        let mut bad = record("001");
        bad.coordinators.clear();
        let err = manager.submit(bad).await.unwrap_err();
        assert!(matches!(err, PatrimonioError::Validation { .. }));
        assert_eq!(queue.len(), 0);
        assert_eq!(sink.calls(), 0);
    }

    #[tokio::test]
    async fn test_sync_pending_offline_is_noop() {
        let tmp = TempDir::new().unwrap();
        let sink = Arc::new(ScriptedSink::always_ok());
        let (manager, _, connectivity) = manager(&tmp, sink.clone(), false);

        manager.submit(record("001")).await.unwrap();
        let report = manager.sync_pending().await.unwrap();
        assert_eq!(report, DrainReport::default());
        assert_eq!(sink.calls(), 0);

        connectivity.set_online(true);
        let report = manager.sync_pending().await.unwrap();
        assert_eq!(report, DrainReport { synced: 1, failed: 0 });
        assert_eq!(manager.pending_count(), 0);
    }

    #[tokio::test]
    async fn test_sync_pending_empty_queue_is_noop_regardless_of_connectivity() {
        let tmp = TempDir::new().unwrap();
        let sink = Arc::new(ScriptedSink::always_ok());
        let (manager, _, _) = manager(&tmp, sink.clone(), true);

        let report = manager.sync_pending().await.unwrap();
        assert_eq!(report, DrainReport { synced: 0, failed: 0 });
        assert_eq!(sink.calls(), 0);
    }

    #[tokio::test]
    async fn test_batch_counts_delivered_and_queued() {
        let tmp = TempDir::new().unwrap();
        let sink = Arc::new(ScriptedSink::always_ok());
        let (manager, queue, connectivity) = manager(&tmp, sink, true);

        let base = record("");
        let items = vec![
            BatchItem { asset_tag: "001".into(), serial_number: "SN-1".into() },
            BatchItem { asset_tag: "002".into(), serial_number: "SN-2".into() },
            BatchItem { asset_tag: "003".into(), serial_number: "SN-3".into() },
        ];

        // Connectivity drops after the first item.
        let report = manager.submit_batch(&base, &items[..1]).await.unwrap();
        assert_eq!(report, BatchReport { delivered: 1, queued: 0 });

        connectivity.set_online(false);
        let report = manager.submit_batch(&base, &items[1..]).await.unwrap();
        assert_eq!(report, BatchReport { delivered: 0, queued: 2 });

        let pending = queue.pending().await;
        assert_eq!(pending.len(), 2);
        assert_eq!(pending[0].record.asset_tag, "002");
        assert_eq!(pending[0].record.serial_number, "SN-2");
    }

    #[test]
    fn test_outcome_statuses_are_distinct() {
        let delivered = SubmitOutcome::Delivered(Ack::default()).to_string();
        let queued = SubmitOutcome::Queued.to_string();
        assert_ne!(delivered, queued);
        assert!(!delivered.is_empty());
        assert!(!queued.is_empty());
    }
}
