//! Patrimonio Core - Headless library for offline-first asset inventory
//! registration.
//!
//! This crate owns the durable pieces of the registration flow: the
//! endpoint configuration slot, the offline submission queue, the client
//! for the spreadsheet-backed registry service, and the dispatch policy
//! between them. It can be embedded by any host (mobile shell, CLI,
//! desktop) without an HTTP/UI layer of its own.
//!
//! # Example
//!
//! ```rust,ignore
//! use patrimonio_core::{AssetCondition, AssetRecord, Coordinator, PatrimonioApi};
//!
//! #[tokio::main]
//! async fn main() -> patrimonio_core::Result<()> {
//!     let api = PatrimonioApi::new("/path/to/data")?;
//!     api.set_endpoint("https://script.google.com/macros/s/ABC123/exec")?;
//!
//!     let mut record = AssetRecord::new(
//!         "Unidade Centro",
//!         "001234",
//!         "Cadeira Giratória",
//!         AssetCondition::New,
//!     );
//!     record.coordinators.push(Coordinator::new("123456", "Maria Souza"));
//!
//!     // Routed live or into the offline queue by the connectivity signal.
//!     let outcome = api.submit(record).await?;
//!     println!("{}", outcome);
//!
//!     // Later, on reconnect:
//!     api.connectivity().set_online(true);
//!     let report = api.sync_pending().await?;
//!     println!("{} synced, {} still pending", report.synced, report.failed);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod models;
pub mod network;
pub mod queue;
pub mod registry;
pub mod settings;
pub mod storage;
pub mod sync;

// Re-export commonly used types
pub use error::{PatrimonioError, Result};
pub use models::{AssetCondition, AssetRecord, Coordinator};
pub use network::{ConnectivitySignal, SharedConnectivity};
pub use queue::{DrainReport, OfflineQueue, QueuedSubmission};
pub use registry::{Ack, ListFilters, RecordPage, RegistryClient};
pub use settings::EndpointStore;
pub use sync::{BatchItem, BatchReport, SubmitOutcome, SyncManager};

use network::HttpClient;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Main API struct for inventory operations.
///
/// This is the primary entry point for programmatic access. It wires the
/// endpoint store, offline queue, registry client and synchronizer over a
/// single data directory and exposes their public contracts.
pub struct PatrimonioApi {
    data_dir: PathBuf,
    settings: Arc<EndpointStore>,
    queue: Arc<OfflineQueue>,
    client: Arc<RegistryClient>,
    sync: SyncManager,
    connectivity: Arc<SharedConnectivity>,
}

/// Builder for [`PatrimonioApi`].
pub struct PatrimonioApiBuilder {
    data_dir: PathBuf,
    request_timeout: Duration,
    initially_online: bool,
}

impl PatrimonioApiBuilder {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            request_timeout: config::NetworkConfig::REQUEST_TIMEOUT,
            initially_online: true,
        }
    }

    /// Override the transport timeout for registry requests.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Set the initial connectivity state. Hosts should keep the signal
    /// current through [`PatrimonioApi::connectivity`].
    pub fn initially_online(mut self, online: bool) -> Self {
        self.initially_online = online;
        self
    }

    pub fn build(self) -> Result<PatrimonioApi> {
        let settings = Arc::new(EndpointStore::new(&self.data_dir));
        let queue = Arc::new(OfflineQueue::open(&self.data_dir));
        let client = Arc::new(RegistryClient::new(
            HttpClient::with_timeout(self.request_timeout)?,
            settings.clone(),
        ));
        let connectivity = SharedConnectivity::new(self.initially_online);
        let sync = SyncManager::new(queue.clone(), client.clone(), connectivity.clone());

        Ok(PatrimonioApi {
            data_dir: self.data_dir,
            settings,
            queue,
            client,
            sync,
            connectivity,
        })
    }
}

impl PatrimonioApi {
    /// Create an API instance over `data_dir` with default options.
    ///
    /// The directory holds the persisted endpoint slot and the offline
    /// queue; it is created on first write.
    pub fn new(data_dir: impl Into<PathBuf>) -> Result<Self> {
        Self::builder(data_dir).build()
    }

    /// Create a builder for more control over initialization.
    pub fn builder(data_dir: impl Into<PathBuf>) -> PatrimonioApiBuilder {
        PatrimonioApiBuilder::new(data_dir)
    }

    /// The data directory this instance persists into.
    pub fn data_dir(&self) -> &PathBuf {
        &self.data_dir
    }

    // === Endpoint configuration ===

    /// The configured endpoint URL, if any.
    pub fn endpoint(&self) -> Option<String> {
        self.settings.get()
    }

    pub fn set_endpoint(&self, url: &str) -> Result<()> {
        self.settings.set(url)
    }

    pub fn clear_endpoint(&self) -> Result<()> {
        self.settings.clear()
    }

    pub fn is_configured(&self) -> bool {
        self.settings.is_configured()
    }

    // === Submission ===

    /// Submit one record through the dispatch policy.
    pub async fn submit(&self, record: AssetRecord) -> Result<SubmitOutcome> {
        self.sync.submit(record).await
    }

    /// Register a batch of items sharing the base record's fields.
    pub async fn submit_batch(
        &self,
        base: &AssetRecord,
        items: &[BatchItem],
    ) -> Result<BatchReport> {
        self.sync.submit_batch(base, items).await
    }

    /// Attempt delivery for all pending submissions.
    pub async fn sync_pending(&self) -> Result<DrainReport> {
        self.sync.sync_pending().await
    }

    /// Count of submissions awaiting delivery.
    pub fn pending_count(&self) -> usize {
        self.queue.len()
    }

    /// Register a queue-count observer (e.g. a badge indicator).
    pub fn on_queue_change(&self, listener: impl Fn(usize) + Send + Sync + 'static) {
        self.queue.subscribe(listener);
    }

    // === History ===

    /// Paginated, server-side filtered history read.
    pub async fn list_records(&self, filters: &ListFilters) -> Result<RecordPage> {
        self.client.list(filters).await
    }

    /// Remove a single record by unit and server-assigned row position.
    pub async fn delete_record(&self, unit: &str, row_num: u64) -> Result<Ack> {
        self.client.delete(unit, row_num).await
    }

    // === Connectivity ===

    /// The shared connectivity signal. Hosts flip it from their platform's
    /// online/offline events.
    pub fn connectivity(&self) -> &Arc<SharedConnectivity> {
        &self.connectivity
    }

    /// Probe the registry service. Fails fast with `NotConfigured` when no
    /// usable endpoint is set, without touching the network.
    pub async fn test_connection(&self) -> Result<String> {
        self.client.ping().await
    }
}
