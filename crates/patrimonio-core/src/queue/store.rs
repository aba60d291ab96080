//! Queue persistence.
//!
//! The pending submissions are persisted to a JSON file so the queue
//! survives process restarts. An unreadable or corrupt file loads as an
//! empty queue rather than blocking registration in the field.

use crate::config::PathsConfig;
use crate::queue::QueuedSubmission;
use crate::storage;
use crate::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// All persisted submissions (the JSON root object).
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct QueueData {
    submissions: Vec<QueuedSubmission>,
}

/// Manages queue persistence to `queue.json`.
pub struct QueueStore {
    path: PathBuf,
}

impl QueueStore {
    /// Create a store at `{data_dir}/queue.json`.
    pub fn new(data_dir: &Path) -> Self {
        Self {
            path: data_dir.join(PathsConfig::QUEUE_FILENAME),
        }
    }

    /// Load all persisted submissions, in their persisted order.
    pub fn load_all(&self) -> Vec<QueuedSubmission> {
        match storage::read_json::<QueueData>(&self.path) {
            Ok(Some(data)) => data.submissions,
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!("Failed to read queue store at {}: {}", self.path.display(), e);
                Vec::new()
            }
        }
    }

    /// Persist the full queue state atomically.
    pub fn write_all(&self, submissions: &[QueuedSubmission]) -> Result<()> {
        debug!(
            "Writing {} pending submissions to {}",
            submissions.len(),
            self.path.display()
        );
        storage::write_json(
            &self.path,
            &QueueData {
                submissions: submissions.to_vec(),
            },
        )
    }
}
