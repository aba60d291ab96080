//! Contract types for the registry service.

use crate::models::{AssetCondition, AssetRecord};
use crate::Result;
use async_trait::async_trait;
use serde::Deserialize;

/// Acknowledgement of a write the registry service confirmed.
#[derive(Debug, Clone, Default)]
pub struct Ack {
    /// Remote status message, when the service sent one.
    pub message: Option<String>,
}

/// Server-side filters for the history listing.
///
/// All parameters are always present on the wire, empty when unset, the
/// way the service expects its query string.
#[derive(Debug, Clone, Default)]
pub struct ListFilters {
    pub unit: Option<String>,
    pub condition: Option<AssetCondition>,
    /// Free-text search across name, tag and serial.
    pub search: Option<String>,
    /// 1-based page number; 0 is treated as the first page by the service.
    pub page: u32,
}

impl ListFilters {
    pub fn page(page: u32) -> Self {
        Self {
            page,
            ..Self::default()
        }
    }

    pub(crate) fn query_pairs(&self) -> [(&'static str, String); 4] {
        [
            ("unidade", self.unit.clone().unwrap_or_default()),
            (
                "estadoBem",
                self.condition.map(|c| c.as_str().to_string()).unwrap_or_default(),
            ),
            ("busca", self.search.clone().unwrap_or_default()),
            ("pagina", self.page.max(1).to_string()),
        ]
    }
}

/// One page of the history listing.
#[derive(Debug, Clone, Deserialize)]
pub struct RecordPage {
    #[serde(rename = "registros", default)]
    pub records: Vec<AssetRecord>,
    /// Total matching records across all pages.
    #[serde(default)]
    pub total: u64,
}

/// Destination that records are delivered to.
///
/// The queue drains through this seam and the synchronizer submits through
/// it, so tests can script delivery outcomes without a network.
#[async_trait]
pub trait RecordSink: Send + Sync {
    async fn deliver(&self, record: &AssetRecord) -> Result<Ack>;
}
