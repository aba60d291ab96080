//! Registry service operations.
//!
//! All operations resolve the endpoint through the configuration store and
//! short-circuit with `NotConfigured` before any network I/O when no usable
//! URL is set. Write operations POST `{action, ...}` bodies; reads use
//! query parameters; every response travels in the
//! `{success, message?, ...}` envelope.

use crate::config::NetworkConfig;
use crate::models::{AssetRecord, Envelope};
use crate::network::{host_of, HttpClient};
use crate::registry::types::{Ack, ListFilters, RecordPage, RecordSink};
use crate::settings::EndpointStore;
use crate::{PatrimonioError, Result};
use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, warn};

const FALLBACK_INSERT: &str = "Erro desconhecido";
const FALLBACK_DELETE: &str = "Erro ao excluir";
const FALLBACK_LIST: &str = "Erro ao buscar registros";
const FALLBACK_PING: &str = "Conexão OK!";

#[derive(Serialize)]
struct InsertBody<'a> {
    action: &'static str,
    #[serde(flatten)]
    record: &'a AssetRecord,
}

#[derive(Serialize)]
struct DeleteBody<'a> {
    action: &'static str,
    unidade: &'a str,
    #[serde(rename = "rowNum")]
    row_num: u64,
}

/// Client for the registry service.
pub struct RegistryClient {
    http: HttpClient,
    settings: Arc<EndpointStore>,
}

impl RegistryClient {
    pub fn new(http: HttpClient, settings: Arc<EndpointStore>) -> Self {
        Self { http, settings }
    }

    /// Resolve the configured endpoint, or fail without touching the
    /// network.
    fn endpoint(&self) -> Result<String> {
        if !self.settings.is_configured() {
            return Err(PatrimonioError::NotConfigured);
        }
        // is_configured() implies get() is Some.
        self.settings.get().ok_or(PatrimonioError::NotConfigured)
    }

    /// Send a record for persistent storage.
    pub async fn insert(&self, record: &AssetRecord) -> Result<Ack> {
        let url = self.endpoint()?;
        debug!("Inserting record for unit '{}' at {}", record.unit, host_of(&url));

        let body = InsertBody {
            action: "insert",
            record,
        };
        let response = self.http.post_text_json(&url, &body).await?;
        let envelope: Envelope<serde_json::Value> = parse_envelope(response).await?;
        let message = envelope.into_message(FALLBACK_INSERT)?;
        Ok(Ack { message })
    }

    /// Remove a single record by unit and server-assigned row position.
    pub async fn delete(&self, unit: &str, row_num: u64) -> Result<Ack> {
        let url = self.endpoint()?;
        debug!("Deleting row {} for unit '{}' at {}", row_num, unit, host_of(&url));

        let body = DeleteBody {
            action: "delete",
            unidade: unit,
            row_num,
        };
        let response = self.http.post_text_json(&url, &body).await?;
        let envelope: Envelope<serde_json::Value> = parse_envelope(response).await?;
        let message = envelope.into_message(FALLBACK_DELETE)?;
        Ok(Ack { message })
    }

    /// Paginated, server-side filtered history read.
    pub async fn list(&self, filters: &ListFilters) -> Result<RecordPage> {
        let url = self.list_url(&self.endpoint()?, filters);
        let response = self.http.get(&url).await?;
        let envelope: Envelope<RecordPage> = parse_envelope(response).await?;
        let page = envelope.into_result(FALLBACK_LIST)?;
        debug!(
            "Listed {} of {} records (page {})",
            page.records.len(),
            page.total,
            filters.page.max(1)
        );
        Ok(page)
    }

    /// Lightweight reachability probe.
    ///
    /// Fails fast with `NotConfigured` before any I/O when no usable URL is
    /// set.
    pub async fn ping(&self) -> Result<String> {
        let url = format!("{}?ping=1", self.endpoint()?);
        let response = self
            .http
            .get_with_timeout(&url, NetworkConfig::PING_TIMEOUT)
            .await?;
        let envelope: Envelope<serde_json::Value> = parse_envelope(response).await?;
        let message = envelope.into_message(FALLBACK_PING)?;
        Ok(message.unwrap_or_else(|| FALLBACK_PING.to_string()))
    }

    fn list_url(&self, endpoint: &str, filters: &ListFilters) -> String {
        let pairs = filters.query_pairs();
        let query: Vec<String> = pairs
            .iter()
            .map(|(key, value)| format!("{}={}", key, urlencoding::encode(value)))
            .collect();
        format!("{}?{}", endpoint, query.join("&"))
    }
}

/// Deserialize a response body into the envelope, distinguishing decode
/// failures from transport failures.
async fn parse_envelope<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<Envelope<T>> {
    let status = response.status();
    let text = response.text().await.map_err(PatrimonioError::from)?;
    serde_json::from_str(&text).map_err(|e| {
        warn!("Unparseable registry response (HTTP {}): {}", status, e);
        PatrimonioError::Json {
            message: format!("Invalid registry response (HTTP {}): {}", status, e),
            source: Some(e),
        }
    })
}

#[async_trait]
impl RecordSink for RegistryClient {
    async fn deliver(&self, record: &AssetRecord) -> Result<Ack> {
        self.insert(record).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AssetCondition, Coordinator};
    use tempfile::TempDir;

    fn client_with_endpoint(url: Option<&str>) -> (RegistryClient, TempDir) {
        let tmp = TempDir::new().unwrap();
        let settings = Arc::new(EndpointStore::new(tmp.path()));
        if let Some(url) = url {
            settings.set(url).unwrap();
        }
        let client = RegistryClient::new(HttpClient::new().unwrap(), settings);
        (client, tmp)
    }

    fn record() -> AssetRecord {
        let mut record = AssetRecord::new(
            "Unidade Centro",
            "001234",
            "Cadeira Giratória",
            AssetCondition::New,
        );
        record.coordinators.push(Coordinator::new("123456", "Maria Souza"));
        record
    }

    #[test]
    fn test_insert_body_shape() {
        let record = record();
        let body = InsertBody {
            action: "insert",
            record: &record,
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["action"], "insert");
        assert_eq!(value["unidade"], "Unidade Centro");
        assert_eq!(value["estadoBem"], "Novo");
    }

    #[test]
    fn test_delete_body_shape() {
        let body = DeleteBody {
            action: "delete",
            unidade: "Unidade Centro",
            row_num: 42,
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["action"], "delete");
        assert_eq!(value["unidade"], "Unidade Centro");
        assert_eq!(value["rowNum"], 42);
    }

    #[test]
    fn test_list_url_encodes_filters() {
        let (client, _tmp) = client_with_endpoint(None);
        let filters = ListFilters {
            unit: Some("Unidade Centro".into()),
            condition: Some(AssetCondition::NeedsRepair),
            search: None,
            page: 2,
        };
        let url = client.list_url("https://r.example/exec", &filters);
        assert_eq!(
            url,
            "https://r.example/exec?unidade=Unidade%20Centro&estadoBem=Precisa%20de%20Reparo&busca=&pagina=2"
        );
    }

    #[tokio::test]
    async fn test_unconfigured_short_circuits_without_io() {
        let (client, _tmp) = client_with_endpoint(None);

        assert!(matches!(
            client.ping().await,
            Err(PatrimonioError::NotConfigured)
        ));
        assert!(matches!(
            client.insert(&record()).await,
            Err(PatrimonioError::NotConfigured)
        ));
        assert!(matches!(
            client.delete("Unidade Centro", 1).await,
            Err(PatrimonioError::NotConfigured)
        ));
        assert!(matches!(
            client.list(&ListFilters::default()).await,
            Err(PatrimonioError::NotConfigured)
        ));
    }

    #[tokio::test]
    async fn test_placeholder_endpoint_short_circuits() {
        let (client, _tmp) =
            client_with_endpoint(Some("https://script.google.com/macros/s/SEU_ID/exec"));
        assert!(matches!(
            client.ping().await,
            Err(PatrimonioError::NotConfigured)
        ));
    }
}
