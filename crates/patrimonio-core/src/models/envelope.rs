//! Registry service response envelope.
//!
//! Every registry response carries `{success, message?, ...payload}` with
//! the payload fields flattened beside the envelope fields.

use crate::{PatrimonioError, Result};
use serde::Deserialize;

/// Generic response envelope with the payload flattened into it.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(flatten)]
    pub payload: Option<T>,
}

impl<T> Envelope<T> {
    /// Convert into the payload, mapping `success: false` to a `Service`
    /// error carrying the remote message, or `fallback` when the remote
    /// sent none.
    pub fn into_result(self, fallback: &str) -> Result<T> {
        if !self.success {
            return Err(PatrimonioError::Service {
                message: self.message.unwrap_or_else(|| fallback.to_string()),
            });
        }
        self.payload.ok_or_else(|| PatrimonioError::Json {
            message: "response envelope is missing its payload".to_string(),
            source: None,
        })
    }

    /// Convert into the remote message for payload-less acknowledgements.
    pub fn into_message(self, fallback: &str) -> Result<Option<String>> {
        if !self.success {
            return Err(PatrimonioError::Service {
                message: self.message.unwrap_or_else(|| fallback.to_string()),
            });
        }
        Ok(self.message)
    }
}
