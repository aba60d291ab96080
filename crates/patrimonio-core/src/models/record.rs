//! Asset record types and validation.
//!
//! Field names follow the crate's English naming; the serde renames carry
//! the Portuguese spreadsheet column keys the registry service expects.

use crate::{PatrimonioError, Result};
use serde::{Deserialize, Serialize};

/// Physical condition of an asset. Exactly one is recorded per entry.
///
/// The wire values are the spreadsheet's canonical labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssetCondition {
    #[serde(rename = "Novo")]
    New,
    #[serde(rename = "Semi-Novo")]
    LikeNew,
    #[serde(rename = "Precisa de Reparo")]
    NeedsRepair,
    #[serde(rename = "Precisa de Grandes Reparos")]
    NeedsMajorRepair,
    #[serde(rename = "Inservível")]
    Unusable,
}

impl AssetCondition {
    pub const ALL: [AssetCondition; 5] = [
        AssetCondition::New,
        AssetCondition::LikeNew,
        AssetCondition::NeedsRepair,
        AssetCondition::NeedsMajorRepair,
        AssetCondition::Unusable,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AssetCondition::New => "Novo",
            AssetCondition::LikeNew => "Semi-Novo",
            AssetCondition::NeedsRepair => "Precisa de Reparo",
            AssetCondition::NeedsMajorRepair => "Precisa de Grandes Reparos",
            AssetCondition::Unusable => "Inservível",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|c| c.as_str() == s)
    }
}

impl std::fmt::Display for AssetCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A coordinator present at registration time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coordinator {
    /// Staff registration number.
    #[serde(rename = "matricula", default)]
    pub registration: String,
    #[serde(rename = "nome", default)]
    pub name: String,
    /// Role or position; optional.
    #[serde(rename = "funcao", default)]
    pub role: String,
}

impl Coordinator {
    pub fn new(registration: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            registration: registration.into(),
            name: name.into(),
            role: String::new(),
        }
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = role.into();
        self
    }

    fn is_identified(&self) -> bool {
        !self.registration.trim().is_empty() && !self.name.trim().is_empty()
    }
}

/// One physical asset entry.
///
/// `row_num` is assigned by the registry service on read and is never sent
/// on write; everything else is caller-supplied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetRecord {
    /// Facility location the asset belongs to.
    #[serde(rename = "unidade")]
    pub unit: String,
    /// Physical tag number affixed to the asset.
    #[serde(rename = "plaquetaFisica")]
    pub asset_tag: String,
    #[serde(rename = "nomeBem")]
    pub name: String,
    #[serde(rename = "descricaoBem", default)]
    pub description: String,
    #[serde(rename = "marcaBem", default)]
    pub brand: String,
    #[serde(rename = "numeroSerie", default)]
    pub serial_number: String,
    #[serde(rename = "estadoBem")]
    pub condition: AssetCondition,
    #[serde(rename = "coordenadores", default)]
    pub coordinators: Vec<Coordinator>,
    /// Opaque photo blob reference (base64 data URL). Omitted from the wire
    /// body when absent.
    #[serde(rename = "foto", default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
    /// Spreadsheet row position, present only on records read back from the
    /// registry service.
    #[serde(rename = "_rowNum", default, skip_serializing_if = "Option::is_none")]
    pub row_num: Option<u64>,
}

impl AssetRecord {
    /// Create a record with the required fields; optional fields start
    /// empty.
    pub fn new(
        unit: impl Into<String>,
        asset_tag: impl Into<String>,
        name: impl Into<String>,
        condition: AssetCondition,
    ) -> Self {
        Self {
            unit: unit.into(),
            asset_tag: asset_tag.into(),
            name: name.into(),
            description: String::new(),
            brand: String::new(),
            serial_number: String::new(),
            condition,
            coordinators: Vec::new(),
            photo: None,
            row_num: None,
        }
    }

    /// Check the required-field rules before a record is routed anywhere.
    ///
    /// Returns the first violation: unit, tag and name must be non-empty,
    /// and at least one coordinator must carry both registration and name.
    pub fn validate(&self) -> Result<()> {
        if self.unit.trim().is_empty() {
            return Err(PatrimonioError::validation("unidade", "unit is required"));
        }
        if self.asset_tag.trim().is_empty() {
            return Err(PatrimonioError::validation(
                "plaquetaFisica",
                "asset tag is required",
            ));
        }
        if self.name.trim().is_empty() {
            return Err(PatrimonioError::validation("nomeBem", "name is required"));
        }
        if !self.coordinators.iter().any(Coordinator::is_identified) {
            return Err(PatrimonioError::validation(
                "coordenadores",
                "at least one coordinator with registration and name is required",
            ));
        }
        Ok(())
    }
}
