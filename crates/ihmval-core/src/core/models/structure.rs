use serde::{Deserialize, Serialize};

pub(crate) const NOT_LISTED: &str = "Not listed";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub id: String,
    pub description: Option<String>,
}

/// One chain-level component of a modeled assembly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subunit {
    pub assembly_id: Option<String>,
    pub description: String,
    pub chain_id: String,
    pub residue_count: usize,
}

impl Subunit {
    pub fn formatted(&self) -> String {
        format!(
            "{}: chain {} ({} residues)",
            self.description, self.chain_id, self.residue_count
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dataset {
    pub id: String,
    pub data_type: String,
    pub db_name: Option<String>,
    pub access_code: Option<String>,
    pub details: Option<String>,
}

impl Dataset {
    /// Substring match against the dataset type, case as encountered.
    pub fn is_scattering(&self, marker: &str) -> bool {
        self.data_type.contains(marker)
    }

    pub fn formatted(&self) -> String {
        format!(
            "{}, {}: {}",
            self.data_type,
            self.db_name.as_deref().unwrap_or(NOT_LISTED),
            self.access_code.as_deref().unwrap_or(NOT_LISTED)
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Software {
    pub name: String,
    pub version: Option<String>,
}

impl Software {
    pub fn formatted(&self) -> String {
        match &self.version {
            Some(version) => format!("{} (version {})", self.name, version),
            None => self.name.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtocolStep {
    pub protocol_id: String,
    pub step_id: Option<String>,
    pub step_name: Option<String>,
    pub step_method: Option<String>,
    pub num_models_begin: Option<i64>,
    pub num_models_end: Option<i64>,
}

impl ProtocolStep {
    pub fn formatted(&self) -> String {
        format!(
            "{} ({})",
            self.step_name.as_deref().unwrap_or(NOT_LISTED),
            self.step_method.as_deref().unwrap_or(NOT_LISTED)
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelEntry {
    pub model_id: String,
    pub model_name: Option<String>,
    pub protocol_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelGroup {
    pub id: String,
    pub name: Option<String>,
    pub model_ids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnsembleInfo {
    pub ensemble_id: String,
    pub name: Option<String>,
    pub num_models: Option<i64>,
    pub clustering_method: Option<String>,
}

/// Ensemble and representation summary of an entry.
///
/// Every field has an identity value (`0`, `false`, empty) used when the
/// corresponding categories are absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelEnsemble {
    pub groups: Vec<ModelGroup>,
    pub ensembles: Vec<EnsembleInfo>,
    pub sphere: bool,
    pub rigid_bodies: usize,
    pub flexible_units: usize,
}
