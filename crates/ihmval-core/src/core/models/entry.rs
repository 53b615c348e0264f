use super::structure::{Dataset, Entity, ModelEnsemble, ModelEntry, ProtocolStep, Software, Subunit};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Canonical entry identifier.
///
/// Every identifier form used in a report is derived from this one value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntryId(String);

impl EntryId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn raw(&self) -> &str {
        &self.0
    }

    /// The identifier with underscores removed, e.g. `PDBDEV_test` -> `PDBDEVtest`.
    pub fn display(&self) -> String {
        self.0.replace('_', "")
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identity and citation data of an entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub id: EntryId,
    /// `_struct.title`.
    pub title: Option<String>,
    /// Title of the first citation.
    pub citation_title: Option<String>,
    /// Author names in ordinal order.
    pub authors: Vec<String>,
}

/// Per-entry values shared by every normalizer.
///
/// Built once by the extractor and passed by reference, so that no analysis
/// step re-derives the identifier, model count or dataset table.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryContext {
    pub id: EntryId,
    pub model_count: usize,
    pub datasets: Vec<Dataset>,
}

/// The structural sub-document extracted from one mmCIF file.
#[derive(Debug, Clone, PartialEq)]
pub struct StructuralMetadata {
    pub entry: Entry,
    pub entities: Vec<Entity>,
    /// Distinct asym ids, in first-seen order.
    pub chains: Vec<String>,
    pub subunits: Vec<Subunit>,
    pub datasets: Vec<Dataset>,
    pub software: Vec<Software>,
    pub protocol_steps: Vec<ProtocolStep>,
    pub models: Vec<ModelEntry>,
    pub ensemble: ModelEnsemble,
}

impl StructuralMetadata {
    pub fn context(&self) -> EntryContext {
        EntryContext {
            id: self.entry.id.clone(),
            model_count: self.models.len(),
            datasets: self.datasets.clone(),
        }
    }
}
