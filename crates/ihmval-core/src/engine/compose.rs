use crate::core::models::entry::StructuralMetadata;
use crate::core::models::geometry::GeometryRecord;
use crate::core::models::scattering::ScatteringRecord;
use crate::core::models::structure::EnsembleInfo;
use crate::engine::config::ReportConfig;
use crate::engine::error::EngineError;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The composed report of one entry.
///
/// Field names are those expected by the downstream export templates. The
/// struct field order fixes the key order of [`ReportDocument::to_json`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportDocument {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "ID_w")]
    pub id_w: Vec<String>,
    #[serde(rename = "ID_T")]
    pub id_t: String,
    #[serde(rename = "ID_R")]
    pub id_r: Vec<String>,
    #[serde(rename = "Entry_list")]
    pub entry_list: Vec<String>,

    #[serde(rename = "Molecule")]
    pub molecule: String,
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Authors")]
    pub authors: String,

    pub number_of_molecules: usize,
    pub num_chains: f64,
    pub model_names: Vec<String>,
    pub number_of_models: usize,
    pub number_of_groups: usize,

    pub number_of_datasets: usize,
    #[serde(rename = "Datasets")]
    pub datasets: Vec<String>,
    #[serde(rename = "Data")]
    pub data: Vec<String>,

    #[serde(rename = "Subunits")]
    pub subunits: Vec<String>,
    pub number_of_subunits: usize,

    #[serde(rename = "Software")]
    pub software: Vec<String>,
    pub soft_list: Vec<String>,
    pub number_of_software: usize,

    #[serde(rename = "Protocols")]
    pub protocols: Vec<String>,
    #[serde(rename = "Protocols_number")]
    pub protocols_number: usize,

    pub sphere: u8,
    pub num_ensembles: usize,
    #[serde(rename = "Rigid_Body")]
    pub rigid_body: usize,
    #[serde(rename = "Flexible_Unit")]
    pub flexible_unit: usize,
    pub ensemble_info: Option<Vec<EnsembleInfo>>,

    pub geometry: Option<GeometryRecord>,
    pub sas: Option<ScatteringRecord>,
    pub sas_summaries: Vec<String>,
}

impl ReportDocument {
    pub fn to_json(&self) -> Result<String, EngineError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn to_map(&self) -> Result<Map<String, Value>, EngineError> {
        match serde_json::to_value(self)? {
            Value::Object(map) => Ok(map),
            other => unreachable!(
                "a struct with named fields serializes to an object, got {other}"
            ),
        }
    }
}

/// Merges the structural metadata and the optional metric sections of one
/// entry into a [`ReportDocument`].
///
/// Pure: the output depends only on the arguments, so composing twice from
/// equal inputs yields equal documents.
pub fn compose(
    metadata: &StructuralMetadata,
    geometry: Option<GeometryRecord>,
    sas: Option<ScatteringRecord>,
    config: &ReportConfig,
) -> ReportDocument {
    let entry = &metadata.entry;
    let id = entry.id.display();
    let id_t = entry.id.raw().to_string();

    let model_names = metadata
        .models
        .iter()
        .map(|m| m.model_name.clone().unwrap_or_else(|| m.model_id.clone()))
        .collect::<Vec<_>>();
    let protocols_number = metadata
        .models
        .iter()
        .filter_map(|m| m.protocol_id.as_deref())
        .unique()
        .count();

    let datasets = metadata.datasets.iter().map(|d| d.formatted()).collect::<Vec<_>>();
    let data = metadata
        .datasets
        .iter()
        .map(|d| d.data_type.clone())
        .unique()
        .collect::<Vec<_>>();
    let subunits = metadata.subunits.iter().map(|s| s.formatted()).collect::<Vec<_>>();
    let software = metadata.software.iter().map(|s| s.formatted()).collect::<Vec<_>>();
    let protocols = metadata
        .protocol_steps
        .iter()
        .map(|p| p.formatted())
        .collect::<Vec<_>>();

    let ensemble = &metadata.ensemble;
    let sas_summaries = sas
        .as_ref()
        .map(|record| record.summaries.iter().map(|s| s.code.clone()).collect())
        .unwrap_or_default();

    ReportDocument {
        id_w: vec![id.clone()],
        entry_list: vec![id.clone()],
        id,
        id_r: vec![id_t.clone()],
        id_t,

        molecule: entry
            .title
            .clone()
            .unwrap_or_else(|| config.title_placeholder.clone()),
        title: entry
            .citation_title
            .clone()
            .unwrap_or_else(|| config.title_placeholder.clone()),
        authors: entry.authors.join("; "),

        number_of_molecules: metadata.entities.len(),
        num_chains: metadata.chains.len() as f64,
        number_of_models: model_names.len(),
        model_names,
        number_of_groups: ensemble.groups.len(),

        number_of_datasets: datasets.len(),
        datasets,
        data,

        number_of_subunits: subunits.len(),
        subunits,

        number_of_software: software.len(),
        soft_list: software.clone(),
        software,

        protocols,
        protocols_number,

        sphere: u8::from(ensemble.sphere),
        num_ensembles: ensemble.ensembles.len(),
        rigid_body: ensemble.rigid_bodies,
        flexible_unit: ensemble.flexible_units,
        ensemble_info: (!ensemble.ensembles.is_empty()).then(|| ensemble.ensembles.clone()),

        geometry,
        sas,
        sas_summaries,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::entry::{Entry, EntryId};
    use crate::core::models::structure::{
        Dataset, Entity, ModelEnsemble, ModelEntry, ProtocolStep, Software, Subunit,
    };

    fn model(id: &str, name: Option<&str>, protocol: Option<&str>) -> ModelEntry {
        ModelEntry {
            model_id: id.into(),
            model_name: name.map(Into::into),
            protocol_id: protocol.map(Into::into),
        }
    }

    fn dataset(id: &str, data_type: &str, code: &str) -> Dataset {
        Dataset {
            id: id.into(),
            data_type: data_type.into(),
            db_name: Some("SASBDB".into()),
            access_code: Some(code.into()),
            details: None,
        }
    }

    fn metadata() -> StructuralMetadata {
        StructuralMetadata {
            entry: Entry {
                id: EntryId::new("PDBDEV_test"),
                title: Some("Nup84 complex".into()),
                citation_title: Some("Integrative structure of Nup84".into()),
                authors: vec!["AA B".into(), "CC D".into()],
            },
            entities: vec![
                Entity {
                    id: "1".into(),
                    description: Some("Nup84".into()),
                },
                Entity {
                    id: "2".into(),
                    description: Some("Nup85".into()),
                },
            ],
            chains: vec!["A".into(), "B".into(), "C".into()],
            subunits: vec![Subunit {
                assembly_id: Some("1".into()),
                description: "Nup84".into(),
                chain_id: "A".into(),
                residue_count: 726,
            }],
            datasets: vec![
                dataset("1", "SAS data", "SASDA12"),
                dataset("2", "CX-MS data", "PXD001"),
                dataset("3", "SAS data", "SASDB34"),
            ],
            software: vec![],
            protocol_steps: vec![ProtocolStep {
                protocol_id: "1".into(),
                step_id: Some("1".into()),
                step_name: Some("Sampling".into()),
                step_method: Some("Monte Carlo".into()),
                num_models_begin: Some(0),
                num_models_end: Some(500),
            }],
            models: vec![
                model("1", Some("Best scoring model"), Some("1")),
                model("2", None, Some("1")),
                model("3", Some("Alternate"), Some("2")),
            ],
            ensemble: ModelEnsemble::default(),
        }
    }

    fn compose_default(metadata: &StructuralMetadata) -> ReportDocument {
        compose(metadata, None, None, &ReportConfig::default())
    }

    #[test]
    fn identifier_forms_derive_from_one_id() {
        let doc = compose_default(&metadata());
        assert_eq!(doc.id, "PDBDEVtest");
        assert_eq!(doc.id_t, "PDBDEV_test");
        assert_eq!(doc.id_w, vec!["PDBDEVtest"]);
        assert_eq!(doc.id_r, vec!["PDBDEV_test"]);
        assert_eq!(doc.entry_list, doc.id_w);
    }

    #[test]
    fn authors_are_joined_in_order() {
        assert_eq!(compose_default(&metadata()).authors, "AA B; CC D");
    }

    #[test]
    fn missing_citation_uses_configured_placeholder() {
        let mut metadata = metadata();
        metadata.entry.citation_title = None;
        let config = ReportConfig {
            title_placeholder: "Untitled".into(),
            ..ReportConfig::default()
        };
        let doc = compose(&metadata, None, None, &config);
        assert_eq!(doc.title, "Untitled");
        assert_eq!(doc.molecule, "Nup84 complex");
    }

    #[test]
    fn empty_software_yields_zero_count_and_empty_list() {
        let doc = compose_default(&metadata());
        assert_eq!(doc.number_of_software, 0);
        assert!(doc.soft_list.is_empty());
        assert!(doc.software.is_empty());
    }

    #[test]
    fn software_rows_are_formatted_once_per_row() {
        let mut metadata = metadata();
        metadata.software = vec![
            Software {
                name: "IMP".into(),
                version: Some("2.8".into()),
            },
            Software {
                name: "Chimera".into(),
                version: None,
            },
        ];
        let doc = compose_default(&metadata);
        assert_eq!(doc.number_of_software, 2);
        assert_eq!(doc.soft_list, vec!["IMP (version 2.8)", "Chimera"]);
        assert_eq!(doc.software, doc.soft_list);
    }

    #[test]
    fn counts_follow_metadata() {
        let doc = compose_default(&metadata());
        assert_eq!(doc.number_of_molecules, 2);
        assert_eq!(doc.num_chains, 3.0);
        assert_eq!(
            doc.model_names,
            vec!["Best scoring model", "2", "Alternate"]
        );
        assert_eq!(doc.number_of_models, 3);
        assert_eq!(doc.protocols_number, 2);
        assert_eq!(doc.protocols, vec!["Sampling (Monte Carlo)"]);
        assert_eq!(doc.number_of_datasets, 3);
        assert_eq!(doc.data, vec!["SAS data", "CX-MS data"]);
        assert_eq!(doc.subunits, vec!["Nup84: chain A (726 residues)"]);
        assert_eq!(doc.number_of_subunits, 1);
    }

    #[test]
    fn absent_ensemble_data_takes_identity_values() {
        let doc = compose_default(&metadata());
        assert_eq!(doc.sphere, 0);
        assert_eq!(doc.num_ensembles, 0);
        assert_eq!(doc.rigid_body, 0);
        assert_eq!(doc.flexible_unit, 0);
        assert_eq!(doc.number_of_groups, 0);
        assert!(doc.ensemble_info.is_none());
        assert!(doc.geometry.is_none());
        assert!(doc.sas.is_none());
        assert!(doc.sas_summaries.is_empty());
    }

    #[test]
    fn ensemble_values_are_carried_over() {
        let mut metadata = metadata();
        metadata.ensemble = ModelEnsemble {
            groups: vec![],
            ensembles: vec![EnsembleInfo {
                ensemble_id: "1".into(),
                name: Some("Cluster 1".into()),
                num_models: Some(250),
                clustering_method: Some("Hierarchical".into()),
            }],
            sphere: true,
            rigid_bodies: 4,
            flexible_units: 2,
        };
        let doc = compose_default(&metadata);
        assert_eq!(doc.sphere, 1);
        assert_eq!(doc.num_ensembles, 1);
        assert_eq!(doc.rigid_body, 4);
        assert_eq!(doc.flexible_unit, 2);
        assert_eq!(doc.ensemble_info.unwrap()[0].num_models, Some(250));
    }

    #[test]
    fn composing_twice_yields_identical_json() {
        let metadata = metadata();
        let first = compose_default(&metadata).to_json().unwrap();
        let second = compose_default(&metadata).to_json().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn map_view_uses_export_field_names() {
        let map = compose_default(&metadata()).to_map().unwrap();
        assert_eq!(map["ID"], Value::from("PDBDEVtest"));
        assert_eq!(map["ID_R"], serde_json::json!(["PDBDEV_test"]));
        assert_eq!(map["number_of_software"], Value::from(0));
        assert_eq!(map["soft_list"], serde_json::json!([]));
        assert_eq!(map["num_chains"], Value::from(3.0));
        assert_eq!(map["sas"], Value::Null);
        assert!(map.contains_key("Protocols_number"));
        assert!(map.contains_key("Rigid_Body"));
    }
}
