//! Shapes parsed mmCIF categories into the typed structural sub-document.
//!
//! Absent or empty optional categories yield their identity value (empty
//! list, `0`, `None`). Only `_entry` is mandatory. Every category that is
//! read is length-checked across all of its columns, so a ragged loop is
//! reported as [`EngineError::MalformedCategory`] rather than silently
//! truncated.

use crate::core::io::cif::CifDocument;
use crate::core::models::entry::{Entry, EntryId, StructuralMetadata};
use crate::core::models::structure::{
    Dataset, EnsembleInfo, Entity, ModelEnsemble, ModelEntry, ModelGroup, ProtocolStep, Software,
    Subunit, NOT_LISTED,
};
use crate::engine::error::EngineError;
use itertools::Itertools;
use tracing::{debug, instrument};

type Rows<'a> = Vec<Vec<Option<&'a str>>>;

fn rows<'a>(
    doc: &'a CifDocument,
    category: &str,
    columns: &[&str],
) -> Result<Rows<'a>, EngineError> {
    match doc.category(category) {
        Some(cat) => Ok(cat.rows(columns)?),
        None => Ok(Vec::new()),
    }
}

fn owned(value: Option<&str>) -> Option<String> {
    value.map(str::to_string)
}

fn parse_int(value: Option<&str>) -> Option<i64> {
    value.and_then(|v| v.trim().parse().ok())
}

#[instrument(skip_all, name = "mmcif_extraction")]
pub fn extract(doc: &CifDocument) -> Result<StructuralMetadata, EngineError> {
    let entry = get_entry(doc)?;
    let metadata = StructuralMetadata {
        entities: read_entities(doc)?,
        chains: read_chains(doc)?,
        subunits: read_subunits(doc)?,
        datasets: read_datasets(doc)?,
        software: read_software(doc)?,
        protocol_steps: read_protocol_steps(doc)?,
        models: read_models(doc)?,
        ensemble: read_ensemble(doc)?,
        entry,
    };
    debug!(
        entry = %metadata.entry.id,
        entities = metadata.entities.len(),
        chains = metadata.chains.len(),
        datasets = metadata.datasets.len(),
        models = metadata.models.len(),
        "Structural metadata extracted."
    );
    Ok(metadata)
}

pub fn get_entry(doc: &CifDocument) -> Result<Entry, EngineError> {
    let id = rows(doc, "entry", &["id"])?
        .first()
        .and_then(|row| row[0])
        .map(EntryId::new)
        .ok_or(EngineError::MissingRequiredCategory { category: "_entry" })?;

    let title = rows(doc, "struct", &["title"])?
        .first()
        .and_then(|row| owned(row[0]));

    let citations = rows(doc, "citation", &["id", "title"])?;
    let first_citation = citations.first();
    let citation_title = first_citation.and_then(|row| owned(row[1]));
    let citation_id = first_citation.and_then(|row| row[0]);

    Ok(Entry {
        id,
        title,
        citation_title,
        authors: read_authors(doc, citation_id)?,
    })
}

/// Author names of the first citation ordered by ordinal, falling back to
/// the audit authors when the citation lists none.
fn read_authors(doc: &CifDocument, citation_id: Option<&str>) -> Result<Vec<String>, EngineError> {
    let citation_authors: Vec<(Option<i64>, String)> =
        rows(doc, "citation_author", &["citation_id", "name", "ordinal"])?
            .into_iter()
            .filter(|row| match (citation_id, row[0]) {
                (Some(wanted), Some(actual)) => wanted == actual,
                _ => true,
            })
            .filter_map(|row| Some((parse_int(row[2]), row[1]?.to_string())))
            .collect();

    let authors = if citation_authors.is_empty() {
        rows(doc, "audit_author", &["name", "pdbx_ordinal"])?
            .into_iter()
            .filter_map(|row| Some((parse_int(row[1]), row[0]?.to_string())))
            .collect()
    } else {
        citation_authors
    };

    Ok(authors
        .into_iter()
        .sorted_by_key(|(ordinal, _)| ordinal.unwrap_or(i64::MAX))
        .map(|(_, name)| name)
        .collect())
}

fn read_entities(doc: &CifDocument) -> Result<Vec<Entity>, EngineError> {
    Ok(rows(doc, "entity", &["id", "pdbx_description"])?
        .into_iter()
        .filter_map(|row| {
            Some(Entity {
                id: row[0]?.to_string(),
                description: owned(row[1]),
            })
        })
        .collect())
}

fn read_chains(doc: &CifDocument) -> Result<Vec<String>, EngineError> {
    Ok(rows(doc, "struct_asym", &["id"])?
        .into_iter()
        .filter_map(|row| row[0])
        .unique()
        .map(str::to_string)
        .collect())
}

fn residue_span(begin: Option<&str>, end: Option<&str>) -> Option<usize> {
    match (parse_int(begin)?, parse_int(end)?) {
        (begin, end) if end >= begin => Some((end - begin + 1) as usize),
        _ => None,
    }
}

/// Reads assembly subunits. The residue count comes from the referenced
/// `_ihm_entity_poly_segment` range, then from the entity's
/// `_entity_poly_seq` length, then from inline `seq_id_begin`/`seq_id_end`
/// columns written by older exporters, and is 0 when none of them resolve.
pub fn read_subunits(doc: &CifDocument) -> Result<Vec<Subunit>, EngineError> {
    let segments = rows(
        doc,
        "ihm_entity_poly_segment",
        &["id", "seq_id_begin", "seq_id_end"],
    )?;
    let poly_seq = rows(doc, "entity_poly_seq", &["entity_id", "num"])?;

    let segment_length = |segment_id: &str| {
        segments
            .iter()
            .find(|segment| segment[0] == Some(segment_id))
            .and_then(|segment| residue_span(segment[1], segment[2]))
    };
    let sequence_length = |entity_id: &str| {
        let count = poly_seq
            .iter()
            .filter(|residue| residue[0] == Some(entity_id))
            .filter_map(|residue| residue[1])
            .unique()
            .count();
        (count > 0).then_some(count)
    };

    Ok(rows(
        doc,
        "ihm_struct_assembly_details",
        &[
            "assembly_id",
            "entity_description",
            "asym_id",
            "entity_id",
            "entity_poly_segment_id",
            "seq_id_begin",
            "seq_id_end",
        ],
    )?
    .into_iter()
    .map(|row| {
        let residue_count = row[4]
            .and_then(segment_length)
            .or_else(|| row[3].and_then(sequence_length))
            .or_else(|| residue_span(row[5], row[6]))
            .unwrap_or(0);
        Subunit {
            assembly_id: owned(row[0]),
            description: row[1].unwrap_or(NOT_LISTED).to_string(),
            chain_id: row[2].unwrap_or_default().to_string(),
            residue_count,
        }
    })
    .collect())
}

/// One formatted line per assembly-details row, in source order.
pub fn get_subunits(doc: &CifDocument) -> Result<Vec<String>, EngineError> {
    Ok(read_subunits(doc)?.iter().map(Subunit::formatted).collect())
}

pub fn read_datasets(doc: &CifDocument) -> Result<Vec<Dataset>, EngineError> {
    let references = rows(
        doc,
        "ihm_dataset_related_db_reference",
        &["dataset_list_id", "db_name", "accession_code", "details"],
    )?;

    Ok(rows(doc, "ihm_dataset_list", &["id", "data_type"])?
        .into_iter()
        .map(|row| {
            let id = row[0].unwrap_or_default();
            let reference = references.iter().find(|r| r[0] == Some(id));
            Dataset {
                id: id.to_string(),
                data_type: row[1].unwrap_or(NOT_LISTED).to_string(),
                db_name: reference.and_then(|r| owned(r[1])),
                access_code: reference.and_then(|r| owned(r[2])),
                details: reference.and_then(|r| owned(r[3])),
            }
        })
        .collect())
}

/// One formatted line per dataset-list row, in source order.
pub fn get_datasets(doc: &CifDocument) -> Result<Vec<String>, EngineError> {
    Ok(read_datasets(doc)?.iter().map(Dataset::formatted).collect())
}

pub fn read_software(doc: &CifDocument) -> Result<Vec<Software>, EngineError> {
    Ok(rows(doc, "software", &["name", "version"])?
        .into_iter()
        .map(|row| Software {
            name: row[0].unwrap_or(NOT_LISTED).to_string(),
            version: owned(row[1]),
        })
        .collect())
}

/// One formatted line per software row, in source order.
pub fn get_software(doc: &CifDocument) -> Result<Vec<String>, EngineError> {
    Ok(read_software(doc)?.iter().map(Software::formatted).collect())
}

fn read_protocol_steps(doc: &CifDocument) -> Result<Vec<ProtocolStep>, EngineError> {
    Ok(rows(
        doc,
        "ihm_modeling_protocol_details",
        &[
            "protocol_id",
            "step_id",
            "step_name",
            "step_method",
            "num_models_begin",
            "num_models_end",
        ],
    )?
    .into_iter()
    .map(|row| ProtocolStep {
        protocol_id: row[0].unwrap_or_default().to_string(),
        step_id: owned(row[1]),
        step_name: owned(row[2]),
        step_method: owned(row[3]),
        num_models_begin: parse_int(row[4]),
        num_models_end: parse_int(row[5]),
    })
    .collect())
}

fn read_models(doc: &CifDocument) -> Result<Vec<ModelEntry>, EngineError> {
    Ok(
        rows(doc, "ihm_model_list", &["model_id", "model_name", "protocol_id"])?
            .into_iter()
            .map(|row| ModelEntry {
                model_id: row[0].unwrap_or_default().to_string(),
                model_name: owned(row[1]),
                protocol_id: owned(row[2]),
            })
            .collect(),
    )
}

fn read_ensemble(doc: &CifDocument) -> Result<ModelEnsemble, EngineError> {
    let links = rows(doc, "ihm_model_group_link", &["group_id", "model_id"])?;
    let groups = rows(doc, "ihm_model_group", &["id", "name"])?
        .into_iter()
        .filter_map(|row| {
            let id = row[0]?;
            Some(ModelGroup {
                id: id.to_string(),
                name: owned(row[1]),
                model_ids: links
                    .iter()
                    .filter(|link| link[0] == Some(id))
                    .filter_map(|link| owned(link[1]))
                    .collect(),
            })
        })
        .collect();

    let ensembles = rows(
        doc,
        "ihm_ensemble_info",
        &[
            "ensemble_id",
            "ensemble_name",
            "num_ensemble_models",
            "ensemble_clustering_method",
        ],
    )?
    .into_iter()
    .map(|row| EnsembleInfo {
        ensemble_id: row[0].unwrap_or_default().to_string(),
        name: owned(row[1]),
        num_models: parse_int(row[2]),
        clustering_method: owned(row[3]),
    })
    .collect();

    let representation = rows(
        doc,
        "ihm_model_representation_details",
        &["model_object_primitive", "model_mode"],
    )?;
    let count_mode = |mode: &str| {
        representation
            .iter()
            .filter(|row| row[1].is_some_and(|m| m.eq_ignore_ascii_case(mode)))
            .count()
    };

    Ok(ModelEnsemble {
        groups,
        ensembles,
        sphere: representation
            .iter()
            .any(|row| row[0].is_some_and(|p| p.eq_ignore_ascii_case("sphere"))),
        rigid_bodies: count_mode("rigid"),
        flexible_units: count_mode("flexible"),
    })
}
