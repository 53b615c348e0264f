use crate::core::models::analysis::{
    AtomInfo, DihedralClass, DihedralSection, GeometryAnalysisResult, RestraintSection,
};
use crate::core::models::geometry::{
    AtomKey, ClashOutlier, ClashRecord, DihedralOutlier, DihedralRecord, GeometryRecord,
    RestraintOutlier, RestraintRecord,
};
use crate::engine::error::EngineError;
use tracing::{debug, info, instrument};

fn atom_key(info: &AtomInfo) -> AtomKey {
    AtomKey {
        chain: info.chain_id.trim().to_string(),
        residue_id: info.resseq.trim().to_string(),
        residue_name: info.resname.trim().to_string(),
        atom_name: info.name.trim().to_string(),
    }
}

fn atom_keys(
    atoms: &[AtomInfo],
    expected: usize,
    class: &str,
    index: usize,
) -> Result<Vec<AtomKey>, EngineError> {
    if atoms.len() != expected {
        return Err(EngineError::IncompleteAnalysisInput {
            section: format!(
                "{class} observation {index}: expected {expected} atoms, found {}",
                atoms.len()
            ),
        });
    }
    Ok(atoms.iter().map(atom_key).collect())
}

fn missing(section: &str) -> EngineError {
    EngineError::IncompleteAnalysisInput {
        section: section.to_string(),
    }
}

/// Normalizes a geometry-analysis result into a [`GeometryRecord`].
///
/// Every metric class is required. A result lacking any of them fails as a
/// whole with [`EngineError::IncompleteAnalysisInput`]; no partial record is
/// ever returned.
#[instrument(skip_all, name = "geometry_normalization")]
pub fn normalize<R: GeometryAnalysisResult + ?Sized>(
    result: &R,
) -> Result<GeometryRecord, EngineError> {
    let record = GeometryRecord {
        clash: normalize_clashes(result)?,
        bonds: normalize_restraints(
            result.bonds().ok_or_else(|| missing("restraints.bonds"))?,
            2,
            "bond",
        )?,
        angles: normalize_restraints(
            result.angles().ok_or_else(|| missing("restraints.angles"))?,
            3,
            "angle",
        )?,
        ramachandran: normalize_dihedrals(
            result.ramachandran().ok_or_else(|| missing("ramalyze"))?,
        ),
        rotamers: normalize_dihedrals(result.rotamers().ok_or_else(|| missing("rotalyze"))?),
    };

    info!(
        clashscore = record.clash.clashscore,
        clashes = record.clash.clashes_list.len(),
        bond_outliers = record.bonds.outliers,
        angle_outliers = record.angles.outliers,
        rama_outliers = record.ramachandran.outliers,
        rotamer_outliers = record.rotamers.outliers,
        "Geometry metrics normalized."
    );
    Ok(record)
}

fn normalize_clashes<R: GeometryAnalysisResult + ?Sized>(
    result: &R,
) -> Result<ClashRecord, EngineError> {
    let section = result.clashes().ok_or_else(|| missing("clash"))?;
    let clashes_list = section
        .observations
        .iter()
        .enumerate()
        .map(|(index, obs)| {
            let mut atoms = atom_keys(&obs.atoms_info, 2, "clash", index)?.into_iter();
            match (atoms.next(), atoms.next()) {
                (Some(atom1), Some(atom2)) => Ok(ClashOutlier {
                    atom1,
                    atom2,
                    overlap: obs.overlap.abs(),
                }),
                _ => Err(missing("clash atoms")),
            }
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ClashRecord {
        clashscore: section.clashscore,
        clashes_list,
    })
}

fn normalize_restraints(
    section: RestraintSection<'_>,
    atom_count: usize,
    class: &str,
) -> Result<RestraintRecord, EngineError> {
    let outliers_list = section
        .observations
        .iter()
        .enumerate()
        .map(|(index, obs)| {
            Ok(RestraintOutlier {
                atoms: atom_keys(&obs.atoms_info, atom_count, class, index)?,
                observed: obs.model,
                ideal: obs.target,
                score: obs.score,
            })
        })
        .collect::<Result<Vec<_>, EngineError>>()?;

    debug!(
        class = class,
        total = section.total,
        outliers = outliers_list.len(),
        "Restraint outliers collected."
    );
    Ok(RestraintRecord {
        total: section.total,
        outliers: outliers_list.len(),
        outliers_list,
    })
}

fn normalize_dihedrals(section: DihedralSection<'_>) -> DihedralRecord {
    let count = |class: DihedralClass| {
        section
            .observations
            .iter()
            .filter(|obs| obs.evaluation == class)
            .count()
    };

    let outliers_list: Vec<DihedralOutlier> = section
        .observations
        .iter()
        .filter(|obs| obs.is_outlier())
        .map(|obs| DihedralOutlier {
            chain: obs.chain_id.trim().to_string(),
            residue_id: obs.resseq.trim().to_string(),
            residue_name: obs.resname.trim().to_string(),
            score: obs.score,
        })
        .collect();

    DihedralRecord {
        total: section.total,
        favored: count(DihedralClass::Favored),
        allowed: count(DihedralClass::Allowed),
        outliers: outliers_list.len(),
        outliers_list,
    }
}
