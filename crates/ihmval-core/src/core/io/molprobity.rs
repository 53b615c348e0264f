use crate::core::io::traits::TextFormat;
use crate::core::models::analysis::{
    ClashObservation, ClashSection, DihedralObservation, DihedralSection, GeometryAnalysisResult,
    RestraintObservation, RestraintSection,
};
use serde::{Deserialize, Serialize};
use std::io::{self, BufRead};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MolprobityError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Invalid geometry result JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawClash {
    pub clashscore: Option<f64>,
    pub results: Option<Vec<ClashObservation>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawRestraint {
    pub n_total: Option<usize>,
    pub results: Option<Vec<RestraintObservation>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawRestraints {
    pub bonds: Option<RawRestraint>,
    pub angles: Option<RawRestraint>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawDihedral {
    pub n_total: Option<usize>,
    pub results: Option<Vec<DihedralObservation>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MolprobityData {
    pub clash: Option<RawClash>,
    pub restraints: Option<RawRestraints>,
    pub ramalyze: Option<RawDihedral>,
    pub rotalyze: Option<RawDihedral>,
}

/// JSON export of a MolProbity validation run.
///
/// Every section is optional at the serialization level; completeness is
/// enforced by the geometry normalizer, not by deserialization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MolprobityExport {
    pub data: MolprobityData,
}

impl TextFormat for MolprobityExport {
    type Output = MolprobityExport;
    type Error = MolprobityError;

    fn read_from(reader: &mut impl BufRead) -> Result<MolprobityExport, MolprobityError> {
        Ok(serde_json::from_reader(reader)?)
    }
}

fn restraint_section(raw: Option<&RawRestraint>) -> Option<RestraintSection<'_>> {
    let raw = raw?;
    Some(RestraintSection {
        total: raw.n_total?,
        observations: raw.results.as_deref()?,
    })
}

fn dihedral_section(raw: Option<&RawDihedral>) -> Option<DihedralSection<'_>> {
    let raw = raw?;
    Some(DihedralSection {
        total: raw.n_total?,
        observations: raw.results.as_deref()?,
    })
}

impl GeometryAnalysisResult for MolprobityExport {
    fn clashes(&self) -> Option<ClashSection<'_>> {
        let clash = self.data.clash.as_ref()?;
        Some(ClashSection {
            clashscore: clash.clashscore?,
            observations: clash.results.as_deref()?,
        })
    }

    fn bonds(&self) -> Option<RestraintSection<'_>> {
        restraint_section(self.data.restraints.as_ref()?.bonds.as_ref())
    }

    fn angles(&self) -> Option<RestraintSection<'_>> {
        restraint_section(self.data.restraints.as_ref()?.angles.as_ref())
    }

    fn ramachandran(&self) -> Option<DihedralSection<'_>> {
        dihedral_section(self.data.ramalyze.as_ref())
    }

    fn rotamers(&self) -> Option<DihedralSection<'_>> {
        dihedral_section(self.data.rotalyze.as_ref())
    }
}
