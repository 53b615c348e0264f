//! Observation records as reported by an external geometry-analysis tool,
//! and the capability trait the normalizer reads them through.

use serde::{Deserialize, Serialize};

/// One participating atom of a tool observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AtomInfo {
    pub chain_id: String,
    pub resseq: String,
    pub resname: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClashObservation {
    pub atoms_info: Vec<AtomInfo>,
    /// Signed overlap; the sign encodes direction, the magnitude is reported.
    pub overlap: f64,
}

/// A bond-length or bond-angle restraint evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RestraintObservation {
    pub atoms_info: Vec<AtomInfo>,
    /// Value observed in the model.
    pub model: f64,
    /// Ideal value of the restraint.
    pub target: f64,
    pub score: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DihedralClass {
    #[serde(alias = "favored", alias = "FAVORED")]
    Favored,
    #[serde(alias = "allowed", alias = "ALLOWED")]
    Allowed,
    #[serde(rename = "OUTLIER", alias = "Outlier", alias = "outlier")]
    Outlier,
}

/// A Ramachandran or rotamer classification of one residue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DihedralObservation {
    pub chain_id: String,
    pub resseq: String,
    pub resname: String,
    pub score: f64,
    pub evaluation: DihedralClass,
}

impl DihedralObservation {
    pub fn is_outlier(&self) -> bool {
        self.evaluation == DihedralClass::Outlier
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ClashSection<'a> {
    pub clashscore: f64,
    pub observations: &'a [ClashObservation],
}

#[derive(Debug, Clone, Copy)]
pub struct RestraintSection<'a> {
    pub total: usize,
    pub observations: &'a [RestraintObservation],
}

#[derive(Debug, Clone, Copy)]
pub struct DihedralSection<'a> {
    pub total: usize,
    pub observations: &'a [DihedralObservation],
}

/// Read access to a geometry-analysis result, one accessor per metric class.
///
/// An accessor returns `None` when the tool run did not produce that
/// section. Observation order is the order reported by the tool.
pub trait GeometryAnalysisResult {
    fn clashes(&self) -> Option<ClashSection<'_>>;
    fn bonds(&self) -> Option<RestraintSection<'_>>;
    fn angles(&self) -> Option<RestraintSection<'_>>;
    fn ramachandran(&self) -> Option<DihedralSection<'_>>;
    fn rotamers(&self) -> Option<DihedralSection<'_>>;
}
