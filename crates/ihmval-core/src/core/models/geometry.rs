use serde::{Deserialize, Serialize};

/// Stable identity of an atom across analysis tools.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AtomKey {
    pub chain: String,
    pub residue_id: String,
    pub residue_name: String,
    pub atom_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClashOutlier {
    pub atom1: AtomKey,
    pub atom2: AtomKey,
    /// Always non-negative.
    pub overlap: f64,
}

/// A bond or angle outlier. Field order is fixed: atoms, observed, ideal, score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RestraintOutlier {
    pub atoms: Vec<AtomKey>,
    pub observed: f64,
    pub ideal: f64,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DihedralOutlier {
    pub chain: String,
    pub residue_id: String,
    pub residue_name: String,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClashRecord {
    pub clashscore: f64,
    pub clashes_list: Vec<ClashOutlier>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RestraintRecord {
    pub total: usize,
    pub outliers: usize,
    pub outliers_list: Vec<RestraintOutlier>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DihedralRecord {
    pub total: usize,
    pub favored: usize,
    pub allowed: usize,
    pub outliers: usize,
    pub outliers_list: Vec<DihedralOutlier>,
}

/// Normalized geometry metrics for one model, one record per metric class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeometryRecord {
    pub clash: ClashRecord,
    pub bonds: RestraintRecord,
    pub angles: RestraintRecord,
    pub ramachandran: DihedralRecord,
    pub rotamers: DihedralRecord,
}
