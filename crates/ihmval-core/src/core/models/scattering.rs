use serde::{Deserialize, Serialize};

/// One measured point of a scattering profile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProfilePoint {
    /// Momentum transfer.
    pub q: f64,
    /// Intensity.
    pub i: f64,
    /// Experimental error of the intensity.
    pub e: f64,
}

/// A profile point together with its log-log, Kratky and Porod transforms.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProfileRow {
    #[serde(rename = "Q")]
    pub q: f64,
    #[serde(rename = "I")]
    pub i: f64,
    #[serde(rename = "E")]
    pub e: f64,
    #[serde(rename = "logQ")]
    pub log_q: f64,
    #[serde(rename = "logI")]
    pub log_i: f64,
    pub err_x: (f64, f64),
    pub err_y: (f64, f64),
    #[serde(rename = "Ky")]
    pub ky: f64,
    #[serde(rename = "Px")]
    pub px: f64,
    #[serde(rename = "Py")]
    pub py: f64,
}

/// Summary record of one scattering-database entry.
///
/// Only the keys the report consumes are modeled; any other keys in the
/// remote JSON are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SasSummary {
    pub intensities_data: String,
    #[serde(default)]
    pub experiment_description: Option<String>,
    #[serde(default)]
    pub estimated_volume: Option<f64>,
    #[serde(default)]
    pub estimated_volume_method: Option<String>,
    #[serde(default)]
    pub porod_volume: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryEntry {
    pub code: String,
    pub summary: SasSummary,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScatteringParameters {
    #[serde(rename = "Estimated volume")]
    pub estimated_volume: String,
    #[serde(rename = "Estimated volume method")]
    pub estimated_volume_method: String,
    #[serde(rename = "Porod volume")]
    pub porod_volume: String,
}

/// Normalized scattering section of a report.
///
/// `summaries` holds every fetched entry in dataset order; the description,
/// parameters and profile are derived from `primary_code`, the first of them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScatteringRecord {
    pub primary_code: String,
    pub description: String,
    pub parameters: ScatteringParameters,
    pub profile: Vec<ProfileRow>,
    pub summaries: Vec<SummaryEntry>,
}
