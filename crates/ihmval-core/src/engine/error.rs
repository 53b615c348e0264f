use crate::core::io::cif::CifError;
use crate::core::io::molprobity::MolprobityError;
use crate::core::io::profile::ProfileError;
use thiserror::Error;

/// Failure reported by a [`ScatteringSource`](crate::engine::scattering::ScatteringSource).
///
/// The core never retries; the caller may retry the whole normalizer call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Failed to fetch '{resource}': {reason}")]
pub struct RemoteFetchError {
    pub resource: String,
    pub reason: String,
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Required mmCIF category '{category}' is missing or empty")]
    MissingRequiredCategory { category: &'static str },

    #[error("Malformed mmCIF category: {0}")]
    MalformedCategory(#[from] crate::core::io::cif::ColumnMismatch),

    #[error("Geometry analysis result is incomplete: missing {section}")]
    IncompleteAnalysisInput { section: String },

    #[error(transparent)]
    RemoteFetch(#[from] RemoteFetchError),

    #[error("Cannot compute {quantity} for profile row {row}: argument {value} is not positive")]
    NumericDomain {
        quantity: &'static str,
        row: usize,
        value: f64,
    },

    #[error("Invalid intensity profile for '{code}': {source}")]
    ProfileFormat {
        code: String,
        #[source]
        source: ProfileError,
    },

    #[error("mmCIF parsing failed: {0}")]
    Cif(#[from] CifError),

    #[error("Geometry result could not be read: {0}")]
    GeometryInput(#[from] MolprobityError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Report serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}
