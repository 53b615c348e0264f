use crate::core::io::profile::IntensityProfile;
use crate::core::io::traits::TextFormat;
use crate::core::models::entry::EntryContext;
use crate::core::models::scattering::{
    ProfilePoint, ProfileRow, SasSummary, ScatteringParameters, ScatteringRecord, SummaryEntry,
};
use crate::engine::error::{EngineError, RemoteFetchError};
use tracing::{debug, info, instrument, warn};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

const UNAVAILABLE: &str = "N/A";
const POROD_VOLUME_UNIT: &str = "nm\u{00B3}";

/// Read-only access to the scattering database.
///
/// Implementations own transport concerns (timeouts, TLS, base URLs) and
/// report any non-success outcome as a [`RemoteFetchError`].
pub trait ScatteringSource {
    fn fetch_summary(&self, code: &str) -> Result<SasSummary, RemoteFetchError>;
    fn fetch_profile(&self, url: &str) -> Result<String, RemoteFetchError>;
}

/// Access codes of scattering datasets, in dataset order, without duplicates.
pub fn scattering_codes(ctx: &EntryContext, marker: &str) -> Vec<String> {
    let mut codes: Vec<String> = Vec::new();
    for dataset in ctx.datasets.iter().filter(|d| d.is_scattering(marker)) {
        match &dataset.access_code {
            Some(code) if !codes.contains(code) => codes.push(code.clone()),
            Some(_) => {}
            None => warn!(
                dataset = %dataset.id,
                "Scattering dataset has no access code; it is skipped."
            ),
        }
    }
    codes
}

fn positive(quantity: &'static str, row: usize, value: f64) -> Result<f64, EngineError> {
    if value > 0.0 {
        Ok(value)
    } else {
        Err(EngineError::NumericDomain {
            quantity,
            row,
            value,
        })
    }
}

/// Computes the log-log, Kratky and Porod columns of a profile.
///
/// A non-positive logarithm argument is an error, never clamped.
pub fn derive_profile(points: &[ProfilePoint]) -> Result<Vec<ProfileRow>, EngineError> {
    points
        .iter()
        .enumerate()
        .map(|(row, p)| {
            let log_q = positive("ln(Q)", row, p.q)?.ln();
            let log_i = positive("ln(I)", row, p.i)?.ln();
            let err_low = positive("ln(I-E)", row, p.i - p.e)?.ln();
            let err_high = positive("ln(I+E)", row, p.i + p.e)?.ln();
            let px = p.q.powi(4);
            Ok(ProfileRow {
                q: p.q,
                i: p.i,
                e: p.e,
                log_q,
                log_i,
                err_x: (p.q, p.q),
                err_y: (err_low, err_high),
                ky: p.q * p.q * p.i,
                px,
                py: px * p.i,
            })
        })
        .collect()
}

pub fn parameters(summary: &SasSummary) -> ScatteringParameters {
    ScatteringParameters {
        estimated_volume: summary
            .estimated_volume
            .map(|v| v.to_string())
            .unwrap_or_else(|| UNAVAILABLE.to_string()),
        estimated_volume_method: summary
            .estimated_volume_method
            .clone()
            .unwrap_or_else(|| UNAVAILABLE.to_string()),
        porod_volume: summary
            .porod_volume
            .map(|v| format!("{v} {POROD_VOLUME_UNIT}"))
            .unwrap_or_else(|| UNAVAILABLE.to_string()),
    }
}

fn fetch_summaries<S: ScatteringSource + Sync + ?Sized>(
    codes: &[String],
    source: &S,
) -> Result<Vec<SummaryEntry>, EngineError> {
    let fetch = |code: &String| -> Result<SummaryEntry, RemoteFetchError> {
        debug!(code = %code, "Fetching scattering summary.");
        Ok(SummaryEntry {
            code: code.clone(),
            summary: source.fetch_summary(code)?,
        })
    };

    #[cfg(not(feature = "parallel"))]
    let iterator = codes.iter();

    #[cfg(feature = "parallel")]
    let iterator = codes.par_iter();

    // Collection keeps input order, so the primary entry stays deterministic.
    Ok(iterator.map(fetch).collect::<Result<Vec<_>, _>>()?)
}

/// Builds the scattering section of an entry.
///
/// Returns `Ok(None)` without any network access when the entry has no
/// scattering dataset. With several scattering datasets every summary is
/// fetched, and the profile, description and volumes come from the first
/// one in dataset order.
#[instrument(skip_all, name = "scattering_normalization", fields(entry = %ctx.id))]
pub fn normalize<S: ScatteringSource + Sync + ?Sized>(
    ctx: &EntryContext,
    marker: &str,
    source: &S,
) -> Result<Option<ScatteringRecord>, EngineError> {
    let codes = scattering_codes(ctx, marker);
    if codes.is_empty() {
        debug!("No scattering datasets referenced.");
        return Ok(None);
    }
    info!(codes = ?codes, "Fetching scattering database entries.");

    let summaries = fetch_summaries(&codes, source)?;
    let Some(primary) = summaries.first() else {
        return Ok(None);
    };
    if summaries.len() > 1 {
        info!(
            primary = %primary.code,
            total = summaries.len(),
            "Several scattering entries found; deriving the profile from the first."
        );
    }

    let text = source.fetch_profile(&primary.summary.intensities_data)?;
    let points =
        IntensityProfile::read_from_str(&text).map_err(|source| EngineError::ProfileFormat {
            code: primary.code.clone(),
            source,
        })?;
    let profile = derive_profile(&points)?;

    let record = ScatteringRecord {
        primary_code: primary.code.clone(),
        description: primary
            .summary
            .experiment_description
            .clone()
            .unwrap_or_else(|| UNAVAILABLE.to_string()),
        parameters: parameters(&primary.summary),
        profile,
        summaries: summaries.clone(),
    };
    info!(
        primary = %record.primary_code,
        points = record.profile.len(),
        "Scattering profile normalized."
    );
    Ok(Some(record))
}
