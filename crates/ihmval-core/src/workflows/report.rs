use crate::core::io::cif::{CifDocument, CifFile};
use crate::core::io::molprobity::MolprobityExport;
use crate::core::io::traits::TextFormat;
use crate::core::models::analysis::GeometryAnalysisResult;
use crate::core::models::geometry::GeometryRecord;
use crate::engine::compose::{ReportDocument, compose};
use crate::engine::config::ReportConfig;
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::scattering::ScatteringSource;
use crate::engine::{extract, geometry, scattering};
use std::path::Path;
use tracing::{info, instrument, warn};

/// Builds the report of one entry from an already parsed mmCIF document.
///
/// The geometry result is optional; without one the `geometry` section is
/// `null`. Scattering data are fetched through `source` only when the entry
/// references scattering datasets and `config.fetch_scattering` is set.
#[instrument(skip_all, name = "report_workflow")]
pub fn run<S: ScatteringSource + Sync + ?Sized>(
    document: &CifDocument,
    geometry_result: Option<&dyn GeometryAnalysisResult>,
    source: &S,
    config: &ReportConfig,
    reporter: &ProgressReporter,
) -> Result<ReportDocument, EngineError> {
    // === Phase 1: Structural metadata ===
    reporter.report(Progress::SectionStart { name: "Metadata" });
    let metadata = extract::extract(document)?;
    let context = metadata.context();
    info!(entry = %context.id, models = context.model_count, "Building report.");
    reporter.report(Progress::SectionFinish);

    // === Phase 2: Geometry metrics ===
    reporter.report(Progress::SectionStart { name: "Geometry" });
    let geometry_record = match geometry_result {
        Some(result) => normalize_geometry(result, config, reporter)?,
        None => None,
    };
    reporter.report(Progress::SectionFinish);

    // === Phase 3: Scattering profile ===
    reporter.report(Progress::SectionStart { name: "Scattering" });
    let sas = if config.fetch_scattering {
        scattering::normalize(&context, &config.scattering_marker, source)?
    } else {
        info!("Scattering fetch disabled; skipping the scattering section.");
        None
    };
    reporter.report(Progress::SectionFinish);

    // === Phase 4: Composition ===
    reporter.report(Progress::SectionStart { name: "Composition" });
    let report = compose(&metadata, geometry_record, sas, config);
    reporter.report(Progress::SectionFinish);

    info!(
        entry = %report.id_t,
        geometry = report.geometry.is_some(),
        sas = report.sas.is_some(),
        "Report composed."
    );
    Ok(report)
}

fn normalize_geometry(
    result: &dyn GeometryAnalysisResult,
    config: &ReportConfig,
    reporter: &ProgressReporter,
) -> Result<Option<GeometryRecord>, EngineError> {
    match geometry::normalize(result) {
        Ok(record) => Ok(Some(record)),
        Err(EngineError::IncompleteAnalysisInput { section }) if config.allow_partial_geometry => {
            warn!(
                missing = %section,
                "Geometry result is incomplete; the geometry section is omitted."
            );
            reporter.report(Progress::Message(format!(
                "Geometry section omitted (missing {section})"
            )));
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

/// Reads the mmCIF file and optional geometry export from disk, then runs
/// [`run`].
pub fn run_from_files<S: ScatteringSource + Sync + ?Sized>(
    cif_path: &Path,
    geometry_path: Option<&Path>,
    source: &S,
    config: &ReportConfig,
    reporter: &ProgressReporter,
) -> Result<ReportDocument, EngineError> {
    info!(path = %cif_path.display(), "Reading mmCIF file.");
    let document = CifFile::read_from_path(cif_path)?;
    let export = match geometry_path {
        Some(path) => {
            info!(path = %path.display(), "Reading geometry analysis result.");
            Some(MolprobityExport::read_from_path(path)?)
        }
        None => None,
    };
    run(
        &document,
        export.as_ref().map(|e| e as &dyn GeometryAnalysisResult),
        source,
        config,
        reporter,
    )
}
