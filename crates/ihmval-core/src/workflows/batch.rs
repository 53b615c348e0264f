use crate::engine::compose::ReportDocument;
use crate::engine::config::ReportConfig;
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::scattering::ScatteringSource;
use crate::workflows::report;
use std::path::PathBuf;
use tracing::{error, info, instrument};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// One entry to report on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryTask {
    /// Label used in logs and outcomes until the entry id is known.
    pub label: String,
    pub cif: PathBuf,
    pub geometry: Option<PathBuf>,
}

impl EntryTask {
    pub fn new(cif: impl Into<PathBuf>, geometry: Option<PathBuf>) -> Self {
        let cif = cif.into();
        let label = cif
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| cif.display().to_string());
        Self {
            label,
            cif,
            geometry,
        }
    }
}

/// Result of one [`EntryTask`], independently owned.
#[derive(Debug)]
pub struct EntryOutcome {
    pub label: String,
    pub result: Result<ReportDocument, EngineError>,
}

impl EntryOutcome {
    /// The raw entry identifier, once the report was composed.
    pub fn entry_id(&self) -> Option<&str> {
        self.result.as_ref().ok().map(|doc| doc.id_t.as_str())
    }
}

/// Reports on every task. Outcomes are returned in task order; a failing
/// entry does not stop the others.
#[instrument(skip_all, name = "batch_workflow", fields(entries = tasks.len()))]
pub fn run<S: ScatteringSource + Sync + ?Sized>(
    tasks: &[EntryTask],
    source: &S,
    config: &ReportConfig,
    reporter: &ProgressReporter,
) -> Vec<EntryOutcome> {
    reporter.report(Progress::BatchStart {
        total_entries: tasks.len() as u64,
    });

    let process = |task: &EntryTask| {
        let result = report::run_from_files(
            &task.cif,
            task.geometry.as_deref(),
            source,
            config,
            &ProgressReporter::new(),
        );
        if let Err(e) = &result {
            error!(entry = %task.label, error = %e, "Entry failed.");
        }
        reporter.report(Progress::EntryFinish);
        EntryOutcome {
            label: task.label.clone(),
            result,
        }
    };

    #[cfg(not(feature = "parallel"))]
    let outcomes: Vec<EntryOutcome> = tasks.iter().map(process).collect();

    #[cfg(feature = "parallel")]
    let outcomes: Vec<EntryOutcome> = tasks.par_iter().map(process).collect();

    reporter.report(Progress::BatchFinish);
    let failed = outcomes.iter().filter(|o| o.result.is_err()).count();
    info!(
        succeeded = outcomes.len() - failed,
        failed,
        "Batch finished."
    );
    outcomes
}
