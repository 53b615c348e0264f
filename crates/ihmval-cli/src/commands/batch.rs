use crate::cli::BatchArgs;
use crate::commands::write_json;
use crate::config::PartialAppConfig;
use crate::error::{CliError, Result};
use crate::remote::SasbdbClient;
use crate::utils::progress::CliProgressHandler;
use ihmval::engine::progress::ProgressReporter;
use ihmval::workflows::batch::{self, EntryOutcome, EntryTask};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::task;
use tracing::{info, warn};

#[derive(Deserialize, Debug)]
#[serde(deny_unknown_fields)]
struct Manifest {
    #[serde(default, rename = "entry")]
    entries: Vec<ManifestEntry>,
}

#[derive(Deserialize, Debug)]
#[serde(deny_unknown_fields)]
struct ManifestEntry {
    cif: PathBuf,
    geometry: Option<PathBuf>,
}

/// Reads the manifest; relative paths are resolved against its directory.
fn load_tasks(path: &Path) -> Result<Vec<EntryTask>> {
    let content = std::fs::read_to_string(path)?;
    let manifest: Manifest = toml::from_str(&content).map_err(|e| CliError::FileParsing {
        path: path.to_path_buf(),
        source: e.into(),
    })?;
    let base = path.parent().unwrap_or_else(|| Path::new(""));
    let resolve = |p: PathBuf| if p.is_absolute() { p } else { base.join(p) };

    Ok(manifest
        .entries
        .into_iter()
        .map(|entry| EntryTask::new(resolve(entry.cif), entry.geometry.map(resolve)))
        .collect())
}

/// Writes every successful outcome as `<ID>.json`; returns the number of failures.
///
/// A report whose ID was already written by an earlier entry counts as a
/// failure and leaves the earlier file in place.
fn write_outcomes(outcomes: &[EntryOutcome], output_dir: &Path) -> Result<usize> {
    let mut failed = 0;
    let mut written: HashMap<&str, &str> = HashMap::new();
    for outcome in outcomes {
        match &outcome.result {
            Ok(report) => {
                if let Some(first) = written.get(report.id.as_str()) {
                    failed += 1;
                    warn!(
                        entry = %report.id,
                        first = %first,
                        duplicate = %outcome.label,
                        "Duplicate entry ID in batch."
                    );
                    eprintln!(
                        "  ✗ {}: entry ID '{}' was already written by '{}'",
                        outcome.label, report.id, first
                    );
                    continue;
                }
                let path = output_dir.join(format!("{}.json", report.id));
                write_json(&path, report)?;
                written.insert(&report.id, &outcome.label);
                println!("  ✓ {} -> {}", outcome.label, path.display());
            }
            Err(e) => {
                failed += 1;
                eprintln!("  ✗ {}: {}", outcome.label, e);
            }
        }
    }
    Ok(failed)
}

pub async fn run(args: BatchArgs) -> Result<()> {
    let app_config =
        PartialAppConfig::load(args.options.config.as_deref())?.merge_with_cli(&args.options)?;
    let tasks = load_tasks(&args.manifest)?;
    let total = tasks.len();
    info!("Loaded {} entries from {:?}", total, &args.manifest);
    println!("Processing {} entries...", total);

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    let outcomes = task::spawn_blocking(move || -> Result<Vec<EntryOutcome>> {
        let client = SasbdbClient::new(&app_config.sasbdb)?;
        Ok(batch::run(&tasks, &client, &app_config.report, &reporter))
    })
    .await
    .map_err(|e| CliError::Other(anyhow::anyhow!("Batch task failed: {}", e)))??;

    let failed = write_outcomes(&outcomes, &args.output_dir)?;
    if failed > 0 {
        return Err(CliError::BatchFailed { failed, total });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::ReportOptions;
    use std::fs;
    use tempfile::tempdir;

    fn entry(id: &str) -> String {
        format!("data_{id}\n_entry.id {id}\n_struct.title 'Assembly {id}'\n")
    }

    #[test]
    fn manifest_paths_resolve_against_manifest_directory() {
        let dir = tempdir().unwrap();
        let manifest = dir.path().join("manifest.toml");
        fs::write(
            &manifest,
            r#"
            [[entry]]
            cif = "entries/one.cif"
            geometry = "results/one.json"

            [[entry]]
            cif = "/abs/two.cif"
            "#,
        )
        .unwrap();

        let tasks = load_tasks(&manifest).unwrap();
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].cif, dir.path().join("entries/one.cif"));
        assert_eq!(
            tasks[0].geometry,
            Some(dir.path().join("results/one.json"))
        );
        assert_eq!(tasks[0].label, "one");
        assert_eq!(tasks[1].cif, PathBuf::from("/abs/two.cif"));
        assert_eq!(tasks[1].geometry, None);
    }

    #[test]
    fn unknown_manifest_keys_fail_parsing() {
        let dir = tempdir().unwrap();
        let manifest = dir.path().join("manifest.toml");
        fs::write(&manifest, "[[entry]]\ncif = \"a.cif\"\nsas = \"b\"\n").unwrap();
        assert!(matches!(
            load_tasks(&manifest),
            Err(CliError::FileParsing { .. })
        ));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn failing_entries_are_reported_and_others_written() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("good.cif"), entry("PDBDEV_good")).unwrap();
        fs::write(dir.path().join("bad.cif"), "data_bad\n_struct.title 'No entry id'\n").unwrap();
        let manifest = dir.path().join("manifest.toml");
        fs::write(
            &manifest,
            "[[entry]]\ncif = \"good.cif\"\n\n[[entry]]\ncif = \"bad.cif\"\n",
        )
        .unwrap();
        let config = dir.path().join("config.toml");
        fs::write(&config, "").unwrap();
        let output_dir = dir.path().join("reports");

        let result = run(BatchArgs {
            manifest,
            output_dir: output_dir.clone(),
            options: ReportOptions {
                config: Some(config),
                no_sas: true,
                ..ReportOptions::default()
            },
        })
        .await;

        assert!(matches!(
            result,
            Err(CliError::BatchFailed {
                failed: 1,
                total: 2
            })
        ));
        assert!(output_dir.join("PDBDEVgood.json").is_file());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn duplicate_entry_ids_fail_the_later_entry() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("first.cif"), entry("PDBDEV_dup")).unwrap();
        fs::write(dir.path().join("second.cif"), entry("PDBDEV_dup")).unwrap();
        let manifest = dir.path().join("manifest.toml");
        fs::write(
            &manifest,
            "[[entry]]\ncif = \"first.cif\"\n\n[[entry]]\ncif = \"second.cif\"\n",
        )
        .unwrap();
        let config = dir.path().join("config.toml");
        fs::write(&config, "").unwrap();
        let output_dir = dir.path().join("reports");

        let result = run(BatchArgs {
            manifest,
            output_dir: output_dir.clone(),
            options: ReportOptions {
                config: Some(config),
                no_sas: true,
                ..ReportOptions::default()
            },
        })
        .await;

        assert!(matches!(
            result,
            Err(CliError::BatchFailed {
                failed: 1,
                total: 2
            })
        ));
        let written = fs::read_to_string(output_dir.join("PDBDEVdup.json")).unwrap();
        assert!(written.contains("Assembly PDBDEV_dup"));
    }
}
