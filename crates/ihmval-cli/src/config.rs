mod defaults;

use crate::cli::ReportOptions;
use crate::error::{CliError, Result};
use defaults::DefaultsConfig;
use directories::ProjectDirs;
use ihmval::engine::config::{ReportConfig, ReportConfigBuilder};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
struct PartialReportSection {
    scattering_marker: Option<String>,
    title_placeholder: Option<String>,
    fetch_scattering: Option<bool>,
    allow_partial_geometry: Option<bool>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
struct PartialSasbdbSection {
    base_url: Option<String>,
    timeout_secs: Option<u64>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct PartialAppConfig {
    report: Option<PartialReportSection>,
    sasbdb: Option<PartialSasbdbSection>,
}

/// Connection settings of the scattering database client.
#[derive(Debug, Clone, PartialEq)]
pub struct SasbdbSettings {
    pub base_url: String,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub report: ReportConfig,
    pub sasbdb: SasbdbSettings,
}

/// `config.toml` in the platform configuration directory.
pub fn default_config_path() -> Option<PathBuf> {
    ProjectDirs::from("org", "ihmval", "ihmval")
        .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}

impl PartialAppConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    /// Loads the explicit file if given, otherwise the default file if it
    /// exists, otherwise an empty configuration.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => match default_config_path() {
                Some(path) if path.is_file() => Self::from_file(&path),
                _ => {
                    debug!("No configuration file found; using built-in defaults.");
                    Ok(Self::default())
                }
            },
        }
    }

    /// Resolves every value with the precedence
    /// CLI flag > `--set` > file > built-in default.
    pub fn merge_with_cli(mut self, options: &ReportOptions) -> Result<AppConfig> {
        let defaults = DefaultsConfig::default();
        self.apply_set_values(&options.set_values)?;

        let report_file = self.report.take().unwrap_or_default();
        let sasbdb_file = self.sasbdb.take().unwrap_or_default();

        let fetch_scattering = if options.no_sas {
            false
        } else {
            report_file
                .fetch_scattering
                .unwrap_or(defaults.fetch_scattering)
        };
        let allow_partial_geometry = options.allow_partial_geometry
            || report_file
                .allow_partial_geometry
                .unwrap_or(defaults.allow_partial_geometry);

        let report = ReportConfigBuilder::new()
            .scattering_marker(
                report_file
                    .scattering_marker
                    .unwrap_or(defaults.scattering_marker),
            )
            .title_placeholder(
                report_file
                    .title_placeholder
                    .unwrap_or(defaults.title_placeholder),
            )
            .fetch_scattering(fetch_scattering)
            .allow_partial_geometry(allow_partial_geometry)
            .build()?;

        let timeout_secs = sasbdb_file
            .timeout_secs
            .unwrap_or(defaults.sasbdb_timeout_secs);
        if timeout_secs == 0 {
            return Err(CliError::Config(
                "`sasbdb.timeout-secs` must be greater than zero".to_string(),
            ));
        }
        let base_url = sasbdb_file
            .base_url
            .unwrap_or(defaults.sasbdb_base_url)
            .trim_end_matches('/')
            .to_string();

        Ok(AppConfig {
            report,
            sasbdb: SasbdbSettings {
                base_url,
                timeout: Duration::from_secs(timeout_secs),
            },
        })
    }

    fn apply_set_values(&mut self, set_values: &[String]) -> Result<()> {
        for kv_pair in set_values {
            let Some((key, value_str)) = kv_pair.split_once('=') else {
                return Err(CliError::Config(format!(
                    "Invalid --set format: '{}'. Expected KEY=VALUE.",
                    kv_pair
                )));
            };
            let parse_bool = |value: &str| {
                value.parse::<bool>().map_err(|_| {
                    CliError::Config(format!("Invalid boolean value for {}: {}", key, value))
                })
            };

            match key {
                "report.scattering-marker" => {
                    self.report
                        .get_or_insert_with(Default::default)
                        .scattering_marker = Some(value_str.to_string());
                }
                "report.title-placeholder" => {
                    self.report
                        .get_or_insert_with(Default::default)
                        .title_placeholder = Some(value_str.to_string());
                }
                "report.fetch-scattering" => {
                    self.report
                        .get_or_insert_with(Default::default)
                        .fetch_scattering = Some(parse_bool(value_str)?);
                }
                "report.allow-partial-geometry" => {
                    self.report
                        .get_or_insert_with(Default::default)
                        .allow_partial_geometry = Some(parse_bool(value_str)?);
                }
                "sasbdb.base-url" => {
                    self.sasbdb.get_or_insert_with(Default::default).base_url =
                        Some(value_str.to_string());
                }
                "sasbdb.timeout-secs" => {
                    self.sasbdb.get_or_insert_with(Default::default).timeout_secs =
                        Some(value_str.parse().map_err(|_| {
                            CliError::Config(format!(
                                "Invalid integer value for {}: {}",
                                key, value_str
                            ))
                        })?);
                }
                _ => {
                    return Err(CliError::Config(format!(
                        "Unsupported configuration key for --set: '{}'",
                        key
                    )));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use clap::Parser;
    use once_cell::sync::Lazy;
    use std::fs;
    use tempfile::{TempDir, tempdir};

    static TEST_DIR: Lazy<TempDir> = Lazy::new(|| tempdir().expect("Failed to create temp dir"));

    fn write_config_file(name: &str, content: &str) -> PathBuf {
        let file_path = TEST_DIR.path().join(name);
        fs::write(&file_path, content).unwrap();
        file_path
    }

    fn report_options(extra: &[&str]) -> ReportOptions {
        let mut args = vec!["ihmval", "report", "-i", "entry.cif", "-o", "report.json"];
        args.extend_from_slice(extra);
        match Cli::parse_from(args).command {
            Commands::Report(report_args) => report_args.options,
            _ => panic!("Expected 'report' subcommand"),
        }
    }

    #[test]
    fn empty_configuration_resolves_to_defaults() {
        let config = PartialAppConfig::default()
            .merge_with_cli(&report_options(&[]))
            .unwrap();
        let defaults = DefaultsConfig::default();

        assert_eq!(config.report, ReportConfig::default());
        assert_eq!(config.sasbdb.base_url, defaults.sasbdb_base_url);
        assert_eq!(
            config.sasbdb.timeout,
            Duration::from_secs(defaults.sasbdb_timeout_secs)
        );
    }

    #[test]
    fn file_values_override_defaults() {
        let path = write_config_file(
            "file_values.toml",
            r#"
            [report]
            scattering-marker = "SAXS"
            title-placeholder = "Untitled entry"
            allow-partial-geometry = true

            [sasbdb]
            base-url = "https://sas.example.org/api/"
            timeout-secs = 5
            "#,
        );
        let config = PartialAppConfig::from_file(&path)
            .unwrap()
            .merge_with_cli(&report_options(&[]))
            .unwrap();

        assert_eq!(config.report.scattering_marker, "SAXS");
        assert_eq!(config.report.title_placeholder, "Untitled entry");
        assert!(config.report.fetch_scattering);
        assert!(config.report.allow_partial_geometry);
        assert_eq!(config.sasbdb.base_url, "https://sas.example.org/api");
        assert_eq!(config.sasbdb.timeout, Duration::from_secs(5));
    }

    #[test]
    fn set_values_override_file_values() {
        let path = write_config_file(
            "set_values.toml",
            r#"
            [report]
            fetch-scattering = false
            [sasbdb]
            timeout-secs = 5
            "#,
        );
        let options = report_options(&[
            "-S",
            "report.fetch-scattering=true",
            "-S",
            "sasbdb.timeout-secs=90",
        ]);
        let config = PartialAppConfig::from_file(&path)
            .unwrap()
            .merge_with_cli(&options)
            .unwrap();

        assert!(config.report.fetch_scattering);
        assert_eq!(config.sasbdb.timeout, Duration::from_secs(90));
    }

    #[test]
    fn cli_flags_override_set_values() {
        let options = report_options(&["--no-sas", "-S", "report.fetch-scattering=true"]);
        let config = PartialAppConfig::default()
            .merge_with_cli(&options)
            .unwrap();
        assert!(!config.report.fetch_scattering);

        let options = report_options(&[
            "--allow-partial-geometry",
            "-S",
            "report.allow-partial-geometry=false",
        ]);
        let config = PartialAppConfig::default()
            .merge_with_cli(&options)
            .unwrap();
        assert!(config.report.allow_partial_geometry);
    }

    #[test]
    fn unsupported_set_key_is_rejected() {
        let options = report_options(&["-S", "report.unknown=1"]);
        let result = PartialAppConfig::default().merge_with_cli(&options);
        assert!(matches!(result, Err(CliError::Config(_))));
    }

    #[test]
    fn malformed_set_value_is_rejected() {
        for value in ["report.fetch-scattering=maybe", "sasbdb.timeout-secs=soon", "no-equals"] {
            let options = report_options(&["-S", value]);
            let result = PartialAppConfig::default().merge_with_cli(&options);
            assert!(matches!(result, Err(CliError::Config(_))), "{value}");
        }
    }

    #[test]
    fn empty_scattering_marker_is_a_config_error() {
        let options = report_options(&["-S", "report.scattering-marker="]);
        let result = PartialAppConfig::default().merge_with_cli(&options);
        assert!(matches!(result, Err(CliError::Config(_))));
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let options = report_options(&["-S", "sasbdb.timeout-secs=0"]);
        let result = PartialAppConfig::default().merge_with_cli(&options);
        assert!(matches!(result, Err(CliError::Config(_))));
    }

    #[test]
    fn unknown_file_keys_fail_parsing() {
        let path = write_config_file(
            "unknown_keys.toml",
            r#"
            [report]
            scatering-marker = "SAS"
            "#,
        );
        let result = PartialAppConfig::from_file(&path);
        assert!(matches!(result, Err(CliError::FileParsing { .. })));
    }

    #[test]
    fn load_reads_the_explicit_path() {
        let path = write_config_file(
            "explicit.toml",
            r#"
            [report]
            title-placeholder = "From explicit file"
            "#,
        );
        let config = PartialAppConfig::load(Some(&path))
            .unwrap()
            .merge_with_cli(&report_options(&[]))
            .unwrap();
        assert_eq!(config.report.title_placeholder, "From explicit file");
    }
}
