use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    version,
    about = "ihmval - Aggregates integrative-model metadata, geometry outliers and SAS profiles into validation report documents.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Set the number of threads used for batch processing and SAS fetches.
    /// Defaults to the number of available logical cores.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub threads: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Normalize a geometry-analysis result into a standalone geometry record.
    Geometry(GeometryArgs),
    /// Build the report document of one entry.
    Report(ReportArgs),
    /// Build report documents for every entry listed in a manifest.
    Batch(BatchArgs),
}

/// Arguments for the `geometry` subcommand.
#[derive(Args, Debug)]
pub struct GeometryArgs {
    /// Path to the geometry-analysis result (JSON export).
    #[arg(short, long, required = true, value_name = "PATH")]
    pub input: PathBuf,

    /// Path for the normalized geometry record (JSON).
    #[arg(short, long, required = true, value_name = "PATH")]
    pub output: PathBuf,
}

/// Options shared by `report` and `batch`.
#[derive(Args, Debug, Clone, Default)]
pub struct ReportOptions {
    /// Path to a configuration file in TOML format.
    /// Defaults to `config.toml` in the platform configuration directory, if present.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Do not fetch scattering data, even for entries referencing SAS datasets.
    #[arg(long)]
    pub no_sas: bool,

    /// Omit the geometry section instead of failing when the geometry result is incomplete.
    #[arg(long)]
    pub allow_partial_geometry: bool,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S sasbdb.timeout-secs=60
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

/// Arguments for the `report` subcommand.
#[derive(Args, Debug)]
pub struct ReportArgs {
    /// Path to the entry's mmCIF file.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub input: PathBuf,

    /// Path to the geometry-analysis result (JSON export) of the entry.
    #[arg(short, long, value_name = "PATH")]
    pub geometry: Option<PathBuf>,

    /// Path for the report document (JSON).
    #[arg(short, long, required = true, value_name = "PATH")]
    pub output: PathBuf,

    #[command(flatten)]
    pub options: ReportOptions,
}

/// Arguments for the `batch` subcommand.
#[derive(Args, Debug)]
pub struct BatchArgs {
    /// Path to the batch manifest (TOML with one `[[entry]]` table per entry).
    #[arg(short, long, required = true, value_name = "PATH")]
    pub manifest: PathBuf,

    /// Directory receiving one `<ID>.json` report per entry.
    #[arg(short, long, required = true, value_name = "DIR")]
    pub output_dir: PathBuf,

    #[command(flatten)]
    pub options: ReportOptions,
}
