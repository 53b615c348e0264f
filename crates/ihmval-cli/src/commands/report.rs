use crate::cli::ReportArgs;
use crate::commands::{attribute_input_error, write_json};
use crate::config::PartialAppConfig;
use crate::error::{CliError, Result};
use crate::remote::SasbdbClient;
use crate::utils::progress::CliProgressHandler;
use ihmval::engine::progress::ProgressReporter;
use ihmval::workflows;
use tokio::task;
use tracing::info;

pub async fn run(args: ReportArgs) -> Result<()> {
    let app_config =
        PartialAppConfig::load(args.options.config.as_deref())?.merge_with_cli(&args.options)?;
    info!(
        fetch_scattering = app_config.report.fetch_scattering,
        allow_partial_geometry = app_config.report.allow_partial_geometry,
        "Configuration resolved."
    );

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    println!("Building report for {}...", args.input.display());
    let ReportArgs {
        input,
        geometry,
        output,
        ..
    } = args;

    let report = task::spawn_blocking(move || -> Result<_> {
        let client = SasbdbClient::new(&app_config.sasbdb)?;
        workflows::report::run_from_files(
            &input,
            geometry.as_deref(),
            &client,
            &app_config.report,
            &reporter,
        )
        .map_err(|e| attribute_input_error(e, &input, geometry.as_deref()))
    })
    .await
    .map_err(|e| CliError::Other(anyhow::anyhow!("Report task failed: {}", e)))??;

    write_json(&output, &report)?;
    println!(
        "✓ Report for {} written to: {}",
        report.id_t,
        output.display()
    );
    Ok(())
}
