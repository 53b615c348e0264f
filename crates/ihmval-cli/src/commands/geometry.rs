use crate::cli::GeometryArgs;
use crate::commands::write_json;
use crate::error::{CliError, Result};
use ihmval::core::io::molprobity::MolprobityExport;
use ihmval::core::io::traits::TextFormat;
use ihmval::engine::geometry;
use tracing::info;

pub async fn run(args: GeometryArgs) -> Result<()> {
    info!("Loading geometry result from {:?}", &args.input);
    let export =
        MolprobityExport::read_from_path(&args.input).map_err(|e| CliError::FileParsing {
            path: args.input.clone(),
            source: e.into(),
        })?;

    let record = geometry::normalize(&export)?;
    write_json(&args.output, &record)?;

    println!(
        "✓ Geometry record ({} clashes, {} bond and {} angle outliers) written to: {}",
        record.clash.clashes_list.len(),
        record.bonds.outliers,
        record.angles.outliers,
        args.output.display()
    );
    Ok(())
}
