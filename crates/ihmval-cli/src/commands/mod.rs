pub mod batch;
pub mod geometry;
pub mod report;

use crate::error::{CliError, Result};
use ihmval::engine::error::EngineError;
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::info;

/// Writes `value` as pretty-printed JSON, creating missing parent directories.
pub(crate) fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, value).map_err(EngineError::from)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    info!("Wrote {:?}", path);
    Ok(())
}

/// Attributes input-format failures to the file they came from.
pub(crate) fn attribute_input_error(
    error: EngineError,
    cif: &Path,
    geometry: Option<&Path>,
) -> CliError {
    match (error, geometry) {
        (EngineError::Cif(e), _) => CliError::FileParsing {
            path: cif.to_path_buf(),
            source: e.into(),
        },
        (EngineError::GeometryInput(e), Some(path)) => CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        },
        (other, _) => CliError::Core(other),
    }
}
