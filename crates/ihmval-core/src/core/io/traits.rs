use std::error::Error;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

/// Defines the interface for reading a text-based input format.
///
/// This trait provides a common API for the formats consumed by the report
/// pipeline (mmCIF model files, scattering intensity profiles). Implementors
/// handle format-specific tokenizing and produce a typed, owned document.
pub trait TextFormat {
    /// The document type produced by a successful read.
    type Output;

    /// The error type for read operations.
    type Error: Error + From<io::Error>;

    /// Reads a document from a buffered reader.
    ///
    /// # Arguments
    ///
    /// * `reader` - The buffered reader to read from.
    ///
    /// # Return
    ///
    /// Returns the parsed document.
    ///
    /// # Errors
    ///
    /// Returns an error if parsing fails or I/O operations encounter issues.
    fn read_from(reader: &mut impl BufRead) -> Result<Self::Output, Self::Error>;

    /// Reads a document from an in-memory string.
    ///
    /// # Arguments
    ///
    /// * `text` - The complete document text.
    ///
    /// # Errors
    ///
    /// Returns an error if parsing fails.
    fn read_from_str(text: &str) -> Result<Self::Output, Self::Error> {
        let mut reader = text.as_bytes();
        Self::read_from(&mut reader)
    }

    /// Reads a document from a file path.
    ///
    /// # Arguments
    ///
    /// * `path` - The path to the file to read.
    ///
    /// # Return
    ///
    /// Returns the parsed document.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or parsing fails.
    fn read_from_path<P: AsRef<Path>>(path: P) -> Result<Self::Output, Self::Error> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        Self::read_from(&mut reader)
    }
}
