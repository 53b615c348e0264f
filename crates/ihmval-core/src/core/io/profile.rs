use crate::core::io::traits::TextFormat;
use crate::core::models::scattering::ProfilePoint;
use std::io::{self, BufRead};
use thiserror::Error;

/// Number of header lines preceding the numeric rows of an intensity profile.
pub const PROFILE_HEADER_LINES: usize = 4;

#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Line {line}: expected 3 numeric columns (Q, I, E), found {found}")]
    ColumnCount { line: usize, found: usize },
    #[error("Line {line}: invalid number '{value}'")]
    InvalidNumber { line: usize, value: String },
}

/// Whitespace-delimited `Q I E` intensity profile as served by the
/// scattering database.
pub struct IntensityProfile;

impl TextFormat for IntensityProfile {
    type Output = Vec<ProfilePoint>;
    type Error = ProfileError;

    fn read_from(reader: &mut impl BufRead) -> Result<Vec<ProfilePoint>, ProfileError> {
        let mut points = Vec::new();
        for (idx, line) in reader.lines().enumerate() {
            let line = line?;
            let line_num = idx + 1;
            if line_num <= PROFILE_HEADER_LINES || line.trim().is_empty() {
                continue;
            }

            let fields: Vec<&str> = line.split_whitespace().collect();
            if fields.len() != 3 {
                return Err(ProfileError::ColumnCount {
                    line: line_num,
                    found: fields.len(),
                });
            }
            let mut parsed = [0.0f64; 3];
            for (slot, field) in parsed.iter_mut().zip(&fields) {
                *slot = field.parse().map_err(|_| ProfileError::InvalidNumber {
                    line: line_num,
                    value: field.to_string(),
                })?;
            }
            points.push(ProfilePoint {
                q: parsed[0],
                i: parsed[1],
                e: parsed[2],
            });
        }
        Ok(points)
    }
}
