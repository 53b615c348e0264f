//! Provides readers for the text formats consumed by the report pipeline.
//!
//! This module contains the mmCIF reader, the scattering intensity-profile
//! reader and the JSON adapter for geometry-analysis tool output, all behind
//! the shared [`traits::TextFormat`] interface.

pub mod cif;
pub mod molprobity;
pub mod profile;
pub mod traits;
