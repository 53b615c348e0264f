//! # Core Module
//!
//! This module provides the stateless building blocks of the validation
//! report pipeline: the data models every stage exchanges and the readers
//! for the input formats.
//!
//! ## Architecture
//!
//! - **Data Models** ([`models`]) - Entry identity, structural metadata, tool observations,
//!   normalized geometry records and scattering records
//! - **File I/O** ([`io`]) - mmCIF category documents, intensity profiles and geometry
//!   tool exports
//!
//! Nothing in this module performs network access or holds state across
//! entries; orchestration lives in [`crate::engine`] and [`crate::workflows`].

pub mod io;
pub mod models;
