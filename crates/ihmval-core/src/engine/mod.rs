//! # Engine Module
//!
//! This module implements the stages of the validation report pipeline:
//! structural extraction, metric normalization and report composition.
//!
//! ## Overview
//!
//! Every stage is a function from typed inputs to a complete typed output or
//! an [`EngineError`](error::EngineError). No stage keeps state between
//! calls; per-entry values are carried by
//! [`EntryContext`](crate::core::models::entry::EntryContext).
//!
//! ## Architecture
//!
//! - **Extraction** ([`extract`]) - mmCIF categories into [`StructuralMetadata`](crate::core::models::entry::StructuralMetadata)
//! - **Geometry Normalization** ([`geometry`]) - Tool results into a canonical
//!   geometry record
//! - **Scattering Normalization** ([`scattering`]) - Remote scattering entries
//!   into a derived profile and parameter table
//! - **Composition** ([`compose`]) - The report document and its JSON forms
//! - **Configuration** ([`config`]) - Report options and their builder
//! - **Progress Monitoring** ([`progress`]) - Progress events for front ends
//! - **Error Handling** ([`error`]) - Engine-specific error types

pub mod compose;
pub mod config;
pub mod error;
pub mod extract;
pub mod geometry;
pub mod progress;
pub mod scattering;
