//! # Core Models Module
//!
//! This module contains the data structures shared by the extraction,
//! normalization and composition stages of the report pipeline.
//!
//! ## Key Components
//!
//! - [`entry`] - Canonical entry identifier, entry identity and the per-entry context
//! - [`structure`] - Entities, subunits, datasets, software, protocols and ensembles
//! - [`analysis`] - Observation records of geometry-analysis tools and their access trait
//! - [`geometry`] - Normalized geometry outlier records
//! - [`scattering`] - Scattering profiles, their transforms and database summaries
//!
//! All models are read-only projections computed fresh per invocation; none
//! of them is persisted as authoritative state.

pub mod analysis;
pub mod entry;
pub mod geometry;
pub mod scattering;
pub mod structure;
