//! # ihmval Core Library
//!
//! Aggregation of integrative-model metadata and structural-quality analyses
//! into one report document per entry.
//!
//! ## Architectural Philosophy
//!
//! The library follows a three-layer architecture:
//!
//! - **[`core`]: The Foundation.** Stateless data models (entries, datasets,
//!   geometry and scattering records) and text-format readers (a STAR/mmCIF
//!   tokenizer, the intensity-profile reader, geometry tool exports).
//!
//! - **[`engine`]: The Logic Core.** Extraction of structural metadata,
//!   normalization of geometry and scattering analyses, and composition of the
//!   report document. Remote access is abstracted behind
//!   [`ScatteringSource`](engine::scattering::ScatteringSource).
//!
//! - **[`workflows`]: The Public API.** Complete procedures for one entry
//!   ([`workflows::report`]) or many ([`workflows::batch`]).

pub mod core;
pub mod engine;
pub mod workflows;
