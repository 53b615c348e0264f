//! # Workflows Module
//!
//! High-level entry points that run the complete report pipeline for one
//! entry or for many.
//!
//! ## Overview
//!
//! Workflows tie the `core` readers and the `engine` stages together. Each
//! one parses its inputs, runs extraction and both normalizers, composes the
//! report and emits progress events along the way.
//!
//! ## Architecture
//!
//! - **Report Workflow** ([`report`]) - One entry end-to-end: mmCIF document,
//!   optional geometry result and scattering fetches into a
//!   [`ReportDocument`](crate::engine::compose::ReportDocument).
//! - **Batch Workflow** ([`batch`]) - Task-per-entry fan-out with outcomes
//!   returned in input order; entries run in parallel with the `parallel`
//!   feature.

pub mod batch;
pub mod report;
