//! # consview - Consensus-highlighted alignment rendering
//!
//! Renders multiple sequence alignments produced by external engines as
//! markup documents where each column's consensus residue is emphasised,
//! and round-trips alignments through an editable plain-text form.
//!
//! ## Architecture
//!
//! Data flows leaf-first through stateless functions:
//! - `formats`: FASTA, MSF, marker-report and editable-text adapters
//! - `model`: sequences, alignments, thresholds and the annotation layer
//! - `highlight`: per-column majority classification (plain / low / high)
//! - `render`: chunked layouts, stylesheet and placeholders
//! - `roundtrip`: editable export and re-import
//! - `engine`: running an external aligner and collecting its output
//! - `pipeline`: glue that always yields a displayable document

pub mod engine;
pub mod formats;
pub mod highlight;
pub mod model;
pub mod pipeline;
pub mod render;
pub mod roundtrip;
