//! Editable plain-text alignment parser.
//!
//! This is the format produced by [`crate::roundtrip::export_editable`]:
//! ```text
//! seq1
//! AC-GT
//!
//! seq2
//! ACGGT
//!
//! ```
//!
//! Blocks are separated by blank lines. The first line of a block is the
//! name, kept as written. Every following line is trimmed and appended to the
//! residues. Lengths are not checked here; the highlighter and renderer
//! report inconsistent alignments.

use crate::model::{Alignment, Sequence};

/// Parses editable plain text. Never fails: malformed input yields fewer or
/// shorter sequences.
pub fn parse_editable_str(content: &str) -> Alignment {
    let mut sequences = Vec::new();
    let mut current: Option<(String, Vec<char>)> = None;

    for line in content.lines() {
        if line.trim().is_empty() {
            if let Some((name, residues)) = current.take() {
                sequences.push(Sequence::from_residues(name, residues));
            }
            continue;
        }

        match current.as_mut() {
            None => current = Some((line.to_string(), Vec::new())),
            Some((_, residues)) => residues.extend(line.trim().chars()),
        }
    }

    if let Some((name, residues)) = current {
        sequences.push(Sequence::from_residues(name, residues));
    }

    log::debug!("Parsed {} editable block(s)", sequences.len());
    Alignment::new(sequences)
}
