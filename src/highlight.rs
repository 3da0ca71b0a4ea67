//! Per-column consensus highlighting.
//!
//! For every column the most frequent residue is found, and its share of the
//! sequences decides the class of the residues matching it:
//! - `freq >= high_thresh` → [`Consensus::High`]
//! - else `freq >= low_thresh` → [`Consensus::Low`]
//! - else, or when the majority residue is a gap → [`Consensus::Plain`]
//!
//! Residues that differ from the majority stay plain. Ties between equally
//! frequent residues go to the one met first scanning sequences top to
//! bottom.

use std::collections::HashMap;

use thiserror::Error;

use crate::model::{Alignment, Annotation, Consensus, ThresholdConfig, GAP};

/// Errors that prevent an alignment from being highlighted.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HighlightError {
    #[error("No sequences to highlight")]
    NoSequences,

    #[error("Inconsistent alignment lengths (min: {min}, max: {max})")]
    InconsistentLengths { min: usize, max: usize },
}

/// Which residues count as gaps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GapPolicy {
    /// Only `-`.
    #[default]
    Dash,
    /// `-` and space.
    DashOrSpace,
}

impl GapPolicy {
    pub fn is_gap(self, c: char) -> bool {
        match self {
            GapPolicy::Dash => c == GAP,
            GapPolicy::DashOrSpace => c == GAP || c == ' ',
        }
    }
}

/// Classifies every residue of an alignment.
pub fn highlight(
    alignment: &Alignment,
    thresholds: &ThresholdConfig,
    gaps: GapPolicy,
) -> Result<Annotation, HighlightError> {
    if alignment.is_empty() {
        return Err(HighlightError::NoSequences);
    }
    let Some(length) = alignment.alignment_length() else {
        let (min, max) = alignment.length_range();
        return Err(HighlightError::InconsistentLengths { min, max });
    };

    let sequences = alignment.sequences();
    let total = sequences.len() as f64;
    let mut annotation = Annotation::plain(sequences.len(), length);
    let mut column = Vec::with_capacity(sequences.len());

    for col in 0..length {
        column.clear();
        column.extend(sequences.iter().map(|s| s.residues()[col]));

        let (majority, count) = majority_residue(&column);
        if gaps.is_gap(majority) {
            continue;
        }

        let freq = count as f64 / total;
        let class = if freq >= thresholds.high_thresh {
            Consensus::High
        } else if freq >= thresholds.low_thresh {
            Consensus::Low
        } else {
            continue;
        };

        for (row, &residue) in column.iter().enumerate() {
            if residue == majority {
                annotation.set(row, col, class);
            }
        }
    }

    Ok(annotation)
}

/// Returns the most frequent residue of a non-empty column and its count.
///
/// Among equally frequent residues, the one seen first wins.
fn majority_residue(column: &[char]) -> (char, usize) {
    let mut counts: HashMap<char, usize> = HashMap::with_capacity(column.len());
    let mut first_seen: Vec<char> = Vec::new();

    for &residue in column {
        let count = counts.entry(residue).or_insert(0);
        if *count == 0 {
            first_seen.push(residue);
        }
        *count += 1;
    }

    let mut best = (first_seen[0], counts[&first_seen[0]]);
    for &residue in &first_seen[1..] {
        let count = counts[&residue];
        if count > best.1 {
            best = (residue, count);
        }
    }
    best
}
