//! Data model for consensus rendering.
//!
//! This module contains the data structures shared by every stage:
//! - Sequences and alignments (immutable once parsed)
//! - Threshold configuration for the highlighter
//! - The per-residue annotation layer produced by the highlighter
//!
//! The annotation is kept separate from the alignment so that parsed data is
//! never rewritten in place.

use std::ops::Range;

use thiserror::Error;

/// Gap symbol recognised in every layout.
pub const GAP: char = '-';

/// Represents a single sequence with its name and residues.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sequence {
    /// The sequence name (FASTA header without '>', MSF row label, ...)
    pub name: String,
    /// The aligned residues, gaps included
    residues: Vec<char>,
}

impl Sequence {
    /// Creates a new sequence.
    pub fn new(name: impl Into<String>, residues: &str) -> Self {
        Self {
            name: name.into(),
            residues: residues.chars().collect(),
        }
    }

    /// Creates a sequence from already collected residues.
    pub fn from_residues(name: impl Into<String>, residues: Vec<char>) -> Self {
        Self {
            name: name.into(),
            residues,
        }
    }

    /// Returns the number of residues (columns) in the sequence.
    pub fn len(&self) -> usize {
        self.residues.len()
    }

    /// Returns true if the sequence has no residues.
    pub fn is_empty(&self) -> bool {
        self.residues.is_empty()
    }

    /// Gets the residue at a specific column.
    pub fn residue_at(&self, col: usize) -> Option<char> {
        self.residues.get(col).copied()
    }

    /// Returns all residues.
    pub fn residues(&self) -> &[char] {
        &self.residues
    }

    /// Gets a slice of the residues, clamped to the sequence length.
    pub fn slice(&self, range: Range<usize>) -> &[char] {
        let start = range.start.min(self.residues.len());
        let end = range.end.min(self.residues.len());
        &self.residues[start..end]
    }

    /// Returns the residues as a string.
    pub fn residues_string(&self) -> String {
        self.residues.iter().collect()
    }
}

/// Represents an alignment of multiple sequences, in order of first appearance.
#[derive(Debug, Clone)]
pub struct Alignment {
    sequences: Vec<Sequence>,
    /// The common length of all sequences, if they agree
    alignment_length: Option<usize>,
    /// Whether all sequences have the same length
    pub is_valid_alignment: bool,
}

impl Alignment {
    /// Creates a new alignment from a vector of sequences.
    pub fn new(sequences: Vec<Sequence>) -> Self {
        let (is_valid, alignment_length) = Self::validate_alignment(&sequences);
        Self {
            sequences,
            alignment_length,
            is_valid_alignment: is_valid,
        }
    }

    /// Validates that all sequences have the same length.
    fn validate_alignment(sequences: &[Sequence]) -> (bool, Option<usize>) {
        let Some(first) = sequences.first() else {
            return (true, None);
        };

        let first_len = first.len();
        if sequences.iter().all(|s| s.len() == first_len) {
            return (true, Some(first_len));
        }

        let (min_len, max_len) = Self::length_bounds(sequences);
        log::warn!(
            "Sequences have different lengths (min: {}, max: {}). Not a valid alignment.",
            min_len,
            max_len
        );
        (false, None)
    }

    fn length_bounds(sequences: &[Sequence]) -> (usize, usize) {
        let min_len = sequences.iter().map(Sequence::len).min().unwrap_or(0);
        let max_len = sequences.iter().map(Sequence::len).max().unwrap_or(0);
        (min_len, max_len)
    }

    /// Returns the shortest and longest sequence lengths.
    pub fn length_range(&self) -> (usize, usize) {
        Self::length_bounds(&self.sequences)
    }

    /// Returns the number of sequences.
    pub fn sequence_count(&self) -> usize {
        self.sequences.len()
    }

    /// Returns the common alignment length, or `None` when lengths disagree
    /// or there are no sequences.
    pub fn alignment_length(&self) -> Option<usize> {
        self.alignment_length
    }

    /// Returns the maximum name length in characters (for display purposes).
    pub fn max_name_length(&self) -> usize {
        self.sequences
            .iter()
            .map(|s| s.name.chars().count())
            .max()
            .unwrap_or(0)
    }

    /// Gets a sequence by index.
    pub fn get(&self, index: usize) -> Option<&Sequence> {
        self.sequences.get(index)
    }

    /// Returns all sequences in order.
    pub fn sequences(&self) -> &[Sequence] {
        &self.sequences
    }

    /// Returns true if the alignment has no sequences.
    pub fn is_empty(&self) -> bool {
        self.sequences.is_empty()
    }
}

/// Errors raised when building a threshold configuration.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Threshold '{name}' must be in (0, 1], got {value}")]
    ThresholdOutOfRange { name: &'static str, value: f64 },
}

/// Frequency thresholds for consensus classification.
///
/// No ordering between the two values is enforced: the high branch is always
/// checked first.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThresholdConfig {
    pub high_thresh: f64,
    pub low_thresh: f64,
}

impl ThresholdConfig {
    pub const DEFAULT_HIGH: f64 = 0.90;
    pub const DEFAULT_LOW: f64 = 0.50;

    /// Creates a configuration, checking that both values lie in (0, 1].
    pub fn new(high_thresh: f64, low_thresh: f64) -> Result<Self, ConfigError> {
        check_threshold("high", high_thresh)?;
        check_threshold("low", low_thresh)?;
        Ok(Self {
            high_thresh,
            low_thresh,
        })
    }
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            high_thresh: Self::DEFAULT_HIGH,
            low_thresh: Self::DEFAULT_LOW,
        }
    }
}

fn check_threshold(name: &'static str, value: f64) -> Result<(), ConfigError> {
    // NaN fails both comparisons
    if value > 0.0 && value <= 1.0 {
        Ok(())
    } else {
        Err(ConfigError::ThresholdOutOfRange { name, value })
    }
}

/// Consensus class of one residue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Consensus {
    #[default]
    Plain,
    Low,
    High,
}

/// Per (sequence, column) consensus classes for one alignment.
///
/// Stored row-major: one row per sequence, `columns` entries per row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotation {
    rows: usize,
    columns: usize,
    classes: Vec<Consensus>,
}

impl Annotation {
    /// Creates an annotation with every residue `Plain`.
    pub fn plain(rows: usize, columns: usize) -> Self {
        Self {
            rows,
            columns,
            classes: vec![Consensus::Plain; rows * columns],
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Gets the class at a (sequence, column) position.
    pub fn get(&self, row: usize, col: usize) -> Option<Consensus> {
        if row < self.rows && col < self.columns {
            Some(self.classes[row * self.columns + col])
        } else {
            None
        }
    }

    /// Returns the classes of one sequence.
    pub fn row(&self, row: usize) -> &[Consensus] {
        let start = (row * self.columns).min(self.classes.len());
        let end = (start + self.columns).min(self.classes.len());
        &self.classes[start..end]
    }

    pub(crate) fn set(&mut self, row: usize, col: usize, class: Consensus) {
        self.classes[row * self.columns + col] = class;
    }
}
