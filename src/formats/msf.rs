//! MSF-style block alignment parser.
//!
//! ## MSF Format
//!
//! A free-form header is terminated by a line starting with `//`. The
//! alignment follows in interleaved blocks separated by blank lines:
//! ```text
//!  PileUp
//!
//!   MSF: 20  Type: P  Check: 1234 ..
//!
//! //
//!
//!            1                                   20
//! seq1       ACGTA CGTAC
//! seq2       ACG-A CGTAC
//! Consensus  ACGtA CGTAC
//!
//! seq1       GGGGG
//! seq2       GGGGG
//! ```
//!
//! Position rulers (digit-only first token) and `Consensus` rows are
//! skipped. Residue groups after the name are concatenated, and each name
//! accumulates across blocks.

use std::collections::HashMap;

use thiserror::Error;

use crate::model::{Alignment, Sequence};

/// Errors that can occur during MSF parsing.
#[derive(Error, Debug)]
pub enum MsfError {
    #[error("No '//' line separating the MSF header from the alignment")]
    MissingDelimiter,
}

/// Result type for MSF operations.
pub type MsfResult<T> = Result<T, MsfError>;

/// Parses MSF content from a string.
pub fn parse_msf_str(content: &str) -> MsfResult<Alignment> {
    let mut lines = content.lines();

    // Everything up to and including the delimiter is header
    lines
        .by_ref()
        .find(|line| line.trim().starts_with("//"))
        .ok_or(MsfError::MissingDelimiter)?;

    let mut order: Vec<(String, Vec<char>)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut skipped = 0usize;

    for line in lines {
        let mut tokens = line.split_whitespace();
        let Some(first) = tokens.next() else {
            // Blank line: block boundary
            continue;
        };

        if is_ruler(first) || first.eq_ignore_ascii_case("consensus") {
            skipped += 1;
            continue;
        }

        let slot = match index.get(first) {
            Some(&i) => i,
            None => {
                index.insert(first.to_string(), order.len());
                order.push((first.to_string(), Vec::new()));
                order.len() - 1
            }
        };
        order[slot].1.extend(tokens.flat_map(str::chars));
    }

    log::debug!(
        "Parsed {} MSF sequence(s), skipped {} ruler/consensus line(s)",
        order.len(),
        skipped
    );

    Ok(Alignment::new(
        order
            .into_iter()
            .map(|(name, residues)| Sequence::from_residues(name, residues))
            .collect(),
    ))
}

/// A position ruler is a row whose first token is all digits.
fn is_ruler(token: &str) -> bool {
    token.chars().all(|c| c.is_ascii_digit())
}
