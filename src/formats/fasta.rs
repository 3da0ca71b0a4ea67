//! FASTA alignment parser.
//!
//! Handles the aligned FASTA written by engines such as Clustal Omega
//! (`--outfmt fa`). Sequences may span several lines.
//!
//! ## FASTA Format
//!
//! ```text
//! >sequence name, kept verbatim
//! AC-GT
//! ACG
//! >another_sequence
//! ACGGTACGT
//! ```
//!
//! Blank lines are ignored. Lines before the first header carry no name and
//! are discarded, as are records whose header is empty.

use thiserror::Error;

use crate::model::{Alignment, Sequence};

/// Errors that can occur during FASTA parsing.
#[derive(Error, Debug)]
pub enum FastaError {
    #[error("Failed to read FASTA input: {0}")]
    IoError(#[from] std::io::Error),

    #[error("No FASTA header line ('>') found")]
    NoHeader,
}

/// Result type for FASTA operations.
pub type FastaResult<T> = Result<T, FastaError>;

/// Accumulates records line by line.
#[derive(Default)]
struct FastaBuilder {
    sequences: Vec<Sequence>,
    current_name: Option<String>,
    current_residues: Vec<char>,
    discarded_lines: usize,
    unnamed_records: usize,
}

impl FastaBuilder {
    fn push_line(&mut self, line: &str) {
        let line = line.trim();

        // Skip empty lines
        if line.is_empty() {
            return;
        }

        if let Some(header) = line.strip_prefix('>') {
            self.flush();
            self.current_name = Some(header.to_string());
        } else if self.current_name.is_some() {
            self.current_residues.extend(line.chars());
        } else {
            self.discarded_lines += 1;
        }
    }

    fn flush(&mut self) {
        if let Some(name) = self.current_name.take() {
            let residues = std::mem::take(&mut self.current_residues);
            // A blank name line would read back as a block separator
            if name.is_empty() {
                self.unnamed_records += 1;
                return;
            }
            self.sequences.push(Sequence::from_residues(name, residues));
        }
    }

    fn finish(mut self) -> FastaResult<Alignment> {
        // Don't forget the last record
        self.flush();

        if self.discarded_lines > 0 {
            log::debug!(
                "Discarded {} FASTA line(s) before the first header",
                self.discarded_lines
            );
        }
        if self.unnamed_records > 0 {
            log::debug!("Skipped {} FASTA record(s) with an empty header", self.unnamed_records);
        }
        if self.sequences.is_empty() {
            return Err(FastaError::NoHeader);
        }

        log::debug!("Parsed {} FASTA record(s)", self.sequences.len());
        Ok(Alignment::new(self.sequences))
    }
}

/// Parses FASTA content from a string.
///
/// # Examples
///
/// ```
/// use consview::formats::fasta::parse_fasta_str;
///
/// let alignment = parse_fasta_str(">A\nAC-GT\n>B\nACGGT\n").unwrap();
/// assert_eq!(alignment.sequence_count(), 2);
/// ```
pub fn parse_fasta_str(content: &str) -> FastaResult<Alignment> {
    let mut builder = FastaBuilder::default();
    for line in content.lines() {
        builder.push_line(line);
    }
    builder.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_fasta() {
        let content = ">seq1\nACGT\n>seq2\nTGCA\n";
        let alignment = parse_fasta_str(content).unwrap();

        assert_eq!(alignment.sequence_count(), 2);
        assert_eq!(alignment.get(0).unwrap().name, "seq1");
        assert_eq!(alignment.get(0).unwrap().residues_string(), "ACGT");
        assert_eq!(alignment.get(1).unwrap().name, "seq2");
        assert_eq!(alignment.get(1).unwrap().residues_string(), "TGCA");
    }

    #[test]
    fn test_parse_multiline_sequence() {
        let content = ">seq1\nACGT\nTGCA\nAAAA\n";
        let alignment = parse_fasta_str(content).unwrap();

        assert_eq!(alignment.sequence_count(), 1);
        assert_eq!(alignment.get(0).unwrap().residues_string(), "ACGTTGCAAAAA");
    }

    #[test]
    fn test_header_kept_verbatim() {
        let content = ">seq1 Homo sapiens | chr1\nACGT\n";
        let alignment = parse_fasta_str(content).unwrap();

        assert_eq!(alignment.get(0).unwrap().name, "seq1 Homo sapiens | chr1");
    }

    #[test]
    fn test_parse_with_empty_lines() {
        let content = ">seq1\nACGT\n\n>seq2\n\nTGCA\n";
        let alignment = parse_fasta_str(content).unwrap();

        assert_eq!(alignment.sequence_count(), 2);
        assert_eq!(alignment.get(0).unwrap().residues_string(), "ACGT");
        assert_eq!(alignment.get(1).unwrap().residues_string(), "TGCA");
    }

    #[test]
    fn test_record_without_residues_is_kept() {
        let content = ">seq1\n>seq2\nTGCA\n";
        let alignment = parse_fasta_str(content).unwrap();

        assert_eq!(alignment.sequence_count(), 2);
        assert!(alignment.get(0).unwrap().is_empty());
        assert!(!alignment.is_valid_alignment);
    }

    #[test]
    fn test_lines_before_header_discarded() {
        let content = "ACGT\n>seq1\nTGCA\n";
        let alignment = parse_fasta_str(content).unwrap();

        assert_eq!(alignment.sequence_count(), 1);
        assert_eq!(alignment.get(0).unwrap().residues_string(), "TGCA");
    }

    #[test]
    fn test_no_header() {
        assert!(matches!(parse_fasta_str(""), Err(FastaError::NoHeader)));
        assert!(matches!(
            parse_fasta_str("ACGT\nTGCA\n"),
            Err(FastaError::NoHeader)
        ));
    }

    #[test]
    fn test_empty_header_skipped() {
        let content = ">\nACGT\n>b\nACGT\n";
        let alignment = parse_fasta_str(content).unwrap();

        let names: Vec<_> = alignment.sequences().iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["b"]);
        assert_eq!(alignment.get(0).unwrap().residues_string(), "ACGT");
    }

    #[test]
    fn test_only_empty_headers() {
        assert!(matches!(parse_fasta_str(">  \nACGT\n"), Err(FastaError::NoHeader)));
    }

    #[test]
    fn test_case_preservation() {
        let content = ">seq1\nacgt\n";
        let alignment = parse_fasta_str(content).unwrap();
        assert_eq!(alignment.get(0).unwrap().residues_string(), "acgt");
    }
}
