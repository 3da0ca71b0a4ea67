//! Alignment format adapters.
//!
//! Supported inputs:
//! - FASTA (engine output, `--outfmt fa`)
//! - MSF-style interleaved blocks
//! - Marker-annotated reports (pre-classified, bypass the highlighter)
//! - Editable plain text (see [`crate::roundtrip`])
//!
//! The format is always chosen by the caller. Content is never sniffed.

pub mod editable;
pub mod fasta;
pub mod marker;
pub mod msf;

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use thiserror::Error;

use crate::model::Alignment;

/// Input format selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Fasta,
    Msf,
    MarkerDoc,
    Editable,
}

impl std::fmt::Display for FileFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FileFormat::Fasta => write!(f, "FASTA"),
            FileFormat::Msf => write!(f, "MSF"),
            FileFormat::MarkerDoc => write!(f, "marker report"),
            FileFormat::Editable => write!(f, "editable text"),
        }
    }
}

/// Errors that can occur during file parsing.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("FASTA error: {0}")]
    FastaError(#[from] fasta::FastaError),

    #[error("MSF error: {0}")]
    MsfError(#[from] msf::MsfError),

    #[error("Marker report error: {0}")]
    MarkerError(#[from] marker::MarkerError),
}

/// Result type for parsing operations.
pub type ParseResult<T> = Result<T, ParseError>;

/// Output of a format adapter.
#[derive(Debug, Clone)]
pub enum ParsedDocument {
    /// A sequence alignment, still to be highlighted.
    Alignment(Alignment),
    /// Display markup that already carries its consensus annotation.
    Annotated(String),
}

impl ParsedDocument {
    /// Returns the alignment, if this document carries one.
    pub fn alignment(&self) -> Option<&Alignment> {
        match self {
            ParsedDocument::Alignment(alignment) => Some(alignment),
            ParsedDocument::Annotated(_) => None,
        }
    }
}

/// Parses content with a specific format.
pub fn parse_str_as(content: &str, format: FileFormat) -> ParseResult<ParsedDocument> {
    let parsed = match format {
        FileFormat::Fasta => ParsedDocument::Alignment(fasta::parse_fasta_str(content)?),
        FileFormat::Msf => ParsedDocument::Alignment(msf::parse_msf_str(content)?),
        FileFormat::MarkerDoc => ParsedDocument::Annotated(marker::parse_marker_str(content)?),
        FileFormat::Editable => ParsedDocument::Alignment(editable::parse_editable_str(content)),
    };
    Ok(parsed)
}

/// Reads a whole file into memory.
pub fn read_file<P: AsRef<Path>>(path: P) -> ParseResult<String> {
    let file = File::open(&path)?;
    let file_size = file.metadata()?.len() as usize;

    let mut reader = BufReader::with_capacity(1024 * 1024, file);
    let mut content = String::with_capacity(file_size);
    reader.read_to_string(&mut content)?;
    Ok(content)
}

/// Parses a file with an explicit format.
pub fn parse_file_as<P: AsRef<Path>>(path: P, format: FileFormat) -> ParseResult<ParsedDocument> {
    log::debug!("Parsing {} as {}", path.as_ref().display(), format);
    let content = read_file(&path)?;
    parse_str_as(&content, format)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_dispatch_by_selector() {
        let content = ">a\nACGT\n";
        let parsed = parse_str_as(content, FileFormat::Fasta).unwrap();
        assert_eq!(parsed.alignment().unwrap().sequence_count(), 1);

        // Same content, editable selector: the header line is a name
        let parsed = parse_str_as(content, FileFormat::Editable).unwrap();
        assert_eq!(parsed.alignment().unwrap().get(0).unwrap().name, ">a");
    }

    #[test]
    fn test_no_sniffing() {
        // FASTA content under the MSF selector has no delimiter
        let result = parse_str_as(">a\nACGT\n", FileFormat::Msf);
        assert!(matches!(result, Err(ParseError::MsfError(_))));
    }

    #[test]
    fn test_marker_doc_is_annotated() {
        let parsed = parse_str_as("hdr\n//\n[AC]\n", FileFormat::MarkerDoc).unwrap();
        assert!(parsed.alignment().is_none());
        assert!(matches!(
            parsed,
            ParsedDocument::Annotated(ref s) if s.contains("em class='high'")
        ));
    }

    #[test]
    fn test_parse_file_as() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, ">a\nAC-GT\n>b\nACGGT\n").unwrap();

        let parsed = parse_file_as(file.path(), FileFormat::Fasta).unwrap();
        let alignment = parsed.alignment().unwrap();
        assert_eq!(alignment.sequence_count(), 2);
        assert_eq!(alignment.alignment_length(), Some(5));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = parse_file_as(dir.path().join("absent.fa"), FileFormat::Fasta);
        assert!(matches!(result, Err(ParseError::IoError(_))));
    }

    #[test]
    fn test_format_display() {
        assert_eq!(FileFormat::Fasta.to_string(), "FASTA");
        assert_eq!(FileFormat::Msf.to_string(), "MSF");
    }
}
