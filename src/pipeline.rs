//! End-to-end rendering: parse → highlight → render.
//!
//! Every entry point returns a displayable document. Failures become one of
//! the fixed placeholder pages below instead of propagating.

use std::path::Path;

use thiserror::Error;

use crate::engine::{self, AlignmentEngine, EngineError};
use crate::formats::{parse_file_as, FileFormat, ParseError, ParsedDocument};
use crate::render::{render, render_passthrough, Layout, RenderOptions};

const BACK_LINK: &str = "<a href=\"/\">Go Back</a>";

/// Any failure between user input and a rendered document.
#[derive(Error, Debug)]
pub enum Failure {
    #[error(transparent)]
    Format(#[from] ParseError),

    #[error(transparent)]
    Engine(#[from] EngineError),
}

impl Failure {
    /// Fixed user-facing document for this failure.
    pub fn placeholder(&self) -> String {
        let message = match self {
            Failure::Format(_) => "Could not read the alignment: unrecognised or unreadable input.",
            Failure::Engine(EngineError::EmptyInput) => {
                "No sequences provided. Please paste FASTA sequences."
            }
            Failure::Engine(_) => "Alignment failed or no valid sequences found.",
        };
        format!("<p>{message}</p>\n{BACK_LINK}")
    }
}

/// Renders a parsed document. Pre-annotated documents always use passthrough.
pub fn render_document(parsed: &ParsedDocument, layout: Layout, options: &RenderOptions) -> String {
    match parsed {
        ParsedDocument::Alignment(alignment) => render(alignment, layout, options),
        ParsedDocument::Annotated(markup) => render_passthrough(markup),
    }
}

/// Parses a file with an explicit format and renders it.
pub fn render_file<P: AsRef<Path>>(
    path: P,
    format: FileFormat,
    layout: Layout,
    options: &RenderOptions,
) -> String {
    match parse_file_as(&path, format) {
        Ok(parsed) => render_document(&parsed, layout, options),
        Err(e) => {
            log::warn!("{}: {}", path.as_ref().display(), e);
            Failure::from(e).placeholder()
        }
    }
}

/// Aligns raw user sequences with an external engine and renders the result
/// in the per-sequence layout.
pub fn align_and_render<E: AlignmentEngine + ?Sized>(
    raw: &str,
    engine: &E,
    workdir: &Path,
    options: &RenderOptions,
) -> String {
    match align(raw, engine, workdir) {
        Ok(parsed) => render_document(&parsed, Layout::PerSequenceSnippet, options),
        Err(e) => {
            log::warn!("{}", e);
            e.placeholder()
        }
    }
}

fn align<E: AlignmentEngine + ?Sized>(
    raw: &str,
    engine: &E,
    workdir: &Path,
) -> Result<ParsedDocument, Failure> {
    let job = engine::write_submission(raw, workdir)?;
    let output = engine::run(engine, &job)?;

    let parsed = parse_file_as(output, engine.output_format()).map_err(|source| {
        EngineError::UnreadableOutput {
            path: output.to_path_buf(),
            source,
        }
    })?;

    if parsed.alignment().is_some_and(|a| a.is_empty()) {
        return Err(EngineError::MissingOutput(output.to_path_buf()).into());
    }
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::process::Command;

    use super::*;
    use crate::formats::fasta::FastaError;
    use crate::render::{INCONSISTENT_LENGTHS, NO_RESULTS, STYLESHEET};

    struct CopyEngine;

    impl AlignmentEngine for CopyEngine {
        fn name(&self) -> &str {
            "cp"
        }

        fn command(&self, input: &Path, output: &Path) -> Command {
            let mut cmd = Command::new("cp");
            cmd.arg(input).arg(output);
            cmd
        }

        fn output_format(&self) -> FileFormat {
            FileFormat::Fasta
        }
    }

    struct SilentEngine;

    impl AlignmentEngine for SilentEngine {
        fn name(&self) -> &str {
            "true"
        }

        fn command(&self, _input: &Path, _output: &Path) -> Command {
            Command::new("true")
        }

        fn output_format(&self) -> FileFormat {
            FileFormat::Fasta
        }
    }

    fn write_temp(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_render_file_fasta() {
        let file = write_temp(">A\nAC-GT\n>B\nACGGT\n");
        let document = render_file(
            file.path(),
            FileFormat::Fasta,
            Layout::PerSequenceSnippet,
            &RenderOptions::default(),
        );
        assert!(document.starts_with(STYLESHEET));
        assert!(document.contains("A\n"));
    }

    #[test]
    fn test_render_file_marker_passthrough() {
        let file = write_temp("report\n//\nseq1 [AC][GT]\n");
        let document = render_file(
            file.path(),
            FileFormat::MarkerDoc,
            Layout::LabeledStacked,
            &RenderOptions::default(),
        );
        assert!(document.contains("seq1 <em class='high'>ACGT</em>\n"));
    }

    #[test]
    fn test_render_file_format_error() {
        let file = write_temp("ACGT\n");
        let document = render_file(
            file.path(),
            FileFormat::Fasta,
            Layout::PerSequenceSnippet,
            &RenderOptions::default(),
        );
        assert!(document.starts_with("<p>Could not read the alignment"));
        assert!(document.contains(BACK_LINK));
    }

    #[test]
    fn test_render_file_inconsistent() {
        let file = write_temp("//\na ACGTACGTAC\nb ACGTACGTACGT\n");
        let layouts = [
            Layout::LabeledStacked,
            Layout::UnlabeledStacked,
            Layout::PerSequenceSnippet,
        ];
        for layout in layouts {
            let document =
                render_file(file.path(), FileFormat::Msf, layout, &RenderOptions::default());
            assert_eq!(document, INCONSISTENT_LENGTHS);
        }
    }

    #[test]
    fn test_render_file_empty_editable() {
        let file = write_temp("\n\n");
        let document = render_file(
            file.path(),
            FileFormat::Editable,
            Layout::LabeledStacked,
            &RenderOptions::default(),
        );
        assert_eq!(document, NO_RESULTS);
    }

    #[test]
    fn test_failure_placeholders() {
        let empty = Failure::from(EngineError::EmptyInput).placeholder();
        assert!(empty.starts_with("<p>No sequences provided."));

        let missing = Failure::from(EngineError::MissingOutput("out.aln".into())).placeholder();
        assert!(missing.starts_with("<p>Alignment failed"));
        assert!(missing.ends_with(BACK_LINK));

        let format = Failure::from(ParseError::FastaError(FastaError::NoHeader)).placeholder();
        assert!(format.starts_with("<p>Could not read the alignment"));
        assert!(format.ends_with(BACK_LINK));
    }

    #[test]
    fn test_align_empty_input() {
        let dir = tempfile::tempdir().unwrap();
        let document = align_and_render("   ", &CopyEngine, dir.path(), &RenderOptions::default());
        assert!(document.starts_with("<p>No sequences provided."));
    }

    #[cfg(unix)]
    #[test]
    fn test_align_and_render() {
        let dir = tempfile::tempdir().unwrap();
        let document = align_and_render(
            ">A\nAC-GT\n>B\nACGGT\n",
            &CopyEngine,
            dir.path(),
            &RenderOptions::default(),
        );
        assert!(document.starts_with(STYLESHEET));
        assert!(document.contains("B\n<em class='high'>A</em><em class='high'>C</em>G"));
    }

    #[cfg(unix)]
    #[test]
    fn test_align_engine_failure() {
        let dir = tempfile::tempdir().unwrap();
        let document =
            align_and_render(">A\nACGT\n", &SilentEngine, dir.path(), &RenderOptions::default());
        assert!(document.starts_with("<p>Alignment failed"));
    }

    #[cfg(unix)]
    #[test]
    fn test_align_output_without_sequences() {
        let dir = tempfile::tempdir().unwrap();
        // Copied input has no FASTA header, so the output is unreadable
        let document = align_and_render("ACGT", &CopyEngine, dir.path(), &RenderOptions::default());
        assert!(document.starts_with("<p>Alignment failed"));
    }

    #[cfg(unix)]
    #[test]
    fn test_align_unparsable_output_reported() {
        let dir = tempfile::tempdir().unwrap();
        let result = align("ACGT", &CopyEngine, dir.path());
        assert!(matches!(
            result,
            Err(Failure::Engine(EngineError::UnreadableOutput {
                source: ParseError::FastaError(FastaError::NoHeader),
                ..
            }))
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_align_leaves_workdir_empty() {
        let dir = tempfile::tempdir().unwrap();
        let options = RenderOptions::default();
        for _ in 0..3 {
            align_and_render(">A\nAC-GT\n>B\nACGGT\n", &CopyEngine, dir.path(), &options);
            align_and_render(">A\nACGT\n", &SilentEngine, dir.path(), &options);
            align_and_render("ACGT", &CopyEngine, dir.path(), &options);
        }
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
