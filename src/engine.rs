//! Boundary to external alignment engines.
//!
//! The engine is an opaque program: it is handed an input path, run to
//! completion, and its declared output file is read back. The exit status and
//! stderr are only logged. The one failure detected here is a missing
//! output file.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;

use tempfile::{NamedTempFile, TempPath};
use thiserror::Error;

use crate::formats::{FileFormat, ParseError};

/// Errors at the engine boundary.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("No sequences provided")]
    EmptyInput,

    #[error("Alignment engine '{0}' could not be started")]
    NotFound(String),

    #[error("Alignment engine produced no output at {0}")]
    MissingOutput(PathBuf),

    #[error("Alignment engine output at {path} could not be parsed: {source}")]
    UnreadableOutput {
        path: PathBuf,
        #[source]
        source: ParseError,
    },

    #[error("Engine I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// An external multiple sequence alignment program.
pub trait AlignmentEngine {
    /// Short program name, for logs.
    fn name(&self) -> &str;

    /// Builds the command aligning `input` into `output`.
    fn command(&self, input: &Path, output: &Path) -> Command;

    /// Format of the file the engine writes.
    fn output_format(&self) -> FileFormat;
}

/// Clustal Omega, writing aligned FASTA.
#[derive(Debug, Clone)]
pub struct ClustalOmega {
    binary_path: PathBuf,
}

impl ClustalOmega {
    pub const PROGRAM: &'static str = "clustalo";

    /// Uses the given binary, or looks `clustalo` up on PATH.
    pub fn new(binary_path: Option<PathBuf>) -> Self {
        let binary_path = binary_path.unwrap_or_else(|| {
            which::which(Self::PROGRAM).unwrap_or_else(|_| PathBuf::from(Self::PROGRAM))
        });
        Self { binary_path }
    }

    pub fn binary_path(&self) -> &Path {
        &self.binary_path
    }
}

impl AlignmentEngine for ClustalOmega {
    fn name(&self) -> &str {
        Self::PROGRAM
    }

    fn command(&self, input: &Path, output: &Path) -> Command {
        let mut cmd = Command::new(&self.binary_path);
        cmd.arg("-i")
            .arg(input)
            .arg("-o")
            .arg(output)
            .arg("--force")
            .args(["--outfmt", "fa"]);
        cmd
    }

    fn output_format(&self) -> FileFormat {
        FileFormat::Fasta
    }
}

/// Work files of one engine run.
///
/// Both files live in the caller's work directory and are removed when the
/// job is dropped.
#[derive(Debug)]
pub struct EngineJob {
    input: TempPath,
    output: TempPath,
}

impl EngineJob {
    /// File holding the submitted sequences.
    pub fn input(&self) -> &Path {
        &self.input
    }

    /// File the engine is told to write.
    pub fn output(&self) -> &Path {
        &self.output
    }
}

fn work_file(dir: &Path, suffix: &str) -> EngineResult<NamedTempFile> {
    Ok(tempfile::Builder::new()
        .prefix("submission_")
        .suffix(suffix)
        .tempfile_in(dir)?)
}

/// Writes the user's raw sequences to a fresh input file in `dir`, and
/// reserves the output file next to it.
pub fn write_submission(raw: &str, dir: &Path) -> EngineResult<EngineJob> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(EngineError::EmptyInput);
    }

    let mut input = work_file(dir, ".fasta")?;
    input.write_all(raw.as_bytes())?;
    input.flush()?;
    let output = work_file(dir, ".aln")?;

    let job = EngineJob {
        input: input.into_temp_path(),
        output: output.into_temp_path(),
    };
    log::debug!("Wrote submission to {}", job.input().display());
    Ok(job)
}

/// Runs the engine and waits for it. Returns the output path if the engine
/// wrote the declared file.
///
/// The output file is reserved empty beforehand, so an empty file counts as
/// missing.
pub fn run<'a, E: AlignmentEngine + ?Sized>(
    engine: &E,
    job: &'a EngineJob,
) -> EngineResult<&'a Path> {
    let mut cmd = engine.command(job.input(), job.output());
    log::info!("Running {}: {:?}", engine.name(), cmd);

    let output = cmd.output().map_err(|e| {
        log::warn!("Failed to start {}: {}", engine.name(), e);
        EngineError::NotFound(engine.name().to_string())
    })?;

    if !output.status.success() {
        log::warn!(
            "{} exited with {}: {}",
            engine.name(),
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }

    let written = fs::metadata(job.output()).is_ok_and(|m| m.is_file() && m.len() > 0);
    if !written {
        return Err(EngineError::MissingOutput(job.output().to_path_buf()));
    }
    Ok(job.output())
}
