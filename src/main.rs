//! consview - Consensus-highlighted alignment renderer
//!
//! ## Usage
//!
//! ```bash
//! consview render -f fasta -l labeled aligned.fa > aligned.html
//! consview export -f msf aligned.msf -o edit.txt
//! consview reimport edit.txt
//! consview align sequences.fa --engine-path /usr/bin/clustalo
//! ```

// Use jemalloc for better memory management (returns memory to OS)
#[cfg(not(windows))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};

use consview::engine::ClustalOmega;
use consview::formats::{self, parse_file_as, FileFormat, ParsedDocument};
use consview::model::ThresholdConfig;
use consview::pipeline::{align_and_render, render_file};
use consview::render::{Layout, RenderOptions, DEFAULT_CHUNK_WIDTH};
use consview::roundtrip::{export_editable, reimport};

/// Input format specification for command line
#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatArg {
    /// Aligned FASTA
    Fasta,
    /// MSF-style interleaved blocks
    Msf,
    /// Marker-annotated report ([high] and (low) runs)
    Marker,
    /// Editable plain text (name line, residue line, blank line)
    Editable,
}

impl From<FormatArg> for FileFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Fasta => FileFormat::Fasta,
            FormatArg::Msf => FileFormat::Msf,
            FormatArg::Marker => FileFormat::MarkerDoc,
            FormatArg::Editable => FileFormat::Editable,
        }
    }
}

/// Layout specification for command line
#[derive(Debug, Clone, Copy, ValueEnum)]
enum LayoutArg {
    /// Column chunks with position labels and names
    Labeled,
    /// Column chunks, residue rows only
    Unlabeled,
    /// Each sequence with its own wrapped residues
    Snippet,
}

impl From<LayoutArg> for Layout {
    fn from(arg: LayoutArg) -> Self {
        match arg {
            LayoutArg::Labeled => Layout::LabeledStacked,
            LayoutArg::Unlabeled => Layout::UnlabeledStacked,
            LayoutArg::Snippet => Layout::PerSequenceSnippet,
        }
    }
}

/// Highlighting and chunking options shared by rendering commands.
#[derive(Args, Debug)]
struct RenderArgs {
    /// Minimum majority frequency for high consensus (0 < x <= 1)
    #[arg(long = "high", default_value_t = ThresholdConfig::DEFAULT_HIGH)]
    high: f64,

    /// Minimum majority frequency for low consensus (0 < x <= 1)
    #[arg(long = "low", default_value_t = ThresholdConfig::DEFAULT_LOW)]
    low: f64,

    /// Residues per output line
    #[arg(short = 'w', long = "width", default_value_t = DEFAULT_CHUNK_WIDTH)]
    width: usize,

    /// Output file. Use "-" for stdout.
    #[arg(short = 'o', long = "output", default_value = "-")]
    output: String,
}

impl RenderArgs {
    fn options(&self) -> Result<RenderOptions> {
        if self.width == 0 {
            anyhow::bail!("Width must be at least 1");
        }
        let thresholds = ThresholdConfig::new(self.high, self.low)?;
        Ok(RenderOptions {
            chunk_width: self.width,
            thresholds,
        })
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render an alignment file as a highlighted document
    Render {
        /// Alignment file
        file: PathBuf,

        #[arg(short = 'f', long = "format", value_enum)]
        format: FormatArg,

        #[arg(short = 'l', long = "layout", value_enum, default_value = "snippet")]
        layout: LayoutArg,

        #[command(flatten)]
        render: RenderArgs,
    },

    /// Export an alignment as editable plain text
    Export {
        /// Alignment file
        file: PathBuf,

        #[arg(short = 'f', long = "format", value_enum)]
        format: FormatArg,

        /// Output file. Use "-" for stdout.
        #[arg(short = 'o', long = "output", default_value = "-")]
        output: String,
    },

    /// Re-check an edited plain-text alignment
    Reimport {
        /// Edited plain-text file
        file: PathBuf,

        #[arg(short = 'l', long = "layout", value_enum, default_value = "snippet")]
        layout: LayoutArg,

        #[command(flatten)]
        render: RenderArgs,
    },

    /// Align raw FASTA sequences with Clustal Omega and render the result
    Align {
        /// Unaligned FASTA sequences
        input: PathBuf,

        /// Path to the clustalo binary (default: looked up on PATH)
        #[arg(long = "engine-path")]
        engine_path: Option<PathBuf>,

        /// Directory for engine work files
        #[arg(long = "workdir")]
        workdir: Option<PathBuf>,

        #[command(flatten)]
        render: RenderArgs,
    },
}

/// consview - Consensus-highlighted rendering of sequence alignments
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable debug logging
    #[arg(short = 'v', long = "verbose", global = true)]
    verbose: bool,
}

/// Writes a document to a file, or to stdout for "-".
fn write_output(output: &str, document: &str) -> Result<()> {
    if output == "-" {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        handle.write_all(document.as_bytes())?;
        handle.flush()?;
    } else {
        std::fs::write(output, document).with_context(|| format!("write {}", output))?;
        log::info!("Wrote {} bytes to {}", document.len(), output);
    }
    Ok(())
}

fn run_export(file: &Path, format: FileFormat, output: &str) -> Result<()> {
    let parsed = parse_file_as(file, format)?;
    let ParsedDocument::Alignment(alignment) = parsed else {
        anyhow::bail!("{} input is already annotated and cannot be exported for editing", format);
    };
    write_output(output, &export_editable(&alignment))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    match cli.command {
        Command::Render {
            file,
            format,
            layout,
            render,
        } => {
            let options = render.options()?;
            let document = render_file(&file, format.into(), layout.into(), &options);
            write_output(&render.output, &document)
        }
        Command::Export {
            file,
            format,
            output,
        } => run_export(&file, format.into(), &output),
        Command::Reimport {
            file,
            layout,
            render,
        } => {
            let options = render.options()?;
            let text = formats::read_file(&file)?;
            write_output(&render.output, &reimport(&text, layout.into(), &options))
        }
        Command::Align {
            input,
            engine_path,
            workdir,
            render,
        } => {
            let options = render.options()?;
            let raw = formats::read_file(&input)?;
            let engine = ClustalOmega::new(engine_path);
            log::info!("Using aligner at {}", engine.binary_path().display());

            let workdir = workdir.unwrap_or_else(std::env::temp_dir);
            let document = align_and_render(&raw, &engine, &workdir, &options);
            write_output(&render.output, &document)
        }
    }
}
