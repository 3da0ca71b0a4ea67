//! Markup rendering of highlighted alignments.
//!
//! Every document starts with a fixed three-class stylesheet followed by a
//! `<pre class='seq'>` body. Residues are wrapped one by one:
//! - High → `<em class='high'>X</em>`
//! - Low → `<em class='low'>X</em>`
//! - Plain → `X`
//!
//! Empty and inconsistent alignments render a fixed placeholder instead of a
//! document.

use std::fmt::Write;

use crate::highlight::{highlight, GapPolicy, HighlightError};
use crate::model::{Alignment, Annotation, Consensus, Sequence, ThresholdConfig};

/// Stylesheet emitted at the top of every document.
pub const STYLESHEET: &str = "<style type='text/css'>
pre.seq  { color: black; background-color: white; }
em.high  { color: red;   background-color: white; font-style: normal; }
em.low   { color: blue;  background-color: white; font-style: normal; }
</style>
";

pub const PRE_OPEN: &str = "<pre class='seq'>";
pub const PRE_CLOSE: &str = "</pre>";

pub const HIGH_OPEN: &str = "<em class='high'>";
pub const LOW_OPEN: &str = "<em class='low'>";
pub const MARK_CLOSE: &str = "</em>";

/// Placeholder for an alignment without sequences.
pub const NO_RESULTS: &str = "<p>No alignment results available.</p>";
/// Placeholder for sequences of differing lengths.
pub const INCONSISTENT_LENGTHS: &str = "<p>Error: Inconsistent alignment lengths!</p>";

/// Default number of columns per chunk.
pub const DEFAULT_CHUNK_WIDTH: usize = 60;

/// Chunked layouts for a highlighted alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Layout {
    /// Column chunks with a position label and named rows.
    LabeledStacked,
    /// Column chunks with residue rows only.
    UnlabeledStacked,
    /// One name per sequence followed by its own wrapped residues.
    #[default]
    PerSequenceSnippet,
}

impl Layout {
    /// Gap symbols used when highlighting for this layout.
    pub fn gap_policy(self) -> GapPolicy {
        match self {
            Layout::UnlabeledStacked => GapPolicy::DashOrSpace,
            Layout::LabeledStacked | Layout::PerSequenceSnippet => GapPolicy::Dash,
        }
    }
}

/// Rendering parameters supplied per call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderOptions {
    /// Columns per chunk; 0 is treated as 1
    pub chunk_width: usize,
    pub thresholds: ThresholdConfig,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            chunk_width: DEFAULT_CHUNK_WIDTH,
            thresholds: ThresholdConfig::default(),
        }
    }
}

impl RenderOptions {
    fn width(&self) -> usize {
        self.chunk_width.max(1)
    }
}

/// Returns the placeholder document for a highlighting failure.
pub fn placeholder(error: &HighlightError) -> &'static str {
    match error {
        HighlightError::NoSequences => NO_RESULTS,
        HighlightError::InconsistentLengths { .. } => INCONSISTENT_LENGTHS,
    }
}

/// Highlights and renders an alignment. Never fails: empty or inconsistent
/// alignments yield their placeholder.
pub fn render(alignment: &Alignment, layout: Layout, options: &RenderOptions) -> String {
    let annotation = match highlight(alignment, &options.thresholds, layout.gap_policy()) {
        Ok(annotation) => annotation,
        Err(e) => {
            log::warn!("Not rendering alignment: {}", e);
            return placeholder(&e).to_string();
        }
    };

    let body = match layout {
        Layout::LabeledStacked => labeled_stacked(alignment, &annotation, options.width()),
        Layout::UnlabeledStacked => unlabeled_stacked(alignment, &annotation, options.width()),
        Layout::PerSequenceSnippet => per_sequence_snippet(alignment, &annotation, options.width()),
    };
    wrap_document(&body)
}

/// Emits already annotated markup verbatim inside the document frame.
pub fn render_passthrough(markup: &str) -> String {
    if markup.trim().is_empty() {
        return NO_RESULTS.to_string();
    }
    wrap_document(markup)
}

fn wrap_document(body: &str) -> String {
    let mut out =
        String::with_capacity(STYLESHEET.len() + PRE_OPEN.len() + body.len() + PRE_CLOSE.len());
    out.push_str(STYLESHEET);
    out.push_str(PRE_OPEN);
    out.push_str(body);
    out.push_str(PRE_CLOSE);
    out
}

fn labeled_stacked(alignment: &Alignment, annotation: &Annotation, width: usize) -> String {
    let length = annotation.columns();
    let name_width = alignment.max_name_length() + 1;
    let mut body = String::new();

    for (chunk_idx, start) in (0..length).step_by(width).enumerate() {
        let end = (start + width).min(length);
        if chunk_idx > 0 {
            body.push('\n');
        }
        let rows = alignment.sequence_count() + 1;
        let mut chunk = String::with_capacity((name_width + (end - start) * 24) * rows);

        pad(&mut chunk, name_width);
        // Writing to a String cannot fail
        let _ = writeln!(chunk, "{}-{}", start + 1, end);

        for (row, seq) in alignment.sequences().iter().enumerate() {
            push_escaped(&mut chunk, &seq.name);
            pad(&mut chunk, name_width - seq.name.chars().count());
            push_annotated(&mut chunk, seq, annotation.row(row), start, end);
            chunk.push('\n');
        }
        body.push_str(&chunk);
    }
    body
}

fn unlabeled_stacked(alignment: &Alignment, annotation: &Annotation, width: usize) -> String {
    let length = annotation.columns();
    let mut body = String::new();

    for (chunk_idx, start) in (0..length).step_by(width).enumerate() {
        let end = (start + width).min(length);
        if chunk_idx > 0 {
            body.push('\n');
        }
        let mut chunk = String::with_capacity((end - start) * 24 * alignment.sequence_count());

        for (row, seq) in alignment.sequences().iter().enumerate() {
            push_annotated(&mut chunk, seq, annotation.row(row), start, end);
            chunk.push('\n');
        }
        body.push_str(&chunk);
    }
    body
}

fn per_sequence_snippet(alignment: &Alignment, annotation: &Annotation, width: usize) -> String {
    let mut body = String::new();

    for (row, seq) in alignment.sequences().iter().enumerate() {
        push_escaped(&mut body, &seq.name);
        body.push('\n');

        for start in (0..seq.len()).step_by(width) {
            let end = (start + width).min(seq.len());
            let mut line = String::with_capacity((end - start) * 24 + 1);
            push_annotated(&mut line, seq, annotation.row(row), start, end);
            line.push('\n');
            body.push_str(&line);
        }

        body.push('\n');
    }
    body
}

/// Appends residues `start..end` of a sequence with their markup.
fn push_annotated(
    out: &mut String,
    seq: &Sequence,
    classes: &[Consensus],
    start: usize,
    end: usize,
) {
    for (&residue, &class) in seq.slice(start..end).iter().zip(&classes[start..end]) {
        match class {
            Consensus::High => {
                out.push_str(HIGH_OPEN);
                escape_into(out, residue);
                out.push_str(MARK_CLOSE);
            }
            Consensus::Low => {
                out.push_str(LOW_OPEN);
                escape_into(out, residue);
                out.push_str(MARK_CLOSE);
            }
            Consensus::Plain => escape_into(out, residue),
        }
    }
}

fn pad(out: &mut String, n: usize) {
    out.extend(std::iter::repeat(' ').take(n));
}

fn push_escaped(out: &mut String, text: &str) {
    for c in text.chars() {
        escape_into(out, c);
    }
}

/// Appends one character, escaping markup-significant ones.
pub(crate) fn escape_into(out: &mut String, c: char) {
    match c {
        '&' => out.push_str("&amp;"),
        '<' => out.push_str("&lt;"),
        '>' => out.push_str("&gt;"),
        _ => out.push(c),
    }
}
