//! Marker-annotated report parser.
//!
//! Some engines (MultAlin among them) emit an already classified alignment
//! where consensus strength is written inline with brackets:
//! ```text
//! MultAlin version 5.4.1
//! ...
//! //
//! seq1  [ACG](T)[AC]-
//! seq2  [ACG](T)[AC]G
//! ```
//!
//! `[`…`]` marks a high consensus run and `(`…`)` a low consensus run.
//! The text after the `//` line is turned straight into display markup; no
//! [`Alignment`](crate::model::Alignment) is built and no highlighting is
//! computed.

use thiserror::Error;

use crate::render::{escape_into, HIGH_OPEN, LOW_OPEN, MARK_CLOSE};

/// Errors that can occur during marker report parsing.
#[derive(Error, Debug)]
pub enum MarkerError {
    #[error("No '//' line separating the report header from the alignment")]
    MissingDelimiter,
}

/// Result type for marker report operations.
pub type MarkerResult<T> = Result<T, MarkerError>;

/// Parses a marker report and returns the alignment body as display markup.
pub fn parse_marker_str(content: &str) -> MarkerResult<String> {
    let body = body_after_delimiter(content).ok_or(MarkerError::MissingDelimiter)?;
    Ok(markers_to_markup(body))
}

/// Returns the text following the first line that starts with `//`.
fn body_after_delimiter(content: &str) -> Option<&str> {
    let mut offset = 0;
    for line in content.split_inclusive('\n') {
        offset += line.len();
        if line.starts_with("//") {
            return Some(&content[offset..]);
        }
    }
    None
}

/// Converts bracket markers into emphasis tags.
///
/// Adjacent runs of the same class (`][` or `)(`) are merged first so a
/// continuous run gets a single open/close pair.
pub fn markers_to_markup(body: &str) -> String {
    let collapsed = body.replace("][", "").replace(")(", "");

    let mut out = String::with_capacity(collapsed.len() * 2);
    for c in collapsed.chars() {
        match c {
            '[' => out.push_str(HIGH_OPEN),
            '(' => out.push_str(LOW_OPEN),
            ']' | ')' => out.push_str(MARK_CLOSE),
            other => escape_into(&mut out, other),
        }
    }
    out
}
