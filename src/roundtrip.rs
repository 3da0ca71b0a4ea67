//! Editable plain-text round trip.
//!
//! [`export_editable`] writes each sequence as its name, its complete residue
//! string on the next line, and a blank line. No markup, no wrapping.
//! [`parse_editable_str`] reads it back, so for names without a blank line
//! and residues without surrounding whitespace:
//!
//! ```
//! use consview::model::{Alignment, Sequence};
//! use consview::roundtrip::{export_editable, import_editable};
//!
//! let alignment = Alignment::new(vec![Sequence::new("a", "AC-GT")]);
//! let text = export_editable(&alignment);
//! assert_eq!(export_editable(&import_editable(&text)), text);
//! ```

use crate::formats::editable::parse_editable_str;
use crate::model::Alignment;
use crate::render::{render, Layout, RenderOptions};

/// Exports an alignment as editable plain text.
///
/// Lengths are not checked: an inconsistent alignment is exported as is so
/// the user can fix it.
pub fn export_editable(alignment: &Alignment) -> String {
    let capacity = alignment
        .sequences()
        .iter()
        .map(|s| s.name.len() + s.len() + 3)
        .sum();
    let mut out = String::with_capacity(capacity);

    for seq in alignment.sequences() {
        out.push_str(&seq.name);
        out.push('\n');
        out.extend(seq.residues());
        out.push_str("\n\n");
    }
    out
}

/// Parses edited plain text back into an alignment.
pub fn import_editable(text: &str) -> Alignment {
    parse_editable_str(text)
}

/// Parses edited plain text and renders it with fresh highlighting.
pub fn reimport(text: &str, layout: Layout, options: &RenderOptions) -> String {
    let alignment = import_editable(text);
    log::info!(
        "Re-checking edited alignment with {} sequence(s)",
        alignment.sequence_count()
    );
    render(&alignment, layout, options)
}
