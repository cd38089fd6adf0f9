//! Application of [`TextEdit`]s to source text.

use crate::types::TextEdit;
use tracing::debug;

/// Result of applying a batch of edits to one source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixOutcome {
    /// The edited source.
    pub content: String,
    /// Number of edits applied.
    pub applied: usize,
    /// Edits that were not applied (overlapping, out of bounds, or not on a
    /// character boundary).
    pub skipped: Vec<TextEdit>,
}

impl FixOutcome {
    /// Returns true if at least one edit changed the content.
    #[must_use]
    pub fn changed(&self) -> bool {
        self.applied > 0
    }
}

/// Applies `edits` to `source`.
///
/// Edits are applied in offset order against the original text, so offsets
/// never shift between edits. An edit that overlaps an already accepted one
/// (two insertions at the same offset included) is skipped, as is any edit
/// outside the source or splitting a UTF-8 character.
#[must_use]
pub fn apply_edits(source: &str, edits: &[TextEdit]) -> FixOutcome {
    let mut sorted: Vec<&TextEdit> = edits.iter().collect();
    sorted.sort_by(|a, b| a.start.cmp(&b.start).then(a.end.cmp(&b.end)));

    let mut content = String::with_capacity(source.len());
    let mut skipped = Vec::new();
    let mut applied = 0;
    let mut cursor = 0;
    let mut last: Option<(usize, usize)> = None;

    for edit in sorted {
        let valid = edit.start <= edit.end
            && edit.end <= source.len()
            && source.is_char_boundary(edit.start)
            && source.is_char_boundary(edit.end);

        let overlaps = last.is_some_and(|(start, end)| {
            edit.start < end || (edit.start == start && edit.start == end)
        });

        if !valid || overlaps {
            debug!("Skipping edit {}..{}", edit.start, edit.end);
            skipped.push(edit.clone());
            continue;
        }

        content.push_str(&source[cursor..edit.start]);
        content.push_str(&edit.new_text);
        cursor = edit.end;
        last = Some((edit.start, edit.end));
        applied += 1;
    }

    content.push_str(&source[cursor..]);

    FixOutcome {
        content,
        applied,
        skipped,
    }
}
