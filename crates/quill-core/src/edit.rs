//! Text edit primitives.
//!
//! An [`EditSet`] is an ordered bag of [`TextEdit`]s against a single text buffer. Edits are
//! recorded in the order they were requested; [`EditSet::normalized`] sorts them, merges
//! inserts at the same offset (keeping request order) and rejects overlaps. Application is
//! all-or-nothing: the buffer is only produced once every edit validated.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{TextRange, TextRangeExt};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextEdit {
    pub range: TextRange,
    pub replacement: String,
}

impl TextEdit {
    pub fn new(range: TextRange, replacement: impl Into<String>) -> Self {
        Self {
            range,
            replacement: replacement.into(),
        }
    }

    pub fn insert(offset: usize, text: impl Into<String>) -> Self {
        Self::new(TextRange::empty_at(offset), text)
    }

    pub fn delete(range: TextRange) -> Self {
        Self::new(range, String::new())
    }

    pub fn is_insert(&self) -> bool {
        self.range.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    #[error("edit range {range:?} is out of bounds for text length {len}")]
    OutOfBounds { range: TextRange, len: usize },
    #[error("offset {offset} is not a UTF-8 character boundary")]
    InvalidUtf8Boundary { offset: usize },
    #[error("overlapping edits: {first:?} overlaps {second:?}")]
    OverlappingEdits { first: TextRange, second: TextRange },
    #[error("text does not match the snapshot the edits were computed against")]
    TextMismatch,
}

/// A conflict-free collection of edits realising one change to a buffer.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditSet {
    edits: Vec<TextEdit>,
}

impl EditSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_edits(edits: Vec<TextEdit>) -> Self {
        Self { edits }
    }

    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    pub fn len(&self) -> usize {
        self.edits.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TextEdit> {
        self.edits.iter()
    }

    pub fn push(&mut self, edit: TextEdit) {
        self.edits.push(edit);
    }

    pub fn insert(&mut self, offset: usize, text: impl Into<String>) {
        self.push(TextEdit::insert(offset, text));
    }

    pub fn delete(&mut self, range: TextRange) {
        self.push(TextEdit::delete(range));
    }

    pub fn replace(&mut self, range: TextRange, text: impl Into<String>) {
        self.push(TextEdit::new(range, text));
    }

    /// Move the text at `from` to `to` (an offset in the original text).
    ///
    /// `to` must not fall strictly inside `from`.
    pub fn move_range(&mut self, source: &str, from: TextRange, to: usize) -> Result<(), EditError> {
        let Some(moved) = source.get(from.start_offset()..from.end_offset()) else {
            return Err(EditError::OutOfBounds {
                range: from,
                len: source.len(),
            });
        };
        if from.start_offset() < to && to < from.end_offset() {
            return Err(EditError::OverlappingEdits {
                first: from,
                second: TextRange::empty_at(to),
            });
        }
        let moved = moved.to_string();
        self.delete(from);
        self.insert(to, moved);
        Ok(())
    }

    pub fn extend(&mut self, other: EditSet) {
        self.edits.extend(other.edits);
    }

    /// Range covering every edit, or `None` for an empty set.
    pub fn covering_range(&self) -> Option<TextRange> {
        self.edits
            .iter()
            .map(|e| e.range)
            .reduce(|acc, r| acc.cover(r))
    }

    /// Returns the edits sorted by offset with same-offset inserts merged.
    ///
    /// Inserts at one offset are concatenated in the order they were added. An insert at the
    /// start of a replaced range is kept in front of the replacement.
    pub fn normalized(&self) -> Result<Vec<TextEdit>, EditError> {
        let mut indexed: Vec<(usize, &TextEdit)> = self.edits.iter().enumerate().collect();
        indexed.sort_by(|(ia, a), (ib, b)| {
            a.range
                .start()
                .cmp(&b.range.start())
                .then_with(|| a.range.end().cmp(&b.range.end()))
                .then_with(|| ia.cmp(ib))
        });

        let mut merged: Vec<TextEdit> = Vec::with_capacity(indexed.len());
        for (_, edit) in indexed {
            if let Some(last) = merged.last_mut() {
                if last.range == edit.range && last.range.is_empty() {
                    last.replacement.push_str(&edit.replacement);
                    continue;
                }
                // Exact duplicates are redundant.
                if last.range == edit.range && last.replacement == edit.replacement {
                    continue;
                }
            }
            merged.push(edit.clone());
        }

        for pair in merged.windows(2) {
            let (first, second) = (&pair[0], &pair[1]);
            if first.range.end() > second.range.start()
                || (first.range == second.range && !first.range.is_empty())
            {
                return Err(EditError::OverlappingEdits {
                    first: first.range,
                    second: second.range,
                });
            }
        }

        Ok(merged)
    }

    /// Validate the set against `text` without applying it.
    pub fn check(&self, text: &str) -> Result<Vec<TextEdit>, EditError> {
        let edits = self.normalized()?;
        for edit in &edits {
            if edit.range.end_offset() > text.len() {
                return Err(EditError::OutOfBounds {
                    range: edit.range,
                    len: text.len(),
                });
            }
            for offset in [edit.range.start_offset(), edit.range.end_offset()] {
                if !text.is_char_boundary(offset) {
                    return Err(EditError::InvalidUtf8Boundary { offset });
                }
            }
        }
        Ok(edits)
    }

    /// Apply the set to `text`, returning the new buffer.
    pub fn apply(&self, text: &str) -> Result<String, EditError> {
        let edits = self.check(text)?;
        let mut out = text.to_string();
        for edit in edits.into_iter().rev() {
            out.replace_range(edit.range.start_offset()..edit.range.end_offset(), &edit.replacement);
        }
        Ok(out)
    }
}

impl FromIterator<TextEdit> for EditSet {
    fn from_iter<I: IntoIterator<Item = TextEdit>>(iter: I) -> Self {
        Self {
            edits: iter.into_iter().collect(),
        }
    }
}

/// Apply a list of edits to a text snapshot.
///
/// The function is deterministic: edits are sorted by `(start, end, request order)` and applied
/// from the end of the text backwards.
pub fn apply_text_edits(text: &str, edits: &[TextEdit]) -> Result<String, EditError> {
    EditSet::from_edits(edits.to_vec()).apply(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apply_multiple_edits_is_deterministic() {
        let text = "abcdef";
        let mut edits = vec![
            TextEdit::new(TextRange::from_offsets(2, 4), "XX"),
            TextEdit::insert(0, "!"),
            TextEdit::delete(TextRange::from_offsets(5, 6)),
        ];

        let out1 = apply_text_edits(text, &edits).unwrap();
        edits.reverse();
        let out2 = apply_text_edits(text, &edits).unwrap();

        assert_eq!(out1, out2);
        assert_eq!(out1, "!abXXe");
    }

    #[test]
    fn detect_overlapping_edits() {
        let edits = vec![
            TextEdit::new(TextRange::from_offsets(1, 4), "X"),
            TextEdit::new(TextRange::from_offsets(3, 5), "Y"),
        ];

        assert!(matches!(
            apply_text_edits("abcdef", &edits),
            Err(EditError::OverlappingEdits { .. })
        ));
    }

    #[test]
    fn inserts_at_same_offset_keep_request_order() {
        let mut set = EditSet::new();
        set.insert(3, "1");
        set.insert(3, "2");
        set.replace(TextRange::from_offsets(3, 4), "D");
        assert_eq!(set.apply("abcdef").unwrap(), "abc12Def");
    }

    #[test]
    fn insert_inside_replaced_range_conflicts() {
        let mut set = EditSet::new();
        set.replace(TextRange::from_offsets(1, 5), "X");
        set.insert(3, "!");
        assert!(matches!(
            set.apply("abcdef"),
            Err(EditError::OverlappingEdits { .. })
        ));
    }

    #[test]
    fn move_range_relocates_text() {
        let text = "one two three";
        let mut set = EditSet::new();
        set.move_range(text, TextRange::from_offsets(0, 4), text.len()).unwrap();
        assert_eq!(set.apply(text).unwrap(), "two threeone ");
    }

    #[test]
    fn out_of_bounds_is_rejected_without_partial_application() {
        let mut set = EditSet::new();
        set.insert(0, "x");
        set.replace(TextRange::from_offsets(5, 50), "y");
        assert!(matches!(set.apply("short"), Err(EditError::OutOfBounds { .. })));
    }
}
