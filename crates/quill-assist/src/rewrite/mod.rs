//! Node-level rewriting on top of the edit model.
//!
//! A [`Rewrite`] records operations against ranges of the original tree. Nothing is applied
//! here: [`Rewrite::finish`] lowers the operations into an [`EditSet`] and rejects overlaps.
//! Generated text is indented relative to the line it is anchored to, using the indent unit
//! inferred from the file (or the configured fallback).

mod list;

pub use list::{ListAnchor, ListChild, ListEntry, ListRewrite, ListStyle};

use quill_config::FormatConfig;
use quill_core::{text, EditError, EditSet, TextRange, TextRangeExt};
use quill_syntax::SyntaxTree;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RewriteError {
    #[error("rewrite operations overlap: {first:?} and {second:?}")]
    Conflict { first: TextRange, second: TextRange },
    #[error(transparent)]
    Edit(EditError),
}

impl From<EditError> for RewriteError {
    fn from(err: EditError) -> Self {
        match err {
            EditError::OverlappingEdits { first, second } => RewriteError::Conflict { first, second },
            other => RewriteError::Edit(other),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Rewrite<'a> {
    tree: &'a SyntaxTree,
    edits: EditSet,
    indent_unit: String,
}

impl<'a> Rewrite<'a> {
    pub fn new(tree: &'a SyntaxTree, format: &FormatConfig) -> Self {
        let indent_unit =
            text::detect_indent_unit(tree.text()).unwrap_or_else(|| format.indent_unit());
        Self {
            tree,
            edits: EditSet::new(),
            indent_unit,
        }
    }

    pub fn tree(&self) -> &'a SyntaxTree {
        self.tree
    }

    pub fn source(&self) -> &'a str {
        self.tree.text()
    }

    pub fn newline(&self) -> &'static str {
        text::newline(self.tree.text())
    }

    pub fn indent_unit(&self) -> &str {
        &self.indent_unit
    }

    /// Leading whitespace of the line holding `offset`.
    pub fn indent_at(&self, offset: usize) -> &'a str {
        text::indentation_at(self.tree.text(), offset)
    }

    /// One indent unit deeper than the line holding `offset`.
    pub fn nested_indent(&self, offset: usize) -> String {
        format!("{}{}", self.indent_at(offset), self.indent_unit)
    }

    /// The text at `range`, its continuation lines moved from the indentation of the line
    /// holding `range.start_offset()` to `indent`.
    pub fn text_reindented(&self, range: TextRange, indent: &str) -> String {
        text::reindent(self.tree.slice(range), self.indent_at(range.start_offset()), indent)
    }

    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    pub fn replace(&mut self, range: TextRange, text: impl Into<String>) {
        self.edits.replace(range, text);
    }

    pub fn remove(&mut self, range: TextRange) {
        self.edits.delete(range);
    }

    pub fn insert_before(&mut self, range: TextRange, text: impl Into<String>) {
        self.edits.insert(range.start_offset(), text);
    }

    pub fn insert_after(&mut self, range: TextRange, text: impl Into<String>) {
        self.edits.insert(range.end_offset(), text);
    }

    /// Remove the node at `range` with the comments it owns; whole lines go when the node
    /// occupies them alone.
    pub fn remove_node(&mut self, range: TextRange) {
        self.edits.delete(self.tree.removal_range(range));
    }

    pub fn list(&mut self, list: ListRewrite<'_>) {
        for edit in list.into_edits() {
            self.edits.push(edit);
        }
    }

    /// Lower the recorded operations, checking them against the original text.
    pub fn finish(self) -> Result<EditSet, RewriteError> {
        self.edits.check(self.tree.text())?;
        Ok(self.edits)
    }

    /// Keep the operations when they are conflict free, otherwise fall back to replacing
    /// `range` with `render()`.
    pub fn finish_or_replace(self, range: TextRange, render: impl FnOnce() -> String) -> Rewrite<'a> {
        match self.edits.check(self.tree.text()) {
            Ok(_) => self,
            Err(err) => {
                tracing::debug!(
                    target: "quill.assist",
                    ?range,
                    error = %err,
                    "rewrite operations conflict; replacing the covering range"
                );
                let mut fallback = Rewrite {
                    tree: self.tree,
                    edits: EditSet::new(),
                    indent_unit: self.indent_unit,
                };
                fallback.replace(range, render());
                fallback
            }
        }
    }
}

/// The content between a pair of braces, from its first to its last non-blank character.
/// `None` for an empty body.
pub fn interior(source: &str, braces: TextRange) -> Option<TextRange> {
    if braces.byte_len() < 2 {
        return None;
    }
    let inner = TextRange::from_offsets(braces.start_offset() + 1, braces.end_offset() - 1);
    let slice = inner.slice(source);
    let lead = slice.len() - slice.trim_start().len();
    let trimmed = slice.trim();
    if trimmed.is_empty() {
        return None;
    }
    let start = inner.start_offset() + lead;
    Some(TextRange::from_offsets(start, start + trimmed.len()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill_syntax::parse;

    fn format() -> FormatConfig {
        FormatConfig::default()
    }

    #[test]
    fn indent_unit_comes_from_the_file() {
        let tree = parse("class A {\n  void m() {\n    x();\n  }\n}\n");
        let rewrite = Rewrite::new(&tree, &format());
        assert_eq!(rewrite.indent_unit(), "  ");
        let offset = tree.text().find("x()").unwrap();
        assert_eq!(rewrite.nested_indent(offset), "      ");
    }

    #[test]
    fn falls_back_to_configured_indent() {
        let tree = parse("class A {}");
        let rewrite = Rewrite::new(&tree, &format());
        assert_eq!(rewrite.indent_unit(), "    ");
    }

    #[test]
    fn overlapping_operations_conflict() {
        let tree = parse("class A { int x; }");
        let mut rewrite = Rewrite::new(&tree, &format());
        rewrite.replace(TextRange::from_offsets(10, 16), "long y;");
        rewrite.remove(TextRange::from_offsets(14, 17));
        assert!(matches!(rewrite.finish(), Err(RewriteError::Conflict { .. })));
    }

    #[test]
    fn conflict_falls_back_to_full_replacement() {
        let tree = parse("class A { int x; }");
        let mut rewrite = Rewrite::new(&tree, &format());
        rewrite.replace(TextRange::from_offsets(10, 16), "long y;");
        rewrite.remove(TextRange::from_offsets(14, 17));
        let edits = rewrite
            .finish_or_replace(TextRange::from_offsets(0, 18), || "class A { long y; }".to_string())
            .finish()
            .unwrap();
        assert_eq!(edits.apply(tree.text()).unwrap(), "class A { long y; }");
    }

    #[test]
    fn interior_skips_braces_and_blanks() {
        let source = "{\n    a();\n    b();\n}";
        let range = interior(source, TextRange::from_offsets(0, source.len())).unwrap();
        assert_eq!(range.slice(source), "a();\n    b();");
        assert_eq!(interior("{ }", TextRange::from_offsets(0, 3)), None);
    }
}
