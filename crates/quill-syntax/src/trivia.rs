//! Comment attachment computed from the lossless token stream.
//!
//! Ownership rules:
//! - a comment on the same line right after a node belongs to that node (trailing);
//! - any other comment belongs to the next node that follows it (leading);
//! - comments right before a closing delimiter have no following node and therefore stay
//!   with the enclosing node.

use quill_core::{text, TextRange, TextRangeExt};

use crate::lexer::Token;
use crate::SyntaxKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Comment {
    pub kind: SyntaxKind,
    pub range: TextRange,
}

impl Comment {
    pub fn is_line_comment(&self) -> bool {
        self.kind == SyntaxKind::LineComment
    }
}

/// Index of the first token starting at or after `offset`.
pub(crate) fn token_index(tokens: &[Token], offset: usize) -> usize {
    tokens.partition_point(|t| t.range.start_offset() < offset)
}

/// Comments owned by the node starting at `offset`, in source order.
pub(crate) fn leading_comments(source: &str, tokens: &[Token], offset: usize) -> Vec<Comment> {
    let idx = token_index(tokens, offset);
    let mut comments = Vec::new();
    let mut prev_significant_end = None;
    for token in tokens[..idx].iter().rev() {
        if !token.kind.is_trivia() {
            prev_significant_end = Some(token.range.end_offset());
            break;
        }
        if token.kind.is_comment() {
            comments.push(Comment {
                kind: token.kind,
                range: token.range,
            });
        }
    }
    comments.reverse();
    if let Some(prev_end) = prev_significant_end {
        // Same-line comments after the previous token are trailing comments of that token.
        comments.retain(|c| source[prev_end..c.range.start_offset()].contains('\n'));
    }
    comments
}

/// Comments following `offset` on the same line, before any other token.
pub(crate) fn trailing_comments(source: &str, tokens: &[Token], offset: usize) -> Vec<Comment> {
    let idx = token_index(tokens, offset);
    let mut comments = Vec::new();
    for token in &tokens[idx..] {
        match token.kind {
            SyntaxKind::Whitespace => {
                if token.range.slice(source).contains('\n') {
                    break;
                }
            }
            SyntaxKind::LineComment => {
                comments.push(Comment {
                    kind: token.kind,
                    range: token.range,
                });
                break;
            }
            SyntaxKind::BlockComment | SyntaxKind::DocComment => {
                if token.range.slice(source).contains('\n') {
                    break;
                }
                comments.push(Comment {
                    kind: token.kind,
                    range: token.range,
                });
            }
            _ => break,
        }
    }
    comments
}

/// `range` widened by the comments the node owns.
pub(crate) fn owned_range(source: &str, tokens: &[Token], range: TextRange) -> TextRange {
    let start = leading_comments(source, tokens, range.start_offset())
        .first()
        .map_or(range.start_offset(), |c| c.range.start_offset());
    let end = trailing_comments(source, tokens, range.end_offset())
        .last()
        .map_or(range.end_offset(), |c| c.range.end_offset());
    TextRange::from_offsets(start, end)
}

/// The text to delete when removing a node: its owned range, extended to whole lines when
/// the node is alone on its lines, otherwise extended over the blanks in front of it.
pub(crate) fn removal_range(source: &str, tokens: &[Token], range: TextRange) -> TextRange {
    let owned = owned_range(source, tokens, range);
    if text::is_first_on_line(source, owned.start_offset()) && text::is_last_on_line(source, owned.end_offset()) {
        return TextRange::from_offsets(
            text::line_start(source, owned.start_offset()),
            text::line_end_including_newline(source, owned.end_offset()),
        );
    }
    let before = &source[..owned.start_offset()];
    let blanks = before.len() - before.trim_end_matches([' ', '\t']).len();
    TextRange::from_offsets(owned.start_offset() - blanks, owned.end_offset())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::lex;

    #[test]
    fn same_line_comment_trails_previous_node() {
        let source = "a(); // about a\n// about b\nb();";
        let tokens = lex(source);
        let b = source.find("b()").unwrap();
        let leading = leading_comments(source, &tokens, b);
        assert_eq!(leading.len(), 1);
        assert_eq!(leading[0].range.slice(source), "// about b");

        let a_end = source.find(';').unwrap() + 1;
        let trailing = trailing_comments(source, &tokens, a_end);
        assert_eq!(trailing[0].range.slice(source), "// about a");
    }

    #[test]
    fn removal_takes_whole_lines() {
        let source = "{\n    // gone\n    x();\n    y();\n}";
        let tokens = lex(source);
        let start = source.find("x()").unwrap();
        let range = removal_range(source, &tokens, TextRange::from_offsets(start, start + 4));
        assert_eq!(range.slice(source), "    // gone\n    x();\n");
    }
}
