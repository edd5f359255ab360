//! Text model primitives: ranges, byte offsets, line and indentation helpers.
//!
//! Generated code is indented relative to the line it is anchored to; the line helpers never
//! look beyond the lines involved, so untouched regions are never re-flowed.

pub use text_size::{TextRange, TextSize};

#[inline]
fn size(offset: usize) -> TextSize {
    TextSize::from(offset as u32)
}

/// Byte-offset view of a [`TextRange`], for slicing `&str` buffers directly.
pub trait TextRangeExt: Copy {
    fn from_offsets(start: usize, end: usize) -> Self;

    /// An empty range at `offset` (a caret).
    fn empty_at(offset: usize) -> Self;

    fn start_offset(self) -> usize;

    fn end_offset(self) -> usize;

    fn byte_len(self) -> usize;

    /// Whether `offset` lies inside the range, end included, so a caret placed right after a
    /// node still selects it.
    fn contains_offset_inclusive(self, offset: usize) -> bool;

    /// Whether the two ranges share at least one byte. Touching ranges do not overlap.
    fn overlaps(self, other: TextRange) -> bool;

    /// Intersection test that treats empty ranges as points (caret requests).
    fn intersects(self, other: TextRange) -> bool;

    /// The text under the range, `""` when it is out of bounds.
    fn slice(self, text: &str) -> &str;
}

impl TextRangeExt for TextRange {
    #[inline]
    fn from_offsets(start: usize, end: usize) -> Self {
        TextRange::new(size(start), size(end))
    }

    #[inline]
    fn empty_at(offset: usize) -> Self {
        TextRange::empty(size(offset))
    }

    #[inline]
    fn start_offset(self) -> usize {
        usize::from(self.start())
    }

    #[inline]
    fn end_offset(self) -> usize {
        usize::from(self.end())
    }

    #[inline]
    fn byte_len(self) -> usize {
        usize::from(self.len())
    }

    #[inline]
    fn contains_offset_inclusive(self, offset: usize) -> bool {
        self.contains_inclusive(size(offset))
    }

    #[inline]
    fn overlaps(self, other: TextRange) -> bool {
        self.start() < other.end() && other.start() < self.end()
    }

    fn intersects(self, other: TextRange) -> bool {
        if self.is_empty() {
            return other.contains_inclusive(self.start());
        }
        if other.is_empty() {
            return self.contains_inclusive(other.start());
        }
        self.overlaps(other)
    }

    #[inline]
    fn slice(self, text: &str) -> &str {
        text.get(self.start_offset()..self.end_offset()).unwrap_or("")
    }
}

/// Offset of the first byte of the line containing `offset`.
pub fn line_start(text: &str, offset: usize) -> usize {
    let offset = offset.min(text.len());
    text[..offset].rfind('\n').map_or(0, |idx| idx + 1)
}

/// Offset of the line terminator (`\n` or `\r\n`) of the line containing `offset`, or the end
/// of the text.
pub fn line_end(text: &str, offset: usize) -> usize {
    let offset = offset.min(text.len());
    let end = text[offset..].find('\n').map_or(text.len(), |idx| offset + idx);
    if end > 0 && text.as_bytes().get(end - 1) == Some(&b'\r') && end > offset {
        end - 1
    } else {
        end
    }
}

/// Offset just past the line terminator of the line containing `offset`.
pub fn line_end_including_newline(text: &str, offset: usize) -> usize {
    let offset = offset.min(text.len());
    text[offset..]
        .find('\n')
        .map_or(text.len(), |idx| offset + idx + 1)
}

/// Leading whitespace of the line containing `offset`.
pub fn indentation_at(text: &str, offset: usize) -> &str {
    let start = line_start(text, offset);
    let rest = &text[start..];
    let len = rest
        .find(|c: char| c != ' ' && c != '\t')
        .unwrap_or(rest.len());
    &rest[..len]
}

/// Whether only whitespace precedes `offset` on its line.
pub fn is_first_on_line(text: &str, offset: usize) -> bool {
    let start = line_start(text, offset);
    text[start..offset.min(text.len())]
        .chars()
        .all(|c| c == ' ' || c == '\t')
}

/// Whether only whitespace follows `offset` on its line.
pub fn is_last_on_line(text: &str, offset: usize) -> bool {
    let offset = offset.min(text.len());
    let end = line_end(text, offset);
    end >= offset && text[offset..end].chars().all(|c| c == ' ' || c == '\t')
}

/// The line terminator used by `text` (`"\r\n"` when the first terminator is CRLF).
pub fn newline(text: &str) -> &'static str {
    match text.find('\n') {
        Some(idx) if idx > 0 && text.as_bytes()[idx - 1] == b'\r' => "\r\n",
        _ => "\n",
    }
}

/// Infer the indentation unit from the file: a tab if any line is tab-indented first, else the
/// smallest positive difference between the indentation of consecutive non-blank lines.
pub fn detect_indent_unit(text: &str) -> Option<String> {
    let mut prev: Option<usize> = None;
    let mut best: Option<usize> = None;
    for line in text.lines() {
        if line.trim().is_empty() {
            continue;
        }
        if line.starts_with('\t') {
            return Some("\t".to_string());
        }
        let width = line.len() - line.trim_start_matches(' ').len();
        // Continuation lines of block comments (` * text`) are offset by one column.
        if line.trim_start().starts_with('*') {
            continue;
        }
        if let Some(prev) = prev {
            if width > prev {
                let diff = width - prev;
                best = Some(best.map_or(diff, |b: usize| b.min(diff)));
            }
        }
        prev = Some(width);
    }
    best.map(|n| " ".repeat(n))
}

/// Re-indent a multi-line snippet: the first line is left as is, every following line has
/// `from` stripped (when present) and `to` prepended. Blank lines stay blank.
pub fn reindent(snippet: &str, from: &str, to: &str) -> String {
    let mut out = String::with_capacity(snippet.len());
    for (idx, line) in snippet.split('\n').enumerate() {
        if idx > 0 {
            out.push('\n');
            let trimmed = line.trim_end_matches('\r');
            if trimmed.trim().is_empty() {
                out.push_str(line.trim_start_matches([' ', '\t']));
                continue;
            }
            out.push_str(to);
            out.push_str(line.strip_prefix(from).unwrap_or_else(|| line.trim_start()));
        } else {
            out.push_str(line);
        }
    }
    out
}

/// Prefix every non-blank line of `snippet` with `indent`.
pub fn indent_lines(snippet: &str, indent: &str) -> String {
    let mut out = String::with_capacity(snippet.len() + indent.len() * 4);
    for (idx, line) in snippet.split('\n').enumerate() {
        if idx > 0 {
            out.push('\n');
        }
        if !line.trim().is_empty() {
            out.push_str(indent);
        }
        out.push_str(line);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn caret_intersection_includes_node_end() {
        let node = TextRange::from_offsets(4, 10);
        assert!(TextRange::empty_at(10).intersects(node));
        assert!(TextRange::empty_at(4).intersects(node));
        assert!(!TextRange::empty_at(11).intersects(node));
    }

    #[test]
    fn touching_ranges_do_not_overlap() {
        assert!(!TextRange::from_offsets(0, 3).overlaps(TextRange::from_offsets(3, 5)));
        assert!(TextRange::from_offsets(0, 4).overlaps(TextRange::from_offsets(3, 5)));
    }

    #[test]
    fn slice_out_of_bounds_is_empty() {
        assert_eq!(TextRange::from_offsets(1, 3).slice("abcd"), "bc");
        assert_eq!(TextRange::from_offsets(2, 9).slice("abcd"), "");
    }

    #[test]
    fn line_bounds() {
        let text = "ab\r\n  cd\nef";
        assert_eq!(line_start(text, 6), 4);
        assert_eq!(line_end(text, 0), 2);
        assert_eq!(line_end(text, 5), 8);
        assert_eq!(line_end_including_newline(text, 5), 9);
        assert_eq!(indentation_at(text, 7), "  ");
        assert_eq!(newline(text), "\r\n");
    }

    #[test]
    fn detects_indent_unit() {
        let text = "class A {\n    void m() {\n        x();\n    }\n}\n";
        assert_eq!(detect_indent_unit(text).as_deref(), Some("    "));
        assert_eq!(detect_indent_unit("class A {\n\tint x;\n}").as_deref(), Some("\t"));
        assert_eq!(detect_indent_unit("class A {}"), None);
    }

    #[test]
    fn reindent_keeps_first_line() {
        let snippet = "if (a) {\n    b();\n\n}";
        assert_eq!(reindent(snippet, "    ", "        "), "if (a) {\n        b();\n\n        }");
    }
}
