//! Doc comment (`/** ... */`) model.
//!
//! Only the block-tag structure is modelled: each tag that starts a comment line
//! (`@param x ...`, `@return ...`) becomes a [`DocTag`] with the exact ranges needed to insert
//! new tags next to it or remove it again. Inline tags (`{@link ...}`) are plain text.

use quill_core::{text, TextRange, TextRangeExt};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocComment {
    pub range: TextRange,
    pub tags: Vec<DocTag>,
    /// Leading whitespace of the line holding `/**`.
    pub indent: String,
    /// Prefix of continuation lines (`"     * "`), taken from the comment or derived from
    /// [`DocComment::indent`].
    pub line_prefix: String,
    pub is_single_line: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocTag {
    /// From `@` to the last non-blank character of the tag's text.
    pub range: TextRange,
    /// Tag name without `@` (`param`, `return`, ...).
    pub name: String,
    pub name_range: TextRange,
    pub argument: Option<DocTagArgument>,
    /// Whether the tag starts on its own comment line (not on the `/**` line).
    pub own_line: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocTagArgument {
    pub text: String,
    pub range: TextRange,
}

/// Tags whose first word names the documented element.
const TAGS_WITH_ARGUMENT: &[&str] = &["param", "throws", "exception", "uses", "provides"];

impl DocTag {
    pub fn argument_text(&self) -> Option<&str> {
        self.argument.as_ref().map(|a| a.text.as_str())
    }

    /// `@throws` and `@exception` are interchangeable.
    pub fn is_throws(&self) -> bool {
        self.name == "throws" || self.name == "exception"
    }

    /// Display form used in labels (`@param a`, `@return`).
    pub fn display(&self) -> String {
        match self.argument_text() {
            Some(arg) => format!("@{} {}", self.name, arg),
            None => format!("@{}", self.name),
        }
    }
}

impl DocComment {
    /// Parse the doc comment occupying `range` in `source`.
    pub fn parse(source: &str, range: TextRange) -> DocComment {
        let comment = range.slice(source);
        let indent = text::indentation_at(source, range.start_offset()).to_string();
        let is_single_line = !comment.contains('\n');
        let mut line_prefix = None;
        let mut tags: Vec<DocTag> = Vec::new();
        let mut open: Option<usize> = None;

        let mut line_offset = range.start_offset();
        for (idx, line) in comment.split('\n').enumerate() {
            let line_start = line_offset;
            line_offset += line.len() + 1;

            let line = line.trim_end_matches('\r');
            let mut content_start;
            let mut content_end = line.len();
            if idx == 0 {
                content_start = 3.min(line.len());
            } else {
                let trimmed = line.len() - line.trim_start().len();
                content_start = trimmed;
                let rest = &line[trimmed..];
                if rest.starts_with('*') && !rest.starts_with("*/") {
                    content_start += 1;
                    if line_prefix.is_none() {
                        let after = &line[content_start..];
                        let pad = after.len() - after.trim_start_matches(' ').len();
                        line_prefix = Some(line[..content_start + pad.min(1)].to_string());
                    }
                }
            }
            if let Some(close) = line[content_start..].find("*/") {
                content_end = content_start + close;
            }
            let content = &line[content_start..content_end];
            let lead = content.len() - content.trim_start().len();
            let content = content.trim();
            if content.is_empty() {
                continue;
            }
            let abs_start = line_start + content_start + lead;
            let abs_end = abs_start + content.len();

            if content.starts_with('@') && content[1..].starts_with(|c: char| c.is_alphabetic()) {
                let name_len = content[1..]
                    .find(|c: char| !c.is_alphanumeric())
                    .unwrap_or(content.len() - 1);
                let name = content[1..1 + name_len].to_string();
                let name_range = TextRange::from_offsets(abs_start + 1, abs_start + 1 + name_len);
                let argument = if TAGS_WITH_ARGUMENT.contains(&name.as_str()) {
                    let rest = &content[1 + name_len..];
                    let skip = rest.len() - rest.trim_start().len();
                    let word = rest
                        .trim_start()
                        .split(char::is_whitespace)
                        .next()
                        .unwrap_or("");
                    (!word.is_empty()).then(|| {
                        let start = name_range.end_offset() + skip;
                        DocTagArgument {
                            text: word.to_string(),
                            range: TextRange::from_offsets(start, start + word.len()),
                        }
                    })
                } else {
                    None
                };
                tags.push(DocTag {
                    range: TextRange::from_offsets(abs_start, abs_end),
                    name,
                    name_range,
                    argument,
                    own_line: idx > 0,
                });
                open = Some(tags.len() - 1);
            } else if let Some(tag) = open.and_then(|i| tags.get_mut(i)) {
                tag.range = TextRange::from_offsets(tag.range.start_offset(), abs_end);
            }
        }

        let line_prefix = line_prefix.unwrap_or_else(|| format!("{indent} * "));
        DocComment {
            range,
            tags,
            indent,
            line_prefix,
            is_single_line,
        }
    }

    pub fn tags_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a DocTag> + 'a {
        self.tags.iter().filter(move |t| t.name == name)
    }

    pub fn has_block_tags(&self) -> bool {
        !self.tags.is_empty()
    }

    /// Offset of the start of the line holding `*/` in a multi-line comment; new trailing
    /// lines are inserted there.
    pub fn closing_line_start(&self, source: &str) -> usize {
        let close = self.range.end_offset().saturating_sub(2);
        let line_start = text::line_start(source, close);
        if text::is_first_on_line(source, close) && line_start > self.range.start_offset() {
            line_start
        } else {
            close
        }
    }

    /// Range to delete when removing `tag`: its whole lines when the tag owns them, otherwise
    /// the tag text and the blanks in front of it.
    pub fn removal_range(&self, source: &str, tag: &DocTag) -> TextRange {
        let close = self.range.end_offset().saturating_sub(2);
        if tag.own_line && text::line_end(source, tag.range.end_offset()) < close {
            return TextRange::from_offsets(
                text::line_start(source, tag.range.start_offset()),
                text::line_end_including_newline(source, tag.range.end_offset()),
            );
        }
        let before = &source[self.range.start_offset()..tag.range.start_offset()];
        let blanks = before.len() - before.trim_end_matches([' ', '\t']).len();
        TextRange::from_offsets(tag.range.start_offset() - blanks, tag.range.end_offset())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> DocComment {
        let start = source.find("/**").unwrap();
        let end = source.find("*/").unwrap() + 2;
        DocComment::parse(source, TextRange::from_offsets(start, end))
    }

    #[test]
    fn parses_block_tags() {
        let source = "    /**\n     * Sum.\n     * @param a first\n     *        value\n     * @return the sum\n     */";
        let doc = parse(source);
        assert!(!doc.is_single_line);
        assert_eq!(doc.indent, "    ");
        assert_eq!(doc.line_prefix, "     * ");
        let names: Vec<_> = doc.tags.iter().map(DocTag::display).collect();
        assert_eq!(names, vec!["@param a", "@return"]);
        assert_eq!(doc.tags[0].range.slice(source), "@param a first\n     *        value");
    }

    #[test]
    fn single_line_comment() {
        let source = "/** Text. */";
        let doc = parse(source);
        assert!(doc.is_single_line);
        assert!(doc.tags.is_empty());
        assert_eq!(doc.line_prefix, " * ");
    }

    #[test]
    fn removal_range_covers_owned_lines() {
        let source = "/**\n * @param a x\n * @param b y\n */";
        let doc = parse(source);
        let range = doc.removal_range(source, &doc.tags[0]);
        assert_eq!(range.slice(source), " * @param a x\n");
    }
}
