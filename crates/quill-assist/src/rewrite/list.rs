//! Child-list rewriting.
//!
//! The old and new child sequences are matched by longest common subsequence over structural
//! keys (token texts without trivia), computed with `similar`. Matched children are left untouched, so their text and
//! comments survive verbatim. Unmatched old children are removed together with what they own;
//! new children are inserted next to the nearest surviving neighbour.

use quill_core::{TextEdit, TextRange, TextRangeExt};
use quill_syntax::javadoc::{DocComment, DocTag};
use quill_syntax::{lex, SyntaxTree};
use similar::{Algorithm, DiffOp};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListChild {
    pub range: TextRange,
    /// `range` widened by owned comments; insertions anchor to it.
    pub owned: TextRange,
    /// Text deleted with the child in line-separated lists.
    pub removal: TextRange,
    pub key: Vec<String>,
}

impl ListChild {
    pub fn node(tree: &SyntaxTree, range: TextRange) -> Self {
        Self {
            range,
            owned: tree.owned_range(range),
            removal: tree.removal_range(range),
            key: tree
                .structural_key(range)
                .into_iter()
                .map(str::to_string)
                .collect(),
        }
    }

    pub fn doc_tag(source: &str, doc: &DocComment, tag: &DocTag) -> Self {
        Self {
            range: tag.range,
            owned: tag.range,
            removal: doc.removal_range(source, tag),
            key: doc_words(tag.range.slice(source)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListEntry {
    /// The old child at this index.
    Old(usize),
    /// New text, indented relative to the list.
    New(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListStyle {
    /// One child per line (statements, switch groups, doc tags).
    Lines { indent: String },
    /// Children separated by a token (`", "`, `" | "`, `"; "`).
    Separated { separator: String },
    /// Children separated by blanks only (catch clauses).
    Inline,
}

/// Where new children go when no old child survives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListAnchor {
    /// After the opening token; each line-separated child starts on a new line.
    After(usize),
    /// At the start of a line; each line-separated child ends with a newline.
    LineStart(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Keys {
    Tokens,
    DocWords,
}

#[derive(Debug, Clone)]
pub struct ListRewrite<'a> {
    source: &'a str,
    style: ListStyle,
    old: Vec<ListChild>,
    entries: Vec<ListEntry>,
    anchor: ListAnchor,
    newline: &'a str,
    keys: Keys,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Keep(usize),
    Delete(usize),
    Insert(usize),
}

impl<'a> ListRewrite<'a> {
    /// A rewrite that starts out keeping every child of `old`.
    pub fn new(tree: &'a SyntaxTree, style: ListStyle, old: Vec<ListChild>, anchor: ListAnchor) -> Self {
        let entries = (0..old.len()).map(ListEntry::Old).collect();
        Self {
            source: tree.text(),
            style,
            old,
            entries,
            anchor,
            newline: quill_core::text::newline(tree.text()),
            keys: Keys::Tokens,
        }
    }

    /// Doc tag lists compare children by their words instead of Java tokens.
    pub fn doc_tags(
        tree: &'a SyntaxTree,
        doc: &DocComment,
        anchor: ListAnchor,
    ) -> Self {
        let old = doc
            .tags
            .iter()
            .map(|tag| ListChild::doc_tag(tree.text(), doc, tag))
            .collect();
        let mut list = Self::new(
            tree,
            ListStyle::Lines {
                indent: doc.line_prefix.clone(),
            },
            old,
            anchor,
        );
        list.keys = Keys::DocWords;
        list
    }

    pub fn old(&self) -> &[ListChild] {
        &self.old
    }

    pub fn set_entries(&mut self, entries: Vec<ListEntry>) {
        self.entries = entries;
    }

    /// Drop the old child `index` from the new sequence.
    pub fn remove(&mut self, index: usize) {
        self.entries.retain(|e| *e != ListEntry::Old(index));
    }

    pub fn push(&mut self, text: impl Into<String>) {
        self.entries.push(ListEntry::New(text.into()));
    }

    fn entry_key(&self, entry: &ListEntry) -> Vec<String> {
        match entry {
            ListEntry::Old(idx) => self.old.get(*idx).map(|c| c.key.clone()).unwrap_or_default(),
            ListEntry::New(text) => match self.keys {
                Keys::Tokens => lex(text)
                    .iter()
                    .filter(|t| !t.kind.is_trivia())
                    .map(|t| t.text(text).to_string())
                    .collect(),
                Keys::DocWords => doc_words(text),
            },
        }
    }

    fn entry_text(&self, entry: &ListEntry) -> String {
        match entry {
            ListEntry::Old(idx) => self
                .old
                .get(*idx)
                .map(|c| c.range.slice(self.source).to_string())
                .unwrap_or_default(),
            ListEntry::New(text) => text.clone(),
        }
    }

    fn align(&self) -> Vec<Step> {
        let old_keys: Vec<&[String]> = self.old.iter().map(|c| c.key.as_slice()).collect();
        let new_keys: Vec<Vec<String>> = self.entries.iter().map(|e| self.entry_key(e)).collect();
        let new_keys: Vec<&[String]> = new_keys.iter().map(Vec::as_slice).collect();

        let mut steps = Vec::with_capacity(old_keys.len() + new_keys.len());
        for op in similar::capture_diff_slices(Algorithm::Lcs, &old_keys, &new_keys) {
            match op {
                DiffOp::Equal { old_index, len, .. } => {
                    steps.extend((old_index..old_index + len).map(Step::Keep));
                }
                DiffOp::Delete { old_index, old_len, .. } => {
                    steps.extend((old_index..old_index + old_len).map(Step::Delete));
                }
                DiffOp::Insert { new_index, new_len, .. } => {
                    steps.extend((new_index..new_index + new_len).map(Step::Insert));
                }
                DiffOp::Replace {
                    old_index,
                    old_len,
                    new_index,
                    new_len,
                } => {
                    steps.extend((old_index..old_index + old_len).map(Step::Delete));
                    steps.extend((new_index..new_index + new_len).map(Step::Insert));
                }
            }
        }
        steps
    }

    pub fn into_edits(self) -> Vec<TextEdit> {
        let steps = self.align();
        let kept: Vec<bool> = {
            let mut kept = vec![false; self.old.len()];
            for step in &steps {
                if let Step::Keep(i) = step {
                    kept[*i] = true;
                }
            }
            kept
        };

        let mut edits = self.deletions(&kept);

        let mut prev_kept: Option<usize> = None;
        let mut idx = 0;
        while idx < steps.len() {
            match steps[idx] {
                Step::Keep(i) => {
                    prev_kept = Some(i);
                    idx += 1;
                }
                Step::Delete(_) => idx += 1,
                Step::Insert(_) => {
                    let mut group = Vec::new();
                    while idx < steps.len() {
                        match steps[idx] {
                            Step::Insert(j) => group.push(self.entry_text(&self.entries[j])),
                            Step::Delete(_) => {}
                            Step::Keep(_) => break,
                        }
                        idx += 1;
                    }
                    let next_kept = steps[idx..].iter().find_map(|s| match s {
                        Step::Keep(i) => Some(*i),
                        _ => None,
                    });
                    edits.push(self.insertion(&group, prev_kept, next_kept));
                }
            }
        }
        edits
    }

    fn deletions(&self, kept: &[bool]) -> Vec<TextEdit> {
        let mut edits = Vec::new();
        if let ListStyle::Lines { .. } = self.style {
            for (child, kept) in self.old.iter().zip(kept) {
                if !kept {
                    edits.push(TextEdit::delete(child.removal));
                }
            }
            return edits;
        }

        let n = self.old.len();
        let mut a = 0;
        while a < n {
            if kept[a] {
                a += 1;
                continue;
            }
            let mut b = a;
            while b + 1 < n && !kept[b + 1] {
                b += 1;
            }
            let range = if b + 1 < n {
                TextRange::from_offsets(self.old[a].range.start_offset(), self.old[b + 1].range.start_offset())
            } else if a > 0 {
                TextRange::from_offsets(self.old[a - 1].range.end_offset(), self.old[b].range.end_offset())
            } else {
                TextRange::from_offsets(self.old[a].range.start_offset(), self.old[b].range.end_offset())
            };
            edits.push(TextEdit::delete(range));
            a = b + 1;
        }
        edits
    }

    /// Separator between inline children: the blanks already used by the list, else a space.
    fn inline_gap(&self) -> String {
        self.old
            .windows(2)
            .map(|pair| TextRange::from_offsets(pair[0].range.end_offset(), pair[1].range.start_offset()).slice(self.source))
            .find(|gap| !gap.is_empty() && gap.trim().is_empty())
            .unwrap_or(" ")
            .to_string()
    }

    fn insertion(&self, items: &[String], prev: Option<usize>, next: Option<usize>) -> TextEdit {
        let nl = self.newline;
        match &self.style {
            ListStyle::Lines { indent } => {
                let render = |item: &String| quill_core::text::reindent(item, "", indent);
                if let Some(p) = prev {
                    let text: String = items
                        .iter()
                        .map(|item| format!("{nl}{indent}{}", render(item)))
                        .collect();
                    TextEdit::insert(self.old[p].owned.end_offset(), text)
                } else if let Some(q) = next {
                    let text: String = items
                        .iter()
                        .map(|item| format!("{}{nl}{indent}", render(item)))
                        .collect();
                    TextEdit::insert(self.old[q].owned.start_offset(), text)
                } else {
                    match self.anchor {
                        ListAnchor::After(offset) => TextEdit::insert(
                            offset,
                            items
                                .iter()
                                .map(|item| format!("{nl}{indent}{}", render(item)))
                                .collect::<String>(),
                        ),
                        ListAnchor::LineStart(offset) => TextEdit::insert(
                            offset,
                            items
                                .iter()
                                .map(|item| format!("{indent}{}{nl}", render(item)))
                                .collect::<String>(),
                        ),
                    }
                }
            }
            ListStyle::Separated { separator } => self.token_insertion(items, prev, next, separator),
            ListStyle::Inline => self.token_insertion(items, prev, next, &self.inline_gap()),
        }
    }

    fn token_insertion(
        &self,
        items: &[String],
        prev: Option<usize>,
        next: Option<usize>,
        separator: &str,
    ) -> TextEdit {
        if let Some(p) = prev {
            let text: String = items.iter().map(|item| format!("{separator}{item}")).collect();
            TextEdit::insert(self.old[p].range.end_offset(), text)
        } else if let Some(q) = next {
            let text: String = items.iter().map(|item| format!("{item}{separator}")).collect();
            TextEdit::insert(self.old[q].range.start_offset(), text)
        } else {
            let offset = match self.old.first() {
                Some(first) => first.range.start_offset(),
                None => match self.anchor {
                    ListAnchor::After(offset) | ListAnchor::LineStart(offset) => offset,
                },
            };
            TextEdit::insert(offset, items.join(separator))
        }
    }
}

/// Words of a doc comment fragment, ignoring continuation-line stars.
fn doc_words(text: &str) -> Vec<String> {
    text.split_whitespace()
        .filter(|w| *w != "*")
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use quill_core::EditSet;
    use quill_syntax::ast::{Member, Stmt};
    use quill_syntax::parse;

    fn body_statements(tree: &SyntaxTree) -> Vec<ListChild> {
        let Member::Method(method) = &tree.unit().types[0].members[0] else {
            panic!("expected a method");
        };
        method
            .body
            .as_ref()
            .unwrap()
            .stmts
            .iter()
            .map(|s| ListChild::node(tree, Stmt::range(s)))
            .collect()
    }

    fn apply(tree: &SyntaxTree, list: ListRewrite<'_>) -> String {
        EditSet::from_edits(list.into_edits())
            .apply(tree.text())
            .unwrap()
    }

    #[test]
    fn replaces_a_statement_and_keeps_comments_of_survivors() {
        let tree = parse(
            "class A {\n    void m() {\n        // first\n        a();\n        b(); // about b\n        c();\n    }\n}\n",
        );
        let children = body_statements(&tree);
        let mut list = ListRewrite::new(
            &tree,
            ListStyle::Lines {
                indent: "        ".into(),
            },
            children,
            ListAnchor::After(0),
        );
        list.set_entries(vec![
            ListEntry::Old(0),
            ListEntry::New("x();".into()),
            ListEntry::Old(2),
        ]);
        assert_eq!(
            apply(&tree, list),
            "class A {\n    void m() {\n        // first\n        a();\n        x();\n        c();\n    }\n}\n"
        );
    }

    #[test]
    fn structurally_equal_text_is_kept_verbatim() {
        let tree = parse("class A {\n    void m() {\n        a(1,  2); // keep\n    }\n}\n");
        let children = body_statements(&tree);
        let mut list = ListRewrite::new(
            &tree,
            ListStyle::Lines {
                indent: "        ".into(),
            },
            children,
            ListAnchor::After(0),
        );
        list.set_entries(vec![ListEntry::New("a(1, 2);".into())]);
        assert!(list.into_edits().is_empty());
    }

    #[test]
    fn repeated_children_align_once() {
        let tree = parse("class A {\n    void m() {\n        a();\n        a();\n        b();\n    }\n}\n");
        let children = body_statements(&tree);
        let mut list = ListRewrite::new(
            &tree,
            ListStyle::Lines {
                indent: "        ".into(),
            },
            children,
            ListAnchor::After(0),
        );
        list.set_entries(vec![ListEntry::New("a();".into()), ListEntry::Old(2)]);
        let edits = list.clone().into_edits();
        assert_eq!(edits.len(), 1, "{edits:?}");
        assert_eq!(
            apply(&tree, list),
            "class A {\n    void m() {\n        a();\n        b();\n    }\n}\n"
        );
    }

    #[test]
    fn separated_list_removes_and_appends() {
        let source = "class A {\n    void m() throws A, B, C {}\n}\n";
        let tree = parse(source);
        let Member::Method(method) = &tree.unit().types[0].members[0] else {
            panic!("expected a method");
        };
        let children = method
            .throws
            .iter()
            .map(|t| ListChild::node(&tree, t.range))
            .collect();
        let mut list = ListRewrite::new(
            &tree,
            ListStyle::Separated {
                separator: ", ".into(),
            },
            children,
            ListAnchor::After(0),
        );
        list.remove(1);
        list.push("D");
        assert_eq!(apply(&tree, list), "class A {\n    void m() throws A, C, D {}\n}\n");
    }

    #[test]
    fn removing_the_last_separated_child_takes_the_separator() {
        let source = "class A {\n    void m() throws A, B {}\n}\n";
        let tree = parse(source);
        let Member::Method(method) = &tree.unit().types[0].members[0] else {
            panic!("expected a method");
        };
        let children = method
            .throws
            .iter()
            .map(|t| ListChild::node(&tree, t.range))
            .collect();
        let mut list = ListRewrite::new(
            &tree,
            ListStyle::Separated {
                separator: ", ".into(),
            },
            children,
            ListAnchor::After(0),
        );
        list.remove(1);
        assert_eq!(apply(&tree, list), "class A {\n    void m() throws A {}\n}\n");
    }

    #[test]
    fn doc_tags_insert_next_to_present_neighbours() {
        let source = "/**\n * Sum.\n * @param b second\n */\nclass A {}\n";
        let tree = parse(source);
        let doc = tree.unit().types[0].doc.clone().unwrap();
        let mut list = ListRewrite::doc_tags(&tree, &doc, ListAnchor::LineStart(0));
        list.set_entries(vec![
            ListEntry::New("@param a".into()),
            ListEntry::Old(0),
            ListEntry::New("@param c".into()),
        ]);
        assert_eq!(
            apply(&tree, list),
            "/**\n * Sum.\n * @param a\n * @param b second\n * @param c\n */\nclass A {}\n"
        );
    }
}
