//! Doc comment tag repair and template comments.
//!
//! The tags a declaration needs are derived from its signature ([`Element`]s, in canonical
//! order). Existing tags are never rewritten: new ones go next to the nearest present
//! neighbour through a doc-tag [`ListRewrite`], so descriptions and unrelated tags survive.

use quill_core::{text, Diagnostic, ProblemCode, TextRange, TextRangeExt};
use quill_syntax::ast::{simple_name, DirectiveKind, TypeParam};
use quill_syntax::javadoc::{DocComment, DocTag};
use quill_syntax::semantics::type_text;
use quill_syntax::JavaFeature;

use super::{Declined, Detector};
use crate::context::{AssistContext, Documented};
use crate::proposal::ProposalSpec;
use crate::rewrite::{ListAnchor, ListEntry, ListRewrite, Rewrite};

pub(super) struct Javadoc;

const ADD_TAG: i32 = 8;
const ADD_ALL: i32 = 7;
const REMOVE_TAG: i32 = 8;
const ADD_COMMENT: i32 = 4;

/// Tags that document a signature element. Anything else (`@see`, `@since`) is unrelated.
const ELEMENT_TAGS: &[&str] = &["param", "return", "throws", "exception", "uses", "provides"];

/// A signature element that wants a tag.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Element {
    tag: &'static str,
    /// `a`, `<T>`, `IOException`; `None` for `@return`.
    argument: Option<String>,
    /// Where the element is declared.
    range: TextRange,
}

impl Element {
    fn text(&self) -> String {
        match &self.argument {
            Some(arg) => format!("@{} {}", self.tag, arg),
            None => format!("@{}", self.tag),
        }
    }

    fn matches(&self, tag: &DocTag) -> bool {
        let same_kind = match self.tag {
            "throws" => tag.is_throws(),
            name => tag.name == name,
        };
        if !same_kind {
            return false;
        }
        match (&self.argument, tag.argument_text()) {
            (None, _) => true,
            (Some(_), None) => false,
            (Some(a), Some(b)) if self.tag == "param" => a == b,
            (Some(a), Some(b)) => simple_name(a) == simple_name(b),
        }
    }
}

/// One entry of the tag list being built, with the element it documents.
#[derive(Debug, Clone)]
struct Slot {
    entry: ListEntry,
    element: Option<usize>,
    related: bool,
}

impl Detector for Javadoc {
    fn id(&self) -> &'static str {
        "javadoc"
    }

    fn applies(&self, ctx: &AssistContext<'_>) -> bool {
        match ctx.enclosing_documented() {
            Some(Documented::Module(_)) => ctx.level.is_enabled(JavaFeature::Modules),
            Some(_) => true,
            None => false,
        }
    }

    fn detect<'a>(&self, ctx: &AssistContext<'a>, out: &mut Vec<ProposalSpec<'a>>) -> Result<(), Declined> {
        let Some(target) = ctx.enclosing_documented() else {
            return Ok(());
        };
        let elements = required_elements(ctx, target);
        let on_declaration = ctx.in_doc_comment() || in_header(ctx, target);

        let Some(doc) = target.doc() else {
            if on_declaration {
                out.push(add_comment(self.id(), ctx, target, &elements)?);
            }
            return Ok(());
        };

        let missing: Vec<usize> = (0..elements.len())
            .filter(|&k| !doc.tags.iter().any(|t| elements[k].matches(t)))
            .collect();

        for diagnostic in ctx.diagnostics_with(ProblemCode::MissingTag) {
            let Some(k) = missing_for(diagnostic, &elements, &missing) else {
                continue;
            };
            let rewrite = tag_rewrite(ctx, doc, completed(doc, &elements, &[k]));
            out.push(ProposalSpec::new(
                self.id(),
                doc.range,
                format!("Add '{}' tag", elements[k].text()),
                ADD_TAG,
                rewrite,
            ));
        }

        let asked_for_missing = ctx.diagnostics_with(ProblemCode::MissingTag).next().is_some();
        if !missing.is_empty() && (on_declaration || asked_for_missing) {
            let rewrite = tag_rewrite(ctx, doc, completed(doc, &elements, &missing));
            out.push(ProposalSpec::new(
                self.id(),
                doc.range,
                "Add all missing tags",
                ADD_ALL,
                rewrite,
            ));
        }

        for index in removal_candidates(ctx, doc) {
            let tag = &doc.tags[index];
            let label = if is_duplicate(doc, index) {
                format!("Remove duplicate '{}' tag", tag.display())
            } else if is_invalid(ctx, target, &elements, tag) {
                format!("Remove '{}' tag", tag.display())
            } else {
                continue;
            };
            let mut list = ListRewrite::doc_tags(ctx.tree, doc, ListAnchor::LineStart(doc.range.end_offset()));
            list.remove(index);
            let mut rewrite = ctx.rewrite();
            rewrite.list(list);
            out.push(ProposalSpec::new(self.id(), tag.range, label, REMOVE_TAG, rewrite));
        }
        Ok(())
    }
}

/// Whether the selection is on the declaration itself rather than inside its body.
fn in_header(ctx: &AssistContext<'_>, target: Documented<'_>) -> bool {
    let header_end = match target {
        Documented::Type(t) => t.body.start_offset(),
        Documented::Method(m) => m.body.as_ref().map_or(m.range.end_offset(), |b| b.range.start_offset()),
        Documented::Module(m) => m.body.start_offset(),
    };
    let range = target.range();
    range.start_offset() <= ctx.selection.start_offset() && ctx.selection.end_offset() <= header_end
}

fn required_elements(ctx: &AssistContext<'_>, target: Documented<'_>) -> Vec<Element> {
    let source = ctx.source();
    let mut out = Vec::new();
    match target {
        Documented::Method(method) => {
            out.extend(method.type_params.iter().map(type_param));
            out.extend(method.params.iter().map(|p| Element {
                tag: "param",
                argument: Some(p.name.name.clone()),
                range: p.name.range,
            }));
            if let Some(ty) = method.return_type.as_ref().filter(|_| method.returns_value()) {
                out.push(Element {
                    tag: "return",
                    argument: None,
                    range: ty.range,
                });
            }
            out.extend(method.throws.iter().map(|t| Element {
                tag: "throws",
                argument: Some(type_text(t, source)),
                range: t.range,
            }));
        }
        Documented::Type(decl) => {
            out.extend(decl.type_params.iter().map(type_param));
            out.extend(decl.record_components.iter().map(|p| Element {
                tag: "param",
                argument: Some(p.name.name.clone()),
                range: p.name.range,
            }));
        }
        Documented::Module(module) => {
            for directive in &module.directives {
                let (tag, service) = match &directive.kind {
                    DirectiveKind::Uses { service } => ("uses", service),
                    DirectiveKind::Provides { service, .. } => ("provides", service),
                    _ => continue,
                };
                out.push(Element {
                    tag,
                    argument: Some(service.text.clone()),
                    range: directive.range,
                });
            }
        }
    }
    out
}

fn type_param(param: &TypeParam) -> Element {
    Element {
        tag: "param",
        argument: Some(format!("<{}>", param.name.name)),
        range: param.range,
    }
}

/// The missing element a `MissingTag` diagnostic reports: named by its first argument
/// (`@param a`), else located by range.
fn missing_for(diagnostic: &Diagnostic, elements: &[Element], missing: &[usize]) -> Option<usize> {
    let named = diagnostic.argument(0).and_then(|arg| {
        missing
            .iter()
            .copied()
            .find(|&k| elements[k].text() == arg.trim())
    });
    named.or_else(|| {
        missing
            .iter()
            .copied()
            .find(|&k| elements[k].range.contains_range(diagnostic.range))
    })
}

/// The doc's tags with the elements `add` inserted at their canonical positions.
fn completed(doc: &DocComment, elements: &[Element], add: &[usize]) -> Vec<Slot> {
    let mut slots: Vec<Slot> = doc
        .tags
        .iter()
        .enumerate()
        .map(|(i, tag)| Slot {
            entry: ListEntry::Old(i),
            element: elements.iter().position(|e| e.matches(tag)),
            related: ELEMENT_TAGS.contains(&tag.name.as_str()),
        })
        .collect();

    for &k in add {
        let present = |slots: &[Slot], j: usize| slots.iter().any(|s| s.element == Some(j));
        let pos = if let Some(j) = (0..k).rev().find(|&j| present(&slots, j)) {
            slots
                .iter()
                .rposition(|s| s.element == Some(j))
                .map_or(slots.len(), |p| p + 1)
        } else if let Some(j) = (k + 1..elements.len()).find(|&j| present(&slots, j)) {
            slots
                .iter()
                .position(|s| s.element == Some(j))
                .unwrap_or(slots.len())
        } else {
            slots.iter().position(|s| !s.related).unwrap_or(slots.len())
        };
        slots.insert(
            pos,
            Slot {
                entry: ListEntry::New(elements[k].text()),
                element: Some(k),
                related: true,
            },
        );
    }
    slots
}

fn tag_rewrite<'a>(ctx: &AssistContext<'a>, doc: &DocComment, slots: Vec<Slot>) -> Rewrite<'a> {
    let source = ctx.source();
    let mut rewrite = ctx.rewrite();
    let close = doc.range.end_offset().saturating_sub(2);
    let closes_on_own_line = text::is_first_on_line(source, close);

    let lines: Vec<String> = slots
        .iter()
        .map(|slot| match &slot.entry {
            ListEntry::Old(i) => doc.tags[*i].range.slice(source).to_string(),
            ListEntry::New(text) => text.clone(),
        })
        .collect();
    let nl = rewrite.newline();
    if doc.is_single_line || (!doc.has_block_tags() && !closes_on_own_line) {
        rewrite.replace(doc.range, expanded(doc, source, &lines, nl));
        return rewrite;
    }

    let mut list = ListRewrite::doc_tags(
        ctx.tree,
        doc,
        ListAnchor::LineStart(doc.closing_line_start(source)),
    );
    list.set_entries(slots.into_iter().map(|s| s.entry).collect());
    rewrite.list(list);
    rewrite.finish_or_replace(doc.range, || expanded(doc, source, &lines, nl))
}

/// A multi-line rendering of `doc`: its description followed by `tags`, one per line.
fn expanded(doc: &DocComment, source: &str, tags: &[String], nl: &str) -> String {
    let body_start = (doc.range.start_offset() + 3).min(doc.range.end_offset());
    let body_end = doc
        .tags
        .first()
        .map_or(doc.range.end_offset().saturating_sub(2), |t| t.range.start_offset())
        .max(body_start);
    let description = source[body_start..body_end].lines().filter_map(|line| {
        let line = line.trim();
        let line = line.strip_prefix('*').unwrap_or(line).trim();
        (!line.is_empty()).then_some(line)
    });

    let mut out = String::from("/**");
    for line in description.chain(tags.iter().map(String::as_str)) {
        out.push_str(nl);
        out.push_str(&doc.line_prefix);
        out.push_str(line);
    }
    out.push_str(nl);
    out.push_str(&doc.indent);
    out.push_str(" */");
    out
}

/// Tags the request points at: those under a duplicate/invalid tag diagnostic, and the tag
/// holding the selection.
fn removal_candidates(ctx: &AssistContext<'_>, doc: &DocComment) -> Vec<usize> {
    let mut ranges: Vec<TextRange> = ctx
        .diagnostics
        .iter()
        .filter(|d| matches!(d.code, ProblemCode::DuplicateTag | ProblemCode::InvalidTag))
        .map(|d| d.range)
        .collect();
    if doc.range.contains_range(ctx.selection) {
        ranges.push(ctx.selection);
    }
    let mut out = Vec::new();
    for range in ranges {
        let hit = doc
            .tags
            .iter()
            .position(|t| t.range.contains_range(range) || range.contains_range(t.range));
        if let Some(index) = hit.filter(|i| !out.contains(i)) {
            out.push(index);
        }
    }
    out
}

fn tag_key(tag: &DocTag) -> (&str, Option<&str>) {
    let name = if tag.is_throws() { "throws" } else { tag.name.as_str() };
    let argument = match name {
        "param" => tag.argument_text(),
        _ => tag.argument_text().map(simple_name),
    };
    (name, argument)
}

/// Whether an earlier tag documents the same element.
fn is_duplicate(doc: &DocComment, index: usize) -> bool {
    let tag = &doc.tags[index];
    if !ELEMENT_TAGS.contains(&tag.name.as_str()) {
        return false;
    }
    let key = tag_key(tag);
    doc.tags[..index].iter().any(|t| tag_key(t) == key)
}

/// Whether `tag` documents something the declaration does not have.
fn is_invalid(ctx: &AssistContext<'_>, target: Documented<'_>, elements: &[Element], tag: &DocTag) -> bool {
    if elements.iter().any(|e| e.matches(tag)) {
        return false;
    }
    match (target, tag.name.as_str()) {
        (Documented::Method(_), "param" | "return") => true,
        (Documented::Method(method), "throws" | "exception") => {
            let Some(name) = tag.argument_text().map(simple_name) else {
                return true;
            };
            let declared = method
                .throws
                .iter()
                .filter_map(|t| t.simple_name())
                .any(|t| ctx.sema.is_subtype(name, t));
            !declared && ctx.sema.is_checked_exception(name)
        }
        (Documented::Type(_), "param" | "return") => true,
        (Documented::Module(_), "uses" | "provides") => true,
        _ => false,
    }
}

fn add_comment<'a>(
    id: &'static str,
    ctx: &AssistContext<'a>,
    target: Documented<'a>,
    elements: &[Element],
) -> Result<ProposalSpec<'a>, Declined> {
    let templates = &ctx.config.templates;
    let (template, name) = match target {
        Documented::Type(decl) => (&templates.type_comment, decl.name.name.as_str()),
        Documented::Method(method) if method.is_constructor() => {
            (&templates.constructor_comment, method.name.name.as_str())
        }
        Documented::Method(method) => (&templates.method_comment, method.name.name.as_str()),
        Documented::Module(module) => (&templates.module_comment, module.name.text.as_str()),
    };
    let start = target.range().start_offset();
    let enclosing_types = ctx.sema.enclosing_types(start);
    let enclosing = enclosing_types
        .last()
        .map_or(name, |t| t.name.name.as_str());
    let tags: Vec<String> = elements.iter().map(Element::text).collect();

    let mut rewrite = ctx.rewrite();
    let nl = rewrite.newline();
    let indent = rewrite.indent_at(start);
    if !text::is_first_on_line(ctx.source(), start) {
        return Err(Declined("declaration does not start its line"));
    }
    let lines = render_template(template, &tags, name, enclosing);
    let comment = lines.join(&format!("{nl}{indent}"));
    rewrite.insert_before(TextRange::empty_at(start), format!("{comment}{nl}{indent}"));
    Ok(ProposalSpec::new(id, target.range(), "Add Javadoc comment", ADD_COMMENT, rewrite))
}

/// Expand a comment template. The line holding `${tags}` repeats once per tag with the same
/// surrounding text; with no tags it keeps its prefix only.
fn render_template(template: &str, tags: &[String], name: &str, enclosing: &str) -> Vec<String> {
    let mut out = Vec::new();
    for line in template.lines() {
        let line = line
            .trim_end_matches('\r')
            .replace("${name}", name)
            .replace("${enclosing_type}", enclosing);
        match line.split_once("${tags}") {
            Some((prefix, rest)) if tags.is_empty() => {
                out.push(format!("{prefix}{rest}").trim_end().to_string())
            }
            Some((prefix, rest)) => out.extend(tags.iter().map(|tag| format!("{prefix}{tag}{rest}"))),
            None => out.push(line),
        }
    }
    out
}
