//! Missing enum cases and a missing `default` for switch statements and expressions.

use std::collections::HashSet;

use quill_core::{TextRange, TextRangeExt};
use quill_syntax::ast::{simple_name, Expr, ExprKind, PrimitiveType, SwitchBody, SwitchGroup};
use quill_syntax::JavaType;

use super::{Declined, Detector};
use crate::context::{AssistContext, SwitchSite};
use crate::proposal::ProposalSpec;
use crate::rewrite::{ListAnchor, ListChild, ListEntry, ListRewrite, ListStyle, Rewrite};

pub(super) struct SwitchCases;

const ADD_CASES: i32 = 8;
const ADD_DEFAULT: i32 = 7;

impl Detector for SwitchCases {
    fn id(&self) -> &'static str {
        "switch_cases"
    }

    fn applies(&self, ctx: &AssistContext<'_>) -> bool {
        ctx.enclosing_switch().is_some()
    }

    fn detect<'a>(&self, ctx: &AssistContext<'a>, out: &mut Vec<ProposalSpec<'a>>) -> Result<(), Declined> {
        let Some(site) = ctx.enclosing_switch() else {
            return Ok(());
        };
        let ty = ctx.sema.type_of(site.selector);
        let selector = ctx.tree.slice(site.selector.range);

        if let Some(constants) = ty.simple_name().and_then(|name| ctx.sema.enum_constants(name)) {
            let present = case_names(site.body);
            let missing: Vec<&str> = constants
                .iter()
                .map(String::as_str)
                .filter(|c| !present.contains(*c))
                .collect();
            if !missing.is_empty() {
                let arrows = site.body.uses_arrows();
                let items: Vec<String> = missing
                    .iter()
                    .map(|constant| {
                        group_text(
                            ctx,
                            &format!("case {constant}"),
                            &format!(
                                "throw new UnsupportedOperationException(\"Unimplemented case: \" + {selector});"
                            ),
                            arrows,
                        )
                    })
                    .collect();
                let rewrite = insert_groups(ctx, site, items, true)?;
                out.push(ProposalSpec::new(
                    self.id(),
                    site.range,
                    "Add missing case statements",
                    ADD_CASES,
                    rewrite,
                ));
            }
        }

        if site.body.default_group().is_none() && is_switchable(ctx, &ty) {
            let item = group_text(
                ctx,
                "default",
                &format!("throw new IllegalArgumentException(\"Unexpected value: \" + {selector});"),
                site.body.uses_arrows(),
            );
            let rewrite = insert_groups(ctx, site, vec![item], false)?;
            out.push(ProposalSpec::new(
                self.id(),
                site.range,
                "Add 'default' case",
                ADD_DEFAULT,
                rewrite,
            ));
        }
        Ok(())
    }
}

/// Constant names used in case labels (`RED` for both `RED` and `Color.RED`).
fn case_names(body: &SwitchBody) -> HashSet<&str> {
    body.case_values()
        .filter_map(|value: &Expr| match &value.kind {
            ExprKind::Name(name) => Some(name.as_str()),
            ExprKind::FieldAccess { name, .. } => Some(name.name.as_str()),
            _ => None,
        })
        .collect()
}

fn is_switchable(ctx: &AssistContext<'_>, ty: &JavaType) -> bool {
    match ty {
        JavaType::Primitive(p) => matches!(
            p,
            PrimitiveType::Int | PrimitiveType::Char | PrimitiveType::Short | PrimitiveType::Byte
        ),
        JavaType::Reference { name, .. } => {
            matches!(
                simple_name(name),
                "String" | "Integer" | "Character" | "Short" | "Byte"
            ) || ctx.sema.is_enum(ty)
        }
        _ => false,
    }
}

/// A new group relative to the case indentation: labels, then the body one level deeper.
fn group_text(ctx: &AssistContext<'_>, label: &str, body: &str, arrows: bool) -> String {
    if arrows {
        return format!("{label} -> {body}");
    }
    let rewrite = ctx.rewrite();
    format!("{label}:{}{}{body}", rewrite.newline(), rewrite.indent_unit())
}

/// Insert `items` as new groups: before the `default` group when `before_default` is set and
/// there is one, else after the last group.
fn insert_groups<'a>(
    ctx: &AssistContext<'a>,
    site: SwitchSite<'a>,
    items: Vec<String>,
    before_default: bool,
) -> Result<Rewrite<'a>, Declined> {
    let mut rewrite = ctx.rewrite();
    let nl = rewrite.newline();
    let body = site.body;

    if body.groups.is_empty() {
        let indent = rewrite.indent_at(site.range.start_offset());
        let case_indent = format!("{indent}{}", rewrite.indent_unit());
        let mut text = String::from("{");
        for item in &items {
            text.push_str(nl);
            text.push_str(&case_indent);
            text.push_str(&quill_core::text::reindent(item, "", &case_indent));
        }
        text.push_str(&format!("{nl}{indent}}}"));
        rewrite.replace(body.range, text);
        return Ok(rewrite);
    }

    let case_indent = rewrite.indent_at(body.groups[0].range.start_offset()).to_string();
    let default_index = body
        .groups
        .iter()
        .position(|g| g.has_default())
        .filter(|_| before_default);
    let arrows = body.uses_arrows();

    let closed = match default_index {
        Some(index) => {
            let falls_through = index
                .checked_sub(1)
                .is_some_and(|prev| !arrows && !group_exits(&body.groups[prev]));
            if falls_through {
                return Err(Declined("the group before default falls through into it"));
            }
            false
        }
        None => !arrows && close_last_group(ctx, &mut rewrite, body),
    };

    let mut entries: Vec<ListEntry> = (0..body.groups.len()).map(ListEntry::Old).collect();
    let at = default_index.unwrap_or(entries.len());
    entries.splice(at..at, items.into_iter().map(ListEntry::New));

    let children = body
        .groups
        .iter()
        .map(|g| ListChild::node(ctx.tree, g.range))
        .collect();
    let mut list = ListRewrite::new(
        ctx.tree,
        ListStyle::Lines {
            indent: case_indent.clone(),
        },
        children,
        ListAnchor::After(body.range.start_offset() + 1),
    );
    list.set_entries(entries.clone());
    rewrite.list(list);
    if !closed {
        return Ok(rewrite);
    }
    Ok(rewrite.finish_or_replace(body.range, || rendered_body(ctx, site, &entries, &case_indent)))
}

/// The whole `{ … }` of `site` with `entries` as its groups, the last old group closed by a
/// `break`.
fn rendered_body(
    ctx: &AssistContext<'_>,
    site: SwitchSite<'_>,
    entries: &[ListEntry],
    case_indent: &str,
) -> String {
    let rewrite = ctx.rewrite();
    let nl = rewrite.newline();
    let groups = &site.body.groups;
    let mut text = String::from("{");
    for entry in entries {
        text.push_str(nl);
        text.push_str(case_indent);
        match entry {
            ListEntry::Old(i) => {
                let Some(group) = groups.get(*i) else {
                    continue;
                };
                text.push_str(&rewrite.text_reindented(ctx.tree.owned_range(group.range), case_indent));
                if *i + 1 == groups.len() {
                    text.push_str(&format!("{nl}{case_indent}{}break;", rewrite.indent_unit()));
                }
            }
            ListEntry::New(item) => text.push_str(&quill_core::text::reindent(item, "", case_indent)),
        }
    }
    text.push_str(&format!("{nl}{}}}", rewrite.indent_at(site.range.start_offset())));
    text
}

fn group_exits(group: &SwitchGroup) -> bool {
    group
        .statements()
        .last()
        .is_some_and(|s| s.exits_unconditionally())
}

/// Add `break;` to a last colon group that would otherwise fall into the appended groups.
/// Add a `break` to a last group that would fall off the end. Whether one was added.
fn close_last_group(ctx: &AssistContext<'_>, rewrite: &mut Rewrite<'_>, body: &SwitchBody) -> bool {
    let Some(last) = body.groups.last() else {
        return false;
    };
    if group_exits(last) {
        return false;
    }
    let nl = rewrite.newline();
    match last.statements().last() {
        Some(stmt) => {
            let indent = rewrite.indent_at(stmt.range().start_offset());
            let end = ctx.tree.owned_range(stmt.range()).end_offset();
            rewrite.insert_after(TextRange::empty_at(end), format!("{nl}{indent}break;"));
        }
        None => {
            let Some(label) = last.labels.last() else {
                return false;
            };
            let indent = rewrite.nested_indent(label.range.start_offset());
            rewrite.insert_after(label.range, format!("{nl}{indent}break;"));
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AssistRequest;
    use quill_config::QuillConfig;
    use quill_syntax::{parse, Semantics};

    #[test]
    fn replacement_body_matches_the_incremental_edits() {
        let source = "class A {\n    void m(int x) {\n        switch (x) {\n            case 1:\n                one();\n        }\n    }\n}\n";
        let tree = parse(source);
        let sema = Semantics::new(&tree);
        let config = QuillConfig::default();
        let offset = source.find("one()").unwrap();
        let ctx = AssistContext::new(&tree, &sema, &config, &[], AssistRequest::caret(offset))
            .unwrap()
            .expect("caret inside the text");
        let site = ctx.enclosing_switch().expect("caret inside the switch");
        let item = group_text(&ctx, "default", "fail();", false);

        let incremental = insert_groups(&ctx, site, vec![item.clone()], false)
            .unwrap()
            .finish()
            .unwrap()
            .apply(source)
            .unwrap();
        let entries = vec![ListEntry::Old(0), ListEntry::New(item)];
        let mut replaced = ctx.rewrite();
        replaced.replace(site.body.range, rendered_body(&ctx, site, &entries, "            "));
        let replaced = replaced.finish().unwrap().apply(source).unwrap();

        assert_eq!(replaced, incremental);
        assert!(replaced.contains("                one();\n                break;\n            default:\n"));
    }
}
