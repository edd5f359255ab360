//! Combine catch clauses with identical bodies into one union catch, and the reverse.

use quill_core::TextRangeExt;
use quill_syntax::ast::{CatchClause, Stmt, TryStmt};
use quill_syntax::NodeRef;

use super::{Declined, Detector};
use crate::context::AssistContext;
use crate::proposal::ProposalSpec;
use crate::rewrite::{ListAnchor, ListChild, ListEntry, ListRewrite, ListStyle};

pub(super) struct MultiCatch;

const RELEVANCE: i32 = 5;

impl Detector for MultiCatch {
    fn id(&self) -> &'static str {
        "multi_catch"
    }

    fn applies(&self, ctx: &AssistContext<'_>) -> bool {
        ctx.level.supports_multi_catch() && ctx.enclosing_catch().is_some()
    }

    fn detect<'a>(&self, ctx: &AssistContext<'a>, out: &mut Vec<ProposalSpec<'a>>) -> Result<(), Declined> {
        let Some((try_stmt, index)) = catch_at_selection(ctx) else {
            return Ok(());
        };
        let clause = &try_stmt.catches[index];

        if clause.param.is_union() {
            let texts: Vec<String> = clause
                .param
                .types
                .iter()
                .map(|ty| with_type(ctx, clause, ctx.tree.slice(ty.range)))
                .collect();
            let mut entries = Vec::new();
            for i in 0..try_stmt.catches.len() {
                if i == index {
                    entries.extend(texts.iter().cloned().map(ListEntry::New));
                } else {
                    entries.push(ListEntry::Old(i));
                }
            }
            let mut rewrite = ctx.rewrite();
            let mut list = catch_list(ctx, try_stmt);
            list.set_entries(entries);
            rewrite.list(list);
            out.push(ProposalSpec::new(
                self.id(),
                clause.range,
                "Use separate catch blocks",
                RELEVANCE,
                rewrite,
            ));
        }

        let (start, end) = mergeable_run(ctx, try_stmt, index);
        if end > start {
            let run = &try_stmt.catches[start..=end];
            let types: Vec<&str> = run
                .iter()
                .flat_map(|c| c.param.types.iter())
                .filter_map(|t| t.simple_name())
                .collect();
            let related = types.iter().enumerate().any(|(i, a)| {
                types[i + 1..].iter().any(|b| ctx.sema.are_related(a, b))
            });
            if related {
                tracing::debug!(target: "quill.assist", "catch types are related; not combining");
                return Ok(());
            }

            let union = run
                .iter()
                .flat_map(|c| c.param.types.iter())
                .map(|t| ctx.tree.slice(t.range))
                .collect::<Vec<_>>()
                .join(" | ");
            let merged = with_type(ctx, &run[0], &union);
            let mut entries: Vec<ListEntry> = (0..start).map(ListEntry::Old).collect();
            entries.push(ListEntry::New(merged));
            entries.extend((end + 1..try_stmt.catches.len()).map(ListEntry::Old));

            let mut rewrite = ctx.rewrite();
            let mut list = catch_list(ctx, try_stmt);
            list.set_entries(entries);
            rewrite.list(list);
            out.push(ProposalSpec::new(
                self.id(),
                run[0].range.cover(run[run.len() - 1].range),
                "Combine catch blocks",
                RELEVANCE,
                rewrite,
            ));
        }
        Ok(())
    }
}

/// The innermost catch clause at the selection and its index in the owning `try`.
fn catch_at_selection<'a>(ctx: &AssistContext<'a>) -> Option<(&'a TryStmt, usize)> {
    ctx.path.iter().enumerate().rev().find_map(|(i, node)| match (*node, ctx.parent(i)) {
        (NodeRef::Catch(clause), Some(NodeRef::Stmt(Stmt::Try(try_stmt)))) => try_stmt
            .catches
            .iter()
            .position(|c| std::ptr::eq(c, clause))
            .map(|index| (try_stmt, index)),
        _ => None,
    })
}

/// Widest run of neighbours around `index` sharing its parameter name and body tokens.
fn mergeable_run(ctx: &AssistContext<'_>, try_stmt: &TryStmt, index: usize) -> (usize, usize) {
    let catches = &try_stmt.catches;
    let clause = &catches[index];
    let key = ctx.tree.structural_key(clause.body.range);
    let same = |other: &CatchClause| {
        other.param.name.name == clause.param.name.name
            && ctx.tree.structural_key(other.body.range) == key
    };
    let mut start = index;
    while start > 0 && same(&catches[start - 1]) {
        start -= 1;
    }
    let mut end = index;
    while end + 1 < catches.len() && same(&catches[end + 1]) {
        end += 1;
    }
    (start, end)
}

/// The clause's text with its caught type replaced.
fn with_type(ctx: &AssistContext<'_>, clause: &CatchClause, ty: &str) -> String {
    let source = ctx.source();
    let type_range = clause.param.type_range();
    format!(
        "{}{}{}",
        &source[clause.range.start_offset()..type_range.start_offset()],
        ty,
        &source[type_range.end_offset()..clause.range.end_offset()]
    )
}

fn catch_list<'a>(ctx: &AssistContext<'a>, try_stmt: &TryStmt) -> ListRewrite<'a> {
    let children = try_stmt
        .catches
        .iter()
        .map(|c| ListChild::node(ctx.tree, c.range))
        .collect();
    ListRewrite::new(ctx.tree, ListStyle::Inline, children, ListAnchor::After(try_stmt.body.range.end_offset()))
}
