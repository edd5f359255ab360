//! Colon-form switch statements whose groups all assign one variable (or all return) become
//! an arrow-form switch expression.

use quill_core::{TextRange, TextRangeExt};
use quill_syntax::ast::{AssignOp, Expr, ExprKind, Stmt, SwitchGroup, SwitchLabelKind, SwitchStmt};
use quill_syntax::NodeRef;

use super::{has_jump, Declined, Detector};
use crate::context::AssistContext;
use crate::proposal::ProposalSpec;
use crate::rewrite::Rewrite;

pub(super) struct SwitchExpression;

const RELEVANCE: i32 = 4;

impl Detector for SwitchExpression {
    fn id(&self) -> &'static str {
        "switch_expression"
    }

    fn applies(&self, ctx: &AssistContext<'_>) -> bool {
        ctx.level.supports_switch_expressions()
            && ctx.enclosing_switch().is_some_and(|site| site.is_statement)
    }

    fn detect<'a>(&self, ctx: &AssistContext<'a>, out: &mut Vec<ProposalSpec<'a>>) -> Result<(), Declined> {
        let Some((index, switch)) = ctx.path.iter().enumerate().rev().find_map(|(i, n)| match *n {
            NodeRef::Stmt(Stmt::Switch(stmt)) => Some((i, stmt)),
            _ => None,
        }) else {
            return Ok(());
        };
        if switch.body.uses_arrows() || switch.body.default_group().is_none() {
            return Ok(());
        }

        let mut plans = Vec::with_capacity(switch.body.groups.len());
        for group in &switch.body.groups {
            let Some(plan) = plan_group(ctx, group)? else {
                return Ok(());
            };
            plans.push(plan);
        }

        let mut target: Option<Target<'a>> = None;
        for plan in &plans {
            let this = match plan.outcome {
                Outcome::Assign { var, .. } => Target::Assign(var),
                Outcome::Return { .. } => Target::Return,
                Outcome::Throw(_) => continue,
            };
            match target {
                None => target = Some(this),
                Some(seen) if seen == this => {}
                Some(_) => return Ok(()),
            }
        }
        let Some(target) = target else {
            return Ok(());
        };

        let rewrite = ctx.rewrite();
        let indent = rewrite.indent_at(switch.range.start_offset()).to_string();
        let case_indent = format!("{indent}{}", rewrite.indent_unit());
        let body_indent = format!("{case_indent}{}", rewrite.indent_unit());
        let nl = rewrite.newline();

        let selector = ctx.tree.slice(switch.selector.range);
        let mut expr = format!("switch ({selector}) {{");
        for plan in &plans {
            expr.push_str(&format!("{nl}{case_indent}{} -> ", plan.labels));
            expr.push_str(&render_body(ctx, &rewrite, plan, &case_indent, &body_indent));
        }
        expr.push_str(&format!("{nl}{indent}}}"));

        let (range, text) = match target {
            Target::Return => (switch.range, format!("return {expr};")),
            Target::Assign(var) => match merged_declaration(ctx, index, switch, var) {
                Some((decl_range, lead)) => (decl_range.cover(switch.range), format!("{lead} = {expr};")),
                None => (switch.range, format!("{var} = {expr};")),
            },
        };
        let mut edit = ctx.rewrite();
        edit.replace(range, text);
        out.push(ProposalSpec::new(
            self.id(),
            switch.range,
            "Convert to 'switch' expression",
            RELEVANCE,
            edit,
        ));
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Target<'a> {
    Assign(&'a str),
    Return,
}

/// How a group produces its value.
#[derive(Debug)]
enum Outcome<'a> {
    /// `v = value; break;`
    Assign {
        var: &'a str,
        value: &'a Expr,
        last: &'a [Stmt],
    },
    /// `return value;`
    Return { value: &'a Expr, last: &'a [Stmt] },
    Throw(&'a Stmt),
}

#[derive(Debug)]
struct GroupPlan<'a> {
    /// `case A, B` or `default`.
    labels: String,
    prefix: &'a [Stmt],
    outcome: Outcome<'a>,
}

fn plan_group<'a>(ctx: &AssistContext<'a>, group: &'a SwitchGroup) -> Result<Option<GroupPlan<'a>>, Declined> {
    let mut values = Vec::new();
    let mut has_default = false;
    for label in &group.labels {
        match &label.kind {
            SwitchLabelKind::Case(exprs) => values.extend(exprs.iter()),
            SwitchLabelKind::Default => has_default = true,
        }
    }
    if has_default && !values.is_empty() {
        return Err(Declined("default shares its group with case labels"));
    }

    let stmts = group.statements();
    let (prefix, outcome) = match stmts {
        [prefix @ .., Stmt::Expr(stmt), Stmt::Break(jump)] if jump.label.is_none() => {
            let ExprKind::Assign { op, lhs, rhs } = &stmt.expr.kind else {
                return Ok(None);
            };
            let ExprKind::Name(var) = &lhs.kind else {
                return Ok(None);
            };
            if *op != AssignOp::Assign {
                return Ok(None);
            }
            (
                prefix,
                Outcome::Assign {
                    var: var.as_str(),
                    value: rhs,
                    last: &stmts[stmts.len() - 2..],
                },
            )
        }
        [prefix @ .., Stmt::Return(ret)] => {
            let Some(value) = &ret.value else {
                return Ok(None);
            };
            (
                prefix,
                Outcome::Return {
                    value,
                    last: &stmts[stmts.len() - 1..],
                },
            )
        }
        [prefix @ .., throw @ Stmt::Throw(_)] => (prefix, Outcome::Throw(throw)),
        _ => return Ok(None),
    };
    if prefix.iter().any(|s| has_jump(NodeRef::Stmt(s))) {
        return Err(Declined("a case contains control flow the expression form cannot keep"));
    }

    let labels = if has_default {
        "default".to_string()
    } else {
        let values: Vec<&str> = values.iter().map(|e| ctx.tree.slice(e.range)).collect();
        format!("case {}", values.join(", "))
    };
    Ok(Some(GroupPlan {
        labels,
        prefix,
        outcome,
    }))
}

/// Same-line comments trailing `stmts`, joined.
fn trailing_comments(ctx: &AssistContext<'_>, stmts: &[Stmt]) -> String {
    let comments: Vec<&str> = stmts
        .iter()
        .flat_map(|s| ctx.tree.trailing_trivia(s.range().end_offset()))
        .map(|c| ctx.tree.slice(c.range))
        .collect();
    if comments.is_empty() {
        String::new()
    } else {
        format!(" {}", comments.join(" "))
    }
}

fn render_body(
    ctx: &AssistContext<'_>,
    rewrite: &Rewrite<'_>,
    plan: &GroupPlan<'_>,
    case_indent: &str,
    body_indent: &str,
) -> String {
    let nl = rewrite.newline();
    let prefix = match (plan.prefix.first(), plan.prefix.last()) {
        (Some(first), Some(last)) => {
            let start = ctx.tree.owned_range(first.range()).start_offset();
            let end = ctx
                .tree
                .trailing_trivia(last.range().end_offset())
                .last()
                .map_or(last.range().end_offset(), |c| c.range.end_offset());
            Some(rewrite.text_reindented(TextRange::from_offsets(start, end), body_indent))
        }
        _ => None,
    };
    let (result, stmts): (String, &[Stmt]) = match &plan.outcome {
        Outcome::Assign { value, last, .. } | Outcome::Return { value, last } => {
            (rewrite.text_reindented(value.range, body_indent), *last)
        }
        Outcome::Throw(stmt) => (
            rewrite.text_reindented(stmt.range(), body_indent),
            std::slice::from_ref(*stmt),
        ),
    };
    let comments = trailing_comments(ctx, stmts);
    let mut lines: Vec<String> = prefix.into_iter().collect();
    lines.extend(
        stmts
            .iter()
            .flat_map(|s| ctx.tree.leading_trivia(s.range().start_offset()))
            .map(|c| rewrite.text_reindented(c.range, body_indent)),
    );
    if lines.is_empty() {
        return match plan.outcome {
            Outcome::Throw(_) => format!("{result}{comments}"),
            _ => format!("{result};{comments}"),
        };
    }
    let lines = lines.join(&format!("{nl}{body_indent}"));
    let last = match plan.outcome {
        Outcome::Throw(_) => format!("{result}{comments}"),
        _ => format!("yield {result};{comments}"),
    };
    format!("{{{nl}{body_indent}{lines}{nl}{body_indent}{last}{nl}{case_indent}}}")
}

/// A directly preceding `T v;` declaration to fold into `T v = switch …;`.
fn merged_declaration<'a>(
    ctx: &AssistContext<'a>,
    index: usize,
    switch: &'a SwitchStmt,
    var: &str,
) -> Option<(TextRange, &'a str)> {
    let siblings: &'a [Stmt] = match ctx.parent(index)? {
        NodeRef::Block(block) => &block.stmts,
        NodeRef::Stmt(Stmt::Block(block)) => &block.stmts,
        NodeRef::SwitchGroup(group) => group.statements(),
        _ => return None,
    };
    let pos = siblings
        .iter()
        .position(|s| matches!(s, Stmt::Switch(s) if std::ptr::eq(s, switch)))?;
    let Stmt::LocalVar(decl) = siblings.get(pos.checked_sub(1)?)? else {
        return None;
    };
    let [declarator] = decl.declarators.as_slice() else {
        return None;
    };
    if declarator.name.name != var || declarator.init.is_some() {
        return None;
    }
    let lead = TextRange::from_offsets(decl.range.start_offset(), declarator.range.end_offset());
    Some((decl.range, ctx.tree.slice(lead)))
}
