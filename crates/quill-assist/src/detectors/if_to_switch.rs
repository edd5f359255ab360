//! `if`/`else if` chains (and runs of returning `if`s) comparing one discriminant against
//! constants, rewritten as a `switch`.
//!
//! A value already tested by an earlier branch is dropped from later ones; a branch left
//! without values is dropped entirely since it could never run.

use std::collections::HashSet;

use quill_core::{TextRange, TextRangeExt};
use quill_syntax::ast::{
    BinaryOp, Expr, ExprKind, IfStmt, LiteralKind, PrimitiveType, Stmt, UnaryOp,
};
use quill_syntax::{JavaFeature, JavaType, NodeRef};

use super::{block_content, branch_statements, has_unlabelled_break, Attempts, Declined, Detector};
use crate::context::AssistContext;
use crate::proposal::ProposalSpec;
use crate::rewrite::Rewrite;

pub(super) struct IfToSwitch;

const RELEVANCE: i32 = 4;

impl Detector for IfToSwitch {
    fn id(&self) -> &'static str {
        "if_to_switch"
    }

    fn applies(&self, ctx: &AssistContext<'_>) -> bool {
        ctx.enclosing_if().is_some()
    }

    fn detect<'a>(&self, ctx: &AssistContext<'a>, out: &mut Vec<ProposalSpec<'a>>) -> Result<(), Declined> {
        let mut attempts = Attempts::default();
        if let Some(root) = chain_root(ctx) {
            attempts.record(self.id(), convert_chain(self.id(), ctx, root).map(|spec| out.extend(spec)));
        }
        attempts.record(self.id(), convert_suite(self.id(), ctx).map(|spec| out.extend(spec)));
        attempts.finish(!out.is_empty())
    }
}

/// The first `if` of the `else if` chain holding the selection.
fn chain_root<'a>(ctx: &AssistContext<'a>) -> Option<&'a IfStmt> {
    let (mut index, mut root) = ctx.path.iter().enumerate().rev().find_map(|(i, n)| match *n {
        NodeRef::Stmt(Stmt::If(stmt)) => Some((i, stmt)),
        _ => None,
    })?;
    while let Some(NodeRef::Stmt(Stmt::If(parent))) = ctx.parent(index) {
        let is_else_if = parent
            .else_branch
            .as_deref()
            .is_some_and(|e| matches!(e, Stmt::If(inner) if std::ptr::eq(inner, root)));
        if !is_else_if {
            break;
        }
        root = parent;
        index -= 1;
    }
    Some(root)
}

/// One equality test found in a condition.
#[derive(Debug, Clone, Copy)]
enum Test<'a> {
    /// `a == b`
    Identity(&'a Expr, &'a Expr),
    /// `a.equals(b)`
    Equals(&'a Expr, &'a Expr),
}

impl<'a> Test<'a> {
    fn sides(self) -> (&'a Expr, &'a Expr) {
        match self {
            Test::Identity(a, b) | Test::Equals(a, b) => (a, b),
        }
    }
}

/// Split a condition into equality tests joined by `||`.
fn collect_tests<'a>(cond: &'a Expr, out: &mut Vec<Test<'a>>) -> bool {
    match &cond.unparenthesized().kind {
        ExprKind::Binary {
            op: BinaryOp::Or,
            lhs,
            rhs,
        } => collect_tests(lhs, out) && collect_tests(rhs, out),
        ExprKind::Binary {
            op: BinaryOp::Eq,
            lhs,
            rhs,
        } => {
            out.push(Test::Identity(lhs.unparenthesized(), rhs.unparenthesized()));
            true
        }
        ExprKind::MethodCall {
            target: Some(target),
            name,
            args,
            ..
        } if name.name == "equals" && args.args.len() == 1 => {
            out.push(Test::Equals(target.unparenthesized(), args.args[0].unparenthesized()));
            true
        }
        _ => false,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SwitchKind {
    Integral,
    String,
    Enum,
}

fn is_constant(expr: &Expr) -> bool {
    match &expr.kind {
        ExprKind::Literal(kind) => !matches!(kind, LiteralKind::Null | LiteralKind::Boolean),
        ExprKind::Unary {
            op: UnaryOp::Neg,
            operand,
        } => operand.is_literal(),
        _ => expr.is_name_like(),
    }
}

/// The discriminant shared by every test, with the constant each test compares it against.
struct Comparison<'a> {
    discriminant: &'a Expr,
    kind: SwitchKind,
    /// Per branch, the label texts in condition order.
    values: Vec<Vec<String>>,
}

/// Match the conditions of all branches. `Ok(None)` when they do not form a switch.
fn compare<'a>(ctx: &AssistContext<'a>, conditions: &[&'a Expr]) -> Result<Option<Comparison<'a>>, Declined> {
    let mut branches = Vec::with_capacity(conditions.len());
    for &cond in conditions {
        let mut tests = Vec::new();
        if !collect_tests(cond, &mut tests) {
            return Ok(None);
        }
        branches.push(tests);
    }
    let Some(first) = branches.first().and_then(|b| b.first()).copied() else {
        return Ok(None);
    };

    let key = |e: &Expr| ctx.tree.structural_key(e.range);
    let (a, b) = first.sides();
    let candidate = [a, b].into_iter().find(|&c| {
        c.is_name_like()
            && branches.iter().flatten().all(|t| {
                let (l, r) = t.sides();
                key(l) == key(c) || key(r) == key(c)
            })
    });
    let Some(discriminant) = candidate else {
        return Ok(None);
    };
    let disc_key = key(discriminant);

    let ty = ctx.sema.type_of(discriminant);
    let kind = match &ty {
        JavaType::Primitive(
            PrimitiveType::Int | PrimitiveType::Char | PrimitiveType::Short | PrimitiveType::Byte,
        ) => SwitchKind::Integral,
        JavaType::Reference { name, .. } if name == "String" => SwitchKind::String,
        other if ctx.sema.is_enum(other) => SwitchKind::Enum,
        _ => return Ok(None),
    };
    if kind == SwitchKind::String && !ctx.level.is_enabled(JavaFeature::StringSwitch) {
        return Err(Declined("switch on strings is not available at this language level"));
    }

    let mut values = Vec::with_capacity(branches.len());
    for tests in &branches {
        let mut labels = Vec::with_capacity(tests.len());
        for test in tests {
            let (l, r) = test.sides();
            let value = if key(l) == disc_key { r } else { l };
            let form_ok = match (kind, test) {
                (SwitchKind::String, Test::Equals(..)) => {
                    matches!(value.kind, ExprKind::Literal(LiteralKind::String))
                }
                (SwitchKind::Integral | SwitchKind::Enum, Test::Identity(..)) => true,
                _ => false,
            };
            if !form_ok || !is_constant(value) || key(value) == disc_key {
                return Ok(None);
            }
            labels.push(label_text(ctx, kind, value));
        }
        values.push(labels);
    }
    Ok(Some(Comparison {
        discriminant,
        kind,
        values,
    }))
}

/// Case label for a constant; enum labels use the bare constant name.
fn label_text(ctx: &AssistContext<'_>, kind: SwitchKind, value: &Expr) -> String {
    match (&value.kind, kind) {
        (ExprKind::FieldAccess { name, .. }, SwitchKind::Enum) => name.name.clone(),
        _ => ctx.tree.slice(value.range).to_string(),
    }
}

/// Drop values seen in earlier branches, then branches left without values. Returns the
/// surviving branch indices with their labels.
fn deduplicate(values: Vec<Vec<String>>) -> Vec<(usize, Vec<String>)> {
    let mut seen = HashSet::new();
    values
        .into_iter()
        .enumerate()
        .filter_map(|(i, labels)| {
            let fresh: Vec<String> = labels
                .into_iter()
                .filter(|label| seen.insert(label.clone()))
                .collect();
            (!fresh.is_empty()).then_some((i, fresh))
        })
        .collect()
}

/// A rendered case body.
struct CaseBody {
    /// Statements re-indented to the body indentation; `None` when empty.
    content: Option<String>,
    exits: bool,
    declares: bool,
    /// The text of a lone expression or `throw` statement, usable after `->`.
    single: Option<String>,
    comments: Anchored,
}

impl CaseBody {
    fn with_comments(mut self, comments: Anchored) -> Self {
        if !comments.after.is_empty() {
            self.single = None;
        }
        self.comments = comments;
        self
    }

    /// The content followed by the comments trailing the branch.
    fn text(&self, nl: &str, indent: &str) -> Option<String> {
        let lines: Vec<&str> = self
            .content
            .iter()
            .chain(&self.comments.after)
            .map(String::as_str)
            .collect();
        (!lines.is_empty()).then(|| lines.join(&format!("{nl}{indent}")))
    }
}

/// Comments of the replaced text that lie outside every branch body.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct Anchored {
    /// Own-line comments placed before the case label.
    before: Vec<String>,
    /// Comments placed after the case body.
    after: Vec<String>,
}

/// Attach the comments of `range` found outside `bodies` (in source order) to a branch. A
/// comment right after a body, on its line or before an `else`, trails that body; any other
/// one precedes the next branch.
fn anchor_comments(
    ctx: &AssistContext<'_>,
    writer: &SwitchWriter<'_>,
    range: TextRange,
    bodies: &[&Stmt],
) -> Vec<Anchored> {
    let mut anchored = vec![Anchored::default(); bodies.len()];
    for comment in ctx.tree.comments_in(range) {
        if bodies.iter().any(|b| b.range().contains_range(comment.range)) {
            continue;
        }
        let start = comment.range.start_offset();
        let next = bodies.partition_point(|b| b.range().end_offset() <= start);
        let trails = next > 0 && {
            let gap = ctx
                .tree
                .slice(TextRange::from_offsets(bodies[next - 1].range().end_offset(), start));
            let before_else = ctx
                .tree
                .next_token(comment.range.end_offset())
                .is_some_and(|t| ctx.tree.slice(t.range) == "else");
            gap.trim().is_empty() && (!gap.contains('\n') || before_else)
        };
        if trails || next == bodies.len() {
            let text = writer.rewrite.text_reindented(comment.range, &writer.body_indent);
            anchored[next - 1].after.push(text);
        } else {
            let text = writer.rewrite.text_reindented(comment.range, &writer.case_indent);
            anchored[next].before.push(text);
        }
    }
    anchored
}

/// Keep the comments of the branches in `kept`. Those of dropped branches move before the
/// next kept branch, or after the last one.
fn keep_comments(anchored: Vec<Anchored>, kept: &[usize]) -> Vec<Anchored> {
    let mut out: Vec<Anchored> = Vec::with_capacity(kept.len());
    let mut carry = Vec::new();
    for (i, mut comments) in anchored.into_iter().enumerate() {
        if kept.contains(&i) {
            carry.append(&mut comments.before);
            comments.before = std::mem::take(&mut carry);
            out.push(comments);
        } else {
            carry.extend(comments.before);
            carry.extend(comments.after);
        }
    }
    if let Some(last) = out.last_mut() {
        last.after.extend(carry);
    }
    out
}

fn case_body(rewrite: &Rewrite<'_>, stmt: &Stmt, indent: &str) -> CaseBody {
    let stmts = branch_statements(stmt);
    let content = match stmt {
        Stmt::Block(block) => block_content(rewrite, block, indent),
        other => Some(rewrite.text_reindented(other.range(), indent)),
    };
    let single = match stmts {
        [Stmt::Expr(_) | Stmt::Throw(_)] => content.clone().filter(|c| !c.contains('\n')),
        _ => None,
    };
    CaseBody {
        exits: stmt.exits_unconditionally(),
        declares: stmts
            .iter()
            .any(|s| matches!(s, Stmt::LocalVar(_) | Stmt::LocalClass(_))),
        single,
        content,
        comments: Anchored::default(),
    }
}

/// Renders a switch statement placed at an offset indented by `indent`.
struct SwitchWriter<'r> {
    nl: &'static str,
    indent: String,
    case_indent: String,
    body_indent: String,
    arrows: bool,
    multi_labels: bool,
    rewrite: &'r Rewrite<'r>,
}

impl<'r> SwitchWriter<'r> {
    fn new(ctx: &AssistContext<'_>, rewrite: &'r Rewrite<'r>, offset: usize) -> Self {
        let indent = rewrite.indent_at(offset).to_string();
        let case_indent = format!("{indent}{}", rewrite.indent_unit());
        let body_indent = format!("{case_indent}{}", rewrite.indent_unit());
        let multi_labels = ctx.level.is_enabled(JavaFeature::ArrowCaseLabels);
        Self {
            nl: rewrite.newline(),
            indent,
            case_indent,
            body_indent,
            arrows: multi_labels && ctx.config.assist.prefer_arrow_switch,
            multi_labels,
            rewrite,
        }
    }

    fn body(&self, stmt: &Stmt) -> CaseBody {
        case_body(self.rewrite, stmt, &self.body_indent)
    }

    fn render(&self, selector: &str, cases: &[(Vec<String>, CaseBody)], default: Option<CaseBody>) -> String {
        let (nl, ci) = (self.nl, &self.case_indent);
        let mut out = format!("switch ({selector}) {{");
        for (labels, body) in cases {
            self.comments_before(&mut out, body);
            if self.multi_labels {
                out.push_str(&format!("{nl}{ci}case {}", labels.join(", ")));
            } else {
                for (i, label) in labels.iter().enumerate() {
                    if i > 0 {
                        out.push_str(&format!(":{nl}{ci}"));
                    } else {
                        out.push_str(&format!("{nl}{ci}"));
                    }
                    out.push_str(&format!("case {label}"));
                }
            }
            self.group(&mut out, body);
        }
        if let Some(body) = default {
            self.comments_before(&mut out, &body);
            out.push_str(&format!("{nl}{ci}default"));
            self.group(&mut out, &body);
        }
        out.push_str(&format!("{nl}{}}}", self.indent));
        out
    }

    fn comments_before(&self, out: &mut String, body: &CaseBody) {
        for comment in &body.comments.before {
            out.push_str(&format!("{}{}{comment}", self.nl, self.case_indent));
        }
    }

    /// Everything after a group's labels.
    fn group(&self, out: &mut String, body: &CaseBody) {
        let (nl, ci, bi) = (self.nl, &self.case_indent, &self.body_indent);
        let content = body.text(nl, bi);
        if self.arrows {
            match (&body.single, &content) {
                (Some(single), _) => out.push_str(&format!(" -> {single}")),
                (None, Some(content)) => out.push_str(&format!(" -> {{{nl}{bi}{content}{nl}{ci}}}")),
                (None, None) => out.push_str(&format!(" -> {{{nl}{ci}}}")),
            }
            return;
        }
        out.push(':');
        if body.declares {
            out.push_str(" {");
        }
        if let Some(content) = &content {
            out.push_str(&format!("{nl}{bi}{content}"));
        }
        if !body.exits {
            out.push_str(&format!("{nl}{bi}break;"));
        }
        if body.declares {
            out.push_str(&format!("{nl}{ci}}}"));
        }
    }
}

fn convert_chain<'a>(
    id: &'static str,
    ctx: &AssistContext<'a>,
    root: &'a IfStmt,
) -> Result<Option<ProposalSpec<'a>>, Declined> {
    let mut conditions = Vec::new();
    let mut bodies: Vec<&Stmt> = Vec::new();
    let mut else_body = None;
    let mut current = root;
    loop {
        conditions.push(&current.condition);
        bodies.push(&current.then_branch);
        match current.else_branch.as_deref() {
            Some(Stmt::If(next)) => current = next,
            Some(other) => {
                else_body = Some(other);
                break;
            }
            None => break,
        }
    }
    if conditions.len() < 2 {
        return Ok(None);
    }
    let Some(comparison) = compare(ctx, &conditions)? else {
        return Ok(None);
    };
    if bodies
        .iter()
        .copied()
        .chain(else_body)
        .any(|b| has_unlabelled_break(NodeRef::Stmt(b)))
    {
        return Err(Declined("a branch breaks out of an enclosing statement"));
    }

    let rewrite = ctx.rewrite();
    let writer = SwitchWriter::new(ctx, &rewrite, root.range.start_offset());
    let branches: Vec<&Stmt> = bodies.iter().copied().chain(else_body).collect();
    let kept = deduplicate(comparison.values);
    let mut indices: Vec<usize> = kept.iter().map(|(i, _)| *i).collect();
    indices.extend(else_body.map(|_| bodies.len()));
    let anchored = anchor_comments(ctx, &writer, root.range, &branches);
    let mut comments = keep_comments(anchored, &indices).into_iter();
    let mut cases: Vec<(Vec<String>, CaseBody)> = Vec::with_capacity(kept.len());
    for (i, labels) in kept {
        let body = writer.body(bodies[i]).with_comments(comments.next().unwrap_or_default());
        cases.push((labels, body));
    }
    let default = else_body.map(|b| writer.body(b).with_comments(comments.next().unwrap_or_default()));
    let selector = ctx.tree.slice(comparison.discriminant.range);
    let text = writer.render(selector, &cases, default);
    tracing::debug!(target: "quill.assist", kind = ?comparison.kind, cases = cases.len(), "if chain converts to switch");

    let mut edit = ctx.rewrite();
    edit.replace(root.range, text);
    Ok(Some(ProposalSpec::new(id, root.range, "Convert to 'switch'", RELEVANCE, edit)))
}

/// `if (x == A) return a; if (x == B) return b; return c;` at the end of a method body.
fn convert_suite<'a>(id: &'static str, ctx: &AssistContext<'a>) -> Result<Option<ProposalSpec<'a>>, Declined> {
    let Some(body) = ctx.enclosing_method().and_then(|m| m.body.as_ref()) else {
        return Ok(None);
    };
    let stmts = &body.stmts;
    let Some((last, guarded)) = stmts.split_last() else {
        return Ok(None);
    };
    if !matches!(last, Stmt::Return(_) | Stmt::Throw(_)) {
        return Ok(None);
    }
    let returning_if = |s: &Stmt| match s {
        Stmt::If(stmt) if stmt.else_branch.is_none() => {
            matches!(branch_statements(&stmt.then_branch), [Stmt::Return(_) | Stmt::Throw(_)])
        }
        _ => false,
    };
    let start = guarded
        .iter()
        .rposition(|s| !returning_if(s))
        .map_or(0, |p| p + 1);
    let run = &guarded[start..];
    if run.len() < 2 {
        return Ok(None);
    }
    let range = run[0].range().cover(last.range());
    if !range.contains_range(ctx.selection) {
        return Ok(None);
    }

    let ifs: Vec<&IfStmt> = run
        .iter()
        .filter_map(|s| match s {
            Stmt::If(stmt) => Some(stmt),
            _ => None,
        })
        .collect();
    let conditions: Vec<&Expr> = ifs.iter().map(|s| &s.condition).collect();
    let Some(comparison) = compare(ctx, &conditions)? else {
        return Ok(None);
    };

    let rewrite = ctx.rewrite();
    let writer = SwitchWriter::new(ctx, &rewrite, range.start_offset());
    let branches: Vec<&Stmt> = ifs.iter().map(|s| &*s.then_branch).chain([last]).collect();
    let kept = deduplicate(comparison.values);
    let mut indices: Vec<usize> = kept.iter().map(|(i, _)| *i).collect();
    indices.push(ifs.len());
    let anchored = anchor_comments(ctx, &writer, range, &branches);
    let mut comments = keep_comments(anchored, &indices).into_iter();
    let mut cases: Vec<(Vec<String>, CaseBody)> = Vec::with_capacity(kept.len());
    for (i, labels) in kept {
        let body = writer.body(&ifs[i].then_branch).with_comments(comments.next().unwrap_or_default());
        cases.push((labels, body));
    }
    let default = writer.body(last).with_comments(comments.next().unwrap_or_default());
    let selector = ctx.tree.slice(comparison.discriminant.range);
    let text = writer.render(selector, &cases, Some(default));

    let mut edit = ctx.rewrite();
    edit.replace(range, text);
    Ok(Some(ProposalSpec::new(
        id,
        range,
        "Convert 'if' statements to 'switch'",
        RELEVANCE,
        edit,
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn later_duplicates_are_dropped() {
        let values = vec![
            vec!["1".to_string()],
            vec!["1".to_string(), "2".to_string()],
            vec!["2".to_string()],
            vec!["3".to_string()],
        ];
        let kept = deduplicate(values);
        assert_eq!(
            kept,
            vec![
                (0, vec!["1".to_string()]),
                (1, vec!["2".to_string()]),
                (3, vec!["3".to_string()]),
            ]
        );
    }

    #[test]
    fn comments_of_dropped_branches_move_on() {
        let anchored = |before: &str, after: &str| Anchored {
            before: vec![before.to_string()],
            after: vec![after.to_string()],
        };
        let kept = keep_comments(
            vec![anchored("// a", "// a done"), anchored("// b", "// b done"), anchored("// c", "// c done")],
            &[0, 2],
        );
        assert_eq!(
            kept,
            vec![
                anchored("// a", "// a done"),
                Anchored {
                    before: vec!["// b".to_string(), "// b done".to_string(), "// c".to_string()],
                    after: vec!["// c done".to_string()],
                },
            ]
        );
    }
}
