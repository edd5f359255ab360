//! Fixes for unhandled checked exceptions and for catch clauses that catch nothing.

use quill_core::{Diagnostic, ProblemCode, TextRange, TextRangeExt};
use quill_syntax::ast::{simple_name, CatchClause, ExprKind, MethodDecl, Stmt, TryStmt, TypeRefKind};
use quill_syntax::walk::{self, NodeRef};
use quill_syntax::JavaType;

use super::{fresh_name, Attempts, Declined, Detector};
use crate::context::AssistContext;
use crate::proposal::ProposalSpec;
use crate::rewrite::{ListAnchor, ListChild, ListRewrite, ListStyle};

pub(super) struct Exceptions;

const ADD_THROWS: i32 = 8;
const SURROUND: i32 = 7;
const ADD_CATCH: i32 = 6;
const REMOVE: i32 = 8;

impl Detector for Exceptions {
    fn id(&self) -> &'static str {
        "exceptions"
    }

    fn applies(&self, ctx: &AssistContext<'_>) -> bool {
        ctx.diagnostics.iter().any(|d| {
            matches!(
                d.code,
                ProblemCode::UnhandledException | ProblemCode::UnneededCatch
            )
        })
    }

    fn detect<'a>(&self, ctx: &AssistContext<'a>, out: &mut Vec<ProposalSpec<'a>>) -> Result<(), Declined> {
        let mut attempts = Attempts::default();
        for diagnostic in ctx.diagnostics.iter().copied() {
            let result = match diagnostic.code {
                ProblemCode::UnhandledException => unhandled(self.id(), ctx, diagnostic, out),
                ProblemCode::UnneededCatch => unneeded(self.id(), ctx, diagnostic, out),
                _ => Ok(()),
            };
            attempts.record(self.id(), result);
        }
        attempts.finish(!out.is_empty())
    }
}

fn exception_argument(diagnostic: &Diagnostic) -> Result<&str, Declined> {
    diagnostic
        .argument(0)
        .filter(|arg| !arg.is_empty())
        .ok_or(Declined("diagnostic names no exception type"))
}

fn unhandled<'a>(
    id: &'static str,
    ctx: &AssistContext<'a>,
    diagnostic: &Diagnostic,
    out: &mut Vec<ProposalSpec<'a>>,
) -> Result<(), Declined> {
    let exception = exception_argument(diagnostic)?;
    let path = ctx.path_to(diagnostic.range);

    if let Some(method) = throwing_method(&path) {
        add_throws(id, ctx, method, exception, out);
    }

    let Some((stmt_index, stmt)) = enclosing_list_statement(&path) else {
        return Ok(());
    };
    surround(id, ctx, &path, stmt_index, stmt, diagnostic, out);

    if let Some(try_stmt) = surrounding_try(&path, stmt_index) {
        add_catch_clause(id, ctx, try_stmt, exception, out);
        add_to_existing_catch(id, ctx, try_stmt, exception, out);
    }
    Ok(())
}

/// The method whose `throws` clause covers the diagnostic: lambdas, initializers and field
/// initializers in between cannot propagate checked exceptions.
fn throwing_method<'a>(path: &[NodeRef<'a>]) -> Option<&'a MethodDecl> {
    path.iter()
        .rev()
        .find_map(|node| match *node {
            NodeRef::Method(method) => Some(Some(method)),
            NodeRef::Expr(expr) if matches!(expr.kind, ExprKind::Lambda { .. }) => Some(None),
            NodeRef::Initializer(_) | NodeRef::Field(_) | NodeRef::Type(_) => Some(None),
            _ => None,
        })
        .flatten()
}

fn add_throws<'a>(
    id: &'static str,
    ctx: &AssistContext<'a>,
    method: &MethodDecl,
    exception: &str,
    out: &mut Vec<ProposalSpec<'a>>,
) {
    let name = simple_name(exception);
    let declared = method
        .throws
        .iter()
        .filter_map(|t| t.simple_name())
        .any(|t| ctx.sema.is_subtype(name, t));
    if declared {
        return;
    }
    let mut rewrite = ctx.rewrite();
    if method.throws.is_empty() {
        rewrite.insert_after(method.params_range, format!(" throws {exception}"));
    } else {
        let children = method
            .throws
            .iter()
            .map(|t| ListChild::node(ctx.tree, t.range))
            .collect();
        let mut list = ListRewrite::new(
            ctx.tree,
            ListStyle::Separated {
                separator: ", ".to_string(),
            },
            children,
            ListAnchor::After(method.params_range.end_offset()),
        );
        list.push(exception);
        rewrite.list(list);
    }
    out.push(ProposalSpec::new(
        id,
        method.name.range,
        "Add throws declaration",
        ADD_THROWS,
        rewrite,
    ));
}

/// Innermost statement of a statement list on the path, with its index in the path. Lambda
/// and class boundaries stop the search.
fn enclosing_list_statement<'a>(path: &[NodeRef<'a>]) -> Option<(usize, &'a Stmt)> {
    for (i, node) in path.iter().enumerate().rev() {
        match *node {
            NodeRef::Stmt(stmt) => {
                let in_list = matches!(
                    i.checked_sub(1).map(|p| path[p]),
                    Some(NodeRef::Block(_) | NodeRef::SwitchGroup(_) | NodeRef::Stmt(Stmt::Block(_)))
                );
                if in_list {
                    return Some((i, stmt));
                }
            }
            NodeRef::Expr(expr) if matches!(expr.kind, ExprKind::Lambda { .. }) => return None,
            NodeRef::Type(_) | NodeRef::Method(_) | NodeRef::Initializer(_) => return None,
            _ => {}
        }
    }
    None
}

/// Statements following `stmt` in its list.
fn later_statements<'a>(path: &[NodeRef<'a>], stmt_index: usize) -> &'a [Stmt] {
    let siblings: &'a [Stmt] = match stmt_index.checked_sub(1).map(|p| path[p]) {
        Some(NodeRef::Block(block)) => &block.stmts,
        Some(NodeRef::Stmt(Stmt::Block(block))) => &block.stmts,
        Some(NodeRef::SwitchGroup(group)) => group.statements(),
        _ => &[],
    };
    let Some(NodeRef::Stmt(stmt)) = path.get(stmt_index).copied() else {
        return &[];
    };
    match siblings.iter().position(|s| std::ptr::eq(s, stmt)) {
        Some(pos) => &siblings[pos + 1..],
        None => &[],
    }
}

fn mentions(stmts: &[Stmt], name: &str) -> bool {
    let mut found = false;
    for stmt in stmts {
        walk::walk(NodeRef::Stmt(stmt), &mut |node| {
            if let NodeRef::Expr(expr) = node {
                if matches!(&expr.kind, ExprKind::Name(n) if n == name) {
                    found = true;
                }
            }
            !found
        });
    }
    found
}

/// Exception types reported inside `range`, in order of first report.
fn reported_in(ctx: &AssistContext<'_>, range: TextRange, requested: &Diagnostic) -> Vec<String> {
    let mut reports: Vec<&Diagnostic> = ctx
        .all_diagnostics
        .iter()
        .filter(|d| d.code == ProblemCode::UnhandledException && range.contains_range(d.range))
        .collect();
    if !reports.iter().any(|d| *d == requested) {
        reports.push(requested);
    }
    reports.sort_by_key(|d| d.range.start_offset());
    let mut names: Vec<String> = Vec::new();
    for arg in reports.iter().filter_map(|d| d.argument(0)) {
        if !names.iter().any(|n| simple_name(n) == simple_name(arg)) {
            names.push(arg.to_string());
        }
    }
    names
}

fn surround<'a>(
    id: &'static str,
    ctx: &AssistContext<'a>,
    path: &[NodeRef<'a>],
    stmt_index: usize,
    stmt: &'a Stmt,
    diagnostic: &Diagnostic,
    out: &mut Vec<ProposalSpec<'a>>,
) {
    let range = stmt.range();
    let types = reported_in(ctx, range, diagnostic);
    let rewrite = ctx.rewrite();
    let nl = rewrite.newline();
    let indent = rewrite.indent_at(range.start_offset()).to_string();
    let inner = rewrite.nested_indent(range.start_offset());
    let var = fresh_name("e", &ctx.sema.names_in_scope(range.start_offset()));

    // A declaration whose variable outlives the statement is split around the `try`.
    let (prefix, body) = match stmt {
        Stmt::LocalVar(decl) => {
            let later = later_statements(path, stmt_index);
            let escaping = decl
                .declarators
                .iter()
                .any(|d| mentions(later, &d.name.name));
            if escaping {
                let [declarator] = decl.declarators.as_slice() else {
                    tracing::debug!(target: "quill.assist", "several declarators escape the statement");
                    return;
                };
                let Some(init) = declarator.init.as_ref().filter(|_| declarator.dims == 0) else {
                    return;
                };
                let ty = match decl.ty.kind {
                    TypeRefKind::Var => ctx.sema.type_of(init),
                    _ => JavaType::from_type_ref(&decl.ty, ctx.source()),
                };
                let Some(type_text) = ty.text() else {
                    tracing::debug!(target: "quill.assist", "cannot spell the type of a split declaration");
                    return;
                };
                let name = &declarator.name.name;
                (
                    format!("{type_text} {name} = {};{nl}{indent}", ty.default_value()),
                    format!("{name} = {};", rewrite.text_reindented(init.range, &inner)),
                )
            } else {
                (String::new(), rewrite.text_reindented(range, &inner))
            }
        }
        _ => (String::new(), rewrite.text_reindented(range, &inner)),
    };

    let render = |catches: &[String]| {
        let mut text = format!("{prefix}try {{{nl}{inner}{body}{nl}{indent}}}");
        for caught in catches {
            text.push_str(&format!(" catch ({caught} {var}) {{{nl}{indent}}}"));
        }
        text
    };

    let mut single = ctx.rewrite();
    single.replace(range, render(&types));
    out.push(ProposalSpec::new(id, range, "Surround with try/catch", SURROUND, single));

    let unrelated = types.iter().enumerate().all(|(i, a)| {
        types[i + 1..]
            .iter()
            .all(|b| !ctx.sema.are_related(simple_name(a), simple_name(b)))
    });
    if types.len() >= 2 && ctx.level.supports_multi_catch() && unrelated {
        let mut multi = ctx.rewrite();
        multi.replace(range, render(&[types.join(" | ")]));
        out.push(ProposalSpec::new(
            id,
            range,
            "Surround with try/multi-catch",
            SURROUND,
            multi,
        ));
    }
}

/// The `try` whose block holds the statement at `stmt_index`.
fn surrounding_try<'a>(path: &[NodeRef<'a>], stmt_index: usize) -> Option<&'a TryStmt> {
    for (i, node) in path[..stmt_index].iter().enumerate().rev() {
        match *node {
            NodeRef::Stmt(Stmt::Try(try_stmt)) => {
                let in_body = matches!(path.get(i + 1), Some(NodeRef::Block(block)) if std::ptr::eq(*block, &try_stmt.body));
                return in_body.then_some(try_stmt);
            }
            NodeRef::Expr(expr) if matches!(expr.kind, ExprKind::Lambda { .. }) => return None,
            NodeRef::Type(_) | NodeRef::Method(_) | NodeRef::Initializer(_) => return None,
            NodeRef::Catch(_) | NodeRef::Finally(_) | NodeRef::Resource(_) => return None,
            _ => {}
        }
    }
    None
}

fn add_catch_clause<'a>(
    id: &'static str,
    ctx: &AssistContext<'a>,
    try_stmt: &TryStmt,
    exception: &str,
    out: &mut Vec<ProposalSpec<'a>>,
) {
    let mut rewrite = ctx.rewrite();
    let nl = rewrite.newline();
    let indent = rewrite.indent_at(try_stmt.range.start_offset());
    let visible = ctx
        .sema
        .visible_declarations(try_stmt.range.start_offset())
        .into_iter()
        .map(|d| d.name.to_string())
        .collect();
    let var = fresh_name("e", &visible);
    let clause = format!("catch ({exception} {var}) {{{nl}{indent}}}");

    if !try_stmt.catches.is_empty() {
        let children = try_stmt
            .catches
            .iter()
            .map(|c| ListChild::node(ctx.tree, c.range))
            .collect();
        let mut list = ListRewrite::new(
            ctx.tree,
            ListStyle::Inline,
            children,
            ListAnchor::After(try_stmt.body.range.end_offset()),
        );
        list.push(clause);
        rewrite.list(list);
    } else if let Some(finally) = &try_stmt.finally {
        rewrite.insert_before(finally.range, format!("{clause} "));
    } else {
        rewrite.insert_after(try_stmt.body.range, format!(" {clause}"));
    }
    out.push(ProposalSpec::new(
        id,
        try_stmt.range,
        "Add catch clause to surrounding try",
        ADD_CATCH,
        rewrite,
    ));
}

fn add_to_existing_catch<'a>(
    id: &'static str,
    ctx: &AssistContext<'a>,
    try_stmt: &TryStmt,
    exception: &str,
    out: &mut Vec<ProposalSpec<'a>>,
) {
    if !ctx.level.supports_multi_catch() {
        return;
    }
    let name = simple_name(exception);
    let eligible = |clause: &&CatchClause| {
        clause
            .param
            .types
            .iter()
            .filter_map(|t| t.simple_name())
            .all(|t| !ctx.sema.are_related(t, name))
    };
    let Some(clause) = try_stmt.catches.iter().rev().find(eligible) else {
        return;
    };
    let children = clause
        .param
        .types
        .iter()
        .map(|t| ListChild::node(ctx.tree, t.range))
        .collect();
    let mut list = ListRewrite::new(
        ctx.tree,
        ListStyle::Separated {
            separator: " | ".to_string(),
        },
        children,
        ListAnchor::After(clause.param.range.start_offset()),
    );
    list.push(exception);
    let mut rewrite = ctx.rewrite();
    rewrite.list(list);
    out.push(ProposalSpec::new(
        id,
        clause.range,
        "Add exception to existing catch clause",
        ADD_CATCH,
        rewrite,
    ));
}

fn unneeded<'a>(
    id: &'static str,
    ctx: &AssistContext<'a>,
    diagnostic: &Diagnostic,
    out: &mut Vec<ProposalSpec<'a>>,
) -> Result<(), Declined> {
    let path = ctx.path_to(diagnostic.range);
    let Some((try_stmt, clause_index)) = path.iter().enumerate().rev().find_map(|(i, node)| {
        match (*node, i.checked_sub(1).map(|p| path[p])) {
            (NodeRef::Catch(clause), Some(NodeRef::Stmt(Stmt::Try(try_stmt)))) => try_stmt
                .catches
                .iter()
                .position(|c| std::ptr::eq(c, clause))
                .map(|index| (try_stmt, index)),
            _ => None,
        }
    }) else {
        return Ok(());
    };
    let clause = &try_stmt.catches[clause_index];
    let Some(type_index) = clause
        .param
        .types
        .iter()
        .position(|t| t.range.contains_range(diagnostic.range) || diagnostic.range.contains_range(t.range))
    else {
        return Err(Declined("diagnostic does not point at a caught type"));
    };

    let mut rewrite = ctx.rewrite();
    let label;
    if clause.param.is_union() {
        let children = clause
            .param
            .types
            .iter()
            .map(|t| ListChild::node(ctx.tree, t.range))
            .collect();
        let mut list = ListRewrite::new(
            ctx.tree,
            ListStyle::Separated {
                separator: " | ".to_string(),
            },
            children,
            ListAnchor::After(clause.param.range.start_offset()),
        );
        list.remove(type_index);
        rewrite.list(list);
        label = format!(
            "Remove '{}' from catch clause",
            ctx.tree.slice(clause.param.types[type_index].range)
        );
    } else if try_stmt.catches.len() > 1 || try_stmt.finally.is_some() || try_stmt.resources.is_some() {
        let children = try_stmt
            .catches
            .iter()
            .map(|c| ListChild::node(ctx.tree, c.range))
            .collect();
        let mut list = ListRewrite::new(
            ctx.tree,
            ListStyle::Inline,
            children,
            ListAnchor::After(try_stmt.body.range.end_offset()),
        );
        list.remove(clause_index);
        rewrite.list(list);
        label = "Remove catch clause".to_string();
    } else {
        let indent = rewrite.indent_at(try_stmt.range.start_offset());
        match crate::rewrite::interior(ctx.source(), try_stmt.body.range) {
            Some(content) => {
                let text = rewrite.text_reindented(content, indent);
                rewrite.replace(try_stmt.range, text);
            }
            None => rewrite.remove_node(try_stmt.range),
        }
        label = "Remove surrounding 'try' block".to_string();
    }
    out.push(ProposalSpec::new(id, clause.range, label, REMOVE, rewrite));
    Ok(())
}
