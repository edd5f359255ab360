//! Pull an expression out of a resource initializer: into a resource of its own when it is
//! closeable, otherwise into a local declared before the `try`.

use quill_core::TextRangeExt;
use quill_syntax::ast::{Expr, ExprKind, ResourceKind, TryStmt};
use quill_syntax::walk::{self, NodeRef};
use quill_syntax::JavaFeature;

use super::{fresh_name, variable_name_for, Declined, Detector};
use crate::context::AssistContext;
use crate::proposal::ProposalSpec;

pub(super) struct Resources;

const RELEVANCE: i32 = 5;

impl Detector for Resources {
    fn id(&self) -> &'static str {
        "resources"
    }

    fn applies(&self, ctx: &AssistContext<'_>) -> bool {
        ctx.level.is_enabled(JavaFeature::TryWithResources) && ctx.enclosing_resource().is_some()
    }

    fn detect<'a>(&self, ctx: &AssistContext<'a>, out: &mut Vec<ProposalSpec<'a>>) -> Result<(), Declined> {
        let Some((stmt, resource)) = ctx.enclosing_resource() else {
            return Ok(());
        };
        let ResourceKind::Decl { init, .. } = &resource.kind else {
            return Ok(());
        };
        let Some(expr) = selected_expression(ctx, init) else {
            return Ok(());
        };

        let ty = ctx.sema.type_of(expr);
        let Some(type_text) = ty.text() else {
            return Err(Declined("the extracted expression has no known type"));
        };
        let taken = ctx.sema.names_in_scope(stmt.range.start_offset());
        let name = fresh_name(&variable_name_for(type_text), &taken);
        let expr_text = ctx.tree.slice(expr.range);

        let mut rewrite = ctx.rewrite();
        if ctx.sema.is_closeable(&ty) {
            rewrite.insert_before(resource.range, format!("{type_text} {name} = {expr_text}; "));
            rewrite.replace(expr.range, name);
            out.push(ProposalSpec::new(
                self.id(),
                expr.range,
                "Extract to resource",
                RELEVANCE,
                rewrite,
            ));
        } else {
            if references_resources(stmt, expr) {
                return Err(Declined("the expression uses a resource of the same try"));
            }
            let nl = rewrite.newline();
            let indent = rewrite.indent_at(stmt.range.start_offset());
            rewrite.insert_before(
                stmt.range,
                format!("{type_text} {name} = {expr_text};{nl}{indent}"),
            );
            rewrite.replace(expr.range, name);
            out.push(ProposalSpec::new(
                self.id(),
                expr.range,
                "Extract to local variable",
                RELEVANCE,
                rewrite,
            ));
        }
        Ok(())
    }
}

/// The innermost selected expression worth extracting: strictly inside `init`, and neither a
/// plain name nor a literal.
fn selected_expression<'a>(ctx: &AssistContext<'a>, init: &'a Expr) -> Option<&'a Expr> {
    ctx.innermost(|n| match n {
        NodeRef::Expr(expr)
            if expr.range != init.range
                && init.range.contains_range(expr.range)
                && expr.range.contains_range(ctx.selection)
                && !matches!(expr.kind, ExprKind::Name(_) | ExprKind::Literal(_) | ExprKind::This) =>
        {
            Some(expr)
        }
        _ => None,
    })
}

fn references_resources(stmt: &TryStmt, expr: &Expr) -> bool {
    let names: Vec<&str> = stmt
        .resources
        .iter()
        .flat_map(|spec| spec.resources.iter())
        .filter_map(|r| match &r.kind {
            ResourceKind::Decl { name, .. } => Some(name.name.as_str()),
            ResourceKind::Expr(_) => None,
        })
        .collect();
    let mut found = false;
    walk::walk(NodeRef::Expr(expr), &mut |n| {
        if let NodeRef::Expr(Expr {
            kind: ExprKind::Name(name),
            ..
        }) = n
        {
            found |= names.contains(&name.as_str());
        }
        !found
    });
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill_syntax::parse;

    #[test]
    fn resource_names_are_found_in_expressions() {
        let source = "class A { void m() { try (Reader r = open(); Reader s = wrap(r.size())) {} } }";
        let tree = parse(source);
        let mut stmt = None;
        walk::walk(tree.root(), &mut |n| {
            if let NodeRef::Stmt(quill_syntax::ast::Stmt::Try(t)) = n {
                stmt = Some(t);
            }
            true
        });
        let stmt = stmt.unwrap();
        let spec = stmt.resources.as_ref().unwrap();
        let ResourceKind::Decl { init, .. } = &spec.resources[1].kind else {
            panic!("expected a declared resource");
        };
        let ResourceKind::Decl { init: first, .. } = &spec.resources[0].kind else {
            panic!("expected a declared resource");
        };
        assert!(references_resources(stmt, init));
        assert!(!references_resources(stmt, first));
    }
}
