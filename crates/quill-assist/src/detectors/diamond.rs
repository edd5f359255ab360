//! `new C<A>()` initialising a `C<A>` declaration can use the diamond, and a diamond can be
//! spelled out from the declared type.

use quill_core::TextRangeExt;
use quill_syntax::ast::{Expr, ExprKind, Stmt, TypeArgs, TypeRef, TypeRefKind};
use quill_syntax::{JavaFeature, NodeRef};

use super::annotations::{text_without, NullnessNames};
use super::{Declined, Detector};
use crate::context::AssistContext;
use crate::proposal::ProposalSpec;

pub(super) struct Diamond;

const RELEVANCE: i32 = 6;

impl Detector for Diamond {
    fn id(&self) -> &'static str {
        "diamond"
    }

    fn applies(&self, ctx: &AssistContext<'_>) -> bool {
        ctx.level.is_enabled(JavaFeature::Diamond)
            && ctx.path.iter().any(|n| matches!(n, NodeRef::Declarator(_)))
    }

    fn detect<'a>(&self, ctx: &AssistContext<'a>, out: &mut Vec<ProposalSpec<'a>>) -> Result<(), Declined> {
        let Some(site) = creation_site(ctx) else {
            return Ok(());
        };
        let Some(declared_args) = site.declared.type_args().filter(|args| !args.is_diamond()) else {
            return Ok(());
        };
        if site.args.is_diamond() {
            if !same_parameters(ctx, &site, declared_args) {
                return Err(Declined("the created type does not take the declared arguments"));
            }
            if declared_args.args.iter().any(|arg| matches!(arg.kind, TypeRefKind::Wildcard { .. })) {
                return Err(Declined("wildcard arguments cannot be instantiated"));
            }
            let text = inferred_arguments(ctx, site.expr, declared_args);
            let mut rewrite = ctx.rewrite();
            rewrite.replace(site.args.range, text);
            out.push(ProposalSpec::new(
                self.id(),
                site.expr.range,
                "Insert inferred type arguments",
                RELEVANCE,
                rewrite,
            ));
            return Ok(());
        }

        if site.anonymous && !ctx.level.is_enabled(JavaFeature::DiamondAnonymous) {
            return Ok(());
        }
        if ctx.tree.structural_key(site.args.range) != ctx.tree.structural_key(declared_args.range) {
            return Ok(());
        }
        let mut rewrite = ctx.rewrite();
        rewrite.replace(site.args.range, "<>");
        out.push(ProposalSpec::new(
            self.id(),
            site.expr.range,
            "Remove type arguments",
            RELEVANCE,
            rewrite,
        ));
        Ok(())
    }
}

/// A `new` expression with type arguments that initialises a declared variable.
struct CreationSite<'a> {
    expr: &'a Expr,
    created: &'a TypeRef,
    args: &'a TypeArgs,
    anonymous: bool,
    declared: &'a TypeRef,
}

fn creation_site<'a>(ctx: &AssistContext<'a>) -> Option<CreationSite<'a>> {
    let index = ctx.path.iter().rposition(|n| match n {
        NodeRef::Expr(expr) => matches!(&expr.kind, ExprKind::New { ty, .. } if ty.type_args().is_some()),
        _ => false,
    })?;
    let NodeRef::Expr(expr) = ctx.path[index] else {
        return None;
    };
    let ExprKind::New { ty, body, .. } = &expr.kind else {
        return None;
    };
    let args = ty.type_args()?;

    let NodeRef::Declarator(declarator) = ctx.parent(index)? else {
        return None;
    };
    if declarator.dims > 0 || !declarator.init.as_ref().is_some_and(|init| std::ptr::eq(init, expr)) {
        return None;
    }
    let declared = match ctx.parent(index - 1)? {
        NodeRef::Stmt(Stmt::LocalVar(decl)) => &decl.ty,
        NodeRef::Field(field) => &field.ty,
        _ => return None,
    };
    if matches!(declared.kind, TypeRefKind::Var) {
        return None;
    }
    Some(CreationSite {
        expr,
        created: ty,
        args,
        anonymous: body.is_some(),
        declared,
    })
}

/// Whether the declared arguments carry over to the created type unchanged: same type, or a
/// subtype not declaring a different number of parameters.
fn same_parameters(ctx: &AssistContext<'_>, site: &CreationSite<'_>, declared: &TypeArgs) -> bool {
    let (Some(created), Some(target)) = (site.created.simple_name(), site.declared.simple_name()) else {
        return false;
    };
    if created == target {
        return true;
    }
    ctx.sema.is_subtype(created, target)
        && ctx
            .sema
            .find_type(created)
            .map_or(true, |decl| decl.type_params.len() == declared.args.len())
}

/// `<A, B>` from the declared arguments, without annotations the nullness default implies.
fn inferred_arguments(ctx: &AssistContext<'_>, expr: &Expr, declared: &TypeArgs) -> String {
    let names = NullnessNames::new(&ctx.config.nullness);
    let by_default = match ctx.enclosing_method() {
        Some(method) => names.non_null_by_default(ctx.sema, method),
        None => names.non_null_by_default_at(ctx.sema, expr.range.start_offset()),
    };
    let source = ctx.source();
    let args: Vec<String> = declared
        .args
        .iter()
        .map(|arg| {
            let mut implied = Vec::new();
            if by_default {
                names.implied(arg, &mut implied);
            }
            text_without(source, arg.range, &implied)
        })
        .collect();
    format!("<{}>", args.join(", "))
}
