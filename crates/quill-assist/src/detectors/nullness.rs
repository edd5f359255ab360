//! Conflicting nullness between an overriding method and the method it overrides.
//!
//! Returns may only get stricter in an override, parameters only looser. Each conflict offers
//! the fix on the overriding side first, then the one on the overridden side.

use quill_core::{ProblemCode, TextRangeExt};
use quill_syntax::ast::{MethodDecl, Param, TypeDecl, TypeRefKind};
use quill_syntax::NodeRef;

use super::annotations::{set_nullness, AnnotationSite, Nullness, NullnessNames};
use super::{Declined, Detector};
use crate::context::AssistContext;
use crate::proposal::ProposalSpec;

pub(super) struct NullnessConflicts;

const OVERRIDING: i32 = 9;
const OVERRIDDEN: i32 = 8;

impl Detector for NullnessConflicts {
    fn id(&self) -> &'static str {
        "nullness"
    }

    fn applies(&self, ctx: &AssistContext<'_>) -> bool {
        ctx.enclosing_method().is_some()
    }

    fn detect<'a>(&self, ctx: &AssistContext<'a>, out: &mut Vec<ProposalSpec<'a>>) -> Result<(), Declined> {
        let Some((owner, method)) = method_and_owner(ctx) else {
            return Ok(());
        };
        let on_problem = ctx
            .diagnostics_with(ProblemCode::ReturnNullnessConflict)
            .chain(ctx.diagnostics_with(ProblemCode::ParameterNullnessConflict))
            .next()
            .is_some();
        let in_header = method
            .body
            .as_ref()
            .map_or(true, |body| ctx.selection.end_offset() <= body.range.start_offset());
        if !on_problem && !in_header {
            return Ok(());
        }
        let overridden = ctx.sema.overridden_methods(owner, method);
        let Some(&(_, base)) = overridden.first() else {
            return Ok(());
        };

        let names = NullnessNames::new(&ctx.config.nullness);
        let resolver = Resolver {
            ctx,
            names,
            method_default: names.non_null_by_default(ctx.sema, method),
            base_default: names.non_null_by_default(ctx.sema, base),
        };

        match selected_param(ctx, method) {
            Some(index) => resolver.parameter(self.id(), method, base, index, out),
            None => {
                resolver.return_type(self.id(), method, base, out);
                for index in 0..method.params.len() {
                    resolver.parameter(self.id(), method, base, index, out);
                }
            }
        }
        Ok(())
    }
}

struct Resolver<'a, 'c> {
    ctx: &'c AssistContext<'a>,
    names: NullnessNames<'a>,
    method_default: bool,
    base_default: bool,
}

impl<'a> Resolver<'a, '_> {
    fn return_type(
        &self,
        id: &'static str,
        method: &'a MethodDecl,
        base: &'a MethodDecl,
        out: &mut Vec<ProposalSpec<'a>>,
    ) {
        let (Some(ours), Some(theirs)) = (return_site(method), return_site(base)) else {
            return;
        };
        let conflict = self.names.effective(ours, self.method_default) == Nullness::Nullable
            && self.names.effective(theirs, self.base_default) == Nullness::NonNull;
        if !conflict {
            return;
        }
        let signature = signature(method);
        let non_null = self.names.non_null();
        let nullable = self.names.nullable();

        let mut rewrite = self.ctx.rewrite();
        if set_nullness(&mut rewrite, self.names, ours, Nullness::NonNull, self.method_default) {
            out.push(ProposalSpec::new(
                id,
                method.name.range,
                format!("Change return type of '{signature}' to '@{non_null}'"),
                OVERRIDING,
                rewrite,
            ));
        }
        let mut rewrite = self.ctx.rewrite();
        if set_nullness(&mut rewrite, self.names, theirs, Nullness::Nullable, self.base_default) {
            out.push(ProposalSpec::new(
                id,
                method.name.range,
                format!("Change return type of overridden '{signature}' to '@{nullable}'"),
                OVERRIDDEN,
                rewrite,
            ));
        }
    }

    fn parameter(
        &self,
        id: &'static str,
        method: &'a MethodDecl,
        base: &'a MethodDecl,
        index: usize,
        out: &mut Vec<ProposalSpec<'a>>,
    ) {
        let (Some(ours), Some(theirs)) = (method.params.get(index), base.params.get(index)) else {
            return;
        };
        let conflict = self.names.effective(param_site(ours), self.method_default) == Nullness::NonNull
            && self.names.effective(param_site(theirs), self.base_default) != Nullness::NonNull;
        if !conflict {
            return;
        }
        let name = &ours.name.name;
        let non_null = self.names.non_null();
        let nullable = self.names.nullable();

        let mut rewrite = self.ctx.rewrite();
        if set_nullness(
            &mut rewrite,
            self.names,
            param_site(ours),
            Nullness::Nullable,
            self.method_default,
        ) {
            out.push(ProposalSpec::new(
                id,
                ours.range,
                format!("Change parameter '{name}' to '@{nullable}'"),
                OVERRIDING,
                rewrite,
            ));
        }
        let mut rewrite = self.ctx.rewrite();
        if set_nullness(
            &mut rewrite,
            self.names,
            param_site(theirs),
            Nullness::NonNull,
            self.base_default,
        ) {
            out.push(ProposalSpec::new(
                id,
                ours.range,
                format!("Change parameter '{name}' in overridden method to '@{non_null}'"),
                OVERRIDDEN,
                rewrite,
            ));
        }
    }
}

/// The innermost method around the request and the type declaring it.
fn method_and_owner<'a>(ctx: &AssistContext<'a>) -> Option<(&'a TypeDecl, &'a MethodDecl)> {
    let index = ctx
        .path
        .iter()
        .rposition(|n| matches!(n, NodeRef::Method(_)))?;
    let NodeRef::Method(method) = ctx.path[index] else {
        return None;
    };
    let owner = ctx.path[..index].iter().rev().find_map(|n| match *n {
        NodeRef::Type(t) => Some(t),
        _ => None,
    })?;
    Some((owner, method))
}

fn selected_param(ctx: &AssistContext<'_>, method: &MethodDecl) -> Option<usize> {
    method
        .params
        .iter()
        .position(|p| p.range.contains_range(ctx.selection))
}

fn return_site(method: &MethodDecl) -> Option<AnnotationSite<'_>> {
    let ty = method.return_type.as_ref()?;
    matches!(ty.kind, TypeRefKind::Named { .. } | TypeRefKind::Array { .. }).then_some(AnnotationSite {
        modifiers: &method.modifiers,
        ty,
    })
}

fn param_site(param: &Param) -> AnnotationSite<'_> {
    AnnotationSite {
        modifiers: &param.modifiers,
        ty: &param.ty,
    }
}

/// `name()` or `name(..)` for labels.
fn signature(method: &MethodDecl) -> String {
    if method.params.is_empty() {
        format!("{}()", method.name.name)
    } else {
        format!("{}(..)", method.name.name)
    }
}
