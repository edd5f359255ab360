//! Borrowed node references, child enumeration and covering-path lookup.
//!
//! The tree has no parent pointers; a root-to-node path computed here is the only way to
//! look upwards.

use quill_core::{TextRange, TextRangeExt};
use thiserror::Error;

use crate::ast::*;

#[derive(Debug, Clone, Copy)]
pub enum NodeRef<'a> {
    Unit(&'a CompilationUnit),
    Module(&'a ModuleDecl),
    Directive(&'a ModuleDirective),
    Type(&'a TypeDecl),
    EnumConstant(&'a EnumConstant),
    Field(&'a FieldDecl),
    Method(&'a MethodDecl),
    Initializer(&'a Initializer),
    Param(&'a Param),
    Declarator(&'a VarDeclarator),
    Block(&'a Block),
    Stmt(&'a Stmt),
    SwitchGroup(&'a SwitchGroup),
    SwitchLabel(&'a SwitchLabel),
    Catch(&'a CatchClause),
    Finally(&'a FinallyClause),
    Resource(&'a Resource),
    Expr(&'a Expr),
    TypeRef(&'a TypeRef),
}

/// A child range escaping its parent, or siblings out of order.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("node {child:?} is not nested in its parent {parent:?}")]
pub struct NestingError {
    pub parent: TextRange,
    pub child: TextRange,
}

impl<'a> NodeRef<'a> {
    pub fn range(self) -> TextRange {
        match self {
            NodeRef::Unit(n) => n.range,
            NodeRef::Module(n) => n.range,
            NodeRef::Directive(n) => n.range,
            NodeRef::Type(n) => n.range,
            NodeRef::EnumConstant(n) => n.range,
            NodeRef::Field(n) => n.range,
            NodeRef::Method(n) => n.range,
            NodeRef::Initializer(n) => n.range,
            NodeRef::Param(n) => n.range,
            NodeRef::Declarator(n) => n.range,
            NodeRef::Block(n) => n.range,
            NodeRef::Stmt(n) => n.range(),
            NodeRef::SwitchGroup(n) => n.range,
            NodeRef::SwitchLabel(n) => n.range,
            NodeRef::Catch(n) => n.range,
            NodeRef::Finally(n) => n.range,
            NodeRef::Resource(n) => n.range,
            NodeRef::Expr(n) => n.range,
            NodeRef::TypeRef(n) => n.range,
        }
    }

    /// Identity comparison.
    pub fn ptr_eq(self, other: NodeRef<'a>) -> bool {
        std::mem::discriminant(&self) == std::mem::discriminant(&other) && self.addr() == other.addr()
    }

    fn addr(self) -> *const () {
        match self {
            NodeRef::Unit(n) => n as *const _ as *const (),
            NodeRef::Module(n) => n as *const _ as *const (),
            NodeRef::Directive(n) => n as *const _ as *const (),
            NodeRef::Type(n) => n as *const _ as *const (),
            NodeRef::EnumConstant(n) => n as *const _ as *const (),
            NodeRef::Field(n) => n as *const _ as *const (),
            NodeRef::Method(n) => n as *const _ as *const (),
            NodeRef::Initializer(n) => n as *const _ as *const (),
            NodeRef::Param(n) => n as *const _ as *const (),
            NodeRef::Declarator(n) => n as *const _ as *const (),
            NodeRef::Block(n) => n as *const _ as *const (),
            NodeRef::Stmt(n) => n as *const _ as *const (),
            NodeRef::SwitchGroup(n) => n as *const _ as *const (),
            NodeRef::SwitchLabel(n) => n as *const _ as *const (),
            NodeRef::Catch(n) => n as *const _ as *const (),
            NodeRef::Finally(n) => n as *const _ as *const (),
            NodeRef::Resource(n) => n as *const _ as *const (),
            NodeRef::Expr(n) => n as *const _ as *const (),
            NodeRef::TypeRef(n) => n as *const _ as *const (),
        }
    }

    /// Direct children in source order.
    pub fn children(self) -> Vec<NodeRef<'a>> {
        let mut out = Vec::new();
        match self {
            NodeRef::Unit(unit) => {
                out.extend(unit.module.as_ref().map(NodeRef::Module));
                out.extend(unit.types.iter().map(NodeRef::Type));
                out.sort_by_key(|n| n.range().start_offset());
            }
            NodeRef::Module(module) => out.extend(module.directives.iter().map(NodeRef::Directive)),
            NodeRef::Directive(_) => {}
            NodeRef::Type(decl) => {
                out.extend(decl.record_components.iter().map(NodeRef::Param));
                out.extend(decl.extends.iter().map(NodeRef::TypeRef));
                out.extend(decl.implements.iter().map(NodeRef::TypeRef));
                out.extend(decl.enum_constants.iter().map(NodeRef::EnumConstant));
                push_members(&mut out, &decl.members);
            }
            NodeRef::EnumConstant(constant) => {
                if let Some(args) = &constant.args {
                    out.extend(args.args.iter().map(NodeRef::Expr));
                }
                push_members(&mut out, &constant.body);
            }
            NodeRef::Field(field) => {
                out.push(NodeRef::TypeRef(&field.ty));
                out.extend(field.declarators.iter().map(NodeRef::Declarator));
            }
            NodeRef::Method(method) => {
                out.extend(method.return_type.as_ref().map(NodeRef::TypeRef));
                out.extend(method.params.iter().map(NodeRef::Param));
                out.extend(method.throws.iter().map(NodeRef::TypeRef));
                out.extend(method.body.as_ref().map(NodeRef::Block));
            }
            NodeRef::Initializer(init) => out.push(NodeRef::Block(&init.body)),
            NodeRef::Param(param) => out.push(NodeRef::TypeRef(&param.ty)),
            NodeRef::Declarator(declarator) => out.extend(declarator.init.as_ref().map(NodeRef::Expr)),
            NodeRef::Block(block) => out.extend(block.stmts.iter().map(NodeRef::Stmt)),
            NodeRef::Stmt(stmt) => stmt_children(stmt, &mut out),
            NodeRef::SwitchGroup(group) => {
                out.extend(group.labels.iter().map(NodeRef::SwitchLabel));
                match &group.body {
                    SwitchGroupBody::Statements(stmts) => out.extend(stmts.iter().map(NodeRef::Stmt)),
                    SwitchGroupBody::Arrow(ArrowBody::Expr(stmt)) => out.push(NodeRef::Expr(&stmt.expr)),
                    SwitchGroupBody::Arrow(ArrowBody::Block(block)) => out.push(NodeRef::Block(block)),
                    SwitchGroupBody::Arrow(ArrowBody::Throw(stmt)) => out.push(NodeRef::Expr(&stmt.value)),
                }
            }
            NodeRef::SwitchLabel(label) => {
                if let SwitchLabelKind::Case(values) = &label.kind {
                    out.extend(values.iter().map(NodeRef::Expr));
                }
            }
            NodeRef::Catch(clause) => {
                out.extend(clause.param.types.iter().map(NodeRef::TypeRef));
                out.push(NodeRef::Block(&clause.body));
            }
            NodeRef::Finally(clause) => out.push(NodeRef::Block(&clause.body)),
            NodeRef::Resource(resource) => match &resource.kind {
                ResourceKind::Decl { ty, init, .. } => {
                    out.push(NodeRef::TypeRef(ty));
                    out.push(NodeRef::Expr(init));
                }
                ResourceKind::Expr(expr) => out.push(NodeRef::Expr(expr)),
            },
            NodeRef::Expr(expr) => expr_children(expr, &mut out),
            NodeRef::TypeRef(ty) => match &ty.kind {
                TypeRefKind::Named { args: Some(args), .. } => {
                    out.extend(args.args.iter().map(NodeRef::TypeRef))
                }
                TypeRefKind::Array { element, .. } => out.push(NodeRef::TypeRef(element)),
                TypeRefKind::Wildcard { bound: Some(bound) } => out.push(NodeRef::TypeRef(&bound.ty)),
                _ => {}
            },
        }
        out
    }
}

fn push_members<'a>(out: &mut Vec<NodeRef<'a>>, members: &'a [Member]) {
    out.extend(members.iter().map(|m| match m {
        Member::Field(f) => NodeRef::Field(f),
        Member::Method(m) => NodeRef::Method(m),
        Member::Type(t) => NodeRef::Type(t),
        Member::Initializer(i) => NodeRef::Initializer(i),
    }));
}

fn stmt_children<'a>(stmt: &'a Stmt, out: &mut Vec<NodeRef<'a>>) {
    match stmt {
        Stmt::Block(block) => out.extend(block.stmts.iter().map(NodeRef::Stmt)),
        Stmt::LocalVar(decl) => {
            out.push(NodeRef::TypeRef(&decl.ty));
            out.extend(decl.declarators.iter().map(NodeRef::Declarator));
        }
        Stmt::LocalClass(decl) => out.push(NodeRef::Type(decl)),
        Stmt::Expr(stmt) => out.push(NodeRef::Expr(&stmt.expr)),
        Stmt::If(stmt) => {
            out.push(NodeRef::Expr(&stmt.condition));
            out.push(NodeRef::Stmt(&stmt.then_branch));
            out.extend(stmt.else_branch.as_deref().map(NodeRef::Stmt));
        }
        Stmt::Switch(stmt) => {
            out.push(NodeRef::Expr(&stmt.selector));
            out.extend(stmt.body.groups.iter().map(NodeRef::SwitchGroup));
        }
        Stmt::While(stmt) => {
            out.push(NodeRef::Expr(&stmt.condition));
            out.push(NodeRef::Stmt(&stmt.body));
        }
        Stmt::DoWhile(stmt) => {
            out.push(NodeRef::Stmt(&stmt.body));
            out.push(NodeRef::Expr(&stmt.condition));
        }
        Stmt::For(stmt) => {
            out.extend(stmt.init.iter().map(NodeRef::Stmt));
            out.extend(stmt.condition.as_ref().map(NodeRef::Expr));
            out.extend(stmt.update.iter().map(NodeRef::Expr));
            out.push(NodeRef::Stmt(&stmt.body));
        }
        Stmt::ForEach(stmt) => {
            out.push(NodeRef::TypeRef(&stmt.ty));
            out.push(NodeRef::Expr(&stmt.iterable));
            out.push(NodeRef::Stmt(&stmt.body));
        }
        Stmt::Return(stmt) => out.extend(stmt.value.as_ref().map(NodeRef::Expr)),
        Stmt::Throw(stmt) => out.push(NodeRef::Expr(&stmt.value)),
        Stmt::Yield(stmt) => out.push(NodeRef::Expr(&stmt.value)),
        Stmt::Break(_) | Stmt::Continue(_) | Stmt::Empty(_) => {}
        Stmt::Try(stmt) => {
            if let Some(spec) = &stmt.resources {
                out.extend(spec.resources.iter().map(NodeRef::Resource));
            }
            out.push(NodeRef::Block(&stmt.body));
            out.extend(stmt.catches.iter().map(NodeRef::Catch));
            out.extend(stmt.finally.as_ref().map(NodeRef::Finally));
        }
        Stmt::Labeled(stmt) => out.push(NodeRef::Stmt(&stmt.body)),
        Stmt::Synchronized(stmt) => {
            out.push(NodeRef::Expr(&stmt.lock));
            out.push(NodeRef::Block(&stmt.body));
        }
        Stmt::Assert(stmt) => {
            out.push(NodeRef::Expr(&stmt.condition));
            out.extend(stmt.message.as_ref().map(NodeRef::Expr));
        }
    }
}

fn expr_children<'a>(expr: &'a Expr, out: &mut Vec<NodeRef<'a>>) {
    match &expr.kind {
        ExprKind::Literal(_)
        | ExprKind::Name(_)
        | ExprKind::This
        | ExprKind::Super
        | ExprKind::Error => {}
        ExprKind::FieldAccess { target, .. } => out.push(NodeRef::Expr(target)),
        ExprKind::MethodCall { target, args, .. } => {
            out.extend(target.as_deref().map(NodeRef::Expr));
            out.extend(args.args.iter().map(NodeRef::Expr));
        }
        ExprKind::New { ty, args, body } => {
            out.push(NodeRef::TypeRef(ty));
            out.extend(args.args.iter().map(NodeRef::Expr));
            if let Some((_, members)) = body {
                push_members(out, members);
            }
        }
        ExprKind::NewArray { ty, dims, init } => {
            out.push(NodeRef::TypeRef(ty));
            out.extend(dims.iter().map(NodeRef::Expr));
            out.extend(init.as_deref().map(NodeRef::Expr));
            out.sort_by_key(|n| n.range().start_offset());
        }
        ExprKind::ArrayInit(elements) => out.extend(elements.iter().map(NodeRef::Expr)),
        ExprKind::ArrayAccess { array, index } => {
            out.push(NodeRef::Expr(array));
            out.push(NodeRef::Expr(index));
        }
        ExprKind::Binary { lhs, rhs, .. } | ExprKind::Assign { lhs, rhs, .. } => {
            out.push(NodeRef::Expr(lhs));
            out.push(NodeRef::Expr(rhs));
        }
        ExprKind::Unary { operand, .. } => out.push(NodeRef::Expr(operand)),
        ExprKind::Conditional {
            condition,
            then_expr,
            else_expr,
        } => {
            out.push(NodeRef::Expr(condition));
            out.push(NodeRef::Expr(then_expr));
            out.push(NodeRef::Expr(else_expr));
        }
        ExprKind::Cast { ty, expr } => {
            out.push(NodeRef::TypeRef(ty));
            out.push(NodeRef::Expr(expr));
        }
        ExprKind::InstanceOf { expr, ty, .. } => {
            out.push(NodeRef::Expr(expr));
            out.push(NodeRef::TypeRef(ty));
        }
        ExprKind::Paren(inner) => out.push(NodeRef::Expr(inner)),
        ExprKind::Lambda { body, .. } => match body {
            LambdaBody::Expr(expr) => out.push(NodeRef::Expr(expr)),
            LambdaBody::Block(block) => out.push(NodeRef::Block(block)),
        },
        ExprKind::MethodRef { target, .. } => out.push(NodeRef::Expr(target)),
        ExprKind::ClassLiteral(ty) => out.push(NodeRef::TypeRef(ty)),
        ExprKind::Switch { selector, body } => {
            out.push(NodeRef::Expr(selector));
            out.extend(body.groups.iter().map(NodeRef::SwitchGroup));
        }
    }
}

fn covers(node: TextRange, target: TextRange) -> bool {
    if target.is_empty() {
        node.contains_offset_inclusive(target.start_offset())
    } else {
        node.start_offset() <= target.start_offset() && target.end_offset() <= node.end_offset()
    }
}

/// The root-to-leaf path of nodes covering `target`. A caret (empty range) touching two
/// adjacent siblings selects the one it lies strictly inside, else the first.
///
/// Child ranges along the path are checked for nesting and order.
pub fn covering_path<'a>(root: NodeRef<'a>, target: TextRange) -> Result<Vec<NodeRef<'a>>, NestingError> {
    let mut path = vec![root];
    let mut node = root;
    loop {
        let parent = node.range();
        let children = node.children();
        let mut prev_end = parent.start_offset();
        for child in &children {
            let range = child.range();
            if range.start_offset() < parent.start_offset() || range.end_offset() > parent.end_offset() || range.start_offset() < prev_end {
                return Err(NestingError {
                    parent,
                    child: range,
                });
            }
            prev_end = range.end_offset();
        }

        let mut candidates = children.iter().filter(|c| covers(c.range(), target));
        let Some(first) = candidates.next().copied() else {
            break;
        };
        let next = if target.is_empty() && first.range().end_offset() == target.start_offset() {
            candidates
                .find(|c| c.range().start_offset() == target.start_offset())
                .copied()
                .unwrap_or(first)
        } else {
            first
        };
        path.push(next);
        node = next;
    }
    Ok(path)
}

/// Pre-order traversal; `f` returns whether to descend into the node.
pub fn walk<'a>(node: NodeRef<'a>, f: &mut impl FnMut(NodeRef<'a>) -> bool) {
    if f(node) {
        for child in node.children() {
            walk(child, f);
        }
    }
}

/// Every node below `node` (excluded), pre-order.
pub fn descendants(node: NodeRef<'_>) -> Vec<NodeRef<'_>> {
    let mut out = Vec::new();
    for child in node.children() {
        walk(child, &mut |n| {
            out.push(n);
            true
        });
    }
    out
}
