//! Pattern detectors.
//!
//! Each detector is a pure function of the request context: it inspects the tree around the
//! selection (or the diagnostic it is asked about) and pushes zero or more proposal specs.
//! Registration order is fixed and is the tie breaker when proposals rank equally.

mod annotations;
mod diamond;
mod exceptions;
mod if_to_switch;
mod javadoc;
mod multi_catch;
mod nullness;
mod resources;
mod switch_cases;
mod switch_expression;

use std::collections::HashSet;

use quill_syntax::ast::{Block, ExprKind, Stmt};
use quill_syntax::walk::{self, NodeRef};
use thiserror::Error;

use crate::context::AssistContext;
use crate::proposal::ProposalSpec;
use crate::rewrite::{interior, Rewrite};

/// A detector gave up after its structural preconditions matched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct Declined(pub &'static str);

/// Independent fixes tried by one detector. A fix that declines is logged and the others
/// still run; the detector as a whole declines only when nothing was found.
#[derive(Debug, Default)]
struct Attempts {
    declined: Option<Declined>,
}

impl Attempts {
    fn record(&mut self, detector: &'static str, result: Result<(), Declined>) {
        if let Err(declined) = result {
            tracing::debug!(target: "quill.assist", detector, reason = %declined, "fix declined");
            self.declined.get_or_insert(declined);
        }
    }

    fn finish(self, found: bool) -> Result<(), Declined> {
        match self.declined {
            Some(declined) if !found => Err(declined),
            _ => Ok(()),
        }
    }
}

pub trait Detector: Sync {
    /// Stable id, also the rule name in `assist.rules`.
    fn id(&self) -> &'static str;

    /// Cheap check that the construct the detector needs is around the selection.
    fn applies(&self, ctx: &AssistContext<'_>) -> bool;

    fn detect<'a>(&self, ctx: &AssistContext<'a>, out: &mut Vec<ProposalSpec<'a>>) -> Result<(), Declined>;
}

static REGISTRY: &[&dyn Detector] = &[
    &multi_catch::MultiCatch,
    &exceptions::Exceptions,
    &javadoc::Javadoc,
    &if_to_switch::IfToSwitch,
    &switch_expression::SwitchExpression,
    &switch_cases::SwitchCases,
    &resources::Resources,
    &nullness::NullnessConflicts,
    &diamond::Diamond,
];

/// Every detector, in registration order.
pub fn registry() -> &'static [&'static dyn Detector] {
    REGISTRY
}

const JAVA_KEYWORDS: &[&str] = &[
    "abstract", "assert", "boolean", "break", "byte", "case", "catch", "char", "class", "const",
    "continue", "default", "do", "double", "else", "enum", "extends", "false", "final", "finally",
    "float", "for", "goto", "if", "implements", "import", "instanceof", "int", "interface", "long",
    "native", "new", "null", "package", "private", "protected", "public", "return", "short",
    "static", "strictfp", "super", "switch", "synchronized", "this", "throw", "throws",
    "transient", "true", "try", "void", "volatile", "while",
];

/// `base`, or `base` followed by the smallest number making it unused.
pub(crate) fn fresh_name(base: &str, taken: &HashSet<String>) -> String {
    let usable = |name: &str| !taken.contains(name) && !JAVA_KEYWORDS.contains(&name);
    if usable(base) {
        return base.to_string();
    }
    (1..)
        .map(|n| format!("{base}{n}"))
        .find(|name| usable(name))
        .unwrap_or_else(|| base.to_string())
}

/// The text of a block's statements (comments included), re-indented to `indent`.
pub(crate) fn block_content(rewrite: &Rewrite<'_>, block: &Block, indent: &str) -> Option<String> {
    let range = interior(rewrite.source(), block.range)?;
    Some(rewrite.text_reindented(range, indent))
}

/// Statements making up a branch: a block's statements, or the single statement itself.
pub(crate) fn branch_statements(stmt: &Stmt) -> &[Stmt] {
    match stmt {
        Stmt::Block(block) => &block.stmts,
        other => std::slice::from_ref(other),
    }
}

/// Whether `node` contains a `break` without label that is not captured by a nested loop
/// or switch.
pub(crate) fn has_unlabelled_break(node: NodeRef<'_>) -> bool {
    let mut found = false;
    walk::walk(node, &mut |n| {
        match n {
            NodeRef::Stmt(Stmt::Break(jump)) if jump.label.is_none() => found = true,
            NodeRef::Stmt(
                Stmt::While(_) | Stmt::DoWhile(_) | Stmt::For(_) | Stmt::ForEach(_) | Stmt::Switch(_),
            ) => return false,
            NodeRef::Expr(e) if matches!(e.kind, ExprKind::Lambda { .. } | ExprKind::Switch { .. }) => {
                return false
            }
            NodeRef::Type(_) => return false,
            _ => {}
        }
        !found
    });
    found
}

/// Whether any statement below `node` is a jump the switch-expression conversion cannot keep:
/// `break`, `continue`, `return` or `yield`. Nested lambdas and classes are skipped.
pub(crate) fn has_jump(node: NodeRef<'_>) -> bool {
    let mut found = false;
    walk::walk(node, &mut |n| {
        match n {
            NodeRef::Stmt(Stmt::Break(_) | Stmt::Continue(_) | Stmt::Return(_) | Stmt::Yield(_)) => {
                found = true
            }
            NodeRef::Expr(e) if matches!(e.kind, ExprKind::Lambda { .. }) => return false,
            NodeRef::Type(_) => return false,
            _ => {}
        }
        !found
    });
    found
}

/// Lower camel case variable name for a type (`BufferedReader` -> `bufferedReader`).
pub(crate) fn variable_name_for(type_name: &str) -> String {
    let base = type_name
        .split('<')
        .next()
        .unwrap_or(type_name)
        .rsplit('.')
        .next()
        .unwrap_or(type_name)
        .trim_end_matches("[]");
    let mut chars = base.chars();
    match chars.next() {
        Some(first) => {
            let mut name: String = first.to_lowercase().collect();
            name.push_str(chars.as_str());
            name
        }
        None => "value".to_string(),
    }
}
