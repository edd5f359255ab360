//! What a request covers: the node path at the selection (or diagnostic) and the enclosing
//! constructs detectors ask for.

use quill_config::QuillConfig;
use quill_core::{Diagnostic, ProblemCode, TextRange, TextRangeExt};
use quill_syntax::ast::{
    CatchClause, Expr, ExprKind, IfStmt, MethodDecl, ModuleDecl, Resource, Stmt, SwitchBody,
    TryStmt, TypeDecl,
};
use quill_syntax::javadoc::DocComment;
use quill_syntax::{JavaLanguageLevel, NodeRef, Semantics, SyntaxTree};

use crate::rewrite::Rewrite;
use crate::AssistError;

/// What the caller asks assists for.
#[derive(Debug, Clone, Copy)]
pub enum AssistRequest<'a> {
    /// A caret (empty range) or a selection.
    Selection(TextRange),
    /// Quick fixes for one reported problem.
    Diagnostic(&'a Diagnostic),
}

impl<'a> AssistRequest<'a> {
    pub fn caret(offset: usize) -> Self {
        AssistRequest::Selection(TextRange::empty_at(offset))
    }

    pub fn range(&self) -> TextRange {
        match self {
            AssistRequest::Selection(range) => *range,
            AssistRequest::Diagnostic(diagnostic) => diagnostic.range,
        }
    }
}

/// A switch statement or switch expression.
#[derive(Debug, Clone, Copy)]
pub struct SwitchSite<'a> {
    pub range: TextRange,
    pub selector: &'a Expr,
    pub body: &'a SwitchBody,
    pub is_statement: bool,
}

/// A declaration that may carry a doc comment.
#[derive(Debug, Clone, Copy)]
pub enum Documented<'a> {
    Type(&'a TypeDecl),
    Method(&'a MethodDecl),
    Module(&'a ModuleDecl),
}

impl<'a> Documented<'a> {
    pub fn range(self) -> TextRange {
        match self {
            Documented::Type(t) => t.range,
            Documented::Method(m) => m.range,
            Documented::Module(m) => m.range,
        }
    }

    pub fn doc(self) -> Option<&'a DocComment> {
        match self {
            Documented::Type(t) => t.doc.as_ref(),
            Documented::Method(m) => m.doc.as_ref(),
            Documented::Module(m) => m.doc.as_ref(),
        }
    }

    fn from_node(node: NodeRef<'a>) -> Option<Self> {
        match node {
            NodeRef::Type(t) => Some(Documented::Type(t)),
            NodeRef::Method(m) => Some(Documented::Method(m)),
            NodeRef::Module(m) => Some(Documented::Module(m)),
            _ => None,
        }
    }
}

pub struct AssistContext<'a> {
    pub tree: &'a SyntaxTree,
    pub sema: &'a Semantics<'a>,
    pub config: &'a QuillConfig,
    pub level: JavaLanguageLevel,
    pub selection: TextRange,
    /// Root-to-leaf path of nodes covering the selection.
    pub path: Vec<NodeRef<'a>>,
    /// The requested diagnostic, or those intersecting the selection.
    pub diagnostics: Vec<&'a Diagnostic>,
    /// Every diagnostic the host reported for the file.
    pub all_diagnostics: &'a [Diagnostic],
}

impl<'a> AssistContext<'a> {
    /// Resolve `request` against the tree. `None` when the request lies outside the text.
    pub fn new(
        tree: &'a SyntaxTree,
        sema: &'a Semantics<'a>,
        config: &'a QuillConfig,
        all_diagnostics: &'a [Diagnostic],
        request: AssistRequest<'a>,
    ) -> Result<Option<Self>, AssistError> {
        let selection = request.range();
        if selection.end_offset() > tree.text().len() {
            return Ok(None);
        }
        let path = tree.covering_path(selection)?;
        let diagnostics = match request {
            AssistRequest::Diagnostic(diagnostic) => vec![diagnostic],
            AssistRequest::Selection(range) => all_diagnostics
                .iter()
                .filter(|d| d.range.intersects(range))
                .collect(),
        };
        Ok(Some(Self {
            tree,
            sema,
            config,
            level: config.language_level(),
            selection,
            path,
            diagnostics,
            all_diagnostics,
        }))
    }

    pub fn source(&self) -> &'a str {
        self.tree.text()
    }

    pub fn rewrite(&self) -> Rewrite<'a> {
        Rewrite::new(self.tree, &self.config.format)
    }

    /// The smallest node covering the selection.
    pub fn covering_node(&self) -> Option<NodeRef<'a>> {
        self.path.last().copied()
    }

    /// The innermost node on the path for which `f` returns something.
    pub fn innermost<T>(&self, f: impl FnMut(NodeRef<'a>) -> Option<T>) -> Option<T> {
        self.path.iter().rev().copied().find_map(f)
    }

    /// Parent of the node at `index` in [`AssistContext::path`].
    pub fn parent(&self, index: usize) -> Option<NodeRef<'a>> {
        index.checked_sub(1).and_then(|i| self.path.get(i).copied())
    }

    pub fn diagnostics_with(&self, code: ProblemCode) -> impl Iterator<Item = &'a Diagnostic> + '_ {
        self.diagnostics
            .iter()
            .copied()
            .filter(move |d| d.code == code)
    }

    pub fn enclosing_try(&self) -> Option<&'a TryStmt> {
        self.innermost(|n| match n {
            NodeRef::Stmt(Stmt::Try(stmt)) => Some(stmt),
            _ => None,
        })
    }

    pub fn enclosing_catch(&self) -> Option<&'a CatchClause> {
        self.innermost(|n| match n {
            NodeRef::Catch(clause) => Some(clause),
            _ => None,
        })
    }

    pub fn enclosing_switch(&self) -> Option<SwitchSite<'a>> {
        self.innermost(|n| match n {
            NodeRef::Stmt(Stmt::Switch(stmt)) => Some(SwitchSite {
                range: stmt.range,
                selector: &stmt.selector,
                body: &stmt.body,
                is_statement: true,
            }),
            NodeRef::Expr(Expr {
                range,
                kind: ExprKind::Switch { selector, body },
            }) => Some(SwitchSite {
                range: *range,
                selector,
                body,
                is_statement: false,
            }),
            _ => None,
        })
    }

    pub fn enclosing_if(&self) -> Option<&'a IfStmt> {
        self.innermost(|n| match n {
            NodeRef::Stmt(Stmt::If(stmt)) => Some(stmt),
            _ => None,
        })
    }

    pub fn enclosing_method(&self) -> Option<&'a MethodDecl> {
        self.innermost(|n| match n {
            NodeRef::Method(method) => Some(method),
            _ => None,
        })
    }

    pub fn enclosing_resource(&self) -> Option<(&'a TryStmt, &'a Resource)> {
        let resource = self.innermost(|n| match n {
            NodeRef::Resource(resource) => Some(resource),
            _ => None,
        })?;
        let owner = self.innermost(|n| match n {
            NodeRef::Stmt(Stmt::Try(stmt))
                if stmt
                    .resources
                    .as_ref()
                    .is_some_and(|spec| spec.range.contains_range(resource.range)) =>
            {
                Some(stmt)
            }
            _ => None,
        })?;
        Some((owner, resource))
    }

    /// The declaration documented by the doc comment holding the selection, else the
    /// innermost type, method or module declaration around it.
    pub fn enclosing_documented(&self) -> Option<Documented<'a>> {
        if let Some(node) = self.covering_node() {
            let documented_child = node
                .children()
                .into_iter()
                .filter_map(Documented::from_node)
                .find(|d| d.doc().is_some_and(|doc| doc.range.contains_range(self.selection)));
            if documented_child.is_some() {
                return documented_child;
            }
        }
        self.innermost(Documented::from_node)
    }

    /// Whether the selection lies inside a doc comment rather than code.
    pub fn in_doc_comment(&self) -> bool {
        self.enclosing_documented()
            .and_then(Documented::doc)
            .is_some_and(|doc| doc.range.contains_range(self.selection))
    }

    /// The node path for another range of the same tree (a diagnostic elsewhere).
    pub fn path_to(&self, range: TextRange) -> Vec<NodeRef<'a>> {
        self.sema.path_at(range)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill_syntax::parse;

    const SOURCE: &str = "class A {\n    /** Doc. */\n    void m() {\n        try {\n            switch (x) {\n                case 1:\n                    if (y) { z(); }\n            }\n        } catch (Exception e) {\n        }\n    }\n}\n";

    #[test]
    fn finds_enclosing_constructs() {
        let tree = parse(SOURCE);
        let sema = Semantics::new(&tree);
        let config = QuillConfig::default();
        let offset = SOURCE.find("z()").unwrap();
        let ctx = AssistContext::new(&tree, &sema, &config, &[], AssistRequest::caret(offset))
            .unwrap()
            .expect("caret inside the text");
        assert!(ctx.enclosing_if().is_some());
        assert!(ctx.enclosing_switch().is_some_and(|s| s.is_statement));
        assert!(ctx.enclosing_try().is_some());
        assert_eq!(ctx.enclosing_method().map(|m| m.name.name.as_str()), Some("m"));
        assert!(ctx.enclosing_catch().is_none());
    }

    #[test]
    fn doc_comment_selects_its_declaration() {
        let tree = parse(SOURCE);
        let sema = Semantics::new(&tree);
        let config = QuillConfig::default();
        let offset = SOURCE.find("Doc.").unwrap();
        let ctx = AssistContext::new(&tree, &sema, &config, &[], AssistRequest::caret(offset))
            .unwrap()
            .expect("caret inside the text");
        assert!(ctx.in_doc_comment());
        assert!(matches!(ctx.enclosing_documented(), Some(Documented::Method(m)) if m.name.name == "m"));
    }

    #[test]
    fn selection_past_the_end_resolves_to_nothing() {
        let tree = parse("class A {}");
        let sema = Semantics::new(&tree);
        let config = QuillConfig::default();
        let request = AssistRequest::Selection(TextRange::from_offsets(0, 100));
        assert!(matches!(AssistContext::new(&tree, &sema, &config, &[], request), Ok(None)));
    }
}
