//! Java front end for Quill's assists.
//!
//! - [`parse`]: lossless lexing plus a recursive-descent parse into the typed tree in [`ast`].
//!   Parsing never fails; malformed input is reported through [`SyntaxTree::errors`].
//! - [`walk`]: borrowed [`NodeRef`]s, child enumeration and covering paths (the tree has no
//!   parent pointers).
//! - [`Semantics`]: a light resolver for the type questions assists ask.
//! - [`JavaLanguageLevel`]/[`JavaFeature`]: which constructs a rewrite may produce.

pub mod ast;
pub mod javadoc;
mod language_level;
mod lexer;
mod parser;
pub mod semantics;
mod syntax_kind;
mod trivia;
pub mod walk;

pub use language_level::{FeatureAvailability, JavaFeature, JavaLanguageLevel};
pub use lexer::{lex, Lexer, Token};
pub use parser::ParseError;
pub use semantics::{Declaration, DeclarationKind, JavaType, Semantics, TypeEnvironment};
pub use syntax_kind::SyntaxKind;
pub use trivia::Comment;
pub use walk::{NestingError, NodeRef};

use quill_core::{TextRange, TextRangeExt};

use crate::ast::CompilationUnit;

/// An immutable parsed file: source text, the lossless token stream and the typed tree.
#[derive(Debug, Clone)]
pub struct SyntaxTree {
    text: String,
    tokens: Vec<Token>,
    unit: CompilationUnit,
    errors: Vec<ParseError>,
}

pub fn parse(text: &str) -> SyntaxTree {
    let tokens = lex(text);
    let (unit, errors) = parser::parse_unit(text, &tokens);
    tracing::debug!(
        target: "quill.syntax",
        len = text.len(),
        tokens = tokens.len(),
        errors = errors.len(),
        "parsed compilation unit"
    );
    SyntaxTree {
        text: text.to_string(),
        tokens,
        unit,
        errors,
    }
}

impl SyntaxTree {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn unit(&self) -> &CompilationUnit {
        &self.unit
    }

    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    pub fn root(&self) -> NodeRef<'_> {
        NodeRef::Unit(&self.unit)
    }

    /// Root-to-leaf path of nodes covering `range`.
    pub fn covering_path(&self, range: TextRange) -> Result<Vec<NodeRef<'_>>, NestingError> {
        walk::covering_path(self.root(), range)
    }

    pub fn slice(&self, range: TextRange) -> &str {
        range.slice(&self.text)
    }

    /// Non-trivia tokens lying entirely inside `range`.
    pub fn significant_tokens(&self, range: TextRange) -> impl Iterator<Item = &Token> + '_ {
        let first = trivia::token_index(&self.tokens, range.start_offset());
        self.tokens[first..]
            .iter()
            .take_while(move |t| t.range.end_offset() <= range.end_offset())
            .filter(|t| !t.kind.is_trivia())
    }

    /// Structural key of a range: its significant token texts. Two ranges with equal keys
    /// differ only in whitespace and comments.
    pub fn structural_key(&self, range: TextRange) -> Vec<&str> {
        self.significant_tokens(range)
            .map(|t| t.text(&self.text))
            .collect()
    }

    /// Comments owned by the node starting at `offset` and placed before it.
    pub fn leading_trivia(&self, offset: usize) -> Vec<Comment> {
        trivia::leading_comments(&self.text, &self.tokens, offset)
    }

    /// Comments on the same line after the node ending at `offset`.
    pub fn trailing_trivia(&self, offset: usize) -> Vec<Comment> {
        trivia::trailing_comments(&self.text, &self.tokens, offset)
    }

    /// A node range widened by the comments the node owns.
    pub fn owned_range(&self, range: TextRange) -> TextRange {
        trivia::owned_range(&self.text, &self.tokens, range)
    }

    /// Text to delete when the node at `range` is removed together with its comments.
    pub fn removal_range(&self, range: TextRange) -> TextRange {
        trivia::removal_range(&self.text, &self.tokens, range)
    }

    /// Comments lying inside `range`.
    pub fn comments_in(&self, range: TextRange) -> Vec<Comment> {
        let first = trivia::token_index(&self.tokens, range.start_offset());
        self.tokens[first..]
            .iter()
            .take_while(|t| t.range.end_offset() <= range.end_offset())
            .filter(|t| t.kind.is_comment())
            .map(|t| Comment {
                kind: t.kind,
                range: t.range,
            })
            .collect()
    }

    /// The last significant token ending at or before `offset`.
    pub fn previous_token(&self, offset: usize) -> Option<&Token> {
        let idx = self.tokens.partition_point(|t| t.range.end_offset() <= offset);
        self.tokens[..idx].iter().rev().find(|t| !t.kind.is_trivia())
    }

    /// The first significant token starting at or after `offset`.
    pub fn next_token(&self, offset: usize) -> Option<&Token> {
        let idx = trivia::token_index(&self.tokens, offset);
        self.tokens[idx..].iter().find(|t| !t.kind.is_trivia())
    }
}
