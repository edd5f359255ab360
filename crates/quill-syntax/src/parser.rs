//! Recursive-descent parser producing the typed tree in [`crate::ast`].
//!
//! The parser works over significant tokens only; trivia stays in the token stream owned by
//! [`crate::SyntaxTree`]. It never fails: malformed input yields [`ParseError`]s plus
//! placeholder nodes (`ExprKind::Error`), so assists can still run on the rest of the file.

use quill_core::{TextRange, TextRangeExt};
use thiserror::Error;

use crate::ast::*;
use crate::javadoc::DocComment;
use crate::lexer::Token;
use crate::SyntaxKind as K;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} at {range:?}")]
pub struct ParseError {
    pub message: String,
    pub range: TextRange,
}

pub(crate) fn parse_unit(source: &str, tokens: &[Token]) -> (CompilationUnit, Vec<ParseError>) {
    let mut parser = Parser::new(source, tokens);
    let unit = parser.compilation_unit();
    (unit, parser.errors)
}

struct Parser<'a> {
    source: &'a str,
    tokens: Vec<Token>,
    /// Doc comment directly preceding each significant token.
    docs: Vec<Option<TextRange>>,
    pos: usize,
    last_end: usize,
    errors: Vec<ParseError>,
}

impl<'a> Parser<'a> {
    fn new(source: &'a str, all: &[Token]) -> Self {
        let mut tokens = Vec::with_capacity(all.len() / 2);
        let mut docs = Vec::with_capacity(all.len() / 2);
        let mut pending_doc = None;
        for token in all {
            if token.kind == K::DocComment {
                pending_doc = Some(token.range);
            } else if !token.kind.is_trivia() {
                tokens.push(*token);
                docs.push(pending_doc.take());
            }
        }
        Self {
            source,
            tokens,
            docs,
            pos: 0,
            last_end: 0,
            errors: Vec::new(),
        }
    }

    // --- token helpers -------------------------------------------------------------------

    fn nth(&self, n: usize) -> K {
        self.tokens.get(self.pos + n).map_or(K::Eof, |t| t.kind)
    }

    fn peek(&self) -> K {
        self.nth(0)
    }

    fn at(&self, kind: K) -> bool {
        self.peek() == kind
    }

    fn nth_text(&self, n: usize) -> &'a str {
        match self.tokens.get(self.pos + n) {
            Some(token) => token.text(self.source),
            None => "",
        }
    }

    fn at_contextual(&self, keyword: &str) -> bool {
        self.at(K::Ident) && self.nth_text(0) == keyword
    }

    /// Whether token `n` ends exactly where token `n + 1` starts.
    fn adjacent(&self, n: usize) -> bool {
        match (self.tokens.get(self.pos + n), self.tokens.get(self.pos + n + 1)) {
            (Some(a), Some(b)) => a.range.end_offset() == b.range.start_offset(),
            _ => false,
        }
    }

    fn start(&self) -> usize {
        self.tokens
            .get(self.pos)
            .map_or(self.source.len(), |t| t.range.start_offset())
    }

    fn bump(&mut self) -> Token {
        match self.tokens.get(self.pos).copied() {
            Some(token) => {
                self.pos += 1;
                self.last_end = token.range.end_offset();
                token
            }
            None => Token {
                kind: K::Eof,
                range: TextRange::empty_at(self.source.len()),
            },
        }
    }

    fn eat(&mut self, kind: K) -> bool {
        if self.at(kind) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: K, what: &str) -> TextRange {
        if self.at(kind) {
            self.bump().range
        } else {
            self.error(format!("expected {what}"));
            TextRange::empty_at(self.last_end)
        }
    }

    fn error(&mut self, message: impl Into<String>) {
        let range = self
            .tokens
            .get(self.pos)
            .map_or(TextRange::empty_at(self.source.len()), |t| t.range);
        self.errors.push(ParseError {
            message: message.into(),
            range,
        });
    }

    fn range_from(&self, start: usize) -> TextRange {
        TextRange::from_offsets(start, self.last_end.max(start))
    }

    fn doc_here(&self) -> Option<DocComment> {
        self.docs
            .get(self.pos)
            .copied()
            .flatten()
            .map(|range| DocComment::parse(self.source, range))
    }

    /// Run `f` as a lookahead: the parser state is always restored. Returns whether `f`
    /// succeeded without reporting errors.
    fn speculate(&mut self, f: impl FnOnce(&mut Self) -> bool) -> bool {
        let (pos, last_end, errors) = (self.pos, self.last_end, self.errors.len());
        let ok = f(self) && self.errors.len() == errors;
        self.pos = pos;
        self.last_end = last_end;
        self.errors.truncate(errors);
        ok
    }

    fn skip_balanced(&mut self, open: K, close: K) {
        let mut depth = 0usize;
        loop {
            let kind = self.peek();
            if kind == K::Eof {
                self.error(format!("unbalanced {open:?}"));
                return;
            }
            self.bump();
            if kind == open {
                depth += 1;
            } else if kind == close {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return;
                }
            }
        }
    }

    fn matching_paren(&self, open: usize) -> Option<usize> {
        let mut depth = 0usize;
        for (idx, token) in self.tokens.iter().enumerate().skip(open) {
            match token.kind {
                K::LParen => depth += 1,
                K::RParen => {
                    depth = depth.checked_sub(1)?;
                    if depth == 0 {
                        return Some(idx);
                    }
                }
                K::LBrace | K::RBrace | K::Semicolon => return None,
                _ => {}
            }
        }
        None
    }

    fn ident(&mut self) -> Ident {
        if self.at(K::Ident) {
            let token = self.bump();
            Ident {
                name: token.text(self.source).to_string(),
                range: token.range,
            }
        } else {
            self.error("expected identifier");
            Ident {
                name: String::new(),
                range: TextRange::empty_at(self.last_end),
            }
        }
    }

    fn qualified_name(&mut self) -> QualifiedName {
        let start = self.start();
        let mut text = self.ident().name;
        while self.at(K::Dot) && self.nth(1) == K::Ident {
            self.bump();
            text.push('.');
            text.push_str(&self.ident().name);
        }
        QualifiedName {
            text,
            range: self.range_from(start),
        }
    }

    // --- declarations --------------------------------------------------------------------

    fn compilation_unit(&mut self) -> CompilationUnit {
        let mut package = None;
        let mut imports = Vec::new();
        let mut module = None;
        let mut types = Vec::new();

        loop {
            match self.peek() {
                K::Eof => break,
                K::Semicolon => {
                    self.bump();
                }
                K::PackageKw => {
                    let start = self.start();
                    package = Some(self.package_decl(Vec::new(), start));
                }
                K::ImportKw => imports.push(self.import_decl()),
                _ => {
                    let before = self.pos;
                    let doc = self.doc_here();
                    let start = self.start();
                    let modifiers = self.modifiers();
                    if self.at(K::PackageKw) {
                        package = Some(self.package_decl(modifiers.annotations, start));
                    } else if self.at_module_start() {
                        module = Some(self.module_decl(doc, modifiers.annotations, start));
                    } else if self.at_type_decl_start() {
                        types.push(self.type_decl(doc, modifiers, start));
                    } else {
                        self.error("expected a type declaration");
                        if self.pos == before {
                            self.bump();
                        }
                    }
                }
            }
        }

        CompilationUnit {
            range: TextRange::from_offsets(0, self.source.len()),
            package,
            imports,
            module,
            types,
        }
    }

    fn package_decl(&mut self, annotations: Vec<Annotation>, start: usize) -> PackageDecl {
        self.bump();
        let name = self.qualified_name();
        self.expect(K::Semicolon, "`;`");
        PackageDecl {
            range: self.range_from(start),
            annotations,
            name,
        }
    }

    fn import_decl(&mut self) -> ImportDecl {
        let start = self.start();
        self.bump();
        let is_static = self.eat(K::StaticKw);
        let name = self.qualified_name();
        let wildcard = if self.at(K::Dot) && self.nth(1) == K::Star {
            self.bump();
            self.bump();
            true
        } else {
            false
        };
        self.expect(K::Semicolon, "`;`");
        ImportDecl {
            range: self.range_from(start),
            is_static,
            name,
            wildcard,
        }
    }

    fn at_module_start(&self) -> bool {
        (self.at_contextual("module") && self.nth(1) == K::Ident)
            || (self.at_contextual("open")
                && self.nth(1) == K::Ident
                && self.nth_text(1) == "module")
    }

    fn at_type_decl_start(&self) -> bool {
        match self.peek() {
            K::ClassKw | K::InterfaceKw | K::EnumKw => true,
            K::At => self.nth(1) == K::InterfaceKw,
            K::Ident => self.nth_text(0) == "record" && self.nth(1) == K::Ident,
            _ => false,
        }
    }

    fn module_decl(
        &mut self,
        doc: Option<DocComment>,
        annotations: Vec<Annotation>,
        start: usize,
    ) -> ModuleDecl {
        let open = if self.at_contextual("open") {
            self.bump();
            true
        } else {
            false
        };
        self.bump();
        let name = self.qualified_name();
        let body_start = self.start();
        self.expect(K::LBrace, "`{`");

        let mut directives = Vec::new();
        while !self.at(K::RBrace) && !self.at(K::Eof) {
            let directive_start = self.start();
            let kind = match self.nth_text(0) {
                "requires" => {
                    self.bump();
                    let mut is_static = false;
                    let mut is_transitive = false;
                    loop {
                        if self.at(K::StaticKw) {
                            self.bump();
                            is_static = true;
                        } else if self.at_contextual("transitive") && self.nth(1) != K::Semicolon {
                            self.bump();
                            is_transitive = true;
                        } else {
                            break;
                        }
                    }
                    DirectiveKind::Requires {
                        is_static,
                        is_transitive,
                        module: self.qualified_name(),
                    }
                }
                keyword @ ("exports" | "opens") => {
                    let is_exports = keyword == "exports";
                    self.bump();
                    let package = self.qualified_name();
                    let mut to = Vec::new();
                    if self.at_contextual("to") {
                        self.bump();
                        to.push(self.qualified_name());
                        while self.eat(K::Comma) {
                            to.push(self.qualified_name());
                        }
                    }
                    if is_exports {
                        DirectiveKind::Exports { package, to }
                    } else {
                        DirectiveKind::Opens { package, to }
                    }
                }
                "uses" => {
                    self.bump();
                    DirectiveKind::Uses {
                        service: self.qualified_name(),
                    }
                }
                "provides" => {
                    self.bump();
                    let service = self.qualified_name();
                    if self.at_contextual("with") {
                        self.bump();
                    } else {
                        self.error("expected `with`");
                    }
                    let mut implementations = vec![self.qualified_name()];
                    while self.eat(K::Comma) {
                        implementations.push(self.qualified_name());
                    }
                    DirectiveKind::Provides {
                        service,
                        implementations,
                    }
                }
                _ => {
                    self.error("expected a module directive");
                    self.bump();
                    continue;
                }
            };
            self.expect(K::Semicolon, "`;`");
            directives.push(ModuleDirective {
                range: self.range_from(directive_start),
                kind,
            });
        }
        self.expect(K::RBrace, "`}`");

        ModuleDecl {
            range: self.range_from(start),
            doc,
            annotations,
            open,
            name,
            directives,
            body: self.range_from(body_start),
        }
    }

    fn modifiers(&mut self) -> Modifiers {
        let start = self.start();
        let mut modifiers = Modifiers {
            range: TextRange::empty_at(start),
            ..Modifiers::default()
        };
        loop {
            let kind = match self.peek() {
                K::At if self.nth(1) != K::InterfaceKw => {
                    let annotation = self.annotation();
                    modifiers.annotations.push(annotation);
                    continue;
                }
                K::PublicKw => ModifierKind::Public,
                K::ProtectedKw => ModifierKind::Protected,
                K::PrivateKw => ModifierKind::Private,
                K::StaticKw => ModifierKind::Static,
                K::AbstractKw => ModifierKind::Abstract,
                K::FinalKw => ModifierKind::Final,
                K::NativeKw => ModifierKind::Native,
                K::SynchronizedKw if self.nth(1) != K::LParen => ModifierKind::Synchronized,
                K::TransientKw => ModifierKind::Transient,
                K::VolatileKw => ModifierKind::Volatile,
                K::StrictfpKw => ModifierKind::Strictfp,
                K::DefaultKw if !matches!(self.nth(1), K::Colon | K::Arrow) => {
                    ModifierKind::Default
                }
                K::Ident
                    if self.nth_text(0) == "sealed"
                        && (self.nth(1).is_modifier_keyword()
                            || matches!(self.nth(1), K::ClassKw | K::InterfaceKw)) =>
                {
                    ModifierKind::Sealed
                }
                K::Ident
                    if self.nth_text(0) == "non"
                        && self.nth(1) == K::Minus
                        && self.nth_text(2) == "sealed"
                        && self.adjacent(0)
                        && self.adjacent(1) =>
                {
                    let begin = self.start();
                    self.bump();
                    self.bump();
                    self.bump();
                    modifiers.keywords.push(Modifier {
                        kind: ModifierKind::NonSealed,
                        range: self.range_from(begin),
                    });
                    continue;
                }
                _ => break,
            };
            let token = self.bump();
            modifiers.keywords.push(Modifier {
                kind,
                range: token.range,
            });
        }
        if !modifiers.is_empty() {
            modifiers.range = self.range_from(start);
        }
        modifiers
    }

    fn annotation(&mut self) -> Annotation {
        let start = self.start();
        self.bump();
        let name = self.qualified_name();
        let arguments = if self.at(K::LParen) {
            let args_start = self.start();
            self.skip_balanced(K::LParen, K::RParen);
            Some(self.range_from(args_start))
        } else {
            None
        };
        Annotation {
            range: self.range_from(start),
            name,
            arguments,
        }
    }

    fn type_annotations(&mut self) -> Vec<Annotation> {
        let mut annotations = Vec::new();
        while self.at(K::At) && self.nth(1) != K::InterfaceKw {
            annotations.push(self.annotation());
        }
        annotations
    }

    fn type_decl(&mut self, doc: Option<DocComment>, modifiers: Modifiers, start: usize) -> TypeDecl {
        let kind = match self.peek() {
            K::ClassKw => TypeDeclKind::Class,
            K::InterfaceKw => TypeDeclKind::Interface,
            K::EnumKw => TypeDeclKind::Enum,
            K::At => {
                self.bump();
                TypeDeclKind::Annotation
            }
            _ => TypeDeclKind::Record,
        };
        self.bump();
        let name = self.ident();
        let type_params = if self.at(K::Less) {
            self.type_params()
        } else {
            Vec::new()
        };
        let record_components = if kind == TypeDeclKind::Record && self.at(K::LParen) {
            self.params().1
        } else {
            Vec::new()
        };
        let extends = if self.eat(K::ExtendsKw) {
            self.type_list()
        } else {
            Vec::new()
        };
        let implements = if self.eat(K::ImplementsKw) {
            self.type_list()
        } else {
            Vec::new()
        };
        if self.at_contextual("permits") {
            self.bump();
            let _ = self.type_list();
        }
        let (body, enum_constants, members) = self.class_body(kind);

        TypeDecl {
            range: self.range_from(start),
            doc,
            modifiers,
            kind,
            name,
            type_params,
            extends,
            implements,
            record_components,
            enum_constants,
            members,
            body,
        }
    }

    fn type_params(&mut self) -> Vec<TypeParam> {
        self.bump();
        let mut params = Vec::new();
        loop {
            let start = self.start();
            let _ = self.type_annotations();
            let name = self.ident();
            let mut bounds = Vec::new();
            if self.eat(K::ExtendsKw) {
                bounds.push(self.parse_type());
                while self.eat(K::Amp) {
                    bounds.push(self.parse_type());
                }
            }
            params.push(TypeParam {
                range: self.range_from(start),
                name,
                bounds,
            });
            if !self.eat(K::Comma) {
                break;
            }
        }
        self.expect(K::Greater, "`>`");
        params
    }

    fn type_list(&mut self) -> Vec<TypeRef> {
        let mut types = vec![self.parse_type()];
        while self.eat(K::Comma) {
            types.push(self.parse_type());
        }
        types
    }

    fn class_body(&mut self, kind: TypeDeclKind) -> (TextRange, Vec<EnumConstant>, Vec<Member>) {
        let start = self.start();
        if !self.at(K::LBrace) {
            self.error("expected `{`");
            return (TextRange::empty_at(self.last_end), Vec::new(), Vec::new());
        }
        self.bump();
        let constants = if kind == TypeDeclKind::Enum {
            self.enum_constants()
        } else {
            Vec::new()
        };
        let mut members = Vec::new();
        while !self.at(K::RBrace) && !self.at(K::Eof) {
            let before = self.pos;
            if let Some(member) = self.member(kind) {
                members.push(member);
            }
            if self.pos == before {
                self.error("expected a member declaration");
                self.bump();
            }
        }
        self.expect(K::RBrace, "`}`");
        (self.range_from(start), constants, members)
    }

    fn enum_constants(&mut self) -> Vec<EnumConstant> {
        let mut constants = Vec::new();
        loop {
            match self.peek() {
                K::Semicolon => {
                    self.bump();
                    break;
                }
                K::RBrace | K::Eof => break,
                _ => {}
            }
            let doc = self.doc_here();
            let start = self.start();
            let annotations = self.type_annotations();
            if !self.at(K::Ident) {
                self.error("expected an enum constant");
                break;
            }
            let name = self.ident();
            let args = self.at(K::LParen).then(|| self.arg_list());
            let body = if self.at(K::LBrace) {
                self.class_body(TypeDeclKind::Class).2
            } else {
                Vec::new()
            };
            constants.push(EnumConstant {
                range: self.range_from(start),
                doc,
                annotations,
                name,
                args,
                body,
            });
            if !self.eat(K::Comma) {
                self.eat(K::Semicolon);
                break;
            }
        }
        constants
    }

    fn member(&mut self, kind: TypeDeclKind) -> Option<Member> {
        match self.peek() {
            K::Semicolon => {
                self.bump();
                return None;
            }
            K::LBrace => {
                let body = self.block();
                return Some(Member::Initializer(Initializer {
                    range: body.range,
                    is_static: false,
                    body,
                }));
            }
            K::StaticKw if self.nth(1) == K::LBrace => {
                let start = self.start();
                self.bump();
                let body = self.block();
                return Some(Member::Initializer(Initializer {
                    range: self.range_from(start),
                    is_static: true,
                    body,
                }));
            }
            _ => {}
        }

        let doc = self.doc_here();
        let start = self.start();
        let modifiers = self.modifiers();
        if self.at_type_decl_start() {
            return Some(Member::Type(self.type_decl(doc, modifiers, start)));
        }
        let type_params = if self.at(K::Less) {
            self.type_params()
        } else {
            Vec::new()
        };
        if self.at(K::Ident)
            && (self.nth(1) == K::LParen || (kind == TypeDeclKind::Record && self.nth(1) == K::LBrace))
        {
            let name = self.ident();
            return Some(Member::Method(
                self.method_rest(doc, modifiers, type_params, None, name, start),
            ));
        }
        if !self.at_type_start() {
            self.error("expected a member declaration");
            return None;
        }
        let ty = self.parse_type();
        let name = self.ident();
        if self.at(K::LParen) {
            return Some(Member::Method(self.method_rest(
                doc,
                modifiers,
                type_params,
                Some(ty),
                name,
                start,
            )));
        }
        let declarators = self.declarators_after_name(name);
        self.expect(K::Semicolon, "`;`");
        Some(Member::Field(FieldDecl {
            range: self.range_from(start),
            doc,
            modifiers,
            ty,
            declarators,
        }))
    }

    fn at_type_start(&self) -> bool {
        let kind = self.peek();
        kind == K::Ident || kind == K::VoidKw || kind == K::At || kind.is_primitive_type()
    }

    fn method_rest(
        &mut self,
        doc: Option<DocComment>,
        modifiers: Modifiers,
        type_params: Vec<TypeParam>,
        return_type: Option<TypeRef>,
        name: Ident,
        start: usize,
    ) -> MethodDecl {
        let (params_range, params) = if self.at(K::LParen) {
            self.params()
        } else {
            (TextRange::empty_at(self.last_end), Vec::new())
        };
        while self.at(K::LBracket) && self.nth(1) == K::RBracket {
            self.bump();
            self.bump();
        }
        let mut throws = Vec::new();
        let mut throws_range = None;
        if self.at(K::ThrowsKw) {
            let throws_start = self.start();
            self.bump();
            throws = self.type_list();
            throws_range = Some(self.range_from(throws_start));
        }
        let body = if self.at(K::LBrace) {
            Some(self.block())
        } else {
            if self.eat(K::DefaultKw) {
                let _ = self.variable_init();
            }
            self.expect(K::Semicolon, "`;`");
            None
        };
        MethodDecl {
            range: self.range_from(start),
            doc,
            modifiers,
            type_params,
            return_type,
            name,
            params_range,
            params,
            throws_range,
            throws,
            body,
        }
    }

    fn params(&mut self) -> (TextRange, Vec<Param>) {
        let start = self.start();
        self.expect(K::LParen, "`(`");
        let mut params = Vec::new();
        if !self.at(K::RParen) {
            loop {
                params.push(self.param());
                if !self.eat(K::Comma) {
                    break;
                }
            }
        }
        self.expect(K::RParen, "`)`");
        (self.range_from(start), params)
    }

    fn param(&mut self) -> Param {
        let start = self.start();
        let modifiers = self.modifiers();
        let ty = self.parse_type();
        let _ = self.type_annotations();
        let varargs = self.eat(K::Ellipsis);
        let name = if self.at(K::ThisKw) {
            let token = self.bump();
            Ident {
                name: "this".to_string(),
                range: token.range,
            }
        } else {
            self.ident()
        };
        while self.at(K::LBracket) && self.nth(1) == K::RBracket {
            self.bump();
            self.bump();
        }
        Param {
            range: self.range_from(start),
            modifiers,
            ty,
            varargs,
            name,
        }
    }

    fn declarators_after_name(&mut self, first: Ident) -> Vec<VarDeclarator> {
        let mut declarators = Vec::new();
        let mut name = first;
        loop {
            let start = name.range.start_offset();
            let mut dims = 0u8;
            while self.at(K::LBracket) && self.nth(1) == K::RBracket {
                self.bump();
                self.bump();
                dims = dims.saturating_add(1);
            }
            let init = self.eat(K::Eq).then(|| self.variable_init());
            declarators.push(VarDeclarator {
                range: self.range_from(start),
                name,
                dims,
                init,
            });
            if !self.eat(K::Comma) {
                break;
            }
            name = self.ident();
        }
        declarators
    }

    fn variable_init(&mut self) -> Expr {
        if self.at(K::LBrace) {
            self.array_init()
        } else {
            self.expr()
        }
    }

    fn array_init(&mut self) -> Expr {
        let start = self.start();
        self.bump();
        let mut elements = Vec::new();
        while !self.at(K::RBrace) && !self.at(K::Eof) {
            elements.push(self.variable_init());
            if !self.eat(K::Comma) {
                break;
            }
        }
        self.expect(K::RBrace, "`}`");
        Expr {
            range: self.range_from(start),
            kind: ExprKind::ArrayInit(elements),
        }
    }

    // --- types ---------------------------------------------------------------------------

    fn parse_type(&mut self) -> TypeRef {
        let start = self.start();
        let annotations = self.type_annotations();
        let kind = match self.peek() {
            kind if kind.is_primitive_type() => {
                self.bump();
                TypeRefKind::Primitive(primitive_of(kind))
            }
            K::VoidKw => {
                self.bump();
                TypeRefKind::Void
            }
            K::Question => {
                self.bump();
                let bound = if matches!(self.peek(), K::ExtendsKw | K::SuperKw) {
                    let is_extends = self.bump().kind == K::ExtendsKw;
                    Some(WildcardBound {
                        is_extends,
                        ty: Box::new(self.parse_type()),
                    })
                } else {
                    None
                };
                return TypeRef {
                    range: self.range_from(start),
                    annotations,
                    kind: TypeRefKind::Wildcard { bound },
                };
            }
            K::Ident => self.named_type_kind(),
            _ => {
                self.error("expected a type");
                return TypeRef {
                    range: TextRange::empty_at(start),
                    annotations,
                    kind: TypeRefKind::Named {
                        name: String::new(),
                        args: None,
                    },
                };
            }
        };
        let base = TypeRef {
            range: self.range_from(start),
            annotations,
            kind,
        };
        self.array_dims(base, start)
    }

    fn array_dims(&mut self, base: TypeRef, start: usize) -> TypeRef {
        let mut dims = 0u8;
        while self.at(K::LBracket) && self.nth(1) == K::RBracket {
            self.bump();
            self.bump();
            dims = dims.saturating_add(1);
        }
        if dims == 0 {
            base
        } else {
            TypeRef {
                range: self.range_from(start),
                annotations: Vec::new(),
                kind: TypeRefKind::Array {
                    element: Box::new(base),
                    dims,
                },
            }
        }
    }

    fn named_type_kind(&mut self) -> TypeRefKind {
        let mut name = self.ident().name;
        let mut args = self.at(K::Less).then(|| self.type_args());
        while self.at(K::Dot) && matches!(self.nth(1), K::Ident | K::At) {
            self.bump();
            let _ = self.type_annotations();
            name.push('.');
            name.push_str(&self.ident().name);
            args = self.at(K::Less).then(|| self.type_args());
        }
        if name == "var" && args.is_none() {
            TypeRefKind::Var
        } else {
            TypeRefKind::Named { name, args }
        }
    }

    fn type_args(&mut self) -> TypeArgs {
        let start = self.start();
        self.bump();
        let mut args = Vec::new();
        if !self.at(K::Greater) {
            loop {
                args.push(self.parse_type());
                if !self.eat(K::Comma) {
                    break;
                }
            }
        }
        self.expect(K::Greater, "`>`");
        TypeArgs {
            range: self.range_from(start),
            args,
        }
    }

    // --- statements ----------------------------------------------------------------------

    fn block(&mut self) -> Block {
        let start = self.start();
        self.expect(K::LBrace, "`{`");
        let mut stmts = Vec::new();
        while !self.at(K::RBrace) && !self.at(K::Eof) {
            let before = self.pos;
            let stmt = self.stmt();
            if self.pos == before {
                self.bump();
                continue;
            }
            stmts.push(stmt);
        }
        self.expect(K::RBrace, "`}`");
        Block {
            range: self.range_from(start),
            stmts,
        }
    }

    fn is_local_var_decl_start(&mut self) -> bool {
        match self.peek() {
            K::FinalKw | K::AbstractKw => true,
            K::At => self.nth(1) != K::InterfaceKw,
            kind if kind.is_primitive_type() => self.nth(1) != K::Dot,
            K::Ident => self.speculate(|p| {
                p.parse_type();
                p.at(K::Ident)
                    && matches!(
                        p.nth(1),
                        K::Eq | K::Semicolon | K::Comma | K::LBracket | K::Colon
                    )
            }),
            _ => false,
        }
    }

    fn stmt(&mut self) -> Stmt {
        let start = self.start();
        match self.peek() {
            K::LBrace => Stmt::Block(self.block()),
            K::Semicolon => {
                self.bump();
                Stmt::Empty(self.range_from(start))
            }
            K::IfKw => {
                self.bump();
                let condition = self.paren_expr();
                let then_branch = Box::new(self.stmt());
                let else_branch = self.eat(K::ElseKw).then(|| Box::new(self.stmt()));
                Stmt::If(IfStmt {
                    range: self.range_from(start),
                    condition,
                    then_branch,
                    else_branch,
                })
            }
            K::WhileKw => {
                self.bump();
                let condition = self.paren_expr();
                let body = Box::new(self.stmt());
                Stmt::While(WhileStmt {
                    range: self.range_from(start),
                    condition,
                    body,
                })
            }
            K::DoKw => {
                self.bump();
                let body = Box::new(self.stmt());
                self.expect(K::WhileKw, "`while`");
                let condition = self.paren_expr();
                self.expect(K::Semicolon, "`;`");
                Stmt::DoWhile(DoWhileStmt {
                    range: self.range_from(start),
                    body,
                    condition,
                })
            }
            K::ForKw => self.for_stmt(),
            K::TryKw => Stmt::Try(self.try_stmt()),
            K::SwitchKw => {
                self.bump();
                let selector = self.paren_expr();
                let body = self.switch_body();
                Stmt::Switch(SwitchStmt {
                    range: self.range_from(start),
                    selector,
                    body,
                })
            }
            K::ReturnKw => {
                self.bump();
                let value = (!self.at(K::Semicolon)).then(|| self.expr());
                self.expect(K::Semicolon, "`;`");
                Stmt::Return(ReturnStmt {
                    range: self.range_from(start),
                    value,
                })
            }
            K::ThrowKw => Stmt::Throw(self.throw_stmt()),
            K::BreakKw | K::ContinueKw => {
                let is_break = self.bump().kind == K::BreakKw;
                let label = self.at(K::Ident).then(|| self.ident());
                self.expect(K::Semicolon, "`;`");
                let jump = JumpStmt {
                    range: self.range_from(start),
                    label,
                };
                if is_break {
                    Stmt::Break(jump)
                } else {
                    Stmt::Continue(jump)
                }
            }
            K::SynchronizedKw if self.nth(1) == K::LParen => {
                self.bump();
                let lock = self.paren_expr();
                let body = self.block();
                Stmt::Synchronized(SynchronizedStmt {
                    range: self.range_from(start),
                    lock,
                    body,
                })
            }
            K::AssertKw => {
                self.bump();
                let condition = self.expr();
                let message = self.eat(K::Colon).then(|| self.expr());
                self.expect(K::Semicolon, "`;`");
                Stmt::Assert(AssertStmt {
                    range: self.range_from(start),
                    condition,
                    message,
                })
            }
            K::Ident
                if self.nth_text(0) == "yield"
                    && !matches!(
                        self.nth(1),
                        K::Dot | K::LBracket | K::PlusPlus | K::MinusMinus | K::Semicolon | K::Colon
                    )
                    && !self.nth(1).is_assignment_operator() =>
            {
                self.bump();
                let value = self.expr();
                self.expect(K::Semicolon, "`;`");
                Stmt::Yield(YieldStmt {
                    range: self.range_from(start),
                    value,
                })
            }
            K::Ident if self.nth(1) == K::Colon => {
                let label = self.ident();
                self.bump();
                let body = Box::new(self.stmt());
                Stmt::Labeled(LabeledStmt {
                    range: self.range_from(start),
                    label,
                    body,
                })
            }
            _ if self.at_type_decl_start() => Stmt::LocalClass(Box::new(self.type_decl(
                None,
                Modifiers {
                    range: TextRange::empty_at(start),
                    ..Modifiers::default()
                },
                start,
            ))),
            _ => self.local_var_or_expr_stmt(start),
        }
    }

    fn local_var_or_expr_stmt(&mut self, start: usize) -> Stmt {
        if self.is_local_var_decl_start() {
            let modifiers = self.modifiers();
            if self.at_type_decl_start() {
                return Stmt::LocalClass(Box::new(self.type_decl(None, modifiers, start)));
            }
            return Stmt::LocalVar(self.local_var_rest(start, modifiers, true));
        }
        let expr = self.expr();
        self.expect(K::Semicolon, "`;`");
        Stmt::Expr(ExprStmt {
            range: self.range_from(start),
            expr,
        })
    }

    fn local_var_rest(&mut self, start: usize, modifiers: Modifiers, semicolon: bool) -> LocalVarDecl {
        let ty = self.parse_type();
        let name = self.ident();
        let declarators = self.declarators_after_name(name);
        if semicolon {
            self.expect(K::Semicolon, "`;`");
        }
        LocalVarDecl {
            range: self.range_from(start),
            modifiers,
            ty,
            declarators,
        }
    }

    fn throw_stmt(&mut self) -> ThrowStmt {
        let start = self.start();
        self.bump();
        let value = self.expr();
        self.expect(K::Semicolon, "`;`");
        ThrowStmt {
            range: self.range_from(start),
            value,
        }
    }

    fn paren_expr(&mut self) -> Expr {
        self.expect(K::LParen, "`(`");
        let expr = self.expr();
        self.expect(K::RParen, "`)`");
        expr
    }

    fn for_stmt(&mut self) -> Stmt {
        let start = self.start();
        self.bump();
        self.expect(K::LParen, "`(`");

        let is_foreach = self.speculate(|p| {
            let _ = p.modifiers();
            if !(p.at(K::Ident) || p.peek().is_primitive_type()) {
                return false;
            }
            p.parse_type();
            p.at(K::Ident) && p.nth(1) == K::Colon
        });
        if is_foreach {
            let modifiers = self.modifiers();
            let ty = self.parse_type();
            let name = self.ident();
            self.expect(K::Colon, "`:`");
            let iterable = self.expr();
            self.expect(K::RParen, "`)`");
            let body = Box::new(self.stmt());
            return Stmt::ForEach(ForEachStmt {
                range: self.range_from(start),
                modifiers,
                ty,
                name,
                iterable,
                body,
            });
        }

        let mut init = Vec::new();
        if !self.at(K::Semicolon) {
            if self.is_local_var_decl_start() {
                let decl_start = self.start();
                let modifiers = self.modifiers();
                init.push(Stmt::LocalVar(self.local_var_rest(decl_start, modifiers, false)));
            } else {
                loop {
                    let expr_start = self.start();
                    let expr = self.expr();
                    init.push(Stmt::Expr(ExprStmt {
                        range: self.range_from(expr_start),
                        expr,
                    }));
                    if !self.eat(K::Comma) {
                        break;
                    }
                }
            }
        }
        self.expect(K::Semicolon, "`;`");
        let condition = (!self.at(K::Semicolon)).then(|| self.expr());
        self.expect(K::Semicolon, "`;`");
        let mut update = Vec::new();
        if !self.at(K::RParen) {
            loop {
                update.push(self.expr());
                if !self.eat(K::Comma) {
                    break;
                }
            }
        }
        self.expect(K::RParen, "`)`");
        let body = Box::new(self.stmt());
        Stmt::For(ForStmt {
            range: self.range_from(start),
            init,
            condition,
            update,
            body,
        })
    }

    fn try_stmt(&mut self) -> TryStmt {
        let start = self.start();
        self.bump();
        let resources = if self.at(K::LParen) {
            let spec_start = self.start();
            self.bump();
            let mut resources = Vec::new();
            while !self.at(K::RParen) && !self.at(K::Eof) {
                let before = self.pos;
                resources.push(self.resource());
                if !self.eat(K::Semicolon) || self.pos == before {
                    break;
                }
            }
            self.expect(K::RParen, "`)`");
            Some(ResourceSpec {
                range: self.range_from(spec_start),
                resources,
            })
        } else {
            None
        };
        let body = self.block();

        let mut catches = Vec::new();
        while self.at(K::CatchKw) {
            let catch_start = self.start();
            self.bump();
            self.expect(K::LParen, "`(`");
            let param_start = self.start();
            let modifiers = self.modifiers();
            let mut types = vec![self.parse_type()];
            while self.eat(K::Pipe) {
                types.push(self.parse_type());
            }
            let name = self.ident();
            let param = CatchParam {
                range: self.range_from(param_start),
                modifiers,
                types,
                name,
            };
            self.expect(K::RParen, "`)`");
            let body = self.block();
            catches.push(CatchClause {
                range: self.range_from(catch_start),
                param,
                body,
            });
        }

        let finally = if self.at(K::FinallyKw) {
            let finally_start = self.start();
            self.bump();
            let body = self.block();
            Some(FinallyClause {
                range: self.range_from(finally_start),
                body,
            })
        } else {
            None
        };

        if catches.is_empty() && finally.is_none() && resources.is_none() {
            self.error("expected `catch` or `finally`");
        }

        TryStmt {
            range: self.range_from(start),
            resources,
            body,
            catches,
            finally,
        }
    }

    fn resource(&mut self) -> Resource {
        let start = self.start();
        if self.is_local_var_decl_start() {
            let modifiers = self.modifiers();
            let ty = self.parse_type();
            let name = self.ident();
            self.expect(K::Eq, "`=`");
            let init = self.expr();
            Resource {
                range: self.range_from(start),
                kind: ResourceKind::Decl {
                    modifiers,
                    ty,
                    name,
                    init,
                },
            }
        } else {
            let expr = self.expr();
            Resource {
                range: self.range_from(start),
                kind: ResourceKind::Expr(expr),
            }
        }
    }

    fn switch_body(&mut self) -> SwitchBody {
        let start = self.start();
        self.expect(K::LBrace, "`{`");
        let mut groups = Vec::new();
        while !self.at(K::RBrace) && !self.at(K::Eof) {
            if !matches!(self.peek(), K::CaseKw | K::DefaultKw) {
                self.error("expected `case` or `default`");
                let before = self.pos;
                let _ = self.stmt();
                if self.pos == before {
                    self.bump();
                }
                continue;
            }
            groups.push(self.switch_group());
        }
        self.expect(K::RBrace, "`}`");
        SwitchBody {
            range: self.range_from(start),
            groups,
        }
    }

    fn switch_group(&mut self) -> SwitchGroup {
        let start = self.start();
        let mut labels = Vec::new();
        loop {
            let label_start = self.start();
            let kind = if self.eat(K::DefaultKw) {
                SwitchLabelKind::Default
            } else {
                self.bump();
                let mut values = Vec::new();
                loop {
                    values.push(self.conditional());
                    // Type pattern binding (`case String s ->`).
                    if self.at(K::Ident) {
                        self.bump();
                    }
                    if !self.eat(K::Comma) {
                        break;
                    }
                }
                SwitchLabelKind::Case(values)
            };

            if self.at(K::Arrow) {
                self.bump();
                labels.push(SwitchLabel {
                    range: self.range_from(label_start),
                    kind,
                });
                let body = match self.peek() {
                    K::LBrace => ArrowBody::Block(self.block()),
                    K::ThrowKw => ArrowBody::Throw(self.throw_stmt()),
                    _ => {
                        let expr_start = self.start();
                        let expr = self.expr();
                        self.expect(K::Semicolon, "`;`");
                        ArrowBody::Expr(ExprStmt {
                            range: self.range_from(expr_start),
                            expr,
                        })
                    }
                };
                return SwitchGroup {
                    range: self.range_from(start),
                    labels,
                    body: SwitchGroupBody::Arrow(body),
                };
            }

            self.expect(K::Colon, "`:`");
            labels.push(SwitchLabel {
                range: self.range_from(label_start),
                kind,
            });
            if !matches!(self.peek(), K::CaseKw | K::DefaultKw) {
                break;
            }
        }

        let mut stmts = Vec::new();
        while !matches!(self.peek(), K::CaseKw | K::DefaultKw | K::RBrace | K::Eof) {
            let before = self.pos;
            let stmt = self.stmt();
            if self.pos == before {
                self.bump();
                continue;
            }
            stmts.push(stmt);
        }
        SwitchGroup {
            range: self.range_from(start),
            labels,
            body: SwitchGroupBody::Statements(stmts),
        }
    }

    // --- expressions ---------------------------------------------------------------------

    fn expr(&mut self) -> Expr {
        if let Some(lambda) = self.try_lambda() {
            return lambda;
        }
        let start = self.start();
        let lhs = self.conditional();
        if let Some(len) = self.assign_op_len() {
            let op = if self.at(K::Eq) {
                AssignOp::Assign
            } else {
                AssignOp::Compound
            };
            for _ in 0..len {
                self.bump();
            }
            let rhs = self.expr();
            return Expr {
                range: self.range_from(start),
                kind: ExprKind::Assign {
                    op,
                    lhs: Box::new(lhs),
                    rhs: Box::new(rhs),
                },
            };
        }
        lhs
    }

    fn assign_op_len(&self) -> Option<usize> {
        let kind = self.peek();
        if kind.is_assignment_operator() {
            return Some(1);
        }
        if kind == K::Greater && self.adjacent(0) {
            if self.nth(1) == K::GreaterEq {
                return Some(2);
            }
            if self.nth(1) == K::Greater && self.adjacent(1) && self.nth(2) == K::GreaterEq {
                return Some(3);
            }
        }
        None
    }

    fn try_lambda(&mut self) -> Option<Expr> {
        let start = self.start();
        let params = if self.at(K::Ident) && self.nth(1) == K::Arrow {
            vec![self.ident()]
        } else if self.at(K::LParen) {
            let close = self.matching_paren(self.pos)?;
            if self.tokens.get(close + 1).map(|t| t.kind) != Some(K::Arrow) {
                return None;
            }
            let mut names = Vec::new();
            let mut depth = 0i32;
            let mut last_ident: Option<Token> = None;
            for token in &self.tokens[self.pos + 1..close] {
                match token.kind {
                    K::LParen | K::Less | K::LBracket => depth += 1,
                    K::RParen | K::Greater | K::RBracket => depth -= 1,
                    K::Comma if depth == 0 => names.extend(last_ident.take()),
                    K::Ident if depth == 0 => last_ident = Some(*token),
                    _ => {}
                }
            }
            names.extend(last_ident);
            self.last_end = self.tokens[close].range.end_offset();
            self.pos = close + 1;
            names
                .into_iter()
                .map(|t| Ident {
                    name: t.text(self.source).to_string(),
                    range: t.range,
                })
                .collect()
        } else {
            return None;
        };
        self.expect(K::Arrow, "`->`");
        let body = if self.at(K::LBrace) {
            LambdaBody::Block(self.block())
        } else {
            LambdaBody::Expr(Box::new(self.expr()))
        };
        Some(Expr {
            range: self.range_from(start),
            kind: ExprKind::Lambda { params, body },
        })
    }

    fn conditional(&mut self) -> Expr {
        let start = self.start();
        let condition = self.binary(1);
        if !self.at(K::Question) {
            return condition;
        }
        self.bump();
        let then_expr = self.expr();
        self.expect(K::Colon, "`:`");
        let else_expr = match self.try_lambda() {
            Some(lambda) => lambda,
            None => self.conditional(),
        };
        Expr {
            range: self.range_from(start),
            kind: ExprKind::Conditional {
                condition: Box::new(condition),
                then_expr: Box::new(then_expr),
                else_expr: Box::new(else_expr),
            },
        }
    }

    fn binary_op(&self) -> Option<(BinaryOp, u8, usize)> {
        Some(match self.peek() {
            K::PipePipe => (BinaryOp::Or, 1, 1),
            K::AmpAmp => (BinaryOp::And, 2, 1),
            K::Pipe => (BinaryOp::BitOr, 3, 1),
            K::Caret => (BinaryOp::BitXor, 4, 1),
            K::Amp => (BinaryOp::BitAnd, 5, 1),
            K::EqEq => (BinaryOp::Eq, 6, 1),
            K::BangEq => (BinaryOp::NotEq, 6, 1),
            K::Less => (BinaryOp::Less, 7, 1),
            K::LessEq => (BinaryOp::LessEq, 7, 1),
            K::GreaterEq => (BinaryOp::GreaterEq, 7, 1),
            K::Greater => {
                if self.assign_op_len().is_some() {
                    return None;
                }
                if self.adjacent(0) && self.nth(1) == K::Greater {
                    if self.adjacent(1) && self.nth(2) == K::Greater {
                        (BinaryOp::UShr, 8, 3)
                    } else {
                        (BinaryOp::Shr, 8, 2)
                    }
                } else {
                    (BinaryOp::Greater, 7, 1)
                }
            }
            K::LeftShift => (BinaryOp::Shl, 8, 1),
            K::Plus => (BinaryOp::Add, 9, 1),
            K::Minus => (BinaryOp::Sub, 9, 1),
            K::Star => (BinaryOp::Mul, 10, 1),
            K::Slash => (BinaryOp::Div, 10, 1),
            K::Percent => (BinaryOp::Rem, 10, 1),
            _ => return None,
        })
    }

    fn binary(&mut self, min_prec: u8) -> Expr {
        let start = self.start();
        let mut lhs = self.unary();
        loop {
            if self.at(K::InstanceofKw) && min_prec <= 7 {
                self.bump();
                self.eat(K::FinalKw);
                let ty = self.parse_type();
                let binding = self.at(K::Ident).then(|| self.ident());
                lhs = Expr {
                    range: self.range_from(start),
                    kind: ExprKind::InstanceOf {
                        expr: Box::new(lhs),
                        ty,
                        binding,
                    },
                };
                continue;
            }
            let Some((op, prec, len)) = self.binary_op() else {
                break;
            };
            if prec < min_prec {
                break;
            }
            for _ in 0..len {
                self.bump();
            }
            let rhs = self.binary(prec + 1);
            lhs = Expr {
                range: self.range_from(start),
                kind: ExprKind::Binary {
                    op,
                    lhs: Box::new(lhs),
                    rhs: Box::new(rhs),
                },
            };
        }
        lhs
    }

    fn unary(&mut self) -> Expr {
        let start = self.start();
        let op = match self.peek() {
            K::Bang => Some(UnaryOp::Not),
            K::Minus => Some(UnaryOp::Neg),
            K::Plus => Some(UnaryOp::Plus),
            K::Tilde => Some(UnaryOp::BitNot),
            K::PlusPlus => Some(UnaryOp::PreInc),
            K::MinusMinus => Some(UnaryOp::PreDec),
            _ => None,
        };
        if let Some(op) = op {
            self.bump();
            let operand = self.unary();
            return Expr {
                range: self.range_from(start),
                kind: ExprKind::Unary {
                    op,
                    operand: Box::new(operand),
                },
            };
        }
        if self.at(K::LParen) {
            if let Some(cast) = self.try_cast() {
                return cast;
            }
        }
        self.postfix()
    }

    fn try_cast(&mut self) -> Option<Expr> {
        let start = self.start();
        let is_cast = if self.nth(1).is_primitive_type() {
            self.speculate(|p| {
                p.bump();
                p.parse_type();
                p.at(K::RParen)
            })
        } else if self.nth(1) == K::Ident {
            self.speculate(|p| {
                p.bump();
                p.parse_type();
                while p.eat(K::Amp) {
                    p.parse_type();
                }
                if !p.eat(K::RParen) {
                    return false;
                }
                let next = p.peek();
                next.is_literal()
                    || matches!(
                        next,
                        K::Ident
                            | K::LParen
                            | K::Bang
                            | K::Tilde
                            | K::ThisKw
                            | K::SuperKw
                            | K::NewKw
                            | K::SwitchKw
                    )
            })
        } else {
            false
        };
        if !is_cast {
            return None;
        }
        self.bump();
        let ty = self.parse_type();
        while self.eat(K::Amp) {
            self.parse_type();
        }
        self.expect(K::RParen, "`)`");
        let expr = match self.try_lambda() {
            Some(lambda) => lambda,
            None => self.unary(),
        };
        Some(Expr {
            range: self.range_from(start),
            kind: ExprKind::Cast {
                ty,
                expr: Box::new(expr),
            },
        })
    }

    fn postfix(&mut self) -> Expr {
        let start = self.start();
        let mut expr = self.primary();
        loop {
            let kind = match self.peek() {
                K::Dot => match self.nth(1) {
                    K::Ident => {
                        self.bump();
                        let name = self.ident();
                        if self.at(K::LParen) {
                            let args = self.arg_list();
                            ExprKind::MethodCall {
                                target: Some(Box::new(expr)),
                                type_args: None,
                                name,
                                args,
                            }
                        } else {
                            ExprKind::FieldAccess {
                                target: Box::new(expr),
                                name,
                            }
                        }
                    }
                    K::Less => {
                        self.bump();
                        let type_args = self.type_args();
                        let name = self.ident();
                        let args = self.arg_list();
                        ExprKind::MethodCall {
                            target: Some(Box::new(expr)),
                            type_args: Some(type_args),
                            name,
                            args,
                        }
                    }
                    K::ClassKw => {
                        self.bump();
                        self.bump();
                        ExprKind::ClassLiteral(TypeRef {
                            range: expr.range,
                            annotations: Vec::new(),
                            kind: TypeRefKind::Named {
                                name: expr.dotted_name().unwrap_or_default(),
                                args: None,
                            },
                        })
                    }
                    K::ThisKw => {
                        self.bump();
                        self.bump();
                        ExprKind::This
                    }
                    K::SuperKw => {
                        self.bump();
                        self.bump();
                        ExprKind::Super
                    }
                    K::NewKw => {
                        self.bump();
                        self.new_expr().kind
                    }
                    _ => {
                        self.error("expected a member name");
                        break;
                    }
                },
                K::LBracket => {
                    self.bump();
                    let index = self.expr();
                    self.expect(K::RBracket, "`]`");
                    ExprKind::ArrayAccess {
                        array: Box::new(expr),
                        index: Box::new(index),
                    }
                }
                K::PlusPlus | K::MinusMinus => {
                    let op = if self.bump().kind == K::PlusPlus {
                        UnaryOp::PostInc
                    } else {
                        UnaryOp::PostDec
                    };
                    ExprKind::Unary {
                        op,
                        operand: Box::new(expr),
                    }
                }
                K::ColonColon => {
                    self.bump();
                    let name = self.member_ref_name();
                    ExprKind::MethodRef {
                        target: Box::new(expr),
                        name,
                    }
                }
                _ => break,
            };
            expr = Expr {
                range: self.range_from(start),
                kind,
            };
        }
        expr
    }

    fn member_ref_name(&mut self) -> Ident {
        if self.at(K::NewKw) {
            let token = self.bump();
            Ident {
                name: "new".to_string(),
                range: token.range,
            }
        } else {
            self.ident()
        }
    }

    fn primary(&mut self) -> Expr {
        let start = self.start();
        let kind = match self.peek() {
            kind if kind.is_literal() => {
                self.bump();
                ExprKind::Literal(literal_of(kind))
            }
            K::Ident => {
                if self.nth(1) == K::LParen {
                    let name = self.ident();
                    let args = self.arg_list();
                    ExprKind::MethodCall {
                        target: None,
                        type_args: None,
                        name,
                        args,
                    }
                } else if self.nth(1) == K::LBracket && self.nth(2) == K::RBracket {
                    let ty = self.parse_type();
                    return self.type_postfix(ty, start);
                } else {
                    let token = self.bump();
                    ExprKind::Name(token.text(self.source).to_string())
                }
            }
            K::ThisKw | K::SuperKw => {
                let token = self.bump();
                if self.at(K::LParen) {
                    let args = self.arg_list();
                    ExprKind::MethodCall {
                        target: None,
                        type_args: None,
                        name: Ident {
                            name: token.text(self.source).to_string(),
                            range: token.range,
                        },
                        args,
                    }
                } else if token.kind == K::ThisKw {
                    ExprKind::This
                } else {
                    ExprKind::Super
                }
            }
            K::LParen => {
                self.bump();
                let inner = self.expr();
                self.expect(K::RParen, "`)`");
                ExprKind::Paren(Box::new(inner))
            }
            K::NewKw => return self.new_expr(),
            K::SwitchKw => {
                self.bump();
                let selector = self.paren_expr();
                let body = self.switch_body();
                ExprKind::Switch {
                    selector: Box::new(selector),
                    body,
                }
            }
            K::LBrace => return self.array_init(),
            kind if kind.is_primitive_type() || kind == K::VoidKw => {
                let ty = self.parse_type();
                return self.type_postfix(ty, start);
            }
            _ => {
                self.error("expected an expression");
                if !matches!(
                    self.peek(),
                    K::RParen | K::RBrace | K::RBracket | K::Semicolon | K::Comma | K::Eof
                ) {
                    self.bump();
                }
                ExprKind::Error
            }
        };
        Expr {
            range: self.range_from(start),
            kind,
        }
    }

    /// `int.class`, `String[].class`, `int[]::new`.
    fn type_postfix(&mut self, ty: TypeRef, start: usize) -> Expr {
        let kind = if self.at(K::Dot) && self.nth(1) == K::ClassKw {
            self.bump();
            self.bump();
            ExprKind::ClassLiteral(ty)
        } else if self.at(K::ColonColon) {
            self.bump();
            let name = self.member_ref_name();
            ExprKind::MethodRef {
                target: Box::new(Expr {
                    range: ty.range,
                    kind: ExprKind::ClassLiteral(ty),
                }),
                name,
            }
        } else {
            self.error("expected `.class`");
            ExprKind::Error
        };
        Expr {
            range: self.range_from(start),
            kind,
        }
    }

    fn new_expr(&mut self) -> Expr {
        let start = self.start();
        self.bump();
        if self.at(K::Less) {
            let _ = self.type_args();
        }
        let ty_start = self.start();
        let annotations = self.type_annotations();
        let kind = if self.peek().is_primitive_type() {
            let kind = self.bump().kind;
            TypeRefKind::Primitive(primitive_of(kind))
        } else {
            self.named_type_kind()
        };
        let base = TypeRef {
            range: self.range_from(ty_start),
            annotations,
            kind,
        };

        if self.at(K::LBracket) {
            let mut dims = Vec::new();
            let mut count = 0u8;
            while self.at(K::LBracket) {
                self.bump();
                if !self.at(K::RBracket) {
                    dims.push(self.expr());
                }
                self.expect(K::RBracket, "`]`");
                count = count.saturating_add(1);
            }
            let ty = TypeRef {
                range: self.range_from(ty_start),
                annotations: Vec::new(),
                kind: TypeRefKind::Array {
                    element: Box::new(base),
                    dims: count,
                },
            };
            let init = self.at(K::LBrace).then(|| Box::new(self.array_init()));
            return Expr {
                range: self.range_from(start),
                kind: ExprKind::NewArray { ty, dims, init },
            };
        }

        let args = self.arg_list();
        let body = if self.at(K::LBrace) {
            let (range, _, members) = self.class_body(TypeDeclKind::Class);
            Some((range, members))
        } else {
            None
        };
        Expr {
            range: self.range_from(start),
            kind: ExprKind::New {
                ty: base,
                args,
                body,
            },
        }
    }

    fn arg_list(&mut self) -> ArgList {
        let start = self.start();
        self.expect(K::LParen, "`(`");
        let mut args = Vec::new();
        if !self.at(K::RParen) {
            loop {
                args.push(self.expr());
                if !self.eat(K::Comma) {
                    break;
                }
            }
        }
        self.expect(K::RParen, "`)`");
        ArgList {
            range: self.range_from(start),
            args,
        }
    }
}

fn primitive_of(kind: K) -> PrimitiveType {
    match kind {
        K::BooleanKw => PrimitiveType::Boolean,
        K::ByteKw => PrimitiveType::Byte,
        K::ShortKw => PrimitiveType::Short,
        K::LongKw => PrimitiveType::Long,
        K::CharKw => PrimitiveType::Char,
        K::FloatKw => PrimitiveType::Float,
        K::DoubleKw => PrimitiveType::Double,
        _ => PrimitiveType::Int,
    }
}

fn literal_of(kind: K) -> LiteralKind {
    match kind {
        K::LongLiteral => LiteralKind::Long,
        K::FloatLiteral => LiteralKind::Float,
        K::DoubleLiteral => LiteralKind::Double,
        K::CharLiteral => LiteralKind::Char,
        K::StringLiteral => LiteralKind::String,
        K::TextBlock => LiteralKind::TextBlock,
        K::TrueKw | K::FalseKw => LiteralKind::Boolean,
        K::NullKw => LiteralKind::Null,
        _ => LiteralKind::Int,
    }
}
