//! Typed syntax tree.
//!
//! Every node owns its children and carries the byte range of its first to last significant
//! token. Comments never belong to a node's range; they are recovered from the token stream
//! through [`SyntaxTree`](crate::SyntaxTree) trivia queries. Doc comments are the exception:
//! declarations keep the doc comment that documents them in a `doc` field.
//!
//! Node kinds are closed enums so detectors match exhaustively.

use quill_core::TextRange;

use crate::javadoc::DocComment;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ident {
    pub name: String,
    pub range: TextRange,
}

/// A dotted name (`java.util.List`, `com.example.Service`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QualifiedName {
    pub text: String,
    pub range: TextRange,
}

impl QualifiedName {
    /// The last segment of the name.
    pub fn simple_name(&self) -> &str {
        simple_name(&self.text)
    }
}

/// The last segment of a dotted name.
pub fn simple_name(name: &str) -> &str {
    name.rsplit('.').next().unwrap_or(name)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilationUnit {
    pub range: TextRange,
    pub package: Option<PackageDecl>,
    pub imports: Vec<ImportDecl>,
    pub module: Option<ModuleDecl>,
    pub types: Vec<TypeDecl>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageDecl {
    pub range: TextRange,
    pub annotations: Vec<Annotation>,
    pub name: QualifiedName,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportDecl {
    pub range: TextRange,
    pub is_static: bool,
    pub name: QualifiedName,
    pub wildcard: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleDecl {
    pub range: TextRange,
    pub doc: Option<DocComment>,
    pub annotations: Vec<Annotation>,
    pub open: bool,
    pub name: QualifiedName,
    pub directives: Vec<ModuleDirective>,
    /// `{ ... }` including braces.
    pub body: TextRange,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleDirective {
    pub range: TextRange,
    pub kind: DirectiveKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectiveKind {
    Requires {
        is_static: bool,
        is_transitive: bool,
        module: QualifiedName,
    },
    Exports {
        package: QualifiedName,
        to: Vec<QualifiedName>,
    },
    Opens {
        package: QualifiedName,
        to: Vec<QualifiedName>,
    },
    Uses {
        service: QualifiedName,
    },
    Provides {
        service: QualifiedName,
        implementations: Vec<QualifiedName>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModifierKind {
    Public,
    Protected,
    Private,
    Static,
    Abstract,
    Final,
    Native,
    Synchronized,
    Transient,
    Volatile,
    Strictfp,
    Default,
    Sealed,
    NonSealed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Modifier {
    pub kind: ModifierKind,
    pub range: TextRange,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotation {
    pub range: TextRange,
    pub name: QualifiedName,
    /// `( ... )` including parentheses, when present.
    pub arguments: Option<TextRange>,
}

impl Annotation {
    pub fn simple_name(&self) -> &str {
        self.name.simple_name()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Modifiers {
    /// Empty at the declaration start when there are no modifiers.
    pub range: TextRange,
    pub annotations: Vec<Annotation>,
    pub keywords: Vec<Modifier>,
}

impl Modifiers {
    pub fn has(&self, kind: ModifierKind) -> bool {
        self.keywords.iter().any(|m| m.kind == kind)
    }

    pub fn annotation(&self, simple: &str) -> Option<&Annotation> {
        self.annotations.iter().find(|a| a.simple_name() == simple)
    }

    pub fn is_empty(&self) -> bool {
        self.annotations.is_empty() && self.keywords.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeDeclKind {
    Class,
    Interface,
    Enum,
    Record,
    Annotation,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDecl {
    pub range: TextRange,
    pub doc: Option<DocComment>,
    pub modifiers: Modifiers,
    pub kind: TypeDeclKind,
    pub name: Ident,
    pub type_params: Vec<TypeParam>,
    pub extends: Vec<TypeRef>,
    pub implements: Vec<TypeRef>,
    pub record_components: Vec<Param>,
    pub enum_constants: Vec<EnumConstant>,
    pub members: Vec<Member>,
    /// `{ ... }` including braces.
    pub body: TextRange,
}

impl TypeDecl {
    pub fn methods(&self) -> impl Iterator<Item = &MethodDecl> {
        self.members.iter().filter_map(|m| match m {
            Member::Method(m) => Some(m),
            _ => None,
        })
    }

    pub fn fields(&self) -> impl Iterator<Item = &FieldDecl> {
        self.members.iter().filter_map(|m| match m {
            Member::Field(f) => Some(f),
            _ => None,
        })
    }

    pub fn nested_types(&self) -> impl Iterator<Item = &TypeDecl> {
        self.members.iter().filter_map(|m| match m {
            Member::Type(t) => Some(t),
            _ => None,
        })
    }

    pub fn supertypes(&self) -> impl Iterator<Item = &TypeRef> {
        self.extends.iter().chain(self.implements.iter())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeParam {
    pub range: TextRange,
    pub name: Ident,
    pub bounds: Vec<TypeRef>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumConstant {
    pub range: TextRange,
    pub doc: Option<DocComment>,
    pub annotations: Vec<Annotation>,
    pub name: Ident,
    pub args: Option<ArgList>,
    pub body: Vec<Member>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Member {
    Field(FieldDecl),
    Method(MethodDecl),
    Type(TypeDecl),
    Initializer(Initializer),
}

impl Member {
    pub fn range(&self) -> TextRange {
        match self {
            Member::Field(f) => f.range,
            Member::Method(m) => m.range,
            Member::Type(t) => t.range,
            Member::Initializer(i) => i.range,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDecl {
    pub range: TextRange,
    pub doc: Option<DocComment>,
    pub modifiers: Modifiers,
    pub ty: TypeRef,
    pub declarators: Vec<VarDeclarator>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VarDeclarator {
    pub range: TextRange,
    pub name: Ident,
    /// Extra `[]` after the name (`int a[]`).
    pub dims: u8,
    pub init: Option<Expr>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDecl {
    pub range: TextRange,
    pub doc: Option<DocComment>,
    pub modifiers: Modifiers,
    pub type_params: Vec<TypeParam>,
    /// `None` for constructors.
    pub return_type: Option<TypeRef>,
    pub name: Ident,
    /// `( ... )` including parentheses.
    pub params_range: TextRange,
    pub params: Vec<Param>,
    /// The full `throws A, B` clause, keyword included.
    pub throws_range: Option<TextRange>,
    pub throws: Vec<TypeRef>,
    pub body: Option<Block>,
}

impl MethodDecl {
    pub fn is_constructor(&self) -> bool {
        self.return_type.is_none()
    }

    pub fn returns_value(&self) -> bool {
        self.return_type
            .as_ref()
            .is_some_and(|ty| !matches!(ty.kind, TypeRefKind::Void))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    pub range: TextRange,
    pub modifiers: Modifiers,
    pub ty: TypeRef,
    pub varargs: bool,
    pub name: Ident,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Initializer {
    pub range: TextRange,
    pub is_static: bool,
    pub body: Block,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveType {
    Boolean,
    Byte,
    Short,
    Int,
    Long,
    Char,
    Float,
    Double,
}

impl PrimitiveType {
    pub fn as_str(self) -> &'static str {
        match self {
            PrimitiveType::Boolean => "boolean",
            PrimitiveType::Byte => "byte",
            PrimitiveType::Short => "short",
            PrimitiveType::Int => "int",
            PrimitiveType::Long => "long",
            PrimitiveType::Char => "char",
            PrimitiveType::Float => "float",
            PrimitiveType::Double => "double",
        }
    }

    /// Literal text of the type's default value.
    pub fn default_value(self) -> &'static str {
        match self {
            PrimitiveType::Boolean => "false",
            PrimitiveType::Long => "0L",
            PrimitiveType::Float => "0.0f",
            PrimitiveType::Double => "0.0",
            PrimitiveType::Char => "'\\0'",
            PrimitiveType::Byte | PrimitiveType::Short | PrimitiveType::Int => "0",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeRef {
    pub range: TextRange,
    pub annotations: Vec<Annotation>,
    pub kind: TypeRefKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeRefKind {
    Primitive(PrimitiveType),
    Void,
    /// `var` in a local declaration.
    Var,
    Named {
        /// Dotted name without type arguments (`Map.Entry`).
        name: String,
        /// Type arguments of the last segment; `Some` with no arguments is a diamond.
        args: Option<TypeArgs>,
    },
    Array {
        element: Box<TypeRef>,
        dims: u8,
    },
    Wildcard {
        bound: Option<WildcardBound>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WildcardBound {
    pub is_extends: bool,
    pub ty: Box<TypeRef>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeArgs {
    /// `< ... >` including angle brackets.
    pub range: TextRange,
    pub args: Vec<TypeRef>,
}

impl TypeArgs {
    pub fn is_diamond(&self) -> bool {
        self.args.is_empty()
    }
}

impl TypeRef {
    /// Simple name of a named type (`Entry` for `Map.Entry<K, V>`).
    pub fn simple_name(&self) -> Option<&str> {
        match &self.kind {
            TypeRefKind::Named { name, .. } => Some(simple_name(name)),
            _ => None,
        }
    }

    pub fn type_args(&self) -> Option<&TypeArgs> {
        match &self.kind {
            TypeRefKind::Named { args, .. } => args.as_ref(),
            _ => None,
        }
    }

    pub fn primitive(&self) -> Option<PrimitiveType> {
        match self.kind {
            TypeRefKind::Primitive(p) => Some(p),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    /// `{ ... }` including braces.
    pub range: TextRange,
    pub stmts: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stmt {
    Block(Block),
    LocalVar(LocalVarDecl),
    LocalClass(Box<TypeDecl>),
    Expr(ExprStmt),
    If(IfStmt),
    Switch(SwitchStmt),
    While(WhileStmt),
    DoWhile(DoWhileStmt),
    For(ForStmt),
    ForEach(ForEachStmt),
    Return(ReturnStmt),
    Throw(ThrowStmt),
    Break(JumpStmt),
    Continue(JumpStmt),
    Yield(YieldStmt),
    Try(TryStmt),
    Labeled(LabeledStmt),
    Synchronized(SynchronizedStmt),
    Assert(AssertStmt),
    Empty(TextRange),
}

impl Stmt {
    pub fn range(&self) -> TextRange {
        match self {
            Stmt::Block(s) => s.range,
            Stmt::LocalVar(s) => s.range,
            Stmt::LocalClass(s) => s.range,
            Stmt::Expr(s) => s.range,
            Stmt::If(s) => s.range,
            Stmt::Switch(s) => s.range,
            Stmt::While(s) => s.range,
            Stmt::DoWhile(s) => s.range,
            Stmt::For(s) => s.range,
            Stmt::ForEach(s) => s.range,
            Stmt::Return(s) => s.range,
            Stmt::Throw(s) => s.range,
            Stmt::Break(s) => s.range,
            Stmt::Continue(s) => s.range,
            Stmt::Yield(s) => s.range,
            Stmt::Try(s) => s.range,
            Stmt::Labeled(s) => s.range,
            Stmt::Synchronized(s) => s.range,
            Stmt::Assert(s) => s.range,
            Stmt::Empty(range) => *range,
        }
    }

    /// Whether control never completes normally past this statement (`return`, `throw`,
    /// `break`, `continue`, `yield`, or a block ending in one of them).
    pub fn exits_unconditionally(&self) -> bool {
        match self {
            Stmt::Return(_)
            | Stmt::Throw(_)
            | Stmt::Break(_)
            | Stmt::Continue(_)
            | Stmt::Yield(_) => true,
            Stmt::Block(block) => block.stmts.last().is_some_and(Stmt::exits_unconditionally),
            Stmt::If(stmt) => match &stmt.else_branch {
                Some(else_branch) => {
                    stmt.then_branch.exits_unconditionally() && else_branch.exits_unconditionally()
                }
                None => false,
            },
            _ => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalVarDecl {
    pub range: TextRange,
    pub modifiers: Modifiers,
    pub ty: TypeRef,
    pub declarators: Vec<VarDeclarator>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExprStmt {
    pub range: TextRange,
    pub expr: Expr,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IfStmt {
    pub range: TextRange,
    pub condition: Expr,
    pub then_branch: Box<Stmt>,
    pub else_branch: Option<Box<Stmt>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwitchStmt {
    pub range: TextRange,
    pub selector: Expr,
    pub body: SwitchBody,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwitchBody {
    /// `{ ... }` including braces.
    pub range: TextRange,
    pub groups: Vec<SwitchGroup>,
}

impl SwitchBody {
    pub fn uses_arrows(&self) -> bool {
        self.groups
            .iter()
            .any(|g| matches!(g.body, SwitchGroupBody::Arrow(_)))
    }

    pub fn default_group(&self) -> Option<&SwitchGroup> {
        self.groups.iter().find(|g| g.has_default())
    }

    /// Case constants (as written) in label order.
    pub fn case_values(&self) -> impl Iterator<Item = &Expr> {
        self.groups
            .iter()
            .flat_map(|g| g.labels.iter())
            .flat_map(|l| match &l.kind {
                SwitchLabelKind::Case(values) => values.iter(),
                SwitchLabelKind::Default => [].iter(),
            })
    }
}

/// One or more labels and the statements (or arrow body) that follow them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwitchGroup {
    pub range: TextRange,
    pub labels: Vec<SwitchLabel>,
    pub body: SwitchGroupBody,
}

impl SwitchGroup {
    pub fn has_default(&self) -> bool {
        self.labels
            .iter()
            .any(|l| matches!(l.kind, SwitchLabelKind::Default))
    }

    pub fn statements(&self) -> &[Stmt] {
        match &self.body {
            SwitchGroupBody::Statements(stmts) => stmts,
            SwitchGroupBody::Arrow(_) => &[],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SwitchGroupBody {
    Statements(Vec<Stmt>),
    Arrow(ArrowBody),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArrowBody {
    /// `case X -> expr;` (range of the expression statement, `;` included).
    Expr(ExprStmt),
    Block(Block),
    Throw(ThrowStmt),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwitchLabel {
    /// From `case`/`default` to the `:` or `->` inclusive.
    pub range: TextRange,
    pub kind: SwitchLabelKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SwitchLabelKind {
    Case(Vec<Expr>),
    Default,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WhileStmt {
    pub range: TextRange,
    pub condition: Expr,
    pub body: Box<Stmt>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DoWhileStmt {
    pub range: TextRange,
    pub body: Box<Stmt>,
    pub condition: Expr,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForStmt {
    pub range: TextRange,
    pub init: Vec<Stmt>,
    pub condition: Option<Expr>,
    pub update: Vec<Expr>,
    pub body: Box<Stmt>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForEachStmt {
    pub range: TextRange,
    pub modifiers: Modifiers,
    pub ty: TypeRef,
    pub name: Ident,
    pub iterable: Expr,
    pub body: Box<Stmt>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReturnStmt {
    pub range: TextRange,
    pub value: Option<Expr>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThrowStmt {
    pub range: TextRange,
    pub value: Expr,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JumpStmt {
    pub range: TextRange,
    pub label: Option<Ident>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YieldStmt {
    pub range: TextRange,
    pub value: Expr,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TryStmt {
    pub range: TextRange,
    pub resources: Option<ResourceSpec>,
    pub body: Block,
    pub catches: Vec<CatchClause>,
    pub finally: Option<FinallyClause>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceSpec {
    /// `( ... )` including parentheses.
    pub range: TextRange,
    pub resources: Vec<Resource>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resource {
    pub range: TextRange,
    pub kind: ResourceKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceKind {
    Decl {
        modifiers: Modifiers,
        ty: TypeRef,
        name: Ident,
        init: Expr,
    },
    /// An effectively final variable or field access (`try (in) { ... }`).
    Expr(Expr),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatchClause {
    pub range: TextRange,
    pub param: CatchParam,
    pub body: Block,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatchParam {
    pub range: TextRange,
    pub modifiers: Modifiers,
    /// More than one type for a union (`A | B`).
    pub types: Vec<TypeRef>,
    pub name: Ident,
}

impl CatchParam {
    pub fn is_union(&self) -> bool {
        self.types.len() > 1
    }

    /// Range covering the (possibly union) type.
    pub fn type_range(&self) -> TextRange {
        match (self.types.first(), self.types.last()) {
            (Some(first), Some(last)) => first.range.cover(last.range),
            _ => self.name.range,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinallyClause {
    pub range: TextRange,
    pub body: Block,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabeledStmt {
    pub range: TextRange,
    pub label: Ident,
    pub body: Box<Stmt>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynchronizedStmt {
    pub range: TextRange,
    pub lock: Expr,
    pub body: Block,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssertStmt {
    pub range: TextRange,
    pub condition: Expr,
    pub message: Option<Expr>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgList {
    /// `( ... )` including parentheses.
    pub range: TextRange,
    pub args: Vec<Expr>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expr {
    pub range: TextRange,
    pub kind: ExprKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LiteralKind {
    Int,
    Long,
    Float,
    Double,
    Char,
    String,
    TextBlock,
    Boolean,
    Null,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Or,
    And,
    BitOr,
    BitXor,
    BitAnd,
    Eq,
    NotEq,
    Less,
    Greater,
    LessEq,
    GreaterEq,
    Shl,
    Shr,
    UShr,
    Add,
    Sub,
    Mul,
    Div,
    Rem,
}

impl BinaryOp {
    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            BinaryOp::Eq
                | BinaryOp::NotEq
                | BinaryOp::Less
                | BinaryOp::Greater
                | BinaryOp::LessEq
                | BinaryOp::GreaterEq
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    Not,
    Neg,
    Plus,
    BitNot,
    PreInc,
    PreDec,
    PostInc,
    PostDec,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssignOp {
    Assign,
    Compound,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LambdaBody {
    Expr(Box<Expr>),
    Block(Block),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExprKind {
    Literal(LiteralKind),
    /// A simple name (local, field, or the first segment of a qualified name).
    Name(String),
    This,
    Super,
    FieldAccess {
        target: Box<Expr>,
        name: Ident,
    },
    MethodCall {
        target: Option<Box<Expr>>,
        type_args: Option<TypeArgs>,
        name: Ident,
        args: ArgList,
    },
    New {
        ty: TypeRef,
        args: ArgList,
        /// Members of an anonymous class body, with the body range.
        body: Option<(TextRange, Vec<Member>)>,
    },
    NewArray {
        ty: TypeRef,
        dims: Vec<Expr>,
        init: Option<Box<Expr>>,
    },
    ArrayInit(Vec<Expr>),
    ArrayAccess {
        array: Box<Expr>,
        index: Box<Expr>,
    },
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Assign {
        op: AssignOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    Conditional {
        condition: Box<Expr>,
        then_expr: Box<Expr>,
        else_expr: Box<Expr>,
    },
    Cast {
        ty: TypeRef,
        expr: Box<Expr>,
    },
    InstanceOf {
        expr: Box<Expr>,
        ty: TypeRef,
        binding: Option<Ident>,
    },
    Paren(Box<Expr>),
    Lambda {
        params: Vec<Ident>,
        body: LambdaBody,
    },
    MethodRef {
        target: Box<Expr>,
        name: Ident,
    },
    ClassLiteral(TypeRef),
    Switch {
        selector: Box<Expr>,
        body: SwitchBody,
    },
    /// Placeholder produced by error recovery.
    Error,
}

impl Expr {
    /// Strip redundant parentheses.
    pub fn unparenthesized(&self) -> &Expr {
        let mut expr = self;
        while let ExprKind::Paren(inner) = &expr.kind {
            expr = inner;
        }
        expr
    }

    pub fn is_literal(&self) -> bool {
        matches!(self.kind, ExprKind::Literal(_))
    }

    /// Name expressions and field-access chains over names (`a`, `this.a`, `A.B.c`).
    pub fn is_name_like(&self) -> bool {
        match &self.kind {
            ExprKind::Name(_) | ExprKind::This => true,
            ExprKind::FieldAccess { target, .. } => target.is_name_like(),
            ExprKind::Paren(inner) => inner.is_name_like(),
            _ => false,
        }
    }

    /// The dotted text of a name-like expression.
    pub fn dotted_name(&self) -> Option<String> {
        match &self.kind {
            ExprKind::Name(name) => Some(name.clone()),
            ExprKind::This => Some("this".to_string()),
            ExprKind::FieldAccess { target, name } => {
                Some(format!("{}.{}", target.dotted_name()?, name.name))
            }
            _ => None,
        }
    }
}
