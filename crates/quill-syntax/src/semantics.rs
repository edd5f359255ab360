//! A light resolver answering the type questions assists ask.
//!
//! Types are identified by simple name. The hierarchy combines a built-in table of common JDK
//! types with the types declared in the unit. Anything the resolver cannot answer comes back
//! as `None`/[`JavaType::Unknown`] and callers are expected to decline.

use std::collections::{HashMap, HashSet, VecDeque};

use quill_core::{TextRange, TextRangeExt};

use crate::ast::*;
use crate::walk::{self, NodeRef};
use crate::SyntaxTree;

/// Direct supertypes of well-known JDK types.
const JDK_SUPERTYPES: &[(&str, &[&str])] = &[
    ("Object", &[]),
    ("Throwable", &["Object"]),
    ("Exception", &["Throwable"]),
    ("Error", &["Throwable"]),
    ("RuntimeException", &["Exception"]),
    ("IOException", &["Exception"]),
    ("FileNotFoundException", &["IOException"]),
    ("EOFException", &["IOException"]),
    ("MalformedURLException", &["IOException"]),
    ("UnsupportedEncodingException", &["IOException"]),
    ("UncheckedIOException", &["RuntimeException"]),
    ("InterruptedException", &["Exception"]),
    ("ReflectiveOperationException", &["Exception"]),
    ("ClassNotFoundException", &["ReflectiveOperationException"]),
    ("InstantiationException", &["ReflectiveOperationException"]),
    ("IllegalAccessException", &["ReflectiveOperationException"]),
    ("NoSuchMethodException", &["ReflectiveOperationException"]),
    ("NoSuchFieldException", &["ReflectiveOperationException"]),
    ("InvocationTargetException", &["ReflectiveOperationException"]),
    ("CloneNotSupportedException", &["Exception"]),
    ("SQLException", &["Exception"]),
    ("TimeoutException", &["Exception"]),
    ("ExecutionException", &["Exception"]),
    ("URISyntaxException", &["Exception"]),
    ("ParseException", &["Exception"]),
    ("GeneralSecurityException", &["Exception"]),
    ("IllegalArgumentException", &["RuntimeException"]),
    ("NumberFormatException", &["IllegalArgumentException"]),
    ("IllegalStateException", &["RuntimeException"]),
    ("NullPointerException", &["RuntimeException"]),
    ("UnsupportedOperationException", &["RuntimeException"]),
    ("IndexOutOfBoundsException", &["RuntimeException"]),
    ("ArrayIndexOutOfBoundsException", &["IndexOutOfBoundsException"]),
    ("StringIndexOutOfBoundsException", &["IndexOutOfBoundsException"]),
    ("ClassCastException", &["RuntimeException"]),
    ("ArithmeticException", &["RuntimeException"]),
    ("ConcurrentModificationException", &["RuntimeException"]),
    ("NoSuchElementException", &["RuntimeException"]),
    ("AssertionError", &["Error"]),
    ("VirtualMachineError", &["Error"]),
    ("OutOfMemoryError", &["VirtualMachineError"]),
    ("StackOverflowError", &["VirtualMachineError"]),
    ("AutoCloseable", &["Object"]),
    ("Closeable", &["AutoCloseable"]),
    ("InputStream", &["Closeable"]),
    ("FileInputStream", &["InputStream"]),
    ("FilterInputStream", &["InputStream"]),
    ("BufferedInputStream", &["FilterInputStream"]),
    ("DataInputStream", &["FilterInputStream"]),
    ("ByteArrayInputStream", &["InputStream"]),
    ("ObjectInputStream", &["InputStream"]),
    ("InflaterInputStream", &["FilterInputStream"]),
    ("GZIPInputStream", &["InflaterInputStream"]),
    ("ZipInputStream", &["InflaterInputStream"]),
    ("OutputStream", &["Closeable"]),
    ("FileOutputStream", &["OutputStream"]),
    ("FilterOutputStream", &["OutputStream"]),
    ("BufferedOutputStream", &["FilterOutputStream"]),
    ("DataOutputStream", &["FilterOutputStream"]),
    ("PrintStream", &["FilterOutputStream"]),
    ("ByteArrayOutputStream", &["OutputStream"]),
    ("ObjectOutputStream", &["OutputStream"]),
    ("Reader", &["Closeable"]),
    ("InputStreamReader", &["Reader"]),
    ("FileReader", &["InputStreamReader"]),
    ("BufferedReader", &["Reader"]),
    ("LineNumberReader", &["BufferedReader"]),
    ("StringReader", &["Reader"]),
    ("Writer", &["Closeable"]),
    ("OutputStreamWriter", &["Writer"]),
    ("FileWriter", &["OutputStreamWriter"]),
    ("BufferedWriter", &["Writer"]),
    ("PrintWriter", &["Writer"]),
    ("StringWriter", &["Writer"]),
    ("Scanner", &["Closeable"]),
    ("Socket", &["Closeable"]),
    ("ServerSocket", &["Closeable"]),
    ("RandomAccessFile", &["Closeable"]),
    ("ZipFile", &["Closeable"]),
    ("JarFile", &["ZipFile"]),
    ("Connection", &["AutoCloseable"]),
    ("Statement", &["AutoCloseable"]),
    ("PreparedStatement", &["Statement"]),
    ("CallableStatement", &["PreparedStatement"]),
    ("ResultSet", &["AutoCloseable"]),
    ("String", &["Object", "CharSequence", "Comparable"]),
    ("CharSequence", &["Object"]),
    ("StringBuilder", &["Object", "CharSequence"]),
    ("Number", &["Object"]),
    ("Integer", &["Number"]),
    ("Long", &["Number"]),
    ("Short", &["Number"]),
    ("Byte", &["Number"]),
    ("Double", &["Number"]),
    ("Float", &["Number"]),
    ("Character", &["Object"]),
    ("Boolean", &["Object"]),
    ("Iterable", &["Object"]),
    ("Collection", &["Iterable"]),
    ("List", &["Collection"]),
    ("ArrayList", &["List"]),
    ("LinkedList", &["List", "Deque"]),
    ("Set", &["Collection"]),
    ("HashSet", &["Set"]),
    ("LinkedHashSet", &["HashSet"]),
    ("TreeSet", &["Set"]),
    ("Deque", &["Collection"]),
    ("ArrayDeque", &["Deque"]),
    ("Map", &["Object"]),
    ("HashMap", &["Map"]),
    ("LinkedHashMap", &["HashMap"]),
    ("TreeMap", &["Map"]),
    ("Optional", &["Object"]),
    ("Enum", &["Object", "Comparable"]),
    ("Record", &["Object"]),
];

const JDK_ENUMS: &[(&str, &[&str])] = &[
    (
        "TimeUnit",
        &[
            "NANOSECONDS",
            "MICROSECONDS",
            "MILLISECONDS",
            "SECONDS",
            "MINUTES",
            "HOURS",
            "DAYS",
        ],
    ),
    (
        "DayOfWeek",
        &[
            "MONDAY",
            "TUESDAY",
            "WEDNESDAY",
            "THURSDAY",
            "FRIDAY",
            "SATURDAY",
            "SUNDAY",
        ],
    ),
    ("RetentionPolicy", &["SOURCE", "CLASS", "RUNTIME"]),
];

/// Known types outside the unit: direct supertypes and enum constants by simple name.
#[derive(Debug, Clone, Default)]
pub struct TypeEnvironment {
    supertypes: HashMap<String, Vec<String>>,
    enums: HashMap<String, Vec<String>>,
}

impl TypeEnvironment {
    /// An environment with no types at all.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The built-in JDK table.
    pub fn jdk() -> Self {
        let mut env = Self::empty();
        for (name, supers) in JDK_SUPERTYPES {
            env.add_type(name, supers.iter().copied());
        }
        for (name, constants) in JDK_ENUMS {
            env.add_enum(name, constants.iter().copied());
        }
        env
    }

    pub fn add_type<'s>(&mut self, name: &str, supertypes: impl IntoIterator<Item = &'s str>) {
        self.supertypes.insert(
            name.to_string(),
            supertypes.into_iter().map(str::to_string).collect(),
        );
    }

    pub fn add_enum<'s>(&mut self, name: &str, constants: impl IntoIterator<Item = &'s str>) {
        self.supertypes
            .entry(name.to_string())
            .or_insert_with(|| vec!["Enum".to_string()]);
        self.enums.insert(
            name.to_string(),
            constants.into_iter().map(str::to_string).collect(),
        );
    }

    pub fn contains(&self, name: &str) -> bool {
        self.supertypes.contains_key(name)
    }
}

/// Static type of an expression or declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JavaType {
    Primitive(PrimitiveType),
    /// A class, interface or enum type.
    Reference {
        /// Simple name (`List` for `java.util.List<String>`).
        name: String,
        /// Spelling usable in a declaration (`List<String>`).
        text: String,
    },
    Array {
        element: Box<JavaType>,
        text: String,
    },
    Null,
    Unknown,
}

impl JavaType {
    pub fn reference(name: &str) -> Self {
        JavaType::Reference {
            name: name.to_string(),
            text: name.to_string(),
        }
    }

    pub fn from_type_ref(ty: &TypeRef, source: &str) -> Self {
        let text = type_text(ty, source);
        match &ty.kind {
            TypeRefKind::Primitive(p) => JavaType::Primitive(*p),
            TypeRefKind::Named { name, args } => {
                let text = match args {
                    // `new Foo<>()` has no usable spelling for its arguments.
                    Some(args) if args.is_diamond() => text.replace("<>", ""),
                    _ => text,
                };
                JavaType::Reference {
                    name: simple_name(name).to_string(),
                    text,
                }
            }
            TypeRefKind::Array { element, .. } => JavaType::Array {
                element: Box::new(JavaType::from_type_ref(element, source)),
                text,
            },
            TypeRefKind::Void | TypeRefKind::Var | TypeRefKind::Wildcard { .. } => JavaType::Unknown,
        }
    }

    pub fn simple_name(&self) -> Option<&str> {
        match self {
            JavaType::Primitive(p) => Some(p.as_str()),
            JavaType::Reference { name, .. } => Some(name),
            _ => None,
        }
    }

    /// Spelling for a declaration of this type.
    pub fn text(&self) -> Option<&str> {
        match self {
            JavaType::Primitive(p) => Some(p.as_str()),
            JavaType::Reference { text, .. } | JavaType::Array { text, .. } => Some(text),
            JavaType::Null | JavaType::Unknown => None,
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, JavaType::Unknown)
    }

    /// Literal text of the type's default value (`0`, `false`, `null`).
    pub fn default_value(&self) -> &'static str {
        match self {
            JavaType::Primitive(p) => p.default_value(),
            _ => "null",
        }
    }
}

/// Source spelling of a type without its annotations.
pub fn type_text(ty: &TypeRef, source: &str) -> String {
    let start = ty.annotations.last().map_or(ty.range.start_offset(), |a| a.range.end_offset());
    TextRange::from_offsets(start.min(ty.range.end_offset()), ty.range.end_offset())
        .slice(source)
        .trim()
        .to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclarationKind {
    Field,
    Parameter,
    Local,
    EnumConstant,
}

/// A variable visible at some offset.
#[derive(Debug, Clone, Copy)]
pub struct Declaration<'a> {
    pub name: &'a str,
    pub name_range: TextRange,
    pub kind: DeclarationKind,
    /// `None` for lambda parameters without a declared type.
    pub ty: Option<&'a TypeRef>,
    pub init: Option<&'a Expr>,
    /// Range of the declaring statement or member.
    pub decl_range: TextRange,
}

pub struct Semantics<'a> {
    tree: &'a SyntaxTree,
    env: TypeEnvironment,
    types: Vec<&'a TypeDecl>,
}

impl<'a> Semantics<'a> {
    pub fn new(tree: &'a SyntaxTree) -> Self {
        Self::with_environment(tree, TypeEnvironment::jdk())
    }

    pub fn with_environment(tree: &'a SyntaxTree, mut env: TypeEnvironment) -> Self {
        let mut types = Vec::new();
        walk::walk(tree.root(), &mut |node| {
            if let NodeRef::Type(decl) = node {
                types.push(decl);
            }
            true
        });
        for decl in &types {
            let mut supers: Vec<&str> = decl.supertypes().filter_map(TypeRef::simple_name).collect();
            if decl.kind == TypeDeclKind::Enum {
                env.add_enum(&decl.name.name, decl.enum_constants.iter().map(|c| c.name.name.as_str()));
                supers.push("Enum");
            } else if decl.kind == TypeDeclKind::Record {
                supers.push("Record");
            } else if supers.is_empty() {
                supers.push("Object");
            }
            env.add_type(&decl.name.name, supers);
        }
        Self { tree, env, types }
    }

    pub fn tree(&self) -> &'a SyntaxTree {
        self.tree
    }

    pub fn source(&self) -> &'a str {
        self.tree.text()
    }

    pub fn is_known_type(&self, name: &str) -> bool {
        self.env.contains(name)
    }

    /// Reflexive, transitive subtype check by simple name.
    pub fn is_subtype(&self, sub: &str, sup: &str) -> bool {
        if sub == sup {
            return true;
        }
        let mut seen = HashSet::new();
        let mut queue = VecDeque::from([sub.to_string()]);
        while let Some(name) = queue.pop_front() {
            if !seen.insert(name.clone()) {
                continue;
            }
            for parent in self.env.supertypes.get(&name).into_iter().flatten() {
                if parent == sup {
                    return true;
                }
                queue.push_back(parent.clone());
            }
        }
        false
    }

    /// Whether two types are related either way.
    pub fn are_related(&self, a: &str, b: &str) -> bool {
        self.is_subtype(a, b) || self.is_subtype(b, a)
    }

    pub fn is_checked_exception(&self, name: &str) -> bool {
        self.is_subtype(name, "Throwable")
            && !self.is_subtype(name, "RuntimeException")
            && !self.is_subtype(name, "Error")
    }

    pub fn is_closeable(&self, ty: &JavaType) -> bool {
        match ty {
            JavaType::Reference { name, .. } => self.is_subtype(name, "AutoCloseable"),
            _ => false,
        }
    }

    pub fn enum_constants(&self, name: &str) -> Option<&[String]> {
        self.env.enums.get(name).map(Vec::as_slice)
    }

    pub fn is_enum(&self, ty: &JavaType) -> bool {
        ty.simple_name().is_some_and(|n| self.env.enums.contains_key(n))
    }

    /// Types declared in the unit (nested and local ones included), in source order.
    pub fn declared_types(&self) -> &[&'a TypeDecl] {
        &self.types
    }

    pub fn find_type(&self, name: &str) -> Option<&'a TypeDecl> {
        self.types.iter().copied().find(|t| t.name.name == name)
    }

    /// Root-to-leaf node path at `range`; empty when the tree is inconsistent there.
    pub fn path_at(&self, range: TextRange) -> Vec<NodeRef<'a>> {
        self.tree.covering_path(range).unwrap_or_default()
    }

    /// Enclosing type declarations, outermost first.
    pub fn enclosing_types(&self, offset: usize) -> Vec<&'a TypeDecl> {
        self.path_at(TextRange::empty_at(offset))
            .into_iter()
            .filter_map(|n| match n {
                NodeRef::Type(t) => Some(t),
                _ => None,
            })
            .collect()
    }

    /// Variables visible at `offset`, outermost first; later entries shadow earlier ones.
    pub fn visible_declarations(&self, offset: usize) -> Vec<Declaration<'a>> {
        let mut out = Vec::new();
        let path = self.path_at(TextRange::empty_at(offset));
        for node in &path {
            match *node {
                NodeRef::Type(decl) => {
                    for constant in &decl.enum_constants {
                        out.push(Declaration {
                            name: &constant.name.name,
                            name_range: constant.name.range,
                            kind: DeclarationKind::EnumConstant,
                            ty: None,
                            init: None,
                            decl_range: constant.range,
                        });
                    }
                    for param in &decl.record_components {
                        out.push(param_declaration(param, DeclarationKind::Field));
                    }
                    for field in decl.fields() {
                        for declarator in &field.declarators {
                            out.push(Declaration {
                                name: &declarator.name.name,
                                name_range: declarator.name.range,
                                kind: DeclarationKind::Field,
                                ty: Some(&field.ty),
                                init: declarator.init.as_ref(),
                                decl_range: field.range,
                            });
                        }
                    }
                }
                NodeRef::Method(method) => {
                    out.extend(
                        method
                            .params
                            .iter()
                            .map(|p| param_declaration(p, DeclarationKind::Parameter)),
                    );
                }
                NodeRef::Block(block) => push_locals(&mut out, &block.stmts, offset),
                NodeRef::SwitchGroup(group) => push_locals(&mut out, group.statements(), offset),
                NodeRef::Catch(clause) => {
                    if let Some(ty) = clause.param.types.first() {
                        out.push(Declaration {
                            name: &clause.param.name.name,
                            name_range: clause.param.name.range,
                            kind: DeclarationKind::Local,
                            ty: (!clause.param.is_union()).then_some(ty),
                            init: None,
                            decl_range: clause.param.range,
                        });
                    }
                }
                NodeRef::Stmt(stmt) => match stmt {
                    Stmt::Block(block) => push_locals(&mut out, &block.stmts, offset),
                    Stmt::For(stmt) => push_locals(&mut out, &stmt.init, usize::MAX),
                    Stmt::ForEach(stmt) if stmt.body.range().contains_offset_inclusive(offset) => {
                        out.push(Declaration {
                            name: &stmt.name.name,
                            name_range: stmt.name.range,
                            kind: DeclarationKind::Local,
                            ty: Some(&stmt.ty),
                            init: None,
                            decl_range: stmt.range,
                        });
                    }
                    Stmt::Try(stmt) => {
                        for resource in stmt.resources.iter().flat_map(|s| s.resources.iter()) {
                            if resource.range.end_offset() > offset {
                                break;
                            }
                            if let ResourceKind::Decl { ty, name, init, .. } = &resource.kind {
                                out.push(Declaration {
                                    name: &name.name,
                                    name_range: name.range,
                                    kind: DeclarationKind::Local,
                                    ty: Some(ty),
                                    init: Some(init),
                                    decl_range: resource.range,
                                });
                            }
                        }
                    }
                    _ => {}
                },
                NodeRef::Expr(Expr {
                    kind: ExprKind::Lambda { params, .. },
                    range,
                }) => {
                    for param in params {
                        out.push(Declaration {
                            name: &param.name,
                            name_range: param.range,
                            kind: DeclarationKind::Parameter,
                            ty: None,
                            init: None,
                            decl_range: *range,
                        });
                    }
                }
                _ => {}
            }
        }
        out
    }

    pub fn declaration(&self, name: &str, offset: usize) -> Option<Declaration<'a>> {
        self.visible_declarations(offset)
            .into_iter()
            .rev()
            .find(|d| d.name == name)
    }

    /// Every variable name declared in the method (or initializer) enclosing `offset`, plus
    /// the fields of the enclosing types. Used to pick fresh names.
    pub fn names_in_scope(&self, offset: usize) -> HashSet<String> {
        let mut names: HashSet<String> = self
            .visible_declarations(offset)
            .into_iter()
            .map(|d| d.name.to_string())
            .collect();
        let path = self.path_at(TextRange::empty_at(offset));
        let body = path.iter().rev().find_map(|n| match n {
            NodeRef::Method(m) => m.body.as_ref().map(NodeRef::Block),
            NodeRef::Initializer(i) => Some(NodeRef::Block(&i.body)),
            _ => None,
        });
        if let Some(body) = body {
            walk::walk(body, &mut |node| {
                match node {
                    NodeRef::Declarator(d) => {
                        names.insert(d.name.name.clone());
                    }
                    NodeRef::Stmt(Stmt::ForEach(s)) => {
                        names.insert(s.name.name.clone());
                    }
                    NodeRef::Catch(c) => {
                        names.insert(c.param.name.name.clone());
                    }
                    NodeRef::Resource(Resource {
                        kind: ResourceKind::Decl { name, .. },
                        ..
                    }) => {
                        names.insert(name.name.clone());
                    }
                    NodeRef::Expr(Expr {
                        kind: ExprKind::Lambda { params, .. },
                        ..
                    }) => {
                        names.extend(params.iter().map(|p| p.name.clone()));
                    }
                    _ => {}
                }
                true
            });
        }
        names
    }

    /// Static type of `expr`, resolving names at the expression's position.
    pub fn type_of(&self, expr: &Expr) -> JavaType {
        let source = self.source();
        match &expr.kind {
            ExprKind::Literal(kind) => match kind {
                LiteralKind::Int => JavaType::Primitive(PrimitiveType::Int),
                LiteralKind::Long => JavaType::Primitive(PrimitiveType::Long),
                LiteralKind::Float => JavaType::Primitive(PrimitiveType::Float),
                LiteralKind::Double => JavaType::Primitive(PrimitiveType::Double),
                LiteralKind::Char => JavaType::Primitive(PrimitiveType::Char),
                LiteralKind::Boolean => JavaType::Primitive(PrimitiveType::Boolean),
                LiteralKind::String | LiteralKind::TextBlock => JavaType::reference("String"),
                LiteralKind::Null => JavaType::Null,
            },
            ExprKind::Name(name) => match self.declaration(name, expr.range.start_offset()) {
                Some(decl) => self.declaration_type(&decl),
                None => JavaType::Unknown,
            },
            ExprKind::This => self
                .enclosing_types(expr.range.start_offset())
                .last()
                .map_or(JavaType::Unknown, |t| JavaType::reference(&t.name.name)),
            ExprKind::FieldAccess { target, name } => {
                if let Some(qualifier) = target.dotted_name() {
                    if self
                        .enum_constants(simple_name(&qualifier))
                        .is_some_and(|c| c.contains(&name.name))
                    {
                        return JavaType::reference(simple_name(&qualifier));
                    }
                }
                let owner = self.type_of(target);
                if name.name == "length" && matches!(owner, JavaType::Array { .. }) {
                    return JavaType::Primitive(PrimitiveType::Int);
                }
                owner
                    .simple_name()
                    .and_then(|owner| self.find_type(owner))
                    .and_then(|decl| {
                        decl.fields()
                            .find(|f| f.declarators.iter().any(|d| d.name.name == name.name))
                    })
                    .map_or(JavaType::Unknown, |f| JavaType::from_type_ref(&f.ty, source))
            }
            ExprKind::MethodCall {
                target, name, args, ..
            } => self.call_type(expr.range.start_offset(), target.as_deref(), &name.name, args.args.len()),
            ExprKind::New { ty, .. } => JavaType::from_type_ref(ty, source),
            ExprKind::NewArray { ty, .. } => JavaType::from_type_ref(ty, source),
            ExprKind::Cast { ty, .. } => JavaType::from_type_ref(ty, source),
            ExprKind::Paren(inner) => self.type_of(inner),
            ExprKind::Conditional { then_expr, .. } => self.type_of(then_expr),
            ExprKind::Assign { lhs, .. } => self.type_of(lhs),
            ExprKind::InstanceOf { .. } => JavaType::Primitive(PrimitiveType::Boolean),
            ExprKind::ClassLiteral(_) => JavaType::reference("Class"),
            ExprKind::ArrayAccess { array, .. } => match self.type_of(array) {
                JavaType::Array { element, .. } => *element,
                _ => JavaType::Unknown,
            },
            ExprKind::Unary { op, operand } => match op {
                UnaryOp::Not => JavaType::Primitive(PrimitiveType::Boolean),
                _ => self.type_of(operand),
            },
            ExprKind::Binary { op, lhs, rhs } => self.binary_type(*op, lhs, rhs),
            ExprKind::Super
            | ExprKind::ArrayInit(_)
            | ExprKind::Lambda { .. }
            | ExprKind::MethodRef { .. }
            | ExprKind::Switch { .. }
            | ExprKind::Error => JavaType::Unknown,
        }
    }

    pub fn declaration_type(&self, decl: &Declaration<'a>) -> JavaType {
        if decl.kind == DeclarationKind::EnumConstant {
            return self
                .enclosing_types(decl.decl_range.start_offset())
                .last()
                .map_or(JavaType::Unknown, |t| JavaType::reference(&t.name.name));
        }
        match decl.ty {
            Some(ty) if matches!(ty.kind, TypeRefKind::Var) => {
                decl.init.map_or(JavaType::Unknown, |init| self.type_of(init))
            }
            Some(ty) => JavaType::from_type_ref(ty, self.source()),
            None => JavaType::Unknown,
        }
    }

    fn binary_type(&self, op: BinaryOp, lhs: &Expr, rhs: &Expr) -> JavaType {
        use PrimitiveType::*;

        if op.is_comparison() || matches!(op, BinaryOp::And | BinaryOp::Or) {
            return JavaType::Primitive(Boolean);
        }
        let (l, r) = (self.type_of(lhs), self.type_of(rhs));
        let is_string = |t: &JavaType| t.simple_name() == Some("String");
        if op == BinaryOp::Add && (is_string(&l) || is_string(&r)) {
            return JavaType::reference("String");
        }
        match (l, r) {
            (JavaType::Primitive(a), JavaType::Primitive(b)) => {
                if matches!(op, BinaryOp::Shl | BinaryOp::Shr | BinaryOp::UShr) {
                    return JavaType::Primitive(if a == Long { Long } else { Int });
                }
                let widest = [Double, Float, Long, Boolean]
                    .into_iter()
                    .find(|p| *p == a || *p == b)
                    .unwrap_or(Int);
                JavaType::Primitive(widest)
            }
            _ => JavaType::Unknown,
        }
    }

    fn call_type(&self, offset: usize, target: Option<&Expr>, name: &str, argc: usize) -> JavaType {
        let owner = match target {
            None => self.enclosing_types(offset).into_iter().rev().find_map(|t| {
                t.methods()
                    .find(|m| m.name.name == name && m.params.len() == argc)
                    .and_then(|m| m.return_type.as_ref())
            }),
            Some(Expr {
                kind: ExprKind::This,
                ..
            }) => self
                .enclosing_types(offset)
                .into_iter()
                .last()
                .and_then(|t| t.methods().find(|m| m.name.name == name && m.params.len() == argc))
                .and_then(|m| m.return_type.as_ref()),
            Some(target) => {
                let ty = self.type_of(target);
                ty.simple_name()
                    .and_then(|n| self.find_type(n))
                    .and_then(|t| t.methods().find(|m| m.name.name == name && m.params.len() == argc))
                    .and_then(|m| m.return_type.as_ref())
            }
        };
        if let Some(ret) = owner {
            return JavaType::from_type_ref(ret, self.source());
        }
        match (name, argc) {
            ("toString" | "name" | "trim" | "toUpperCase" | "toLowerCase" | "substring", _) => {
                JavaType::reference("String")
            }
            ("equals" | "isEmpty" | "contains" | "startsWith" | "endsWith", _) => {
                JavaType::Primitive(PrimitiveType::Boolean)
            }
            ("length" | "size" | "hashCode" | "ordinal" | "compareTo" | "indexOf", _) => {
                JavaType::Primitive(PrimitiveType::Int)
            }
            ("charAt", 1) => JavaType::Primitive(PrimitiveType::Char),
            _ => JavaType::Unknown,
        }
    }

    /// Methods overridden by `method` declared in `owner`: same name and parameter types, found
    /// in the unit's supertypes of `owner` (transitively), nearest first.
    pub fn overridden_methods(
        &self,
        owner: &TypeDecl,
        method: &MethodDecl,
    ) -> Vec<(&'a TypeDecl, &'a MethodDecl)> {
        let source = self.source();
        let signature: Vec<String> = method.params.iter().map(|p| erased(&p.ty, source)).collect();
        let mut out = Vec::new();
        let mut seen = HashSet::new();
        let mut queue: VecDeque<&str> = owner.supertypes().filter_map(TypeRef::simple_name).collect();
        while let Some(name) = queue.pop_front() {
            if !seen.insert(name.to_string()) {
                continue;
            }
            let Some(decl) = self.find_type(name) else {
                continue;
            };
            for candidate in decl.methods() {
                let same_params = candidate.params.len() == signature.len()
                    && candidate
                        .params
                        .iter()
                        .zip(&signature)
                        .all(|(p, s)| erased(&p.ty, source) == *s);
                if candidate.name.name == method.name.name && same_params && !candidate.is_constructor() {
                    out.push((decl, candidate));
                }
            }
            queue.extend(decl.supertypes().filter_map(TypeRef::simple_name));
        }
        out
    }
}

/// Parameter type key for override matching: simple name plus array dimensions.
fn erased(ty: &TypeRef, source: &str) -> String {
    match &ty.kind {
        TypeRefKind::Named { name, .. } => simple_name(name).to_string(),
        TypeRefKind::Array { element, dims } => {
            format!("{}{}", erased(element, source), "[]".repeat(usize::from(*dims)))
        }
        _ => type_text(ty, source),
    }
}

fn param_declaration(param: &Param, kind: DeclarationKind) -> Declaration<'_> {
    Declaration {
        name: &param.name.name,
        name_range: param.name.range,
        kind,
        ty: Some(&param.ty),
        init: None,
        decl_range: param.range,
    }
}

fn push_locals<'a>(out: &mut Vec<Declaration<'a>>, stmts: &'a [Stmt], offset: usize) {
    for stmt in stmts {
        if stmt.range().start_offset() >= offset {
            break;
        }
        if let Stmt::LocalVar(decl) = stmt {
            for declarator in &decl.declarators {
                out.push(Declaration {
                    name: &declarator.name.name,
                    name_range: declarator.name.range,
                    kind: DeclarationKind::Local,
                    ty: Some(&decl.ty),
                    init: declarator.init.as_ref(),
                    decl_range: decl.range,
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;

    #[test]
    fn exception_hierarchy() {
        let tree = parse("class MyException extends IOException {}");
        let sema = Semantics::new(&tree);
        assert!(sema.is_subtype("FileNotFoundException", "Exception"));
        assert!(sema.is_subtype("MyException", "IOException"));
        assert!(sema.is_checked_exception("MyException"));
        assert!(!sema.is_checked_exception("IllegalStateException"));
        assert!(!sema.are_related("IOException", "SQLException"));
    }

    #[test]
    fn resolves_local_and_field_types() {
        let source = "class A {\n    String name;\n    void m(int count) {\n        char c = 'x';\n        var s = \"a\";\n        use(c, s, count, name);\n    }\n}";
        let tree = parse(source);
        let sema = Semantics::new(&tree);
        let offset = source.find("use(").unwrap();
        let ty = |n: &str| {
            let decl = sema.declaration(n, offset).unwrap();
            sema.declaration_type(&decl)
        };
        assert_eq!(ty("c"), JavaType::Primitive(PrimitiveType::Char));
        assert_eq!(ty("s").simple_name(), Some("String"));
        assert_eq!(ty("count"), JavaType::Primitive(PrimitiveType::Int));
        assert_eq!(ty("name").simple_name(), Some("String"));
        assert!(sema.names_in_scope(offset).contains("c"));
    }

    #[test]
    fn enum_constants_from_unit_and_jdk() {
        let tree = parse("enum Color { RED, GREEN, BLUE }");
        let sema = Semantics::new(&tree);
        assert_eq!(sema.enum_constants("Color").unwrap(), ["RED", "GREEN", "BLUE"]);
        assert_eq!(sema.enum_constants("TimeUnit").map(<[String]>::len), Some(7));
    }
}
