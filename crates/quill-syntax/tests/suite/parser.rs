use pretty_assertions::assert_eq;
use quill_syntax::ast::*;
use quill_syntax::parse;

fn method_body(unit: &CompilationUnit) -> &[Stmt] {
    let method = unit.types[0].methods().next().expect("method");
    &method.body.as_ref().expect("body").stmts
}

#[test]
fn class_members_and_signature() {
    let tree = parse(
        "package p;\n\nimport java.io.IOException;\n\nclass A<T> {\n    int x = 1, y;\n    void m(String s, int... rest) throws IOException { foo(); }\n}\n",
    );
    assert!(tree.errors().is_empty(), "{:?}", tree.errors());
    let unit = tree.unit();
    assert_eq!(unit.package.as_ref().map(|p| p.name.text.as_str()), Some("p"));
    assert_eq!(unit.imports.len(), 1);

    let class = &unit.types[0];
    assert_eq!(class.name.name, "A");
    assert_eq!(class.type_params.len(), 1);
    let field = class.fields().next().expect("field");
    let names: Vec<_> = field.declarators.iter().map(|d| d.name.name.as_str()).collect();
    assert_eq!(names, ["x", "y"]);

    let method = class.methods().next().expect("method");
    assert_eq!(method.name.name, "m");
    assert!(!method.returns_value());
    assert_eq!(method.params.len(), 2);
    assert!(method.params[1].varargs);
    assert_eq!(method.throws.len(), 1);
    assert_eq!(tree.slice(method.throws[0].range), "IOException");
}

#[test]
fn multi_catch_and_resources() {
    let tree = parse(
        "class A {\n    void m() {\n        try (InputStream in = open(); Reader r = wrap(in)) {\n            read(r);\n        } catch (IOException | RuntimeException e) {\n        } finally {\n            done();\n        }\n    }\n}\n",
    );
    assert!(tree.errors().is_empty(), "{:?}", tree.errors());
    let Stmt::Try(stmt) = &method_body(tree.unit())[0] else {
        panic!("expected try");
    };
    assert_eq!(stmt.resources.as_ref().map(|r| r.resources.len()), Some(2));
    assert_eq!(stmt.catches.len(), 1);
    assert!(stmt.catches[0].param.is_union());
    assert_eq!(
        tree.slice(stmt.catches[0].param.type_range()),
        "IOException | RuntimeException"
    );
    assert!(stmt.finally.is_some());
}

#[test]
fn switch_groups() {
    let tree = parse(
        "class A {\n    void m(int k) {\n        switch (k) {\n            case 1:\n            case 2:\n                a();\n                break;\n            case 3, 4:\n                b();\n                break;\n            default:\n                c();\n        }\n    }\n}\n",
    );
    assert!(tree.errors().is_empty(), "{:?}", tree.errors());
    let Stmt::Switch(stmt) = &method_body(tree.unit())[0] else {
        panic!("expected switch");
    };
    assert!(!stmt.body.uses_arrows());
    assert_eq!(stmt.body.groups.len(), 3);
    assert_eq!(stmt.body.groups[0].labels.len(), 2);
    assert_eq!(stmt.body.case_values().count(), 4);
    assert!(stmt.body.default_group().is_some());
}

#[test]
fn arrow_switch_expression() {
    let tree = parse(
        "class A {\n    int m(Color c) {\n        return switch (c) {\n            case RED -> 1;\n            case GREEN -> { yield 2; }\n            default -> throw new IllegalStateException();\n        };\n    }\n}\n",
    );
    assert!(tree.errors().is_empty(), "{:?}", tree.errors());
    let Stmt::Return(ret) = &method_body(tree.unit())[0] else {
        panic!("expected return");
    };
    let Some(Expr {
        kind: ExprKind::Switch { body, .. },
        ..
    }) = &ret.value
    else {
        panic!("expected switch expression");
    };
    assert!(body.uses_arrows());
    assert!(matches!(
        body.groups[2].body,
        SwitchGroupBody::Arrow(ArrowBody::Throw(_))
    ));
}

#[test]
fn nested_generics_and_diamond() {
    let tree = parse(
        "class A {\n    void m() {\n        Map<String, List<Integer>> m = new HashMap<>();\n        int s = x >> 2;\n    }\n}\n",
    );
    assert!(tree.errors().is_empty(), "{:?}", tree.errors());
    let body = method_body(tree.unit());
    let Stmt::LocalVar(decl) = &body[0] else {
        panic!("expected local");
    };
    let args = decl.ty.type_args().expect("type args");
    assert_eq!(args.args.len(), 2);
    let Some(Expr {
        kind: ExprKind::New { ty, .. },
        ..
    }) = &decl.declarators[0].init
    else {
        panic!("expected new");
    };
    assert!(ty.type_args().is_some_and(TypeArgs::is_diamond));

    let Stmt::LocalVar(shift) = &body[1] else {
        panic!("expected local");
    };
    assert!(matches!(
        shift.declarators[0].init.as_ref().map(|e| &e.kind),
        Some(ExprKind::Binary {
            op: BinaryOp::Shr,
            ..
        })
    ));
}

#[test]
fn if_chain_and_lambda() {
    let tree = parse(
        "class A {\n    void m(String s) {\n        if (s.equals(\"a\")) {\n            run(() -> go(s));\n        } else if (\"b\".equals(s)) {\n            stop();\n        } else {\n            wait();\n        }\n    }\n}\n",
    );
    assert!(tree.errors().is_empty(), "{:?}", tree.errors());
    let Stmt::If(stmt) = &method_body(tree.unit())[0] else {
        panic!("expected if");
    };
    assert!(matches!(
        stmt.else_branch.as_deref(),
        Some(Stmt::If(IfStmt {
            else_branch: Some(_),
            ..
        }))
    ));
}

#[test]
fn doc_comments_attach_to_declarations() {
    let tree = parse(
        "/** The type. */\nclass A {\n    /**\n     * Sum.\n     * @param a first\n     */\n    @Override\n    public int sum(int a) { return a; }\n}\n",
    );
    assert!(tree.errors().is_empty(), "{:?}", tree.errors());
    let class = &tree.unit().types[0];
    assert!(class.doc.as_ref().is_some_and(|d| d.is_single_line));
    let method = class.methods().next().expect("method");
    let doc = method.doc.as_ref().expect("doc");
    assert_eq!(doc.tags.len(), 1);
    assert_eq!(doc.tags[0].argument_text(), Some("a"));
    assert!(method.modifiers.annotation("Override").is_some());
}

#[test]
fn module_declaration() {
    let tree = parse(
        "module com.example {\n    requires transitive java.sql;\n    exports com.example.api;\n    uses com.example.Service;\n    provides com.example.Service with com.example.Impl;\n}\n",
    );
    assert!(tree.errors().is_empty(), "{:?}", tree.errors());
    let module = tree.unit().module.as_ref().expect("module");
    assert_eq!(module.name.text, "com.example");
    assert_eq!(module.directives.len(), 4);
    assert!(matches!(
        module.directives[0].kind,
        DirectiveKind::Requires {
            is_transitive: true,
            ..
        }
    ));
}

#[test]
fn malformed_input_reports_errors() {
    let tree = parse("class A { void m() { int = ; } }");
    assert!(!tree.errors().is_empty());
}

#[test]
fn missing_modifiers_are_empty_at_the_declaration_start() {
    let source = "class A {\n    void m() {\n        class Local {}\n    }\n}\n";
    let tree = parse(source);
    assert!(tree.errors().is_empty(), "{:?}", tree.errors());

    let method = tree.unit().types[0].methods().next().expect("method");
    assert!(method.modifiers.is_empty());
    assert!(method.modifiers.range.is_empty());
    assert_eq!(u32::from(method.modifiers.range.start()) as usize, source.find("void").unwrap());

    let Stmt::LocalClass(local) = &method_body(tree.unit())[0] else {
        panic!("expected a local class");
    };
    assert!(local.modifiers.is_empty());
    assert_eq!(u32::from(local.modifiers.range.start()) as usize, source.find("class Local").unwrap());
}
