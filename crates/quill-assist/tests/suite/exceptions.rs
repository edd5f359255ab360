use pretty_assertions::assert_eq;
use quill_assist::{assists, AssistRequest};
use quill_config::QuillConfig;
use quill_core::{Diagnostic, ProblemCode, TextRange, TextRangeExt};
use quill_syntax::{parse, Semantics};
use quill_test_utils::extract_selection;

use super::{config_with_release, find, fixes_for, labels};

const UNHANDLED: &str = r#"class A {
    void m(String path) {
        String text = /*start*/load(path)/*end*/;
        use(text);
    }
}
"#;

#[test]
fn unhandled_exception_offers_throws_first() {
    let (_, proposals) = fixes_for(
        UNHANDLED,
        ProblemCode::UnhandledException,
        &["IOException"],
        &QuillConfig::default(),
    );
    assert_eq!(labels(&proposals), ["Add throws declaration", "Surround with try/catch"]);
    assert_eq!(
        proposals[0].preview(),
        r#"class A {
    void m(String path) throws IOException {
        String text = load(path);
        use(text);
    }
}
"#
    );
}

#[test]
fn surround_splits_a_declaration_used_later() {
    let (_, proposals) = fixes_for(
        UNHANDLED,
        ProblemCode::UnhandledException,
        &["IOException"],
        &QuillConfig::default(),
    );
    let surround = find(&proposals, "Surround with try/catch");
    assert_eq!(
        surround.preview(),
        r#"class A {
    void m(String path) {
        String text = null;
        try {
            text = load(path);
        } catch (IOException e) {
        }
        use(text);
    }
}
"#
    );
}

#[test]
fn existing_throws_clause_is_extended() {
    let (_, proposals) = fixes_for(
        r#"class A {
    void m() throws SQLException {
        /*start*/load()/*end*/;
    }
}
"#,
        ProblemCode::UnhandledException,
        &["IOException"],
        &QuillConfig::default(),
    );
    let throws = find(&proposals, "Add throws declaration");
    assert!(throws
        .preview()
        .contains("void m() throws SQLException, IOException {"));
}

#[test]
fn subtype_of_declared_exception_needs_no_throws() {
    let (_, proposals) = fixes_for(
        r#"class A {
    void m() throws IOException {
        /*start*/open()/*end*/;
    }
}
"#,
        ProblemCode::UnhandledException,
        &["FileNotFoundException"],
        &QuillConfig::default(),
    );
    assert!(!labels(&proposals).contains(&"Add throws declaration"));
}

const INSIDE_TRY: &str = r#"class A {
    void m() {
        try {
            open();
            /*start*/read()/*end*/;
        } catch (SQLException e) {
        }
    }
}
"#;

#[test]
fn catch_clause_is_appended_to_surrounding_try() {
    let (_, proposals) = fixes_for(
        INSIDE_TRY,
        ProblemCode::UnhandledException,
        &["IOException"],
        &QuillConfig::default(),
    );
    let add = find(&proposals, "Add catch clause to surrounding try");
    assert_eq!(
        add.preview(),
        r#"class A {
    void m() {
        try {
            open();
            read();
        } catch (SQLException e) {
        } catch (IOException e) {
        }
    }
}
"#
    );
}

#[test]
fn exception_joins_existing_catch_as_union() {
    let (_, proposals) = fixes_for(
        INSIDE_TRY,
        ProblemCode::UnhandledException,
        &["IOException"],
        &QuillConfig::default(),
    );
    let join = find(&proposals, "Add exception to existing catch clause");
    assert!(join
        .preview()
        .contains("} catch (SQLException | IOException e) {"));
}

#[test]
fn union_fix_needs_multi_catch() {
    let (_, proposals) = fixes_for(
        INSIDE_TRY,
        ProblemCode::UnhandledException,
        &["IOException"],
        &config_with_release(6),
    );
    let labels = labels(&proposals);
    assert!(labels.contains(&"Add catch clause to surrounding try"));
    assert!(!labels.contains(&"Add exception to existing catch clause"));
}

#[test]
fn missing_exception_argument_declines() {
    let (_, proposals) = fixes_for(UNHANDLED, ProblemCode::UnhandledException, &[], &QuillConfig::default());
    assert!(proposals.is_empty(), "{:?}", labels(&proposals));
}

#[test]
fn a_diagnostic_without_fixes_does_not_hide_later_ones() {
    let (text, selection) = extract_selection(
        r#"class A {
    void m() {
        /*start*/first();
        second();/*end*/
    }
}
"#,
    );
    let tree = parse(&text);
    let sema = Semantics::new(&tree);
    let call = |name: &str| {
        let start = text.find(name).expect("call in fixture");
        TextRange::from_offsets(start, start + name.len())
    };
    let diagnostics = [
        Diagnostic::error(ProblemCode::UnhandledException, call("first()")),
        Diagnostic::error(ProblemCode::UnhandledException, call("second()")).with_argument("IOException"),
    ];

    let proposals = assists(
        &tree,
        &sema,
        &diagnostics,
        AssistRequest::Selection(selection),
        &QuillConfig::default(),
    )
    .expect("assists must succeed");
    let throws = find(&proposals, "Add throws declaration");
    assert!(throws.preview().contains("void m() throws IOException {"), "{}", throws.preview());
}

#[test]
fn lone_unneeded_catch_unwraps_the_try() {
    let (_, proposals) = fixes_for(
        r#"class A {
    void m() {
        try {
            run();
        } catch (/*start*/IOException/*end*/ e) {
            log(e);
        }
    }
}
"#,
        ProblemCode::UnneededCatch,
        &["IOException"],
        &QuillConfig::default(),
    );
    let remove = find(&proposals, "Remove surrounding 'try' block");
    assert_eq!(
        remove.preview(),
        r#"class A {
    void m() {
        run();
    }
}
"#
    );
}

#[test]
fn unneeded_alternative_leaves_the_union() {
    let (_, proposals) = fixes_for(
        r#"class A {
    void m() {
        try {
            run();
        } catch (IOException | /*start*/SQLException/*end*/ e) {
            log(e);
        }
    }
}
"#,
        ProblemCode::UnneededCatch,
        &["SQLException"],
        &QuillConfig::default(),
    );
    let remove = find(&proposals, "Remove 'SQLException' from catch clause");
    assert!(remove.preview().contains("} catch (IOException e) {"));
}

#[test]
fn one_of_several_catches_is_removed() {
    let (_, proposals) = fixes_for(
        r#"class A {
    void m() {
        try {
            run();
        } catch (/*start*/IOException/*end*/ e) {
            log(e);
        } catch (RuntimeException e) {
            fail(e);
        }
    }
}
"#,
        ProblemCode::UnneededCatch,
        &["IOException"],
        &QuillConfig::default(),
    );
    let remove = find(&proposals, "Remove catch clause");
    assert_eq!(
        remove.preview(),
        r#"class A {
    void m() {
        try {
            run();
        } catch (RuntimeException e) {
            fail(e);
        }
    }
}
"#
    );
}
