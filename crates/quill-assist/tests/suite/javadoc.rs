use pretty_assertions::assert_eq;
use quill_config::QuillConfig;
use quill_core::ProblemCode;

use super::{assists_at, find, fixes_for, labels};

const PARTIAL: &str = r#"class A {
    /**
     * Sums.
     * @param b the second
     */
    <T> int /*caret*/m(T a, int b, int c) throws E1, E2 {
        return b;
    }
}
"#;

#[test]
fn missing_tags_are_added_in_signature_order() {
    let (_, proposals) = assists_at(PARTIAL, &QuillConfig::default());
    let add = find(&proposals, "Add all missing tags");
    assert_eq!(
        add.preview(),
        r#"class A {
    /**
     * Sums.
     * @param <T>
     * @param a
     * @param b the second
     * @param c
     * @return
     * @throws E1
     * @throws E2
     */
    <T> int m(T a, int b, int c) throws E1, E2 {
        return b;
    }
}
"#
    );
}

#[test]
fn missing_tag_diagnostic_adds_one_tag() {
    let (_, proposals) = fixes_for(
        r#"class A {
    /**
     * Sums.
     * @param b the second
     */
    int m(int /*start*/a/*end*/, int b) {
        return b;
    }
}
"#,
        ProblemCode::MissingTag,
        &["@param a"],
        &QuillConfig::default(),
    );
    let add = find(&proposals, "Add '@param a' tag");
    assert_eq!(
        add.preview(),
        r#"class A {
    /**
     * Sums.
     * @param a
     * @param b the second
     */
    int m(int a, int b) {
        return b;
    }
}
"#
    );
    assert!(labels(&proposals).contains(&"Add all missing tags"));
}

#[test]
fn duplicate_param_tag_is_removed() {
    let (_, proposals) = assists_at(
        r#"class A {
    /**
     * Doc.
     * @param a first
     * @param /*caret*/a again
     */
    void m(int a) {
    }
}
"#,
        &QuillConfig::default(),
    );
    let remove = find(&proposals, "Remove duplicate '@param a' tag");
    assert_eq!(
        remove.preview(),
        r#"class A {
    /**
     * Doc.
     * @param a first
     */
    void m(int a) {
    }
}
"#
    );
}

#[test]
fn undeclared_param_tag_is_invalid() {
    let (_, proposals) = assists_at(
        r#"class A {
    /**
     * Doc.
     * @param /*caret*/gone unused
     */
    void m() {
    }
}
"#,
        &QuillConfig::default(),
    );
    assert!(labels(&proposals).contains(&"Remove '@param gone' tag"));
}

#[test]
fn undocumented_method_gets_a_template_comment() {
    let (_, proposals) = assists_at(
        r#"class A {
    int /*caret*/add(int a, int b) {
        return a + b;
    }
}
"#,
        &QuillConfig::default(),
    );
    let add = find(&proposals, "Add Javadoc comment");
    assert_eq!(
        add.preview(),
        r#"class A {
    /**
     * @param a
     * @param b
     * @return
     */
    int add(int a, int b) {
        return a + b;
    }
}
"#
    );
}

#[test]
fn caret_in_body_offers_no_comment() {
    let (_, proposals) = assists_at(
        r#"class A {
    int add(int a, int b) {
        return /*caret*/a + b;
    }
}
"#,
        &QuillConfig::default(),
    );
    assert!(!labels(&proposals).contains(&"Add Javadoc comment"));
}
