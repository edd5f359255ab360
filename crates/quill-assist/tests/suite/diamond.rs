use pretty_assertions::assert_eq;
use quill_config::QuillConfig;

use super::{assists_at, config_with_release, find, labels};

#[test]
fn repeated_type_arguments_become_a_diamond() {
    let (_, proposals) = assists_at(
        r#"class A {
    void m() {
        List<String> names = new /*caret*/ArrayList<String>();
    }
}
"#,
        &QuillConfig::default(),
    );
    let remove = find(&proposals, "Remove type arguments");
    assert_eq!(
        remove.preview(),
        r#"class A {
    void m() {
        List<String> names = new ArrayList<>();
    }
}
"#
    );
}

#[test]
fn diamond_is_spelled_out_from_the_declaration() {
    let (_, proposals) = assists_at(
        r#"class A {
    private final Map<String, Integer> counts = new /*caret*/HashMap<>();
}
"#,
        &QuillConfig::default(),
    );
    let insert = find(&proposals, "Insert inferred type arguments");
    assert_eq!(
        insert.preview(),
        r#"class A {
    private final Map<String, Integer> counts = new HashMap<String, Integer>();
}
"#
    );
}

#[test]
fn implied_non_null_annotations_are_not_repeated() {
    let (_, proposals) = assists_at(
        r#"@NonNullByDefault
class A {
    void m() {
        List<@NonNull String> names = new /*caret*/ArrayList<>();
    }
}
"#,
        &QuillConfig::default(),
    );
    let insert = find(&proposals, "Insert inferred type arguments");
    assert!(insert.preview().contains("new ArrayList<String>();"));
}

#[test]
fn different_arguments_are_kept() {
    let (_, proposals) = assists_at(
        r#"class A {
    void m() {
        List<Object> names = new /*caret*/ArrayList<String>();
    }
}
"#,
        &QuillConfig::default(),
    );
    assert!(!labels(&proposals).contains(&"Remove type arguments"));
}

#[test]
fn wildcards_cannot_be_inserted() {
    let (_, proposals) = assists_at(
        r#"class A {
    void m() {
        List<? extends Number> values = new /*caret*/ArrayList<>();
    }
}
"#,
        &QuillConfig::default(),
    );
    assert!(!labels(&proposals).contains(&"Insert inferred type arguments"));
}

#[test]
fn anonymous_classes_need_java_9() {
    let fixture = r#"class A {
    void m() {
        Comparator<String> c = new /*caret*/Comparator<String>() {
            public int compare(String a, String b) {
                return 0;
            }
        };
    }
}
"#;
    let (_, proposals) = assists_at(fixture, &config_with_release(8));
    assert!(!labels(&proposals).contains(&"Remove type arguments"));
    let (_, proposals) = assists_at(fixture, &QuillConfig::default());
    assert!(labels(&proposals).contains(&"Remove type arguments"));
}

#[test]
fn diamond_needs_java_7() {
    let (_, proposals) = assists_at(
        r#"class A {
    void m() {
        List<String> names = new /*caret*/ArrayList<String>();
    }
}
"#,
        &config_with_release(6),
    );
    assert!(!labels(&proposals).contains(&"Remove type arguments"));
}
