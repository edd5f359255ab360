use pretty_assertions::assert_eq;
use quill_config::QuillConfig;

use super::{assists_at, config_with_release, find, labels};

#[test]
fn identical_catches_combine() {
    let (_, proposals) = assists_at(
        r#"class A {
    void m() {
        try {
            run();
        } catch (IOException e) {
            log(e);
        } catch (/*caret*/SQLException e) {
            log(e);
        }
    }
}
"#,
        &QuillConfig::default(),
    );
    let combine = find(&proposals, "Combine catch blocks");
    assert_eq!(
        combine.preview(),
        r#"class A {
    void m() {
        try {
            run();
        } catch (IOException | SQLException e) {
            log(e);
        }
    }
}
"#
    );
}

#[test]
fn related_types_do_not_combine() {
    let (_, proposals) = assists_at(
        r#"class A {
    void m() {
        try {
            run();
        } catch (FileNotFoundException e) {
            log(e);
        } catch (/*caret*/IOException e) {
            log(e);
        }
    }
}
"#,
        &QuillConfig::default(),
    );
    assert!(!labels(&proposals).contains(&"Combine catch blocks"));
}

#[test]
fn different_bodies_do_not_combine() {
    let (_, proposals) = assists_at(
        r#"class A {
    void m() {
        try {
            run();
        } catch (IOException e) {
            log(e);
        } catch (/*caret*/SQLException e) {
            retry(e);
        }
    }
}
"#,
        &QuillConfig::default(),
    );
    assert!(!labels(&proposals).contains(&"Combine catch blocks"));
}

#[test]
fn union_splits_into_separate_catches() {
    let (_, proposals) = assists_at(
        r#"class A {
    void m() {
        try {
            run();
        } catch (IOException | /*caret*/SQLException e) {
            log(e);
        }
    }
}
"#,
        &QuillConfig::default(),
    );
    let split = find(&proposals, "Use separate catch blocks");
    assert_eq!(
        split.preview(),
        r#"class A {
    void m() {
        try {
            run();
        } catch (IOException e) {
            log(e);
        } catch (SQLException e) {
            log(e);
        }
    }
}
"#
    );
}

#[test]
fn nothing_below_java_7() {
    let (_, proposals) = assists_at(
        r#"class A {
    void m() {
        try {
            run();
        } catch (IOException e) {
            log(e);
        } catch (/*caret*/SQLException e) {
            log(e);
        }
    }
}
"#,
        &config_with_release(6),
    );
    assert!(!labels(&proposals).contains(&"Combine catch blocks"));
}
