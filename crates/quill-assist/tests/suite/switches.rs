use pretty_assertions::assert_eq;
use quill_config::QuillConfig;

use super::{assists_at, config_with_release, find, labels};

const COLORS: &str = r#"class A {
    enum Color { RED, GREEN, BLUE }

    void m(Color c) {
        /*caret*/switch (c) {
            case RED:
                paint();
                break;
        }
    }
}
"#;

#[test]
fn missing_enum_cases_are_appended() {
    let (_, proposals) = assists_at(COLORS, &QuillConfig::default());
    let add = find(&proposals, "Add missing case statements");
    assert_eq!(
        add.preview(),
        r#"class A {
    enum Color { RED, GREEN, BLUE }

    void m(Color c) {
        switch (c) {
            case RED:
                paint();
                break;
            case GREEN:
                throw new UnsupportedOperationException("Unimplemented case: " + c);
            case BLUE:
                throw new UnsupportedOperationException("Unimplemented case: " + c);
        }
    }
}
"#
    );
}

#[test]
fn default_case_ranks_after_missing_cases() {
    let (_, proposals) = assists_at(COLORS, &QuillConfig::default());
    let labels = labels(&proposals);
    let cases = labels.iter().position(|l| *l == "Add missing case statements");
    let default = labels.iter().position(|l| *l == "Add 'default' case");
    assert!(cases.is_some() && default.is_some());
    assert!(cases < default, "{labels:?}");
}

#[test]
fn default_closes_a_falling_last_group() {
    let (_, proposals) = assists_at(
        r#"class A {
    void m(int x) {
        /*caret*/switch (x) {
            case 1:
                one();
        }
    }
}
"#,
        &QuillConfig::default(),
    );
    let add = find(&proposals, "Add 'default' case");
    assert_eq!(
        add.preview(),
        r#"class A {
    void m(int x) {
        switch (x) {
            case 1:
                one();
                break;
            default:
                throw new IllegalArgumentException("Unexpected value: " + x);
        }
    }
}
"#
    );
}

#[test]
fn complete_enum_switch_with_default_needs_nothing() {
    let (_, proposals) = assists_at(
        r#"class A {
    enum Color { RED, GREEN }

    void m(Color c) {
        /*caret*/switch (c) {
            case RED:
            case GREEN:
                paint();
                break;
            default:
                break;
        }
    }
}
"#,
        &QuillConfig::default(),
    );
    let labels = labels(&proposals);
    assert!(!labels.contains(&"Add missing case statements"));
    assert!(!labels.contains(&"Add 'default' case"));
}

const ASSIGNING: &str = r#"class A {
    String m(int x) {
        String name;
        /*caret*/switch (x) {
            case 1:
                name = "one";
                break;
            case 2:
            case 3:
                name = "few";
                break;
            default:
                name = "many";
                break;
        }
        return name;
    }
}
"#;

#[test]
fn assigning_switch_becomes_an_initializer() {
    let (_, proposals) = assists_at(ASSIGNING, &QuillConfig::default());
    let convert = find(&proposals, "Convert to 'switch' expression");
    assert_eq!(
        convert.preview(),
        r#"class A {
    String m(int x) {
        String name = switch (x) {
            case 1 -> "one";
            case 2, 3 -> "few";
            default -> "many";
        };
        return name;
    }
}
"#
    );
}

#[test]
fn returning_switch_becomes_a_return() {
    let (_, proposals) = assists_at(
        r#"class A {
    int m(String s) {
        /*caret*/switch (s) {
            case "a":
                log();
                return 1;
            default:
                throw new IllegalStateException();
        }
    }
}
"#,
        &QuillConfig::default(),
    );
    let convert = find(&proposals, "Convert to 'switch' expression");
    assert_eq!(
        convert.preview(),
        r#"class A {
    int m(String s) {
        return switch (s) {
            case "a" -> {
                log();
                yield 1;
            }
            default -> throw new IllegalStateException();
        };
    }
}
"#
    );
}

#[test]
fn comments_before_the_result_stay_in_the_arm() {
    let (_, proposals) = assists_at(
        r#"class A {
    String m(int x) {
        String name;
        /*caret*/switch (x) {
            case 1:
                // the first value
                name = "one";
                break;
            case 2:
                log();
                // after logging
                name = "two";
                break;
            default:
                name = "many";
                break;
        }
        return name;
    }
}
"#,
        &QuillConfig::default(),
    );
    let convert = find(&proposals, "Convert to 'switch' expression");
    assert_eq!(
        convert.preview(),
        r#"class A {
    String m(int x) {
        String name = switch (x) {
            case 1 -> {
                // the first value
                yield "one";
            }
            case 2 -> {
                log();
                // after logging
                yield "two";
            }
            default -> "many";
        };
        return name;
    }
}
"#
    );
}

#[test]
fn switch_without_default_is_not_converted() {
    let (_, proposals) = assists_at(
        r#"class A {
    void m(int x) {
        int y;
        /*caret*/switch (x) {
            case 1:
                y = 1;
                break;
        }
    }
}
"#,
        &QuillConfig::default(),
    );
    assert!(!labels(&proposals).contains(&"Convert to 'switch' expression"));
}

#[test]
fn switch_expressions_need_java_14() {
    let (_, proposals) = assists_at(ASSIGNING, &config_with_release(11));
    assert!(!labels(&proposals).contains(&"Convert to 'switch' expression"));
}
