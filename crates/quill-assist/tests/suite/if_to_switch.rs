use pretty_assertions::assert_eq;
use quill_config::QuillConfig;

use super::{assists_at, config_with_release, find, labels};

const CHAIN: &str = r#"class A {
    void m(int x) {
        /*caret*/if (x == 1) {
            one();
        } else if (x == 2 || x == 3) {
            few();
        } else {
            many();
        }
    }
}
"#;

#[test]
fn else_if_chain_becomes_switch() {
    let (_, proposals) = assists_at(CHAIN, &QuillConfig::default());
    let convert = find(&proposals, "Convert to 'switch'");
    assert_eq!(
        convert.preview(),
        r#"class A {
    void m(int x) {
        switch (x) {
            case 1:
                one();
                break;
            case 2, 3:
                few();
                break;
            default:
                many();
                break;
        }
    }
}
"#
    );
}

#[test]
fn older_levels_repeat_case_labels() {
    let (_, proposals) = assists_at(CHAIN, &config_with_release(8));
    let convert = find(&proposals, "Convert to 'switch'");
    assert!(convert.preview().contains(
        "            case 2:\n            case 3:\n                few();\n                break;\n"
    ));
}

#[test]
fn arrow_form_when_preferred() {
    let mut config = QuillConfig::default();
    config.assist.prefer_arrow_switch = true;
    let (_, proposals) = assists_at(CHAIN, &config);
    let convert = find(&proposals, "Convert to 'switch'");
    assert_eq!(
        convert.preview(),
        r#"class A {
    void m(int x) {
        switch (x) {
            case 1 -> one();
            case 2, 3 -> few();
            default -> many();
        }
    }
}
"#
    );
}

#[test]
fn values_tested_earlier_are_dropped() {
    let (_, proposals) = assists_at(
        r#"class A {
    void m(int x) {
        /*caret*/if (x == 1) {
            one();
        } else if (x == 1 || x == 2) {
            two();
        } else if (x == 1) {
            never();
        }
    }
}
"#,
        &QuillConfig::default(),
    );
    let convert = find(&proposals, "Convert to 'switch'");
    assert_eq!(
        convert.preview(),
        r#"class A {
    void m(int x) {
        switch (x) {
            case 1:
                one();
                break;
            case 2:
                two();
                break;
        }
    }
}
"#
    );
}

#[test]
fn string_equals_chain_converts() {
    let (_, proposals) = assists_at(
        r#"class A {
    void m(String s) {
        /*caret*/if (s.equals("a")) {
            a();
        } else if ("b".equals(s)) {
            b();
        }
    }
}
"#,
        &QuillConfig::default(),
    );
    let convert = find(&proposals, "Convert to 'switch'");
    assert!(convert.preview().contains("switch (s) {\n            case \"a\":\n"));
    assert!(convert.preview().contains("            case \"b\":\n                b();\n"));
}

#[test]
fn string_chain_needs_java_7() {
    let (_, proposals) = assists_at(
        r#"class A {
    void m(String s) {
        /*caret*/if (s.equals("a")) {
            a();
        } else if (s.equals("b")) {
            b();
        }
    }
}
"#,
        &config_with_release(6),
    );
    assert!(!labels(&proposals).contains(&"Convert to 'switch'"));
}

#[test]
fn mixed_discriminants_do_not_convert() {
    let (_, proposals) = assists_at(
        r#"class A {
    void m(int x, int y) {
        /*caret*/if (x == 1) {
            one();
        } else if (y == 2) {
            two();
        }
    }
}
"#,
        &QuillConfig::default(),
    );
    assert!(!labels(&proposals).contains(&"Convert to 'switch'"));
}

#[test]
fn returning_ifs_become_one_switch() {
    let (_, proposals) = assists_at(
        r#"class A {
    String m(int x) {
        /*caret*/if (x == 1) {
            return "one";
        }
        if (x == 2) {
            return "two";
        }
        return "many";
    }
}
"#,
        &QuillConfig::default(),
    );
    let convert = find(&proposals, "Convert 'if' statements to 'switch'");
    assert_eq!(
        convert.preview(),
        r#"class A {
    String m(int x) {
        switch (x) {
            case 1:
                return "one";
            case 2:
                return "two";
            default:
                return "many";
        }
    }
}
"#
    );
}

#[test]
fn comments_between_branches_follow_their_case() {
    let (_, proposals) = assists_at(
        r#"class A {
    void m(int x) {
        /*caret*/if (x == 1) {
            one();
        } // one done
        else if (x == 2) {
            two();
        } else {
            many();
        }
    }
}
"#,
        &QuillConfig::default(),
    );
    let convert = find(&proposals, "Convert to 'switch'");
    assert_eq!(
        convert.preview(),
        r#"class A {
    void m(int x) {
        switch (x) {
            case 1:
                one();
                // one done
                break;
            case 2:
                two();
                break;
            default:
                many();
                break;
        }
    }
}
"#
    );
}

#[test]
fn comments_between_returning_ifs_are_kept() {
    let (_, proposals) = assists_at(
        r#"class A {
    String m(int x) {
        /*caret*/if (x == 1) {
            return "one";
        } // the common case
        // rarely two
        if (x == 2) {
            return "two";
        }
        return "many";
    }
}
"#,
        &QuillConfig::default(),
    );
    let convert = find(&proposals, "Convert 'if' statements to 'switch'");
    assert_eq!(
        convert.preview(),
        r#"class A {
    String m(int x) {
        switch (x) {
            case 1:
                return "one";
                // the common case
            // rarely two
            case 2:
                return "two";
            default:
                return "many";
        }
    }
}
"#
    );
}
