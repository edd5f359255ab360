use pretty_assertions::assert_eq;
use quill_config::QuillConfig;

use super::{assists_at, config_with_release, find, labels};

#[test]
fn closeable_argument_becomes_its_own_resource() {
    let (_, proposals) = assists_at(
        r#"class A {
    void m(String path) {
        try (BufferedReader reader = new BufferedReader(/*caret*/new FileReader(path))) {
            reader.readLine();
        }
    }
}
"#,
        &QuillConfig::default(),
    );
    let extract = find(&proposals, "Extract to resource");
    assert_eq!(
        extract.preview(),
        r#"class A {
    void m(String path) {
        try (FileReader fileReader = new FileReader(path); BufferedReader reader = new BufferedReader(fileReader)) {
            reader.readLine();
        }
    }
}
"#
    );
}

#[test]
fn plain_value_moves_before_the_try() {
    let (_, proposals) = assists_at(
        r#"class A {
    void m(String name) {
        try (Reader r = open(name./*caret*/trim())) {
            r.read();
        }
    }
}
"#,
        &QuillConfig::default(),
    );
    let extract = find(&proposals, "Extract to local variable");
    assert_eq!(
        extract.preview(),
        r#"class A {
    void m(String name) {
        String string = name.trim();
        try (Reader r = open(string)) {
            r.read();
        }
    }
}
"#
    );
}

#[test]
fn taken_names_get_a_suffix() {
    let (_, proposals) = assists_at(
        r#"class A {
    void m(String path, FileReader fileReader) {
        try (BufferedReader reader = new BufferedReader(/*caret*/new FileReader(path))) {
            reader.readLine();
        }
    }
}
"#,
        &QuillConfig::default(),
    );
    let extract = find(&proposals, "Extract to resource");
    assert!(extract
        .preview()
        .contains("try (FileReader fileReader1 = new FileReader(path); BufferedReader reader = new BufferedReader(fileReader1))"));
}

#[test]
fn value_using_an_earlier_resource_stays() {
    let (_, proposals) = assists_at(
        r#"class A {
    void m() {
        try (Reader r = open(); Reader s = wrap(r./*caret*/size())) {
            s.read();
        }
    }
}
"#,
        &QuillConfig::default(),
    );
    assert!(!labels(&proposals).contains(&"Extract to local variable"));
}

#[test]
fn resources_need_java_7() {
    let (_, proposals) = assists_at(
        r#"class A {
    void m(String path) {
        try (BufferedReader reader = new BufferedReader(/*caret*/new FileReader(path))) {
            reader.readLine();
        }
    }
}
"#,
        &config_with_release(6),
    );
    assert!(!labels(&proposals).contains(&"Extract to resource"));
}
