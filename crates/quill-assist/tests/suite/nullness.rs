use pretty_assertions::assert_eq;
use quill_config::QuillConfig;

use super::{assists_at, find, labels};

const RETURNS: &str = r#"class Base {
    @NonNull
    String name() {
        return "";
    }
}

class Derived extends Base {
    @Nullable
    String /*caret*/name() {
        return null;
    }
}
"#;

#[test]
fn nullable_override_of_non_null_return() {
    let (_, proposals) = assists_at(RETURNS, &QuillConfig::default());
    let proposals: Vec<_> = proposals.into_iter().filter(|p| p.detector() == "nullness").collect();
    assert_eq!(
        labels(&proposals),
        [
            "Change return type of 'name()' to '@NonNull'",
            "Change return type of overridden 'name()' to '@Nullable'",
        ]
    );
    assert!(proposals[0]
        .preview()
        .contains("class Derived extends Base {\n    @NonNull\n    String name() {"));
    assert!(proposals[1]
        .preview()
        .contains("class Base {\n    @Nullable\n    String name() {"));
}

#[test]
fn default_makes_the_annotation_redundant() {
    let (_, proposals) = assists_at(
        r#"class Base {
    @NonNull
    String name() {
        return "";
    }
}

@NonNullByDefault
class Derived extends Base {
    @Nullable
    String /*caret*/name() {
        return null;
    }
}
"#,
        &QuillConfig::default(),
    );
    let fix = find(&proposals, "Change return type of 'name()' to '@NonNull'");
    assert_eq!(
        fix.preview(),
        r#"class Base {
    @NonNull
    String name() {
        return "";
    }
}

@NonNullByDefault
class Derived extends Base {
    String name() {
        return null;
    }
}
"#
    );
}

const PARAMETERS: &str = r#"class Base {
    void accept(String value) {
    }
}

class Derived extends Base {
    void accept(@NonNull String /*caret*/value) {
    }
}
"#;

#[test]
fn non_null_parameter_of_unannotated_override() {
    let (_, proposals) = assists_at(PARAMETERS, &QuillConfig::default());
    let ours = find(&proposals, "Change parameter 'value' to '@Nullable'");
    assert!(ours.preview().contains("void accept(@Nullable String value) {\n    }\n}\n"));
    let theirs = find(&proposals, "Change parameter 'value' in overridden method to '@NonNull'");
    assert!(theirs
        .preview()
        .starts_with("class Base {\n    void accept(@NonNull String value) {"));
    assert!(ours.relevance() > theirs.relevance());
}

#[test]
fn configured_annotation_names_are_used() {
    let mut config = QuillConfig::default();
    config.nullness.nullable = "org.example.CanBeNull".to_string();
    config.nullness.non_null = "org.example.NeverNull".to_string();
    let (_, proposals) = assists_at(
        r#"class Base {
    void accept(String value) {
    }
}

class Derived extends Base {
    void accept(@NeverNull String /*caret*/value) {
    }
}
"#,
        &config,
    );
    let ours = find(&proposals, "Change parameter 'value' to '@CanBeNull'");
    assert!(ours.preview().contains("void accept(@CanBeNull String value)"));
}

#[test]
fn matching_annotations_need_no_fix() {
    let (_, proposals) = assists_at(
        r#"class Base {
    @Nullable
    String name() {
        return null;
    }
}

class Derived extends Base {
    @NonNull
    String /*caret*/name() {
        return "";
    }
}
"#,
        &QuillConfig::default(),
    );
    assert!(proposals
        .iter()
        .all(|p| p.detector() != "nullness"), "{:?}", labels(&proposals));
}
