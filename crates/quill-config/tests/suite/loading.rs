use std::io::Write;

use pretty_assertions::assert_eq;
use quill_config::{ConfigValidationError, ConfigWarning, QuillConfig};
use quill_syntax::JavaLanguageLevel;
use tempfile::NamedTempFile;

#[test]
fn empty_config_uses_defaults() {
    let (config, diagnostics) = QuillConfig::load_from_str_with_diagnostics("").expect("parse");
    assert!(diagnostics.is_empty(), "{diagnostics:?}");
    assert_eq!(config, QuillConfig::default());
    assert_eq!(config.language_level(), JavaLanguageLevel::JAVA_17);
    assert_eq!(config.format.indent_unit(), "    ");
}

#[test]
fn reads_every_section() {
    let text = r#"
[java]
release = 8

[assist]
prefer_arrow_switch = true

[assist.rules]
diamond = false

[templates]
method_comment = "/**\n * ${name}\n * ${tags}\n */"

[nullness]
nullable = "CheckForNull"

[format]
insert_spaces = false

[logging]
level = "debug"
json = true
"#;
    let (config, diagnostics) = QuillConfig::load_from_str_with_diagnostics(text).expect("parse");
    assert!(diagnostics.is_empty(), "{diagnostics:?}");
    assert_eq!(config.language_level(), JavaLanguageLevel::JAVA_8);
    assert!(config.assist.prefer_arrow_switch);
    assert!(!config.assist.is_enabled("diamond"));
    assert!(config.assist.is_enabled("javadoc"));
    assert_eq!(config.nullness.nullable, "CheckForNull");
    assert_eq!(config.nullness.non_null, "NonNull");
    assert_eq!(config.format.indent_unit(), "\t");
    assert!(config.logging.json);
}

#[test]
fn reports_unknown_keys_with_full_paths() {
    let text = r#"
typo = 1

[assist]
prefer_arow_switch = true

[format]
indent = "  "
"#;
    let (_config, diagnostics) = QuillConfig::load_from_str_with_diagnostics(text).expect("parse");
    assert_eq!(
        diagnostics.unknown_keys,
        vec!["assist.prefer_arow_switch", "format.indent", "typo"]
    );
}

#[test]
fn warns_about_unknown_rules_and_template_placeholders() {
    let text = r#"
[assist.rules]
multi_catch = true
if_to_swtich = false

[templates]
type_comment = "/** ${user} */"
"#;
    let (_config, diagnostics) = QuillConfig::load_from_str_with_diagnostics(text).expect("parse");
    assert_eq!(
        diagnostics.warnings,
        vec![
            ConfigWarning::UnknownRule {
                id: "if_to_swtich".to_owned()
            },
            ConfigWarning::TemplateMissingTags {
                toml_path: "templates.type_comment".to_owned()
            },
            ConfigWarning::TemplateUnknownPlaceholder {
                toml_path: "templates.type_comment".to_owned(),
                placeholder: "user".to_owned()
            },
        ]
    );
    assert!(diagnostics.is_ok());
}

#[test]
fn rejects_zero_values() {
    let text = "[java]\nrelease = 0\n[format]\nindent_width = 0\n";
    let (_config, diagnostics) = QuillConfig::load_from_str_with_diagnostics(text).expect("parse");
    assert!(!diagnostics.is_ok());
    assert_eq!(
        diagnostics.errors[0],
        ConfigValidationError::InvalidValue {
            toml_path: "java.release".to_owned(),
            message: "must be >= 1".to_owned()
        }
    );
    assert_eq!(diagnostics.errors.len(), 2);
}

#[test]
fn type_errors_fail_to_load() {
    let err = QuillConfig::load_from_str("[java]\nrelease = \"seventeen\"\n").unwrap_err();
    assert!(err.to_string().starts_with("failed to parse toml config"));
}

#[test]
fn loads_from_path() {
    let mut file = NamedTempFile::new().expect("temp file");
    writeln!(file, "[java]\nrelease = 11").expect("write");
    let config = QuillConfig::load_from_path(file.path()).expect("load");
    assert_eq!(config.java.release, 11);

    let missing = file.path().with_extension("missing");
    assert!(QuillConfig::load_from_path(missing).is_err());
}
