use std::sync::OnceLock;

use crate::diagnostics::{ConfigValidationError, ConfigWarning, ValidationDiagnostics};
use crate::{LoggingConfig, QuillConfig, RULE_IDS, TEMPLATE_PLACEHOLDERS};

fn placeholder_regex() -> Option<&'static regex::Regex> {
    static PLACEHOLDER_RE: OnceLock<Option<regex::Regex>> = OnceLock::new();
    PLACEHOLDER_RE
        .get_or_init(|| regex::Regex::new(r"\$\{([^}]*)\}").ok())
        .as_ref()
}

/// Names of the `${...}` placeholders in `template`, in order of appearance.
pub fn template_placeholders(template: &str) -> Vec<&str> {
    placeholder_regex()
        .map(|re| {
            re.captures_iter(template)
                .filter_map(|c| c.get(1).map(|m| m.as_str()))
                .collect()
        })
        .unwrap_or_default()
}

impl QuillConfig {
    pub(crate) fn validate(&self) -> ValidationDiagnostics {
        let mut out = ValidationDiagnostics::default();

        if self.java.release == 0 {
            out.errors.push(ConfigValidationError::InvalidValue {
                toml_path: "java.release".to_owned(),
                message: "must be >= 1".to_owned(),
            });
        }
        if self.format.indent_width == 0 {
            out.errors.push(ConfigValidationError::InvalidValue {
                toml_path: "format.indent_width".to_owned(),
                message: "must be >= 1".to_owned(),
            });
        }

        for id in self.assist.rules.keys() {
            if !RULE_IDS.contains(&id.as_str()) {
                out.warnings.push(ConfigWarning::UnknownRule { id: id.clone() });
            }
        }

        for (key, template) in self.templates.entries() {
            let toml_path = format!("templates.{key}");
            let placeholders = template_placeholders(template);
            if !placeholders.contains(&"tags") {
                out.warnings.push(ConfigWarning::TemplateMissingTags {
                    toml_path: toml_path.clone(),
                });
            }
            for placeholder in placeholders {
                if !TEMPLATE_PLACEHOLDERS.contains(&placeholder) {
                    out.warnings.push(ConfigWarning::TemplateUnknownPlaceholder {
                        toml_path: toml_path.clone(),
                        placeholder: placeholder.to_owned(),
                    });
                }
            }
        }

        let normalized = LoggingConfig::normalize_level_directives(&self.logging.level);
        if tracing_subscriber::EnvFilter::try_new(&normalized).is_err() {
            out.warnings.push(ConfigWarning::LoggingLevelInvalid {
                value: self.logging.level.clone(),
            });
        }

        out
    }
}
