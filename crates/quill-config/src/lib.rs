//! Configuration for Quill's assists (`quill.toml`) and tracing initialisation.
//!
//! The configuration is an explicit value: hosts load it once and thread it into every assist
//! request. Nothing in the engine reads ambient global state.

mod diagnostics;
mod schema;
mod validation;

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Once;

use quill_syntax::JavaLanguageLevel;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing_subscriber::prelude::*;

pub use diagnostics::{ConfigDiagnostics, ConfigValidationError, ConfigWarning};
pub use schema::json_schema;
pub use validation::template_placeholders;

/// Identifiers of the assist rules, in registration order.
pub const RULE_IDS: &[&str] = &[
    "multi_catch",
    "exceptions",
    "javadoc",
    "if_to_switch",
    "switch_expression",
    "switch_cases",
    "resources",
    "nullness",
    "diamond",
];

/// Placeholders understood by doc comment templates.
pub const TEMPLATE_PLACEHOLDERS: &[&str] = &["tags", "name", "enclosing_type"];

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
#[schemars(deny_unknown_fields)]
pub struct QuillConfig {
    #[serde(default)]
    pub java: JavaConfig,
    #[serde(default)]
    pub assist: AssistConfig,
    #[serde(default)]
    pub templates: TemplatesConfig,
    #[serde(default)]
    pub nullness: NullnessConfig,
    #[serde(default)]
    pub format: FormatConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Target language level. Assists never produce constructs the level does not support.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[schemars(deny_unknown_fields)]
pub struct JavaConfig {
    /// Java feature release (`8`, `11`, `17`, ...).
    #[serde(default = "JavaConfig::default_release")]
    #[schemars(range(min = 1))]
    pub release: u16,
    /// Whether `--enable-preview` is in effect.
    #[serde(default)]
    pub preview: bool,
}

impl JavaConfig {
    fn default_release() -> u16 {
        JavaLanguageLevel::default().major
    }

    pub fn language_level(&self) -> JavaLanguageLevel {
        JavaLanguageLevel::new(self.release).with_preview(self.preview)
    }
}

impl Default for JavaConfig {
    fn default() -> Self {
        Self {
            release: Self::default_release(),
            preview: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[schemars(deny_unknown_fields)]
pub struct AssistConfig {
    /// Per-rule switches keyed by rule id (`multi_catch = false`). Rules default to enabled.
    #[serde(default)]
    pub rules: BTreeMap<String, bool>,
    /// Produce `case X ->` labels when converting if/else chains to switches.
    #[serde(default)]
    pub prefer_arrow_switch: bool,
}

impl AssistConfig {
    pub fn is_enabled(&self, rule: &str) -> bool {
        self.rules.get(rule).copied().unwrap_or(true)
    }
}

/// Doc comment templates used by "Add Javadoc comment".
///
/// A line holding `${tags}` expands to one line per generated tag (same line prefix); `${name}`
/// and `${enclosing_type}` are replaced inline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[schemars(deny_unknown_fields)]
pub struct TemplatesConfig {
    #[serde(default = "TemplatesConfig::default_type_comment")]
    pub type_comment: String,
    #[serde(default = "TemplatesConfig::default_method_comment")]
    pub method_comment: String,
    #[serde(default = "TemplatesConfig::default_constructor_comment")]
    pub constructor_comment: String,
    #[serde(default = "TemplatesConfig::default_module_comment")]
    pub module_comment: String,
}

impl TemplatesConfig {
    fn default_type_comment() -> String {
        "/**\n * ${tags}\n */".to_owned()
    }

    fn default_method_comment() -> String {
        "/**\n * ${tags}\n */".to_owned()
    }

    fn default_constructor_comment() -> String {
        "/**\n * Creates a new ${enclosing_type}.\n * ${tags}\n */".to_owned()
    }

    fn default_module_comment() -> String {
        "/**\n * The ${name} module.\n * ${tags}\n */".to_owned()
    }

    /// Templates by their TOML key, for validation.
    pub fn entries(&self) -> [(&'static str, &str); 4] {
        [
            ("type_comment", &self.type_comment),
            ("method_comment", &self.method_comment),
            ("constructor_comment", &self.constructor_comment),
            ("module_comment", &self.module_comment),
        ]
    }
}

impl Default for TemplatesConfig {
    fn default() -> Self {
        Self {
            type_comment: Self::default_type_comment(),
            method_comment: Self::default_method_comment(),
            constructor_comment: Self::default_constructor_comment(),
            module_comment: Self::default_module_comment(),
        }
    }
}

/// Simple names of the nullness annotations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[schemars(deny_unknown_fields)]
pub struct NullnessConfig {
    #[serde(default = "NullnessConfig::default_nullable")]
    pub nullable: String,
    #[serde(default = "NullnessConfig::default_non_null")]
    pub non_null: String,
    /// Type- or package-level annotation making unannotated members non-null.
    #[serde(default = "NullnessConfig::default_non_null_by_default")]
    pub non_null_by_default: String,
}

impl NullnessConfig {
    fn default_nullable() -> String {
        "Nullable".to_owned()
    }

    fn default_non_null() -> String {
        "NonNull".to_owned()
    }

    fn default_non_null_by_default() -> String {
        "NonNullByDefault".to_owned()
    }
}

impl Default for NullnessConfig {
    fn default() -> Self {
        Self {
            nullable: Self::default_nullable(),
            non_null: Self::default_non_null(),
            non_null_by_default: Self::default_non_null_by_default(),
        }
    }
}

/// Fallback indentation, used only when the file gives no hint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[schemars(deny_unknown_fields)]
pub struct FormatConfig {
    #[serde(default = "FormatConfig::default_indent_width")]
    #[schemars(range(min = 1))]
    pub indent_width: usize,
    #[serde(default = "FormatConfig::default_insert_spaces")]
    pub insert_spaces: bool,
}

impl FormatConfig {
    fn default_indent_width() -> usize {
        4
    }

    fn default_insert_spaces() -> bool {
        true
    }

    pub fn indent_unit(&self) -> String {
        if self.insert_spaces {
            " ".repeat(self.indent_width.max(1))
        } else {
            "\t".to_owned()
        }
    }
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self {
            indent_width: Self::default_indent_width(),
            insert_spaces: Self::default_insert_spaces(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[schemars(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Logging level for all Quill crates, or a full `EnvFilter` directive string.
    #[serde(default = "LoggingConfig::default_level")]
    pub level: String,
    /// Emit logs in JSON format.
    #[serde(default)]
    pub json: bool,
}

impl LoggingConfig {
    fn default_level() -> String {
        "info".to_owned()
    }

    pub(crate) fn normalize_level_directives(input: &str) -> String {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Self::default_level();
        }

        match trimmed.to_ascii_lowercase().as_str() {
            "trace" => "trace".to_owned(),
            "debug" => "debug".to_owned(),
            "info" => "info".to_owned(),
            "warn" | "warning" => "warn".to_owned(),
            "error" => "error".to_owned(),
            // Anything else is treated as an `EnvFilter` directive string.
            _ => trimmed.to_owned(),
        }
    }

    fn config_env_filter(&self) -> tracing_subscriber::EnvFilter {
        let directives = Self::normalize_level_directives(&self.level);
        tracing_subscriber::EnvFilter::try_new(directives).unwrap_or_else(|_| {
            tracing_subscriber::EnvFilter::default()
                .add_directive(tracing_subscriber::filter::LevelFilter::INFO.into())
        })
    }

    /// The effective filter: the configured level merged with `RUST_LOG` when set.
    pub fn env_filter(&self) -> tracing_subscriber::EnvFilter {
        let env_directives = std::env::var("RUST_LOG")
            .ok()
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty());

        let config_directives = Self::normalize_level_directives(&self.level);

        match env_directives {
            Some(env_directives) => {
                let combined = format!("{config_directives},{env_directives}");
                tracing_subscriber::EnvFilter::try_new(combined)
                    .or_else(|_| tracing_subscriber::EnvFilter::try_new(env_directives))
                    .unwrap_or_else(|_| self.config_env_filter())
            }
            None => self.config_env_filter(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Self::default_level(),
            json: false,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse toml config: {0}")]
    Toml(String),
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        // Keep the message only; the default `Display` embeds a source snippet.
        ConfigError::Toml(err.message().to_owned())
    }
}

impl QuillConfig {
    pub fn load_from_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::load_from_str(&text)
    }

    /// Load a config from TOML and report unknown keys and validation problems.
    pub fn load_from_str_with_diagnostics(
        text: &str,
    ) -> Result<(Self, ConfigDiagnostics), ConfigError> {
        let (config, unknown_keys) =
            diagnostics::deserialize_toml_with_unknown_keys::<QuillConfig>(text)?;

        let mut diagnostics = ConfigDiagnostics {
            unknown_keys,
            ..ConfigDiagnostics::default()
        };
        diagnostics.extend_validation(config.validate());

        for key in &diagnostics.unknown_keys {
            tracing::warn!(target: "quill.config", key = %key, "unknown config key");
        }
        Ok((config, diagnostics))
    }

    pub fn load_from_path_with_diagnostics(
        path: impl AsRef<Path>,
    ) -> Result<(Self, ConfigDiagnostics), ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::load_from_str_with_diagnostics(&text)
    }

    pub fn language_level(&self) -> JavaLanguageLevel {
        self.java.language_level()
    }
}

static TRACING_INIT: Once = Once::new();

/// Installs the global `tracing` subscriber.
///
/// Safe to call repeatedly; only the first call installs a subscriber, and an already
/// installed subscriber (from the host) is left in place.
pub fn init_tracing(config: &LoggingConfig) {
    TRACING_INIT.call_once(|| {
        let filter = config.env_filter();
        let layer: Box<dyn tracing_subscriber::Layer<_> + Send + Sync> = if config.json {
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(std::io::stderr)
                .with_ansi(false)
                .boxed()
        } else {
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .boxed()
        };
        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(layer)
            .try_init();
    });
}
