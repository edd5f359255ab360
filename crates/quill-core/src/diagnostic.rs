//! Compiler problem records.
//!
//! Diagnostics are produced upstream (by the host's compiler) and consumed read-only by the
//! assist engine. The engine only understands the codes listed in [`ProblemCode`]; anything
//! else round-trips through [`ProblemCode::Other`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::TextRange;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum ProblemCode {
    /// A checked exception is thrown but neither caught nor declared. Argument 0: the type.
    UnhandledException,
    /// A caught exception type is never thrown by the guarded block. Argument 0: the type.
    UnneededCatch,
    /// A doc comment lacks a tag. Arguments: tag name, element (e.g. `param`, `a`).
    MissingTag,
    /// A doc comment repeats a tag. Arguments: tag name, element.
    DuplicateTag,
    /// A doc comment documents an element that does not exist. Arguments: tag name, element.
    InvalidTag,
    /// A switch lacks a `default` label.
    MissingDefaultCase,
    /// A switch over an enum misses constants. Arguments: the missing constant names.
    MissingEnumCase,
    /// An overriding method's return nullness is incompatible with the overridden method.
    ReturnNullnessConflict,
    /// An overriding method's parameter nullness is incompatible. Argument 0: parameter name.
    ParameterNullnessConflict,
    /// Explicit type arguments of a class instance creation can be inferred.
    RedundantTypeArguments,
    Other(String),
}

impl ProblemCode {
    pub fn as_str(&self) -> &str {
        match self {
            ProblemCode::UnhandledException => "unhandled-exception",
            ProblemCode::UnneededCatch => "unneeded-catch",
            ProblemCode::MissingTag => "missing-tag",
            ProblemCode::DuplicateTag => "duplicate-tag",
            ProblemCode::InvalidTag => "invalid-tag",
            ProblemCode::MissingDefaultCase => "missing-default-case",
            ProblemCode::MissingEnumCase => "missing-enum-case",
            ProblemCode::ReturnNullnessConflict => "return-nullness-conflict",
            ProblemCode::ParameterNullnessConflict => "parameter-nullness-conflict",
            ProblemCode::RedundantTypeArguments => "redundant-type-arguments",
            ProblemCode::Other(code) => code,
        }
    }
}

impl fmt::Display for ProblemCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProblemCode {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "unhandled-exception" => ProblemCode::UnhandledException,
            "unneeded-catch" => ProblemCode::UnneededCatch,
            "missing-tag" => ProblemCode::MissingTag,
            "duplicate-tag" => ProblemCode::DuplicateTag,
            "invalid-tag" => ProblemCode::InvalidTag,
            "missing-default-case" => ProblemCode::MissingDefaultCase,
            "missing-enum-case" => ProblemCode::MissingEnumCase,
            "return-nullness-conflict" => ProblemCode::ReturnNullnessConflict,
            "parameter-nullness-conflict" => ProblemCode::ParameterNullnessConflict,
            "redundant-type-arguments" => ProblemCode::RedundantTypeArguments,
            other => ProblemCode::Other(other.to_string()),
        })
    }
}

impl From<String> for ProblemCode {
    fn from(value: String) -> Self {
        match value.parse() {
            Ok(code) => code,
            Err(never) => match never {},
        }
    }
}

impl From<ProblemCode> for String {
    fn from(value: ProblemCode) -> Self {
        value.as_str().to_string()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub code: ProblemCode,
    pub severity: Severity,
    pub range: TextRange,
    #[serde(default)]
    pub arguments: Vec<String>,
}

impl Diagnostic {
    pub fn new(code: ProblemCode, severity: Severity, range: TextRange) -> Self {
        Self {
            code,
            severity,
            range,
            arguments: Vec::new(),
        }
    }

    pub fn error(code: ProblemCode, range: TextRange) -> Self {
        Self::new(code, Severity::Error, range)
    }

    pub fn warning(code: ProblemCode, range: TextRange) -> Self {
        Self::new(code, Severity::Warning, range)
    }

    pub fn with_argument(mut self, argument: impl Into<String>) -> Self {
        self.arguments.push(argument.into());
        self
    }

    pub fn argument(&self, idx: usize) -> Option<&str> {
        self.arguments.get(idx).map(String::as_str)
    }
}
