//! Java language level + feature availability model.
//!
//! The parser accepts a superset grammar (modern Java); assists consult this module to decide
//! which rewrites they may produce for the configured language level.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The effective Java language mode for a file.
///
/// - `major`: the Java feature release number (7, 8, 11, 17, 21, …)
/// - `preview`: whether `--enable-preview` is in effect for this major version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct JavaLanguageLevel {
    pub major: u16,
    #[serde(default)]
    pub preview: bool,
}

impl JavaLanguageLevel {
    pub const JAVA_6: Self = Self {
        major: 6,
        preview: false,
    };
    pub const JAVA_7: Self = Self {
        major: 7,
        preview: false,
    };
    pub const JAVA_8: Self = Self {
        major: 8,
        preview: false,
    };
    pub const JAVA_11: Self = Self {
        major: 11,
        preview: false,
    };
    pub const JAVA_17: Self = Self {
        major: 17,
        preview: false,
    };
    pub const JAVA_21: Self = Self {
        major: 21,
        preview: false,
    };

    #[inline]
    pub const fn new(major: u16) -> Self {
        Self {
            major,
            preview: false,
        }
    }

    #[inline]
    pub const fn with_preview(self, preview: bool) -> Self {
        Self { preview, ..self }
    }

    pub fn availability(self, feature: JavaFeature) -> FeatureAvailability {
        use FeatureAvailability::*;
        use JavaFeature::*;

        match feature {
            MultiCatch | Diamond | StringSwitch | TryWithResources => {
                if self.major >= 7 {
                    Stable
                } else {
                    Unavailable
                }
            }

            Lambdas => {
                if self.major >= 8 {
                    Stable
                } else {
                    Unavailable
                }
            }

            Modules | DiamondAnonymous => {
                if self.major >= 9 {
                    Stable
                } else {
                    Unavailable
                }
            }

            VarLocalInference => {
                if self.major >= 10 {
                    Stable
                } else {
                    Unavailable
                }
            }

            SwitchExpressions | ArrowCaseLabels => {
                if self.major >= 14 {
                    Stable
                } else if self.major == 12 || self.major == 13 {
                    Preview
                } else {
                    Unavailable
                }
            }

            TextBlocks => {
                if self.major >= 15 {
                    Stable
                } else if self.major == 13 || self.major == 14 {
                    Preview
                } else {
                    Unavailable
                }
            }

            Records => {
                if self.major >= 16 {
                    Stable
                } else if self.major == 14 || self.major == 15 {
                    Preview
                } else {
                    Unavailable
                }
            }
        }
    }

    /// Is the feature usable in this configuration? (applies `preview` flag)
    pub fn is_enabled(self, feature: JavaFeature) -> bool {
        match self.availability(feature) {
            FeatureAvailability::Stable => true,
            FeatureAvailability::Preview => self.preview,
            FeatureAvailability::Unavailable => false,
        }
    }

    #[inline]
    pub fn supports_multi_catch(self) -> bool {
        self.is_enabled(JavaFeature::MultiCatch)
    }

    #[inline]
    pub fn supports_switch_expressions(self) -> bool {
        self.is_enabled(JavaFeature::SwitchExpressions)
    }

    #[inline]
    pub fn supports_arrow_case_labels(self) -> bool {
        self.is_enabled(JavaFeature::ArrowCaseLabels)
    }

    #[inline]
    pub fn supports_modules(self) -> bool {
        self.is_enabled(JavaFeature::Modules)
    }
}

impl Default for JavaLanguageLevel {
    fn default() -> Self {
        JavaLanguageLevel::JAVA_17
    }
}

impl fmt::Display for JavaLanguageLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.preview {
            write!(f, "Java {} (preview)", self.major)
        } else {
            write!(f, "Java {}", self.major)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JavaFeature {
    MultiCatch,        // Java 7+
    Diamond,           // Java 7+
    StringSwitch,      // Java 7+
    TryWithResources,  // Java 7+
    Lambdas,           // Java 8+
    Modules,           // Java 9+
    DiamondAnonymous,  // Java 9+
    VarLocalInference, // Java 10+
    SwitchExpressions, // final Java 14 (preview 12/13)
    ArrowCaseLabels,   // final Java 14, together with switch expressions
    TextBlocks,        // final Java 15
    Records,           // final Java 16 (preview 14/15)
}

impl JavaFeature {
    pub const fn display_name(self) -> &'static str {
        match self {
            JavaFeature::MultiCatch => "multi-catch",
            JavaFeature::Diamond => "diamond operator",
            JavaFeature::StringSwitch => "switch on strings",
            JavaFeature::TryWithResources => "try-with-resources",
            JavaFeature::Lambdas => "lambda expressions",
            JavaFeature::Modules => "modules",
            JavaFeature::DiamondAnonymous => "diamond with anonymous classes",
            JavaFeature::VarLocalInference => "local variable type inference (`var`)",
            JavaFeature::SwitchExpressions => "switch expressions",
            JavaFeature::ArrowCaseLabels => "arrow case labels",
            JavaFeature::TextBlocks => "text blocks",
            JavaFeature::Records => "records",
        }
    }

    pub const fn stable_since(self) -> u16 {
        match self {
            JavaFeature::MultiCatch
            | JavaFeature::Diamond
            | JavaFeature::StringSwitch
            | JavaFeature::TryWithResources => 7,
            JavaFeature::Lambdas => 8,
            JavaFeature::Modules | JavaFeature::DiamondAnonymous => 9,
            JavaFeature::VarLocalInference => 10,
            JavaFeature::SwitchExpressions | JavaFeature::ArrowCaseLabels => 14,
            JavaFeature::TextBlocks => 15,
            JavaFeature::Records => 16,
        }
    }
}

/// Whether the *language* supports a feature in this major version,
/// independent of whether preview is enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeatureAvailability {
    Unavailable,
    Preview,
    Stable,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn java_7_features() {
        assert!(!JavaLanguageLevel::JAVA_6.supports_multi_catch());
        assert!(JavaLanguageLevel::JAVA_7.supports_multi_catch());
        assert!(JavaLanguageLevel::JAVA_7.is_enabled(JavaFeature::Diamond));
        assert!(!JavaLanguageLevel::JAVA_8.is_enabled(JavaFeature::DiamondAnonymous));
    }

    #[test]
    fn switch_expressions_need_preview_before_14() {
        let level = JavaLanguageLevel::new(13);
        assert_eq!(
            level.availability(JavaFeature::SwitchExpressions),
            FeatureAvailability::Preview
        );
        assert!(!level.supports_switch_expressions());
        assert!(level.with_preview(true).supports_switch_expressions());
        assert!(JavaLanguageLevel::JAVA_17.supports_arrow_case_labels());
    }
}
