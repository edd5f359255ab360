//! Core text primitives shared by the Quill crates.
//!
//! - [`TextRange`]: half-open UTF-8 byte ranges into a source buffer, with byte-offset helpers
//!   in [`TextRangeExt`].
//! - [`edit`]: the edit model (`TextEdit`, `EditSet`) and deterministic application.
//! - [`text`]: line and indentation helpers used when generating code.
//! - [`diagnostic`]: immutable compiler problem records handed to the engine by a host.

pub mod diagnostic;
pub mod edit;
pub mod text;

pub use diagnostic::{Diagnostic, ProblemCode, Severity};
pub use edit::{apply_text_edits, EditError, EditSet, TextEdit};
pub use text::{TextRange, TextRangeExt, TextSize};
