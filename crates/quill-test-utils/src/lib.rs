//! Utilities shared by Quill tests.
//!
//! Fixtures are Java sources carrying inline markers that are stripped before parsing:
//! `/*caret*/` marks a caret offset and `/*start*/ ... /*end*/` a selection.

mod fixtures;

pub use fixtures::*;
