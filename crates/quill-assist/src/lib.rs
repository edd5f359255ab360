//! Quick-fix and quick-assist proposals for Java sources.
//!
//! A host hands in a parsed file, its diagnostics and a request (a selection or one
//! diagnostic); [`assists`] runs every enabled detector and returns rendered [`Proposal`]s,
//! best first. Nothing is applied until the host calls [`Proposal::apply`].
//!
//! - [`context`]: what the request covers.
//! - [`detectors`]: the pattern detectors, in registration order.
//! - [`rewrite`]: node-level operations lowered to text edits, with LCS list diffing.
//! - [`proposal`]: rendering, ordering and de-duplication.

pub mod context;
pub mod detectors;
pub mod proposal;
pub mod rewrite;

pub use context::{AssistContext, AssistRequest};
pub use detectors::{registry, Declined, Detector};
pub use proposal::{Proposal, ProposalSpec};
pub use rewrite::{Rewrite, RewriteError};

use quill_config::QuillConfig;
use quill_core::Diagnostic;
use quill_syntax::{NestingError, Semantics, SyntaxTree};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssistError {
    /// A detector produced a rewrite that cannot be rendered.
    #[error("internal error in `{detector}`: {message}")]
    Internal {
        detector: &'static str,
        message: String,
    },
    #[error("syntax tree is inconsistent: {0}")]
    InconsistentTree(#[from] NestingError),
}

/// Compute the proposals for one request, best first.
pub fn assists(
    tree: &SyntaxTree,
    sema: &Semantics<'_>,
    diagnostics: &[Diagnostic],
    request: AssistRequest<'_>,
    config: &QuillConfig,
) -> Result<Vec<Proposal>, AssistError> {
    let span = tracing::debug_span!(target: "quill.assist", "assists", range = ?request.range());
    let _guard = span.enter();

    let Some(ctx) = AssistContext::new(tree, sema, config, diagnostics, request)? else {
        tracing::debug!(target: "quill.assist", len = tree.text().len(), "request lies outside the text");
        return Ok(Vec::new());
    };
    let mut specs = Vec::new();
    for (order, detector) in registry().iter().enumerate() {
        let id = detector.id();
        if !config.assist.is_enabled(id) {
            tracing::trace!(target: "quill.assist", detector = id, "disabled by configuration");
            continue;
        }
        if !detector.applies(&ctx) {
            continue;
        }
        let mut found = Vec::new();
        match detector.detect(&ctx, &mut found) {
            Ok(()) => {
                tracing::debug!(target: "quill.assist", detector = id, count = found.len(), "detector matched");
                specs.extend(found.into_iter().map(|spec| (order, spec)));
            }
            Err(declined) => {
                tracing::debug!(target: "quill.assist", detector = id, reason = %declined, "detector declined");
            }
        }
    }
    proposal::assemble(tree, specs)
}
