//! Proposal assembly: rendering, verification, ordering and de-duplication.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use quill_core::{EditError, EditSet, TextRange, TextRangeExt};
use quill_syntax::SyntaxTree;
use similar::TextDiff;

use crate::rewrite::Rewrite;
use crate::AssistError;

/// What a detector found, before rendering.
#[derive(Debug)]
pub struct ProposalSpec<'a> {
    pub detector: &'static str,
    /// The node the proposal is about.
    pub target: TextRange,
    pub label: String,
    /// Higher sorts first.
    pub relevance: i32,
    pub rewrite: Rewrite<'a>,
}

impl<'a> ProposalSpec<'a> {
    pub fn new(
        detector: &'static str,
        target: TextRange,
        label: impl Into<String>,
        relevance: i32,
        rewrite: Rewrite<'a>,
    ) -> Self {
        Self {
            detector,
            target,
            label: label.into(),
            relevance,
            rewrite,
        }
    }
}

/// A rendered, applicable alternative. Proposals computed for one request are mutually
/// exclusive: applying one invalidates the others.
#[derive(Clone, PartialEq, Eq)]
pub struct Proposal {
    label: String,
    preview: String,
    edits: EditSet,
    relevance: i32,
    detector: &'static str,
    original: Arc<str>,
}

impl fmt::Debug for Proposal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Proposal")
            .field("label", &self.label)
            .field("detector", &self.detector)
            .field("relevance", &self.relevance)
            .field("edits", &self.edits.len())
            .finish()
    }
}

impl Proposal {
    pub fn label(&self) -> &str {
        &self.label
    }

    /// The full source after applying the proposal.
    pub fn preview(&self) -> &str {
        &self.preview
    }

    pub fn edits(&self) -> &EditSet {
        &self.edits
    }

    pub fn relevance(&self) -> i32 {
        self.relevance
    }

    pub fn detector(&self) -> &'static str {
        self.detector
    }

    /// Apply to `text`, which must be the text the proposal was computed against. Nothing is
    /// applied on error.
    pub fn apply(&self, text: &str) -> Result<String, EditError> {
        if text != &*self.original {
            return Err(EditError::TextMismatch);
        }
        self.edits.apply(text)
    }

    /// Unified diff between the original text and the preview.
    pub fn unified_diff(&self) -> String {
        TextDiff::from_lines(&*self.original, self.preview.as_str())
            .unified_diff()
            .context_radius(3)
            .header("original", "proposed")
            .to_string()
    }
}

/// Render every spec and order the results.
///
/// `specs` pairs each spec with the registration index of its detector and must be in
/// discovery order. Proposals sort by relevance (descending), then detector order, then
/// discovery order; a proposal whose preview equals an earlier one is dropped.
pub fn assemble(
    tree: &SyntaxTree,
    specs: Vec<(usize, ProposalSpec<'_>)>,
) -> Result<Vec<Proposal>, AssistError> {
    let original: Arc<str> = Arc::from(tree.text());
    let mut rendered = Vec::with_capacity(specs.len());

    for (discovery, (order, spec)) in specs.into_iter().enumerate() {
        let detector = spec.detector;
        let internal = |message: String| AssistError::Internal { detector, message };

        let edits = spec
            .rewrite
            .finish()
            .map_err(|err| internal(format!("{}: {err}", spec.label)))?;
        let preview = edits
            .apply(&original)
            .map_err(|err| internal(format!("{}: {err}", spec.label)))?;
        if preview == *original {
            tracing::debug!(target: "quill.assist", detector, label = %spec.label, "dropping no-op proposal");
            continue;
        }

        let proposal = Proposal {
            label: spec.label,
            preview,
            edits,
            relevance: spec.relevance,
            detector,
            original: Arc::clone(&original),
        };
        let applied = proposal
            .apply(&original)
            .map_err(|err| internal(format!("{}: {err}", proposal.label)))?;
        if applied != proposal.preview {
            return Err(internal(format!(
                "{}: applying the edits does not reproduce the preview",
                proposal.label
            )));
        }
        rendered.push((order, discovery, proposal));
    }

    rendered.sort_by(|(order_a, disc_a, a), (order_b, disc_b, b)| {
        b.relevance
            .cmp(&a.relevance)
            .then_with(|| order_a.cmp(order_b))
            .then_with(|| disc_a.cmp(disc_b))
    });

    let mut seen = HashSet::new();
    let proposals: Vec<Proposal> = rendered
        .into_iter()
        .filter_map(|(_, _, proposal)| seen.insert(proposal.preview.clone()).then_some(proposal))
        .collect();
    tracing::debug!(target: "quill.assist", count = proposals.len(), "assembled proposals");
    Ok(proposals)
}
