mod diamond;
mod exceptions;
mod if_to_switch;
mod javadoc;
mod multi_catch;
mod nullness;
mod properties;
mod resources;
mod switches;

use quill_assist::{assists, AssistRequest, Proposal};
use quill_config::QuillConfig;
use quill_core::{Diagnostic, ProblemCode};
use quill_syntax::{parse, Semantics};
use quill_test_utils::{extract_range, extract_selection};

/// Proposals for a fixture carrying a `/*caret*/` or `/*start*/…/*end*/` selection.
pub(crate) fn assists_at(fixture: &str, config: &QuillConfig) -> (String, Vec<Proposal>) {
    let (text, selection) = extract_selection(fixture);
    let tree = parse(&text);
    assert!(tree.errors().is_empty(), "fixture does not parse: {:?}", tree.errors());
    let sema = Semantics::new(&tree);
    let proposals = assists(&tree, &sema, &[], AssistRequest::Selection(selection), config)
        .expect("assists must succeed");
    (text, proposals)
}

/// Quick fixes for one diagnostic whose range is marked with `/*start*/…/*end*/`.
pub(crate) fn fixes_for(
    fixture: &str,
    code: ProblemCode,
    arguments: &[&str],
    config: &QuillConfig,
) -> (String, Vec<Proposal>) {
    let (text, range) = extract_range(fixture);
    let tree = parse(&text);
    assert!(tree.errors().is_empty(), "fixture does not parse: {:?}", tree.errors());
    let sema = Semantics::new(&tree);
    let diagnostic = arguments
        .iter()
        .fold(Diagnostic::error(code, range), |d, arg| d.with_argument(*arg));
    let all = [diagnostic];
    let proposals = assists(&tree, &sema, &all, AssistRequest::Diagnostic(&all[0]), config)
        .expect("assists must succeed");
    (text, proposals)
}

pub(crate) fn labels(proposals: &[Proposal]) -> Vec<&str> {
    proposals.iter().map(Proposal::label).collect()
}

#[track_caller]
pub(crate) fn find<'p>(proposals: &'p [Proposal], label: &str) -> &'p Proposal {
    proposals
        .iter()
        .find(|p| p.label() == label)
        .unwrap_or_else(|| panic!("no proposal {label:?} among {:?}", labels(proposals)))
}

pub(crate) fn config_with_release(release: u16) -> QuillConfig {
    let mut config = QuillConfig::default();
    config.java.release = release;
    config
}
