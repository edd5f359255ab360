//! Properties every proposal must have, whichever detector produced it.

use pretty_assertions::assert_eq;
use quill_assist::{assists, AssistRequest};
use quill_config::QuillConfig;
use quill_core::{Diagnostic, EditError, ProblemCode, TextRange, TextRangeExt};
use quill_syntax::{parse, Semantics};

use super::{assists_at, find, labels};

const FIXTURES: &[&str] = &[
    r#"class A {
    // leading comment
    void m(int x) {
        /*caret*/if (x == 1) {
            one(); // first
        } else if (x == 2) {
            two();
        }
    }
}
"#,
    r#"class A {
    void m() {
        try {
            run();
        } catch (IOException e) {
            log(e); /* same */
        } catch (/*caret*/SQLException e) {
            log(e); /* same */
        }
    }
}
"#,
    r#"class A {
    enum Color { RED, GREEN }

    /**
     * Paints.
     */
    int /*caret*/paint(Color c) {
        switch (c) {
            case RED:
                return 1;
        }
        return 0;
    }
}
"#,
    r#"class A {
    void m() {
        Map<String, List<Integer>> index = new /*caret*/HashMap<String, List<Integer>>();
    }
}
"#,
];

#[test]
fn previews_are_reproduced_by_applying_the_edits() {
    for fixture in FIXTURES {
        let (text, proposals) = assists_at(fixture, &QuillConfig::default());
        assert!(!proposals.is_empty(), "no proposals for {fixture}");
        for proposal in &proposals {
            assert_ne!(proposal.preview(), text, "{} is a no-op", proposal.label());
            assert_eq!(proposal.apply(&text).unwrap(), proposal.preview());
        }
    }
}

#[test]
fn text_outside_the_edits_is_untouched() {
    for fixture in FIXTURES {
        let (text, proposals) = assists_at(fixture, &QuillConfig::default());
        for proposal in &proposals {
            let covered = proposal.edits().covering_range().unwrap();
            let preview = proposal.preview();
            assert_eq!(&preview[..covered.start_offset()], &text[..covered.start_offset()], "{}", proposal.label());
            assert!(preview.ends_with(&text[covered.end_offset()..]), "{}", proposal.label());
        }
    }
}

#[test]
fn comments_in_moved_code_survive() {
    let (_, proposals) = assists_at(FIXTURES[0], &QuillConfig::default());
    let convert = find(&proposals, "Convert to 'switch'");
    assert!(convert.preview().contains("    // leading comment\n"));
    assert!(convert.preview().contains("one(); // first"));

    let (_, proposals) = assists_at(FIXTURES[1], &QuillConfig::default());
    let combine = find(&proposals, "Combine catch blocks");
    assert!(combine.preview().contains("log(e); /* same */"));
}

#[test]
fn results_are_stable() {
    for fixture in FIXTURES {
        let (_, first) = assists_at(fixture, &QuillConfig::default());
        let (_, second) = assists_at(fixture, &QuillConfig::default());
        assert_eq!(first, second);
    }
}

#[test]
fn proposals_are_sorted_by_relevance() {
    for fixture in FIXTURES {
        let (_, proposals) = assists_at(fixture, &QuillConfig::default());
        assert!(
            proposals.windows(2).all(|w| w[0].relevance() >= w[1].relevance()),
            "{:?}",
            labels(&proposals)
        );
    }
}

#[test]
fn previews_are_distinct() {
    for fixture in FIXTURES {
        let (_, proposals) = assists_at(fixture, &QuillConfig::default());
        for (i, a) in proposals.iter().enumerate() {
            for b in &proposals[i + 1..] {
                assert_ne!(a.preview(), b.preview(), "{} and {}", a.label(), b.label());
            }
        }
    }
}

#[test]
fn disabled_rules_produce_nothing() {
    let mut config = QuillConfig::default();
    config.assist.rules.insert("if_to_switch".to_string(), false);
    let (_, proposals) = assists_at(FIXTURES[0], &config);
    assert!(proposals.iter().all(|p| p.detector() != "if_to_switch"));

    let config = QuillConfig::load_from_str("[assist.rules]\nmulti_catch = false\n").unwrap();
    let (_, proposals) = assists_at(FIXTURES[1], &config);
    assert!(!labels(&proposals).contains(&"Combine catch blocks"));
}

#[test]
fn crlf_files_keep_their_line_endings() {
    let fixture = FIXTURES[0].replace('\n', "\r\n");
    let (_, proposals) = assists_at(&fixture, &QuillConfig::default());
    let convert = find(&proposals, "Convert to 'switch'");
    let preview = convert.preview();
    let bare = preview
        .match_indices('\n')
        .filter(|(i, _)| *i == 0 || preview.as_bytes()[i - 1] != b'\r')
        .count();
    assert_eq!(bare, 0, "{preview:?}");
}

#[test]
fn tab_indented_files_get_tabs() {
    let (_, proposals) = assists_at(
        "class A {\n\tvoid m(int x) {\n\t\t/*caret*/if (x == 1) {\n\t\t\tone();\n\t\t} else if (x == 2) {\n\t\t\ttwo();\n\t\t}\n\t}\n}\n",
        &QuillConfig::default(),
    );
    let convert = find(&proposals, "Convert to 'switch'");
    assert!(convert
        .preview()
        .contains("\t\tswitch (x) {\n\t\t\tcase 1:\n\t\t\t\tone();\n\t\t\t\tbreak;\n"));
}

#[test]
fn apply_rejects_other_text() {
    let (text, proposals) = assists_at(FIXTURES[0], &QuillConfig::default());
    let proposal = &proposals[0];
    let edited = format!("{text}\n");
    assert_eq!(proposal.apply(&edited), Err(EditError::TextMismatch));
}

#[test]
fn unified_diff_shows_the_change() {
    let (_, proposals) = assists_at(FIXTURES[3], &QuillConfig::default());
    let remove = find(&proposals, "Remove type arguments");
    let diff = remove.unified_diff();
    assert!(diff.contains("-        Map<String, List<Integer>> index = new HashMap<String, List<Integer>>();"));
    assert!(diff.contains("+        Map<String, List<Integer>> index = new HashMap<>();"));
}

#[test]
fn requests_outside_the_text_offer_nothing() {
    let text = "class A {}";
    let tree = parse(text);
    let sema = Semantics::new(&tree);
    let config = QuillConfig::default();

    let past_the_end = assists(
        &tree,
        &sema,
        &[],
        AssistRequest::Selection(TextRange::from_offsets(10, 11)),
        &config,
    );
    assert_eq!(past_the_end, Ok(Vec::new()));

    let stale = Diagnostic::error(ProblemCode::UnhandledException, TextRange::from_offsets(4, 40))
        .with_argument("IOException");
    let from_diagnostic = assists(&tree, &sema, &[], AssistRequest::Diagnostic(&stale), &config);
    assert_eq!(from_diagnostic, Ok(Vec::new()));
}

#[test]
fn nothing_to_offer_is_an_empty_list() {
    let (_, proposals) = assists_at("class A {\n    int x = /*caret*/1;\n}\n", &QuillConfig::default());
    assert!(proposals.is_empty(), "{:?}", labels(&proposals));
}
