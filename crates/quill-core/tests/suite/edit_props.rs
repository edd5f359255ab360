use proptest::prelude::*;
use quill_core::{EditSet, TextRange, TextRangeExt};

fn non_overlapping(raw: Vec<(usize, usize, String)>, len: usize) -> Vec<(usize, usize, String)> {
    let mut raw = raw;
    raw.sort_by_key(|(start, _, _)| *start);
    let mut out = Vec::new();
    let mut cursor = 0usize;
    for (start, width, text) in raw {
        if start < cursor {
            continue;
        }
        let end = (start + width).min(len);
        out.push((start, end, text));
        cursor = end.max(start + 1);
    }
    out
}

prop_compose! {
    fn text_and_edits()(text in "[a-z \n{};]{1,40}")
        (raw in proptest::collection::vec((0..=text.len(), 0usize..4, "[a-z{}; ]{0,6}"), 0..6),
         text in Just(text))
        -> (String, Vec<(usize, usize, String)>)
    {
        let len = text.len();
        (text, non_overlapping(raw, len))
    }
}

proptest! {
    #[test]
    fn text_outside_edits_is_preserved((text, edits) in text_and_edits()) {
        let mut set = EditSet::new();
        for (start, end, replacement) in &edits {
            set.replace(TextRange::from_offsets(*start, *end), replacement.clone());
        }
        let out = set.apply(&text).unwrap();

        // Rebuild the expected output from the untouched gaps.
        let mut expected = String::new();
        let mut cursor = 0;
        for (start, end, replacement) in &edits {
            expected.push_str(&text[cursor..*start]);
            expected.push_str(replacement);
            cursor = *end;
        }
        expected.push_str(&text[cursor..]);
        prop_assert_eq!(out, expected);
    }

    #[test]
    fn applying_is_order_independent(text in "[a-z]{10,30}", a in 0usize..5, b in 5usize..10) {
        let mut forward = EditSet::new();
        forward.replace(TextRange::from_offsets(a, a + 1), "X");
        forward.insert(b, "Y");
        let mut backward = EditSet::new();
        backward.insert(b, "Y");
        backward.replace(TextRange::from_offsets(a, a + 1), "X");
        prop_assert_eq!(forward.apply(&text).unwrap(), backward.apply(&text).unwrap());
    }
}
