use quill_core::{TextRange, TextRangeExt};

const CARET: &str = "/*caret*/";
const START: &str = "/*start*/";
const END: &str = "/*end*/";

/// Extracts a selection from a fixture containing `/*start*/` and `/*end*/` markers.
///
/// Returns the fixture with markers removed and the selection in the stripped text.
pub fn extract_range(fixture: &str) -> (String, TextRange) {
    let start = fixture
        .find(START)
        .expect("fixture missing /*start*/ marker");
    let after_start = start + START.len();
    let end = fixture.find(END).expect("fixture missing /*end*/ marker");
    assert!(end >= after_start, "/*end*/ must come after /*start*/");

    let mut text = String::with_capacity(fixture.len());
    text.push_str(&fixture[..start]);
    text.push_str(&fixture[after_start..end]);
    text.push_str(&fixture[end + END.len()..]);

    // The start stays put; the end shrinks by the start marker.
    let range = TextRange::from_offsets(start, end - START.len());
    (text, range)
}

/// Extracts the caret offset from a fixture containing one `/*caret*/` marker.
pub fn extract_caret(fixture: &str) -> (String, usize) {
    let offset = fixture
        .find(CARET)
        .expect("fixture missing /*caret*/ marker");
    assert!(
        fixture[offset + CARET.len()..].find(CARET).is_none(),
        "fixture has more than one /*caret*/ marker"
    );
    let mut text = String::with_capacity(fixture.len());
    text.push_str(&fixture[..offset]);
    text.push_str(&fixture[offset + CARET.len()..]);
    (text, offset)
}

/// Either marker style: a `/*caret*/` yields an empty range.
pub fn extract_selection(fixture: &str) -> (String, TextRange) {
    if fixture.contains(CARET) {
        let (text, offset) = extract_caret(fixture);
        (text, TextRange::empty_at(offset))
    } else {
        extract_range(fixture)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_markers_are_stripped() {
        let (text, range) = extract_range("a /*start*/bc/*end*/ d");
        assert_eq!(text, "a bc d");
        assert_eq!(range.slice(&text), "bc");
    }

    #[test]
    fn caret_marker_is_stripped() {
        let (text, offset) = extract_caret("foo(/*caret*/x)");
        assert_eq!(text, "foo(x)");
        assert_eq!(offset, 4);
        let (_, range) = extract_selection("foo(/*caret*/x)");
        assert!(range.is_empty());
    }
}
