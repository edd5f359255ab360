use pretty_assertions::assert_eq;
use quill_core::{TextRange, TextRangeExt};
use quill_syntax::parse;

#[test]
fn structural_key_ignores_comments_and_layout() {
    let source = "class A { void m() { f(a /* x */, b); }\n void n() { f(a,\n   b);   } }";
    let tree = parse(source);
    let first = source.find("f(a /*").unwrap();
    let second = source.find("f(a,\n").unwrap();
    let a = tree.structural_key(TextRange::from_offsets(first, source.find("b);").unwrap() + 3));
    let b = tree.structural_key(TextRange::from_offsets(second, source.rfind("b);").unwrap() + 3));
    assert_eq!(a, b);
    assert_eq!(a, ["f", "(", "a", ",", "b", ")", ";"]);
}

#[test]
fn comments_before_closing_brace_have_no_owner() {
    let source = "class A {\n    void m() {\n        a();\n        // tail\n    }\n}\n";
    let tree = parse(source);
    let close = source.find("    }\n}").unwrap() + 4;
    // `}` is not a node start, but the comment still reads as leading trivia of the brace.
    assert_eq!(tree.leading_trivia(close).len(), 1);
    let a = source.find("a();").unwrap();
    let owned = tree.owned_range(TextRange::from_offsets(a, a + 4));
    assert_eq!(tree.slice(owned), "a();");
}

#[test]
fn owned_range_takes_leading_and_trailing_comments() {
    let source = "{\n    // lead\n    x(); // trail\n    y();\n}";
    let tree = parse(source);
    let x = source.find("x();").unwrap();
    let owned = tree.owned_range(TextRange::from_offsets(x, x + 4));
    assert_eq!(tree.slice(owned), "// lead\n    x(); // trail");
    let removal = tree.removal_range(TextRange::from_offsets(x, x + 4));
    assert_eq!(tree.slice(removal), "    // lead\n    x(); // trail\n");
}
