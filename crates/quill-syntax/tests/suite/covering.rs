use quill_core::{TextRange, TextRangeExt};
use quill_syntax::ast::{ExprKind, Stmt};
use quill_syntax::walk::{self, NodeRef};
use quill_syntax::parse;

const SOURCE: &str = r#"package p;

/** Docs. */
public class Shapes<T extends Comparable<T>> implements Runnable {
    private final Map<String, List<T>> cache = new HashMap<>();

    enum Kind { CIRCLE, SQUARE { int sides() { return 4; } } }

    public void run() {
        for (int i = 0, j = 1; i < 10; i++) {
            if (i % 2 == 0) continue;
        }
        for (String s : names()) {
            label: while (s.isEmpty()) { break label; }
        }
        try (Reader r = open()) {
            r.read();
        } catch (IOException | RuntimeException e) {
            log(e);
        }
        Runnable task = () -> { synchronized (this) { assert cache != null : "cache"; } };
        Object o = (Object) new int[] { 1, 2 };
        int k = switch (o.hashCode()) { case 1, 2 -> 3; default -> { yield 4; } };
    }
}
"#;

#[test]
fn every_node_is_nested_in_its_parent() {
    let tree = parse(SOURCE);
    assert!(tree.errors().is_empty(), "{:?}", tree.errors());
    for node in walk::descendants(tree.root()) {
        let path = tree.covering_path(node.range()).expect("consistent tree");
        assert!(path.last().is_some_and(|n| n.range().contains_range(node.range())));
    }
}

#[test]
fn caret_selects_smallest_node() {
    let tree = parse(SOURCE);
    let offset = SOURCE.find("r.read()").unwrap() + 2;
    let path = tree.covering_path(TextRange::empty_at(offset)).unwrap();
    assert!(matches!(path.first(), Some(NodeRef::Unit(_))));
    assert!(path.iter().any(|n| matches!(n, NodeRef::Stmt(Stmt::Try(_)))));
    assert!(matches!(
        path.last(),
        Some(NodeRef::Expr(e)) if matches!(e.kind, ExprKind::MethodCall { .. })
    ));
}

#[test]
fn caret_between_nodes_prefers_following() {
    let source = "class A { void m() { a();b(); } }";
    let tree = parse(source);
    let offset = source.find("b()").unwrap();
    let path = tree.covering_path(TextRange::empty_at(offset)).unwrap();
    let stmt = path
        .iter()
        .rev()
        .find_map(|n| match n {
            NodeRef::Stmt(s) => Some(*s),
            _ => None,
        })
        .unwrap();
    assert_eq!(tree.slice(stmt.range()), "b();");
}
