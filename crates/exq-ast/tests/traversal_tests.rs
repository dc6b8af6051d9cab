use exq_ast::{
    Estree, NodeArena, NodeFactory, NodeIndex, Printer, SyntaxKind, Traversal, TraversalError,
    VisitContext, VisitError, Visitor,
};
use serde_json::json;

/// Renames every identifier `from` to `to` by substituting a new node.
struct Rename {
    from: &'static str,
    to: &'static str,
    seen: Vec<String>,
}

impl Visitor for Rename {
    type Error = VisitError;

    fn node_kind(&self) -> u16 {
        SyntaxKind::Identifier as u16
    }

    fn enter(&mut self, cx: &mut VisitContext<'_>) -> Result<(), VisitError> {
        let current = cx.current();
        let Some(name) = cx.arena().identifier_text(current).map(str::to_string) else {
            return Ok(());
        };
        self.seen.push(name.clone());
        if name == self.from {
            let replacement = cx.factory().create_identifier(self.to);
            cx.replace_with(current, replacement)?;
        }
        Ok(())
    }
}

fn lower(tree: serde_json::Value) -> (NodeArena, NodeIndex) {
    let tree: Estree = serde_json::from_value(tree).expect("valid ESTree");
    let mut arena = NodeArena::new();
    let root = tree.lower(&mut arena).expect("lowerable tree");
    (arena, root)
}

#[test]
fn test_post_order_visits_children_first() {
    let (mut arena, root) = lower(json!({
        "type": "Program",
        "body": [{
            "type": "ExpressionStatement",
            "expression": {
                "type": "CallExpression",
                "callee": { "type": "Identifier", "name": "f" },
                "arguments": [
                    { "type": "Identifier", "name": "x" },
                    { "type": "Identifier", "name": "y" }
                ]
            }
        }]
    }));

    let mut visitor = Rename {
        from: "x",
        to: "z",
        seen: Vec::new(),
    };
    let report = Traversal::new(&mut arena, root)
        .run(&mut visitor)
        .expect("traversal");

    assert_eq!(visitor.seen, vec!["f", "x", "y"]);
    assert_eq!(report.visited, 3);
    assert_eq!(report.substitutions, 1);
    assert_eq!(report.root, root);
    assert_eq!(Printer::print_to_string(&arena, root), "f(z, y);");
}

#[test]
fn test_replacing_the_root_updates_report() {
    let mut arena = NodeArena::new();
    let root = arena.add_identifier("x");

    let mut visitor = Rename {
        from: "x",
        to: "y",
        seen: Vec::new(),
    };
    let report = Traversal::new(&mut arena, root)
        .run(&mut visitor)
        .expect("traversal");

    assert_ne!(report.root, root);
    assert_eq!(Printer::print_to_string(&arena, report.root), "y");
    assert!(arena.get(root).expect("old root").is_detached());
}

#[test]
fn test_replacement_is_not_revisited_in_same_pass() {
    let mut arena = NodeArena::new();
    let root = arena.add_identifier("x");

    // x -> x would loop forever if the traversal re-entered replacements
    let mut visitor = Rename {
        from: "x",
        to: "x",
        seen: Vec::new(),
    };
    let report = Traversal::new(&mut arena, root)
        .run(&mut visitor)
        .expect("traversal");

    assert_eq!(report.visited, 1);
    assert_eq!(report.substitutions, 1);
}

struct DoubleRequest;

impl Visitor for DoubleRequest {
    type Error = VisitError;

    fn node_kind(&self) -> u16 {
        SyntaxKind::Identifier as u16
    }

    fn enter(&mut self, cx: &mut VisitContext<'_>) -> Result<(), VisitError> {
        let current = cx.current();
        let first = cx.factory().create_identifier("a");
        cx.replace_with(current, first)?;
        let second = cx.factory().create_identifier("b");
        cx.replace_with(current, second)
    }
}

#[test]
fn test_second_substitution_request_fails() {
    let mut arena = NodeArena::new();
    let id = arena.add_identifier("x");
    let root = arena.add_expression_statement(id);

    let err = Traversal::new(&mut arena, root)
        .run(&mut DoubleRequest)
        .expect_err("duplicate request must fail");

    match err {
        TraversalError::Visitor { node, source } => {
            assert_eq!(node, id);
            assert_eq!(source, VisitError::DuplicateSubstitution { target: id });
        }
        other => panic!("unexpected error: {other}"),
    }
}

struct ReplaceSibling(NodeIndex);

impl Visitor for ReplaceSibling {
    type Error = VisitError;

    fn node_kind(&self) -> u16 {
        SyntaxKind::Identifier as u16
    }

    fn enter(&mut self, cx: &mut VisitContext<'_>) -> Result<(), VisitError> {
        if cx.current() == self.0 {
            return Ok(());
        }
        let replacement = cx.factory().create_identifier("z");
        cx.replace_with(self.0, replacement)
    }
}

#[test]
fn test_substitution_target_must_be_in_scope() {
    let mut arena = NodeArena::new();
    let a = arena.add_identifier("a");
    let b = arena.add_identifier("b");
    let first = arena.add_expression_statement(a);
    let second = arena.add_expression_statement(b);
    let root = arena.add_source_file(vec![first, second]);

    let err = Traversal::new(&mut arena, root)
        .run(&mut ReplaceSibling(b))
        .expect_err("sibling substitution must fail");

    assert!(matches!(
        err,
        TraversalError::Visitor {
            source: VisitError::TargetOutOfScope { .. },
            ..
        }
    ));
}

#[test]
fn test_depth_limit_is_reported() {
    let mut arena = NodeArena::new();
    let mut expr = arena.add_identifier("x");
    for _ in 0..(exq_ast::traverse::MAX_AST_DEPTH + 10) {
        expr = arena.add_parenthesized(expr);
    }

    let mut visitor = Rename {
        from: "x",
        to: "y",
        seen: Vec::new(),
    };
    let err = Traversal::new(&mut arena, expr)
        .run(&mut visitor)
        .expect_err("too deep");
    assert!(matches!(err, TraversalError::DepthExceeded { .. }));
    assert!(visitor.seen.is_empty());
}
