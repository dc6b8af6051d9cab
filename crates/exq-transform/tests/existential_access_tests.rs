use exq_ast::node::AccessExprData;
use exq_ast::{
    Estree, NodeArena, NodeIndex, Printer, Traversal, TraversalError, syntax_kind_ext,
};
use exq_transform::{
    ExistentialAccessVisitor, ExistentialOptions, NullGuardOperand, RewriteError,
    rewrite_existential_access, run_existential_pass,
};
use serde_json::{Value, json};

const EXISTS_A: &str = r#"typeof a !== "undefined" && a !== null"#;

fn ident(name: &str) -> Value {
    json!({ "type": "Identifier", "name": name })
}

fn member(object: Value, name: &str) -> Value {
    json!({ "type": "MemberExpression", "object": object, "property": ident(name), "computed": false })
}

fn call(callee: Value, arguments: Vec<Value>) -> Value {
    json!({ "type": "CallExpression", "callee": callee, "arguments": arguments })
}

fn assign(left: &str, right: Value) -> Value {
    json!({ "type": "AssignmentExpression", "operator": "=", "left": ident(left), "right": right })
}

fn stmt(expression: Value) -> Value {
    json!({ "type": "ExpressionStatement", "expression": expression })
}

fn program(body: Vec<Value>) -> Value {
    json!({ "type": "Program", "body": body })
}

fn lower(tree: Value) -> (NodeArena, NodeIndex) {
    let tree: Estree = serde_json::from_value(tree).expect("valid ESTree");
    let mut arena = NodeArena::new();
    let root = tree.lower(&mut arena).expect("lowerable tree");
    (arena, root)
}

/// Run one pass with `options` and return (printed output, substitutions).
fn rewrite_with(tree: Value, options: &ExistentialOptions) -> (String, usize) {
    let (mut arena, root) = lower(tree);
    let outcome = run_existential_pass(&mut arena, root, options).expect("rewrite");
    (
        Printer::print_to_string(&arena, outcome.report.root),
        outcome.report.substitutions,
    )
}

fn rewrite(tree: Value) -> String {
    rewrite_with(tree, &ExistentialOptions::default()).0
}

#[test]
fn test_discarded_access_becomes_boolean_check() {
    let out = rewrite(program(vec![stmt(member(ident("a"), "ex"))]));
    assert_eq!(out, format!("{EXISTS_A} ? true : false;"));
}

#[test]
fn test_assigned_access_yields_object_or_undefined() {
    let out = rewrite(program(vec![stmt(assign("b", member(ident("a"), "ex")))]));
    assert_eq!(out, format!("b = {EXISTS_A} ? a : void 0;"));
}

#[test]
fn test_argument_access_yields_object_or_undefined() {
    let out = rewrite(program(vec![stmt(call(
        ident("f"),
        vec![member(ident("a"), "ex")],
    ))]));
    assert_eq!(out, format!("f({EXISTS_A} ? a : void 0);"));
}

#[test]
fn test_returned_access_is_consumed() {
    let out = rewrite(program(vec![json!({
        "type": "ReturnStatement",
        "argument": member(ident("a"), "ex")
    })]));
    assert_eq!(out, format!("return {EXISTS_A} ? a : void 0;"));
}

#[test]
fn test_root_access_is_consumed_and_replaces_root() {
    let (mut arena, root) = lower(member(ident("a"), "ex"));
    let outcome =
        run_existential_pass(&mut arena, root, &ExistentialOptions::default()).expect("rewrite");

    assert_ne!(outcome.report.root, root);
    assert_eq!(
        Printer::print_to_string(&arena, outcome.report.root),
        format!("{EXISTS_A} ? a : void 0")
    );
}

#[test]
fn test_complex_base_is_copied_into_each_position() {
    let out = rewrite(program(vec![stmt(assign(
        "b",
        member(call(ident("f"), vec![]), "ex"),
    ))]));
    assert_eq!(
        out,
        r#"b = typeof f() !== "undefined" && f() !== null ? f() : void 0;"#
    );
}

#[test]
fn test_other_accesses_are_untouched() {
    let input = program(vec![
        stmt(member(member(ident("a"), "b"), "c")),
        stmt(call(ident("f"), vec![member(ident("x"), "exists")])),
        stmt(json!({
            "type": "MemberExpression",
            "object": ident("a"),
            "property": { "type": "Literal", "value": "ex" },
            "computed": true
        })),
    ]);
    let tree: Estree = serde_json::from_value(input).unwrap();
    let mut arena = NodeArena::new();
    let root = tree.lower(&mut arena).unwrap();

    for _ in 0..2 {
        let outcome =
            run_existential_pass(&mut arena, root, &ExistentialOptions::default()).unwrap();
        assert_eq!(outcome.report.substitutions, 0);
        assert_eq!(outcome.stats.matched, 0);
        assert_eq!(outcome.report.root, root);
    }
    assert_eq!(Estree::raise(&arena, root).unwrap(), tree);
    assert_eq!(
        Printer::print_to_string(&arena, root),
        "a.b.c;\nf(x.exists);\na[\"ex\"];"
    );
}

#[test]
fn test_independent_accesses_are_each_rewritten() {
    let (out, substitutions) = rewrite_with(
        program(vec![
            stmt(assign("b", member(ident("a"), "ex"))),
            stmt(assign("d", member(ident("c"), "ex"))),
        ]),
        &ExistentialOptions::default(),
    );

    assert_eq!(substitutions, 2);
    assert_eq!(
        out,
        format!(
            "b = {EXISTS_A} ? a : void 0;\n\
             d = typeof c !== \"undefined\" && c !== null ? c : void 0;"
        )
    );
}

#[test]
fn test_chained_sentinel_rewrites_inside_out() {
    let (out, substitutions) = rewrite_with(
        program(vec![stmt(assign("b", member(member(ident("a"), "ex"), "ex")))]),
        &ExistentialOptions::default(),
    );

    assert_eq!(substitutions, 2);
    let inner = format!("{EXISTS_A} ? a : void 0");
    assert_eq!(
        out,
        format!("b = typeof ({inner}) !== \"undefined\" && ({inner}) !== null ? {inner} : void 0;")
    );
}

#[test]
fn test_second_pass_over_output_is_a_no_op() {
    for null_guard in [NullGuardOperand::BaseObject, NullGuardOperand::PropertyName] {
        let options = ExistentialOptions::default().with_null_guard(null_guard);
        let (mut arena, root) = lower(program(vec![
            stmt(member(ident("a"), "ex")),
            stmt(assign("b", member(ident("c"), "ex"))),
        ]));

        let first = run_existential_pass(&mut arena, root, &options).unwrap();
        assert_eq!(first.report.substitutions, 2);
        let printed = Printer::print_to_string(&arena, first.report.root);

        let second = run_existential_pass(&mut arena, first.report.root, &options).unwrap();
        assert_eq!(second.report.substitutions, 0);
        assert_eq!(Printer::print_to_string(&arena, second.report.root), printed);
    }
}

#[test]
fn test_null_guard_operand_flag() {
    let input = || program(vec![stmt(assign("b", member(ident("a"), "ex")))]);

    let (base, _) = rewrite_with(input(), &ExistentialOptions::default());
    assert_eq!(base, format!("b = {EXISTS_A} ? a : void 0;"));

    let options = ExistentialOptions::default().with_null_guard(NullGuardOperand::PropertyName);
    let (name, _) = rewrite_with(input(), &options);
    assert_eq!(
        name,
        r#"b = typeof a !== "undefined" && ex !== null ? a : void 0;"#
    );
}

#[test]
fn test_custom_sentinel() {
    let options = ExistentialOptions::default().with_sentinel("maybe");
    let (out, substitutions) = rewrite_with(
        program(vec![
            stmt(assign("b", member(ident("a"), "maybe"))),
            stmt(assign("c", member(ident("a"), "ex"))),
        ]),
        &options,
    );

    assert_eq!(substitutions, 1);
    assert_eq!(out, format!("b = {EXISTS_A} ? a : void 0;\nc = a.ex;"));
}

#[test]
fn test_stats_count_matches() {
    let (mut arena, root) = lower(program(vec![
        stmt(member(ident("a"), "ex")),
        stmt(call(ident("f"), vec![member(ident("b"), "ex")])),
        stmt(member(ident("c"), "d")),
    ]));
    let outcome = run_existential_pass(&mut arena, root, &ExistentialOptions::default()).unwrap();

    assert_eq!(outcome.report.visited, 3);
    assert_eq!(outcome.stats.matched, 2);
    assert_eq!(outcome.stats.rewritten, 2);
    assert_eq!(outcome.stats.member_branches, 2);
    assert_eq!(outcome.stats.call_branches, 0);
}

#[test]
fn test_pure_rewrite_does_not_commit() {
    let (mut arena, root) = lower(program(vec![stmt(assign("b", member(ident("a"), "ex")))]));
    let before = Printer::print_to_string(&arena, root);

    let access = (0..arena.len() as u32)
        .map(NodeIndex)
        .find(|&idx| {
            arena
                .get(idx)
                .is_some_and(|n| n.kind == syntax_kind_ext::PROPERTY_ACCESS_EXPRESSION)
        })
        .expect("access node");

    let options = ExistentialOptions::default();
    let replacement = rewrite_existential_access(&mut arena, access, &options)
        .unwrap()
        .expect("sentinel access matches");
    assert_eq!(replacement.target, access);
    assert_eq!(Printer::print_to_string(&arena, root), before);
    assert_eq!(
        Printer::print_to_string(&arena, replacement.node),
        format!("{EXISTS_A} ? a : void 0")
    );

    assert_eq!(
        rewrite_existential_access(&mut arena, root, &options).unwrap(),
        None
    );
}

#[test]
fn test_access_without_identifier_name_is_an_error() {
    let mut arena = NodeArena::new();
    let expression = arena.add_identifier("a");
    let name_or_argument = arena.add_string_literal("ex");
    let access = arena.add_access_expr(
        syntax_kind_ext::PROPERTY_ACCESS_EXPRESSION,
        AccessExprData {
            expression,
            name_or_argument,
        },
    );
    let root = arena.add_expression_statement(access);

    let err = run_existential_pass(&mut arena, root, &ExistentialOptions::default())
        .expect_err("malformed access");
    match err {
        TraversalError::Visitor { node, source } => {
            assert_eq!(node, access);
            assert_eq!(source, RewriteError::MissingPropertyName(access));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_visitor_reused_across_documents() {
    let mut visitor = ExistentialAccessVisitor::default();

    for round in 1..=2 {
        // Each document gets its own arena, so node indices repeat.
        let (mut arena, root) =
            lower(program(vec![stmt(assign("b", member(ident("a"), "ex")))]));
        let report = Traversal::new(&mut arena, root)
            .run(&mut visitor)
            .expect("rewrite");

        assert_eq!(report.substitutions, 1);
        assert_eq!(
            Printer::print_to_string(&arena, report.root),
            format!("b = {EXISTS_A} ? a : void 0;")
        );
        assert_eq!(visitor.stats().rewritten, round);
    }
}

#[test]
fn test_negated_base_keeps_sign_separation() {
    let negate = |argument: Value| {
        json!({ "type": "UnaryExpression", "operator": "-", "argument": argument, "prefix": true })
    };
    let out = rewrite(program(vec![stmt(assign(
        "b",
        member(negate(negate(ident("a"))), "ex"),
    ))]));

    assert!(!out.contains("--"));
    assert_eq!(
        out,
        r#"b = typeof - -a !== "undefined" && - -a !== null ? - -a : void 0;"#
    );
}
