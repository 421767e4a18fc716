//! Parser integration tests: precedence, node shapes and error kinds

use rstest::rstest;
use tacoscript::taco::error::SyntaxErrorKind;
use tacoscript::taco::testing::{
    assert_file, assert_node, parse_err, parse_err_with, parse_expression, parse_ok, TextMatch,
};
use tacoscript::{NodeKind, ParseOptions};

/// Render an expression with explicit grouping, e.g. `(a + (b * c))`
fn grouping(node: &tacoscript::Node) -> String {
    match &node.kind {
        NodeKind::BinaryExpression {
            operator,
            left,
            right,
            ..
        }
        | NodeKind::LogicalExpression {
            operator,
            left,
            right,
            ..
        } => format!("({} {} {})", grouping(left), operator, grouping(right)),
        NodeKind::Identifier { name } => name.clone(),
        NodeKind::Literal { raw, .. } => raw.clone(),
        other => panic!("unexpected node in precedence test: {:?}", other),
    }
}

#[rstest]
#[case("a + b * c", "(a + (b * c))")]
#[case("a * b + c", "((a * b) + c)")]
#[case("a - b - c", "((a - b) - c)")]
#[case("a ** b ** c", "(a ** (b ** c))")]
#[case("a or b and c", "(a || (b && c))")]
#[case("a and b or c", "((a && b) || c)")]
#[case("a is b or c isnt d", "((a === b) || (c !== d))")]
#[case("a < b == c", "((a < b) === c)")]
#[case("a | b ^ c & d", "(a | (b ^ (c & d)))")]
#[case("a << 1 + 2", "(a << (1 + 2))")]
#[case("a in b instanceof c", "((a in b) instanceof c)")]
#[case("a ~= b", "(a == b)")]
fn test_operator_precedence(#[case] source: &str, #[case] expected: &str) {
    let node = parse_expression(&format!("{}\n", source));
    assert_eq!(grouping(&node), expected);
}

#[rstest]
#[case("a b\n", SyntaxErrorKind::UnexpectedToken)]
#[case("a +\n", SyntaxErrorKind::UnexpectedToken)]
#[case("a\n  b\n", SyntaxErrorKind::UnexpectedIndentation)]
#[case("(a", SyntaxErrorKind::UnclosedGroup)]
#[case("'abc", SyntaxErrorKind::UnterminatedString)]
#[case("#* open", SyntaxErrorKind::UnterminatedComment)]
#[case("`open", SyntaxErrorKind::UnterminatedTemplate)]
#[case("f!\n  a\ng!\n\tb\n", SyntaxErrorKind::InconsistentIndentation)]
#[case("a + b = c\n", SyntaxErrorKind::InvalidLeftHandSide)]
#[case("[...a, b] = c\n", SyntaxErrorKind::InvalidLeftHandSide)]
#[case("eval = 1\n", SyntaxErrorKind::InvalidLeftHandSide)]
#[case("yield a\n", SyntaxErrorKind::InvalidYield)]
fn test_error_kinds(#[case] source: &str, #[case] expected: SyntaxErrorKind) {
    assert_eq!(parse_err(source).syntax_kind(), Some(expected));
}

#[rstest]
#[case("not a\n")]
#[case("{a}\n")]
#[case("({a}) => a\n")]
#[case("super.x\n")]
fn test_not_implemented(#[case] source: &str) {
    assert!(parse_err(source).is_not_implemented());
}

#[test]
fn test_script_allows_eval_target() {
    let options = ParseOptions::default().script();
    assert!(tacoscript::parse("eval = 1\n", &options).is_ok());
    let module = ParseOptions::default();
    assert!(parse_err_with("arguments = 1\n", &module).syntax_kind().is_some());
}

#[test]
fn test_assignment_is_right_associative() {
    let node = parse_expression("a = b = c\n");
    assert_node(&node)
        .kind("AssignmentExpression")
        .operator("=")
        .child(0, |left| {
            left.name("a");
        })
        .child(1, |right| {
            right.kind("AssignmentExpression").child(0, |b| {
                b.name("b");
            });
        });
}

#[test]
fn test_call_member_and_bind() {
    let source = "a.b[c](d)::e.f\n";
    let node = parse_expression(source);
    assert_node(&node)
        .kind("BindExpression")
        .child(0, |object| {
            object
                .kind("CallExpression")
                .source(source, TextMatch::Exact("a.b[c](d)".to_string()))
                .child(0, |callee| {
                    callee.kind("MemberExpression").child(1, |property| {
                        property.name("c");
                    });
                });
        })
        .child(1, |callee| {
            callee.kind("MemberExpression");
        });
}

#[test]
fn test_exclamation_call_forms() {
    let file = parse_ok("f!\ng! a, b\nh!\n  x\n  y\n");
    assert_file(&file)
        .statement_count(3)
        .expression(0, |call| {
            call.kind("CallExpression").child_count(1);
        })
        .expression(1, |call| {
            call.kind("CallExpression").child_count(3);
        })
        .expression(2, |call| {
            call.kind("CallExpression")
                .child_count(3)
                .child(2, |y| {
                    y.name("y").starts_at(5, 2);
                });
        });
    let NodeKind::CallExpression {
        exclamation,
        indented,
        ..
    } = &file.expression(2).unwrap().kind
    else {
        panic!("expected a call");
    };
    assert!(*exclamation);
    assert!(*indented);
}

#[test]
fn test_conditional_requires_else() {
    let node = parse_expression("if a then b else c\n");
    assert_node(&node).kind("ConditionalExpression").child_count(3);
    assert_eq!(
        parse_err("if a then b\n").syntax_kind(),
        Some(SyntaxErrorKind::UnexpectedToken)
    );
}

#[test]
fn test_arrow_functions() {
    let node = parse_expression("([a, ...b], c) => a\n");
    assert_node(&node)
        .kind("ArrowFunctionExpression")
        .child_count(3)
        .child(0, |pattern| {
            pattern.kind("ArrayPattern").child(1, |rest| {
                rest.kind("RestElement");
            });
        });

    let node = parse_expression("(a + b)\n");
    assert_node(&node).kind("ParenthesizedExpression");
}

#[test]
fn test_literals_and_templates() {
    let file = parse_ok("0x10\n\"a\\nb\"\ntag`x${y}z`\nnull\n");
    assert_file(&file)
        .statement_count(4)
        .expression(0, |literal| {
            literal.raw("0x10").number(16.0);
        })
        .expression(1, |literal| {
            literal.string("a\nb");
        })
        .expression(2, |tagged| {
            tagged
                .kind("TaggedTemplateExpression")
                .child(1, |quasi| {
                    quasi.kind("TemplateLiteral").child_count(3);
                });
        })
        .expression(3, |literal| {
            literal.kind("Literal").raw("null");
        });
}

#[test]
fn test_positions() {
    let source = "first\n\nsecond + third\n";
    let file = parse_ok(source);
    assert_file(&file).expression(1, |binary| {
        binary
            .starts_at(3, 0)
            .span(7, 21)
            .child(1, |third| {
                third.starts_at(3, 9);
            });
    });
}

#[test]
fn test_error_renders_context() {
    let source = "a\nb c\nd\n";
    let rendered = parse_err(source).render_with_source(source);
    assert!(rendered.contains(">>"));
    assert!(rendered.contains("b c"));
}

#[test]
fn test_mixed_access_chain_leans_left() {
    let source = "a.b[0]!(c)\n";
    let node = parse_expression(source);
    assert_node(&node)
        .kind("CallExpression")
        .source(source, TextMatch::Exact("a.b[0]!(c)".to_string()))
        .child_count(2)
        .child(0, |index| {
            index
                .kind("MemberExpression")
                .source(source, TextMatch::Exact("a.b[0]".to_string()))
                .child(0, |dot| {
                    dot.kind("MemberExpression")
                        .child(0, |root| {
                            root.name("a").starts_at(1, 0);
                        })
                        .child(1, |property| {
                            property.name("b");
                        });
                })
                .child(1, |zero| {
                    zero.number(0.0);
                });
        })
        .child(1, |argument| {
            argument.kind("ParenthesizedExpression");
        });
    let NodeKind::CallExpression { exclamation, .. } = &node.kind else {
        panic!("expected a call");
    };
    assert!(*exclamation);
}

#[test]
fn test_two_space_blocks_parse_without_warnings() {
    let source = "f!\n  a\n  g!\n    b\n    c\nx = [\n  1\n  2\n]\nh(\n  y\n)\n";
    let file = parse_ok(source);
    assert!(file.warnings.is_empty(), "{:?}", file.warnings);
    assert_eq!(
        file.indentation.as_ref().map(|unit| unit.text()),
        Some("  ".to_string())
    );
    assert_file(&file)
        .statement_count(3)
        .expression(0, |call| {
            call.kind("CallExpression").child_count(3).child(2, |inner| {
                inner.kind("CallExpression").child_count(3);
            });
        });
}

/// Run `check` on a thread with enough stack for very deep trees
fn with_large_stack(check: impl FnOnce() + Send + 'static) {
    std::thread::Builder::new()
        .stack_size(16 * 1024 * 1024)
        .spawn(check)
        .unwrap()
        .join()
        .unwrap();
}

#[test]
fn test_long_left_associative_chain() {
    with_large_stack(|| {
        let source = format!("{}\n", vec!["a"; 10_000].join(" + "));
        let file = parse_ok(&source);
        assert_file(&file).expression(0, |sum| {
            sum.kind("BinaryExpression")
                .child(0, |rest| {
                    rest.kind("BinaryExpression");
                })
                .child(1, |last| {
                    last.name("a").starts_at(1, 39_996);
                });
        });
    });
}

#[test]
fn test_deep_nesting_is_rejected() {
    with_large_stack(|| {
        let parens = format!("{}a{}\n", "(".repeat(500), ")".repeat(500));
        assert_eq!(
            parse_err(&parens).syntax_kind(),
            Some(SyntaxErrorKind::NestingTooDeep)
        );

        let arrays = format!("x = {}1{}\n", "[".repeat(500), "]".repeat(500));
        assert_eq!(
            parse_err(&arrays).syntax_kind(),
            Some(SyntaxErrorKind::NestingTooDeep)
        );

        let powers = format!("{}\n", vec!["a"; 500].join(" ** "));
        assert_eq!(
            parse_err(&powers).syntax_kind(),
            Some(SyntaxErrorKind::NestingTooDeep)
        );

        parse_ok(&format!("{}a{}\n", "(".repeat(20), ")".repeat(20)));
    });
}
