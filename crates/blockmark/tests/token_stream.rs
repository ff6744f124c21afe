use blockmark::{
    BoundaryKind, MarkupConfig, MarkupError, Span, SyntaxNode, Token, TokenStream, markup_blocks,
};
use pretty_assertions::assert_eq;

fn lit(line: usize, column: usize, value: &str) -> SyntaxNode {
    SyntaxNode::Literal {
        span: Span::on_line(line, column, value.chars().count()),
        value: value.to_string(),
    }
}

fn call(line: usize, column: usize, len: usize, args: Vec<SyntaxNode>) -> SyntaxNode {
    SyntaxNode::Call {
        span: Span::on_line(line, column, len),
        callee: Some(Box::new(lit(line, column, "f"))),
        args,
    }
}

fn run(tree: &[SyntaxNode], text: &str) -> TokenStream {
    let stream = markup_blocks(tree, text, &MarkupConfig::default()).unwrap();
    stream.check_nesting().unwrap();
    stream
}

const PLACEHOLDER: [&str; 4] = [
    "blockStart handwritten",
    "socketStart handwritten",
    "socketEnd",
    "blockEnd",
];

#[test]
fn test_binary_operator_line() {
    let tree = [SyntaxNode::Operator {
        span: Span::on_line(0, 0, 5),
        operator: "+".to_string(),
        first: Box::new(lit(0, 0, "a")),
        second: Some(Box::new(lit(0, 4, "b"))),
    }];
    let stream = run(&tree, "a + b\n");

    let mut expected = vec![
        "blockStart VALUE",
        "socketStart",
        "text \"a\"",
        "socketEnd",
        "text \" + \"",
        "socketStart",
        "text \"b\"",
        "socketEnd",
        "blockEnd",
        "newline",
    ];
    // The trailing newline leaves an empty last line.
    expected.extend(PLACEHOLDER);
    assert_eq!(stream.outline(), expected);
    assert_eq!(stream.text(), "a + b\n");
}

#[test]
fn test_blank_lines_get_handwritten_placeholders() {
    let tree = [SyntaxNode::Assignment {
        span: Span::on_line(0, 0, 5),
        target: Box::new(lit(0, 0, "x")),
        value: Box::new(lit(0, 4, "1")),
    }];
    let stream = run(&tree, "x = 1\n\n");

    let mut expected = vec![
        "blockStart COMMAND",
        "socketStart",
        "text \"x\"",
        "socketEnd",
        "text \" = \"",
        "socketStart",
        "text \"1\"",
        "socketEnd",
        "blockEnd",
        "newline",
    ];
    expected.extend(PLACEHOLDER);
    expected.push("newline");
    expected.extend(PLACEHOLDER);
    assert_eq!(stream.outline(), expected);

    // No text between the first newline and the end of the stream.
    let after_first_line: Vec<&Token> = stream
        .iter()
        .skip_while(|token| **token != Token::Newline)
        .collect();
    assert!(after_first_line.iter().all(|token| token.as_text().is_none()));

    let handwritten = stream
        .boundaries()
        .iter()
        .filter(|boundary| boundary.is_handwritten())
        .count();
    assert_eq!(handwritten, 4);
}

#[test]
fn test_nested_calls_get_implicit_socket() {
    let tree = [call(0, 0, 7, vec![call(0, 2, 4, vec![lit(0, 4, "1")])])];
    let stream = run(&tree, "f(g(1))");

    assert_eq!(
        stream.outline(),
        [
            "blockStart COMMAND",
            "text \"f(\"",
            "socketStart implicit",
            "blockStart COMMAND",
            "text \"g(\"",
            "socketStart",
            "text \"1\"",
            "socketEnd",
            "text \")\"",
            "blockEnd",
            "socketEnd",
            "text \")\"",
            "blockEnd",
        ]
    );

    let implicit: Vec<_> = stream
        .boundaries()
        .iter()
        .filter(|boundary| boundary.is_implicit())
        .collect();
    assert_eq!(implicit.len(), 1);
    assert_eq!(implicit[0].kind, BoundaryKind::Socket);
}

#[test]
fn test_indented_body_opens_indent_at_end_of_previous_line() {
    let text = "if a\n  b\n";
    let tree = [SyntaxNode::Conditional {
        span: Span::new(0, 0, 1, 2),
        condition: Box::new(lit(0, 3, "a")),
        body: Box::new(SyntaxNode::Block {
            span: Span::on_line(1, 2, 1),
            statements: vec![lit(1, 2, "b")],
        }),
        else_body: None,
    }];
    let stream = run(&tree, text);

    let mut expected = vec![
        "blockStart CONTROL",
        "text \"if \"",
        "socketStart",
        "text \"a\"",
        "socketEnd",
        "indentStart width=2",
        "newline",
        "socketStart",
        "text \"b\"",
        "socketEnd",
        "indentEnd",
        "blockEnd",
        "newline",
    ];
    expected.extend(PLACEHOLDER);
    assert_eq!(stream.outline(), expected);

    // Leading indentation before the first marker of a line is trimmed.
    assert_eq!(stream.text(), "if a\nb\n");
}

#[test]
fn test_indent_starting_on_blank_line_comes_before_its_placeholder() {
    let text = "if a\n\n  b\n";
    let tree = [SyntaxNode::Conditional {
        span: Span::new(0, 0, 2, 2),
        condition: Box::new(lit(0, 3, "a")),
        body: Box::new(SyntaxNode::Block {
            span: Span::on_line(2, 2, 1),
            statements: vec![lit(2, 2, "b")],
        }),
        else_body: None,
    }];
    let stream = run(&tree, text);

    let mut expected = vec![
        "blockStart CONTROL",
        "text \"if \"",
        "socketStart",
        "text \"a\"",
        "socketEnd",
        "newline",
        "indentStart width=2",
    ];
    expected.extend(PLACEHOLDER);
    expected.extend([
        "newline",
        "socketStart",
        "text \"b\"",
        "socketEnd",
        "indentEnd",
        "blockEnd",
        "newline",
    ]);
    expected.extend(PLACEHOLDER);
    assert_eq!(stream.outline(), expected);
    assert_eq!(stream.text(), "if a\n\nb\n");
}

#[test]
fn test_for_loop_marks_name_and_source_before_body() {
    let text = "for x in xs\n  f(x)\n";
    let tree = [SyntaxNode::ForLoop {
        span: Span::new(0, 0, 1, 5),
        index: None,
        source: Some(Box::new(lit(0, 9, "xs"))),
        name: Some(Box::new(lit(0, 4, "x"))),
        from: None,
        body: Box::new(SyntaxNode::Block {
            span: Span::on_line(1, 2, 4),
            statements: vec![call(1, 2, 4, vec![lit(1, 4, "x")])],
        }),
    }];
    let stream = run(&tree, text);

    let mut expected = vec![
        "blockStart CONTROL",
        "text \"for \"",
        "socketStart",
        "text \"x\"",
        "socketEnd",
        "text \" in \"",
        "socketStart",
        "text \"xs\"",
        "socketEnd",
        "indentStart width=2",
        "newline",
        "blockStart COMMAND",
        "text \"f(\"",
        "socketStart",
        "text \"x\"",
        "socketEnd",
        "text \")\"",
        "blockEnd",
        "indentEnd",
        "blockEnd",
        "newline",
    ];
    expected.extend(PLACEHOLDER);
    assert_eq!(stream.outline(), expected);
    assert_eq!(stream.text(), "for x in xs\nf(x)\n");
}

#[test]
fn test_function_definition_with_parameter_and_indented_body() {
    let text = "f = (a) ->\n  a\n  b\n";
    let tree = [SyntaxNode::Assignment {
        span: Span::new(0, 0, 2, 2),
        target: Box::new(lit(0, 0, "f")),
        value: Box::new(SyntaxNode::FunctionDef {
            span: Span::new(0, 4, 2, 2),
            params: vec![SyntaxNode::Parameter {
                span: Span::on_line(0, 5, 1),
                name: Box::new(lit(0, 5, "a")),
            }],
            body: Box::new(SyntaxNode::Block {
                span: Span::new(1, 2, 2, 2),
                statements: vec![lit(1, 2, "a"), lit(2, 2, "b")],
            }),
        }),
    }];
    let stream = run(&tree, text);

    let mut expected = vec![
        "blockStart COMMAND",
        "socketStart",
        "text \"f\"",
        "socketEnd",
        "text \" = \"",
        "socketStart implicit",
        "blockStart VALUE",
        "text \"(\"",
        "socketStart",
        "text \"a\"",
        "socketEnd",
        "text \") ->\"",
        "indentStart width=2",
        "newline",
        "socketStart",
        "text \"a\"",
        "socketEnd",
        "newline",
        "socketStart",
        "text \"b\"",
        "socketEnd",
        "indentEnd",
        "blockEnd",
        "socketEnd",
        "blockEnd",
        "newline",
    ];
    expected.extend(PLACEHOLDER);
    assert_eq!(stream.outline(), expected);
    assert_eq!(stream.text(), "f = (a) ->\na\nb\n");
}

#[test]
fn test_range_marks_both_ends() {
    let tree = [SyntaxNode::Assignment {
        span: Span::on_line(0, 0, 10),
        target: Box::new(lit(0, 0, "r")),
        value: Box::new(SyntaxNode::Range {
            span: Span::on_line(0, 4, 6),
            from: Box::new(lit(0, 5, "1")),
            to: Box::new(lit(0, 8, "n")),
        }),
    }];
    let stream = run(&tree, "r = [1..n]");

    assert_eq!(
        stream.outline(),
        [
            "blockStart COMMAND",
            "socketStart",
            "text \"r\"",
            "socketEnd",
            "text \" = \"",
            "socketStart implicit",
            "blockStart VALUE",
            "text \"[\"",
            "socketStart",
            "text \"1\"",
            "socketEnd",
            "text \"..\"",
            "socketStart",
            "text \"n\"",
            "socketEnd",
            "text \"]\"",
            "blockEnd",
            "socketEnd",
            "blockEnd",
        ]
    );
    assert_eq!(stream.text(), "r = [1..n]");
}

#[test]
fn test_crlf_line_endings_round_trip() {
    let stream = run(&[lit(0, 0, "x"), lit(1, 0, "y")], "x\r\ny");

    assert_eq!(
        stream.outline(),
        [
            "socketStart",
            "text \"x\"",
            "socketEnd",
            "text \"\\r\"",
            "newline",
            "socketStart",
            "text \"y\"",
            "socketEnd",
        ]
    );
    assert_eq!(stream.text(), "x\r\ny");
}

#[test]
fn test_object_literal_indent_spans_properties() {
    let text = "o =\n  a: 1\n  b: 2";
    let property = |line: usize, name: &str, value: &str| SyntaxNode::Assignment {
        span: Span::on_line(line, 2, 4),
        target: Box::new(lit(line, 2, name)),
        value: Box::new(lit(line, 5, value)),
    };
    let tree = [SyntaxNode::Assignment {
        span: Span::new(0, 0, 2, 5),
        target: Box::new(lit(0, 0, "o")),
        value: Box::new(SyntaxNode::ObjectLiteral {
            span: Span::new(1, 2, 2, 5),
            properties: vec![property(1, "a", "1"), property(2, "b", "2")],
        }),
    }];
    let stream = run(&tree, text);

    let outline = stream.outline();
    let count = |needle: &str| outline.iter().filter(|line| *line == needle).count();
    assert_eq!(count("indentStart width=2"), 1);
    // The object block sits directly in the assignment block.
    assert_eq!(count("socketStart implicit"), 1);
    // The property blocks sit in the indent and need no wrapper.
    assert_eq!(count("blockStart COMMAND"), 3);
    assert_eq!(stream.text(), "o =\na: 1\nb: 2");
}

#[test]
fn test_stream_links_run_both_ways() {
    let tree = [call(0, 0, 4, vec![lit(0, 2, "x")])];
    let stream = run(&tree, "f(x)");

    let head = stream.head().unwrap();
    let tail = stream.tail().unwrap();
    assert_eq!(stream.prev(head), None);
    assert_eq!(stream.next(tail), None);

    let mut walked = Vec::new();
    let mut cursor = Some(tail);
    while let Some(id) = cursor {
        walked.push(stream.get(id).unwrap().clone());
        cursor = stream.prev(id);
    }
    walked.reverse();
    let forward: Vec<Token> = stream.iter().cloned().collect();
    assert_eq!(walked, forward);
}

#[test]
fn test_unsupported_node_fails_the_whole_run() {
    let tree = [
        lit(0, 0, "x"),
        SyntaxNode::Unsupported {
            span: Span::on_line(1, 0, 7),
            kind: "Class".to_string(),
        },
    ];
    let err = markup_blocks(&tree, "x\nclass A", &MarkupConfig::default()).unwrap_err();
    assert_eq!(err.to_string(), "unsupported node kind 'Class' at 1:0");
}

#[test]
fn test_empty_block_fails_the_whole_run() {
    let tree = [SyntaxNode::FunctionDef {
        span: Span::on_line(0, 0, 2),
        params: Vec::new(),
        body: Box::new(SyntaxNode::Block {
            span: Span::on_line(0, 2, 1),
            statements: Vec::new(),
        }),
    }];
    let err = markup_blocks(&tree, "->", &MarkupConfig::default()).unwrap_err();
    assert!(matches!(err, MarkupError::EmptyNode { kind: "Block", .. }));
}
