use zr_parser::{is_node, parse, render, Arena, NodeFlags, NodeId, NodeKind};

fn child(arena: &Arena, id: NodeId, index: usize) -> NodeId {
    arena.get(id).kind.child_ids()[index]
}

fn text_of(arena: &Arena, id: NodeId) -> &str {
    match &arena.get(id).kind {
        NodeKind::Str { text, .. } => text,
        other => panic!("expected Str, got {}", other.name()),
    }
}

#[test]
fn command_statement_with_positional_arguments() {
    let out = parse("cmd hello 1337");
    assert!(out.errors.is_empty());

    let source = out.root;
    let children = out.arena.get(source).kind.child_ids();
    assert_eq!(children.len(), 1);

    let stmt = children[0];
    assert!(is_node(&out.arena, stmt, "CommandStatement"));
    match &out.arena.get(stmt).kind {
        NodeKind::CommandStatement { children, is_unterminated, .. } => {
            assert!(!is_unterminated);
            assert_eq!(children.len(), 2);
            assert_eq!(text_of(&out.arena, children[0]), "hello");
            assert!(matches!(out.arena.get(children[1]).kind, NodeKind::Number { value } if value == 1337.0));
        }
        other => panic!("expected CommandStatement, got {other:?}"),
    }

    assert_eq!(render(&out.arena, stmt), "cmd hello 1337");
}

#[test]
fn statements_separated_by_newline_produce_two_siblings() {
    let out = parse("cmd a\ncmd b");
    assert!(out.errors.is_empty());
    let children = out.arena.get(out.root).kind.child_ids();
    assert_eq!(children.len(), 2);
    assert!(children.iter().all(|&c| is_node(&out.arena, c, "CommandStatement")));
}

#[test]
fn variable_statement_assigns_an_expression() {
    let out = parse("$count = 5");
    assert!(out.errors.is_empty());
    let stmt = out.arena.get(out.root).kind.child_ids()[0];
    assert!(is_node(&out.arena, stmt, "VariableStatement"));

    let decl = child(&out.arena, stmt, 0);
    match &out.arena.get(decl).kind {
        NodeKind::VariableDeclaration { identifier, expression } => {
            match &out.arena.get(*identifier).kind {
                NodeKind::Identifier { name } => assert_eq!(name, "count"),
                other => panic!("expected Identifier, got {other:?}"),
            }
            assert!(matches!(out.arena.get(*expression).kind, NodeKind::Number { value } if value == 5.0));
        }
        other => panic!("expected VariableDeclaration, got {other:?}"),
    }
}

#[test]
fn array_and_object_literals() {
    let out = parse("$xs = [1, 2, 3]");
    assert!(out.errors.is_empty());
    let stmt = out.arena.get(out.root).kind.child_ids()[0];
    let decl = child(&out.arena, stmt, 0);
    let expr = match &out.arena.get(decl).kind {
        NodeKind::VariableDeclaration { expression, .. } => *expression,
        other => panic!("expected VariableDeclaration, got {other:?}"),
    };
    match &out.arena.get(expr).kind {
        NodeKind::ArrayLiteral { values } => assert_eq!(values.len(), 3),
        other => panic!("expected ArrayLiteral, got {other:?}"),
    }

    let out = parse(r#"$person = { name: "Ada", age: 30 }"#);
    assert!(out.errors.is_empty());
    let stmt = out.arena.get(out.root).kind.child_ids()[0];
    let decl = child(&out.arena, stmt, 0);
    let expr = match &out.arena.get(decl).kind {
        NodeKind::VariableDeclaration { expression, .. } => *expression,
        other => panic!("expected VariableDeclaration, got {other:?}"),
    };
    match &out.arena.get(expr).kind {
        NodeKind::ObjectLiteral { values } => {
            assert_eq!(values.len(), 2);
            match &out.arena.get(values[0].name).kind {
                NodeKind::Identifier { name } => assert_eq!(name, "name"),
                other => panic!("expected Identifier, got {other:?}"),
            }
        }
        other => panic!("expected ObjectLiteral, got {other:?}"),
    }
}

#[test]
fn if_else_statement_chains_the_alternate_block() {
    let out = parse("if $ok { cmd a } else { cmd b }");
    assert!(out.errors.is_empty());
    let stmt = out.arena.get(out.root).kind.child_ids()[0];
    match &out.arena.get(stmt).kind {
        NodeKind::IfStatement { condition, then_statement, else_statement } => {
            assert!(condition.is_some());
            assert!(matches!(out.arena.get(then_statement.unwrap()).kind, NodeKind::Block { .. }));
            assert!(matches!(out.arena.get(else_statement.unwrap()).kind, NodeKind::Block { .. }));
        }
        other => panic!("expected IfStatement, got {other:?}"),
    }
}

#[test]
fn for_in_statement_iterates_a_variable() {
    let out = parse("for $item in $list { cmd $item }");
    assert!(out.errors.is_empty());
    let stmt = out.arena.get(out.root).kind.child_ids()[0];
    match &out.arena.get(stmt).kind {
        NodeKind::ForInStatement { initializer, expression, statement } => {
            assert!(matches!(out.arena.get(*initializer).kind, NodeKind::Identifier { .. }));
            assert!(matches!(out.arena.get(*expression).kind, NodeKind::Identifier { .. }));
            assert!(matches!(out.arena.get(*statement).kind, NodeKind::Block { .. }));
        }
        other => panic!("expected ForInStatement, got {other:?}"),
    }
}

#[test]
fn function_declaration_with_a_typed_parameter() {
    let out = parse("function greet(name: string) { cmd $name }");
    assert!(out.errors.is_empty());
    let stmt = out.arena.get(out.root).kind.child_ids()[0];
    match &out.arena.get(stmt).kind {
        NodeKind::FunctionDeclaration { name, parameters, body } => {
            match &out.arena.get(*name).kind {
                NodeKind::Identifier { name } => assert_eq!(name, "greet"),
                other => panic!("expected Identifier, got {other:?}"),
            }
            assert!(out.arena.get(*name).flags.contains(NodeFlags::FUNCTION_NAME));
            assert_eq!(parameters.len(), 1);
            assert!(parameters[0].type_ref.is_some());
            assert!(matches!(out.arena.get(*body).kind, NodeKind::Block { .. }));
        }
        other => panic!("expected FunctionDeclaration, got {other:?}"),
    }
}

#[test]
fn function_declaration_rejects_an_unrecognized_parameter_type() {
    let out = parse("function greet(name: widget) { cmd $name }");
    assert!(!out.errors.is_empty());
    let stmt = out.arena.get(out.root).kind.child_ids()[0];
    match &out.arena.get(stmt).kind {
        NodeKind::FunctionDeclaration { parameters, .. } => {
            assert!(parameters[0].type_ref.is_some());
        }
        other => panic!("expected FunctionDeclaration, got {other:?}"),
    }
}

#[test]
fn long_option_with_a_following_value_becomes_an_option_expression() {
    let out = parse("cmd --flag value");
    assert!(out.errors.is_empty());
    let stmt = out.arena.get(out.root).kind.child_ids()[0];
    match &out.arena.get(stmt).kind {
        NodeKind::CommandStatement { children, .. } => {
            assert_eq!(children.len(), 1);
            match &out.arena.get(children[0]).kind {
                NodeKind::OptionExpression { option, expression } => {
                    assert!(matches!(&out.arena.get(*option).kind, NodeKind::OptionKey { flag, .. } if flag == "flag"));
                    assert_eq!(text_of(&out.arena, *expression), "value");
                }
                other => panic!("expected OptionExpression, got {other:?}"),
            }
        }
        other => panic!("expected CommandStatement, got {other:?}"),
    }
}

#[test]
fn short_flag_cluster_splits_into_one_option_key_per_character() {
    let out = parse("cmd -kEwL");
    assert!(out.errors.is_empty());
    let stmt = out.arena.get(out.root).kind.child_ids()[0];
    match &out.arena.get(stmt).kind {
        NodeKind::CommandStatement { children, .. } => {
            assert_eq!(children.len(), 4);
            let flags: Vec<&str> = children
                .iter()
                .map(|&c| match &out.arena.get(c).kind {
                    NodeKind::OptionKey { flag, .. } => flag.as_str(),
                    other => panic!("expected OptionKey, got {other:?}"),
                })
                .collect();
            assert_eq!(flags, vec!["k", "E", "w", "L"]);
        }
        other => panic!("expected CommandStatement, got {other:?}"),
    }
}

#[test]
fn pipeline_operator_folds_two_commands_into_a_binary_expression() {
    let out = parse("cmd1 | cmd2");
    assert!(out.errors.is_empty());
    let stmt = out.arena.get(out.root).kind.child_ids()[0];
    match &out.arena.get(stmt).kind {
        NodeKind::BinaryExpression { left, operator, right } => {
            assert!(is_node(&out.arena, *left, "CommandStatement"));
            assert!(is_node(&out.arena, *right, "CommandStatement"));
            match &out.arena.get(*operator).kind {
                NodeKind::OperatorToken { operator } => assert_eq!(operator, "|"),
                other => panic!("expected OperatorToken, got {other:?}"),
            }
        }
        other => panic!("expected BinaryExpression, got {other:?}"),
    }
}

#[test]
fn interpolated_string_alternates_text_and_identifier_chunks() {
    let out = parse(r#"$greeting = "Hello, $name!""#);
    assert!(out.errors.is_empty());
    let stmt = out.arena.get(out.root).kind.child_ids()[0];
    let decl = child(&out.arena, stmt, 0);
    let expr = match &out.arena.get(decl).kind {
        NodeKind::VariableDeclaration { expression, .. } => *expression,
        other => panic!("expected VariableDeclaration, got {other:?}"),
    };
    match &out.arena.get(expr).kind {
        NodeKind::InterpolatedString { values } => {
            assert_eq!(values.len(), 3);
            assert_eq!(text_of(&out.arena, values[0]), "Hello, ");
            assert!(matches!(&out.arena.get(values[1]).kind, NodeKind::Identifier { name } if name == "name"));
            assert_eq!(text_of(&out.arena, values[2]), "!");
        }
        other => panic!("expected InterpolatedString, got {other:?}"),
    }
    assert!(out.arena.get(expr).flags.contains(NodeFlags::INTERPOLATED));
}

#[test]
fn sigil_prefix_splits_a_non_operator_prefix_character_off_a_bareword() {
    let out = parse("cmd ~name");
    assert!(out.errors.is_empty());
    let stmt = out.arena.get(out.root).kind.child_ids()[0];
    let arg = match &out.arena.get(stmt).kind {
        NodeKind::CommandStatement { children, .. } => children[0],
        other => panic!("expected CommandStatement, got {other:?}"),
    };
    match &out.arena.get(arg).kind {
        NodeKind::PrefixExpression { prefix, expression } => {
            assert!(matches!(&out.arena.get(*prefix).kind, NodeKind::PrefixToken { value } if value == "~"));
            assert_eq!(text_of(&out.arena, *expression), "name");
        }
        other => panic!("expected PrefixExpression, got {other:?}"),
    }
}

#[test]
fn star_prefix_only_applies_when_byte_adjacent_to_its_operand() {
    let out = parse("cmd *name");
    assert!(out.errors.is_empty());
    let stmt = out.arena.get(out.root).kind.child_ids()[0];
    let arg = match &out.arena.get(stmt).kind {
        NodeKind::CommandStatement { children, .. } => children[0],
        other => panic!("expected CommandStatement, got {other:?}"),
    };
    assert!(is_node(&out.arena, arg, "PrefixExpression"));
}

#[test]
fn unary_not_wraps_its_operand() {
    let out = parse("$ok = !$flag");
    assert!(out.errors.is_empty());
    let stmt = out.arena.get(out.root).kind.child_ids()[0];
    let decl = child(&out.arena, stmt, 0);
    let expr = match &out.arena.get(decl).kind {
        NodeKind::VariableDeclaration { expression, .. } => *expression,
        other => panic!("expected VariableDeclaration, got {other:?}"),
    };
    match &out.arena.get(expr).kind {
        NodeKind::UnaryExpression { operator, expression } => {
            assert_eq!(operator, "!");
            assert!(matches!(&out.arena.get(*expression).kind, NodeKind::Identifier { name } if name == "flag"));
        }
        other => panic!("expected UnaryExpression, got {other:?}"),
    }
}

#[test]
fn unterminated_string_flags_the_node_and_records_an_error() {
    let out = parse("cmd \"hello");
    assert!(!out.errors.is_empty());
    let stmt = out.arena.get(out.root).kind.child_ids()[0];
    let arg = match &out.arena.get(stmt).kind {
        NodeKind::CommandStatement { children, is_unterminated, .. } => {
            assert!(*is_unterminated);
            children[0]
        }
        other => panic!("expected CommandStatement, got {other:?}"),
    };
    let str_id = match &out.arena.get(arg).kind {
        NodeKind::Invalid { expression, .. } => {
            assert!(out.arena.get(arg).flags.contains(NodeFlags::HAS_ERROR));
            expression.expect("invalid node should wrap the unterminated string")
        }
        other => panic!("expected Invalid, got {other:?}"),
    };
    assert!(matches!(&out.arena.get(str_id).kind, NodeKind::Str { is_unterminated: true, .. }));
    assert!(out.arena.get(str_id).flags.contains(NodeFlags::UNTERMINATED_STRING));
}

#[test]
fn array_index_requires_a_number_literal_and_records_an_error_otherwise() {
    let out = parse("$x = $xs[\"bad\"]");
    assert!(!out.errors.is_empty());
    let stmt = out.arena.get(out.root).kind.child_ids()[0];
    let decl = child(&out.arena, stmt, 0);
    let expr = match &out.arena.get(decl).kind {
        NodeKind::VariableDeclaration { expression, .. } => *expression,
        other => panic!("expected VariableDeclaration, got {other:?}"),
    };
    match &out.arena.get(expr).kind {
        NodeKind::ArrayIndexExpression { index, .. } => {
            assert!(is_node(&out.arena, *index, "Invalid"));
        }
        other => panic!("expected ArrayIndexExpression, got {other:?}"),
    }
}

#[test]
fn property_access_chain_reconstructs_from_the_flat_lexer_token() {
    let out = parse("$value = $config.server.port");
    assert!(out.errors.is_empty());
    let stmt = out.arena.get(out.root).kind.child_ids()[0];
    let decl = child(&out.arena, stmt, 0);
    let expr = match &out.arena.get(decl).kind {
        NodeKind::VariableDeclaration { expression, .. } => *expression,
        other => panic!("expected VariableDeclaration, got {other:?}"),
    };
    // $config.server.port -> PropertyAccessExpression(PropertyAccessExpression($config, server), port)
    match &out.arena.get(expr).kind {
        NodeKind::PropertyAccessExpression { expression: inner, name } => {
            assert!(matches!(&out.arena.get(*name).kind, NodeKind::Identifier { name } if name == "port"));
            match &out.arena.get(*inner).kind {
                NodeKind::PropertyAccessExpression { expression: base, name } => {
                    assert!(matches!(&out.arena.get(*name).kind, NodeKind::Identifier { name } if name == "server"));
                    assert!(matches!(&out.arena.get(*base).kind, NodeKind::Identifier { name } if name == "config"));
                }
                other => panic!("expected PropertyAccessExpression, got {other:?}"),
            }
        }
        other => panic!("expected PropertyAccessExpression, got {other:?}"),
    }
}

#[test]
fn error_spans_serialize_to_json_for_host_diagnostics() {
    // A caller reporting diagnostics out-of-process (editor integration,
    // `file:start..end: message` tooling) wants the error spans as JSON,
    // not the arena-indexed `NodeError` itself.
    let out = parse("$x = $xs[\"bad\"]");
    assert!(!out.errors.is_empty());
    let spans: Vec<_> = out
        .errors
        .iter()
        .filter_map(|e| out.arena.get(e.node).span())
        .collect();
    let json = serde_json::to_string(&spans).expect("spans are Serialize");
    assert!(json.contains("\"start\""));
    assert!(json.contains("\"end\""));
}

#[test]
fn render_reparse_cycle_is_idempotent_after_one_pass() {
    // render() is a near-source reconstruction, not byte-exact, so
    // render(parse(s)) need not equal s. But once a tree has been through
    // one render/reparse cycle, a second cycle must reproduce exactly the
    // same text -- render's own output is already in its canonical form.
    let sources = [
        "cmd hello 1337",
        "cmd --test \"Hello, $player!\"",
        "cmd -kEwL",
        "cmd one && cmd --number two",
        "$x = [ \"a\", 1, true ]",
        "if $value { echo \"yes\" } else { echo \"no\" }",
        "for $item in $list { cmd $item }",
    ];
    for src in sources {
        let first = parse(src);
        let rendered_once = render(&first.arena, first.root);

        let second = parse(&rendered_once);
        let rendered_twice = render(&second.arena, second.root);

        assert_eq!(
            rendered_once, rendered_twice,
            "render/reparse cycle did not stabilize for {src:?}"
        );
    }
}

#[test]
fn line_continuation_folds_the_next_line_into_the_same_command() {
    let out = parse("cmd one \\\n    two");
    assert!(out.errors.is_empty());
    let stmt = out.arena.get(out.root).kind.child_ids()[0];
    match &out.arena.get(stmt).kind {
        NodeKind::CommandStatement { command, children, is_unterminated } => {
            assert!(!is_unterminated);
            assert_eq!(text_of(&out.arena, *command), "cmd");
            assert_eq!(children.len(), 2);
            assert_eq!(text_of(&out.arena, children[0]), "one");
            assert_eq!(text_of(&out.arena, children[1]), "two");
        }
        other => panic!("expected CommandStatement, got {other:?}"),
    }
    assert_eq!(out.arena.get(out.root).kind.child_ids().len(), 1);
}
