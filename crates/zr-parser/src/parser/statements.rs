//! Command-mode grammar: `if`/`for`/`function` statements, blocks,
//! variable statements, and the bareword-command-plus-arguments form that
//! everything else falls through to.

use zr_common::grammar;
use zr_common::span::Span;
use zr_common::token::TokenKind;

use super::Parser;
use crate::factories;
use crate::diagnostics::NodeError;
use crate::node::{NodeId, Parameter};

impl<'src> Parser<'src> {
    pub(crate) fn parse_block(&mut self) -> NodeId {
        let open = self.bump(); // "{"
        let statements = self.parse_statement_list(|k| matches!(k, TokenKind::Special { value } if value == "}"));
        let close_end = self.expect_special("}");
        factories::create_block(&mut self.arena, statements, Span::new(open.span.start, close_end.max(open.span.end)))
    }

    pub(crate) fn parse_if_statement(&mut self) -> NodeId {
        let if_tok = self.bump(); // "if"

        let condition = if !matches!(&self.peek().kind, TokenKind::Special { value } if value == "{") {
            Some(self.parse_expression())
        } else {
            None
        };

        let then_statement = if matches!(&self.peek().kind, TokenKind::Special { value } if value == "{") {
            Some(self.parse_block())
        } else {
            None
        };

        let else_statement = if matches!(&self.peek().kind, TokenKind::Keyword { value } if value == "else") {
            self.bump();
            if matches!(&self.peek().kind, TokenKind::Keyword { value } if value == "if") {
                Some(self.parse_if_statement())
            } else {
                Some(self.parse_block())
            }
        } else {
            None
        };

        let end = [else_statement, then_statement, condition]
            .into_iter()
            .flatten()
            .find_map(|n| self.arena.get(n).span())
            .map(|s| s.end)
            .unwrap_or(if_tok.span.end);
        factories::create_if_statement(&mut self.arena, condition, then_statement, else_statement, Span::new(if_tok.span.start, end))
    }

    pub(crate) fn parse_for_in_statement(&mut self) -> NodeId {
        let for_tok = self.bump(); // "for"
        let initializer = self.parse_primary();
        self.expect_keyword("in");
        let expression = self.parse_expression();
        let statement = self.parse_block();
        let end = self.arena.get(statement).span().map(|s| s.end).unwrap_or(for_tok.span.end);
        factories::create_for_in_statement(&mut self.arena, initializer, expression, statement, Span::new(for_tok.span.start, end))
    }

    pub(crate) fn parse_function_declaration(&mut self) -> NodeId {
        let fn_tok = self.bump(); // "function"
        let name_tok = self.bump();
        let name_flags = name_tok.flags;
        let name = match name_tok.kind {
            TokenKind::Identifier { value } => value,
            TokenKind::Str { value, .. } => value,
            other => {
                let span = name_tok.span;
                let invalid = factories::create_invalid(&mut self.arena, None, format!("expected a function name, found {}", other.name()), span);
                self.errors.push(NodeError::new(invalid, "expected a function name"));
                String::new()
            }
        };
        let name_node = factories::create_identifier(&mut self.arena, name, name_tok.span);
        self.propagate_flags(name_node, name_flags);

        self.expect_special("(");
        let mut parameters = Vec::new();
        while !matches!(&self.peek().kind, TokenKind::Special { value } if value == ")") && !matches!(self.peek().kind, TokenKind::Eof) {
            let param_tok = self.bump();
            let param_name = match param_tok.kind {
                TokenKind::Identifier { value } => value,
                TokenKind::Str { value, .. } => value,
                other => {
                    let span = param_tok.span;
                    let invalid = factories::create_invalid(&mut self.arena, None, format!("expected a parameter name, found {}", other.name()), span);
                    self.errors.push(NodeError::new(invalid, "expected a parameter name"));
                    String::new()
                }
            };
            let param_name_node = factories::create_identifier(&mut self.arena, param_name, param_tok.span);

            let type_ref = if matches!(&self.peek().kind, TokenKind::Special { value } if value == ":") {
                self.bump();
                let type_tok = self.bump();
                let type_span = type_tok.span;
                let type_name = match type_tok.kind {
                    TokenKind::Str { value, .. } => value,
                    TokenKind::Identifier { value } => value,
                    other => {
                        let invalid = factories::create_invalid(&mut self.arena, None, format!("expected a type name, found {}", other.name()), type_span);
                        self.errors.push(NodeError::new(invalid, "expected a type name"));
                        String::new()
                    }
                };
                if !type_name.is_empty() && !grammar::is_type_keyword(&type_name) {
                    let invalid = factories::create_invalid(&mut self.arena, None, format!("unknown type '{type_name}'"), type_span);
                    self.errors.push(NodeError::new(invalid, format!("unknown type '{type_name}'")));
                }
                let type_name_node = factories::create_identifier(&mut self.arena, type_name, type_span);
                Some(factories::create_type_reference(&mut self.arena, type_name_node, type_span))
            } else {
                None
            };

            parameters.push(Parameter { name: param_name_node, type_ref });
            if matches!(&self.peek().kind, TokenKind::Special { value } if value == ",") {
                self.bump();
            } else {
                break;
            }
        }
        self.expect_special(")");

        let body = self.parse_block();
        let end = self.arena.get(body).span().map(|s| s.end).unwrap_or(fn_tok.span.end);
        factories::create_function_declaration(&mut self.arena, name_node, parameters, body, Span::new(fn_tok.span.start, end))
    }

    pub(crate) fn parse_variable_statement(&mut self) -> NodeId {
        let ident_tok = self.bump();
        let ident_flags = ident_tok.flags;
        let name = match ident_tok.kind {
            TokenKind::Identifier { value } => value,
            _ => unreachable!("is_assignment_ahead only dispatches here for an Identifier lookahead"),
        };
        let ident_node = factories::create_identifier(&mut self.arena, name, ident_tok.span);
        self.propagate_flags(ident_node, ident_flags);

        self.bump(); // "="
        let expr = self.parse_expression();
        let span = Span::new(ident_tok.span.start, self.arena.get(expr).span().map(|s| s.end).unwrap_or(ident_tok.span.end));
        let decl = factories::create_variable_declaration(&mut self.arena, ident_node, expr, span);
        factories::create_variable_statement(&mut self.arena, decl, span)
    }

    /// Command statements chained by `|`, `&&`, `||` fold left-associatively
    /// into a `BinaryExpression`, climbing the same precedence table the
    /// expression-mode Pratt parser uses -- but only over these three
    /// operators, since a bare command's own argument loop stops at any of
    /// them (see [`Self::at_statement_boundary`]).
    pub(crate) fn parse_command_boundary(&mut self, min_prec: u8) -> NodeId {
        let mut left = self.parse_single_command_statement();
        while let Some(op) = self.command_boundary_operator_ahead() {
            let prec = grammar::operator_precedence(&op).unwrap_or(0);
            if prec < min_prec {
                break;
            }
            let op_tok = self.bump();
            let op_node = factories::create_operator_token(&mut self.arena, op, op_tok.span);
            let right = self.parse_command_boundary(prec + 1);
            let span = self.merged_span(left, right);
            left = factories::create_binary_expression(&mut self.arena, left, op_node, right, span);
        }
        left
    }

    fn command_boundary_operator_ahead(&mut self) -> Option<String> {
        match &self.peek().kind {
            TokenKind::Operator { value } if grammar::is_command_boundary_operator(value) => Some(value.clone()),
            _ => None,
        }
    }

    fn parse_single_command_statement(&mut self) -> NodeId {
        let command = self.parse_command_name();
        let start = self.arena.get(command).span().map(|s| s.start).unwrap_or(0);

        let mut children = Vec::new();
        let mut had_error = false;
        while !self.at_statement_boundary() {
            let errors_before = self.errors.len();
            let args = self.parse_command_argument();
            if self.errors.len() > errors_before {
                had_error = true;
            }
            if args.is_empty() {
                break;
            }
            children.extend(args);
        }

        let is_unterminated = had_error && matches!(self.peek().kind, TokenKind::Eof);
        let end = children
            .last()
            .and_then(|&c| self.arena.get(c).span())
            .map(|s| s.end)
            .unwrap_or_else(|| self.arena.get(command).span().map(|s| s.end).unwrap_or(start));
        factories::create_command_statement(&mut self.arena, command, children, is_unterminated, Span::new(start, end))
    }

    fn parse_command_name(&mut self) -> NodeId {
        let tok = self.bump();
        let span = tok.span;
        let name_node = self.token_to_expression_node(tok);
        factories::create_command_name(&mut self.arena, name_node, span)
    }

    /// Whether the lookahead ends the current command's argument list:
    /// end of input, a statement terminator, a closing brace, or one of
    /// the pipeline-boundary operators that [`Self::parse_command_boundary`]
    /// handles one level up.
    fn at_statement_boundary(&mut self) -> bool {
        match &self.peek().kind {
            TokenKind::Eof => true,
            TokenKind::EndOfStatement { .. } => true,
            TokenKind::Special { value } if value == "}" => true,
            TokenKind::Operator { value } if grammar::is_command_boundary_operator(value) => true,
            _ => false,
        }
    }

    fn parse_command_argument(&mut self) -> Vec<NodeId> {
        match &self.peek().kind {
            TokenKind::Option { .. } => vec![self.parse_long_option_argument()],
            TokenKind::Operator { value } if value == "-" => self.parse_short_option_cluster(),
            _ => vec![self.parse_expression()],
        }
    }

    fn parse_long_option_argument(&mut self) -> NodeId {
        let tok = self.bump();
        let (flag, span) = match tok.kind {
            TokenKind::Option { value, .. } => (value, tok.span),
            _ => unreachable!("parse_command_argument only dispatches here for an Option token"),
        };
        let key = factories::create_option_key(&mut self.arena, flag, None, span);
        if self.option_value_ahead() {
            let value = self.parse_expression();
            let full = self.merged_span(key, value);
            factories::create_option_expression(&mut self.arena, key, value, full)
        } else {
            key
        }
    }

    /// `-kEwL` lexes as an `Operator("-")` token immediately followed by a
    /// bareword `Str` token -- the lexer has no cluster-aware flag token,
    /// so the parser is the one that splits the bareword's characters into
    /// one `OptionKey` per flag (see the grammar tables' `PREFIX_CHARS`
    /// note for the analogous split on sigil prefixes).
    fn parse_short_option_cluster(&mut self) -> Vec<NodeId> {
        let dash_tok = self.bump(); // "-"
        let cluster_tok = self.peek().clone();
        let is_adjacent_bareword =
            matches!(&cluster_tok.kind, TokenKind::Str { quotes: None, .. }) && cluster_tok.span.start == dash_tok.span.end;
        if !is_adjacent_bareword {
            let invalid = factories::create_invalid(&mut self.arena, None, "expected one or more option flags after '-'".to_string(), dash_tok.span);
            self.errors.push(NodeError::new(invalid, "expected one or more option flags after '-'"));
            return vec![invalid];
        }

        let cluster_tok = self.bump();
        let (letters, base_span) = match cluster_tok.kind {
            TokenKind::Str { value, .. } => (value, cluster_tok.span),
            _ => unreachable!(),
        };

        let mut keys = Vec::new();
        let mut offset = base_span.start;
        for ch in letters.chars() {
            let char_span = Span::new(offset, offset + ch.len_utf8() as u32);
            keys.push(factories::create_option_key(&mut self.arena, ch.to_string(), None, char_span));
            offset += ch.len_utf8() as u32;
        }

        if keys.len() == 1 && self.option_value_ahead() {
            let key = keys[0];
            let value = self.parse_expression();
            let full = Span::new(dash_tok.span.start, self.arena.get(value).span().map(|s| s.end).unwrap_or(base_span.end));
            return vec![factories::create_option_expression(&mut self.arena, key, value, full)];
        }
        keys
    }

    /// Whether an option can take the following token as its value: not a
    /// statement boundary, and not the start of another option.
    fn option_value_ahead(&mut self) -> bool {
        if self.at_statement_boundary() {
            return false;
        }
        !matches!(&self.peek().kind, TokenKind::Option { .. })
            && !matches!(&self.peek().kind, TokenKind::Operator { value } if value == "-")
    }
}
