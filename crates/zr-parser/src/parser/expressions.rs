//! Expression-mode grammar: the Pratt/precedence-climbing binary-operator
//! loop, prefix and postfix forms, and the primary-expression leaves
//! (literals, parenthesized/inner expressions, array and object literals).

use zr_common::grammar;
use zr_common::span::Span;
use zr_common::token::TokenKind;

use super::Parser;
use crate::diagnostics::NodeError;
use crate::factories;
use crate::node::{NodeId, PropertyAssignment};

impl<'src> Parser<'src> {
    pub(crate) fn parse_expression(&mut self) -> NodeId {
        self.parse_binary_expression(0)
    }

    /// Precedence-climbing binary-operator loop over [`grammar::operator_precedence`].
    /// Command-boundary operators (`|`, `&&`, `||`) are deliberately excluded
    /// here -- those fold commands together one level up, in
    /// [`Parser::parse_command_boundary`], so that e.g. `cmd a | cmd b`
    /// folds two `CommandStatement`s rather than having `a` try to consume
    /// `|` as if it were an ordinary infix operator.
    fn parse_binary_expression(&mut self, min_prec: u8) -> NodeId {
        let mut left = self.parse_unary_expression();
        loop {
            let op = match &self.peek().kind {
                TokenKind::Operator { value } if !grammar::is_command_boundary_operator(value) => value.clone(),
                _ => break,
            };
            let prec = match grammar::operator_precedence(&op) {
                Some(p) => p,
                None => break,
            };
            if prec < min_prec {
                break;
            }
            let op_tok = self.bump();
            let op_node = factories::create_operator_token(&mut self.arena, op, op_tok.span);
            let right = self.parse_binary_expression(prec + 1);
            let span = self.merged_span(left, right);
            left = factories::create_binary_expression(&mut self.arena, left, op_node, right, span);
        }
        left
    }

    fn parse_unary_expression(&mut self) -> NodeId {
        if let TokenKind::Operator { value } = self.peek().kind.clone() {
            if grammar::UNARY_OPERATORS.contains(&value.as_str()) {
                let op_tok = self.bump();
                let operand = self.parse_unary_expression();
                let span = Span::new(op_tok.span.start, self.arena.get(operand).span().map(|s| s.end).unwrap_or(op_tok.span.end));
                return factories::create_unary_expression(&mut self.arena, value, operand, span);
            }
        }
        self.parse_prefix_or_postfix()
    }

    fn parse_prefix_or_postfix(&mut self) -> NodeId {
        if let Some(id) = self.try_parse_sigil_prefix() {
            return id;
        }
        self.parse_postfix_expression()
    }

    /// `PrefixExpression` has two distinct lexical shapes depending on
    /// whether the sigil also appears in `OPERATOR_CHARS`:
    /// - `~ @ % ^` are not operator characters, so the lexer folds them
    ///   into the following bareword as one `Str` token; the parser splits
    ///   the first character back off.
    /// - `*` is an operator character and so lexes as its own `Operator`
    ///   token; the parser only treats it as a prefix when it is
    ///   byte-adjacent to what follows (`*foo`, not `* foo`).
    /// (`!` is excluded from both paths here -- it is handled exclusively
    /// as the unary logical-not operator in [`Self::parse_unary_expression`].)
    fn try_parse_sigil_prefix(&mut self) -> Option<NodeId> {
        let kind = self.peek().kind.clone();

        if let TokenKind::Str { value, quotes: None, closed: true } = &kind {
            if let Some(first) = value.chars().next() {
                if first != '*' && first != '!' && grammar::PREFIX_CHARS.contains(&first) && value.len() > first.len_utf8() {
                    let tok = self.bump();
                    let span = tok.span;
                    let prefix_len = first.len_utf8() as u32;
                    let prefix_span = Span::new(span.start, span.start + prefix_len);
                    let rest_span = Span::new(span.start + prefix_len, span.end);
                    let prefix_node = factories::create_prefix_token(&mut self.arena, first.to_string(), prefix_span);
                    let rest_text = value[first.len_utf8()..].to_string();
                    let rest_node = factories::create_str(&mut self.arena, rest_text, None, false, rest_span);
                    return Some(factories::create_prefix_expression(&mut self.arena, prefix_node, rest_node, span));
                }
            }
        }

        if let TokenKind::Operator { value } = &kind {
            if value == "*" {
                let op_span = self.peek().span;
                let next_span = self.peek2().span;
                if next_span.start == op_span.end {
                    let op_tok = self.bump();
                    let prefix_node = factories::create_prefix_token(&mut self.arena, "*".to_string(), op_tok.span);
                    let operand = self.parse_postfix_expression();
                    let span = Span::new(op_tok.span.start, self.arena.get(operand).span().map(|s| s.end).unwrap_or(op_tok.span.end));
                    return Some(factories::create_prefix_expression(&mut self.arena, prefix_node, operand, span));
                }
            }
        }

        None
    }

    fn parse_postfix_expression(&mut self) -> NodeId {
        let mut expr = self.parse_primary();
        loop {
            match self.peek().kind.clone() {
                TokenKind::Special { value } if value == "." => {
                    let dot_span = self.bump().span;
                    let name_tok = self.bump();
                    let name_span = name_tok.span;
                    let name = match name_tok.kind {
                        TokenKind::Identifier { value } => value,
                        TokenKind::Str { value, .. } => value,
                        TokenKind::Keyword { value } => value,
                        other => {
                            let invalid = factories::create_invalid(
                                &mut self.arena,
                                None,
                                format!("expected a property name after '.', found {}", other.name()),
                                name_span,
                            );
                            self.errors.push(NodeError::new(invalid, "expected a property name after '.'"));
                            let start = self.arena.get(expr).span().map(|s| s.start).unwrap_or(dot_span.start);
                            expr = factories::create_property_access_expression(&mut self.arena, expr, invalid, Span::new(start, name_span.end));
                            continue;
                        }
                    };
                    let name_node = factories::create_identifier(&mut self.arena, name, name_span);
                    let start = self.arena.get(expr).span().map(|s| s.start).unwrap_or(dot_span.start);
                    expr = factories::create_property_access_expression(&mut self.arena, expr, name_node, Span::new(start, name_span.end));
                }
                TokenKind::Special { value } if value == "[" => {
                    self.bump();
                    let index_tok = self.bump();
                    let index_node = if let TokenKind::Number { value, .. } = index_tok.kind {
                        factories::create_number(&mut self.arena, value, index_tok.span)
                    } else {
                        let invalid = factories::create_invalid(&mut self.arena, None, "array index must be a number literal".to_string(), index_tok.span);
                        self.errors.push(NodeError::new(invalid, "array index must be a number literal"));
                        invalid
                    };
                    let close_end = self.expect_special("]");
                    let start = self.arena.get(expr).span().map(|s| s.start).unwrap_or(index_tok.span.start);
                    expr = factories::create_array_index_expression(&mut self.arena, expr, index_node, Span::new(start, close_end));
                }
                _ => break,
            }
        }
        expr
    }

    pub(crate) fn parse_primary(&mut self) -> NodeId {
        let kind = self.peek().kind.clone();
        match kind {
            TokenKind::Str { value, .. } if value == "$" && self.adjacent_next_is_special("(") => self.parse_inner_expression(),
            TokenKind::Special { value } if value == "(" => self.parse_parenthesized_expression(),
            TokenKind::Special { value } if value == "[" => self.parse_array_literal(),
            TokenKind::Special { value } if value == "{" => self.parse_object_literal(),
            TokenKind::Str { .. }
            | TokenKind::Number { .. }
            | TokenKind::Boolean { .. }
            | TokenKind::Identifier { .. }
            | TokenKind::Keyword { .. }
            | TokenKind::PropertyAccess { .. }
            | TokenKind::InterpolatedStr { .. } => {
                let tok = self.bump();
                self.token_to_expression_node(tok)
            }
            _ => self.parse_invalid_primary(),
        }
    }

    /// `$(...)` has no dedicated lexer token: a lone `$` not followed by an
    /// identifier character scans as a one-character bareword `Str`, and
    /// `(` scans separately right after it. The parser recognises the
    /// `"$"` `Str` token butted up against a `(` as the inner-expression
    /// form, the same adjacency trick used for sigil prefixes.
    fn adjacent_next_is_special(&mut self, s: &str) -> bool {
        let first_end = self.peek().span.end;
        let second = self.peek2().clone();
        second.span.start == first_end && matches!(&second.kind, TokenKind::Special { value } if value == s)
    }

    fn parse_inner_expression(&mut self) -> NodeId {
        let dollar_tok = self.bump(); // Str "$"
        self.bump(); // "("
        let inner = self.parse_expression();
        let close_end = self.expect_special(")");
        factories::create_inner_expression(&mut self.arena, inner, Span::new(dollar_tok.span.start, close_end.max(dollar_tok.span.end)))
    }

    fn parse_parenthesized_expression(&mut self) -> NodeId {
        let open = self.bump(); // "("
        let inner = self.parse_expression();
        let close_end = self.expect_special(")");
        factories::create_parenthesized_expression(&mut self.arena, inner, Span::new(open.span.start, close_end.max(open.span.end)))
    }

    fn parse_array_literal(&mut self) -> NodeId {
        let open = self.bump(); // "["
        let mut values = Vec::new();
        while !matches!(&self.peek().kind, TokenKind::Special { value } if value == "]") && !matches!(self.peek().kind, TokenKind::Eof) {
            values.push(self.parse_expression());
            if matches!(&self.peek().kind, TokenKind::Special { value } if value == ",") {
                self.bump();
            } else {
                break;
            }
        }
        let close_end = self.expect_special("]");
        factories::create_array_literal(&mut self.arena, values, Span::new(open.span.start, close_end.max(open.span.end)))
    }

    fn parse_object_literal(&mut self) -> NodeId {
        let open = self.bump(); // "{"
        let mut values = Vec::new();
        while !matches!(&self.peek().kind, TokenKind::Special { value } if value == "}") && !matches!(self.peek().kind, TokenKind::Eof) {
            let name_tok = self.bump();
            let name_span = name_tok.span;
            let name = match name_tok.kind {
                TokenKind::Identifier { value } => value,
                TokenKind::Str { value, .. } => value,
                TokenKind::Keyword { value } => value,
                other => {
                    let invalid = factories::create_invalid(&mut self.arena, None, format!("expected a property name, found {}", other.name()), name_span);
                    self.errors.push(NodeError::new(invalid, "expected a property name"));
                    String::new()
                }
            };
            let name_node = factories::create_identifier(&mut self.arena, name, name_span);
            self.expect_special(":");
            let value = self.parse_expression();
            values.push(PropertyAssignment { name: name_node, initializer: value });
            if matches!(&self.peek().kind, TokenKind::Special { value } if value == ",") {
                self.bump();
            } else {
                break;
            }
        }
        let close_end = self.expect_special("}");
        factories::create_object_literal(&mut self.arena, values, Span::new(open.span.start, close_end.max(open.span.end)))
    }

    /// Reconstruct the alternating text/identifier chunk list an
    /// `InterpolatedStr` token carries flat (`values`/`variables`) into the
    /// tree shape `InterpolatedString` expects. The lexer gives no
    /// sub-spans for individual chunks, so every synthesized child reuses
    /// the whole token's span.
    pub(crate) fn build_interpolated_string(&mut self, values: Vec<String>, variables: Vec<String>, span: Span) -> NodeId {
        let mut children = Vec::new();
        for (i, var) in variables.iter().enumerate() {
            if let Some(text) = values.get(i) {
                children.push(factories::create_str(&mut self.arena, text.clone(), None, false, span));
            }
            children.push(factories::create_identifier(&mut self.arena, var.clone(), span));
        }
        if let Some(trailing) = values.get(variables.len()) {
            children.push(factories::create_str(&mut self.arena, trailing.clone(), None, false, span));
        }
        factories::create_interpolated_string(&mut self.arena, children, span)
    }

    fn parse_invalid_primary(&mut self) -> NodeId {
        let tok = self.bump();
        let message = format!("unexpected {} token in expression position", tok.kind.name());
        let invalid = factories::create_invalid(&mut self.arena, None, message.clone(), tok.span);
        self.errors.push(NodeError::new(invalid, message));
        invalid
    }
}
