//! Recursive-descent statement parser with a Pratt-style expression core.
//!
//! The grammar is split across two sibling sub-grammars that share one
//! token stream: [`statements`] (command-mode: a bareword command plus
//! positional/option arguments) and [`expressions`] (expression-mode:
//! operators, literals, calls). [`Parser`] itself only owns the shared
//! plumbing -- token lookahead, node-flag propagation, error recovery --
//! that both sides need.

mod expressions;
mod statements;

use zr_common::span::Span;
use zr_common::token::{Token, TokenFlags, TokenKind};
use zr_lexer::{Lexer, LexerOptions};

use crate::arena::Arena;
use crate::diagnostics::NodeError;
use crate::factories;
use crate::node::{NodeFlags, NodeId};

/// The result of a complete parse: the arena, the `Source` root, and every
/// diagnostic accumulated along the way.
#[derive(Debug)]
pub struct ParseOutput {
    pub arena: Arena,
    pub root: NodeId,
    pub errors: Vec<NodeError>,
}

/// Parse `source` with default lexer options.
pub fn parse(source: &str) -> ParseOutput {
    parse_with(source, LexerOptions::default())
}

/// Parse `source`, forcing trivia tokens off regardless of what `options`
/// requests -- the statement grammar below has no notion of whitespace or
/// comment tokens and would otherwise treat them as malformed arguments.
pub fn parse_with(source: &str, mut options: LexerOptions) -> ParseOutput {
    options.parse_whitespace_as_tokens = false;
    options.parse_comments_as_tokens = false;
    let mut parser = Parser::new(source, options);
    let root = parser.parse_source();
    ParseOutput {
        arena: parser.arena,
        root,
        errors: parser.errors,
    }
}

/// Wraps a [`Lexer`] with a small pushback buffer so the grammar can look
/// two tokens ahead (`peek`/`peek2`) even though the lexer itself only
/// natively supports one token of lookahead. This is a parser-internal
/// convenience, not a reflection of the lexer's own contract.
pub(crate) struct Parser<'src> {
    lexer: Lexer<'src>,
    buffer: Vec<Token>,
    pub(crate) arena: Arena,
    pub(crate) errors: Vec<NodeError>,
}

impl<'src> Parser<'src> {
    fn new(source: &'src str, options: LexerOptions) -> Self {
        Self {
            lexer: Lexer::new(source, options),
            buffer: Vec::new(),
            arena: Arena::new(),
            errors: Vec::new(),
        }
    }

    fn fill(&mut self, n: usize) {
        while self.buffer.len() <= n {
            let tok = self.lexer.next();
            self.buffer.push(tok);
        }
    }

    pub(crate) fn peek(&mut self) -> &Token {
        self.peek_at(0)
    }

    pub(crate) fn peek2(&mut self) -> &Token {
        self.peek_at(1)
    }

    pub(crate) fn peek_at(&mut self, n: usize) -> &Token {
        self.fill(n);
        if n < self.buffer.len() {
            &self.buffer[n]
        } else {
            self.buffer.last().expect("fill always leaves at least one token buffered")
        }
    }

    pub(crate) fn bump(&mut self) -> Token {
        self.fill(0);
        self.buffer.remove(0)
    }

    /// Copy the `Label`/`FunctionName` token flags onto a just-built node,
    /// mirroring the lexer's own retroactive-flag model at the node level.
    pub(crate) fn propagate_flags(&mut self, id: NodeId, flags: TokenFlags) {
        if flags.contains(TokenFlags::LABEL) {
            self.arena.set_flag(id, NodeFlags::LABEL);
        }
        if flags.contains(TokenFlags::FUNCTION_NAME) {
            self.arena.set_flag(id, NodeFlags::FUNCTION_NAME);
        }
    }

    pub(crate) fn merged_span(&self, a: NodeId, b: NodeId) -> Span {
        match (self.arena.get(a).span(), self.arena.get(b).span()) {
            (Some(sa), Some(sb)) => sa.merge(sb),
            (Some(sa), None) => sa,
            (None, Some(sb)) => sb,
            (None, None) => Span::empty_at(0),
        }
    }

    /// Consume a `Special` token matching `s`, returning its end offset.
    /// On mismatch, records an error and returns the current position
    /// without consuming -- callers keep parsing rather than aborting.
    pub(crate) fn expect_special(&mut self, s: &str) -> u32 {
        if let TokenKind::Special { value } = &self.peek().kind {
            if value == s {
                return self.bump().span.end;
            }
        }
        let span = self.peek().span;
        let invalid = factories::create_invalid(&mut self.arena, None, format!("expected '{s}'"), span);
        self.errors.push(NodeError::new(invalid, format!("expected '{s}'")));
        span.start
    }

    pub(crate) fn expect_keyword(&mut self, kw: &str) {
        if matches!(&self.peek().kind, TokenKind::Keyword { value } if value == kw) {
            self.bump();
            return;
        }
        let span = self.peek().span;
        let invalid = factories::create_invalid(&mut self.arena, None, format!("expected keyword '{kw}'"), span);
        self.errors.push(NodeError::new(invalid, format!("expected keyword '{kw}'")));
    }

    /// Convert whichever token is under the cursor into the terminal (or,
    /// for a flat `PropertyAccess` token, small composite) node it
    /// naturally denotes. Used anywhere a single token stands for a whole
    /// value: a command name, a positional argument, an option's value.
    pub(crate) fn token_to_expression_node(&mut self, tok: Token) -> NodeId {
        let span = tok.span;
        let flags = tok.flags;
        let id = match tok.kind {
            TokenKind::Str { value, quotes, closed } => {
                let str_id = factories::create_str(&mut self.arena, value, quotes, !closed, span);
                if !closed {
                    let message = "unterminated string literal".to_string();
                    let invalid = factories::create_invalid(&mut self.arena, Some(str_id), message.clone(), span);
                    self.errors.push(NodeError::new(invalid, message));
                    invalid
                } else {
                    str_id
                }
            }
            TokenKind::InterpolatedStr { values, variables, .. } => {
                self.build_interpolated_string(values, variables, span)
            }
            TokenKind::Number { value, .. } => factories::create_number(&mut self.arena, value, span),
            TokenKind::Boolean { value, .. } => factories::create_boolean(&mut self.arena, value, span),
            TokenKind::Identifier { value } => factories::create_identifier(&mut self.arena, value, span),
            TokenKind::Keyword { value } => factories::create_str(&mut self.arena, value, None, false, span),
            TokenKind::PropertyAccess { value, properties } => {
                let mut expr = factories::create_identifier(&mut self.arena, value, span);
                for prop in properties {
                    let name_node = factories::create_identifier(&mut self.arena, prop, span);
                    expr = factories::create_property_access_expression(&mut self.arena, expr, name_node, span);
                }
                expr
            }
            other => {
                let message = format!("unexpected {} token", other.name());
                let invalid = factories::create_invalid(&mut self.arena, None, message.clone(), span);
                self.errors.push(NodeError::new(invalid, message));
                invalid
            }
        };
        self.propagate_flags(id, flags);
        id
    }

    pub(crate) fn parse_source(&mut self) -> NodeId {
        let children = self.parse_statement_list(|_| false);
        let span = match (children.first(), children.last()) {
            (Some(&first), Some(&last)) => {
                let start = self.arena.get(first).span().map(|s| s.start).unwrap_or(0);
                let end = self.arena.get(last).span().map(|s| s.end).unwrap_or(start);
                Span::new(start, end)
            }
            _ => Span::empty_at(0),
        };
        factories::create_source(&mut self.arena, children, span)
    }

    /// Parse statements until `stop` matches the lookahead or the input
    /// runs out, skipping blank statement-separator tokens between them.
    pub(crate) fn parse_statement_list(&mut self, stop: impl Fn(&TokenKind) -> bool) -> Vec<NodeId> {
        let mut items = Vec::new();
        loop {
            while matches!(&self.peek().kind, TokenKind::EndOfStatement { .. }) {
                self.bump();
            }
            if matches!(self.peek().kind, TokenKind::Eof) || stop(&self.peek().kind) {
                break;
            }
            let errors_before = self.errors.len();
            items.push(self.parse_statement());
            let stalled = self.errors.len() == errors_before
                && !matches!(self.peek().kind, TokenKind::EndOfStatement { .. } | TokenKind::Eof)
                && !stop(&self.peek().kind);
            if stalled {
                self.synchronize(&stop);
            }
        }
        items
    }

    /// Advance past tokens that don't belong to any statement until a
    /// statement separator, `stop`, or end of input -- recovery after a
    /// malformed statement left the cursor in the middle of garbage.
    fn synchronize(&mut self, stop: &impl Fn(&TokenKind) -> bool) {
        while !matches!(self.peek().kind, TokenKind::EndOfStatement { .. } | TokenKind::Eof) && !stop(&self.peek().kind) {
            self.bump();
        }
    }

    pub(crate) fn parse_statement(&mut self) -> NodeId {
        let kind = self.peek().kind.clone();
        match kind {
            TokenKind::Keyword { value } if value == "if" => self.parse_if_statement(),
            TokenKind::Keyword { value } if value == "for" => self.parse_for_in_statement(),
            TokenKind::Keyword { value } if value == "function" => self.parse_function_declaration(),
            TokenKind::Special { value } if value == "{" => self.parse_block(),
            TokenKind::Identifier { .. } if self.is_assignment_ahead() => self.parse_variable_statement(),
            _ => self.parse_command_boundary(0),
        }
    }

    fn is_assignment_ahead(&mut self) -> bool {
        if !matches!(&self.peek().kind, TokenKind::Identifier { .. }) {
            return false;
        }
        matches!(&self.peek2().kind, TokenKind::Operator { value } if value == "=")
    }
}
