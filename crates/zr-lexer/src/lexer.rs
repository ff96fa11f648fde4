use zr_common::grammar::{self, OPERATOR_CHARS};
use zr_common::span::Span;
use zr_common::token::{OptionPrefix, Quote, Token, TokenFlags, TokenKind};

use crate::cursor::TextStream;

/// Configuration accepted by [`Lexer::new`].
///
/// `command_names` is reserved for host integrations that want to seed a
/// known-command set; the core tokenizer never reads it (see the open
/// questions in the design notes).
#[derive(Debug, Clone, Default)]
pub struct LexerOptions {
    pub parse_comments_as_tokens: bool,
    pub parse_whitespace_as_tokens: bool,
    pub command_names: Vec<String>,
}

fn is_var_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn is_literal_stop(c: char) -> bool {
    c == ' '
        || c == '\t'
        || c == '#'
        || c == '"'
        || c == '\''
        || grammar::END_OF_STATEMENT_CHARS.contains(&c)
        || grammar::PUNCTUATION_CHARS.contains(&c)
}

/// Pull-iterator tokenizer over a [`TextStream`].
///
/// `peek`/`next` expose one token of lookahead; `prev`/`prev_skip_whitespace`
/// expose an unbounded look-behind over every token already consumed. The
/// look-behind buffer is also where the `:`-triggered retroactive [`Label`]
/// flag is applied, mutating an already-returned token in place.
///
/// [`Label`]: zr_common::token::TokenFlags::LABEL
pub struct Lexer<'src> {
    stream: TextStream<'src>,
    options: LexerOptions,
    history: Vec<Token>,
    peeked: Option<Token>,
}

impl<'src> Lexer<'src> {
    pub fn new(source: &'src str, options: LexerOptions) -> Self {
        Self {
            stream: TextStream::new(source),
            options,
            history: Vec::new(),
            peeked: None,
        }
    }

    /// Tokenize `source` in one shot with default options, including the
    /// trailing `Eof` token. Convenience wrapper for callers that don't need
    /// streaming.
    pub fn tokenize(source: &str) -> Vec<Token> {
        Self::tokenize_with(source, LexerOptions::default())
    }

    pub fn tokenize_with(source: &str, options: LexerOptions) -> Vec<Token> {
        let mut lexer = Lexer::new(source, options);
        let mut tokens = Vec::new();
        loop {
            let tok = lexer.next();
            let is_eof = tok.is_eof();
            tokens.push(tok);
            if is_eof {
                break;
            }
        }
        tokens
    }

    /// The current lookahead token without consuming it.
    pub fn peek(&mut self) -> &Token {
        if self.peeked.is_none() {
            let tok = self.scan_token();
            self.peeked = Some(tok);
        }
        self.peeked.as_ref().unwrap()
    }

    /// Consume and return the current lookahead token.
    pub fn next(&mut self) -> Token {
        let tok = match self.peeked.take() {
            Some(tok) => tok,
            None => self.scan_token(),
        };
        self.history.push(tok.clone());
        tok
    }

    /// Whether there is a non-`Eof` token still to consume.
    pub fn has_next(&mut self) -> bool {
        !self.peek().is_eof()
    }

    /// The already-consumed token `offset` slots back (`1` = most recent).
    pub fn prev(&self, offset: usize) -> Option<&Token> {
        if offset == 0 {
            return None;
        }
        self.history.len().checked_sub(offset).map(|i| &self.history[i])
    }

    /// Like [`Lexer::prev`], but counting only non-whitespace tokens.
    pub fn prev_skip_whitespace(&self, offset: usize) -> Option<&Token> {
        if offset == 0 {
            return None;
        }
        self.history
            .iter()
            .rev()
            .filter(|t| !matches!(t.kind, TokenKind::Whitespace { .. }))
            .nth(offset - 1)
    }

    /// Whether the lookahead token matches `kind`'s variant (payload ignored).
    pub fn is_next_of_kind(&mut self, kind: &TokenKind) -> bool {
        self.peek().kind.is_same_kind(kind)
    }

    /// Whether the lookahead token matches any of `kinds`' variants.
    pub fn is_next_of_any_kind(&mut self, kinds: &[TokenKind]) -> bool {
        let current = self.peek();
        kinds.iter().any(|k| current.kind.is_same_kind(k))
    }

    fn ptr(&self) -> usize {
        self.stream.get_ptr()
    }

    fn span_from(&self, start: usize) -> Span {
        Span::new(start as u32, self.ptr() as u32)
    }

    /// Apply the `Label` flag to the nearest already-emitted non-trivia token.
    fn retro_flag_label(&mut self) {
        for tok in self.history.iter_mut().rev() {
            if tok.is_trivia() {
                continue;
            }
            tok.flags.insert(TokenFlags::LABEL);
            break;
        }
    }

    /// Core scanning dispatch: skips whitespace/line-continuations, then
    /// classifies the next token per the scanning rules in order.
    fn scan_token(&mut self) -> Token {
        loop {
            match self.stream.peek(0) {
                Some(' ') | Some('\t') => {
                    let start = self.ptr();
                    self.stream.eat_while(|c| c == ' ' || c == '\t');
                    if self.options.parse_whitespace_as_tokens {
                        let span = self.span_from(start);
                        let value = self.stream.slice(start, self.ptr()).to_string();
                        return Token::new(TokenKind::Whitespace { value }, span);
                    }
                }
                Some('\\') if self.stream.peek(1) == Some('\n') => {
                    self.stream.next(2);
                }
                _ => break,
            }
        }

        let start = self.ptr();
        let c = match self.stream.peek(0) {
            Some(c) => c,
            None => return Token::new(TokenKind::Eof, Span::empty_at(start as u32)),
        };

        if c == '#' {
            return self.scan_comment(start);
        }
        if c == '$' && self.stream.peek(1).is_some_and(is_var_char) {
            return self.scan_variable(start);
        }
        if c == '"' || c == '\'' {
            return self.scan_string(start, c);
        }
        if c == '-' && self.stream.peek(1) == Some('-') {
            return self.scan_option(start);
        }
        if c.is_ascii_digit() {
            return self.scan_number(start);
        }
        if OPERATOR_CHARS.contains(&c) {
            return self.scan_operator(start);
        }
        if grammar::END_OF_STATEMENT_CHARS.contains(&c) {
            self.stream.next(1);
            return Token::new(TokenKind::EndOfStatement { value: c }, self.span_from(start));
        }
        if grammar::PUNCTUATION_CHARS.contains(&c) {
            return self.scan_punctuation(start, c);
        }
        self.scan_literal(start)
    }

    fn scan_comment(&mut self, start: usize) -> Token {
        self.stream.eat_while(|c| c != '\n');
        let span = self.span_from(start);
        let value = self.stream.slice(start, self.ptr()).to_string();
        Token::new(TokenKind::Comment { value }, span)
    }

    fn scan_variable(&mut self, start: usize) -> Token {
        self.stream.next(1); // '$'
        let name_start = self.ptr();
        self.stream.eat_while(is_var_char);
        let value = self.stream.slice(name_start, self.ptr()).to_string();

        let mut properties = Vec::new();
        while self.stream.peek(0) == Some('.') && self.stream.peek(1).is_some_and(is_var_char) {
            self.stream.next(1); // '.'
            let prop_start = self.ptr();
            self.stream.eat_while(is_var_char);
            properties.push(self.stream.slice(prop_start, self.ptr()).to_string());
        }

        let span = self.span_from(start);
        if properties.is_empty() {
            Token::new(TokenKind::Identifier { value }, span)
        } else {
            Token::new(TokenKind::PropertyAccess { value, properties }, span)
        }
    }

    fn scan_string(&mut self, start: usize, quote: char) -> Token {
        self.stream.next(1); // opening quote
        let mut values = Vec::new();
        let mut variables = Vec::new();
        let mut current = String::new();
        let mut closed = false;

        loop {
            match self.stream.peek(0) {
                None => break,
                Some(c) if c == quote => {
                    self.stream.next(1);
                    closed = true;
                    break;
                }
                Some('\\') => {
                    self.stream.next(1);
                    if let Some(escaped) = self.stream.peek(0) {
                        current.push(escaped);
                        self.stream.next(1);
                    }
                }
                Some('$') if self.stream.peek(1).is_some_and(is_var_char) => {
                    values.push(std::mem::take(&mut current));
                    self.stream.next(1); // '$'
                    let var_start = self.ptr();
                    self.stream.eat_while(is_var_char);
                    variables.push(self.stream.slice(var_start, self.ptr()).to_string());
                }
                Some(c) => {
                    current.push(c);
                    self.stream.next(1);
                }
            }
        }

        let span = self.span_from(start);
        let quotes = Quote::from_char(quote);
        let mut flags = TokenFlags::NONE;
        if !closed {
            flags.insert(TokenFlags::UNTERMINATED_STRING);
        }

        if variables.is_empty() {
            Token::with_flags(
                TokenKind::Str { value: current, quotes, closed },
                span,
                flags,
            )
        } else {
            if !current.is_empty() {
                values.push(current);
            }
            flags.insert(TokenFlags::INTERPOLATED);
            Token::with_flags(
                TokenKind::InterpolatedStr { values, variables, quotes, closed },
                span,
                flags,
            )
        }
    }

    fn scan_option(&mut self, start: usize) -> Token {
        self.stream.next(2); // "--"
        let name_start = self.ptr();
        self.stream.eat_while(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        let value = self.stream.slice(name_start, self.ptr()).to_string();
        Token::new(
            TokenKind::Option { value, prefix: OptionPrefix::Long },
            self.span_from(start),
        )
    }

    fn scan_number(&mut self, start: usize) -> Token {
        self.stream.eat_while(|c| c.is_ascii_digit());
        if self.stream.peek(0) == Some('.') && self.stream.peek(1).is_some_and(|c| c.is_ascii_digit()) {
            self.stream.next(1);
            self.stream.eat_while(|c| c.is_ascii_digit());
        }
        let raw_text = self.stream.slice(start, self.ptr()).to_string();
        let value: f64 = raw_text
            .parse()
            .expect("number literal grammar only admits valid f64 syntax");
        Token::new(TokenKind::Number { value, raw_text }, self.span_from(start))
    }

    fn scan_operator(&mut self, start: usize) -> Token {
        self.stream.eat_while(|c| OPERATOR_CHARS.contains(&c));
        let value = self.stream.slice(start, self.ptr()).to_string();
        Token::new(TokenKind::Operator { value }, self.span_from(start))
    }

    fn scan_punctuation(&mut self, start: usize, c: char) -> Token {
        self.stream.next(1);
        let tok = Token::new(TokenKind::Special { value: c.to_string() }, self.span_from(start));
        if c == ':' {
            self.retro_flag_label();
        }
        tok
    }

    fn scan_literal(&mut self, start: usize) -> Token {
        self.stream.eat_while(|c| !is_literal_stop(c));
        let text = self.stream.slice(start, self.ptr()).to_string();
        let span = self.span_from(start);

        if grammar::is_keyword(&text) {
            return Token::new(TokenKind::Keyword { value: text }, span);
        }
        if grammar::is_boolean_literal(&text) {
            let value = grammar::boolean_value(&text);
            return Token::new(TokenKind::Boolean { value, raw_text: text }, span);
        }

        let after_function = self
            .prev_skip_whitespace(1)
            .is_some_and(|t| matches!(&t.kind, TokenKind::Keyword { value } if value == "function"));
        if after_function {
            let mut flags = TokenFlags::NONE;
            flags.insert(TokenFlags::FUNCTION_NAME);
            return Token::with_flags(TokenKind::Identifier { value: text }, span, flags);
        }

        Token::new(TokenKind::Str { value: text, quotes: None, closed: true }, span)
    }
}
