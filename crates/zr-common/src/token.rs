use std::ops::{BitOr, BitOrAssign};

use serde::Serialize;

use crate::span::Span;

/// Mutable bitset carried on every token and AST node.
///
/// Flags are set at emission time except for [`TokenFlags::LABEL`], which the
/// lexer retro-applies to an already-emitted token once it sees the `:` that
/// follows it (see the lexer's scanning rules for punctuation).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct TokenFlags(u8);

impl TokenFlags {
    pub const NONE: TokenFlags = TokenFlags(0);
    pub const UNTERMINATED_STRING: TokenFlags = TokenFlags(1 << 0);
    pub const INTERPOLATED: TokenFlags = TokenFlags(1 << 1);
    pub const LABEL: TokenFlags = TokenFlags(1 << 2);
    pub const FUNCTION_NAME: TokenFlags = TokenFlags(1 << 3);

    pub fn contains(self, other: TokenFlags) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn insert(&mut self, other: TokenFlags) {
        self.0 |= other.0;
    }
}

impl BitOr for TokenFlags {
    type Output = TokenFlags;
    fn bitor(self, rhs: TokenFlags) -> TokenFlags {
        TokenFlags(self.0 | rhs.0)
    }
}

impl BitOrAssign for TokenFlags {
    fn bitor_assign(&mut self, rhs: TokenFlags) {
        self.0 |= rhs.0;
    }
}

/// String quote character, when the string was quoted rather than bareword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Quote {
    Double,
    Single,
}

impl Quote {
    pub fn from_char(c: char) -> Option<Quote> {
        match c {
            '"' => Some(Quote::Double),
            '\'' => Some(Quote::Single),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Quote::Double => '"',
            Quote::Single => '\'',
        }
    }
}

/// Whether an `Option` token carries a `-` or `--` prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum OptionPrefix {
    Long,
    Short,
}

impl OptionPrefix {
    pub fn as_str(self) -> &'static str {
        match self {
            OptionPrefix::Long => "--",
            OptionPrefix::Short => "-",
        }
    }
}

/// The kind-specific payload of a [`Token`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum TokenKind {
    /// A quoted or bareword string with no interpolations.
    Str {
        value: String,
        quotes: Option<Quote>,
        closed: bool,
    },
    /// A quoted string containing one or more `$name` interpolations.
    InterpolatedStr {
        values: Vec<String>,
        variables: Vec<String>,
        quotes: Option<Quote>,
        closed: bool,
    },
    Number {
        value: f64,
        raw_text: String,
    },
    Boolean {
        value: bool,
        raw_text: String,
    },
    Keyword {
        value: String,
    },
    Identifier {
        value: String,
    },
    PropertyAccess {
        value: String,
        properties: Vec<String>,
    },
    Option {
        value: String,
        prefix: OptionPrefix,
    },
    Operator {
        value: String,
    },
    Special {
        value: String,
    },
    EndOfStatement {
        value: char,
    },
    Whitespace {
        value: String,
    },
    Comment {
        value: String,
    },
    Eof,
}

impl TokenKind {
    /// Whether `self` and `other` are the same variant, ignoring payload.
    /// Used by the lexer's `is_next_of_kind`/`is_next_of_any_kind` lookahead.
    pub fn is_same_kind(&self, other: &TokenKind) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }

    /// A short, stable name for the variant, used in diagnostics and tests.
    pub fn name(&self) -> &'static str {
        match self {
            TokenKind::Str { .. } => "String",
            TokenKind::InterpolatedStr { .. } => "InterpolatedString",
            TokenKind::Number { .. } => "Number",
            TokenKind::Boolean { .. } => "Boolean",
            TokenKind::Keyword { .. } => "Keyword",
            TokenKind::Identifier { .. } => "Identifier",
            TokenKind::PropertyAccess { .. } => "PropertyAccess",
            TokenKind::Option { .. } => "Option",
            TokenKind::Operator { .. } => "Operator",
            TokenKind::Special { .. } => "Special",
            TokenKind::EndOfStatement { .. } => "EndOfStatement",
            TokenKind::Whitespace { .. } => "Whitespace",
            TokenKind::Comment { .. } => "Comment",
            TokenKind::Eof => "Eof",
        }
    }
}

/// A lexical token: a kind-tagged payload plus its span and flags.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
    pub flags: TokenFlags,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self {
            kind,
            span,
            flags: TokenFlags::NONE,
        }
    }

    pub fn with_flags(kind: TokenKind, span: Span, flags: TokenFlags) -> Self {
        Self { kind, span, flags }
    }

    pub fn is_eof(&self) -> bool {
        matches!(self.kind, TokenKind::Eof)
    }

    /// Whether this token is whitespace or a comment -- trivia excluded from
    /// round-trip/idempotence comparisons.
    pub fn is_trivia(&self) -> bool {
        matches!(self.kind, TokenKind::Whitespace { .. } | TokenKind::Comment { .. })
    }
}
