//! Static grammar tables shared by the lexer and parser.
//!
//! All tables here are immutable data computed once; none of them hold
//! per-parse state.

/// Keywords recognised at the start of a bareword literal.
pub const KEYWORDS: &[&str] = &["if", "else", "for", "in", "function"];

/// Type-name keywords usable in a `Parameter` type annotation, checked by
/// the parser's `function` parameter list against the type name that
/// follows a `:`.
pub const TYPE_KEYWORDS: &[&str] = &["string", "number", "boolean"];

/// Boolean literal spellings.
pub const BOOLEAN_LITERALS: &[&str] = &["true", "false"];

/// Characters that combine into operator runs (`&&`, `||`, `>=`, `+=`, ...).
pub const OPERATOR_CHARS: &[char] = &['&', '|', '=', '>', '<', '-', '+', '/', '*', '!'];

/// Characters that terminate a statement.
pub const END_OF_STATEMENT_CHARS: &[char] = &[';', '\n'];

/// Single-character punctuation tokens.
pub const PUNCTUATION_CHARS: &[char] = &['(', ')', ',', '{', '}', '[', ']', '.', ':', '\\'];

/// Characters recognised as a [`PrefixToken`] when immediately preceding a
/// literal inside an argument slot.
///
/// [`PrefixToken`]: the AST node of the same name.
pub const PREFIX_CHARS: &[char] = &['~', '@', '%', '^', '*', '!'];

/// Unary prefix operators usable in expression mode.
pub const UNARY_OPERATORS: &[&str] = &["!"];

/// Binary operators that fold an accumulated command into the left-hand
/// side of a `BinaryExpression` at command boundaries.
pub const COMMAND_BOUNDARY_OPERATORS: &[&str] = &["|", "&&", "||"];

/// Returns `true` if `s` is one of the reserved keywords.
pub fn is_keyword(s: &str) -> bool {
    KEYWORDS.contains(&s)
}

/// Returns `true` if `s` is a type-name keyword (`string`, `number`, `boolean`).
pub fn is_type_keyword(s: &str) -> bool {
    TYPE_KEYWORDS.contains(&s)
}

/// Returns `true` if `s` spells a boolean literal.
pub fn is_boolean_literal(s: &str) -> bool {
    BOOLEAN_LITERALS.contains(&s)
}

/// Parses a boolean literal's truth value. Panics if `s` is not `true`/`false`;
/// callers must check [`is_boolean_literal`] first.
pub fn boolean_value(s: &str) -> bool {
    match s {
        "true" => true,
        "false" => false,
        _ => unreachable!("boolean_value called on non-boolean literal {s:?}"),
    }
}

/// Operator precedence table (higher number binds tighter).
///
/// Mirrors the table in the lexical reference: `!, =, +=, -=` bind loosest,
/// `* / %` bind tightest. Ties are broken left-to-right by token order.
pub fn operator_precedence(op: &str) -> Option<u8> {
    match op {
        "!" | "=" | "+=" | "-=" => Some(1),
        "|" | "||" => Some(2),
        "&&" => Some(3),
        "<" | ">" | ">=" | "<=" | "==" | "!=" => Some(7),
        "+" | "-" => Some(10),
        "*" | "/" | "%" => Some(20),
        _ => None,
    }
}

/// Operators that fold command statements into a `BinaryExpression`.
pub fn is_command_boundary_operator(op: &str) -> bool {
    COMMAND_BOUNDARY_OPERATORS.contains(&op)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_lookup() {
        assert!(is_keyword("if"));
        assert!(is_keyword("function"));
        assert!(!is_keyword("iffy"));
    }

    #[test]
    fn type_keyword_lookup() {
        assert!(is_type_keyword("string"));
        assert!(is_type_keyword("number"));
        assert!(is_type_keyword("boolean"));
        assert!(!is_type_keyword("string[]"));
        assert!(!is_type_keyword("if"));
    }

    #[test]
    fn boolean_lookup_and_value() {
        assert!(is_boolean_literal("true"));
        assert!(is_boolean_literal("false"));
        assert!(!is_boolean_literal("True"));
        assert!(boolean_value("true"));
        assert!(!boolean_value("false"));
    }

    #[test]
    fn precedence_ordering() {
        assert!(operator_precedence("*").unwrap() > operator_precedence("+").unwrap());
        assert!(operator_precedence("+").unwrap() > operator_precedence("==").unwrap());
        assert!(operator_precedence("==").unwrap() > operator_precedence("&&").unwrap());
        assert!(operator_precedence("&&").unwrap() > operator_precedence("|").unwrap());
        assert!(operator_precedence("|").unwrap() > operator_precedence("=").unwrap());
        assert_eq!(operator_precedence("?"), None);
    }

    #[test]
    fn command_boundary_operators_recognised() {
        assert!(is_command_boundary_operator("&&"));
        assert!(is_command_boundary_operator("||"));
        assert!(is_command_boundary_operator("|"));
        assert!(!is_command_boundary_operator("+"));
    }
}
