//! Node factory functions, one per [`NodeKind`] variant.
//!
//! Every factory allocates its payload in the given [`Arena`] and returns
//! the new [`NodeId`]; composite factories wire parent back-links onto
//! their children for free through [`Arena::alloc`]. These are the public
//! re-exports that let downstream crates (a renderer, an interpreter, a
//! language server) build or splice in nodes without going through the
//! parser.

use zr_common::span::Span;
use zr_common::token::Quote;

use crate::arena::Arena;
use crate::node::{NodeFlags, NodeId, NodeKind, Parameter, PropertyAssignment};

pub fn create_str(arena: &mut Arena, text: String, quotes: Option<Quote>, is_unterminated: bool, span: Span) -> NodeId {
    let id = arena.alloc(NodeKind::Str { text, quotes, is_unterminated }, Some(span));
    if is_unterminated {
        arena.set_flag(id, NodeFlags::UNTERMINATED_STRING);
    }
    id
}

pub fn create_number(arena: &mut Arena, value: f64, span: Span) -> NodeId {
    arena.alloc(NodeKind::Number { value }, Some(span))
}

pub fn create_boolean(arena: &mut Arena, value: bool, span: Span) -> NodeId {
    arena.alloc(NodeKind::Boolean { value }, Some(span))
}

pub fn create_identifier(arena: &mut Arena, name: String, span: Span) -> NodeId {
    arena.alloc(NodeKind::Identifier { name }, Some(span))
}

pub fn create_operator_token(arena: &mut Arena, operator: String, span: Span) -> NodeId {
    arena.alloc(NodeKind::OperatorToken { operator }, Some(span))
}

pub fn create_prefix_token(arena: &mut Arena, value: String, span: Span) -> NodeId {
    arena.alloc(NodeKind::PrefixToken { value }, Some(span))
}

pub fn create_end_of_statement(arena: &mut Arena, span: Span) -> NodeId {
    arena.alloc(NodeKind::EndOfStatement, Some(span))
}

pub fn create_option_key(arena: &mut Arena, flag: String, right: Option<NodeId>, span: Span) -> NodeId {
    arena.alloc(NodeKind::OptionKey { flag, right }, Some(span))
}

pub fn create_source(arena: &mut Arena, children: Vec<NodeId>, span: Span) -> NodeId {
    arena.alloc(NodeKind::Source { children }, Some(span))
}

pub fn create_block(arena: &mut Arena, statements: Vec<NodeId>, span: Span) -> NodeId {
    arena.alloc(NodeKind::Block { statements }, Some(span))
}

pub fn create_command_statement(
    arena: &mut Arena,
    command: NodeId,
    children: Vec<NodeId>,
    is_unterminated: bool,
    span: Span,
) -> NodeId {
    arena.alloc(NodeKind::CommandStatement { command, children, is_unterminated }, Some(span))
}

pub fn create_command_name(arena: &mut Arena, name: NodeId, span: Span) -> NodeId {
    arena.alloc(NodeKind::CommandName { name }, Some(span))
}

pub fn create_if_statement(
    arena: &mut Arena,
    condition: Option<NodeId>,
    then_statement: Option<NodeId>,
    else_statement: Option<NodeId>,
    span: Span,
) -> NodeId {
    arena.alloc(NodeKind::IfStatement { condition, then_statement, else_statement }, Some(span))
}

pub fn create_for_in_statement(
    arena: &mut Arena,
    initializer: NodeId,
    expression: NodeId,
    statement: NodeId,
    span: Span,
) -> NodeId {
    arena.alloc(NodeKind::ForInStatement { initializer, expression, statement }, Some(span))
}

pub fn create_function_declaration(
    arena: &mut Arena,
    name: NodeId,
    parameters: Vec<Parameter>,
    body: NodeId,
    span: Span,
) -> NodeId {
    arena.alloc(NodeKind::FunctionDeclaration { name, parameters, body }, Some(span))
}

pub fn create_type_reference(arena: &mut Arena, type_name: NodeId, span: Span) -> NodeId {
    arena.alloc(NodeKind::TypeReference { type_name }, Some(span))
}

pub fn create_variable_declaration(arena: &mut Arena, identifier: NodeId, expression: NodeId, span: Span) -> NodeId {
    arena.alloc(NodeKind::VariableDeclaration { identifier, expression }, Some(span))
}

pub fn create_variable_statement(arena: &mut Arena, declaration: NodeId, span: Span) -> NodeId {
    arena.alloc(NodeKind::VariableStatement { declaration }, Some(span))
}

pub fn create_binary_expression(arena: &mut Arena, left: NodeId, operator: NodeId, right: NodeId, span: Span) -> NodeId {
    arena.alloc(NodeKind::BinaryExpression { left, operator, right }, Some(span))
}

pub fn create_unary_expression(arena: &mut Arena, operator: String, expression: NodeId, span: Span) -> NodeId {
    arena.alloc(NodeKind::UnaryExpression { operator, expression }, Some(span))
}

pub fn create_interpolated_string(arena: &mut Arena, values: Vec<NodeId>, span: Span) -> NodeId {
    let id = arena.alloc(NodeKind::InterpolatedString { values }, Some(span));
    arena.set_flag(id, NodeFlags::INTERPOLATED);
    id
}

pub fn create_array_literal(arena: &mut Arena, values: Vec<NodeId>, span: Span) -> NodeId {
    arena.alloc(NodeKind::ArrayLiteral { values }, Some(span))
}

pub fn create_object_literal(arena: &mut Arena, values: Vec<PropertyAssignment>, span: Span) -> NodeId {
    arena.alloc(NodeKind::ObjectLiteral { values }, Some(span))
}

pub fn create_property_access_expression(arena: &mut Arena, expression: NodeId, name: NodeId, span: Span) -> NodeId {
    arena.alloc(NodeKind::PropertyAccessExpression { expression, name }, Some(span))
}

pub fn create_array_index_expression(arena: &mut Arena, expression: NodeId, index: NodeId, span: Span) -> NodeId {
    arena.alloc(NodeKind::ArrayIndexExpression { expression, index }, Some(span))
}

pub fn create_parenthesized_expression(arena: &mut Arena, expression: NodeId, span: Span) -> NodeId {
    arena.alloc(NodeKind::ParenthesizedExpression { expression }, Some(span))
}

pub fn create_inner_expression(arena: &mut Arena, expression: NodeId, span: Span) -> NodeId {
    arena.alloc(NodeKind::InnerExpression { expression }, Some(span))
}

pub fn create_prefix_expression(arena: &mut Arena, prefix: NodeId, expression: NodeId, span: Span) -> NodeId {
    arena.alloc(NodeKind::PrefixExpression { prefix, expression }, Some(span))
}

pub fn create_option_expression(arena: &mut Arena, option: NodeId, expression: NodeId, span: Span) -> NodeId {
    arena.alloc(NodeKind::OptionExpression { option, expression }, Some(span))
}

pub fn create_invalid(arena: &mut Arena, expression: Option<NodeId>, message: String, span: Span) -> NodeId {
    let id = arena.alloc(NodeKind::Invalid { expression, message }, Some(span));
    arena.set_flag(id, NodeFlags::HAS_ERROR);
    id
}
