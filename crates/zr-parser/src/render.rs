//! Near-source reconstruction (`render`) and the indented debug dump
//! (`pretty_print`) that downstream tooling (CLI, editor integrations)
//! reads the tree through.
//!
//! `render` is not byte-exact: it re-emits a form that parses back to an
//! equivalent tree (the idempotence property in the spec's testable
//! properties), not the original whitespace/comment layout.

use crate::arena::Arena;
use crate::node::{NodeId, NodeKind};

/// Reconstruct Zr source text from `id` down.
pub fn render(arena: &Arena, id: NodeId) -> String {
    match &arena.get(id).kind {
        NodeKind::Str { text, quotes, .. } => match quotes {
            Some(q) => format!("{}{}{}", q.as_char(), escape_for_quote(text, q.as_char()), q.as_char()),
            None => text.clone(),
        },
        NodeKind::Number { value } => render_number(*value),
        NodeKind::Boolean { value } => value.to_string(),
        NodeKind::Identifier { name } => format!("${name}"),
        NodeKind::OperatorToken { operator } => operator.clone(),
        NodeKind::PrefixToken { value } => value.clone(),
        NodeKind::EndOfStatement => "\n".to_string(),
        NodeKind::OptionKey { flag, .. } => render_option_key(flag),

        NodeKind::Source { children } => join_lines(arena, children),
        NodeKind::Block { statements } => format!("{{\n{}\n}}", indent(&join_lines(arena, statements))),
        NodeKind::CommandStatement { command, children, .. } => {
            let mut parts = vec![render(arena, *command)];
            parts.extend(children.iter().map(|c| render(arena, *c)));
            parts.join(" ")
        }
        NodeKind::CommandName { name } => render(arena, *name),
        NodeKind::IfStatement { condition, then_statement, else_statement } => {
            let mut out = "if".to_string();
            if let Some(c) = condition {
                out.push(' ');
                out.push_str(&render(arena, *c));
            }
            if let Some(t) = then_statement {
                out.push(' ');
                out.push_str(&render(arena, *t));
            }
            if let Some(e) = else_statement {
                out.push_str(" else ");
                out.push_str(&render(arena, *e));
            }
            out
        }
        NodeKind::ForInStatement { initializer, expression, statement } => {
            format!("for {} in {} {}", render(arena, *initializer), render(arena, *expression), render(arena, *statement))
        }
        NodeKind::FunctionDeclaration { name, parameters, body } => {
            let params = parameters
                .iter()
                .map(|p| match p.type_ref {
                    Some(t) => format!("{}: {}", bare_name(arena, p.name), render(arena, t)),
                    None => bare_name(arena, p.name).to_string(),
                })
                .collect::<Vec<_>>()
                .join(", ");
            format!("function {}({}) {}", bare_name(arena, *name), params, render(arena, *body))
        }
        NodeKind::TypeReference { type_name } => render(arena, *type_name),
        NodeKind::VariableDeclaration { identifier, expression } => {
            format!("{} = {}", render(arena, *identifier), render(arena, *expression))
        }
        NodeKind::VariableStatement { declaration } => render(arena, *declaration),
        NodeKind::BinaryExpression { left, operator, right } => {
            format!("{} {} {}", render(arena, *left), render(arena, *operator), render(arena, *right))
        }
        NodeKind::UnaryExpression { operator, expression } => format!("{operator}{}", render(arena, *expression)),
        NodeKind::InterpolatedString { values } => render_interpolated_string(arena, values),
        NodeKind::ArrayLiteral { values } => {
            format!("[{}]", values.iter().map(|v| render(arena, *v)).collect::<Vec<_>>().join(", "))
        }
        NodeKind::ObjectLiteral { values } => {
            let body = values
                .iter()
                .map(|pa| format!("{}: {}", render(arena, pa.name), render(arena, pa.initializer)))
                .collect::<Vec<_>>()
                .join(", ");
            format!("{{ {body} }}")
        }
        NodeKind::PropertyAccessExpression { expression, name } => {
            format!("{}.{}", render(arena, *expression), bare_name(arena, *name))
        }
        NodeKind::ArrayIndexExpression { expression, index } => {
            format!("{}[{}]", render(arena, *expression), render(arena, *index))
        }
        NodeKind::ParenthesizedExpression { expression } => format!("({})", render(arena, *expression)),
        NodeKind::InnerExpression { expression } => format!("$({})", render(arena, *expression)),
        NodeKind::PrefixExpression { prefix, expression } => format!("{}{}", render(arena, *prefix), render(arena, *expression)),
        NodeKind::OptionExpression { option, expression } => format!("{} {}", render(arena, *option), render(arena, *expression)),
        NodeKind::Invalid { expression, message } => match expression {
            Some(e) => format!("/* invalid: {message} */ {}", render(arena, *e)),
            None => format!("/* invalid: {message} */"),
        },
    }
}

/// The name carried by an `Identifier` node, without the `$` sigil `render`
/// adds for a variable reference. Used anywhere an identifier names
/// something rather than referencing a value (parameters, property names,
/// function names).
fn bare_name(arena: &Arena, id: NodeId) -> &str {
    match &arena.get(id).kind {
        NodeKind::Identifier { name } => name,
        other => panic!("expected Identifier, got {}", other.name()),
    }
}

fn render_number(value: f64) -> String {
    if value.fract() == 0.0 && value.is_finite() {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

fn render_option_key(flag: &str) -> String {
    if flag.chars().count() == 1 {
        format!("-{flag}")
    } else {
        format!("--{flag}")
    }
}

fn render_interpolated_string(arena: &Arena, values: &[NodeId]) -> String {
    let mut body = String::new();
    for &id in values {
        match &arena.get(id).kind {
            NodeKind::Str { text, .. } => body.push_str(text),
            NodeKind::Identifier { name } => {
                body.push('$');
                body.push_str(name);
            }
            other => panic!("InterpolatedString value was a {}, expected Str or Identifier", other.name()),
        }
    }
    format!("\"{}\"", escape_for_quote(&body, '"'))
}

fn escape_for_quote(text: &str, quote: char) -> String {
    text.replace(quote, &format!("\\{quote}"))
}

fn join_lines(arena: &Arena, ids: &[NodeId]) -> String {
    ids.iter().map(|id| render(arena, *id)).collect::<Vec<_>>().join("\n")
}

fn indent(text: &str) -> String {
    text.lines().map(|l| format!("  {l}")).collect::<Vec<_>>().join("\n")
}

/// One line per node, indented by depth -- a debugging dump of the tree,
/// not a reparsable form. `prefix` is prepended to every line, letting
/// callers nest a sub-tree dump inside an outer report.
pub fn pretty_print(arena: &Arena, ids: &[NodeId], prefix: &str) -> String {
    let mut out = String::new();
    for &id in ids {
        pretty_print_node(arena, id, prefix, &mut out);
    }
    out
}

fn pretty_print_node(arena: &Arena, id: NodeId, prefix: &str, out: &mut String) {
    let record = arena.get(id);
    out.push_str(prefix);
    out.push_str(record.kind.name());
    if let Some(summary) = node_summary(&record.kind) {
        out.push(' ');
        out.push_str(&summary);
    }
    out.push('\n');

    let child_prefix = format!("{prefix}  ");
    for child in record.kind.child_ids() {
        pretty_print_node(arena, child, &child_prefix, out);
    }
}

fn node_summary(kind: &NodeKind) -> Option<String> {
    match kind {
        NodeKind::Str { text, .. } => Some(format!("{text:?}")),
        NodeKind::Number { value } => Some(value.to_string()),
        NodeKind::Boolean { value } => Some(value.to_string()),
        NodeKind::Identifier { name } => Some(format!("${name}")),
        NodeKind::OperatorToken { operator } => Some(operator.clone()),
        NodeKind::PrefixToken { value } => Some(value.clone()),
        NodeKind::OptionKey { flag, .. } => Some(render_option_key(flag)),
        NodeKind::UnaryExpression { operator, .. } => Some(operator.clone()),
        NodeKind::Invalid { message, .. } => Some(format!("{message:?}")),
        _ => None,
    }
}
