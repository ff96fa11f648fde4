//! Parse diagnostics and the node-kind guards used to narrow a variant
//! without an exhaustive match.

use std::fmt;

use crate::arena::Arena;
use crate::node::{NodeId, NodeKind};

/// A single diagnostic produced while parsing: the node whose span
/// localises the problem, plus a human-readable message.
///
/// `NodeError`s never abort a parse -- they accumulate in
/// [`crate::parser::ParseOutput::errors`] alongside the `Invalid` node that
/// stands in for whatever couldn't be parsed (see the parser's recovery
/// routine).
#[derive(Debug, Clone, PartialEq)]
pub struct NodeError {
    pub node: NodeId,
    pub message: String,
}

impl NodeError {
    pub fn new(node: NodeId, message: impl Into<String>) -> Self {
        Self { node, message: message.into() }
    }
}

impl fmt::Display for NodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for NodeError {}

/// Whether `id`'s kind has the same name as `kind_name` (e.g. `"CommandStatement"`).
///
/// Mirrors the reference implementation's `isNode(node, kind)` discriminant
/// check; exhaustive `match` on [`NodeKind`] is still the preferred way to
/// branch when every variant needs handling.
pub fn is_node(arena: &Arena, id: NodeId, kind_name: &str) -> bool {
    arena.get(id).kind.name() == kind_name
}

/// Whether `id` is one of the composite node kinds (§3.2 "Composites") that
/// owns children, as opposed to a terminal.
pub fn is_parent_node(arena: &Arena, id: NodeId) -> bool {
    !matches!(
        arena.get(id).kind,
        NodeKind::Str { .. }
            | NodeKind::Number { .. }
            | NodeKind::Boolean { .. }
            | NodeKind::Identifier { .. }
            | NodeKind::OperatorToken { .. }
            | NodeKind::PrefixToken { .. }
            | NodeKind::EndOfStatement
            | NodeKind::OptionKey { .. }
    )
}

/// Renders every [`NodeError`] as a plain `start..end: message` line, using
/// byte offsets directly. Always available; [`render_errors_pretty`] gives
/// a nicer terminal rendering behind the `pretty-diagnostics` feature.
pub fn render_errors_plain(errors: &[NodeError], arena: &Arena) -> String {
    let mut out = String::new();
    for err in errors {
        let span = arena.get(err.node).span();
        match span {
            Some(span) => out.push_str(&format!("{}..{}: {}\n", span.start, span.end, err.message)),
            None => out.push_str(&format!("<unknown>: {}\n", err.message)),
        }
    }
    out
}

#[cfg(feature = "pretty-diagnostics")]
pub fn render_errors_pretty(errors: &[NodeError], arena: &Arena, source: &str) -> String {
    use ariadne::{Color, Config, Label, Report, ReportKind, Source as AriadneSource};

    let mut buf = Vec::new();
    let config = Config::default().with_color(false);
    for err in errors {
        let span = arena.get(err.node).span();
        let (start, end) = match span {
            Some(span) => (span.start as usize, span.end as usize),
            None => (0, 0),
        };
        let end = end.max(start + 1).min(source.len().max(1));
        let start = start.min(end);
        let range = start..end;

        let report = Report::build(ReportKind::Error, range.clone())
            .with_message(&err.message)
            .with_config(config)
            .with_label(Label::new(range).with_message(&err.message).with_color(Color::Red))
            .finish();
        if report.write(AriadneSource::from(source), &mut buf).is_err() {
            continue;
        }
    }
    String::from_utf8(buf).unwrap_or_default()
}
