//! Recursive-descent + Pratt parser and arena-indexed AST for the
//! Zirconium (Zr) front end.
//!
//! [`parse`] turns source text into a [`parser::ParseOutput`]: an [`Arena`]
//! of [`Node`](node::NodeKind)s, the `Source` root, and any [`NodeError`]s
//! collected along the way -- malformed input never aborts the parse, it
//! produces `Invalid` nodes instead. [`render`] reconstructs Zr source from
//! a node back down; [`pretty_print`] dumps the tree for debugging.

pub mod arena;
pub mod diagnostics;
pub mod factories;
pub mod node;
pub mod node_utils;
pub mod parser;
pub mod render;

pub use arena::Arena;
pub use diagnostics::{is_node, is_parent_node, render_errors_plain, NodeError};
pub use node::{NodeFlags, NodeId, NodeKind, NodeRecord, Parameter, PropertyAssignment};
pub use node_utils::{flatten_interpolated_string, get_next_node, get_previous_node, offset_node_position};
pub use parser::{parse, parse_with, ParseOutput};
pub use render::{pretty_print, render};

#[cfg(feature = "pretty-diagnostics")]
pub use diagnostics::render_errors_pretty;

// Re-exported so downstream crates can configure tokenization (e.g. seeding
// `command_names`) without depending on `zr-lexer` directly.
pub use zr_lexer::LexerOptions;
