//! Node-utility walks: the handful of tree operations that don't belong to
//! the parser or the renderer but are needed by callers that splice or
//! inspect an already-built tree.

use rustc_hash::FxHashMap;

use crate::arena::Arena;
use crate::factories;
use crate::node::{NodeId, NodeKind};

/// Add `delta` to every `start_pos`/`end_pos` in `id`'s subtree (`id`
/// included). Used when splicing a sub-parse into a larger source, so the
/// spliced nodes' spans read as offsets into the outer source rather than
/// the fragment that was parsed standalone.
pub fn offset_node_position(arena: &mut Arena, id: NodeId, delta: i64) {
    for node in arena.subtree(id) {
        arena.offset_span(node, delta);
    }
}

/// The sibling immediately after `id` in its parent's child list, or `None`
/// if `id` is the last child or has no parent (e.g. the `Source` root).
pub fn get_next_node(arena: &Arena, id: NodeId) -> Option<NodeId> {
    sibling_at_offset(arena, id, 1)
}

/// The sibling immediately before `id` in its parent's child list.
pub fn get_previous_node(arena: &Arena, id: NodeId) -> Option<NodeId> {
    sibling_at_offset(arena, id, -1)
}

fn sibling_at_offset(arena: &Arena, id: NodeId, offset: i64) -> Option<NodeId> {
    let parent_id = arena.get(id).parent?;
    let siblings = arena.get(parent_id).kind.child_ids();
    let index = siblings.iter().position(|&s| s == id)? as i64;
    let target = index + offset;
    if target < 0 {
        return None;
    }
    siblings.get(target as usize).copied()
}

/// Collapse an `InterpolatedString` node into a plain `Str` node, replacing
/// each variable reference with its value from `vars` (or, for an unbound
/// name, `$name` itself -- the same fallback the interpreter's `tostring`
/// uses for an unresolved reference).
///
/// Panics if `id` is not an `InterpolatedString` node or if one of its
/// `values` is neither `Str` nor `Identifier` -- both would mean the
/// parser built a malformed node, which should never happen.
pub fn flatten_interpolated_string(arena: &mut Arena, id: NodeId, vars: &FxHashMap<String, String>) -> NodeId {
    let (values, span) = match &arena.get(id).kind {
        NodeKind::InterpolatedString { values } => (values.clone(), arena.get(id).span()),
        other => panic!("flatten_interpolated_string called on a {} node", other.name()),
    };

    let mut text = String::new();
    for value_id in values {
        match &arena.get(value_id).kind {
            NodeKind::Str { text: chunk, .. } => text.push_str(chunk),
            NodeKind::Identifier { name } => match vars.get(name) {
                Some(value) => text.push_str(value),
                None => {
                    text.push('$');
                    text.push_str(name);
                }
            },
            other => panic!("InterpolatedString value was a {} node, expected Str or Identifier", other.name()),
        }
    }

    let span = span.unwrap_or_else(|| zr_common::span::Span::empty_at(0));
    factories::create_str(arena, text, None, false, span)
}
