//! The node arena backing the AST.
//!
//! Every parse owns exactly one `Arena`. Nodes are appended as they are
//! built (children always exist before the parent that references them),
//! and a child's `parent` back-link is wired the moment its owning node is
//! allocated. This replaces the cyclic `parent`/`children` object graph the
//! reference implementation uses: ownership lives solely in `Arena::nodes`,
//! so dropping the arena frees the whole tree with no cycle to break.

use zr_common::span::Span;

use crate::node::{NodeFlags, NodeId, NodeKind, NodeRecord};

/// Owns every [`NodeRecord`] produced by a single parse.
#[derive(Debug, Default)]
pub struct Arena {
    nodes: Vec<NodeRecord>,
}

impl Arena {
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, id: NodeId) -> &NodeRecord {
        &self.nodes[id.index()]
    }

    /// Allocate `kind` as a new node, wiring `parent` onto every direct
    /// child [`NodeKind::child_ids`] reports. Returns the new node's id.
    pub fn alloc(&mut self, kind: NodeKind, span: Option<Span>) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        let children = kind.child_ids();
        self.nodes.push(NodeRecord {
            kind,
            parent: None,
            start_pos: span.map(|s| s.start),
            end_pos: span.map(|s| s.end),
            raw_text: None,
            flags: NodeFlags::NONE,
        });
        for child in children {
            self.nodes[child.index()].parent = Some(id);
        }
        id
    }

    pub fn set_flag(&mut self, id: NodeId, flag: NodeFlags) {
        self.nodes[id.index()].flags.insert(flag);
    }

    pub fn set_raw_text(&mut self, id: NodeId, text: String) {
        self.nodes[id.index()].raw_text = Some(text);
    }

    /// Shift `id`'s own span by `delta`, without touching descendants.
    /// Used by [`crate::node_utils::offset_node_position`], which walks the
    /// whole subtree and calls this once per node.
    pub fn offset_span(&mut self, id: NodeId, delta: i64) {
        let rec = &mut self.nodes[id.index()];
        if let (Some(s), Some(e)) = (rec.start_pos, rec.end_pos) {
            let span = Span::new(s, e).offset(delta);
            rec.start_pos = Some(span.start);
            rec.end_pos = Some(span.end);
        }
    }

    /// `id` and every node transitively reachable from it through
    /// [`NodeKind::child_ids`], in pre-order (parent before children).
    pub fn subtree(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            out.push(next);
            let mut children = self.get(next).kind.child_ids();
            children.reverse();
            stack.extend(children);
        }
        out
    }
}
