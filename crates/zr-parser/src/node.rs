use zr_common::span::Span;
use zr_common::token::Quote;

/// Opaque handle into an [`crate::arena::Arena`].
///
/// Every composite node refers to its children by `NodeId`, and every node
/// (except the root) carries an optional `NodeId` back to its parent. The
/// back-link is pure data -- ownership lives solely in the arena's `Vec`, so
/// there is no reference cycle to break when the tree is dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Mutable bitset carried on every node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NodeFlags(u8);

impl NodeFlags {
    pub const NONE: NodeFlags = NodeFlags(0);
    /// Mirrors the lexer's `UnterminatedString` flag onto a `Str` node built
    /// from an unterminated string token.
    pub const UNTERMINATED_STRING: NodeFlags = NodeFlags(1 << 0);
    pub const INTERPOLATED: NodeFlags = NodeFlags(1 << 1);
    /// Set on the node a `:` was found to follow, mirroring the lexer's
    /// token-level retrofit (see `zr_lexer::Lexer`).
    pub const LABEL: NodeFlags = NodeFlags(1 << 2);
    pub const FUNCTION_NAME: NodeFlags = NodeFlags(1 << 3);
    /// Set on every `Invalid` node and propagated so a post-walk can find
    /// every problem without re-running diagnostics.
    pub const HAS_ERROR: NodeFlags = NodeFlags(1 << 4);

    pub fn contains(self, other: NodeFlags) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn insert(&mut self, other: NodeFlags) {
        self.0 |= other.0;
    }
}

/// A property-assignment entry inside an `ObjectLiteral`.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyAssignment {
    pub name: NodeId,
    pub initializer: NodeId,
}

/// A formal parameter in a `FunctionDeclaration`.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub name: NodeId,
    pub type_ref: Option<NodeId>,
}

/// The closed set of AST node variants.
///
/// Terminals carry their own payload directly; composites hold `NodeId`
/// children. Every composite's children are reachable generically through
/// [`NodeKind::child_ids`], which backs node-utility walks (`get_next_node`,
/// `offset_node_position`, rendering) without each caller needing to match
/// on every variant.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    // ---- Terminals ----
    Str { text: String, quotes: Option<Quote>, is_unterminated: bool },
    Number { value: f64 },
    Boolean { value: bool },
    Identifier { name: String },
    OperatorToken { operator: String },
    PrefixToken { value: String },
    EndOfStatement,
    OptionKey { flag: String, right: Option<NodeId> },

    // ---- Composites ----
    Source { children: Vec<NodeId> },
    Block { statements: Vec<NodeId> },
    CommandStatement { command: NodeId, children: Vec<NodeId>, is_unterminated: bool },
    CommandName { name: NodeId },
    IfStatement { condition: Option<NodeId>, then_statement: Option<NodeId>, else_statement: Option<NodeId> },
    ForInStatement { initializer: NodeId, expression: NodeId, statement: NodeId },
    FunctionDeclaration { name: NodeId, parameters: Vec<Parameter>, body: NodeId },
    TypeReference { type_name: NodeId },
    VariableDeclaration { identifier: NodeId, expression: NodeId },
    VariableStatement { declaration: NodeId },
    BinaryExpression { left: NodeId, operator: NodeId, right: NodeId },
    UnaryExpression { operator: String, expression: NodeId },
    InterpolatedString { values: Vec<NodeId> },
    ArrayLiteral { values: Vec<NodeId> },
    ObjectLiteral { values: Vec<PropertyAssignment> },
    PropertyAccessExpression { expression: NodeId, name: NodeId },
    ArrayIndexExpression { expression: NodeId, index: NodeId },
    ParenthesizedExpression { expression: NodeId },
    InnerExpression { expression: NodeId },
    PrefixExpression { prefix: NodeId, expression: NodeId },
    OptionExpression { option: NodeId, expression: NodeId },
    Invalid { expression: Option<NodeId>, message: String },
}

impl NodeKind {
    /// A short, stable name for the variant, used in diagnostics, rendering
    /// and tests.
    pub fn name(&self) -> &'static str {
        match self {
            NodeKind::Str { .. } => "String",
            NodeKind::Number { .. } => "Number",
            NodeKind::Boolean { .. } => "Boolean",
            NodeKind::Identifier { .. } => "Identifier",
            NodeKind::OperatorToken { .. } => "OperatorToken",
            NodeKind::PrefixToken { .. } => "PrefixToken",
            NodeKind::EndOfStatement => "EndOfStatement",
            NodeKind::OptionKey { .. } => "OptionKey",
            NodeKind::Source { .. } => "Source",
            NodeKind::Block { .. } => "Block",
            NodeKind::CommandStatement { .. } => "CommandStatement",
            NodeKind::CommandName { .. } => "CommandName",
            NodeKind::IfStatement { .. } => "IfStatement",
            NodeKind::ForInStatement { .. } => "ForInStatement",
            NodeKind::FunctionDeclaration { .. } => "FunctionDeclaration",
            NodeKind::TypeReference { .. } => "TypeReference",
            NodeKind::VariableDeclaration { .. } => "VariableDeclaration",
            NodeKind::VariableStatement { .. } => "VariableStatement",
            NodeKind::BinaryExpression { .. } => "BinaryExpression",
            NodeKind::UnaryExpression { .. } => "UnaryExpression",
            NodeKind::InterpolatedString { .. } => "InterpolatedString",
            NodeKind::ArrayLiteral { .. } => "ArrayLiteral",
            NodeKind::ObjectLiteral { .. } => "ObjectLiteral",
            NodeKind::PropertyAccessExpression { .. } => "PropertyAccessExpression",
            NodeKind::ArrayIndexExpression { .. } => "ArrayIndexExpression",
            NodeKind::ParenthesizedExpression { .. } => "ParenthesizedExpression",
            NodeKind::InnerExpression { .. } => "InnerExpression",
            NodeKind::PrefixExpression { .. } => "PrefixExpression",
            NodeKind::OptionExpression { .. } => "OptionExpression",
            NodeKind::Invalid { .. } => "Invalid",
        }
    }

    /// The direct `NodeId` children of this node, in source order, across
    /// whichever field(s) hold them. Used generically by node utilities and
    /// the renderer instead of a match arm per caller.
    pub fn child_ids(&self) -> Vec<NodeId> {
        match self {
            NodeKind::Str { .. }
            | NodeKind::Number { .. }
            | NodeKind::Boolean { .. }
            | NodeKind::Identifier { .. }
            | NodeKind::OperatorToken { .. }
            | NodeKind::PrefixToken { .. }
            | NodeKind::EndOfStatement => Vec::new(),
            NodeKind::OptionKey { right, .. } => right.into_iter().copied().collect(),
            NodeKind::Source { children } => children.clone(),
            NodeKind::Block { statements } => statements.clone(),
            NodeKind::CommandStatement { command, children, .. } => {
                let mut ids = vec![*command];
                ids.extend(children.iter().copied());
                ids
            }
            NodeKind::CommandName { name } => vec![*name],
            NodeKind::IfStatement { condition, then_statement, else_statement } => {
                [*condition, *then_statement, *else_statement].into_iter().flatten().collect()
            }
            NodeKind::ForInStatement { initializer, expression, statement } => {
                vec![*initializer, *expression, *statement]
            }
            NodeKind::FunctionDeclaration { name, parameters, body } => {
                let mut ids = vec![*name];
                for p in parameters {
                    ids.push(p.name);
                    if let Some(t) = p.type_ref {
                        ids.push(t);
                    }
                }
                ids.push(*body);
                ids
            }
            NodeKind::TypeReference { type_name } => vec![*type_name],
            NodeKind::VariableDeclaration { identifier, expression } => vec![*identifier, *expression],
            NodeKind::VariableStatement { declaration } => vec![*declaration],
            NodeKind::BinaryExpression { left, operator, right } => vec![*left, *operator, *right],
            NodeKind::UnaryExpression { expression, .. } => vec![*expression],
            NodeKind::InterpolatedString { values } => values.clone(),
            NodeKind::ArrayLiteral { values } => values.clone(),
            NodeKind::ObjectLiteral { values } => {
                values.iter().flat_map(|p| [p.name, p.initializer]).collect()
            }
            NodeKind::PropertyAccessExpression { expression, name } => vec![*expression, *name],
            NodeKind::ArrayIndexExpression { expression, index } => vec![*expression, *index],
            NodeKind::ParenthesizedExpression { expression } => vec![*expression],
            NodeKind::InnerExpression { expression } => vec![*expression],
            NodeKind::PrefixExpression { prefix, expression } => vec![*prefix, *expression],
            NodeKind::OptionExpression { option, expression } => vec![*option, *expression],
            NodeKind::Invalid { expression, .. } => expression.into_iter().copied().collect(),
        }
    }
}

/// A node record as stored in the arena: the kind-tagged payload plus the
/// bookkeeping fields every node shares.
#[derive(Debug, Clone)]
pub struct NodeRecord {
    pub kind: NodeKind,
    pub parent: Option<NodeId>,
    pub start_pos: Option<u32>,
    pub end_pos: Option<u32>,
    pub raw_text: Option<String>,
    pub flags: NodeFlags,
}

impl NodeRecord {
    pub fn span(&self) -> Option<Span> {
        match (self.start_pos, self.end_pos) {
            (Some(s), Some(e)) => Some(Span::new(s, e)),
            _ => None,
        }
    }
}
