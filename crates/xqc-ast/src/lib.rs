// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Abstract syntax tree for xqc query programs.
//!
//! The tree is an arena: nodes live in a `ProgramTree` and refer to each
//! other by `NodeId`. Semantic passes rewrite a node by replacing the kind
//! stored at its id, so ids stay valid across passes.

pub mod builder;
pub mod name;
pub mod span;
pub mod tree;
pub mod ty;

pub use builder::TreeBuilder;
pub use name::QualifiedName;
pub use span::{LineMap, Span};
pub use tree::{BinOp, Literal, Node, NodeKind, ProgramTree, MAX_CHILDREN};
pub use ty::Ty;

/// Stable index of a node inside a `ProgramTree`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct NodeId(pub u32);

impl NodeId {
    pub const DUMMY: NodeId = NodeId(u32::MAX);
}

/// Handle to a function descriptor owned by a function environment.
///
/// Resolved `Apply` and `Fun` nodes carry this instead of a name; the
/// environment that produced it is needed to look the descriptor up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FunctionId(pub u32);
