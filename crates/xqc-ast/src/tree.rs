// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Arena-backed program tree.
//!
//! Layout of the parts the semantic passes care about:
//!
//! ```text
//!              Module
//!             /      \
//!        Prolog      <body>
//!        /    \
//!     <ns>   FunDecls ── FunDecls ── Nil
//!              |            |
//!           FunDecl      FunDecl
//!           /     \
//!      Params     <body>
//!       /   \
//!    Param  Params ── Nil
//!
//!      FunRef            Apply (after resolution)
//!        |                 |
//!      Args ── Args ── Nil
//!       |       |
//!     <arg>   <arg>
//! ```
//!
//! Chains (`Params`, `Args`, `FunDecls`) keep the element in slot 0 and the
//! rest of the chain in slot 1, terminated by a `Nil` node.

use crate::{FunctionId, NodeId, QualifiedName, Span};

/// Fixed number of child slots per node.
pub const MAX_CHILDREN: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Eq,
    Lt,
    Gt,
    And,
    Or,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Int(i64),
    Dbl(f64),
    Str(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// Chain terminator.
    Nil,
    /// Query root: prolog, body.
    Module,
    /// Query prolog: namespace declarations, function declaration chain.
    Prolog,
    /// Function declaration chain link: declaration, rest.
    FunDecls,
    /// Unresolved function declaration: parameter chain, body.
    FunDecl { name: QualifiedName },
    /// Parameter chain link: parameter, rest.
    Params,
    Param { name: QualifiedName },
    /// Unresolved call: argument chain.
    FunRef { name: QualifiedName },
    /// Argument chain link: argument expression, rest.
    Args,
    /// Resolved call. Children are those of the `FunRef` it replaced.
    Apply { fun: FunctionId },
    /// Resolved declaration. Children are those of the `FunDecl` it replaced.
    Fun { fun: FunctionId },
    Var { name: QualifiedName },
    Lit(Literal),
    Binary(BinOp),
    /// Sequence construction `(a, b)`.
    Seq,
    /// `if (c) then a else b`.
    If,
    /// `let $var := bound return body`.
    Let { var: QualifiedName },
}

impl NodeKind {
    /// Short tag used in diagnostics.
    pub fn tag(&self) -> &'static str {
        match self {
            NodeKind::Nil => "nil",
            NodeKind::Module => "module",
            NodeKind::Prolog => "prolog",
            NodeKind::FunDecls => "fun_decls",
            NodeKind::FunDecl { .. } => "fun_decl",
            NodeKind::Params => "params",
            NodeKind::Param { .. } => "param",
            NodeKind::FunRef { .. } => "fun_ref",
            NodeKind::Args => "args",
            NodeKind::Apply { .. } => "apply",
            NodeKind::Fun { .. } => "fun",
            NodeKind::Var { .. } => "var",
            NodeKind::Lit(_) => "lit",
            NodeKind::Binary(_) => "binary",
            NodeKind::Seq => "seq",
            NodeKind::If => "if",
            NodeKind::Let { .. } => "let",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Node {
    pub kind: NodeKind,
    pub children: [Option<NodeId>; MAX_CHILDREN],
    pub span: Span,
}

impl Node {
    pub fn child(&self, slot: usize) -> Option<NodeId> {
        self.children.get(slot).copied().flatten()
    }

    /// Children in slot order, stopping at the first empty slot.
    pub fn children(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.children.iter().map_while(|c| *c)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ProgramTree {
    nodes: Vec<Node>,
    root: Option<NodeId>,
}

impl ProgramTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a node. `children` are placed into the leading slots.
    pub fn push(&mut self, kind: NodeKind, children: &[NodeId], span: Span) -> NodeId {
        assert!(
            children.len() <= MAX_CHILDREN,
            "node `{}` given {} children (max {})",
            kind.tag(),
            children.len(),
            MAX_CHILDREN
        );
        let mut slots = [None; MAX_CHILDREN];
        for (slot, child) in slots.iter_mut().zip(children) {
            *slot = Some(*child);
        }
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node { kind, children: slots, span });
        id
    }

    pub fn set_root(&mut self, root: NodeId) {
        self.root = Some(root);
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0 as usize)
    }

    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self[id].kind
    }

    /// Replace the kind stored at `id`, returning the previous kind.
    /// Children and span are kept.
    pub fn replace_kind(&mut self, id: NodeId, kind: NodeKind) -> NodeKind {
        std::mem::replace(&mut self.nodes[id.0 as usize].kind, kind)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeId(i as u32), n))
    }

    /// Post-order walk from `start`: all children (slot order, up to the
    /// first empty slot) before the node itself.
    pub fn post_order(&self, start: NodeId) -> PostOrder<'_> {
        PostOrder { tree: self, stack: vec![(start, 0)] }
    }
}

impl std::ops::Index<NodeId> for ProgramTree {
    type Output = Node;

    fn index(&self, id: NodeId) -> &Node {
        &self.nodes[id.0 as usize]
    }
}

/// Iterator returned by [`ProgramTree::post_order`]. Uses an explicit stack,
/// so deep chains do not grow the native stack.
pub struct PostOrder<'a> {
    tree: &'a ProgramTree,
    stack: Vec<(NodeId, usize)>,
}

impl Iterator for PostOrder<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        loop {
            let (id, next_slot) = self.stack.last_mut()?;
            let id = *id;
            match self.tree[id].child(*next_slot) {
                Some(child) => {
                    *next_slot += 1;
                    self.stack.push((child, 0));
                }
                None => {
                    self.stack.pop();
                    return Some(id);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lit(tree: &mut ProgramTree, v: i64) -> NodeId {
        tree.push(NodeKind::Lit(Literal::Int(v)), &[], Span::DUMMY)
    }

    #[test]
    fn post_order_visits_children_first() {
        let mut tree = ProgramTree::new();
        let a = lit(&mut tree, 1);
        let b = lit(&mut tree, 2);
        let add = tree.push(NodeKind::Binary(BinOp::Add), &[a, b], Span::DUMMY);
        let c = lit(&mut tree, 3);
        let seq = tree.push(NodeKind::Seq, &[add, c], Span::DUMMY);

        let order: Vec<NodeId> = tree.post_order(seq).collect();
        assert_eq!(order, vec![a, b, add, c, seq]);
    }

    #[test]
    fn post_order_stops_at_first_empty_slot() {
        let mut tree = ProgramTree::new();
        let a = lit(&mut tree, 1);
        let b = lit(&mut tree, 2);
        let node = tree.push(NodeKind::Seq, &[a], Span::DUMMY);
        // A child after a hole is not reachable.
        tree.nodes[node.0 as usize].children[2] = Some(b);
        let order: Vec<NodeId> = tree.post_order(node).collect();
        assert_eq!(order, vec![a, node]);
    }

    #[test]
    fn deep_chain_does_not_overflow() {
        let mut tree = ProgramTree::new();
        let mut rest = tree.push(NodeKind::Nil, &[], Span::DUMMY);
        for i in 0..200_000 {
            let arg = lit(&mut tree, i);
            rest = tree.push(NodeKind::Args, &[arg, rest], Span::DUMMY);
        }
        assert_eq!(tree.post_order(rest).count(), tree.len());
    }

    #[test]
    fn replace_kind_keeps_children() {
        let mut tree = ProgramTree::new();
        let nil = tree.push(NodeKind::Nil, &[], Span::DUMMY);
        let call = tree.push(
            NodeKind::FunRef { name: QualifiedName::unqualified("f") },
            &[nil],
            Span::new(3, 7),
        );
        let old = tree.replace_kind(call, NodeKind::Apply { fun: FunctionId(0) });
        assert_eq!(old.tag(), "fun_ref");
        assert_eq!(tree[call].child(0), Some(nil));
        assert_eq!(tree[call].span, Span::new(3, 7));
        assert!(matches!(tree.kind(call), NodeKind::Apply { .. }));
    }
}
