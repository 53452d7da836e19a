// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! TreeBuilder - helper for assembling program trees.
//!
//! Builds the chain shapes the semantic passes expect (see `tree`), so
//! callers never hand-wire `Nil` terminators.

use crate::tree::{BinOp, Literal, NodeKind, ProgramTree};
use crate::{NodeId, QualifiedName, Span};

pub struct TreeBuilder {
    tree: ProgramTree,
    span: Span,
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self { tree: ProgramTree::new(), span: Span::DUMMY }
    }

    /// Span attached to every node created from now on.
    pub fn at(&mut self, span: Span) -> &mut Self {
        self.span = span;
        self
    }

    pub fn node(&mut self, kind: NodeKind, children: &[NodeId]) -> NodeId {
        self.tree.push(kind, children, self.span)
    }

    pub fn nil(&mut self) -> NodeId {
        self.node(NodeKind::Nil, &[])
    }

    /// Build a nil-terminated chain of `link` nodes over `items`.
    pub fn chain(&mut self, link: NodeKind, items: &[NodeId]) -> NodeId {
        let mut rest = self.nil();
        for &item in items.iter().rev() {
            rest = self.node(link.clone(), &[item, rest]);
        }
        rest
    }

    pub fn int(&mut self, value: i64) -> NodeId {
        self.node(NodeKind::Lit(Literal::Int(value)), &[])
    }

    pub fn var(&mut self, name: &str) -> NodeId {
        self.node(NodeKind::Var { name: QualifiedName::parse(name) }, &[])
    }

    pub fn binary(&mut self, op: BinOp, lhs: NodeId, rhs: NodeId) -> NodeId {
        self.node(NodeKind::Binary(op), &[lhs, rhs])
    }

    pub fn if_(&mut self, cond: NodeId, then: NodeId, otherwise: NodeId) -> NodeId {
        self.node(NodeKind::If, &[cond, then, otherwise])
    }

    pub fn let_(&mut self, var: &str, bound: NodeId, body: NodeId) -> NodeId {
        self.node(NodeKind::Let { var: QualifiedName::parse(var) }, &[bound, body])
    }

    /// `name(args...)` as an unresolved call.
    pub fn call(&mut self, name: &str, args: &[NodeId]) -> NodeId {
        let args = self.chain(NodeKind::Args, args);
        self.node(NodeKind::FunRef { name: QualifiedName::parse(name) }, &[args])
    }

    /// `declare function name($params...) { body }`.
    pub fn fun_decl(&mut self, name: &str, params: &[&str], body: NodeId) -> NodeId {
        let params: Vec<NodeId> = params
            .iter()
            .map(|p| self.node(NodeKind::Param { name: QualifiedName::parse(p) }, &[]))
            .collect();
        let params = self.chain(NodeKind::Params, &params);
        self.node(NodeKind::FunDecl { name: QualifiedName::parse(name) }, &[params, body])
    }

    /// Root module with the given function declarations in its prolog.
    pub fn module(&mut self, decls: &[NodeId], body: NodeId) -> NodeId {
        let ns = self.nil();
        let decls = self.chain(NodeKind::FunDecls, decls);
        let prolog = self.node(NodeKind::Prolog, &[ns, decls]);
        let root = self.node(NodeKind::Module, &[prolog, body]);
        self.tree.set_root(root);
        root
    }

    pub fn finish(self) -> ProgramTree {
        self.tree
    }
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}
