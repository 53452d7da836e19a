// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Pass 1: register every declared function with its arity.

use xqc_ast::{NodeId, NodeKind, ProgramTree};

use crate::env::FunctionEnvironment;
use crate::error::FunctionError;

/// Length of a nil-terminated chain of `link` nodes starting at `head`.
///
/// Any node that is neither `Nil` nor the expected link kind means the tree
/// is malformed.
pub(crate) fn chain_len(
    tree: &ProgramTree,
    head: NodeId,
    is_link: fn(&NodeKind) -> bool,
    expected: &'static str,
) -> Result<usize, FunctionError> {
    let mut len = 0;
    let mut cursor = head;
    loop {
        let node = &tree[cursor];
        match &node.kind {
            NodeKind::Nil => return Ok(len),
            kind if is_link(kind) => {
                len += 1;
                cursor = node
                    .child(1)
                    .ok_or_else(|| FunctionError::malformed(expected, "none", node.span))?;
            }
            other => return Err(FunctionError::malformed(expected, other.tag(), node.span)),
        }
    }
}

/// Walks the prolog's declaration chain and fills a `FunctionEnvironment`.
pub struct DeclarationCollector<'a> {
    tree: &'a ProgramTree,
    env: &'a mut FunctionEnvironment,
}

impl<'a> DeclarationCollector<'a> {
    pub fn new(tree: &'a ProgramTree, env: &'a mut FunctionEnvironment) -> Self {
        Self { tree, env }
    }

    /// Register every `FunDecl` in the chain at `decls`. Returns how many
    /// functions were registered.
    pub fn collect(&mut self, decls: NodeId) -> Result<usize, FunctionError> {
        let tree = self.tree;
        let mut count = 0;
        let mut cursor = decls;
        loop {
            let node = &tree[cursor];
            match &node.kind {
                NodeKind::Nil => return Ok(count),
                NodeKind::FunDecls => {
                    let decl = node
                        .child(0)
                        .ok_or_else(|| FunctionError::malformed("fun_decl", "none", node.span))?;
                    self.add_function(decl)?;
                    count += 1;
                    cursor = node
                        .child(1)
                        .ok_or_else(|| FunctionError::malformed("nil/fun_decls", "none", node.span))?;
                }
                other => return Err(FunctionError::malformed("nil/fun_decls", other.tag(), node.span)),
            }
        }
    }

    fn add_function(&mut self, decl: NodeId) -> Result<(), FunctionError> {
        let node = &self.tree[decl];
        let NodeKind::FunDecl { name } = &node.kind else {
            return Err(FunctionError::malformed("fun_decl", node.kind.tag(), node.span));
        };
        let params = node
            .child(0)
            .ok_or_else(|| FunctionError::malformed("nil/params", "none", node.span))?;
        let arity = self.formal_args(params)?;

        self.env
            .register(name.clone(), arity)
            .map_err(|e| e.at(node.span))?;
        tracing::debug!("registered function {name}#{arity}");
        Ok(())
    }

    fn formal_args(&self, params: NodeId) -> Result<usize, FunctionError> {
        chain_len(self.tree, params, |k| matches!(k, NodeKind::Params), "nil/params")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FunctionErrorKind;
    use xqc_ast::{QualifiedName, Span, TreeBuilder};

    fn qn(s: &str) -> QualifiedName {
        QualifiedName::parse(s)
    }

    fn decls_of(tree: &ProgramTree) -> NodeId {
        let root = tree.root().unwrap();
        let prolog = tree[root].child(0).unwrap();
        tree[prolog].child(1).unwrap()
    }

    #[test]
    fn registers_each_declaration_with_its_arity() {
        let mut b = TreeBuilder::new();
        let body0 = b.int(0);
        let f0 = b.fun_decl("local:zero", &[], body0);
        let body2 = b.var("a");
        let f2 = b.fun_decl("local:two", &["a", "b"], body2);
        let body3 = b.var("c");
        let f3 = b.fun_decl("local:three", &["a", "b", "c"], body3);
        let main = b.int(1);
        b.module(&[f0, f2, f3], main);
        let tree = b.finish();

        let mut env = FunctionEnvironment::new();
        let n = DeclarationCollector::new(&tree, &mut env).collect(decls_of(&tree)).unwrap();

        assert_eq!(n, 3);
        assert_eq!(env.len(), 3);
        for (name, arity) in [("local:zero", 0), ("local:two", 2), ("local:three", 3)] {
            let id = env.first(&qn(name)).unwrap();
            assert_eq!(env[id].arity, arity, "arity of {name}");
        }
    }

    #[test]
    fn empty_prolog_registers_nothing() {
        let mut b = TreeBuilder::new();
        let main = b.int(1);
        b.module(&[], main);
        let tree = b.finish();

        let mut env = FunctionEnvironment::new();
        let n = DeclarationCollector::new(&tree, &mut env).collect(decls_of(&tree)).unwrap();
        assert_eq!(n, 0);
        assert!(env.is_empty());
    }

    #[test]
    fn duplicate_declaration_reported_at_second_site() {
        let mut b = TreeBuilder::new();
        b.at(Span::new(0, 10));
        let body = b.int(1);
        let first = b.fun_decl("local:f", &[], body);
        b.at(Span::new(20, 30));
        let body = b.int(2);
        let second = b.fun_decl("local:f", &["x"], body);
        let main = b.int(0);
        b.module(&[first, second], main);
        let tree = b.finish();

        let mut env = FunctionEnvironment::new();
        let err = DeclarationCollector::new(&tree, &mut env).collect(decls_of(&tree)).unwrap_err();
        assert!(matches!(err.kind, FunctionErrorKind::DuplicateDefinition { .. }));
        assert_eq!(err.span, Span::new(20, 30));
        assert!(!err.is_fatal());
    }

    #[test]
    fn stray_node_in_parameter_chain_is_fatal() {
        let mut b = TreeBuilder::new();
        let bogus = b.int(7);
        let body = b.int(1);
        let decl = b.node(NodeKind::FunDecl { name: qn("local:f") }, &[bogus, body]);
        let main = b.int(0);
        b.module(&[decl], main);
        let tree = b.finish();

        let mut env = FunctionEnvironment::new();
        let err = DeclarationCollector::new(&tree, &mut env).collect(decls_of(&tree)).unwrap_err();
        assert!(err.is_fatal());
        assert!(matches!(
            err.kind,
            FunctionErrorKind::MalformedTree { expected: "nil/params", found: "lit" }
        ));
    }

    #[test]
    fn stray_node_in_declaration_chain_is_fatal() {
        let mut b = TreeBuilder::new();
        let bogus = b.var("x");
        let tree = b.finish();

        let mut env = FunctionEnvironment::new();
        let err = DeclarationCollector::new(&tree, &mut env).collect(bogus).unwrap_err();
        assert!(err.is_fatal());
        assert!(env.is_empty());
    }
}
