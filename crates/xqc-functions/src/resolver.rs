// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Pass 2: bind call sites and declarations to function descriptors.

use xqc_ast::{NodeId, NodeKind, ProgramTree};

use crate::collect::chain_len;
use crate::env::FunctionEnvironment;
use crate::error::FunctionError;

/// Rewrites `FunRef` nodes into `Apply` and `FunDecl` nodes into `Fun`.
///
/// Runs after `DeclarationCollector`; the environment is only read here.
pub struct CallResolver<'a> {
    env: &'a FunctionEnvironment,
    applied: usize,
}

impl<'a> CallResolver<'a> {
    pub fn new(env: &'a FunctionEnvironment) -> Self {
        Self { env, applied: 0 }
    }

    /// Number of call sites rewritten so far.
    pub fn applied(&self) -> usize {
        self.applied
    }

    /// Resolve every node reachable from `root`, children before parents.
    /// Stops at the first error.
    pub fn resolve(&mut self, tree: &mut ProgramTree, root: NodeId) -> Result<(), FunctionError> {
        // Rewrites only touch node kinds, never child slots, so the visit
        // order can be fixed up front.
        let order: Vec<NodeId> = tree.post_order(root).collect();
        for id in order {
            self.resolve_node(tree, id)?;
        }
        Ok(())
    }

    fn resolve_node(&mut self, tree: &mut ProgramTree, id: NodeId) -> Result<(), FunctionError> {
        let node = &tree[id];
        let span = node.span;
        let resolved = match &node.kind {
            NodeKind::FunRef { name } => {
                let Some(fun) = self.env.first(name) else {
                    return Err(FunctionError::unbound(name.clone(), span));
                };
                let args = node
                    .child(0)
                    .ok_or_else(|| FunctionError::malformed("nil/args", "none", span))?;
                let got = actual_args(tree, args)?;
                let expected = self.env[fun].arity;
                if got != expected {
                    return Err(FunctionError::arity_mismatch(
                        self.env[fun].name.clone(),
                        expected,
                        got,
                        span,
                    ));
                }
                tracing::trace!("call to {name} bound to {fun:?}");
                self.applied += 1;
                NodeKind::Apply { fun }
            }
            NodeKind::FunDecl { name } => {
                let Some(fun) = self.env.first(name) else {
                    return Err(FunctionError::unregistered(name.clone(), span));
                };
                NodeKind::Fun { fun }
            }
            _ => return Ok(()),
        };
        tree.replace_kind(id, resolved);
        Ok(())
    }
}

fn actual_args(tree: &ProgramTree, args: NodeId) -> Result<usize, FunctionError> {
    chain_len(tree, args, |k| matches!(k, NodeKind::Args), "nil/args")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FunctionErrorKind;
    use xqc_ast::{BinOp, QualifiedName, Span, TreeBuilder};

    fn qn(s: &str) -> QualifiedName {
        QualifiedName::parse(s)
    }

    fn env_with(fns: &[(&str, usize)]) -> FunctionEnvironment {
        let mut env = FunctionEnvironment::new();
        for (name, arity) in fns {
            env.register(qn(name), *arity).unwrap();
        }
        env
    }

    #[test]
    fn matching_call_becomes_apply() {
        let env = env_with(&[("local:foo", 2)]);
        let mut b = TreeBuilder::new();
        let one = b.int(1);
        let two = b.int(2);
        let call = b.call("local:foo", &[one, two]);
        let mut tree = b.finish();
        let args_before = tree[call].child(0).unwrap();

        let mut resolver = CallResolver::new(&env);
        resolver.resolve(&mut tree, call).unwrap();

        let fun = env.first(&qn("local:foo")).unwrap();
        assert_eq!(tree.kind(call), &NodeKind::Apply { fun });
        assert_eq!(tree[call].child(0), Some(args_before));
        assert_eq!(tree[args_before].child(0), Some(one));
        assert_eq!(tree.kind(one), &NodeKind::Lit(xqc_ast::Literal::Int(1)));
        assert_eq!(resolver.applied(), 1);
    }

    #[test]
    fn undeclared_call_is_unbound() {
        let env = FunctionEnvironment::new();
        let mut b = TreeBuilder::new();
        b.at(Span::new(5, 8));
        let call = b.call("f", &[]);
        let mut tree = b.finish();

        let err = CallResolver::new(&env).resolve(&mut tree, call).unwrap_err();
        match &err.kind {
            FunctionErrorKind::UnboundFunction { name } => assert_eq!(*name, qn("f")),
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(err.span, Span::new(5, 8));
        assert!(!err.is_fatal());
        assert!(matches!(tree.kind(call), NodeKind::FunRef { .. }));
    }

    #[test]
    fn too_few_arguments() {
        let env = env_with(&[("local:foo", 2)]);
        let mut b = TreeBuilder::new();
        let one = b.int(1);
        let call = b.call("local:foo", &[one]);
        let mut tree = b.finish();

        let err = CallResolver::new(&env).resolve(&mut tree, call).unwrap_err();
        assert!(matches!(
            err.kind,
            FunctionErrorKind::ArityMismatch { expected: 2, got: 1, .. }
        ));
    }

    #[test]
    fn too_many_arguments() {
        let env = env_with(&[("local:foo", 2)]);
        let mut b = TreeBuilder::new();
        let args: Vec<NodeId> = (1..=3).map(|v| b.int(v)).collect();
        let call = b.call("local:foo", &args);
        let mut tree = b.finish();

        let err = CallResolver::new(&env).resolve(&mut tree, call).unwrap_err();
        assert!(matches!(
            err.kind,
            FunctionErrorKind::ArityMismatch { expected: 2, got: 3, .. }
        ));
        assert_eq!(
            err.to_string(),
            "wrong number of arguments for function `local:foo` (expected 2, got 3)"
        );
    }

    #[test]
    fn nested_calls_resolve_inner_first() {
        let env = env_with(&[("local:f", 1), ("local:g", 0)]);
        let mut b = TreeBuilder::new();
        let inner = b.call("local:g", &[]);
        let outer = b.call("local:f", &[inner]);
        let one = b.int(1);
        let sum = b.binary(BinOp::Add, outer, one);
        let mut tree = b.finish();

        let mut resolver = CallResolver::new(&env);
        resolver.resolve(&mut tree, sum).unwrap();
        assert!(matches!(tree.kind(inner), NodeKind::Apply { .. }));
        assert!(matches!(tree.kind(outer), NodeKind::Apply { .. }));
        assert_eq!(tree.kind(sum), &NodeKind::Binary(BinOp::Add));
        assert_eq!(resolver.applied(), 2);
    }

    #[test]
    fn calls_inside_conditionals_and_lets_resolve() {
        // let $x := local:g() return if ($x) then local:f($x) else 0
        let env = env_with(&[("local:f", 1), ("local:g", 0)]);
        let mut b = TreeBuilder::new();
        let bound = b.call("local:g", &[]);
        let cond = b.var("x");
        let x = b.var("x");
        let then = b.call("local:f", &[x]);
        let zero = b.int(0);
        let branch = b.if_(cond, then, zero);
        let body = b.let_("x", bound, branch);
        let mut tree = b.finish();

        let mut resolver = CallResolver::new(&env);
        resolver.resolve(&mut tree, body).unwrap();
        assert!(matches!(tree.kind(bound), NodeKind::Apply { .. }));
        assert!(matches!(tree.kind(then), NodeKind::Apply { .. }));
        assert_eq!(tree.kind(branch), &NodeKind::If);
        assert_eq!(tree[branch].child(2), Some(zero));
        assert_eq!(resolver.applied(), 2);
    }

    #[test]
    fn bad_inner_call_aborts_before_outer() {
        let env = env_with(&[("local:f", 1)]);
        let mut b = TreeBuilder::new();
        let inner = b.call("local:missing", &[]);
        let outer = b.call("local:f", &[inner]);
        let mut tree = b.finish();

        let err = CallResolver::new(&env).resolve(&mut tree, outer).unwrap_err();
        assert!(matches!(err.kind, FunctionErrorKind::UnboundFunction { .. }));
        assert!(matches!(tree.kind(outer), NodeKind::FunRef { .. }));
    }

    #[test]
    fn declaration_becomes_fun() {
        let env = env_with(&[("local:f", 1)]);
        let mut b = TreeBuilder::new();
        let body = b.var("x");
        let decl = b.fun_decl("local:f", &["x"], body);
        let mut tree = b.finish();

        CallResolver::new(&env).resolve(&mut tree, decl).unwrap();
        let fun = env.first(&qn("local:f")).unwrap();
        assert_eq!(tree.kind(decl), &NodeKind::Fun { fun });
    }

    #[test]
    fn unregistered_declaration_is_fatal() {
        let env = FunctionEnvironment::new();
        let mut b = TreeBuilder::new();
        let body = b.int(0);
        let decl = b.fun_decl("local:f", &[], body);
        let mut tree = b.finish();

        let err = CallResolver::new(&env).resolve(&mut tree, decl).unwrap_err();
        assert!(err.is_fatal());
        assert!(matches!(err.kind, FunctionErrorKind::UnregisteredDeclaration { .. }));
    }

    #[test]
    fn malformed_argument_chain_is_fatal() {
        let env = env_with(&[("local:f", 1)]);
        let mut b = TreeBuilder::new();
        let bogus = b.int(1);
        let call = b.node(NodeKind::FunRef { name: qn("local:f") }, &[bogus]);
        let mut tree = b.finish();

        let err = CallResolver::new(&env).resolve(&mut tree, call).unwrap_err();
        assert!(err.is_fatal());
        assert!(matches!(
            err.kind,
            FunctionErrorKind::MalformedTree { expected: "nil/args", found: "lit" }
        ));
    }
}
