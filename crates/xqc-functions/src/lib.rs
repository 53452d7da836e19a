// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Function declaration and call resolution.
//!
//! Two passes over the program tree:
//! 1. `DeclarationCollector` registers every function declared in the
//!    prolog, with its arity, in a `FunctionEnvironment`.
//! 2. `CallResolver` rewrites each call site into an `Apply` node bound to
//!    a descriptor, checking that the function exists and the argument
//!    count matches.
//!
//! Lookup is by name only: when several descriptors share a name, calls
//! bind to the first one registered.

mod collect;
mod env;
mod error;
mod resolver;

pub use collect::DeclarationCollector;
pub use env::{FunctionDescriptor, FunctionEnvironment};
pub use error::{FunctionError, FunctionErrorKind};
pub use resolver::CallResolver;

use xqc_ast::{NodeId, NodeKind, ProgramTree};

/// Register the prolog's function declarations, then resolve every call
/// and declaration in the tree.
///
/// `env` may already hold builtins. It is left populated on return so later
/// phases can look descriptors up.
#[tracing::instrument(skip_all)]
pub fn check_functions(tree: &mut ProgramTree, env: &mut FunctionEnvironment) -> Result<(), FunctionError> {
    let root = tree
        .root()
        .ok_or_else(|| FunctionError::malformed("module", "none", xqc_ast::Span::DUMMY))?;
    let decls = prolog_decls(tree, root)?;

    let registered = DeclarationCollector::new(tree, env).collect(decls)?;
    tracing::debug!("collected {registered} function declarations");
    tracing::trace!("function environment:\n{env}");

    let mut resolver = CallResolver::new(env);
    resolver.resolve(tree, root)?;
    tracing::debug!("resolved {} function applications", resolver.applied());
    Ok(())
}

/// Declaration chain hanging off the prolog: `root.child[0].child[1]`.
fn prolog_decls(tree: &ProgramTree, root: NodeId) -> Result<NodeId, FunctionError> {
    let module = &tree[root];
    let prolog = module
        .child(0)
        .ok_or_else(|| FunctionError::malformed("prolog", "none", module.span))?;
    let prolog_node = &tree[prolog];
    if prolog_node.kind != NodeKind::Prolog {
        return Err(FunctionError::malformed("prolog", prolog_node.kind.tag(), prolog_node.span));
    }
    prolog_node
        .child(1)
        .ok_or_else(|| FunctionError::malformed("nil/fun_decls", "none", prolog_node.span))
}

#[cfg(test)]
mod tests {
    use super::*;
    use xqc_ast::{QualifiedName, TreeBuilder};

    #[test]
    fn declarations_in_prolog_are_resolved_with_calls() {
        let mut b = TreeBuilder::new();
        let n = b.var("n");
        let body = b.call("local:g", &[n]);
        let f = b.fun_decl("local:f", &["n"], body);
        let m = b.var("m");
        let g = b.fun_decl("local:g", &["m"], m);
        let arg = b.int(10);
        let main = b.call("local:f", &[arg]);
        b.module(&[f, g], main);
        let mut tree = b.finish();

        let mut env = FunctionEnvironment::new();
        check_functions(&mut tree, &mut env).unwrap();

        // Call to g inside f's body resolves even though g is declared later.
        let g_id = env.first(&QualifiedName::parse("local:g")).unwrap();
        assert_eq!(tree.kind(body), &NodeKind::Apply { fun: g_id });
        assert!(matches!(tree.kind(f), NodeKind::Fun { .. }));
        assert!(matches!(tree.kind(g), NodeKind::Fun { .. }));
        assert!(matches!(tree.kind(main), NodeKind::Apply { .. }));
        assert!(tree.iter().all(|(_, n)| !matches!(n.kind, NodeKind::FunRef { .. } | NodeKind::FunDecl { .. })));
    }

    #[test]
    fn tree_without_prolog_is_fatal() {
        let mut b = TreeBuilder::new();
        let body = b.int(1);
        let not_prolog = b.int(2);
        let root = b.node(NodeKind::Module, &[not_prolog, body]);
        let mut tree = b.finish();
        tree.set_root(root);

        let err = check_functions(&mut tree, &mut FunctionEnvironment::new()).unwrap_err();
        assert!(err.is_fatal());
    }

    #[test]
    fn tree_without_root_is_fatal() {
        let err = check_functions(&mut ProgramTree::new(), &mut FunctionEnvironment::new()).unwrap_err();
        assert!(err.is_fatal());
    }
}
