// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Function descriptors and the function environment.

use std::fmt;

use indexmap::IndexMap;
use xqc_ast::{FunctionId, QualifiedName, Span, Ty};

use crate::error::FunctionError;

/// Everything the compiler knows about one callable function.
///
/// Immutable once built. The environment owns descriptors; the tree refers
/// to them through `FunctionId`.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDescriptor {
    pub name: QualifiedName,
    pub arity: usize,
    pub is_builtin: bool,
    /// Formal parameter types, when known. Length equals `arity`.
    pub param_tys: Option<Vec<Ty>>,
    pub ret_ty: Ty,
}

impl FunctionDescriptor {
    /// `param_tys`, if given, must have exactly `arity` entries.
    pub fn new(
        name: QualifiedName,
        arity: usize,
        is_builtin: bool,
        param_tys: Option<&[Ty]>,
        ret_ty: Option<&Ty>,
    ) -> Self {
        debug_assert!(
            param_tys.map_or(true, |tys| tys.len() == arity),
            "descriptor for `{}` has {} parameter types but arity {}",
            name,
            param_tys.map_or(0, |tys| tys.len()),
            arity
        );
        Self {
            name,
            arity,
            is_builtin,
            param_tys: param_tys.filter(|tys| !tys.is_empty()).map(<[Ty]>::to_vec),
            ret_ty: ret_ty.cloned().unwrap_or(Ty::Untyped),
        }
    }

    /// A user-defined function: only name and arity are known.
    pub fn user(name: QualifiedName, arity: usize) -> Self {
        Self::new(name, arity, false, None, None)
    }

    pub fn builtin(name: QualifiedName, param_tys: &[Ty], ret_ty: Ty) -> Self {
        Self::new(name, param_tys.len(), true, Some(param_tys), Some(&ret_ty))
    }
}

/// Map from qualified name to the overload list registered under it.
///
/// Written during declaration collection, read during call resolution, and
/// cleared between independent compilations.
#[derive(Debug, Default)]
pub struct FunctionEnvironment {
    descriptors: Vec<FunctionDescriptor>,
    bindings: IndexMap<QualifiedName, Vec<FunctionId>>,
}

impl FunctionEnvironment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a user-defined function. Fails if `name` is bound already,
    /// whether to a user function or a builtin.
    pub fn register(&mut self, name: QualifiedName, arity: usize) -> Result<FunctionId, FunctionError> {
        if self.bindings.contains_key(&name) {
            return Err(FunctionError::duplicate(name, Span::DUMMY));
        }
        let id = self.insert(FunctionDescriptor::user(name.clone(), arity));
        self.bindings.insert(name, vec![id]);
        Ok(id)
    }

    /// Register a builtin. Builtins sharing a name form an overload list;
    /// a builtin may not shadow a user function.
    pub fn register_builtin(&mut self, descriptor: FunctionDescriptor) -> Result<FunctionId, FunctionError> {
        debug_assert!(descriptor.is_builtin);
        if let Some(existing) = self.bindings.get(&descriptor.name) {
            if existing.iter().any(|&id| !self[id].is_builtin) {
                return Err(FunctionError::duplicate(descriptor.name, Span::DUMMY));
            }
        }
        let name = descriptor.name.clone();
        let id = self.insert(descriptor);
        self.bindings.entry(name).or_default().push(id);
        Ok(id)
    }

    fn insert(&mut self, descriptor: FunctionDescriptor) -> FunctionId {
        let id = FunctionId(self.descriptors.len() as u32);
        self.descriptors.push(descriptor);
        id
    }

    /// Overload list bound to `name`, in registration order.
    pub fn lookup(&self, name: &QualifiedName) -> Option<&[FunctionId]> {
        self.bindings.get(name).map(Vec::as_slice)
    }

    /// The descriptor calls to `name` bind to: the first one registered.
    pub fn first(&self, name: &QualifiedName) -> Option<FunctionId> {
        self.lookup(name).and_then(|ids| ids.first().copied())
    }

    pub fn get(&self, id: FunctionId) -> Option<&FunctionDescriptor> {
        self.descriptors.get(id.0 as usize)
    }

    /// Number of distinct names bound.
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Names and overload lists in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (&QualifiedName, &[FunctionId])> {
        self.bindings.iter().map(|(name, ids)| (name, ids.as_slice()))
    }

    pub fn clear(&mut self) {
        self.descriptors.clear();
        self.bindings.clear();
    }
}

impl std::ops::Index<FunctionId> for FunctionEnvironment {
    type Output = FunctionDescriptor;

    fn index(&self, id: FunctionId) -> &FunctionDescriptor {
        &self.descriptors[id.0 as usize]
    }
}

impl fmt::Display for FunctionEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, ids) in self.iter() {
            let Some(&id) = ids.first() else { continue };
            let fun = &self[id];
            writeln!(f, "function name: {}", name)?;
            if fun.is_builtin {
                writeln!(f, "\treturn type  : {}", fun.ret_ty)?;
                for (i, ty) in fun.param_tys.iter().flatten().enumerate() {
                    writeln!(f, "\t{:2}. parameter: {}", i + 1, ty)?;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FunctionErrorKind;

    fn qn(s: &str) -> QualifiedName {
        QualifiedName::parse(s)
    }

    #[test]
    fn register_and_lookup() {
        let mut env = FunctionEnvironment::new();
        let id = env.register(qn("local:f"), 2).unwrap();
        assert_eq!(env.lookup(&qn("local:f")), Some(&[id][..]));
        let fun = &env[id];
        assert_eq!(fun.arity, 2);
        assert!(!fun.is_builtin);
        assert_eq!(fun.param_tys, None);
        assert_eq!(fun.ret_ty, Ty::Untyped);
        assert!(env.lookup(&qn("local:g")).is_none());
    }

    #[test]
    fn duplicate_registration_fails_on_second_call() {
        let mut env = FunctionEnvironment::new();
        env.register(qn("local:f"), 1).unwrap();
        let err = env.register(qn("local:f"), 3).unwrap_err();
        assert!(matches!(err.kind, FunctionErrorKind::DuplicateDefinition { ref name } if *name == qn("local:f")));
        // The first binding survives untouched.
        let id = env.first(&qn("local:f")).unwrap();
        assert_eq!(env[id].arity, 1);
        assert_eq!(env.lookup(&qn("local:f")).unwrap().len(), 1);
    }

    #[test]
    fn user_function_cannot_shadow_builtin() {
        let mut env = FunctionEnvironment::new();
        env.register_builtin(FunctionDescriptor::builtin(qn("fn:count"), &[Ty::Item.star()], Ty::atomic("xs:integer")))
            .unwrap();
        let err = env.register(qn("fn:count"), 1).unwrap_err();
        assert!(!err.is_fatal());
        assert!(matches!(err.kind, FunctionErrorKind::DuplicateDefinition { .. }));
    }

    #[test]
    fn builtins_form_overload_list_and_first_wins() {
        let mut env = FunctionEnvironment::new();
        let one = env
            .register_builtin(FunctionDescriptor::builtin(qn("fn:substring"), &[Ty::Item, Ty::Item], Ty::Item))
            .unwrap();
        let two = env
            .register_builtin(FunctionDescriptor::builtin(
                qn("fn:substring"),
                &[Ty::Item, Ty::Item, Ty::Item],
                Ty::Item,
            ))
            .unwrap();
        assert_eq!(env.lookup(&qn("fn:substring")), Some(&[one, two][..]));
        assert_eq!(env.first(&qn("fn:substring")), Some(one));
        assert_eq!(env.len(), 1);
    }

    #[test]
    fn descriptor_copies_parameter_types() {
        let tys = vec![Ty::atomic("xs:integer"), Ty::Node.opt()];
        let d = FunctionDescriptor::new(qn("fn:f"), 2, true, Some(&tys), None);
        assert_eq!(d.param_tys.as_deref(), Some(&tys[..]));
        assert_eq!(d.ret_ty, Ty::Untyped);
    }

    #[test]
    fn clear_resets_environment() {
        let mut env = FunctionEnvironment::new();
        env.register(qn("local:f"), 0).unwrap();
        env.clear();
        assert!(env.is_empty());
        assert!(env.lookup(&qn("local:f")).is_none());
        // Reusable after clearing.
        env.register(qn("local:f"), 0).unwrap();
    }

    #[test]
    fn display_lists_functions_in_registration_order() {
        let mut env = FunctionEnvironment::new();
        env.register(qn("local:b"), 0).unwrap();
        env.register_builtin(FunctionDescriptor::builtin(
            qn("fn:string-length"),
            &[Ty::atomic("xs:string").opt()],
            Ty::atomic("xs:integer"),
        ))
        .unwrap();
        let dump = env.to_string();
        assert_eq!(
            dump,
            "function name: local:b\n\
             function name: fn:string-length\n\
             \treturn type  : xs:integer\n\
             \t 1. parameter: xs:string?\n"
        );
    }
}
