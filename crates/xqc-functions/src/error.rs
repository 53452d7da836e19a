// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Function resolution error types.

use thiserror::Error;
use xqc_ast::{QualifiedName, Span};

/// An error raised while collecting declarations or resolving calls.
#[derive(Debug, Clone, Error)]
#[error("{kind}")]
pub struct FunctionError {
    pub kind: FunctionErrorKind,
    pub span: Span,
}

impl FunctionError {
    pub fn unbound(name: QualifiedName, span: Span) -> Self {
        Self {
            kind: FunctionErrorKind::UnboundFunction { name },
            span,
        }
    }

    pub fn arity_mismatch(name: QualifiedName, expected: usize, got: usize, span: Span) -> Self {
        Self {
            kind: FunctionErrorKind::ArityMismatch { name, expected, got },
            span,
        }
    }

    pub fn duplicate(name: QualifiedName, span: Span) -> Self {
        Self {
            kind: FunctionErrorKind::DuplicateDefinition { name },
            span,
        }
    }

    pub fn malformed(expected: &'static str, found: &'static str, span: Span) -> Self {
        Self {
            kind: FunctionErrorKind::MalformedTree { expected, found },
            span,
        }
    }

    pub fn unregistered(name: QualifiedName, span: Span) -> Self {
        Self {
            kind: FunctionErrorKind::UnregisteredDeclaration { name },
            span,
        }
    }

    /// Re-anchor an error raised without source context.
    pub fn at(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    /// Fatal errors mean an earlier phase produced a broken tree.
    pub fn is_fatal(&self) -> bool {
        self.kind.is_fatal()
    }
}

#[derive(Debug, Clone, Error)]
pub enum FunctionErrorKind {
    #[error("reference to undefined function `{name}`")]
    UnboundFunction { name: QualifiedName },

    #[error("wrong number of arguments for function `{name}` (expected {expected}, got {got})")]
    ArityMismatch { name: QualifiedName, expected: usize, got: usize },

    #[error("function `{name}` is already defined")]
    DuplicateDefinition { name: QualifiedName },

    #[error("internal error: illegal node kind `{found}` (expecting {expected})")]
    MalformedTree { expected: &'static str, found: &'static str },

    #[error("internal error: reference to undefined function `{name}`")]
    UnregisteredDeclaration { name: QualifiedName },
}

impl FunctionErrorKind {
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            FunctionErrorKind::MalformedTree { .. } | FunctionErrorKind::UnregisteredDeclaration { .. }
        )
    }
}
