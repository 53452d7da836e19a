// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Conversions from phase errors to diagnostics.

use crate::{Diagnostic, ToDiagnostic};
use xqc_functions::{FunctionError, FunctionErrorKind};
use xqc_mal::transform::OptimizerError;

impl ToDiagnostic for FunctionError {
    fn to_diagnostic(&self) -> Diagnostic {
        let message = self.kind.to_string();
        match &self.kind {
            FunctionErrorKind::UnboundFunction { name } => Diagnostic::user_error("unbound-function", message)
                .with_code("XF0001")
                .with_primary(self.span, "not declared")
                .with_help(format!("declare `{name}` in the query prolog")),

            FunctionErrorKind::ArityMismatch { expected, got, .. } => {
                let plural = if *expected == 1 { "" } else { "s" };
                Diagnostic::user_error("arity-mismatch", message)
                    .with_code("XF0002")
                    .with_primary(self.span, format!("called with {got}"))
                    .with_note(format!("the declaration takes {expected} parameter{plural}"))
            }

            FunctionErrorKind::DuplicateDefinition { .. } => Diagnostic::user_error("duplicate-definition", message)
                .with_code("XF0003")
                .with_primary(self.span, "redefined here")
                .with_help("function names must be unique regardless of arity"),

            FunctionErrorKind::MalformedTree { .. } => Diagnostic::fatal("malformed-tree", message)
                .with_code("XF0901")
                .with_primary(self.span, "unexpected node")
                .with_note("this is a compiler bug"),

            FunctionErrorKind::UnregisteredDeclaration { .. } => {
                Diagnostic::fatal("unregistered-declaration", message)
                    .with_code("XF0902")
                    .with_primary(self.span, "declaration missed by collection")
                    .with_note("this is a compiler bug")
            }
        }
    }
}

impl ToDiagnostic for OptimizerError {
    fn to_diagnostic(&self) -> Diagnostic {
        match self {
            OptimizerError::TrackerAllocation { .. } => Diagnostic::warning("tracker-allocation", self.to_string())
                .with_code("XO0001")
                .with_note("the block was left unoptimized"),
        }
    }
}
