// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Compiler session: owns the state shared between phases of one
//! compilation and turns phase errors into diagnostics.

use xqc_ast::{FunctionId, ProgramTree};
use xqc_diagnostics::{Diagnostic, ToDiagnostic};
use xqc_functions::{FunctionDescriptor, FunctionEnvironment};
use xqc_mal::{MalBlock, OptimizerConfig};

pub use xqc_diagnostics::Severity;

pub struct Session {
    env: FunctionEnvironment,
    builtins: Vec<FunctionDescriptor>,
    config: OptimizerConfig,
    warnings: Vec<Diagnostic>,
}

impl Session {
    pub fn new(config: OptimizerConfig) -> Self {
        Self {
            env: FunctionEnvironment::new(),
            builtins: Vec::new(),
            config,
            warnings: Vec::new(),
        }
    }

    /// Make a builtin visible to this and every later compilation.
    pub fn register_builtin(&mut self, descriptor: FunctionDescriptor) -> Result<FunctionId, Diagnostic> {
        let id = self
            .env
            .register_builtin(descriptor.clone())
            .map_err(|e| e.to_diagnostic())?;
        self.builtins.push(descriptor);
        Ok(id)
    }

    /// Collect the prolog's declarations and resolve every call in `tree`.
    pub fn check_functions(&mut self, tree: &mut ProgramTree) -> Result<(), Diagnostic> {
        xqc_functions::check_functions(tree, &mut self.env).map_err(|e| {
            let diag = e.to_diagnostic();
            tracing::debug!(kind = %diag.kind, fatal = e.is_fatal(), "function check failed");
            diag
        })
    }

    /// Run the optimizer to a fixpoint. Returns the number of actions.
    ///
    /// An optimizer that had to give up is not an error: the block stays
    /// valid and a warning is queued for `take_warnings`.
    pub fn optimize(&mut self, block: &mut MalBlock) -> usize {
        let summary = xqc_mal::transform::optimize(block, &self.config);
        if let Some(e) = summary.degraded {
            self.warnings.push(e.to_diagnostic());
        }
        summary.actions
    }

    /// Warnings queued since the last call.
    pub fn take_warnings(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.warnings)
    }

    /// Forget user declarations from the previous compilation. Builtins stay.
    pub fn reset(&mut self) {
        self.env.clear();
        self.warnings.clear();
        for descriptor in &self.builtins {
            if let Err(e) = self.env.register_builtin(descriptor.clone()) {
                tracing::warn!("dropping builtin on reset: {e}");
            }
        }
        tracing::trace!("session reset, {} builtins", self.env.len());
    }

    pub fn env(&self) -> &FunctionEnvironment {
        &self.env
    }

    pub fn config(&self) -> &OptimizerConfig {
        &self.config
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(OptimizerConfig::default())
    }
}
