// SPDX-License-Identifier: (MIT OR Apache-2.0)

//! MAL instructions.

use crate::VarId;

/// Module and function names the optimizer recognizes.
pub mod names {
    /// Scalar arithmetic and conversions.
    pub const CALC: &str = "calc";
    /// Column-at-a-time arithmetic and conversions.
    pub const BATCALC: &str = "batcalc";

    pub const HGE: &str = "hge";

    pub const PLUS: &str = "+";
    pub const MINUS: &str = "-";
    pub const MUL: &str = "*";
    pub const DIV: &str = "/";
    pub const MOD: &str = "%";

    /// Arithmetic operators eligible for downscaling.
    pub const ARITHMETIC: &[&str] = &[PLUS, MINUS, MUL, DIV, MOD];
}

/// `results := module.function(args)`.
///
/// `argv` holds results first, then arguments; `retc` says how many of the
/// leading entries are results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instr {
    pub module: Option<String>,
    pub function: Option<String>,
    pub argv: Vec<VarId>,
    pub retc: usize,
}

impl Instr {
    pub fn new(module: &str, function: &str, results: &[VarId], args: &[VarId]) -> Self {
        Self {
            module: Some(module.to_string()),
            function: Some(function.to_string()),
            argv: results.iter().chain(args).copied().collect(),
            retc: results.len(),
        }
    }

    /// Total operand count, results included.
    pub fn argc(&self) -> usize {
        self.argv.len()
    }

    pub fn arg(&self, k: usize) -> VarId {
        self.argv[k]
    }

    pub fn set_arg(&mut self, k: usize, var: VarId) {
        self.argv[k] = var;
    }

    pub fn results(&self) -> &[VarId] {
        &self.argv[..self.retc]
    }

    pub fn args(&self) -> &[VarId] {
        &self.argv[self.retc..]
    }

    pub fn module(&self) -> Option<&str> {
        self.module.as_deref()
    }

    pub fn function(&self) -> Option<&str> {
        self.function.as_deref()
    }

    pub fn is(&self, module: &str, function: &str) -> bool {
        self.module() == Some(module) && self.function() == Some(function)
    }

    /// Replace argument-position uses of `from` by `to`. Results are left
    /// alone. Returns the number of operands changed.
    pub fn replace_uses(&mut self, from: VarId, to: VarId) -> usize {
        let mut changed = 0;
        for slot in &mut self.argv[self.retc..] {
            if *slot == from {
                *slot = to;
                changed += 1;
            }
        }
        changed
    }
}
