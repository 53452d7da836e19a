// SPDX-License-Identifier: (MIT OR Apache-2.0)

//! Coercion elimination: drop no-op conversions and avoid needless
//! 128-bit arithmetic.
//!
//! One forward scan over the block applies two rewrites:
//!
//! - **Dead conversion.** `a := calc.<t>(b)` where `b` already has type `t`
//!   and so does `a`. The instruction is removed and every later argument
//!   use of `a` reads `b` instead. The scan then looks at the same position
//!   again, so a chain of such conversions collapses in one pass.
//! - **Downscale.** After `w := batcalc.hge(s, x, digits, scale)` widens a
//!   narrower column `x`, an `r := batcalc.<op>(w, y)` with `op` one of
//!   `+ - * / %` and `r` also of `hge` elements reads `x` instead of `w`.
//!   The widening instruction stays; a later dead-code pass drops it.
//!
//! Instructions of any other shape are left alone.

use crate::transform::OptimizerError;
use crate::{names, MalBlock, OptimizerConfig, ScalarType, VarId};

/// A widening seen earlier in the scan, keyed by its result variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoercionRecord {
    /// Position of the widening instruction when it was recorded.
    pub position: usize,
    /// The pre-widening operand.
    pub source: VarId,
    pub from: ScalarType,
    pub to: ScalarType,
    pub digits: i64,
    pub scale: i64,
}

/// Per-variable scratch table for one run of the pass.
#[derive(Debug)]
pub struct CoercionTracker {
    records: Vec<Option<CoercionRecord>>,
}

impl CoercionTracker {
    /// Table with one empty slot per variable. Fails instead of aborting
    /// when the allocation cannot be made.
    pub fn new(vars: usize) -> Result<Self, OptimizerError> {
        Self::with_limit(vars, usize::MAX)
    }

    /// Like `new`, but also fails when `vars` exceeds `limit`.
    pub fn with_limit(vars: usize, limit: usize) -> Result<Self, OptimizerError> {
        if vars > limit {
            return Err(OptimizerError::TrackerAllocation { vars });
        }
        let mut records = Vec::new();
        records
            .try_reserve_exact(vars)
            .map_err(|_| OptimizerError::TrackerAllocation { vars })?;
        records.resize(vars, None);
        Ok(Self { records })
    }

    pub fn record(&mut self, var: VarId, record: CoercionRecord) {
        if let Some(slot) = self.records.get_mut(var.0 as usize) {
            *slot = Some(record);
        }
    }

    pub fn get(&self, var: VarId) -> Option<&CoercionRecord> {
        self.records.get(var.0 as usize).and_then(Option::as_ref)
    }

    /// Number of variables with a pending record.
    pub fn pending(&self) -> usize {
        self.records.iter().filter(|r| r.is_some()).count()
    }
}

/// Run the pass once over `block`. Returns the number of actions taken:
/// one per removed conversion, one per redirected operand.
///
/// If the tracker cannot be allocated the block is not touched.
pub fn eliminate_coercions(block: &mut MalBlock, config: &OptimizerConfig) -> Result<usize, OptimizerError> {
    let mut tracker = CoercionTracker::with_limit(block.var_count(), config.max_tracked_vars)?;
    let mut actions = 0;
    let mut pos = 0;

    while pos < block.len() {
        if block.instrs[pos].module().is_none() {
            pos += 1;
            continue;
        }

        if config.wide_integers {
            if let Some((widened, record)) = widening(block, pos) {
                tracker.record(widened, record);
            }
        }

        actions += downscale(block, pos, &tracker);

        if remove_dead_coercion(block, pos) {
            actions += 1;
            // Reprocess: the next instruction has moved into `pos`.
            continue;
        }
        pos += 1;
    }

    tracing::trace!("coercion pass: {actions} actions, {} widenings tracked", tracker.pending());
    Ok(actions)
}

/// `w := batcalc.hge(s, x, digits, scale)` with constant digits and scale.
fn widening(block: &MalBlock, pos: usize) -> Option<(VarId, CoercionRecord)> {
    let p = &block.instrs[pos];
    if !p.is(names::BATCALC, names::HGE) || p.retc != 1 || p.argc() != 5 {
        return None;
    }
    let digits = block.constant(p.arg(3))?.as_int()?;
    let scale = block.constant(p.arg(4))?.as_int()?;
    let source = p.arg(2);
    Some((
        p.arg(0),
        CoercionRecord {
            position: pos,
            source,
            from: block.var_type(source).column_type(),
            to: ScalarType::Hge,
            digits,
            scale,
        },
    ))
}

fn is_arithmetic(function: Option<&str>) -> bool {
    function.map_or(false, |f| names::ARITHMETIC.contains(&f))
}

/// Redirect widened operands of `r := batcalc.<op>(a, b)` to their
/// pre-widening sources. Returns the number of operands redirected.
fn downscale(block: &mut MalBlock, pos: usize, tracker: &CoercionTracker) -> usize {
    let p = &block.instrs[pos];
    if p.module() != Some(names::BATCALC) || !is_arithmetic(p.function()) {
        return 0;
    }
    if p.retc != 1 || p.argc() != 3 {
        return 0;
    }

    let result = block.var_type(p.arg(0)).column_type();
    let mut redirects: [Option<VarId>; 2] = [None, None];
    for (slot, k) in redirects.iter_mut().zip(1..=2) {
        let operand = p.arg(k);
        if block.var_type(operand).column_type() != result {
            continue;
        }
        if let Some(record) = tracker.get(operand) {
            if record.from.is_narrower_than(result) {
                *slot = Some(record.source);
            }
        }
    }

    let mut changed = 0;
    for (k, source) in (1..=2).zip(redirects) {
        if let Some(source) = source {
            block.instrs[pos].set_arg(k, source);
            changed += 1;
        }
    }
    if changed > 0 {
        tracing::debug!("downscaled: {}", block.display_instr(&block.instrs[pos]));
    }
    changed
}

/// Remove `a := calc.<t>(b)` when both sides already have type `t`, and
/// rewrite later argument uses of `a` to `b`.
fn remove_dead_coercion(block: &mut MalBlock, pos: usize) -> bool {
    let p = &block.instrs[pos];
    if p.module() != Some(names::CALC) || p.retc != 1 || p.argc() != 2 {
        return false;
    }
    let (dst, src) = (p.arg(0), p.arg(1));
    let ty = block.var_type(src);
    if block.var_type(dst) != ty || p.function() != Some(ty.atom_name()) {
        return false;
    }

    let removed = block.remove_instruction(pos);
    tracing::debug!("removed dead coercion: {}", block.display_instr(&removed));
    for instr in &mut block.instrs[pos..] {
        instr.replace_uses(dst, src);
    }
    true
}
