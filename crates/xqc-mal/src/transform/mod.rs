// SPDX-License-Identifier: (MIT OR Apache-2.0)

//! Optimizer passes over MAL blocks.
//!
//! Each pass rewrites a block in place and returns the number of actions it
//! took. Zero actions means the block is at a fixpoint for that pass.

pub mod coercion;

pub use coercion::{eliminate_coercions, CoercionRecord, CoercionTracker};

use thiserror::Error;

use crate::{MalBlock, OptimizerConfig};

#[derive(Debug, Clone, Error)]
pub enum OptimizerError {
    /// Scratch space for a pass could not be allocated. The block is
    /// untouched.
    #[error("cannot allocate coercion tracker for {vars} variables")]
    TrackerAllocation { vars: usize },
}

/// Outcome of `optimize`.
#[derive(Debug, Default)]
pub struct OptimizeSummary {
    /// Actions over all rounds.
    pub actions: usize,
    /// Set when a round could not start. Earlier rounds still apply.
    pub degraded: Option<OptimizerError>,
}

/// Run the coercion pass until it stops finding work or `max_rounds` is hit.
///
/// A pass that fails to start ends the loop; the block keeps whatever
/// earlier rounds produced.
#[tracing::instrument(skip_all, fields(block = block.signature.function().unwrap_or("?")))]
pub fn optimize(block: &mut MalBlock, config: &OptimizerConfig) -> OptimizeSummary {
    let mut summary = OptimizeSummary::default();
    for round in 0..config.max_rounds {
        match eliminate_coercions(block, config) {
            Ok(0) => break,
            Ok(actions) => {
                tracing::debug!("round {round}: {actions} coercion actions");
                summary.actions += actions;
            }
            Err(e) => {
                tracing::warn!("coercion pass skipped: {e}");
                summary.degraded = Some(e);
                break;
            }
        }
    }
    summary
}
