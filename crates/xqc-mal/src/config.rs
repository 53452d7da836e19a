// SPDX-License-Identifier: (MIT OR Apache-2.0)

/// Knobs for the optimizer passes in `transform`.
#[derive(Debug, Clone)]
pub struct OptimizerConfig {
    /// 128-bit integer columns are available. When false the downscale
    /// rewrite is skipped entirely.
    pub wide_integers: bool,
    /// Upper bound on pass repetitions in `transform::optimize`.
    pub max_rounds: usize,
    /// Largest block, in variables, a pass may allocate scratch tables
    /// for. Bigger blocks are left unoptimized.
    pub max_tracked_vars: usize,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            wide_integers: cfg!(feature = "hge"),
            max_rounds: 8,
            max_tracked_vars: usize::MAX,
        }
    }
}
