// SPDX-License-Identifier: (MIT OR Apache-2.0)

//! MAL-style linear IR and the optimizer passes that run over it.
//!
//! A `MalBlock` is a flat list of instructions `results := module.function(args)`
//! over typed variables. Codegen produces blocks; passes in `transform`
//! rewrite them in place and report how many changes they made.

mod block;
mod builder;
mod config;
mod display;
mod instr;
mod types;

pub mod transform;

pub use block::{MalBlock, MalConst, MalVar, VarId};
pub use builder::MalBuilder;
pub use config::OptimizerConfig;
pub use instr::{names, Instr};
pub use types::{MalType, ScalarType};
