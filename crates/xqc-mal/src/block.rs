// SPDX-License-Identifier: (MIT OR Apache-2.0)

//! MAL block: a signature, a variable table and an instruction stream.

use crate::{Instr, MalType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VarId(pub u32);

/// Compile-time constant held by a variable.
#[derive(Debug, Clone, PartialEq)]
pub enum MalConst {
    Int(i64),
    Dbl(f64),
    Bit(bool),
    Str(String),
}

impl MalConst {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            MalConst::Int(v) => Some(*v),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct MalVar {
    pub id: VarId,
    pub name: String,
    pub ty: MalType,
    pub constant: Option<MalConst>,
}

#[derive(Debug, Clone)]
pub struct MalBlock {
    /// `function user.name(...)` header. Not part of the instruction stream.
    pub signature: Instr,
    pub vars: Vec<MalVar>,
    pub instrs: Vec<Instr>,
}

impl MalBlock {
    pub fn var(&self, id: VarId) -> &MalVar {
        &self.vars[id.0 as usize]
    }

    pub fn var_type(&self, id: VarId) -> MalType {
        self.var(id).ty
    }

    pub fn constant(&self, id: VarId) -> Option<&MalConst> {
        self.var(id).constant.as_ref()
    }

    pub fn var_count(&self) -> usize {
        self.vars.len()
    }

    /// Number of instructions in the stream.
    pub fn len(&self) -> usize {
        self.instrs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instrs.is_empty()
    }

    /// Remove the instruction at `pos`; later instructions shift down.
    pub fn remove_instruction(&mut self, pos: usize) -> Instr {
        self.instrs.remove(pos)
    }
}
