// SPDX-License-Identifier: (MIT OR Apache-2.0)

//! MalBuilder - helper for assembling MAL blocks.

use crate::{Instr, MalBlock, MalConst, MalType, MalVar, VarId};

pub struct MalBuilder {
    block: MalBlock,
}

impl MalBuilder {
    pub fn new(name: &str) -> Self {
        let signature = Instr {
            module: Some("user".to_string()),
            function: Some(name.to_string()),
            argv: Vec::new(),
            retc: 0,
        };
        Self {
            block: MalBlock {
                signature,
                vars: Vec::new(),
                instrs: Vec::new(),
            },
        }
    }

    fn alloc(&mut self, name: Option<String>, ty: MalType, constant: Option<MalConst>) -> VarId {
        let id = VarId(self.block.vars.len() as u32);
        let name = name.unwrap_or_else(|| format!("X_{}", id.0));
        self.block.vars.push(MalVar { id, name, ty, constant });
        id
    }

    pub fn var(&mut self, name: &str, ty: impl Into<MalType>) -> VarId {
        self.alloc(Some(name.to_string()), ty.into(), None)
    }

    pub fn constant(&mut self, value: MalConst, ty: impl Into<MalType>) -> VarId {
        self.alloc(None, ty.into(), Some(value))
    }

    /// Append an instruction, returning its position.
    pub fn push(&mut self, instr: Instr) -> usize {
        self.block.instrs.push(instr);
        self.block.instrs.len() - 1
    }

    pub fn emit(&mut self, module: &str, function: &str, results: &[VarId], args: &[VarId]) -> usize {
        self.push(Instr::new(module, function, results, args))
    }

    pub fn finish(self) -> MalBlock {
        self.block
    }
}
