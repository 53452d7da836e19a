// SPDX-License-Identifier: (MIT OR Apache-2.0)

//! Textual MAL listing, for logs and test failure messages.

use std::fmt;

use crate::{Instr, MalBlock, MalConst, MalType, VarId};

impl fmt::Display for MalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MalType::Scalar(t) => write!(f, ":{}", t.name()),
            MalType::Bat(t) => write!(f, "bat[:{}]", t.name()),
        }
    }
}

impl fmt::Display for MalConst {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MalConst::Int(v) => write!(f, "{}", v),
            MalConst::Dbl(v) => write!(f, "{}", v),
            MalConst::Bit(v) => write!(f, "{}", v),
            MalConst::Str(s) => write!(f, "\"{}\"", s),
        }
    }
}

/// An instruction rendered against the variable table of its block.
pub struct InstrDisplay<'a> {
    block: &'a MalBlock,
    instr: &'a Instr,
}

impl MalBlock {
    pub fn display_instr<'a>(&'a self, instr: &'a Instr) -> InstrDisplay<'a> {
        InstrDisplay { block: self, instr }
    }
}

impl InstrDisplay<'_> {
    fn operand(&self, f: &mut fmt::Formatter<'_>, id: VarId) -> fmt::Result {
        let var = self.block.var(id);
        match &var.constant {
            Some(c) => write!(f, "{}{}", c, var.ty),
            None => write!(f, "{}", var.name),
        }
    }

    fn result(&self, f: &mut fmt::Formatter<'_>, id: VarId) -> fmt::Result {
        let var = self.block.var(id);
        match var.ty {
            MalType::Scalar(_) => write!(f, "{}{}", var.name, var.ty),
            MalType::Bat(_) => write!(f, "{}:{}", var.name, var.ty),
        }
    }
}

impl fmt::Display for InstrDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let results = self.instr.results();
        match results {
            [] => {}
            [single] => {
                self.result(f, *single)?;
                write!(f, " := ")?;
            }
            many => {
                write!(f, "(")?;
                for (i, id) in many.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    self.result(f, *id)?;
                }
                write!(f, ") := ")?;
            }
        }
        match (self.instr.module(), self.instr.function()) {
            (Some(m), Some(func)) => write!(f, "{}.{}(", m, func)?,
            (None, Some(func)) => write!(f, "{}(", func)?,
            _ => write!(f, "(")?,
        }
        for (i, id) in self.instr.args().iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            self.operand(f, *id)?;
        }
        write!(f, ");")
    }
}

impl fmt::Display for MalBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let module = self.signature.module().unwrap_or("user");
        let name = self.signature.function().unwrap_or("main");
        writeln!(f, "function {}.{}();", module, name)?;
        for instr in &self.instrs {
            writeln!(f, "    {}", self.display_instr(instr))?;
        }
        writeln!(f, "end {}.{};", module, name)
    }
}
