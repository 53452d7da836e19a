// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Sequence types as far as function signatures need them.
//!
//! Type inference proper lives elsewhere; descriptors only store these.

use std::fmt;

use crate::QualifiedName;

/// Occurrence indicator of a sequence type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Occurrence {
    One,
    Optional,
    ZeroOrMore,
    OneOrMore,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Ty {
    /// Not yet known. Default return type of user functions.
    Untyped,
    /// The empty sequence.
    Empty,
    /// Any item.
    Item,
    /// Any node.
    Node,
    /// A named atomic type, e.g. `xs:integer`.
    Atomic(QualifiedName),
    /// `item occurrence`, e.g. `xs:string*`.
    Seq(Box<Ty>, Occurrence),
}

impl Ty {
    pub fn atomic(name: &str) -> Ty {
        Ty::Atomic(QualifiedName::parse(name))
    }

    pub fn star(self) -> Ty {
        Ty::Seq(Box::new(self), Occurrence::ZeroOrMore)
    }

    pub fn opt(self) -> Ty {
        Ty::Seq(Box::new(self), Occurrence::Optional)
    }
}

impl Default for Ty {
    fn default() -> Self {
        Ty::Untyped
    }
}

impl fmt::Display for Ty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ty::Untyped => write!(f, "untyped"),
            Ty::Empty => write!(f, "empty-sequence()"),
            Ty::Item => write!(f, "item()"),
            Ty::Node => write!(f, "node()"),
            Ty::Atomic(name) => write!(f, "{}", name),
            Ty::Seq(inner, occ) => {
                let suffix = match occ {
                    Occurrence::One => "",
                    Occurrence::Optional => "?",
                    Occurrence::ZeroOrMore => "*",
                    Occurrence::OneOrMore => "+",
                };
                write!(f, "{}{}", inner, suffix)
            }
        }
    }
}
