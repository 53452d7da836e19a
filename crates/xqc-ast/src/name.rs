// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Qualified names.

use std::fmt;

/// A namespace-qualified name such as `local:fib` or `fn:count`.
///
/// Two names are equal when both the namespace and the local part match.
/// An empty namespace means the default (unprefixed) namespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct QualifiedName {
    pub ns: String,
    pub local: String,
}

impl QualifiedName {
    pub fn new(ns: impl Into<String>, local: impl Into<String>) -> Self {
        Self { ns: ns.into(), local: local.into() }
    }

    /// Name in the default namespace.
    pub fn unqualified(local: impl Into<String>) -> Self {
        Self::new(String::new(), local)
    }

    /// Split `prefix:local` at the first colon. Names without a colon land
    /// in the default namespace.
    pub fn parse(text: &str) -> Self {
        match text.split_once(':') {
            Some((ns, local)) => Self::new(ns, local),
            None => Self::unqualified(text),
        }
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.ns.is_empty() {
            write!(f, "{}", self.local)
        } else {
            write!(f, "{}:{}", self.ns, self.local)
        }
    }
}
