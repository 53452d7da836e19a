// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Error code registry.

use std::collections::HashMap;

pub struct ErrorCodeRegistry {
    codes: HashMap<&'static str, ErrorCodeInfo>,
}

pub struct ErrorCodeInfo {
    pub code: &'static str,
    pub title: &'static str,
    pub category: ErrorCategory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Function declaration and call resolution.
    Functions,
    /// Broken compiler invariants.
    Internal,
    Optimizer,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCategory::Functions => write!(f, "Functions"),
            ErrorCategory::Internal => write!(f, "Internal"),
            ErrorCategory::Optimizer => write!(f, "Optimizer"),
        }
    }
}

macro_rules! register_codes {
    ($($code:literal => ($title:literal, $cat:expr)),* $(,)?) => {{
        let mut map = HashMap::new();
        $(
            map.insert($code, ErrorCodeInfo {
                code: $code,
                title: $title,
                category: $cat,
            });
        )*
        map
    }};
}

impl Default for ErrorCodeRegistry {
    fn default() -> Self {
        use ErrorCategory::*;

        Self {
            codes: register_codes! {
                "XF0001" => ("reference to undefined function", Functions),
                "XF0002" => ("wrong number of arguments", Functions),
                "XF0003" => ("function redefined", Functions),
                "XF0901" => ("malformed program tree", Internal),
                "XF0902" => ("declaration was never registered", Internal),
                "XO0001" => ("optimizer scratch allocation failed", Optimizer),
            },
        }
    }
}

impl ErrorCodeRegistry {
    pub fn get(&self, code: &str) -> Option<&ErrorCodeInfo> {
        self.codes.get(code)
    }

    pub fn all(&self) -> impl Iterator<Item = &ErrorCodeInfo> {
        self.codes.values()
    }
}
