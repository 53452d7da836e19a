// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! xqc compiler diagnostics.
//!
//! Each phase keeps its own error type; `ToDiagnostic` turns those into a
//! common `Diagnostic` that the terminal formatter and the JSON report both
//! consume.

pub mod codes;
pub mod convert;
pub mod formatter;
pub mod json;

use serde::Serialize;
use xqc_ast::Span;

// ============================================================================
// Core Types
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub code: Option<ErrorCode>,
    /// Stable machine-readable kind, e.g. `arity-mismatch`.
    pub kind: String,
    pub message: String,
    pub labels: Vec<Label>,
    pub notes: Vec<String>,
    pub help: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Label {
    pub span: Span,
    pub style: LabelStyle,
    pub message: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelStyle {
    Primary,
    Secondary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Severity {
    /// A compiler invariant was broken by an earlier phase.
    Fatal,
    /// The query is wrong; the user can fix it.
    UserError,
    Warning,
    Note,
}

impl Severity {
    /// Fatal and user errors both stop compilation.
    pub fn is_error(self) -> bool {
        matches!(self, Severity::Fatal | Severity::UserError)
    }
}

/// An error code like XF0002.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ErrorCode(pub String);

// ============================================================================
// Builder API
// ============================================================================

impl Diagnostic {
    fn new(severity: Severity, kind: &str, message: impl Into<String>) -> Self {
        Self {
            severity,
            code: None,
            kind: kind.to_string(),
            message: message.into(),
            labels: Vec::new(),
            notes: Vec::new(),
            help: None,
        }
    }

    pub fn user_error(kind: &str, message: impl Into<String>) -> Self {
        Self::new(Severity::UserError, kind, message)
    }

    pub fn fatal(kind: &str, message: impl Into<String>) -> Self {
        Self::new(Severity::Fatal, kind, message)
    }

    pub fn warning(kind: &str, message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, kind, message)
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(ErrorCode(code.into()));
        self
    }

    pub fn with_label(mut self, span: Span, style: LabelStyle, msg: impl Into<String>) -> Self {
        self.labels.push(Label {
            span,
            style,
            message: Some(msg.into()),
        });
        self
    }

    /// Primary label, unless `span` carries no source position.
    pub fn with_primary(self, span: Span, msg: impl Into<String>) -> Self {
        if span.is_dummy() {
            return self;
        }
        self.with_label(span, LabelStyle::Primary, msg)
    }

    pub fn with_secondary(self, span: Span, msg: impl Into<String>) -> Self {
        self.with_label(span, LabelStyle::Secondary, msg)
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Where the diagnostic points: the first primary label, else the first label.
    pub fn location(&self) -> Option<Span> {
        self.labels
            .iter()
            .find(|l| l.style == LabelStyle::Primary)
            .or(self.labels.first())
            .map(|l| l.span)
    }
}

// ============================================================================
// Conversion Trait
// ============================================================================

pub trait ToDiagnostic {
    fn to_diagnostic(&self) -> Diagnostic;
}
