// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Machine-readable diagnostics.
//!
//! Byte spans are resolved to 1-based line/column against the query source
//! so consumers don't need their own line table.

use serde::Serialize;
use xqc_ast::{LineMap, Span};

use crate::{codes::ErrorCodeRegistry, Diagnostic, LabelStyle, Severity};

/// Every diagnostic from one compilation.
#[derive(Debug, Serialize)]
pub struct DiagnosticReport {
    pub file: String,
    /// No diagnostic is an error.
    pub success: bool,
    /// Phase that produced the diagnostics, e.g. `functions`.
    pub phase: String,
    pub diagnostics: Vec<JsonDiagnostic>,
    pub error_count: usize,
    pub warning_count: usize,
}

#[derive(Debug, Serialize)]
pub struct JsonDiagnostic {
    pub severity: Severity,
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<SourceLocation>,
    pub labels: Vec<JsonLabel>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SourceLocation {
    pub line: u32,
    pub column: u32,
    pub byte_offset: usize,
    pub source_line: String,
}

#[derive(Debug, Serialize)]
pub struct JsonLabel {
    pub style: LabelStyle,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub start: LineCol,
    pub end: LineCol,
}

#[derive(Debug, Serialize)]
pub struct LineCol {
    pub line: u32,
    pub column: u32,
}

pub fn to_json_report(diagnostics: &[Diagnostic], source: &str, file: &str, phase: &str) -> DiagnosticReport {
    let line_map = LineMap::new(source);
    let registry = ErrorCodeRegistry::default();

    let error_count = diagnostics.iter().filter(|d| d.severity.is_error()).count();
    let warning_count = diagnostics
        .iter()
        .filter(|d| d.severity == Severity::Warning)
        .count();

    DiagnosticReport {
        file: file.to_string(),
        success: error_count == 0,
        phase: phase.to_string(),
        diagnostics: diagnostics
            .iter()
            .map(|d| convert(d, source, &line_map, &registry))
            .collect(),
        error_count,
        warning_count,
    }
}

pub fn to_json_string(diagnostics: &[Diagnostic], source: &str, file: &str, phase: &str) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&to_json_report(diagnostics, source, file, phase))
}

fn convert(diag: &Diagnostic, source: &str, line_map: &LineMap, registry: &ErrorCodeRegistry) -> JsonDiagnostic {
    let code = diag.code.as_ref().map(|c| c.0.clone());
    let category = code
        .as_deref()
        .and_then(|c| registry.get(c))
        .map(|info| info.category.to_string());

    let location = diag.location().map(|span| {
        let (line, column) = line_map.offset_to_line_col(span.start);
        SourceLocation {
            line,
            column,
            byte_offset: span.start,
            source_line: line_map.line_text(source, line).unwrap_or("").to_string(),
        }
    });

    let line_col = |offset: usize| {
        let (line, column) = line_map.offset_to_line_col(offset);
        LineCol { line, column }
    };
    let labels = diag
        .labels
        .iter()
        .map(|l| {
            let Span { start, end } = l.span;
            JsonLabel {
                style: l.style,
                message: l.message.clone(),
                start: line_col(start),
                end: line_col(end),
            }
        })
        .collect();

    JsonDiagnostic {
        severity: diag.severity,
        kind: diag.kind.clone(),
        code,
        category,
        message: diag.message.clone(),
        location,
        labels,
        notes: diag.notes.clone(),
        help: diag.help.clone(),
    }
}
