// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Terminal rendering of diagnostics.
//!
//! ```text
//! error[XF0002]: wrong number of arguments for function `local:foo` (expected 2, got 1)
//!   --> query.xq:4:1
//!    |
//!  4 | local:foo(1)
//!    | ^^^^^^^^^^^^ called with 1
//!    |
//!    = note: the declaration takes 2 parameters
//! ```

use std::collections::BTreeMap;

use colored::Colorize;
use xqc_ast::LineMap;

use crate::{Diagnostic, Label, LabelStyle, Severity};

pub struct DiagnosticFormatter<'a> {
    source: &'a str,
    file_name: Option<&'a str>,
    line_map: LineMap,
}

impl<'a> DiagnosticFormatter<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            file_name: None,
            line_map: LineMap::new(source),
        }
    }

    pub fn with_file_name(mut self, name: &'a str) -> Self {
        self.file_name = Some(name);
        self
    }

    pub fn format(&self, diagnostic: &Diagnostic) -> String {
        let mut out = String::new();
        self.format_header(&mut out, diagnostic);

        let lines = self.group_by_line(&diagnostic.labels);
        let gutter = lines
            .keys()
            .next_back()
            .map_or(2, |last| last.to_string().len().max(2));

        if let Some(span) = diagnostic.location() {
            let (line, col) = self.line_map.offset_to_line_col(span.start);
            out.push_str(&format!(
                "{}{} {}:{line}:{col}\n",
                " ".repeat(gutter),
                "-->".blue(),
                self.file_name.unwrap_or("<query>"),
            ));
            self.empty_gutter(&mut out, gutter);
        }

        let mut prev = None;
        for (line, labels) in &lines {
            if prev.is_some_and(|p: u32| *line > p + 1) {
                out.push_str(&format!("{} {}\n", " ".repeat(gutter), "...".blue()));
            }
            let text = self.line_map.line_text(self.source, *line).unwrap_or("");
            out.push_str(&format!(
                "{} {} {}\n",
                format!("{line:>gutter$}").blue().bold(),
                "|".blue(),
                text
            ));
            for label in labels {
                self.format_underline(&mut out, label, *line, text, gutter);
            }
            prev = Some(*line);
        }

        if !lines.is_empty() && (!diagnostic.notes.is_empty() || diagnostic.help.is_some()) {
            self.empty_gutter(&mut out, gutter);
        }
        for note in &diagnostic.notes {
            out.push_str(&format!("{} {} {}: {note}\n", " ".repeat(gutter), "=".cyan(), "note".cyan().bold()));
        }
        if let Some(help) = &diagnostic.help {
            out.push_str(&format!("{} {} {}: {help}\n", " ".repeat(gutter), "=".cyan(), "help".cyan().bold()));
        }

        out
    }

    fn format_header(&self, out: &mut String, diagnostic: &Diagnostic) {
        let severity = match diagnostic.severity {
            Severity::Fatal => "internal error".red().bold(),
            Severity::UserError => "error".red().bold(),
            Severity::Warning => "warning".yellow().bold(),
            Severity::Note => "note".blue().bold(),
        };
        match &diagnostic.code {
            Some(code) => out.push_str(&format!("{severity}[{}]: {}\n", code.0, diagnostic.message.bold())),
            None => out.push_str(&format!("{severity}: {}\n", diagnostic.message.bold())),
        }
    }

    fn empty_gutter(&self, out: &mut String, gutter: usize) {
        out.push_str(&format!("{} {}\n", " ".repeat(gutter), "|".blue()));
    }

    /// Labels keyed by the line their span starts on. Primary labels sort first.
    fn group_by_line<'d>(&self, labels: &'d [Label]) -> BTreeMap<u32, Vec<&'d Label>> {
        let mut lines: BTreeMap<u32, Vec<&Label>> = BTreeMap::new();
        for label in labels {
            let (line, _) = self.line_map.offset_to_line_col(label.span.start);
            lines.entry(line).or_default().push(label);
        }
        for labels in lines.values_mut() {
            labels.sort_by_key(|l| (l.style != LabelStyle::Primary, l.span.start));
        }
        lines
    }

    /// One underline row per label. Spans running past the line end are cut
    /// at the end of the line.
    fn format_underline(&self, out: &mut String, label: &Label, line: u32, text: &str, gutter: usize) {
        let (_, col) = self.line_map.offset_to_line_col(label.span.start);
        let (end_line, end_col) = self.line_map.offset_to_line_col(label.span.end);
        let start = col as usize - 1;
        let end = if end_line == line {
            end_col as usize - 1
        } else {
            text.len()
        };
        let width = end.saturating_sub(start).max(1);

        let (marks, message) = match label.style {
            LabelStyle::Primary => (
                "^".repeat(width).red().bold(),
                label.message.as_deref().unwrap_or("").red().bold(),
            ),
            LabelStyle::Secondary => (
                "-".repeat(width).blue(),
                label.message.as_deref().unwrap_or("").blue(),
            ),
        };
        let row = format!("{} {} {}{marks} {message}", " ".repeat(gutter), "|".blue(), " ".repeat(start));
        out.push_str(row.trim_end());
        out.push('\n');
    }
}
