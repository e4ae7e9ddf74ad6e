//! Header checks: required `name`, duplicates, numeric settings.

use crate::context::{self, AlternationConfig, ValidationContext};
use crate::diagnostic::{messages, Diagnostic, DiagnosticCode};
use crate::model::Document;
use crate::position::{Position, Range};
use std::collections::HashMap;

/// Headers that may legally appear more than once, with their limit.
const REPEATABLE: &[(&str, usize)] = &[("annotation", 2)];

pub fn check(doc: &Document, _ctx: &ValidationContext) -> Vec<Diagnostic> {
    let mut out = Vec::new();
    let file_start = Range::new(Position::default(), Position::default());

    if doc.header("name").is_none() {
        out.push(Diagnostic::warning(
            DiagnosticCode::MissingName,
            file_start,
            messages::MISSING_NAME,
        ));
    }

    if !doc.has_separator {
        out.push(Diagnostic::warning(
            DiagnosticCode::MissingBodySeparator,
            file_start,
            "no `%%' line separating the header from the score body",
        ));
    }

    let mut seen: HashMap<String, usize> = HashMap::new();
    for field in &doc.headers {
        let key = field.name.to_ascii_lowercase();
        let count = seen.entry(key.clone()).or_insert(0);
        *count += 1;
        let limit = REPEATABLE
            .iter()
            .find(|(name, _)| *name == key)
            .map_or(1, |(_, n)| *n);
        if *count > limit {
            out.push(Diagnostic::warning(
                DiagnosticCode::DuplicateHeader,
                doc.range(field.span),
                messages::duplicate_header(&field.name),
            ));
        }
    }

    for field in &doc.headers {
        if field.is("nabc-lines") {
            if let Err(e) = AlternationConfig::parse(&field.value) {
                out.push(Diagnostic::error(
                    DiagnosticCode::InvalidNabcLines,
                    doc.range(field.span),
                    e.to_string(),
                ));
            }
        } else if field.is("staff-lines") {
            if let Err(e) = context::parse_staff_lines(&field.value) {
                out.push(Diagnostic::error(
                    DiagnosticCode::InvalidStaffLines,
                    doc.range(field.span),
                    e.to_string(),
                ));
            }
        }
    }

    out
}
