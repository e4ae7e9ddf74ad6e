//! Report output with trait-based format dispatch.

use anyhow::{anyhow, Result};
use gabc_syntax::{Diagnostic, Severity};
use serde::Serialize;

/// Diagnostics surfaced for one input.
#[derive(Debug)]
pub struct FileReport {
    pub file: String,
    /// Diagnostics left after `--no-info` and `--max-diagnostics`.
    pub diagnostics: Vec<Diagnostic>,
    /// Whether any error was found, counting filtered ones.
    pub has_errors: bool,
}

pub trait Reporter {
    fn render(&self, reports: &[FileReport]) -> Result<String>;
}

/// Create a reporter for the given format name.
pub fn create_reporter(format: &str) -> Result<Box<dyn Reporter>> {
    match format {
        "text" => Ok(Box::new(TextReporter)),
        "json" => Ok(Box::new(JsonReporter)),
        _ => Err(anyhow!("unknown format: {}. Use text or json", format)),
    }
}

/// Compiler-style lines: `file:line:col: severity[code]: message`.
pub struct TextReporter;

impl Reporter for TextReporter {
    fn render(&self, reports: &[FileReport]) -> Result<String> {
        let mut out = String::new();
        for report in reports {
            for d in &report.diagnostics {
                // Positions are zero-based internally, one-based for humans
                out.push_str(&format!(
                    "{}:{}:{}: {}[{}]: {}\n",
                    report.file,
                    d.range.start.line + 1,
                    d.range.start.character + 1,
                    d.severity,
                    d.code,
                    d.message
                ));
            }
        }
        let count = |s: Severity| {
            reports
                .iter()
                .flat_map(|r| &r.diagnostics)
                .filter(|d| d.severity == s)
                .count()
        };
        let (errors, warnings) = (count(Severity::Error), count(Severity::Warning));
        if errors + warnings > 0 {
            out.push_str(&format!(
                "{} error(s), {} warning(s) in {} file(s)\n",
                errors,
                warnings,
                reports.len()
            ));
        }
        Ok(out)
    }
}

#[derive(Serialize)]
struct JsonEntry<'a> {
    file: &'a str,
    #[serde(flatten)]
    diagnostic: &'a Diagnostic,
}

/// One JSON array of every diagnostic, each tagged with its file.
pub struct JsonReporter;

impl Reporter for JsonReporter {
    fn render(&self, reports: &[FileReport]) -> Result<String> {
        let entries: Vec<JsonEntry<'_>> = reports
            .iter()
            .flat_map(|r| {
                r.diagnostics.iter().map(move |diagnostic| JsonEntry {
                    file: &r.file,
                    diagnostic,
                })
            })
            .collect();
        let mut out = serde_json::to_string_pretty(&entries)?;
        out.push('\n');
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gabc_syntax::{DiagnosticCode, Position, Range};

    fn sample() -> Vec<FileReport> {
        vec![FileReport {
            file: "kyrie.gabc".to_string(),
            diagnostics: vec![Diagnostic::error(
                DiagnosticCode::InvalidPitch,
                Range::new(Position::new(2, 9), Position::new(2, 10)),
                "invalid pitch for 4 lines: n",
            )],
            has_errors: true,
        }]
    }

    #[test]
    fn text_lines_are_one_based() {
        let out = TextReporter.render(&sample()).unwrap();
        assert_eq!(
            out,
            "kyrie.gabc:3:10: error[invalid_pitch]: invalid pitch for 4 lines: n\n\
             1 error(s), 0 warning(s) in 1 file(s)\n"
        );
    }

    #[test]
    fn text_is_empty_when_clean() {
        let clean = vec![FileReport {
            file: "a.gabc".to_string(),
            diagnostics: Vec::new(),
            has_errors: false,
        }];
        assert_eq!(TextReporter.render(&clean).unwrap(), "");
    }

    #[test]
    fn json_entries_carry_file() {
        let out = JsonReporter.render(&sample()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value[0]["file"], "kyrie.gabc");
        assert_eq!(value[0]["code"], "invalid_pitch");
        assert_eq!(value[0]["severity"], "error");
        assert_eq!(value[0]["range"]["start"]["character"], 9);
    }

    #[test]
    fn unknown_format_is_rejected() {
        assert!(create_reporter("xml").is_err());
        assert!(create_reporter("json").is_ok());
    }
}
