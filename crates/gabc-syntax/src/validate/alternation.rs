//! gabc/nabc alternation inside `|`-multiplexed groups.
//!
//! Every group is judged on its own against the document's
//! [`AlternationConfig`](crate::context::AlternationConfig); no state is
//! carried from one group to the next.

use super::typed_snippets;
use crate::classify::SnippetKind;
use crate::context::ValidationContext;
use crate::diagnostic::{messages, Diagnostic, DiagnosticCode};
use crate::model::Document;

pub fn check(doc: &Document, ctx: &ValidationContext) -> Vec<Diagnostic> {
    let mut out = Vec::new();

    for music in doc.syllables.iter().filter_map(|s| s.music.as_ref()) {
        let typed = typed_snippets(music, &ctx.alternation);

        if ctx.alternation.period == 0 {
            if music.is_nabc_bearing() {
                out.push(Diagnostic::error(
                    DiagnosticCode::InvalidPipeWithoutNabc,
                    doc.range(music.span),
                    messages::PIPE_WITHOUT_NABC_LINES,
                ));
            }
            for t in typed.iter().filter(|t| t.found == SnippetKind::Nabc) {
                out.push(Diagnostic::error(
                    DiagnosticCode::NabcInGabcOnlyMode,
                    doc.range(t.snippet.span),
                    format!(
                        "nabc notation \"{}\" found but \"nabc-lines\" is not set",
                        t.snippet.content
                    ),
                ));
            }
            continue;
        }

        for t in &typed {
            if t.found == SnippetKind::Neutral || t.found == t.expected {
                continue;
            }
            out.push(Diagnostic::error(
                DiagnosticCode::AlternationViolation,
                doc.range(t.snippet.span),
                format!(
                    "snippet {} should be {} (nabc-lines: {}) but looks like {}",
                    t.snippet.index + 1,
                    t.expected.as_str(),
                    ctx.alternation.period,
                    t.found.as_str()
                ),
            ));
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{AlternationConfig, FontFamily};

    fn diags(text: &str) -> Vec<Diagnostic> {
        let doc = Document::parse(text);
        let ctx = ValidationContext::for_document(&doc, FontFamily::Gregall);
        check(&doc, &ctx)
    }

    #[test]
    fn pipe_without_nabc_lines() {
        let found = diags("name: x;\n%%\n(f3) Test(f|g|h) content.");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].code, DiagnosticCode::InvalidPipeWithoutNabc);
        assert_eq!(
            found[0].message,
            "You used character \"|\" in gabc without setting \"nabc-lines\" parameter. Please set it in your gabc header."
        );
    }

    #[test]
    fn nabc_lines_zero_forbids_any_pipe() {
        for group in ["f|", "|", "f||g", "ce|vihk"] {
            let found = diags(&format!("name: x;\nnabc-lines: 0;\n%%\nA({})", group));
            assert_eq!(
                found
                    .iter()
                    .filter(|d| d.code == DiagnosticCode::InvalidPipeWithoutNabc)
                    .count(),
                1,
                "group {group:?}"
            );
        }
    }

    #[test]
    fn nabc_content_in_gabc_only_mode() {
        let found = diags("name: x;\n%%\nA(peGlsa6tohl)");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].code, DiagnosticCode::NabcInGabcOnlyMode);
    }

    #[test]
    fn pipe_and_nabc_are_independent_errors() {
        let found = diags("name: x;\n%%\nA(ce|toppt2)");
        let codes: Vec<_> = found.iter().map(|d| d.code).collect();
        assert_eq!(
            codes,
            vec![
                DiagnosticCode::InvalidPipeWithoutNabc,
                DiagnosticCode::NabcInGabcOnlyMode
            ]
        );
    }

    #[test]
    fn period_two_scenario_is_clean() {
        let found = diags("name: x;\nnabc-lines: 2;\n%%\nA(ce/fgf|peGlsa6tohl|toppt2lss2lsim2)");
        assert!(found.is_empty(), "{found:#?}");
    }

    #[test]
    fn gabc_where_nabc_expected() {
        let found = diags("name: x;\nnabc-lines: 1;\n%%\nA(f|g)");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].code, DiagnosticCode::AlternationViolation);
        assert_eq!(
            found[0].message,
            "snippet 2 should be nabc (nabc-lines: 1) but looks like gabc"
        );
    }

    #[test]
    fn nabc_where_gabc_expected() {
        let found = diags("name: x;\nnabc-lines: 1;\n%%\nA(toppt2|lsim2)");
        assert_eq!(found.len(), 1);
        assert!(found[0].message.starts_with("snippet 1 should be gabc"));
    }

    #[test]
    fn empty_snippets_are_neutral() {
        let found = diags("name: x;\nnabc-lines: 1;\n%%\nA(f||g)");
        assert!(found.is_empty(), "{found:#?}");
    }

    #[test]
    fn snippet_zero_never_required_nabc() {
        for period in 1..5 {
            let cfg = AlternationConfig::with_period(period);
            assert_ne!(cfg.expected_kind(0), SnippetKind::Nabc);
        }
    }
}
