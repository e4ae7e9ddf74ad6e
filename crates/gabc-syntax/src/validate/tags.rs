//! Inline style tag nesting (`<b>`, `<i>`, `<sc>`, …) across the whole score.
//!
//! Iterative stack machine: tags may open in one syllable and close in a
//! later one, so a single stack spans the document.

use crate::context::ValidationContext;
use crate::diagnostic::{messages, Diagnostic, DiagnosticCode};
use crate::model::Document;
use crate::position::Span;
use regex::Regex;
use std::sync::LazyLock;

/// Tags whose nesting is checked; anything else is ignored.
pub const CHECKED_TAGS: &[&str] = &["b", "i", "sc", "ul", "v", "c", "e", "nlba", "pr", "alt"];

static RE_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<(/?)([A-Za-z]+)(?::[^<>]*)?>").unwrap());

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagToken {
    pub name: String,
    pub closing: bool,
    pub span: Span,
}

/// Checked tags of `text` (which starts at absolute offset `base`).
pub fn tokens(text: &str, base: usize) -> Vec<TagToken> {
    RE_TAG
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let name = caps.get(2)?.as_str();
            CHECKED_TAGS.contains(&name).then(|| TagToken {
                name: name.to_string(),
                closing: caps.get(1).is_some_and(|m| !m.is_empty()),
                span: Span::new(base + whole.start(), base + whole.end()),
            })
        })
        .collect()
}

/// Open tag on the stack with the syllable it came from.
struct Open {
    token: TagToken,
    syllable: usize,
}

pub fn check(doc: &Document, _ctx: &ValidationContext) -> Vec<Diagnostic> {
    let mut out = Vec::new();
    let mut stack: Vec<Open> = Vec::new();

    let unclosed = |open: &Open| {
        tracing::trace!(tag = %open.token.name, syllable = open.syllable, "tag left open");
        Diagnostic::error(
            DiagnosticCode::UnclosedTag,
            doc.range(open.token.span),
            messages::unclosed_tag(&open.token.name),
        )
    };

    for (index, syllable) in doc.syllables.iter().enumerate() {
        let Some(text) = &syllable.text else {
            continue;
        };
        for token in tokens(&text.content, text.span.start) {
            if !token.closing {
                stack.push(Open {
                    token,
                    syllable: index,
                });
                continue;
            }

            match stack.iter().rposition(|o| o.token.name == token.name) {
                None => out.push(Diagnostic::error(
                    DiagnosticCode::UnmatchedClosingTag,
                    doc.range(token.span),
                    messages::unmatched_closing_tag(&token.name),
                )),
                Some(pos) => {
                    // Everything opened after the match is closed implicitly
                    for open in stack[pos + 1..].iter().rev() {
                        out.push(unclosed(open));
                    }
                    stack.truncate(pos);
                }
            }
        }
    }

    out.extend(stack.iter().map(unclosed));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn diags(body: &str) -> Vec<Diagnostic> {
        let doc = Document::parse(&format!("name: x;\n%%\n{}", body));
        check(&doc, &ValidationContext::default())
    }

    fn codes(body: &str) -> Vec<DiagnosticCode> {
        diags(body).into_iter().map(|d| d.code).collect()
    }

    #[test]
    fn balanced_tags_are_silent() {
        assert!(codes("<b>Ky</b>(f) <i><sc>ri</sc></i>(g) <alt>x</alt>e(h)").is_empty());
    }

    #[test]
    fn tags_may_span_syllables() {
        assert!(codes("<i>Ky(f)ri(g)e</i>(h)").is_empty());
    }

    #[test]
    fn swapped_closers_report_once() {
        let found = diags("<b><i>Ky</b></i>(f)");
        let codes: Vec<_> = found.iter().map(|d| d.code).collect();
        assert_eq!(
            codes,
            vec![DiagnosticCode::UnclosedTag, DiagnosticCode::UnmatchedClosingTag]
        );
        assert_eq!(found[0].message, "unclosed tag: <i>");
        assert_eq!(found[1].message, "unmatched closing tag: </i>");
        assert_eq!(
            found.iter().filter(|d| d.code == DiagnosticCode::UnclosedTag).count(),
            1
        );
    }

    #[test]
    fn closer_on_empty_stack() {
        let found = diags("Ky</b>(f)");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].message, "unmatched closing tag: </b>");
    }

    #[test]
    fn closer_without_matching_opener_leaves_stack_alone() {
        let found = diags("<b>Ky</i>(f) ri</b>(g)");
        assert_eq!(codes_of(&found), vec![DiagnosticCode::UnmatchedClosingTag]);
    }

    #[test]
    fn remaining_openers_are_unclosed_in_source_order() {
        let found = diags("<b>Ky(f) <i>ri(g)");
        let msgs: Vec<_> = found.iter().map(|d| d.message.as_str()).collect();
        assert_eq!(msgs, vec!["unclosed tag: <b>", "unclosed tag: <i>"]);
    }

    #[test]
    fn repair_reports_every_skipped_opener_innermost_first() {
        let found = diags("<b><i><sc>Ky</b>(f)");
        let msgs: Vec<_> = found.iter().map(|d| d.message.as_str()).collect();
        assert_eq!(msgs, vec!["unclosed tag: <sc>", "unclosed tag: <i>"]);
    }

    #[test]
    fn unknown_tags_are_ignored() {
        let found = diags("<foo>bar</foo> <b>Ky</b>(f) </foo>ri(g)");
        assert!(found.is_empty());
        assert!(!found.iter().any(|d| d.message.contains("foo")));
    }

    #[test]
    fn tag_arguments_are_accepted() {
        assert!(codes("<pr:0.5>Ky</pr>(f)").is_empty());
    }

    #[test]
    fn diagnostic_points_at_tag() {
        let found = diags("Ky</b>(f)");
        assert_eq!(found[0].range.start.line, 2);
        assert_eq!(found[0].range.start.character, 2);
        assert_eq!(found[0].range.end.character, 6);
    }

    fn codes_of(found: &[Diagnostic]) -> Vec<DiagnosticCode> {
        found.iter().map(|d| d.code).collect()
    }
}
