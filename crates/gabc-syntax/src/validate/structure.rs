//! Syllable shape: empty syllables and text left without music.

use crate::context::ValidationContext;
use crate::diagnostic::{Diagnostic, DiagnosticCode};
use crate::model::Document;

pub fn check(doc: &Document, _ctx: &ValidationContext) -> Vec<Diagnostic> {
    let mut out = Vec::new();
    for syllable in &doc.syllables {
        if syllable.is_empty() {
            out.push(Diagnostic::warning(
                DiagnosticCode::EmptySyllable,
                doc.range(syllable.span),
                "empty syllable: no text and no music",
            ));
        } else if let (Some(text), None) = (&syllable.text, &syllable.music) {
            out.push(Diagnostic::warning(
                DiagnosticCode::TextWithoutMusic,
                doc.range(text.span),
                format!("text without music: \"{}\"", text.content),
            ));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codes(body: &str) -> Vec<DiagnosticCode> {
        let doc = Document::parse(&format!("name: x;\n%%\n{}", body));
        check(&doc, &ValidationContext::default())
            .into_iter()
            .map(|d| d.code)
            .collect()
    }

    #[test]
    fn bare_music_is_valid() {
        assert!(codes("(c4) (::)").is_empty());
    }

    #[test]
    fn empty_syllable_flagged_exactly_once() {
        assert_eq!(codes("(c4) A(f) ()"), vec![DiagnosticCode::EmptySyllable]);
    }

    #[test]
    fn empty_group_after_text_is_fine() {
        assert!(codes("(c4) Amen()").is_empty());
    }

    #[test]
    fn trailing_text_is_flagged() {
        assert_eq!(
            codes("(f3) Test(f) content."),
            vec![DiagnosticCode::TextWithoutMusic]
        );
    }
}
