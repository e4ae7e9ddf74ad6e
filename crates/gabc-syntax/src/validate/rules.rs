//! Rendering rules over gabc music: quilismata, ambitus, first-syllable
//! restrictions and style conflicts in the lyric text.

use super::gabc_snippets;
use crate::context::ValidationContext;
use crate::diagnostic::{Diagnostic, DiagnosticCode};
use crate::gabc;
use crate::model::{Document, MusicElement, Snippet, Syllable};
use crate::position::Span;
use regex::Regex;
use std::sync::LazyLock;

/// Widest interval (in diatonic steps) tolerated within one syllable.
const MAX_AMBITUS: u8 = 7;

static RE_CENTER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<c>").unwrap());
static RE_PROTRUSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<pr(?::[^<>]*)?>").unwrap());

pub fn check(doc: &Document, ctx: &ValidationContext) -> Vec<Diagnostic> {
    let mut out = Vec::new();
    let first_with_text = doc.syllables.iter().position(|s| s.text.is_some());

    for (index, syllable) in doc.syllables.iter().enumerate() {
        if let Some(music) = &syllable.music {
            let snippets = gabc_snippets(music, &ctx.alternation);
            for snippet in &snippets {
                quilismata(doc, snippet, &mut out);
            }
            ambitus(doc, &snippets, &mut out);
            if Some(index) == first_with_text {
                first_syllable_music(doc, music, &snippets, &mut out);
            }
        }
        if Some(index) == first_with_text {
            first_syllable_text(doc, syllable, &mut out);
        }
        style_conflicts(doc, syllable, &mut out);
    }

    out
}

/// A pitch carrying a quilisma: `gw`, or `g!w` when already broken off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Quilisma {
    offset: usize,
    value: u8,
    /// Index just past the `w`.
    end: usize,
    broken: bool,
}

fn find_quilismata(masked: &[u8]) -> Vec<Quilisma> {
    let is_q = |i: usize| matches!(masked.get(i), Some(b'w' | b'W'));
    let mut found = Vec::new();
    for (i, &b) in masked.iter().enumerate() {
        let Some(value) = gabc::pitch_value(b as char) else {
            continue;
        };
        let (end, explicit_break) = if is_q(i + 1) {
            (i + 2, false)
        } else if masked.get(i + 1) == Some(&b'!') && is_q(i + 2) {
            (i + 3, true)
        } else {
            continue;
        };
        let preceded = i > 0 && masked[i - 1] == b'!';
        found.push(Quilisma {
            offset: i,
            value,
            end,
            broken: explicit_break || preceded,
        });
    }
    found
}

fn quilismata(doc: &Document, snippet: &Snippet<'_>, out: &mut Vec<Diagnostic>) {
    let masked = gabc::mask_non_notes(snippet.content);
    let bytes = masked.as_bytes();

    for q in find_quilismata(bytes) {
        let at = doc.range(snippet.span.slice(q.offset, q.end));
        let pitch = bytes[q.offset] as char;
        if !q.broken {
            out.push(Diagnostic::info(
                DiagnosticCode::GlyphBreakSuggestion,
                at,
                format!("consider inserting '!' before '{}' to break the glyph before the quilisma", pitch),
            ));
        }

        let next = bytes[q.end..]
            .iter()
            .find_map(|&b| gabc::pitch_value(b as char).map(|v| (b as char, v)));
        match next {
            None => out.push(Diagnostic::warning(
                DiagnosticCode::QuilismaNoFollowingNote,
                at,
                format!("quilisma on '{}' is not followed by a note", pitch),
            )),
            Some((letter, value)) if value <= q.value => out.push(Diagnostic::warning(
                DiagnosticCode::QuilismaAscendingMotion,
                at,
                format!(
                    "quilisma on '{}' should ascend, but the next note '{}' is not higher",
                    pitch, letter
                ),
            )),
            Some(_) => {}
        }
    }
}

fn ambitus(doc: &Document, snippets: &[Snippet<'_>], out: &mut Vec<Diagnostic>) {
    let mut lowest: Option<gabc::Note> = None;
    let mut highest: Option<gabc::Note> = None;

    for snippet in snippets {
        for note in gabc::notes(snippet.content) {
            let lo = *lowest.get_or_insert(note);
            let hi = *highest.get_or_insert(note);
            let (lo, hi) = (
                if note.value < lo.value { note } else { lo },
                if note.value > hi.value { note } else { hi },
            );
            lowest = Some(lo);
            highest = Some(hi);
            if hi.value - lo.value > MAX_AMBITUS {
                out.push(Diagnostic::warning(
                    DiagnosticCode::LargeAmbitus,
                    doc.range(snippet.span.slice(note.offset, note.offset + 1)),
                    format!(
                        "large ambitus within one syllable: '{}' to '{}' exceeds an octave",
                        lo.letter, hi.letter
                    ),
                ));
                return;
            }
        }
    }
}

fn first_syllable_music(
    doc: &Document,
    music: &MusicElement,
    snippets: &[Snippet<'_>],
    out: &mut Vec<Diagnostic>,
) {
    let music_start = music.span.start + (music.content.len() - music.content.trim_start().len());

    for snippet in snippets {
        let masked = gabc::mask_non_notes(snippet.content);
        let bytes = masked.as_bytes();
        let mut i = 0;
        while i < bytes.len() {
            let end = match bytes[i] {
                b'z' | b'Z' if bytes.get(i + 1) != Some(&b'0') => Some(i + 1),
                b'/' => Some(slash_marker_end(snippet.content.as_bytes(), i)),
                _ => None,
            };
            match end {
                Some(end) => {
                    out.push(Diagnostic::error(
                        DiagnosticCode::FirstSyllableLineBreak,
                        doc.range(snippet.span.slice(i, end)),
                        "line break is not supported on the first syllable",
                    ));
                    i = end;
                }
                None => i += 1,
            }
        }

        for clef in gabc::clefs(snippet.content) {
            let span = snippet.span.slice(clef.offset, clef.offset + clef.len);
            if span.start > music_start {
                out.push(Diagnostic::error(
                    DiagnosticCode::FirstSyllableClefChange,
                    doc.range(span),
                    "clef change is not supported on the first syllable",
                ));
            }
        }
    }
}

/// End of the `/` marker starting at `start`: the whole slash run plus
/// a `[..]` or `0` suffix.
fn slash_marker_end(raw: &[u8], start: usize) -> usize {
    let mut end = start;
    while raw.get(end) == Some(&b'/') {
        end += 1;
    }
    match raw.get(end) {
        Some(b'0') => end + 1,
        Some(b'[') => raw[end..]
            .iter()
            .position(|&b| b == b']')
            .map_or(end, |close| end + close + 1),
        _ => end,
    }
}

fn first_syllable_text(doc: &Document, syllable: &Syllable, out: &mut Vec<Diagnostic>) {
    let Some(text) = &syllable.text else {
        return;
    };
    if text.content.starts_with("<e>") {
        out.push(Diagnostic::error(
            DiagnosticCode::FirstSyllableElision,
            doc.range(Span::new(text.span.start, text.span.start + 3)),
            "elision is not supported at the beginning of the first syllable",
        ));
    }
}

fn style_conflicts(doc: &Document, syllable: &Syllable, out: &mut Vec<Diagnostic>) {
    let Some(text) = &syllable.text else {
        return;
    };
    let conflicts = [
        (&RE_CENTER, DiagnosticCode::MultipleCenterTags, "<c>"),
        (&RE_PROTRUSION, DiagnosticCode::MultipleProtrusions, "<pr>"),
    ];
    for (re, code, tag) in conflicts {
        let found: Vec<_> = re.find_iter(&text.content).collect();
        if let Some(second) = found.get(1) {
            out.push(Diagnostic::warning(
                code,
                doc.range(Span::new(
                    text.span.start + second.start(),
                    text.span.start + second.end(),
                )),
                format!("{} {} tags in one syllable; only one is honoured", found.len(), tag),
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::FontFamily;

    fn diags(body: &str) -> Vec<Diagnostic> {
        let doc = Document::parse(&format!("name: x;\n%%\n{}", body));
        let ctx = ValidationContext::for_document(&doc, FontFamily::Gregall);
        check(&doc, &ctx)
    }

    fn count(found: &[Diagnostic], code: DiagnosticCode) -> usize {
        found.iter().filter(|d| d.code == code).count()
    }

    #[test]
    fn broken_ascending_quilismata_are_clean() {
        let found = diags("(c4) Good(g!wh)example(f!wi)");
        assert_eq!(count(&found, DiagnosticCode::GlyphBreakSuggestion), 0);
        assert_eq!(count(&found, DiagnosticCode::QuilismaAscendingMotion), 0);
        assert!(found.is_empty(), "{found:#?}");
    }

    #[test]
    fn unbroken_descending_quilismata() {
        let found = diags("(c4) Bad(gwf)worse(fwe)");
        assert_eq!(count(&found, DiagnosticCode::GlyphBreakSuggestion), 2);
        assert_eq!(count(&found, DiagnosticCode::QuilismaAscendingMotion), 2);
        let suggestion = &found[0];
        assert_eq!(suggestion.severity, crate::diagnostic::Severity::Information);
        assert!(suggestion.message.contains("'!' before 'g'"));
    }

    #[test]
    fn quilisma_preceded_by_break_is_not_suggested() {
        let found = diags("(c4) A(f!gwh)");
        assert_eq!(count(&found, DiagnosticCode::GlyphBreakSuggestion), 0);
    }

    #[test]
    fn quilisma_at_end_of_group() {
        let found = diags("(c4) A(g!w)");
        assert_eq!(count(&found, DiagnosticCode::QuilismaNoFollowingNote), 1);
        assert_eq!(count(&found, DiagnosticCode::QuilismaAscendingMotion), 0);
    }

    #[test]
    fn repeated_pitch_is_not_ascending() {
        let found = diags("(c4) A(g!wg)");
        assert_eq!(count(&found, DiagnosticCode::QuilismaAscendingMotion), 1);
    }

    #[test]
    fn large_ambitus_once_per_syllable() {
        let found = diags("(c4) A(cdklm) B(cd)");
        assert_eq!(count(&found, DiagnosticCode::LargeAmbitus), 1);
        assert!(diags("(c4) A(cj)").is_empty());
    }

    #[test]
    fn ambitus_ignores_clef_and_attributes() {
        assert!(diags("(c4) A(d[ll:1{m}]h)").is_empty());
    }

    #[test]
    fn first_syllable_line_break() {
        let found = diags("(c4) A(fz) B(gz)");
        assert_eq!(count(&found, DiagnosticCode::FirstSyllableLineBreak), 1);
        assert_eq!(found[0].severity, crate::diagnostic::Severity::Error);
        assert_eq!(found[0].message, "line break is not supported on the first syllable");
    }

    #[test]
    fn slash_run_is_one_marker() {
        let found = diags("(c4) A(f//g) B(g)");
        assert_eq!(count(&found, DiagnosticCode::FirstSyllableLineBreak), 1);
        assert_eq!(found[0].range.start.character, 8);
        assert_eq!(found[0].range.end.character, 10);

        let found = diags("(c4) A(f/[-1]g/0h)");
        assert_eq!(count(&found, DiagnosticCode::FirstSyllableLineBreak), 2);
        assert_eq!(found[0].range.end.character, 13);
        assert_eq!(found[1].range.end.character, 16);
    }

    #[test]
    fn custos_is_not_a_line_break() {
        assert!(diags("(c4) A(fz0)").is_empty());
    }

    #[test]
    fn clef_change_on_first_syllable() {
        let found = diags("A(c4 f c3 g)");
        assert_eq!(count(&found, DiagnosticCode::FirstSyllableClefChange), 1);
        assert!(diags("A(c4 fg)").is_empty());
    }

    #[test]
    fn elision_opening_first_syllable() {
        let found = diags("(c4) <e>A</e>men(f)");
        assert_eq!(count(&found, DiagnosticCode::FirstSyllableElision), 1);
        assert!(diags("(c4) A(f) <e>a</e>men(g)").is_empty());
    }

    #[test]
    fn style_conflicts_in_text() {
        let found = diags("(c4) <c>a</c><c>b</c>(f) <pr>x</pr><pr:1>y</pr>(g)");
        assert_eq!(count(&found, DiagnosticCode::MultipleCenterTags), 1);
        assert_eq!(count(&found, DiagnosticCode::MultipleProtrusions), 1);
        assert!(diags("(c4) <c>a</c>b(f)").is_empty());
    }

    #[test]
    fn quilisma_offsets_cover_pitch_and_marker() {
        let found = diags("(c4) A(gwf)");
        // "(c4) A(gwf)": 'g' at character 7, 'w' ends at 9
        assert_eq!(found[0].range.start.character, 7);
        assert_eq!(found[0].range.end.character, 9);
    }
}
