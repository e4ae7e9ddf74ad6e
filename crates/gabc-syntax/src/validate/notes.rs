//! gabc note syntax: pitch range, clef lines, stray characters.

use super::gabc_snippets;
use crate::context::ValidationContext;
use crate::diagnostic::{messages, Diagnostic, DiagnosticCode};
use crate::gabc;
use crate::model::Document;

pub fn check(doc: &Document, ctx: &ValidationContext) -> Vec<Diagnostic> {
    let mut out = Vec::new();
    let highest = gabc::highest_pitch(ctx.staff_lines);

    for music in doc.syllables.iter().filter_map(|s| s.music.as_ref()) {
        for snippet in gabc_snippets(music, &ctx.alternation) {
            for clef in gabc::clefs(snippet.content) {
                if clef.line == 0 || clef.line > u32::from(ctx.staff_lines) {
                    out.push(Diagnostic::error(
                        DiagnosticCode::InvalidClefLine,
                        doc.range(snippet.span.slice(clef.offset, clef.offset + clef.len)),
                        messages::invalid_clef_line(ctx.staff_lines, clef.line),
                    ));
                }
            }

            for note in gabc::notes(snippet.content) {
                if note.value > highest {
                    out.push(Diagnostic::error(
                        DiagnosticCode::InvalidPitch,
                        doc.range(snippet.span.slice(note.offset, note.offset + 1)),
                        messages::invalid_pitch(ctx.staff_lines, note.letter),
                    ));
                }
            }

            let masked = gabc::mask_non_notes(snippet.content);
            for (offset, c) in masked.char_indices() {
                if !gabc::is_gabc_char(c) {
                    out.push(Diagnostic::error(
                        DiagnosticCode::UnknownCharacter,
                        doc.range(snippet.span.slice(offset, offset + c.len_utf8())),
                        format!("unknown character in gabc: '{}'", c),
                    ));
                }
            }
        }
    }

    out
}
