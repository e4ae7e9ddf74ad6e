//! nabc neume descriptor validation against the active font's catalog.

use super::typed_snippets;
use crate::context::ValidationContext;
use crate::diagnostic::{Diagnostic, DiagnosticCode};
use crate::model::{Document, Snippet};
use crate::nabc::catalog::{self, LetterKind, Lookup};
use crate::nabc::{self, ComplexGlyph};
use crate::position::Span;

/// Glyphs that take a diminutive liquescence (`~`) without remark.
const DIMINUTIVE_BASES: &[&str] = &["cl", "po", "tr"];
const MAX_SPACING: usize = 3;
const MAX_MODIFIERS: usize = 4;
const MAX_PUNCTIS: u32 = 10;

pub fn check(doc: &Document, ctx: &ValidationContext) -> Vec<Diagnostic> {
    let mut out = Vec::new();
    for music in doc.syllables.iter().filter_map(|s| s.music.as_ref()) {
        for typed in typed_snippets(music, &ctx.alternation) {
            if typed.is_nabc() {
                check_snippet(doc, ctx, &typed.snippet, &mut out);
            }
        }
    }
    out
}

/// Validate one nabc snippet, appending to `out`.
pub fn check_snippet(
    doc: &Document,
    ctx: &ValidationContext,
    snippet: &Snippet<'_>,
    out: &mut Vec<Diagnostic>,
) {
    let parsed = nabc::parse(snippet.content);
    let at = |span: Span| doc.range(snippet.span.slice(span.start, span.end));

    for glyph in &parsed.glyphs {
        check_spacing(glyph, &at, out);
        check_components(glyph, ctx, &at, out);
        check_modifiers(glyph, &at, out);
        check_pitch(glyph, &at, out);
        check_punctis(glyph, ctx, &at, out);
        check_letters(glyph, ctx, &at, out);
        check_combinations(glyph, &at, out);
    }

    let trailing = &parsed.trailing_spacing;
    if trailing.len() > MAX_SPACING {
        out.push(Diagnostic::warning(
            DiagnosticCode::ExcessiveSpacing,
            at(Span::new(trailing[0].span.start, trailing[trailing.len() - 1].span.end)),
            format!("{} consecutive spacing marks at end of snippet", trailing.len()),
        ));
    }
}

fn check_spacing(
    glyph: &ComplexGlyph,
    at: &impl Fn(Span) -> crate::position::Range,
    out: &mut Vec<Diagnostic>,
) {
    if glyph.spacing.len() > MAX_SPACING {
        let span = Span::new(
            glyph.spacing[0].span.start,
            glyph.spacing[glyph.spacing.len() - 1].span.end,
        );
        out.push(Diagnostic::warning(
            DiagnosticCode::ExcessiveSpacing,
            at(span),
            format!(
                "{} consecutive spacing marks before one neume",
                glyph.spacing.len()
            ),
        ));
    }
}

fn check_components(
    glyph: &ComplexGlyph,
    ctx: &ValidationContext,
    at: &impl Fn(Span) -> crate::position::Range,
    out: &mut Vec<Diagnostic>,
) {
    for component in &glyph.components {
        match catalog::lookup_glyph(&component.code, ctx.font) {
            Lookup::Known => {}
            Lookup::OtherFont => out.push(Diagnostic::error(
                DiagnosticCode::FontIncompatibility,
                at(component.span),
                format!(
                    "nabc glyph '{}' is not available in font {}",
                    component.code, ctx.font
                ),
            )),
            Lookup::Unknown => out.push(Diagnostic::error(
                DiagnosticCode::UnknownGlyph,
                at(component.span),
                format!("unknown nabc glyph '{}'", component.code),
            )),
        }
    }
}

fn check_modifiers(
    glyph: &ComplexGlyph,
    at: &impl Fn(Span) -> crate::position::Range,
    out: &mut Vec<Diagnostic>,
) {
    let base = glyph.base().unwrap_or_default();
    for modifier in &glyph.modifiers {
        if modifier.symbol == '~' && !DIMINUTIVE_BASES.contains(&base) {
            out.push(Diagnostic::warning(
                DiagnosticCode::UnusualLiquescence,
                at(modifier.span),
                format!("diminutive liquescence '~' is unusual on glyph '{}'", base),
            ));
        }
    }
    if glyph.modifiers.len() > MAX_MODIFIERS {
        let first = &glyph.modifiers[0];
        let last = &glyph.modifiers[glyph.modifiers.len() - 1];
        out.push(Diagnostic::warning(
            DiagnosticCode::ExcessiveModifiers,
            at(Span::new(first.span.start, last.span.end)),
            format!("{} modifiers on glyph '{}'", glyph.modifiers.len(), base),
        ));
    }
}

fn check_pitch(
    glyph: &ComplexGlyph,
    at: &impl Fn(Span) -> crate::position::Range,
    out: &mut Vec<Diagnostic>,
) {
    if let Some(pitch) = glyph.pitch.as_ref().filter(|p| !p.is_valid()) {
        out.push(Diagnostic::error(
            DiagnosticCode::InvalidPitch,
            at(pitch.span),
            format!(
                "invalid nabc pitch descriptor '{}': expected 'h' followed by a-n or p",
                pitch.text()
            ),
        ));
    }
}

fn check_punctis(
    glyph: &ComplexGlyph,
    ctx: &ValidationContext,
    at: &impl Fn(Span) -> crate::position::Range,
    out: &mut Vec<Diagnostic>,
) {
    let allowed = catalog::subpunctis_modifiers(ctx.font);
    for punctis in &glyph.punctis {
        if let Some(m) = punctis.modifier.filter(|m| !allowed.contains(m)) {
            out.push(Diagnostic::error(
                DiagnosticCode::InvalidSubpunctisModifier,
                at(punctis.span),
                format!(
                    "'{}' modifier '{}' is not valid for font {} (expected one of: {})",
                    punctis.kind.prefix(),
                    m,
                    ctx.font,
                    allowed.iter().collect::<String>()
                ),
            ));
        }
        if punctis.count > MAX_PUNCTIS {
            out.push(Diagnostic::warning(
                DiagnosticCode::ExcessiveSubpunctis,
                at(punctis.span),
                format!(
                    "{} {} points is more than {}",
                    punctis.count,
                    punctis.kind.prefix(),
                    MAX_PUNCTIS
                ),
            ));
        }
    }
}

fn check_letters(
    glyph: &ComplexGlyph,
    ctx: &ValidationContext,
    at: &impl Fn(Span) -> crate::position::Range,
    out: &mut Vec<Diagnostic>,
) {
    let mut positions: Vec<u8> = Vec::new();
    for letter in &glyph.letters {
        let written = format!("{}{}{}", letter.kind.prefix(), letter.code, letter.position);
        match catalog::lookup_letter(letter.kind, &letter.code, ctx.font) {
            Lookup::Known => {}
            Lookup::OtherFont => {
                let reason = match letter.kind {
                    LetterKind::Tironian => "Tironian notes are only available in font grelaon",
                    LetterKind::Ordinary => "letter belongs to the other neume tradition",
                };
                out.push(Diagnostic::error(
                    DiagnosticCode::FontIncompatibility,
                    at(letter.span),
                    format!(
                        "significant letter '{}' is not valid for font {}: {}",
                        written, ctx.font, reason
                    ),
                ));
            }
            Lookup::Unknown => out.push(Diagnostic::error(
                DiagnosticCode::UnknownSignificantLetter,
                at(letter.span),
                format!("unknown significant letter '{}'", written),
            )),
        }

        if !letter.kind.positions().contains(&letter.position) {
            out.push(Diagnostic::error(
                DiagnosticCode::InvalidLetterPosition,
                at(letter.span),
                format!(
                    "invalid position {} for significant letter '{}'",
                    letter.position, written
                ),
            ));
        } else if positions.contains(&letter.position) {
            out.push(Diagnostic::warning(
                DiagnosticCode::DuplicateLetterPosition,
                at(letter.span),
                format!(
                    "position {} is already taken by another significant letter",
                    letter.position
                ),
            ));
        } else {
            positions.push(letter.position);
        }
    }
}

fn check_combinations(
    glyph: &ComplexGlyph,
    at: &impl Fn(Span) -> crate::position::Range,
    out: &mut Vec<Diagnostic>,
) {
    if glyph.is_compound() && glyph.pitch.is_none() {
        out.push(Diagnostic::warning(
            DiagnosticCode::CompoundWithoutPitch,
            at(glyph.span),
            "compound neume without pitch descriptor (h + letter)",
        ));
    }
    let liquescent = glyph.modifiers.iter().any(|m| m.is_liquescence());
    let episema = glyph.modifiers.iter().any(|m| m.is_episema());
    if liquescent && episema {
        out.push(Diagnostic::info(
            DiagnosticCode::LiquescenceWithEpisema,
            at(glyph.span),
            "liquescence combined with an episema on the same neume",
        ));
    }
}
