//! Diagnostic records produced by the validation passes.
//!
//! Program logic only ever inspects [`DiagnosticCode`]; message text is for
//! humans, except for the subset in [`messages`] that must match the gregorio
//! compiler byte for byte.

use crate::position::Range;
use serde::{Serialize, Serializer};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Information,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Information => "info",
        })
    }
}

/// Stable machine-readable identifier of a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticCode {
    // headers
    MissingName,
    DuplicateHeader,
    MissingBodySeparator,
    InvalidNabcLines,
    InvalidStaffLines,
    // syllable structure
    EmptySyllable,
    TextWithoutMusic,
    // gabc notes
    InvalidPitch,
    InvalidClefLine,
    UnknownCharacter,
    // alternation
    InvalidPipeWithoutNabc,
    NabcInGabcOnlyMode,
    AlternationViolation,
    // tags
    UnclosedTag,
    UnmatchedClosingTag,
    // nabc grammar
    UnknownGlyph,
    FontIncompatibility,
    UnusualLiquescence,
    ExcessiveModifiers,
    ExcessiveSpacing,
    ExcessiveSubpunctis,
    InvalidSubpunctisModifier,
    UnknownSignificantLetter,
    InvalidLetterPosition,
    DuplicateLetterPosition,
    CompoundWithoutPitch,
    LiquescenceWithEpisema,
    // rendering rules
    GlyphBreakSuggestion,
    QuilismaNoFollowingNote,
    QuilismaAscendingMotion,
    LargeAmbitus,
    FirstSyllableLineBreak,
    FirstSyllableClefChange,
    FirstSyllableElision,
    MultipleCenterTags,
    MultipleProtrusions,
}

impl DiagnosticCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiagnosticCode::MissingName => "missing_name",
            DiagnosticCode::DuplicateHeader => "duplicate_header",
            DiagnosticCode::MissingBodySeparator => "missing_body_separator",
            DiagnosticCode::InvalidNabcLines => "invalid_nabc_lines",
            DiagnosticCode::InvalidStaffLines => "invalid_staff_lines",
            DiagnosticCode::EmptySyllable => "empty_syllable",
            DiagnosticCode::TextWithoutMusic => "text_without_music",
            DiagnosticCode::InvalidPitch => "invalid_pitch",
            DiagnosticCode::InvalidClefLine => "invalid_clef_line",
            DiagnosticCode::UnknownCharacter => "unknown_character",
            DiagnosticCode::InvalidPipeWithoutNabc => "invalid_pipe_without_nabc",
            DiagnosticCode::NabcInGabcOnlyMode => "nabc_in_gabc_only_mode",
            DiagnosticCode::AlternationViolation => "alternation_violation",
            DiagnosticCode::UnclosedTag => "unclosed_tag",
            DiagnosticCode::UnmatchedClosingTag => "unmatched_closing_tag",
            DiagnosticCode::UnknownGlyph => "unknown_glyph",
            DiagnosticCode::FontIncompatibility => "font_incompatibility",
            DiagnosticCode::UnusualLiquescence => "unusual_liquescence",
            DiagnosticCode::ExcessiveModifiers => "excessive_modifiers",
            DiagnosticCode::ExcessiveSpacing => "excessive_spacing",
            DiagnosticCode::ExcessiveSubpunctis => "excessive_subpunctis",
            DiagnosticCode::InvalidSubpunctisModifier => "invalid_subpunctis_modifier",
            DiagnosticCode::UnknownSignificantLetter => "unknown_significant_letter",
            DiagnosticCode::InvalidLetterPosition => "invalid_letter_position",
            DiagnosticCode::DuplicateLetterPosition => "duplicate_letter_position",
            DiagnosticCode::CompoundWithoutPitch => "compound_without_pitch",
            DiagnosticCode::LiquescenceWithEpisema => "liquescence_with_episema",
            DiagnosticCode::GlyphBreakSuggestion => "glyph_break_suggestion",
            DiagnosticCode::QuilismaNoFollowingNote => "quilisma-no-following-note",
            DiagnosticCode::QuilismaAscendingMotion => "quilisma-ascending-motion",
            DiagnosticCode::LargeAmbitus => "large_ambitus",
            DiagnosticCode::FirstSyllableLineBreak => "first_syllable_line_break",
            DiagnosticCode::FirstSyllableClefChange => "first_syllable_clef_change",
            DiagnosticCode::FirstSyllableElision => "first_syllable_elision",
            DiagnosticCode::MultipleCenterTags => "multiple_center_tags",
            DiagnosticCode::MultipleProtrusions => "multiple_protrusions",
        }
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for DiagnosticCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub range: Range,
    pub severity: Severity,
    pub code: DiagnosticCode,
    pub message: String,
}

impl Diagnostic {
    pub fn new(
        severity: Severity,
        code: DiagnosticCode,
        range: Range,
        message: impl Into<String>,
    ) -> Self {
        Self {
            range,
            severity,
            code,
            message: message.into(),
        }
    }

    pub fn error(code: DiagnosticCode, range: Range, message: impl Into<String>) -> Self {
        Self::new(Severity::Error, code, range, message)
    }

    pub fn warning(code: DiagnosticCode, range: Range, message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, code, range, message)
    }

    pub fn info(code: DiagnosticCode, range: Range, message: impl Into<String>) -> Self {
        Self::new(Severity::Information, code, range, message)
    }
}

/// Messages that must stay identical to the gregorio compiler's output.
pub mod messages {
    pub const PIPE_WITHOUT_NABC_LINES: &str = "You used character \"|\" in gabc without setting \"nabc-lines\" parameter. Please set it in your gabc header.";

    pub const MISSING_NAME: &str = "no name specified, put `name:...' at the beginning of the file, can be dangerous with some output formats";

    pub fn duplicate_header(name: &str) -> String {
        format!(
            "several {} definitions found, only the last will be taken into consideration",
            name
        )
    }

    pub fn unclosed_tag(name: &str) -> String {
        format!("unclosed tag: <{}>", name)
    }

    pub fn unmatched_closing_tag(name: &str) -> String {
        format!("unmatched closing tag: </{}>", name)
    }

    pub fn invalid_pitch(lines: u8, pitch: char) -> String {
        format!("invalid pitch for {} lines: {}", lines, pitch)
    }

    pub fn invalid_clef_line(lines: u8, line: u32) -> String {
        format!("invalid clef line for {} lines: {}", lines, line)
    }
}
