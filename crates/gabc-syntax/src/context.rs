//! Per-document validation settings.
//!
//! Nothing here is global: every validation run receives its own
//! [`ValidationContext`], so concurrent runs over different documents never
//! share font or alternation state.

use crate::classify::SnippetKind;
use crate::model::Document;
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_STAFF_LINES: u8 = 4;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ContextError {
    #[error("unknown nabc font family: {0} (expected gregall, gresgmodern or grelaon)")]
    UnknownFont(String),
    #[error("nabc-lines must be a non-negative integer, got: {0}")]
    InvalidNabcLines(String),
    #[error("staff-lines must be an integer between 2 and 5, got: {0}")]
    InvalidStaffLines(String),
}

/// Neume font selecting the glyph and significant-letter catalogs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FontFamily {
    #[default]
    Gregall,
    Gresgmodern,
    Grelaon,
}

impl FontFamily {
    pub fn as_str(&self) -> &'static str {
        match self {
            FontFamily::Gregall => "gregall",
            FontFamily::Gresgmodern => "gresgmodern",
            FontFamily::Grelaon => "grelaon",
        }
    }

    /// Laon fonts use their own glyph, letter and subpunctis tables.
    pub fn is_laon(&self) -> bool {
        matches!(self, FontFamily::Grelaon)
    }
}

impl fmt::Display for FontFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FontFamily {
    type Err = ContextError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gregall" => Ok(FontFamily::Gregall),
            "gresgmodern" => Ok(FontFamily::Gresgmodern),
            "grelaon" => Ok(FontFamily::Grelaon),
            _ => Err(ContextError::UnknownFont(s.to_string())),
        }
    }
}

/// gabc/nabc alternation derived from the `nabc-lines` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AlternationConfig {
    pub enabled: bool,
    /// Snippets per nabc run; 0 means alternation is forbidden.
    pub period: u32,
}

impl AlternationConfig {
    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn with_period(period: u32) -> Self {
        Self {
            enabled: period > 0,
            period,
        }
    }

    /// Parse a `nabc-lines` value; a trailing `;` is tolerated.
    pub fn parse(value: &str) -> Result<Self, ContextError> {
        let v = value.trim().trim_end_matches(';').trim();
        v.parse::<u32>()
            .map(Self::with_period)
            .map_err(|_| ContextError::InvalidNabcLines(value.to_string()))
    }

    /// Kind a snippet at `index` must have.
    ///
    /// Snippet 0 is always gabc. After it, nabc and gabc runs of `period`
    /// snippets alternate, nabc first.
    pub fn expected_kind(&self, index: usize) -> SnippetKind {
        if self.period == 0 || index == 0 {
            return SnippetKind::Gabc;
        }
        let block = (index - 1) / self.period as usize;
        if block % 2 == 0 {
            SnippetKind::Nabc
        } else {
            SnippetKind::Gabc
        }
    }
}

pub fn parse_staff_lines(value: &str) -> Result<u8, ContextError> {
    let v = value.trim().trim_end_matches(';').trim();
    match v.parse::<u8>() {
        Ok(n @ 2..=5) => Ok(n),
        _ => Err(ContextError::InvalidStaffLines(value.to_string())),
    }
}

/// Everything a validation pass needs beyond the document itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationContext {
    pub font: FontFamily,
    pub alternation: AlternationConfig,
    pub staff_lines: u8,
}

impl Default for ValidationContext {
    fn default() -> Self {
        Self {
            font: FontFamily::default(),
            alternation: AlternationConfig::disabled(),
            staff_lines: DEFAULT_STAFF_LINES,
        }
    }
}

impl ValidationContext {
    /// Derive alternation and staff settings from the document headers.
    ///
    /// Malformed header values fall back to defaults here; the header
    /// validator reports them.
    pub fn for_document(doc: &Document, font: FontFamily) -> Self {
        let alternation = doc
            .header("nabc-lines")
            .and_then(|h| AlternationConfig::parse(&h.value).ok())
            .unwrap_or_default();
        let staff_lines = doc
            .header("staff-lines")
            .and_then(|h| parse_staff_lines(&h.value).ok())
            .unwrap_or(DEFAULT_STAFF_LINES);
        Self {
            font,
            alternation,
            staff_lines,
        }
    }

    /// Font to validate with: an explicit choice wins, then the
    /// `nabc-font` header, then [`FontFamily::Gregall`].
    pub fn resolve_font(doc: &Document, requested: Option<FontFamily>) -> FontFamily {
        if let Some(font) = requested {
            return font;
        }
        match doc.header("nabc-font").map(|h| h.value.parse::<FontFamily>()) {
            Some(Ok(font)) => font,
            Some(Err(e)) => {
                tracing::warn!(error = %e, "ignoring nabc-font header");
                FontFamily::default()
            }
            None => FontFamily::default(),
        }
    }

    pub fn with_alternation(mut self, alternation: AlternationConfig) -> Self {
        self.alternation = alternation;
        self
    }
}
