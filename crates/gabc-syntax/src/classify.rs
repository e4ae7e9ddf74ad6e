//! Heuristic gabc/nabc typing of snippets.
//!
//! There is no grammar deciding whether a snippet is nabc; instead an
//! ordered table of recognisers, each matching something ordinary gabc
//! never contains. Letter-run recognisers ignore runs made only of gabc
//! letters, so pitch/shape sequences such as `gwh` or `ce` never count.
//! Attribute bodies (`[ob:1;6mm]`) and clefs are masked before matching.

use crate::gabc;
use regex::Regex;
use std::sync::LazyLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SnippetKind {
    Gabc,
    Nabc,
    /// Empty or whitespace-only; satisfies any expectation.
    Neutral,
}

impl SnippetKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SnippetKind::Gabc => "gabc",
            SnippetKind::Nabc => "nabc",
            SnippetKind::Neutral => "empty",
        }
    }
}

/// One recogniser of the classification table.
pub struct NabcPattern {
    pub name: &'static str,
    pub description: &'static str,
    matcher: fn(&str) -> bool,
}

impl NabcPattern {
    pub fn matches(&self, snippet: &str) -> bool {
        (self.matcher)(snippet)
    }
}

// -- Regex patterns -----------------------------------------------------------

static RE_LETTERS_DIGIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([A-Za-z]{3,})[0-9]").unwrap());

static RE_PREPUNCTIS_COUNT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Za-z]{2,}pt[0-9]").unwrap());

static RE_SIGNIFICANT_LETTER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"l[st][a-z]+[0-9]").unwrap());

static RE_G_GLYPH_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"g[a-z]{2,}").unwrap());

static RE_STANDALONE_NEUME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(?:un|ta|vi)\b").unwrap());

// -- Recognisers --------------------------------------------------------------

fn is_gabc_run(run: &str) -> bool {
    run.chars().all(gabc::is_gabc_letter)
}

fn letters_then_digit(s: &str) -> bool {
    RE_LETTERS_DIGIT
        .captures_iter(s)
        .filter_map(|c| c.get(1))
        .any(|run| !is_gabc_run(run.as_str()))
}

fn prepunctis_count(s: &str) -> bool {
    RE_PREPUNCTIS_COUNT.is_match(s)
}

fn significant_letter(s: &str) -> bool {
    RE_SIGNIFICANT_LETTER.is_match(s)
}

fn digit_then_letter(s: &str) -> bool {
    let b = s.as_bytes();
    (1..b.len()).any(|i| {
        b[i - 1].is_ascii_digit() && b[i].is_ascii_alphabetic() && !is_gabc_digit(b, i - 1)
    })
}

/// Digits gabc itself writes: shape suffixes (`_0`, `'1`, `.1`, `r1`, `z0`,
/// `o1`), spacing (`/0`) and clef lines (`c4`, `cb3`).
fn is_gabc_digit(b: &[u8], d: usize) -> bool {
    if d == 0 {
        return false;
    }
    if matches!(
        b[d - 1],
        b'_' | b'\'' | b'.' | b'r' | b'o' | b'/' | b'z' | b'Z' | b'~' | b'>' | b'<'
    ) {
        return true;
    }
    let mut k = d;
    if b[k - 1] == b'b' {
        k -= 1;
    }
    k >= 1
        && matches!(b[k - 1], b'c' | b'f')
        && (k == 1 || matches!(b[k - 2], b' ' | b'\t' | b'\r' | b'\n' | b'@'))
}

fn g_glyph_run(s: &str) -> bool {
    RE_G_GLYPH_RUN
        .find_iter(s)
        .any(|run| !is_gabc_run(run.as_str()))
}

fn doubled_backtick(s: &str) -> bool {
    s.contains("``")
}

fn standalone_neume(s: &str) -> bool {
    RE_STANDALONE_NEUME.is_match(s)
}

/// Recognisers in precedence order; the first match names the reason.
pub static NABC_PATTERNS: &[NabcPattern] = &[
    NabcPattern {
        name: "letters-then-digit",
        description: "alphabetic run of 3+ letters (not all gabc letters) followed by a digit",
        matcher: letters_then_digit,
    },
    NabcPattern {
        name: "prepunctis-count",
        description: "2+ letters followed by `pt` and a digit",
        matcher: prepunctis_count,
    },
    NabcPattern {
        name: "significant-letter",
        description: "`ls`/`lt` letter group with trailing position digit",
        matcher: significant_letter,
    },
    NabcPattern {
        name: "digit-then-letter",
        description: "digit immediately followed by a letter, outside gabc suffixes and clefs",
        matcher: digit_then_letter,
    },
    NabcPattern {
        name: "g-glyph-run",
        description: "3+ lowercase letters starting with `g`, not all gabc letters",
        matcher: g_glyph_run,
    },
    NabcPattern {
        name: "doubled-backtick",
        description: "nabc large negative spacing ``` `` ```",
        matcher: doubled_backtick,
    },
    NabcPattern {
        name: "standalone-neume",
        description: "standalone `un`, `ta` or `vi`",
        matcher: standalone_neume,
    },
];

/// First recogniser matching `snippet`, if any.
pub fn matching_pattern(snippet: &str) -> Option<&'static NabcPattern> {
    if snippet.trim().is_empty() {
        return None;
    }
    let masked = gabc::mask_non_notes(snippet);
    NABC_PATTERNS.iter().find(|p| p.matches(&masked))
}

pub fn classify(snippet: &str) -> SnippetKind {
    if snippet.trim().is_empty() {
        SnippetKind::Neutral
    } else if let Some(pattern) = matching_pattern(snippet) {
        tracing::trace!(snippet, pattern = pattern.name, reason = pattern.description, "looks like nabc");
        SnippetKind::Nabc
    } else {
        SnippetKind::Gabc
    }
}
