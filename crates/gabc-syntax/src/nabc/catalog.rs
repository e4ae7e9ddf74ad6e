//! Glyph and significant-letter tables of the gregorio nabc fonts.

use crate::context::FontFamily;

/// Basic glyphs of the St. Gall fonts (gregall, gresgmodern).
const ST_GALL_GLYPHS: &[&str] = &[
    "vi", "pu", "ta", "gr", "cl", "pe", "po", "to", "ci", "sc", "pf", "sf", "tr", "st", "ds",
    "ts", "tg", "bv", "tv", "pr", "pi", "vs", "or", "sa", "pq", "ql", "qi", "pt", "ni",
];

/// Basic glyphs of the Laon font (grelaon).
const LAON_GLYPHS: &[&str] = &[
    "vi", "pu", "un", "cl", "pe", "po", "to", "ci", "sc", "pf", "sf", "tr", "st", "ds", "ts",
    "tg", "bv", "tv", "pr", "pi", "vs", "or", "oc", "sa", "pq", "ql", "qi", "pt", "ni",
];

/// `ls` letters of the St. Gall tradition.
const ST_GALL_LETTERS: &[&str] = &[
    "a", "al", "am", "b", "c", "cm", "co", "cw", "d", "e", "eq", "ew", "fid", "fr", "g", "i",
    "im", "iv", "k", "l", "lb", "lc", "len", "lm", "lp", "lt", "m", "moll", "p", "par", "pfec",
    "pm", "pulcre", "s", "sb", "sc", "simil", "simul", "sm", "st", "sta", "t", "tb", "th", "tm",
    "tw", "v", "vol", "x",
];

/// `ls` letters of the Laon tradition.
const LAON_LETTERS: &[&str] = &[
    "a", "c", "eq", "h", "hn", "hp", "l", "m", "md", "n", "nl", "nt", "s", "simp", "simul",
    "sp", "st", "t",
];

/// `lt` Tironian notes (Laon only).
const TIRONIAN_LETTERS: &[&str] = &[
    "i", "do", "dr", "dx", "ps", "qm", "sb", "se", "sj", "sl", "sn", "sp", "sr", "st", "us",
];

const ALL_POSITIONS: &[u8] = &[1, 2, 3, 4, 5, 6, 7, 8, 9];
/// Position 5 (centred over the neume) is never available to Tironian notes.
const TIRONIAN_POSITIONS: &[u8] = &[1, 2, 3, 4, 6, 7, 8, 9];

/// Glyphs in the active font's catalog.
pub fn glyphs(font: FontFamily) -> &'static [&'static str] {
    if font.is_laon() {
        LAON_GLYPHS
    } else {
        ST_GALL_GLYPHS
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup {
    Known,
    /// In some font's catalog, but not the active one.
    OtherFont,
    Unknown,
}

pub fn lookup_glyph(code: &str, font: FontFamily) -> Lookup {
    if glyphs(font).contains(&code) {
        Lookup::Known
    } else if ST_GALL_GLYPHS.contains(&code) || LAON_GLYPHS.contains(&code) {
        Lookup::OtherFont
    } else {
        Lookup::Unknown
    }
}

/// `ls` (ordinary) or `lt` (Tironian) significant letter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LetterKind {
    Ordinary,
    Tironian,
}

impl LetterKind {
    pub fn prefix(&self) -> &'static str {
        match self {
            LetterKind::Ordinary => "ls",
            LetterKind::Tironian => "lt",
        }
    }

    pub fn positions(&self) -> &'static [u8] {
        match self {
            LetterKind::Ordinary => ALL_POSITIONS,
            LetterKind::Tironian => TIRONIAN_POSITIONS,
        }
    }
}

pub fn lookup_letter(kind: LetterKind, code: &str, font: FontFamily) -> Lookup {
    match kind {
        LetterKind::Tironian => match (TIRONIAN_LETTERS.contains(&code), font.is_laon()) {
            (true, true) => Lookup::Known,
            (true, false) => Lookup::OtherFont,
            (false, _) => Lookup::Unknown,
        },
        LetterKind::Ordinary => {
            let (own, other) = if font.is_laon() {
                (LAON_LETTERS, ST_GALL_LETTERS)
            } else {
                (ST_GALL_LETTERS, LAON_LETTERS)
            };
            if own.contains(&code) {
                Lookup::Known
            } else if other.contains(&code) {
                Lookup::OtherFont
            } else {
                Lookup::Unknown
            }
        }
    }
}

/// Subpunctis/prepunctis shape modifiers accepted by the font.
pub fn subpunctis_modifiers(font: FontFamily) -> &'static [char] {
    if font.is_laon() {
        &['n', 'q', 'z', 'x']
    } else {
        &['t', 'u', 'v', 'w', 'x', 'y']
    }
}
