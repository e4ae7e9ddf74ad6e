//! Note-level scanning of gabc snippets: pitches, clefs, attributes.

use regex::Regex;
use std::sync::LazyLock;

/// Clef at snippet start or after whitespace / `@`: letter, optional flat, line.
static RE_CLEF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|[[:space:]@])([cf]b?)([0-9])").unwrap());

/// Lowercase letters that may appear in gabc music (no `t`, no `u`).
pub const GABC_LOWERCASE: &str = "abcdefghijklmnopqrsvwxyz";
/// Uppercase letters that may appear in gabc music.
pub const GABC_UPPERCASE: &str = "ABCDEFGHIJKLMNOPRSVWZ";
/// Punctuation gabc uses for bars, spacing, episemata and the like.
const GABC_PUNCTUATION: &str = ",;:`'_.~<>/!@[]{}#*+-=$?^";

/// Value of a pitch letter: `a`=0 … `n`=13, `p`=14. Uppercase letters
/// (punctum inclinatum) share the value of their lowercase form.
pub fn pitch_value(c: char) -> Option<u8> {
    match c.to_ascii_lowercase() {
        p @ 'a'..='n' => Some(p as u8 - b'a'),
        'p' => Some(14),
        _ => None,
    }
}

/// Highest pitch value representable on a staff with `lines` lines.
pub fn highest_pitch(lines: u8) -> u8 {
    2 * lines + 4
}

pub fn is_gabc_letter(c: char) -> bool {
    GABC_LOWERCASE.contains(c) || GABC_UPPERCASE.contains(c)
}

pub fn is_gabc_char(c: char) -> bool {
    c.is_ascii_digit() || c.is_whitespace() || is_gabc_letter(c) || GABC_PUNCTUATION.contains(c)
}

/// A clef token such as `c4` or `cb3`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Clef {
    /// Byte offset of the clef letter in the scanned content.
    pub offset: usize,
    pub len: usize,
    pub line: u32,
}

pub fn clefs(content: &str) -> Vec<Clef> {
    RE_CLEF
        .captures_iter(content)
        .filter_map(|caps| {
            let key = caps.get(1)?;
            let line = caps.get(2)?;
            Some(Clef {
                offset: key.start(),
                len: line.end() - key.start(),
                line: line.as_str().parse().ok()?,
            })
        })
        .collect()
}

/// Replace `[...]` attribute bodies and clef tokens with spaces so that
/// letters inside them are not mistaken for notes. Offsets are preserved.
pub fn mask_non_notes(content: &str) -> String {
    let mut bytes: Vec<u8> = content.bytes().collect();
    let mut depth = 0usize;
    for b in bytes.iter_mut() {
        match *b {
            b'[' => {
                depth += 1;
                *b = b' ';
            }
            b']' if depth > 0 => {
                depth -= 1;
                *b = b' ';
            }
            _ if depth > 0 => *b = b' ',
            _ => {}
        }
    }
    for clef in clefs(content) {
        for b in &mut bytes[clef.offset..clef.offset + clef.len] {
            *b = b' ';
        }
    }
    // Only ASCII bytes were rewritten, to ASCII; the rest is untouched
    String::from_utf8(bytes).unwrap_or_else(|e| String::from_utf8_lossy(e.as_bytes()).into_owned())
}

/// A pitch letter found in gabc content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Note {
    pub offset: usize,
    pub letter: char,
    pub value: u8,
}

/// Pitch letters of `content`, skipping attributes and clefs.
pub fn notes(content: &str) -> Vec<Note> {
    let masked = mask_non_notes(content);
    masked
        .char_indices()
        .filter_map(|(offset, letter)| {
            pitch_value(letter).map(|value| Note {
                offset,
                letter,
                value,
            })
        })
        .collect()
}
