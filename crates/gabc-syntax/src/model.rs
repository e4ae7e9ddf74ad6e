//! Data model for a parsed gabc score.

use crate::parser;
use crate::position::{LineIndex, Range, Span};

/// Complete parsed score: header fields plus the syllables of the body.
#[derive(Debug, Default)]
pub struct Document {
    source: String,
    line_index: LineIndex,
    /// Header fields in source order; duplicates kept.
    pub headers: Vec<HeaderField>,
    /// Byte offset where the body begins (just past the `%%` line).
    pub body_offset: usize,
    /// Whether a `%%` line was found at all.
    pub has_separator: bool,
    pub syllables: Vec<Syllable>,
}

impl Document {
    pub fn parse(text: &str) -> Self {
        let split = parser::header::split(text);
        let syllables = parser::syllable::tokenize(text, split.body_offset);
        Self {
            source: text.to_string(),
            line_index: LineIndex::new(text),
            headers: split.headers,
            body_offset: split.body_offset,
            has_separator: split.has_separator,
            syllables,
        }
    }

    /// Last definition of a header (gregorio keeps the last one).
    pub fn header(&self, name: &str) -> Option<&HeaderField> {
        self.headers.iter().rev().find(|h| h.is(name))
    }

    pub fn range(&self, span: Span) -> Range {
        self.line_index.range(&self.source, span)
    }
}

/// One `key: value;` header entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderField {
    /// Key as written in the source.
    pub name: String,
    /// Trimmed value with its `;`/`;;` terminator removed.
    pub value: String,
    pub span: Span,
}

impl HeaderField {
    /// Case-insensitive key comparison.
    pub fn is(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }
}

/// Lyric text preceding a music group (trimmed, never empty).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextElement {
    pub content: String,
    pub span: Span,
}

/// Interior of one parenthesized music group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MusicElement {
    pub content: String,
    /// Span of the interior, parentheses excluded.
    pub span: Span,
}

impl MusicElement {
    /// True when the group multiplexes nabc snippets through `|`.
    pub fn is_nabc_bearing(&self) -> bool {
        self.content.contains('|')
    }

    pub fn snippets(&self) -> Vec<Snippet<'_>> {
        parser::snippet::split(&self.content, self.span.start)
    }
}

/// `text(music)` unit of the body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Syllable {
    pub text: Option<TextElement>,
    pub music: Option<MusicElement>,
    pub span: Span,
}

impl Syllable {
    pub fn is_empty(&self) -> bool {
        self.text.is_none() && self.music.is_none()
    }
}

/// One `|`-delimited fragment of a music group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Snippet<'a> {
    /// Zero-based position within the group.
    pub index: usize,
    pub content: &'a str,
    pub span: Span,
}
