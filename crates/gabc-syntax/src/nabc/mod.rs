//! nabc neume descriptors: grammar and catalog.
//!
//! ```text
//! snippet    := (spacing* neume)+ spacing*
//! spacing    := '//' | '/' | '``' | '`'
//! neume      := component ('!' component)* modifier* pitch? punctis* letter*
//! component  := [a-z]{2}
//! modifier   := [SGM\-><~] [0-9]*
//! pitch      := 'h' [a-np]
//! punctis    := ('su' | 'pp') [a-z]? [0-9]+
//! letter     := ('ls' | 'lt') [a-z]+ [0-9]
//! ```
//!
//! The parser never fails. A malformed pitch is kept (for the validator to
//! report); any other byte it cannot place is recorded in
//! [`NabcSnippet::skipped`] and passed over.

pub mod catalog;

use crate::position::Span;
use catalog::LetterKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpacingKind {
    /// `/`
    Small,
    /// `//`
    Large,
    /// `` ` ``
    NegativeSmall,
    /// ``` `` ```
    NegativeLarge,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Spacing {
    pub kind: SpacingKind,
    pub span: Span,
}

/// Two-letter basic glyph code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Component {
    pub code: String,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Modifier {
    /// One of `S G M - > ~`.
    pub symbol: char,
    pub variant: Option<u32>,
    pub span: Span,
}

impl Modifier {
    /// `>` augmentive or `~` diminutive liquescence.
    pub fn is_liquescence(&self) -> bool {
        matches!(self.symbol, '>' | '~')
    }

    pub fn is_episema(&self) -> bool {
        self.symbol == '-'
    }
}

/// `h` followed by a pitch letter; `letter` is whatever followed the `h`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pitch {
    pub letter: Option<char>,
    pub span: Span,
}

impl Pitch {
    pub fn is_valid(&self) -> bool {
        matches!(self.letter, Some('a'..='n' | 'p'))
    }

    pub fn text(&self) -> String {
        match self.letter {
            Some(c) => format!("h{}", c),
            None => "h".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PunctisKind {
    /// `su`
    Subpunctis,
    /// `pp`
    Prepunctis,
}

impl PunctisKind {
    pub fn prefix(&self) -> &'static str {
        match self {
            PunctisKind::Subpunctis => "su",
            PunctisKind::Prepunctis => "pp",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Punctis {
    pub kind: PunctisKind,
    pub modifier: Option<char>,
    pub count: u32,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignificantLetter {
    pub kind: LetterKind,
    pub code: String,
    /// Placement digit; only 1–9 are meaningful.
    pub position: u8,
    pub span: Span,
}

/// One neume: compound glyph plus its modifiers and annotations.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ComplexGlyph {
    /// Spacing tokens written directly before the neume.
    pub spacing: Vec<Spacing>,
    pub components: Vec<Component>,
    pub modifiers: Vec<Modifier>,
    pub pitch: Option<Pitch>,
    pub punctis: Vec<Punctis>,
    pub letters: Vec<SignificantLetter>,
    pub span: Span,
}

impl ComplexGlyph {
    pub fn is_compound(&self) -> bool {
        self.components.len() > 1
    }

    pub fn base(&self) -> Option<&str> {
        self.components.first().map(|c| c.code.as_str())
    }
}

/// Parsed snippet. Spans are relative to the snippet start.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NabcSnippet {
    pub glyphs: Vec<ComplexGlyph>,
    pub trailing_spacing: Vec<Spacing>,
    pub skipped: Vec<Span>,
}

pub fn parse(snippet: &str) -> NabcSnippet {
    let mut parser = Parser {
        src: snippet,
        bytes: snippet.as_bytes(),
        pos: 0,
    };
    let mut out = NabcSnippet::default();
    let mut pending = Vec::new();

    while !parser.at_end() {
        while let Some(sp) = parser.spacing() {
            pending.push(sp);
        }
        if parser.at_end() {
            break;
        }
        if parser.peek().is_ascii_whitespace() {
            parser.pos += 1;
            continue;
        }
        match parser.glyph() {
            Some(mut glyph) => {
                glyph.spacing = std::mem::take(&mut pending);
                out.glyphs.push(glyph);
            }
            None => {
                let span = parser.skip_char();
                tracing::trace!(?span, snippet, "skipping uninterpretable nabc fragment");
                out.skipped.push(span);
            }
        }
    }
    out.trailing_spacing = pending;
    out
}

struct Parser<'a> {
    src: &'a str,
    bytes: &'a [u8],
    pos: usize,
}

impl Parser<'_> {
    fn at_end(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    fn peek(&self) -> u8 {
        self.peek_at(0)
    }

    fn peek_at(&self, n: usize) -> u8 {
        self.bytes.get(self.pos + n).copied().unwrap_or(0)
    }

    fn starts_with(&self, s: &str) -> bool {
        self.bytes[self.pos..].starts_with(s.as_bytes())
    }

    fn skip_char(&mut self) -> Span {
        let start = self.pos;
        let len = self
            .src
            .get(self.pos..)
            .and_then(|s| s.chars().next())
            .map_or(1, char::len_utf8);
        self.pos += len;
        Span::new(start, self.pos)
    }

    fn digits(&mut self) -> Option<u32> {
        let start = self.pos;
        while self.peek().is_ascii_digit() {
            self.pos += 1;
        }
        (self.pos > start).then(|| self.src[start..self.pos].parse().unwrap_or(u32::MAX))
    }

    fn spacing(&mut self) -> Option<Spacing> {
        let start = self.pos;
        let kind = if self.starts_with("//") {
            SpacingKind::Large
        } else if self.starts_with("/") {
            SpacingKind::Small
        } else if self.starts_with("``") {
            SpacingKind::NegativeLarge
        } else if self.starts_with("`") {
            SpacingKind::NegativeSmall
        } else {
            return None;
        };
        self.pos += match kind {
            SpacingKind::Large | SpacingKind::NegativeLarge => 2,
            SpacingKind::Small | SpacingKind::NegativeSmall => 1,
        };
        Some(Spacing {
            kind,
            span: Span::new(start, self.pos),
        })
    }

    fn component(&mut self) -> Option<Component> {
        if self.peek().is_ascii_lowercase() && self.peek_at(1).is_ascii_lowercase() {
            let start = self.pos;
            self.pos += 2;
            Some(Component {
                code: self.src[start..self.pos].to_string(),
                span: Span::new(start, self.pos),
            })
        } else {
            None
        }
    }

    fn glyph(&mut self) -> Option<ComplexGlyph> {
        let start = self.pos;
        let mut glyph = ComplexGlyph::default();
        glyph.components.push(self.component()?);

        while self.peek() == b'!'
            && self.peek_at(1).is_ascii_lowercase()
            && self.peek_at(2).is_ascii_lowercase()
        {
            self.pos += 1;
            if let Some(c) = self.component() {
                glyph.components.push(c);
            }
        }

        while matches!(self.peek(), b'S' | b'G' | b'M' | b'-' | b'>' | b'~') {
            let m_start = self.pos;
            let symbol = self.peek() as char;
            self.pos += 1;
            let variant = self.digits();
            glyph.modifiers.push(Modifier {
                symbol,
                variant,
                span: Span::new(m_start, self.pos),
            });
        }

        if self.peek() == b'h' {
            let p_start = self.pos;
            self.pos += 1;
            let next = self.peek();
            let letter = if next.is_ascii_alphanumeric() {
                self.pos += 1;
                Some(next as char)
            } else {
                None
            };
            glyph.pitch = Some(Pitch {
                letter,
                span: Span::new(p_start, self.pos),
            });
        }

        while let Some(p) = self.punctis() {
            glyph.punctis.push(p);
        }

        while let Some(l) = self.letter() {
            glyph.letters.push(l);
        }

        glyph.span = Span::new(start, self.pos);
        Some(glyph)
    }

    fn punctis(&mut self) -> Option<Punctis> {
        let kind = if self.starts_with("su") {
            PunctisKind::Subpunctis
        } else if self.starts_with("pp") {
            PunctisKind::Prepunctis
        } else {
            return None;
        };
        let start = self.pos;
        let (modifier, digits_at) = match (self.peek_at(2), self.peek_at(3)) {
            (m, d) if m.is_ascii_lowercase() && d.is_ascii_digit() => (Some(m as char), 3),
            (d, _) if d.is_ascii_digit() => (None, 2),
            _ => return None,
        };
        self.pos += digits_at;
        let count = self.digits().unwrap_or(0);
        Some(Punctis {
            kind,
            modifier,
            count,
            span: Span::new(start, self.pos),
        })
    }

    fn letter(&mut self) -> Option<SignificantLetter> {
        let kind = if self.starts_with("ls") {
            LetterKind::Ordinary
        } else if self.starts_with("lt") {
            LetterKind::Tironian
        } else {
            return None;
        };
        let start = self.pos;
        let mut end = start + 2;
        while self.bytes.get(end).is_some_and(u8::is_ascii_lowercase) {
            end += 1;
        }
        if end == start + 2 || !self.bytes.get(end).is_some_and(u8::is_ascii_digit) {
            return None;
        }
        let code = self.src[start + 2..end].to_string();
        let position = self.bytes[end] - b'0';
        self.pos = end + 1;
        Some(SignificantLetter {
            kind,
            code,
            position,
            span: Span::new(start, self.pos),
        })
    }
}
