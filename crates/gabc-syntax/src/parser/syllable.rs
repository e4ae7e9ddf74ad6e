//! Body scanner: `text(music)` units in source order.

use crate::model::{MusicElement, Syllable, TextElement};
use crate::position::Span;
use regex::Regex;
use std::sync::LazyLock;

/// Non-parenthesis prefix, then one parenthesized group.
static RE_SYLLABLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([^()]*)\(([^()]*)\)").unwrap());

/// Tokenize the body of `text`, which starts at byte `body_offset`.
///
/// Spans are absolute offsets into `text`.
pub fn tokenize(text: &str, body_offset: usize) -> Vec<Syllable> {
    let body = text.get(body_offset..).unwrap_or("");
    let masked = mask_comments(body);
    let mut syllables = Vec::new();
    let mut last_end = 0;

    for caps in RE_SYLLABLE.captures_iter(&masked) {
        let (Some(whole), Some(prefix), Some(group)) = (caps.get(0), caps.get(1), caps.get(2))
        else {
            continue;
        };

        // Text the pattern could not attach to a group (stray parentheses)
        if whole.start() > last_end {
            if let Some(orphan) = text_element(&masked, last_end, whole.start(), body_offset) {
                syllables.push(Syllable {
                    span: orphan.span,
                    text: Some(orphan),
                    music: None,
                });
            }
        }
        last_end = whole.end();

        let text_el = text_element(&masked, prefix.start(), prefix.end(), body_offset);
        let music = if text_el.is_none() && group.as_str().trim().is_empty() {
            // A bare `()` carries neither text nor music
            None
        } else {
            Some(MusicElement {
                content: group.as_str().to_string(),
                span: Span::new(body_offset + group.start(), body_offset + group.end()),
            })
        };
        let start = text_el
            .as_ref()
            .map_or(body_offset + group.start() - 1, |t| t.span.start);
        syllables.push(Syllable {
            text: text_el,
            music,
            span: Span::new(start, body_offset + whole.end()),
        });
    }

    if let Some(trailing) = text_element(&masked, last_end, masked.len(), body_offset) {
        syllables.push(Syllable {
            span: trailing.span,
            text: Some(trailing),
            music: None,
        });
    }

    syllables
}

/// Trimmed text between `start` and `end`, or `None` when blank.
fn text_element(masked: &str, start: usize, end: usize, base: usize) -> Option<TextElement> {
    let raw = masked.get(start..end)?;
    let content = raw.trim();
    if content.is_empty() {
        return None;
    }
    let lead = raw.len() - raw.trim_start().len();
    Some(TextElement {
        content: content.to_string(),
        span: Span::new(base + start + lead, base + start + lead + content.len()),
    })
}

/// Blank out `%` comments outside parentheses, preserving byte offsets.
fn mask_comments(body: &str) -> String {
    let mut out = String::with_capacity(body.len());
    let mut depth = 0usize;
    let mut in_comment = false;
    for c in body.chars() {
        if in_comment {
            if c == '\n' {
                in_comment = false;
                out.push(c);
            } else {
                out.extend(std::iter::repeat(' ').take(c.len_utf8()));
            }
            continue;
        }
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            '%' if depth == 0 => {
                in_comment = true;
                out.push(' ');
                continue;
            }
            _ => {}
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(body: &str) -> Vec<Syllable> {
        tokenize(body, 0)
    }

    #[test]
    fn text_and_music_pairs() {
        let syl = parse("(c4) Ky(f)ri(gh)e(h.)");
        assert_eq!(syl.len(), 4);
        assert!(syl[0].text.is_none());
        assert_eq!(syl[0].music.as_ref().unwrap().content, "c4");
        assert_eq!(syl[1].text.as_ref().unwrap().content, "Ky");
        assert_eq!(syl[2].music.as_ref().unwrap().content, "gh");
    }

    #[test]
    fn spans_point_into_source() {
        let text = "name: x;\n%%\n Ky(f)";
        let syl = tokenize(text, 12);
        let t = syl[0].text.as_ref().unwrap();
        assert_eq!(&text[t.span.start..t.span.end], "Ky");
        let m = syl[0].music.as_ref().unwrap();
        assert_eq!(&text[m.span.start..m.span.end], "f");
        assert_eq!(&text[syl[0].span.start..syl[0].span.end], "Ky(f)");
    }

    #[test]
    fn empty_group_with_text_is_valid_music() {
        let syl = parse("Amen()");
        assert_eq!(syl[0].music.as_ref().unwrap().content, "");
        assert!(!syl[0].is_empty());
    }

    #[test]
    fn bare_empty_group_is_empty_syllable() {
        let syl = parse("(f) ()");
        assert_eq!(syl.len(), 2);
        assert!(syl[1].is_empty());
    }

    #[test]
    fn trailing_text_has_no_music() {
        let syl = parse("(f3) Test(f|g|h) content.");
        assert_eq!(syl.len(), 3);
        assert_eq!(syl[2].text.as_ref().unwrap().content, "content.");
        assert!(syl[2].music.is_none());
    }

    #[test]
    fn comments_are_masked() {
        let syl = parse("A(f) % B(g)\nC(h)");
        assert_eq!(syl.len(), 2);
        assert_eq!(syl[1].text.as_ref().unwrap().content, "C");
    }

    #[test]
    fn percent_inside_group_is_kept() {
        let syl = parse("A(f%g)");
        assert_eq!(syl[0].music.as_ref().unwrap().content, "f%g");
    }

    #[test]
    fn multi_line_text_spans_lines() {
        let text = "A(f)\nB(g)";
        let syl = parse(text);
        let b = syl[1].text.as_ref().unwrap();
        assert_eq!(b.span.start, 5);
    }

    #[test]
    fn stray_closing_parenthesis_becomes_orphan_text() {
        let syl = parse("x) A(f)");
        assert_eq!(syl.len(), 2);
        assert_eq!(syl[0].text.as_ref().unwrap().content, "x)");
        assert!(syl[0].music.is_none());
    }
}
