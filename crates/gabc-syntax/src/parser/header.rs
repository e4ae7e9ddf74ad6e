//! Header block scanner: splits the score on the `%%` line.
//!
//! Line-by-line state machine: `key: value;` entries, `%` comment lines,
//! and multi-line values that run until a line ending in `;;`.

use crate::model::HeaderField;
use crate::position::Span;
use regex::Regex;
use std::sync::LazyLock;

static RE_HEADER_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[[:space:]]*([A-Za-z][A-Za-z0-9_-]*)[[:blank:]]*:").unwrap());

/// Result of splitting the score.
#[derive(Debug, Default)]
pub struct Split {
    pub headers: Vec<HeaderField>,
    /// Offset just past the `%%` line, or the end of the text when absent.
    pub body_offset: usize,
    pub has_separator: bool,
}

/// Header whose value has not seen its terminator yet.
struct Pending {
    name: String,
    lines: Vec<String>,
    start: usize,
    end: usize,
}

impl Pending {
    fn push(&mut self, line: &str, end: usize) {
        self.lines.push(line.trim().to_string());
        self.end = end;
    }

    fn is_terminated(&self) -> bool {
        self.lines.last().is_some_and(|l| l.ends_with(';'))
    }

    fn finish(self) -> HeaderField {
        let joined = self.lines.join("\n");
        HeaderField {
            name: self.name,
            value: strip_terminator(joined.trim()).to_string(),
            span: Span::new(self.start, self.end),
        }
    }
}

/// Remove a trailing `;;` or `;` terminator.
fn strip_terminator(value: &str) -> &str {
    value
        .strip_suffix(";;")
        .or_else(|| value.strip_suffix(';'))
        .unwrap_or(value)
        .trim_end()
}

/// Split `text` into header fields and the offset where the body starts.
pub fn split(text: &str) -> Split {
    let mut headers = Vec::new();
    let mut pending: Option<Pending> = None;
    let mut offset = 0;

    for raw in text.split_inclusive('\n') {
        let line_start = offset;
        offset += raw.len();
        let line = raw.trim_end_matches(['\n', '\r']);
        let trimmed = line.trim();
        let line_end = line_start + line.trim_end().len();

        if trimmed == "%%" {
            if let Some(p) = pending.take() {
                headers.push(p.finish());
            }
            return Split {
                headers,
                body_offset: offset,
                has_separator: true,
            };
        }

        // Continuation of a multi-line value
        if let Some(mut p) = pending.take() {
            if trimmed.starts_with('%') {
                pending = Some(p);
                continue;
            }
            if !RE_HEADER_LINE.is_match(line) {
                p.push(line, line_end);
                if trimmed.ends_with(";;") {
                    headers.push(p.finish());
                } else {
                    pending = Some(p);
                }
                continue;
            }
            headers.push(p.finish());
        }

        if trimmed.is_empty() || trimmed.starts_with('%') {
            continue;
        }

        let Some(caps) = RE_HEADER_LINE.captures(line) else {
            tracing::trace!(line = trimmed, "ignoring header line without key");
            continue;
        };
        let key = &caps[1];
        let key_start = line_start + caps.get(1).map_or(0, |m| m.start());
        let value = &line[caps.get(0).map_or(0, |m| m.end())..];

        let p = Pending {
            name: key.to_string(),
            lines: vec![value.trim().to_string()],
            start: key_start,
            end: line_end,
        };
        if p.is_terminated() {
            headers.push(p.finish());
        } else {
            pending = Some(p);
        }
    }

    if let Some(p) = pending.take() {
        headers.push(p.finish());
    }

    Split {
        headers,
        body_offset: text.len(),
        has_separator: false,
    }
}
