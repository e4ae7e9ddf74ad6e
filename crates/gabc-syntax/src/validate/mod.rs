//! Validation passes over a parsed [`Document`].
//!
//! Each pass is independent, runs over the whole document and never stops
//! early; their diagnostics are concatenated and stably ordered by start
//! position. Nothing is deduplicated or capped here.

pub mod alternation;
pub mod header;
pub mod nabc;
pub mod notes;
pub mod rules;
pub mod structure;
pub mod tags;

use crate::classify::{self, SnippetKind};
use crate::context::{AlternationConfig, ValidationContext};
use crate::diagnostic::Diagnostic;
use crate::model::{Document, MusicElement, Snippet};

/// Run every pass and merge the results.
pub fn validate(doc: &Document, ctx: &ValidationContext) -> Vec<Diagnostic> {
    let passes: [(&str, fn(&Document, &ValidationContext) -> Vec<Diagnostic>); 7] = [
        ("header", header::check),
        ("structure", structure::check),
        ("alternation", alternation::check),
        ("tags", tags::check),
        ("notes", notes::check),
        ("nabc", nabc::check),
        ("rules", rules::check),
    ];

    let mut out = Vec::new();
    for (name, pass) in passes {
        let found = pass(doc, ctx);
        tracing::debug!(pass = name, diagnostics = found.len(), "validation pass finished");
        out.extend(found);
    }
    out.sort_by_key(|d| d.range.start);
    out
}

/// A snippet with the kind its position demands and the kind it looks like.
#[derive(Debug, Clone, Copy)]
pub struct TypedSnippet<'a> {
    pub snippet: Snippet<'a>,
    pub expected: SnippetKind,
    pub found: SnippetKind,
}

impl TypedSnippet<'_> {
    /// Treated as gabc by the note and rendering checks.
    pub fn is_gabc(&self) -> bool {
        self.expected == SnippetKind::Gabc && self.found == SnippetKind::Gabc
    }

    /// Handed to the nabc grammar validator.
    pub fn is_nabc(&self) -> bool {
        self.expected == SnippetKind::Nabc && self.found != SnippetKind::Neutral
    }
}

pub fn typed_snippets<'a>(
    music: &'a MusicElement,
    alternation: &AlternationConfig,
) -> Vec<TypedSnippet<'a>> {
    music
        .snippets()
        .into_iter()
        .map(|snippet| TypedSnippet {
            expected: alternation.expected_kind(snippet.index),
            found: classify::classify(snippet.content),
            snippet,
        })
        .collect()
}

/// gabc snippets of a music group, in order.
pub fn gabc_snippets<'a>(
    music: &'a MusicElement,
    alternation: &AlternationConfig,
) -> Vec<Snippet<'a>> {
    typed_snippets(music, alternation)
        .into_iter()
        .filter(TypedSnippet::is_gabc)
        .map(|t| t.snippet)
        .collect()
}
