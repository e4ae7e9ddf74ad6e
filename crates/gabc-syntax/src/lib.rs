//! gabc/nabc score analysis: parsing and validation of Gregorian chant
//! sources as read by the gregorio compiler.
//!
//! Provides: header/body splitting, syllable tokenization, `|` snippet
//!           splitting, gabc/nabc classification, alternation checks,
//!           style-tag nesting, nabc neume descriptor validation and
//!           rendering rules (quilismata, ambitus, first syllable).
//!
//! ```
//! use gabc_syntax::{analyze, DiagnosticCode};
//!
//! let analysis = analyze("name: Test;\n%%\n(f3) Test(f|g|h)", None);
//! assert_eq!(analysis.diagnostics[0].code, DiagnosticCode::InvalidPipeWithoutNabc);
//! ```

pub mod classify;
pub mod context;
pub mod diagnostic;
pub mod gabc;
pub mod model;
pub mod nabc;
pub mod parser;
pub mod position;
pub mod validate;

pub use classify::{classify, SnippetKind};
pub use context::{AlternationConfig, ContextError, FontFamily, ValidationContext};
pub use diagnostic::{Diagnostic, DiagnosticCode, Severity};
pub use model::{Document, Syllable};
pub use position::{Position, Range, Span};

/// A parsed document with the diagnostics produced for it.
#[derive(Debug)]
pub struct Analysis {
    pub document: Document,
    pub context: ValidationContext,
    pub diagnostics: Vec<Diagnostic>,
}

impl Analysis {
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(|d| d.severity == Severity::Error)
    }
}

/// Parse and validate `text` with settings taken from its own headers.
///
/// `font` overrides the `nabc-font` header when given.
pub fn analyze(text: &str, font: Option<FontFamily>) -> Analysis {
    let document = Document::parse(text);
    let font = ValidationContext::resolve_font(&document, font);
    let context = ValidationContext::for_document(&document, font);
    analyze_with(document, context)
}

/// Validate an already parsed document under an explicit context.
pub fn analyze_with(document: Document, context: ValidationContext) -> Analysis {
    let diagnostics = validate::validate(&document, &context);
    tracing::debug!(
        syllables = document.syllables.len(),
        diagnostics = diagnostics.len(),
        font = %context.font,
        "analysis finished"
    );
    Analysis {
        document,
        context,
        diagnostics,
    }
}
