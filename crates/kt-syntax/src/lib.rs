//! Lossless Kotlin syntax trees.
//!
//! The crate is organised around a rowan green tree:
//! - [`parse_kotlin`] lexes and parses a file into a lossless tree plus
//!   recoverable [`ParseError`]s. Parsing never fails.
//! - [`ast`] wraps raw nodes in typed views with per-construct accessors and
//!   capability traits shared across node kinds.
//! - [`visitor`] dispatches over node kinds with cascading defaults.
//! - [`edit`] is the small mutation surface (insert, delete with delimiters,
//!   replace, rename) over a mutable copy of a tree.
//! - [`precedence`] decides whether parentheses around an expression are
//!   needed.

pub mod ast;
pub mod edit;
mod errors;
mod feature_gate;
mod fq_name;
mod language_version;
mod lexer;
mod literals;
mod parser;
pub mod precedence;
mod syntax_kind;
pub mod visitor;

pub use ast::*;
pub use errors::SyntaxError;
pub use fq_name::{fq_name, FqName};
pub use language_version::{FeatureAvailability, LanguageFeature, LanguageVersion};
pub use lexer::{lex, lex_with_errors, LexError, Lexer, Token};
pub use literals::{
    parse_character_literal, parse_float_literal, parse_integer_literal, unescape_sequence,
    ConstantValue, LiteralError,
};
pub use parser::{
    parse_kotlin, parse_kotlin_expression, parse_kotlin_type, KotlinParseResult, SyntaxElement,
    SyntaxNode, SyntaxToken,
};
pub use syntax_kind::{KindSet, KotlinLanguage, SyntaxKind, SYNTAX_SCHEMA_VERSION};

use serde::{Deserialize, Serialize};

/// Whether a file is an ordinary source file or a script (`.kts`), whose
/// top level is a statement block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileKind {
    #[default]
    Source,
    Script,
}

impl FileKind {
    /// Guess the file kind from a path's extension.
    pub fn from_path(path: &std::path::Path) -> FileKind {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("kts") => FileKind::Script,
            _ => FileKind::Source,
        }
    }
}

/// Options that influence parsing and post-parse diagnostics.
///
/// The parser always accepts the newest grammar; the language version only
/// affects feature-gate diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseOptions {
    pub language_version: LanguageVersion,
    pub file_kind: FileKind,
}

#[derive(Debug, Clone)]
pub struct KotlinParse {
    pub result: KotlinParseResult,
    pub diagnostics: Vec<Diagnostic>,
}

pub fn parse_kotlin_with_options(text: &str, opts: ParseOptions) -> KotlinParse {
    let result = parser::parse_kotlin_file(text, opts.file_kind);
    let diagnostics =
        feature_gate::feature_gate_diagnostics(&result.syntax(), opts.language_version);
    KotlinParse {
        result,
        diagnostics,
    }
}

/// Run the feature gate pass on an already-parsed syntax tree.
pub fn feature_gate_diagnostics(root: &SyntaxNode, version: LanguageVersion) -> Vec<Diagnostic> {
    feature_gate::feature_gate_diagnostics(root, version)
}

/// Number of full parses performed on the current thread.
#[cfg(feature = "test-parse-counter")]
pub fn parse_count() -> usize {
    parser::PARSE_COUNT.with(|count| count.get())
}

/// A half-open byte range within a source file (`start..end`).
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    rkyv::Archive,
    rkyv::Serialize,
    rkyv::Deserialize,
)]
#[archive(check_bytes)]
pub struct TextRange {
    pub start: u32,
    pub end: u32,
}

impl TextRange {
    #[inline]
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end);
        Self {
            start: start as u32,
            end: end as u32,
        }
    }

    #[inline]
    pub fn len(self) -> u32 {
        self.end - self.start
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.start == self.end
    }
}

impl From<text_size::TextRange> for TextRange {
    fn from(range: text_size::TextRange) -> Self {
        TextRange {
            start: u32::from(range.start()),
            end: u32::from(range.end()),
        }
    }
}

impl From<TextRange> for text_size::TextRange {
    fn from(range: TextRange) -> Self {
        text_size::TextRange::new(range.start.into(), range.end.into())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParseError {
    pub message: String,
    pub range: TextRange,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Severity {
    Error,
    Warning,
}

/// A post-parse diagnostic, such as a language feature used below the
/// configured language version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub code: &'static str,
    pub message: String,
    pub range: Option<TextRange>,
}

impl Diagnostic {
    pub fn error(code: &'static str, message: impl Into<String>, range: Option<TextRange>) -> Self {
        Self {
            severity: Severity::Error,
            code,
            message: message.into(),
            range,
        }
    }

    pub fn warning(
        code: &'static str,
        message: impl Into<String>,
        range: Option<TextRange>,
    ) -> Self {
        Self {
            severity: Severity::Warning,
            code,
            message: message.into(),
            range,
        }
    }
}

#[cfg(test)]
mod tests;
