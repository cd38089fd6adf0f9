//! Import reference types and the extractor trait.
//!
//! `ImportExtractor` is the extension point for teaching the analyzer a new
//! source language. Implementations live outside this crate (see
//! `share-lint-ts` for the Tree-sitter based ones).

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Syntactic form of an import reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ImportKind {
    /// `import x from "m"` or `import "m"`.
    Import,
    /// `export { x } from "m"` or `export * from "m"`.
    ReExport,
    /// `require("m")`.
    Require,
    /// `import("m")`.
    DynamicImport,
    /// `import x = require("m")` (TypeScript).
    ImportEquals,
}

/// A single module reference found in a source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportReference {
    /// Module name as written, without quotes.
    pub module: String,
    /// How the module is referenced.
    pub kind: ImportKind,
    /// Byte offset of the opening quote.
    pub start: usize,
    /// Byte offset just past the closing quote.
    pub end: usize,
    /// Line of the literal (1-indexed).
    pub line: usize,
    /// Column of the literal (1-indexed, in bytes).
    pub column: usize,
}

impl ImportReference {
    /// Byte offset of the first character after the opening quote.
    #[must_use]
    pub fn content_start(&self) -> usize {
        self.start + 1
    }

    /// Byte offset of the closing quote.
    #[must_use]
    pub fn content_end(&self) -> usize {
        self.end.saturating_sub(1)
    }

    /// Length of the literal including quotes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Returns true for a zero-width reference.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.end == self.start
    }
}

/// Errors raised by an extractor.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The parser rejected the language grammar.
    #[error("failed to load {language} grammar: {message}")]
    Language {
        /// Language identifier.
        language: &'static str,
        /// Error detail.
        message: String,
    },

    /// The parser produced no tree.
    #[error("failed to parse {language} source")]
    Parse {
        /// Language identifier.
        language: &'static str,
    },
}

/// Extracts import references from source text.
pub trait ImportExtractor: Send + Sync {
    /// Language identifier (e.g., `"javascript"`).
    fn language_id(&self) -> &'static str;

    /// File extensions handled, with leading dot (e.g., `&[".js", ".jsx"]`).
    fn extensions(&self) -> &'static [&'static str];

    /// Returns every module reference in `source`, in source order.
    ///
    /// # Errors
    ///
    /// Returns an [`ExtractError`] if the source cannot be parsed.
    fn extract(&self, source: &str) -> Result<Vec<ImportReference>, ExtractError>;

    /// Returns true if this extractor handles `path`.
    fn handles(&self, path: &std::path::Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| {
                self.extensions()
                    .iter()
                    .any(|known| known.strip_prefix('.') == Some(ext))
            })
    }
}

/// Type alias for boxed extractor trait objects.
pub type ExtractorBox = Box<dyn ImportExtractor>;
