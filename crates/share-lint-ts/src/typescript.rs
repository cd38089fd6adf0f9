//! TypeScript and TSX import extractors using Tree-sitter.

use share_lint_core::{ExtractError, ImportExtractor, ImportReference};
use tree_sitter::Language;

use crate::walk;

/// Extracts module references from TypeScript sources.
///
/// The TypeScript grammar does not accept JSX, so `.tsx` files get their
/// own instance built with [`TypeScriptExtractor::tsx`].
pub struct TypeScriptExtractor {
    language: Language,
    language_id: &'static str,
    extensions: &'static [&'static str],
}

impl TypeScriptExtractor {
    /// Extractor for `.ts`, `.mts` and `.cts` files.
    #[must_use]
    pub fn typescript() -> Self {
        Self {
            language: tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            language_id: "typescript",
            extensions: &[".ts", ".mts", ".cts"],
        }
    }

    /// Extractor for `.tsx` files.
    #[must_use]
    pub fn tsx() -> Self {
        Self {
            language: tree_sitter_typescript::LANGUAGE_TSX.into(),
            language_id: "tsx",
            extensions: &[".tsx"],
        }
    }
}

impl ImportExtractor for TypeScriptExtractor {
    fn language_id(&self) -> &'static str {
        self.language_id
    }

    fn extensions(&self) -> &'static [&'static str] {
        self.extensions
    }

    fn extract(&self, source: &str) -> Result<Vec<ImportReference>, ExtractError> {
        walk::extract_imports(&self.language, self.language_id, source)
    }
}
