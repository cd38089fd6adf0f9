//! # share-lint-ts
//!
//! Tree-sitter based import extraction for JavaScript and TypeScript.
//!
//! This crate implements `share-lint-core`'s [`ImportExtractor`] trait for
//! the JavaScript family of languages:
//!
//! - [`JavaScriptExtractor`] for `.js`, `.jsx`, `.mjs` and `.cjs`
//! - [`TypeScriptExtractor`] for `.ts`, `.mts`, `.cts` and `.tsx`
//!
//! Every extractor reports static imports, `export ... from`
//! re-exports, `require("...")` calls, dynamic `import("...")` and
//! TypeScript `import x = require("...")`, in source order, with the
//! byte range of the quoted literal.
//!
//! [`ImportExtractor`]: share_lint_core::ImportExtractor

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod javascript;
mod typescript;
mod walk;

pub use javascript::JavaScriptExtractor;
pub use typescript::TypeScriptExtractor;

use share_lint_core::ExtractorBox;

/// Returns one extractor for every supported file type.
#[must_use]
pub fn default_extractors() -> Vec<ExtractorBox> {
    vec![
        Box::new(JavaScriptExtractor::new()),
        Box::new(TypeScriptExtractor::typescript()),
        Box::new(TypeScriptExtractor::tsx()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn default_extractors_cover_every_extension() {
        let extractors = default_extractors();
        for file in [
            "a.js", "a.jsx", "a.mjs", "a.cjs", "a.ts", "a.mts", "a.cts", "a.tsx",
        ] {
            let handlers = extractors
                .iter()
                .filter(|e| e.handles(Path::new(file)))
                .count();
            assert_eq!(handlers, 1, "{file}");
        }
        assert!(!extractors.iter().any(|e| e.handles(Path::new("a.d.json"))));
    }
}
