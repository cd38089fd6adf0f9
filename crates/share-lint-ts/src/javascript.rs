//! JavaScript import extractor using Tree-sitter.

use share_lint_core::{ExtractError, ImportExtractor, ImportReference};
use tree_sitter::Language;

use crate::walk;

/// Extracts module references from JavaScript, JSX and CommonJS sources.
pub struct JavaScriptExtractor {
    language: Language,
}

impl JavaScriptExtractor {
    /// Creates a new JavaScript extractor.
    #[must_use]
    pub fn new() -> Self {
        Self {
            language: tree_sitter_javascript::LANGUAGE.into(),
        }
    }
}

impl Default for JavaScriptExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl ImportExtractor for JavaScriptExtractor {
    fn language_id(&self) -> &'static str {
        "javascript"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &[".js", ".jsx", ".mjs", ".cjs"]
    }

    fn extract(&self, source: &str) -> Result<Vec<ImportReference>, ExtractError> {
        walk::extract_imports(&self.language, self.language_id(), source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use share_lint_core::ImportKind;

    fn extract(src: &str) -> Vec<ImportReference> {
        JavaScriptExtractor::new().extract(src).unwrap()
    }

    fn modules(src: &str) -> Vec<(String, ImportKind)> {
        extract(src)
            .into_iter()
            .map(|r| (r.module, r.kind))
            .collect()
    }

    #[test]
    fn static_import_offsets_include_quotes() {
        let src = "import React from \"react\";\n";
        let refs = extract(src);
        assert_eq!(refs.len(), 1);
        let r = &refs[0];
        assert_eq!(r.module, "react");
        assert_eq!(r.kind, ImportKind::Import);
        assert_eq!((r.start, r.end), (18, 25));
        assert_eq!((r.line, r.column), (1, 19));
        assert_eq!(&src[r.start..r.end], "\"react\"");
    }

    #[test]
    fn single_quotes_and_later_lines() {
        let src = "// header\nconst _ = require('lodash');\n";
        let refs = extract(src);
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].module, "lodash");
        assert_eq!(refs[0].kind, ImportKind::Require);
        assert_eq!((refs[0].line, refs[0].column), (2, 19));
        assert_eq!(&src[refs[0].start..refs[0].end], "'lodash'");
    }

    #[test]
    fn every_reference_form_in_source_order() {
        let src = r#"
import "./polyfill";
import { a } from "alpha";
export { b } from "beta";
export * from "gamma";
const d = require("delta");
async function load() {
  return import("epsilon");
}
"#;
        assert_eq!(
            modules(src),
            vec![
                ("./polyfill".to_string(), ImportKind::Import),
                ("alpha".to_string(), ImportKind::Import),
                ("beta".to_string(), ImportKind::ReExport),
                ("gamma".to_string(), ImportKind::ReExport),
                ("delta".to_string(), ImportKind::Require),
                ("epsilon".to_string(), ImportKind::DynamicImport),
            ]
        );
    }

    #[test]
    fn non_literal_specifiers_are_skipped() {
        let src = r#"
const name = "react";
require(name);
import(`./locale/${lang}`);
export const value = 1;
other("react");
"#;
        assert!(extract(src).is_empty());
    }

    #[test]
    fn jsx_is_parsed() {
        let src = "import { render } from \"react-dom\";\nrender(<App />, root);\n";
        assert_eq!(
            modules(src),
            vec![("react-dom".to_string(), ImportKind::Import)]
        );
    }

    #[test]
    fn nested_require_is_found() {
        let src = "module.exports = { x: () => require(\"zod\").z };\n";
        assert_eq!(modules(src), vec![("zod".to_string(), ImportKind::Require)]);
    }
}
