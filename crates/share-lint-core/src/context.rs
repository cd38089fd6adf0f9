//! Context types for rule execution.

use crate::extractor::ImportReference;
use crate::session::AnalysisSession;
use crate::types::Location;
use std::path::{Path, PathBuf};

/// Context provided to per-file rules.
#[derive(Debug, Clone)]
pub struct FileContext<'a> {
    /// Absolute path to the file.
    pub path: &'a Path,
    /// File contents as a string.
    pub content: &'a str,
    /// Project root the analysis runs from.
    pub root: &'a Path,
    /// Path relative to the project root.
    pub relative_path: PathBuf,
    /// Module references extracted from the file, in source order.
    pub imports: &'a [ImportReference],
    /// Run-scoped state shared with every other file of the run.
    pub session: &'a AnalysisSession,
}

impl<'a> FileContext<'a> {
    /// Creates a new file context.
    #[must_use]
    pub fn new(
        path: &'a Path,
        content: &'a str,
        root: &'a Path,
        imports: &'a [ImportReference],
        session: &'a AnalysisSession,
    ) -> Self {
        let relative_path = relative_to(path, root);

        Self {
            path,
            content,
            root,
            relative_path,
            imports,
            session,
        }
    }

    /// Location of an import literal, quotes included.
    #[must_use]
    pub fn location_of(&self, import: &ImportReference) -> Location {
        Location::new(self.relative_path.clone(), import.line, import.column)
            .with_span(import.start, import.len())
    }

    /// Path of `other` relative to the same root as this file, when possible.
    #[must_use]
    pub fn display_path(&self, other: &Path) -> PathBuf {
        relative_to(other, self.root)
    }
}

fn relative_to(path: &Path, root: &Path) -> PathBuf {
    path.strip_prefix(root)
        .map_or_else(|_| path.to_path_buf(), Path::to_path_buf)
}
