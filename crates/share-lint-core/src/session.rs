//! Run-scoped analysis state.

use crate::manifest::{Manifest, ManifestError, ManifestLocator};
use dashmap::DashSet;
use std::path::Path;
use std::sync::Arc;

/// Remembers which keys have already been seen.
#[derive(Debug, Default)]
pub struct FirstOccurrence {
    seen: DashSet<String>,
}

impl FirstOccurrence {
    /// Creates an empty tracker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true the first time `key` is passed, false afterwards.
    pub fn first_time(&self, key: impl Into<String>) -> bool {
        self.seen.insert(key.into())
    }

    /// Number of distinct keys seen so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    /// Returns true if no key has been seen yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}

/// State shared by every file analyzed in one run.
///
/// Holds the manifest cache and the record of package-level diagnostics
/// already reported. Rules receive it through [`crate::FileContext`].
#[derive(Debug, Default)]
pub struct AnalysisSession {
    manifests: ManifestLocator,
    reported: FirstOccurrence,
}

impl AnalysisSession {
    /// Creates a session using `locator` for manifest lookups.
    #[must_use]
    pub fn new(locator: ManifestLocator) -> Self {
        Self {
            manifests: locator,
            reported: FirstOccurrence::new(),
        }
    }

    /// Returns the manifest locator.
    #[must_use]
    pub fn manifests(&self) -> &ManifestLocator {
        &self.manifests
    }

    /// Finds the manifest owning `file`.
    ///
    /// # Errors
    ///
    /// Propagates [`ManifestError`] from the locator.
    pub fn manifest_for(&self, file: &Path) -> Result<Option<Arc<Manifest>>, ManifestError> {
        self.manifests.locate(file)
    }

    /// Returns true the first time `key` is reported in this session.
    pub fn first_time(&self, key: impl Into<String>) -> bool {
        self.reported.first_time(key)
    }
}
