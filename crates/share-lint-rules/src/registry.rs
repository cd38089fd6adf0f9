//! Shared-module registry.
//!
//! The registry answers which module names the core package re-exports
//! under its shared prefix, and which shared name a bare import maps to.

use std::collections::{BTreeMap, BTreeSet};

/// Lookup capability over the core package's shared modules.
pub trait SharedModuleRegistry: Send + Sync {
    /// Shared path prefix without a trailing slash (e.g., `@acme/core/shared`).
    fn prefix(&self) -> &str;

    /// Returns true if `name` is a registered shared module path.
    fn is_shared_module_name(&self, name: &str) -> bool;

    /// Returns the shared counterpart of a bare module name, if it has one.
    ///
    /// The counterpart is not guaranteed to be registered.
    fn shared_counterpart_of(&self, bare: &str) -> Option<String>;

    /// Returns true if a declared dependency named `bare` is one of the
    /// shared modules, i.e. its counterpart is a registered shared name.
    fn is_shared_dependency(&self, bare: &str) -> bool {
        self.shared_counterpart_of(bare)
            .is_some_and(|shared| self.is_shared_module_name(&shared))
    }
}

/// Table-backed [`SharedModuleRegistry`] built from configuration.
///
/// Every name in `modules` is registered as `<prefix>/<name>` and is its own
/// bare counterpart. Explicit counterparts map additional bare names to a
/// shared path; a counterpart whose path is not registered is reported as a
/// registry inconsistency by the rule.
#[derive(Debug, Clone, Default)]
pub struct SharedModuleTable {
    prefix: String,
    modules: BTreeSet<String>,
    counterparts: BTreeMap<String, String>,
}

impl SharedModuleTable {
    /// Creates an empty table for `prefix`. Trailing slashes are dropped.
    #[must_use]
    pub fn new(prefix: impl Into<String>) -> Self {
        let prefix: String = prefix.into();
        Self {
            prefix: prefix.trim_end_matches('/').to_string(),
            modules: BTreeSet::new(),
            counterparts: BTreeMap::new(),
        }
    }

    /// Registers a shared module by its bare name.
    #[must_use]
    pub fn module(mut self, name: impl Into<String>) -> Self {
        self.modules.insert(name.into());
        self
    }

    /// Registers several shared modules.
    #[must_use]
    pub fn modules<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.modules.extend(names.into_iter().map(Into::into));
        self
    }

    /// Maps a bare module name to an explicit shared path.
    #[must_use]
    pub fn counterpart(mut self, bare: impl Into<String>, shared: impl Into<String>) -> Self {
        self.counterparts.insert(bare.into(), shared.into());
        self
    }

    /// Number of registered shared modules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    /// Returns true if no shared module is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    fn strip_prefix<'n>(&self, name: &'n str) -> Option<&'n str> {
        name.strip_prefix(self.prefix.as_str())?.strip_prefix('/')
    }
}

impl SharedModuleRegistry for SharedModuleTable {
    fn prefix(&self) -> &str {
        &self.prefix
    }

    fn is_shared_module_name(&self, name: &str) -> bool {
        self.strip_prefix(name)
            .is_some_and(|bare| self.modules.contains(bare))
    }

    fn shared_counterpart_of(&self, bare: &str) -> Option<String> {
        if let Some(shared) = self.counterparts.get(bare) {
            return Some(shared.clone());
        }
        self.modules
            .contains(bare)
            .then(|| format!("{}/{bare}", self.prefix))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> SharedModuleTable {
        SharedModuleTable::new("@acme/core/shared/")
            .modules(["react", "lodash", "react-dom-client"])
            .counterpart("react-dom/client", "@acme/core/shared/react-dom-client")
            .counterpart("moment", "@acme/core/shared/moment")
    }

    #[test]
    fn prefix_is_normalized() {
        assert_eq!(table().prefix(), "@acme/core/shared");
    }

    #[test]
    fn shared_names_require_prefix_and_registration() {
        let t = table();
        assert!(t.is_shared_module_name("@acme/core/shared/react"));
        assert!(!t.is_shared_module_name("@acme/core/shared/moment"));
        assert!(!t.is_shared_module_name("@acme/core/sharedreact"));
        assert!(!t.is_shared_module_name("react"));
    }

    #[test]
    fn counterparts_come_from_modules_or_table() {
        let t = table();
        assert_eq!(
            t.shared_counterpart_of("lodash").as_deref(),
            Some("@acme/core/shared/lodash")
        );
        assert_eq!(
            t.shared_counterpart_of("react-dom/client").as_deref(),
            Some("@acme/core/shared/react-dom-client")
        );
        assert_eq!(
            t.shared_counterpart_of("moment").as_deref(),
            Some("@acme/core/shared/moment")
        );
        assert_eq!(t.shared_counterpart_of("zod"), None);
    }

    #[test]
    fn shared_dependency_requires_registered_counterpart() {
        let t = table();
        assert!(t.is_shared_dependency("react"));
        assert!(t.is_shared_dependency("react-dom/client"));
        assert!(!t.is_shared_dependency("moment"));
        assert!(!t.is_shared_dependency("zod"));
        assert_eq!(t.len(), 3);
    }
}
