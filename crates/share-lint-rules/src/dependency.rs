//! Manifest-level classification.

use crate::registry::SharedModuleRegistry;
use share_lint_core::Manifest;

/// Returns true if `manifest` declares `core_package` in `dependencies`.
#[must_use]
pub fn depends_on_core(manifest: &Manifest, core_package: &str) -> bool {
    manifest.has_dependency(core_package)
}

/// Declared dependencies that are themselves shared modules, in declaration
/// order.
#[must_use]
pub fn shared_dependencies_of(
    manifest: &Manifest,
    registry: &dyn SharedModuleRegistry,
) -> Vec<String> {
    manifest
        .dependency_names()
        .filter(|name| registry.is_shared_dependency(name))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::SharedModuleTable;

    fn registry() -> SharedModuleTable {
        SharedModuleTable::new("@acme/core/shared").modules(["react", "lodash"])
    }

    #[test]
    fn core_dependency_is_a_dependencies_key() {
        let manifest =
            Manifest::parse(r#"{"dependencies": {"@acme/core": "^1.0.0"}}"#).unwrap();
        assert!(depends_on_core(&manifest, "@acme/core"));
        assert!(!depends_on_core(&manifest, "@acme/other"));
    }

    #[test]
    fn dev_dependencies_do_not_count() {
        let manifest =
            Manifest::parse(r#"{"devDependencies": {"@acme/core": "^1.0.0"}}"#).unwrap();
        assert!(!depends_on_core(&manifest, "@acme/core"));
        assert!(!depends_on_core(&Manifest::parse("{}").unwrap(), "@acme/core"));
    }

    #[test]
    fn shared_dependencies_keep_declaration_order() {
        let manifest = Manifest::parse(
            r#"{"dependencies": {"@acme/core": "1", "lodash": "4", "zod": "3", "react": "18"}}"#,
        )
        .unwrap();
        assert_eq!(
            shared_dependencies_of(&manifest, &registry()),
            vec!["lodash", "react"]
        );
    }

    #[test]
    fn unregistered_counterpart_is_not_a_shared_dependency() {
        let registry = registry().counterpart("moment", "@acme/core/shared/moment");
        let manifest =
            Manifest::parse(r#"{"dependencies": {"@acme/core": "1", "moment": "2"}}"#).unwrap();
        assert!(shared_dependencies_of(&manifest, &registry).is_empty());
    }

    #[test]
    fn no_shared_dependencies() {
        let manifest = Manifest::parse(r#"{"dependencies": {"zod": "3"}}"#).unwrap();
        assert!(shared_dependencies_of(&manifest, &registry()).is_empty());
    }
}
