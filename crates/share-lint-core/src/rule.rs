//! Rule trait for defining lint rules.

use crate::context::FileContext;
use crate::manifest::ManifestError;
use crate::types::{Severity, Violation};
use thiserror::Error;

/// Errors a rule can raise while checking a file.
///
/// A rule error aborts the analysis of that one file only.
#[derive(Debug, Error)]
pub enum RuleError {
    /// The file's package manifest could not be loaded.
    #[error(transparent)]
    Manifest(#[from] ManifestError),
}

/// A per-file lint rule over the file's extracted imports.
///
/// # Example
///
/// ```ignore
/// use share_lint_core::{FileContext, Rule, RuleError, Violation};
///
/// pub struct NoDeepLodash;
///
/// impl Rule for NoDeepLodash {
///     fn name(&self) -> &'static str { "no-deep-lodash" }
///     fn code(&self) -> &'static str { "SL100" }
///
///     fn check(&self, ctx: &FileContext) -> Result<Vec<Violation>, RuleError> {
///         Ok(ctx
///             .imports
///             .iter()
///             .filter(|i| i.module.starts_with("lodash/"))
///             .map(|i| Violation::new(
///                 self.code(),
///                 self.name(),
///                 self.default_severity(),
///                 ctx.location_of(i),
///                 "Import from `lodash` instead",
///             ))
///             .collect())
///     }
/// }
/// ```
pub trait Rule: Send + Sync {
    /// Returns the kebab-case name of this rule (e.g., "use-shared-modules").
    fn name(&self) -> &'static str;

    /// Returns the primary diagnostic code (e.g., "SL001").
    fn code(&self) -> &'static str;

    /// Returns a brief description of what this rule checks.
    fn description(&self) -> &'static str {
        ""
    }

    /// Returns the default severity for violations from this rule.
    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    /// Whether this rule requires a reason when using allow directives.
    ///
    /// By default, rules with `Severity::Error` require a reason.
    fn requires_allow_reason(&self) -> bool {
        self.default_severity() == Severity::Error
    }

    /// Checks a single file and returns any violations found.
    ///
    /// # Errors
    ///
    /// Returns a [`RuleError`] if the file cannot be checked at all.
    fn check(&self, ctx: &FileContext) -> Result<Vec<Violation>, RuleError>;
}

/// Type alias for boxed Rule trait objects.
pub type RuleBox = Box<dyn Rule>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::AnalysisSession;
    use std::path::Path;

    struct CountImports;

    impl Rule for CountImports {
        fn name(&self) -> &'static str {
            "count-imports"
        }
        fn code(&self) -> &'static str {
            "TEST001"
        }
        fn default_severity(&self) -> Severity {
            Severity::Info
        }

        fn check(&self, ctx: &FileContext) -> Result<Vec<Violation>, RuleError> {
            Ok(ctx
                .imports
                .iter()
                .map(|i| {
                    Violation::new(
                        self.code(),
                        self.name(),
                        self.default_severity(),
                        ctx.location_of(i),
                        format!("imports {}", i.module),
                    )
                })
                .collect())
        }
    }

    #[test]
    fn test_rule_trait() {
        let rule = CountImports;
        assert_eq!(rule.name(), "count-imports");
        assert_eq!(rule.code(), "TEST001");
        assert!(!rule.requires_allow_reason());

        let session = AnalysisSession::default();
        let ctx = FileContext::new(Path::new("/r/a.js"), "", Path::new("/r"), &[], &session);
        assert!(rule.check(&ctx).unwrap().is_empty());
    }
}
