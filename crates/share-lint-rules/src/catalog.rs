//! Diagnostic catalog and config-driven rule construction.

use crate::use_shared_modules::{self, RuleConfigError, UseSharedModules};
use share_lint_core::{Config, RuleBox, Severity};
use tracing::debug;

/// Describes one diagnostic code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiagnosticInfo {
    /// Diagnostic code (e.g., "SL001").
    pub code: &'static str,
    /// Rule emitting the diagnostic.
    pub rule: &'static str,
    /// Default severity.
    pub severity: Severity,
    /// Whether violations carry an automatic fix.
    pub fixable: bool,
    /// One-line description.
    pub description: &'static str,
}

const DIAGNOSTICS: &[DiagnosticInfo] = &[
    DiagnosticInfo {
        code: use_shared_modules::CODE,
        rule: use_shared_modules::NAME,
        severity: Severity::Error,
        fixable: true,
        description: "Shared module imported by its bare name",
    },
    DiagnosticInfo {
        code: use_shared_modules::MISSING_COUNTERPART_CODE,
        rule: use_shared_modules::NAME,
        severity: Severity::Warning,
        fixable: false,
        description: "Shared counterpart of an import is not registered",
    },
    DiagnosticInfo {
        code: use_shared_modules::ADVISORY_CODE,
        rule: use_shared_modules::NAME,
        severity: Severity::Info,
        fixable: false,
        description: "Package declares shared modules as direct dependencies",
    },
];

/// Returns every diagnostic the built-in rules can emit.
#[must_use]
pub fn diagnostics() -> &'static [DiagnosticInfo] {
    DIAGNOSTICS
}

/// Builds the rules configured in `config`.
///
/// A rule without a `[rules.<name>]` table is not built, since it has no
/// registry to check against.
///
/// # Errors
///
/// Returns an error if a rule table is incomplete or malformed.
pub fn rules_from_config(config: &Config) -> Result<Vec<RuleBox>, RuleConfigError> {
    let mut rules: Vec<RuleBox> = Vec::new();

    match config.rules.get(use_shared_modules::NAME) {
        Some(table) => rules.push(Box::new(UseSharedModules::from_config(table)?)),
        None => debug!("No [rules.{}] table", use_shared_modules::NAME),
    }

    Ok(rules)
}
