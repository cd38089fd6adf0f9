//! # share-lint-rules
//!
//! The `use-shared-modules` rule and the pieces it is built from.
//!
//! Packages that depend on a designated core package must import the core's
//! shared modules through its re-export path instead of by their bare name.
//!
//! ## Diagnostics
//!
//! | Code | Severity | Description |
//! |------|----------|-------------|
//! | SL001 | error | Shared module imported by its bare name (fixable) |
//! | SL002 | warning | Shared counterpart of an import is not registered |
//! | SL003 | info | Package declares shared modules as direct dependencies |
//!
//! ## Usage
//!
//! ```ignore
//! use share_lint_core::Analyzer;
//! use share_lint_rules::{SharedModuleTable, UseSharedModules};
//!
//! let registry = SharedModuleTable::new("@acme/core/shared").modules(["react", "lodash"]);
//!
//! let analyzer = Analyzer::builder()
//!     .root("./packages")
//!     .rule(UseSharedModules::new(registry, "@acme/core"))
//!     .build()?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod catalog;
mod classify;
mod dependency;
mod registry;
mod use_shared_modules;

pub use catalog::{diagnostics, rules_from_config, DiagnosticInfo};
pub use classify::{classify, shared_fix, Verdict};
pub use dependency::{depends_on_core, shared_dependencies_of};
pub use registry::{SharedModuleRegistry, SharedModuleTable};
pub use use_shared_modules::{
    RuleConfigError, UseSharedModules, ADVISORY_CODE, CODE, MISSING_COUNTERPART_CODE, NAME,
};

/// Re-export core types for convenience.
pub use share_lint_core::{Rule, Severity, Violation};
