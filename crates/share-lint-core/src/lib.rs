//! # share-lint-core
//!
//! Core framework for enforcing shared-module imports in JavaScript and
//! TypeScript monorepos.
//!
//! This crate provides the foundational pieces the rules build on:
//!
//! - [`ManifestLocator`] for memoized nearest-`package.json` lookup
//! - [`AnalysisSession`] owning the run-scoped caches
//! - [`Rule`] trait for per-file rules over extracted imports
//! - [`ImportExtractor`] trait for pluggable import extraction
//! - [`Analyzer`] for orchestrating lint execution
//! - [`Violation`] and [`TextEdit`] for findings and their fixes
//!
//! ## Example
//!
//! ```ignore
//! use share_lint_core::Analyzer;
//!
//! let analyzer = Analyzer::builder()
//!     .root("./packages")
//!     .extractor(JavaScriptExtractor::new())
//!     .rule(UseSharedModules::new(registry, "@acme/core"))
//!     .build()?;
//!
//! let result = analyzer.analyze()?;
//! result.print_report();
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod analyzer;
mod config;
mod context;
mod extractor;
mod fix;
mod manifest;
mod rule;
mod session;
mod types;

/// Utility modules for rule implementations.
pub mod utils;

pub use analyzer::{Analyzer, AnalyzerBuilder, AnalyzerError};
pub use config::{AnalyzerConfig, Config, ConfigError, RuleConfig};
pub use context::FileContext;
pub use extractor::{ExtractError, ExtractorBox, ImportExtractor, ImportKind, ImportReference};
pub use fix::{apply_edits, FixOutcome};
pub use manifest::{Manifest, ManifestError, ManifestFs, ManifestLocator, OsFs, DEFAULT_MANIFEST};
pub use rule::{Rule, RuleBox, RuleError};
pub use session::{AnalysisSession, FirstOccurrence};
pub use types::{
    AnalysisFailure, Label, LintResult, Location, Severity, Suggestion, TextEdit, Violation,
    ViolationDiagnostic,
};
pub use utils::allowance::{AllowCheck, AllowState};
