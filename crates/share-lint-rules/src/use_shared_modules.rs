//! Rule requiring shared modules to be imported through the core package.
//!
//! # Rationale
//!
//! Packages that depend on the core package must load its shared modules
//! through the core's re-export path (`<prefix>/<module>`), so that every
//! package in the monorepo shares a single instance instead of bundling its
//! own copy.
//!
//! # Diagnostics
//!
//! - `SL001`: a bare import of a shared module (fixable: inserts the prefix)
//! - `SL002`: a bare import whose shared counterpart is not registered
//! - `SL003`: the package declares shared modules as direct dependencies
//!   (reported once per manifest)
//!
//! # Configuration
//!
//! - `core_package`: name of the core package (required)
//! - `prefix`: shared re-export path prefix (required)
//! - `modules`: bare names of the shared modules
//! - `counterparts`: table of explicit bare-to-shared mappings
//! - `advisory`: emit `SL003` (default: true)
//!
//! # Suppression
//!
//! - `// share-lint: allow(use-shared-modules) reason="..."` comment on the
//!   import line or the line above

use crate::classify::{classify, shared_fix, Verdict};
use crate::dependency::{depends_on_core, shared_dependencies_of};
use crate::registry::{SharedModuleRegistry, SharedModuleTable};
use share_lint_core::utils::allowance::check_allow_with_reason;
use share_lint_core::{
    FileContext, ImportReference, Label, Location, Manifest, Rule, RuleConfig, RuleError,
    Severity, Suggestion, Violation,
};
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::debug;

/// Rule name for use-shared-modules.
pub const NAME: &str = "use-shared-modules";

/// Code for bare imports of shared modules.
pub const CODE: &str = "SL001";

/// Code for bare imports whose shared counterpart is not registered.
pub const MISSING_COUNTERPART_CODE: &str = "SL002";

/// Code for the once-per-manifest shared dependency advisory.
pub const ADVISORY_CODE: &str = "SL003";

/// Errors building a rule from its configuration table.
#[derive(Debug, Error)]
pub enum RuleConfigError {
    /// A required option is absent.
    #[error("[rules.{rule}] is missing required option `{option}`")]
    MissingOption {
        /// Rule name.
        rule: &'static str,
        /// Option key.
        option: &'static str,
    },

    /// An option has the wrong type.
    #[error("[rules.{rule}] option `{option}` must be {expected}")]
    InvalidOption {
        /// Rule name.
        rule: &'static str,
        /// Option key.
        option: &'static str,
        /// Expected shape.
        expected: &'static str,
    },
}

/// Requires shared modules to be imported through the core package's
/// shared path in packages that depend on the core package.
#[derive(Debug, Clone)]
pub struct UseSharedModules<R = SharedModuleTable> {
    registry: R,
    core_package: String,
    advisory: bool,
    severity: Severity,
}

impl<R: SharedModuleRegistry> UseSharedModules<R> {
    /// Creates the rule for packages depending on `core_package`.
    #[must_use]
    pub fn new(registry: R, core_package: impl Into<String>) -> Self {
        Self {
            registry,
            core_package: core_package.into(),
            advisory: true,
            severity: Severity::Error,
        }
    }

    /// Sets whether the shared dependency advisory is emitted.
    #[must_use]
    pub fn advisory(mut self, enabled: bool) -> Self {
        self.advisory = enabled;
        self
    }

    /// Sets the severity of `SL001`.
    #[must_use]
    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// Returns the registry the rule classifies against.
    #[must_use]
    pub fn registry(&self) -> &R {
        &self.registry
    }

    /// Returns the core package name.
    #[must_use]
    pub fn core_package(&self) -> &str {
        &self.core_package
    }

    fn advisory_violation(
        &self,
        ctx: &FileContext,
        manifest: &Manifest,
        shared: &[String],
    ) -> Violation {
        let manifest_path = ctx.display_path(&manifest.located_path);
        let listed = shared.join(", ");

        Violation::new(
            ADVISORY_CODE,
            NAME,
            Severity::Info,
            Location::file_start(ctx.relative_path.clone()),
            format!(
                "Package '{}' declares shared modules as direct dependencies: {listed}",
                manifest.display_name()
            ),
        )
        .with_label(Label::new(
            Location::file_start(manifest_path),
            format!("{listed} declared here"),
        ))
        .with_suggestion(Suggestion::new(format!(
            "Remove them from dependencies; '{}' already provides them under '{}/'",
            self.core_package,
            self.registry.prefix()
        )))
    }

    fn import_violation(
        &self,
        ctx: &FileContext,
        import: &ImportReference,
        verdict: Verdict,
    ) -> Option<Violation> {
        let location = ctx.location_of(import);
        match verdict {
            Verdict::ShouldBeShared(shared) => {
                let edit = shared_fix(import, &shared, self.registry.prefix());
                Some(
                    Violation::new(
                        CODE,
                        NAME,
                        self.severity,
                        location,
                        format!(
                            "'{}' is shared by '{}' and must be imported as '{shared}'",
                            import.module, self.core_package
                        ),
                    )
                    .with_suggestion(Suggestion::with_fix(
                        format!("Import from '{shared}'"),
                        edit,
                    )),
                )
            }
            Verdict::MissingSharedCounterpart(shared) => Some(
                Violation::new(
                    MISSING_COUNTERPART_CODE,
                    NAME,
                    Severity::Warning,
                    location,
                    format!(
                        "'{}' maps to shared module '{shared}', which is not registered",
                        import.module
                    ),
                )
                .with_suggestion(Suggestion::new(format!(
                    "Register '{shared}' with the shared modules of '{}' or fix the counterpart",
                    self.core_package
                ))),
            ),
            Verdict::AlreadyShared | Verdict::Unrelated => None,
        }
    }
}

impl UseSharedModules<SharedModuleTable> {
    /// Builds the rule from its `[rules.use-shared-modules]` table.
    ///
    /// # Errors
    ///
    /// Returns an error if `core_package` or `prefix` is missing, or an
    /// option has the wrong type.
    pub fn from_config(config: &RuleConfig) -> Result<Self, RuleConfigError> {
        let core_package = required_str(config, "core_package")?;
        let prefix = required_str(config, "prefix")?;

        let modules: Vec<String> = typed_option(config, "modules", "an array of strings")?
            .unwrap_or_default();
        let counterparts: BTreeMap<String, String> =
            typed_option(config, "counterparts", "a table of strings")?.unwrap_or_default();
        let advisory: bool = typed_option(config, "advisory", "a boolean")?.unwrap_or(true);

        let registry = counterparts.into_iter().fold(
            SharedModuleTable::new(prefix).modules(modules),
            |table, (bare, shared)| table.counterpart(bare, shared),
        );

        Ok(Self::new(registry, core_package).advisory(advisory))
    }
}

fn required_str(config: &RuleConfig, option: &'static str) -> Result<String, RuleConfigError> {
    typed_option(config, option, "a string")?.ok_or(RuleConfigError::MissingOption {
        rule: NAME,
        option,
    })
}

fn typed_option<T: DeserializeOwned>(
    config: &RuleConfig,
    option: &'static str,
    expected: &'static str,
) -> Result<Option<T>, RuleConfigError> {
    if !config.options.contains_key(option) {
        return Ok(None);
    }
    config
        .get_option::<T>(option)
        .map(Some)
        .ok_or(RuleConfigError::InvalidOption {
            rule: NAME,
            option,
            expected,
        })
}

impl<R: SharedModuleRegistry> Rule for UseSharedModules<R> {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Requires shared modules to be imported through the core package's shared path"
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn check(&self, ctx: &FileContext) -> Result<Vec<Violation>, RuleError> {
        let Some(manifest) = ctx.session.manifest_for(ctx.path)? else {
            debug!("No manifest for {}", ctx.relative_path.display());
            return Ok(Vec::new());
        };

        if !depends_on_core(&manifest, &self.core_package) {
            return Ok(Vec::new());
        }

        let mut violations = Vec::new();

        if self.advisory
            && ctx
                .session
                .first_time(manifest.located_path.to_string_lossy())
        {
            let shared = shared_dependencies_of(&manifest, &self.registry);
            if !shared.is_empty() {
                violations.push(self.advisory_violation(ctx, &manifest, &shared));
            }
        }

        for import in ctx.imports {
            let verdict = classify(&import.module, &self.registry);
            if matches!(verdict, Verdict::AlreadyShared | Verdict::Unrelated) {
                continue;
            }

            let allow_check = check_allow_with_reason(ctx.content, import.line, NAME);
            if allow_check.is_allowed() {
                if self.requires_allow_reason() && allow_check.reason().is_none() {
                    violations.push(
                        Violation::new(
                            CODE,
                            NAME,
                            Severity::Warning,
                            Location::new(ctx.relative_path.clone(), import.line, import.column),
                            format!("Allow directive for '{NAME}' is missing required reason"),
                        )
                        .with_suggestion(Suggestion::new(
                            "Add reason=\"...\" to explain why this import stays unshared",
                        )),
                    );
                }
                continue;
            }

            violations.extend(self.import_violation(ctx, import, verdict));
        }

        Ok(violations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use share_lint_core::{AnalysisSession, Config, ImportKind, ManifestLocator};
    use std::fs;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    fn rule() -> UseSharedModules {
        UseSharedModules::new(
            SharedModuleTable::new("@acme/core/shared")
                .modules(["react", "lodash"])
                .counterpart("moment", "@acme/core/shared/moment"),
            "@acme/core",
        )
    }

    /// Finds every double-quoted literal of `source` as an import.
    fn imports_of(source: &str) -> Vec<ImportReference> {
        let mut imports = Vec::new();
        for (i, line) in source.lines().enumerate() {
            let line_start = source.lines().take(i).map(|l| l.len() + 1).sum::<usize>();
            if line.trim_start().starts_with("//") {
                continue;
            }
            if let Some(open) = line.find('"') {
                let close = open + 1 + line[open + 1..].find('"').unwrap();
                imports.push(ImportReference {
                    module: line[open + 1..close].to_string(),
                    kind: ImportKind::Import,
                    start: line_start + open,
                    end: line_start + close + 1,
                    line: i + 1,
                    column: open + 1,
                });
            }
        }
        imports
    }

    struct Fixture {
        tmp: TempDir,
    }

    impl Fixture {
        fn new(manifest: &str) -> Self {
            let tmp = TempDir::new().unwrap();
            fs::create_dir_all(tmp.path().join("pkg/src")).unwrap();
            fs::write(tmp.path().join("pkg/package.json"), manifest).unwrap();
            Self { tmp }
        }

        fn path(&self, file: &str) -> PathBuf {
            self.tmp.path().join(file)
        }

        fn check(
            &self,
            rule: &UseSharedModules,
            session: &AnalysisSession,
            file: &str,
            source: &str,
        ) -> Vec<Violation> {
            let path = self.path(file);
            let imports = imports_of(source);
            let ctx = FileContext::new(&path, source, self.tmp.path(), &imports, session);
            rule.check(&ctx).unwrap()
        }
    }

    const CORE_DEP: &str = r#"{"name": "app", "dependencies": {"@acme/core": "^1.0.0"}}"#;

    #[test]
    fn bare_shared_import_is_fixable_error() {
        let fixture = Fixture::new(CORE_DEP);
        let session = AnalysisSession::default();
        let source = "import React from \"react\";\n";

        let violations = fixture.check(&rule(), &session, "pkg/src/a.js", source);
        assert_eq!(violations.len(), 1);
        let v = &violations[0];
        assert_eq!(v.code, CODE);
        assert_eq!(v.severity, Severity::Error);
        assert_eq!(v.location.file, Path::new("pkg/src/a.js"));
        assert_eq!((v.location.line, v.location.column), (1, 19));

        let edit = v.fix().unwrap();
        assert_eq!(edit.start, 19);
        assert_eq!(edit.new_text, "@acme/core/shared/");
    }

    #[test]
    fn already_shared_and_unrelated_are_quiet() {
        let fixture = Fixture::new(CORE_DEP);
        let session = AnalysisSession::default();
        let source = "import React from \"@acme/core/shared/react\";\nimport { z } from \"zod\";\n";
        assert!(fixture
            .check(&rule(), &session, "pkg/src/a.js", source)
            .is_empty());
    }

    #[test]
    fn missing_counterpart_is_a_warning_without_fix() {
        let fixture = Fixture::new(CORE_DEP);
        let session = AnalysisSession::default();
        let violations = fixture.check(
            &rule(),
            &session,
            "pkg/src/a.js",
            "import moment from \"moment\";\n",
        );
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].code, MISSING_COUNTERPART_CODE);
        assert_eq!(violations[0].severity, Severity::Warning);
        assert!(violations[0].fix().is_none());
    }

    #[test]
    fn packages_without_core_dependency_are_skipped() {
        let fixture =
            Fixture::new(r#"{"dependencies": {"react": "18", "lodash": "4"}}"#);
        let session = AnalysisSession::default();
        let source = "import React from \"react\";\nimport moment from \"moment\";\n";
        assert!(fixture
            .check(&rule(), &session, "pkg/src/a.js", source)
            .is_empty());
    }

    #[test]
    fn files_without_manifest_are_skipped() {
        let fixture = Fixture::new(CORE_DEP);
        let session = AnalysisSession::new(ManifestLocator::new("workspace.json"));
        let source = "import React from \"react\";\n";
        assert!(fixture
            .check(&rule(), &session, "pkg/src/a.js", source)
            .is_empty());
        assert_eq!(session.manifests().file_name(), "workspace.json");
    }

    #[test]
    fn malformed_manifest_is_an_error() {
        let fixture = Fixture::new("{ not json");
        let session = AnalysisSession::default();
        let path = fixture.path("pkg/src/a.js");
        let imports = imports_of("import React from \"react\";");
        let ctx = FileContext::new(&path, "", fixture.tmp.path(), &imports, &session);
        assert!(matches!(rule().check(&ctx), Err(RuleError::Manifest(_))));
    }

    #[test]
    fn advisory_is_reported_once_per_manifest() {
        let fixture = Fixture::new(
            r#"{"name": "app", "dependencies": {"@acme/core": "1", "lodash": "4", "zod": "3", "react": "18"}}"#,
        );
        let session = AnalysisSession::default();
        let rule = rule();

        let first = fixture.check(&rule, &session, "pkg/src/a.js", "");
        assert_eq!(first.len(), 1);
        let advisory = &first[0];
        assert_eq!(advisory.code, ADVISORY_CODE);
        assert_eq!(advisory.severity, Severity::Info);
        assert_eq!((advisory.location.line, advisory.location.column), (1, 1));
        assert!(advisory.message.ends_with("lodash, react"));
        assert_eq!(
            advisory.labels[0].location.file,
            Path::new("pkg/package.json")
        );

        let second = fixture.check(&rule, &session, "pkg/src/b.js", "");
        assert!(second.is_empty());

        let fresh = AnalysisSession::default();
        assert_eq!(fixture.check(&rule, &fresh, "pkg/src/b.js", "").len(), 1);
    }

    #[test]
    fn advisory_skips_dependencies_with_unregistered_counterparts() {
        let fixture = Fixture::new(
            r#"{"name": "app", "dependencies": {"@acme/core": "1", "moment": "2"}}"#,
        );
        let session = AnalysisSession::default();
        assert!(fixture
            .check(&rule(), &session, "pkg/src/a.js", "")
            .is_empty());

        let fixture = Fixture::new(
            r#"{"name": "app", "dependencies": {"@acme/core": "1", "moment": "2", "react": "18"}}"#,
        );
        let session = AnalysisSession::default();
        let violations = fixture.check(&rule(), &session, "pkg/src/a.js", "");
        assert_eq!(violations.len(), 1);
        assert!(violations[0].message.ends_with(": react"));
    }

    #[test]
    fn advisory_rendering() {
        let fixture = Fixture::new(
            r#"{"name": "app", "dependencies": {"@acme/core": "1", "react": "18"}}"#,
        );
        let session = AnalysisSession::default();
        let violations = fixture.check(&rule(), &session, "pkg/src/a.js", "");

        insta::assert_snapshot!(violations[0].format(), @r"
        SL003 use-shared-modules at pkg/src/a.js:1:1
          info: Package 'app' declares shared modules as direct dependencies: react
          = note: react declared here (pkg/package.json)
          = help: Remove them from dependencies; '@acme/core' already provides them under '@acme/core/shared/'
        ");
    }

    #[test]
    fn advisory_can_be_disabled() {
        let fixture =
            Fixture::new(r#"{"dependencies": {"@acme/core": "1", "react": "18"}}"#);
        let session = AnalysisSession::default();
        let rule = rule().advisory(false);
        assert!(fixture.check(&rule, &session, "pkg/src/a.js", "").is_empty());
    }

    #[test]
    fn allow_directive_suppresses_next_line_only() {
        let fixture = Fixture::new(CORE_DEP);
        let session = AnalysisSession::default();
        let source = "// share-lint: allow(use-shared-modules) reason=\"loads before core\"\nimport React from \"react\";\nimport _ from \"lodash\";\n";

        let violations = fixture.check(&rule(), &session, "pkg/src/a.js", source);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].location.line, 3);
    }

    #[test]
    fn allow_directive_without_reason_warns() {
        let fixture = Fixture::new(CORE_DEP);
        let session = AnalysisSession::default();
        let source = "import React from \"react\"; // share-lint: allow(use-shared-modules)\n";

        let violations = fixture.check(&rule(), &session, "pkg/src/a.js", source);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].severity, Severity::Warning);
        assert!(violations[0].message.contains("missing required reason"));
        assert!(violations[0].fix().is_none());
    }

    #[test]
    fn from_config_reads_every_option() {
        let config = Config::parse(
            r#"
[rules.use-shared-modules]
core_package = "@acme/core"
prefix = "@acme/core/shared"
modules = ["react", "react-dom-client"]
advisory = false

[rules.use-shared-modules.counterparts]
"react-dom/client" = "@acme/core/shared/react-dom-client"
"#,
        )
        .unwrap();
        let rule = UseSharedModules::from_config(&config.rules[NAME]).unwrap();

        assert_eq!(rule.core_package(), "@acme/core");
        assert!(!rule.advisory);
        assert_eq!(
            classify("react-dom/client", rule.registry()),
            Verdict::ShouldBeShared("@acme/core/shared/react-dom-client".into())
        );
    }

    #[test]
    fn from_config_rejects_missing_and_invalid_options() {
        let config = Config::parse("[rules.use-shared-modules]\nprefix = \"@acme/core/shared\"\n")
            .unwrap();
        assert!(matches!(
            UseSharedModules::from_config(&config.rules[NAME]),
            Err(RuleConfigError::MissingOption {
                option: "core_package",
                ..
            })
        ));

        let config = Config::parse(
            "[rules.use-shared-modules]\ncore_package = \"@acme/core\"\nprefix = \"@acme/core/shared\"\nmodules = \"react\"\n",
        )
        .unwrap();
        assert!(matches!(
            UseSharedModules::from_config(&config.rules[NAME]),
            Err(RuleConfigError::InvalidOption {
                option: "modules",
                ..
            })
        ));
    }
}
