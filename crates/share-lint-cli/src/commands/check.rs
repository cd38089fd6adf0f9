//! Check command implementation.

use anyhow::{Context, Result};
use share_lint_core::{apply_edits, Analyzer, Config, LintResult};
use share_lint_rules::rules_from_config;
use share_lint_ts::default_extractors;
use std::path::{Path, PathBuf};

use crate::config_resolver::ConfigSource;
use crate::OutputFormat;

/// Runs the check command.
///
/// Returns `true` when errors or per-file failures remain.
pub fn run(
    path: &Path,
    format: OutputFormat,
    exclude: &[String],
    fix: bool,
    source: &ConfigSource,
) -> Result<bool> {
    let config = load_config(source)?;

    let mut result = analyze(path, &config, exclude)?;

    if fix && result.fixable_count() > 0 {
        let root = root_of(path);
        let summary = apply_fixes(&root, &result)?;
        tracing::info!(
            "Applied {} fix(es) in {} file(s)",
            summary.applied,
            summary.files
        );
        if summary.skipped > 0 {
            tracing::warn!("Skipped {} overlapping or stale fix(es)", summary.skipped);
        }
        result = analyze(path, &config, exclude)?;
    }

    super::output::print(&result, format, &root_of(path))?;

    Ok(result.has_errors() || !result.failures.is_empty())
}

fn load_config(source: &ConfigSource) -> Result<Config> {
    match source {
        ConfigSource::Default => {
            tracing::warn!("No share-lint.toml found; run `share-lint init` to create one");
            Ok(Config::default())
        }
        other => {
            // Invariant: non-Default variants always have a path
            let p = other.path().context("resolved config has no path")?;
            if source.is_global() {
                tracing::info!("Using global config: {}", p.display());
            }
            Config::from_file(p).with_context(|| format!("Failed to load config: {}", p.display()))
        }
    }
}

/// Directory the analyzer runs from: `path` itself, or its parent for a file.
fn root_of(path: &Path) -> PathBuf {
    if path.is_file() {
        path.parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map_or_else(|| PathBuf::from("."), Path::to_path_buf)
    } else {
        path.to_path_buf()
    }
}

fn build_analyzer(root: &Path, config: &Config, exclude: &[String]) -> Result<Analyzer> {
    let rules = rules_from_config(config).context("Invalid rule configuration")?;
    if rules.is_empty() {
        tracing::warn!("No rules configured; add a [rules.use-shared-modules] table");
    }

    let mut builder = Analyzer::builder()
        .root(root)
        .config(config.clone())
        .excludes(exclude.iter().cloned());

    for rule in rules {
        builder = builder.rule_box(rule);
    }
    for extractor in default_extractors() {
        builder = builder.extractor_box(extractor);
    }

    builder.build().context("Failed to build analyzer")
}

fn analyze(path: &Path, config: &Config, exclude: &[String]) -> Result<LintResult> {
    let analyzer = build_analyzer(&root_of(path), config, exclude)?;

    tracing::info!("Analyzing {:?} with {} rules", path, analyzer.rule_count());

    if path.is_file() {
        let file = path.file_name().map_or(path, Path::new);
        let violations = analyzer
            .check_file(file)
            .with_context(|| format!("Failed to check {}", path.display()))?;
        let mut result = LintResult::new();
        result.violations = violations;
        result.files_checked = 1;
        return Ok(result);
    }

    analyzer.analyze().context("Analysis failed")
}

/// Counts from writing fixes back to disk.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct FixSummary {
    /// Files rewritten.
    pub files: usize,
    /// Edits applied.
    pub applied: usize,
    /// Edits skipped.
    pub skipped: usize,
}

/// Applies every automatic fix in `result` to the files under `root`.
pub fn apply_fixes(root: &Path, result: &LintResult) -> Result<FixSummary> {
    let mut summary = FixSummary::default();

    for (file, edits) in result.fixes_by_file() {
        let path = root.join(&file);
        let source = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        let outcome = apply_edits(&source, &edits);
        summary.skipped += outcome.skipped.len();
        if !outcome.changed() {
            continue;
        }

        std::fs::write(&path, &outcome.content)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        tracing::debug!("Fixed {} import(s) in {}", outcome.applied, file.display());
        summary.files += 1;
        summary.applied += outcome.applied;
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const CONFIG: &str = r#"
[rules.use-shared-modules]
core_package = "@acme/core"
prefix = "@acme/core/shared"
modules = ["react", "lodash"]
advisory = false
"#;

    fn project() -> TempDir {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("app/src");
        fs::create_dir_all(&src).unwrap();
        fs::write(
            tmp.path().join("app/package.json"),
            r#"{"dependencies": {"@acme/core": "1"}}"#,
        )
        .unwrap();
        fs::write(
            src.join("index.ts"),
            "import React from \"react\";\nimport _ from 'lodash';\nimport { z } from \"zod\";\n",
        )
        .unwrap();
        tmp
    }

    #[test]
    fn fixes_are_written_back() {
        let tmp = project();
        let config = Config::parse(CONFIG).unwrap();

        let result = analyze(tmp.path(), &config, &[]).unwrap();
        assert_eq!(result.fixable_count(), 2);

        let summary = apply_fixes(tmp.path(), &result).unwrap();
        assert_eq!(
            summary,
            FixSummary {
                files: 1,
                applied: 2,
                skipped: 0
            }
        );

        let fixed = fs::read_to_string(tmp.path().join("app/src/index.ts")).unwrap();
        assert_eq!(
            fixed,
            "import React from \"@acme/core/shared/react\";\nimport _ from '@acme/core/shared/lodash';\nimport { z } from \"zod\";\n"
        );
        assert!(analyze(tmp.path(), &config, &[])
            .unwrap()
            .violations
            .is_empty());
    }

    #[test]
    fn single_file_is_checked_from_its_directory() {
        let tmp = project();
        let config = Config::parse(CONFIG).unwrap();
        let file = tmp.path().join("app/src/index.ts");

        let result = analyze(&file, &config, &[]).unwrap();
        assert_eq!(result.files_checked, 1);
        assert_eq!(result.violations.len(), 2);
        assert_eq!(
            result.violations[0].location.file,
            PathBuf::from("index.ts")
        );
    }

    #[test]
    fn excluded_files_are_skipped() {
        let tmp = project();
        let config = Config::parse(CONFIG).unwrap();
        let result = analyze(tmp.path(), &config, &["**/app/**".to_string()]).unwrap();
        assert_eq!(result.files_checked, 0);
    }

    #[test]
    fn root_of_file_is_its_parent() {
        let tmp = project();
        let file = tmp.path().join("app/src/index.ts");
        assert_eq!(root_of(&file), tmp.path().join("app/src"));
        assert_eq!(root_of(tmp.path()), tmp.path());
    }
}
