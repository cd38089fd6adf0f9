//! Core analyzer for orchestrating lint execution.

use crate::config::{Config, RuleConfig};
use crate::context::FileContext;
use crate::extractor::{ExtractError, ExtractorBox, ImportExtractor};
use crate::manifest::{normalize, ManifestLocator};
use crate::rule::{Rule, RuleBox, RuleError};
use crate::session::AnalysisSession;
use crate::types::{AnalysisFailure, LintResult, Violation};

use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that can occur during analysis.
#[derive(Debug, Error)]
pub enum AnalyzerError {
    /// IO error reading files.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Error walking the project tree.
    #[error("Failed to walk project tree: {0}")]
    Walk(#[from] ignore::Error),

    /// Glob pattern error.
    #[error("Invalid glob pattern: {0}")]
    Glob(#[from] glob::PatternError),

    /// A rule failed on a file.
    #[error("Rule failed on {path}: {source}")]
    Rule {
        /// File being checked.
        path: PathBuf,
        /// Rule error.
        source: RuleError,
    },

    /// Import extraction failed on a file.
    #[error("Failed to extract imports from {path}: {source}")]
    Extract {
        /// File being checked.
        path: PathBuf,
        /// Extractor error.
        source: ExtractError,
    },

    /// No extractor handles the file's extension.
    #[error("No extractor handles {0}")]
    Unsupported(PathBuf),
}

/// Builder for configuring an [`Analyzer`].
#[derive(Default)]
pub struct AnalyzerBuilder {
    root: Option<PathBuf>,
    rules: Vec<RuleBox>,
    extractors: Vec<ExtractorBox>,
    exclude_patterns: Vec<String>,
    config: Option<Config>,
    session: Option<AnalysisSession>,
    fail_fast: bool,
}

impl AnalyzerBuilder {
    /// Creates a new builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the root directory to analyze.
    #[must_use]
    pub fn root(mut self, path: impl Into<PathBuf>) -> Self {
        self.root = Some(path.into());
        self
    }

    /// Adds a rule to the analyzer.
    #[must_use]
    pub fn rule<R: Rule + 'static>(mut self, rule: R) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    /// Adds a boxed rule to the analyzer.
    #[must_use]
    pub fn rule_box(mut self, rule: RuleBox) -> Self {
        self.rules.push(rule);
        self
    }

    /// Adds an import extractor.
    #[must_use]
    pub fn extractor<E: ImportExtractor + 'static>(mut self, extractor: E) -> Self {
        self.extractors.push(Box::new(extractor));
        self
    }

    /// Adds a boxed import extractor.
    #[must_use]
    pub fn extractor_box(mut self, extractor: ExtractorBox) -> Self {
        self.extractors.push(extractor);
        self
    }

    /// Adds an exclude glob pattern.
    #[must_use]
    pub fn exclude(mut self, pattern: impl Into<String>) -> Self {
        self.exclude_patterns.push(pattern.into());
        self
    }

    /// Adds multiple exclude glob patterns.
    #[must_use]
    pub fn excludes<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_patterns
            .extend(patterns.into_iter().map(Into::into));
        self
    }

    /// Sets the configuration.
    #[must_use]
    pub fn config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Uses an existing session instead of creating one from the config.
    #[must_use]
    pub fn session(mut self, session: AnalysisSession) -> Self {
        self.session = Some(session);
        self
    }

    /// Sets whether the first per-file failure aborts the run (default: false).
    #[must_use]
    pub fn fail_fast(mut self, fail: bool) -> Self {
        self.fail_fast = fail;
        self
    }

    /// Builds the analyzer.
    ///
    /// # Errors
    ///
    /// Returns an error if the current directory cannot be determined or an
    /// exclude pattern is not a valid glob.
    pub fn build(self) -> Result<Analyzer, AnalyzerError> {
        let config = self.config.unwrap_or_default();

        let root = self
            .root
            .unwrap_or_else(|| config.analyzer.root.clone());

        let root = if root.is_absolute() {
            normalize(&root)
        } else {
            normalize(&std::env::current_dir()?.join(&root))
        };

        let mut exclude_patterns = self.exclude_patterns;
        exclude_patterns.extend(config.analyzer.exclude.iter().cloned());

        let excludes = exclude_patterns
            .iter()
            .map(|p| glob::Pattern::new(p))
            .collect::<Result<Vec<_>, _>>()?;

        let session = self.session.unwrap_or_else(|| {
            AnalysisSession::new(
                ManifestLocator::new(config.analyzer.manifest.clone())
                    .cache_missing(config.analyzer.cache_missing_manifests),
            )
        });

        Ok(Analyzer {
            root,
            rules: self.rules,
            extractors: self.extractors,
            exclude_patterns,
            excludes,
            config,
            session,
            fail_fast: self.fail_fast,
        })
    }
}

/// The main analyzer that orchestrates lint execution.
///
/// Use [`Analyzer::builder()`] to construct an instance. The analyzer owns
/// one [`AnalysisSession`]; repeated calls to [`Analyzer::analyze`] or
/// [`Analyzer::check_file`] reuse its caches.
pub struct Analyzer {
    root: PathBuf,
    rules: Vec<RuleBox>,
    extractors: Vec<ExtractorBox>,
    exclude_patterns: Vec<String>,
    excludes: Vec<glob::Pattern>,
    config: Config,
    session: AnalysisSession,
    fail_fast: bool,
}

impl Analyzer {
    /// Creates a new builder for configuring an analyzer.
    #[must_use]
    pub fn builder() -> AnalyzerBuilder {
        AnalyzerBuilder::new()
    }

    /// Returns the root directory being analyzed.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the number of registered rules.
    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Returns the session shared by every analyzed file.
    #[must_use]
    pub fn session(&self) -> &AnalysisSession {
        &self.session
    }

    /// Analyzes all files under the root and returns the results.
    ///
    /// Files that fail (unreadable, unparsable, malformed manifest) are
    /// recorded in [`LintResult::failures`] unless the analyzer was built
    /// with `fail_fast(true)`.
    ///
    /// # Errors
    ///
    /// Returns an error if file discovery fails, or on the first per-file
    /// failure in fail-fast mode.
    pub fn analyze(&self) -> Result<LintResult, AnalyzerError> {
        info!("Starting analysis at {:?}", self.root);

        let mut result = LintResult::new();
        let files = self.discover_files()?;

        info!("Found {} files to analyze", files.len());

        for file_path in &files {
            match self.check_file(file_path) {
                Ok(violations) => {
                    result.violations.extend(violations);
                    result.files_checked += 1;
                }
                Err(e) if !self.fail_fast => {
                    warn!("Skipping {}: {}", file_path.display(), e);
                    result.failures.push(AnalysisFailure {
                        file: self.relative(file_path),
                        message: e.to_string(),
                    });
                }
                Err(e) => return Err(e),
            }
        }

        result.violations.sort_by(|a, b| {
            a.location
                .file
                .cmp(&b.location.file)
                .then(a.location.line.cmp(&b.location.line))
                .then(a.location.column.cmp(&b.location.column))
        });

        info!(
            "Analysis complete: {} violations in {} files",
            result.violations.len(),
            result.files_checked
        );

        Ok(result)
    }

    /// Analyzes a single file and returns its violations.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, no extractor handles it,
    /// extraction fails, or a rule fails.
    pub fn check_file(&self, path: &Path) -> Result<Vec<Violation>, AnalyzerError> {
        debug!("Analyzing: {}", path.display());

        let path = if path.is_absolute() {
            normalize(path)
        } else {
            normalize(&self.root.join(path))
        };

        let extractor = self
            .extractor_for(&path)
            .ok_or_else(|| AnalyzerError::Unsupported(path.clone()))?;

        let content = std::fs::read_to_string(&path)?;
        let imports = extractor
            .extract(&content)
            .map_err(|source| AnalyzerError::Extract {
                path: path.clone(),
                source,
            })?;

        let ctx = FileContext::new(&path, &content, &self.root, &imports, &self.session);
        let mut violations = Vec::new();

        for rule in &self.rules {
            if !self.config.is_rule_enabled(rule.name()) {
                debug!("Skipping disabled rule: {}", rule.name());
                continue;
            }

            let rule_violations = rule.check(&ctx).map_err(|source| AnalyzerError::Rule {
                path: path.clone(),
                source,
            })?;
            let rule_violations = self.apply_severity_override(&**rule, rule_violations);
            violations.extend(rule_violations);
        }

        Ok(violations)
    }

    fn extractor_for(&self, path: &Path) -> Option<&dyn ImportExtractor> {
        self.extractors
            .iter()
            .find(|e| e.handles(path))
            .map(|e| &**e)
    }

    /// Applies severity overrides from configuration.
    ///
    /// Only violations carrying the rule's primary code are affected; a rule's
    /// secondary codes keep the severity the rule assigned.
    fn apply_severity_override(
        &self,
        rule: &dyn Rule,
        mut violations: Vec<Violation>,
    ) -> Vec<Violation> {
        if let Some(severity) = self.config.rule_severity(rule.name()) {
            for v in violations.iter_mut().filter(|v| v.code == rule.code()) {
                v.severity = severity;
            }
        }
        violations
    }

    /// Discovers all source files handled by a registered extractor.
    fn discover_files(&self) -> Result<Vec<PathBuf>, AnalyzerError> {
        let mut builder = ignore::WalkBuilder::new(&self.root);
        builder
            .hidden(false)
            .git_ignore(self.config.analyzer.respect_gitignore)
            .require_git(false);

        let mut files = Vec::new();
        for entry in builder.build() {
            let entry = entry?;
            let path = entry.path();

            if !path.is_file() || self.extractor_for(path).is_none() {
                continue;
            }

            if self.should_exclude(path) {
                debug!("Excluding: {}", path.display());
                continue;
            }

            files.push(path.to_path_buf());
        }

        files.sort();
        Ok(files)
    }

    /// Checks if a path should be excluded.
    fn should_exclude(&self, path: &Path) -> bool {
        let path_str = path.to_string_lossy();

        if self.excludes.iter().any(|p| p.matches(&path_str)) {
            return true;
        }

        // Also check as substring for patterns like "**/node_modules/**"
        self.exclude_patterns.iter().any(|pattern| {
            let normalized = pattern.replace("**", "");
            !normalized.is_empty() && normalized != "/" && path_str.contains(&normalized)
        })
    }

    fn relative(&self, path: &Path) -> PathBuf {
        path.strip_prefix(&self.root)
            .map_or_else(|_| path.to_path_buf(), Path::to_path_buf)
    }

    /// Gets the rule configuration for a specific rule.
    #[must_use]
    pub fn rule_config(&self, rule_name: &str) -> Option<&RuleConfig> {
        self.config.rules.get(rule_name)
    }
}
