//! Core types for lint violations, fixes, and results.

use miette::{Diagnostic, SourceSpan};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Severity level for lint violations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational message, does not fail lint.
    Info,
    /// Warning that should be addressed.
    Warning,
    /// Error that must be fixed.
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Source code location.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    /// File path relative to project root.
    pub file: PathBuf,
    /// Line number (1-indexed).
    pub line: usize,
    /// Column number (1-indexed, in bytes).
    pub column: usize,
    /// Byte offset in file.
    pub offset: usize,
    /// Length of the span in bytes.
    pub length: usize,
}

impl Location {
    /// Creates a new location with explicit values.
    #[must_use]
    pub fn new(file: PathBuf, line: usize, column: usize) -> Self {
        Self {
            file,
            line,
            column,
            offset: 0,
            length: 0,
        }
    }

    /// Location used for file-level findings: line 1, column 1.
    #[must_use]
    pub fn file_start(file: PathBuf) -> Self {
        Self::new(file, 1, 1)
    }

    /// Sets the byte offset and length for this location.
    #[must_use]
    pub fn with_span(mut self, offset: usize, length: usize) -> Self {
        self.offset = offset;
        self.length = length;
        self
    }
}

/// A labeled span for additional context in violations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Label {
    /// Location of the label.
    pub location: Location,
    /// Message for this label.
    pub message: String,
}

impl Label {
    /// Creates a new label.
    #[must_use]
    pub fn new(location: Location, message: impl Into<String>) -> Self {
        Self {
            location,
            message: message.into(),
        }
    }
}

/// A single text edit over byte offsets of a source file.
///
/// Insertions are edits with `start == end`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextEdit {
    /// Start byte offset.
    pub start: usize,
    /// End byte offset (exclusive).
    pub end: usize,
    /// Text replacing `start..end`.
    pub new_text: String,
}

impl TextEdit {
    /// Creates an edit replacing `start..end`.
    #[must_use]
    pub fn replace(start: usize, end: usize, new_text: impl Into<String>) -> Self {
        Self {
            start,
            end,
            new_text: new_text.into(),
        }
    }

    /// Creates an insertion at `offset`.
    #[must_use]
    pub fn insert(offset: usize, text: impl Into<String>) -> Self {
        Self::replace(offset, offset, text)
    }

    /// Returns true if this edit only inserts text.
    #[must_use]
    pub fn is_insertion(&self) -> bool {
        self.start == self.end
    }
}

/// A suggested fix for a violation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Suggestion {
    /// Human-readable description of the fix.
    pub message: String,
    /// Optional automatic edit.
    pub edit: Option<TextEdit>,
}

impl Suggestion {
    /// Creates a new suggestion without automatic fix.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            edit: None,
        }
    }

    /// Creates a new suggestion with automatic fix.
    #[must_use]
    pub fn with_fix(message: impl Into<String>, edit: TextEdit) -> Self {
        Self {
            message: message.into(),
            edit: Some(edit),
        }
    }
}

/// A lint violation found during analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Violation {
    /// Diagnostic code (e.g., "SL001").
    pub code: String,
    /// Rule name (e.g., "use-shared-modules").
    pub rule: String,
    /// Severity of this violation.
    pub severity: Severity,
    /// Primary location of the violation.
    pub location: Location,
    /// Human-readable message.
    pub message: String,
    /// Optional suggestion for fixing.
    pub suggestion: Option<Suggestion>,
    /// Additional labels for context.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<Label>,
}

impl Violation {
    /// Creates a new violation.
    #[must_use]
    pub fn new(
        code: impl Into<String>,
        rule: impl Into<String>,
        severity: Severity,
        location: Location,
        message: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            rule: rule.into(),
            severity,
            location,
            message: message.into(),
            suggestion: None,
            labels: Vec::new(),
        }
    }

    /// Adds a suggestion to this violation.
    #[must_use]
    pub fn with_suggestion(mut self, suggestion: Suggestion) -> Self {
        self.suggestion = Some(suggestion);
        self
    }

    /// Adds a label to this violation.
    #[must_use]
    pub fn with_label(mut self, label: Label) -> Self {
        self.labels.push(label);
        self
    }

    /// Returns the automatic edit, if this violation has one.
    #[must_use]
    pub fn fix(&self) -> Option<&TextEdit> {
        self.suggestion.as_ref().and_then(|s| s.edit.as_ref())
    }

    /// Formats the violation for terminal output.
    #[must_use]
    pub fn format(&self) -> String {
        use std::fmt::Write;
        let mut output = format!(
            "{} {} at {}:{}:{}\n",
            self.code,
            self.rule,
            self.location.file.display(),
            self.location.line,
            self.location.column,
        );
        let _ = writeln!(output, "  {}: {}", self.severity, self.message);
        for label in &self.labels {
            let _ = writeln!(
                output,
                "  = note: {} ({})",
                label.message,
                label.location.file.display()
            );
        }
        if let Some(suggestion) = &self.suggestion {
            let fixable = if suggestion.edit.is_some() {
                " [fixable]"
            } else {
                ""
            };
            let _ = writeln!(output, "  = help: {}{fixable}", suggestion.message);
        }
        output
    }
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}:{}: {} [{}] {}",
            self.location.file.display(),
            self.location.line,
            self.location.column,
            self.severity,
            self.code,
            self.message
        )
    }
}

/// A violation converted for rich terminal rendering with miette.
#[derive(Debug, thiserror::Error, Diagnostic)]
#[error("{message}")]
pub struct ViolationDiagnostic {
    message: String,
    #[help]
    help: Option<String>,
    #[label("{label_message}")]
    span: SourceSpan,
    label_message: String,
}

impl From<&Violation> for ViolationDiagnostic {
    fn from(v: &Violation) -> Self {
        Self {
            message: format!("[{}] {}", v.code, v.message),
            help: v.suggestion.as_ref().map(|s| s.message.clone()),
            span: SourceSpan::from((v.location.offset, v.location.length)),
            label_message: v.rule.clone(),
        }
    }
}

/// A file that could not be analyzed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisFailure {
    /// File path relative to project root.
    pub file: PathBuf,
    /// Error message.
    pub message: String,
}

/// Result of running lint analysis.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct LintResult {
    /// All violations found.
    pub violations: Vec<Violation>,
    /// Number of files checked.
    pub files_checked: usize,
    /// Files skipped because analysis failed.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<AnalysisFailure>,
}

impl LintResult {
    /// Creates a new empty result.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if there are any errors.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.violations
            .iter()
            .any(|v| v.severity == Severity::Error)
    }

    /// Returns true if there are any warnings or errors.
    #[must_use]
    pub fn has_warnings(&self) -> bool {
        self.violations
            .iter()
            .any(|v| v.severity >= Severity::Warning)
    }

    /// Returns violations filtered by severity.
    #[must_use]
    pub fn by_severity(&self, severity: Severity) -> Vec<&Violation> {
        self.violations
            .iter()
            .filter(|v| v.severity == severity)
            .collect()
    }

    /// Counts violations by severity.
    #[must_use]
    pub fn count_by_severity(&self) -> (usize, usize, usize) {
        let count = |severity| {
            self.violations
                .iter()
                .filter(|v| v.severity == severity)
                .count()
        };
        (
            count(Severity::Error),
            count(Severity::Warning),
            count(Severity::Info),
        )
    }

    /// Number of violations carrying an automatic fix.
    #[must_use]
    pub fn fixable_count(&self) -> usize {
        self.violations.iter().filter(|v| v.fix().is_some()).count()
    }

    /// Groups the automatic edits of all fixable violations by file.
    #[must_use]
    pub fn fixes_by_file(&self) -> BTreeMap<PathBuf, Vec<TextEdit>> {
        let mut fixes: BTreeMap<PathBuf, Vec<TextEdit>> = BTreeMap::new();
        for v in &self.violations {
            if let Some(edit) = v.fix() {
                fixes
                    .entry(v.location.file.clone())
                    .or_default()
                    .push(edit.clone());
            }
        }
        fixes
    }

    /// Prints a summary report to stdout.
    pub fn print_report(&self) {
        let (errors, warnings, infos) = self.count_by_severity();

        for violation in &self.violations {
            println!("{}", violation.format());
        }

        for failure in &self.failures {
            println!(
                "failed to analyze {}: {}",
                failure.file.display(),
                failure.message
            );
        }

        println!(
            "\nFound {} error(s), {} warning(s), {} info(s) in {} file(s)",
            errors, warnings, infos, self.files_checked
        );
    }

    /// Checks if any violations meet or exceed the given severity threshold.
    #[must_use]
    pub fn has_violations_at(&self, severity: Severity) -> bool {
        self.violations.iter().any(|v| v.severity >= severity)
    }

    /// Adds violations from another result.
    pub fn extend(&mut self, other: Self) {
        self.violations.extend(other.violations);
        self.files_checked += other.files_checked;
        self.failures.extend(other.failures);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_violation(severity: Severity) -> Violation {
        Violation::new(
            "SL001",
            "use-shared-modules",
            severity,
            Location::new(PathBuf::from("packages/app/src/index.js"), 3, 20),
            "Import `react` through `@acme/core/shared/react`",
        )
    }

    #[test]
    fn insertion_edit_has_empty_range() {
        let edit = TextEdit::insert(5, "@acme/core/shared/");
        assert!(edit.is_insertion());
        assert_eq!(edit.start, 5);
        assert_eq!(edit.end, 5);
        assert!(!TextEdit::replace(1, 4, "x").is_insertion());
    }

    #[test]
    fn violation_without_suggestion_has_no_fix() {
        let v = make_violation(Severity::Error);
        assert!(v.fix().is_none());

        let v = v.with_suggestion(Suggestion::new("Check the registry"));
        assert!(v.fix().is_none());
    }

    #[test]
    fn violation_fix_exposes_edit() {
        let v = make_violation(Severity::Error).with_suggestion(Suggestion::with_fix(
            "Prefix with `@acme/core/shared/`",
            TextEdit::insert(21, "@acme/core/shared/"),
        ));
        assert_eq!(v.fix(), Some(&TextEdit::insert(21, "@acme/core/shared/")));
    }

    #[test]
    fn violation_format_marks_fixable_help() {
        let v = make_violation(Severity::Error).with_suggestion(Suggestion::with_fix(
            "Prefix with `@acme/core/shared/`",
            TextEdit::insert(21, "@acme/core/shared/"),
        ));
        insta::assert_snapshot!(v.format(), @r"
        SL001 use-shared-modules at packages/app/src/index.js:3:20
          error: Import `react` through `@acme/core/shared/react`
          = help: Prefix with `@acme/core/shared/` [fixable]
        ");
    }

    #[test]
    fn violation_format_includes_labels() {
        let v = make_violation(Severity::Info).with_label(Label::new(
            Location::file_start(PathBuf::from("packages/app/package.json")),
            "declared here",
        ));
        let formatted = v.format();
        assert!(formatted.contains("= note: declared here (packages/app/package.json)"));
    }

    #[test]
    fn violation_display_is_single_line() {
        let v = make_violation(Severity::Warning);
        assert_eq!(
            v.to_string(),
            "packages/app/src/index.js:3:20: warning [SL001] Import `react` through `@acme/core/shared/react`"
        );
    }

    // --- LintResult tests ---

    #[test]
    fn has_violations_at_error_only() {
        let mut result = LintResult::new();
        result.violations.push(make_violation(Severity::Warning));
        assert!(!result.has_violations_at(Severity::Error));
        assert!(result.has_violations_at(Severity::Warning));
    }

    #[test]
    fn count_by_severity_counts_each_level() {
        let mut result = LintResult::new();
        result.violations.push(make_violation(Severity::Error));
        result.violations.push(make_violation(Severity::Error));
        result.violations.push(make_violation(Severity::Info));
        assert_eq!(result.count_by_severity(), (2, 0, 1));
        assert!(result.has_errors());
        assert!(result.has_warnings());
    }

    #[test]
    fn fixes_are_grouped_per_file() {
        let mut result = LintResult::new();
        let fixable = |file: &str, offset| {
            Violation::new(
                "SL001",
                "use-shared-modules",
                Severity::Error,
                Location::new(PathBuf::from(file), 1, 1),
                "msg",
            )
            .with_suggestion(Suggestion::with_fix("fix", TextEdit::insert(offset, "p/")))
        };
        result.violations.push(fixable("a.js", 1));
        result.violations.push(fixable("b.js", 8));
        result.violations.push(fixable("a.js", 30));
        result.violations.push(make_violation(Severity::Warning));

        assert_eq!(result.fixable_count(), 3);
        let fixes = result.fixes_by_file();
        assert_eq!(fixes.len(), 2);
        assert_eq!(fixes[&PathBuf::from("a.js")].len(), 2);
        assert_eq!(fixes[&PathBuf::from("b.js")].len(), 1);
    }

    #[test]
    fn extend_merges_failures() {
        let mut a = LintResult::new();
        a.files_checked = 2;
        let mut b = LintResult::new();
        b.files_checked = 1;
        b.failures.push(AnalysisFailure {
            file: PathBuf::from("broken/index.js"),
            message: "invalid package.json".to_string(),
        });
        b.violations.push(make_violation(Severity::Error));

        a.extend(b);
        assert_eq!(a.files_checked, 3);
        assert_eq!(a.failures.len(), 1);
        assert_eq!(a.violations.len(), 1);
    }
}
