//! Comment-based allowance directives.
//!
//! Supports directives like:
//! ```text
//! // share-lint: allow(use-shared-modules) reason="polyfill must load first"
//! /* share-lint: allow(all) */
//! ```
//!
//! A directive applies to its own line and to the line right after it.

use std::collections::HashSet;

const DIRECTIVE_PREFIX: &str = "share-lint:";

/// State of allowance for a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllowState {
    /// Rule is not allowed (default).
    Denied,
    /// Rule is explicitly allowed.
    Allowed,
}

impl AllowState {
    /// Returns true if allowed.
    #[must_use]
    pub fn is_allowed(self) -> bool {
        self == Self::Allowed
    }
}

/// Result of checking for allow directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllowCheck {
    /// Rule is not allowed.
    Denied,
    /// Rule is allowed with optional reason.
    Allowed {
        /// The reason provided (if any).
        reason: Option<String>,
    },
}

impl AllowCheck {
    /// Returns true if allowed.
    #[must_use]
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed { .. })
    }

    /// Returns the reason if allowed.
    #[must_use]
    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Allowed { reason } => reason.as_deref(),
            Self::Denied => None,
        }
    }
}

/// Parsed allowance directive.
#[derive(Debug, Clone)]
pub struct AllowDirective {
    /// Rule names that are allowed.
    pub rules: HashSet<String>,
    /// Optional reason for the allowance.
    pub reason: Option<String>,
}

/// Checks source code for an allowance directive covering `line`.
#[must_use]
pub fn check_allow_comment(content: &str, line: usize, rule_name: &str) -> AllowState {
    match check_allow_with_reason(content, line, rule_name) {
        AllowCheck::Allowed { .. } => AllowState::Allowed,
        AllowCheck::Denied => AllowState::Denied,
    }
}

/// Checks source code for an allowance directive covering `line` (1-indexed),
/// returning the reason when one is given.
#[must_use]
pub fn check_allow_with_reason(content: &str, line: usize, rule_name: &str) -> AllowCheck {
    let lines: Vec<&str> = content.lines().collect();

    for check_line in [line.saturating_sub(1), line] {
        if check_line == 0 || check_line > lines.len() {
            continue;
        }

        if let Some(directive) = parse_allow_directive(lines[check_line - 1]) {
            if directive.rules.contains(rule_name) || directive.rules.contains("all") {
                return AllowCheck::Allowed {
                    reason: directive.reason,
                };
            }
        }
    }

    AllowCheck::Denied
}

/// Parses an allowance directive from a line, which may carry code before
/// a trailing comment.
fn parse_allow_directive(line: &str) -> Option<AllowDirective> {
    let start = line.find(DIRECTIVE_PREFIX)?;
    let before = line[..start].trim_end();
    if !(before.ends_with("//") || before.ends_with("/*")) {
        return None;
    }

    let directive = line[start + DIRECTIVE_PREFIX.len()..].trim();
    let allow_content = directive.strip_prefix("allow(")?.trim();

    let paren_end = allow_content.find(')')?;
    let rules: HashSet<String> = allow_content[..paren_end]
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    if rules.is_empty() {
        return None;
    }

    let rest = allow_content[paren_end + 1..].trim();
    let reason = rest
        .strip_prefix("reason=")
        .map(str::trim)
        .and_then(|r| r.strip_prefix('"'))
        .and_then(|r| r.find('"').map(|end| r[..end].to_string()));

    Some(AllowDirective { rules, reason })
}
