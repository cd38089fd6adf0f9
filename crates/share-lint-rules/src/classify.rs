//! Import classification and the prefix fix.

use crate::registry::SharedModuleRegistry;
use share_lint_core::{ImportReference, TextEdit};

/// Outcome of classifying one imported module name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Already imported through a registered shared path.
    AlreadyShared,
    /// Bare name with a registered shared counterpart.
    ShouldBeShared(String),
    /// Bare name whose counterpart is not registered.
    MissingSharedCounterpart(String),
    /// No relation to the shared registry.
    Unrelated,
}

/// Classifies `module` against `registry`.
///
/// Prefixed names that are not registered are [`Verdict::Unrelated`].
#[must_use]
pub fn classify(module: &str, registry: &dyn SharedModuleRegistry) -> Verdict {
    let prefix = registry.prefix();
    let prefixed = module
        .strip_prefix(prefix)
        .is_some_and(|rest| rest.starts_with('/'));

    if prefixed {
        return if registry.is_shared_module_name(module) {
            Verdict::AlreadyShared
        } else {
            Verdict::Unrelated
        };
    }

    match registry.shared_counterpart_of(module) {
        Some(shared) if registry.is_shared_module_name(&shared) => Verdict::ShouldBeShared(shared),
        Some(shared) => Verdict::MissingSharedCounterpart(shared),
        None => Verdict::Unrelated,
    }
}

/// Edit rewriting `reference` to import `shared`.
///
/// When `shared` is `<prefix>/<module>` the edit inserts `<prefix>/` right
/// after the opening quote. Otherwise it replaces the text between the
/// quotes.
#[must_use]
pub fn shared_fix(reference: &ImportReference, shared: &str, prefix: &str) -> TextEdit {
    let inserted = shared
        .strip_suffix(reference.module.as_str())
        .filter(|head| head.strip_suffix('/') == Some(prefix));

    match inserted {
        Some(head) => TextEdit::insert(reference.content_start(), head),
        None => TextEdit::replace(reference.content_start(), reference.content_end(), shared),
    }
}
