//! List rules command implementation.

use share_lint_rules::diagnostics;

/// Runs the list-rules command.
pub fn run() {
    println!("Available diagnostics:\n");
    println!(
        "{:<8} {:<20} {:<9} {:<8} Description",
        "Code", "Rule", "Severity", "Fixable"
    );
    println!("{}", "-".repeat(90));

    for info in diagnostics() {
        println!(
            "{:<8} {:<20} {:<9} {:<8} {}",
            info.code,
            info.rule,
            info.severity.to_string(),
            if info.fixable { "yes" } else { "no" },
            info.description
        );
    }

    println!("\nConfigure the rule in share-lint.toml, e.g.:");
    println!("  [rules.use-shared-modules]");
    println!("  core_package = \"@acme/core\"");
    println!("  prefix = \"@acme/core/shared\"");
    println!("  modules = [\"react\", \"lodash\"]");
}
