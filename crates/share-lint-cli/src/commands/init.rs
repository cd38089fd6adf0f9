//! Init command implementation.

use anyhow::{bail, Result};
use std::path::Path;

const DEFAULT_CONFIG: &str = r#"# share-lint configuration

[analyzer]
# Root directory to analyze (default: current directory)
# root = "./packages"

# Glob patterns to exclude from analysis
exclude = [
    "**/node_modules/**",
    "**/dist/**",
]

# Respect .gitignore files
respect_gitignore = true

# Manifest file looked up for each source file
manifest = "package.json"

# Remember directories with no manifest for the rest of the run
cache_missing_manifests = true

[rules.use-shared-modules]
enabled = true
# severity = "warning"  # Override the severity of SL001

# Packages depending on this package must use its shared modules
core_package = "@acme/core"

# Path the core package re-exports shared modules under
prefix = "@acme/core/shared"

# Bare names of the shared modules (imported as "<prefix>/<name>")
modules = ["react", "react-dom", "lodash"]

# Report shared modules declared as direct dependencies, once per package
advisory = true

# Bare names whose shared path is not "<prefix>/<name>"
# [rules.use-shared-modules.counterparts]
# "react-dom/client" = "@acme/core/shared/react-dom-client"
"#;

/// Runs the init command.
pub fn run(force: bool) -> Result<()> {
    let config_path = Path::new("share-lint.toml");

    if config_path.exists() && !force {
        bail!(
            "Configuration file already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    std::fs::write(config_path, DEFAULT_CONFIG)?;

    println!("Created share-lint.toml");
    println!("\nNext steps:");
    println!("  1. Set core_package, prefix and modules in share-lint.toml");
    println!("  2. Run: share-lint check");

    Ok(())
}
