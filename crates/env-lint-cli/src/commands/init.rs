//! Init command implementation.

use anyhow::{bail, Context, Result};
use std::path::Path;

const CONFIG_FILE: &str = "env-lint.toml";

const DEFAULT_CONFIG: &str = r#"# env-lint configuration

# Lowest severity that makes `env-lint check` exit with status 1
fail_on = "error"

[analyzer]
# Root directory to analyze (default: current directory)
# root = "./src"

# Glob patterns to exclude from analysis
exclude = [
    "**/node_modules/**",
    "**/dist/**",
    "**/.next/**",
]

# Respect .gitignore files
respect_gitignore = true

[rules.typesafe-env-vars]
enabled = true
# severity = "error"  # Override default severity (warning)

# Variables that may be read from process.env directly
ignore-environment-variables = ["NODE_ENV"]

# Schema location relative to the package root (default: src/env/schema.mjs)
# schema-path = "src/env/schema.mjs"
"#;

/// Runs the init command.
pub fn run(force: bool) -> Result<()> {
    write_config(Path::new(CONFIG_FILE), force)?;

    println!("Created {CONFIG_FILE}");
    println!("\nNext steps:");
    println!("  1. Declare your variables in src/env/schema.mjs");
    println!("  2. Run: env-lint check");

    Ok(())
}

fn write_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!(
            "Configuration file already exists at {}. Use --force to overwrite.",
            path.display()
        );
    }

    std::fs::write(path, DEFAULT_CONFIG)
        .with_context(|| format!("Failed to write {}", path.display()))
}
