//! List rules command implementation.

use env_lint_rules::{all_rules, DiagnosticKind};

/// Runs the list-rules command.
pub fn run() {
    println!("Available rules:\n");
    println!("{:<10} {:<20} {:<9} Description", "Code", "Name", "Severity");
    println!("{}", "-".repeat(80));

    for rule in all_rules() {
        println!(
            "{:<10} {:<20} {:<9} {}",
            rule.code(),
            rule.name(),
            rule.default_severity(),
            rule.description()
        );
    }

    println!("\nDiagnostics:");
    for kind in [
        DiagnosticKind::UndeclaredAccess,
        DiagnosticKind::MissingSchema,
        DiagnosticKind::InvalidSchema,
    ] {
        println!("  {}  {}", kind.code(), kind.message());
    }

    println!("\nUse --rules to filter specific rules, e.g.:");
    println!("  env-lint check --rules typesafe-env-vars");
    println!("  env-lint check --rules ENV001");
}
