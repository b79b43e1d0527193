//! Rendering of lint results.

use anyhow::Result;
use env_lint_core::{LintResult, Severity, Violation, ViolationDiagnostic};
use miette::{NamedSource, Report};
use std::path::Path;

use crate::OutputFormat;

/// Prints `result` in `format`. `root` locates sources for rich output.
pub fn print(result: &LintResult, format: OutputFormat, root: &Path) -> Result<()> {
    match format {
        OutputFormat::Text => print_text(result),
        OutputFormat::Json => return print_json(result),
        OutputFormat::Compact => print_compact(result),
        OutputFormat::Rich => print_rich(result, root),
    }
    Ok(())
}

fn print_text(result: &LintResult) {
    for violation in &result.violations {
        let colored = match violation.severity {
            Severity::Error => "\x1b[31merror\x1b[0m",
            Severity::Warning => "\x1b[33mwarning\x1b[0m",
            Severity::Info => "\x1b[34minfo\x1b[0m",
        };
        let plain = format!("  {}:", violation.severity);
        println!(
            "{}",
            violation
                .format()
                .replacen(&plain, &format!("  {colored}:"), 1)
        );
    }
    print_summary(result);
}

fn print_summary(result: &LintResult) {
    let (errors, warnings, infos) = result.count_by_severity();
    let color = if errors > 0 {
        "\x1b[31m"
    } else if warnings > 0 {
        "\x1b[33m"
    } else {
        "\x1b[32m"
    };

    println!(
        "{color}Found {errors} error(s), {warnings} warning(s), {infos} info(s) in {} file(s)\x1b[0m",
        result.files_checked
    );
}

fn print_json(result: &LintResult) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(result)?);
    Ok(())
}

fn print_compact(result: &LintResult) {
    for violation in &result.violations {
        println!("{violation}");
    }
}

fn print_rich(result: &LintResult, root: &Path) {
    for violation in &result.violations {
        eprintln!("{:?}", rich_report(violation, root));
    }
    print_summary(result);
}

/// Builds a miette report, attaching the source when it can be read.
fn rich_report(violation: &Violation, root: &Path) -> Report {
    let report = Report::new(ViolationDiagnostic::from(violation));
    let file = &violation.location.file;
    let path = if file.is_absolute() || root.is_file() {
        file.clone()
    } else {
        root.join(file)
    };

    match std::fs::read_to_string(&path) {
        Ok(source) => report.with_source_code(NamedSource::new(file.display().to_string(), source)),
        Err(e) => {
            tracing::debug!("No source for {}: {}", path.display(), e);
            report
        }
    }
}
