//! Check command implementation.

use anyhow::{Context, Result};
use env_lint_core::{Analyzer, Config, RuleBox, Severity};
use env_lint_rules::configured_rules;
use std::path::{Path, PathBuf};

use crate::project_root::find_package_root;
use crate::{config_resolver, OutputFormat};

/// Options of the check command.
#[derive(Debug)]
pub struct CheckArgs {
    /// File or directory to analyze.
    pub path: PathBuf,
    /// Output format.
    pub format: OutputFormat,
    /// Comma-separated rule names or codes to run.
    pub rules: Option<String>,
    /// Extra exclude globs.
    pub exclude: Vec<String>,
    /// Directory rules resolve the environment schema from.
    pub cwd: Option<PathBuf>,
    /// Failure threshold from the command line.
    pub fail_on: Option<Severity>,
    /// Explicit configuration file.
    pub config: Option<PathBuf>,
}

/// Runs the check command.
pub fn run(args: &CheckArgs) -> Result<()> {
    let source = config_resolver::resolve(&args.path, args.config.as_deref());
    let config = source.load().with_context(|| match source.path() {
        Some(p) => format!("Failed to load config: {}", p.display()),
        None => "Failed to load default config".to_string(),
    })?;
    if let Some(p) = source.path() {
        tracing::info!("Using config: {}", p.display());
    }

    let threshold = args.fail_on.or(config.fail_on).unwrap_or(Severity::Error);
    let cwd = args.cwd.clone().unwrap_or_else(|| schema_base(&args.path));

    let mut builder = Analyzer::builder().root(&args.path).cwd(cwd);
    for pattern in &args.exclude {
        builder = builder.exclude(pattern.as_str());
    }
    for rule in select_rules(args.rules.as_deref(), &config) {
        builder = builder.rule_box(rule);
    }

    let analyzer = builder
        .config(config)
        .build()
        .context("Failed to build analyzer")?;

    tracing::info!(
        "Analyzing {} with {} rules (schema base {})",
        analyzer.root().display(),
        analyzer.rule_count(),
        analyzer.cwd().display()
    );

    let result = analyzer.analyze().context("Analysis failed")?;

    super::output::print(&result, args.format, analyzer.root())?;

    if result.has_violations_at(threshold) {
        std::process::exit(1);
    }

    Ok(())
}

/// Package root of `path`, else the directory being checked.
fn schema_base(path: &Path) -> PathBuf {
    find_package_root(path).unwrap_or_else(|| {
        if path.is_file() {
            path.parent().map_or_else(|| PathBuf::from("."), Path::to_path_buf)
        } else {
            path.to_path_buf()
        }
    })
}

/// Configured rules, narrowed to `filter` when given.
fn select_rules(filter: Option<&str>, config: &Config) -> Vec<RuleBox> {
    let rules = configured_rules(config);
    let Some(filter) = filter else {
        return rules;
    };

    let wanted: Vec<&str> = filter
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();
    let is_match = |rule: &RuleBox, key: &str| rule.name() == key || rule.code() == key;

    for &key in &wanted {
        if !rules.iter().any(|r| is_match(r, key)) {
            tracing::warn!("Unknown rule: {}", key);
        }
    }

    rules
        .into_iter()
        .filter(|r| wanted.iter().any(|&key| is_match(r, key)))
        .collect()
}
