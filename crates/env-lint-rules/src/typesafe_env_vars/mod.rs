//! Rule requiring environment variables to go through a typed schema.
//!
//! # Rationale
//!
//! Reading `process.env.NAME` directly bypasses the validation a project
//! declares in its environment schema. Every variable read this way must be
//! declared in the schema or explicitly ignored.
//!
//! # Detected Patterns
//!
//! - `process.env.NAME` where `NAME` is not declared in the schema
//! - any `process.env.NAME` when no schema can be found or parsed
//!
//! Computed access (`process.env["NAME"]`), optional chaining and aliases of
//! `process.env` are not inspected.
//!
//! # Configuration
//!
//! - `ignore-environment-variables`: names that may be read directly
//! - `schema-path`: schema location relative to the working directory
//!   (default: `src/env/schema.mjs`)
//!
//! # Suppression
//!
//! - `// env-lint: allow(typesafe-env-vars) reason="..."` comment

mod detector;
mod schema;

use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};

use env_lint_core::{FileContext, Rule, RuleConfig, Severity, SourceTree, Suggestion, Violation};

pub use detector::{detect, AccessSite};
pub use schema::{
    resolve, SchemaDeclaration, SchemaError, SchemaLocation, CONVENTIONAL_SCHEMA_PATH,
};

/// Rule code for typesafe-env-vars.
pub const CODE: &str = "ENV001";

/// Rule name for typesafe-env-vars.
pub const NAME: &str = "typesafe-env-vars";

/// Option listing variables that may be read directly.
pub const IGNORE_OPTION: &str = "ignore-environment-variables";

/// Option overriding the schema location.
pub const SCHEMA_PATH_OPTION: &str = "schema-path";

/// The diagnostics this rule emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    /// A variable is read that the schema does not declare.
    UndeclaredAccess,
    /// No schema could be found or read.
    MissingSchema,
    /// The schema exists but does not parse.
    InvalidSchema,
}

impl DiagnosticKind {
    /// Diagnostic code reported for this kind.
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Self::UndeclaredAccess => CODE,
            Self::MissingSchema => "ENV002",
            Self::InvalidSchema => "ENV003",
        }
    }

    /// Fixed diagnostic message.
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            Self::UndeclaredAccess => {
                "Don't access process.env directly. Use typesafe environment variables"
            }
            Self::MissingSchema => {
                "Could not find schema.mjs. Please create one in src/env/schema.mjs or specify the path in the settings"
            }
            Self::InvalidSchema => {
                "Environment schema could not be parsed; fix the schema before checking process.env access"
            }
        }
    }
}

/// Requires `process.env` reads to be declared in the environment schema.
#[derive(Debug, Clone)]
pub struct TypesafeEnvVars {
    /// Variables that may be read without a declaration.
    pub ignore: BTreeSet<String>,
    /// Configured schema location; `None` uses the conventional path.
    pub schema_path: Option<PathBuf>,
    /// Custom severity.
    pub severity: Severity,
}

impl Default for TypesafeEnvVars {
    fn default() -> Self {
        Self::new()
    }
}

impl TypesafeEnvVars {
    /// Creates a new rule with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            ignore: BTreeSet::new(),
            schema_path: None,
            severity: Severity::Warning,
        }
    }

    /// Builds the rule from its `[rules.typesafe-env-vars]` block.
    #[must_use]
    pub fn from_config(config: &RuleConfig) -> Self {
        let mut rule = Self::new().ignore_env_vars(config.get_str_array(IGNORE_OPTION));
        if let Some(path) = config.get_str(SCHEMA_PATH_OPTION) {
            rule = rule.schema_path(path);
        }
        if let Some(severity) = config.severity {
            rule = rule.severity(severity);
        }
        rule
    }

    /// Adds variables that may be read directly.
    #[must_use]
    pub fn ignore_env_vars<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ignore.extend(names.into_iter().map(Into::into));
        self
    }

    /// Sets the schema location.
    #[must_use]
    pub fn schema_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.schema_path = Some(path.into());
        self
    }

    /// Sets the severity level.
    #[must_use]
    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    fn finding(&self, site: &AccessSite, cwd: &Path, schemas: &mut SchemaCache) -> Option<Finding> {
        let location = match resolve(self.schema_path.as_deref(), cwd) {
            Ok(location) => location,
            Err(SchemaError::Missing { path }) => return Some(Finding::Missing { path }),
            Err(e) => return Some(Finding::Unusable(e.to_string())),
        };

        match schemas.load(location.path()) {
            Ok(declaration) => {
                if self.ignore.contains(&site.name) || declaration.declares(&site.name) {
                    None
                } else {
                    Some(Finding::Undeclared {
                        schema: location.path().to_path_buf(),
                    })
                }
            }
            Err(SchemaError::Invalid { path, source }) => Some(Finding::Invalid {
                path: path.clone(),
                reason: source.to_string(),
            }),
            Err(e) => Some(Finding::Unusable(e.to_string())),
        }
    }

    fn report(&self, ctx: &FileContext, site: &AccessSite, finding: Finding) -> Violation {
        let (kind, suggestion) = match finding {
            Finding::Undeclared { schema } => (
                DiagnosticKind::UndeclaredAccess,
                format!(
                    "Declare `{}` in {} or list it in `{IGNORE_OPTION}`",
                    site.name,
                    display_relative(&schema, ctx.cwd)
                ),
            ),
            Finding::Missing { path } => (
                DiagnosticKind::MissingSchema,
                format!(
                    "Create {} or set `{SCHEMA_PATH_OPTION}` under [rules.{NAME}]",
                    display_relative(&path, ctx.cwd)
                ),
            ),
            Finding::Unusable(reason) => (DiagnosticKind::MissingSchema, reason),
            Finding::Invalid { path, reason } => (
                DiagnosticKind::InvalidSchema,
                format!("Fix {}: {reason}", display_relative(&path, ctx.cwd)),
            ),
        };

        Violation::new(
            kind.code(),
            NAME,
            self.severity,
            ctx.location(site.span),
            kind.message(),
        )
        .with_suggestion(Suggestion::new(suggestion))
    }
}

impl Rule for TypesafeEnvVars {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Requires process.env reads to be declared in the environment schema"
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn check(&self, ctx: &FileContext, tree: &SourceTree) -> Vec<Violation> {
        let mut sites = Vec::new();
        tree.walk(|node| sites.extend(detect(node)));
        if sites.is_empty() {
            return Vec::new();
        }

        tracing::debug!(
            "{} process.env reads in {}",
            sites.len(),
            ctx.relative_path.display()
        );

        let mut schemas = SchemaCache::default();
        sites
            .iter()
            .filter_map(|site| {
                self.finding(site, ctx.cwd, &mut schemas)
                    .map(|finding| self.report(ctx, site, finding))
            })
            .collect()
    }
}

/// What is wrong with a single access site.
enum Finding {
    Undeclared { schema: PathBuf },
    Missing { path: PathBuf },
    Unusable(String),
    Invalid { path: PathBuf, reason: String },
}

/// Schemas loaded during one `check` call, keyed by resolved path.
#[derive(Default)]
struct SchemaCache {
    entries: HashMap<PathBuf, Result<SchemaDeclaration, SchemaError>>,
}

impl SchemaCache {
    fn load(&mut self, path: &Path) -> &Result<SchemaDeclaration, SchemaError> {
        self.entries
            .entry(path.to_path_buf())
            .or_insert_with(|| SchemaDeclaration::load(path))
    }
}

fn display_relative(path: &Path, cwd: &Path) -> String {
    path.strip_prefix(cwd)
        .unwrap_or(path)
        .display()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use env_lint_core::Dialect;
    use std::fs;
    use tempfile::TempDir;

    const SCHEMA: &str = r#"
import { z } from "zod";

export const serverSchema = z.object({
  DATABASE_URL: z.string().url(),
  NODE_ENV: z.enum(["development", "test", "production"]),
});
"#;

    fn project_with_schema(rel: &str, schema: &str) -> TempDir {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, schema).unwrap();
        tmp
    }

    fn check_with(rule: &TypesafeEnvVars, cwd: &Path, code: &str) -> Vec<Violation> {
        let tree = SourceTree::parse(code, Dialect::JavaScript).expect("Failed to parse");
        let path = cwd.join("src/server.js");
        let ctx = FileContext::new(&path, code, cwd, cwd);
        rule.check(&ctx, &tree)
    }

    fn codes(violations: &[Violation]) -> Vec<&str> {
        violations.iter().map(|v| v.code.as_str()).collect()
    }

    #[test]
    fn test_declared_access_is_silent() {
        let tmp = project_with_schema(CONVENTIONAL_SCHEMA_PATH, SCHEMA);
        let violations = check_with(
            &TypesafeEnvVars::new(),
            tmp.path(),
            "const url = process.env.DATABASE_URL;\nif (process.env.NODE_ENV) {}\n",
        );
        assert!(violations.is_empty());
    }

    #[test]
    fn test_undeclared_access_reported_at_site() {
        let tmp = project_with_schema(CONVENTIONAL_SCHEMA_PATH, SCHEMA);
        let violations = check_with(
            &TypesafeEnvVars::new(),
            tmp.path(),
            "const a = 1;\nconst key = process.env.API_KEY;\n",
        );

        assert_eq!(violations.len(), 1);
        let v = &violations[0];
        assert_eq!(v.code, CODE);
        assert_eq!(v.rule, NAME);
        assert_eq!(v.severity, Severity::Warning);
        assert_eq!(v.message, DiagnosticKind::UndeclaredAccess.message());
        assert_eq!((v.location.line, v.location.column), (2, 13));
        assert_eq!(v.location.file, PathBuf::from("src/server.js"));

        let suggestion = &v.suggestion.as_ref().unwrap().message;
        assert!(suggestion.contains("API_KEY"));
        assert!(suggestion.contains("src/env/schema.mjs"));
    }

    #[test]
    fn test_each_undeclared_read_is_reported() {
        let tmp = project_with_schema(CONVENTIONAL_SCHEMA_PATH, SCHEMA);
        let violations = check_with(
            &TypesafeEnvVars::new(),
            tmp.path(),
            "process.env.A;\nprocess.env.DATABASE_URL;\nprocess.env.A;\n",
        );
        let lines: Vec<_> = violations.iter().map(|v| v.location.line).collect();
        assert_eq!(lines, vec![1, 3]);
    }

    #[test]
    fn test_ignored_names_are_silent() {
        let tmp = project_with_schema(CONVENTIONAL_SCHEMA_PATH, SCHEMA);
        let rule = TypesafeEnvVars::new().ignore_env_vars(["CI", "API_KEY"]);
        let violations = check_with(&rule, tmp.path(), "process.env.CI;\nprocess.env.API_KEY;\n");
        assert!(violations.is_empty());
    }

    #[test]
    fn test_missing_schema_reported_per_access() {
        let tmp = TempDir::new().unwrap();
        let violations = check_with(
            &TypesafeEnvVars::new(),
            tmp.path(),
            "process.env.A;\nprocess.env.B;\n",
        );

        assert_eq!(codes(&violations), vec!["ENV002", "ENV002"]);
        assert_eq!(violations[0].message, DiagnosticKind::MissingSchema.message());
        assert!(violations[0]
            .suggestion
            .as_ref()
            .unwrap()
            .message
            .contains("src/env/schema.mjs"));
    }

    #[test]
    fn test_missing_schema_reported_even_for_ignored_names() {
        let tmp = TempDir::new().unwrap();
        let rule = TypesafeEnvVars::new().ignore_env_vars(["NODE_ENV"]);
        let violations = check_with(&rule, tmp.path(), "process.env.NODE_ENV;\n");
        assert_eq!(codes(&violations), vec!["ENV002"]);
    }

    #[test]
    fn test_no_access_means_no_schema_lookup() {
        let tmp = TempDir::new().unwrap();
        let violations = check_with(&TypesafeEnvVars::new(), tmp.path(), "const env = process.env;\n");
        assert!(violations.is_empty());
    }

    #[test]
    fn test_configured_schema_path() {
        let tmp = project_with_schema("config/env.mjs", "export default { API_KEY: z.string() };\n");
        let rule = TypesafeEnvVars::new().schema_path("config/env.mjs");

        assert!(check_with(&rule, tmp.path(), "process.env.API_KEY;\n").is_empty());
        assert_eq!(
            codes(&check_with(&rule, tmp.path(), "process.env.DATABASE_URL;\n")),
            vec![CODE]
        );
    }

    #[test]
    fn test_configured_schema_wins_over_conventional() {
        let tmp = project_with_schema(CONVENTIONAL_SCHEMA_PATH, SCHEMA);
        fs::write(tmp.path().join("alt.mjs"), "export default { OTHER: z.string() };\n").unwrap();
        let rule = TypesafeEnvVars::new().schema_path("alt.mjs");

        let violations = check_with(&rule, tmp.path(), "process.env.DATABASE_URL;\nprocess.env.OTHER;\n");
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].location.line, 1);
    }

    #[test]
    fn test_unreadable_configured_schema_is_missing_kind() {
        let tmp = TempDir::new().unwrap();
        let rule = TypesafeEnvVars::new().schema_path("nowhere/schema.mjs");
        let violations = check_with(&rule, tmp.path(), "process.env.A;\n");

        assert_eq!(codes(&violations), vec!["ENV002"]);
        assert!(violations[0]
            .suggestion
            .as_ref()
            .unwrap()
            .message
            .contains("nowhere/schema.mjs"));
    }

    #[test]
    fn test_invalid_schema_is_reported_distinctly() {
        let tmp = project_with_schema(
            CONVENTIONAL_SCHEMA_PATH,
            "export const s = z.object({ A: z.string(",
        );
        let rule = TypesafeEnvVars::new().ignore_env_vars(["B"]);
        let violations = check_with(&rule, tmp.path(), "process.env.A;\nprocess.env.B;\n");

        assert_eq!(codes(&violations), vec!["ENV003", "ENV003"]);
        assert_eq!(violations[0].message, DiagnosticKind::InvalidSchema.message());
    }

    #[test]
    fn test_empty_schema_flags_everything() {
        let tmp = project_with_schema(CONVENTIONAL_SCHEMA_PATH, "export default {};\n");
        let violations = check_with(&TypesafeEnvVars::new(), tmp.path(), "process.env.A;\n");
        assert_eq!(codes(&violations), vec![CODE]);
    }

    #[test]
    fn test_identical_inputs_give_identical_results() {
        let tmp = project_with_schema(CONVENTIONAL_SCHEMA_PATH, SCHEMA);
        let rule = TypesafeEnvVars::new();
        let code = "process.env.X;\nprocess.env.DATABASE_URL;\nprocess.env.Y;\n";

        assert_eq!(
            check_with(&rule, tmp.path(), code),
            check_with(&rule, tmp.path(), code)
        );
    }

    #[test]
    fn test_from_config() {
        let config = env_lint_core::Config::parse(
            r#"
[rules.typesafe-env-vars]
severity = "error"
ignore-environment-variables = ["NODE_ENV", "CI"]
schema-path = "config/env.mjs"
"#,
        )
        .unwrap();
        let rule = TypesafeEnvVars::from_config(config.rule(NAME).unwrap());

        assert_eq!(rule.severity, Severity::Error);
        assert!(rule.ignore.contains("CI"));
        assert_eq!(rule.schema_path, Some(PathBuf::from("config/env.mjs")));
        assert!(rule.requires_allow_reason());
    }

    #[test]
    fn test_defaults() {
        let rule = TypesafeEnvVars::default();
        assert_eq!(rule.default_severity(), Severity::Warning);
        assert!(!rule.requires_allow_reason());
        assert!(rule.ignore.is_empty());
        assert!(rule.schema_path.is_none());
    }
}
