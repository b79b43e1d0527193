//! # env-lint-rules
//!
//! Built-in lint rules for env-lint.
//!
//! ## Available Rules
//!
//! | Code | Name | Description |
//! |------|------|-------------|
//! | ENV001 | `typesafe-env-vars` | Requires `process.env` reads to be declared in the environment schema |
//!
//! `typesafe-env-vars` also reports `ENV002` when no schema can be found and
//! `ENV003` when the schema does not parse.
//!
//! ## Usage
//!
//! ```ignore
//! use env_lint_core::Analyzer;
//! use env_lint_rules::TypesafeEnvVars;
//!
//! let analyzer = Analyzer::builder()
//!     .root("./src")
//!     .rule(TypesafeEnvVars::new().ignore_env_vars(["NODE_ENV"]))
//!     .build()?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod presets;
pub mod typesafe_env_vars;

pub use presets::{all_rules, configured_rules, rule_by_name};
pub use typesafe_env_vars::{DiagnosticKind, SchemaDeclaration, SchemaError, TypesafeEnvVars};

/// Re-export core types for convenience.
pub use env_lint_core::{Rule, Severity, Violation};
