//! # env-lint-core
//!
//! Core framework for linting JavaScript and TypeScript sources with
//! tree-sitter.
//!
//! This crate provides the foundational traits and types for building
//! env-lint rules. It includes:
//!
//! - [`Rule`] trait for per-file rules over a [`SourceTree`]
//! - [`Syntax`] tagged view of the node shapes rules match on
//! - [`Analyzer`] for discovering files and orchestrating lint execution
//! - [`Violation`] for representing lint findings
//!
//! ## Example
//!
//! ```ignore
//! use env_lint_core::Analyzer;
//!
//! let analyzer = Analyzer::builder()
//!     .root("./src")
//!     .rule(MyRule::new())
//!     .build()?;
//!
//! let result = analyzer.analyze()?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod analyzer;
mod config;
mod context;
mod rule;
mod syntax;
mod types;

/// Utility modules for rule implementations.
pub mod utils;

pub use analyzer::{Analyzer, AnalyzerBuilder, AnalyzerError};
pub use config::{AnalyzerConfig, Config, ConfigError, RuleConfig};
pub use context::FileContext;
pub use rule::{Rule, RuleBox};
pub use syntax::{
    Call, Dialect, Member, Pair, SourceTree, Span, Syntax, SyntaxError, SyntaxNode,
};
pub use types::{LintResult, Location, Severity, Suggestion, Violation, ViolationDiagnostic};
pub use utils::allowance::AllowCheck;
