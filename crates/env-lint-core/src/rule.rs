//! Rule trait for defining lint rules.

use crate::context::FileContext;
use crate::syntax::SourceTree;
use crate::types::{Severity, Violation};

/// A per-file lint rule over a JavaScript or TypeScript syntax tree.
///
/// Implement this trait to create rules that analyze individual source files.
/// Rules receive the parsed tree and usually walk it with
/// [`SourceTree::walk`], matching node shapes through
/// [`SyntaxNode::syntax`](crate::SyntaxNode::syntax).
///
/// # Example
///
/// ```ignore
/// use env_lint_core::{FileContext, Rule, SourceTree, Syntax, Violation};
///
/// pub struct NoEval;
///
/// impl Rule for NoEval {
///     fn name(&self) -> &'static str { "no-eval" }
///     fn code(&self) -> &'static str { "JS001" }
///
///     fn check(&self, ctx: &FileContext, tree: &SourceTree) -> Vec<Violation> {
///         let mut violations = Vec::new();
///         tree.walk(|node| {
///             if let Syntax::Identifier("eval") = node.syntax() {
///                 // push a violation at ctx.location(node.span())
///             }
///         });
///         violations
///     }
/// }
/// ```
pub trait Rule: Send + Sync {
    /// Returns the kebab-case name of this rule (e.g., "typesafe-env-vars").
    fn name(&self) -> &'static str;

    /// Returns the primary diagnostic code (e.g., "ENV001").
    fn code(&self) -> &'static str;

    /// Returns a brief description of what this rule checks.
    fn description(&self) -> &'static str {
        ""
    }

    /// Returns the default severity for violations from this rule.
    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    /// Whether this rule requires a reason when using allow directives.
    ///
    /// By default, rules with `Severity::Error` require a reason.
    fn requires_allow_reason(&self) -> bool {
        self.default_severity() == Severity::Error
    }

    /// Checks a single file and returns any violations found.
    ///
    /// # Arguments
    ///
    /// * `ctx` - Context about the file being checked
    /// * `tree` - The parsed syntax tree of the file
    fn check(&self, ctx: &FileContext, tree: &SourceTree) -> Vec<Violation>;
}

/// Type alias for boxed Rule trait objects.
pub type RuleBox = Box<dyn Rule>;
