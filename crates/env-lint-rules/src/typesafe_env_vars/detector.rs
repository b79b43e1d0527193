//! Recognition of `process.env.NAME` reads.

use env_lint_core::{Span, Syntax, SyntaxNode};

const ROOT: &str = "process";
const MIDDLE: &str = "env";

/// A `process.env.NAME` read in the analyzed file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessSite {
    /// Accessed variable name.
    pub name: String,
    /// Span of the whole `process.env.NAME` expression.
    pub span: Span,
}

/// Returns the access site if `node` is exactly `process.env.<identifier>`.
///
/// Computed access, optional chaining and any other root or chain length do
/// not match. Parentheses around the object are transparent.
#[must_use]
pub fn detect(node: SyntaxNode<'_>) -> Option<AccessSite> {
    let Syntax::Member(outer) = node.syntax() else {
        return None;
    };
    let Syntax::Member(inner) = outer.object.unparenthesized().syntax() else {
        return None;
    };
    if outer.optional || inner.optional {
        return None;
    }

    match (
        inner.object.unparenthesized().syntax(),
        inner.property.syntax(),
        outer.property.syntax(),
    ) {
        (
            Syntax::Identifier(ROOT),
            Syntax::PropertyIdentifier(MIDDLE),
            Syntax::PropertyIdentifier(name),
        ) => Some(AccessSite {
            name: name.to_owned(),
            span: node.span(),
        }),
        _ => None,
    }
}
