//! Comment-based allowance directives.
//!
//! A directive on the reported line or the line above suppresses a rule:
//!
//! ```text
//! // env-lint: allow(typesafe-env-vars) reason="read by the test harness"
//! const debug = process.env.DEBUG_SNAPSHOTS;
//! ```
//!
//! Block comments (`/* env-lint: allow(...) */`) are accepted as well, and
//! `all` matches every rule.

use std::collections::HashSet;

const DIRECTIVE_PREFIX: &str = "env-lint:";

/// Result of checking for an allow directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllowCheck {
    /// No directive covers the rule.
    Denied,
    /// A directive covers the rule.
    Allowed {
        /// The reason provided, if any.
        reason: Option<String>,
    },
}

impl AllowCheck {
    /// Returns true if allowed.
    #[must_use]
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed { .. })
    }

    /// Returns the reason if allowed.
    #[must_use]
    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Allowed { reason } => reason.as_deref(),
            Self::Denied => None,
        }
    }
}

/// Parsed allow directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllowDirective {
    /// Rule names the directive covers.
    pub rules: HashSet<String>,
    /// Optional reason for the allowance.
    pub reason: Option<String>,
}

impl AllowDirective {
    fn covers(&self, rule_name: &str) -> bool {
        self.rules.contains(rule_name) || self.rules.contains("all")
    }
}

/// Checks whether `rule_name` is allowed at `line` (1-indexed) of `content`.
///
/// The reported line itself is checked first (trailing comments), then the
/// line above.
#[must_use]
pub fn check_allow_with_reason(content: &str, line: usize, rule_name: &str) -> AllowCheck {
    let lines: Vec<&str> = content.lines().collect();

    for candidate in [line, line.saturating_sub(1)] {
        let Some(text) = candidate.checked_sub(1).and_then(|i| lines.get(i)) else {
            continue;
        };
        if let Some(directive) = parse_allow_directive(text) {
            if directive.covers(rule_name) {
                return AllowCheck::Allowed {
                    reason: directive.reason,
                };
            }
        }
    }

    AllowCheck::Denied
}

/// Parses an allow directive found anywhere in a line's comment.
///
/// Every `//` or `/*` on the line is tried, so comment openers inside string
/// literals (`"http://..."`) do not hide a trailing directive.
#[must_use]
pub fn parse_allow_directive(line: &str) -> Option<AllowDirective> {
    line.match_indices("//")
        .chain(line.match_indices("/*"))
        .find_map(|(i, _)| parse_comment(&line[i + 2..]))
}

fn parse_comment(comment: &str) -> Option<AllowDirective> {
    let comment = comment.trim_end().trim_end_matches("*/");

    let directive = comment.trim().strip_prefix(DIRECTIVE_PREFIX)?.trim_start();
    let body = directive.strip_prefix("allow(")?;
    let close = body.find(')')?;

    let rules: HashSet<String> = body[..close]
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect();
    if rules.is_empty() {
        return None;
    }

    let reason = body[close + 1..]
        .trim()
        .strip_prefix("reason=")
        .and_then(|r| r.trim().strip_prefix('"'))
        .and_then(|r| r.find('"').map(|end| r[..end].to_string()));

    Some(AllowDirective { rules, reason })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_line_comment() {
        let directive = parse_allow_directive("// env-lint: allow(typesafe-env-vars)").unwrap();
        assert!(directive.rules.contains("typesafe-env-vars"));
        assert!(directive.reason.is_none());
    }

    #[test]
    fn parses_block_comment_with_reason() {
        let directive = parse_allow_directive(
            r#"  /* env-lint: allow(typesafe-env-vars) reason="set by CI" */"#,
        )
        .unwrap();
        assert!(directive.rules.contains("typesafe-env-vars"));
        assert_eq!(directive.reason.as_deref(), Some("set by CI"));
    }

    #[test]
    fn parses_multiple_rules() {
        let directive = parse_allow_directive("// env-lint: allow(rule1, rule2)").unwrap();
        assert_eq!(directive.rules.len(), 2);
        assert!(directive.rules.contains("rule2"));
    }

    #[test]
    fn ignores_other_comments() {
        assert!(parse_allow_directive("// eslint-disable-next-line").is_none());
        assert!(parse_allow_directive("// env-lint: allow()").is_none());
        assert!(parse_allow_directive("const a = 1;").is_none());
    }

    #[test]
    fn line_above_allows() {
        let content = "// env-lint: allow(typesafe-env-vars) reason=\"legacy\"\nprocess.env.LEGACY;\n";
        let check = check_allow_with_reason(content, 2, "typesafe-env-vars");
        assert!(check.is_allowed());
        assert_eq!(check.reason(), Some("legacy"));
        assert!(!check_allow_with_reason(content, 2, "other-rule").is_allowed());
    }

    #[test]
    fn trailing_comment_allows() {
        let content = "const a = process.env.A; // env-lint: allow(all)\n";
        let check = check_allow_with_reason(content, 1, "typesafe-env-vars");
        assert!(check.is_allowed());
        assert_eq!(check.reason(), None);
    }

    #[test]
    fn directive_after_url_string_is_found() {
        let line = r#"const api = process.env.API_URL ?? "http://localhost"; // env-lint: allow(typesafe-env-vars) reason="dev""#;
        let directive = parse_allow_directive(line).unwrap();
        assert!(directive.rules.contains("typesafe-env-vars"));
        assert_eq!(directive.reason.as_deref(), Some("dev"));
        assert!(check_allow_with_reason(line, 1, "typesafe-env-vars").is_allowed());
    }

    #[test]
    fn block_directive_after_url_is_found() {
        let line = r#"fetch("https://x.test/a"); /* env-lint: allow(all) */"#;
        assert!(parse_allow_directive(line).is_some());
        assert!(parse_allow_directive(r#"fetch("https://x.test/a");"#).is_none());
    }

    #[test]
    fn distant_directive_does_not_allow() {
        let content = "// env-lint: allow(typesafe-env-vars)\n\nprocess.env.A;\n";
        assert_eq!(
            check_allow_with_reason(content, 3, "typesafe-env-vars"),
            AllowCheck::Denied
        );
    }
}
