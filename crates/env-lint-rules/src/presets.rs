//! Rule sets built from defaults or configuration.

use env_lint_core::{Config, RuleBox};

use crate::typesafe_env_vars::{self, TypesafeEnvVars};

/// Returns every built-in rule with default settings.
#[must_use]
pub fn all_rules() -> Vec<RuleBox> {
    vec![Box::new(TypesafeEnvVars::new())]
}

/// Returns every built-in rule configured from `config`.
///
/// Disabled rules are still returned; the analyzer skips them.
#[must_use]
pub fn configured_rules(config: &Config) -> Vec<RuleBox> {
    all_rules()
        .iter()
        .filter_map(|rule| rule_by_name(rule.name(), config))
        .collect()
}

/// Builds a single rule by name, applying its configuration block if any.
#[must_use]
pub fn rule_by_name(name: &str, config: &Config) -> Option<RuleBox> {
    match name {
        typesafe_env_vars::NAME => Some(Box::new(
            config
                .rule(name)
                .map_or_else(TypesafeEnvVars::new, TypesafeEnvVars::from_config),
        )),
        _ => None,
    }
}
