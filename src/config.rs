//! Settings of the `functional` REPL, read from the environment.

use crate::error::{Error, Result};

use std::env;
use std::path::PathBuf;

pub const HISTORY_VAR: &str = "FUNCTIONAL_HISTORY";
pub const LOG_VAR: &str = "FUNCTIONAL_LOG";
pub const HINT_BUDGET_VAR: &str = "FUNCTIONAL_HINT_BUDGET";

const HISTORY_FILE: &str = ".functional_history";
const DEFAULT_LOG_FILTER: &str = "warn";
const DEFAULT_HINT_BUDGET: u64 = 128;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReplConfig {
    pub history_file: PathBuf,
    /// `tracing_subscriber::EnvFilter` directives
    pub log_filter: String,
    /// builtin calls a hint may make before it is given up
    pub hint_budget: u64,
}

impl Default for ReplConfig {
    fn default() -> Self {
        ReplConfig {
            history_file: PathBuf::from(HISTORY_FILE),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            hint_budget: DEFAULT_HINT_BUDGET,
        }
    }
}

impl ReplConfig {
    pub fn from_env() -> Result<Self> {
        ReplConfig::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from `lookup`, which maps variable names to
    /// their values. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = ReplConfig::default();

        if let Some(file) = get(HISTORY_VAR) {
            config.history_file = PathBuf::from(file);
        } else if let Some(home) = get("HOME") {
            config.history_file = PathBuf::from(home).join(HISTORY_FILE);
        }
        if let Some(filter) = get(LOG_VAR) {
            config.log_filter = filter;
        }
        if let Some(budget) = get(HINT_BUDGET_VAR) {
            config.hint_budget = budget.trim().parse().map_err(|_| Error::Configuration {
                message: format!(
                    "{} must be a non-negative integer, got {:?}",
                    HINT_BUDGET_VAR, budget
                ),
            })?;
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_of(vars: &[(&str, &str)]) -> Result<ReplConfig> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ReplConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_without_environment() {
        assert_eq!(config_of(&[]), Ok(ReplConfig::default()));
    }

    #[test]
    fn history_goes_to_home() {
        let config = config_of(&[("HOME", "/home/someone")]).unwrap();
        assert_eq!(
            config.history_file,
            PathBuf::from("/home/someone/.functional_history")
        );
        let config = config_of(&[("HOME", "/home/someone"), (HISTORY_VAR, "/tmp/h")]).unwrap();
        assert_eq!(config.history_file, PathBuf::from("/tmp/h"));
    }

    #[test]
    fn overrides() {
        let config = config_of(&[(LOG_VAR, "functional=debug"), (HINT_BUDGET_VAR, " 7 ")]).unwrap();
        assert_eq!(config.log_filter, "functional=debug");
        assert_eq!(config.hint_budget, 7);
        assert_eq!(config_of(&[(LOG_VAR, "")]).unwrap().log_filter, "warn");
    }

    #[test]
    fn bad_hint_budget() {
        assert!(matches!(
            config_of(&[(HINT_BUDGET_VAR, "lots")]),
            Err(Error::Configuration { .. })
        ));
        assert!(config_of(&[(HINT_BUDGET_VAR, "-1")]).is_err());
    }
}
