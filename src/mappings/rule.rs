//! A compiled rewrite rule: matching pattern, scope filters, and strategy.

use regex::Regex;

use crate::error::{ConstMapError, Result};

use super::schema::RuleConfig;
use super::strategy::Strategy;
use super::GeneratedClasses;

/// Name of the capture group every rule pattern must define.
pub const MATCH_GROUP: &str = "match";

#[derive(Debug)]
pub struct Rule {
    /// Original pattern source, recorded verbatim in the report.
    pub pattern: String,
    pub regex: Regex,
    pub method_regex: Option<Regex>,
    /// `/`-normalized relative paths; empty means all files.
    pub whitelist: Vec<String>,
    pub blacklist: Vec<String>,
    pub strategy: Strategy,
}

impl Rule {
    /// Compiles and validates one rule. All violations here are
    /// configuration errors detected before any source file is read.
    pub fn compile(config: RuleConfig, pool: &GeneratedClasses) -> Result<Self> {
        let regex =
            Regex::new(&config.pattern).map_err(|source| ConstMapError::InvalidPattern {
                pattern: config.pattern.clone(),
                source,
            })?;
        if !regex.capture_names().any(|name| name == Some(MATCH_GROUP)) {
            return Err(ConstMapError::Config(format!(
                "Pattern must contain the group '{MATCH_GROUP}', but does not: {}",
                config.pattern
            )));
        }

        let method_regex = config
            .method_pattern
            .as_deref()
            .map(|pattern| {
                Regex::new(pattern).map_err(|source| ConstMapError::InvalidPattern {
                    pattern: pattern.to_string(),
                    source,
                })
            })
            .transpose()?;

        let whitelist = normalize_paths(&config.whitelist);
        let blacklist = normalize_paths(&config.blacklist);
        if let Some(shared) = whitelist.iter().find(|path| blacklist.contains(path)) {
            return Err(ConstMapError::Config(format!(
                "Whitelist and blacklist cannot share paths: {shared}"
            )));
        }

        Ok(Self {
            pattern: config.pattern,
            regex,
            method_regex,
            whitelist,
            blacklist,
            strategy: Strategy::compile(config.strategy, pool)?,
        })
    }

    #[must_use]
    pub fn applies_to_file(&self, relative_path: &str) -> bool {
        (self.whitelist.is_empty() || self.whitelist.iter().any(|p| p == relative_path))
            && (self.blacklist.is_empty() || !self.blacklist.iter().any(|p| p == relative_path))
    }

    #[must_use]
    pub fn applies_to_member(&self, identifier: &str) -> bool {
        self.method_regex
            .as_ref()
            .is_none_or(|regex| regex.is_match(identifier))
    }
}

fn normalize_paths(paths: &[String]) -> Vec<String> {
    paths.iter().map(|p| p.replace('\\', "/")).collect()
}

#[cfg(test)]
#[path = "rule_tests.rs"]
mod tests;
