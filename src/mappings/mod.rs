//! The rule model: configuration loading, validation, and compilation.
//!
//! Everything here is validated eagerly at load time; a rule set that
//! survives [`Mappings::load`] and [`Mappings::initialize`] cannot fail for
//! configuration reasons during the scan.

pub mod rule;
pub mod schema;
pub mod strategy;

use std::fs;
use std::path::Path;

use indexmap::IndexMap;

use crate::error::{ConstMapError, Result};

pub use rule::{Rule, MATCH_GROUP};
pub use schema::{GeneratedClass, MappingsFile, RuleConfig, StrategyConfig};
pub use strategy::{ClassPath, Strategy};

/// The shared, read-only side table of named constant groups.
pub type GeneratedClasses = IndexMap<String, GeneratedClass>;

pub struct Mappings {
    /// Active rules in configuration order; `ignore`-flagged rules are
    /// filtered out during loading.
    pub rules: Vec<Rule>,
    pub generated_classes: GeneratedClasses,
    /// Number of rules dropped by the `ignore` flag.
    pub ignored: usize,
}

impl Mappings {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| ConstMapError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let file: MappingsFile = serde_json::from_str(content)?;

        for name in file.generated_classes.keys() {
            if !strategy::is_valid_class_name(name) {
                return Err(ConstMapError::Config(format!(
                    "Invalid generated class name '{name}'"
                )));
            }
        }

        // Ignored rules are excluded from the run but still validated:
        // a broken pattern is a configuration error either way.
        let total = file.rules.len();
        let mut rules = Vec::new();
        for config in file.rules {
            let ignore = config.ignore;
            let rule = Rule::compile(config, &file.generated_classes)?;
            if !ignore {
                rules.push(rule);
            }
        }

        Ok(Self {
            ignored: total - rules.len(),
            rules,
            generated_classes: file.generated_classes,
        })
    }

    /// Runs every strategy's one-time setup. Must complete before the scan
    /// begins; rules and the side table are read-only afterwards.
    pub fn initialize(&mut self, source_root: &Path) -> Result<()> {
        for rule in &mut self.rules {
            rule.strategy.initialize(source_root)?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
