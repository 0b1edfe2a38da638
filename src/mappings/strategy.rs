//! The three resolution strategies.
//!
//! A strategy maps a matched literal's text to a symbolic field name. All
//! three share one contract: `resolve` answers with `None` for an unknown
//! literal rather than failing, `owning_class` names where the resolved
//! constant lives, and `initialize` runs once before any file is scanned.

use std::collections::HashMap;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{ConstMapError, Result};
use crate::parser;
use crate::report::ConstantType;

use super::schema::{GeneratedClass, StrategyConfig};
use super::GeneratedClasses;

static CLASS_NAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z][A-Za-z0-9_]*$").expect("valid class name pattern"));

#[must_use]
pub fn is_valid_class_name(name: &str) -> bool {
    CLASS_NAME_PATTERN.is_match(name)
}

/// Where a resolved constant lives. `namespace` is `None` when the class is
/// synthesized by the patch phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassPath {
    pub namespace: Option<String>,
    pub class: String,
}

#[derive(Debug)]
pub enum Strategy {
    Constant {
        class: String,
        name: String,
        constant_type: ConstantType,
    },
    Selection {
        group: String,
        constant_type: ConstantType,
    },
    ClassConstants(ClassConstants),
}

impl Strategy {
    /// Compiles the raw strategy config, validating class names and
    /// side-table references.
    pub fn compile(config: StrategyConfig, pool: &GeneratedClasses) -> Result<Self> {
        match config {
            StrategyConfig::Constant { class, name } => {
                let constant_type = pool_type(pool, &class)?;
                Ok(Self::Constant {
                    class,
                    name,
                    constant_type,
                })
            }
            StrategyConfig::Selection { group } => {
                let constant_type = pool_type(pool, &group)?;
                Ok(Self::Selection {
                    group,
                    constant_type,
                })
            }
            StrategyConfig::ClassConstants {
                file,
                constant_type,
                class_path,
            } => Ok(Self::ClassConstants(ClassConstants::new(
                &file,
                constant_type,
                class_path,
            ))),
        }
    }

    /// One-time setup before scanning; only `class_constants` does work.
    pub fn initialize(&mut self, source_root: &Path) -> Result<()> {
        match self {
            Self::Constant { .. } | Self::Selection { .. } => Ok(()),
            Self::ClassConstants(cc) => cc.initialize(source_root),
        }
    }

    /// Maps a literal's text to a field name; `None` means unresolved.
    #[must_use]
    pub fn resolve(&self, literal: &str, pool: &GeneratedClasses) -> Option<String> {
        match self {
            Self::Constant { name, .. } => Some(name.clone()),
            Self::Selection { group, .. } => pool
                .get(group)
                .and_then(|class| class.entries.get(literal))
                .cloned(),
            Self::ClassConstants(cc) => cc.mapping.get(literal).cloned(),
        }
    }

    #[must_use]
    pub fn owning_class(&self) -> ClassPath {
        match self {
            Self::Constant { class, .. } => ClassPath {
                namespace: None,
                class: class.clone(),
            },
            Self::Selection { group, .. } => ClassPath {
                namespace: None,
                class: group.clone(),
            },
            Self::ClassConstants(cc) => ClassPath {
                namespace: cc.namespace.clone(),
                class: cc.class_path.join("."),
            },
        }
    }

    #[must_use]
    pub const fn constant_type(&self) -> ConstantType {
        match self {
            Self::Constant { constant_type, .. } | Self::Selection { constant_type, .. } => {
                *constant_type
            }
            Self::ClassConstants(cc) => cc.constant_type,
        }
    }
}

fn pool_type(pool: &GeneratedClasses, name: &str) -> Result<ConstantType> {
    if !is_valid_class_name(name) {
        return Err(ConstMapError::Config(format!(
            "Invalid class name '{name}'"
        )));
    }
    pool.get(name)
        .map(|class: &GeneratedClass| class.constant_type)
        .ok_or_else(|| {
            ConstMapError::Config(format!("Unknown generated class '{name}' in strategy"))
        })
}

/// Resolution against an authoritative enum-like class already present in
/// the source tree.
#[derive(Debug)]
pub struct ClassConstants {
    /// `/`-normalized path relative to the source root, `.cs` suffixed.
    file: String,
    /// File stem followed by the configured nested segments.
    class_path: Vec<String>,
    constant_type: ConstantType,
    namespace: Option<String>,
    mapping: HashMap<String, String>,
}

impl ClassConstants {
    fn new(file: &str, constant_type: ConstantType, nested: Vec<String>) -> Self {
        let mut file = file.replace('\\', "/");
        if !file.ends_with(".cs") {
            file.push_str(".cs");
        }
        let start = file.rfind('/').map_or(0, |i| i + 1);
        let end = file.rfind('.').unwrap_or(file.len());
        let stem = file[start..end].to_string();

        let mut class_path = vec![stem];
        class_path.extend(nested);

        Self {
            file,
            class_path,
            constant_type,
            namespace: None,
            mapping: HashMap::new(),
        }
    }

    /// Parses the referenced file and builds the `value -> name` table.
    /// Duplicate values keep the first declared name.
    fn initialize(&mut self, source_root: &Path) -> Result<()> {
        let path = source_root.join(&self.file);
        let content =
            std::fs::read_to_string(&path).map_err(|source| ConstMapError::FileRead {
                path,
                source,
            })?;
        let (namespace, fields) =
            parser::constant_fields(&content, &self.file, &self.class_path, self.constant_type)?;
        self.namespace = namespace;
        for (value, name) in fields {
            self.mapping.entry(value.to_string()).or_insert(name);
        }
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn with_mapping(
        file: &str,
        constant_type: ConstantType,
        nested: Vec<String>,
        namespace: Option<String>,
        mapping: HashMap<String, String>,
    ) -> Self {
        let mut cc = Self::new(file, constant_type, nested);
        cc.namespace = namespace;
        cc.mapping = mapping;
        cc
    }
}

#[cfg(test)]
#[path = "strategy_tests.rs"]
mod tests;
