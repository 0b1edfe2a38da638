//! Raw serde shape of the rule configuration file.

use indexmap::IndexMap;
use serde::Deserialize;

use crate::report::ConstantType;

#[derive(Debug, Deserialize)]
pub struct MappingsFile {
    /// Side table of named constant groups. Read-only once loaded.
    #[serde(default)]
    pub generated_classes: IndexMap<String, GeneratedClass>,

    /// Rewrite rules, in priority order.
    pub rules: Vec<RuleConfig>,
}

/// A named group of `literal -> field name` entries with a declared
/// primitive type. Groups referenced by `constant`/`selection` strategies
/// become synthesized classes in the patched tree.
#[derive(Debug, Clone, Deserialize)]
pub struct GeneratedClass {
    pub constant_type: ConstantType,
    #[serde(default)]
    pub entries: IndexMap<String, String>,
}

#[derive(Debug, Deserialize)]
pub struct RuleConfig {
    /// Regex with a named group `match` capturing the candidate literal.
    pub pattern: String,

    /// Optional regex over the enclosing member's identifier.
    #[serde(default)]
    pub method_pattern: Option<String>,

    /// Relative paths this rule is restricted to; empty means all files.
    #[serde(default)]
    pub whitelist: Vec<String>,

    /// Relative paths this rule never applies to.
    #[serde(default)]
    pub blacklist: Vec<String>,

    pub strategy: StrategyConfig,

    /// Excludes the rule from the run entirely.
    #[serde(default)]
    pub ignore: bool,
}

/// Tagged union over the three resolution strategies. An unknown tag is a
/// hard load error (serde rejects unrecognized variants).
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StrategyConfig {
    /// Every matched literal resolves to one fixed name in a synthesized
    /// class.
    Constant { class: String, name: String },

    /// Literals resolve through the shared side-table group `group`.
    Selection { group: String },

    /// Literals resolve against `public const` fields of an existing class
    /// in the source tree.
    ClassConstants {
        file: String,
        constant_type: ConstantType,
        #[serde(default)]
        class_path: Vec<String>,
    },
}
