//! The persisted analysis artifact.
//!
//! The report is the sole contract between the analyze and patch phases: it
//! can be saved, hand-edited (e.g. to fill in a failed replacement), and
//! replayed without re-scanning. File keys live in a `BTreeMap` and matches
//! are kept sorted by start offset, so serialization is byte-stable across
//! runs on unchanged input.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ConstMapError, Result};

pub const REPORT_FILE_NAME: &str = "report.json";

/// Primitive type of a constant field, spelled as the C# keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConstantType {
    Int,
    Short,
    UShort,
}

impl ConstantType {
    #[must_use]
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Int => "int",
            Self::Short => "short",
            Self::UShort => "ushort",
        }
    }
}

impl fmt::Display for ConstantType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// One matched literal and its proposed resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportMatch {
    /// The rule pattern that produced this match.
    pub pattern: String,
    /// Byte offset of the literal within the line.
    pub start: usize,
    /// Byte length of the literal.
    pub length: usize,
    /// The literal's text as it appears in the source.
    pub literal: String,
    /// Resolved field name, or `None` when resolution failed.
    pub replacement: Option<String>,
    /// Namespace of the owning class; `None` when the class is synthesized
    /// by the patch phase.
    pub owning_namespace: Option<String>,
    /// Dotted path of the class holding the constant.
    pub owning_class: String,
    pub constant_type: ConstantType,
}

impl ReportMatch {
    #[must_use]
    pub const fn is_resolved(&self) -> bool {
        self.replacement.is_some()
    }
}

/// All matches found on one source line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportEntry {
    /// 0-based line index into the file's line sequence.
    pub line: usize,
    /// Identifier of the enclosing member.
    pub member: String,
    /// The line's original text.
    pub content: String,
    /// Matches sorted ascending by start offset.
    pub matches: Vec<ReportMatch>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    /// Total recorded matches.
    pub total: usize,
    /// Matches with no known replacement.
    pub failed: usize,
    /// Entries keyed by `/`-normalized relative file path, sorted.
    pub files: BTreeMap<String, Vec<ReportEntry>>,
}

impl Report {
    #[must_use]
    pub const fn resolved(&self) -> usize {
        self.total - self.failed
    }

    /// Loads a report from `<dir>/report.json`.
    pub fn load(dir: &Path) -> Result<Self> {
        let path = dir.join(REPORT_FILE_NAME);
        if !path.exists() {
            return Err(ConstMapError::ReportNotFound(path));
        }
        let content = fs::read_to_string(&path).map_err(|source| ConstMapError::FileRead {
            path: path.clone(),
            source,
        })?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Writes the report pretty-printed to `<dir>/report.json`.
    pub fn save(&self, dir: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(dir.join(REPORT_FILE_NAME), json)?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
