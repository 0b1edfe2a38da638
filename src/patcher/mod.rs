//! The patch engine.
//!
//! Replays a persisted report against a copy of the source tree. The report
//! is the one true input: the source is consulted only for the pristine
//! lines being rewritten, and any disagreement between the two is a hard
//! report-consistency error. Resolution failures never surface here — an
//! entry with no resolved replacement leaves its literal untouched.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

use walkdir::WalkDir;

use crate::error::{ConstMapError, Result};
use crate::parser;
use crate::progress::FileProgress;
use crate::report::{ConstantType, Report, ReportEntry, ReportMatch};

/// Namespace of all synthesized constant-holder classes.
pub const GENERATED_NAMESPACE: &str = "ConstMap.Generated";
/// Relative path of the generated declarations file in the patched tree.
pub const GENERATED_FILE: &str = "ConstMap/GeneratedConstants.cs";

pub struct PatchSummary {
    pub modifications: usize,
    pub classes_created: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct GeneratedField {
    constant_type: ConstantType,
    value: String,
}

pub struct Patcher {
    report: Report,
}

impl Patcher {
    #[must_use]
    pub const fn new(report: Report) -> Self {
        Self { report }
    }

    /// Copies `source` to `destination_project`, rewrites every reported
    /// line, and emits the generated declarations file.
    pub fn patch(
        &self,
        source: &Path,
        destination_project: &Path,
        progress: &FileProgress,
    ) -> Result<PatchSummary> {
        copy_tree(source, destination_project)?;

        // class name -> field name -> declaration, both levels sorted so
        // repeated runs produce byte-identical output.
        let mut classes: BTreeMap<String, BTreeMap<String, GeneratedField>> = BTreeMap::new();

        for (file, entries) in &self.report.files {
            self.patch_file(source, destination_project, file, entries, &mut classes)?;
            progress.inc();
        }
        progress.finish();

        if !classes.is_empty() {
            write_generated_file(destination_project, &classes)?;
        }

        Ok(PatchSummary {
            modifications: self.report.resolved(),
            classes_created: classes.len(),
        })
    }

    fn patch_file(
        &self,
        source: &Path,
        destination_project: &Path,
        file: &str,
        entries: &[ReportEntry],
        classes: &mut BTreeMap<String, BTreeMap<String, GeneratedField>>,
    ) -> Result<()> {
        let source_path = source.join(file);
        if !source_path.exists() {
            return Err(ConstMapError::ReportMismatch {
                file: file.to_string(),
                line: 0,
                reason: "file referenced by the report is absent from the source tree".to_string(),
            });
        }
        let content =
            fs::read_to_string(&source_path).map_err(|source| ConstMapError::FileRead {
                path: source_path,
                source,
            })?;
        let split = parser::split_lines_with_terminators(&content);
        let mut lines: Vec<String> = split.iter().map(|(line, _)| (*line).to_string()).collect();
        let mut imports = BTreeSet::new();

        for entry in entries {
            if entry.line >= lines.len() {
                return Err(ConstMapError::ReportMismatch {
                    file: file.to_string(),
                    line: entry.line,
                    reason: format!("line index out of range (file has {} lines)", lines.len()),
                });
            }
            if let Some(rewritten) = splice_line(&lines[entry.line], entry, file)? {
                lines[entry.line] = rewritten;
            }

            for m in entry.matches.iter().filter(|m| m.is_resolved()) {
                match &m.owning_namespace {
                    Some(namespace) => {
                        imports.insert(format!("using {namespace};"));
                    }
                    None => {
                        imports.insert(format!("using {GENERATED_NAMESPACE};"));
                        record_generated_field(classes, m);
                    }
                }
            }
        }

        // Reassemble with each line's own terminator so CRLF sources keep
        // their endings and a fully unresolved file stays byte-identical.
        let newline = split
            .first()
            .map_or("\n", |&(_, t)| if t.is_empty() { "\n" } else { t });
        let mut output = String::new();
        for import in &imports {
            output.push_str(import);
            output.push_str(newline);
        }
        for (line, (_, terminator)) in lines.iter().zip(&split) {
            output.push_str(line);
            output.push_str(terminator);
        }
        fs::write(destination_project.join(file), output)?;
        Ok(())
    }
}

/// Rewrites one line by splicing every resolved match into the pristine
/// text in a single left-to-right pass. Returns `None` when no match is
/// resolved, leaving the line byte-identical.
fn splice_line(line: &str, entry: &ReportEntry, file: &str) -> Result<Option<String>> {
    let mismatch = |reason: String| ConstMapError::ReportMismatch {
        file: file.to_string(),
        line: entry.line,
        reason,
    };

    let mut out = String::new();
    let mut cursor = 0;
    let mut changed = false;
    for m in &entry.matches {
        let Some(replacement) = &m.replacement else {
            continue;
        };
        let end = m.start + m.length;
        if m.start < cursor
            || end > line.len()
            || !line.is_char_boundary(m.start)
            || !line.is_char_boundary(end)
        {
            return Err(mismatch(format!(
                "match span ({}, {}) is out of range or overlaps a previous match",
                m.start, m.length
            )));
        }
        if &line[m.start..end] != m.literal {
            return Err(mismatch(format!(
                "expected literal '{}' at offset {}, found '{}'",
                m.literal,
                m.start,
                &line[m.start..end]
            )));
        }
        out.push_str(&line[cursor..m.start]);
        out.push_str(&m.owning_class);
        out.push('.');
        out.push_str(replacement);
        cursor = end;
        changed = true;
    }
    if !changed {
        return Ok(None);
    }
    out.push_str(&line[cursor..]);
    Ok(Some(out))
}

/// First write wins on duplicate field names within one class.
fn record_generated_field(
    classes: &mut BTreeMap<String, BTreeMap<String, GeneratedField>>,
    m: &ReportMatch,
) {
    let Some(name) = &m.replacement else {
        return;
    };
    classes
        .entry(m.owning_class.clone())
        .or_default()
        .entry(name.clone())
        .or_insert_with(|| GeneratedField {
            constant_type: m.constant_type,
            value: m.literal.clone(),
        });
}

fn write_generated_file(
    destination_project: &Path,
    classes: &BTreeMap<String, BTreeMap<String, GeneratedField>>,
) -> Result<()> {
    let mut source = format!("namespace {GENERATED_NAMESPACE}\n{{\n");
    for (class, fields) in classes {
        source.push_str(&format!("    internal static class {class}\n    {{\n"));
        for (name, field) in fields {
            source.push_str(&format!(
                "        public const {} {} = {};\n",
                field.constant_type, name, field.value
            ));
        }
        source.push_str("    }\n");
    }
    source.push_str("}\n");

    let path = destination_project.join(GENERATED_FILE);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, source)?;
    Ok(())
}

/// Full copy of the source tree, preserving relative structure.
fn copy_tree(source: &Path, destination: &Path) -> Result<()> {
    for entry in WalkDir::new(source)
        .into_iter()
        .filter_map(std::result::Result::ok)
        .filter(|e| e.file_type().is_file())
    {
        let relative = entry.path().strip_prefix(source).unwrap_or(entry.path());
        let target = destination.join(relative);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(entry.path(), &target)?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
