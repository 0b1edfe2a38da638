//! The scan engine.
//!
//! Walks every source file, restricts matching to member-body line ranges,
//! applies the applicable rules, and resolves matches into an ordered
//! [`Report`]. The engine is a single-threaded pipeline; strategy
//! initialization has already completed by the time [`Analyzer::analyze`]
//! runs, so rules and the generated-class side table are read-only here.

use std::fs;
use std::path::Path;

use crate::error::{ConstMapError, Result};
use crate::mappings::{Mappings, Rule, MATCH_GROUP};
use crate::parser::{self, MemberSpan};
use crate::progress::FileProgress;
use crate::report::{Report, ReportEntry, ReportMatch};
use crate::scanner;

pub struct Analyzer {
    mappings: Mappings,
    /// Drop unresolved captures entirely instead of recording them as
    /// failures. Lets partial rule sets iterate without the report being
    /// dominated by known-unresolved noise.
    ignore_failed: bool,
}

impl Analyzer {
    #[must_use]
    pub const fn new(mappings: Mappings, ignore_failed: bool) -> Self {
        Self {
            mappings,
            ignore_failed,
        }
    }

    /// Scans the source tree and builds the report. An unreadable file
    /// aborts the run; partial reports are not valid artifacts.
    pub fn analyze(&self, source: &Path, progress: &FileProgress) -> Result<Report> {
        let files = scanner::source_files(source)?;
        self.analyze_files(source, &files, progress)
    }

    /// Scans an already-enumerated, sorted file list.
    pub fn analyze_files(
        &self,
        source: &Path,
        files: &[std::path::PathBuf],
        progress: &FileProgress,
    ) -> Result<Report> {
        let mut report = Report::default();

        for file in files {
            let relative = scanner::relative_key(source, file);
            let file_rules: Vec<&Rule> = self
                .mappings
                .rules
                .iter()
                .filter(|rule| rule.applies_to_file(&relative))
                .collect();
            if !file_rules.is_empty() {
                let content =
                    fs::read_to_string(file).map_err(|source| ConstMapError::FileRead {
                        path: file.clone(),
                        source,
                    })?;
                let entries = self.scan_file(&content, &file_rules, &mut report);
                if !entries.is_empty() {
                    report.files.insert(relative, entries);
                }
            }
            progress.inc();
        }
        progress.finish();

        Ok(report)
    }

    /// Applies `rules` to every line inside a member body. Lines outside
    /// all member spans are never matched.
    fn scan_file(&self, content: &str, rules: &[&Rule], report: &mut Report) -> Vec<ReportEntry> {
        let lines = parser::split_lines(content);
        let mut entries = Vec::new();

        for member in parser::member_spans(content) {
            let member_rules: Vec<&&Rule> = rules
                .iter()
                .filter(|rule| rule.applies_to_member(&member.identifier))
                .collect();
            if member_rules.is_empty() {
                continue;
            }
            self.scan_member(&lines, &member, &member_rules, report, &mut entries);
        }
        entries
    }

    fn scan_member(
        &self,
        lines: &[&str],
        member: &MemberSpan,
        rules: &[&&Rule],
        report: &mut Report,
        entries: &mut Vec<ReportEntry>,
    ) {
        let end = member.end_line.min(lines.len().saturating_sub(1));
        for line_number in member.start_line..=end {
            let line = lines[line_number];
            let mut matches = Vec::new();

            for rule in rules {
                self.scan_line(line, rule, report, &mut matches);
            }

            if !matches.is_empty() {
                // Stable sort: text order for the patch phase, configuration
                // order preserved among equal offsets.
                matches.sort_by_key(|m: &ReportMatch| m.start);
                entries.push(ReportEntry {
                    line: line_number,
                    member: member.identifier.clone(),
                    content: line.to_string(),
                    matches,
                });
            }
        }
    }

    fn scan_line(
        &self,
        line: &str,
        rule: &Rule,
        report: &mut Report,
        matches: &mut Vec<ReportMatch>,
    ) {
        for caps in rule.regex.captures_iter(line) {
            let Some(group) = caps.name(MATCH_GROUP) else {
                continue;
            };
            let literal = group.as_str();
            let replacement = rule.strategy.resolve(literal, &self.mappings.generated_classes);
            if replacement.is_none() {
                if self.ignore_failed {
                    continue;
                }
                report.failed += 1;
            }
            let class = rule.strategy.owning_class();
            matches.push(ReportMatch {
                pattern: rule.pattern.clone(),
                start: group.start(),
                length: group.len(),
                literal: literal.to_string(),
                replacement,
                owning_namespace: class.namespace,
                owning_class: class.class,
                constant_type: rule.strategy.constant_type(),
            });
            report.total += 1;
        }
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
