//! Lightweight C# source parsing.
//!
//! Decompiled sources are mechanically formatted (one declaration per line,
//! brace-per-line bodies), so member boundaries are recovered with per-line
//! regexes and brace counting rather than a full syntax tree.

pub mod constants;

use std::sync::LazyLock;

use regex::Regex;

pub use constants::constant_fields;

/// A method, constructor, or property accessor with a contiguous body.
///
/// Line indices are 0-based and inclusive on both ends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberSpan {
    pub identifier: String,
    pub start_line: usize,
    pub end_line: usize,
}

/// Splits text on `\r\n`, `\r`, or `\n`, preserving original line numbering.
#[must_use]
pub fn split_lines(content: &str) -> Vec<&str> {
    split_lines_with_terminators(content)
        .into_iter()
        .map(|(line, _)| line)
        .collect()
}

/// Like [`split_lines`], but pairs each line with its own terminator so a
/// rewritten file can be reassembled with its original endings. The final
/// element's terminator is empty.
#[must_use]
pub fn split_lines_with_terminators(content: &str) -> Vec<(&str, &str)> {
    let mut lines = Vec::new();
    let bytes = content.as_bytes();
    let mut start = 0;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\n' => {
                lines.push((&content[start..i], &content[i..=i]));
                i += 1;
                start = i;
            }
            b'\r' => {
                let end = if bytes.get(i + 1) == Some(&b'\n') {
                    i + 2
                } else {
                    i + 1
                };
                lines.push((&content[start..i], &content[i..end]));
                i = end;
                start = i;
            }
            _ => i += 1,
        }
    }
    lines.push((&content[start..], ""));
    lines
}

static METHOD_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^\s*(?:\[[^\]]*\]\s*)*(?:(?:public|private|protected|internal|static|virtual|override|sealed|abstract|async|unsafe|extern|new|partial)\s+)+[\w<>\[\],\. ]*?(?P<name>[A-Za-z_]\w*)\s*\(",
    )
    .expect("valid method pattern")
});

static ACCESSOR_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?P<name>get|set)\s*(?:\{|=>|;|$)").expect("valid accessor pattern")
});

/// Keywords that look like a method declaration to [`METHOD_PATTERN`]
/// when they carry a modifier-like prefix.
const NON_MEMBER_KEYWORDS: &[&str] = &[
    "if", "else", "for", "foreach", "while", "do", "switch", "using", "lock", "catch", "fixed",
    "return", "throw",
];

/// Extracts method, constructor, and accessor spans.
///
/// Spans are disjoint: once a member declaration is found, scanning resumes
/// after its closing line, so members nested inside a body (local functions)
/// are folded into the enclosing span.
#[must_use]
pub fn member_spans(content: &str) -> Vec<MemberSpan> {
    let lines = split_lines(content);
    let mut members = Vec::new();
    let mut i = 0;
    while i < lines.len() {
        let Some(identifier) = member_identifier(lines[i]) else {
            i += 1;
            continue;
        };
        let end_line = member_end(&lines, i);
        members.push(MemberSpan {
            identifier,
            start_line: i,
            end_line,
        });
        i = end_line + 1;
    }
    members
}

fn member_identifier(line: &str) -> Option<String> {
    if let Some(caps) = ACCESSOR_PATTERN.captures(line) {
        return Some(caps["name"].to_string());
    }
    let caps = METHOD_PATTERN.captures(line)?;
    let name = &caps["name"];
    if NON_MEMBER_KEYWORDS.contains(&name) {
        return None;
    }
    Some(name.to_string())
}

/// Finds the last line of the member starting at `start`: the line holding
/// the balancing `}` for block bodies, or the terminating `;` for
/// expression-bodied and auto-implemented members.
fn member_end(lines: &[&str], start: usize) -> usize {
    let mut depth = 0usize;
    let mut opened = false;
    for (i, line) in lines.iter().enumerate().skip(start) {
        for ch in line.chars() {
            match ch {
                '{' => {
                    depth += 1;
                    opened = true;
                }
                '}' => {
                    depth = depth.saturating_sub(1);
                    if opened && depth == 0 {
                        return i;
                    }
                }
                _ => {}
            }
        }
        if !opened && line.contains(';') {
            return i;
        }
    }
    lines.len().saturating_sub(1)
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
