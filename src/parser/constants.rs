//! Extraction of `public const` integer fields from an existing class.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{ConstMapError, Result};
use crate::report::ConstantType;

use super::split_lines;

static NAMESPACE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^\s*namespace\s+(?P<name>[A-Za-z_][\w.]*)").expect("valid namespace pattern")
});

static NESTED_CLASS_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bclass\s+[A-Za-z_]\w*").expect("valid class pattern"));

static CONST_FIELD_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*public\s+const\s+(?P<ty>int|short|ushort)\s+(?P<decls>[^;]+);")
        .expect("valid const field pattern")
});

/// Extracts the file's namespace and the `(value, name)` pairs of all
/// `public const` fields of type `kind` declared directly in the class
/// located by `class_path` (outermost first). Pairs are returned in
/// declaration order; duplicate-value policy is the caller's concern.
///
/// `file` is only used for error messages.
pub fn constant_fields(
    content: &str,
    file: &str,
    class_path: &[String],
    kind: ConstantType,
) -> Result<(Option<String>, Vec<(i64, String)>)> {
    let namespace = NAMESPACE_PATTERN
        .captures(content)
        .map(|caps| caps["name"].to_string());

    let lines = split_lines(content);
    let (start, end) = locate_class(&lines, file, class_path)?;

    let mut fields = Vec::new();
    let mut i = start;
    while i <= end {
        let line = lines[i];
        // Only direct members count: skip nested class blocks wholesale.
        if i > start && NESTED_CLASS_PATTERN.is_match(line) {
            i = block_end(&lines, i, end) + 1;
            continue;
        }
        i += 1;
        let Some(caps) = CONST_FIELD_PATTERN.captures(line) else {
            continue;
        };
        if &caps["ty"] != kind.keyword() {
            continue;
        }
        for declarator in caps["decls"].split(',') {
            let (name, value) = parse_declarator(declarator, class_path)?;
            fields.push((value, name));
        }
    }
    Ok((namespace, fields))
}

/// Narrows `lines` to the body of the class named by each successive path
/// segment, outermost first.
fn locate_class(lines: &[&str], file: &str, class_path: &[String]) -> Result<(usize, usize)> {
    let mut start = 0;
    let mut end = lines.len().saturating_sub(1);
    for segment in class_path {
        let pattern = Regex::new(&format!(r"\bclass\s+{}\b", regex::escape(segment))).map_err(
            |source| ConstMapError::InvalidPattern {
                pattern: segment.clone(),
                source,
            },
        )?;
        let decl_line = (start..=end)
            .find(|&i| pattern.is_match(lines[i]))
            .ok_or_else(|| ConstMapError::ClassNotFound {
                file: file.to_string(),
                class: class_path.join("."),
            })?;
        end = block_end(lines, decl_line, end);
        start = decl_line;
    }
    Ok((start, end))
}

/// Last line of the brace block opened at or after `decl_line`, clamped
/// to `limit`.
fn block_end(lines: &[&str], decl_line: usize, limit: usize) -> usize {
    let mut depth = 0usize;
    let mut opened = false;
    for (i, line) in lines.iter().enumerate().take(limit + 1).skip(decl_line) {
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
    }
    limit
}

fn parse_declarator(declarator: &str, class_path: &[String]) -> Result<(String, i64)> {
    let class = class_path.join(".");
    let (name, initializer) =
        declarator
            .split_once('=')
            .ok_or_else(|| ConstMapError::InvalidInitializer {
                class: class.clone(),
                field: declarator.trim().to_string(),
                text: declarator.trim().to_string(),
            })?;
    let name = name.trim().to_string();
    let text = initializer.trim();
    let value = parse_int_literal(text).ok_or_else(|| ConstMapError::InvalidInitializer {
        class,
        field: name.clone(),
        text: text.to_string(),
    })?;
    Ok((name, value))
}

/// Parses a decimal or `0x` hex integer literal, optionally minus-prefixed.
fn parse_int_literal(text: &str) -> Option<i64> {
    let (negative, digits) = text
        .strip_prefix('-')
        .map_or((false, text), |rest| (true, rest.trim_start()));
    let value = if let Some(hex) = digits.strip_prefix("0x").or_else(|| digits.strip_prefix("0X")) {
        i64::from_str_radix(hex, 16).ok()?
    } else {
        digits.parse::<i64>().ok()?
    };
    Some(if negative { -value } else { value })
}

#[cfg(test)]
#[path = "constants_tests.rs"]
mod tests;
