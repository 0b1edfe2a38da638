use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::Result;

/// Collects every `.cs` file under `root`, sorted lexicographically so the
/// scan order (and thus progress output) is deterministic regardless of the
/// platform's directory enumeration order.
pub fn source_files(root: &Path) -> Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = WalkDir::new(root)
        .into_iter()
        .filter_map(std::result::Result::ok)
        .filter(|e| {
            e.file_type().is_file()
                && e.path().extension().and_then(|ext| ext.to_str()) == Some("cs")
        })
        .map(walkdir::DirEntry::into_path)
        .collect();
    files.sort();
    Ok(files)
}

/// Relative path of `file` under `root`, `/`-normalized. Rule filters and
/// report keys always use this form.
#[must_use]
pub fn relative_key(root: &Path, file: &Path) -> String {
    file.strip_prefix(root)
        .unwrap_or(file)
        .to_string_lossy()
        .replace('\\', "/")
}

#[cfg(test)]
#[path = "scanner_tests.rs"]
mod tests;
