#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// Creates an `assert_cmd` Command for the constmap binary.
#[macro_export]
macro_rules! constmap {
    () => {
        assert_cmd::Command::new(assert_cmd::cargo::cargo_bin!("constmap"))
    };
}

pub const PLAYER_CS: &str = r"namespace Game
{
    internal class Player
    {
        public void UpdateBuffs()
        {
            AddBuff(27, 60);
        }
    }
}
";

pub const SELECTION_MAPPINGS: &str = r#"{
    "generated_classes": {
        "BuffKind": {
            "constant_type": "int",
            "entries": { "27": "WellFed", "87": "Chilled" }
        }
    },
    "rules": [
        {
            "pattern": "AddBuff\\((?P<match>\\d+)",
            "strategy": { "type": "selection", "group": "BuffKind" }
        }
    ]
}"#;

/// Creates a temporary directory with test fixtures for integration tests.
pub struct TestFixture {
    pub dir: TempDir,
}

impl TestFixture {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Creates a file with the given content in the temp directory.
    pub fn create_file(&self, relative_path: &str, content: &str) {
        let path = self.dir.path().join(relative_path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directories");
        }
        fs::write(&path, content).expect("Failed to write file");
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Source tree root used by all fixtures.
    pub fn source(&self) -> PathBuf {
        self.dir.path().join("decompiled")
    }

    /// Report/patch destination used by all fixtures.
    pub fn destination(&self) -> PathBuf {
        self.dir.path().join("out")
    }

    /// Patched tree root produced by the patch phase.
    pub fn patched(&self) -> PathBuf {
        self.destination().join("decompiled_patched")
    }

    pub fn create_mappings(&self, content: &str) {
        self.create_file("mappings.json", content);
    }

    pub fn mappings_path(&self) -> PathBuf {
        self.dir.path().join("mappings.json")
    }

    /// One-file source tree plus a selection rule set that resolves its
    /// single literal.
    pub fn create_selection_project(&self) {
        self.create_file("decompiled/Player.cs", PLAYER_CS);
        self.create_mappings(SELECTION_MAPPINGS);
    }

    pub fn read_patched(&self, relative_path: &str) -> String {
        fs::read_to_string(self.patched().join(relative_path)).expect("Failed to read patched file")
    }

    pub fn read_report(&self) -> String {
        fs::read_to_string(self.destination().join("report.json")).expect("Failed to read report")
    }
}
