use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use tempfile::TempDir;

use super::*;
use crate::mappings::schema::GeneratedClass;
use crate::mappings::{GeneratedClasses, RuleConfig, StrategyConfig};
use crate::report::ConstantType;

const PLAYER_CS: &str = r"namespace Game
{
    internal class Player
    {
        public int buff = Mk(27, 60);

        public void UpdateBuffs()
        {
            AddBuff(27, 60);
        }

        public void Draw()
        {
            AddBuff(87, 60);
        }
    }
}
";

fn buff_pool() -> GeneratedClasses {
    let mut entries = IndexMap::new();
    entries.insert("27".to_string(), "WellFed".to_string());
    entries.insert("87".to_string(), "Chilled".to_string());

    let mut pool = IndexMap::new();
    pool.insert(
        "BuffKind".to_string(),
        GeneratedClass {
            constant_type: ConstantType::Int,
            entries,
        },
    );
    pool
}

fn selection_rule(pattern: &str, method_pattern: Option<&str>) -> RuleConfig {
    RuleConfig {
        pattern: pattern.to_string(),
        method_pattern: method_pattern.map(ToString::to_string),
        whitelist: Vec::new(),
        blacklist: Vec::new(),
        strategy: StrategyConfig::Selection {
            group: "BuffKind".to_string(),
        },
        ignore: false,
    }
}

fn analyzer_with(configs: Vec<RuleConfig>, ignore_failed: bool) -> Analyzer {
    let pool = buff_pool();
    let rules = configs
        .into_iter()
        .map(|config| crate::mappings::Rule::compile(config, &pool).unwrap())
        .collect();
    Analyzer::new(
        Mappings {
            rules,
            generated_classes: pool,
            ignored: 0,
        },
        ignore_failed,
    )
}

fn run(analyzer: &Analyzer, source: &Path) -> Report {
    let progress = FileProgress::new(0, true);
    analyzer.analyze(source, &progress).unwrap()
}

fn tree_with(files: &[(&str, &str)]) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    for (path, content) in files {
        let full = dir.path().join(path);
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(full, content).unwrap();
    }
    dir
}

#[test]
fn matches_only_inside_member_bodies() {
    let dir = tree_with(&[("Player.cs", PLAYER_CS)]);
    let analyzer = analyzer_with(vec![selection_rule(r"(?P<match>\d+), 60", None)], false);

    let report = run(&analyzer, dir.path());

    // The class-level field initializer `buff = 27` is outside every member
    // and must not be scanned.
    let entries = &report.files["Player.cs"];
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].member, "UpdateBuffs");
    assert_eq!(entries[1].member, "Draw");
    assert_eq!(report.total, 2);
    assert_eq!(report.failed, 0);
}

#[test]
fn method_pattern_gates_matching() {
    let dir = tree_with(&[("Player.cs", PLAYER_CS)]);
    let analyzer = analyzer_with(
        vec![selection_rule(r"(?P<match>\d+), 60", Some("^Update"))],
        false,
    );

    let report = run(&analyzer, dir.path());

    let entries = &report.files["Player.cs"];
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].member, "UpdateBuffs");
    assert_eq!(entries[0].matches[0].replacement.as_deref(), Some("WellFed"));
}

#[test]
fn unresolved_literal_is_recorded_and_counted_once() {
    let dir = tree_with(&[(
        "NPC.cs",
        "class NPC\n{\n    public void AI()\n    {\n        AddBuff(999, 60);\n    }\n}\n",
    )]);
    let analyzer = analyzer_with(vec![selection_rule(r"(?P<match>\d+), 60", None)], false);

    let report = run(&analyzer, dir.path());

    assert_eq!(report.total, 1);
    assert_eq!(report.failed, 1);
    let matches = &report.files["NPC.cs"][0].matches;
    assert_eq!(matches[0].replacement, None);
}

#[test]
fn ignore_failed_drops_unresolved_entirely() {
    let dir = tree_with(&[(
        "NPC.cs",
        "class NPC\n{\n    public void AI()\n    {\n        AddBuff(999, 60);\n    }\n}\n",
    )]);
    let analyzer = analyzer_with(vec![selection_rule(r"(?P<match>\d+), 60", None)], true);

    let report = run(&analyzer, dir.path());

    assert_eq!(report.total, 0);
    assert_eq!(report.failed, 0);
    assert!(report.files.is_empty());
}

#[test]
fn matches_within_a_line_are_sorted_by_offset() {
    let dir = tree_with(&[(
        "Main.cs",
        "class Main\n{\n    public void Tick()\n    {\n        Mix(y == 87, x == 27);\n    }\n}\n",
    )]);
    // Configuration order deliberately resolves the later offset first.
    let analyzer = analyzer_with(
        vec![
            selection_rule(r"x == (?P<match>\d+)", None),
            selection_rule(r"y == (?P<match>\d+)", None),
        ],
        false,
    );

    let report = run(&analyzer, dir.path());

    let matches = &report.files["Main.cs"][0].matches;
    assert_eq!(matches.len(), 2);
    assert!(matches[0].start < matches[1].start);
    assert_eq!(matches[0].literal, "87");
    assert_eq!(matches[1].literal, "27");
}

#[test]
fn whitelist_limits_rule_to_listed_files() {
    let dir = tree_with(&[("Player.cs", PLAYER_CS), ("sub/Other.cs", PLAYER_CS)]);
    let mut config = selection_rule(r"(?P<match>\d+), 60", None);
    config.whitelist = vec!["sub/Other.cs".to_string()];
    let analyzer = analyzer_with(vec![config], false);

    let report = run(&analyzer, dir.path());

    assert!(!report.files.contains_key("Player.cs"));
    assert!(report.files.contains_key("sub/Other.cs"));
}

#[test]
fn one_rule_can_match_several_times_per_line() {
    let dir = tree_with(&[(
        "Main.cs",
        "class Main\n{\n    public void Tick()\n    {\n        Pair(id: 27, id: 87);\n    }\n}\n",
    )]);
    let analyzer = analyzer_with(vec![selection_rule(r"id: (?P<match>\d+)", None)], false);

    let report = run(&analyzer, dir.path());

    assert_eq!(report.total, 2);
    let matches = &report.files["Main.cs"][0].matches;
    assert_eq!(matches[0].replacement.as_deref(), Some("WellFed"));
    assert_eq!(matches[1].replacement.as_deref(), Some("Chilled"));
}

#[test]
fn analysis_is_deterministic_across_runs() {
    let dir = tree_with(&[
        ("b/Zeta.cs", PLAYER_CS),
        ("a/Alpha.cs", PLAYER_CS),
        ("Player.cs", PLAYER_CS),
    ]);
    let analyzer = analyzer_with(vec![selection_rule(r"(?P<match>\d+), 60", None)], false);

    let first = serde_json::to_string_pretty(&run(&analyzer, dir.path())).unwrap();
    let second = serde_json::to_string_pretty(&run(&analyzer, dir.path())).unwrap();

    assert_eq!(first, second);
    // Report keys are path-sorted regardless of visitation order.
    let report = run(&analyzer, dir.path());
    let keys: Vec<&String> = report.files.keys().collect();
    assert_eq!(keys, vec!["Player.cs", "a/Alpha.cs", "b/Zeta.cs"]);
}

#[test]
fn entry_records_line_number_and_content() {
    let dir = tree_with(&[("Player.cs", PLAYER_CS)]);
    let analyzer = analyzer_with(vec![selection_rule(r"(?P<match>\d+), 60", None)], false);

    let report = run(&analyzer, dir.path());

    let entry = &report.files["Player.cs"][0];
    assert_eq!(entry.content, "            AddBuff(27, 60);");
    let lines = crate::parser::split_lines(PLAYER_CS);
    assert_eq!(lines[entry.line], entry.content);
}
