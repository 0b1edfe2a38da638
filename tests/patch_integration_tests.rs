mod common;

use std::fs;

use predicates::prelude::*;

use common::TestFixture;

fn analyze(fixture: &TestFixture) {
    constmap!()
        .arg("analyze")
        .arg(fixture.source())
        .arg("--mappings")
        .arg(fixture.mappings_path())
        .arg("--destination")
        .arg(fixture.destination())
        .assert()
        .success();
}

#[test]
fn patch_replays_the_report_against_a_copy() {
    let fixture = TestFixture::new();
    fixture.create_selection_project();
    analyze(&fixture);

    constmap!()
        .arg("patch")
        .arg(fixture.source())
        .arg("--destination")
        .arg(fixture.destination())
        .assert()
        .success()
        .stdout(predicate::str::contains("1/1 modifications found"))
        .stdout(predicate::str::contains("1 classes created"));

    let patched = fixture.read_patched("Player.cs");
    assert!(patched.starts_with("using ConstMap.Generated;\n"));
    assert!(patched.contains("AddBuff(BuffKind.WellFed, 60);"));

    let generated = fixture.read_patched("ConstMap/GeneratedConstants.cs");
    assert!(generated.contains("internal static class BuffKind"));
    assert!(generated.contains("public const int WellFed = 27;"));

    // The original tree is never modified.
    assert_eq!(
        fs::read_to_string(fixture.source().join("Player.cs")).unwrap(),
        common::PLAYER_CS
    );
}

#[test]
fn run_chains_analyze_and_patch() {
    let fixture = TestFixture::new();
    fixture.create_selection_project();

    constmap!()
        .arg("run")
        .arg(fixture.source())
        .arg("--mappings")
        .arg(fixture.mappings_path())
        .arg("--destination")
        .arg(fixture.destination())
        .assert()
        .success()
        .stdout(predicate::str::contains("Analyzing done"))
        .stdout(predicate::str::contains("Patching done"));

    assert!(fixture
        .read_patched("Player.cs")
        .contains("AddBuff(BuffKind.WellFed, 60);"));
}

#[test]
fn hand_edited_report_drives_the_patch() {
    let fixture = TestFixture::new();
    fixture.create_selection_project();
    analyze(&fixture);

    // Reviewers may rename replacements between the phases; the patch
    // follows the report, not the rule set.
    let report_path = fixture.destination().join("report.json");
    let edited = fs::read_to_string(&report_path)
        .unwrap()
        .replace("\"WellFed\"", "\"Satiated\"");
    fs::write(&report_path, edited).unwrap();

    constmap!()
        .arg("patch")
        .arg(fixture.source())
        .arg("--destination")
        .arg(fixture.destination())
        .assert()
        .success();

    assert!(fixture
        .read_patched("Player.cs")
        .contains("AddBuff(BuffKind.Satiated, 60);"));
}

#[test]
fn class_constants_strategy_imports_the_owning_namespace() {
    let fixture = TestFixture::new();
    fixture.create_file(
        "decompiled/ID/BuffID.cs",
        "namespace Game.ID\n{\n    public class BuffID\n    {\n        public const int WellFed = 27;\n    }\n}\n",
    );
    fixture.create_file("decompiled/Player.cs", common::PLAYER_CS);
    fixture.create_mappings(
        r#"{
            "rules": [
                {
                    "pattern": "AddBuff\\((?P<match>\\d+)",
                    "strategy": { "type": "class_constants", "file": "ID/BuffID.cs", "constant_type": "int" }
                }
            ]
        }"#,
    );

    constmap!()
        .arg("run")
        .arg(fixture.source())
        .arg("--mappings")
        .arg(fixture.mappings_path())
        .arg("--destination")
        .arg(fixture.destination())
        .assert()
        .success()
        .stdout(predicate::str::contains("0 classes created"));

    let patched = fixture.read_patched("Player.cs");
    assert!(patched.starts_with("using Game.ID;\n"));
    assert!(patched.contains("AddBuff(BuffID.WellFed, 60);"));
    assert!(!fixture
        .patched()
        .join("ConstMap/GeneratedConstants.cs")
        .exists());
}

#[test]
fn patch_without_a_report_is_an_error() {
    let fixture = TestFixture::new();
    fixture.create_file("decompiled/Player.cs", common::PLAYER_CS);
    fs::create_dir_all(fixture.destination()).unwrap();

    constmap!()
        .arg("patch")
        .arg(fixture.source())
        .arg("--destination")
        .arg(fixture.destination())
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Report not found"));
}

#[test]
fn stale_report_is_rejected_with_location() {
    let fixture = TestFixture::new();
    fixture.create_selection_project();
    analyze(&fixture);

    // Source drifts after analysis.
    fixture.create_file(
        "decompiled/Player.cs",
        &common::PLAYER_CS.replace("AddBuff(27, 60)", "AddBuff(28, 60)"),
    );

    constmap!()
        .arg("patch")
        .arg(fixture.source())
        .arg("--destination")
        .arg(fixture.destination())
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Report inconsistent"))
        .stderr(predicate::str::contains("Player.cs"));
}
