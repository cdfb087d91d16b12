use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

#[test]
fn dump_tree_as_json() {
    let mut cmd = cargo_bin_cmd!("treedump");
    cmd.arg("dump").arg(fixture_path("window.tree.json"));

    cmd.assert().success().stdout(
        predicate::str::contains("\"XamlType\": \"Page\"")
            .and(predicate::str::contains("\"Text\": \"Hello\""))
            .and(predicate::str::contains("\"AutomationId\": \"ok\""))
            .and(predicate::str::contains("ScrollBar").not())
            .and(predicate::str::contains("Tag").not())
            .and(predicate::str::contains("Opacity").not()),
    );
}

#[test]
fn dump_with_extra_attribute() {
    let mut cmd = cargo_bin_cmd!("treedump");
    cmd.arg("dump")
        .arg(fixture_path("window.tree.json"))
        .arg("--attribute")
        .arg("Opacity");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("\"Opacity\": 0.5"));
}

#[test]
fn dump_excluding_an_element() {
    let mut cmd = cargo_bin_cmd!("treedump");
    cmd.arg("dump")
        .arg(fixture_path("window.tree.json"))
        .arg("--exclude")
        .arg("ok");

    cmd.assert().success().stdout(
        predicate::str::contains("TextBlock")
            .and(predicate::str::contains("Button").not())
            .and(predicate::str::contains("ContentPresenter").not()),
    );
}

#[test]
fn dump_excluding_unknown_element_fails() {
    let mut cmd = cargo_bin_cmd!("treedump");
    cmd.arg("dump")
        .arg(fixture_path("window.tree.json"))
        .arg("--exclude")
        .arg("nope");

    cmd.assert()
        .code(2)
        .stderr(predicate::str::contains("no element with identity tag"));
}

#[test]
fn dump_legacy_format() {
    let mut cmd = cargo_bin_cmd!("treedump");
    cmd.arg("dump")
        .arg(fixture_path("window.tree.json"))
        .arg("--format")
        .arg("legacy");

    cmd.assert().success().stdout(
        predicate::str::starts_with("[Page]\n")
            .and(predicate::str::contains("  [TextBlock]\n"))
            .and(predicate::str::contains("    Text=Hello\n")),
    );
}

#[test]
fn format_from_config_file() {
    let dir = tempfile::tempdir().expect("temp dir");
    let config = dir.path().join("treedump.toml");
    fs::write(&config, "[output]\nformat = \"legacy\"\n").expect("write config");

    let mut cmd = cargo_bin_cmd!("treedump");
    cmd.arg("--config")
        .arg(&config)
        .arg("dump")
        .arg(fixture_path("window.tree.json"));

    cmd.assert()
        .success()
        .stdout(predicate::str::starts_with("[Page]\n"));
}

#[test]
fn dump_then_compare_with_expected() {
    let dir = tempfile::tempdir().expect("temp dir");
    let actual = dir.path().join("window.actual.json");

    cargo_bin_cmd!("treedump")
        .arg("dump")
        .arg(fixture_path("window.tree.json"))
        .arg("--output")
        .arg(&actual)
        .assert()
        .success();

    cargo_bin_cmd!("treedump")
        .arg("compare")
        .arg(fixture_path("window.expected.json"))
        .arg(&actual)
        .assert()
        .success()
        .stdout(predicate::str::contains("Dumps are equal"));

    // Width is 200.5 against 200
    cargo_bin_cmd!("treedump")
        .arg("compare")
        .arg(fixture_path("window.expected.json"))
        .arg(&actual)
        .arg("--epsilon")
        .arg("0.1")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("root.Width"));
}

#[test]
fn compare_reports_differences() {
    let mut cmd = cargo_bin_cmd!("treedump");
    cmd.arg("compare")
        .arg(fixture_path("window.expected.json"))
        .arg(fixture_path("window.changed.json"));

    cmd.assert()
        .code(1)
        .stdout(predicate::str::contains("Dumps differ"))
        .stderr(predicate::str::contains("root.children[0].Text"));
}

#[test]
fn compare_invalid_document_is_an_error() {
    let mut cmd = cargo_bin_cmd!("treedump");
    cmd.arg("compare")
        .arg(fixture_path("window.expected.json"))
        .arg(fixture_path("window.tree.json").with_extension("missing"));

    cmd.assert()
        .code(2)
        .stderr(predicate::str::contains("Error: cannot read"));

    let dir = tempfile::tempdir().expect("temp dir");
    let broken = dir.path().join("broken.json");
    fs::write(&broken, "{\"XamlType\": ").expect("write dump");

    cargo_bin_cmd!("treedump")
        .arg("compare")
        .arg(&broken)
        .arg(fixture_path("window.expected.json"))
        .assert()
        .code(2)
        .stderr(predicate::str::contains("failed to parse expected document"));
}

#[test]
fn find_element_by_identity() {
    let mut cmd = cargo_bin_cmd!("treedump");
    cmd.arg("find")
        .arg(fixture_path("window.expected.json"))
        .arg("ok");

    cmd.assert().success().stdout(
        predicate::str::contains("\"XamlType\": \"Button\"")
            .and(predicate::str::contains("ContentPresenter"))
            .and(predicate::str::contains("TextBlock").not()),
    );

    cargo_bin_cmd!("treedump")
        .arg("find")
        .arg(fixture_path("window.expected.json"))
        .arg("cancel")
        .assert()
        .code(1);
}

#[test]
fn list_formats() {
    let mut cmd = cargo_bin_cmd!("treedump");
    cmd.arg("formats");

    cmd.assert().success().stdout(
        predicate::str::contains("json").and(predicate::str::contains("legacy")),
    );
}
