use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

#[allow(deprecated)]
fn fbc_cmd() -> Command {
    Command::cargo_bin("fbc-filter").unwrap()
}

const CATALOG: &str = r#"
{"schema": "olm.package", "name": "foo", "defaultChannel": "stable"}
{"schema": "olm.channel", "package": "foo", "name": "stable", "entries": [
  {"name": "foo.v1.0.0"},
  {"name": "foo.v1.1.0", "replaces": "foo.v1.0.0"},
  {"name": "foo.v2.0.0", "replaces": "foo.v1.1.0"}
]}
{"schema": "olm.channel", "package": "foo", "name": "alpha", "entries": [{"name": "foo.v2.0.0"}]}
{"schema": "olm.bundle", "package": "foo", "name": "foo.v1.0.0", "image": "quay.io/foo/bundle:v1.0.0",
 "properties": [{"type": "olm.package", "value": {"packageName": "foo", "version": "1.0.0"}}]}
{"schema": "olm.bundle", "package": "foo", "name": "foo.v1.1.0", "image": "quay.io/foo/bundle:v1.1.0",
 "properties": [{"type": "olm.package", "value": {"packageName": "foo", "version": "1.1.0"}}]}
{"schema": "olm.bundle", "package": "foo", "name": "foo.v2.0.0", "image": "quay.io/foo/bundle:v2.0.0",
 "properties": [{"type": "olm.package", "value": {"packageName": "foo", "version": "2.0.0"}}]}
{"schema": "olm.package", "name": "bar", "defaultChannel": "stable"}
{"schema": "olm.channel", "package": "bar", "name": "stable", "entries": [{"name": "bar.v0.1.0"}]}
{"schema": "olm.bundle", "package": "bar", "name": "bar.v0.1.0",
 "properties": [{"type": "olm.package", "value": {"packageName": "bar", "version": "0.1.0"}}]}
"#;

fn write_config(dir: &Path, body: &str) -> std::path::PathBuf {
    let path = dir.join("filter.yaml");
    let doc = format!(
        "apiVersion: olm.operatorframework.io/v1\nkind: FilterConfiguration\n{body}"
    );
    fs::write(&path, doc).unwrap();
    path
}

fn setup() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let catalog = tmp.path().join("catalog");
    fs::create_dir_all(&catalog).unwrap();
    fs::write(catalog.join("catalog.json"), CATALOG).unwrap();
    tmp
}

#[test]
fn test_filter_yaml_to_stdout() {
    let tmp = setup();
    let config = write_config(
        tmp.path(),
        "packages:\n  - name: foo\n    channels:\n      - name: stable\n        versionRange: \">=1.1.0\"\n",
    );

    fbc_cmd()
        .args(["filter", "--config"])
        .arg(&config)
        .arg(tmp.path().join("catalog"))
        .assert()
        .success()
        .stdout(predicate::str::starts_with("---\n"))
        .stdout(predicate::str::contains("name: foo.v1.1.0"))
        .stdout(predicate::str::contains("name: foo.v2.0.0"))
        .stdout(predicate::str::contains("foo.v1.0.0\n").count(1))
        .stdout(predicate::str::contains("bar").not())
        .stdout(predicate::str::contains("alpha").not())
        .stderr(predicate::str::contains("Filtered"));
}

#[test]
fn test_filter_json_to_file() {
    let tmp = setup();
    let config = write_config(tmp.path(), "packages:\n  - name: bar\n");
    let out = tmp.path().join("out").join("catalog.json");

    fbc_cmd()
        .args(["filter", "--output", "json", "--config"])
        .arg(&config)
        .arg("--output-file")
        .arg(&out)
        .arg(tmp.path().join("catalog"))
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let text = fs::read_to_string(&out).unwrap();
    assert!(text.contains("\"bar.v0.1.0\""));
    assert!(!text.contains("foo"));
}

#[test]
fn test_filter_warnings_on_stderr() {
    let tmp = setup();
    let config = write_config(
        tmp.path(),
        "packages:\n  - name: foo\n    defaultChannel: beta\n  - name: ghost\n",
    );

    fbc_cmd()
        .args(["filter", "--config"])
        .arg(&config)
        .arg(tmp.path().join("catalog"))
        .assert()
        .success()
        .stderr(predicate::str::contains("WARN"))
        .stderr(predicate::str::contains("package \"ghost\" not found in catalog"));
}

#[test]
fn test_filter_removed_default_channel_fails() {
    let tmp = setup();
    let config = write_config(
        tmp.path(),
        "packages:\n  - name: foo\n    channels:\n      - name: alpha\n",
    );

    fbc_cmd()
        .args(["filter", "--config"])
        .arg(&config)
        .arg(tmp.path().join("catalog"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("the default channel \"stable\" was filtered out"));
}

#[test]
fn test_filter_rejects_wrong_kind() {
    let tmp = setup();
    let config = tmp.path().join("filter.yaml");
    fs::write(
        &config,
        "apiVersion: olm.operatorframework.io/v1\nkind: Other\npackages: []\n",
    )
    .unwrap();

    fbc_cmd()
        .args(["filter", "--config"])
        .arg(&config)
        .arg(tmp.path().join("catalog"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration error"));
}

#[test]
fn test_filter_missing_catalog() {
    let tmp = TempDir::new().unwrap();
    let config = write_config(tmp.path(), "packages: []\n");

    fbc_cmd()
        .args(["filter", "--config"])
        .arg(&config)
        .arg(tmp.path().join("nope"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not exist"));
}

#[test]
fn test_check_config_ok() {
    let tmp = TempDir::new().unwrap();
    let config = write_config(
        tmp.path(),
        "packages:\n  - name: foo\n    channels:\n      - name: stable\n        versionRange: \"1.0 - 1.4 || >=2\"\n",
    );

    fbc_cmd()
        .arg("check-config")
        .arg(&config)
        .assert()
        .success()
        .stderr(predicate::str::contains("1 version range(s)"));
}

#[test]
fn test_check_config_bad_range() {
    let tmp = TempDir::new().unwrap();
    let config = write_config(
        tmp.path(),
        "packages:\n  - name: foo\n    channels:\n      - name: stable\n        versionRange: \">=banana\"\n",
    );

    fbc_cmd()
        .arg("check-config")
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("channel \"stable\""));
}
