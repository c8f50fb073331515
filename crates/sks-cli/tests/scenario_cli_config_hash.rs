//! `sks config-hash` prints a stable hash plus the canonical JSON of the
//! merged layers.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;

fn write_layers(dir: &std::path::Path) -> (String, String) {
    let base = dir.join("base.yaml");
    fs::write(
        &base,
        r#"
supplier:
  page_size: 500
catalog:
  shop: "demo-store"
pricing:
  markup: "1.6"
"#,
    )
    .unwrap();

    let overlay = dir.join("overlay.yaml");
    fs::write(
        &overlay,
        r#"
pricing:
  markup: "2.0"
"#,
    )
    .unwrap();

    (
        base.to_string_lossy().into_owned(),
        overlay.to_string_lossy().into_owned(),
    )
}

#[test]
fn config_hash_prints_hash_and_canonical_json() {
    let tmp = tempfile::tempdir().unwrap();
    let (base, overlay) = write_layers(tmp.path());

    Command::cargo_bin("sks")
        .unwrap()
        .args(["config-hash", &base, &overlay])
        .assert()
        .success()
        .stdout(predicate::str::contains("config_hash="))
        // Overlay wins: canonical JSON carries the overridden markup.
        .stdout(predicate::str::contains("\"markup\":\"2.0\""))
        .stdout(predicate::str::contains("\"1.6\"").not());
}

#[test]
fn config_hash_is_stable_across_invocations() {
    let tmp = tempfile::tempdir().unwrap();
    let (base, overlay) = write_layers(tmp.path());

    let run = || {
        let out = Command::cargo_bin("sks")
            .unwrap()
            .args(["config-hash", &base, &overlay])
            .output()
            .unwrap();
        assert!(out.status.success());
        String::from_utf8(out.stdout).unwrap()
    };

    assert_eq!(run(), run());
}

#[test]
fn missing_config_file_fails() {
    Command::cargo_bin("sks")
        .unwrap()
        .args(["config-hash", "/nonexistent/sks.yaml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read yaml path"));
}
