//! Full pipeline through the binary: mocked supplier feed + mocked catalog,
//! `sks run` fetches both sides, reconciles and writes the per-run artifact
//! directory.

use assert_cmd::Command;
use httpmock::prelude::*;
use predicates::prelude::*;
use serde_json::json;
use std::fs;
use std::path::Path;

fn write_config(dir: &Path, server: &MockServer, exports_root: &Path) -> String {
    let cfg = dir.join("sync.yaml");
    fs::write(
        &cfg,
        format!(
            r#"
supplier:
  base_url: "{feed}"
  page_size: 10
  page_pause_ms: 0
catalog:
  endpoint: "{graphql}"
  page_size: 10
pricing:
  markup: "1.6"
export:
  root: "{exports}"
"#,
            feed = server.url("/feed"),
            graphql = server.url("/graphql"),
            exports = exports_root.display(),
        ),
    )
    .unwrap();
    cfg.to_string_lossy().into_owned()
}

fn mock_supplier_feed(server: &MockServer) {
    // Two rows, fewer than page_size: pagination ends after one page.
    server.mock(|when, then| {
        when.method(GET).path("/feed");
        then.status(200).json_body(json!({
            "data": [
                { "code": "A", "price": "100", "quantity": 5 },
                { "code": "B", "price": "120", "quantity": 7 }
            ]
        }));
    });
}

fn mock_catalog(server: &MockServer) {
    server.mock(|when, then| {
        when.method(POST)
            .path("/graphql")
            .header("x-shopify-access-token", "tok-test");
        then.status(200).json_body(json!({
            "data": {
                "productVariants": {
                    "pageInfo": { "hasNextPage": false, "endCursor": null },
                    "edges": [
                        { "node": { "id": "gid://v/1", "sku": "A", "price": "160",
                                    "inventoryQuantity": 5,
                                    "inventoryItem": { "cost": "100" } } },
                        { "node": { "id": "gid://v/2", "sku": "B", "price": "160",
                                    "inventoryQuantity": 10,
                                    "inventoryItem": { "cost": "100" } } }
                    ]
                }
            }
        }));
    });
}

fn sks(cfg: &str) -> Command {
    let mut cmd = Command::cargo_bin("sks").unwrap();
    cmd.env("SKS_SUPPLIER_EMAIL", "shop@example.com")
        .env("SKS_SUPPLIER_API_KEY", "feed-key")
        .env("SKS_CATALOG_TOKEN", "tok-test")
        .args(["run", "--config", cfg]);
    cmd
}

#[test]
fn run_writes_csv_jsonl_and_manifest() {
    let server = MockServer::start();
    mock_supplier_feed(&server);
    mock_catalog(&server);

    let tmp = tempfile::tempdir().unwrap();
    let exports_root = tmp.path().join("exports");
    let cfg = write_config(tmp.path(), &server, &exports_root);

    sks(&cfg)
        .assert()
        .success()
        .stdout(predicate::str::contains("run_id="))
        .stdout(predicate::str::contains("supplier_fetch=complete"))
        .stdout(predicate::str::contains("matched=2"))
        .stdout(predicate::str::contains("unchanged=1"))
        .stdout(predicate::str::contains("price_mutations=1"))
        .stdout(predicate::str::contains("mutations=1"));

    // Exactly one run directory under the exports root.
    let run_dirs: Vec<_> = fs::read_dir(&exports_root).unwrap().collect();
    assert_eq!(run_dirs.len(), 1);
    let run_dir = run_dirs[0].as_ref().unwrap().path();

    // A in sync, B changed price (100 -> 120, sale 192) and stock (10 -> 7).
    let csv = fs::read_to_string(run_dir.join("mutations.csv")).unwrap();
    assert_eq!(
        csv,
        "\u{feff}id,price,cost,inventoryQuantity\ngid://v/2,192,120,7\n"
    );

    let jsonl = fs::read_to_string(run_dir.join("mutations.jsonl")).unwrap();
    assert_eq!(
        jsonl.trim(),
        r#"{"id":"gid://v/2","price":"192","cost":"120","inventoryQuantity":7}"#
    );

    let manifest: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(run_dir.join("manifest.json")).unwrap()).unwrap();
    assert_eq!(manifest["stats"]["price_mutations"], 1);
    assert_eq!(manifest["supplier_fetch"], "Complete");
}

#[test]
fn run_is_idempotent_against_an_in_sync_catalog() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/feed");
        then.status(200).json_body(json!({
            "data": [ { "code": "A", "price": "100", "quantity": 5 } ]
        }));
    });
    server.mock(|when, then| {
        when.method(POST).path("/graphql");
        then.status(200).json_body(json!({
            "data": {
                "productVariants": {
                    "pageInfo": { "hasNextPage": false, "endCursor": null },
                    "edges": [
                        { "node": { "id": "gid://v/1", "sku": "A", "price": "160",
                                    "inventoryQuantity": 5,
                                    "inventoryItem": { "cost": "100" } } }
                    ]
                }
            }
        }));
    });

    let tmp = tempfile::tempdir().unwrap();
    let exports_root = tmp.path().join("exports");
    let cfg = write_config(tmp.path(), &server, &exports_root);

    sks(&cfg)
        .assert()
        .success()
        .stdout(predicate::str::contains("mutations=0"));

    let run_dirs: Vec<_> = fs::read_dir(&exports_root).unwrap().collect();
    let run_dir = run_dirs[0].as_ref().unwrap().path();
    let csv = fs::read_to_string(run_dir.join("mutations.csv")).unwrap();
    assert_eq!(csv, "\u{feff}id,price,cost,inventoryQuantity\n");
}

#[test]
fn missing_credentials_fail_before_any_fetch() {
    let server = MockServer::start();
    let feed_mock = server.mock(|when, then| {
        when.method(GET).path("/feed");
        then.status(200).json_body(json!({ "data": [] }));
    });

    let tmp = tempfile::tempdir().unwrap();
    let exports_root = tmp.path().join("exports");
    let cfg = write_config(tmp.path(), &server, &exports_root);

    let mut cmd = Command::cargo_bin("sks").unwrap();
    cmd.env_remove("SKS_SUPPLIER_EMAIL")
        .env_remove("SKS_SUPPLIER_API_KEY")
        .env_remove("SKS_CATALOG_TOKEN")
        .args(["run", "--config", &cfg])
        .assert()
        .failure()
        .stderr(predicate::str::contains("SECRETS_MISSING"));

    feed_mock.assert_hits(0);
    assert!(!exports_root.exists());
}
