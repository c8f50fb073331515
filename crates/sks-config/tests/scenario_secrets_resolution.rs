//! Env-based secret resolution.
//!
//! Failure tests use globally-unique sentinel env var names that are never
//! set in any CI or dev environment, so no `std::env::set_var` races with
//! parallel tests. The success test sets its own unique names once.

use sks_config::load_layered_yaml_from_strings;
use sks_config::secrets::resolve_secrets;

fn load(yaml: &str) -> serde_json::Value {
    load_layered_yaml_from_strings(&[yaml])
        .expect("test yaml must parse cleanly")
        .config_json
}

#[test]
fn missing_supplier_email_fails_with_var_name() {
    let yaml = r#"
supplier:
  credentials_env:
    email: "SKS_T1_SENTINEL_EMAIL_UNSET"
    api_key: "SKS_T1_SENTINEL_APIKEY_UNSET"
catalog:
  token_env: "SKS_T1_SENTINEL_TOKEN_UNSET"
"#;
    let err = resolve_secrets(&load(yaml)).unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("SECRETS_MISSING"), "got: {msg}");
    assert!(msg.contains("SKS_T1_SENTINEL_EMAIL_UNSET"), "got: {msg}");
}

#[test]
fn missing_catalog_token_fails_with_var_name() {
    let yaml = r#"
supplier:
  credentials_env:
    email: "SKS_T2_EMAIL_SET"
    api_key: "SKS_T2_APIKEY_SET"
catalog:
  token_env: "SKS_T2_SENTINEL_TOKEN_UNSET"
"#;
    std::env::set_var("SKS_T2_EMAIL_SET", "shop@example.com");
    std::env::set_var("SKS_T2_APIKEY_SET", "feed-key");

    let err = resolve_secrets(&load(yaml)).unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("SKS_T2_SENTINEL_TOKEN_UNSET"), "got: {msg}");
    assert!(
        !msg.contains("feed-key"),
        "error must never echo a resolved value: {msg}"
    );
}

#[test]
fn blank_value_counts_as_missing() {
    let yaml = r#"
supplier:
  credentials_env:
    email: "SKS_T3_EMAIL_BLANK"
    api_key: "SKS_T3_SENTINEL_APIKEY_UNSET"
catalog:
  token_env: "SKS_T3_SENTINEL_TOKEN_UNSET"
"#;
    std::env::set_var("SKS_T3_EMAIL_BLANK", "   ");

    let err = resolve_secrets(&load(yaml)).unwrap_err();
    assert!(err.to_string().contains("SKS_T3_EMAIL_BLANK"));
}

#[test]
fn all_present_resolves_and_debug_is_redacted() {
    let yaml = r#"
supplier:
  credentials_env:
    email: "SKS_T4_EMAIL"
    api_key: "SKS_T4_APIKEY"
catalog:
  token_env: "SKS_T4_TOKEN"
"#;
    std::env::set_var("SKS_T4_EMAIL", "shop@example.com");
    std::env::set_var("SKS_T4_APIKEY", "feed-key-value");
    std::env::set_var("SKS_T4_TOKEN", "token-value");

    let secrets = resolve_secrets(&load(yaml)).unwrap();
    assert_eq!(secrets.supplier_email, "shop@example.com");
    assert_eq!(secrets.supplier_api_key, "feed-key-value");
    assert_eq!(secrets.catalog_token, "token-value");

    let dbg = format!("{secrets:?}");
    assert!(dbg.contains("shop@example.com"));
    assert!(dbg.contains("<REDACTED>"));
    assert!(!dbg.contains("feed-key-value"));
    assert!(!dbg.contains("token-value"));
}

#[test]
fn default_var_names_apply_when_config_is_silent() {
    // No credentials_env section at all: the well-known defaults are used,
    // and the error names them.
    if std::env::var("SKS_SUPPLIER_EMAIL").is_ok() {
        eprintln!("SKIP: SKS_SUPPLIER_EMAIL set in ambient environment");
        return;
    }
    let err = resolve_secrets(&load("{}")).unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("SKS_SUPPLIER_EMAIL"), "got: {msg}");
}
