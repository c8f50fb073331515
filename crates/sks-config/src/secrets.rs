//! Runtime secret resolution.
//!
//! Single source of truth for credentials:
//! - Config YAML stores only env var NAMES (e.g. `"SKS_SUPPLIER_API_KEY"`).
//! - The CLI calls [`resolve_secrets`] once at startup and passes the result
//!   into client constructors; no `std::env::var` calls anywhere else.
//! - `Debug` output redacts credential values.
//! - Error messages reference the env var NAME, never the value.
//!
//! All three credentials are required: every command that touches a remote
//! needs both sides authenticated, and failing at startup beats failing
//! halfway through a paginated fetch.

use anyhow::{bail, Result};
use serde_json::Value;

/// All runtime-resolved credentials for one sync run.
///
/// **`api_key` and `catalog_token` are redacted in `Debug` output.**
#[derive(Clone)]
pub struct ResolvedSecrets {
    /// Supplier account email (basic-auth username).
    pub supplier_email: String,
    /// Supplier API key (basic-auth password).
    pub supplier_api_key: String,
    /// Platform Admin API access token.
    pub catalog_token: String,
}

impl std::fmt::Debug for ResolvedSecrets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedSecrets")
            .field("supplier_email", &self.supplier_email)
            .field("supplier_api_key", &"<REDACTED>")
            .field("catalog_token", &"<REDACTED>")
            .finish()
    }
}

/// Env var names as stored in the config — NAMES, not values.
struct SecretEnvNames {
    supplier_email_var: String,
    supplier_api_key_var: String,
    catalog_token_var: String,
}

fn parse_env_names(config_json: &Value) -> SecretEnvNames {
    SecretEnvNames {
        supplier_email_var: read_str_at(config_json, "/supplier/credentials_env/email")
            .unwrap_or_else(|| "SKS_SUPPLIER_EMAIL".to_string()),
        supplier_api_key_var: read_str_at(config_json, "/supplier/credentials_env/api_key")
            .unwrap_or_else(|| "SKS_SUPPLIER_API_KEY".to_string()),
        catalog_token_var: read_str_at(config_json, "/catalog/token_env")
            .unwrap_or_else(|| "SKS_CATALOG_TOKEN".to_string()),
    }
}

/// Read a non-empty string at `pointer`, `None` otherwise.
fn read_str_at(config: &Value, pointer: &str) -> Option<String> {
    let s = config.pointer(pointer)?.as_str()?.trim();
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

/// Resolve a named environment variable; unset or blank yields `None`.
/// Never returns the value through an error path.
fn resolve_env(var_name: &str) -> Option<String> {
    match std::env::var(var_name) {
        Ok(v) if !v.trim().is_empty() => Some(v),
        _ => None,
    }
}

/// Resolve all credentials from the environment.
///
/// # Errors
/// Returns `Err` naming the first missing env var. The value is never
/// mentioned.
pub fn resolve_secrets(config_json: &Value) -> Result<ResolvedSecrets> {
    let names = parse_env_names(config_json);

    let Some(supplier_email) = resolve_env(&names.supplier_email_var) else {
        bail!(
            "SECRETS_MISSING: required env var '{}' (supplier email) is not set or empty",
            names.supplier_email_var,
        );
    };
    let Some(supplier_api_key) = resolve_env(&names.supplier_api_key_var) else {
        bail!(
            "SECRETS_MISSING: required env var '{}' (supplier api key) is not set or empty",
            names.supplier_api_key_var,
        );
    };
    let Some(catalog_token) = resolve_env(&names.catalog_token_var) else {
        bail!(
            "SECRETS_MISSING: required env var '{}' (catalog access token) is not set or empty",
            names.catalog_token_var,
        );
    };

    Ok(ResolvedSecrets {
        supplier_email,
        supplier_api_key,
        catalog_token,
    })
}
