//! Typed view of the merged config.
//!
//! Extraction is lenient about unknown keys (the unused-key report covers
//! those); defaults reproduce the established sync behavior so an empty
//! config section is valid.

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SupplierSettings {
    /// Feed endpoint override; `None` uses the client's production default.
    pub base_url: Option<String>,
    pub page_size: u32,
    pub page_pause_ms: u64,
}

impl Default for SupplierSettings {
    fn default() -> Self {
        Self {
            base_url: None,
            page_size: 500,
            page_pause_ms: 1_000,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CatalogSettings {
    /// Shop subdomain of `<shop>.myshopify.com`. Required unless `endpoint`
    /// is set.
    pub shop: Option<String>,
    /// Full GraphQL endpoint override; takes precedence over `shop`.
    pub endpoint: Option<String>,
    pub api_version: String,
    pub page_size: u32,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            shop: None,
            endpoint: None,
            api_version: "2023-07".to_string(),
            page_size: 250,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PricingSettings {
    /// Markup multiplier as a decimal string (e.g. `"1.6"`). Parsed with the
    /// same decimal-string rules as prices.
    pub markup: String,
}

impl Default for PricingSettings {
    fn default() -> Self {
        Self {
            markup: "1.6".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SyncPolicySettings {
    /// Proceed on an explicitly partial supplier feed instead of failing the
    /// run. Off by default.
    pub allow_partial_feed: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    /// Root directory for per-run artifact directories.
    pub root: String,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            root: "exports".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SyncSettings {
    pub supplier: SupplierSettings,
    pub catalog: CatalogSettings,
    pub pricing: PricingSettings,
    pub sync: SyncPolicySettings,
    pub export: ExportSettings,
}

/// Extract typed settings from the merged config JSON.
pub fn extract_settings(config_json: &Value) -> Result<SyncSettings> {
    serde_json::from_value(config_json.clone()).context("config does not match expected shape")
}
