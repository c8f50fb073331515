//! sks-catalog
//!
//! Platform catalog client. Retrieves every product variant relevant to
//! reconciliation (id, sku, price, recorded cost, inventory quantity) via
//! the Admin GraphQL API, following `pageInfo` cursors until the connection
//! is exhausted. A bounded single-page read would silently truncate large
//! catalogs; the cursor walk keeps the engine's complete-set contract honest.
//!
//! The access token is a constructor parameter; nothing here reads process
//! environment state.

use std::fmt;

use chrono::Utc;
use serde::Deserialize;
use sks_schemas::{CatalogRow, FetchOutcome};
use tracing::info;

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Errors produced by the catalog client. Any failure aborts the catalog
/// fetch: unlike the supplier feed there is no partial-tolerance here, since
/// a truncated catalog would misclassify every missing variant as
/// supplier-only.
#[derive(Debug)]
pub enum CatalogError {
    /// Network or transport failure.
    Transport(String),
    /// Non-success HTTP status or GraphQL-level errors.
    Api { status: Option<u16>, message: String },
    /// A response payload could not be decoded.
    Decode(String),
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogError::Transport(msg) => write!(f, "catalog transport error: {msg}"),
            CatalogError::Api {
                status: Some(s),
                message,
            } => write!(f, "catalog api error status={s}: {message}"),
            CatalogError::Api {
                status: None,
                message,
            } => write!(f, "catalog api error: {message}"),
            CatalogError::Decode(msg) => write!(f, "catalog decode error: {msg}"),
        }
    }
}

impl std::error::Error for CatalogError {}

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

/// Catalog contract: materialize the complete variant set for one run.
#[async_trait::async_trait]
pub trait CatalogSource: Send + Sync {
    /// Human-readable name identifying this catalog (e.g. `"shopify"`).
    fn source_name(&self) -> &'static str;

    /// Fetch every variant page and return the materialized row set.
    async fn fetch_all(&self) -> Result<FetchOutcome<CatalogRow>, CatalogError>;
}

// ---------------------------------------------------------------------------
// Shopify implementation
// ---------------------------------------------------------------------------

const VARIANTS_QUERY: &str = "\
query($first: Int!, $after: String) {
  productVariants(first: $first, after: $after) {
    pageInfo { hasNextPage endCursor }
    edges {
      node {
        id
        sku
        price
        inventoryQuantity
        inventoryItem { cost }
      }
    }
  }
}";

/// Shopify Admin GraphQL catalog client.
#[derive(Debug, Clone)]
pub struct ShopifyCatalogClient {
    token: String,
    http: reqwest::Client,
    endpoint: String,
    page_size: u32,
}

impl ShopifyCatalogClient {
    pub const DEFAULT_API_VERSION: &'static str = "2023-07";
    pub const DEFAULT_PAGE_SIZE: u32 = 250;

    /// `shop` is the subdomain of `<shop>.myshopify.com`.
    pub fn new(shop: &str, token: String, api_version: &str, page_size: u32) -> Self {
        let endpoint = format!("https://{shop}.myshopify.com/admin/api/{api_version}/graphql.json");
        Self::new_with_endpoint(token, page_size, endpoint)
    }

    /// Direct endpoint constructor, for tests against a local mock server.
    pub fn new_with_endpoint(token: String, page_size: u32, endpoint: String) -> Self {
        Self {
            token,
            http: reqwest::Client::new(),
            endpoint,
            page_size,
        }
    }

    async fn fetch_page(&self, after: Option<&str>) -> Result<VariantConnection, CatalogError> {
        let body = serde_json::json!({
            "query": VARIANTS_QUERY,
            "variables": { "first": self.page_size, "after": after },
        });

        let resp = self
            .http
            .post(&self.endpoint)
            .header("X-Shopify-Access-Token", &self.token)
            .json(&body)
            .send()
            .await
            .map_err(|e| CatalogError::Transport(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(CatalogError::Api {
                status: Some(status.as_u16()),
                message: truncate(&text, 200).to_string(),
            });
        }

        let parsed: GraphqlResponse = resp
            .json()
            .await
            .map_err(|e| CatalogError::Decode(e.to_string()))?;

        if !parsed.errors.is_empty() {
            let message = parsed
                .errors
                .iter()
                .map(|e| e.message.as_str())
                .collect::<Vec<_>>()
                .join("; ");
            return Err(CatalogError::Api {
                status: None,
                message,
            });
        }

        parsed
            .data
            .map(|d| d.product_variants)
            .ok_or_else(|| CatalogError::Decode("response has neither data nor errors".to_string()))
    }
}

#[async_trait::async_trait]
impl CatalogSource for ShopifyCatalogClient {
    fn source_name(&self) -> &'static str {
        "shopify"
    }

    async fn fetch_all(&self) -> Result<FetchOutcome<CatalogRow>, CatalogError> {
        let mut rows: Vec<CatalogRow> = Vec::new();
        let mut after: Option<String> = None;

        loop {
            let connection = self.fetch_page(after.as_deref()).await?;

            for edge in connection.edges {
                rows.push(edge.node.into_row());
            }
            info!(total = rows.len(), "fetched catalog variants");

            if !connection.page_info.has_next_page {
                break;
            }
            after = match connection.page_info.end_cursor {
                Some(c) => Some(c),
                None => {
                    return Err(CatalogError::Decode(
                        "hasNextPage is true but endCursor is null".to_string(),
                    ))
                }
            };
        }

        Ok(FetchOutcome::complete(rows, Utc::now()))
    }
}

fn truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

// ---------------------------------------------------------------------------
// Wire-level structs (GraphQL JSON -> these -> CatalogRow)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
struct GraphqlResponse {
    data: Option<ResponseData>,
    #[serde(default)]
    errors: Vec<GraphqlError>,
}

#[derive(Debug, Clone, Deserialize)]
struct GraphqlError {
    message: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResponseData {
    product_variants: VariantConnection,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VariantConnection {
    page_info: PageInfo,
    edges: Vec<VariantEdge>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PageInfo {
    has_next_page: bool,
    end_cursor: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct VariantEdge {
    node: VariantNode,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VariantNode {
    id: String,
    sku: Option<String>,
    price: String,
    #[serde(default)]
    inventory_quantity: i64,
    inventory_item: Option<InventoryItem>,
}

#[derive(Debug, Clone, Deserialize)]
struct InventoryItem {
    cost: Option<String>,
}

impl VariantNode {
    fn into_row(self) -> CatalogRow {
        // A null recorded cost is carried as "0"; a null sku is carried as
        // an empty string and rejected downstream by validation.
        let cost = self
            .inventory_item
            .and_then(|item| item.cost)
            .unwrap_or_else(|| "0".to_string());

        CatalogRow {
            variant_id: self.id,
            sku: self.sku.unwrap_or_default(),
            price: self.price,
            cost,
            inventory_quantity: self.inventory_quantity,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
