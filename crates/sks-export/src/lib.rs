//! sks-export
//!
//! Mutation sink: persists the ordered mutation set produced by one
//! reconciliation run. Two serializations of the same instructions:
//!
//! - `mutations.csv` — `id,price,cost,inventoryQuantity`, prices rendered as
//!   decimal strings, absent fields as empty cells. Prefixed with a UTF-8 BOM
//!   so spreadsheet tools detect the encoding.
//! - `mutations.jsonl` — one instruction per line, absent fields omitted.
//!
//! Both land in a per-run `exports/<run_id>/` directory next to a
//! `manifest.json` recording run id, config hash, fetch completeness and
//! join statistics.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sks_reconcile::{format_micros, MutationInstruction, ReconcileStats};
use sks_schemas::FetchCompleteness;
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Byte-order mark emitted at the start of CSV exports. Excel and friends
/// fall back to the platform codepage without it.
pub const UTF8_BOM: &str = "\u{feff}";

pub const MUTATIONS_CSV_HEADER: &str = "id,price,cost,inventoryQuantity";

// ---------------------------------------------------------------------------
// CSV
// ---------------------------------------------------------------------------

/// Render the mutation set as CSV text (BOM + header + one row per
/// instruction, `\n` line endings).
pub fn render_mutations_csv(mutations: &[MutationInstruction]) -> String {
    let mut out = String::new();
    out.push_str(UTF8_BOM);
    out.push_str(MUTATIONS_CSV_HEADER);
    out.push('\n');

    for m in mutations {
        out.push_str(&csv_field(&m.variant_id));
        out.push(',');
        if let Some(p) = m.price_micros {
            out.push_str(&format_micros(p));
        }
        out.push(',');
        if let Some(c) = m.cost_micros {
            out.push_str(&format_micros(c));
        }
        out.push(',');
        if let Some(q) = m.inventory_quantity {
            out.push_str(&q.to_string());
        }
        out.push('\n');
    }
    out
}

pub fn write_mutations_csv(
    path: impl AsRef<Path>,
    mutations: &[MutationInstruction],
) -> Result<()> {
    let path = path.as_ref();
    fs::write(path, render_mutations_csv(mutations))
        .with_context(|| format!("write mutations csv failed: {}", path.display()))
}

/// Quote a CSV field only when it needs it (comma, quote or newline).
fn csv_field(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

// ---------------------------------------------------------------------------
// JSONL
// ---------------------------------------------------------------------------

/// One mutation as serialized to JSONL. Prices are decimal strings here, the
/// same rendering as the CSV columns; absent fields are omitted entirely so a
/// consumer can never mistake "no change" for "clear this value".
#[derive(Debug, Clone, Serialize)]
struct MutationLine<'a> {
    id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    price: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    cost: Option<String>,
    #[serde(rename = "inventoryQuantity", skip_serializing_if = "Option::is_none")]
    inventory_quantity: Option<i64>,
}

/// Render the mutation set as JSON Lines (one instruction per line).
pub fn render_mutations_jsonl(mutations: &[MutationInstruction]) -> Result<String> {
    let mut out = String::new();
    for m in mutations {
        let line = MutationLine {
            id: &m.variant_id,
            price: m.price_micros.map(format_micros),
            cost: m.cost_micros.map(format_micros),
            inventory_quantity: m.inventory_quantity,
        };
        let json = serde_json::to_string(&line).context("serialize mutation line failed")?;
        out.push_str(&json);
        out.push('\n');
    }
    Ok(out)
}

pub fn write_mutations_jsonl(
    path: impl AsRef<Path>,
    mutations: &[MutationInstruction],
) -> Result<()> {
    let path = path.as_ref();
    let text = render_mutations_jsonl(mutations)?;
    fs::write(path, text)
        .with_context(|| format!("write mutations jsonl failed: {}", path.display()))
}

// ---------------------------------------------------------------------------
// Per-run artifacts
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncManifest {
    pub schema_version: i32,
    pub run_id: Uuid,
    pub config_hash: String,
    pub created_at_utc: DateTime<Utc>,
    pub supplier_fetch: FetchCompleteness,
    pub catalog_fetch: FetchCompleteness,
    pub stats: ReconcileStats,
    pub artifacts: ArtifactList,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactList {
    pub mutations_csv: String,
    pub mutations_jsonl: String,
    pub manifest_json: String,
}

pub struct WriteSyncArtifactsArgs<'a> {
    pub exports_root: &'a Path, // e.g. ./exports
    pub schema_version: i32,
    pub run_id: Uuid,
    pub config_hash: &'a str,
    pub supplier_fetch: &'a FetchCompleteness,
    pub catalog_fetch: &'a FetchCompleteness,
    pub stats: ReconcileStats,
    pub mutations: &'a [MutationInstruction],
}

pub struct WriteSyncArtifactsResult {
    pub run_dir: PathBuf,
    pub manifest_path: PathBuf,
}

/// Write the full artifact set for one run under `exports/<run_id>/`.
///
/// The run id is fresh per run, so overwriting within the run dir is fine;
/// nothing outside it is touched.
pub fn write_sync_artifacts(args: WriteSyncArtifactsArgs<'_>) -> Result<WriteSyncArtifactsResult> {
    let run_dir = args.exports_root.join(args.run_id.to_string());
    fs::create_dir_all(&run_dir)
        .with_context(|| format!("create exports dir failed: {}", run_dir.display()))?;

    write_mutations_csv(run_dir.join("mutations.csv"), args.mutations)?;
    write_mutations_jsonl(run_dir.join("mutations.jsonl"), args.mutations)?;

    let manifest = SyncManifest {
        schema_version: args.schema_version,
        run_id: args.run_id,
        config_hash: args.config_hash.to_string(),
        created_at_utc: Utc::now(),
        supplier_fetch: args.supplier_fetch.clone(),
        catalog_fetch: args.catalog_fetch.clone(),
        stats: args.stats,
        artifacts: ArtifactList {
            mutations_csv: "mutations.csv".to_string(),
            mutations_jsonl: "mutations.jsonl".to_string(),
            manifest_json: "manifest.json".to_string(),
        },
    };

    let manifest_path = run_dir.join("manifest.json");
    let json = serde_json::to_string_pretty(&manifest).context("serialize manifest failed")?;
    fs::write(&manifest_path, format!("{json}\n"))
        .with_context(|| format!("write manifest failed: {}", manifest_path.display()))?;

    Ok(WriteSyncArtifactsResult {
        run_dir,
        manifest_path,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
