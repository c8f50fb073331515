//! sks entry point.
//!
//! Thin orchestration over the library crates: load config, resolve
//! credentials, fetch both record sets, reconcile, emit. All decision logic
//! lives in sks-reconcile; this binary only wires the pipeline together and
//! applies the partial-feed policy.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use sks_catalog::{CatalogSource, ShopifyCatalogClient};
use sks_config::secrets::ResolvedSecrets;
use sks_config::settings::SyncSettings;
use sks_config::UnusedKeyPolicy;
use sks_reconcile::{
    normalize_catalog, normalize_supplier, price_to_micros, reconcile, PricingPolicy,
    ReconcileOutcome,
};
use sks_schemas::FetchCompleteness;
use sks_supplier::{SupplierCredentials, SupplierFeed, VidaXlSupplierFeed};
use tracing::warn;
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "sks")]
#[command(about = "Supplier feed -> platform catalog sync", long_about = None)]
struct Cli {
    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute layered config hash + print canonical JSON
    ConfigHash {
        /// Paths in merge order (base -> site -> local)
        #[arg(required = true)]
        paths: Vec<String>,
    },

    /// Fetch both sides and reconcile; print statistics, write nothing
    Plan {
        /// Layered config paths in merge order
        #[arg(long = "config", required = true)]
        config_paths: Vec<String>,

        /// Proceed on an explicitly partial supplier feed
        #[arg(long, default_value_t = false)]
        allow_partial: bool,
    },

    /// Full pipeline: fetch, reconcile, write per-run artifacts
    Run {
        /// Layered config paths in merge order
        #[arg(long = "config", required = true)]
        config_paths: Vec<String>,

        /// Proceed on an explicitly partial supplier feed
        #[arg(long, default_value_t = false)]
        allow_partial: bool,

        /// Override export.root from config
        #[arg(long)]
        exports_root: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env.local if present (dev convenience). Silent if the file does
    // not exist; production injects env vars directly.
    let _ = dotenvy::from_filename(".env.local");

    init_tracing();

    let cli = Cli::parse();
    match cli.cmd {
        Commands::ConfigHash { paths } => {
            let path_refs: Vec<&str> = paths.iter().map(|s| s.as_str()).collect();
            let loaded = sks_config::load_layered_yaml(&path_refs)?;
            println!("config_hash={}", loaded.config_hash);
            println!("{}", loaded.canonical_json);
        }

        Commands::Plan {
            config_paths,
            allow_partial,
        } => {
            let ctx = prepare_run(&config_paths)?;
            let sync = fetch_and_reconcile(&ctx, allow_partial).await?;
            print_fetch_lines(&sync);
            print_stats_lines(&sync.outcome);
        }

        Commands::Run {
            config_paths,
            allow_partial,
            exports_root,
        } => {
            let ctx = prepare_run(&config_paths)?;
            let sync = fetch_and_reconcile(&ctx, allow_partial).await?;

            let run_id = Uuid::new_v4();
            let exports_root =
                exports_root.unwrap_or_else(|| PathBuf::from(&ctx.settings.export.root));
            let art = sks_export::write_sync_artifacts(sks_export::WriteSyncArtifactsArgs {
                exports_root: &exports_root,
                schema_version: 1,
                run_id,
                config_hash: &ctx.config_hash,
                supplier_fetch: &sync.supplier_fetch,
                catalog_fetch: &sync.catalog_fetch,
                stats: sync.outcome.stats,
                mutations: &sync.outcome.mutations,
            })?;

            println!("run_id={run_id}");
            println!("config_hash={}", ctx.config_hash);
            print_fetch_lines(&sync);
            print_stats_lines(&sync.outcome);
            println!("run_dir={}", art.run_dir.display());
        }
    }

    Ok(())
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

struct RunContext {
    config_hash: String,
    settings: SyncSettings,
    secrets: ResolvedSecrets,
}

struct SyncResult {
    outcome: ReconcileOutcome,
    supplier_fetch: FetchCompleteness,
    catalog_fetch: FetchCompleteness,
}

/// Load config layers, report unused keys, extract typed settings and
/// resolve credentials once. Everything downstream takes explicit values.
fn prepare_run(config_paths: &[String]) -> Result<RunContext> {
    let path_refs: Vec<&str> = config_paths.iter().map(|s| s.as_str()).collect();
    let loaded = sks_config::load_layered_yaml(&path_refs)?;

    let report = sks_config::report_unused_keys(&loaded.config_json, UnusedKeyPolicy::Warn)?;
    if !report.is_clean() {
        warn!(
            unused = report.unused_leaf_pointers.len(),
            pointers = ?report.unused_leaf_pointers,
            "config contains keys nothing reads"
        );
    }

    let settings = sks_config::settings::extract_settings(&loaded.config_json)?;
    let secrets = sks_config::secrets::resolve_secrets(&loaded.config_json)?;

    Ok(RunContext {
        config_hash: loaded.config_hash,
        settings,
        secrets,
    })
}

async fn fetch_and_reconcile(ctx: &RunContext, allow_partial_flag: bool) -> Result<SyncResult> {
    let allow_partial = allow_partial_flag || ctx.settings.sync.allow_partial_feed;

    let feed = build_supplier_feed(ctx);
    let supplier_outcome = feed.fetch_all().await?;
    if let FetchCompleteness::Partial {
        pages_fetched,
        ref reason,
    } = supplier_outcome.completeness
    {
        if !allow_partial {
            bail!(
                "supplier feed is partial after {pages_fetched} page(s): {reason}. \
                 Re-run with --allow-partial or set sync.allow_partial_feed to proceed anyway"
            );
        }
        warn!(
            pages_fetched,
            rows = supplier_outcome.rows.len(),
            reason = %reason,
            "proceeding on an explicitly partial supplier feed"
        );
    }

    let catalog_client = build_catalog_client(ctx)?;
    let catalog_outcome = catalog_client.fetch_all().await?;

    let suppliers = normalize_supplier(&supplier_outcome.rows)?;
    let variants = normalize_catalog(&catalog_outcome.rows)?;
    let policy = pricing_policy(&ctx.settings)?;
    let outcome = reconcile(&suppliers, &variants, &policy)?;

    Ok(SyncResult {
        outcome,
        supplier_fetch: supplier_outcome.completeness,
        catalog_fetch: catalog_outcome.completeness,
    })
}

fn build_supplier_feed(ctx: &RunContext) -> VidaXlSupplierFeed {
    let credentials = SupplierCredentials {
        email: ctx.secrets.supplier_email.clone(),
        api_key: ctx.secrets.supplier_api_key.clone(),
    };
    let pause = Duration::from_millis(ctx.settings.supplier.page_pause_ms);
    match &ctx.settings.supplier.base_url {
        Some(url) => VidaXlSupplierFeed::new_with_base_url(
            credentials,
            ctx.settings.supplier.page_size,
            pause,
            url.clone(),
        ),
        None => VidaXlSupplierFeed::new(credentials, ctx.settings.supplier.page_size, pause),
    }
}

fn build_catalog_client(ctx: &RunContext) -> Result<ShopifyCatalogClient> {
    let token = ctx.secrets.catalog_token.clone();
    let page_size = ctx.settings.catalog.page_size;
    if let Some(endpoint) = &ctx.settings.catalog.endpoint {
        return Ok(ShopifyCatalogClient::new_with_endpoint(
            token,
            page_size,
            endpoint.clone(),
        ));
    }
    let shop = ctx
        .settings
        .catalog
        .shop
        .as_deref()
        .context("config needs catalog.shop (or catalog.endpoint)")?;
    Ok(ShopifyCatalogClient::new(
        shop,
        token,
        &ctx.settings.catalog.api_version,
        page_size,
    ))
}

fn pricing_policy(settings: &SyncSettings) -> Result<PricingPolicy> {
    let markup_micros = price_to_micros(&settings.pricing.markup, "pricing.markup")?;
    Ok(PricingPolicy::new(markup_micros)?)
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

fn print_fetch_lines(sync: &SyncResult) {
    println!("supplier_fetch={}", completeness_str(&sync.supplier_fetch));
    println!("catalog_fetch={}", completeness_str(&sync.catalog_fetch));
}

fn completeness_str(c: &FetchCompleteness) -> &'static str {
    match c {
        FetchCompleteness::Complete => "complete",
        FetchCompleteness::Partial { .. } => "partial",
    }
}

fn print_stats_lines(outcome: &ReconcileOutcome) {
    let s = &outcome.stats;
    println!("supplier_records={}", s.supplier_records);
    println!("catalog_variants={}", s.catalog_variants);
    println!("matched={}", s.matched);
    println!("supplier_only={}", s.supplier_only);
    println!("catalog_only={}", s.catalog_only);
    println!("unchanged={}", s.unchanged);
    println!("stock_only_mutations={}", s.stock_only_mutations);
    println!("price_mutations={}", s.price_mutations);
    println!("mutations={}", s.mutations_emitted());
}
