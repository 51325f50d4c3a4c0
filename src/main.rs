//! Assetlink CLI - bulk asset import and catalog association
//!
//! Usage: assetlink <COMMAND>
//!
//! Commands:
//!   import   Import assets and associate them with catalog entries
//!   mapping  Parse and display a mapping file
//!   groups   List the asset groups under an asset directory

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand};

use assetlink::import::{self, ImportEvent, ImportOptions};
use assetlink::models::Strategy;
use assetlink::{Config, GroupResolver, LocalStore};

/// Assetlink - bulk asset importer and catalog association tool
#[derive(Parser, Debug)]
#[command(name = "assetlink")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Output format for CI
    #[arg(long, global = true)]
    json: bool,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Import assets and associate them with catalog entries
    Import {
        /// CSV file mapping asset file names to product codes
        mapping: PathBuf,

        /// Directory holding the assets, one subdirectory per asset group
        assets: PathBuf,

        /// Content store directory
        #[arg(long, default_value = ".")]
        store: PathBuf,

        /// Name of the destination root folder (overrides config)
        #[arg(long)]
        root: Option<String>,

        /// Share one copy of each asset across products (root/group/asset
        /// layout). Default is one copy per product.
        #[arg(long)]
        by_asset: bool,

        /// Record folder structure and associations without copying file
        /// content
        #[arg(long)]
        mapping_only: bool,
    },

    /// Parse and display a mapping file (debugging)
    Mapping {
        /// CSV file mapping asset file names to product codes
        mapping: PathBuf,
    },

    /// List the asset groups discovered under an asset directory
    Groups {
        /// Directory holding the assets, one subdirectory per asset group
        assets: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Import {
            mapping,
            assets,
            store,
            root,
            by_asset,
            mapping_only,
        } => cmd_import(
            &mapping,
            &assets,
            &store,
            root,
            by_asset,
            mapping_only,
            cli.json,
            cli.verbose,
        ),
        Commands::Mapping { mapping } => cmd_mapping(&mapping, cli.json),
        Commands::Groups { assets } => cmd_groups(&assets, cli.json),
    }
}

#[allow(clippy::too_many_arguments)]
fn cmd_import(
    mapping: &Path,
    assets: &Path,
    store_dir: &Path,
    root: Option<String>,
    by_asset: bool,
    mapping_only: bool,
    json: bool,
    verbose: u8,
) -> Result<()> {
    let (config, warnings) = Config::load_or_default(store_dir)?;
    for warning in &warnings {
        eprintln!(
            "⚠ unknown config key '{}' in {}",
            warning.key,
            warning.file.display()
        );
    }

    let root_name = root.unwrap_or(config.import.root);
    let strategy = if by_asset {
        Strategy::ByAsset
    } else {
        config.import.strategy
    };

    if !json {
        println!("📦 Assetlink Import");
        println!("Mapping:  {}", mapping.display());
        println!("Assets:   {}", assets.display());
        println!("Store:    {}", store_dir.display());
        println!("Root:     {root_name}");
        println!("Strategy: {strategy}");
        if mapping_only {
            println!("Mode: mapping only (no file content copied)");
        }
    }

    let mut entries = assetlink::read_mapping(mapping)?;
    if !json {
        println!("\n✓ Read {} mapping entries", entries.len());
    }

    let resolver = GroupResolver::discover(assets)?;
    if !json {
        println!(
            "✓ Discovered {} asset groups: {}",
            resolver.groups().len(),
            resolver.groups().join(", ")
        );
    }

    let mut store = if mapping_only {
        LocalStore::open_mapping_only(store_dir)?
    } else {
        LocalStore::open(store_dir)?
    };
    if store.catalog_size() == 0 {
        eprintln!(
            "⚠ no catalog entries loaded from {} - every product code will be skipped",
            store_dir.join("catalog.json").display()
        );
    }

    let options = ImportOptions {
        strategy,
        root_name,
    };
    let report = import::run(&mut store, &resolver, &mut entries, &options, |event| {
        if json {
            return;
        }
        match event {
            ImportEvent::PackageStarted { name } => println!("📁 {name}"),
            ImportEvent::AssetImported { name, group, key } => {
                if verbose > 0 {
                    println!("  ↑ {name} [{group}] -> {key}");
                }
            }
            ImportEvent::AssetMissing { name } => {
                if verbose > 0 {
                    println!("  ⚠ {name} not found in any group");
                }
            }
            ImportEvent::ProductSkipped { code } => {
                println!("  ⚠ skipping '{code}': unresolvable product code");
            }
            ImportEvent::ProductImported { code, assets } => {
                if verbose > 0 {
                    println!("  ✓ {code} ({assets} assets)");
                }
            }
        }
    })?;

    if json {
        let output = serde_json::json!({
            "event": "import",
            "strategy": strategy.to_string(),
            "entries": entries.len(),
            "imported": report.assets_materialized,
            "associations": report.associations,
            "skipped_products": report.products_skipped,
            "missing_assets": report.assets_missing,
            "elapsed_ms": report.elapsed.as_millis() as u64,
        });
        println!("{}", serde_json::to_string(&output)?);
    } else {
        println!("\n📊 Import Results:");
        println!("  ✓ Imported: {} assets", report.assets_materialized);
        println!("  ✓ Associated: {} links", report.associations);
        if report.products_skipped > 0 {
            println!(
                "  ⚠ Skipped: {} unresolvable products",
                report.products_skipped
            );
        }
        if report.assets_missing > 0 {
            println!(
                "  ⚠ Missing: {} mapped assets without files",
                report.assets_missing
            );
        }
        println!("\nElapsed time {:.2?}", report.elapsed);
    }

    Ok(())
}

fn cmd_mapping(mapping: &Path, json: bool) -> Result<()> {
    let entries = assetlink::read_mapping(mapping)?;

    if json {
        for entry in &entries {
            let output = serde_json::json!({
                "event": "mapping",
                "asset": entry.asset_name,
                "product": entry.product_code,
            });
            println!("{}", serde_json::to_string(&output)?);
        }
        return Ok(());
    }

    println!("🔍 Parsing mapping: {}\n", mapping.display());
    for entry in &entries {
        println!("  {} -> {}", entry.asset_name, entry.product_code);
    }

    let distinct_assets = distinct(entries.iter().map(|e| e.asset_name.as_str()));
    let distinct_products = distinct(entries.iter().map(|e| e.product_code.as_str()));
    println!(
        "\nSummary: {} entries, {} distinct assets, {} distinct products",
        entries.len(),
        distinct_assets,
        distinct_products
    );

    Ok(())
}

fn cmd_groups(assets: &Path, json: bool) -> Result<()> {
    let resolver = GroupResolver::discover(assets)?;

    if json {
        for group in resolver.groups() {
            let output = serde_json::json!({
                "event": "group",
                "name": group,
                "files": resolver.file_count(group)?,
            });
            println!("{}", serde_json::to_string(&output)?);
        }
        return Ok(());
    }

    println!("🔍 Asset groups under {}\n", assets.display());
    for group in resolver.groups() {
        println!("  {} ({} files)", group, resolver.file_count(group)?);
    }
    println!("\nSummary: {} groups", resolver.groups().len());

    Ok(())
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> usize {
    let mut seen: Vec<&str> = values.collect();
    seen.sort_unstable();
    seen.dedup();
    seen.len()
}
