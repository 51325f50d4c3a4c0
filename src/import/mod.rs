//! Import orchestration
//!
//! Dispatches the grouped mapping entries to the selected folder-topology
//! strategy, threads progress events out to the caller, and reports
//! counters plus elapsed wall time for the run.

pub mod by_asset;
pub mod by_product;

pub use by_asset::ByAssetImport;
pub use by_product::{ByProductImport, MAX_ITEMS_PER_PACKAGE};

use std::time::{Duration, Instant};

use crate::error::ImportResult;
use crate::groups::GroupResolver;
use crate::models::{CatalogEntry, ImportedAsset, MappingEntry, Strategy};
use crate::repository::AssetRepository;

/// Options for one import run
#[derive(Debug, Clone)]
pub struct ImportOptions {
    pub strategy: Strategy,
    /// Name of the destination root folder
    pub root_name: String,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            strategy: Strategy::default(),
            root_name: crate::config::DEFAULT_ROOT_FOLDER.to_string(),
        }
    }
}

/// Counters accumulated over one import run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportReport {
    /// Assets materialized in the store (one per asset/group pair)
    pub assets_materialized: usize,
    /// Association records written
    pub associations: usize,
    /// Product codes that did not resolve and were skipped
    pub products_skipped: usize,
    /// Mapping names with no file in any group
    pub assets_missing: usize,
    /// Wall time for the whole run
    pub elapsed: Duration,
}

/// Progress events emitted while an import runs
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportEvent {
    /// An asset was materialized (or found already present)
    AssetImported {
        name: String,
        group: String,
        key: String,
    },
    /// A mapping name had no file in any group
    AssetMissing { name: String },
    /// A product code did not resolve; its entries were skipped
    ProductSkipped { code: String },
    /// A product's asset batch was associated
    ProductImported { code: String, assets: usize },
    /// A new package folder was entered (by-product only)
    PackageStarted { name: String },
}

/// Run a full import: get-or-create the destination root, dispatch to the
/// selected strategy, and time the run.
///
/// `entries` is mutated in place: each entry's `asset_key` is recorded as
/// its asset is materialized.
pub fn run(
    repo: &mut dyn AssetRepository,
    resolver: &GroupResolver,
    entries: &mut [MappingEntry],
    options: &ImportOptions,
    mut on_event: impl FnMut(ImportEvent),
) -> ImportResult<ImportReport> {
    let started = Instant::now();
    let root = repo.root_folder(&options.root_name)?;

    let mut report = match options.strategy {
        Strategy::ByAsset => {
            ByAssetImport::new().run(repo, resolver, &root, entries, &mut on_event)?
        }
        Strategy::ByProduct => {
            ByProductImport::new().run(repo, resolver, &root, entries, &mut on_event)?
        }
    };

    report.elapsed = started.elapsed();
    Ok(report)
}

/// Attach every asset in the batch to `entry`, tagged with its group.
fn associate_batch(
    repo: &mut dyn AssetRepository,
    entry: &CatalogEntry,
    assets: &[ImportedAsset],
) -> ImportResult<()> {
    for asset in assets {
        repo.associate(entry, &asset.key, &asset.group)?;
    }
    Ok(())
}
