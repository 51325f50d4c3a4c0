//! By-asset import strategy
//!
//! Lays assets out as `root/group/asset`, importing each file exactly once
//! no matter how many products reference it. This is the most efficient
//! topology when many products share the same image, at the cost of every
//! product pointing into a shared folder tree.

use super::{associate_batch, ImportEvent, ImportReport};
use crate::error::ImportResult;
use crate::folder_cache::FolderCache;
use crate::groups::GroupResolver;
use crate::models::{group_in_order, Folder, ImportedAsset, MappingEntry};
use crate::repository::AssetRepository;

/// Imports each distinct asset once and associates it with one or more
/// products.
#[derive(Debug, Default)]
pub struct ByAssetImport {
    /// Group folders live directly under the root and are shared by the
    /// whole run, so one cache serves every asset.
    group_folders: FolderCache,
}

impl ByAssetImport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn run(
        &mut self,
        repo: &mut dyn AssetRepository,
        resolver: &GroupResolver,
        root: &Folder,
        entries: &mut [MappingEntry],
        on_event: &mut dyn FnMut(ImportEvent),
    ) -> ImportResult<ImportReport> {
        let mut report = ImportReport::default();

        for (asset_name, indices) in group_in_order(entries, |e| &e.asset_name) {
            let assets = self.import_asset_groups(repo, resolver, root, &asset_name, on_event)?;
            if assets.is_empty() {
                report.assets_missing += 1;
                on_event(ImportEvent::AssetMissing {
                    name: asset_name.clone(),
                });
                continue;
            }
            report.assets_materialized += assets.len();

            for &i in &indices {
                entries[i].asset_key = Some(assets[0].key.0.clone());
            }

            for &i in &indices {
                let code = entries[i].product_code.clone();
                match repo.resolve_catalog_entry(&code)? {
                    None => {
                        report.products_skipped += 1;
                        on_event(ImportEvent::ProductSkipped { code });
                    }
                    Some(catalog_entry) => {
                        associate_batch(repo, &catalog_entry, &assets)?;
                        report.associations += assets.len();
                        on_event(ImportEvent::ProductImported {
                            code,
                            assets: assets.len(),
                        });
                        // catalog_entry released here
                    }
                }
            }
        }

        Ok(report)
    }

    /// Import one asset into every group that holds a file for it.
    ///
    /// An asset missing from some groups is imported for the groups that
    /// do have it; the caller sees exactly that subset.
    fn import_asset_groups(
        &mut self,
        repo: &mut dyn AssetRepository,
        resolver: &GroupResolver,
        root: &Folder,
        asset_name: &str,
        on_event: &mut dyn FnMut(ImportEvent),
    ) -> ImportResult<Vec<ImportedAsset>> {
        let mut assets = Vec::new();
        for group in resolver.resolve(asset_name)? {
            let folder = self.group_folders.get_or_create(repo, root, group)?;
            let key =
                repo.get_or_create_asset(&folder, asset_name, &resolver.asset_path(group, asset_name))?;
            on_event(ImportEvent::AssetImported {
                name: asset_name.to_string(),
                group: group.to_string(),
                key: key.0.clone(),
            });
            assets.push(ImportedAsset {
                key,
                group: group.to_string(),
            });
        }
        Ok(assets)
    }
}
