//! By-product import strategy
//!
//! Lays assets out as `root/PackageNN/product/group/asset`, giving every
//! product its own copies. Use this when each product has a unique set of
//! assets, especially a large one. Package folders bucket the products so
//! no single folder exceeds the store's per-folder entry limits.

use super::{associate_batch, ImportEvent, ImportReport};
use crate::error::ImportResult;
use crate::folder_cache::FolderCache;
use crate::groups::GroupResolver;
use crate::models::{group_in_order, Folder, ImportedAsset, MappingEntry};
use crate::repository::AssetRepository;

/// Products per package folder
pub const MAX_ITEMS_PER_PACKAGE: usize = 500;

/// Imports every product's assets into an isolated folder subtree.
#[derive(Debug, Default)]
pub struct ByProductImport {
    /// Products attempted so far, skipped ones included. Package rollover
    /// is computed from this counter, so a skipped product still advances
    /// the folder boundaries.
    product_count: usize,
    package: Option<Folder>,
    package_name: String,
}

impl ByProductImport {
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

        for (code, indices) in group_in_order(entries, |e| &e.product_code) {
            match repo.resolve_catalog_entry(&code)? {
                None => {
                    report.products_skipped += 1;
                    on_event(ImportEvent::ProductSkipped { code: code.clone() });
                }
                Some(catalog_entry) => {
                    let assets = self.import_product(
                        repo,
                        resolver,
                        root,
                        &code,
                        &indices,
                        entries,
                        &mut report,
                        on_event,
                    )?;
                    associate_batch(repo, &catalog_entry, &assets)?;
                    report.associations += assets.len();
                    on_event(ImportEvent::ProductImported {
                        code: code.clone(),
                        assets: assets.len(),
                    });
                    // catalog_entry released here
                }
            }
            self.product_count += 1;
        }

        Ok(report)
    }

    /// Materialize every asset of one product under its own folder.
    ///
    /// The product folder and its group folders are created lazily: a
    /// product whose assets are all missing from disk leaves no folder
    /// structure behind.
    #[allow(clippy::too_many_arguments)]
    fn import_product(
        &mut self,
        repo: &mut dyn AssetRepository,
        resolver: &GroupResolver,
        root: &Folder,
        code: &str,
        indices: &[usize],
        entries: &mut [MappingEntry],
        report: &mut ImportReport,
        on_event: &mut dyn FnMut(ImportEvent),
    ) -> ImportResult<Vec<ImportedAsset>> {
        // Folder identity is relative to the product, so the group cache
        // starts empty for every product.
        let mut group_folders = FolderCache::new();
        let mut product_folder: Option<Folder> = None;
        let mut assets = Vec::new();

        for &i in indices {
            let asset_name = entries[i].asset_name.clone();
            let groups = resolver.resolve(&asset_name)?;
            if groups.is_empty() {
                report.assets_missing += 1;
                on_event(ImportEvent::AssetMissing {
                    name: asset_name.clone(),
                });
                continue;
            }

            for group in groups {
                let parent = match product_folder.clone() {
                    Some(folder) => folder,
                    None => {
                        let folder = self.product_folder(repo, root, code, on_event)?;
                        product_folder = Some(folder.clone());
                        folder
                    }
                };
                let folder = group_folders.get_or_create(repo, &parent, group)?;
                let key = repo.get_or_create_asset(
                    &folder,
                    &asset_name,
                    &resolver.asset_path(group, &asset_name),
                )?;
                report.assets_materialized += 1;
                on_event(ImportEvent::AssetImported {
                    name: asset_name.clone(),
                    group: group.to_string(),
                    key: key.0.clone(),
                });
                if entries[i].asset_key.is_none() {
                    entries[i].asset_key = Some(key.0.clone());
                }
                assets.push(ImportedAsset {
                    key,
                    group: group.to_string(),
                });
            }
        }

        Ok(assets)
    }

    fn product_folder(
        &mut self,
        repo: &mut dyn AssetRepository,
        root: &Folder,
        code: &str,
        on_event: &mut dyn FnMut(ImportEvent),
    ) -> ImportResult<Folder> {
        let package = self.package_folder(repo, root, on_event)?;
        repo.get_or_create_folder(&package, code)
    }

    /// The package folder for the current counter value, created lazily
    /// and cached until the counter crosses a package boundary.
    fn package_folder(
        &mut self,
        repo: &mut dyn AssetRepository,
        root: &Folder,
        on_event: &mut dyn FnMut(ImportEvent),
    ) -> ImportResult<Folder> {
        let name = format!("Package{:02}", self.product_count / MAX_ITEMS_PER_PACKAGE);
        match &self.package {
            Some(folder) if self.package_name == name => Ok(folder.clone()),
            _ => {
                let folder = repo.get_or_create_folder(root, &name)?;
                on_event(ImportEvent::PackageStarted { name: name.clone() });
                self.package_name = name;
                self.package = Some(folder.clone());
                Ok(folder)
            }
        }
    }
}
