//! Core data models for Assetlink
//!
//! Defines the fundamental data structures used throughout Assetlink:
//! - `MappingEntry`: one row of the asset-to-product mapping file
//! - `Folder`: a node in the destination folder hierarchy
//! - `ImportedAsset`: the result of materializing one file in the store
//! - `CatalogEntry`: a resolved product/variant handle
//! - `Strategy`: the folder-topology choice

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// One row of the mapping file: an asset file name and the product code it
/// belongs to.
///
/// `asset_key` starts out empty and is filled in by the importer once the
/// asset has been materialized in the store, never before.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingEntry {
    /// File name of the asset, as it appears inside each group directory
    pub asset_name: String,
    /// SKU / product / variation code the asset is associated with
    pub product_code: String,
    /// Store key of the entry's first materialized variant
    pub asset_key: Option<String>,
}

impl MappingEntry {
    pub fn new(asset_name: impl Into<String>, product_code: impl Into<String>) -> Self {
        Self {
            asset_name: asset_name.into(),
            product_code: product_code.into(),
            asset_key: None,
        }
    }
}

/// Identifier of a folder in the destination store.
///
/// Stores use a stable path-like string (`"Catalogs/Small"`); the importer
/// only ever passes it back unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FolderId(pub String);

impl fmt::Display for FolderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Identifier of a materialized asset in the destination store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetId(pub String);

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A node in the destination folder hierarchy.
///
/// Identified by `(parent, name)`; name uniqueness is case-insensitive
/// within a parent. Folders are created lazily and never deleted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Folder {
    pub id: FolderId,
    /// Name as it exists in the store (original casing preserved)
    pub name: String,
}

/// The result of materializing one physical file into the store.
///
/// Held only for the duration of one import batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportedAsset {
    pub key: AssetId,
    pub group: String,
}

/// Opaque handle to a resolved product/variant record.
///
/// The importer holds it for the duration of one product scope and releases
/// it on drop, including on early skip paths.
#[derive(Debug, Clone)]
pub struct CatalogEntry {
    pub code: String,
    pub display_name: Option<String>,
}

/// Folder-topology strategy for an import run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    /// One copy per distinct `(asset, group)` pair, shared by every product
    /// that references it. Layout: `root/group/asset`.
    ByAsset,
    /// Independent copies per product, bucketed into bounded packages.
    /// Layout: `root/PackageNN/product/group/asset`.
    #[default]
    ByProduct,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::ByAsset => write!(f, "by-asset"),
            Strategy::ByProduct => write!(f, "by-product"),
        }
    }
}

/// True if `name` is a plain file/folder name that cannot escape its parent.
pub(crate) fn is_safe_name(name: &str) -> bool {
    !name.is_empty()
        && !name.contains('/')
        && !name.contains('\\')
        && name != "."
        && name != ".."
}

/// Group entry indices by a key, preserving first-encounter order of keys.
///
/// Both strategies consume the mapping grouped one way or the other; the
/// index indirection lets them write `asset_key` back into the entries.
pub fn group_in_order<F>(entries: &[MappingEntry], key: F) -> Vec<(String, Vec<usize>)>
where
    F: Fn(&MappingEntry) -> &str,
{
    let mut groups: Vec<(String, Vec<usize>)> = Vec::new();
    let mut slots: HashMap<String, usize> = HashMap::new();
    for (i, entry) in entries.iter().enumerate() {
        let k = key(entry);
        match slots.get(k) {
            Some(&slot) => groups[slot].1.push(i),
            None => {
                slots.insert(k.to_string(), groups.len());
                groups.push((k.to_string(), vec![i]));
            }
        }
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(asset: &str, product: &str) -> MappingEntry {
        MappingEntry::new(asset, product)
    }

    #[test]
    fn group_in_order_preserves_first_encounter_order() {
        let entries = vec![
            entry("b.png", "P1"),
            entry("a.png", "P2"),
            entry("b.png", "P3"),
            entry("c.png", "P1"),
        ];
        let grouped = group_in_order(&entries, |e| &e.asset_name);
        let keys: Vec<&str> = grouped.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["b.png", "a.png", "c.png"]);
        assert_eq!(grouped[0].1, vec![0, 2]);
    }

    #[test]
    fn group_in_order_by_product() {
        let entries = vec![
            entry("a.png", "P1"),
            entry("b.png", "P1"),
            entry("a.png", "P2"),
        ];
        let grouped = group_in_order(&entries, |e| &e.product_code);
        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped[0].0, "P1");
        assert_eq!(grouped[0].1, vec![0, 1]);
    }

    #[test]
    fn safe_name_rejects_traversal() {
        assert!(is_safe_name("logo.png"));
        assert!(is_safe_name("logo..png"));
        assert!(!is_safe_name(""));
        assert!(!is_safe_name(".."));
        assert!(!is_safe_name("a/b.png"));
        assert!(!is_safe_name("a\\b.png"));
    }

    #[test]
    fn strategy_default_is_by_product() {
        assert_eq!(Strategy::default(), Strategy::ByProduct);
        assert_eq!(Strategy::ByAsset.to_string(), "by-asset");
    }
}
