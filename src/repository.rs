//! AssetRepository port - abstraction over the destination content store
//!
//! The import engine never talks to a concrete store directly; it only sees
//! this trait. `store::LocalStore` is the directory-backed implementation,
//! and the in-memory double below backs the unit tests.

use std::path::Path;

use crate::error::ImportResult;
use crate::models::{AssetId, CatalogEntry, Folder};

/// Abstract destination store for folders, assets and associations.
///
/// All get-or-create operations are idempotent: looking up something that
/// already exists never creates a duplicate. Folder name matching is
/// case-insensitive within a parent.
pub trait AssetRepository {
    /// Get or create a top-level folder in the store
    fn root_folder(&mut self, name: &str) -> ImportResult<Folder>;

    /// Get or create a folder named `name` under `parent`
    fn get_or_create_folder(&mut self, parent: &Folder, name: &str) -> ImportResult<Folder>;

    /// Materialize `source` as an asset called `name` inside `folder` and
    /// return its key. Re-materializing identical content is a no-op;
    /// conflicting content is an error.
    fn get_or_create_asset(
        &mut self,
        folder: &Folder,
        name: &str,
        source: &Path,
    ) -> ImportResult<AssetId>;

    /// Resolve a product code. `None` means the code is unknown or not
    /// importable; the caller skips it.
    fn resolve_catalog_entry(&mut self, code: &str) -> ImportResult<Option<CatalogEntry>>;

    /// Record the association `(entry, asset, group)`. Last write wins on
    /// the same key, so re-running an import never duplicates links.
    fn associate(&mut self, entry: &CatalogEntry, asset: &AssetId, group: &str)
        -> ImportResult<()>;
}
