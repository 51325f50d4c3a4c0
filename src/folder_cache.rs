//! Per-scope folder lookup cache
//!
//! Every importer funnels folder lookups through a `FolderCache` to avoid
//! asking the store for the same folder twice. Folder identity is relative
//! to a parent, so a cache instance only ever serves one parent scope;
//! entering a new scope (a new product, say) means constructing a fresh
//! cache.

use crate::error::ImportResult;
use crate::models::Folder;
use crate::repository::AssetRepository;

/// Memoizes get-or-create folder calls for a single parent scope.
///
/// Lookup is a linear scan with case-insensitive name matching. Group
/// counts stay in the single digits, and the scan preserves the
/// case-insensitive collision behavior a keyed map would hide.
#[derive(Debug, Default)]
pub struct FolderCache {
    folders: Vec<Folder>,
}

impl FolderCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached folder named `name`, or get-or-create it under
    /// `parent` and cache the result.
    pub fn get_or_create(
        &mut self,
        repo: &mut dyn AssetRepository,
        parent: &Folder,
        name: &str,
    ) -> ImportResult<Folder> {
        if let Some(folder) = self
            .folders
            .iter()
            .find(|f| f.name.eq_ignore_ascii_case(name))
        {
            return Ok(folder.clone());
        }
        let folder = repo.get_or_create_folder(parent, name)?;
        self.folders.push(folder.clone());
        Ok(folder)
    }

    pub fn len(&self) -> usize {
        self.folders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.folders.is_empty()
    }
}
