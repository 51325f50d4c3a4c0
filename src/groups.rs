//! Asset group discovery
//!
//! The source asset directory has one subdirectory per asset group (image
//! sizes, usually: `Small`, `Medium`, `Large`). Groups are discovered from
//! disk, never configured - any top-level subdirectory is a valid group.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{ImportError, ImportResult};
use crate::models::is_safe_name;

/// Resolves which asset groups actually hold a file for a given asset name.
#[derive(Debug, Clone)]
pub struct GroupResolver {
    source_root: PathBuf,
    groups: Vec<String>,
}

impl GroupResolver {
    /// Discover the candidate groups under `source_root`.
    ///
    /// Groups are sorted lexicographically so every run resolves assets in
    /// the same order.
    pub fn discover(source_root: impl Into<PathBuf>) -> ImportResult<Self> {
        let source_root = source_root.into();
        if !source_root.is_dir() {
            return Err(ImportError::DirectoryNotFound { path: source_root });
        }

        let mut groups = Vec::new();
        for entry in fs::read_dir(&source_root)? {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                groups.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        groups.sort();

        Ok(Self {
            source_root,
            groups,
        })
    }

    /// All discovered group names, sorted
    pub fn groups(&self) -> &[String] {
        &self.groups
    }

    /// The groups in which a file named `asset_name` exists.
    ///
    /// An asset present in only a subset of groups yields exactly that
    /// subset; an asset absent everywhere yields an empty list, which the
    /// caller treats as "nothing to import for this name".
    pub fn resolve(&self, asset_name: &str) -> ImportResult<Vec<&str>> {
        if !is_safe_name(asset_name) {
            return Err(ImportError::UnsafeName {
                name: asset_name.to_string(),
            });
        }
        Ok(self
            .groups
            .iter()
            .filter(|g| self.asset_path(g, asset_name).is_file())
            .map(String::as_str)
            .collect())
    }

    /// Full path of an asset inside a group directory
    pub fn asset_path(&self, group: &str, asset_name: &str) -> PathBuf {
        self.source_root.join(group).join(asset_name)
    }

    /// Number of files directly inside a group directory
    pub fn file_count(&self, group: &str) -> ImportResult<usize> {
        let mut count = 0;
        for entry in fs::read_dir(self.source_root.join(group))? {
            if entry?.file_type()?.is_file() {
                count += 1;
            }
        }
        Ok(count)
    }
}
