//! Directory-backed content store
//!
//! `LocalStore` implements `AssetRepository` against a plain directory:
//!
//! ```text
//! <store>/
//!   catalog.json         product code -> record, consulted for resolution
//!   associations.json    every recorded asset-to-product link
//!   <Root>/...           the destination folder tree
//! ```
//!
//! Folder and asset identity is the relative path from the store root.
//! Folder name matching is case-insensitive: asking for `Small` when
//! `small/` exists reuses the existing directory and preserves its on-disk
//! name. Asset materialization copies the source file; an existing
//! destination with identical content is reused, differing content is a
//! conflict and aborts the run.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::{ImportError, ImportResult};
use crate::models::{is_safe_name, AssetId, CatalogEntry, Folder, FolderId};
use crate::repository::AssetRepository;

const CATALOG_FILE: &str = "catalog.json";
const ASSOCIATIONS_FILE: &str = "associations.json";
const LOCK_FILE: &str = ".assetlink.lock";

/// One product record from `catalog.json`.
///
/// A missing code and an `active = false` record are the same outcome for
/// the importer: the code does not resolve.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogRecord {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

/// One persisted asset-to-product link.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssociationRecord {
    pub product_code: String,
    pub asset_key: AssetId,
    pub group: String,
    pub imported_at: DateTime<Utc>,
}

/// A content store rooted at a local directory.
///
/// Holds an exclusive lock file for its lifetime; a second process opening
/// the same store fails fast instead of interleaving writes.
#[derive(Debug)]
pub struct LocalStore {
    root: PathBuf,
    materialize: bool,
    catalog: BTreeMap<String, CatalogRecord>,
    associations: BTreeMap<(String, String, String), AssociationRecord>,
    _lock: File,
}

impl LocalStore {
    /// Open (creating if needed) the store at `root`.
    pub fn open(root: &Path) -> ImportResult<Self> {
        Self::open_with(root, true)
    }

    /// Open the store in mapping-only mode: folder structure and
    /// associations are recorded, but no file bytes are copied.
    pub fn open_mapping_only(root: &Path) -> ImportResult<Self> {
        Self::open_with(root, false)
    }

    fn open_with(root: &Path, materialize: bool) -> ImportResult<Self> {
        fs::create_dir_all(root)?;
        let lock = File::create(root.join(LOCK_FILE))?;
        lock.try_lock_exclusive()
            .map_err(|_| ImportError::StoreLocked {
                path: root.to_path_buf(),
            })?;

        let catalog = Self::load_catalog(root)?;
        let associations = Self::load_associations(root)?;

        Ok(Self {
            root: root.to_path_buf(),
            materialize,
            catalog,
            associations,
            _lock: lock,
        })
    }

    /// Number of product records loaded from `catalog.json`
    pub fn catalog_size(&self) -> usize {
        self.catalog.len()
    }

    /// Number of recorded associations
    pub fn association_count(&self) -> usize {
        self.associations.len()
    }

    /// All recorded associations, ordered by (product, asset, group)
    pub fn associations(&self) -> impl Iterator<Item = &AssociationRecord> {
        self.associations.values()
    }

    fn load_catalog(root: &Path) -> ImportResult<BTreeMap<String, CatalogRecord>> {
        let path = root.join(CATALOG_FILE);
        if !path.exists() {
            return Ok(BTreeMap::new());
        }
        let content = fs::read_to_string(&path)?;
        serde_json::from_str(&content).map_err(|e| ImportError::InvalidStoreFile {
            path,
            message: e.to_string(),
        })
    }

    fn load_associations(
        root: &Path,
    ) -> ImportResult<BTreeMap<(String, String, String), AssociationRecord>> {
        let path = root.join(ASSOCIATIONS_FILE);
        if !path.exists() {
            return Ok(BTreeMap::new());
        }
        let content = fs::read_to_string(&path)?;
        let records: Vec<AssociationRecord> =
            serde_json::from_str(&content).map_err(|e| ImportError::InvalidStoreFile {
                path,
                message: e.to_string(),
            })?;
        Ok(records
            .into_iter()
            .map(|r| {
                (
                    (r.product_code.clone(), r.asset_key.0.clone(), r.group.clone()),
                    r,
                )
            })
            .collect())
    }

    /// Rewrite `associations.json` atomically (write-then-rename).
    fn save_associations(&self) -> ImportResult<()> {
        let records: Vec<&AssociationRecord> = self.associations.values().collect();
        let json = serde_json::to_string_pretty(&records)?;

        let mut tmp = tempfile::NamedTempFile::new_in(&self.root)?;
        tmp.write_all(json.as_bytes())?;
        tmp.persist(self.root.join(ASSOCIATIONS_FILE))
            .map_err(|e| ImportError::Io(e.error))?;
        Ok(())
    }

    fn folder_path(&self, id: &FolderId) -> PathBuf {
        self.root.join(&id.0)
    }

    /// Case-insensitive lookup of a child entry's on-disk name.
    fn find_entry_ci(dir: &Path, name: &str, want_dir: bool) -> ImportResult<Option<String>> {
        if !dir.exists() {
            return Ok(None);
        }
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            let file_name = entry.file_name().to_string_lossy().into_owned();
            if file_name.eq_ignore_ascii_case(name) && entry.file_type()?.is_dir() == want_dir {
                return Ok(Some(file_name));
            }
        }
        Ok(None)
    }

    fn hash_file(path: &Path) -> ImportResult<String> {
        let bytes = fs::read(path)?;
        let mut hasher = Sha256::new();
        hasher.update(&bytes);
        Ok(format!("{:x}", hasher.finalize()))
    }

    fn checked_name(name: &str) -> ImportResult<&str> {
        if !is_safe_name(name) {
            return Err(ImportError::UnsafeName {
                name: name.to_string(),
            });
        }
        Ok(name)
    }
}

impl AssetRepository for LocalStore {
    fn root_folder(&mut self, name: &str) -> ImportResult<Folder> {
        let name = Self::checked_name(name)?;
        match Self::find_entry_ci(&self.root, name, true)? {
            Some(actual) => Ok(Folder {
                id: FolderId(actual.clone()),
                name: actual,
            }),
            None => {
                fs::create_dir_all(self.root.join(name))?;
                Ok(Folder {
                    id: FolderId(name.to_string()),
                    name: name.to_string(),
                })
            }
        }
    }

    fn get_or_create_folder(&mut self, parent: &Folder, name: &str) -> ImportResult<Folder> {
        let name = Self::checked_name(name)?;
        let dir = self.folder_path(&parent.id);
        match Self::find_entry_ci(&dir, name, true)? {
            Some(actual) => Ok(Folder {
                id: FolderId(format!("{}/{}", parent.id.0, actual)),
                name: actual,
            }),
            None => {
                fs::create_dir_all(dir.join(name))?;
                Ok(Folder {
                    id: FolderId(format!("{}/{}", parent.id.0, name)),
                    name: name.to_string(),
                })
            }
        }
    }

    fn get_or_create_asset(
        &mut self,
        folder: &Folder,
        name: &str,
        source: &Path,
    ) -> ImportResult<AssetId> {
        let name = Self::checked_name(name)?;
        let dir = self.folder_path(&folder.id);
        match Self::find_entry_ci(&dir, name, false)? {
            Some(actual) => {
                let dest = dir.join(&actual);
                if self.materialize && Self::hash_file(source)? != Self::hash_file(&dest)? {
                    return Err(ImportError::AssetConflict {
                        name: name.to_string(),
                        path: dest,
                    });
                }
                Ok(AssetId(format!("{}/{}", folder.id.0, actual)))
            }
            None => {
                if self.materialize {
                    fs::create_dir_all(&dir)?;
                    fs::copy(source, dir.join(name))?;
                }
                Ok(AssetId(format!("{}/{}", folder.id.0, name)))
            }
        }
    }

    fn resolve_catalog_entry(&mut self, code: &str) -> ImportResult<Option<CatalogEntry>> {
        Ok(self
            .catalog
            .get(code)
            .filter(|record| record.active)
            .map(|record| CatalogEntry {
                code: code.to_string(),
                display_name: record.name.clone(),
            }))
    }

    fn associate(
        &mut self,
        entry: &CatalogEntry,
        asset: &AssetId,
        group: &str,
    ) -> ImportResult<()> {
        let record = AssociationRecord {
            product_code: entry.code.clone(),
            asset_key: asset.clone(),
            group: group.to_string(),
            imported_at: Utc::now(),
        };
        self.associations.insert(
            (entry.code.clone(), asset.0.clone(), group.to_string()),
            record,
        );
        self.save_associations()
    }
}
