//! Assetlink - bulk asset importer and catalog association tool
//!
//! Assetlink reads a tabular mapping of asset file names to product codes,
//! imports the referenced files from a grouped source directory into a
//! content store, and records an association between every imported asset
//! and the catalog entry it belongs to.

pub mod config;
pub mod error;
pub mod folder_cache;
pub mod groups;
pub mod import;
pub mod mapping;
pub mod models;
pub mod repository;
pub mod store;

// Re-exports for convenience
pub use config::{Config, ConfigWarning};
pub use error::{ImportError, ImportResult};
pub use folder_cache::FolderCache;
pub use groups::GroupResolver;
pub use import::{ImportEvent, ImportOptions, ImportReport};
pub use mapping::{parse_mapping, read_mapping};
pub use models::{AssetId, CatalogEntry, Folder, FolderId, ImportedAsset, MappingEntry, Strategy};
pub use repository::AssetRepository;
pub use store::{AssociationRecord, CatalogRecord, LocalStore};
