//! Error types for Assetlink
//!
//! Uses `thiserror` for library errors. Unresolvable product codes and
//! asset names with no file on disk are *not* errors - the importer skips
//! and counts them - so they have no variant here.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for Assetlink operations
pub type ImportResult<T> = Result<T, ImportError>;

/// Main error type for Assetlink operations
#[derive(Error, Debug)]
pub enum ImportError {
    /// Mapping file contains no header row
    #[error("mapping file {file} is empty - expected a header row")]
    EmptyMapping { file: PathBuf },

    /// Mapping header does not have the two required columns
    #[error("mapping file {file} header must contain at least two columns")]
    MappingHeader { file: PathBuf },

    /// A mapping row is malformed
    #[error("invalid mapping row in {file}:{line}: {message}")]
    MappingRow {
        file: PathBuf,
        line: usize,
        message: String,
    },

    /// Source directory missing
    #[error("directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    /// A name that would escape its folder
    #[error("unsafe name '{name}' - names must not contain path separators")]
    UnsafeName { name: String },

    /// A store-owned file (catalog, associations) could not be parsed
    #[error("store file {path} is invalid: {message}")]
    InvalidStoreFile { path: PathBuf, message: String },

    /// Destination already holds an asset with the same name but other content
    #[error("asset '{name}' already exists at {path} with different content")]
    AssetConflict { name: String, path: PathBuf },

    /// Another process holds the store lock
    #[error("store at {path} is locked by another process")]
    StoreLocked { path: PathBuf },

    /// Config file failed to parse
    #[error("invalid config in {file}: {message}")]
    InvalidConfig { file: PathBuf, message: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
