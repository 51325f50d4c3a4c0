//! Store configuration
//!
//! An optional `assetlink.toml` at the store root sets defaults for the
//! import command; CLI flags always win over config values.
//!
//! ```toml
//! [import]
//! root = "Catalogs"
//! strategy = "by-product"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ImportError, ImportResult};
use crate::models::Strategy;

const CONFIG_FILE: &str = "assetlink.toml";

/// Default name of the destination root folder
pub const DEFAULT_ROOT_FOLDER: &str = "Catalogs";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub import: ImportConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportConfig {
    /// Name of the destination root folder
    #[serde(default = "default_root")]
    pub root: String,

    /// Default folder-topology strategy
    #[serde(default)]
    pub strategy: Strategy,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            strategy: Strategy::default(),
        }
    }
}

fn default_root() -> String {
    DEFAULT_ROOT_FOLDER.to_string()
}

/// A non-fatal finding while loading config (unknown key, most likely a typo)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    pub key: String,
    pub file: PathBuf,
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> ImportResult<Self> {
        let (config, _warnings) = Self::load_with_warnings(path)?;
        Ok(config)
    }

    /// Load configuration and collect non-fatal warnings (e.g. unknown keys).
    pub fn load_with_warnings(path: &Path) -> ImportResult<(Self, Vec<ConfigWarning>)> {
        let content = fs::read_to_string(path)?;

        let mut unknown_paths: Vec<String> = Vec::new();
        let deserializer = toml::de::Deserializer::new(&content);

        let config: Self = serde_ignored::deserialize(deserializer, |path| {
            unknown_paths.push(path.to_string());
        })
        .map_err(|e| ImportError::InvalidConfig {
            file: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let warnings = unknown_paths
            .into_iter()
            .map(|key| ConfigWarning {
                key,
                file: path.to_path_buf(),
            })
            .collect();

        Ok((config, warnings))
    }

    /// Load `<store>/assetlink.toml` if present, defaults otherwise.
    ///
    /// A missing file is normal; a file that fails to parse is a fatal
    /// configuration error.
    pub fn load_or_default(store_root: &Path) -> ImportResult<(Self, Vec<ConfigWarning>)> {
        let path = store_root.join(CONFIG_FILE);
        if !path.exists() {
            return Ok((Self::default(), Vec::new()));
        }
        Self::load_with_warnings(&path)
    }
}
