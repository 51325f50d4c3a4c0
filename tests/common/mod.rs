//! Common test utilities for Assetlink integration tests.
//!
//! Provides `TestEnv`: an isolated environment with temp directories for
//! the asset source and the content store, plus helpers to run the
//! assetlink CLI and inspect the resulting store.

// Not every test binary uses every helper.
#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};

use tempfile::TempDir;

/// Result of running an assetlink CLI command
#[derive(Debug)]
pub struct TestResult {
    pub success: bool,
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl TestResult {
    /// Combine stdout and stderr
    pub fn combined_output(&self) -> String {
        format!("{}\n{}", self.stdout, self.stderr)
    }
}

/// Isolated test environment with temp directories.
pub struct TestEnv {
    root: TempDir,
    bin: PathBuf,
}

impl TestEnv {
    pub fn new() -> Self {
        let root = TempDir::new().expect("create temp dir");
        fs::create_dir(root.path().join("assets")).unwrap();
        fs::create_dir(root.path().join("store")).unwrap();
        Self {
            root,
            bin: PathBuf::from(env!("CARGO_BIN_EXE_assetlink")),
        }
    }

    pub fn assets_path(&self) -> PathBuf {
        self.root.path().join("assets")
    }

    pub fn store_path(&self) -> PathBuf {
        self.root.path().join("store")
    }

    pub fn mapping_path(&self) -> PathBuf {
        self.root.path().join("mapping.csv")
    }

    /// Write the mapping file
    pub fn write_mapping(&self, content: &str) {
        fs::write(self.mapping_path(), content).unwrap();
    }

    /// Create an asset file inside a group directory
    pub fn write_asset(&self, group: &str, name: &str, content: &str) {
        let dir = self.assets_path().join(group);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(name), content).unwrap();
    }

    /// Create an empty group directory
    pub fn create_group(&self, group: &str) {
        fs::create_dir_all(self.assets_path().join(group)).unwrap();
    }

    /// Write `catalog.json` with the given resolvable product codes
    pub fn write_catalog(&self, codes: &[&str]) {
        let mut map = serde_json::Map::new();
        for code in codes {
            map.insert(
                code.to_string(),
                serde_json::json!({ "active": true }),
            );
        }
        fs::write(
            self.store_path().join("catalog.json"),
            serde_json::to_string_pretty(&map).unwrap(),
        )
        .unwrap();
    }

    /// Write raw `catalog.json` content
    pub fn write_catalog_raw(&self, content: &str) {
        fs::write(self.store_path().join("catalog.json"), content).unwrap();
    }

    /// Write `<store>/assetlink.toml`
    pub fn write_config(&self, content: &str) {
        fs::write(self.store_path().join("assetlink.toml"), content).unwrap();
    }

    /// Path of a materialized asset or folder inside the store
    pub fn store_file(&self, relative: &str) -> PathBuf {
        self.store_path().join(relative)
    }

    /// Parsed `associations.json`, empty if the file does not exist
    pub fn read_associations(&self) -> Vec<serde_json::Value> {
        let path = self.store_path().join("associations.json");
        if !path.exists() {
            return Vec::new();
        }
        serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
    }

    /// Run the import command with the default store and extra args
    pub fn run_import(&self, extra: &[&str]) -> TestResult {
        let mapping = self.mapping_path();
        let assets = self.assets_path();
        let store = self.store_path();
        let mut args: Vec<&str> = vec![
            "import",
            mapping.to_str().unwrap(),
            assets.to_str().unwrap(),
            "--store",
            store.to_str().unwrap(),
        ];
        args.extend_from_slice(extra);
        self.run(&args)
    }

    /// Run assetlink with the given arguments
    pub fn run(&self, args: &[&str]) -> TestResult {
        let output = Command::new(&self.bin)
            .current_dir(self.root.path())
            .args(args)
            .output()
            .expect("failed to execute assetlink");
        self.output_to_result(output)
    }

    fn output_to_result(&self, output: Output) -> TestResult {
        TestResult {
            success: output.status.success(),
            exit_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        }
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}
