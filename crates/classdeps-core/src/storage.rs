//! Read/write file indexes and operator-supplied method lists.

use crate::model::FileEntry;
use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

const CLASSDEPS_DIR: &str = ".classdeps";
const INDEX_FILE: &str = "index.json";

/// Get the path to the classdeps directory for a given project root.
pub fn classdeps_dir(project_root: &Path) -> PathBuf {
    project_root.join(CLASSDEPS_DIR)
}

/// Default location of a saved file index.
pub fn default_index_file(project_root: &Path) -> PathBuf {
    classdeps_dir(project_root).join(INDEX_FILE)
}

/// Load a file index: a JSON array of `{file_name, path}` records.
pub fn load_index(path: &Path) -> Result<Vec<FileEntry>> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("failed to read file index from {}", path.display()))?;
    serde_json::from_str(&json)
        .with_context(|| format!("failed to parse file index {}", path.display()))
}

/// Save a file index as pretty-printed JSON, creating parent directories.
pub fn save_index(path: &Path, entries: &[FileEntry]) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory {}", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(entries).context("failed to serialize file index")?;
    fs::write(path, json)
        .with_context(|| format!("failed to write file index to {}", path.display()))?;
    Ok(())
}

/// Load operator-supplied methods: a JSON object mapping file path to method names.
pub fn load_methods(path: &Path) -> Result<BTreeMap<String, Vec<String>>> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("failed to read methods from {}", path.display()))?;
    serde_json::from_str(&json)
        .with_context(|| format!("failed to parse methods file {}", path.display()))
}
