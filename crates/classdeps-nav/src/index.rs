//! NameIndex: primary class name → declaring file.

use classdeps_core::config::ScanConfig;
use classdeps_core::model::FileEntry;
use classdeps_parser::ReferenceScanner;
use classdeps_parser::names::resolve_declarations;
use rayon::prelude::*;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Errors from building a file list or index.
#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    #[error("project root {0} does not exist")]
    MissingRoot(PathBuf),
    #[error("project root {0} is not a directory")]
    NotADirectory(PathBuf),
    #[error("invalid exclude glob '{pattern}': {source}")]
    InvalidGlob {
        pattern: String,
        #[source]
        source: globset::Error,
    },
}

/// Which files a directory walk collects.
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// Extensions without the dot, compared case-insensitively.
    pub extensions: Vec<String>,
    /// Case-insensitive substrings of directory or file names to prune.
    pub ignore: Vec<String>,
    /// Globs relative to the walk root.
    pub exclude_globs: Vec<String>,
    pub save_full_path: bool,
}

impl ScanOptions {
    pub fn from_config(config: &ScanConfig) -> Self {
        Self {
            extensions: config.extensions.clone(),
            ignore: config.ignore.clone(),
            exclude_globs: config.exclude_globs.clone(),
            save_full_path: config.save_full_path,
        }
    }
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self::from_config(&ScanConfig::default())
    }
}

fn is_ignored(name: &str, ignore_lower: &[String]) -> bool {
    let name = name.to_lowercase();
    ignore_lower.iter().any(|pattern| name.contains(pattern.as_str()))
}

/// Walk `root` and collect `{file_name, path}` records for matching source files.
///
/// Ignored directories are pruned entirely. Results are sorted by path so
/// repeated walks produce identical indexes.
pub fn collect_files(root: &Path, options: &ScanOptions) -> Result<Vec<FileEntry>, IndexError> {
    if !root.exists() {
        return Err(IndexError::MissingRoot(root.to_path_buf()));
    }
    if !root.is_dir() {
        return Err(IndexError::NotADirectory(root.to_path_buf()));
    }

    let exclude_set = if options.exclude_globs.is_empty() {
        None
    } else {
        let mut builder = globset::GlobSetBuilder::new();
        for pattern in &options.exclude_globs {
            let glob = globset::Glob::new(pattern).map_err(|source| IndexError::InvalidGlob {
                pattern: pattern.clone(),
                source,
            })?;
            builder.add(glob);
        }
        Some(builder.build().map_err(|source| IndexError::InvalidGlob {
            pattern: options.exclude_globs.join(","),
            source,
        })?)
    };

    let ignore_lower: Vec<String> = options
        .ignore
        .iter()
        .filter(|p| !p.is_empty())
        .map(|p| p.to_lowercase())
        .collect();
    let extensions: Vec<String> = options.extensions.iter().map(|e| e.to_lowercase()).collect();

    let walker = ignore::WalkBuilder::new(root)
        .hidden(true)
        .git_ignore(true)
        .add_custom_ignore_filename(".classdepsignore")
        .sort_by_file_name(|a, b| a.cmp(b))
        .filter_entry(move |entry| {
            entry.depth() == 0 || !is_ignored(&entry.file_name().to_string_lossy(), &ignore_lower)
        })
        .build();

    let mut files = Vec::new();
    for entry in walker.flatten() {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();
        if !extensions.contains(&ext) {
            continue;
        }
        if let Some(ref exc) = exclude_set
            && exc.is_match(path.strip_prefix(root).unwrap_or(path))
        {
            continue;
        }
        let file_name = entry.file_name().to_string_lossy().to_string();
        let recorded = if options.save_full_path {
            path
        } else {
            path.strip_prefix(root).unwrap_or(path)
        };
        files.push(FileEntry {
            file_name,
            path: recorded.display().to_string(),
        });
    }
    Ok(files)
}

/// A class name together with the file that declares it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedClass {
    pub name: String,
    pub path: PathBuf,
}

/// Mapping from primary class name to the declaring file, plus the full list
/// of known files (used as fuzzy-match candidates and for interface scans).
/// Interface declarations are kept in a separate table that traversal never
/// consults.
///
/// Read-only once built, so one index can serve concurrent traversals.
#[derive(Debug, Clone, Default)]
pub struct NameIndex {
    classes: Vec<IndexedClass>,
    by_name: HashMap<String, usize>,
    interfaces: HashMap<String, PathBuf>,
    files: Vec<FileEntry>,
}

impl NameIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an index from a file list, resolving each file's primary class.
    ///
    /// Entry paths are opened as given, so relative entries resolve against
    /// the working directory. Use [`NameIndex::from_files_in`] for entries
    /// recorded relative to a project root.
    pub fn from_files(files: Vec<FileEntry>, scanner: &dyn ReferenceScanner) -> Self {
        Self::from_files_in(Path::new(""), files, scanner)
    }

    /// Build an index from a file list whose relative paths are relative to `root`.
    ///
    /// Relative entries are rewritten to `root`-joined paths, so reports and
    /// fuzzy candidates carry paths that can be opened. Names are resolved in
    /// parallel; insertion happens in list order, so the first file declaring
    /// a name keeps it.
    pub fn from_files_in(
        root: &Path,
        mut files: Vec<FileEntry>,
        scanner: &dyn ReferenceScanner,
    ) -> Self {
        for entry in &mut files {
            let path = Path::new(&entry.path);
            if path.is_relative() {
                entry.path = root.join(path).display().to_string();
            }
        }

        let declared: Vec<_> = files
            .par_iter()
            .map(|entry| resolve_declarations(scanner, Path::new(&entry.path)))
            .collect();

        let mut index = Self::new();
        for (entry, declarations) in files.iter().zip(declared) {
            let path = PathBuf::from(&entry.path);
            for interface in declarations.interfaces {
                index
                    .interfaces
                    .entry(interface)
                    .or_insert_with(|| path.clone());
            }
            if let Some(name) = declarations.class {
                index.insert(name, path);
            }
        }
        index.files = files;
        tracing::info!(
            "indexed {} classes and {} interfaces from {} files",
            index.classes.len(),
            index.interfaces.len(),
            index.files.len()
        );
        index
    }

    /// Walk a project directory and index every matching file.
    pub fn scan_dir(
        root: &Path,
        options: &ScanOptions,
        scanner: &dyn ReferenceScanner,
    ) -> Result<Self, IndexError> {
        let files = collect_files(root, options)?;
        if options.save_full_path {
            Ok(Self::from_files(files, scanner))
        } else {
            Ok(Self::from_files_in(root, files, scanner))
        }
    }

    /// Register `name` → `path`. The first registration of a name wins;
    /// later ones are logged and dropped. Returns whether the entry was added.
    pub fn insert(&mut self, name: String, path: PathBuf) -> bool {
        if let Some(&existing) = self.by_name.get(&name) {
            let kept = &self.classes[existing].path;
            if kept != &path {
                tracing::warn!(
                    "class '{}' declared in both {} and {}; keeping the first",
                    name,
                    kept.display(),
                    path.display()
                );
            }
            return false;
        }
        self.by_name.insert(name.clone(), self.classes.len());
        self.classes.push(IndexedClass { name, path });
        true
    }

    /// File declaring `name`, if known.
    pub fn lookup(&self, name: &str) -> Option<&Path> {
        self.by_name
            .get(name)
            .map(|&i| self.classes[i].path.as_path())
    }

    /// File declaring the interface `name`, if known.
    pub fn lookup_interface(&self, name: &str) -> Option<&Path> {
        self.interfaces.get(name).map(PathBuf::as_path)
    }

    /// Indexed classes in insertion order.
    pub fn classes(&self) -> &[IndexedClass] {
        &self.classes
    }

    /// Every file the index was built from, including files without a class.
    pub fn files(&self) -> &[FileEntry] {
        &self.files
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}
