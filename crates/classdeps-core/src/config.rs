//! Configuration for scanning, tree building and fuzzy matching.
//!
//! Load order: `.classdeps/config.toml` → environment variables → defaults.

use crate::report::ReportShape;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Architectural vocabulary stripped from names before fuzzy matching.
pub const DEFAULT_STOP_WORDS: &[&str] = &[
    "controller",
    "model",
    "view",
    "api",
    "service",
    "resource",
    "event",
    "handler",
    "listener",
    "microservice",
    "gateway",
    "proxy",
    "repository",
    "entity",
    "dto",
    "dao",
    "aggregate",
    "valueobject",
    "factory",
    "specification",
    "test",
    "spec",
    "mock",
    "stub",
    "fixture",
    "component",
    "directive",
    "module",
    "widget",
    "middleware",
    "interceptor",
    "adapter",
    "logger",
    "monitor",
    "metrics",
    "auth",
    "authorization",
    "authentication",
    "token",
    "config",
    "settings",
    "env",
    "deployment",
    "schema",
    "migration",
    "seeder",
    "index",
    "layout",
    "template",
    "style",
    "theme",
    "helper",
    "util",
    "common",
    "base",
    "core",
];

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassDepsConfig {
    pub scan: ScanConfig,
    pub tree: TreeConfig,
    pub matching: MatchingConfig,
}

/// Which files make up the project.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Source file extensions, without the dot.
    pub extensions: Vec<String>,
    /// Case-insensitive substrings; a matching directory is pruned with everything below it.
    pub ignore: Vec<String>,
    /// Globs relative to the project root excluded from the index.
    pub exclude_globs: Vec<String>,
    /// Record full paths in the file index (false records paths relative to the project root).
    pub save_full_path: bool,
}

/// Where fuzzy supplementary matching runs during traversal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FuzzyScope {
    Off,
    /// Only the root file's name is matched against the index.
    #[default]
    Root,
    /// Every expanded file's name is matched.
    All,
}

impl std::str::FromStr for FuzzyScope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "off" => Ok(Self::Off),
            "root" => Ok(Self::Root),
            "all" => Ok(Self::All),
            other => Err(format!(
                "unknown fuzzy scope '{}' (expected off, root or all)",
                other
            )),
        }
    }
}

/// Dependency tree construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeConfig {
    /// Maximum recursion depth; the root is depth 0.
    pub max_depth: usize,
    /// Naming-convention keywords; when non-empty they replace the suffix rule.
    pub keywords: Vec<String>,
    /// File-name suffixes accepted when no keywords are selected.
    pub suffixes: Vec<String>,
    pub fuzzy: FuzzyScope,
    /// Recurse into implementations behind interface-typed references.
    pub expand_interfaces: bool,
    pub shape: ReportShape,
}

/// Fuzzy name matching.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchingConfig {
    /// Minimum token-set similarity (0–100).
    pub threshold: f64,
    /// Maximum number of matches returned.
    pub limit: usize,
    pub stop_words: Vec<String>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            extensions: vec!["cs".to_string()],
            ignore: Vec::new(),
            exclude_globs: Vec::new(),
            save_full_path: true,
        }
    }
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            max_depth: 2,
            keywords: Vec::new(),
            suffixes: vec![
                "Business.cs".to_string(),
                "Service.cs".to_string(),
                "Repository.cs".to_string(),
            ],
            fuzzy: FuzzyScope::Root,
            expand_interfaces: false,
            shape: ReportShape::Tree,
        }
    }
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            threshold: 60.0,
            limit: 10,
            stop_words: DEFAULT_STOP_WORDS.iter().map(|w| w.to_string()).collect(),
        }
    }
}

/// Helper to parse an env var and apply it to a config field.
fn env_override<T: std::str::FromStr>(var: &str, target: &mut T) {
    if let Ok(v) = std::env::var(var)
        && let Ok(n) = v.parse()
    {
        *target = n;
    }
}

impl ClassDepsConfig {
    /// Load config from `.classdeps/config.toml` in the project root, with env var overrides.
    /// Falls back to defaults if no config file exists.
    pub fn load(project_root: &Path) -> Result<Self> {
        let config_path = project_root.join(".classdeps").join("config.toml");

        let mut config = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            toml::from_str(&content)?
        } else {
            Self::default()
        };

        // Extensions are matched without the leading dot, case-insensitively.
        config.scan.extensions = std::mem::take(&mut config.scan.extensions)
            .into_iter()
            .map(|e| e.trim_start_matches('.').to_lowercase())
            .collect();

        env_override("CLASSDEPS_MAX_DEPTH", &mut config.tree.max_depth);
        env_override("CLASSDEPS_FUZZY_THRESHOLD", &mut config.matching.threshold);
        env_override("CLASSDEPS_FUZZY_LIMIT", &mut config.matching.limit);

        config.validate()?;
        Ok(config)
    }

    /// Reject settings no traversal can work with.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=100.0).contains(&self.matching.threshold) {
            anyhow::bail!(
                "matching.threshold ({}) must be between 0 and 100",
                self.matching.threshold
            );
        }
        if self.scan.extensions.is_empty() {
            anyhow::bail!("scan.extensions must list at least one extension");
        }
        Ok(())
    }
}
