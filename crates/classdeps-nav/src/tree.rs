//! Dependency tree construction: depth-first expansion from a root file.
//!
//! Every traversal owns its [`Traversal`] state, so one [`TreeBuilder`] (and
//! the read-only [`NameIndex`] behind it) can serve many traversals at once.

use crate::fuzzy::NameMatcher;
use crate::index::NameIndex;
use crate::interfaces::implementors_of;
use crate::predicate::DependencyFilter;
use classdeps_core::config::{FuzzyScope, TreeConfig};
use classdeps_core::model::{DependencyNode, ReferenceKind};
use classdeps_core::source::read_source;
use classdeps_parser::ReferenceScanner;
use rayon::prelude::*;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Knobs for one tree build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeOptions {
    /// The root is depth 0; nodes deeper than this are not expanded.
    pub max_depth: usize,
    pub fuzzy: FuzzyScope,
    pub expand_interfaces: bool,
}

impl TreeOptions {
    pub fn from_config(config: &TreeConfig) -> Self {
        Self {
            max_depth: config.max_depth,
            fuzzy: config.fuzzy,
            expand_interfaces: config.expand_interfaces,
        }
    }
}

impl Default for TreeOptions {
    fn default() -> Self {
        Self::from_config(&TreeConfig::default())
    }
}

/// State of a single traversal: the files already expanded.
#[derive(Debug, Default)]
pub struct Traversal {
    visited: HashSet<PathBuf>,
}

impl Traversal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `path`; returns false if it was already visited.
    fn mark(&mut self, path: &Path) -> bool {
        let key = std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
        self.visited.insert(key)
    }

    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }
}

/// Builds [`DependencyNode`] trees over a [`NameIndex`].
pub struct TreeBuilder<'a> {
    index: &'a NameIndex,
    scanner: &'a dyn ReferenceScanner,
    filter: &'a dyn DependencyFilter,
    matcher: Option<&'a NameMatcher>,
    options: TreeOptions,
}

impl<'a> TreeBuilder<'a> {
    pub fn new(
        index: &'a NameIndex,
        scanner: &'a dyn ReferenceScanner,
        filter: &'a dyn DependencyFilter,
        options: TreeOptions,
    ) -> Self {
        Self {
            index,
            scanner,
            filter,
            matcher: None,
            options,
        }
    }

    /// Enable fuzzy supplementary matching (subject to `options.fuzzy`).
    #[must_use]
    pub fn with_matcher(mut self, matcher: &'a NameMatcher) -> Self {
        self.matcher = Some(matcher);
        self
    }

    pub fn index(&self) -> &'a NameIndex {
        self.index
    }

    pub fn scanner(&self) -> &'a dyn ReferenceScanner {
        self.scanner
    }

    /// Build the tree rooted at `root` with a fresh traversal.
    ///
    /// Returns `None` when the root is unreadable or declares no class.
    pub fn build(&self, root: &Path) -> Option<DependencyNode> {
        let mut traversal = Traversal::new();
        self.visit(root, 0, &mut traversal)
    }

    /// Build independent trees for several roots in parallel.
    pub fn build_many(&self, roots: &[PathBuf]) -> Vec<Option<DependencyNode>> {
        roots.par_iter().map(|root| self.build(root)).collect()
    }

    /// Expand `path` at `depth`, recording visited files in `traversal`.
    pub fn visit(
        &self,
        path: &Path,
        depth: usize,
        traversal: &mut Traversal,
    ) -> Option<DependencyNode> {
        if depth > self.options.max_depth {
            return None;
        }
        if !traversal.mark(path) {
            return None;
        }

        let content = match read_source(path) {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!("skipping {}: {}", path.display(), e);
                return None;
            }
        };
        let scan = self.scanner.scan(&content);
        if scan.primary_type.is_none() {
            tracing::debug!("no class declaration in {}, skipping", path.display());
            return None;
        }

        let mut node = DependencyNode::new(path.display().to_string());

        for reference in &scan.references {
            if let Some(target) = self.index.lookup(&reference.name)
                && let Some(child) = self.expand(target, depth, traversal)
            {
                node.subdependencies.push(child);
            }
            if self.options.expand_interfaces && reference.kind == ReferenceKind::Interface {
                for target in implementors_of(self.index, self.scanner, &reference.name) {
                    if let Some(child) = self.expand(&target, depth, traversal) {
                        node.subdependencies.push(child);
                    }
                }
            }
        }

        if let Some(matcher) = self.fuzzy_matcher(depth)
            && let Some(file_name) = path.file_name()
        {
            for similar in matcher.matches_for(&file_name.to_string_lossy(), self.index.files()) {
                let target = Path::new(&similar.entry.path);
                if let Some(child) = self.expand(target, depth, traversal) {
                    node.subdependencies.push(child);
                }
            }
        }

        Some(node)
    }

    /// Recurse into `target` if the filter accepts it.
    fn expand(
        &self,
        target: &Path,
        depth: usize,
        traversal: &mut Traversal,
    ) -> Option<DependencyNode> {
        if !self.filter.accepts(target) {
            return None;
        }
        self.visit(target, depth + 1, traversal)
    }

    fn fuzzy_matcher(&self, depth: usize) -> Option<&'a NameMatcher> {
        match self.options.fuzzy {
            FuzzyScope::Off => None,
            FuzzyScope::Root if depth > 0 => None,
            FuzzyScope::Root | FuzzyScope::All => self.matcher,
        }
    }
}
