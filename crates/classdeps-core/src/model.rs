//! Data model for discovered references and dependency trees.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;

/// Syntactic context under which a type name was discovered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceKind {
    /// `new Foo(...)`, or a declared variable/field/parameter of type `Foo`.
    Instantiation,
    /// `class Bar : Foo`.
    Inheritance,
    /// `Foo.Member` or the last segment of `using A.B.Foo;`.
    StaticUsage,
    /// Any name following the `IName` interface convention.
    Interface,
    /// `Outer<Inner>`: both sides.
    GenericParameter,
}

impl ReferenceKind {
    /// Group label used by the grouped report shape.
    pub fn group(self) -> &'static str {
        match self {
            Self::Instantiation | Self::GenericParameter => "instance",
            Self::Inheritance => "inheritance",
            Self::StaticUsage => "static",
            Self::Interface => "interfaces",
        }
    }
}

impl fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Instantiation => "instantiation",
            Self::Inheritance => "inheritance",
            Self::StaticUsage => "static-usage",
            Self::Interface => "interface",
            Self::GenericParameter => "generic-parameter",
        };
        f.write_str(s)
    }
}

/// A type name found in a source file, tagged with how it was found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeReference {
    pub name: String,
    pub kind: ReferenceKind,
}

impl TypeReference {
    pub fn new(name: impl Into<String>, kind: ReferenceKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

/// One record of a file index: `{file_name, path}`.
///
/// Same shape whether the index came from a directory scan, a manual upload,
/// or an externally produced JSON file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    pub file_name: String,
    pub path: String,
}

impl FileEntry {
    /// Build an entry from a path, taking the file name from its last component.
    pub fn from_path(path: &str) -> Self {
        let file_name = std::path::Path::new(path)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(path)
            .to_string();
        Self {
            file_name,
            path: path.to_string(),
        }
    }
}

/// One file in a dependency tree.
///
/// A node exclusively owns its subdependencies; there are no back-references.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyNode {
    pub path: String,
    /// Only ever supplied by an operator; extraction leaves this empty.
    #[serde(default)]
    pub methods: Vec<String>,
    #[serde(default)]
    pub subdependencies: Vec<DependencyNode>,
}

impl DependencyNode {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            methods: Vec::new(),
            subdependencies: Vec::new(),
        }
    }

    /// Total number of nodes in this subtree, including `self`.
    pub fn node_count(&self) -> usize {
        1 + self
            .subdependencies
            .iter()
            .map(DependencyNode::node_count)
            .sum::<usize>()
    }

    /// Depth of the subtree: a leaf has depth 0.
    pub fn depth(&self) -> usize {
        self.subdependencies
            .iter()
            .map(|c| c.depth() + 1)
            .max()
            .unwrap_or(0)
    }

    /// Paths in dependency order: every file comes after the files it depends on.
    pub fn dependency_order(&self) -> Vec<String> {
        let mut out = Vec::new();
        let mut seen = HashSet::new();
        self.collect_post_order(&mut out, &mut seen);
        out
    }

    fn collect_post_order(&self, out: &mut Vec<String>, seen: &mut HashSet<String>) {
        for child in &self.subdependencies {
            child.collect_post_order(out, seen);
        }
        if seen.insert(self.path.clone()) {
            out.push(self.path.clone());
        }
    }

    /// Merge operator-supplied method lists into the tree, matched by exact path.
    ///
    /// Returns the number of nodes that received methods.
    pub fn apply_methods(&mut self, methods: &BTreeMap<String, Vec<String>>) -> usize {
        let mut applied = 0;
        if let Some(list) = methods.get(&self.path) {
            self.methods = list.clone();
            applied += 1;
        }
        for child in &mut self.subdependencies {
            applied += child.apply_methods(methods);
        }
        applied
    }

    /// Check whether `path` appears anywhere in this subtree.
    pub fn contains_path(&self, path: &str) -> bool {
        self.path == path || self.subdependencies.iter().any(|c| c.contains_path(path))
    }
}

/// A discovered name resolved to the file that declares it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedClass {
    pub class_name: String,
    pub path: String,
}

/// References grouped by discovery kind (alternative node shape).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupedDependencies {
    pub instance: Vec<String>,
    #[serde(rename = "static")]
    pub static_usage: Vec<String>,
    pub inheritance: Vec<String>,
    pub interfaces: Vec<String>,
}

impl GroupedDependencies {
    /// Group a reference list, preserving discovery order within each group.
    pub fn from_references(refs: &[TypeReference]) -> Self {
        let mut grouped = Self::default();
        for r in refs {
            let bucket = match r.kind {
                ReferenceKind::Inheritance => &mut grouped.inheritance,
                ReferenceKind::StaticUsage => &mut grouped.static_usage,
                ReferenceKind::Interface => &mut grouped.interfaces,
                ReferenceKind::Instantiation | ReferenceKind::GenericParameter => {
                    &mut grouped.instance
                }
            };
            if !bucket.contains(&r.name) {
                bucket.push(r.name.clone());
            }
        }
        grouped
    }

    pub fn is_empty(&self) -> bool {
        self.instance.is_empty()
            && self.static_usage.is_empty()
            && self.inheritance.is_empty()
            && self.interfaces.is_empty()
    }
}
