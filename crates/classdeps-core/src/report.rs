//! Report shapes handed to the documentation stage, and their JSON encoding.

use crate::model::{DependencyNode, ResolvedClass};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Error text emitted when the root file declares no primary type.
pub const MAIN_CLASS_NOT_FOUND: &str = "Main class not found";

/// Which report shape to produce.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportShape {
    /// Nested `{path, methods, subdependencies}` nodes.
    #[default]
    Tree,
    /// References grouped by kind: instance/static/inheritance/interfaces.
    Grouped,
    /// Every tree file in dependency order.
    Flat,
}

impl std::str::FromStr for ReportShape {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "tree" => Ok(Self::Tree),
            "grouped" => Ok(Self::Grouped),
            "flat" => Ok(Self::Flat),
            other => Err(format!(
                "unknown report shape '{}' (expected tree, grouped or flat)",
                other
            )),
        }
    }
}

/// The root file of a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MainClass {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub path: String,
    #[serde(default)]
    pub methods: Vec<String>,
}

/// Tree shape: the root's subdependencies, nested.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeReport {
    pub main_class: MainClass,
    pub dependencies: Vec<DependencyNode>,
}

/// Resolved references of the root grouped by kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupedClasses {
    pub instance: Vec<ResolvedClass>,
    #[serde(rename = "static")]
    pub static_usage: Vec<ResolvedClass>,
    pub inheritance: Vec<ResolvedClass>,
    pub interfaces: Vec<ResolvedClass>,
}

/// A concrete class standing behind one of the root's interface dependencies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImplementationEntry {
    pub interface: String,
    pub class_name: String,
    pub path: String,
}

/// Grouped shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupedReport {
    pub main_class: MainClass,
    pub dependencies: GroupedClasses,
    pub implementations: Vec<ImplementationEntry>,
}

/// Flat shape: files in the order the documentation stage should consume them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlatReport {
    pub main_class: MainClass,
    pub files: Vec<String>,
}

/// Any report, or a structured error that JSON consumers can detect uniformly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Report {
    Tree(TreeReport),
    Grouped(GroupedReport),
    Flat(FlatReport),
    Error { error: String },
}

impl Report {
    pub fn main_class_not_found() -> Self {
        Self::Error {
            error: MAIN_CLASS_NOT_FOUND.to_string(),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }
}

/// Serialize a report to a pretty-printed JSON string.
pub fn to_json(report: &Report) -> Result<String> {
    serde_json::to_string_pretty(report).context("failed to serialize report to JSON")
}
