//! Core types and storage for class dependency trees.
//!
//! Provides the tree data model ([`model::DependencyNode`]), type references
//! classified by [`model::ReferenceKind`], report shapes, configuration,
//! source reading with encoding fallback, and JSON persistence of file indexes.

pub mod config;
pub mod model;
pub mod report;
pub mod source;
pub mod storage;
