//! Reference extraction entry points.

use crate::patterns::{ReferenceScanner, RegexScanner};
use classdeps_core::model::TypeReference;
use classdeps_core::source::read_source;
use std::path::Path;

/// Extract referenced type names from source text with the default scanner.
pub fn extract_references(content: &str) -> Vec<TypeReference> {
    RegexScanner.scan(content).references
}

/// Extract referenced type names from a file.
///
/// An unreadable file is logged and yields no references; callers treat it
/// exactly like a file that references nothing.
pub fn extract_file(scanner: &dyn ReferenceScanner, path: &Path) -> Vec<TypeReference> {
    match read_source(path) {
        Ok(content) => scanner.scan(&content).references,
        Err(e) => {
            tracing::warn!("{}", e);
            Vec::new()
        }
    }
}
