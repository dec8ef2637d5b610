//! Primary type resolution for single files.

use crate::patterns::ReferenceScanner;
use classdeps_core::source::read_source;
use std::path::Path;

/// Name of the first class declared in the file at `path`.
///
/// Unreadable files and files without a class declaration both yield `None`.
pub fn resolve_name(scanner: &dyn ReferenceScanner, path: &Path) -> Option<String> {
    let content = match read_source(path) {
        Ok(content) => content,
        Err(e) => {
            tracing::debug!("{}", e);
            return None;
        }
    };
    let name = scanner.primary_type(&content);
    if name.is_none() {
        tracing::debug!("no class declaration in {}", path.display());
    }
    name
}

/// The types a single file declares.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Declarations {
    /// First declared class.
    pub class: Option<String>,
    /// Every declared interface, in source order.
    pub interfaces: Vec<String>,
}

/// Read `path` once and collect its primary class and declared interfaces.
///
/// Unreadable files yield empty declarations.
pub fn resolve_declarations(scanner: &dyn ReferenceScanner, path: &Path) -> Declarations {
    match read_source(path) {
        Ok(content) => Declarations {
            class: scanner.primary_type(&content),
            interfaces: scanner.declared_interfaces(&content),
        },
        Err(e) => {
            tracing::debug!("{}", e);
            Declarations::default()
        }
    }
}
