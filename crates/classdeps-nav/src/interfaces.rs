//! Concrete classes behind an interface name.
//!
//! A class implements `IFoo` when its declaration's base list names `IFoo`
//! as a whole item (`class Foo : Base, IFoo`). Generic arguments and namespace
//! qualifiers on the base item are ignored.

use crate::index::NameIndex;
use classdeps_core::model::GroupedDependencies;
use classdeps_core::source::read_source;
use classdeps_parser::ReferenceScanner;
use rayon::prelude::*;
use serde::Serialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// One implementing class with its own (unexpanded) references.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Implementation {
    pub class_name: String,
    pub file_path: String,
    pub dependencies: GroupedDependencies,
}

fn declares(scanner: &dyn ReferenceScanner, path: &Path, interface: &str) -> Option<String> {
    let content = match read_source(path) {
        Ok(content) => content,
        Err(e) => {
            tracing::debug!("{}", e);
            return None;
        }
    };
    scanner
        .declares_base(&content, interface)
        .then_some(content)
}

/// Paths of every indexed file whose class lists `interface` as a base.
///
/// Files are scanned in parallel; the result keeps index order.
pub fn implementors_of(
    index: &NameIndex,
    scanner: &dyn ReferenceScanner,
    interface: &str,
) -> Vec<PathBuf> {
    index
        .files()
        .par_iter()
        .filter_map(|entry| {
            let path = Path::new(&entry.path);
            declares(scanner, path, interface).map(|_| path.to_path_buf())
        })
        .collect()
}

/// Finds implementations across the index, reporting each implementing class
/// at most once for the lifetime of the resolver.
///
/// Create one resolver per report so a class implementing two of the root's
/// interfaces is listed only under the first.
pub struct ImplementationResolver<'a> {
    index: &'a NameIndex,
    scanner: &'a dyn ReferenceScanner,
    seen: HashSet<String>,
}

impl<'a> ImplementationResolver<'a> {
    pub fn new(index: &'a NameIndex, scanner: &'a dyn ReferenceScanner) -> Self {
        Self {
            index,
            scanner,
            seen: HashSet::new(),
        }
    }

    /// Implementations of `interface` not already returned by this resolver.
    pub fn find_implementations(&mut self, interface: &str) -> Vec<Implementation> {
        let scanner = self.scanner;
        let found: Vec<(String, String)> = self
            .index
            .files()
            .par_iter()
            .filter_map(|entry| {
                declares(scanner, Path::new(&entry.path), interface)
                    .map(|content| (entry.path.clone(), content))
            })
            .collect();

        let mut implementations = Vec::new();
        for (file_path, content) in found {
            let scan = scanner.scan(&content);
            let Some(class_name) = scan.primary_type else {
                continue;
            };
            if !self.seen.insert(class_name.clone()) {
                continue;
            }
            implementations.push(Implementation {
                class_name,
                file_path,
                dependencies: GroupedDependencies::from_references(&scan.references),
            });
        }
        tracing::debug!(
            "{} new implementations of {}",
            implementations.len(),
            interface
        );
        implementations
    }

    /// Forget previously returned classes.
    pub fn reset(&mut self) {
        self.seen.clear();
    }
}
