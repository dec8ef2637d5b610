//! Turn a traversal into one of the report shapes.

use crate::interfaces::ImplementationResolver;
use crate::tree::TreeBuilder;
use classdeps_core::model::{GroupedDependencies, ResolvedClass};
use classdeps_core::report::{
    FlatReport, GroupedClasses, GroupedReport, ImplementationEntry, MainClass, Report,
    ReportShape, TreeReport,
};
use classdeps_core::source::read_source;
use classdeps_parser::names::resolve_name;
use std::collections::BTreeMap;
use std::path::Path;

/// Operator-supplied method lists keyed by exact file path.
pub type MethodMap = BTreeMap<String, Vec<String>>;

/// Generate a report for `root`.
///
/// A root that is unreadable or declares no class produces
/// [`Report::main_class_not_found`] rather than an error.
pub fn generate_report(
    builder: &TreeBuilder<'_>,
    root: &Path,
    shape: ReportShape,
    methods: Option<&MethodMap>,
) -> Report {
    let Some(main_name) = resolve_name(builder.scanner(), root) else {
        tracing::warn!("no class declared in root file {}", root.display());
        return Report::main_class_not_found();
    };

    match shape {
        ReportShape::Tree => tree_report(builder, root, methods),
        ReportShape::Flat => flat_report(builder, root, main_name, methods),
        ReportShape::Grouped => grouped_report(builder, root, main_name, methods),
    }
}

fn main_methods(root: &Path, methods: Option<&MethodMap>) -> Vec<String> {
    methods
        .and_then(|m| m.get(&root.display().to_string()))
        .cloned()
        .unwrap_or_default()
}

fn tree_report(builder: &TreeBuilder<'_>, root: &Path, methods: Option<&MethodMap>) -> Report {
    let Some(mut node) = builder.build(root) else {
        return Report::main_class_not_found();
    };
    if let Some(methods) = methods {
        let applied = node.apply_methods(methods);
        tracing::debug!("applied methods to {} nodes", applied);
    }
    Report::Tree(TreeReport {
        main_class: MainClass {
            name: None,
            path: node.path,
            methods: node.methods,
        },
        dependencies: node.subdependencies,
    })
}

fn flat_report(
    builder: &TreeBuilder<'_>,
    root: &Path,
    main_name: String,
    methods: Option<&MethodMap>,
) -> Report {
    let Some(node) = builder.build(root) else {
        return Report::main_class_not_found();
    };
    Report::Flat(FlatReport {
        main_class: MainClass {
            name: Some(main_name),
            path: node.path.clone(),
            methods: main_methods(root, methods),
        },
        files: node.dependency_order(),
    })
}

fn grouped_report(
    builder: &TreeBuilder<'_>,
    root: &Path,
    main_name: String,
    methods: Option<&MethodMap>,
) -> Report {
    let content = match read_source(root) {
        Ok(content) => content,
        Err(e) => {
            tracing::warn!("{}", e);
            return Report::main_class_not_found();
        }
    };
    let scan = builder.scanner().scan(&content);
    let grouped = GroupedDependencies::from_references(&scan.references);

    let index = builder.index();
    let resolve = |names: &[String]| -> Vec<ResolvedClass> {
        names
            .iter()
            .filter_map(|name| {
                index.lookup(name).map(|path| ResolvedClass {
                    class_name: name.clone(),
                    path: path.display().to_string(),
                })
            })
            .collect()
    };
    // interface names resolve to their own declaring file
    let resolve_interfaces = |names: &[String]| -> Vec<ResolvedClass> {
        names
            .iter()
            .filter_map(|name| {
                index
                    .lookup_interface(name)
                    .or_else(|| index.lookup(name))
                    .map(|path| ResolvedClass {
                        class_name: name.clone(),
                        path: path.display().to_string(),
                    })
            })
            .collect()
    };

    let mut resolver = ImplementationResolver::new(index, builder.scanner());
    let mut implementations = Vec::new();
    for interface in &grouped.interfaces {
        for imp in resolver.find_implementations(interface) {
            implementations.push(ImplementationEntry {
                interface: interface.clone(),
                class_name: imp.class_name,
                path: imp.file_path,
            });
        }
    }

    Report::Grouped(GroupedReport {
        main_class: MainClass {
            name: Some(main_name),
            path: root.display().to_string(),
            methods: main_methods(root, methods),
        },
        dependencies: GroupedClasses {
            instance: resolve(&grouped.instance),
            static_usage: resolve(&grouped.static_usage),
            inheritance: resolve(&grouped.inheritance),
            interfaces: resolve_interfaces(&grouped.interfaces),
        },
        implementations,
    })
}
