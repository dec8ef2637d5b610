//! Integration tests for dependency tree construction.

use classdeps_core::config::FuzzyScope;
use classdeps_core::model::DependencyNode;
use classdeps_nav::fuzzy::NameMatcher;
use classdeps_nav::index::{NameIndex, ScanOptions};
use classdeps_nav::predicate::PathRule;
use classdeps_nav::tree::{TreeBuilder, TreeOptions};
use classdeps_parser::RegexScanner;
use std::fs;
use std::path::{Path, PathBuf};

static ANY: PathRule = PathRule::Any;

fn write(root: &Path, rel: &str, content: &str) -> PathBuf {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, content).unwrap();
    path
}

fn project() -> (tempfile::TempDir, PathBuf) {
    let tmp = tempfile::tempdir().unwrap();
    let root = tmp.path().join("proj");
    fs::create_dir_all(&root).unwrap();
    (tmp, root)
}

fn index(root: &Path) -> NameIndex {
    NameIndex::scan_dir(root, &ScanOptions::default(), &RegexScanner).unwrap()
}

fn options(max_depth: usize) -> TreeOptions {
    TreeOptions {
        max_depth,
        fuzzy: FuzzyScope::Off,
        expand_interfaces: false,
    }
}

fn child_names(node: &DependencyNode) -> Vec<String> {
    node.subdependencies
        .iter()
        .map(|c| {
            Path::new(&c.path)
                .file_name()
                .unwrap()
                .to_string_lossy()
                .to_string()
        })
        .collect()
}

#[test]
fn test_cycle_yields_each_file_once() {
    let (_tmp, root) = project();
    let a = write(&root, "A.cs", "class A { B b = new B(); }");
    write(&root, "B.cs", "class B { A a = new A(); }");
    let index = index(&root);

    let builder = TreeBuilder::new(&index, &RegexScanner, &ANY, options(10));
    let tree = builder.build(&a).unwrap();

    assert_eq!(tree.path, a.display().to_string());
    assert_eq!(child_names(&tree), vec!["B.cs"]);
    assert!(tree.subdependencies[0].subdependencies.is_empty());
    assert_eq!(tree.node_count(), 2);
}

#[test]
fn test_depth_zero_is_root_only() {
    let (_tmp, root) = project();
    let a = write(
        &root,
        "A.cs",
        "class A : Base { B b = new B(); C c = new C(); }",
    );
    write(&root, "B.cs", "class B { }");
    write(&root, "C.cs", "class C { }");
    write(&root, "Base.cs", "class Base { }");
    let index = index(&root);

    let builder = TreeBuilder::new(&index, &RegexScanner, &ANY, options(0));
    let tree = builder.build(&a).unwrap();
    assert!(tree.subdependencies.is_empty());
    assert!(tree.methods.is_empty());
}

#[test]
fn test_depth_bound_on_chain() {
    let (_tmp, root) = project();
    let a = write(&root, "A.cs", "class A { B b = new B(); }");
    write(&root, "B.cs", "class B { C c = new C(); }");
    write(&root, "C.cs", "class C { D d = new D(); }");
    write(&root, "D.cs", "class D { }");
    let index = index(&root);

    let builder = TreeBuilder::new(&index, &RegexScanner, &ANY, options(2));
    let tree = builder.build(&a).unwrap();
    assert_eq!(tree.depth(), 2);
    assert!(!tree.contains_path(&root.join("D.cs").display().to_string()));
}

#[test]
fn test_children_follow_discovery_order() {
    let (_tmp, root) = project();
    let foo = write(
        &root,
        "Foo.cs",
        "class Foo : Bar { void M() { var x = new Baz(); } }",
    );
    write(&root, "Bar.cs", "class Bar { }");
    write(&root, "Baz.cs", "class Baz { }");
    let index = index(&root);

    let builder = TreeBuilder::new(&index, &RegexScanner, &ANY, options(2));
    let tree = builder.build(&foo).unwrap();
    // instantiation patterns run before inheritance
    assert_eq!(child_names(&tree), vec!["Baz.cs", "Bar.cs"]);
}

#[test]
fn test_build_is_idempotent() {
    let (_tmp, root) = project();
    let a = write(
        &root,
        "OrderController.cs",
        "class OrderController { OrderBusiness b = new OrderBusiness(); AuditService s; }",
    );
    write(
        &root,
        "OrderBusiness.cs",
        "class OrderBusiness { OrderRepository r = new OrderRepository(); }",
    );
    write(&root, "OrderRepository.cs", "class OrderRepository { }");
    write(&root, "AuditService.cs", "class AuditService { }");

    let first = {
        let index = index(&root);
        TreeBuilder::new(&index, &RegexScanner, &ANY, options(3)).build(&a)
    };
    let second = {
        let index = index(&root);
        TreeBuilder::new(&index, &RegexScanner, &ANY, options(3)).build(&a)
    };
    assert!(first.is_some());
    assert_eq!(first, second);
}

#[test]
fn test_unreadable_and_classless_files_contribute_nothing() {
    let (_tmp, root) = project();
    let a = write(&root, "A.cs", "class A { B b = new B(); C c = new C(); }");
    write(&root, "B.cs", "class B { }");
    let c = write(&root, "C.cs", "class C { }");
    let empty = write(&root, "Empty.cs", "namespace Shop { }");
    let index = index(&root);
    fs::remove_file(&c).unwrap();

    let builder = TreeBuilder::new(&index, &RegexScanner, &ANY, options(2));
    let tree = builder.build(&a).unwrap();
    assert_eq!(child_names(&tree), vec!["B.cs"]);

    assert!(builder.build(&empty).is_none());
}

#[test]
fn test_keyword_predicate_filters_children() {
    let (_tmp, root) = project();
    let controller = write(
        &root,
        "OrderController.cs",
        "class OrderController { OrderBusiness b = new OrderBusiness(); OrderDto d = new OrderDto(); }",
    );
    write(&root, "OrderBusiness.cs", "class OrderBusiness { }");
    write(&root, "OrderDto.cs", "class OrderDto { }");
    let index = index(&root);

    let rule = PathRule::keywords(&["business"]);
    let builder = TreeBuilder::new(&index, &RegexScanner, &rule, options(2));
    let tree = builder.build(&controller).unwrap();
    assert_eq!(child_names(&tree), vec!["OrderBusiness.cs"]);
}

#[test]
fn test_closure_predicate() {
    let (_tmp, root) = project();
    let a = write(&root, "A.cs", "class A { B b = new B(); C c = new C(); }");
    write(&root, "B.cs", "class B { }");
    write(&root, "C.cs", "class C { }");
    let index = index(&root);

    let not_c = |p: &Path| !p.ends_with("C.cs");
    let builder = TreeBuilder::new(&index, &RegexScanner, &not_c, options(2));
    let tree = builder.build(&a).unwrap();
    assert_eq!(child_names(&tree), vec!["B.cs"]);
}

#[test]
fn test_fuzzy_match_adds_related_business() {
    let (_tmp, root) = project();
    let controller = write(
        &root,
        "LimiteTaxaController.cs",
        "public class LimiteTaxaController : ControllerBase { }",
    );
    write(
        &root,
        "LimiteTaxaBusiness.cs",
        "public class LimiteTaxaBusiness { }",
    );
    write(
        &root,
        "ClienteRepository.cs",
        "public class ClienteRepository { }",
    );
    let index = index(&root);
    let matcher = NameMatcher::default();
    let rule = PathRule::Suffixes(vec!["Business.cs".to_string(), "Repository.cs".to_string()]);
    let opts = TreeOptions {
        fuzzy: FuzzyScope::Root,
        ..options(2)
    };

    let builder = TreeBuilder::new(&index, &RegexScanner, &rule, opts).with_matcher(&matcher);
    let tree = builder.build(&controller).unwrap();
    assert_eq!(child_names(&tree), vec!["LimiteTaxaBusiness.cs"]);

    let off = TreeBuilder::new(&index, &RegexScanner, &rule, options(2)).with_matcher(&matcher);
    assert!(off.build(&controller).unwrap().subdependencies.is_empty());
}

#[test]
fn test_regex_and_fuzzy_discovery_do_not_duplicate() {
    let (_tmp, root) = project();
    let controller = write(
        &root,
        "LimiteTaxaController.cs",
        "public class LimiteTaxaController { private LimiteTaxaBusiness _b = new LimiteTaxaBusiness(); }",
    );
    write(
        &root,
        "LimiteTaxaBusiness.cs",
        "public class LimiteTaxaBusiness { }",
    );
    let index = index(&root);
    let matcher = NameMatcher::default();
    let opts = TreeOptions {
        fuzzy: FuzzyScope::All,
        ..options(2)
    };

    let builder = TreeBuilder::new(&index, &RegexScanner, &ANY, opts).with_matcher(&matcher);
    let tree = builder.build(&controller).unwrap();
    assert_eq!(child_names(&tree), vec!["LimiteTaxaBusiness.cs"]);
    assert_eq!(tree.node_count(), 2);
}

#[test]
fn test_interface_expansion() {
    let (_tmp, root) = project();
    let controller = write(
        &root,
        "OrderController.cs",
        "public class OrderController { private readonly IOrderBusiness _business; }",
    );
    write(
        &root,
        "IOrderBusiness.cs",
        "public interface IOrderBusiness { void Approve(); }",
    );
    write(
        &root,
        "OrderBusiness.cs",
        "public class OrderBusiness : IOrderBusiness { }",
    );
    let index = index(&root);

    let plain = TreeBuilder::new(&index, &RegexScanner, &ANY, options(2));
    assert!(plain.build(&controller).unwrap().subdependencies.is_empty());

    let opts = TreeOptions {
        expand_interfaces: true,
        ..options(2)
    };
    let widened = TreeBuilder::new(&index, &RegexScanner, &ANY, opts);
    let tree = widened.build(&controller).unwrap();
    assert_eq!(child_names(&tree), vec!["OrderBusiness.cs"]);
}

#[test]
fn test_build_many_uses_separate_traversals() {
    let (_tmp, root) = project();
    let a = write(&root, "A.cs", "class A { Shared s = new Shared(); }");
    let b = write(&root, "B.cs", "class B { Shared s = new Shared(); }");
    write(&root, "Shared.cs", "class Shared { }");
    let index = index(&root);

    let builder = TreeBuilder::new(&index, &RegexScanner, &ANY, options(2));
    let trees = builder.build_many(&[a, b]);
    assert_eq!(trees.len(), 2);
    for tree in trees {
        assert_eq!(child_names(&tree.unwrap()), vec!["Shared.cs"]);
    }
}
