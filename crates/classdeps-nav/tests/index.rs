//! Integration tests for file collection and the name index.

use classdeps_core::storage;
use classdeps_nav::index::{IndexError, NameIndex, ScanOptions, collect_files};
use classdeps_parser::RegexScanner;
use std::fs;
use std::path::{Path, PathBuf};

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

#[test]
fn test_ignore_prunes_test_directories() {
    let (_tmp, root) = project();
    write(&root, "src/tests/Foo.cs", "class FooTests { }");
    let kept = write(&root, "src/Foo.cs", "class Foo { }");

    let options = ScanOptions {
        ignore: vec!["test".to_string()],
        ..ScanOptions::default()
    };
    let files = collect_files(&root, &options).unwrap();
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].path, kept.display().to_string());
    assert_eq!(files[0].file_name, "Foo.cs");
}

#[test]
fn test_ignore_applies_to_file_names_case_insensitive() {
    let (_tmp, root) = project();
    write(&root, "OrderTEST.cs", "class OrderTest { }");
    write(&root, "Order.cs", "class Order { }");

    let options = ScanOptions {
        ignore: vec!["test".to_string()],
        ..ScanOptions::default()
    };
    let names: Vec<String> = collect_files(&root, &options)
        .unwrap()
        .into_iter()
        .map(|f| f.file_name)
        .collect();
    assert_eq!(names, vec!["Order.cs"]);
}

#[test]
fn test_extension_filter() {
    let (_tmp, root) = project();
    write(&root, "Upper.CS", "class Upper { }");
    write(&root, "notes.txt", "class NotSource { }");
    write(&root, "Lower.cs", "class Lower { }");

    let names: Vec<String> = collect_files(&root, &ScanOptions::default())
        .unwrap()
        .into_iter()
        .map(|f| f.file_name)
        .collect();
    assert_eq!(names, vec!["Lower.cs", "Upper.CS"]);
}

#[test]
fn test_exclude_globs_relative_to_root() {
    let (_tmp, root) = project();
    write(&root, "Generated/Proxy.cs", "class Proxy { }");
    write(&root, "Business/OrderBusiness.cs", "class OrderBusiness { }");

    let options = ScanOptions {
        exclude_globs: vec!["Generated/**".to_string()],
        ..ScanOptions::default()
    };
    let files = collect_files(&root, &options).unwrap();
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].file_name, "OrderBusiness.cs");
}

#[test]
fn test_custom_ignore_file() {
    let (_tmp, root) = project();
    write(&root, ".classdepsignore", "Legacy/\n");
    write(&root, "Legacy/OldBusiness.cs", "class OldBusiness { }");
    write(&root, "NewBusiness.cs", "class NewBusiness { }");

    let files = collect_files(&root, &ScanOptions::default()).unwrap();
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].file_name, "NewBusiness.cs");
}

#[test]
fn test_save_paths_relative_to_root() {
    let (_tmp, root) = project();
    write(&root, "src/Order.cs", "class Order { }");

    let options = ScanOptions {
        save_full_path: false,
        ..ScanOptions::default()
    };
    let files = collect_files(&root, &options).unwrap();
    assert_eq!(
        files[0].path,
        Path::new("src").join("Order.cs").display().to_string()
    );
    assert_eq!(files[0].file_name, "Order.cs");
}

#[test]
fn test_relative_index_resolves_against_root() {
    let (tmp, root) = project();
    let order = write(
        &root,
        "Business/OrderBusiness.cs",
        "public class OrderBusiness { }",
    );
    let options = ScanOptions {
        save_full_path: false,
        ..ScanOptions::default()
    };
    let files = collect_files(&root, &options).unwrap();

    let index_file = tmp.path().join("index.json");
    storage::save_index(&index_file, &files).unwrap();
    let loaded = storage::load_index(&index_file).unwrap();

    let index = NameIndex::from_files_in(&root, loaded, &RegexScanner);
    assert_eq!(index.lookup("OrderBusiness"), Some(order.as_path()));
    assert_eq!(index.files()[0].path, order.display().to_string());

    let scanned = NameIndex::scan_dir(&root, &options, &RegexScanner).unwrap();
    assert_eq!(scanned.lookup("OrderBusiness"), Some(order.as_path()));
}

#[test]
fn test_interfaces_indexed_apart_from_classes() {
    let (_tmp, root) = project();
    let interface = write(
        &root,
        "Business/IOrderBusiness.cs",
        "public interface IOrderBusiness { void Approve(); }",
    );
    let business = write(
        &root,
        "Business/OrderBusiness.cs",
        "public class OrderBusiness : IOrderBusiness { }",
    );

    let index = NameIndex::scan_dir(&root, &ScanOptions::default(), &RegexScanner).unwrap();
    assert_eq!(index.len(), 1);
    assert_eq!(index.lookup("OrderBusiness"), Some(business.as_path()));
    assert_eq!(index.lookup("IOrderBusiness"), None);
    assert_eq!(
        index.lookup_interface("IOrderBusiness"),
        Some(interface.as_path())
    );
}

#[test]
fn test_invalid_roots_and_globs() {
    let (_tmp, root) = project();
    let file = write(&root, "A.cs", "class A { }");

    assert!(matches!(
        collect_files(&root.join("missing"), &ScanOptions::default()),
        Err(IndexError::MissingRoot(_))
    ));
    assert!(matches!(
        collect_files(&file, &ScanOptions::default()),
        Err(IndexError::NotADirectory(_))
    ));

    let options = ScanOptions {
        exclude_globs: vec!["[".to_string()],
        ..ScanOptions::default()
    };
    assert!(matches!(
        collect_files(&root, &options),
        Err(IndexError::InvalidGlob { .. })
    ));
}

#[test]
fn test_scan_dir_keeps_first_declaration() {
    let (_tmp, root) = project();
    let first = write(&root, "a/Order.cs", "public class Order { }");
    write(&root, "b/Order.cs", "public class Order { }");
    write(&root, "b/Constants.cs", "public static int Answer = 42;");

    let index = NameIndex::scan_dir(&root, &ScanOptions::default(), &RegexScanner).unwrap();
    assert_eq!(index.len(), 1);
    assert_eq!(index.lookup("Order"), Some(first.as_path()));
    // Files without a class stay in the file list
    assert_eq!(index.files().len(), 3);
}

#[test]
fn test_index_from_saved_file_list() {
    let (tmp, root) = project();
    let business = write(
        &root,
        "OrderBusiness.cs",
        "namespace Shop { public class OrderBusiness { } }",
    );
    let files = collect_files(&root, &ScanOptions::default()).unwrap();

    let index_file = tmp.path().join("out").join("index.json");
    storage::save_index(&index_file, &files).unwrap();
    let loaded = storage::load_index(&index_file).unwrap();
    assert_eq!(loaded, files);

    let index = NameIndex::from_files(loaded, &RegexScanner);
    assert_eq!(index.lookup("OrderBusiness"), Some(business.as_path()));
    assert_eq!(index.classes()[0].name, "OrderBusiness");
}
