use classdeps_core::model::FileEntry;
use classdeps_core::storage;
use tempfile::TempDir;

#[test]
fn test_save_and_load_index_roundtrip() {
    let tmp = TempDir::new().unwrap();
    let path = storage::default_index_file(tmp.path());

    let entries = vec![
        FileEntry::from_path("src/Controllers/OrderController.cs"),
        FileEntry::from_path("src/Business/OrderBusiness.cs"),
    ];
    storage::save_index(&path, &entries).unwrap();
    assert!(path.exists());

    let loaded = storage::load_index(&path).unwrap();
    assert_eq!(loaded, entries);
}

#[test]
fn test_load_index_accepts_external_json() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("index.json");
    std::fs::write(
        &path,
        r#"[
  { "file_name": "LimiteTaxaBusiness.cs", "path": "file-to-analyze/LimiteTaxaBusiness.cs" }
]"#,
    )
    .unwrap();

    let loaded = storage::load_index(&path).unwrap();
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].file_name, "LimiteTaxaBusiness.cs");
}

#[test]
fn test_load_index_missing_file_fails() {
    let tmp = TempDir::new().unwrap();
    let result = storage::load_index(&tmp.path().join("nope.json"));
    assert!(result.is_err());
}

#[test]
fn test_load_index_malformed_fails() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("index.json");
    std::fs::write(&path, "{ not an array").unwrap();
    assert!(storage::load_index(&path).is_err());
}

#[test]
fn test_load_methods() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("methods.json");
    std::fs::write(&path, r#"{ "src/OrderBusiness.cs": ["Approve", "Cancel"] }"#).unwrap();

    let methods = storage::load_methods(&path).unwrap();
    assert_eq!(
        methods.get("src/OrderBusiness.cs").unwrap(),
        &vec!["Approve".to_string(), "Cancel".to_string()]
    );
}
