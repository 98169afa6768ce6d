// Book loading through a directory-backed fetcher

use std::fs;

use storybook_wasm::library::{list_books, DirectoryFetcher};
use storybook_wasm::loader::{BookLoader, LoadFailure, LoadFailureReason};
use tempfile::TempDir;

fn library_dir() -> TempDir {
    let dir = tempfile::tempdir().expect("temp dir");
    fs::write(
        dir.path().join("noahs_ark.json"),
        r#"{"title":"Noah's Ark","subtitle":"Two by two","pages":[{"image":"ark.png","text":"It rained."}]}"#,
    )
    .expect("write book");
    fs::write(dir.path().join("untitled.json"), r#"{"pages":[]}"#).expect("write book");
    fs::write(dir.path().join("broken.json"), "{ not json").expect("write book");
    fs::write(dir.path().join("package.json"), "{}").expect("write manifest");
    fs::write(dir.path().join("notes.txt"), "ignore me").expect("write notes");
    dir
}

#[test]
fn test_load_valid_book() {
    let dir = library_dir();
    let loader = BookLoader::new(DirectoryFetcher::new(dir.path()));

    let doc = loader.load("noahs_ark.json").expect("book loads");
    assert_eq!(doc.title, "Noah's Ark");
    assert_eq!(doc.subtitle.as_deref(), Some("Two by two"));
    assert_eq!(doc.entry_count(), 1);
}

#[test]
fn test_missing_title_is_schema_failure() {
    let dir = library_dir();
    let loader = BookLoader::new(DirectoryFetcher::new(dir.path()));

    let err = loader.load("untitled.json").expect_err("no title");
    assert_eq!(err.reason(), LoadFailureReason::Schema);
    assert!(err.to_string().starts_with("Error loading book data: "));
}

#[test]
fn test_malformed_json_is_parse_failure() {
    let dir = library_dir();
    let loader = BookLoader::new(DirectoryFetcher::new(dir.path()));

    let err = loader.load("broken.json").expect_err("bad json");
    assert_eq!(err.reason(), LoadFailureReason::Parse);
}

#[test]
fn test_missing_file_is_transport_failure() {
    let dir = library_dir();
    let loader = BookLoader::new(DirectoryFetcher::new(dir.path()));

    let err = loader.load("missing.json").expect_err("no such book");
    assert_eq!(err.reason(), LoadFailureReason::Transport);
    assert!(err.to_string().contains("404"));
}

#[test]
fn test_empty_identifier() {
    let dir = library_dir();
    let loader = BookLoader::new(DirectoryFetcher::new(dir.path()));

    assert_eq!(loader.load("  "), Err(LoadFailure::MissingIdentifier));
}

#[test]
fn test_path_outside_root_is_refused() {
    let dir = library_dir();
    let loader = BookLoader::new(DirectoryFetcher::new(dir.path().join("books")));

    let err = loader.load("../noahs_ark.json").expect_err("traversal refused");
    assert_eq!(err.reason(), LoadFailureReason::Transport);
}

#[test]
fn test_listing_skips_manifests_and_other_files() {
    let dir = library_dir();
    let books = list_books(dir.path()).expect("list");
    assert_eq!(books, vec!["broken.json", "noahs_ark.json", "untitled.json"]);
}
