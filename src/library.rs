//! Book library: discovering books and naming them
//!
//! Books are JSON files sitting next to the reader. The library lists them,
//! turns identifiers into display names, and extracts the requested book from
//! the page URL's query string.

use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use percent_encoding::percent_decode_str;

use crate::loader::{FetchResponse, LoadFailure, ResourceFetcher};

/// JSON files in the book directory that are not books
const EXCLUDED_FILES: &[&str] = &["package.json", "package-lock.json"];

/// Shown when the library is empty
pub const EMPTY_LIBRARY_MESSAGE: &str = "No stories available. Add JSON files to the root directory.";

/// List book identifiers (`*.json` file names) in `dir`, sorted
pub fn list_books(dir: &Path) -> io::Result<Vec<String>> {
    let mut books = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if is_book_file(&name) {
            books.push(name);
        }
    }
    books.sort();
    log::debug!("found {} books in {}", books.len(), dir.display());
    Ok(books)
}

/// True for `*.json` names that are not tooling manifests
pub fn is_book_file(name: &str) -> bool {
    name.ends_with(".json") && !EXCLUDED_FILES.contains(&name)
}

/// Parse a book-list payload (a JSON array of identifiers)
pub fn parse_book_list(body: &str) -> Result<Vec<String>, LoadFailure> {
    let books: Vec<String> = serde_json::from_str(body)?;
    Ok(books)
}

/// Validate a fetched book-list response
pub fn book_list_from_response(response: &FetchResponse) -> Result<Vec<String>, LoadFailure> {
    if !response.is_success() {
        return Err(LoadFailure::transport(format!(
            "{} {}",
            response.status, response.status_text
        )));
    }
    parse_book_list(&response.body)
}

/// Display name for a book identifier: `noahs_ark.json` -> `NOAHS ARK`
pub fn display_name(identifier: &str) -> String {
    identifier.replacen(".json", "", 1).replace('_', " ").to_uppercase()
}

/// Extract the `book` parameter from a URL query string (with or without `?`)
pub fn book_from_query(query: &str) -> Option<String> {
    query
        .trim_start_matches('?')
        .split('&')
        .filter_map(|pair| pair.split_once('=').or(Some((pair, ""))))
        .find(|(key, _)| *key == "book")
        .map(|(_, value)| value.replace('+', " "))
        .and_then(|value| percent_decode_str(&value).decode_utf8().ok().map(|v| v.into_owned()))
        .filter(|value| !value.is_empty())
}

/// Serves book resources from a directory
#[derive(Debug, Clone)]
pub struct DirectoryFetcher {
    root: PathBuf,
}

impl DirectoryFetcher {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn list_books(&self) -> io::Result<Vec<String>> {
        list_books(&self.root)
    }

    /// Resolve an identifier inside the root; `None` if it would escape it
    fn resolve(&self, identifier: &str) -> Option<PathBuf> {
        let relative = Path::new(identifier.trim_start_matches("./"));
        let safe = relative
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
        if safe {
            Some(self.root.join(relative))
        } else {
            None
        }
    }
}

impl ResourceFetcher for DirectoryFetcher {
    fn fetch(&self, identifier: &str) -> Result<FetchResponse, String> {
        let Some(path) = self.resolve(identifier) else {
            log::warn!("refusing to serve '{}' outside {}", identifier, self.root.display());
            return Ok(FetchResponse {
                status: 403,
                status_text: "Forbidden".to_string(),
                body: String::new(),
            });
        };

        match fs::read_to_string(&path) {
            Ok(body) => Ok(FetchResponse::ok(body)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(FetchResponse::not_found()),
            Err(e) => Err(format!("{}: {}", path.display(), e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name() {
        assert_eq!(display_name("noahs_ark.json"), "NOAHS ARK");
        assert_eq!(display_name("nuh"), "NUH");
    }

    #[test]
    fn test_book_from_query() {
        assert_eq!(book_from_query("?book=nuh.json"), Some("nuh.json".to_string()));
        assert_eq!(book_from_query("lang=en&book=my%20book.json"), Some("my book.json".to_string()));
        assert_eq!(book_from_query("?book=a+b.json"), Some("a b.json".to_string()));
        assert_eq!(book_from_query("?book="), None);
        assert_eq!(book_from_query("?books=x"), None);
        assert_eq!(book_from_query(""), None);
    }

    #[test]
    fn test_excluded_manifests() {
        assert!(is_book_file("nuh.json"));
        assert!(!is_book_file("package.json"));
        assert!(!is_book_file("package-lock.json"));
        assert!(!is_book_file("notes.txt"));
        assert!(is_book_file("books.json"));
    }

    #[test]
    fn test_parse_book_list() {
        assert_eq!(
            parse_book_list(r#"["a.json","b.json"]"#).unwrap(),
            vec!["a.json".to_string(), "b.json".to_string()]
        );
        assert!(parse_book_list(r#"{"a":1}"#).is_err());
        assert!(book_list_from_response(&FetchResponse::not_found()).is_err());
    }

    #[test]
    fn test_resolve_rejects_traversal() {
        let fetcher = DirectoryFetcher::new("/srv/books");
        assert!(fetcher.resolve("../etc/passwd").is_none());
        assert!(fetcher.resolve("/etc/passwd").is_none());
        assert_eq!(fetcher.resolve("./nuh.json"), Some(PathBuf::from("/srv/books/nuh.json")));
        assert_eq!(fetcher.fetch("../secret.json").unwrap().status, 403);
    }
}
