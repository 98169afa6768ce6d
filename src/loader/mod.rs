//! Book document loader
//!
//! Fetches a book resource through a `ResourceFetcher` and validates it into
//! a `BookDocument`. One attempt only; retrying is the caller's decision.
//!
//! Validation runs in three stages, each mapping to its own failure:
//! status check (transport), JSON parse (parse), shape check (schema).

pub mod errors;

pub use errors::{LoadFailure, LoadFailureReason};

use serde_json::Value;

use crate::models::BookDocument;

/// Raw response from a resource fetch
#[derive(Debug, Clone, PartialEq)]
pub struct FetchResponse {
    /// HTTP-style status code
    pub status: u16,
    pub status_text: String,
    pub body: String,
}

impl FetchResponse {
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            status_text: "OK".to_string(),
            body: body.into(),
        }
    }

    pub fn not_found() -> Self {
        Self {
            status: 404,
            status_text: "Not Found".to_string(),
            body: String::new(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Source of book resources (HTTP in the browser, a directory natively)
pub trait ResourceFetcher {
    /// Fetch the resource named by `identifier`.
    ///
    /// `Err` means the resource could not be reached at all; a reachable
    /// resource with a failing status is still `Ok` with that status.
    fn fetch(&self, identifier: &str) -> Result<FetchResponse, String>;
}

/// Loads and validates books from a fetcher
pub struct BookLoader<F: ResourceFetcher> {
    fetcher: F,
}

impl<F: ResourceFetcher> BookLoader<F> {
    pub fn new(fetcher: F) -> Self {
        Self { fetcher }
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Fetch and validate the book named by `identifier`
    pub fn load(&self, identifier: &str) -> Result<BookDocument, LoadFailure> {
        let identifier = identifier.trim();
        if identifier.is_empty() {
            return Err(LoadFailure::MissingIdentifier);
        }

        log::debug!("loading book '{}'", identifier);
        let response = self
            .fetcher
            .fetch(identifier)
            .map_err(LoadFailure::transport)?;

        let document = document_from_response(&response)?;
        log::info!(
            "loaded book '{}' ({} entries) from '{}'",
            document.title,
            document.entry_count(),
            identifier
        );
        Ok(document)
    }
}

/// Validate a fetched response into a document
pub fn document_from_response(response: &FetchResponse) -> Result<BookDocument, LoadFailure> {
    if !response.is_success() {
        let detail = format!("{} {}", response.status, response.status_text);
        log::warn!("book fetch failed: {}", detail);
        return Err(LoadFailure::transport(detail.trim_end().to_string()));
    }
    parse_book(&response.body)
}

/// Parse and validate a book JSON payload
pub fn parse_book(body: &str) -> Result<BookDocument, LoadFailure> {
    let value: Value = serde_json::from_str(body)?;
    validate_shape(&value)?;

    serde_json::from_value(value).map_err(|e| {
        log::warn!("book payload rejected: {}", e);
        LoadFailure::schema(format!("Malformed story entry: {}", e))
    })
}

/// Check the invariants a payload must meet before deserialization
fn validate_shape(value: &Value) -> Result<(), LoadFailure> {
    let object = value
        .as_object()
        .ok_or_else(|| LoadFailure::schema("Expected title and pages array."))?;

    let has_title = object
        .get("title")
        .and_then(Value::as_str)
        .map_or(false, |t| !t.is_empty());
    let has_pages = object.get("pages").map_or(false, Value::is_array);

    if !has_title || !has_pages {
        return Err(LoadFailure::schema("Expected title and pages array."));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    struct StubFetcher {
        response: Result<FetchResponse, String>,
        calls: Cell<usize>,
    }

    impl StubFetcher {
        fn new(response: Result<FetchResponse, String>) -> Self {
            Self { response, calls: Cell::new(0) }
        }
    }

    impl ResourceFetcher for StubFetcher {
        fn fetch(&self, _identifier: &str) -> Result<FetchResponse, String> {
            self.calls.set(self.calls.get() + 1);
            self.response.clone()
        }
    }

    #[test]
    fn test_load_valid_book() {
        let body = r#"{"title":"Nuh","pages":[{"image":"a.jpg","text":"Once upon a time"}]}"#;
        let loader = BookLoader::new(StubFetcher::new(Ok(FetchResponse::ok(body))));
        let doc = loader.load("nuh.json").unwrap();
        assert_eq!(doc.title, "Nuh");
        assert_eq!(doc.pages[0].text_content(), Some("Once upon a time"));
    }

    #[test]
    fn test_non_success_status_is_transport_failure() {
        let loader = BookLoader::new(StubFetcher::new(Ok(FetchResponse::not_found())));
        let err = loader.load("missing.json").unwrap_err();
        assert_eq!(err.reason(), LoadFailureReason::Transport);
        assert_eq!(err, LoadFailure::transport("404 Not Found"));
    }

    #[test]
    fn test_unreachable_is_transport_failure_single_attempt() {
        let loader = BookLoader::new(StubFetcher::new(Err("connection refused".to_string())));
        let err = loader.load("book.json").unwrap_err();
        assert_eq!(err.reason(), LoadFailureReason::Transport);
        assert_eq!(loader.fetcher().calls.get(), 1);
    }

    #[test]
    fn test_empty_identifier_never_fetches() {
        let loader = BookLoader::new(StubFetcher::new(Ok(FetchResponse::ok("{}"))));
        assert_eq!(loader.load("  ").unwrap_err(), LoadFailure::MissingIdentifier);
        assert_eq!(loader.fetcher().calls.get(), 0);
    }

    #[test]
    fn test_malformed_json_is_parse_failure() {
        let err = parse_book("{\"title\": ").unwrap_err();
        assert_eq!(err.reason(), LoadFailureReason::Parse);
    }

    #[test]
    fn test_schema_failures() {
        for body in [
            r#"{"pages":[]}"#,
            r#"{"title":"","pages":[]}"#,
            r#"{"title":7,"pages":[]}"#,
            r#"{"title":"Nuh","pages":{"0":{}}}"#,
            r#"{"title":"Nuh"}"#,
            r#"[1,2,3]"#,
            r#"{"title":"Nuh","pages":[{"text":42}]}"#,
        ] {
            let err = parse_book(body).unwrap_err();
            assert_eq!(err.reason(), LoadFailureReason::Schema, "body: {}", body);
        }
    }

    #[test]
    fn test_error_message_is_user_facing() {
        let err = parse_book(r#"{"pages":[]}"#).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Error loading book data: Invalid book format. Expected title and pages array."
        );
    }
}
