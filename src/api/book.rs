//! Book operations for the WASM API
//!
//! Stateless functions the hosting page calls before (or without) opening a
//! `StorybookReader`:
//! - Loading: `fetchBook`, `parseBook`
//! - Library: `fetchBookList`, `bookFromQuery`, `currentBook`, `displayName`
//! - Composition: `classifyViewport`, `composePages`, `renderPagesHtml`

use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::composer::compose;
use crate::library;
use crate::loader::{document_from_response, parse_book as parse_book_json, LoadFailure};
use crate::models::{BookDocument, LayoutMode, PageDescriptor};
use crate::renderers::render_pages;
use crate::viewport::classify;
use crate::{wasm_error, wasm_info, wasm_log};

use super::browser::fetch_resource;
use super::helpers::{deserialize, layout_mode_from_u8, serialize, to_js_error};

// ============================================================================
// Loading
// ============================================================================

/// Fetch and validate a book
///
/// # Returns
/// The validated `BookDocument` as a plain object. Rejects with an
/// "Error loading book data: ..." message on any failure.
#[wasm_bindgen(js_name = fetchBook)]
pub async fn fetch_book(identifier: String) -> Result<JsValue, JsValue> {
    let identifier = identifier.trim();
    if identifier.is_empty() {
        return Err(to_js_error(LoadFailure::MissingIdentifier));
    }
    wasm_info!("fetchBook called: '{}'", identifier);

    let response = fetch_resource(identifier)
        .await
        .map_err(|e| to_js_error(LoadFailure::transport(e)))?;
    let document = document_from_response(&response).map_err(to_js_error)?;

    wasm_info!(
        "  loaded '{}' with {} entries",
        document.title,
        document.entry_count()
    );
    serialize(&document, "Book serialization error")
}

/// Validate book JSON text
#[wasm_bindgen(js_name = parseBook)]
pub fn parse_book(json: &str) -> Result<JsValue, JsValue> {
    let document = parse_book_json(json).map_err(to_js_error)?;
    serialize(&document, "Book serialization error")
}

// ============================================================================
// Library
// ============================================================================

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BookListing {
    id: String,
    display_name: String,
}

/// Fetch the book list (a JSON array of identifiers)
///
/// # Returns
/// `[{ id, displayName }]`; an empty array means the library is empty.
#[wasm_bindgen(js_name = fetchBookList)]
pub async fn fetch_book_list(url: String) -> Result<JsValue, JsValue> {
    let response = fetch_resource(&url).await.map_err(|e| {
        wasm_error!("book list unavailable: {}", e);
        to_js_error(LoadFailure::transport(e))
    })?;
    let books = library::book_list_from_response(&response).map_err(to_js_error)?;

    if books.is_empty() {
        wasm_info!("{}", library::EMPTY_LIBRARY_MESSAGE);
    }
    let listings: Vec<BookListing> = books
        .into_iter()
        .map(|id| BookListing {
            display_name: library::display_name(&id),
            id,
        })
        .collect();
    serialize(&listings, "Book list serialization error")
}

/// `book` parameter of a query string such as `location.search`
#[wasm_bindgen(js_name = bookFromQuery)]
pub fn book_from_query(query: &str) -> Option<String> {
    library::book_from_query(query)
}

/// Book named by the current page's `?book=` parameter
#[wasm_bindgen(js_name = currentBook)]
pub fn current_book() -> Option<String> {
    let search = web_sys::window()?.location().search().ok()?;
    let book = library::book_from_query(&search);
    if book.is_none() {
        wasm_log!("no book parameter in '{}'", search);
    }
    book
}

#[wasm_bindgen(js_name = displayName)]
pub fn display_name(identifier: &str) -> String {
    library::display_name(identifier)
}

#[wasm_bindgen(js_name = emptyLibraryMessage)]
pub fn empty_library_message() -> String {
    library::EMPTY_LIBRARY_MESSAGE.to_string()
}

// ============================================================================
// Composition
// ============================================================================

/// Layout mode for a viewport (0 = standard, 1 = compact)
#[wasm_bindgen(js_name = classifyViewport)]
pub fn classify_viewport(width: f64, height: f64) -> LayoutMode {
    classify(width, height)
}

/// Compose the page sequence for a document object
///
/// # Parameters
/// - `document_js`: a `BookDocument` (as returned by `fetchBook`)
/// - `mode`: 0 = standard, 1 = compact
#[wasm_bindgen(js_name = composePages)]
pub fn compose_pages(document_js: JsValue, mode: u8) -> Result<JsValue, JsValue> {
    let mode = layout_mode_from_u8(mode)?;
    let document: BookDocument = deserialize(document_js, "Book deserialization error")?;
    let pages = compose(&document, mode);
    wasm_log!("composePages: {} pages ({} mode)", pages.len(), mode);
    serialize(&pages, "Page serialization error")
}

/// Render page descriptors to HTML fragments, one per page
#[wasm_bindgen(js_name = renderPagesHtml)]
pub fn render_pages_html(pages_js: JsValue) -> Result<Vec<String>, JsValue> {
    let pages: Vec<PageDescriptor> = deserialize(pages_js, "Page deserialization error")?;
    render_pages(&pages).map_err(to_js_error)
}
