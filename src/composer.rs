//! Page composer
//!
//! Turns a validated `BookDocument` into the ordered page sequence loaded into
//! the flip widget. Composition is pure and deterministic: the same document
//! and layout mode always produce the same sequence.
//!
//! Sequence layout:
//!
//! ```text
//! [FrontCover] [Blank] story pages... [Blank] [EndOfBook] [Blank] [BackCover]
//! ```
//!
//! The leading blank puts the first story page on the correct side of the
//! spread. The blank after the story opens the closing message on a fresh
//! leaf, and the trailing blank mirrors the leading one before the back cover.
//! Standard mode emits one Combined page per entry; Compact mode emits an
//! Image page (left) followed by a Text page (right).

use crate::config::{DEFAULT_SUBTITLE, END_OF_BOOK_HEADING, END_OF_BOOK_MESSAGE};
use crate::models::{
    BookDocument, Density, LayoutMode, PageContent, PageDescriptor, PageKind, SideHint, StoryEntry,
};

/// Number of pages that surround the story pages in every book
pub const STRUCTURAL_PAGE_COUNT: usize = 6;

/// Fixed text used by the composer for covers and the closing page
#[derive(Debug, Clone, PartialEq)]
pub struct ComposeOptions {
    pub default_subtitle: String,
    pub end_heading: String,
    pub end_message: String,
}

impl Default for ComposeOptions {
    fn default() -> Self {
        Self {
            default_subtitle: DEFAULT_SUBTITLE.to_string(),
            end_heading: END_OF_BOOK_HEADING.to_string(),
            end_message: END_OF_BOOK_MESSAGE.to_string(),
        }
    }
}

impl From<&crate::config::ReaderConfig> for ComposeOptions {
    fn from(config: &crate::config::ReaderConfig) -> Self {
        Self {
            default_subtitle: config.default_subtitle.clone(),
            end_heading: config.end_heading.clone(),
            end_message: config.end_message.clone(),
        }
    }
}

/// Compose with the stock cover and closing text
pub fn compose(document: &BookDocument, mode: LayoutMode) -> Vec<PageDescriptor> {
    compose_with(document, mode, &ComposeOptions::default())
}

/// Compose a document into its page sequence for the given layout mode
pub fn compose_with(
    document: &BookDocument,
    mode: LayoutMode,
    options: &ComposeOptions,
) -> Vec<PageDescriptor> {
    let mut pages = Vec::with_capacity(expected_page_count(document.entry_count(), mode));

    pages.push(front_cover(document, options));
    pages.push(PageDescriptor::structural(PageKind::Blank));

    for (index, entry) in document.pages.iter().enumerate() {
        match mode {
            LayoutMode::Standard => {
                pages.push(story_page(PageKind::Combined, entry, index + 1, SideHint::None));
            }
            LayoutMode::Compact => {
                let number = index * 2 + 1;
                pages.push(story_page(PageKind::Image, entry, number, SideHint::Left));
                pages.push(story_page(PageKind::Text, entry, number + 1, SideHint::Right));
            }
        }
    }

    pages.push(PageDescriptor::structural(PageKind::Blank));
    pages.push(end_of_book(options));
    pages.push(PageDescriptor::structural(PageKind::Blank));
    pages.push(back_cover());

    log::debug!(
        "composed {} pages for '{}' in {} mode",
        pages.len(),
        document.title,
        mode
    );
    pages
}

/// Page count `compose` yields for `entries` story entries
pub fn expected_page_count(entries: usize, mode: LayoutMode) -> usize {
    let per_entry = match mode {
        LayoutMode::Standard => 1,
        LayoutMode::Compact => 2,
    };
    entries * per_entry + STRUCTURAL_PAGE_COUNT
}

/// Default alt text for an illustration on story page `number`
pub fn default_alt_text(number: usize) -> String {
    format!("Illustration for page {}", number)
}

fn front_cover(document: &BookDocument, options: &ComposeOptions) -> PageDescriptor {
    let subtitle = document
        .subtitle_text()
        .unwrap_or(&options.default_subtitle)
        .to_string();

    PageDescriptor {
        kind: PageKind::FrontCover,
        content: PageContent {
            title: Some(document.title.clone()),
            subtitle: Some(subtitle),
            ..PageContent::default()
        },
        sequence_number: None,
        side_hint: SideHint::None,
        density: Density::Hard,
    }
}

fn back_cover() -> PageDescriptor {
    PageDescriptor {
        density: Density::Hard,
        ..PageDescriptor::structural(PageKind::BackCover)
    }
}

fn end_of_book(options: &ComposeOptions) -> PageDescriptor {
    PageDescriptor {
        content: PageContent {
            heading: Some(options.end_heading.clone()),
            message: Some(options.end_message.clone()),
            ..PageContent::default()
        },
        ..PageDescriptor::structural(PageKind::EndOfBook)
    }
}

/// Build a story page; Image pages drop the text, Text pages drop the image.
/// A missing image or text leaves the slot empty rather than skipping the page.
fn story_page(kind: PageKind, entry: &StoryEntry, number: usize, side_hint: SideHint) -> PageDescriptor {
    let wants_image = matches!(kind, PageKind::Image | PageKind::Combined);
    let wants_text = matches!(kind, PageKind::Text | PageKind::Combined);

    let image = entry.image_src().filter(|_| wants_image).map(str::to_string);
    let image_alt = image.as_ref().map(|_| {
        entry
            .image_alt
            .clone()
            .filter(|alt| !alt.is_empty())
            .unwrap_or_else(|| default_alt_text(number))
    });
    let text = entry.text_content().filter(|_| wants_text).map(str::to_string);

    PageDescriptor {
        kind,
        content: PageContent {
            image,
            image_alt,
            text,
            ..PageContent::default()
        },
        sequence_number: Some(number),
        side_hint,
        density: Density::Soft,
    }
}
