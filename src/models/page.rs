//! Page descriptor models
//!
//! A `PageDescriptor` is one renderable leaf of the composed book. Sequences of
//! descriptors are produced by the composer, handed to the flip widget, and
//! replaced wholesale on every recomposition.

use serde::{Deserialize, Serialize};

/// Structural kind of a composed page
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum PageKind {
    FrontCover,
    BackCover,
    Blank,
    Image,
    Text,
    Combined,
    EndOfBook,
}

/// Which leaf of a spread a page prefers (Compact layout only)
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum SideHint {
    #[default]
    None,
    Left,
    Right,
}

/// Page stiffness as understood by the flip widget
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum Density {
    /// Stiff, non-flexing page (covers)
    Hard,
    #[default]
    Soft,
}

/// Content carried by a page; which fields are set depends on the page kind
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PageContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    /// Alt text for `image`; always filled when `image` is
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_alt: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    /// End-of-book heading
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heading: Option<String>,

    /// End-of-book closing line
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// One renderable page in a composed sequence
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PageDescriptor {
    pub kind: PageKind,

    pub content: PageContent,

    /// Story page number (1-based); `None` for structural pages.
    /// Used for alt text and ordering only, never for identity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sequence_number: Option<usize>,

    #[serde(default)]
    pub side_hint: SideHint,

    #[serde(default)]
    pub density: Density,
}

impl PageDescriptor {
    /// Create a content-less soft page of the given kind
    pub fn structural(kind: PageKind) -> Self {
        Self {
            kind,
            content: PageContent::default(),
            sequence_number: None,
            side_hint: SideHint::None,
            density: Density::Soft,
        }
    }

    /// True for story pages (Image, Text, Combined)
    pub fn is_story_page(&self) -> bool {
        matches!(self.kind, PageKind::Image | PageKind::Text | PageKind::Combined)
    }

    /// Text a narrator would read for this page, if any
    ///
    /// Story pages contribute their text, the front cover its title and
    /// subtitle, and the end page its heading and closing line.
    pub fn speakable_text(&self) -> Option<String> {
        let parts: Vec<&str> = match self.kind {
            PageKind::Text | PageKind::Combined => self.content.text.iter().map(String::as_str).collect(),
            PageKind::FrontCover => self
                .content
                .title
                .iter()
                .chain(self.content.subtitle.iter())
                .map(String::as_str)
                .collect(),
            PageKind::EndOfBook => self
                .content
                .heading
                .iter()
                .chain(self.content.message.iter())
                .map(String::as_str)
                .collect(),
            PageKind::Image | PageKind::Blank | PageKind::BackCover => Vec::new(),
        };

        let joined = parts
            .into_iter()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(". ");

        if joined.is_empty() {
            None
        } else {
            Some(joined)
        }
    }
}
