//! Book document models
//!
//! A `BookDocument` is the validated, immutable in-memory form of a storybook
//! JSON resource. It is produced once per load by the loader and never mutated.

use serde::{Deserialize, Serialize};

/// Validated storybook (title plus ordered story entries)
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct BookDocument {
    /// Book title shown on the front cover and used as the document title
    pub title: String,

    /// Optional cover subtitle
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,

    /// Story entries in reading order (may be empty)
    pub pages: Vec<StoryEntry>,
}

/// One unit of narrative content: an optional illustration and optional text
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StoryEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_alt: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl BookDocument {
    /// Create a document with a title and no story entries
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            subtitle: None,
            pages: Vec::new(),
        }
    }

    /// Builder-style subtitle setter
    pub fn with_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }

    /// Builder-style entry append
    pub fn with_entry(mut self, entry: StoryEntry) -> Self {
        self.pages.push(entry);
        self
    }

    /// Number of story entries
    pub fn entry_count(&self) -> usize {
        self.pages.len()
    }

    /// Subtitle if present and non-empty
    pub fn subtitle_text(&self) -> Option<&str> {
        self.subtitle.as_deref().filter(|s| !s.is_empty())
    }
}

impl StoryEntry {
    pub fn new(image: Option<&str>, text: Option<&str>) -> Self {
        Self {
            image: image.map(str::to_string),
            image_alt: None,
            text: text.map(str::to_string),
        }
    }

    /// Image URL if present and non-empty
    pub fn image_src(&self) -> Option<&str> {
        self.image.as_deref().filter(|s| !s.is_empty())
    }

    /// Story text if present and non-empty
    pub fn text_content(&self) -> Option<&str> {
        self.text.as_deref().filter(|s| !s.is_empty())
    }

    /// True when the entry carries neither an image nor text
    pub fn is_empty(&self) -> bool {
        self.image_src().is_none() && self.text_content().is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_deserializes_camel_case_alt() {
        let entry: StoryEntry =
            serde_json::from_str(r#"{"image":"a.jpg","imageAlt":"An ark","text":"Rain"}"#).unwrap();
        assert_eq!(entry.image_src(), Some("a.jpg"));
        assert_eq!(entry.image_alt.as_deref(), Some("An ark"));
        assert_eq!(entry.text_content(), Some("Rain"));
    }

    #[test]
    fn test_empty_strings_count_as_absent() {
        let entry = StoryEntry::new(Some(""), Some(""));
        assert!(entry.is_empty());

        let doc = BookDocument::new("Nuh").with_subtitle("");
        assert_eq!(doc.subtitle_text(), None);
    }

    #[test]
    fn test_unknown_fields_are_ignored() {
        let doc: BookDocument =
            serde_json::from_str(r#"{"title":"Nuh","author":"x","pages":[{"text":"a","mood":"calm"}]}"#)
                .unwrap();
        assert_eq!(doc.entry_count(), 1);
    }
}
