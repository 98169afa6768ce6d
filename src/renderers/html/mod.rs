//! HTML page renderer
//!
//! Renders each `PageDescriptor` to the HTML fragment the flip widget loads
//! as one page. Markup comes from Mustache templates, which HTML-escape every
//! interpolated value, so book text and URLs are safe to insert.
//!
//! Class names the stylesheet relies on:
//! - `book-page` on every page; `front-cover`, `back-cover`, `empty-page`,
//!   `end-of-book-page` on structural pages
//! - `--left` / `--right` from the page's side hint
//! - `page-content`, plus `image-page` / `text-page` on split story pages

use serde::Serialize;
use thiserror::Error;

use crate::models::{PageDescriptor, PageKind, SideHint};

/// Shown in place of an illustration that fails to load ("Image not found")
pub const IMAGE_FALLBACK_SRC: &str = "data:image/svg+xml;base64,PHN2ZyB3aWR0aD0iMzAwIiBoZWlnaHQ9IjIwMCIgeG1sbnM9Imh0dHA6Ly93d3cudzMub3JnLzIwMDAvc3ZnIj48cmVjdCB3aWR0aD0iMTAwJSIgaGVpZ2h0PSIxMDAlIiBmaWxsPSIjZjBmMGYwIi8+PHRleHQgeD0iNTAlIiB5PSI1MCUiIGZvbnQtZmFtaWx5PSJBcmlhbCwgc2Fucy1zZXJpZiIgZm9udC1zaXplPSIxNCIgZmlsbD0iIzk5OSIgdGV4dC1hbmNob3I9Im1pZGRsZSIgZHk9Ii4zZW0iPkltYWdlIG5vdCBmb3VuZDwvdGV4dD48L3N2Zz4=";

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RenderError {
    #[error("template error: {0}")]
    Template(String),
}

impl From<mustache::Error> for RenderError {
    fn from(err: mustache::Error) -> Self {
        RenderError::Template(err.to_string())
    }
}

/// Template data for one page
#[derive(Debug, Clone, Default, Serialize)]
struct PageContext {
    classes: String,
    content_classes: String,
    title: String,
    subtitle: String,
    has_number: bool,
    page_number: usize,
    has_image: bool,
    image: String,
    image_alt: String,
    fallback_src: String,
    has_text: bool,
    text: String,
    heading: String,
    message: String,
}

/// Compiled page templates
pub struct HtmlPageRenderer {
    front_cover: mustache::Template,
    back_cover: mustache::Template,
    blank: mustache::Template,
    story: mustache::Template,
    end_of_book: mustache::Template,
}

impl HtmlPageRenderer {
    pub fn new() -> Result<Self, RenderError> {
        Ok(Self {
            front_cover: mustache::compile_str(include_str!("templates/front_cover.html.mustache"))?,
            back_cover: mustache::compile_str(include_str!("templates/back_cover.html.mustache"))?,
            blank: mustache::compile_str(include_str!("templates/blank.html.mustache"))?,
            story: mustache::compile_str(include_str!("templates/story.html.mustache"))?,
            end_of_book: mustache::compile_str(include_str!("templates/end_of_book.html.mustache"))?,
        })
    }

    /// Render one page to an HTML fragment
    pub fn render_page(&self, page: &PageDescriptor) -> Result<String, RenderError> {
        let template = match page.kind {
            PageKind::FrontCover => &self.front_cover,
            PageKind::BackCover => &self.back_cover,
            PageKind::Blank => &self.blank,
            PageKind::Image | PageKind::Text | PageKind::Combined => &self.story,
            PageKind::EndOfBook => &self.end_of_book,
        };
        let html = template.render_to_string(&page_context(page))?;
        Ok(html.trim().to_string())
    }

    /// Render a whole sequence, in order
    pub fn render_pages(&self, pages: &[PageDescriptor]) -> Result<Vec<String>, RenderError> {
        pages.iter().map(|page| self.render_page(page)).collect()
    }
}

/// Render a sequence with freshly compiled templates
pub fn render_pages(pages: &[PageDescriptor]) -> Result<Vec<String>, RenderError> {
    HtmlPageRenderer::new()?.render_pages(pages)
}

fn page_context(page: &PageDescriptor) -> PageContext {
    let content = &page.content;
    let image = content.image.clone().unwrap_or_default();
    let text = content.text.clone().unwrap_or_default();

    PageContext {
        classes: page_classes(page),
        content_classes: content_classes(page.kind).to_string(),
        title: content.title.clone().unwrap_or_default(),
        subtitle: content.subtitle.clone().unwrap_or_default(),
        has_number: page.sequence_number.is_some(),
        page_number: page.sequence_number.unwrap_or_default(),
        has_image: !image.is_empty(),
        image,
        image_alt: content.image_alt.clone().unwrap_or_default(),
        fallback_src: IMAGE_FALLBACK_SRC.to_string(),
        has_text: !text.is_empty(),
        text,
        heading: content.heading.clone().unwrap_or_default(),
        message: content.message.clone().unwrap_or_default(),
    }
}

fn page_classes(page: &PageDescriptor) -> String {
    let mut classes = vec!["book-page"];
    match page.kind {
        PageKind::FrontCover => classes.push("front-cover"),
        PageKind::BackCover => classes.push("back-cover"),
        PageKind::Blank => classes.push("empty-page"),
        PageKind::EndOfBook => classes.push("end-of-book-page"),
        PageKind::Image | PageKind::Text | PageKind::Combined => {}
    }
    match page.side_hint {
        SideHint::Left => classes.push("--left"),
        SideHint::Right => classes.push("--right"),
        SideHint::None => {}
    }
    classes.join(" ")
}

fn content_classes(kind: PageKind) -> &'static str {
    match kind {
        PageKind::Image => "page-content image-page",
        PageKind::Text => "page-content text-page",
        _ => "page-content",
    }
}
