//! Renders a response payload into the results fragment.
//!
//! Three outcomes are possible:
//!
//! - **Error**: the request or the species lookup failed outright; only an
//!   error block is produced.
//! - **Partial**: the lookup failed but a title is known; a reduced card with
//!   a warning notice is produced.
//! - **Full**: classification, habitat, fun facts, gallery and sources.
//!
//! Markup lives in the askama templates under `templates/`, which escape every plain-text
//! field. Image captions, authors and licenses arrive as HTML fragments from
//! the image search; they are sanitized with ammonia and emitted as markup.
//!
//! Rendering is pure; injecting the fragment into the page is the caller's job.

use askama::Template;

use crate::constants::DEFAULT_PLACEHOLDER_IMAGE_URL;
use crate::model::{Image, SpeciesData, UploadResult};

const NO_DESCRIPTION: &str = "No description available.";
const NO_IMAGE_DESCRIPTION: &str = "No description available";
const NO_HABITAT: &str = "Habitat information not available.";

/// Which branch the renderer took.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderKind {
    /// Standalone error block
    Error,
    /// Reduced card with a warning notice
    Partial,
    /// Complete species card
    Full,
}

impl RenderKind {
    pub fn name(&self) -> &'static str {
        match self {
            RenderKind::Error => "error",
            RenderKind::Partial => "partial",
            RenderKind::Full => "full",
        }
    }
}

/// A rendered results fragment.
#[derive(Debug, Clone)]
pub struct RenderedResults {
    pub kind: RenderKind,
    pub html: String,
}

#[derive(Template)]
#[template(path = "error.html")]
struct ErrorBlock<'a> {
    message: &'a str,
}

#[derive(Template)]
#[template(path = "species_header.html")]
struct PartialCard<'a> {
    image_url: &'a str,
    title: &'a str,
    notice: Option<&'a str>,
    description: &'a str,
}

#[derive(Template)]
#[template(path = "full.html")]
struct FullCard<'a> {
    image_url: &'a str,
    title: &'a str,
    notice: Option<&'a str>,
    description: &'a str,
    ranks: Vec<RankRow<'a>>,
    habitat: &'a str,
    fun_facts: &'a [String],
    no_images: bool,
    tiles: Vec<GalleryTile<'a>>,
    data_sources: Option<String>,
}

struct RankRow<'a> {
    name: String,
    taxon: &'a str,
}

struct GalleryTile<'a> {
    src: &'a str,
    alt: &'a str,
    /// Sanitized markup
    caption: String,
    /// Sanitized markup
    author: String,
    /// Sanitized markup
    license: Option<String>,
}

impl<'a> GalleryTile<'a> {
    fn new(image: &'a Image) -> Self {
        Self {
            src: image.display_url(),
            alt: &image.title,
            caption: ammonia::clean(image.description().unwrap_or(NO_IMAGE_DESCRIPTION)),
            author: ammonia::clean(image.author()),
            license: image.license().map(ammonia::clean),
        }
    }
}

/// Turns response payloads into HTML.
#[derive(Debug, Clone)]
pub struct ResultRenderer {
    placeholder_url: String,
}

impl Default for ResultRenderer {
    fn default() -> Self {
        Self::new(DEFAULT_PLACEHOLDER_IMAGE_URL)
    }
}

impl ResultRenderer {
    /// Create a renderer that falls back to `placeholder_url` for the main image.
    pub fn new(placeholder_url: impl Into<String>) -> Self {
        Self {
            placeholder_url: placeholder_url.into(),
        }
    }

    /// Main image URL: the first image if it did not fail, else the placeholder.
    pub fn main_image_url<'a>(&'a self, result: &'a UploadResult) -> &'a str {
        result.main_image_url().unwrap_or(&self.placeholder_url)
    }

    /// Render a response payload.
    pub fn render(&self, result: &UploadResult) -> askama::Result<RenderedResults> {
        if let Some(error) = result.error_text() {
            return Ok(RenderedResults {
                kind: RenderKind::Error,
                html: ErrorBlock { message: &error }.render()?,
            });
        }

        let species = &result.species_data;
        if let Some(error) = species.error_text() {
            let rendered = match species.title() {
                Some(title) => RenderedResults {
                    kind: RenderKind::Partial,
                    html: PartialCard {
                        image_url: self.main_image_url(result),
                        title,
                        notice: Some(error.as_str()),
                        description: species.description().unwrap_or(NO_DESCRIPTION),
                    }
                    .render()?,
                },
                None => RenderedResults {
                    kind: RenderKind::Error,
                    html: ErrorBlock { message: &error }.render()?,
                },
            };
            return Ok(rendered);
        }

        Ok(RenderedResults {
            kind: RenderKind::Full,
            html: self.full_card(result).render()?,
        })
    }

    fn full_card<'a>(&'a self, result: &'a UploadResult) -> FullCard<'a> {
        let species = &result.species_data;
        FullCard {
            image_url: self.main_image_url(result),
            title: species.title().unwrap_or_default(),
            notice: None,
            description: species.description().unwrap_or(NO_DESCRIPTION),
            ranks: rank_rows(species),
            habitat: species.habitat().unwrap_or(NO_HABITAT),
            fun_facts: species.fun_facts(),
            no_images: result.images.is_empty(),
            tiles: result
                .images
                .iter()
                .filter(|image| !image.has_error())
                .map(GalleryTile::new)
                .collect(),
            data_sources: species.data_sources.as_ref().map(|sources| sources.join(", ")),
        }
    }
}

fn rank_rows(species: &SpeciesData) -> Vec<RankRow<'_>> {
    species
        .classification
        .known()
        .map(|(rank, taxon)| RankRow {
            name: capitalize_first(rank),
            taxon,
        })
        .collect()
}

/// Uppercase the first character, leaving the rest untouched.
pub fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
