//! Pages and books
//!
//! A `Book` is an ordered, fixed-length sequence of `Page`s plus catalog
//! metadata. Pages are decoded once and never mutated by the viewer.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::KitabuError;

/// Catalog identifier of a book.
pub type BookId = u64;

/// One unit of displayable content: illustration, text, narration reference.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    /// Illustration URI.
    pub image: String,
    /// Text shown over the illustration.
    pub text: String,
    /// Narration audio URI. Playback is handled elsewhere.
    #[serde(rename = "audioRef", alias = "audioUrl", default)]
    pub audio_ref: String,
}

impl Page {
    /// Create a page from its three parts.
    pub fn new(
        image: impl Into<String>,
        text: impl Into<String>,
        audio_ref: impl Into<String>,
    ) -> Self {
        Self {
            image: image.into(),
            text: text.into(),
            audio_ref: audio_ref.into(),
        }
    }

    /// Whether a narration reference is attached (`#` counts as none).
    pub fn has_audio(&self) -> bool {
        !self.audio_ref.is_empty() && self.audio_ref != "#"
    }
}

/// Reading level shown in the reader footer and used by catalog filters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    /// First books.
    #[default]
    Beginner,
    /// Short chapters, longer sentences.
    Intermediate,
    /// Independent readers.
    Advanced,
}

impl Level {
    /// Footer label, e.g. `Beginner Level`.
    pub fn label(self) -> &'static str {
        match self {
            Level::Beginner => "Beginner Level",
            Level::Intermediate => "Intermediate Level",
            Level::Advanced => "Advanced Level",
        }
    }

    /// Lowercase name used in filters and JSON.
    pub fn as_str(self) -> &'static str {
        match self {
            Level::Beginner => "beginner",
            Level::Intermediate => "intermediate",
            Level::Advanced => "advanced",
        }
    }
}

/// A book with its metadata and page sequence.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    /// Catalog id.
    #[serde(default)]
    pub id: BookId,
    /// Display title.
    pub title: String,
    /// Author display name.
    #[serde(default)]
    pub author: String,
    /// Reading level.
    #[serde(default)]
    pub level: Level,
    /// Category, e.g. `Adventure`.
    #[serde(default)]
    pub category: Option<String>,
    /// Age band, e.g. `5-7`.
    #[serde(default)]
    pub age_group: Option<String>,
    /// Short blurb.
    #[serde(default)]
    pub description: String,
    /// Pages in reading order.
    pub pages: Vec<Page>,
}

impl Book {
    /// Decode a book from JSON.
    pub fn from_json(json: &str) -> Result<Self, KitabuError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and decode a book JSON file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, KitabuError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Number of pages.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Fail with `EmptyBook` unless the book can be opened in a viewer.
    pub fn ensure_readable(&self) -> Result<(), KitabuError> {
        if self.pages.is_empty() {
            return Err(KitabuError::EmptyBook {
                title: self.title.clone(),
            });
        }
        Ok(())
    }

    /// Catalog summary without the page payload.
    pub fn summary(&self) -> BookSummary {
        BookSummary {
            id: self.id,
            title: self.title.clone(),
            author: self.author.clone(),
            level: self.level,
            category: self.category.clone(),
            age_group: self.age_group.clone(),
            page_count: self.pages.len(),
        }
    }
}

/// Book listing entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookSummary {
    /// Catalog id.
    pub id: BookId,
    /// Display title.
    pub title: String,
    /// Author display name.
    pub author: String,
    /// Reading level.
    pub level: Level,
    /// Category, if any.
    pub category: Option<String>,
    /// Age band, if any.
    pub age_group: Option<String>,
    /// Number of pages.
    pub page_count: usize,
}
