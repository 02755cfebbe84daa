//! Content and profile supply
//!
//! Views never own their data; they ask a `CatalogProvider`. `StaticCatalog`
//! serves a JSON document held in memory, which is what the demo data and
//! the tests use. A networked provider implements the same trait.

use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::KitabuError;
use crate::page::{Book, BookId, BookSummary, Level};
use crate::profile::{Profile, Role};

/// Listing filter. Unset fields match everything.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BookFilter {
    /// Exact category.
    pub category: Option<String>,
    /// Exact age band.
    pub age_group: Option<String>,
    /// Exact level.
    pub level: Option<Level>,
}

impl BookFilter {
    /// Filter that matches every book.
    pub fn any() -> Self {
        Self::default()
    }

    /// Restrict to a category.
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Restrict to an age band.
    pub fn with_age_group(mut self, age_group: impl Into<String>) -> Self {
        self.age_group = Some(age_group.into());
        self
    }

    /// Restrict to a level.
    pub fn with_level(mut self, level: Level) -> Self {
        self.level = Some(level);
        self
    }

    /// Whether `book` passes every set criterion.
    pub fn matches(&self, book: &Book) -> bool {
        fn field_matches(want: &Option<String>, have: &Option<String>) -> bool {
            match want {
                None => true,
                Some(want) => have.as_deref() == Some(want.as_str()),
            }
        }
        field_matches(&self.category, &book.category)
            && field_matches(&self.age_group, &book.age_group)
            && self.level.map_or(true, |level| level == book.level)
    }
}

/// Source of books and profiles.
pub trait CatalogProvider {
    /// Books matching `filter`, in catalog order.
    fn books(&self, filter: &BookFilter) -> Result<Vec<BookSummary>, KitabuError>;

    /// Full book with its pages.
    fn book(&self, id: BookId) -> Result<Book, KitabuError>;

    /// Profile shown on the dashboard of `role`.
    fn profile(&self, role: Role) -> Result<Profile, KitabuError>;
}

/// In-memory catalog decoded from JSON.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaticCatalog {
    #[serde(default)]
    books: Vec<Book>,
    #[serde(default)]
    profiles: Vec<Profile>,
}

impl StaticCatalog {
    /// Build from parts.
    pub fn new(books: Vec<Book>, profiles: Vec<Profile>) -> Self {
        Self { books, profiles }
    }

    /// Decode `{"books": [...], "profiles": [...]}`.
    pub fn from_json(json: &str) -> Result<Self, KitabuError> {
        let catalog: Self = serde_json::from_str(json)?;
        debug!(
            "catalog loaded: {} books, {} profiles",
            catalog.books.len(),
            catalog.profiles.len()
        );
        Ok(catalog)
    }

    /// Read and decode a catalog file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, KitabuError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}

impl CatalogProvider for StaticCatalog {
    fn books(&self, filter: &BookFilter) -> Result<Vec<BookSummary>, KitabuError> {
        Ok(self
            .books
            .iter()
            .filter(|book| filter.matches(book))
            .map(Book::summary)
            .collect())
    }

    fn book(&self, id: BookId) -> Result<Book, KitabuError> {
        self.books
            .iter()
            .find(|book| book.id == id)
            .cloned()
            .ok_or(KitabuError::BookNotFound { id })
    }

    fn profile(&self, role: Role) -> Result<Profile, KitabuError> {
        self.profiles
            .iter()
            .find(|profile| profile.role() == role)
            .cloned()
            .ok_or_else(|| KitabuError::ProfileNotFound {
                role: role.as_str().to_string(),
            })
    }
}
