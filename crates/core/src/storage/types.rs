//! Types for the movie catalog storage layer.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single movie entry. The title lives as the key in the [`Catalog`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieRecord {
    /// Release year.
    pub year: i32,
    /// Rating in [0, 10]. Numeric in memory, text on disk.
    pub rating: f64,
    /// Poster image URL (opaque to the catalog).
    pub poster: String,
    /// IMDb identifier (may be empty).
    #[serde(default)]
    pub imdb_id: String,
    /// Free-text notes.
    #[serde(default)]
    pub notes: String,
}

/// The full catalog: titles to records, unique keys, insertion order
/// preserved (the backends' natural iteration order).
pub type Catalog = IndexMap<String, MovieRecord>;

/// Errors for storage operations.
///
/// `NotFound` and `AlreadyExists` are reported outcomes, not failures:
/// the whole-catalog rewrite has already completed as a no-op when they
/// are returned.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Movie not found: {0}")]
    NotFound(String),

    #[error("Movie already exists: {0}")]
    AlreadyExists(String),

    #[error("Failed to encode catalog: {0}")]
    Encode(String),

    #[error("Unsupported catalog format: {0} (expected .csv or .json)")]
    UnsupportedFormat(String),
}

/// Serialize a rating for the file boundary.
pub(crate) fn format_rating(rating: f64) -> String {
    rating.to_string()
}
