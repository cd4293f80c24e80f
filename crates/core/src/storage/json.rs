//! Structured-document (JSON) catalog backend.
//!
//! The whole catalog is one pretty-printed object keyed by title, so
//! the file stays human-diffable.

use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::types::format_rating;
use super::{atomic_write, Catalog, MovieRecord, MovieStorage, StorageError};

/// On-disk value shape for writing. Year and rating are serialized as
/// text at the store boundary.
#[derive(Debug, Serialize)]
struct MovieOut<'a> {
    year: String,
    rating: String,
    poster: &'a str,
    imdb_id: &'a str,
    notes: &'a str,
}

/// On-disk value shape for reading. Files written by earlier versions
/// carried year/rating as either text or numbers; both are accepted.
#[derive(Debug, Deserialize)]
struct MovieIn {
    year: NumOrText,
    rating: NumOrText,
    #[serde(default)]
    poster: String,
    #[serde(default)]
    imdb_id: String,
    #[serde(default)]
    notes: String,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum NumOrText {
    Num(f64),
    Text(String),
}

impl NumOrText {
    fn as_f64(&self) -> Result<f64, String> {
        match self {
            NumOrText::Num(n) => Ok(*n),
            NumOrText::Text(s) => s
                .trim()
                .parse::<f64>()
                .map_err(|e| format!("bad number '{}': {}", s, e)),
        }
    }

    fn as_year(&self) -> Result<i32, String> {
        Ok(self.as_f64()? as i32)
    }
}

/// JSON-backed movie catalog.
pub struct JsonStorage {
    path: PathBuf,
}

impl JsonStorage {
    /// Open a JSON catalog, creating an empty document (`{}`) if the
    /// file does not exist.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        if !path.exists() {
            atomic_write(&path, "{}")?;
        }
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl MovieStorage for JsonStorage {
    fn list(&self) -> Result<Catalog, StorageError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Catalog::new()),
            Err(e) => return Err(e.into()),
        };

        match decode(&raw) {
            Ok(catalog) => Ok(catalog),
            Err(e) => {
                warn!(
                    "Unreadable JSON catalog at {:?}, treating as empty: {}",
                    self.path, e
                );
                Ok(Catalog::new())
            }
        }
    }

    fn save(&self, catalog: &Catalog) -> Result<(), StorageError> {
        let document: IndexMap<&String, MovieOut> = catalog
            .iter()
            .map(|(title, record)| {
                (
                    title,
                    MovieOut {
                        year: record.year.to_string(),
                        rating: format_rating(record.rating),
                        poster: &record.poster,
                        imdb_id: &record.imdb_id,
                        notes: &record.notes,
                    },
                )
            })
            .collect();

        let payload = serde_json::to_string_pretty(&document)
            .map_err(|e| StorageError::Encode(e.to_string()))?;
        atomic_write(&self.path, &payload)
    }
}

fn decode(raw: &str) -> Result<Catalog, String> {
    let document: IndexMap<String, MovieIn> =
        serde_json::from_str(raw).map_err(|e| e.to_string())?;

    let mut catalog = Catalog::new();
    for (title, movie) in document {
        catalog.insert(
            title,
            MovieRecord {
                year: movie.year.as_year()?,
                rating: movie.rating.as_f64()?,
                poster: movie.poster,
                imdb_id: movie.imdb_id,
                notes: movie.notes,
            },
        );
    }
    Ok(catalog)
}
