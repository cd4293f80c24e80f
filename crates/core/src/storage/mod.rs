//! Movie catalog persistence.
//!
//! Two interchangeable flat-file backends (delimited CSV and a single
//! JSON document) behind one trait. Every mutation follows the same
//! protocol: read the full catalog, apply one change, write the full
//! catalog back in a single atomic replace.

mod csv;
mod json;
mod types;

pub use csv::CsvStorage;
pub use json::JsonStorage;
pub use types::*;

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Trait for movie catalog storage.
///
/// `list` and `save` are the backend-specific primitives. The mutating
/// operations are provided methods built on the shared read-full /
/// apply-one-change / write-full protocol, so the backends cannot
/// drift apart in behavior.
pub trait MovieStorage: Send + Sync {
    /// Read the backing file in full.
    ///
    /// A missing file yields an empty catalog. An unparseable file is
    /// recovered to an empty catalog and logged, never propagated;
    /// callers treat "empty" and "no file" identically.
    fn list(&self) -> Result<Catalog, StorageError>;

    /// Replace the backing file with the given catalog in one atomic
    /// rewrite (temp file plus rename, no truncate-in-place).
    fn save(&self, catalog: &Catalog) -> Result<(), StorageError>;

    /// True iff `title` is a key in the current catalog. Exact,
    /// case-sensitive match, unlike the fuzzy matcher.
    fn exists(&self, title: &str) -> Result<bool, StorageError> {
        Ok(self.list()?.contains_key(title))
    }

    /// Insert a new record with empty notes.
    ///
    /// If the title already exists, the unchanged catalog is still
    /// rewritten and `AlreadyExists` is reported.
    fn add(
        &self,
        title: &str,
        year: i32,
        rating: f64,
        poster: &str,
        imdb_id: &str,
    ) -> Result<(), StorageError> {
        let mut catalog = self.list()?;
        if catalog.contains_key(title) {
            self.save(&catalog)?;
            return Err(StorageError::AlreadyExists(title.to_string()));
        }
        catalog.insert(
            title.to_string(),
            MovieRecord {
                year,
                rating,
                poster: poster.to_string(),
                imdb_id: imdb_id.to_string(),
                notes: String::new(),
            },
        );
        self.save(&catalog)
    }

    /// Remove a record. A missing title still rewrites the unchanged
    /// catalog and reports `NotFound`.
    fn delete(&self, title: &str) -> Result<(), StorageError> {
        let mut catalog = self.list()?;
        if catalog.shift_remove(title).is_none() {
            self.save(&catalog)?;
            return Err(StorageError::NotFound(title.to_string()));
        }
        self.save(&catalog)
    }

    /// Overwrite rating and notes, leaving the other fields untouched.
    fn update(&self, title: &str, rating: f64, notes: &str) -> Result<(), StorageError> {
        let mut catalog = self.list()?;
        match catalog.get_mut(title) {
            Some(record) => {
                record.rating = rating;
                record.notes = notes.to_string();
                self.save(&catalog)
            }
            None => {
                self.save(&catalog)?;
                Err(StorageError::NotFound(title.to_string()))
            }
        }
    }
}

/// Backend selection derived from the catalog file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageFormat {
    Csv,
    Json,
}

impl StorageFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        match path
            .extension()
            .and_then(|e| e.to_str())?
            .to_ascii_lowercase()
            .as_str()
        {
            "csv" => Some(Self::Csv),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Open the storage backend matching the file extension, creating a
/// valid empty catalog file if the path does not exist.
pub fn open_storage(path: &Path) -> Result<Box<dyn MovieStorage>, StorageError> {
    match StorageFormat::from_path(path) {
        Some(StorageFormat::Csv) => Ok(Box::new(CsvStorage::open(path)?)),
        Some(StorageFormat::Json) => Ok(Box::new(JsonStorage::open(path)?)),
        None => Err(StorageError::UnsupportedFormat(path.display().to_string())),
    }
}

/// Write `contents` to `path` via a temp file and rename, so a reader
/// never observes a partially written catalog.
pub(crate) fn atomic_write(path: &Path, contents: &str) -> Result<(), StorageError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let tmp = tmp_path(path);
    {
        let mut file = fs::File::create(&tmp)?;
        file.write_all(contents.as_bytes())?;
        file.sync_all()?;
    }
    fs::rename(&tmp, path)?;
    Ok(())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
