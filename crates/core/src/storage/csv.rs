//! Delimited-text (CSV) catalog backend.

use std::fs;
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, WriterBuilder};
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::types::format_rating;
use super::{atomic_write, Catalog, MovieRecord, MovieStorage, StorageError};

const HEADERS: [&str; 6] = ["title", "year", "rating", "poster", "imdb_id", "notes"];

/// One data row. Year and rating travel as text at the file boundary.
/// `imdb_id` and `notes` default to empty so the 4-column legacy
/// schema still reads.
#[derive(Debug, Serialize, Deserialize)]
struct CsvRow {
    title: String,
    year: String,
    rating: String,
    poster: String,
    #[serde(default)]
    imdb_id: String,
    #[serde(default)]
    notes: String,
}

/// CSV-backed movie catalog. One header row, one data row per record.
pub struct CsvStorage {
    path: PathBuf,
}

impl CsvStorage {
    /// Open a CSV catalog, creating an empty one (header row only) if
    /// the file does not exist.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        if !path.exists() {
            atomic_write(&path, &empty_payload())?;
        }
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl MovieStorage for CsvStorage {
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
                    "Unreadable CSV catalog at {:?}, treating as empty: {}",
                    self.path, e
                );
                Ok(Catalog::new())
            }
        }
    }

    fn save(&self, catalog: &Catalog) -> Result<(), StorageError> {
        let payload = encode(catalog).map_err(StorageError::Encode)?;
        atomic_write(&self.path, &payload)
    }
}

fn empty_payload() -> String {
    format!("{}\n", HEADERS.join(","))
}

fn decode(raw: &str) -> Result<Catalog, String> {
    let mut reader = ReaderBuilder::new().from_reader(raw.as_bytes());
    let mut catalog = Catalog::new();

    for row in reader.deserialize() {
        let row: CsvRow = row.map_err(|e| e.to_string())?;
        let year = row
            .year
            .trim()
            .parse::<i32>()
            .map_err(|e| format!("bad year '{}': {}", row.year, e))?;
        let rating = row
            .rating
            .trim()
            .parse::<f64>()
            .map_err(|e| format!("bad rating '{}': {}", row.rating, e))?;
        catalog.insert(
            row.title,
            MovieRecord {
                year,
                rating,
                poster: row.poster,
                imdb_id: row.imdb_id,
                notes: row.notes,
            },
        );
    }

    Ok(catalog)
}

fn encode(catalog: &Catalog) -> Result<String, String> {
    let mut writer = WriterBuilder::new().has_headers(false).from_writer(Vec::new());

    // Write the header explicitly so an empty catalog still produces
    // a valid file.
    writer.write_record(HEADERS).map_err(|e| e.to_string())?;

    for (title, record) in catalog {
        writer
            .serialize(CsvRow {
                title: title.clone(),
                year: record.year.to_string(),
                rating: format_rating(record.rating),
                poster: record.poster.clone(),
                imdb_id: record.imdb_id.clone(),
                notes: record.notes.clone(),
            })
            .map_err(|e| e.to_string())?;
    }

    let bytes = writer.into_inner().map_err(|e| e.to_string())?;
    String::from_utf8(bytes).map_err(|e| e.to_string())
}
