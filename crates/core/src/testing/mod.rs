//! Testing utilities and mock implementations.
//!
//! Provides a mock metadata provider and catalog fixtures so the
//! interactive flows can be tested without network access or real
//! files.

mod mock_metadata;

pub use mock_metadata::MockMetadataProvider;

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::metadata::MovieMetadata;
    use crate::storage::{Catalog, MovieRecord};

    /// Create a test movie record with reasonable defaults.
    pub fn movie_record(year: i32, rating: f64) -> MovieRecord {
        MovieRecord {
            year,
            rating,
            poster: "https://example.com/poster.jpg".to_string(),
            imdb_id: "tt0000001".to_string(),
            notes: String::new(),
        }
    }

    /// A small catalog with a fixed insertion order.
    pub fn sample_catalog() -> Catalog {
        let mut catalog = Catalog::new();
        catalog.insert("The Godfather".to_string(), movie_record(1972, 9.2));
        catalog.insert("Anora".to_string(), movie_record(2024, 7.6));
        catalog.insert("Heat".to_string(), movie_record(1995, 8.3));
        catalog
    }

    /// Create test metadata as a provider would return it.
    pub fn movie_metadata(title: &str, year: i32, rating: f64) -> MovieMetadata {
        MovieMetadata {
            title: title.to_string(),
            year,
            rating,
            poster: "https://example.com/poster.jpg".to_string(),
            imdb_id: format!("tt-{}", title.to_lowercase().replace(' ', "-")),
        }
    }
}
