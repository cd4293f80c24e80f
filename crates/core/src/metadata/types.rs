use serde::{Deserialize, Serialize};

/// Movie details as returned by a metadata provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieMetadata {
    pub title: String,
    pub year: i32,
    pub rating: f64,
    pub poster: String,
    pub imdb_id: String,
}
