//! External movie metadata lookup.
//!
//! Clients for fetching title, year, rating and poster information
//! from external databases, used to fill in movie details from just a
//! title.

mod omdb;
mod types;

pub use omdb::{OmdbClient, OmdbConfig};
pub use types::MovieMetadata;

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur when fetching metadata.
#[derive(Debug, Error)]
pub enum MetadataError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// No movie found for the requested title.
    #[error("Movie not found: {0}")]
    NotFound(String),

    /// API returned an error.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Failed to parse response.
    #[error("Failed to parse response: {0}")]
    Parse(String),

    /// Client not configured (missing API key, etc.).
    #[error("Client not configured: {0}")]
    NotConfigured(String),
}

/// Trait for metadata providers, keyed by movie title.
#[async_trait]
pub trait MetadataProvider: Send + Sync {
    /// Look up a movie by title.
    async fn fetch(&self, title: &str) -> Result<MovieMetadata, MetadataError>;
}
