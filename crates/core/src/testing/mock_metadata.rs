//! Mock metadata provider for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::metadata::{MetadataError, MetadataProvider, MovieMetadata};

/// Mock implementation of the MetadataProvider trait.
///
/// Provides controllable behavior for testing:
/// - Return canned metadata per title
/// - Track lookups for assertions
/// - Simulate failures
#[derive(Debug)]
pub struct MockMetadataProvider {
    /// Canned responses by title (exact match).
    responses: Arc<RwLock<HashMap<String, MovieMetadata>>>,
    /// Recorded lookup titles.
    lookups: Arc<RwLock<Vec<String>>>,
    /// If set, the next lookup will fail with this error.
    next_error: Arc<RwLock<Option<MetadataError>>>,
}

impl Default for MockMetadataProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MockMetadataProvider {
    /// Create a new empty mock provider. Every lookup misses until
    /// responses are added.
    pub fn new() -> Self {
        Self {
            responses: Arc::new(RwLock::new(HashMap::new())),
            lookups: Arc::new(RwLock::new(Vec::new())),
            next_error: Arc::new(RwLock::new(None)),
        }
    }

    /// Add a canned response for a title.
    pub async fn add_response(&self, metadata: MovieMetadata) {
        self.responses
            .write()
            .await
            .insert(metadata.title.clone(), metadata);
    }

    /// Make the next lookup fail with the given error.
    pub async fn set_next_error(&self, error: MetadataError) {
        *self.next_error.write().await = Some(error);
    }

    /// All titles looked up so far, in order.
    pub async fn lookups(&self) -> Vec<String> {
        self.lookups.read().await.clone()
    }
}

#[async_trait]
impl MetadataProvider for MockMetadataProvider {
    async fn fetch(&self, title: &str) -> Result<MovieMetadata, MetadataError> {
        self.lookups.write().await.push(title.to_string());

        if let Some(error) = self.next_error.write().await.take() {
            return Err(error);
        }

        self.responses
            .read()
            .await
            .get(title)
            .cloned()
            .ok_or_else(|| MetadataError::NotFound("Movie not found!".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures;

    #[tokio::test]
    async fn test_canned_response() {
        let provider = MockMetadataProvider::new();
        provider
            .add_response(fixtures::movie_metadata("Heat", 1995, 8.3))
            .await;

        let metadata = provider.fetch("Heat").await.unwrap();
        assert_eq!(metadata.year, 1995);
        assert_eq!(provider.lookups().await, vec!["Heat"]);
    }

    #[tokio::test]
    async fn test_unknown_title_misses() {
        let provider = MockMetadataProvider::new();
        let result = provider.fetch("Nonexistent").await;
        assert!(matches!(result, Err(MetadataError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_next_error_fires_once() {
        let provider = MockMetadataProvider::new();
        provider
            .add_response(fixtures::movie_metadata("Heat", 1995, 8.3))
            .await;
        provider
            .set_next_error(MetadataError::Api {
                status: 503,
                message: "unavailable".to_string(),
            })
            .await;

        assert!(provider.fetch("Heat").await.is_err());
        assert!(provider.fetch("Heat").await.is_ok());
    }
}
