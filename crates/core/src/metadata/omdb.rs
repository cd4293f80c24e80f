//! OMDb (Open Movie Database) API client.
//!
//! OMDb requires an API key and returns errors in-band: a 200 response
//! with `"Response": "False"` signals a miss, so parsing has to check
//! the body rather than the status code alone.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::types::MovieMetadata;
use super::{MetadataError, MetadataProvider};

const RETRY_ATTEMPTS: u32 = 3;
const RETRY_DELAY: Duration = Duration::from_millis(500);

/// OMDb API client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OmdbConfig {
    /// OMDb API key (required).
    pub api_key: String,
    /// Base URL (default: http://www.omdbapi.com).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

/// OMDb API client.
pub struct OmdbClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl OmdbClient {
    /// Create a new OMDb client.
    pub fn new(config: OmdbConfig) -> Result<Self, MetadataError> {
        if config.api_key.is_empty() {
            return Err(MetadataError::NotConfigured(
                "OMDb API key is required".to_string(),
            ));
        }

        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;

        let base_url = config
            .base_url
            .unwrap_or_else(|| "http://www.omdbapi.com".to_string());

        Ok(Self {
            client,
            base_url,
            api_key: config.api_key,
        })
    }

    async fn fetch_once(&self, title: &str) -> Result<MovieMetadata, MetadataError> {
        debug!("OMDb lookup: title='{}'", title);

        let response = self
            .client
            .get(&self.base_url)
            .query(&[("apikey", self.api_key.as_str()), ("t", title)])
            .send()
            .await?;

        let status = response.status();
        if status == 401 {
            return Err(MetadataError::NotConfigured(
                "Invalid OMDb API key".to_string(),
            ));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MetadataError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let result: OmdbResponse = response.json().await.map_err(|e| {
            MetadataError::Parse(format!("Failed to parse OMDb response: {}", e))
        })?;

        result.try_into()
    }
}

#[async_trait]
impl MetadataProvider for OmdbClient {
    /// Look up a movie, retrying transient failures a few times.
    async fn fetch(&self, title: &str) -> Result<MovieMetadata, MetadataError> {
        let mut attempt = 1;
        loop {
            match self.fetch_once(title).await {
                Ok(metadata) => return Ok(metadata),
                Err(e) if attempt < RETRY_ATTEMPTS && is_transient(&e) => {
                    warn!(
                        "OMDb lookup failed (attempt {}/{}): {}",
                        attempt, RETRY_ATTEMPTS, e
                    );
                    tokio::time::sleep(RETRY_DELAY).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

/// Whether an error is worth retrying: network trouble or a server-side
/// failure. Misses and auth errors are final.
fn is_transient(error: &MetadataError) -> bool {
    match error {
        MetadataError::Http(e) => e.is_timeout() || e.is_connect(),
        MetadataError::Api { status, .. } => *status >= 500,
        _ => false,
    }
}

// ============================================================================
// OMDb API Response Types (private)
// ============================================================================

#[derive(Debug, Deserialize)]
struct OmdbResponse {
    #[serde(rename = "Response")]
    response: String,
    #[serde(rename = "Error", default)]
    error: Option<String>,
    #[serde(rename = "Title", default)]
    title: Option<String>,
    #[serde(rename = "Year", default)]
    year: Option<String>,
    #[serde(rename = "imdbRating", default)]
    imdb_rating: Option<String>,
    #[serde(rename = "Poster", default)]
    poster: Option<String>,
    #[serde(rename = "imdbID", default)]
    imdb_id: Option<String>,
}

impl TryFrom<OmdbResponse> for MovieMetadata {
    type Error = MetadataError;

    fn try_from(r: OmdbResponse) -> Result<Self, MetadataError> {
        if r.response != "True" {
            return Err(MetadataError::NotFound(
                r.error.unwrap_or_else(|| "Movie not found!".to_string()),
            ));
        }

        let title = r
            .title
            .ok_or_else(|| MetadataError::Parse("missing Title field".to_string()))?;

        Ok(MovieMetadata {
            title,
            year: normalize_year(r.year.as_deref()),
            rating: normalize_rating(r.imdb_rating.as_deref()),
            poster: normalize_poster(r.poster),
            imdb_id: r.imdb_id.unwrap_or_default(),
        })
    }
}

/// OMDb years come as "1999", "2008-2013" or "N/A"; take the leading
/// digits, defaulting to 0.
fn normalize_year(year: Option<&str>) -> i32 {
    year.unwrap_or_default()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect::<String>()
        .parse()
        .unwrap_or(0)
}

/// Ratings come as "8.2" or "N/A".
fn normalize_rating(rating: Option<&str>) -> f64 {
    rating.unwrap_or_default().parse().unwrap_or(0.0)
}

fn normalize_poster(poster: Option<String>) -> String {
    match poster {
        Some(p) if p != "N/A" => p,
        _ => String::new(),
    }
}
