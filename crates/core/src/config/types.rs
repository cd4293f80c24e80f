use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::metadata::OmdbConfig;

/// Root configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Catalog storage settings
    #[serde(default)]
    pub storage: StorageConfig,

    /// OMDb metadata lookup (optional, disabled when absent)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub omdb: Option<OmdbConfig>,

    /// Website generation settings
    #[serde(default)]
    pub gallery: GalleryConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage: StorageConfig::default(),
            omdb: None,
            gallery: GalleryConfig::default(),
        }
    }
}

/// Catalog storage configuration. The file extension selects the
/// backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Catalog file path (.json or .csv)
    #[serde(default = "default_storage_path")]
    pub path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: default_storage_path(),
        }
    }
}

fn default_storage_path() -> PathBuf {
    PathBuf::from("movies.json")
}

/// Website generation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GalleryConfig {
    /// HTML template with the title and grid placeholder tokens
    #[serde(default = "default_template_path")]
    pub template_path: PathBuf,

    /// Where the rendered page is written
    #[serde(default = "default_output_path")]
    pub output_path: PathBuf,

    /// Page title substituted into the template
    #[serde(default = "default_page_title")]
    pub page_title: String,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            template_path: default_template_path(),
            output_path: default_output_path(),
            page_title: default_page_title(),
        }
    }
}

fn default_template_path() -> PathBuf {
    PathBuf::from("static/index_template.html")
}

fn default_output_path() -> PathBuf {
    PathBuf::from("static/index.html")
}

fn default_page_title() -> String {
    "I LOVE CINEMA".to_string()
}
