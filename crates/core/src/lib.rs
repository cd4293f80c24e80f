pub mod config;
pub mod gallery;
pub mod matcher;
pub mod metadata;
pub mod selection;
pub mod service;
pub mod stats;
pub mod storage;
pub mod testing;

pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, GalleryConfig,
    StorageConfig,
};
pub use gallery::{generate_gallery, write_gallery, GalleryError};
pub use matcher::{
    best_matches, filter_ranked, similarity, TitleMatch, MATCH_LIMIT, MATCH_THRESHOLD,
};
pub use metadata::{
    MetadataError, MetadataProvider, MovieMetadata, OmdbClient, OmdbConfig,
};
pub use selection::{SelectionFlow, SelectionState, SelectionStep, CANCEL_TOKEN};
pub use service::{validate_rating, CatalogService, ServiceError};
pub use stats::{rating_stats, RatingStats};
pub use storage::{
    open_storage, Catalog, CsvStorage, JsonStorage, MovieRecord, MovieStorage, StorageError,
    StorageFormat,
};
