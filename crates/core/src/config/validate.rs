use super::{types::Config, ConfigError};
use crate::storage::StorageFormat;

/// Validate configuration
/// Currently validates:
/// - Storage path maps to a supported backend (.json or .csv)
/// - OMDb API key is non-empty when the section is present
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    // Storage validation
    if StorageFormat::from_path(&config.storage.path).is_none() {
        return Err(ConfigError::ValidationError(format!(
            "storage.path must end in .json or .csv, got {}",
            config.storage.path.display()
        )));
    }

    // OMDb validation
    if let Some(omdb) = &config.omdb {
        if omdb.api_key.is_empty() {
            return Err(ConfigError::ValidationError(
                "omdb.api_key cannot be empty".to_string(),
            ));
        }
    }

    Ok(())
}
