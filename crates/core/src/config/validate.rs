use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Source API key is present
/// - At least one library is configured
/// - Every collection maps to at least one list
/// - Matcher threshold and margin are sane
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.source.api_key.is_empty() {
        return Err(ConfigError::ValidationError(
            "source.api_key cannot be empty".to_string(),
        ));
    }

    if config.libraries.is_empty() {
        return Err(ConfigError::ValidationError(
            "at least one library must be configured".to_string(),
        ));
    }

    for library in &config.libraries {
        if library.name.is_empty() {
            return Err(ConfigError::ValidationError(
                "library name cannot be empty".to_string(),
            ));
        }
        for collection in &library.collections {
            if collection.lists.is_empty() {
                return Err(ConfigError::ValidationError(format!(
                    "collection '{}' in library '{}' has no lists",
                    collection.name, library.name
                )));
            }
        }
    }

    let threshold = config.matcher.fuzzy_threshold;
    if !(threshold > 0.0 && threshold <= 1.0) {
        return Err(ConfigError::ValidationError(format!(
            "matcher.fuzzy_threshold must be in (0.0, 1.0], got {}",
            threshold
        )));
    }

    if config.matcher.tie_margin < 0.0 {
        return Err(ConfigError::ValidationError(format!(
            "matcher.tie_margin cannot be negative, got {}",
            config.matcher.tie_margin
        )));
    }

    Ok(())
}
