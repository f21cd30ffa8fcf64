use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use std::path::Path;

use super::{types::Config, ConfigError};

/// Load configuration from file with environment variable overrides.
/// `SHELFSYNC_SOURCE__API_KEY` overrides `source.api_key`; the double
/// underscore separates nesting levels so keys may contain underscores.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.display().to_string()));
    }

    let config: Config = Figment::new()
        .merge(Toml::file(path))
        .merge(Env::prefixed("SHELFSYNC_").split("__"))
        .extract()
        .map_err(|e| ConfigError::ParseError(e.to_string()))?;

    Ok(config)
}

/// Load configuration from TOML string (useful for testing)
pub fn load_config_from_str(toml_str: &str) -> Result<Config, ConfigError> {
    toml::from_str(toml_str).map_err(|e| ConfigError::ParseError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_config_from_str_valid() {
        let toml = r#"
[source]
api_key = "nyt-key"

[store]
path = "abs.sqlite"

[[libraries]]
name = "books"
collections = []
"#;
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.source.api_key, "nyt-key");
    }

    #[test]
    fn test_load_config_from_str_missing_store() {
        let toml = r#"
[source]
api_key = "nyt-key"
libraries = []
"#;
        let result = load_config_from_str(toml);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn test_load_config_file_not_found() {
        let result = load_config(Path::new("/nonexistent/config.toml"));
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound(_)));
    }

    #[test]
    fn test_load_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(
            temp_file,
            r#"
[source]
api_key = "nyt-key"
period = "2026-01-03"

[store]
path = "/data/absdatabase.sqlite"

[[libraries]]
name = "books"

[[libraries.collections]]
name = "Best Sellers"
lists = ["hardcover-fiction"]
"#
        )
        .unwrap();

        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(config.source.period, "2026-01-03");
        assert_eq!(config.libraries[0].name, "books");
    }
}
