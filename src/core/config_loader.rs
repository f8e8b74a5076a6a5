// src/core/config_loader.rs

use crate::{core::paths, models::Config};
use std::{fs, path::Path};
use thiserror::Error;

/// Loading or creating the configuration file failed.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Reading or writing the file.
    #[error("Filesystem Error: {0}")]
    Io(#[from] std::io::Error),
    /// Locating the configuration directory.
    #[error(transparent)]
    Path(#[from] paths::PathError),
    /// The file exists but is not valid TOML for [`Config`].
    #[error("Failed to parse config.toml: {0}")]
    TomlParse(#[from] toml::de::Error),
    /// Writing the defaults.
    #[error("Failed to serialize config to TOML: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

/// Loads `~/.config/dockhand/config.toml`, writing the defaults on first use.
pub fn load_config() -> Result<Config, ConfigError> {
    let config_path = paths::get_config_path()?;
    load_from(&config_path)
}

/// Loads a config file, creating it with default values when it is missing.
/// Keys absent from an existing file take their default values.
pub fn load_from(config_path: &Path) -> Result<Config, ConfigError> {
    if !config_path.exists() {
        let default_config = Config::default();
        let toml_string = toml::to_string_pretty(&default_config)?;
        fs::write(config_path, toml_string)?;
        log::info!("Created default configuration at {}", config_path.display());
        return Ok(default_config);
    }
    let content = fs::read_to_string(config_path)?;
    let config: Config = toml::from_str(&content)?;
    log::debug!("Loaded configuration from {}", config_path.display());
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_is_created_with_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");

        let config = load_from(&path).unwrap();
        assert_eq!(config, Config::default());
        assert!(path.exists());

        // Reading it back gives the same values.
        assert_eq!(load_from(&path).unwrap(), Config::default());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "compose_command = \"podman-compose\"\nformatter = \"grc\"\n\n\
             [properties]\nsummary_max_width = 12\n",
        )
        .unwrap();

        let config = load_from(&path).unwrap();
        assert_eq!(config.compose_command, "podman-compose");
        assert_eq!(config.formatter.as_deref(), Some("grc"));
        assert_eq!(config.docker_bin, "docker");
        assert_eq!(config.properties.summary_max_width, 12);
        assert_eq!(config.properties.capped_key, "git.branch");
    }

    #[test]
    fn test_invalid_toml_is_reported() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "log_tail = \"many\"").unwrap();
        assert!(matches!(load_from(&path), Err(ConfigError::TomlParse(_))));
    }
}
