use std::fs;
use std::path::{Path, PathBuf};

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

use crate::config::Config;
use crate::error::ConfigError;

/// Get the config file path (~/.config/cinedex/config.toml)
pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("cinedex")
        .join("config.toml")
}

/// Load and validate config from the default path
pub fn load_config() -> Result<Config, ConfigError> {
    let config = read_config(&config_path())?;
    config.validate()?;
    Ok(config)
}

/// Read config from `path` without validating it
pub fn read_config(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound);
    }

    let content = fs::read_to_string(path)?;
    toml::from_str(&content).map_err(|e| ConfigError::Invalid(e.to_string()))
}

/// Save config to the default path with secure permissions
pub fn save_config(config: &Config) -> Result<(), ConfigError> {
    write_config(&config_path(), config)
}

pub fn write_config(path: &Path, config: &Config) -> Result<(), ConfigError> {
    // Create parent directory if it doesn't exist
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let content =
        toml::to_string_pretty(config).map_err(|e| ConfigError::SaveFailed(e.to_string()))?;

    fs::write(path, content)?;

    // The file holds the bearer token
    #[cfg(unix)]
    {
        let mut perms = fs::metadata(path)?.permissions();
        perms.set_mode(0o600);
        fs::set_permissions(path, perms)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_path() {
        let path = config_path();
        assert!(path.ends_with("cinedex/config.toml"));
    }

    #[test]
    fn test_write_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cinedex").join("config.toml");

        let mut config = Config::new("secret".to_string());
        config.search.debounce_ms = 250;
        write_config(&path, &config).unwrap();

        let loaded = read_config(&path).unwrap();
        assert_eq!(loaded.api.bearer_token, "secret");
        assert_eq!(loaded.search.debounce_ms, 250);

        #[cfg(unix)]
        {
            let mode = fs::metadata(&path).unwrap().permissions().mode();
            assert_eq!(mode & 0o777, 0o600);
        }
    }

    #[test]
    fn test_read_missing() {
        let dir = tempfile::tempdir().unwrap();
        let result = read_config(&dir.path().join("absent.toml"));
        assert!(matches!(result, Err(ConfigError::NotFound)));
    }

    #[test]
    fn test_read_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[api\nbearer_token = ").unwrap();
        assert!(matches!(read_config(&path), Err(ConfigError::Invalid(_))));
    }
}
