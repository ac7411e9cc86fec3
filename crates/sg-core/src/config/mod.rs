//! Configuration management for sshgate

mod gateway;
pub mod serde_utils;

pub use gateway::{AuditConfig, CorsConfig, GatewayConfig};

use crate::error::ConfigError;
use std::path::{Path, PathBuf};

/// Per-user directory holding `config.toml`
pub fn default_config_dir() -> PathBuf {
    let base = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    base.join("sshgate")
}

/// `<config dir>/sshgate/config.toml`
pub fn default_config_path() -> PathBuf {
    default_config_dir().join("config.toml")
}

/// Read and parse a TOML file; missing keys take their defaults
pub fn load_config<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(ConfigError::NotFound(path.to_path_buf()))
        }
        Err(e) => return Err(ConfigError::Invalid(format!("cannot read {:?}: {}", path, e))),
    };

    let parsed = toml::from_str(&text)?;
    tracing::debug!("Read configuration from {:?}", path);
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_config::<GatewayConfig>(&dir.path().join("missing.toml"));
        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn test_full_file_round_trips_through_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = GatewayConfig::default();
        config.bind_address = "127.0.0.1:9100".to_string();
        config.command_timeout = Duration::from_secs(45);
        std::fs::write(&path, toml::to_string_pretty(&config).unwrap()).unwrap();

        let loaded: GatewayConfig = load_config(&path).unwrap();
        assert_eq!(loaded.bind_address, "127.0.0.1:9100");
        assert_eq!(loaded.command_timeout, Duration::from_secs(45));
        assert_eq!(loaded.connect_timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "connect_timeout = 3\n[cors]\nallowed_origins = [\"https://panel.lan\"]\n")
            .unwrap();

        let loaded: GatewayConfig = load_config(&path).unwrap();
        assert_eq!(loaded.connect_timeout, Duration::from_secs(3));
        assert_eq!(loaded.command_timeout, Duration::from_secs(30));
        assert_eq!(loaded.cors.allowed_origins, vec!["https://panel.lan".to_string()]);
    }

    #[test]
    fn test_invalid_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "bind_address = [").unwrap();
        assert!(matches!(
            load_config::<GatewayConfig>(&path),
            Err(ConfigError::Parse(_))
        ));
    }
}
