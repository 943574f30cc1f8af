//! Application configuration types.
//!
//! The top-level [`Config`] struct is deserialized from JSON and carries the
//! server and media sub-configs. Every section defaults sensibly so a
//! completely empty `{}` file is valid.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::Error;

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub media: MediaConfig,
}

impl Config {
    /// Deserialize a `Config` from a JSON string.
    pub fn from_json(json_str: &str) -> Result<Self> {
        serde_json::from_str(json_str)
            .map_err(|e| Error::Validation(format!("config parse error: {e}")))
    }

    /// Load configuration from a file path, falling back to defaults if the
    /// path is `None` or the file does not exist.
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::default();
        };

        match std::fs::read_to_string(path) {
            Ok(contents) => Self::from_json(&contents).unwrap_or_else(|e| {
                tracing::warn!("Failed to parse config file {}: {e}", path.display());
                Self::default()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!("No config file at {}; using defaults", path.display());
                Self::default()
            }
            Err(e) => {
                tracing::warn!("Failed to read config file {}: {e}", path.display());
                Self::default()
            }
        }
    }

    /// Return a list of validation warnings (non-fatal issues).
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if self.server.port == 0 {
            warnings.push("server.port is 0; a random port will be assigned".into());
        }

        if self.server.db_pool_size == 0 {
            warnings.push("server.db_pool_size is 0; a single connection will be used".into());
        }

        if self.media.max_upload_bytes == 0 {
            warnings.push("media.max_upload_bytes is 0; every upload will be rejected".into());
        }

        if !self.media.base_url.ends_with('/') {
            warnings.push(format!(
                "media.base_url '{}' does not end with '/'; one will be inserted",
                self.media.base_url
            ));
        }

        if self.media.root.as_os_str().is_empty() {
            warnings.push("media.root is empty; files will be stored in the working directory".into());
        }

        warnings
    }
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub db_path: PathBuf,
    /// Maximum number of pooled SQLite connections.
    pub db_pool_size: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 8000,
            db_path: PathBuf::from("./data/homeframe.db"),
            db_pool_size: 4,
        }
    }
}

/// Uploaded media settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MediaConfig {
    /// Directory holding the `frames/` upload folder.
    pub root: PathBuf,
    /// Public URL prefix under which stored files are reachable.
    pub base_url: String,
    /// Largest accepted request body for uploads.
    pub max_upload_bytes: usize,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("./data/media"),
            base_url: "/media/".into(),
            max_upload_bytes: 50 * 1024 * 1024,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_json_is_default() {
        let config = Config::from_json("{}").unwrap();
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.media.base_url, "/media/");
        assert!(config.validate().is_empty());
    }

    #[test]
    fn partial_sections_keep_defaults() {
        let config = Config::from_json(r#"{"media": {"root": "/srv/media"}}"#).unwrap();
        assert_eq!(config.media.root, PathBuf::from("/srv/media"));
        assert_eq!(config.media.max_upload_bytes, 50 * 1024 * 1024);
        assert_eq!(config.server.host, "0.0.0.0");
    }

    #[test]
    fn invalid_json_is_validation_error() {
        let err = Config::from_json("{not json").unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn warnings_for_suspicious_values() {
        let mut config = Config::default();
        config.server.port = 0;
        config.media.base_url = "/media".into();
        config.media.max_upload_bytes = 0;
        config.server.db_pool_size = 0;
        assert_eq!(config.validate().len(), 4);
    }

    #[test]
    fn load_missing_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_or_default(Some(&dir.path().join("absent.json")));
        assert_eq!(config.server.port, 8000);
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("homeframe.json");
        std::fs::write(&path, r#"{"server": {"port": 9100}}"#).unwrap();
        let config = Config::load_or_default(Some(&path));
        assert_eq!(config.server.port, 9100);
        assert_eq!(config.server.db_pool_size, 4);
    }
}
