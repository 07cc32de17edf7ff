//! Client configuration
//!
//! Loaded from TOML (all keys optional) and overridable from the environment:
//!
//! ```toml
//! api_base_url = "http://localhost:8000"
//! request_timeout_secs = 600
//!
//! [segmentation]
//! rows = 2
//! cols = 2
//! overlap = 50
//! ```

use crate::error::BackendError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable overriding [`ClientConfig::api_base_url`]
pub const API_BASE_URL_ENV: &str = "IMGRAPH_API_BASE_URL";

/// How the backend splits each uploaded image before analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Segmentation {
    /// Grid rows
    pub rows: u32,
    /// Grid columns
    pub cols: u32,
    /// Overlap between neighbouring sections, in pixels
    pub overlap: u32,
}

impl Default for Segmentation {
    fn default() -> Self {
        Self {
            rows: 2,
            cols: 2,
            overlap: 50,
        }
    }
}

/// Backend client configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Backend base URL, without trailing path
    pub api_base_url: String,
    /// Per-request timeout; `None` waits indefinitely
    pub request_timeout_secs: Option<u64>,
    /// Upload segmentation grid
    pub segmentation: Segmentation,
}

impl ClientConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With base URL
    #[inline]
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    /// With request timeout
    #[inline]
    #[must_use]
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.request_timeout_secs = Some(secs);
        self
    }

    /// With segmentation grid
    #[inline]
    #[must_use]
    pub fn with_segmentation(mut self, segmentation: Segmentation) -> Self {
        self.segmentation = segmentation;
        self
    }

    /// Parse TOML configuration
    ///
    /// # Errors
    /// Returns [`BackendError::InvalidConfig`] on malformed TOML
    pub fn from_toml_str(source: &str) -> Result<Self, BackendError> {
        toml::from_str(source).map_err(|e| BackendError::InvalidConfig(e.to_string()))
    }

    /// Load TOML configuration from a file
    ///
    /// # Errors
    /// Returns [`BackendError::Io`] if the file cannot be read, or
    /// [`BackendError::InvalidConfig`] if it does not parse
    pub fn load(path: impl AsRef<Path>) -> Result<Self, BackendError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| BackendError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    /// Apply [`API_BASE_URL_ENV`] if set
    #[must_use]
    pub fn with_env_overrides(self) -> Self {
        match std::env::var(API_BASE_URL_ENV) {
            Ok(url) if !url.trim().is_empty() => self.with_base_url(url.trim()),
            _ => self,
        }
    }

    /// Validate configuration
    ///
    /// # Errors
    /// Returns [`BackendError::InvalidConfig`] for a non-HTTP base URL or an empty grid
    pub fn validate(&self) -> Result<(), BackendError> {
        let url = self.api_base_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(BackendError::InvalidConfig(format!(
                "api_base_url must be an http(s) URL, got '{url}'"
            )));
        }
        if self.segmentation.rows == 0 || self.segmentation.cols == 0 {
            return Err(BackendError::InvalidConfig(
                "segmentation grid needs at least one row and one column".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8000".to_string(),
            request_timeout_secs: None,
            segmentation: Segmentation::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.api_base_url, "http://localhost:8000");
        assert_eq!(config.segmentation, Segmentation { rows: 2, cols: 2, overlap: 50 });
        assert!(config.request_timeout_secs.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = ClientConfig::from_toml_str(
            r#"
            api_base_url = "https://graph.example.com"

            [segmentation]
            rows = 3
            "#,
        )
        .unwrap();

        assert_eq!(config.api_base_url, "https://graph.example.com");
        assert_eq!(config.segmentation.rows, 3);
        assert_eq!(config.segmentation.cols, 2);
        assert_eq!(config.segmentation.overlap, 50);
    }

    #[test]
    fn malformed_toml() {
        let err = ClientConfig::from_toml_str("api_base_url = [").unwrap_err();
        assert!(matches!(err, BackendError::InvalidConfig(_)));
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "request_timeout_secs = 30").unwrap();

        let config = ClientConfig::load(file.path()).unwrap();
        assert_eq!(config.request_timeout_secs, Some(30));
    }

    #[test]
    fn load_missing_file() {
        let err = ClientConfig::load("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, BackendError::Io { .. }));
    }

    #[test]
    fn validation() {
        assert!(ClientConfig::new().with_base_url("localhost:8000").validate().is_err());
        assert!(ClientConfig::new()
            .with_segmentation(Segmentation { rows: 0, cols: 2, overlap: 0 })
            .validate()
            .is_err());
    }
}
