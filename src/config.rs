//! Application configuration
//!
//! Read once at startup from a JSON file. Every field is optional; a missing
//! file yields the defaults.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::info;

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "CHART_GALLERY_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "chart_gallery.json";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Malformed config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("Invalid config value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub width: f32,
    pub height: f32,
    pub min_width: f32,
    pub min_height: f32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1400.0,
            height: 900.0,
            min_width: 800.0,
            min_height: 600.0,
        }
    }
}

/// Pixel size of exported PNGs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub width: u32,
    pub height: u32,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 800,
        }
    }
}

impl ExportConfig {
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub window: WindowConfig,
    pub resize_debounce_ms: u64,
    pub export: ExportConfig,
    pub log_filter: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            resize_debounce_ms: 250,
            export: ExportConfig::default(),
            log_filter: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Load from `$CHART_GALLERY_CONFIG`, else `chart_gallery.json`.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var_os(CONFIG_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
        Self::load_from(&path)
    }

    /// Load from `path`; a missing file gives the defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        let config: Self = serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        info!(path = %path.display(), "loaded config");
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.export.width == 0 || self.export.height == 0 {
            return Err(ConfigError::Invalid {
                field: "export",
                reason: format!("size {}x{} is empty", self.export.width, self.export.height),
            });
        }
        let w = &self.window;
        if !(w.width > 0.0 && w.height > 0.0 && w.min_width >= 0.0 && w.min_height >= 0.0) {
            return Err(ConfigError::Invalid {
                field: "window",
                reason: "dimensions must be positive".to_string(),
            });
        }
        Ok(())
    }

    pub fn resize_debounce(&self) -> Duration {
        Duration::from_millis(self.resize_debounce_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load_from(&dir.path().join("absent.json")).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.resize_debounce(), Duration::from_millis(250));
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let file = write_config(r#"{ "resize_debounce_ms": 100, "export": { "width": 640 } }"#);
        let config = AppConfig::load_from(file.path()).unwrap();
        assert_eq!(config.resize_debounce_ms, 100);
        assert_eq!(config.export.size(), (640, 800));
        assert_eq!(config.log_filter, "info");
        assert_eq!(config.window, WindowConfig::default());
    }

    #[test]
    fn malformed_file_is_an_error() {
        let file = write_config("{ not json");
        let err = AppConfig::load_from(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn empty_export_size_is_rejected() {
        let file = write_config(r#"{ "export": { "width": 0, "height": 10 } }"#);
        let err = AppConfig::load_from(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "export", .. }));
    }
}
