//! Dashboard configuration.
//!
//! Defaults, then an optional JSON file, then command-line overrides
//! applied by the binary.

use crate::data::TextEncoding;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Where the two input feeds live and how they are encoded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub province_path: PathBuf,
    pub cases_path: PathBuf,
    pub encoding: TextEncoding,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            province_path: PathBuf::from("./data/province.csv"),
            cases_path: PathBuf::from("./data/cases.csv"),
            encoding: TextEncoding::Windows1252,
        }
    }
}

/// Size of exported panel images in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub image_width: u32,
    pub image_height: u32,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            image_width: 1488,
            image_height: 1000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub sources: SourceConfig,
    pub export: ExportConfig,
    /// tracing filter directive, overridden by RUST_LOG
    pub log_level: String,
    pub window_size: [f32; 2],
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            sources: SourceConfig::default(),
            export: ExportConfig::default(),
            log_level: "info".to_string(),
            window_size: [1400.0, 800.0],
        }
    }
}

impl DashboardConfig {
    /// Load a JSON config file. Missing keys keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn partial_file_keeps_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"sources": {{"cases_path": "/tmp/cases.csv", "encoding": "utf8"}}, "log_level": "debug"}}"#
        )
        .unwrap();

        let config = DashboardConfig::from_file(file.path()).unwrap();
        assert_eq!(config.sources.cases_path, PathBuf::from("/tmp/cases.csv"));
        assert_eq!(config.sources.encoding, TextEncoding::Utf8);
        assert_eq!(config.sources.province_path, PathBuf::from("./data/province.csv"));
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.export, ExportConfig::default());
    }

    #[test]
    fn default_export_size_fills_report_picture() {
        let export = ExportConfig::default();
        let aspect = export.image_width as f64 / export.image_height as f64;
        assert!((aspect - crate::report::IMAGE_ASPECT).abs() < 0.01);
    }

    #[test]
    fn default_encoding_is_windows_1252() {
        assert_eq!(DashboardConfig::default().sources.encoding, TextEncoding::Windows1252);
    }

    #[test]
    fn invalid_json_is_parse_error() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();
        let err = DashboardConfig::from_file(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn unknown_encoding_is_rejected() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"sources": {{"encoding": "latin-9"}}}}"#).unwrap();
        assert!(DashboardConfig::from_file(file.path()).is_err());
    }
}
