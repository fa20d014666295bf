// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Application configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// MIME type of every artifact Bildwerk produces.
pub const PDF_MIME_TYPE: &str = "application/pdf";

const CONFIG_FILE: &str = "config.json";

/// Persistent application settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// File name offered for the finished PDF.
    pub output_file_name: String,
    /// Title written into the PDF /Info dictionary.
    pub document_title: String,
    /// Longest edge of preview thumbnails, in pixels.
    pub thumbnail_edge_px: u32,
    /// Where the save dialog opens. `None` lets the platform decide.
    pub default_save_dir: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            output_file_name: "images.pdf".into(),
            document_title: "Images".into(),
            thumbnail_edge_px: 96,
            default_save_dir: None,
        }
    }
}

impl AppConfig {
    /// Load `config.json` from `data_dir`, returning `None` when it is missing
    /// or unreadable.
    pub fn load(data_dir: &Path) -> Option<Self> {
        let path = data_dir.join(CONFIG_FILE);
        let data = std::fs::read_to_string(&path).ok()?;
        match serde_json::from_str(&data) {
            Ok(config) => Some(config),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring malformed config");
                None
            }
        }
    }

    /// Write this config as pretty JSON into `data_dir`.
    pub fn persist(&self, data_dir: &Path) -> Result<()> {
        let path = data_dir.join(CONFIG_FILE);
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_download_contract() {
        let config = AppConfig::default();
        assert_eq!(config.output_file_name, "images.pdf");
        assert_eq!(config.thumbnail_edge_px, 96);
    }

    #[test]
    fn persist_then_load() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = AppConfig {
            document_title: "Holiday".into(),
            ..AppConfig::default()
        };
        config.persist(dir.path()).expect("persist");

        let loaded = AppConfig::load(dir.path()).expect("load");
        assert_eq!(loaded, config);
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join(CONFIG_FILE), r#"{"document_title":"Scans"}"#)
            .expect("write");

        let loaded = AppConfig::load(dir.path()).expect("load");
        assert_eq!(loaded.document_title, "Scans");
        assert_eq!(loaded.output_file_name, "images.pdf");
    }

    #[test]
    fn malformed_config_is_ignored() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join(CONFIG_FILE), "not json").expect("write");
        assert!(AppConfig::load(dir.path()).is_none());
    }
}
