// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Desktop bridge — native open/save dialogs via `rfd`.

use std::path::PathBuf;

use bildwerk_core::error::Result;
use tracing::{debug, info};

use crate::traits::*;

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];

/// Bridge for Linux, macOS and Windows desktops.
#[derive(Debug, Clone, Default)]
pub struct DesktopBridge {
    /// Directory the save dialog opens in, if configured.
    save_dir: Option<PathBuf>,
}

impl DesktopBridge {
    pub fn new(save_dir: Option<PathBuf>) -> Self {
        Self { save_dir }
    }
}

impl PlatformBridge for DesktopBridge {
    fn platform_name(&self) -> &str {
        "Desktop (rfd)"
    }
}

impl NativeFilePicker for DesktopBridge {
    fn pick_images(&self) -> Result<Vec<PathBuf>> {
        let picked = rfd::FileDialog::new()
            .add_filter("Images", IMAGE_EXTENSIONS)
            .pick_files()
            .unwrap_or_default();
        debug!(count = picked.len(), "file picker closed");
        Ok(picked)
    }
}

impl NativeDelivery for DesktopBridge {
    fn deliver(&self, bytes: &[u8], file_name: &str, mime_type: &str) -> Result<Option<PathBuf>> {
        let mut dialog = rfd::FileDialog::new()
            .set_file_name(file_name)
            .add_filter("PDF", &["pdf"]);
        if let Some(ref dir) = self.save_dir {
            dialog = dialog.set_directory(dir);
        }

        let Some(path) = dialog.save_file() else {
            info!("save dialog dismissed");
            return Ok(None);
        };

        std::fs::write(&path, bytes)?;
        info!(path = %path.display(), mime_type, bytes = bytes.len(), "document delivered");
        Ok(Some(path))
    }
}
