// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Directory delivery — writes finished documents into a fixed folder without
// asking. Used when no save dialog is available, and in tests.

use std::path::{Path, PathBuf};

use bildwerk_core::error::{BildwerkError, Result};
use tracing::info;

use crate::traits::NativeDelivery;

/// Delivers every document into one directory, overwriting same-named files.
#[derive(Debug, Clone)]
pub struct DirectoryDelivery {
    dir: PathBuf,
}

impl DirectoryDelivery {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl NativeDelivery for DirectoryDelivery {
    fn deliver(&self, bytes: &[u8], file_name: &str, mime_type: &str) -> Result<Option<PathBuf>> {
        // Only a bare file name is allowed; no escaping the target directory.
        let bare = Path::new(file_name)
            .file_name()
            .filter(|n| *n == std::ffi::OsStr::new(file_name))
            .ok_or_else(|| BildwerkError::Bridge(format!("invalid file name: {file_name}")))?;

        std::fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(bare);
        std::fs::write(&path, bytes)?;
        info!(path = %path.display(), mime_type, bytes = bytes.len(), "document delivered");
        Ok(Some(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_into_directory() {
        let dir = tempfile::tempdir().expect("tempdir");
        let delivery = DirectoryDelivery::new(dir.path().join("out"));

        let path = delivery
            .deliver(b"%PDF-1.7", "images.pdf", "application/pdf")
            .expect("deliver")
            .expect("path");

        assert_eq!(path, dir.path().join("out").join("images.pdf"));
        assert_eq!(std::fs::read(&path).expect("read"), b"%PDF-1.7");
    }

    #[test]
    fn rejects_path_traversal() {
        let dir = tempfile::tempdir().expect("tempdir");
        let delivery = DirectoryDelivery::new(dir.path());

        let result = delivery.deliver(b"x", "../escape.pdf", "application/pdf");
        assert!(matches!(result, Err(BildwerkError::Bridge(_))));
    }
}
