// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Platform-agnostic trait definitions for native capabilities.
//
// Bildwerk needs two things from the host: a way to pick image files, and a
// way to hand a finished document to the user.

use std::path::PathBuf;

use bildwerk_core::error::Result;

/// Unified bridge that groups all native capabilities.
pub trait PlatformBridge: NativeFilePicker + NativeDelivery + Send + Sync {
    /// Human-readable platform name (e.g. "Desktop (rfd)").
    fn platform_name(&self) -> &str;
}

/// Pick image files from the device storage.
pub trait NativeFilePicker {
    /// Show a multi-select picker filtered to PNG/JPEG.
    /// Returns an empty list if the user cancelled.
    fn pick_images(&self) -> Result<Vec<PathBuf>>;
}

/// Hand finished bytes to the user as a download.
pub trait NativeDelivery {
    /// Offer `bytes` under `file_name`.
    ///
    /// Returns where the file ended up, or `Ok(None)` if the user dismissed
    /// the save prompt. Dismissing is not an error.
    fn deliver(&self, bytes: &[u8], file_name: &str, mime_type: &str) -> Result<Option<PathBuf>>;
}

impl<T: NativeDelivery + ?Sized> NativeDelivery for &T {
    fn deliver(&self, bytes: &[u8], file_name: &str, mime_type: &str) -> Result<Option<PathBuf>> {
        (**self).deliver(bytes, file_name, mime_type)
    }
}

impl<T: NativeDelivery + ?Sized> NativeDelivery for Box<T> {
    fn deliver(&self, bytes: &[u8], file_name: &str, mime_type: &str) -> Result<Option<PathBuf>> {
        (**self).deliver(bytes, file_name, mime_type)
    }
}
