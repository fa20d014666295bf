// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Stub bridge for targets without native dialogs (mobile builds).
//
// Every trait method returns `PlatformUnavailable`.

use std::path::PathBuf;

use bildwerk_core::error::{BildwerkError, Result};

use crate::traits::*;

/// No-op bridge returned where no desktop dialogs exist.
pub struct StubBridge;

impl PlatformBridge for StubBridge {
    fn platform_name(&self) -> &str {
        "Unsupported (stub)"
    }
}

impl NativeFilePicker for StubBridge {
    fn pick_images(&self) -> Result<Vec<PathBuf>> {
        tracing::warn!("NativeFilePicker::pick_images called on stub bridge");
        Err(BildwerkError::PlatformUnavailable)
    }
}

impl NativeDelivery for StubBridge {
    fn deliver(&self, _bytes: &[u8], _file_name: &str, _mime_type: &str) -> Result<Option<PathBuf>> {
        tracing::warn!("NativeDelivery::deliver called on stub bridge");
        Err(BildwerkError::PlatformUnavailable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stub_reports_unavailable() {
        let bridge = StubBridge;
        assert!(matches!(bridge.pick_images(), Err(BildwerkError::PlatformUnavailable)));
        assert!(matches!(
            bridge.deliver(b"", "images.pdf", "application/pdf"),
            Err(BildwerkError::PlatformUnavailable)
        ));
    }
}
