// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Bildwerk — native platform bridge abstractions.
//
// Input (file picking) and output (download delivery) are the two places
// Bildwerk touches the host platform. Everything above this crate talks to
// the traits in `traits`.

pub mod directory;
pub mod stub;
pub mod traits;

#[cfg(not(any(target_os = "ios", target_os = "android")))]
pub mod desktop;

pub use directory::DirectoryDelivery;
pub use traits::{NativeDelivery, NativeFilePicker, PlatformBridge};

/// Returns the bridge implementation for the target operating system.
///
/// `save_dir` is where the save dialog opens, when the platform has one.
pub fn platform_bridge(save_dir: Option<std::path::PathBuf>) -> Box<dyn PlatformBridge> {
    #[cfg(not(any(target_os = "ios", target_os = "android")))]
    {
        Box::new(desktop::DesktopBridge::new(save_dir))
    }
    #[cfg(any(target_os = "ios", target_os = "android"))]
    {
        let _ = save_dir;
        Box::new(stub::StubBridge)
    }
}
