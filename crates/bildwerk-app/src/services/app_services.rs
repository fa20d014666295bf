// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Central service layer — owns config and the platform bridge, and provides
// async-friendly methods for the Dioxus UI to call.
//
// The working set itself lives in `AppState`; these methods only produce
// values for it (filter reports, thumbnails, conversion reports).

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use bildwerk_bridge::{PlatformBridge, platform_bridge};
use bildwerk_core::error::{BildwerkError, Result};
use bildwerk_core::types::{ImageFileEntry, RawFile};
use bildwerk_core::validator::{FileValidator, FilterReport};
use bildwerk_core::AppConfig;
use bildwerk_document::convert::{ConversionJob, ConversionOrchestrator, ConversionReport};
use bildwerk_document::{PdfImageEncoder, thumbnail_data_uri};
use tracing::{debug, info, warn};

use super::data_dir;

/// Shared application services accessible from all Dioxus components via
/// `use_context::<AppServices>()`.
///
/// All fields are cheaply cloneable (Arc-wrapped) so that the struct can be
/// passed into closures and async blocks without lifetime issues.
#[derive(Clone)]
pub struct AppServices {
    bridge: Arc<Mutex<Arc<dyn PlatformBridge>>>,
    data_dir: PathBuf,
    config: Arc<Mutex<AppConfig>>,
}

impl AppServices {
    /// Initialise all services.  Call once at app startup.
    pub fn init() -> Result<Self> {
        let dir = data_dir::data_dir()?;
        info!(path = %dir.display(), "initialising app services");

        // Load persisted config or use defaults
        let config = AppConfig::load(&dir).unwrap_or_default();
        let bridge: Arc<dyn PlatformBridge> =
            Arc::from(platform_bridge(config.default_save_dir.clone()));
        info!(platform = bridge.platform_name(), "platform bridge ready");

        Ok(Self::with_parts(dir, config, bridge))
    }

    /// Services rooted in a scratch directory with default config.
    pub fn fallback() -> Self {
        let config = AppConfig::default();
        let bridge = Arc::from(platform_bridge(None));
        Self::with_parts(data_dir::fallback_dir(), config, bridge)
    }

    pub fn with_parts(
        data_dir: PathBuf,
        config: AppConfig,
        bridge: Arc<dyn PlatformBridge>,
    ) -> Self {
        Self {
            bridge: Arc::new(Mutex::new(bridge)),
            data_dir,
            config: Arc::new(Mutex::new(config)),
        }
    }

    fn bridge(&self) -> Arc<dyn PlatformBridge> {
        Arc::clone(&self.bridge.lock().unwrap_or_else(PoisonError::into_inner))
    }

    // -- Input ---------------------------------------------------------------

    /// Show the native multi-select image picker.
    pub fn pick_images(&self) -> Result<Vec<PathBuf>> {
        self.bridge().pick_images()
    }

    /// Turn dropped or picked paths into accepted entries.
    ///
    /// Paths that cannot be read are reported alongside type rejections. A
    /// batch where nothing survives is `NoSupportedFiles`.
    pub async fn ingest_paths(&self, paths: Vec<PathBuf>) -> Result<FilterReport> {
        let mut candidates = Vec::with_capacity(paths.len());
        let mut unreadable = Vec::new();

        for path in paths {
            match RawFile::from_path(&path).await {
                Ok(raw) => candidates.push(raw),
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "dropped path is unreadable");
                    unreadable.push(display_name(&path));
                }
            }
        }

        match FileValidator::filter_with_report(candidates) {
            Ok(report) if report.accepted.is_empty() && !unreadable.is_empty() => {
                Err(BildwerkError::NoSupportedFiles { rejected: unreadable })
            }
            Ok(mut report) => {
                report.rejected.extend(unreadable);
                Ok(report)
            }
            Err(BildwerkError::NoSupportedFiles { mut rejected }) => {
                rejected.extend(unreadable);
                Err(BildwerkError::NoSupportedFiles { rejected })
            }
            Err(e) => Err(e),
        }
    }

    /// Derive and store the preview thumbnail for `entry`.
    ///
    /// Decoding runs on the blocking pool. Returns `false` when the preview
    /// was already there or another task populated it first.
    pub async fn derive_thumbnail(&self, entry: ImageFileEntry) -> Result<bool> {
        if entry.preview().is_some() {
            return Ok(false);
        }
        let bytes = entry.read_bytes().await?;
        let media_type = entry.media_type();
        let max_edge = self.config().thumbnail_edge_px;

        let uri = tokio::task::spawn_blocking(move || thumbnail_data_uri(&bytes, media_type, max_edge))
            .await
            .map_err(|e| BildwerkError::ImageError(format!("thumbnail task failed: {e}")))??;

        let stored = entry.set_preview(uri);
        debug!(name = entry.name(), stored, "thumbnail derived");
        Ok(stored)
    }

    // -- Conversion ----------------------------------------------------------

    /// A fresh orchestrator named after the configured output file.
    pub fn orchestrator(&self) -> ConversionOrchestrator {
        ConversionOrchestrator::new(self.config().output_file_name)
    }

    /// Run a started job with the PDF encoder and the platform delivery.
    pub async fn run_conversion(&self, job: ConversionJob) -> Result<ConversionReport> {
        let title = self.config().document_title;
        let bridge = self.bridge();
        job.run(move || PdfImageEncoder::new(&title), &*bridge).await
    }

    // -- Config Persistence --------------------------------------------------

    /// Get a clone of the current config.
    pub fn config(&self) -> AppConfig {
        self.config
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Update and persist the config. A changed save directory swaps in a
    /// freshly configured bridge.
    pub fn save_config(&self, config: &AppConfig) -> Result<()> {
        let save_dir_changed = {
            let mut current = self.config.lock().unwrap_or_else(PoisonError::into_inner);
            let changed = current.default_save_dir != config.default_save_dir;
            *current = config.clone();
            changed
        };

        if save_dir_changed {
            let bridge: Arc<dyn PlatformBridge> =
                Arc::from(platform_bridge(config.default_save_dir.clone()));
            *self.bridge.lock().unwrap_or_else(PoisonError::into_inner) = bridge;
        }

        config.persist(&self.data_dir)?;
        info!("config saved");
        Ok(())
    }

    /// Path to the data directory.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}
