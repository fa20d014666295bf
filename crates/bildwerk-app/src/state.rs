// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Global application state — the working set, the conversion orchestrator,
// and the transient UI flags around them.

use bildwerk_core::{AppConfig, BildwerkError};
use bildwerk_core::collection::OrderedFileCollection;
use bildwerk_core::error::Result;
use bildwerk_core::human_errors::{Severity, UserNotice, humanize_error};
use bildwerk_core::preview::{DragGesture, PreviewListSync, RowAction};
use bildwerk_core::types::ImageFileEntry;
use bildwerk_core::validator::FilterReport;
use bildwerk_document::convert::{ConversionJob, ConversionOrchestrator, ConversionReport};
use tracing::{error, info};

use crate::services::app_services::AppServices;

/// Shared state accessible to all pages via `use_context`.
#[derive(Debug)]
pub struct AppState {
    /// The images that will become pages, in page order.
    pub collection: OrderedFileCollection,
    pub orchestrator: ConversionOrchestrator,
    /// Reorder drag on the preview list.
    pub drag: DragGesture,
    /// Files are hovering over the drop zone.
    pub drag_over: bool,
    /// Notice waiting to be shown.
    pub notice: Option<UserNotice>,
    /// Outcome of the last successful conversion.
    pub last_report: Option<ConversionReport>,
    /// Bumped whenever a thumbnail lands, to re-render the list.
    pub thumbnails_ready: usize,
    /// Application settings.
    pub config: AppConfig,
}

impl AppState {
    /// Create initial state from the backend services.
    pub fn new(svc: &AppServices) -> Self {
        Self {
            collection: OrderedFileCollection::new(),
            orchestrator: svc.orchestrator(),
            drag: DragGesture::new(),
            drag_over: false,
            notice: None,
            last_report: None,
            thumbnails_ready: 0,
            config: svc.config(),
        }
    }

    /// Append the accepted part of an input batch. Returns the new entries,
    /// whose thumbnails still have to be derived.
    pub fn absorb(&mut self, batch: Result<FilterReport>) -> Vec<ImageFileEntry> {
        match batch {
            Ok(report) => {
                if !report.rejected.is_empty() {
                    self.notice = Some(UserNotice::skipped_files(&report.rejected));
                }
                let added = report.accepted.clone();
                self.collection.append(report.accepted);
                added
            }
            Err(e) => {
                self.show(&e);
                Vec::new()
            }
        }
    }

    /// Apply a row's remove button.
    pub fn remove(&mut self, action: RowAction) {
        match PreviewListSync::remove(&mut self.collection, action) {
            Ok(entry) => info!(name = entry.name(), "entry removed"),
            Err(e) => self.show(&e),
        }
    }

    /// Complete a reorder drag on the row at `index`.
    pub fn drop_on(&mut self, index: usize) {
        if let Err(e) = self.drag.drop_on(index, &mut self.collection) {
            self.show(&e);
        }
    }

    /// Entries still waiting for a thumbnail.
    pub fn pending_thumbnails(&self) -> Vec<ImageFileEntry> {
        PreviewListSync::pending_thumbnails(&self.collection)
    }

    pub fn clear(&mut self) {
        self.collection.clear();
        self.last_report = None;
        info!("working set cleared");
    }

    /// Enter Busy and hand back the job to run, or show why not.
    pub fn start_conversion(&mut self) -> Option<ConversionJob> {
        self.last_report = None;
        match self.orchestrator.start(&self.collection) {
            Ok(job) => Some(job),
            Err(e) => {
                self.show(&e);
                None
            }
        }
    }

    /// Return to Idle with the job's outcome.
    pub fn finish_conversion(&mut self, result: Result<ConversionReport>) {
        match self.orchestrator.finish(result) {
            Ok(report) => self.last_report = Some(report),
            Err(_) => {
                self.notice = self.orchestrator.last_notice().cloned();
                self.orchestrator.dismiss_notice();
            }
        }
    }

    /// Adopt saved settings.
    pub fn apply_config(&mut self, config: AppConfig) {
        self.orchestrator.set_file_name(config.output_file_name.clone());
        self.config = config;
    }

    // Internal errors are logged only.
    fn show(&mut self, err: &BildwerkError) {
        let notice = humanize_error(err);
        if notice.severity == Severity::Internal {
            error!(error = %err, "internal error");
            return;
        }
        self.notice = Some(notice);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use bildwerk_bridge::DirectoryDelivery;
    use bildwerk_core::types::RawFile;
    use bildwerk_core::validator::FileValidator;
    use bildwerk_document::convert::ConversionState;

    fn state() -> AppState {
        let dir = std::env::temp_dir().join("bildwerk-state-tests");
        let svc = AppServices::with_parts(
            dir.clone(),
            AppConfig::default(),
            Arc::new(StaticBridge(DirectoryDelivery::new(dir))),
        );
        AppState::new(&svc)
    }

    struct StaticBridge(DirectoryDelivery);

    impl bildwerk_bridge::PlatformBridge for StaticBridge {
        fn platform_name(&self) -> &str {
            "static"
        }
    }

    impl bildwerk_bridge::NativeFilePicker for StaticBridge {
        fn pick_images(&self) -> Result<Vec<std::path::PathBuf>> {
            Ok(Vec::new())
        }
    }

    impl bildwerk_bridge::NativeDelivery for StaticBridge {
        fn deliver(&self, bytes: &[u8], name: &str, mime: &str) -> Result<Option<std::path::PathBuf>> {
            self.0.deliver(bytes, name, mime)
        }
    }

    fn batch(names: &[(&str, &str)]) -> Result<FilterReport> {
        FileValidator::filter_with_report(
            names
                .iter()
                .map(|(n, m)| RawFile::in_memory(*n, Some(*m), vec![1u8; 10]))
                .collect(),
        )
    }

    #[test]
    fn partial_batch_appends_and_notes_skipped() {
        let mut s = state();
        let added = s.absorb(batch(&[("a.png", "image/png"), ("b.gif", "image/gif")]));

        assert_eq!(added.len(), 1);
        assert_eq!(s.collection.count(), 1);
        let notice = s.notice.expect("skipped notice");
        assert_eq!(notice.severity, Severity::Info);
        assert_eq!(notice.suggestion, "b.gif");
    }

    #[test]
    fn rejected_batch_leaves_collection_alone() {
        let mut s = state();
        let added = s.absorb(batch(&[("doc.pdf", "application/pdf")]));

        assert!(added.is_empty());
        assert!(s.collection.is_empty());
        assert_eq!(
            s.notice.expect("notice").message,
            "Please select only PNG or JPG images."
        );
    }

    #[test]
    fn stale_remove_is_ignored_quietly() {
        let mut s = state();
        s.absorb(batch(&[("a.png", "image/png"), ("b.png", "image/png")]));
        let stale = RowAction {
            position: 0,
            revision: s.collection.revision(),
        };
        s.collection.move_to(0, 1).expect("move");

        s.remove(stale);
        assert_eq!(s.collection.count(), 2);
        assert!(s.notice.is_none());
    }

    #[test]
    fn drag_moves_once() {
        let mut s = state();
        s.absorb(batch(&[
            ("a.png", "image/png"),
            ("b.png", "image/png"),
            ("c.png", "image/png"),
        ]));
        s.drag.begin(0);
        s.drop_on(2);
        s.drop_on(1);

        let names: Vec<_> = s.collection.iter().map(|e| e.name().to_string()).collect();
        assert_eq!(names, ["b.png", "c.png", "a.png"]);
    }

    #[test]
    fn failed_conversion_surfaces_notice_and_returns_to_idle() {
        let mut s = state();
        s.absorb(batch(&[("a.png", "image/png")]));

        let job = s.start_conversion().expect("job");
        assert_eq!(s.orchestrator.state(), ConversionState::Busy);
        assert!(s.start_conversion().is_none());
        drop(job);

        s.finish_conversion(Err(BildwerkError::EncodingFailed("boom".into())));
        assert_eq!(s.orchestrator.state(), ConversionState::Idle);
        assert_eq!(
            s.notice.expect("notice").message,
            "An error occurred during conversion. Please try again."
        );
    }

    #[test]
    fn pending_thumbnails_shrink_as_previews_land() {
        let mut s = state();
        let added = s.absorb(batch(&[("a.png", "image/png"), ("b.png", "image/png")]));
        assert_eq!(s.pending_thumbnails().len(), 2);

        assert!(added[0].set_preview("data:image/png;base64,AAAA".into()));
        let pending = s.pending_thumbnails();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].name(), "b.png");
    }

    #[test]
    fn empty_trigger_shows_info() {
        let mut s = state();
        assert!(s.start_conversion().is_none());
        assert_eq!(s.notice.expect("notice").severity, Severity::Info);
    }
}
