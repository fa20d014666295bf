// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Conversion orchestrator — turns a snapshot of the working set into one PDF
// and hands it to the delivery bridge.
//
// State machine: Idle -> Busy -> Idle. A failed run reports its error and
// returns to Idle as well; nothing partial is ever delivered. Entries are
// embedded strictly one after another in snapshot order, so the page order
// is the order the user last saw when they pressed convert.
//
// Decoding and serialisation run on tokio's blocking pool. The encoder is
// built there by a factory, since printpdf documents cannot cross threads.

use std::path::PathBuf;
use std::sync::Arc;

use bildwerk_bridge::NativeDelivery;
use bildwerk_core::collection::{OrderedFileCollection, Snapshot};
use bildwerk_core::config::PDF_MIME_TYPE;
use bildwerk_core::error::{BildwerkError, Result};
use bildwerk_core::human_errors::{UserNotice, humanize_error};
use bildwerk_core::types::MediaType;
use sha2::{Digest, Sha256};
use tracing::{Span, debug, error, info, instrument};

use crate::pdf::{DocumentEncoder, ImagePlacement};

/// Label of the convert trigger while idle.
pub const IDLE_LABEL: &str = "Convert to PDF";
/// Label of the convert trigger while a conversion runs.
pub const BUSY_LABEL: &str = "Converting…";

/// Orchestrator lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversionState {
    /// Ready; the trigger is enabled when there is something to convert.
    Idle,
    /// A conversion is in flight; the trigger is disabled.
    Busy,
}

/// What a successful conversion produced.
#[derive(Debug, Clone)]
pub struct ConversionReport {
    pub pages: usize,
    pub bytes: usize,
    /// SHA-256 of the produced PDF, lowercase hex.
    pub sha256: String,
    /// Where the document was saved; `None` if the user dismissed the save
    /// prompt.
    pub delivered_to: Option<PathBuf>,
}

/// Drives conversions and owns the busy/idle state around them.
#[derive(Debug)]
pub struct ConversionOrchestrator {
    state: ConversionState,
    file_name: String,
    last_notice: Option<UserNotice>,
}

impl ConversionOrchestrator {
    /// `file_name` is what the finished document is offered as.
    pub fn new(file_name: impl Into<String>) -> Self {
        Self {
            state: ConversionState::Idle,
            file_name: file_name.into(),
            last_notice: None,
        }
    }

    pub fn state(&self) -> ConversionState {
        self.state
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Takes effect from the next `start`; a running job keeps its name.
    pub fn set_file_name(&mut self, file_name: impl Into<String>) {
        self.file_name = file_name.into();
    }

    /// Whether the convert trigger should be enabled for a working set of
    /// `count` entries.
    pub fn trigger_enabled(&self, count: usize) -> bool {
        self.state == ConversionState::Idle && count > 0
    }

    pub fn trigger_label(&self) -> &'static str {
        match self.state {
            ConversionState::Idle => IDLE_LABEL,
            ConversionState::Busy => BUSY_LABEL,
        }
    }

    /// Notice from the last failed conversion, if it has not been cleared.
    pub fn last_notice(&self) -> Option<&UserNotice> {
        self.last_notice.as_ref()
    }

    pub fn dismiss_notice(&mut self) {
        self.last_notice = None;
    }

    /// Move to Busy and capture the snapshot the job will convert.
    pub fn start(&mut self, collection: &OrderedFileCollection) -> Result<ConversionJob> {
        if self.state == ConversionState::Busy {
            return Err(BildwerkError::ConversionInProgress);
        }
        if collection.is_empty() {
            return Err(BildwerkError::EmptyCollection);
        }

        let snapshot = collection.snapshot();
        info!(
            entries = snapshot.len(),
            revision = snapshot.revision(),
            "conversion started"
        );
        self.state = ConversionState::Busy;
        self.last_notice = None;

        Ok(ConversionJob {
            snapshot,
            file_name: self.file_name.clone(),
        })
    }

    /// Return to Idle with the outcome of a job. Failures are logged and kept
    /// as the pending user notice; the result is passed through.
    pub fn finish(&mut self, result: Result<ConversionReport>) -> Result<ConversionReport> {
        self.state = ConversionState::Idle;
        match &result {
            Ok(report) => {
                info!(pages = report.pages, sha256 = %report.sha256, "conversion finished");
            }
            Err(e) => {
                error!(error = %e, "conversion failed");
                self.last_notice = Some(humanize_error(e));
            }
        }
        result
    }

    /// Start, run and finish in one call.
    pub async fn convert<F, E, D>(
        &mut self,
        collection: &OrderedFileCollection,
        make_encoder: F,
        delivery: D,
    ) -> Result<ConversionReport>
    where
        F: FnOnce() -> E + Send + 'static,
        E: DocumentEncoder,
        D: NativeDelivery,
    {
        let job = self.start(collection)?;
        let result = job.run(make_encoder, delivery).await;
        self.finish(result)
    }
}

/// One conversion over a fixed snapshot.
#[derive(Debug)]
pub struct ConversionJob {
    snapshot: Snapshot,
    file_name: String,
}

impl ConversionJob {
    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    /// Read every entry, embed them in order, finish the document, and
    /// deliver it.
    ///
    /// The first failure aborts the rest; the encoder is dropped with
    /// whatever it had built and nothing reaches `delivery`.
    #[instrument(skip_all, fields(entries = self.snapshot.len()))]
    pub async fn run<F, E, D>(self, make_encoder: F, delivery: D) -> Result<ConversionReport>
    where
        F: FnOnce() -> E + Send + 'static,
        E: DocumentEncoder,
        D: NativeDelivery,
    {
        let mut sources = Vec::with_capacity(self.snapshot.len());
        for entry in self.snapshot.iter() {
            let bytes = entry
                .read_bytes()
                .await
                .map_err(|e| embedding_failed(entry.name(), e))?;
            sources.push(PageSource {
                name: entry.name().to_string(),
                media_type: entry.media_type(),
                bytes,
            });
        }

        let span = Span::current();
        let (pages, document) = tokio::task::spawn_blocking(move || {
            span.in_scope(|| encode_pages(make_encoder(), &sources))
        })
        .await
        .map_err(|e| BildwerkError::EncodingFailed(format!("encoder task failed: {e}")))??;

        let sha256 = hex::encode(Sha256::digest(&document));
        let delivered_to = delivery.deliver(&document, &self.file_name, PDF_MIME_TYPE)?;

        Ok(ConversionReport {
            pages,
            bytes: document.len(),
            sha256,
            delivered_to,
        })
    }
}

/// An entry's bytes, read ahead of encoding.
struct PageSource {
    name: String,
    media_type: MediaType,
    bytes: Arc<[u8]>,
}

/// One page per source, then the serialised document and its page count.
fn encode_pages<E: DocumentEncoder>(
    mut encoder: E,
    sources: &[PageSource],
) -> Result<(usize, Vec<u8>)> {
    for (index, source) in sources.iter().enumerate() {
        let image = encoder
            .embed_image(&source.bytes, source.media_type)
            .map_err(|e| embedding_failed(&source.name, e))?;

        encoder
            .add_page(
                image.width as f32,
                image.height as f32,
                ImagePlacement::full_page(&image),
            )
            .map_err(|e| embedding_failed(&source.name, e))?;

        debug!(
            page = index + 1,
            name = %source.name,
            width = image.width,
            height = image.height,
            "page appended"
        );
    }

    let pages = encoder.page_count();
    let document = encoder.finish().map_err(|e| match e {
        BildwerkError::EncodingFailed(_) => e,
        other => BildwerkError::EncodingFailed(other.to_string()),
    })?;
    Ok((pages, document))
}

fn embedding_failed(name: &str, err: BildwerkError) -> BildwerkError {
    BildwerkError::EmbeddingFailed {
        name: name.to_string(),
        reason: err.to_string(),
    }
}
