// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// File validator — filters raw input candidates down to PNG/JPEG entries.
// Both input channels (drop zone and file picker) funnel through here.

use tracing::{debug, info, warn};

use crate::error::{BildwerkError, Result};
use crate::types::{ImageFileEntry, MediaType, RawFile};

/// Outcome of filtering a mixed batch.
#[derive(Debug, Clone)]
pub struct FilterReport {
    /// Accepted entries, in the order the candidates arrived.
    pub accepted: Vec<ImageFileEntry>,
    /// Names of candidates whose declared type was not PNG or JPEG.
    pub rejected: Vec<String>,
}

/// Stateless filter over input candidates.
///
/// The validator never touches the collection; appending the accepted entries
/// is a separate step for the caller.
pub struct FileValidator;

impl FileValidator {
    /// Filter `candidates`, returning only the accepted entries.
    ///
    /// An empty batch is a no-op. A non-empty batch with no acceptable file
    /// yields [`BildwerkError::NoSupportedFiles`].
    pub fn filter(candidates: Vec<RawFile>) -> Result<Vec<ImageFileEntry>> {
        Self::filter_with_report(candidates).map(|report| report.accepted)
    }

    /// Like [`FileValidator::filter`], but also reports which candidates of a
    /// partially accepted batch were dropped.
    pub fn filter_with_report(candidates: Vec<RawFile>) -> Result<FilterReport> {
        let total = candidates.len();
        let mut accepted = Vec::with_capacity(total);
        let mut rejected = Vec::new();

        for raw in candidates {
            match raw.declared_type.as_deref().and_then(MediaType::from_mime) {
                Some(media_type) => {
                    debug!(name = %raw.name, mime = media_type.mime_type(), "candidate accepted");
                    accepted.push(ImageFileEntry::accept(raw, media_type));
                }
                None => {
                    warn!(
                        name = %raw.name,
                        declared = raw.declared_type.as_deref().unwrap_or("<none>"),
                        "candidate rejected: not PNG or JPEG"
                    );
                    rejected.push(raw.name);
                }
            }
        }

        if total > 0 && accepted.is_empty() {
            return Err(BildwerkError::NoSupportedFiles { rejected });
        }

        if total > 0 {
            info!(
                accepted = accepted.len(),
                rejected = rejected.len(),
                "input batch filtered"
            );
        }

        Ok(FilterReport { accepted, rejected })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(name: &str, mime: Option<&str>) -> RawFile {
        RawFile::in_memory(name, mime, vec![0u8; 4])
    }

    #[test]
    fn empty_batch_is_noop() {
        let accepted = FileValidator::filter(Vec::new()).expect("empty batch");
        assert!(accepted.is_empty());
    }

    #[test]
    fn accepts_png_jpeg_and_jpg_alias() {
        let accepted = FileValidator::filter(vec![
            candidate("a.png", Some("image/png")),
            candidate("b.jpg", Some("image/jpeg")),
            candidate("c.jpg", Some("image/jpg")),
        ])
        .expect("all valid");

        let names: Vec<&str> = accepted.iter().map(|e| e.name()).collect();
        assert_eq!(names, ["a.png", "b.jpg", "c.jpg"]);
        assert_eq!(accepted[2].media_type(), MediaType::Jpeg);
    }

    #[test]
    fn all_rejected_signals_no_supported_files() {
        let err = FileValidator::filter(vec![
            candidate("notes.txt", Some("text/plain")),
            candidate("readme.txt", Some("text/plain")),
        ])
        .expect_err("nothing acceptable");

        match err {
            BildwerkError::NoSupportedFiles { rejected } => {
                assert_eq!(rejected, ["notes.txt", "readme.txt"]);
            }
            other => panic!("unexpected error variant: {other}"),
        }
    }

    #[test]
    fn missing_declared_type_is_rejected() {
        let err = FileValidator::filter(vec![candidate("mystery", None)]).expect_err("rejected");
        assert!(matches!(err, BildwerkError::NoSupportedFiles { .. }));
    }

    #[test]
    fn mixed_batch_keeps_valid_and_reports_rejected() {
        let report = FileValidator::filter_with_report(vec![
            candidate("a.png", Some("image/png")),
            candidate("anim.gif", Some("image/gif")),
            candidate("b.jpeg", Some("image/jpeg")),
        ])
        .expect("partially valid");

        let names: Vec<&str> = report.accepted.iter().map(|e| e.name()).collect();
        assert_eq!(names, ["a.png", "b.jpeg"]);
        assert_eq!(report.rejected, ["anim.gif"]);
    }
}
