// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// User-facing notices for every error.
//
// Each technical error maps to a short message and a suggestion. Severity
// decides how the UI presents it.

use crate::error::BildwerkError;

/// How a notice is presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Must be acknowledged before continuing (modal notice).
    Blocking,
    /// Shown inline; the user can carry on.
    Info,
    /// A programming defect. Logged, shown only as a generic hint.
    Internal,
}

/// A user-facing notice with plain-language message and suggestion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserNotice {
    pub message: String,
    pub suggestion: String,
    pub severity: Severity,
}

impl UserNotice {
    /// Notice for candidates dropped from a partially accepted batch.
    pub fn skipped_files(rejected: &[String]) -> Self {
        Self {
            message: format!("Skipped {} file(s) that are not PNG or JPG images.", rejected.len()),
            suggestion: rejected.join(", "),
            severity: Severity::Info,
        }
    }
}

/// Convert a `BildwerkError` into a `UserNotice`.
pub fn humanize_error(err: &BildwerkError) -> UserNotice {
    match err {
        BildwerkError::NoSupportedFiles { .. } => UserNotice {
            message: "Please select only PNG or JPG images.".into(),
            suggestion: "Other file types can't be added to the PDF.".into(),
            severity: Severity::Blocking,
        },

        BildwerkError::EmbeddingFailed { name, .. } => UserNotice {
            message: "An error occurred during conversion. Please try again.".into(),
            suggestion: format!("The image \"{name}\" could not be read. Remove it or replace it with a working copy."),
            severity: Severity::Blocking,
        },

        BildwerkError::EncodingFailed(_) | BildwerkError::ImageError(_) => UserNotice {
            message: "An error occurred during conversion. Please try again.".into(),
            suggestion: "If this keeps happening, try converting fewer images at once.".into(),
            severity: Severity::Blocking,
        },

        BildwerkError::ConversionInProgress => UserNotice {
            message: "A conversion is already running.".into(),
            suggestion: "Wait for it to finish, then try again.".into(),
            severity: Severity::Info,
        },

        BildwerkError::EmptyCollection => UserNotice {
            message: "There are no images to convert.".into(),
            suggestion: "Drop some PNG or JPG images first.".into(),
            severity: Severity::Info,
        },

        BildwerkError::IndexOutOfRange { .. } | BildwerkError::StaleRowAction { .. } => UserNotice {
            message: "The list changed before that action could be applied.".into(),
            suggestion: "Try again on the updated list.".into(),
            severity: Severity::Internal,
        },

        BildwerkError::PdfError(_) => UserNotice {
            message: "There's a problem with the generated PDF.".into(),
            suggestion: "Try converting again.".into(),
            severity: Severity::Blocking,
        },

        BildwerkError::Io(io_err) => {
            if io_err.kind() == std::io::ErrorKind::NotFound {
                UserNotice {
                    message: "The file couldn't be found.".into(),
                    suggestion: "It may have been moved or deleted. Try adding it again.".into(),
                    severity: Severity::Blocking,
                }
            } else if io_err.kind() == std::io::ErrorKind::PermissionDenied {
                UserNotice {
                    message: "The app doesn't have permission to access that file.".into(),
                    suggestion: "Check the file permissions, or choose a different location.".into(),
                    severity: Severity::Blocking,
                }
            } else {
                UserNotice {
                    message: "There was a problem reading or writing a file.".into(),
                    suggestion: "Try again. If this keeps happening, your disk may be full.".into(),
                    severity: Severity::Blocking,
                }
            }
        }

        BildwerkError::Serialization(_) => UserNotice {
            message: "The app had an internal data problem.".into(),
            suggestion: "Try again. If this keeps happening, please report it.".into(),
            severity: Severity::Internal,
        },

        BildwerkError::Bridge(_) => UserNotice {
            message: "A system dialog didn't work.".into(),
            suggestion: "Try again, or restart the app.".into(),
            severity: Severity::Blocking,
        },

        BildwerkError::PlatformUnavailable => UserNotice {
            message: "This feature isn't available on your device.".into(),
            suggestion: "Drag images onto the window instead.".into(),
            severity: Severity::Info,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_supported_files_is_blocking() {
        let err = BildwerkError::NoSupportedFiles {
            rejected: vec!["a.txt".into()],
        };
        let notice = humanize_error(&err);
        assert_eq!(notice.message, "Please select only PNG or JPG images.");
        assert_eq!(notice.severity, Severity::Blocking);
    }

    #[test]
    fn embedding_failure_names_the_file() {
        let err = BildwerkError::EmbeddingFailed {
            name: "broken.png".into(),
            reason: "bad header".into(),
        };
        let notice = humanize_error(&err);
        assert_eq!(notice.message, "An error occurred during conversion. Please try again.");
        assert!(notice.suggestion.contains("broken.png"));
    }

    #[test]
    fn stale_action_is_internal() {
        let err = BildwerkError::StaleRowAction {
            action_revision: 1,
            current_revision: 2,
        };
        assert_eq!(humanize_error(&err).severity, Severity::Internal);
    }

    #[test]
    fn skipped_files_lists_names() {
        let notice = UserNotice::skipped_files(&["a.gif".into(), "b.bmp".into()]);
        assert_eq!(notice.severity, Severity::Info);
        assert_eq!(notice.suggestion, "a.gif, b.bmp");
    }
}
