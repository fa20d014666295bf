// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Bildwerk.

use thiserror::Error;

/// Top-level error type for all Bildwerk operations.
#[derive(Debug, Error)]
pub enum BildwerkError {
    // -- Validation errors --
    #[error("no supported files in batch ({} rejected)", rejected.len())]
    NoSupportedFiles { rejected: Vec<String> },

    // -- Collection contract violations --
    #[error("position {position} out of range for collection of {len}")]
    IndexOutOfRange { position: usize, len: usize },

    #[error("row action from revision {action_revision} is stale (collection is at {current_revision})")]
    StaleRowAction {
        action_revision: u64,
        current_revision: u64,
    },

    // -- Conversion errors --
    #[error("failed to embed {name}: {reason}")]
    EmbeddingFailed { name: String, reason: String },

    #[error("PDF encoding failed: {0}")]
    EncodingFailed(String),

    #[error("a conversion is already running")]
    ConversionInProgress,

    #[error("nothing to convert")]
    EmptyCollection,

    // -- Document errors --
    #[error("image processing failed: {0}")]
    ImageError(String),

    #[error("PDF operation failed: {0}")]
    PdfError(String),

    // -- Storage / persistence --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // -- Platform bridge --
    #[error("platform bridge error: {0}")]
    Bridge(String),

    #[error("feature not available on this platform")]
    PlatformUnavailable,
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, BildwerkError>;
