// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Bildwerk — Core types, errors, and the ordered image working set shared
// across all crates.

pub mod collection;
pub mod config;
pub mod error;
pub mod format;
pub mod human_errors;
pub mod preview;
pub mod types;
pub mod validator;

pub use collection::{OrderedFileCollection, Snapshot};
pub use config::AppConfig;
pub use error::BildwerkError;
pub use format::format_bytes;
pub use preview::{DisplayRow, DragGesture, PreviewListSync, ReorderSink, RowAction};
pub use types::*;
pub use validator::{FileValidator, FilterReport};
