// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// bildwerk-document — Image decoding, PDF encoding, and the conversion
// orchestrator that turns the working set into `images.pdf`.

pub mod convert;
pub mod image;
pub mod pdf;

// Re-export the primary structs so callers can use `bildwerk_document::PdfImageEncoder` etc.
pub use convert::{ConversionJob, ConversionOrchestrator, ConversionReport, ConversionState};
pub use image::{ImageProcessor, thumbnail_data_uri};
pub use pdf::{DocumentEncoder, PdfImageEncoder, PdfInspector};
