// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image module — decoding with the declared format, and preview thumbnails.

pub mod processor;

pub use processor::{ImageProcessor, thumbnail_data_uri};
