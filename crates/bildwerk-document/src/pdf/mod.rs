// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF module — the encoder boundary, its printpdf implementation, and a
// lopdf-based inspector for reading finished documents back.

pub mod reader;
pub mod writer;

use bildwerk_core::error::Result;
use bildwerk_core::types::MediaType;

pub use reader::{ImageObject, PdfInspector};
pub use writer::PdfImageEncoder;

/// Opaque reference to an image registered with an encoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ImageHandle(pub usize);

/// An embedded image and its natural size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmbeddedImage {
    pub handle: ImageHandle,
    pub width: u32,
    pub height: u32,
}

/// Where an embedded image is drawn on a page, in PDF points with the origin
/// at the page's bottom-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImagePlacement {
    pub handle: ImageHandle,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl ImagePlacement {
    /// Draw the image at its natural size from the page origin, one point per
    /// pixel, with no scaling and no margin.
    pub fn full_page(image: &EmbeddedImage) -> Self {
        Self {
            handle: image.handle,
            x: 0.0,
            y: 0.0,
            width: image.width as f32,
            height: image.height as f32,
        }
    }
}

/// The document-encoding collaborator.
///
/// One encoder builds one document: images are embedded, pages appended in
/// call order, and `finish` serialises the result. Dropping an encoder
/// without calling `finish` discards everything it built.
pub trait DocumentEncoder {
    /// Register PNG or JPEG bytes as a drawable image.
    fn embed_image(&mut self, bytes: &[u8], media_type: MediaType) -> Result<EmbeddedImage>;

    /// Append a page of `width_pt` x `height_pt` and draw one image on it.
    fn add_page(&mut self, width_pt: f32, height_pt: f32, placement: ImagePlacement) -> Result<()>;

    /// Pages appended so far.
    fn page_count(&self) -> usize;

    /// Serialise the finished document.
    fn finish(self) -> Result<Vec<u8>>;
}
