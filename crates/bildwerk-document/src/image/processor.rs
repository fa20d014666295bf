// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image processor — decodes PNG/JPEG bytes as their declared format and
// derives preview thumbnails. Operates on in-memory images using the `image`
// crate.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use bildwerk_core::error::BildwerkError;
use bildwerk_core::types::MediaType;
use image::{DynamicImage, ImageFormat};
use tracing::{debug, instrument};

/// A decoded image plus the format it was declared as.
pub struct ImageProcessor {
    /// The decoded image.
    image: DynamicImage,
    media_type: MediaType,
}

impl ImageProcessor {
    // -- Construction ---------------------------------------------------------

    /// Decode `data` strictly as `media_type`. JPEG bytes declared as PNG (or
    /// the reverse) are rejected rather than sniffed.
    #[instrument(skip(data), fields(data_len = data.len()))]
    pub fn decode(data: &[u8], media_type: MediaType) -> Result<Self, BildwerkError> {
        let image = image::load_from_memory_with_format(data, image_format(media_type))
            .map_err(|err| {
                BildwerkError::ImageError(format!(
                    "failed to decode {}: {}",
                    media_type.mime_type(),
                    err
                ))
            })?;
        debug!(
            width = image.width(),
            height = image.height(),
            "Image decoded from bytes"
        );
        Ok(Self { image, media_type })
    }

    // -- Accessors ------------------------------------------------------------

    /// Natural width in pixels.
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Natural height in pixels.
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn media_type(&self) -> MediaType {
        self.media_type
    }

    /// Consume the processor and return the underlying `DynamicImage`.
    pub fn into_dynamic(self) -> DynamicImage {
        self.image
    }

    // -- Previews -------------------------------------------------------------

    /// Downscale so the longest edge is at most `max_edge`, preserving aspect
    /// ratio. Images already smaller are left as they are.
    pub fn thumbnail(&self, max_edge: u32) -> DynamicImage {
        if self.image.width() <= max_edge && self.image.height() <= max_edge {
            return self.image.clone();
        }
        self.image.thumbnail(max_edge, max_edge)
    }

    /// Encode a thumbnail as a `data:image/png;base64,...` URI.
    pub fn thumbnail_data_uri(&self, max_edge: u32) -> Result<String, BildwerkError> {
        let thumb = self.thumbnail(max_edge);
        let png = encode_to_format(&thumb, ImageFormat::Png)?;
        Ok(format!("data:image/png;base64,{}", STANDARD.encode(png)))
    }
}

/// Decode `data` and produce its preview data URI in one go.
pub fn thumbnail_data_uri(
    data: &[u8],
    media_type: MediaType,
    max_edge: u32,
) -> Result<String, BildwerkError> {
    ImageProcessor::decode(data, media_type)?.thumbnail_data_uri(max_edge)
}

fn image_format(media_type: MediaType) -> ImageFormat {
    match media_type {
        MediaType::Png => ImageFormat::Png,
        MediaType::Jpeg => ImageFormat::Jpeg,
    }
}

/// Encode a `DynamicImage` into the specified format, returning the raw bytes.
pub(crate) fn encode_to_format(
    image: &DynamicImage,
    format: ImageFormat,
) -> Result<Vec<u8>, BildwerkError> {
    let mut buffer = Vec::new();
    let mut cursor = std::io::Cursor::new(&mut buffer);
    image.write_to(&mut cursor, format).map_err(|err| {
        BildwerkError::ImageError(format!("image encoding failed: {}", err))
    })?;
    Ok(buffer)
}
