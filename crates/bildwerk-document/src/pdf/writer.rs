// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF image encoder — builds one page per image using `printpdf` 0.8.
//
// printpdf 0.8 uses a data-oriented API: documents are built by constructing
// `PdfPage` structs containing `Vec<Op>` operation lists, then serialised via
// `PdfDocument::save()`.
//
// Images keep their full resolution. Plain 8-bit grey or colour JPEGs are
// embedded as-is behind /DCTDecode; everything else is decoded and stored
// losslessly with /FlateDecode, with any alpha channel as a /SMask.

use std::collections::BTreeMap;

use bildwerk_core::error::{BildwerkError, Result};
use bildwerk_core::types::MediaType;
use image::DynamicImage;
use printpdf::{
    DictItem, ExternalStream, ExternalXObject, ImageCompression, ImageOptimizationOptions, Mm,
    Op, PdfDocument, PdfPage, PdfSaveOptions, PdfWarnMsg, Pt, Px, RawImage, RawImageData,
    RawImageFormat, XObjectId, XObjectTransform,
};
use tracing::{debug, info, instrument, warn};

use super::{DocumentEncoder, EmbeddedImage, ImageHandle, ImagePlacement};
use crate::image::ImageProcessor;

/// At 72 DPI one image pixel maps to one PDF point.
const POINTS_PER_INCH: f32 = 72.0;
const MM_PER_INCH: f32 = 25.4;

/// Encodes raster images into a PDF, one page per `add_page` call.
pub struct PdfImageEncoder {
    doc: PdfDocument,
    /// Embedded images with their natural pixel size, indexed by handle.
    images: Vec<(XObjectId, u32, u32)>,
    pages: Vec<PdfPage>,
}

impl PdfImageEncoder {
    /// Start an empty document with `title` in its /Info dictionary.
    pub fn new(title: &str) -> Self {
        info!(title, "Creating image PDF");
        Self {
            doc: PdfDocument::new(title),
            images: Vec::new(),
            pages: Vec::new(),
        }
    }
}

impl DocumentEncoder for PdfImageEncoder {
    #[instrument(skip(self, bytes), fields(bytes_len = bytes.len(), mime = media_type.mime_type()))]
    fn embed_image(&mut self, bytes: &[u8], media_type: MediaType) -> Result<EmbeddedImage> {
        // Decoding also rejects corrupt bytes on the passthrough path.
        let decoded = ImageProcessor::decode(bytes, media_type)?;
        let width = decoded.width();
        let height = decoded.height();

        let passthrough = match media_type {
            MediaType::Jpeg => dct_color_space(bytes),
            MediaType::Png => None,
        };
        let xobject_id = match passthrough {
            Some(color_space) => {
                self.doc
                    .add_xobject(&dct_xobject(bytes, width, height, color_space))
            }
            None => self.doc.add_image(&raw_image(decoded.into_dynamic())),
        };
        let handle = ImageHandle(self.images.len());
        self.images.push((xobject_id, width, height));

        debug!(?handle, width, height, dct = passthrough.is_some(), "Image embedded");
        Ok(EmbeddedImage {
            handle,
            width,
            height,
        })
    }

    fn add_page(&mut self, width_pt: f32, height_pt: f32, placement: ImagePlacement) -> Result<()> {
        let (xobject_id, natural_w, natural_h) = self
            .images
            .get(placement.handle.0)
            .cloned()
            .ok_or_else(|| {
                BildwerkError::EncodingFailed(format!("unknown image handle {}", placement.handle.0))
            })?;

        if width_pt <= 0.0 || height_pt <= 0.0 {
            return Err(BildwerkError::EncodingFailed(format!(
                "invalid page size {width_pt}x{height_pt}"
            )));
        }

        // The image is registered at 72 DPI, so its natural size in points is
        // its pixel size; scale only if the placement asks for something else.
        let scale_x = placement.width / natural_w as f32;
        let scale_y = placement.height / natural_h as f32;

        let ops = vec![Op::UseXobject {
            id: xobject_id,
            transform: XObjectTransform {
                translate_x: Some(Pt(placement.x)),
                translate_y: Some(Pt(placement.y)),
                scale_x: Some(scale_x),
                scale_y: Some(scale_y),
                dpi: Some(POINTS_PER_INCH),
                rotate: None,
            },
        }];

        self.pages
            .push(PdfPage::new(pt_to_mm(width_pt), pt_to_mm(height_pt), ops));
        debug!(
            page = self.pages.len(),
            width_pt, height_pt, "Page added"
        );
        Ok(())
    }

    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn finish(mut self) -> Result<Vec<u8>> {
        if self.pages.is_empty() {
            return Err(BildwerkError::EncodingFailed("document has no pages".into()));
        }

        let page_count = self.pages.len();
        self.doc.with_pages(self.pages);

        let mut warnings: Vec<PdfWarnMsg> = Vec::new();
        let output = self.doc.save(&save_options(), &mut warnings);
        if !warnings.is_empty() {
            warn!(count = warnings.len(), "printpdf reported warnings while saving");
        }

        info!(pages = page_count, bytes = output.len(), "PDF serialised");
        Ok(output)
    }
}

fn pt_to_mm(pt: f32) -> Mm {
    Mm(pt * MM_PER_INCH / POINTS_PER_INCH)
}

/// Lossless Flate for decoded pixels. printpdf's defaults would shrink
/// anything over 2 MB and re-encode colour images as JPEG.
fn save_options() -> PdfSaveOptions {
    PdfSaveOptions {
        image_optimization: Some(ImageOptimizationOptions {
            quality: None,
            max_image_size: None,
            dither_greyscale: Some(false),
            convert_to_greyscale: Some(false),
            auto_optimize: Some(false),
            format: Some(ImageCompression::Flate),
        }),
        ..PdfSaveOptions::default()
    }
}

/// Flat 8-bit samples, keeping the alpha channel when the source has one.
fn raw_image(image: DynamicImage) -> RawImage {
    let width = image.width() as usize;
    let height = image.height() as usize;
    let (pixels, data_format) = if image.color().has_alpha() {
        (image.to_rgba8().into_raw(), RawImageFormat::RGBA8)
    } else {
        (image.to_rgb8().into_raw(), RawImageFormat::RGB8)
    };
    RawImage {
        pixels: RawImageData::U8(pixels),
        width,
        height,
        data_format,
        tag: Vec::new(),
    }
}

/// Image XObject whose stream is the untouched JPEG file.
fn dct_xobject(bytes: &[u8], width: u32, height: u32, color_space: &str) -> ExternalXObject {
    let dict = BTreeMap::from([
        ("Type".to_string(), DictItem::Name(b"XObject".to_vec())),
        ("Subtype".to_string(), DictItem::Name(b"Image".to_vec())),
        ("Width".to_string(), DictItem::Int(i64::from(width))),
        ("Height".to_string(), DictItem::Int(i64::from(height))),
        ("BitsPerComponent".to_string(), DictItem::Int(8)),
        (
            "ColorSpace".to_string(),
            DictItem::Name(color_space.as_bytes().to_vec()),
        ),
        ("Filter".to_string(), DictItem::Name(b"DCTDecode".to_vec())),
    ]);
    ExternalXObject {
        stream: ExternalStream {
            dict,
            content: bytes.to_vec(),
            compress: false,
        },
        width: Some(Px(width as usize)),
        height: Some(Px(height as usize)),
        dpi: Some(POINTS_PER_INCH),
    }
}

/// PDF colour space for a JPEG that readers can show straight from its DCT
/// stream: Huffman-coded (SOF0 to SOF2), 8-bit, with one or three components.
/// CMYK and the rarer frame types return `None` and are decoded instead.
fn dct_color_space(bytes: &[u8]) -> Option<&'static str> {
    if !bytes.starts_with(&[0xFF, 0xD8]) {
        return None;
    }
    let mut pos = 2;
    while pos + 1 < bytes.len() {
        if bytes[pos] != 0xFF {
            return None;
        }
        let marker = bytes[pos + 1];
        match marker {
            // Fill byte.
            0xFF => {
                pos += 1;
                continue;
            }
            // Standalone markers carry no length.
            0x01 | 0xD0..=0xD7 => {
                pos += 2;
                continue;
            }
            _ => {}
        }

        let segment = bytes.get(pos + 2..)?;
        let length = usize::from(u16::from_be_bytes([*segment.first()?, *segment.get(1)?]));
        match marker {
            0xC0..=0xC2 => {
                let precision = *segment.get(2)?;
                let components = *segment.get(7)?;
                return match (precision, components) {
                    (8, 1) => Some("DeviceGray"),
                    (8, 3) => Some("DeviceRGB"),
                    _ => None,
                };
            }
            // Any other frame type, or scan data before a frame header.
            0xC3 | 0xC5..=0xC7 | 0xC9..=0xCB | 0xCD..=0xCF | 0xDA | 0xD9 => return None,
            _ => pos += 2 + length,
        }
    }
    None
}
