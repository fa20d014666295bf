// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF inspector — reads a finished document back with `lopdf` to report its
// page count, page sizes and embedded images.

use std::collections::HashSet;

use bildwerk_core::error::{BildwerkError, Result};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use tracing::{debug, instrument};

/// One drawable image XObject.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageObject {
    pub width: i64,
    pub height: i64,
    /// Whether an alpha channel is attached through /SMask.
    pub soft_mask: bool,
    /// First entry of /Filter, e.g. `DCTDecode`.
    pub filter: Option<String>,
    /// Encoded stream length in bytes.
    pub stream_len: usize,
}

/// Read-only view over a serialised PDF.
pub struct PdfInspector {
    /// The underlying lopdf document.
    document: Document,
}

impl PdfInspector {
    /// Parse PDF bytes already in memory.
    #[instrument(skip_all, fields(bytes_len = data.len()))]
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let document = Document::load_mem(data).map_err(|err| {
            BildwerkError::PdfError(format!("failed to load PDF from memory: {}", err))
        })?;

        debug!(pages = document.get_pages().len(), "PDF loaded from bytes");
        Ok(Self { document })
    }

    /// Number of pages in the document.
    pub fn page_count(&self) -> usize {
        self.document.get_pages().len()
    }

    /// Width and height in points of every page, in page order.
    ///
    /// Taken from each page's /MediaBox, following /Parent when the box is
    /// inherited from the page tree.
    pub fn page_sizes(&self) -> Result<Vec<(f32, f32)>> {
        self.document
            .get_pages()
            .into_values()
            .map(|page_id| self.media_box_size(page_id))
            .collect()
    }

    /// Number of image XObjects anywhere in the document. Soft masks are
    /// not counted separately.
    pub fn image_count(&self) -> usize {
        self.images().len()
    }

    /// Every image XObject except the soft masks of other images, in object
    /// number order.
    pub fn images(&self) -> Vec<ImageObject> {
        let image_streams: Vec<(ObjectId, &Stream)> = self
            .document
            .objects
            .iter()
            .filter_map(|(id, object)| match object {
                Object::Stream(stream) if is_image(stream) => Some((*id, stream)),
                _ => None,
            })
            .collect();

        let masks: HashSet<ObjectId> = image_streams
            .iter()
            .filter_map(|(_, stream)| match stream.dict.get(b"SMask") {
                Ok(Object::Reference(id)) => Some(*id),
                _ => None,
            })
            .collect();

        image_streams
            .into_iter()
            .filter(|(id, _)| !masks.contains(id))
            .map(|(_, stream)| ImageObject {
                width: integer(&stream.dict, b"Width"),
                height: integer(&stream.dict, b"Height"),
                soft_mask: stream.dict.has(b"SMask"),
                filter: first_filter(&stream.dict),
                stream_len: stream.content.len(),
            })
            .collect()
    }

    fn media_box_size(&self, page_id: ObjectId) -> Result<(f32, f32)> {
        let mut dict = self.dictionary(page_id)?;
        // Bounded walk up the page tree.
        for _ in 0..32 {
            if let Ok(media_box) = dict.get(b"MediaBox") {
                return box_size(self.resolve(media_box)?);
            }
            let parent = match dict.get(b"Parent") {
                Ok(Object::Reference(parent_id)) => *parent_id,
                _ => break,
            };
            dict = self.dictionary(parent)?;
        }
        Err(BildwerkError::PdfError(format!(
            "page {:?} has no MediaBox",
            page_id
        )))
    }

    fn dictionary(&self, id: ObjectId) -> Result<&Dictionary> {
        self.document.get_dictionary(id).map_err(|err| {
            BildwerkError::PdfError(format!("object {:?} is not a dictionary: {}", id, err))
        })
    }

    fn resolve<'a>(&'a self, object: &'a Object) -> Result<&'a Object> {
        match object {
            Object::Reference(id) => self.document.get_object(*id).map_err(|err| {
                BildwerkError::PdfError(format!("dangling reference {:?}: {}", id, err))
            }),
            other => Ok(other),
        }
    }
}

fn is_image(stream: &Stream) -> bool {
    matches!(
        stream.dict.get(b"Subtype"),
        Ok(Object::Name(name)) if name.as_slice() == b"Image"
    )
}

fn integer(dict: &Dictionary, key: &[u8]) -> i64 {
    match dict.get(key) {
        Ok(Object::Integer(value)) => *value,
        _ => 0,
    }
}

fn first_filter(dict: &Dictionary) -> Option<String> {
    let name = match dict.get(b"Filter").ok()? {
        Object::Name(name) => name,
        Object::Array(filters) => match filters.first()? {
            Object::Name(name) => name,
            _ => return None,
        },
        _ => return None,
    };
    Some(String::from_utf8_lossy(name).into_owned())
}

fn box_size(media_box: &Object) -> Result<(f32, f32)> {
    let Object::Array(values) = media_box else {
        return Err(BildwerkError::PdfError("MediaBox is not an array".into()));
    };
    if values.len() != 4 {
        return Err(BildwerkError::PdfError(format!(
            "MediaBox has {} entries",
            values.len()
        )));
    }
    let nums = values
        .iter()
        .map(number)
        .collect::<Result<Vec<f32>>>()?;
    Ok(((nums[2] - nums[0]).abs(), (nums[3] - nums[1]).abs()))
}

fn number(object: &Object) -> Result<f32> {
    match object {
        Object::Integer(i) => Ok(*i as f32),
        Object::Real(r) => Ok(*r as f32),
        other => Err(BildwerkError::PdfError(format!(
            "expected a number, found {:?}",
            other
        ))),
    }
}
