// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types: accepted media types, raw input candidates, and the
// validated image entries that make up the working set.

use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Result;

/// Unique identifier for an accepted image. Stable across reorders, so the UI
/// can use it as a render key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntryId(pub Uuid);

impl EntryId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EntryId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for EntryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The two raster formats Bildwerk accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MediaType {
    Png,
    Jpeg,
}

impl MediaType {
    /// Canonical MIME type string.
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
        }
    }

    /// Parse a declared MIME type. `image/jpg` is accepted as an alias.
    pub fn from_mime(mime: &str) -> Option<Self> {
        match mime.trim().to_ascii_lowercase().as_str() {
            "image/png" => Some(Self::Png),
            "image/jpeg" | "image/jpg" => Some(Self::Jpeg),
            _ => None,
        }
    }

    /// Infer the media type from a file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "png" => Some(Self::Png),
            "jpg" | "jpeg" => Some(Self::Jpeg),
            _ => None,
        }
    }
}

/// Declared MIME type for a path on disk, derived from its extension.
///
/// Desktop file systems carry no content type, so this plays the role of the
/// type a browser would attach to a dropped file.
pub fn mime_for_path(path: &Path) -> Option<String> {
    let ext = path.extension()?.to_str()?;
    MediaType::from_extension(ext).map(|mt| mt.mime_type().to_string())
}

/// Where an entry's raw bytes live.
#[derive(Debug, Clone)]
pub enum ByteSource {
    /// Already in memory (drops from a byte buffer, tests).
    Memory(Arc<[u8]>),
    /// On disk; read on demand.
    File(PathBuf),
}

impl ByteSource {
    /// Read the full payload.
    pub async fn read(&self) -> Result<Arc<[u8]>> {
        match self {
            Self::Memory(bytes) => Ok(Arc::clone(bytes)),
            Self::File(path) => {
                let bytes = tokio::fs::read(path).await?;
                Ok(Arc::from(bytes))
            }
        }
    }
}

/// An input candidate that has not been validated yet.
#[derive(Debug, Clone)]
pub struct RawFile {
    pub name: String,
    /// MIME type as reported by the input channel, if any.
    pub declared_type: Option<String>,
    pub size_bytes: u64,
    pub source: ByteSource,
}

impl RawFile {
    /// Build a candidate from bytes already in memory.
    pub fn in_memory(
        name: impl Into<String>,
        declared_type: Option<&str>,
        bytes: impl Into<Arc<[u8]>>,
    ) -> Self {
        let bytes: Arc<[u8]> = bytes.into();
        Self {
            name: name.into(),
            declared_type: declared_type.map(str::to_string),
            size_bytes: bytes.len() as u64,
            source: ByteSource::Memory(bytes),
        }
    }

    /// Build a candidate for a file on disk. Only the metadata is read here;
    /// the payload stays on disk until it is needed.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let metadata = tokio::fs::metadata(path).await?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self {
            name,
            declared_type: mime_for_path(path),
            size_bytes: metadata.len(),
            source: ByteSource::File(path.to_path_buf()),
        })
    }
}

/// One accepted image in the working set.
///
/// Entries are immutable once created, except for the preview thumbnail
/// which is filled in exactly once after creation. The preview slot is
/// shared between clones so snapshots observe it too.
#[derive(Debug, Clone)]
pub struct ImageFileEntry {
    id: EntryId,
    name: String,
    size_bytes: u64,
    media_type: MediaType,
    source: ByteSource,
    preview: Arc<OnceLock<String>>,
}

impl ImageFileEntry {
    /// Only the validator creates entries, so every entry has an accepted type.
    pub(crate) fn accept(raw: RawFile, media_type: MediaType) -> Self {
        Self {
            id: EntryId::new(),
            name: raw.name,
            size_bytes: raw.size_bytes,
            media_type,
            source: raw.source,
            preview: Arc::new(OnceLock::new()),
        }
    }

    pub fn id(&self) -> EntryId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn size_bytes(&self) -> u64 {
        self.size_bytes
    }

    pub fn media_type(&self) -> MediaType {
        self.media_type
    }

    /// Read the raw image bytes.
    pub async fn read_bytes(&self) -> Result<Arc<[u8]>> {
        self.source.read().await
    }

    /// The preview data URI, once derived.
    pub fn preview(&self) -> Option<&str> {
        self.preview.get().map(String::as_str)
    }

    /// Populate the preview. Returns `false` if it was already set, in which
    /// case the first value is kept.
    pub fn set_preview(&self, data_uri: String) -> bool {
        self.preview.set(data_uri).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str) -> ImageFileEntry {
        let raw = RawFile::in_memory(name, Some("image/png"), vec![1u8, 2, 3]);
        ImageFileEntry::accept(raw, MediaType::Png)
    }

    #[test]
    fn mime_aliases() {
        assert_eq!(MediaType::from_mime("image/png"), Some(MediaType::Png));
        assert_eq!(MediaType::from_mime("image/jpeg"), Some(MediaType::Jpeg));
        assert_eq!(MediaType::from_mime("image/jpg"), Some(MediaType::Jpeg));
        assert_eq!(MediaType::from_mime(" IMAGE/PNG "), Some(MediaType::Png));
        assert_eq!(MediaType::from_mime("image/gif"), None);
        assert_eq!(MediaType::from_mime("text/plain"), None);
    }

    #[test]
    fn extension_inference() {
        assert_eq!(
            mime_for_path(Path::new("/tmp/a.JPG")).as_deref(),
            Some("image/jpeg")
        );
        assert_eq!(
            mime_for_path(Path::new("scan.png")).as_deref(),
            Some("image/png")
        );
        assert_eq!(mime_for_path(Path::new("notes.txt")), None);
        assert_eq!(mime_for_path(Path::new("README")), None);
    }

    #[test]
    fn preview_is_write_once_and_shared() {
        let original = entry("a.png");
        let clone = original.clone();
        assert!(original.preview().is_none());

        assert!(clone.set_preview("data:image/png;base64,AAA".into()));
        assert!(!original.set_preview("data:image/png;base64,BBB".into()));
        assert_eq!(original.preview(), Some("data:image/png;base64,AAA"));
    }

    #[test]
    fn entry_ids_are_unique() {
        assert_ne!(entry("a.png").id(), entry("a.png").id());
    }

    #[tokio::test]
    async fn file_source_reads_lazily() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("photo.jpeg");
        std::fs::write(&path, b"jpeg-ish").expect("write");

        let raw = RawFile::from_path(&path).await.expect("from_path");
        assert_eq!(raw.name, "photo.jpeg");
        assert_eq!(raw.size_bytes, 8);
        assert_eq!(raw.declared_type.as_deref(), Some("image/jpeg"));

        let bytes = raw.source.read().await.expect("read");
        assert_eq!(&bytes[..], b"jpeg-ish");
    }

    #[tokio::test]
    async fn missing_file_is_io_error() {
        let source = ByteSource::File(PathBuf::from("/definitely/not/here.png"));
        let err = source.read().await.expect_err("should fail");
        assert!(matches!(err, crate::error::BildwerkError::Io(_)));
    }
}
