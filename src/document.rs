//! File-to-document mapping.
//!
//! Converts one [`FileDescriptor`] into the [`PushDocument`] the index
//! receives: a deterministic `file://` identity, the modification timestamp,
//! `title`/`fileextension` metadata, and (for non-empty files) the zlib
//! payload. Zero-byte files are pushed with metadata only — that is the
//! intended behavior, not a gap.

use anyhow::{Context, Result};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::path::Path;

use crate::compress;
use crate::walk::FileDescriptor;

pub const META_TITLE: &str = "title";
pub const META_FILE_EXTENSION: &str = "fileextension";

/// Codec declared alongside each payload so the index can decompress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CompressionType {
    Zlib,
}

/// One document as sent to the index. Payload bytes stay compressed in
/// memory; they are base64-encoded at serialization time.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PushDocument {
    pub document_id: String,
    pub modified_date: DateTime<Utc>,
    pub metadata: BTreeMap<String, String>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_base64"
    )]
    pub compressed_binary_data: Option<Vec<u8>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compression_type: Option<CompressionType>,
}

fn serialize_base64<S: Serializer>(
    bytes: &Option<Vec<u8>>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    // skip_serializing_if guarantees Some here.
    match bytes {
        Some(bytes) => serializer.serialize_str(&BASE64.encode(bytes)),
        None => serializer.serialize_none(),
    }
}

/// Derives the document identity from the absolute path. Deterministic: the
/// same file always maps to the same id, which is what makes re-pushing an
/// upsert instead of a duplicate.
pub fn document_id(absolute_path: &Path) -> String {
    format!("file://{}", absolute_path.display())
}

/// Maps one descriptor to a document, reading and compressing the file's
/// bytes when it has any.
pub fn map_file(descriptor: &FileDescriptor) -> Result<PushDocument> {
    let mut metadata = BTreeMap::new();
    metadata.insert(META_TITLE.to_string(), file_name(descriptor));
    metadata.insert(META_FILE_EXTENSION.to_string(), file_extension(descriptor));

    let (compressed_binary_data, compression_type) = if descriptor.size > 0 {
        let bytes = std::fs::read(&descriptor.absolute_path).with_context(|| {
            format!(
                "failed to read {}",
                descriptor.absolute_path.display()
            )
        })?;
        (
            Some(compress::deflate(&bytes)?),
            Some(CompressionType::Zlib),
        )
    } else {
        (None, None)
    };

    Ok(PushDocument {
        document_id: document_id(&descriptor.absolute_path),
        modified_date: descriptor.modified,
        metadata,
        compressed_binary_data,
        compression_type,
    })
}

fn file_name(descriptor: &FileDescriptor) -> String {
    descriptor
        .absolute_path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default()
}

/// Extension with its leading dot (".md"), or empty when the file has none.
fn file_extension(descriptor: &FileDescriptor) -> String {
    descriptor
        .absolute_path
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default()
}
