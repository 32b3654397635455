//! Attachment encoding
//!
//! Turns user-supplied screenshots and recordings into base64 payloads that
//! can be sent inline to the model alongside the prompt.

pub mod mime;

use crate::{Error, Result};
use base64::Engine as _;
use futures::future::try_join_all;
use std::path::{Path, PathBuf};
use tokio::io::AsyncReadExt;

const SNIFF_LEN: usize = 16;

/// Where an attachment's bytes come from.
#[derive(Debug, Clone)]
pub enum AttachmentSource {
    Bytes(Vec<u8>),
    /// Read in full when the attachment is encoded.
    Path(PathBuf),
    /// `data:<mime>;base64,<payload>` string, or a bare base64 payload.
    DataUri(String),
}

#[derive(Debug, Clone)]
pub struct AttachmentInput {
    pub source: AttachmentSource,
    pub media_type: String,
    pub display_name: String,
    pub size_bytes: u64,
}

impl AttachmentInput {
    pub fn from_bytes(
        bytes: Vec<u8>,
        media_type: impl Into<String>,
        display_name: impl Into<String>,
    ) -> Self {
        let size_bytes = bytes.len() as u64;
        Self {
            source: AttachmentSource::Bytes(bytes),
            media_type: media_type.into(),
            display_name: display_name.into(),
            size_bytes,
        }
    }

    /// Build an input from a data URI, taking the media type from its header.
    pub fn from_data_uri(uri: impl Into<String>, display_name: impl Into<String>) -> Self {
        let uri = uri.into();
        let media_type = data_uri_media_type(&uri)
            .unwrap_or(mime::FALLBACK_MEDIA_TYPE)
            .to_string();
        let payload = strip_data_uri_prefix(&uri);
        // Approximate decoded size; base64 carries 3 bytes per 4 chars.
        let size_bytes = (payload.trim_end_matches('=').len() as u64 * 3) / 4;

        Self {
            source: AttachmentSource::DataUri(uri),
            media_type,
            display_name: display_name.into(),
            size_bytes,
        }
    }

    /// Describe a file on disk. Only the first few bytes are read here, to
    /// detect the media type; the full content is read by [`encode`].
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let display_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let read_err = |source: std::io::Error| Error::Read {
            name: display_name.clone(),
            source,
        };

        let metadata = tokio::fs::metadata(path).await.map_err(read_err)?;
        let mut file = tokio::fs::File::open(path).await.map_err(read_err)?;
        let mut head = [0u8; SNIFF_LEN];
        let read = file.read(&mut head).await.map_err(read_err)?;
        let media_type = mime::detect_media_type(&head[..read], Some(path)).to_string();

        Ok(Self {
            source: AttachmentSource::Path(path.to_path_buf()),
            media_type,
            display_name,
            size_bytes: metadata.len(),
        })
    }
}

/// Base64 payload plus the media type it was declared with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedAttachment {
    pub data: String,
    pub media_type: String,
}

/// Encode a single attachment. The media type is passed through untouched.
pub async fn encode(input: AttachmentInput) -> Result<EncodedAttachment> {
    let AttachmentInput {
        source,
        media_type,
        display_name,
        ..
    } = input;

    let data = match source {
        AttachmentSource::Bytes(bytes) => base64::engine::general_purpose::STANDARD.encode(bytes),
        AttachmentSource::Path(path) => {
            let bytes = tokio::fs::read(&path).await.map_err(|source| {
                tracing::error!("Failed to read attachment {}: {}", path.display(), source);
                Error::Read {
                    name: display_name.clone(),
                    source,
                }
            })?;
            base64::engine::general_purpose::STANDARD.encode(bytes)
        }
        AttachmentSource::DataUri(uri) => strip_data_uri_prefix(&uri).to_string(),
    };

    tracing::debug!(
        "Encoded attachment {} ({}, {} base64 chars)",
        display_name,
        media_type,
        data.len()
    );

    Ok(EncodedAttachment { data, media_type })
}

/// Encode every attachment concurrently, preserving input order.
///
/// The first failure aborts the batch.
pub async fn encode_all(inputs: Vec<AttachmentInput>) -> Result<Vec<EncodedAttachment>> {
    try_join_all(inputs.into_iter().map(encode)).await
}

/// Drop a leading `data:<mime>;base64,` header, if present.
pub fn strip_data_uri_prefix(value: &str) -> &str {
    match value.strip_prefix("data:") {
        Some(rest) => rest.split_once(',').map_or(rest, |(_, payload)| payload),
        None => value,
    }
}

fn data_uri_media_type(value: &str) -> Option<&str> {
    let header = value.strip_prefix("data:")?.split_once(',')?.0;
    let mime = header.split(';').next()?;
    (!mime.is_empty()).then_some(mime)
}

/// Decode a payload produced by [`encode`], with or without a data-URI header.
pub fn decode_payload(payload: &str) -> Result<Vec<u8>> {
    Ok(base64::engine::general_purpose::STANDARD.decode(strip_data_uri_prefix(payload))?)
}
