use std::path::Path;

pub const FALLBACK_MEDIA_TYPE: &str = "application/octet-stream";

/// Guess a media type from leading magic bytes, falling back to the file
/// extension when the bytes are not recognized.
pub fn detect_media_type(bytes: &[u8], path: Option<&Path>) -> &'static str {
    if let Some(mime) = sniff(bytes) {
        return mime;
    }

    if let Some(mime) = path.and_then(from_extension) {
        return mime;
    }

    tracing::warn!(
        "Unrecognized attachment format (first 4 bytes: {:02X?}), falling back to {}",
        &bytes[..bytes.len().min(4)],
        FALLBACK_MEDIA_TYPE
    );
    FALLBACK_MEDIA_TYPE
}

fn sniff(bytes: &[u8]) -> Option<&'static str> {
    match bytes {
        [0xFF, 0xD8, 0xFF, ..] => Some("image/jpeg"),
        [0x89, 0x50, 0x4E, 0x47, ..] => Some("image/png"),
        [0x47, 0x49, 0x46, 0x38, ..] => Some("image/gif"),
        [0x52, 0x49, 0x46, 0x46, _, _, _, _, 0x57, 0x45, 0x42, 0x50, ..] => Some("image/webp"),
        [0x1A, 0x45, 0xDF, 0xA3, ..] => Some("video/webm"),
        [_, _, _, _, b'f', b't', b'y', b'p', b'q', b't', b' ', b' ', ..] => {
            Some("video/quicktime")
        }
        [_, _, _, _, b'f', b't', b'y', b'p', ..] => Some("video/mp4"),
        _ => None,
    }
}

fn from_extension(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    let mime = match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "mp4" | "m4v" => "video/mp4",
        "mov" => "video/quicktime",
        "webm" => "video/webm",
        "txt" | "log" => "text/plain",
        _ => return None,
    };
    Some(mime)
}
