use crate::types::{FileClass, MediaKind};

/// Mime/extension based media-kind routing, run before any LLM call (§4.3).
pub fn media_kind(mime: &str, filename: &str) -> MediaKind {
    let ext = filename.rsplit('.').next().unwrap_or("").to_lowercase();
    if mime.starts_with("image/") || matches!(ext.as_str(), "jpg" | "jpeg" | "png" | "gif" | "webp" | "bmp") {
        return MediaKind::Image;
    }
    if mime == "application/pdf" || ext == "pdf" {
        return MediaKind::Pdf;
    }
    if mime.starts_with("audio/") || matches!(ext.as_str(), "mp3" | "wav" | "m4a" | "ogg" | "flac") {
        return MediaKind::Audio;
    }
    MediaKind::Text
}

/// Fallback classification for images when the vision classifier call
/// fails or is unavailable — `InfoImage` is the least presumptuous bucket.
pub const DEFAULT_IMAGE_CLASS: FileClass = FileClass::InfoImage;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn routes_by_mime() {
        assert_eq!(media_kind("image/jpeg", "scan"), MediaKind::Image);
        assert_eq!(media_kind("application/pdf", "doc"), MediaKind::Pdf);
        assert_eq!(media_kind("audio/mpeg", "voice"), MediaKind::Audio);
        assert_eq!(media_kind("text/plain", "notes.txt"), MediaKind::Text);
    }

    #[test]
    fn falls_back_to_extension_when_mime_is_generic() {
        assert_eq!(media_kind("application/octet-stream", "receipt.png"), MediaKind::Image);
        assert_eq!(media_kind("application/octet-stream", "memo.pdf"), MediaKind::Pdf);
        assert_eq!(media_kind("application/octet-stream", "call.wav"), MediaKind::Audio);
    }
}
