//! Content-type detection from leading magic bytes.

/// Detected media type of stored photo bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MediaType {
    /// MIME type sent as `Content-Type`
    pub mime: &'static str,
    /// File extension used in the download file name
    pub extension: &'static str,
}

impl MediaType {
    pub const PNG: Self = Self::new("image/png", "png");
    pub const JPEG: Self = Self::new("image/jpeg", "jpg");
    pub const GIF: Self = Self::new("image/gif", "gif");
    pub const WEBP: Self = Self::new("image/webp", "webp");
    pub const OCTET_STREAM: Self = Self::new("application/octet-stream", "bin");

    const fn new(mime: &'static str, extension: &'static str) -> Self {
        Self { mime, extension }
    }
}

const PNG_MAGIC: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
const JPEG_MAGIC: &[u8] = &[0xFF, 0xD8, 0xFF];

/// Identify `bytes` by signature; unknown data is `application/octet-stream`.
pub fn sniff_media_type(bytes: &[u8]) -> MediaType {
    if bytes.starts_with(PNG_MAGIC) {
        MediaType::PNG
    } else if bytes.starts_with(JPEG_MAGIC) {
        MediaType::JPEG
    } else if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
        MediaType::GIF
    } else if bytes.len() >= 12 && bytes.starts_with(b"RIFF") && &bytes[8..12] == b"WEBP" {
        MediaType::WEBP
    } else {
        MediaType::OCTET_STREAM
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_signatures() {
        assert_eq!(
            sniff_media_type(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0]),
            MediaType::PNG
        );
        assert_eq!(sniff_media_type(&[0xFF, 0xD8, 0xFF, 0xE0]), MediaType::JPEG);
        assert_eq!(sniff_media_type(b"GIF89a\x01\x00"), MediaType::GIF);
        assert_eq!(sniff_media_type(b"RIFF\x24\x00\x00\x00WEBPVP8 "), MediaType::WEBP);
    }

    #[test]
    fn test_unknown_and_truncated_data() {
        assert_eq!(sniff_media_type(b""), MediaType::OCTET_STREAM);
        assert_eq!(sniff_media_type(b"hello"), MediaType::OCTET_STREAM);
        assert_eq!(sniff_media_type(&[0x89, b'P', b'N']), MediaType::OCTET_STREAM);
        assert_eq!(sniff_media_type(b"RIFF\x24\x00\x00\x00WAVE"), MediaType::OCTET_STREAM);
    }
}
