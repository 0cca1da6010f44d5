//! MIME type detection utilities.

use std::path::Path;

/// Common MIME type constants.
pub mod types {
    pub const ATOM: &str = "application/atom+xml";
    pub const HTML: &str = "text/html";

    pub const PNG: &str = "image/png";
    pub const JPEG: &str = "image/jpeg";
    pub const GIF: &str = "image/gif";
    pub const WEBP: &str = "image/webp";
    pub const AVIF: &str = "image/avif";
    pub const SVG: &str = "image/svg+xml";
    pub const ICO: &str = "image/x-icon";

    pub const OCTET_STREAM: &str = "application/octet-stream";
}

/// Guess an image MIME type from a URL or path.
///
/// Query strings and fragments are ignored.
pub fn image_from_url(url: &str) -> &'static str {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    let ext = Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    match ext.as_deref() {
        Some("png") => types::PNG,
        Some("jpg" | "jpeg") => types::JPEG,
        Some("gif") => types::GIF,
        Some("webp") => types::WEBP,
        Some("avif") => types::AVIF,
        Some("svg") => types::SVG,
        Some("ico") => types::ICO,
        _ => types::OCTET_STREAM,
    }
}
