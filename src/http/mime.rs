//! Content type detection from file extensions.

use std::path::Path;

/// Used when the extension is unknown.
pub const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// `text/html` for `.html`, `image/jpeg` for `.jpg`, and so on.
pub fn content_type_for(filename: &str) -> &'static str {
    mime_guess::from_path(Path::new(filename))
        .first_raw()
        .unwrap_or(FALLBACK_CONTENT_TYPE)
}
