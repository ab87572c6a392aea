//! Content types for files served straight from the document root.

use std::collections::HashMap;
use std::sync::LazyLock;

static STATIC_TYPES: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    HashMap::from([
        ("htm", "text/html"),
        ("html", "text/html"),
        ("xml", "text/xml"),
        ("txt", "text/plain"),
        ("css", "text/css"),
        ("js", "application/x-javascript"),
        ("png", "image/png"),
        ("gif", "image/gif"),
        ("jpg", "image/jpg"),
        ("jpeg", "image/jpg"),
        ("zip", "application/zip"),
    ])
});

/// Forces the table so the first request doesn't pay for it.
pub fn init() {
    LazyLock::force(&STATIC_TYPES);
}

/// Looks up a bare extension (no dot), case-insensitively.
pub fn content_type_for_extension(ext: &str) -> Option<&'static str> {
    STATIC_TYPES.get(ext.to_ascii_lowercase().as_str()).copied()
}

/// Content type for a request path, if its extension is one we serve statically.
///
/// The extension is whatever follows the last `.` in the path.
///
/// # Example
///
/// ```
/// # use portico::http::mime::static_content_type;
/// assert_eq!(static_content_type("/site/INDEX.HTML"), Some("text/html"));
/// assert_eq!(static_content_type("/app/handler"), None);
/// ```
pub fn static_content_type(path: &str) -> Option<&'static str> {
    let (_, ext) = path.rsplit_once('.')?;
    content_type_for_extension(ext)
}
