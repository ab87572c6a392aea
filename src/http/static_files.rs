//! Files and directory indexes served straight from the document root.

use std::path::{Path, PathBuf};

use crate::error::ServerError;

/// Marker appended after a sub-directory link in a listing.
pub const DIRECTORY_MARKER: &str = "↓";

/// Maps a decoded request path onto the document root.
///
/// One leading `/` is stripped and the rest joined onto `root`. The result is
/// canonicalized and must stay inside `root` (which must itself be canonical);
/// anything that doesn't exist or escapes is reported as `NotFound`.
pub async fn resolve(root: &Path, url_path: &str) -> Result<PathBuf, ServerError> {
    let relative = url_path.strip_prefix('/').unwrap_or(url_path);
    let joined = root.join(relative);

    let canonical = tokio::fs::canonicalize(&joined)
        .await
        .map_err(|_| ServerError::NotFound(joined.clone()))?;

    if !canonical.starts_with(root) {
        tracing::warn!(path = %url_path, "Rejected path outside document root");
        return Err(ServerError::NotFound(joined));
    }

    Ok(canonical)
}

/// Reads a regular file under `root`.
pub async fn read_file(root: &Path, url_path: &str) -> Result<Vec<u8>, ServerError> {
    let path = resolve(root, url_path).await?;

    let meta = tokio::fs::metadata(&path)
        .await
        .map_err(|_| ServerError::NotFound(path.clone()))?;
    if !meta.is_file() {
        return Err(ServerError::NotFound(path));
    }

    tokio::fs::read(&path)
        .await
        .map_err(|_| ServerError::NotFound(path))
}

/// One child of a listed directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub name: String,
    pub is_dir: bool,
}

/// Immediate children of a directory under `root`, sorted by name.
pub async fn list_directory(root: &Path, url_path: &str) -> Result<Vec<DirEntry>, ServerError> {
    let dir = resolve(root, url_path).await?;

    let mut read_dir = match tokio::fs::read_dir(&dir).await {
        Ok(rd) => rd,
        Err(_) => return Err(ServerError::NotFound(dir)),
    };

    let mut entries = Vec::new();
    while let Some(entry) = read_dir
        .next_entry()
        .await
        .map_err(|_| ServerError::NotFound(dir.clone()))?
    {
        // Follows symlinks, so a link to a directory lists as one.
        let is_dir = tokio::fs::metadata(entry.path())
            .await
            .map(|m| m.is_dir())
            .unwrap_or(false);

        entries.push(DirEntry {
            name: entry.file_name().to_string_lossy().into_owned(),
            is_dir,
        });
    }

    entries.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(entries)
}

/// Renders a listing as an ordered HTML list.
///
/// # Example
///
/// ```
/// # use portico::http::static_files::{render_listing, DirEntry};
/// let html = render_listing(&[DirEntry { name: "sub".into(), is_dir: true }]);
/// assert_eq!(html, "<ol><li><a href=\"sub/\">sub</a>↓</li></ol>");
/// ```
pub fn render_listing(entries: &[DirEntry]) -> String {
    let mut html = String::from("<ol>");
    for entry in entries {
        let href = urlencoding::encode(&entry.name);
        let slash = if entry.is_dir { "/" } else { "" };
        let marker = if entry.is_dir { DIRECTORY_MARKER } else { "" };
        html.push_str(&format!(
            "<li><a href=\"{href}{slash}\">{}</a>{marker}</li>",
            escape_html(&entry.name)
        ));
    }
    html.push_str("</ol>");
    html
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}
