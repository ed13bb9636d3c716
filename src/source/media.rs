//! Media discovery.
//!
//! Only GIF and JPEG images and CSS stylesheets are carried into the book;
//! anything else in the media directory is skipped with a warning.

use anyhow::{anyhow, Context, Result};
use std::path::{Path, PathBuf};

/// An image or stylesheet copied verbatim into the output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaFile {
    pub path: PathBuf,
    /// File name, used as both manifest id and href
    pub name: String,
    pub media_type: &'static str,
}

/// Determine the MIME type of a supported media file from its extension.
pub fn media_type(path: &Path) -> Option<&'static str> {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .as_deref()
    {
        Some("gif") => Some("image/gif"),
        Some("jpg" | "jpeg") => Some("image/jpeg"),
        Some("css") => Some("text/css"),
        _ => None,
    }
}

/// List the supported media files in `dir`, sorted by name.
pub fn discover_media(dir: &Path) -> Result<Vec<MediaFile>> {
    if !dir.is_dir() {
        return Err(anyhow!("Media directory {} doesn't exist", dir.display()));
    }

    let mut media = Vec::new();
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("Failed to list media directory {}", dir.display()))?;
    for entry in entries {
        let path = entry
            .with_context(|| format!("Failed to read entry in {}", dir.display()))?
            .path();
        if !path.is_file() {
            continue;
        }
        let Some(name) = path.file_name().map(|n| n.to_string_lossy().to_string()) else {
            continue;
        };
        match media_type(&path) {
            Some(media_type) => media.push(MediaFile {
                path,
                name,
                media_type,
            }),
            None => log::warn!("Skipping unsupported media file {}", path.display()),
        }
    }

    media.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(media)
}
