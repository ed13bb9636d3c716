//! Everything read from a book directory before parsing starts.
//!
//! Resolves the configured chapter identifiers to their source files and
//! discovers the media that gets copied alongside the generated documents.
//! Missing inputs are reported here, before any output is written.

mod media;
pub use media::*;

use crate::config::Configuration;
use anyhow::{anyhow, Context, Result};
use std::path::{Path, PathBuf};

/// A chapter source file on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChapterSource {
    /// Identifier from the configuration; also names the output document
    pub id: String,
    pub path: PathBuf,
}

impl ChapterSource {
    pub fn read(&self) -> Result<String> {
        std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read chapter source {}", self.path.display()))
    }
}

/// The inputs of a book.
#[derive(Debug, Default)]
pub struct Source {
    /// Chapter sources in reading order
    pub chapters: Vec<ChapterSource>,
    /// Media files, sorted by file name
    pub media: Vec<MediaFile>,
}

impl Source {
    /// Resolve the inputs described by `config` relative to the book directory `root`.
    pub fn load(root: &Path, config: &Configuration) -> Result<Source> {
        let source_dir = root.join(&config.source_dir);
        let chapters = config
            .chapters
            .iter()
            .map(|id| {
                let path = source_dir.join(format!("{id}.txt"));
                if !path.is_file() {
                    return Err(anyhow!(
                        "Chapter source `{id}` not found at {}",
                        path.display()
                    ));
                }
                Ok(ChapterSource {
                    id: id.clone(),
                    path,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let media_dir = root.join(&config.media_dir);
        let media = discover_media(&media_dir)?;
        log::debug!(
            "Found {} chapter source(s) and {} media file(s)",
            chapters.len(),
            media.len()
        );

        Ok(Source { chapters, media })
    }

    /// Look up a media file by its file name.
    pub fn media_file(&self, name: &str) -> Option<&MediaFile> {
        self.media.iter().find(|m| m.name == name)
    }
}
