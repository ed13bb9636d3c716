//! Book configuration.
//!
//! A book directory carries a `plainbook.toml` naming the chapter sources in
//! reading order, the output location, and the package metadata written to
//! the OPF. Everything except the chapter list and the core metadata has a
//! default so a minimal file stays short.

use anyhow::{Context, Result};
use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the configuration file inside a book directory.
pub const CONFIG_FILE: &str = "plainbook.toml";

/// Package metadata for the OPF and NCX documents.
#[derive(Builder, Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[builder(setter(into))]
pub struct Metadata {
    pub title: String,
    /// Language code (BCP 47 format, e.g., "en", "en-GB", "fr").
    #[builder(default = "default_language()")]
    #[serde(default = "default_language")]
    pub language: String,
    /// Unique identifier of the book, written with the ISBN scheme.
    pub identifier: String,
    pub creator: String,
    #[builder(default)]
    #[serde(default)]
    pub publisher: String,
    #[builder(default)]
    #[serde(default)]
    pub subject: String,
    #[builder(default)]
    #[serde(default)]
    pub date: String,
    #[builder(default)]
    #[serde(default)]
    pub description: String,
}

/// Optional zipped EPUB output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpubConfig {
    /// Output EPUB file path, relative to the book directory
    pub outfile: PathBuf,
}

/// Complete configuration for a plainbook project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Configuration {
    /// Output directory, relative to the book directory
    pub output: PathBuf,
    /// Package name, used for the `.opf` and `.ncx` file names
    pub name: String,
    /// Chapter source identifiers in reading order
    pub chapters: Vec<String>,
    /// Directory holding `<chapter>.txt` sources
    #[serde(default = "default_source_dir")]
    pub source_dir: PathBuf,
    /// Directory holding images and stylesheets
    #[serde(default = "default_media_dir")]
    pub media_dir: PathBuf,
    /// Stylesheet linked from every chapter document
    #[serde(default = "default_stylesheet")]
    pub stylesheet: String,
    /// Cover image file name inside the media directory. Empty string for none.
    #[serde(default = "default_cover")]
    pub cover: String,
    pub meta: Metadata,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub epub: Option<EpubConfig>,
}

impl Configuration {
    pub fn new(name: &str, chapters: Vec<String>, meta: Metadata) -> Configuration {
        Configuration {
            output: PathBuf::from("out"),
            name: name.to_string(),
            chapters,
            source_dir: default_source_dir(),
            media_dir: default_media_dir(),
            stylesheet: default_stylesheet(),
            cover: default_cover(),
            meta,
            epub: None,
        }
    }

    /// Load `plainbook.toml` from the given book directory.
    pub fn load(dir: &Path) -> Result<Configuration> {
        let path = dir.join(CONFIG_FILE);
        let contents = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to load {}", path.display()))?;
        toml::from_str(&contents).with_context(|| format!("Failed to parse {}", path.display()))
    }

    /// Returns the cover image file name, if configured.
    pub fn cover_opt(&self) -> Option<&str> {
        if self.cover.is_empty() {
            None
        } else {
            Some(&self.cover)
        }
    }
}

fn default_language() -> String {
    "en".to_string()
}

fn default_source_dir() -> PathBuf {
    PathBuf::from("source")
}

fn default_media_dir() -> PathBuf {
    PathBuf::from("media")
}

fn default_stylesheet() -> String {
    "main.css".to_string()
}

fn default_cover() -> String {
    "cover.gif".to_string()
}
