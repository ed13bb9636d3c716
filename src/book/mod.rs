//! Book assembly.
//!
//! Parses every configured chapter in declared order and gathers what the
//! output documents need: metadata, chapters with their sections, media and
//! the cover image. Chapter numbers, and therefore section ids, come from
//! the position in the configuration, never from parse order.

pub mod navigation;

use crate::config::{Configuration, Metadata};
use crate::markup::{Chapter, Section};
use crate::source::{MediaFile, Source};
use anyhow::{anyhow, Context, Result};
use indicatif::ProgressBar;
use serde::Serialize;

#[derive(Debug)]
pub struct Book {
    pub metadata: Metadata,
    /// Package name for the OPF/NCX documents
    pub name: String,
    pub stylesheet: String,
    pub chapters: Vec<Chapter>,
    /// Media listed in the manifest, excluding the cover
    pub media: Vec<MediaFile>,
    pub cover: Option<MediaFile>,
}

/// Chapter summary printed by the `outline` command.
#[derive(Debug, Serialize)]
pub struct ChapterOutline<'a> {
    pub number: usize,
    pub title: &'a str,
    /// Source identifier the chapter was read from
    pub source: &'a str,
    pub file: &'a str,
    pub sections: &'a [Section],
    pub footnotes: usize,
}

impl Book {
    /// Parse all chapters of `source` and collect them into a book.
    pub fn assemble(config: &Configuration, source: &Source, progress: &ProgressBar) -> Result<Book> {
        let cover = match config.cover_opt() {
            Some(name) => Some(source.media_file(name).cloned().ok_or_else(|| {
                anyhow!(
                    "Cover image `{name}` not found in {}",
                    config.media_dir.display()
                )
            })?),
            None => None,
        };

        let mut chapters = Vec::with_capacity(source.chapters.len());
        for (i, chapter_source) in source.chapters.iter().enumerate() {
            progress.set_message(format!("Parsing {}", chapter_source.id));
            let text = chapter_source.read()?;
            let chapter = Chapter::parse(i + 1, &chapter_source.id, &text).with_context(|| {
                format!(
                    "Failed to parse chapter {}",
                    chapter_source.path.display()
                )
            })?;
            log::info!("Parsed chapter {}: {}", chapter.number, chapter.title);
            chapters.push(chapter);
            progress.inc(1);
        }

        let media = source
            .media
            .iter()
            .filter(|m| cover.as_ref().map(|c| c.name != m.name).unwrap_or(true))
            .cloned()
            .collect();

        Ok(Book {
            metadata: config.meta.clone(),
            name: config.name.clone(),
            stylesheet: config.stylesheet.clone(),
            chapters,
            media,
            cover,
        })
    }

    pub fn navigation(&self) -> Vec<navigation::NavPoint> {
        navigation::build(&self.chapters)
    }

    pub fn outline(&self) -> Vec<ChapterOutline<'_>> {
        self.chapters
            .iter()
            .map(|c| ChapterOutline {
                number: c.number,
                title: &c.title,
                source: &c.source,
                file: &c.file,
                sections: &c.sections,
                footnotes: c.footnotes.len(),
            })
            .collect()
    }
}

#[cfg(test)]
pub(crate) mod test {
    use super::*;
    use crate::config::MetadataBuilder;
    use std::path::Path;

    /// Lay out a small book directory with two chapters and some media.
    pub fn write_book(root: &Path) -> Configuration {
        std::fs::create_dir_all(root.join("source")).expect("can create source dir");
        std::fs::create_dir_all(root.join("media")).expect("can create media dir");
        std::fs::write(
            root.join("source/intro.txt"),
            "# Introduction\n= Getting Started\nHello *world*[+,a note].\n",
        )
        .expect("can write chapter");
        std::fs::write(
            root.join("source/ending.txt"),
            "# The End\n= First\ntext\n= Second\n* item\n",
        )
        .expect("can write chapter");
        std::fs::write(root.join("media/cover.gif"), b"GIF89a").expect("can write cover");
        std::fs::write(root.join("media/main.css"), b"p { margin: 0; }").expect("can write css");
        std::fs::write(root.join("media/photo.jpg"), b"\xff\xd8").expect("can write photo");

        let meta = MetadataBuilder::default()
            .title("Test Book")
            .identifier("978-1")
            .creator("Tester")
            .build()
            .expect("can build metadata");
        Configuration::new("test", vec!["intro".into(), "ending".into()], meta)
    }

    pub fn assemble(root: &Path) -> Book {
        let config = write_book(root);
        let source = Source::load(root, &config).expect("can load source");
        Book::assemble(&config, &source, &ProgressBar::hidden()).expect("can assemble book")
    }

    #[test]
    fn chapters_are_numbered_in_declared_order() {
        let dir = tempfile::tempdir().expect("can create temp dir");
        let book = assemble(dir.path());

        let titles: Vec<(usize, &str)> = book
            .chapters
            .iter()
            .map(|c| (c.number, c.title.as_str()))
            .collect();
        assert_eq!(titles, vec![(1, "Introduction"), (2, "The End")]);
        assert_eq!(book.chapters[1].sections[1].id, "2-2");
    }

    #[test]
    fn cover_is_split_from_media() {
        let dir = tempfile::tempdir().expect("can create temp dir");
        let book = assemble(dir.path());

        assert_eq!(book.cover.as_ref().map(|c| c.name.as_str()), Some("cover.gif"));
        let names: Vec<&str> = book.media.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["main.css", "photo.jpg"]);
    }

    #[test]
    fn missing_cover_fails() {
        let dir = tempfile::tempdir().expect("can create temp dir");
        let mut config = write_book(dir.path());
        config.cover = "missing.jpg".to_string();
        let source = Source::load(dir.path(), &config).expect("can load source");
        let err = Book::assemble(&config, &source, &ProgressBar::hidden()).expect_err("fails");
        assert!(err.to_string().contains("missing.jpg"));
    }

    #[test]
    fn parse_errors_name_the_file() {
        let dir = tempfile::tempdir().expect("can create temp dir");
        let config = write_book(dir.path());
        std::fs::write(dir.path().join("source/ending.txt"), "ok\n<marquee>\n")
            .expect("can write chapter");
        let source = Source::load(dir.path(), &config).expect("can load source");
        let err = Book::assemble(&config, &source, &ProgressBar::hidden()).expect_err("fails");

        let message = format!("{err:#}");
        assert!(message.contains("ending.txt"));
        assert!(message.contains("line 2"));
        assert!(message.contains("marquee"));
    }

    #[test]
    fn outline_summarises_chapters() {
        let dir = tempfile::tempdir().expect("can create temp dir");
        let book = assemble(dir.path());
        let outline = book.outline();
        assert_eq!(outline[0].footnotes, 1);
        assert_eq!(outline[1].sections.len(), 2);

        let json = serde_json::to_value(&outline).expect("can serialize outline");
        assert_eq!(json[0]["sections"][0]["id"], "1-1");
        assert_eq!(json[1]["source"], "ending");
    }
}
