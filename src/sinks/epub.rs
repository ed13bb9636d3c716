//! Zipped EPUB output.
//!
//! Uses the `epub-builder` crate, which generates its own OPF manifest and
//! NCX navigation; we feed it the same chapter documents and TOC page the
//! unpacked package contains, with sections as nested TOC entries.

use super::{toc, Render};
use crate::book::navigation::TOC_FILE;
use crate::book::Book;
use anyhow::{anyhow, Context, Result};
use epub_builder::{EpubBuilder, EpubContent, ReferenceType, TocElement, ZipLibrary};
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

#[derive(Debug)]
pub struct Epub {
    pub outfile: PathBuf,
}

impl Render for Epub {
    fn render(&self, book: &Book) -> Result<()> {
        let zip = ZipLibrary::new().map_err(|e| anyhow!("Failed to create ZIP library for EPUB: {e}"))?;
        let mut builder =
            EpubBuilder::new(zip).map_err(|e| anyhow!("Failed to build builder: {e}"))?;

        let meta = &book.metadata;
        let mut metadata = vec![
            ("title", meta.title.as_str()),
            ("lang", meta.language.as_str()),
            ("author", meta.creator.as_str()),
            ("generator", "plainbook"),
        ];
        if !meta.description.is_empty() {
            metadata.push(("description", meta.description.as_str()));
        }
        if !meta.subject.is_empty() {
            metadata.push(("subject", meta.subject.as_str()));
        }
        for (key, value) in metadata {
            builder
                .metadata(key, value)
                .map_err(|e| anyhow!("Failed to set {key} metadata: {e}"))?;
        }

        for media in &book.media {
            let data = std::fs::read(&media.path)
                .with_context(|| format!("Failed to read media file {}", media.path.display()))?;
            builder
                .add_resource(&media.name, data.as_slice(), media.media_type)
                .map_err(|e| anyhow!("Failed to add {} to EPUB: {e}", media.name))?;
        }
        if let Some(cover) = &book.cover {
            let data = std::fs::read(&cover.path)
                .with_context(|| format!("Failed to read cover image {}", cover.path.display()))?;
            builder
                .add_cover_image(&cover.name, data.as_slice(), cover.media_type)
                .map_err(|e| anyhow!("Failed to add cover image to EPUB: {e}"))?;
        }

        let toc_html = toc::render(book);
        builder
            .add_content(
                EpubContent::new(TOC_FILE, toc_html.as_bytes())
                    .title("Table of Contents")
                    .reftype(ReferenceType::Toc),
            )
            .map_err(|e| anyhow!("Failed to add table of contents page: {e}"))?;

        for (i, chapter) in book.chapters.iter().enumerate() {
            let html = chapter.render(&book.stylesheet);
            let mut content = EpubContent::new(&chapter.file, html.as_bytes()).title(&chapter.title);
            if i == 0 {
                content = content.reftype(ReferenceType::Text);
            }
            for section in &chapter.sections {
                content = content.child(TocElement::new(
                    format!("{}#{}", chapter.file, section.id),
                    &section.title,
                ));
            }
            builder
                .add_content(content)
                .map_err(|e| anyhow!("Failed to add chapter {} to EPUB: {e}", chapter.file))?;
        }

        let output_file = File::create(&self.outfile)
            .with_context(|| format!("Failed to create EPUB file: {}", self.outfile.display()))?;
        builder
            .generate(BufWriter::new(output_file))
            .map_err(|e| anyhow!("Failed to generate EPUB file: {e}"))?;

        log::info!("Wrote {}", self.outfile.display());
        Ok(())
    }
}
