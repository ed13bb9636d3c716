//! Writes the unpacked book: chapter documents, OPF, NCX, TOC page and media.

use super::{ncx, opf, toc, Render};
use crate::book::navigation::TOC_FILE;
use crate::book::Book;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// An output directory receiving every document of the book.
#[derive(Debug)]
pub struct Package {
    pub output: PathBuf,
}

impl Package {
    fn write(&self, name: &str, contents: &str) -> Result<()> {
        let path = self.output.join(name);
        std::fs::write(&path, contents)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        log::debug!("Wrote {}", path.display());
        Ok(())
    }

    fn copy(&self, from: &Path, name: &str) -> Result<()> {
        let to = self.output.join(name);
        std::fs::copy(from, &to).with_context(|| {
            format!("Failed to copy {} to {}", from.display(), to.display())
        })?;
        Ok(())
    }
}

impl Render for Package {
    fn render(&self, book: &Book) -> Result<()> {
        std::fs::create_dir_all(&self.output).with_context(|| {
            format!("Failed to create output directory {}", self.output.display())
        })?;

        for chapter in &book.chapters {
            self.write(&chapter.file, &chapter.render(&book.stylesheet))?;
        }
        self.write(&format!("{}.opf", book.name), &opf::render(book))?;
        self.write(&format!("{}.ncx", book.name), &ncx::render(book))?;
        self.write(TOC_FILE, &toc::render(book))?;

        for media in book.media.iter().chain(book.cover.as_ref()) {
            self.copy(&media.path, &media.name)?;
        }

        log::info!(
            "Wrote {} chapter(s) and {} media file(s) to {}",
            book.chapters.len(),
            book.media.len() + usize::from(book.cover.is_some()),
            self.output.display()
        );
        Ok(())
    }
}
