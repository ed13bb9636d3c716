use crate::book::Book;
use anyhow::Result;

mod ncx;
mod opf;
mod toc;

mod package;
pub use package::*;

mod epub;
pub use epub::*;

#[derive(Debug)]
pub enum Sink {
    Package(Package),
    Epub(Epub),
}

pub trait Render {
    fn render(&self, book: &Book) -> Result<()>;
}

impl Render for Sink {
    fn render(&self, book: &Book) -> Result<()> {
        match self {
            Sink::Package(p) => p.render(book),
            Sink::Epub(e) => e.render(book),
        }
    }
}
