//! The plain-text markup language and the entity tree it parses into.
//!
//! Parsing happens per chapter: [`Chapter::parse`] runs every source line
//! through the inline formatter and then through a small line-command state
//! machine, producing entities, sections and footnotes. Nothing here touches
//! the filesystem.

mod attributes;
mod chapter;
mod entity;
mod error;
mod inline;

pub use chapter::{Chapter, Section};
pub use entity::{Entity, EntityKind};
