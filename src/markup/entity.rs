//! The entity tree chapters are built from.
//!
//! Every element a chapter can contain is drawn from a small, closed
//! vocabulary of tag kinds. Entities own their children, which are either
//! nested entities or literal (already formatted) text, and render
//! themselves straight to XHTML. Block-level kinds end their rendering with
//! a newline so the generated documents stay line-oriented; inline kinds
//! don't, so they can sit inside running text.

use super::error::{MarkupError, Result};
use std::fmt;
use std::str::FromStr;

/// The closed set of tags an entity can be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Title,
    Div,
    P,
    Br,
    A,
    B,
    Img,
    H1,
    H2,
    H3,
    H4,
    H5,
    H6,
    Ul,
    Li,
    /// Kindle-specific page break marker
    PageBreak,
}

impl EntityKind {
    pub const ALL: [EntityKind; 16] = [
        EntityKind::Title,
        EntityKind::Div,
        EntityKind::P,
        EntityKind::Br,
        EntityKind::A,
        EntityKind::B,
        EntityKind::Img,
        EntityKind::H1,
        EntityKind::H2,
        EntityKind::H3,
        EntityKind::H4,
        EntityKind::H5,
        EntityKind::H6,
        EntityKind::Ul,
        EntityKind::Li,
        EntityKind::PageBreak,
    ];

    /// The tag name as written in the generated markup.
    pub fn tag(&self) -> &'static str {
        match self {
            EntityKind::Title => "title",
            EntityKind::Div => "div",
            EntityKind::P => "p",
            EntityKind::Br => "br",
            EntityKind::A => "a",
            EntityKind::B => "b",
            EntityKind::Img => "img",
            EntityKind::H1 => "h1",
            EntityKind::H2 => "h2",
            EntityKind::H3 => "h3",
            EntityKind::H4 => "h4",
            EntityKind::H5 => "h5",
            EntityKind::H6 => "h6",
            EntityKind::Ul => "ul",
            EntityKind::Li => "li",
            EntityKind::PageBreak => "mbp:pagebreak",
        }
    }

    /// Heading kind for a 1-based level, clamped to h1..=h6.
    pub fn heading(level: usize) -> EntityKind {
        match level {
            0 | 1 => EntityKind::H1,
            2 => EntityKind::H2,
            3 => EntityKind::H3,
            4 => EntityKind::H4,
            5 => EntityKind::H5,
            _ => EntityKind::H6,
        }
    }

    /// Inline kinds are rendered without a trailing newline.
    pub fn is_inline(&self) -> bool {
        matches!(self, EntityKind::A | EntityKind::B)
    }
}

impl FromStr for EntityKind {
    type Err = MarkupError;

    fn from_str(name: &str) -> Result<Self> {
        EntityKind::ALL
            .iter()
            .find(|kind| kind.tag() == name)
            .copied()
            .ok_or_else(|| MarkupError::InvalidEntityKind(name.to_string()))
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// A child of an entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
    Text(String),
    Entity(Entity),
}

impl Content {
    pub fn render(&self) -> String {
        match self {
            Content::Text(text) => text.clone(),
            Content::Entity(entity) => entity.render(),
        }
    }
}

impl From<Entity> for Content {
    fn from(entity: Entity) -> Self {
        Content::Entity(entity)
    }
}

impl From<String> for Content {
    fn from(text: String) -> Self {
        Content::Text(text)
    }
}

impl From<&str> for Content {
    fn from(text: &str) -> Self {
        Content::Text(text.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entity {
    kind: EntityKind,
    attributes: Vec<(String, String)>,
    classes: Vec<String>,
    children: Vec<Content>,
}

impl Entity {
    /// Create an entity from a tag name, failing if the name isn't part of
    /// the supported vocabulary.
    pub fn new(name: &str) -> Result<Entity> {
        Ok(Entity::of(name.parse()?))
    }

    pub fn of(kind: EntityKind) -> Entity {
        Entity {
            kind,
            attributes: Vec::new(),
            classes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Shorthand for an entity holding a single run of text.
    pub fn with_text<S: Into<String>>(kind: EntityKind, text: S) -> Entity {
        let mut entity = Entity::of(kind);
        entity.append(Content::Text(text.into()));
        entity
    }

    #[cfg(test)]
    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    #[cfg(test)]
    pub fn children(&self) -> &[Content] {
        &self.children
    }

    #[cfg(test)]
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    #[cfg(test)]
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn append<C: Into<Content>>(&mut self, child: C) -> &mut Self {
        self.children.push(child.into());
        self
    }

    /// Set an attribute; an existing key keeps its position and takes the new value.
    pub fn set_attribute<K: Into<String>, V: Into<String>>(&mut self, key: K, value: V) -> &mut Self {
        let key = key.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(k, _)| *k == key) {
            Some(existing) => existing.1 = value,
            None => self.attributes.push((key, value)),
        }
        self
    }

    pub fn add_class<S: Into<String>>(&mut self, class: S) -> &mut Self {
        self.classes.push(class.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub fn render(&self) -> String {
        let tag = self.kind.tag();
        let mut html = format!("<{tag}");
        if !self.attributes.is_empty() {
            html.push(' ');
            html.push_str(
                &self
                    .attributes
                    .iter()
                    .map(|(k, v)| format!("{k}=\"{v}\""))
                    .collect::<Vec<_>>()
                    .join(" "),
            );
        }
        if !self.classes.is_empty() {
            html.push_str(&format!(" class=\"{}\"", self.classes.join(" ")));
        }

        if self.children.is_empty() {
            html.push_str("/>");
        } else {
            let children = self
                .children
                .iter()
                .map(Content::render)
                .collect::<Vec<_>>()
                .join("\n");
            html.push_str(&format!(">{children}</{tag}>"));
        }

        if !self.kind.is_inline() {
            html.push('\n');
        }
        html
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}
