//! Line-oriented chapter parsing.
//!
//! A chapter source is read one line at a time. The first character of a
//! line decides whether it is a command (title, header, list item, div
//! toggle, raw tag, section marker, page break, end of chapter) or body
//! text. Body text accumulates into a pending paragraph until a blank line,
//! and list items accumulate into a pending list until any other line shows
//! up, so both are flushed into whatever container is open at that point.
//! Divs are tracked on a container stack; the markup only toggles a single
//! level, so a div marker while a div is open always closes it.

use super::attributes;
use super::entity::{Entity, EntityKind};
use super::error::{MarkupError, ParseError};
use super::inline::{self, Footnote, Footnotes};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

/// Maximum number of characters taken from a title line.
const MAX_TITLE_LENGTH: usize = 100;
/// Headers deeper than this are rendered at this level.
const MAX_HEADER_DEPTH: usize = 3;

static RAW_TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^<([\w:]+)(?:\.([\w-]+))?(?:\s+([^>]*?))?\s*/?>\s*$")
        .expect("can compile raw tag pattern")
});
static DIV_CLASS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^-\.([\w-]+)").expect("can compile div class pattern"));
static TAGS: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("can compile tag pattern"));

/// The closed set of line commands, keyed by their leading character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Title,
    Header,
    ListItem,
    DivToggle,
    RawTag,
    SectionMarker,
    PageBreak,
    EndOfChapter,
}

impl Command {
    fn from_line(line: &str) -> Option<Command> {
        match line.chars().next()? {
            '#' => Some(Command::Title),
            '=' => Some(Command::Header),
            '*' => Some(Command::ListItem),
            '-' => Some(Command::DivToggle),
            '<' => Some(Command::RawTag),
            '^' => Some(Command::SectionMarker),
            '!' => Some(Command::PageBreak),
            ':' => Some(Command::EndOfChapter),
            _ => None,
        }
    }
}

/// An addressable heading within a chapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Section {
    pub title: String,
    pub id: String,
}

/// A fully parsed chapter.
#[derive(Debug, Clone)]
pub struct Chapter {
    pub number: usize,
    pub title: String,
    pub source: String,
    pub file: String,
    pub entities: Vec<Entity>,
    pub sections: Vec<Section>,
    pub footnotes: Vec<Footnote>,
}

impl Chapter {
    /// Parse the markup `text` of the chapter numbered `number` (1-based),
    /// read from the source identified by `source`.
    pub fn parse(number: usize, source: &str, text: &str) -> Result<Chapter, ParseError> {
        let mut builder = ChapterBuilder::new(number);
        for (i, line) in text.lines().enumerate() {
            builder
                .line(line.trim_end())
                .map_err(|source| ParseError {
                    line: i + 1,
                    source,
                })?;
        }
        builder.finish(source)
    }

    /// Render the chapter as a complete XHTML document.
    pub fn render(&self, stylesheet: &str) -> String {
        let body = self
            .entities
            .iter()
            .map(Entity::render)
            .collect::<Vec<_>>()
            .join("\n");
        let footnotes = self
            .footnotes
            .iter()
            .map(|f| format!("{}\n", f.body.render()))
            .collect::<String>();

        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE html PUBLIC "-//W3C//DTD XHTML 1.1//EN" "http://www.w3.org/TR/xhtml11/DTD/xhtml11.dtd">
<html xmlns="http://www.w3.org/1999/xhtml">
<head>
<title>{title}</title>
<link rel="stylesheet" href="{stylesheet}" type="text/css" />
</head>
<body>

{body}{footnotes}

</body>
</html>
"#,
            title = html_escape::encode_text(&self.title),
            stylesheet = html_escape::encode_double_quoted_attribute(stylesheet),
        )
    }
}

/// Per-chapter parsing state.
struct ChapterBuilder {
    number: usize,
    title: Option<String>,
    entities: Vec<Entity>,
    /// Open divs, innermost last
    containers: Vec<Entity>,
    paragraph: Entity,
    list: Option<Entity>,
    sections: Vec<Section>,
    footnotes: Footnotes,
}

impl ChapterBuilder {
    fn new(number: usize) -> ChapterBuilder {
        ChapterBuilder {
            number,
            title: None,
            entities: Vec::new(),
            containers: Vec::new(),
            paragraph: Entity::of(EntityKind::P),
            list: None,
            sections: Vec::new(),
            footnotes: Footnotes::default(),
        }
    }

    fn line(&mut self, line: &str) -> Result<(), MarkupError> {
        let Some(command) = Command::from_line(line) else {
            self.flush_list();
            if line.is_empty() {
                self.close_paragraph();
            } else {
                let text = inline::format(line, &mut self.footnotes);
                self.paragraph.append(text);
            }
            return Ok(());
        };

        self.close_paragraph();
        if command != Command::ListItem {
            self.flush_list();
        }

        match command {
            Command::Title => self.title(line),
            Command::Header => self.header(line),
            Command::ListItem => self.list_item(line),
            Command::DivToggle => self.toggle_div(line),
            Command::RawTag => self.raw_tag(line)?,
            Command::SectionMarker => {}
            Command::PageBreak => self.push(Entity::of(EntityKind::PageBreak)),
            Command::EndOfChapter => {
                let mut separator = Entity::with_text(EntityKind::H1, "* * *");
                separator.add_class("centered");
                self.push(separator);
            }
        }
        Ok(())
    }

    /// Append to the innermost open container.
    fn push(&mut self, entity: Entity) {
        match self.containers.last_mut() {
            Some(div) => {
                div.append(entity);
            }
            None => self.entities.push(entity),
        }
    }

    fn close_paragraph(&mut self) {
        let paragraph = std::mem::replace(&mut self.paragraph, Entity::of(EntityKind::P));
        if !paragraph.is_empty() {
            self.push(paragraph);
        }
    }

    fn flush_list(&mut self) {
        if let Some(list) = self.list.take() {
            self.push(list);
        }
    }

    fn title(&mut self, line: &str) {
        let title: String = line.chars().skip(1).take(MAX_TITLE_LENGTH).collect();
        self.title = Some(title.trim().to_string());
    }

    fn header(&mut self, line: &str) {
        let depth = line.chars().take_while(|&c| c == '=').count();
        let level = depth.min(MAX_HEADER_DEPTH);
        let label = line.trim_start_matches('=').trim();
        let label = inline::format(label, &mut self.footnotes);

        let id = format!("{}-{}", self.number, self.sections.len() + 1);
        self.sections.push(Section {
            title: TAGS.replace_all(&label, "").trim().to_string(),
            id: id.clone(),
        });

        let mut anchor = Entity::of(EntityKind::A);
        anchor.set_attribute("name", id);
        let mut heading = Entity::of(EntityKind::heading(level));
        heading.append(anchor).append(label);
        self.push(heading);
    }

    fn list_item(&mut self, line: &str) {
        let text = line.trim_start_matches('*').trim_start();
        let text = inline::format(text, &mut self.footnotes);
        self.list
            .get_or_insert_with(|| Entity::of(EntityKind::Ul))
            .append(Entity::with_text(EntityKind::Li, text));
    }

    fn toggle_div(&mut self, line: &str) {
        if let Some(div) = self.containers.pop() {
            self.push(div);
            return;
        }

        let mut div = Entity::of(EntityKind::Div);
        if let Some(caps) = DIV_CLASS.captures(line) {
            div.add_class(&caps[1]);
        }
        self.containers.push(div);
    }

    fn raw_tag(&mut self, line: &str) -> Result<(), MarkupError> {
        let caps = RAW_TAG
            .captures(line)
            .ok_or_else(|| MarkupError::MalformedTag(line.to_string()))?;

        let mut entity = Entity::new(&caps[1])?;
        if let Some(list) = caps.get(3) {
            for (key, value) in attributes::parse(list.as_str())? {
                entity.set_attribute(key, value);
            }
        }
        if let Some(class) = caps.get(2) {
            entity.add_class(class.as_str());
        }
        self.push(entity);
        Ok(())
    }

    fn finish(mut self, source: &str) -> Result<Chapter, ParseError> {
        self.close_paragraph();
        self.flush_list();
        while let Some(div) = self.containers.pop() {
            log::warn!("Chapter `{source}` ends inside an open div; closing it");
            self.push(div);
        }

        let title = self.title.unwrap_or_else(|| {
            log::warn!("Chapter `{source}` has no title line; using its source name");
            source.to_string()
        });

        log::debug!(
            "Parsed chapter {} `{}`: {} entities, {} sections, {} footnotes",
            self.number,
            title,
            self.entities.len(),
            self.sections.len(),
            self.footnotes.len()
        );

        Ok(Chapter {
            number: self.number,
            title,
            source: source.to_string(),
            file: format!("{source}.html"),
            entities: self.entities,
            sections: self.sections,
            footnotes: self.footnotes.into_vec(),
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::markup::entity::Content;

    fn text_of(children: &[Content]) -> String {
        children
            .iter()
            .map(|child| match child {
                Content::Text(text) => text.clone(),
                Content::Entity(entity) => text_of(entity.children()),
            })
            .collect::<Vec<_>>()
            .join("")
    }

    fn parse(text: &str) -> Chapter {
        Chapter::parse(1, "test", text).expect("can parse chapter")
    }

    #[test]
    fn parses_basic_chapter() {
        let chapter = parse("# My Title\n= Chapter One\nHello *world*.\n* item1\n* item2\n\n");

        assert_eq!(chapter.title, "My Title");
        assert_eq!(chapter.file, "test.html");
        assert_eq!(
            chapter.sections,
            vec![Section {
                title: "Chapter One".to_string(),
                id: "1-1".to_string()
            }]
        );

        let kinds: Vec<EntityKind> = chapter.entities.iter().map(Entity::kind).collect();
        assert_eq!(kinds, vec![EntityKind::H1, EntityKind::P, EntityKind::Ul]);

        assert_eq!(
            chapter.entities[0].render(),
            "<h1><a name=\"1-1\"/>\nChapter One</h1>\n"
        );
        assert_eq!(
            chapter.entities[1].render(),
            "<p>Hello <strong>world</strong>.</p>\n"
        );

        let items: Vec<String> = chapter.entities[2]
            .children()
            .iter()
            .map(|item| text_of(std::slice::from_ref(item)))
            .collect();
        assert_eq!(items, vec!["item1", "item2"]);
    }

    #[test]
    fn header_labels_nest_formatting() {
        let chapter = parse("= *Bold _it_*\n");
        assert_eq!(
            chapter.entities[0].render(),
            "<h1><a name=\"1-1\"/>\n<strong>Bold <em>it</em></strong></h1>\n"
        );
        assert_eq!(chapter.sections[0].title, "Bold it");
    }

    #[test]
    fn paragraphs_split_on_blank_lines() {
        let chapter = parse("one\ntwo\n\nthree\n");
        assert_eq!(chapter.entities.len(), 2);
        assert_eq!(chapter.entities[0].render(), "<p>one\ntwo</p>\n");
        assert_eq!(chapter.entities[1].render(), "<p>three</p>\n");
    }

    #[test]
    fn blank_runs_dont_produce_empty_paragraphs() {
        let chapter = parse("\n\n\none\n\n\n\n");
        assert_eq!(chapter.entities.len(), 1);
    }

    #[test]
    fn section_ids_count_headers() {
        let chapter = Chapter::parse(3, "c", "= A\ntext\n== B\n=== C\n==== D\n")
            .expect("can parse chapter");
        let ids: Vec<&str> = chapter.sections.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["3-1", "3-2", "3-3", "3-4"]);

        let kinds: Vec<EntityKind> = chapter.entities.iter().map(Entity::kind).collect();
        assert_eq!(
            kinds,
            vec![
                EntityKind::H1,
                EntityKind::P,
                EntityKind::H2,
                EntityKind::H3,
                EntityKind::H3
            ]
        );
    }

    #[test]
    fn section_titles_are_plain_text() {
        let chapter = parse("= The *big* [@,http://x.com,day]\n");
        assert_eq!(chapter.sections[0].title, "The big day");
    }

    #[test]
    fn div_toggles_wrap_lines() {
        let chapter = parse("before\n\n-\ninside\n\n* a\n-\nafter\n-\nnext\n");
        let kinds: Vec<EntityKind> = chapter.entities.iter().map(Entity::kind).collect();
        assert_eq!(
            kinds,
            vec![EntityKind::P, EntityKind::Div, EntityKind::P, EntityKind::Div]
        );

        let div = &chapter.entities[1];
        assert!(div.classes().is_empty());
        assert_eq!(
            div.render(),
            "<div><p>inside</p>\n\n<ul><li>a</li>\n</ul>\n</div>\n"
        );

        // the third toggle opened a div that was closed at end of input
        assert_eq!(chapter.entities[3].render(), "<div><p>next</p>\n</div>\n");
    }

    #[test]
    fn div_toggle_takes_a_class() {
        let chapter = parse("-.note\ntext\n-\n");
        assert_eq!(
            chapter.entities[0].render(),
            "<div class=\"note\"><p>text</p>\n</div>\n"
        );
    }

    #[test]
    fn lists_flush_on_other_lines() {
        let chapter = parse("* a\n* b\ntext\n* c\n");
        let kinds: Vec<EntityKind> = chapter.entities.iter().map(Entity::kind).collect();
        assert_eq!(kinds, vec![EntityKind::Ul, EntityKind::P, EntityKind::Ul]);
        assert_eq!(chapter.entities[0].children().len(), 2);
    }

    #[test]
    fn list_items_are_formatted() {
        let chapter = parse("* a *bold* move\n");
        assert_eq!(
            chapter.entities[0].render(),
            "<ul><li>a <strong>bold</strong> move</li>\n</ul>\n"
        );
    }

    #[test]
    fn raw_tags_become_entities() {
        let chapter = parse("<img.wide src=\"a_b_c.jpg\" alt=\"x\">\n<br/>\n");
        assert_eq!(
            chapter.entities[0].render(),
            "<img src=\"a_b_c.jpg\" alt=\"x\" class=\"wide\"/>\n"
        );
        assert_eq!(chapter.entities[1].render(), "<br/>\n");
    }

    #[test]
    fn raw_tag_errors_carry_line_numbers() {
        let err = Chapter::parse(1, "c", "fine\n<blink src=\"x\">\n").expect_err("fails");
        assert_eq!(err.line, 2);
        assert_eq!(
            err.source,
            MarkupError::InvalidEntityKind("blink".to_string())
        );

        let err = Chapter::parse(1, "c", "\n\n<img data src=\"x\">\n").expect_err("fails");
        assert_eq!(err.line, 3);
        assert!(matches!(
            err.source,
            MarkupError::MalformedAttributeList { .. }
        ));

        let err = Chapter::parse(1, "c", "<>\n").expect_err("fails");
        assert!(matches!(err.source, MarkupError::MalformedTag(_)));
    }

    #[test]
    fn markers_and_separators() {
        let chapter = parse("one\n!\n^ reserved\n:\ntwo\n");
        let rendered: Vec<String> = chapter.entities.iter().map(Entity::render).collect();
        assert_eq!(
            rendered,
            vec![
                "<p>one</p>\n".to_string(),
                "<mbp:pagebreak/>\n".to_string(),
                "<h1 class=\"centered\">* * *</h1>\n".to_string(),
                "<p>two</p>\n".to_string(),
            ]
        );
    }

    #[test]
    fn footnotes_render_at_chapter_end() {
        let chapter = parse("# T\nA[+,first] b.\n\n= H[+,second]\nC[+,third]\n");
        let ordinals: Vec<usize> = chapter.footnotes.iter().map(|f| f.ordinal).collect();
        assert_eq!(ordinals, vec![1, 2, 3]);

        let html = chapter.render("main.css");
        let body_end = html.find("</body>").expect("has a body");
        let first = html.find("<p class=\"small\"><a name=\"fn-1\"/>").expect("has fn-1");
        let third = html.find("<a name=\"fn-3\"/>\n3. third").expect("has fn-3");
        assert!(first < third && third < body_end);
        assert!(html.contains("<sup><a href=\"#fn-2\">2</a></sup>"));
    }

    #[test]
    fn titles_are_bounded_and_escaped() {
        let long = format!("#{}", "x".repeat(150));
        assert_eq!(parse(&long).title.len(), MAX_TITLE_LENGTH);

        let chapter = parse("# Fish & Chips\nbody\n");
        let html = chapter.render("main.css");
        assert!(html.contains("<title>Fish &amp; Chips</title>"));
        assert!(html.contains("href=\"main.css\""));
        assert!(html.contains("<p>body</p>"));
    }

    #[test]
    fn missing_title_falls_back_to_source() {
        let chapter = Chapter::parse(2, "appendix", "text\n").expect("can parse chapter");
        assert_eq!(chapter.title, "appendix");
    }
}
